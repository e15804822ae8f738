//! Demo server: mounts the gateway demo applications behind the HTTP adapter;
//! when DATABASE_URL is set, ensures the panel database exists, applies the
//! schema, and mounts the panel routes.

use axum::Router;
use litepanel::gateway::demo::{
    ContextDump, DigestBoundedLines, DigestChunks, DigestLines, DigestWhole, Hello, SendFile,
    SendFileBuffered,
};
use litepanel::gateway::{app_route, validated, Application, Dispatcher, Lifecycle, StreamFileWrapper};
use litepanel::{
    apply_migrations, ensure_database_exists, panel_model, panel_routes, resolve, AppState,
};
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::limit::RequestBodyLimitLayer;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("litepanel=info".parse()?))
        .init();

    let validate = std::env::var("LITEPANEL_VALIDATE")
        .map(|v| v != "0")
        .unwrap_or(true);
    let dispatcher = Dispatcher::new().with_file_wrapper(Arc::new(StreamFileWrapper));

    let mut app = Router::new()
        .merge(gateway_routes(dispatcher, validate))
        .layer(RequestBodyLimitLayer::new(16 * 1024 * 1024));

    if let Ok(database_url) = std::env::var("DATABASE_URL") {
        ensure_database_exists(&database_url).await?;
        let pool = sqlx::postgres::PgPoolOptions::new()
            .max_connections(5)
            .connect(&database_url)
            .await?;
        let model = resolve(&panel_model())?;
        apply_migrations(&pool, &model).await?;
        let state = AppState {
            pool,
            model: Arc::new(model),
        };
        app = app.merge(panel_routes(state));
    }

    let lifecycle = Lifecycle::new();
    lifecycle.on_shutdown(|| tracing::info!("cleanup called"));

    let listener = TcpListener::bind("0.0.0.0:3000").await?;
    tracing::info!("listening on {}", listener.local_addr()?);
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    lifecycle.shutdown();
    Ok(())
}

fn gateway_routes(dispatcher: Dispatcher, validate: bool) -> Router {
    let apps: Vec<(&str, Arc<dyn Application>)> = vec![
        ("/hello", wrap(Hello, validate)),
        ("/context", wrap(ContextDump, validate)),
        ("/digest", wrap(DigestWhole, validate)),
        ("/digest/chunked", wrap(DigestChunks, validate)),
        ("/digest/lines", wrap(DigestLines, validate)),
        // bounded line reads sit outside the checked interface contract
        ("/digest/limited", Arc::new(DigestBoundedLines)),
        ("/file", wrap(SendFile::new("demos/server.rs"), validate)),
        (
            "/file/buffered",
            wrap(SendFileBuffered::new("demos/server.rs"), validate),
        ),
    ];
    let mut router = Router::new();
    for (path, app) in apps {
        router = router.route(path, app_route(dispatcher.clone(), app));
    }
    router
}

fn wrap<A: Application + 'static>(app: A, validate: bool) -> Arc<dyn Application> {
    if validate {
        Arc::new(validated(app))
    } else {
        Arc::new(app)
    }
}

async fn shutdown_signal() {
    let _ = tokio::signal::ctrl_c().await;
}
