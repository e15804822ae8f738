//! Adapter between the hosting HTTP runtime and gateway applications: builds
//! the request context from an axum request and renders the started response.

use crate::error::GatewayError;
use crate::gateway::{Application, Body, FileWrapper, RequestContext, ResponseStart};
use axum::http::request::Parts;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{any, MethodRouter};
use futures::{StreamExt, TryStreamExt};
use std::collections::BTreeMap;
use std::sync::Arc;
use tokio_util::io::ReaderStream;

/// File-wrapping capability backed by a read stream; the efficient path for
/// file responses when the environment supplies it.
pub struct StreamFileWrapper;

impl FileWrapper for StreamFileWrapper {
    fn wrap(&self, file: tokio::fs::File) -> Body {
        Body::Stream(
            ReaderStream::with_capacity(file, 4096)
                .map_err(GatewayError::from)
                .boxed(),
        )
    }
}

/// Invokes applications for incoming requests. Holds the optional capabilities
/// the environment chooses to supply.
#[derive(Clone, Default)]
pub struct Dispatcher {
    file_wrapper: Option<Arc<dyn FileWrapper>>,
}

impl Dispatcher {
    pub fn new() -> Self {
        Dispatcher { file_wrapper: None }
    }

    pub fn with_file_wrapper(mut self, wrapper: Arc<dyn FileWrapper>) -> Self {
        self.file_wrapper = Some(wrapper);
        self
    }

    pub async fn call<A: Application + ?Sized>(
        &self,
        app: &A,
        req: axum::extract::Request,
    ) -> Response {
        let (parts, body) = req.into_parts();
        let bytes = match axum::body::to_bytes(body, usize::MAX).await {
            Ok(b) => b,
            Err(e) => {
                return (StatusCode::BAD_REQUEST, e.to_string()).into_response();
            }
        };
        let mut ctx = RequestContext::new(context_entries(&parts, bytes.len()), bytes);
        ctx.file_wrapper = self.file_wrapper.clone();

        let mut start = ResponseStart::new();
        match app.handle(&mut ctx, &mut start).await {
            Ok(body) => render(start, body),
            Err(e) => {
                tracing::error!(error = %e, "application failed");
                e.into_response()
            }
        }
    }
}

/// Mount an application under one path for any method.
pub fn app_route(dispatcher: Dispatcher, app: Arc<dyn Application>) -> MethodRouter {
    any(move |req: axum::extract::Request| {
        let dispatcher = dispatcher.clone();
        let app = app.clone();
        async move { dispatcher.call(app.as_ref(), req).await }
    })
}

/// CGI-style context entries from the request head.
fn context_entries(parts: &Parts, content_length: usize) -> BTreeMap<String, String> {
    let mut entries = BTreeMap::new();
    entries.insert("REQUEST_METHOD".into(), parts.method.to_string());
    entries.insert("SCRIPT_NAME".into(), String::new());
    entries.insert("PATH_INFO".into(), parts.uri.path().to_string());
    entries.insert(
        "QUERY_STRING".into(),
        parts.uri.query().unwrap_or("").to_string(),
    );
    entries.insert("SERVER_PROTOCOL".into(), format!("{:?}", parts.version));
    entries.insert("CONTENT_LENGTH".into(), content_length.to_string());
    for (name, value) in parts.headers.iter() {
        let value = String::from_utf8_lossy(value.as_bytes()).to_string();
        let key = name.as_str().to_ascii_uppercase().replace('-', "_");
        match key.as_str() {
            "CONTENT_TYPE" => {
                entries.insert("CONTENT_TYPE".into(), value);
            }
            "CONTENT_LENGTH" => {}
            _ => {
                entries.insert(format!("HTTP_{}", key), value);
            }
        }
    }
    entries
}

fn render(start: ResponseStart, body: Body) -> Response {
    let (status, headers) = match start.into_parts() {
        Ok(parts) => parts,
        Err(e) => return e.into_response(),
    };
    let stream = match body {
        Body::Full(chunks) => futures::stream::iter(chunks.into_iter().map(Ok)).boxed(),
        Body::Stream(stream) => stream,
    };
    let mut builder = axum::http::Response::builder().status(status);
    for (name, value) in &headers {
        builder = builder.header(name.as_str(), value.as_str());
    }
    builder
        .body(axum::body::Body::from_stream(stream))
        .unwrap_or_else(|e| GatewayError::InvalidHeader(e.to_string()).into_response())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::Request;

    #[test]
    fn entries_carry_cgi_keys() {
        let req = Request::builder()
            .method("POST")
            .uri("/context?x=1")
            .header("content-type", "text/plain")
            .header("x-panel", "demo")
            .body(())
            .unwrap();
        let (parts, _) = req.into_parts();
        let entries = context_entries(&parts, 4);
        assert_eq!(entries["REQUEST_METHOD"], "POST");
        assert_eq!(entries["PATH_INFO"], "/context");
        assert_eq!(entries["QUERY_STRING"], "x=1");
        assert_eq!(entries["CONTENT_TYPE"], "text/plain");
        assert_eq!(entries["CONTENT_LENGTH"], "4");
        assert_eq!(entries["HTTP_X_PANEL"], "demo");
        assert!(!entries.contains_key("HTTP_CONTENT_TYPE"));
    }
}
