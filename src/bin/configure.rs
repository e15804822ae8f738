//! Build configurator CLI: renders Makefile.in into Makefile in the working
//! directory. No flags; variables come from the environment. Exits non-zero
//! when the template is missing or a variable is undefined.

use litepanel::configure::{generate, link_framework, EnvSysConfig};
use tracing_subscriber::EnvFilter;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("litepanel=info".parse()?))
        .init();

    let dir = std::env::current_dir()?;
    let cfg = EnvSysConfig;
    let out = generate(&dir, &cfg, std::env::consts::OS)?;
    link_framework(&dir, &cfg);
    tracing::info!(path = %out.display(), "done");
    Ok(())
}
