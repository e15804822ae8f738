//! litepanel: hosting panel data layer, gateway demo applications, and the
//! native-module build configurator.

pub mod configure;
pub mod error;
pub mod gateway;
pub mod migration;
pub mod routes;
pub mod schema;
pub mod service;
pub mod sql;
pub mod state;
pub mod store;

pub use error::{AppError, BuildError, GatewayError, SchemaError};
pub use migration::apply_migrations;
pub use routes::panel_routes;
pub use schema::{panel_model, resolve, PanelModel, ResolvedPanel};
pub use service::{PanelData, RowValidator};
pub use state::AppState;
pub use store::ensure_database_exists;
