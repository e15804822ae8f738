//! Shared application state for panel routes.

use crate::schema::resolved::ResolvedPanel;
use sqlx::PgPool;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub pool: PgPool,
    pub model: Arc<ResolvedPanel>,
}
