//! Standardized server-application interface for the panel's gateway module,
//! plus the demo applications that exercise it.
//!
//! An application consumes a [`RequestContext`] and a [`ResponseStart`] handle
//! and produces a [`Body`], either fully buffered or lazily streamed. The
//! response must be started exactly once before any body chunk counts as sent.

pub mod conformance;
pub mod context;
pub mod demo;
pub mod lifecycle;
pub mod response;
pub mod service;

pub use conformance::{validated, Conformance};
pub use context::{FileWrapper, InputStream, RequestContext};
pub use lifecycle::Lifecycle;
pub use response::{Body, ResponseStart};
pub use service::{app_route, Dispatcher, StreamFileWrapper};

use crate::error::GatewayError;
use async_trait::async_trait;

#[async_trait]
pub trait Application: Send + Sync {
    async fn handle(
        &self,
        ctx: &mut RequestContext,
        start: &mut ResponseStart,
    ) -> Result<Body, GatewayError>;
}
