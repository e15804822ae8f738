//! Contract-checking decorator, applied at composition time.

use crate::error::GatewayError;
use crate::gateway::{Application, Body, RequestContext, ResponseStart};
use async_trait::async_trait;

/// Wraps an application and enforces the interface contract: the response must
/// be started exactly once before the body is returned, and headers must be
/// well formed. Double starts are rejected by [`ResponseStart`] itself.
pub struct Conformance<A> {
    inner: A,
}

pub fn validated<A: Application>(inner: A) -> Conformance<A> {
    Conformance { inner }
}

#[async_trait]
impl<A: Application> Application for Conformance<A> {
    async fn handle(
        &self,
        ctx: &mut RequestContext,
        start: &mut ResponseStart,
    ) -> Result<Body, GatewayError> {
        let body = self.inner.handle(ctx, start).await?;
        if !start.is_started() {
            return Err(GatewayError::NotStarted);
        }
        if let Some(headers) = start.headers() {
            for (name, value) in headers {
                if name.is_empty() || !name.chars().all(|c| c.is_ascii_graphic()) {
                    return Err(GatewayError::InvalidHeader(name.clone()));
                }
                if value.contains('\r') || value.contains('\n') {
                    return Err(GatewayError::InvalidHeader(name.clone()));
                }
            }
        }
        Ok(body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;
    use bytes::Bytes;
    use std::collections::BTreeMap;

    struct NeverStarts;

    #[async_trait]
    impl Application for NeverStarts {
        async fn handle(
            &self,
            _ctx: &mut RequestContext,
            _start: &mut ResponseStart,
        ) -> Result<Body, GatewayError> {
            Ok(Body::text("body without start"))
        }
    }

    struct BadHeader;

    #[async_trait]
    impl Application for BadHeader {
        async fn handle(
            &self,
            _ctx: &mut RequestContext,
            start: &mut ResponseStart,
        ) -> Result<Body, GatewayError> {
            start.begin(StatusCode::OK, &[("x-status", "bad\r\nvalue")])?;
            Ok(Body::text("ok"))
        }
    }

    fn ctx() -> RequestContext {
        RequestContext::new(BTreeMap::new(), Bytes::new())
    }

    #[tokio::test]
    async fn rejects_unstarted_response() {
        let app = validated(NeverStarts);
        let mut start = ResponseStart::new();
        let err = app.handle(&mut ctx(), &mut start).await.unwrap_err();
        assert!(matches!(err, GatewayError::NotStarted));
    }

    #[tokio::test]
    async fn rejects_header_injection() {
        let app = validated(BadHeader);
        let mut start = ResponseStart::new();
        let err = app.handle(&mut ctx(), &mut start).await.unwrap_err();
        assert!(matches!(err, GatewayError::InvalidHeader(_)));
    }
}
