//! Response initiation and body types.

use crate::error::GatewayError;
use axum::http::StatusCode;
use bytes::Bytes;
use futures::stream::BoxStream;
use futures::StreamExt;

/// Response-initiation handle. `begin` must be called exactly once before any
/// body chunk is considered sent; a second call is an error.
pub struct ResponseStart {
    parts: Option<(StatusCode, Vec<(String, String)>)>,
}

impl ResponseStart {
    pub fn new() -> Self {
        ResponseStart { parts: None }
    }

    pub fn begin(&mut self, status: StatusCode, headers: &[(&str, &str)]) -> Result<(), GatewayError> {
        if self.parts.is_some() {
            return Err(GatewayError::AlreadyStarted);
        }
        self.parts = Some((
            status,
            headers
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        ));
        Ok(())
    }

    pub fn is_started(&self) -> bool {
        self.parts.is_some()
    }

    pub fn headers(&self) -> Option<&[(String, String)]> {
        self.parts.as_ref().map(|(_, h)| h.as_slice())
    }

    pub fn into_parts(self) -> Result<(StatusCode, Vec<(String, String)>), GatewayError> {
        self.parts.ok_or(GatewayError::NotStarted)
    }
}

impl Default for ResponseStart {
    fn default() -> Self {
        Self::new()
    }
}

/// Application body: a fully buffered chunk sequence, or a lazily produced
/// finite stream of chunks.
pub enum Body {
    Full(Vec<Bytes>),
    Stream(BoxStream<'static, Result<Bytes, GatewayError>>),
}

impl std::fmt::Debug for Body {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Body::Full(chunks) => f.debug_tuple("Full").field(chunks).finish(),
            Body::Stream(_) => f.debug_tuple("Stream").field(&"..").finish(),
        }
    }
}

impl Body {
    pub fn text(s: impl Into<String>) -> Self {
        Body::Full(vec![Bytes::from(s.into())])
    }

    /// Drain the body into one buffer.
    pub async fn collect(self) -> Result<Bytes, GatewayError> {
        match self {
            Body::Full(chunks) => Ok(chunks.concat().into()),
            Body::Stream(mut stream) => {
                let mut out = Vec::new();
                while let Some(chunk) = stream.next().await {
                    out.extend_from_slice(&chunk?);
                }
                Ok(out.into())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn begin_twice_fails() {
        let mut start = ResponseStart::new();
        start
            .begin(StatusCode::OK, &[("content-type", "text/plain")])
            .unwrap();
        let err = start.begin(StatusCode::OK, &[]).unwrap_err();
        assert!(matches!(err, GatewayError::AlreadyStarted));
    }

    #[test]
    fn into_parts_requires_begin() {
        let start = ResponseStart::new();
        assert!(matches!(start.into_parts(), Err(GatewayError::NotStarted)));
    }

    #[tokio::test]
    async fn collect_concatenates_chunks() {
        let body = Body::Full(vec![Bytes::from_static(b"a"), Bytes::from_static(b"bc")]);
        assert_eq!(&body.collect().await.unwrap()[..], b"abc");
    }
}
