//! Demo applications: fixed text, context dump, body digests, file responses.
//! Each is independently invokable through the adapter in `service`.

use crate::error::GatewayError;
use crate::gateway::{Application, Body, RequestContext, ResponseStart};
use async_trait::async_trait;
use axum::http::StatusCode;
use bytes::Bytes;
use futures::StreamExt;
use sha2::{Digest, Sha256};
use std::path::PathBuf;
use tokio::io::AsyncReadExt;

const TEXT_PLAIN: &[(&str, &str)] = &[("content-type", "text/plain")];
const TEXT_HTML: &[(&str, &str)] = &[("content-type", "text/html")];

const READ_BLOCK: usize = 4096;
const LINE_LIMIT: usize = 100;

/// Fixed-text response.
pub struct Hello;

#[async_trait]
impl Application for Hello {
    async fn handle(
        &self,
        _ctx: &mut RequestContext,
        start: &mut ResponseStart,
    ) -> Result<Body, GatewayError> {
        start.begin(StatusCode::OK, TEXT_PLAIN)?;
        Ok(Body::Full(vec![Bytes::from_static(b"Hello World!\n")]))
    }
}

/// HTML page listing every context entry as a table row, in key order,
/// followed by any submitted form fields. Streamed.
pub struct ContextDump;

#[async_trait]
impl Application for ContextDump {
    async fn handle(
        &self,
        ctx: &mut RequestContext,
        start: &mut ResponseStart,
    ) -> Result<Body, GatewayError> {
        start.begin(StatusCode::OK, TEXT_HTML)?;

        let mut chunks: Vec<Result<Bytes, GatewayError>> = vec![Ok(Bytes::from_static(
            b"<html><head><title>Hello World!</title></head>\n<body>\n<p>Hello World!</p>\n<table border=\"1\">",
        ))];
        for (name, value) in &ctx.entries {
            chunks.push(Ok(format!(
                "<tr><td>{}</td><td>{}</td></tr>\n",
                escape_html(name),
                escape_html(value)
            )
            .into()));
        }

        let fields = form_fields(ctx);
        if !fields.is_empty() {
            chunks.push(Ok(Bytes::from_static(
                b"<tr><th colspan=\"2\">Form data</th></tr>",
            )));
        }
        for (name, value) in fields {
            chunks.push(Ok(format!(
                "<tr><td>{}</td><td>{}</td></tr>\n",
                escape_html(&name),
                escape_html(&value)
            )
            .into()));
        }

        chunks.push(Ok(Bytes::from_static(b"</table>\n</body></html>\n")));
        Ok(Body::Stream(futures::stream::iter(chunks).boxed()))
    }
}

/// Form fields from a urlencoded body, or from the query string otherwise.
fn form_fields(ctx: &mut RequestContext) -> Vec<(String, String)> {
    let urlencoded = ctx
        .entry("CONTENT_TYPE")
        .map(|t| t.starts_with("application/x-www-form-urlencoded"))
        .unwrap_or(false);
    if urlencoded {
        let body = ctx.input.read_all();
        return url::form_urlencoded::parse(&body).into_owned().collect();
    }
    match ctx.entry("QUERY_STRING") {
        Some(q) if !q.is_empty() => url::form_urlencoded::parse(q.as_bytes())
            .into_owned()
            .collect(),
        _ => Vec::new(),
    }
}

fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(c),
        }
    }
    out
}

/// SHA-256 of the body read in one call.
pub struct DigestWhole;

#[async_trait]
impl Application for DigestWhole {
    async fn handle(
        &self,
        ctx: &mut RequestContext,
        start: &mut ResponseStart,
    ) -> Result<Body, GatewayError> {
        let mut hasher = Sha256::new();
        hasher.update(ctx.input.read_all());
        start.begin(StatusCode::OK, TEXT_PLAIN)?;
        Ok(Body::text(format!("{}\n", hex::encode(hasher.finalize()))))
    }
}

/// Same digest via fixed-size block reads.
pub struct DigestChunks;

#[async_trait]
impl Application for DigestChunks {
    async fn handle(
        &self,
        ctx: &mut RequestContext,
        start: &mut ResponseStart,
    ) -> Result<Body, GatewayError> {
        let mut hasher = Sha256::new();
        loop {
            let chunk = ctx.input.read(READ_BLOCK);
            if chunk.is_empty() {
                break;
            }
            hasher.update(&chunk);
        }
        start.begin(StatusCode::OK, TEXT_PLAIN)?;
        Ok(Body::text(format!("{}\n", hex::encode(hasher.finalize()))))
    }
}

/// Digest via line iteration; reports the digest and the line count.
pub struct DigestLines;

#[async_trait]
impl Application for DigestLines {
    async fn handle(
        &self,
        ctx: &mut RequestContext,
        start: &mut ResponseStart,
    ) -> Result<Body, GatewayError> {
        let mut hasher = Sha256::new();
        let mut lines = 0u64;
        loop {
            let line = ctx.input.read_line(None);
            if line.is_empty() {
                break;
            }
            hasher.update(&line);
            lines += 1;
        }
        start.begin(StatusCode::OK, TEXT_PLAIN)?;
        Ok(Body::text(format!(
            "{}\n{}\n",
            hex::encode(hasher.finalize()),
            lines
        )))
    }
}

/// Digest via size-bounded line reads; reports the digest and the read count.
pub struct DigestBoundedLines;

#[async_trait]
impl Application for DigestBoundedLines {
    async fn handle(
        &self,
        ctx: &mut RequestContext,
        start: &mut ResponseStart,
    ) -> Result<Body, GatewayError> {
        let mut hasher = Sha256::new();
        let mut lines = 0u64;
        loop {
            let line = ctx.input.read_line(Some(LINE_LIMIT));
            if line.is_empty() {
                break;
            }
            hasher.update(&line);
            lines += 1;
        }
        start.begin(StatusCode::OK, TEXT_PLAIN)?;
        Ok(Body::text(format!(
            "{}\n{}\n",
            hex::encode(hasher.finalize()),
            lines
        )))
    }
}

/// File contents. Uses the environment's file-wrapping capability when
/// present, else falls back to buffered block reads.
pub struct SendFile {
    path: PathBuf,
}

impl SendFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        SendFile { path: path.into() }
    }
}

#[async_trait]
impl Application for SendFile {
    async fn handle(
        &self,
        ctx: &mut RequestContext,
        start: &mut ResponseStart,
    ) -> Result<Body, GatewayError> {
        start.begin(StatusCode::OK, TEXT_PLAIN)?;
        let mut file = tokio::fs::File::open(&self.path).await?;
        if let Some(wrapper) = &ctx.file_wrapper {
            return Ok(wrapper.wrap(file));
        }
        let mut chunks = Vec::new();
        loop {
            let mut buf = vec![0u8; READ_BLOCK];
            let n = file.read(&mut buf).await?;
            if n == 0 {
                break;
            }
            buf.truncate(n);
            chunks.push(Bytes::from(buf));
        }
        Ok(Body::Full(chunks))
    }
}

/// File contents from an in-memory copy, in fixed-size chunks. For sources
/// that cannot hand a file handle to the wrapping capability.
pub struct SendFileBuffered {
    path: PathBuf,
}

impl SendFileBuffered {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        SendFileBuffered { path: path.into() }
    }
}

#[async_trait]
impl Application for SendFileBuffered {
    async fn handle(
        &self,
        _ctx: &mut RequestContext,
        start: &mut ResponseStart,
    ) -> Result<Body, GatewayError> {
        start.begin(StatusCode::OK, TEXT_PLAIN)?;
        let data = tokio::fs::read(&self.path).await?;
        let chunks = data
            .chunks(READ_BLOCK)
            .map(|c| Bytes::copy_from_slice(c))
            .collect();
        Ok(Body::Full(chunks))
    }
}
