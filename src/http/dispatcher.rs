use std::time::SystemTime;
use tokio::io::{AsyncWrite, AsyncWriteExt};
use tracing::{debug, warn};

use crate::config::Config;
use crate::http::chunked::{ChunkError, ChunkedEncoder, LAST_CHUNK};
use crate::http::request::{Method, Request};
use crate::http::response::{Response, ResponseBuilder, StatusCode};
use crate::http::writer::ResponseWriter;
use crate::resources::{Resolution, Resolver};

const CONTENT_TYPE: &str = "text/html";

/// Chooses and writes the response for one request, keyed on its method.
#[derive(Debug, Clone)]
pub struct Dispatcher {
    resolver: Resolver,
    encoder: ChunkedEncoder,
}

impl Dispatcher {
    pub fn new(resolver: Resolver, encoder: ChunkedEncoder) -> Self {
        Self { resolver, encoder }
    }

    pub fn from_config(cfg: &Config) -> Self {
        Self::new(
            Resolver::from_config(&cfg.resources),
            ChunkedEncoder::from_config(&cfg.chunked),
        )
    }

    /// Writes the response for `req` to `sink` and returns its status.
    pub async fn dispatch<W>(&self, req: &Request, sink: &mut W) -> anyhow::Result<StatusCode>
    where
        W: AsyncWrite + Unpin,
    {
        match &req.method {
            Method::GET if req.is_chunked() => self.get_chunked(req, sink).await,
            Method::GET => self.get(req, sink).await,
            Method::HEAD => self.head(req, sink).await,
            Method::POST => self.post(req, sink).await,
            Method::Other(token) => {
                debug!(method = %token, "unsupported method");
                let response = base(StatusCode::NotImplemented).build();
                send(&response, sink, true).await?;
                Ok(response.status)
            }
        }
    }

    async fn get<W>(&self, req: &Request, sink: &mut W) -> anyhow::Result<StatusCode>
    where
        W: AsyncWrite + Unpin,
    {
        let (status, body) = match self.resolver.resolve(&req.target).await {
            Resolution::Found(body) => (StatusCode::Ok, body),
            Resolution::NotFound { fallback, source } => {
                debug!(path = %req.target, error = %source, "resource not found");
                (StatusCode::NotFound, fallback)
            }
        };

        let response = base(status)
            .header("Content-Type", CONTENT_TYPE)
            .body(body)
            .build();
        send(&response, sink, true).await?;
        Ok(status)
    }

    async fn get_chunked<W>(&self, req: &Request, sink: &mut W) -> anyhow::Result<StatusCode>
    where
        W: AsyncWrite + Unpin,
    {
        let response = base(StatusCode::Ok)
            .header("Content-Type", CONTENT_TYPE)
            .header("Transfer-Encoding", "chunked")
            .header("Connection", "keep-alive")
            .build();
        send(&response, sink, false).await?;

        let mut file = match self.resolver.open(&req.target).await {
            Ok(file) => file,
            Err(e) => {
                warn!(path = %req.target, error = %e, "cannot open resource for chunked transfer");
                sink.write_all(LAST_CHUNK).await?;
                return Ok(response.status);
            }
        };

        match self.encoder.stream(&mut file, sink).await {
            Ok(summary) => {
                debug!(
                    path = %req.target,
                    chunks = summary.chunks,
                    bytes = summary.bytes,
                    "chunked transfer complete"
                );
            }
            Err(ChunkError::Source { sent, source }) => {
                warn!(path = %req.target, sent, error = %source, "chunked transfer cut short");
            }
            Err(e @ ChunkError::Sink(_)) => return Err(e.into()),
        }

        Ok(response.status)
    }

    async fn head<W>(&self, req: &Request, sink: &mut W) -> anyhow::Result<StatusCode>
    where
        W: AsyncWrite + Unpin,
    {
        let resolution = self.resolver.resolve(&req.target).await;
        if let Resolution::NotFound { source, .. } = &resolution {
            warn!(path = %req.target, error = %source, "HEAD target not found");
        }
        let length = resolution.into_body().len();

        let response = base(StatusCode::Ok)
            .header("Content-Type", CONTENT_TYPE)
            .header("Content-Length", length.to_string())
            .build();
        send(&response, sink, false).await?;
        Ok(response.status)
    }

    async fn post<W>(&self, req: &Request, sink: &mut W) -> anyhow::Result<StatusCode>
    where
        W: AsyncWrite + Unpin,
    {
        let mut builder = base(StatusCode::Created);
        if let Some(content_type) = req.header("Content-Type") {
            builder = builder.header("Content-Type", content_type);
        }

        let response = builder
            .header("Content-Length", req.body.len().to_string())
            .body(req.body.clone())
            .build();
        send(&response, sink, true).await?;
        Ok(response.status)
    }
}

fn base(status: StatusCode) -> ResponseBuilder {
    ResponseBuilder::new(status).header("Date", httpdate::fmt_http_date(SystemTime::now()))
}

async fn send<W>(response: &Response, sink: &mut W, with_body: bool) -> anyhow::Result<()>
where
    W: AsyncWrite + Unpin,
{
    let mut writer = ResponseWriter::new(response);
    writer.write_head(sink).await?;
    if with_body {
        writer.write_body(sink, &response.body).await?;
    }
    Ok(())
}
