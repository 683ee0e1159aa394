use bytes::{BufMut, Bytes, BytesMut};
use tokio::io::{AsyncWrite, AsyncWriteExt};

use crate::http::response::Response;

/// Serializes the status line and headers of `resp`.
///
/// Status and header lines end in a single `\n`; the head is closed by one
/// `\r\n` line. The body is not included.
pub fn serialize_head(resp: &Response) -> Bytes {
    let mut buf = BytesMut::with_capacity(128);

    // Status line
    let status_line = format!(
        "{} {} {}\n",
        resp.version,
        resp.status.as_u16(),
        resp.status.reason_phrase()
    );
    buf.put_slice(status_line.as_bytes());

    // Headers
    for (k, v) in &resp.headers {
        buf.put_slice(k.as_bytes());
        buf.put_slice(b": ");
        buf.put_slice(v.as_bytes());
        buf.put_u8(b'\n');
    }

    // Header/body separator
    buf.put_slice(b"\r\n");

    buf.freeze()
}

/// Writes a response head to a sink, then optionally its body.
#[derive(Debug)]
pub struct ResponseWriter {
    buffer: Bytes,
    written: usize,
}

impl ResponseWriter {
    pub fn new(response: &Response) -> Self {
        Self {
            buffer: serialize_head(response),
            written: 0,
        }
    }

    /// Writes the serialized head. Returns once every byte has been handed
    /// to `stream`.
    pub async fn write_head<W>(&mut self, stream: &mut W) -> anyhow::Result<()>
    where
        W: AsyncWrite + Unpin,
    {
        while self.written < self.buffer.len() {
            let n = stream.write(&self.buffer[self.written..]).await?;

            if n == 0 {
                return Err(anyhow::anyhow!("connection closed while writing"));
            }

            self.written += n;
        }

        Ok(())
    }

    /// Writes the body bytes after the head.
    pub async fn write_body<W>(&self, stream: &mut W, body: &[u8]) -> anyhow::Result<()>
    where
        W: AsyncWrite + Unpin,
    {
        stream.write_all(body).await?;
        Ok(())
    }
}
