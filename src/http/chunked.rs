use bytes::{BufMut, BytesMut};
use std::time::Duration;
use thiserror::Error;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};

use crate::config::ChunkedConfig;

/// Terminal chunk: zero size and an empty trailer section.
pub const LAST_CHUNK: &[u8] = b"0\r\n\r\n";

#[derive(Debug, Error)]
pub enum ChunkError {
    /// Reading the source failed after `sent` payload bytes. The terminal
    /// chunk has already been written when this is returned.
    #[error("source read failed after {sent} bytes: {source}")]
    Source { sent: u64, source: std::io::Error },

    #[error("failed to write chunk: {0}")]
    Sink(#[source] std::io::Error),
}

/// What a finished chunked transfer sent.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ChunkSummary {
    pub chunks: usize,
    pub bytes: u64,
}

/// Streams a source as HTTP chunks, pausing between blocks.
#[derive(Debug, Clone)]
pub struct ChunkedEncoder {
    block_size: usize,
    delay: Duration,
}

impl ChunkedEncoder {
    /// A zero `block_size` is treated as one byte per chunk.
    pub fn new(block_size: usize, delay: Duration) -> Self {
        Self {
            block_size: block_size.max(1),
            delay,
        }
    }

    pub fn from_config(cfg: &ChunkedConfig) -> Self {
        Self::new(cfg.block_size, cfg.delay())
    }

    pub fn block_size(&self) -> usize {
        self.block_size
    }

    /// Copies `source` to `sink` as a sequence of chunks and finishes with
    /// the terminal chunk.
    pub async fn stream<R, W>(&self, source: &mut R, sink: &mut W) -> Result<ChunkSummary, ChunkError>
    where
        R: AsyncRead + Unpin,
        W: AsyncWrite + Unpin,
    {
        let mut block = vec![0u8; self.block_size];
        let mut frame = BytesMut::with_capacity(self.block_size + 16);
        let mut summary = ChunkSummary::default();

        let read_error = loop {
            let n = match source.read(&mut block).await {
                Ok(0) => break None,
                Ok(n) => n,
                Err(e) => break Some(e),
            };

            if summary.chunks > 0 && !self.delay.is_zero() {
                tokio::time::sleep(self.delay).await;
            }

            frame.clear();
            encode_chunk(&block[..n], &mut frame);
            sink.write_all(&frame).await.map_err(ChunkError::Sink)?;

            summary.chunks += 1;
            summary.bytes += n as u64;
        };

        sink.write_all(LAST_CHUNK).await.map_err(ChunkError::Sink)?;
        sink.flush().await.map_err(ChunkError::Sink)?;

        match read_error {
            Some(source) => Err(ChunkError::Source {
                sent: summary.bytes,
                source,
            }),
            None => Ok(summary),
        }
    }
}

/// Frames one block: lowercase hex size, CRLF, payload, CRLF.
pub fn encode_chunk(payload: &[u8], dst: &mut BytesMut) {
    let size = format!("{:x}\r\n", payload.len());
    dst.reserve(size.len() + payload.len() + 2);
    dst.put_slice(size.as_bytes());
    dst.put_slice(payload);
    dst.put_slice(b"\r\n");
}
