use crate::http::request::{Method, Request};
use std::collections::HashMap;
use thiserror::Error;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncReadExt};

/// Longest single line (request line or header) the parser accepts.
pub const MAX_LINE_BYTES: usize = 8 * 1024;

/// Most header lines accepted in one request.
pub const MAX_HEADERS: usize = 100;

#[derive(Debug, Error)]
pub enum ParseError {
    #[error("malformed request line: {0:?}")]
    MalformedRequestLine(String),

    #[error("malformed header line: {0:?}")]
    MalformedHeaderLine(String),

    #[error("missing or invalid Content-Length")]
    MissingOrInvalidContentLength,

    #[error("incomplete body: expected {expected} bytes, got {received}")]
    IncompleteBody { expected: usize, received: usize },

    #[error("connection closed before the request head was complete")]
    ConnectionClosed,

    #[error("line exceeds {} bytes", MAX_LINE_BYTES)]
    LineTooLong,

    #[error("more than {} header lines", MAX_HEADERS)]
    TooManyHeaders,

    #[error("request head is not valid UTF-8")]
    InvalidEncoding,

    #[error("io error while reading request: {0}")]
    Io(#[from] std::io::Error),
}

/// Reads one request from `reader`.
///
/// The request line and headers are read line by line. A body is only read
/// for POST, and exactly `Content-Length` bytes of it are consumed from the
/// stream.
pub async fn parse_request<R>(reader: &mut R) -> Result<Request, ParseError>
where
    R: AsyncBufRead + Unpin,
{
    // Request line
    let request_line = read_line(reader).await?.ok_or(ParseError::ConnectionClosed)?;
    let mut parts = request_line.split(' ');

    let (method, target, version) = match (parts.next(), parts.next(), parts.next()) {
        (Some(m), Some(t), Some(v)) => (Method::from_token(m), t.to_string(), v.to_string()),
        _ => return Err(ParseError::MalformedRequestLine(request_line.clone())),
    };

    // Headers
    let mut headers = HashMap::new();
    let mut count = 0;

    loop {
        let line = read_line(reader).await?.ok_or(ParseError::ConnectionClosed)?;
        if line.is_empty() {
            break;
        }

        count += 1;
        if count > MAX_HEADERS {
            return Err(ParseError::TooManyHeaders);
        }

        let (key, value) = line
            .split_once(':')
            .ok_or_else(|| ParseError::MalformedHeaderLine(line.clone()))?;

        headers.insert(key.to_string(), value.trim().to_string());
    }

    // Body
    let body = match method {
        Method::POST => {
            let length = headers
                .get("Content-Length")
                .and_then(|v| v.parse::<usize>().ok())
                .ok_or(ParseError::MissingOrInvalidContentLength)?;
            read_body(reader, length).await?
        }
        _ => Vec::new(),
    };

    Ok(Request {
        method,
        target,
        version,
        headers,
        body,
    })
}

/// Reads up to and including the next `\n` and returns the line without its
/// terminator (`\n` or `\r\n`). `None` means the stream ended before any byte.
async fn read_line<R>(reader: &mut R) -> Result<Option<String>, ParseError>
where
    R: AsyncBufRead + Unpin,
{
    let mut buf = Vec::new();
    let n = (&mut *reader)
        .take(MAX_LINE_BYTES as u64 + 1)
        .read_until(b'\n', &mut buf)
        .await?;

    if n == 0 {
        return Ok(None);
    }
    if buf.last() != Some(&b'\n') {
        if n > MAX_LINE_BYTES {
            return Err(ParseError::LineTooLong);
        }
        return Err(ParseError::ConnectionClosed);
    }

    buf.pop();
    if buf.last() == Some(&b'\r') {
        buf.pop();
    }

    String::from_utf8(buf)
        .map(Some)
        .map_err(|_| ParseError::InvalidEncoding)
}

async fn read_body<R>(reader: &mut R, length: usize) -> Result<Vec<u8>, ParseError>
where
    R: AsyncBufRead + Unpin,
{
    let mut body = Vec::with_capacity(length.min(64 * 1024));
    (&mut *reader)
        .take(length as u64)
        .read_to_end(&mut body)
        .await?;

    if body.len() < length {
        return Err(ParseError::IncompleteBody {
            expected: length,
            received: body.len(),
        });
    }

    Ok(body)
}
