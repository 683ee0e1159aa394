use std::sync::Arc;
use tokio::io::{AsyncRead, AsyncWrite, AsyncWriteExt, BufReader};
use tracing::{info, warn};

use crate::http::dispatcher::Dispatcher;
use crate::http::parser::parse_request;
use crate::http::request::Request;

/// One accepted connection, serving exactly one request.
pub struct Connection<S> {
    stream: BufReader<S>,
    dispatcher: Arc<Dispatcher>,
    state: ConnectionState,
}

pub enum ConnectionState {
    Reading,
    Dispatching(Request),
    Closed,
}

impl<S> Connection<S>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    pub fn new(stream: S, dispatcher: Arc<Dispatcher>) -> Self {
        Self {
            stream: BufReader::new(stream),
            dispatcher,
            state: ConnectionState::Reading,
        }
    }

    /// Parses one request, dispatches it, then closes the stream.
    ///
    /// A request that fails to parse closes the connection without a
    /// response and is reported as an error.
    pub async fn run(&mut self) -> anyhow::Result<()> {
        loop {
            match std::mem::replace(&mut self.state, ConnectionState::Closed) {
                ConnectionState::Reading => {
                    let request = parse_request(&mut self.stream).await.inspect_err(|e| {
                        warn!(error = %e, "dropping unparseable request");
                    })?;
                    self.state = ConnectionState::Dispatching(request);
                }

                ConnectionState::Dispatching(req) => {
                    let status = self.dispatcher.dispatch(&req, &mut self.stream).await?;
                    info!(
                        method = %req.method,
                        path = %req.target,
                        status = status.as_u16(),
                        "request served"
                    );
                    self.state = ConnectionState::Closed;
                }

                ConnectionState::Closed => break,
            }
        }

        self.stream.flush().await?;
        self.stream.shutdown().await?;
        Ok(())
    }
}
