//! HTTP protocol implementation.
//!
//! One request is read per connection, answered, and the connection is
//! closed.
//!
//! # Architecture
//!
//! - **`parser`**: Reads a [`Request`](request::Request) from a buffered byte stream
//! - **`request`**: HTTP request representation
//! - **`response`**: HTTP response representation with builder pattern
//! - **`writer`**: Serializes a response head onto a byte sink
//! - **`chunked`**: Streams a resource as `Transfer-Encoding: chunked` frames
//! - **`dispatcher`**: Builds and writes the response for a request by method
//! - **`connection`**: Drives parser and dispatcher for one accepted stream
//!
//! # Connection State Machine
//!
//! ```text
//!        ┌─────────────┐
//!        │   Reading   │ ← Parse request line, headers, body
//!        └──────┬──────┘
//!               │ Request parsed        (parse error → Closed, no response)
//!               ▼
//!        ┌──────────────────┐
//!        │   Dispatching    │ ← GET / HEAD / POST / 501
//!        └──────┬───────────┘
//!               │ Response written
//!               ▼
//!        ┌──────────────────┐
//!        │     Closed       │
//!        └──────────────────┘
//! ```
//!
//! # Wire format
//!
//! Status and header lines are terminated by `\n`; the head ends with a
//! single `\r\n` line. Chunks are `<hex-size>\r\n<payload>\r\n`, the stream
//! ends with `0\r\n\r\n`.
//!
//! # Example
//!
//! ```ignore
//! use hearth::config::Config;
//! use hearth::http::connection::Connection;
//! use hearth::http::dispatcher::Dispatcher;
//! use std::sync::Arc;
//! use tokio::net::TcpListener;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let dispatcher = Arc::new(Dispatcher::from_config(&Config::default()));
//!     let listener = TcpListener::bind("127.0.0.1:3490").await?;
//!
//!     loop {
//!         let (socket, _addr) = listener.accept().await?;
//!         let dispatcher = Arc::clone(&dispatcher);
//!         tokio::spawn(async move {
//!             let mut conn = Connection::new(socket, dispatcher);
//!             if let Err(e) = conn.run().await {
//!                 eprintln!("Connection error: {}", e);
//!             }
//!         });
//!     }
//! }
//! ```

pub mod chunked;
pub mod connection;
pub mod dispatcher;
pub mod parser;
pub mod request;
pub mod response;
pub mod writer;
