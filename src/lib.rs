//! Hearth - a small HTTP/1.1 static resource server
//!
//! Core library for request parsing, dispatch, response framing and
//! chunked streaming.

pub mod config;
pub mod http;
pub mod resources;
pub mod server;
