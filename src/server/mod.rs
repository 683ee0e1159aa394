//! Network listener: accepts TCP connections and hands each to a
//! [`Connection`](crate::http::connection::Connection).

pub mod listener;
