//! HTTP connection handling module
//!
//! # Components
//!
//! - [`HttpConnection`]: Owns one accepted socket and its framing buffer:
//!   - Frames requests out of partial and pipelined reads
//!   - Writes whole responses, reporting short writes
//!   - Runs the keep-alive loop until the peer leaves or asks to close

mod http_connection;

pub use http_connection::HttpConnection;
