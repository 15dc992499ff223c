//! HTTP header processing module for parsing request heads and encoding response heads
//!
//! # Components
//!
//! - [`parse_header_block`]: Turns one framed request header block into a
//!   [`Request`](crate::protocol::Request)
//!   - Lenient, line oriented parsing
//!   - Normalizes header names and values
//!
//! - [`HeaderEncoder`]: Encodes response heads to bytes
//!   - Writes the status line
//!   - Writes `Content-Type` when present and a `Content-Length` derived from the body

mod header_decoder;
mod header_encoder;

pub use header_decoder::parse_header_block;
pub use header_encoder::HeaderEncoder;
