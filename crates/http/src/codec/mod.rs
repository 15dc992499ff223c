//! HTTP codec module for framing requests and encoding responses
//!
//! # Architecture
//!
//! - Request handling:
//!   - [`RequestDecoder`]: Frames header blocks out of the connection buffer
//!   - Header block parsing via [`parse_header_block`]
//!
//! - Response handling:
//!   - [`ResponseEncoder`]: Encodes outgoing HTTP responses
//!   - Head encoding via [`HeaderEncoder`]
//!
//! # Example
//!
//! ```no_run
//! use searchd_http::codec::{RequestDecoder, ResponseEncoder};
//! use searchd_http::protocol::Response;
//! use tokio_util::codec::{Decoder, Encoder};
//! use bytes::BytesMut;
//!
//! // Decode incoming request
//! let mut decoder = RequestDecoder::new();
//! let mut request_buffer = BytesMut::from("GET / HTTP/1.1\r\n\r\n");
//! let request = decoder.decode(&mut request_buffer);
//!
//! // Encode outgoing response
//! let mut encoder = ResponseEncoder::new();
//! let mut response_buffer = BytesMut::new();
//! encoder.encode(&Response::ok(), &mut response_buffer).unwrap();
//! ```

mod header;
mod request_decoder;
mod response_encoder;

pub use header::{HeaderEncoder, parse_header_block};
pub use request_decoder::{HEADER_TERMINATOR, MAX_HEADER_BYTES, RequestDecoder};
pub use response_encoder::ResponseEncoder;
