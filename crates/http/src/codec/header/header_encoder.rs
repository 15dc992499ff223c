//! HTTP header encoder implementation for serializing HTTP response heads
//!
//! Writes the status line, the `Content-Type` header (only when the response has one),
//! the `Content-Length` header and the blank line that ends the head. The body is not
//! touched here, see [`ResponseEncoder`](crate::codec::ResponseEncoder).

use crate::protocol::{Response, SendError};

use bytes::{BufMut, BytesMut};

use http::Version;
use std::io;
use std::io::Write;
use tokio_util::codec::Encoder;
use tracing::error;

/// Initial buffer size allocated for header serialization
const INIT_HEADER_SIZE: usize = 256;

/// Encoder for HTTP response heads implementing the [`Encoder`] trait.
#[derive(Debug, Default)]
pub struct HeaderEncoder;

impl Encoder<&Response> for HeaderEncoder {
    type Error = SendError;

    /// Encodes the status line and headers of `response` into `dst`.
    ///
    /// # Errors
    ///
    /// Returns error if the response protocol is neither HTTP/1.0 nor HTTP/1.1
    fn encode(&mut self, response: &Response, dst: &mut BytesMut) -> Result<(), Self::Error> {
        let protocol = match response.version() {
            Version::HTTP_10 => "HTTP/1.0",
            Version::HTTP_11 => "HTTP/1.1",
            v => {
                error!(http_version = ?v, "unsupported http version");
                return Err(SendError::unsupported_version(v));
            }
        };

        dst.reserve(INIT_HEADER_SIZE);
        write!(FastWrite(dst), "{protocol} {} {}\r\n", response.status().as_str(), response.message())?;

        if let Some(content_type) = response.content_type() {
            dst.put_slice(b"Content-Type: ");
            let content_type: &str = content_type.as_ref();
            dst.put_slice(content_type.as_bytes());
            dst.put_slice(b"\r\n");
        }

        write!(FastWrite(dst), "Content-Length: {}\r\n", response.body().len())?;
        dst.put_slice(b"\r\n");
        Ok(())
    }
}

/// Fast writer implementation for writing to BytesMut.
///
/// Lets `write!` format straight into the buffer without an intermediate `String`.
struct FastWrite<'a>(&'a mut BytesMut);

impl Write for FastWrite<'_> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.put_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}
