//! HTTP request framing module
//!
//! This module cuts a raw, possibly partial, possibly pipelined byte stream into discrete
//! request header blocks. A block ends at the first `\r\n\r\n`; whatever follows the
//! terminator stays in the buffer and becomes the start of the next request.
//!
//! # Example
//!
//! ```no_run
//! use searchd_http::codec::RequestDecoder;
//! use tokio_util::codec::Decoder;
//! use bytes::BytesMut;
//!
//! let mut decoder = RequestDecoder::new();
//! let mut buffer = BytesMut::from("GET /a HTTP/1.1\r\n\r\nGET /b HTTP/1.1\r\n\r\n");
//! let first = decoder.decode(&mut buffer).unwrap().unwrap();
//! let second = decoder.decode(&mut buffer).unwrap().unwrap();
//! assert_eq!(first.uri(), "/a");
//! assert_eq!(second.uri(), "/b");
//! ```

use crate::codec::header::parse_header_block;
use crate::ensure;
use crate::protocol::{ParseError, Request};
use bytes::BytesMut;
use tokio_util::codec::Decoder;
use tracing::trace;

/// The byte sequence that ends a request header block.
pub const HEADER_TERMINATOR: &[u8] = b"\r\n\r\n";

/// Maximum number of bytes a header block may buffer before its terminator arrives
pub const MAX_HEADER_BYTES: usize = 8 * 1024;

/// A decoder that frames HTTP request header blocks and parses them into [`Request`]s
///
/// The decoder is driven by [`FramedRead`](tokio_util::codec::FramedRead), which owns the
/// per-connection buffer and appends every chunk read from the socket to it. Each
/// successful [`decode`](Decoder::decode) removes exactly one block from the front of the
/// buffer.
///
/// # State
///
/// `scanned` records how many bytes of the current buffer are already known not to
/// contain a terminator, so a header block trickling in over many reads is searched once
/// instead of once per read.
#[derive(Debug)]
pub struct RequestDecoder {
    scanned: usize,
    max_header_bytes: usize,
}

impl RequestDecoder {
    /// Creates a new `RequestDecoder` with the default header size limit
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a decoder that fails once more than `max_header_bytes` are buffered without
    /// a terminator
    pub fn with_max_header_bytes(max_header_bytes: usize) -> Self {
        Self { scanned: 0, max_header_bytes }
    }
}

impl Default for RequestDecoder {
    fn default() -> Self {
        Self::with_max_header_bytes(MAX_HEADER_BYTES)
    }
}

impl Decoder for RequestDecoder {
    type Item = Request;
    type Error = ParseError;

    /// Attempts to frame one request from the provided buffer
    ///
    /// # Returns
    ///
    /// - `Ok(Some(request))`: A complete header block was removed from `src` and parsed
    /// - `Ok(None)`: Need more data to proceed
    /// - `Err(_)`: The buffered bytes outgrew the size limit with no terminator in sight
    fn decode(&mut self, src: &mut BytesMut) -> Result<Option<Self::Item>, Self::Error> {
        // a terminator may straddle the previous scan boundary
        let start = self.scanned.saturating_sub(HEADER_TERMINATOR.len() - 1).min(src.len());

        match find_terminator(&src[start..]) {
            Some(offset) => {
                let block_len = start + offset + HEADER_TERMINATOR.len();
                let block = src.split_to(block_len);
                self.scanned = 0;
                trace!(block_len, remaining = src.len(), "framed request header block");

                Ok(Some(parse_header_block(&block)))
            }
            None => {
                ensure!(src.len() <= self.max_header_bytes, ParseError::too_large_header(src.len(), self.max_header_bytes));
                self.scanned = src.len();
                Ok(None)
            }
        }
    }

    /// Called once the peer has closed its side: any complete block still buffered is
    /// returned, a partial one is an error, an empty buffer is a clean end of stream
    fn decode_eof(&mut self, src: &mut BytesMut) -> Result<Option<Self::Item>, Self::Error> {
        match self.decode(src)? {
            Some(request) => Ok(Some(request)),
            None if src.is_empty() => Ok(None),
            None => Err(ParseError::incomplete_request(src.len())),
        }
    }
}

fn find_terminator(bytes: &[u8]) -> Option<usize> {
    bytes.windows(HEADER_TERMINATOR.len()).position(|window| window == HEADER_TERMINATOR)
}
