//! HTTP header block parser
//!
//! This module turns one framed header block (everything up to and including the blank
//! line) into a [`Request`]. The parser is deliberately lenient:
//!
//! - Only the second whitespace-delimited token of the request line is kept, as the URI.
//!   Method and version are not validated.
//! - A header line without a colon is skipped, the following lines still parse.
//! - A block with no request line, or a request line with a single token, yields the
//!   default URI `/`.
//!
//! Parsing never fails: any block that reached a terminator produces some request.

use tracing::trace;

use crate::protocol::Request;

/// Parses a raw header block into a [`Request`].
///
/// Lines are split on both `\r` and `\n`, and empty fragments between them are ignored,
/// so bare `\n` line endings are accepted as well as `\r\n`. Bytes that are not valid
/// UTF-8 are replaced rather than rejected.
pub fn parse_header_block(block: &[u8]) -> Request {
    let text = String::from_utf8_lossy(block);
    let mut lines = text.split(['\r', '\n']).filter(|line| !line.is_empty());

    let mut request = Request::default();

    let Some(request_line) = lines.next() else {
        return request;
    };

    if let Some(uri) = request_line.split_ascii_whitespace().nth(1) {
        request.set_uri(uri);
    }

    for line in lines {
        match line.split_once(':') {
            Some((name, value)) => request.add_header(name, value),
            None => trace!(line, "skip malformed header line"),
        }
    }

    request
}
