//! HTTP request representation.
//!
//! A [`Request`] is what the framer produces for every complete header block: the request
//! target and a map of normalized header fields. The method and protocol version tokens of
//! the request line are read but never stored, the server only dispatches on the URI.

use std::collections::HashMap;

/// The request target used when a header block carries no usable request line.
pub const DEFAULT_URI: &str = "/";

/// A parsed HTTP request header block.
///
/// Header names and values are always stored trimmed and lower-cased, so lookups never
/// need to care about the casing the client used. A repeated header keeps its last value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Request {
    uri: String,
    headers: HashMap<String, String>,
}

impl Default for Request {
    fn default() -> Self {
        Self::new(DEFAULT_URI)
    }
}

impl Request {
    /// Creates a request for `uri` without any headers.
    pub fn new(uri: impl Into<String>) -> Self {
        Self { uri: uri.into(), headers: HashMap::new() }
    }

    /// Adds a header, builder style.
    #[must_use]
    pub fn with_header(mut self, name: &str, value: &str) -> Self {
        self.add_header(name, value);
        self
    }

    /// Records a header field, normalizing both name and value.
    pub(crate) fn add_header(&mut self, name: &str, value: &str) {
        self.headers.insert(name.trim().to_lowercase(), value.trim().to_lowercase());
    }

    pub(crate) fn set_uri(&mut self, uri: impl Into<String>) {
        self.uri = uri.into();
    }

    /// Returns the raw request target, including any query string.
    pub fn uri(&self) -> &str {
        &self.uri
    }

    /// Returns the request target without its query string.
    pub fn path(&self) -> &str {
        self.uri.split_once('?').map_or(self.uri.as_str(), |(path, _)| path)
    }

    /// Returns the query string (everything after the first `?`), if present.
    pub fn query(&self) -> Option<&str> {
        self.uri.split_once('?').map(|(_, query)| query)
    }

    /// Looks up a header value; `name` is matched case-insensitively.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(&name.to_lowercase()).map(String::as_str)
    }

    pub fn headers(&self) -> &HashMap<String, String> {
        &self.headers
    }

    /// Returns true when the client asked to close the connection after this request.
    pub fn wants_close(&self) -> bool {
        self.header("connection") == Some("close")
    }
}
