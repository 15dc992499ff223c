//! HTTP response representation.
//!
//! A [`Response`] is built by a handler, serialized once by the
//! [`ResponseEncoder`](crate::codec::ResponseEncoder) and then dropped. The encoder
//! always derives `Content-Length` from the body, so a response can't go out with a
//! length that disagrees with what is written.

use std::borrow::Cow;

use bytes::{Bytes, BytesMut};
use http::{StatusCode, Version};
use mime::Mime;

/// An HTTP response: status line, optional content type, and a growable body.
#[derive(Debug, Clone)]
pub struct Response {
    version: Version,
    status: StatusCode,
    message: Cow<'static, str>,
    content_type: Option<Mime>,
    body: BytesMut,
}

impl Response {
    /// Creates an empty HTTP/1.1 response using the canonical reason phrase of `status`.
    pub fn new(status: StatusCode) -> Self {
        Self {
            version: Version::HTTP_11,
            status,
            message: Cow::Borrowed(status.canonical_reason().unwrap_or("Unknown")),
            content_type: None,
            body: BytesMut::new(),
        }
    }

    /// `200 OK`
    pub fn ok() -> Self {
        Self::new(StatusCode::OK)
    }

    /// `404 Not Found`
    pub fn not_found() -> Self {
        Self::new(StatusCode::NOT_FOUND)
    }

    #[must_use]
    pub fn with_version(mut self, version: Version) -> Self {
        self.version = version;
        self
    }

    /// Overrides the reason phrase sent on the status line.
    #[must_use]
    pub fn with_message(mut self, message: impl Into<Cow<'static, str>>) -> Self {
        self.message = message.into();
        self
    }

    #[must_use]
    pub fn with_content_type(mut self, content_type: Mime) -> Self {
        self.content_type = Some(content_type);
        self
    }

    #[must_use]
    pub fn with_body(mut self, body: impl AsRef<[u8]>) -> Self {
        self.append_body(body);
        self
    }

    pub fn set_content_type(&mut self, content_type: Option<Mime>) {
        self.content_type = content_type;
    }

    pub fn append_body(&mut self, bytes: impl AsRef<[u8]>) {
        self.body.extend_from_slice(bytes.as_ref());
    }

    pub fn version(&self) -> Version {
        self.version
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn content_type(&self) -> Option<&Mime> {
        self.content_type.as_ref()
    }

    pub fn body(&self) -> &[u8] {
        &self.body
    }

    /// Consumes the response, returning its body.
    pub fn into_body(self) -> Bytes {
        self.body.freeze()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_to_http11_and_canonical_reason() {
        let response = Response::not_found();
        assert_eq!(response.version(), Version::HTTP_11);
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(response.message(), "Not Found");
        assert!(response.content_type().is_none());
        assert!(response.body().is_empty());
    }

    #[test]
    fn body_accumulates() {
        let mut response = Response::ok().with_body("<html>");
        response.append_body(b"</html>");
        assert_eq!(response.body(), b"<html></html>");
        assert_eq!(&response.into_body()[..], b"<html></html>");
    }
}
