//! Core HTTP protocol types.
//!
//! - **Requests**: [`Request`] holds the request target and normalized
//!   header fields of one framed header block
//! - **Responses**: [`Response`] holds the status line, content type
//!   and body of one outgoing message
//! - **Errors**:
//!   - [`HttpError`]: Top-level error type
//!   - [`ParseError`]: Request framing errors
//!   - [`SendError`]: Response sending errors
//!
//! The protocol module is typically used through the connection layer rather than
//! directly; handlers only ever see a [`Request`] and hand back a [`Response`].

mod request;
pub use request::DEFAULT_URI;
pub use request::Request;

mod response;
pub use response::Response;

mod error;
pub use error::HttpError;
pub use error::ParseError;
pub use error::SendError;
