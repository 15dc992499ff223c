//! The network core of the searchd HTTP server
//!
//! This crate owns everything between the listening socket and a request handler: it binds
//! a dual-stack TCP endpoint, frames requests out of a byte stream that may deliver them in
//! fragments or several at once, keeps connections alive across requests, and bounds how
//! many connections are served concurrently.
//!
//! # Features
//!
//! - Dual-stack listening socket with reverse DNS names for both ends of every connection
//! - Header-block framing on `\r\n\r\n`, tolerant of partial reads and pipelining
//! - Lenient header parsing: names and values are trimmed and lowercased, malformed lines skipped
//! - Keep-alive until the client sends `Connection: close`, the peer leaves, or I/O fails
//! - A bounded worker pool that queues connections once every worker is busy
//!
//! # Example
//!
//! ```no_run
//! use searchd_http::connection::HttpConnection;
//! use searchd_http::handler::make_handler;
//! use searchd_http::net::{AddressFamily, ServerSocket};
//! use searchd_http::pool::WorkerPool;
//! use searchd_http::protocol::{Request, Response};
//! use std::convert::Infallible;
//! use std::sync::Arc;
//! use tracing::{error, info, Level};
//! use tracing_subscriber::FmtSubscriber;
//!
//! #[tokio::main]
//! async fn main() {
//!     let subscriber = FmtSubscriber::builder().with_max_level(Level::INFO).finish();
//!     tracing::subscriber::set_global_default(subscriber).expect("setting default subscriber failed");
//!
//!     let socket = match ServerSocket::bind_and_listen(8080, AddressFamily::DualStack).await {
//!         Ok(socket) => socket,
//!         Err(e) => {
//!             error!(cause = %e, "bind server error");
//!             return;
//!         }
//!     };
//!
//!     let handler = Arc::new(make_handler(hello_world));
//!     let pool = WorkerPool::new(100);
//!
//!     while let Ok(accepted) = socket.accept().await {
//!         info!(client = %accepted.client_dns_name, "accepted connection");
//!         let handler = handler.clone();
//!         pool.submit(async move {
//!             let (reader, writer) = accepted.stream.into_split();
//!             if let Err(e) = HttpConnection::new(reader, writer).process(handler).await {
//!                 error!(cause = %e, "connection ended with error");
//!             }
//!         });
//!     }
//! }
//!
//! async fn hello_world(request: Request) -> Result<Response, Infallible> {
//!     info!(path = request.path(), "serving request");
//!     Ok(Response::ok().with_content_type(mime::TEXT_PLAIN).with_body("Hello World!\r\n"))
//! }
//! ```
//!
//! # Architecture
//!
//! - [`net`]: Listening socket setup, accept, and reverse DNS
//! - [`codec`]: Request framing and header parsing, response serialization
//! - [`connection`]: One connection's framing buffer and keep-alive loop
//! - [`handler`]: The trait connections dispatch requests to
//! - [`pool`]: Bounded worker pool
//! - [`protocol`]: Request, response and error types
//!
//! # Error Handling
//!
//! - [`protocol::HttpError`]: Why a connection stopped being served
//! - [`protocol::ParseError`]: Read failures, truncated requests, oversized header blocks
//! - [`protocol::SendError`]: Write failures, including short writes
//! - [`net::BindError`] and [`net::AcceptError`]: Listening socket failures
//!
//! # Limitations
//!
//! - Requests are header blocks only; any body bytes a client sends are read as the start
//!   of the next request
//! - Method and protocol version of a request are not validated
//! - Header blocks are limited to [`codec::MAX_HEADER_BYTES`]
//! - No timeouts and no TLS

pub mod codec;
pub mod connection;
pub mod handler;
pub mod net;
pub mod pool;
pub mod protocol;

mod utils;
pub(crate) use utils::ensure;
