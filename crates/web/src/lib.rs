//! A small search engine daemon
//!
//! searchd serves two kinds of requests over HTTP/1.1:
//!
//! - `/static/<name>`: the contents of a file below the configured static root, with a
//!   content type picked from its extension, or a 404 page naming the file
//! - anything else: a search page; with a `terms` query parameter it lists every indexed
//!   document containing all the terms, most relevant first
//!
//! The network side (listening socket, request framing, keep-alive, worker pool) lives in
//! [`searchd_http`]; this crate supplies the [`Router`] plugged into it, the collaborators
//! the router consults, and the [`Server`] that dispatches accepted connections.
//!
//! # Example
//!
//! ```no_run
//! use searchd::Server;
//!
//! #[tokio::main]
//! async fn main() {
//!     let server = Server::builder().port(8080).static_root("./static").index("./static/books").build().unwrap();
//!
//!     let shutdown = server.shutdown_token();
//!     tokio::spawn(async move {
//!         let _ = tokio::signal::ctrl_c().await;
//!         shutdown.cancel();
//!     });
//!
//!     server.run().await.unwrap();
//! }
//! ```

mod config;
mod file_reader;
mod html;
mod router;
mod search;
mod server;

pub use config::{CliArgs, DEFAULT_WORKERS, Family, ServerConfig};
pub use file_reader::FileReader;
pub use html::{LANDING_PAGE, escape_html};
pub use router::{Router, STATIC_PREFIX};
pub use search::{DocumentIndex, QueryProcessor, QueryResult};
pub use server::{BoundServer, ConnectionTask, Server, ServerBuildError, ServerBuilder, ServerError};
