//! Listening socket setup and connection acceptance
//!
//! [`ServerSocket`] binds a single, by default dual-stack, listening endpoint and hands out
//! [`AcceptedConnection`]s carrying the textual address, port and DNS name of the peer as
//! well as the address and DNS name of the local end.

mod dns;
mod server_socket;

pub use server_socket::{AcceptError, AcceptedConnection, AddressFamily, BindError, ServerSocket};
