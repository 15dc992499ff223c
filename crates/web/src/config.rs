//! Server configuration
//!
//! [`ServerConfig`] is fixed once the server starts and shared read-only by every worker.
//! The daemon fills it from [`CliArgs`], where every flag can also come from a `SEARCHD_*`
//! environment variable:
//!
//! ```bash
//! searchd 8080 ./static ./static/books ./more-books --workers 50
//! SEARCHD_PORT=8080 SEARCHD_STATIC_ROOT=./static SEARCHD_INDICES=./static/books searchd
//! ```

use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use searchd_http::net::AddressFamily;

pub use searchd_http::pool::DEFAULT_WORKERS;

/// Startup parameters of one server instance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub port: u16,
    /// Directory served under `/static/`
    pub static_root: PathBuf,
    /// Files or directories of documents to search
    pub indices: Vec<PathBuf>,
    /// Number of connections served concurrently
    pub workers: usize,
    pub address_family: AddressFamily,
}

/// Which sockets to listen on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum Family {
    /// One IPv6 socket accepting IPv4 clients too
    #[default]
    DualStack,
    Ipv4,
    Ipv6,
    /// Dual-stack where available, IPv4 otherwise
    Any,
}

impl From<Family> for AddressFamily {
    fn from(family: Family) -> Self {
        match family {
            Family::DualStack => AddressFamily::DualStack,
            Family::Ipv4 => AddressFamily::Ipv4,
            Family::Ipv6 => AddressFamily::Ipv6,
            Family::Any => AddressFamily::Any,
        }
    }
}

/// A small search engine: static files under /static/ and ranked queries on everything else.
#[derive(Debug, Clone, Parser)]
#[command(name = "searchd", version, about)]
pub struct CliArgs {
    /// TCP port to listen on
    #[arg(env = "SEARCHD_PORT")]
    pub port: u16,

    /// Directory served under /static/
    #[arg(env = "SEARCHD_STATIC_ROOT")]
    pub static_root: PathBuf,

    /// Files or directories of documents to index
    #[arg(env = "SEARCHD_INDICES", value_delimiter = ',', required = true)]
    pub indices: Vec<PathBuf>,

    /// Number of connections served concurrently
    #[arg(short, long, default_value_t = DEFAULT_WORKERS, env = "SEARCHD_WORKERS")]
    pub workers: usize,

    /// Address family of the listening socket
    #[arg(long, value_enum, default_value_t = Family::DualStack, env = "SEARCHD_FAMILY")]
    pub family: Family,
}

impl From<CliArgs> for ServerConfig {
    fn from(args: CliArgs) -> Self {
        Self {
            port: args.port,
            static_root: args.static_root,
            indices: args.indices,
            workers: args.workers,
            address_family: args.family.into(),
        }
    }
}
