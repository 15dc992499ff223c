use std::io;
use std::net::{IpAddr, SocketAddr};

use socket2::{Domain, Protocol, Socket, Type};
use thiserror::Error;
use tokio::net::{TcpListener, TcpStream};
use tokio::select;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

use crate::ensure;
use crate::net::dns::{NameLookup, reverse_lookup};

/// Which kind of listening socket to create.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AddressFamily {
    /// One IPv6 socket that also accepts IPv4 clients as IPv4-mapped addresses
    #[default]
    DualStack,
    /// IPv6 clients only
    Ipv6,
    /// IPv4 clients only
    Ipv4,
    /// Dual-stack IPv6 if the host supports it, plain IPv4 otherwise
    Any,
}

impl AddressFamily {
    fn wildcard_hosts(self) -> &'static [&'static str] {
        match self {
            AddressFamily::DualStack | AddressFamily::Ipv6 => &["::"],
            AddressFamily::Ipv4 => &["0.0.0.0"],
            AddressFamily::Any => &["::", "0.0.0.0"],
        }
    }

    fn only_v6(self) -> bool {
        matches!(self, AddressFamily::Ipv6)
    }
}

#[derive(Debug, Error)]
pub enum BindError {
    #[error("can't resolve listening addresses for port {port}: {source}")]
    Resolve {
        port: u16,
        #[source]
        source: io::Error,
    },

    #[error("no candidate address to listen on for port {port}")]
    NoCandidate { port: u16 },

    #[error("no candidate address could be bound, last error: {last}")]
    Exhausted {
        #[source]
        last: io::Error,
    },

    #[error("can't listen on {addr}: {source}")]
    Listen {
        addr: SocketAddr,
        #[source]
        source: io::Error,
    },
}

#[derive(Debug, Error)]
pub enum AcceptError {
    #[error("listening socket has been shut down")]
    Shutdown,

    #[error("accept failed: {source}")]
    Io {
        #[from]
        source: io::Error,
    },
}

/// A freshly accepted connection together with the addressing details of both ends.
///
/// The DNS names are never empty: a failed reverse lookup falls back to the textual
/// address.
#[derive(Debug)]
pub struct AcceptedConnection {
    pub stream: TcpStream,
    pub client_addr: String,
    pub client_port: u16,
    pub client_dns_name: String,
    pub server_addr: String,
    pub server_dns_name: String,
}

/// A bound, listening TCP socket.
///
/// The socket is closed when the `ServerSocket` is dropped. [`shutdown_token`](Self::shutdown_token)
/// hands out a token that, once cancelled, makes every pending and future
/// [`accept`](Self::accept) fail with [`AcceptError::Shutdown`].
#[derive(Debug)]
pub struct ServerSocket {
    listener: TcpListener,
    shutdown: CancellationToken,
}

impl ServerSocket {
    /// Resolves wildcard addresses for `port` and binds the first candidate that works.
    ///
    /// Each candidate gets its own socket with `SO_REUSEADDR` set; IPv6 candidates accept
    /// IPv4-mapped clients unless `family` is [`AddressFamily::Ipv6`]. The winning socket
    /// listens with the platform's maximum backlog.
    pub async fn bind_and_listen(port: u16, family: AddressFamily) -> Result<Self, BindError> {
        let mut candidates = Vec::new();
        for host in family.wildcard_hosts() {
            let resolved = tokio::net::lookup_host((*host, port)).await.map_err(|source| BindError::Resolve { port, source })?;
            candidates.extend(resolved);
        }

        ensure!(!candidates.is_empty(), BindError::NoCandidate { port });

        let mut last_err = None;
        for addr in candidates {
            match bind_candidate(addr, family.only_v6()) {
                Ok(socket) => return listen(socket, addr),
                Err(e) => {
                    warn!(%addr, cause = %e, "can't bind candidate address");
                    last_err = Some(e);
                }
            }
        }

        Err(BindError::Exhausted { last: last_err.unwrap_or_else(|| io::Error::from(io::ErrorKind::AddrNotAvailable)) })
    }

    pub fn local_addr(&self) -> io::Result<SocketAddr> {
        self.listener.local_addr()
    }

    /// Returns the token that stops this socket from accepting when cancelled.
    pub fn shutdown_token(&self) -> CancellationToken {
        self.shutdown.clone()
    }

    /// Replaces the shutdown token, so a token created before binding can stop this socket.
    #[must_use]
    pub fn with_shutdown_token(mut self, shutdown: CancellationToken) -> Self {
        self.shutdown = shutdown;
        self
    }

    /// Waits for the next connection and resolves the addressing metadata of both ends.
    ///
    /// Interrupted and would-block accepts are retried silently, as are connections that
    /// vanish before their local address can be read. Any other failure, and shutdown,
    /// is returned to the caller.
    pub async fn accept(&self) -> Result<AcceptedConnection, AcceptError> {
        let (stream, client, server) = loop {
            let accepted = select! {
                biased;
                () = self.shutdown.cancelled() => return Err(AcceptError::Shutdown),
                accepted = self.listener.accept() => accepted,
            };

            let (stream, client) = match accepted {
                Ok(accepted) => accepted,
                Err(e) if is_transient(&e) => {
                    debug!(cause = %e, "transient accept failure, retrying");
                    continue;
                }
                Err(e) => {
                    error!(cause = %e, "failure on accept");
                    return Err(e.into());
                }
            };

            match stream.local_addr() {
                Ok(server) => break (stream, client, server),
                Err(e) => warn!(cause = %e, %client, "can't read local address of accepted connection, dropping it"),
            }
        };

        let client_addr = textual(client.ip());
        let server_addr = textual(server.ip());

        let (client_dns_name, server_dns_name) =
            tokio::join!(reverse_lookup(client, NameLookup::BestEffort), reverse_lookup(server, NameLookup::NameRequired));

        Ok(AcceptedConnection {
            stream,
            client_dns_name: name_or_address(client_dns_name, &client_addr),
            client_addr,
            client_port: client.port(),
            server_dns_name: name_or_address(server_dns_name, &server_addr),
            server_addr,
        })
    }
}

fn bind_candidate(addr: SocketAddr, only_v6: bool) -> io::Result<Socket> {
    let socket = Socket::new(Domain::for_address(addr), Type::STREAM, Some(Protocol::TCP))?;
    socket.set_reuse_address(true)?;
    if addr.is_ipv6() {
        socket.set_only_v6(only_v6)?;
    }
    socket.bind(&addr.into())?;
    Ok(socket)
}

fn listen(socket: Socket, addr: SocketAddr) -> Result<ServerSocket, BindError> {
    let into_listener = || -> io::Result<TcpListener> {
        socket.listen(libc::SOMAXCONN)?;
        socket.set_nonblocking(true)?;
        TcpListener::from_std(socket.into())
    };

    let listener = into_listener().map_err(|source| BindError::Listen { addr, source })?;
    info!(addr = %listener.local_addr().unwrap_or(addr), "listening");
    Ok(ServerSocket { listener, shutdown: CancellationToken::new() })
}

fn is_transient(e: &io::Error) -> bool {
    matches!(e.kind(), io::ErrorKind::Interrupted | io::ErrorKind::WouldBlock | io::ErrorKind::ConnectionAborted)
}

fn name_or_address(name: Option<String>, addr: &str) -> String {
    name.unwrap_or_else(|| addr.to_owned())
}

/// Formats an address, showing IPv4-mapped IPv6 addresses in their IPv4 form.
fn textual(ip: IpAddr) -> String {
    ip.to_canonical().to_string()
}
