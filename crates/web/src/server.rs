//! The accept-and-dispatch loop.
//!
//! A [`Server`] binds its listening socket once, loads the search index, then accepts
//! connections forever and hands each one to the worker pool as a [`ConnectionTask`].
//! A worker serves every request of its connection, in order, until the client asks to
//! close, the peer goes away, or I/O fails.

use std::io;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use searchd_http::connection::HttpConnection;
use searchd_http::handler::Handler;
use searchd_http::net::{AcceptedConnection, AddressFamily, BindError, ServerSocket};
use searchd_http::pool::WorkerPool;
use thiserror::Error;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};

use crate::config::{DEFAULT_WORKERS, ServerConfig};
use crate::file_reader::FileReader;
use crate::router::Router;
use crate::search::DocumentIndex;

#[derive(Error, Debug)]
pub enum ServerBuildError {
    #[error("port must be set")]
    MissingPort,
    #[error("static root must be set")]
    MissingStaticRoot,
    #[error("worker count must be at least 1")]
    NoWorkers,
}

#[derive(Error, Debug)]
pub enum ServerError {
    #[error("couldn't bind to the listening socket: {0}")]
    Bind(#[from] BindError),
}

#[derive(Debug)]
pub struct ServerBuilder {
    port: Option<u16>,
    static_root: Option<PathBuf>,
    indices: Vec<PathBuf>,
    workers: usize,
    address_family: AddressFamily,
}

impl ServerBuilder {
    fn new() -> Self {
        Self { port: None, static_root: None, indices: Vec::new(), workers: DEFAULT_WORKERS, address_family: AddressFamily::default() }
    }

    pub fn port(mut self, port: u16) -> Self {
        self.port = Some(port);
        self
    }

    pub fn static_root(mut self, static_root: impl Into<PathBuf>) -> Self {
        self.static_root = Some(static_root.into());
        self
    }

    pub fn index(mut self, location: impl Into<PathBuf>) -> Self {
        self.indices.push(location.into());
        self
    }

    pub fn indices<I, P>(mut self, locations: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        self.indices.extend(locations.into_iter().map(Into::into));
        self
    }

    pub fn workers(mut self, workers: usize) -> Self {
        self.workers = workers;
        self
    }

    pub fn address_family(mut self, address_family: AddressFamily) -> Self {
        self.address_family = address_family;
        self
    }

    pub fn build(self) -> Result<Server, ServerBuildError> {
        let port = self.port.ok_or(ServerBuildError::MissingPort)?;
        let static_root = self.static_root.ok_or(ServerBuildError::MissingStaticRoot)?;

        Server::with_config(ServerConfig { port, static_root, indices: self.indices, workers: self.workers, address_family: self.address_family })
    }
}

/// A configured, not yet listening server.
#[derive(Debug)]
pub struct Server {
    config: Arc<ServerConfig>,
    shutdown: CancellationToken,
}

impl Server {
    pub fn builder() -> ServerBuilder {
        ServerBuilder::new()
    }

    /// Creates a server from a complete configuration.
    pub fn with_config(config: ServerConfig) -> Result<Self, ServerBuildError> {
        if config.workers == 0 {
            return Err(ServerBuildError::NoWorkers);
        }
        Ok(Self { config: Arc::new(config), shutdown: CancellationToken::new() })
    }

    pub fn config(&self) -> &ServerConfig {
        &self.config
    }

    /// Returns the token that stops the server when cancelled.
    ///
    /// Cancelling makes the pending accept fail, which ends [`BoundServer::serve`] and lets
    /// [`run`](Self::run) return `Ok(())`. Connections already being served run to completion.
    pub fn shutdown_token(&self) -> CancellationToken {
        self.shutdown.clone()
    }

    /// Binds the listening socket and loads the search index.
    pub async fn bind(self) -> Result<BoundServer, ServerError> {
        info!(port = self.config.port, family = ?self.config.address_family, "creating and binding the listening socket");
        let socket = match ServerSocket::bind_and_listen(self.config.port, self.config.address_family).await {
            Ok(socket) => socket.with_shutdown_token(self.shutdown),
            Err(e) => {
                error!(cause = %e, "couldn't bind to the listening socket");
                return Err(e.into());
            }
        };

        let index = DocumentIndex::load(&self.config.indices, &self.config.static_root).await;
        let router = Router::new(FileReader::new(&self.config.static_root), index);

        Ok(BoundServer { socket, router: Arc::new(router), pool: WorkerPool::new(self.config.workers) })
    }

    /// Binds, then serves until shut down.
    pub async fn run(self) -> Result<(), ServerError> {
        self.bind().await?.serve().await;
        Ok(())
    }
}

/// A server whose socket is listening but which has not started accepting yet.
#[derive(Debug)]
pub struct BoundServer {
    socket: ServerSocket,
    router: Arc<Router<DocumentIndex>>,
    pool: WorkerPool,
}

impl BoundServer {
    pub fn local_addr(&self) -> io::Result<SocketAddr> {
        self.socket.local_addr()
    }

    pub fn shutdown_token(&self) -> CancellationToken {
        self.socket.shutdown_token()
    }

    /// Accepts connections and dispatches each to the worker pool.
    ///
    /// Returns once accepting fails, which is how shutdown is signalled; workers still
    /// serving a connection are left to finish on their own.
    pub async fn serve(self) {
        info!(workers = self.pool.workers(), "accepting connections");

        loop {
            let accepted = match self.socket.accept().await {
                Ok(accepted) => accepted,
                Err(e) => {
                    info!(cause = %e, "stopped accepting connections");
                    break;
                }
            };

            let task = ConnectionTask::new(accepted, Arc::clone(&self.router));
            self.pool.submit(task.run());
        }

        info!(busy = self.pool.busy(), queued = self.pool.queued(), "server shut down");
    }
}

/// One accepted connection together with everything its worker needs to serve it.
#[derive(Debug)]
pub struct ConnectionTask<H> {
    accepted: AcceptedConnection,
    handler: Arc<H>,
}

impl<H> ConnectionTask<H>
where
    H: Handler + Sync + 'static,
{
    pub fn new(accepted: AcceptedConnection, handler: Arc<H>) -> Self {
        Self { accepted, handler }
    }

    /// Serves the connection until it ends; the socket is closed on every exit path.
    pub async fn run(self) {
        let AcceptedConnection { stream, client_addr, client_port, client_dns_name, server_addr, server_dns_name } = self.accepted;
        info!(client = %client_dns_name, port = client_port, addr = %client_addr, server = %server_dns_name, server_addr = %server_addr, "client connected");

        let (reader, writer) = stream.into_split();
        match HttpConnection::new(reader, writer).process(self.handler).await {
            Ok(()) => info!(client = %client_dns_name, port = client_port, "connection closed"),
            Err(e) => warn!(client = %client_dns_name, port = client_port, cause = %e, "connection closed after failure"),
        }
    }
}
