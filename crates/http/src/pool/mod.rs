//! Bounded worker pool
//!
//! [`WorkerPool`] runs submitted units of work on at most N concurrently active workers.
//! Submitting never waits: work that arrives while every worker is busy queues (first in,
//! first out) until a worker frees up. A unit of work keeps its worker for as long as it
//! runs, so when each unit serves one connection the pool size bounds the number of
//! connections being served at once.

use std::future::Future;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use tokio::sync::Semaphore;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

/// The number of workers a server runs unless configured otherwise.
pub const DEFAULT_WORKERS: usize = 100;

#[derive(Debug)]
pub struct WorkerPool {
    permits: Arc<Semaphore>,
    workers: usize,
    queued: Arc<AtomicUsize>,
}

impl WorkerPool {
    /// Creates a pool of `workers` workers.
    ///
    /// # Panics
    ///
    /// Panics if `workers` is zero or larger than [`Semaphore::MAX_PERMITS`].
    pub fn new(workers: usize) -> Self {
        assert!(workers > 0, "a worker pool needs at least one worker");
        Self { permits: Arc::new(Semaphore::new(workers)), workers, queued: Arc::new(AtomicUsize::new(0)) }
    }

    /// Hands `work` to the pool and returns immediately.
    ///
    /// The returned handle resolves once the work has run; dropping it detaches the work.
    pub fn submit<F>(&self, work: F) -> JoinHandle<()>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let permits = Arc::clone(&self.permits);
        let queued = Arc::clone(&self.queued);
        queued.fetch_add(1, Ordering::Relaxed);

        tokio::spawn(async move {
            let permit = permits.acquire_owned().await;
            queued.fetch_sub(1, Ordering::Relaxed);

            match permit {
                Ok(_permit) => work.await,
                Err(e) => warn!(cause = %e, "worker pool closed, dropping work"),
            }
        })
    }

    pub fn workers(&self) -> usize {
        self.workers
    }

    /// Number of workers currently running a unit of work.
    pub fn busy(&self) -> usize {
        self.workers - self.permits.available_permits()
    }

    /// Number of submitted units still waiting for a worker.
    pub fn queued(&self) -> usize {
        self.queued.load(Ordering::Relaxed)
    }
}

impl Drop for WorkerPool {
    fn drop(&mut self) {
        debug!(busy = self.busy(), queued = self.queued(), "worker pool dropped, running work continues");
    }
}
