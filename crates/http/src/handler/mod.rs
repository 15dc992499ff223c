//! Request handler traits and utilities
//!
//! A [`Handler`] turns one parsed [`Request`] into one [`Response`]. The connection loop
//! calls it once per framed request, strictly in arrival order.

use std::error::Error;
use std::future::Future;

use crate::protocol::{Request, Response};

/// Maps a request to a response.
///
/// [`Handler`] is the `Send` variant used by the server; [`LocalHandler`] is generated
/// alongside it for single threaded use.
#[trait_variant::make(Handler: Send)]
pub trait LocalHandler {
    type Error: Into<Box<dyn Error + Send + Sync>>;

    async fn call(&self, request: Request) -> Result<Response, Self::Error>;
}

/// A [`Handler`] backed by an async function or closure, see [`make_handler`].
#[derive(Debug)]
pub struct HandlerFn<F> {
    f: F,
}

impl<Err, F, Fut> Handler for HandlerFn<F>
where
    F: Fn(Request) -> Fut + Send + Sync,
    Err: Into<Box<dyn Error + Send + Sync>>,
    Fut: Future<Output = Result<Response, Err>> + Send,
{
    type Error = Err;

    async fn call(&self, request: Request) -> Result<Response, Self::Error> {
        (self.f)(request).await
    }
}

pub fn make_handler<F, Err, Ret>(f: F) -> HandlerFn<F>
where
    Err: Into<Box<dyn Error + Send + Sync>>,
    Ret: Future<Output = Result<Response, Err>>,
    F: Fn(Request) -> Ret,
{
    HandlerFn { f }
}
