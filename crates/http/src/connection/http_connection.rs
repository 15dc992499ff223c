use std::error::Error;
use std::sync::Arc;

use bytes::BytesMut;
use futures::StreamExt;
use http::StatusCode;
use tokio::io::{AsyncRead, AsyncWrite, AsyncWriteExt};
use tokio_util::codec::{Encoder, FramedRead};
use tracing::{debug, error, info, warn};

use crate::codec::{RequestDecoder, ResponseEncoder};
use crate::handler::Handler;
use crate::protocol::{HttpError, ParseError, Request, Response, SendError};

/// Size of each read from the socket into the connection buffer
const READ_CAPACITY: usize = 8 * 1024;

/// An HTTP connection that frames requests and writes responses
///
/// `HttpConnection` exclusively owns both halves of one accepted socket together with the
/// buffer of bytes read but not yet consumed. Bytes that arrive after a header block (the
/// start of a pipelined request) stay buffered across calls to
/// [`next_request`](Self::next_request).
///
/// # Type Parameters
///
/// * `R`: The async readable stream type
/// * `W`: The async writable stream type
#[derive(Debug)]
pub struct HttpConnection<R, W> {
    framed_read: FramedRead<R, RequestDecoder>,
    writer: W,
    write_buf: BytesMut,
    encoder: ResponseEncoder,
}

impl<R, W> HttpConnection<R, W>
where
    R: AsyncRead + Unpin,
    W: AsyncWrite + Unpin,
{
    pub fn new(reader: R, writer: W) -> Self {
        Self::with_decoder(reader, writer, RequestDecoder::new())
    }

    pub fn with_decoder(reader: R, writer: W, decoder: RequestDecoder) -> Self {
        Self {
            framed_read: FramedRead::with_capacity(reader, decoder, READ_CAPACITY),
            writer,
            write_buf: BytesMut::with_capacity(READ_CAPACITY),
            encoder: ResponseEncoder::new(),
        }
    }

    /// Reads until one complete request is buffered, then removes and parses it.
    ///
    /// # Returns
    ///
    /// - `Some(Ok(request))`: The next request on this connection
    /// - `Some(Err(_))`: A read failed, the peer closed mid-request, or the header block
    ///   outgrew its limit
    /// - `None`: The peer closed the connection between requests
    pub async fn next_request(&mut self) -> Option<Result<Request, ParseError>> {
        self.framed_read.next().await
    }

    /// Serializes `response` and writes all of it to the socket.
    ///
    /// A short write surfaces as an [`io::ErrorKind::WriteZero`](std::io::ErrorKind::WriteZero) error.
    pub async fn write_response(&mut self, response: &Response) -> Result<(), SendError> {
        self.write_buf.clear();
        self.encoder.encode(response, &mut self.write_buf)?;

        self.writer.write_all(&self.write_buf).await?;
        self.writer.flush().await?;
        Ok(())
    }

    /// Serves every request on this connection until the peer goes away, an I/O error
    /// occurs, or a request carries `Connection: close`.
    ///
    /// The connection is consumed, so the socket is released exactly once whichever way
    /// the loop ends.
    pub async fn process<H>(mut self, handler: Arc<H>) -> Result<(), HttpError>
    where
        H: Handler,
    {
        let result = loop {
            let request = match self.next_request().await {
                Some(Ok(request)) => request,
                Some(Err(e)) => {
                    warn!(cause = %e, "can't receive next request");
                    break Err(e.into());
                }
                None => {
                    info!("peer closed the connection");
                    break Ok(());
                }
            };

            debug!(uri = request.uri(), "receive request");
            let close_requested = request.wants_close();

            let response = match handler.call(request).await {
                Ok(response) => response,
                Err(e) => {
                    let e: Box<dyn Error + Send + Sync> = e.into();
                    error!(cause = %e, "handle request error");
                    Response::new(StatusCode::INTERNAL_SERVER_ERROR)
                }
            };

            if let Err(e) = self.write_response(&response).await {
                error!(cause = %e, "failed to send response");
                break Err(e.into());
            }

            if close_requested {
                info!("client requested to close the connection");
                break Ok(());
            }
        };

        self.shutdown().await;
        result
    }

    async fn shutdown(mut self) {
        if let Err(e) = self.writer.shutdown().await {
            debug!(cause = %e, "shutdown connection error");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::handler::make_handler;
    use std::convert::Infallible;
    use std::io;
    use std::pin::Pin;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::task::{Context, Poll};
    use tokio::io::{AsyncReadExt, ReadBuf};

    /// Hands out its data at most `chunk` bytes per read, then reports end of stream.
    struct FragmentedReader {
        data: Vec<u8>,
        pos: usize,
        chunk: usize,
    }

    impl FragmentedReader {
        fn new(data: impl Into<Vec<u8>>, chunk: usize) -> Self {
            Self { data: data.into(), pos: 0, chunk }
        }
    }

    impl AsyncRead for FragmentedReader {
        fn poll_read(mut self: Pin<&mut Self>, _cx: &mut Context<'_>, buf: &mut ReadBuf<'_>) -> Poll<io::Result<()>> {
            let remaining = &self.data[self.pos..];
            let amt = remaining.len().min(buf.remaining()).min(self.chunk);
            buf.put_slice(&remaining[..amt]);
            self.pos += amt;
            Poll::Ready(Ok(()))
        }
    }

    /// Accepts at most `limit` bytes in total, then refuses further writes.
    struct ShortWriter {
        written: Vec<u8>,
        limit: usize,
    }

    impl AsyncWrite for ShortWriter {
        fn poll_write(mut self: Pin<&mut Self>, _cx: &mut Context<'_>, buf: &[u8]) -> Poll<io::Result<usize>> {
            let amt = buf.len().min(self.limit - self.written.len());
            self.written.extend_from_slice(&buf[..amt]);
            Poll::Ready(Ok(amt))
        }

        fn poll_flush(self: Pin<&mut Self>, _cx: &mut Context<'_>) -> Poll<io::Result<()>> {
            Poll::Ready(Ok(()))
        }

        fn poll_shutdown(self: Pin<&mut Self>, _cx: &mut Context<'_>) -> Poll<io::Result<()>> {
            Poll::Ready(Ok(()))
        }
    }

    const TWO_REQUESTS: &str = "GET /static/a.html HTTP/1.1\r\nHost: localhost\r\n\r\nGET /query?terms=a HTTP/1.1\r\nAccept: */*\r\n\r\n";

    #[tokio::test]
    async fn pipelined_requests_survive_any_fragmentation() {
        for chunk in 1..=TWO_REQUESTS.len() {
            let reader = FragmentedReader::new(TWO_REQUESTS, chunk);
            let mut connection = HttpConnection::new(reader, tokio::io::sink());

            let first = connection.next_request().await.unwrap().unwrap();
            let second = connection.next_request().await.unwrap().unwrap();

            assert_eq!(first.uri(), "/static/a.html", "chunk size {chunk}");
            assert_eq!(first.header("host"), Some("localhost"), "chunk size {chunk}");
            assert_eq!(second.uri(), "/query?terms=a", "chunk size {chunk}");
            assert_eq!(second.header("accept"), Some("*/*"), "chunk size {chunk}");
            assert!(connection.next_request().await.is_none(), "chunk size {chunk}");
        }
    }

    #[tokio::test]
    async fn peer_closing_before_terminator_fails() {
        let reader = FragmentedReader::new("GET /half HTTP/1.1\r\nHost: a", 4);
        let mut connection = HttpConnection::new(reader, tokio::io::sink());

        let result = connection.next_request().await;
        assert!(matches!(result, Some(Err(ParseError::IncompleteRequest { .. }))));
    }

    #[tokio::test]
    async fn peer_closing_without_data_ends_stream() {
        let reader = FragmentedReader::new("", 16);
        let mut connection = HttpConnection::new(reader, tokio::io::sink());

        assert!(connection.next_request().await.is_none());
    }

    #[tokio::test]
    async fn short_write_is_reported() {
        let writer = ShortWriter { written: Vec::new(), limit: 10 };
        let mut connection = HttpConnection::new(tokio::io::empty(), writer);

        let result = connection.write_response(&Response::ok().with_body("more than ten bytes")).await;
        assert!(matches!(result, Err(SendError::Io { ref source }) if source.kind() == io::ErrorKind::WriteZero));
    }

    #[tokio::test]
    async fn failed_write_ends_the_connection() {
        let calls = Arc::new(AtomicUsize::new(0));
        let handler = Arc::new(make_handler({
            let calls = Arc::clone(&calls);
            move |_request: Request| {
                calls.fetch_add(1, Ordering::SeqCst);
                async { Ok::<_, Infallible>(Response::ok().with_body("more than ten bytes")) }
            }
        }));

        let reader = FragmentedReader::new(TWO_REQUESTS, TWO_REQUESTS.len());
        let writer = ShortWriter { written: Vec::new(), limit: 10 };
        let result = HttpConnection::new(reader, writer).process(handler).await;

        assert!(matches!(
            result,
            Err(HttpError::ResponseError { source: SendError::Io { ref source } }) if source.kind() == io::ErrorKind::WriteZero
        ));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn close_header_ends_after_its_response() {
        let calls = Arc::new(AtomicUsize::new(0));
        let handler = Arc::new(make_handler({
            let calls = Arc::clone(&calls);
            move |request: Request| {
                calls.fetch_add(1, Ordering::SeqCst);
                async move { Ok::<_, Infallible>(Response::ok().with_body(request.uri().to_owned())) }
            }
        }));

        let (client, server) = tokio::io::duplex(4096);
        let (server_read, server_write) = tokio::io::split(server);
        let serve = tokio::spawn(HttpConnection::new(server_read, server_write).process(handler));

        let (mut client_read, mut client_write) = tokio::io::split(client);
        client_write
            .write_all(b"GET /one HTTP/1.1\r\n\r\nGET /two HTTP/1.1\r\nConnection: Close\r\n\r\nGET /three HTTP/1.1\r\n\r\n")
            .await
            .unwrap();

        let mut received = String::new();
        client_read.read_to_string(&mut received).await.unwrap();

        serve.await.unwrap().unwrap();
        assert_eq!(calls.load(Ordering::SeqCst), 2);
        assert_eq!(received.matches("HTTP/1.1 200 OK").count(), 2);
        assert!(received.ends_with("/two"));
        assert!(!received.contains("/three"));
    }

    #[tokio::test]
    async fn handler_error_becomes_500() {
        let handler = Arc::new(make_handler(|_request: Request| async { Err::<Response, _>("backend down") }));

        let (client, server) = tokio::io::duplex(4096);
        let (server_read, server_write) = tokio::io::split(server);
        let serve = tokio::spawn(HttpConnection::new(server_read, server_write).process(handler));

        let (mut client_read, mut client_write) = tokio::io::split(client);
        client_write.write_all(b"GET / HTTP/1.1\r\nConnection: close\r\n\r\n").await.unwrap();

        let mut received = String::new();
        client_read.read_to_string(&mut received).await.unwrap();

        serve.await.unwrap().unwrap();
        assert_eq!(received, "HTTP/1.1 500 Internal Server Error\r\nContent-Length: 0\r\n\r\n");
    }
}
