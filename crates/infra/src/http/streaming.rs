//! Incremental response bodies.
//!
//! Streaming responses are never buffered. The gateway wraps the byte stream
//! in a [`BodyReader`] and hands it to a [`BodySink`]. Each read must make
//! progress within the idle deadline or it fails with `TimedOut`.

use std::future::Future;
use std::io;
use std::pin::Pin;
use std::task::{Context, Poll};
use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use futures::stream::BoxStream;
use futures::TryStreamExt;
use skiff_domain::Result;
use tokio::io::{AsyncRead, ReadBuf};
use tokio::time::{Instant, Sleep};
use tokio_util::io::StreamReader;

/// Consumer of a streaming response body.
#[async_trait]
pub trait BodySink: Send {
    /// Reads from `body` until done. Returning early drops the connection.
    async fn consume(&mut self, body: BodyReader) -> Result<()>;
}

/// `AsyncRead` over a response body with a per-read idle deadline.
pub struct BodyReader {
    inner: StreamReader<BoxStream<'static, io::Result<Bytes>>, Bytes>,
    idle: Duration,
    deadline: Pin<Box<Sleep>>,
}

impl BodyReader {
    pub fn new(stream: BoxStream<'static, io::Result<Bytes>>, idle: Duration) -> Self {
        Self {
            inner: StreamReader::new(stream),
            idle,
            deadline: Box::pin(tokio::time::sleep(idle)),
        }
    }

    pub(crate) fn from_response(response: reqwest::Response, idle: Duration) -> Self {
        let stream = response.bytes_stream().map_err(io::Error::other);
        Self::new(Box::pin(stream), idle)
    }
}

impl AsyncRead for BodyReader {
    fn poll_read(
        self: Pin<&mut Self>,
        cx: &mut Context<'_>,
        buf: &mut ReadBuf<'_>,
    ) -> Poll<io::Result<()>> {
        let this = self.get_mut();
        match Pin::new(&mut this.inner).poll_read(cx, buf) {
            Poll::Ready(result) => {
                let next = Instant::now() + this.idle;
                this.deadline.as_mut().reset(next);
                Poll::Ready(result)
            }
            Poll::Pending => match this.deadline.as_mut().poll(cx) {
                Poll::Ready(()) => Poll::Ready(Err(io::Error::new(
                    io::ErrorKind::TimedOut,
                    "no data received before the read deadline",
                ))),
                Poll::Pending => Poll::Pending,
            },
        }
    }
}
