//! Byte-capped body reader that stops at the first cancellation

use crate::client::BodyReader;
use std::future::Future;
use std::io;
use std::pin::Pin;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::task::{ready, Context, Poll};
use tokio::io::{AsyncRead, AsyncReadExt, ReadBuf, Take};
use tokio_util::sync::{CancellationToken, WaitForCancellationFutureOwned};

/// Shared view of how many bytes a [`LimitedReader`] has delivered
#[derive(Debug, Clone, Default)]
pub(super) struct ByteCounter(Arc<AtomicU64>);

impl ByteCounter {
    pub(super) fn get(&self) -> u64 {
        self.0.load(Ordering::Acquire)
    }

    fn add(&self, n: u64) {
        self.0.fetch_add(n, Ordering::AcqRel);
    }
}

/// Body reader bounded to `max_bytes` that reports end-of-stream once the
/// token is cancelled
///
/// Both stop conditions look the same to the consumer; the [`ByteCounter`]
/// tells them apart afterwards.
pub(super) struct LimitedReader {
    inner: Take<BodyReader>,
    counter: ByteCounter,
    cancelled: Pin<Box<WaitForCancellationFutureOwned>>,
}

impl LimitedReader {
    pub(super) fn new(body: BodyReader, max_bytes: u64, token: CancellationToken) -> Self {
        Self {
            inner: body.take(max_bytes),
            counter: ByteCounter::default(),
            cancelled: Box::pin(token.cancelled_owned()),
        }
    }

    pub(super) fn counter(&self) -> ByteCounter {
        self.counter.clone()
    }
}

impl AsyncRead for LimitedReader {
    fn poll_read(
        self: Pin<&mut Self>,
        cx: &mut Context<'_>,
        buf: &mut ReadBuf<'_>,
    ) -> Poll<io::Result<()>> {
        let this = self.get_mut();

        // Registers the waker too, so a pending body read unblocks on cancel
        if this.cancelled.as_mut().poll(cx).is_ready() {
            return Poll::Ready(Ok(()));
        }

        let before = buf.filled().len();
        ready!(Pin::new(&mut this.inner).poll_read(cx, buf))?;
        this.counter.add((buf.filled().len() - before) as u64);

        Poll::Ready(Ok(()))
    }
}
