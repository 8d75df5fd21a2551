use std::pin::Pin;
use std::task::{Context, Poll};

use bytes::Bytes;
use http_body::{Body, Frame, SizeHint};
use tracing::trace;

use crate::stream::{BodyStream, StreamError};

/// Default number of bytes pulled from a readable stream per frame.
pub const DEFAULT_CHUNK_SIZE: usize = 8 * 1024;

/// Adapts a [`BodyStream`] into an [`http_body::Body`].
///
/// Readable streams are drained in chunks of at most `chunk_size` bytes from their current
/// position. Streams that are not readable, such as a
/// [`CallbackStream`](crate::stream::CallbackStream), have their whole content materialized once
/// and sent as a single frame.
///
/// Polling never returns [`Poll::Pending`]: every stream operation completes synchronously.
#[derive(Debug)]
pub struct StreamBody<S> {
    stream: S,
    chunk_size: usize,
    remaining: Option<u64>,
    finished: bool,
}

impl<S: BodyStream> StreamBody<S> {
    pub fn new(stream: S) -> Self {
        Self::with_chunk_size(stream, DEFAULT_CHUNK_SIZE)
    }

    /// Creates a body reading `chunk_size` bytes per frame. A zero chunk size is treated as one.
    pub fn with_chunk_size(mut stream: S, chunk_size: usize) -> Self {
        let remaining = remaining_size(&mut stream);
        Self { stream, chunk_size: chunk_size.max(1), remaining, finished: false }
    }

    pub fn chunk_size(&self) -> usize {
        self.chunk_size
    }

    pub fn get_ref(&self) -> &S {
        &self.stream
    }

    /// Consumes the body, returning the wrapped stream.
    pub fn into_inner(self) -> S {
        self.stream
    }

    fn next_frame(&mut self) -> Option<Result<Frame<Bytes>, StreamError>> {
        if self.finished {
            return None;
        }

        let result = if self.stream.is_readable() {
            self.stream.read(self.chunk_size)
        } else {
            // produced in one go, there is nothing left afterwards
            self.finished = true;
            self.stream.contents()
        };

        match result {
            Ok(bytes) if bytes.is_empty() => {
                trace!("stream body reached the end");
                self.finished = true;
                None
            }
            Ok(bytes) => {
                trace!(len = bytes.len(), "stream body frame");
                if let Some(remaining) = self.remaining.as_mut() {
                    *remaining = remaining.saturating_sub(bytes.len() as u64);
                }
                Some(Ok(Frame::data(bytes)))
            }
            Err(e) => {
                self.finished = true;
                Some(Err(e))
            }
        }
    }
}

impl<S: BodyStream + Unpin> Body for StreamBody<S> {
    type Data = Bytes;
    type Error = StreamError;

    fn poll_frame(self: Pin<&mut Self>, _cx: &mut Context<'_>) -> Poll<Option<Result<Frame<Self::Data>, Self::Error>>> {
        Poll::Ready(self.get_mut().next_frame())
    }

    fn is_end_stream(&self) -> bool {
        self.finished
    }

    fn size_hint(&self) -> SizeHint {
        if self.finished {
            return SizeHint::with_exact(0);
        }

        match self.remaining {
            Some(remaining) => SizeHint::with_exact(remaining),
            None => SizeHint::default(),
        }
    }
}

/// Bytes left between the current position and the end, known only for readable streams that
/// report both a size and a position.
fn remaining_size<S: BodyStream>(stream: &mut S) -> Option<u64> {
    if !stream.is_readable() {
        return None;
    }
    let size = stream.size()?;
    let position = stream.tell().ok()?;
    Some(size.saturating_sub(position))
}
