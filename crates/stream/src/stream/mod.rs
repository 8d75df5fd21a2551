//! Stream abstractions for HTTP message bodies.
//!
//! Every body, whatever backs it, is driven through the [`BodyStream`] trait. Callers consult the
//! capability flags ([`BodyStream::is_readable`], [`BodyStream::is_writable`],
//! [`BodyStream::is_seekable`]) instead of branching on the concrete type; operations a stream
//! does not support fail with a typed [`StreamError`].
//!
//! # Implementations
//!
//! - [`CallbackStream`]: content produced lazily by a one-shot producer function
//! - [`BufferStream`]: conventional random-access stream over any `Read + Write + Seek` handle
//! - [`StringStream`]: a [`BufferStream`] over memory, seeded from a string
//!
//! # Lifecycle
//!
//! [`BodyStream::close`] and [`BodyStream::detach`] release the underlying resource exactly once.
//! Afterwards the stream is terminal: capability flags report `false`, [`BodyStream::eof`] reports
//! `true` and most other operations fail deterministically.

mod buffer;
mod callback;
mod error;
pub mod metadata;
mod string;

pub use buffer::BufferStream;
pub use callback::CallbackStream;
pub use callback::Producer;
pub use error::BoxError;
pub use error::StreamError;
pub use metadata::Metadata;
pub use metadata::MetadataValue;
pub use string::StringStream;

use std::fmt;
use std::io::{Read, Seek, SeekFrom, Write};

use bytes::Bytes;
use tracing::warn;

/// A random-access resource a [`BufferStream`] can be built on.
pub trait Handle: Read + Write + Seek + Send {}

impl<T: Read + Write + Seek + Send> Handle for T {}

/// The resource handed back by [`BodyStream::detach`].
pub enum Detached {
    /// The producer of a [`CallbackStream`], never invoked.
    Producer(Producer),
    /// The handle backing a [`BufferStream`].
    Handle(Box<dyn Handle>),
}

impl Detached {
    pub fn into_producer(self) -> Option<Producer> {
        match self {
            Detached::Producer(producer) => Some(producer),
            Detached::Handle(_) => None,
        }
    }

    pub fn into_handle(self) -> Option<Box<dyn Handle>> {
        match self {
            Detached::Producer(_) => None,
            Detached::Handle(handle) => Some(handle),
        }
    }
}

impl fmt::Debug for Detached {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Detached::Producer(_) => f.write_str("Detached::Producer(..)"),
            Detached::Handle(_) => f.write_str("Detached::Handle(..)"),
        }
    }
}

/// The capability contract shared by every body stream.
///
/// The trait is object safe: code holding a `Box<dyn BodyStream>` can drive any implementation.
pub trait BodyStream {
    /// Releases the underlying resource. Idempotent, never fails.
    fn close(&mut self);

    /// Separates the underlying resource from the stream, leaving the stream unusable.
    ///
    /// Returns `None` if the stream has already been closed or detached.
    fn detach(&mut self) -> Option<Detached>;

    /// Size of the stream in bytes, `None` if unknown.
    fn size(&self) -> Option<u64>;

    /// Current position of the read/write pointer.
    fn tell(&mut self) -> Result<u64, StreamError>;

    /// Returns true if further reads cannot produce data.
    fn eof(&self) -> bool;

    fn is_seekable(&self) -> bool;

    fn is_readable(&self) -> bool;

    fn is_writable(&self) -> bool;

    /// Moves the pointer, returning the new position from the start of the stream.
    fn seek(&mut self, pos: SeekFrom) -> Result<u64, StreamError>;

    /// Seeks to the beginning of the stream.
    fn rewind(&mut self) -> Result<(), StreamError> {
        self.seek(SeekFrom::Start(0)).map(|_| ())
    }

    /// Reads up to `length` bytes. Fewer bytes are returned at the end of the stream.
    fn read(&mut self, length: usize) -> Result<Bytes, StreamError>;

    /// Writes `data` at the current position, returning the number of bytes written.
    fn write(&mut self, data: &[u8]) -> Result<usize, StreamError>;

    /// Returns the remaining contents of the stream.
    fn contents(&mut self) -> Result<Bytes, StreamError>;

    fn metadata(&self) -> Metadata;

    /// Looks up a single metadata entry, `None` if the key is unknown.
    fn metadata_value(&self, key: &str) -> Option<MetadataValue> {
        self.metadata().remove(key)
    }

    /// Reads the remaining contents as a string.
    ///
    /// This never fails: an error while producing the contents is logged and an empty string
    /// returned instead. Invalid UTF-8 sequences are replaced with `U+FFFD`.
    fn to_string_lossy(&mut self) -> String {
        match self.contents() {
            Ok(bytes) => String::from_utf8_lossy(&bytes).into_owned(),
            Err(e) => {
                warn!(cause = %e, "failed to read stream contents, fallback to empty string");
                String::new()
            }
        }
    }
}

impl<S: BodyStream + ?Sized> BodyStream for Box<S> {
    fn close(&mut self) {
        (**self).close();
    }

    fn detach(&mut self) -> Option<Detached> {
        (**self).detach()
    }

    fn size(&self) -> Option<u64> {
        (**self).size()
    }

    fn tell(&mut self) -> Result<u64, StreamError> {
        (**self).tell()
    }

    fn eof(&self) -> bool {
        (**self).eof()
    }

    fn is_seekable(&self) -> bool {
        (**self).is_seekable()
    }

    fn is_readable(&self) -> bool {
        (**self).is_readable()
    }

    fn is_writable(&self) -> bool {
        (**self).is_writable()
    }

    fn seek(&mut self, pos: SeekFrom) -> Result<u64, StreamError> {
        (**self).seek(pos)
    }

    fn rewind(&mut self) -> Result<(), StreamError> {
        (**self).rewind()
    }

    fn read(&mut self, length: usize) -> Result<Bytes, StreamError> {
        (**self).read(length)
    }

    fn write(&mut self, data: &[u8]) -> Result<usize, StreamError> {
        (**self).write(data)
    }

    fn contents(&mut self) -> Result<Bytes, StreamError> {
        (**self).contents()
    }

    fn metadata(&self) -> Metadata {
        (**self).metadata()
    }

    fn metadata_value(&self, key: &str) -> Option<MetadataValue> {
        (**self).metadata_value(key)
    }

    fn to_string_lossy(&mut self) -> String {
        (**self).to_string_lossy()
    }
}
