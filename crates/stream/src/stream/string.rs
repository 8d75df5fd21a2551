use std::io::{Cursor, SeekFrom};

use bytes::Bytes;

use super::{BodyStream, BufferStream, Detached, Metadata, MetadataValue, StreamError};

const STREAM_TYPE: &str = "memory";

/// An in-memory stream seeded from a string.
///
/// The content is copied into a fresh growable buffer positioned at the start, after which the
/// stream behaves exactly like a [`BufferStream`]: readable, writable and seekable.
///
/// ```
/// use micro_stream::stream::{BodyStream, StringStream};
///
/// let mut stream = StringStream::new("hello");
/// assert_eq!(stream.size(), Some(5));
/// assert_eq!(&stream.read(4).unwrap()[..], b"hell");
/// ```
#[derive(Debug)]
pub struct StringStream {
    inner: BufferStream<Cursor<Vec<u8>>>,
}

impl StringStream {
    pub fn new(content: &str) -> Self {
        let buffer = Cursor::new(content.as_bytes().to_vec());
        Self { inner: BufferStream::with_stream_type(buffer, STREAM_TYPE) }
    }

    /// Consumes the string stream, returning the underlying buffer stream.
    pub fn into_inner(self) -> BufferStream<Cursor<Vec<u8>>> {
        self.inner
    }
}

impl Default for StringStream {
    fn default() -> Self {
        Self::new("")
    }
}

impl From<&str> for StringStream {
    fn from(content: &str) -> Self {
        Self::new(content)
    }
}

impl From<String> for StringStream {
    fn from(content: String) -> Self {
        Self::new(&content)
    }
}

impl BodyStream for StringStream {
    fn close(&mut self) {
        self.inner.close();
    }

    fn detach(&mut self) -> Option<Detached> {
        self.inner.detach()
    }

    fn size(&self) -> Option<u64> {
        self.inner.size()
    }

    fn tell(&mut self) -> Result<u64, StreamError> {
        self.inner.tell()
    }

    fn eof(&self) -> bool {
        self.inner.eof()
    }

    fn is_seekable(&self) -> bool {
        self.inner.is_seekable()
    }

    fn is_readable(&self) -> bool {
        self.inner.is_readable()
    }

    fn is_writable(&self) -> bool {
        self.inner.is_writable()
    }

    fn seek(&mut self, pos: SeekFrom) -> Result<u64, StreamError> {
        self.inner.seek(pos)
    }

    fn rewind(&mut self) -> Result<(), StreamError> {
        self.inner.rewind()
    }

    fn read(&mut self, length: usize) -> Result<Bytes, StreamError> {
        self.inner.read(length)
    }

    fn write(&mut self, data: &[u8]) -> Result<usize, StreamError> {
        self.inner.write(data)
    }

    fn contents(&mut self) -> Result<Bytes, StreamError> {
        self.inner.contents()
    }

    fn metadata(&self) -> Metadata {
        self.inner.metadata()
    }

    fn metadata_value(&self, key: &str) -> Option<MetadataValue> {
        self.inner.metadata_value(key)
    }

    fn to_string_lossy(&mut self) -> String {
        self.inner.to_string_lossy()
    }
}
