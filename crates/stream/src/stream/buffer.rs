use std::fmt;
use std::io::{self, Cursor, Read, Seek, SeekFrom, Write};

use bytes::Bytes;
use tracing::{debug, trace};

use super::metadata::{self, Metadata};
use super::{BodyStream, Detached, Handle, StreamError};

const DEFAULT_STREAM_TYPE: &str = "buffer";
const MODE: &str = "r+";

/// Upper bound of the buffer reserved up front by a read, larger reads grow as data arrives.
const READ_CAPACITY: usize = 8 * 1024;

/// A readable, writable and seekable stream over a random-access handle.
///
/// Any `Read + Write + Seek` value works as a handle: an in-memory [`Cursor`], a
/// [`std::fs::File`], or a custom resource. Once the stream is closed or detached every operation
/// other than the lifecycle and capability queries fails with [`StreamError::Detached`].
pub struct BufferStream<H = Cursor<Vec<u8>>> {
    handle: Option<H>,
    stream_type: &'static str,
    size: Option<u64>,
    eof: bool,
}

impl<H: Handle> BufferStream<H> {
    pub fn new(handle: H) -> Self {
        Self::with_stream_type(handle, DEFAULT_STREAM_TYPE)
    }

    /// Creates a stream reporting `stream_type` in its metadata.
    pub fn with_stream_type(mut handle: H, stream_type: &'static str) -> Self {
        let size = measure_size(&mut handle);
        Self { handle: Some(handle), stream_type, size, eof: false }
    }

    /// Takes the handle out of the stream, leaving the stream detached.
    pub fn take_handle(&mut self) -> Option<H> {
        self.size = None;
        self.handle.take()
    }

    pub fn stream_type(&self) -> &'static str {
        self.stream_type
    }

    fn handle_mut(&mut self) -> Result<&mut H, StreamError> {
        self.handle.as_mut().ok_or(StreamError::Detached)
    }
}

/// Measures the handle by seeking to its end, restoring the original position afterwards.
///
/// Returns `None` if the handle refuses to seek.
fn measure_size<H: Seek>(handle: &mut H) -> Option<u64> {
    let measure = |handle: &mut H| -> io::Result<u64> {
        let position = handle.stream_position()?;
        let end = handle.seek(SeekFrom::End(0))?;
        if position != end {
            handle.seek(SeekFrom::Start(position))?;
        }
        Ok(end)
    };

    match measure(handle) {
        Ok(size) => Some(size),
        Err(e) => {
            debug!(cause = %e, "unable to measure stream size");
            None
        }
    }
}

impl<H> fmt::Debug for BufferStream<H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BufferStream")
            .field("stream_type", &self.stream_type)
            .field("attached", &self.handle.is_some())
            .field("size", &self.size)
            .field("eof", &self.eof)
            .finish()
    }
}

impl<H: Handle + 'static> BodyStream for BufferStream<H> {
    fn close(&mut self) {
        if self.take_handle().is_some() {
            debug!(stream_type = self.stream_type, "stream closed");
        }
    }

    fn detach(&mut self) -> Option<Detached> {
        let handle = self.take_handle()?;
        debug!(stream_type = self.stream_type, "stream detached");
        Some(Detached::Handle(Box::new(handle)))
    }

    fn size(&self) -> Option<u64> {
        self.handle.as_ref().and(self.size)
    }

    fn tell(&mut self) -> Result<u64, StreamError> {
        Ok(self.handle_mut()?.stream_position()?)
    }

    fn eof(&self) -> bool {
        self.handle.is_none() || self.eof
    }

    fn is_seekable(&self) -> bool {
        self.handle.is_some()
    }

    fn is_readable(&self) -> bool {
        self.handle.is_some()
    }

    fn is_writable(&self) -> bool {
        self.handle.is_some()
    }

    fn seek(&mut self, pos: SeekFrom) -> Result<u64, StreamError> {
        let position = self.handle_mut()?.seek(pos)?;
        self.eof = false;
        Ok(position)
    }

    fn read(&mut self, length: usize) -> Result<Bytes, StreamError> {
        let handle = self.handle_mut()?;
        if length == 0 {
            return Ok(Bytes::new());
        }

        let mut buf = Vec::with_capacity(length.min(READ_CAPACITY));
        Read::by_ref(handle).take(length as u64).read_to_end(&mut buf)?;
        trace!(requested = length, len = buf.len(), "read from stream");

        if buf.len() < length {
            self.eof = true;
        }
        Ok(Bytes::from(buf))
    }

    fn write(&mut self, data: &[u8]) -> Result<usize, StreamError> {
        let handle = self.handle_mut()?;
        handle.write_all(data)?;
        self.size = measure_size(handle);
        self.eof = false;
        Ok(data.len())
    }

    fn contents(&mut self) -> Result<Bytes, StreamError> {
        let handle = self.handle_mut()?;
        let mut buf = Vec::new();
        handle.read_to_end(&mut buf)?;
        self.eof = true;
        Ok(Bytes::from(buf))
    }

    fn metadata(&self) -> Metadata {
        if self.handle.is_none() {
            return Metadata::new();
        }

        let metadata = Metadata::new()
            .with(metadata::EOF, self.eof)
            .with(metadata::MODE, MODE)
            .with(metadata::SEEKABLE, true)
            .with(metadata::STREAM_TYPE, self.stream_type);

        match self.size {
            Some(size) => metadata.with(metadata::SIZE, size),
            None => metadata,
        }
    }
}
