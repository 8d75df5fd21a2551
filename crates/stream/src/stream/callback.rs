use std::fmt;
use std::io::SeekFrom;

use bytes::Bytes;
use tracing::trace;

use super::metadata::{self, Metadata};
use super::{BodyStream, BoxError, Detached, StreamError};

const STREAM_TYPE: &str = "callback";

/// A one-shot content producer.
pub type Producer = Box<dyn FnOnce() -> Result<String, BoxError> + Send>;

/// A stream whose content is produced lazily by a producer function.
///
/// The producer is executed at most once, and only when the content is demanded through
/// [`BodyStream::contents`] or [`BodyStream::to_string_lossy`]. After that, or after
/// [`BodyStream::close`] or [`BodyStream::detach`], the stream is at its end for good.
///
/// The stream is neither readable, writable nor seekable: the positional operations always fail
/// and never run the producer. Its size is always unknown, even once the content has been
/// produced.
///
/// ```
/// use micro_stream::stream::{BodyStream, CallbackStream};
///
/// let mut stream = CallbackStream::infallible(|| "rendered later");
/// assert!(!stream.eof());
/// assert_eq!(stream.to_string_lossy(), "rendered later");
/// assert!(stream.eof());
/// assert_eq!(stream.to_string_lossy(), "");
/// ```
pub struct CallbackStream {
    producer: Option<Producer>,
}

impl CallbackStream {
    /// Creates a stream from a fallible producer.
    pub fn new<F, S, E>(producer: F) -> Self
    where
        F: FnOnce() -> Result<S, E> + Send + 'static,
        S: Into<String>,
        E: Into<BoxError>,
    {
        let producer: Producer = Box::new(move || -> Result<String, BoxError> {
            match producer() {
                Ok(content) => Ok(content.into()),
                Err(e) => Err(e.into()),
            }
        });
        Self { producer: Some(producer) }
    }

    /// Creates a stream from a producer that cannot fail.
    pub fn infallible<F, S>(producer: F) -> Self
    where
        F: FnOnce() -> S + Send + 'static,
        S: Into<String>,
    {
        let producer: Producer = Box::new(move || -> Result<String, BoxError> { Ok(producer().into()) });
        Self { producer: Some(producer) }
    }

    /// Takes the producer out of the stream without executing it.
    pub fn take_producer(&mut self) -> Option<Producer> {
        self.producer.take()
    }
}

impl From<Producer> for CallbackStream {
    fn from(producer: Producer) -> Self {
        Self { producer: Some(producer) }
    }
}

impl fmt::Debug for CallbackStream {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CallbackStream").field("eof", &self.eof()).finish()
    }
}

impl BodyStream for CallbackStream {
    fn close(&mut self) {
        if self.producer.take().is_some() {
            trace!("callback stream closed, producer dropped without running");
        }
    }

    fn detach(&mut self) -> Option<Detached> {
        self.take_producer().map(Detached::Producer)
    }

    fn size(&self) -> Option<u64> {
        None
    }

    fn tell(&mut self) -> Result<u64, StreamError> {
        Err(StreamError::position_unsupported(STREAM_TYPE))
    }

    fn eof(&self) -> bool {
        self.producer.is_none()
    }

    fn is_seekable(&self) -> bool {
        false
    }

    fn is_readable(&self) -> bool {
        false
    }

    fn is_writable(&self) -> bool {
        false
    }

    fn seek(&mut self, _pos: SeekFrom) -> Result<u64, StreamError> {
        Err(StreamError::seek_unsupported(STREAM_TYPE))
    }

    fn rewind(&mut self) -> Result<(), StreamError> {
        Err(StreamError::seek_unsupported(STREAM_TYPE))
    }

    fn read(&mut self, _length: usize) -> Result<Bytes, StreamError> {
        Err(StreamError::read_unsupported(STREAM_TYPE))
    }

    fn write(&mut self, _data: &[u8]) -> Result<usize, StreamError> {
        Err(StreamError::write_unsupported(STREAM_TYPE))
    }

    fn contents(&mut self) -> Result<Bytes, StreamError> {
        // detach before running, a re-entrant call must find nothing to run
        let Some(producer) = self.take_producer() else {
            return Ok(Bytes::new());
        };

        trace!("running callback stream producer");
        let content = producer().map_err(StreamError::unreadable_content)?;
        trace!(len = content.len(), "callback stream produced content");
        Ok(Bytes::from(content))
    }

    fn metadata(&self) -> Metadata {
        Metadata::new()
            .with(metadata::EOF, self.eof())
            .with(metadata::STREAM_TYPE, STREAM_TYPE)
            .with(metadata::SEEKABLE, false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stream::MetadataValue;
    use std::io;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn create_stream() -> CallbackStream {
        CallbackStream::infallible(|| "test")
    }

    fn counting_stream() -> (CallbackStream, Arc<AtomicUsize>) {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);
        let stream = CallbackStream::infallible(move || {
            counter.fetch_add(1, Ordering::SeqCst);
            "test"
        });
        (stream, calls)
    }

    #[test]
    fn test_create() {
        let mut stream = create_stream();
        assert_eq!(&stream.contents().unwrap()[..], b"test");
    }

    #[test]
    fn test_contents_runs_producer_once() {
        let (mut stream, calls) = counting_stream();

        assert_eq!(&stream.contents().unwrap()[..], b"test");
        assert!(stream.contents().unwrap().is_empty());
        assert_eq!(stream.to_string_lossy(), "");
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_close() {
        let (mut stream, calls) = counting_stream();
        stream.close();
        stream.close();

        assert!(stream.eof());
        assert!(stream.contents().unwrap().is_empty());
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_detach() {
        let (mut stream, calls) = counting_stream();

        let producer = stream.detach().and_then(Detached::into_producer).unwrap();
        assert_eq!(calls.load(Ordering::SeqCst), 0);
        assert!(stream.eof());
        assert_eq!(stream.metadata_value(metadata::EOF), Some(MetadataValue::Bool(true)));
        assert!(stream.detach().is_none());

        assert_eq!(producer().unwrap(), "test");
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert!(stream.contents().unwrap().is_empty());
    }

    #[test]
    fn test_size_unknown() {
        let mut stream = create_stream();
        assert!(stream.size().is_none());
        stream.contents().unwrap();
        assert!(stream.size().is_none());
    }

    #[test]
    fn test_eof() {
        let mut stream = create_stream();
        assert!(!stream.eof());
        stream.contents().unwrap();
        assert!(stream.eof());
    }

    #[test]
    fn test_capabilities() {
        let stream = create_stream();
        assert!(!stream.is_seekable());
        assert!(!stream.is_readable());
        assert!(!stream.is_writable());
    }

    #[test]
    fn test_unsupported_operations() {
        let (mut stream, calls) = counting_stream();

        assert!(matches!(stream.tell(), Err(StreamError::PositionUnsupported { .. })));
        assert!(matches!(stream.seek(SeekFrom::Start(1)), Err(StreamError::SeekUnsupported { .. })));
        assert!(matches!(stream.rewind(), Err(StreamError::SeekUnsupported { .. })));
        assert!(matches!(stream.read(0), Err(StreamError::ReadUnsupported { .. })));
        assert!(matches!(stream.write(b"test data"), Err(StreamError::WriteUnsupported { .. })));

        assert_eq!(calls.load(Ordering::SeqCst), 0);
        assert!(!stream.eof());
    }

    #[test]
    fn test_unsupported_after_close() {
        let mut stream = create_stream();
        stream.close();

        assert!(matches!(stream.read(4), Err(StreamError::ReadUnsupported { .. })));
        assert!(matches!(stream.tell(), Err(StreamError::PositionUnsupported { .. })));
    }

    #[test]
    fn test_metadata() {
        let stream = create_stream();
        let expected = Metadata::new()
            .with(metadata::EOF, false)
            .with(metadata::STREAM_TYPE, "callback")
            .with(metadata::SEEKABLE, false);

        assert_eq!(stream.metadata(), expected);
    }

    #[test]
    fn test_metadata_particular() {
        let stream = create_stream();
        assert_eq!(stream.metadata_value(metadata::STREAM_TYPE), Some(MetadataValue::from("callback")));
        assert_eq!(stream.metadata_value(metadata::SEEKABLE), Some(MetadataValue::Bool(false)));
    }

    #[test]
    fn test_metadata_non_existent() {
        let stream = create_stream();
        assert!(stream.metadata_value("foo").is_none());
    }

    #[test]
    fn test_to_string() {
        let mut stream = create_stream();
        assert_eq!(stream.to_string_lossy(), "test");
    }

    #[test]
    fn test_to_string_error() {
        let mut stream = CallbackStream::new(|| Err::<String, _>(io::Error::other("test exception")));
        assert_eq!(stream.to_string_lossy(), "");
        assert!(stream.eof());
    }

    #[test]
    fn test_contents_error() {
        let mut stream = CallbackStream::new(|| Err::<String, _>("render failed"));

        let err = stream.contents().unwrap_err();
        assert!(matches!(err, StreamError::UnreadableContent { .. }));
        assert_eq!(err.to_string(), "unable to read stream contents: render failed");

        // the producer is gone even though it failed
        assert!(stream.eof());
        assert!(stream.contents().unwrap().is_empty());
    }

    #[test]
    fn test_from_producer() {
        let producer: Producer = Box::new(|| Ok("boxed".to_string()));
        let mut stream = CallbackStream::from(producer);
        assert_eq!(stream.to_string_lossy(), "boxed");
    }
}
