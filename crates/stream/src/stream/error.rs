use std::io;
use thiserror::Error;

/// Boxed error returned by content producers.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

#[derive(Error, Debug)]
pub enum StreamError {
    #[error("{stream_type} stream does not provide a current position")]
    PositionUnsupported { stream_type: &'static str },

    #[error("cannot seek in {stream_type} stream")]
    SeekUnsupported { stream_type: &'static str },

    #[error("cannot read from {stream_type} stream")]
    ReadUnsupported { stream_type: &'static str },

    #[error("cannot write into {stream_type} stream")]
    WriteUnsupported { stream_type: &'static str },

    #[error("unable to read stream contents: {source}")]
    UnreadableContent { source: BoxError },

    #[error("stream is detached")]
    Detached,

    #[error("io error: {source}")]
    Io {
        #[from]
        source: io::Error,
    },
}

impl StreamError {
    pub fn position_unsupported(stream_type: &'static str) -> Self {
        Self::PositionUnsupported { stream_type }
    }

    pub fn seek_unsupported(stream_type: &'static str) -> Self {
        Self::SeekUnsupported { stream_type }
    }

    pub fn read_unsupported(stream_type: &'static str) -> Self {
        Self::ReadUnsupported { stream_type }
    }

    pub fn write_unsupported(stream_type: &'static str) -> Self {
        Self::WriteUnsupported { stream_type }
    }

    pub fn unreadable_content<E: Into<BoxError>>(e: E) -> Self {
        Self::UnreadableContent { source: e.into() }
    }
}
