//! Uniform stream abstractions for HTTP message bodies
//!
//! A message body may be backed by a file, an in-memory buffer or a deferred computation. This crate
//! puts all of them behind one capability contract, [`stream::BodyStream`], so that code building or
//! sending messages never needs to know which one it holds.
//!
//! # Example
//!
//! ```
//! use micro_stream::stream::{BodyStream, CallbackStream, StringStream};
//!
//! let mut bodies: Vec<Box<dyn BodyStream>> = vec![
//!     Box::new(StringStream::new("in memory")),
//!     Box::new(CallbackStream::infallible(|| "computed on demand")),
//! ];
//!
//! for body in &mut bodies {
//!     if body.is_seekable() {
//!         body.rewind().unwrap();
//!     }
//!     println!("{}", body.to_string_lossy());
//! }
//! ```
//!
//! # Architecture
//!
//! - [`stream`]: the [`stream::BodyStream`] contract and its implementations
//! - [`body`]: adapter exposing any stream as an `http_body::Body`
//!
//! # Core Components
//!
//! ## Capabilities
//!
//! Every stream answers [`is_readable`](stream::BodyStream::is_readable),
//! [`is_writable`](stream::BodyStream::is_writable) and
//! [`is_seekable`](stream::BodyStream::is_seekable). Operations outside of a stream's
//! capabilities fail with a typed [`stream::StreamError`] instead of silently doing nothing.
//!
//! ## Deferred content
//!
//! [`stream::CallbackStream`] runs its producer at most once, and only when the content is
//! requested. Expensive work such as rendering or compression is skipped entirely for bodies that
//! are never read.
//!
//! ## In-memory content
//!
//! [`stream::StringStream`] seeds a [`stream::BufferStream`] with a string, giving a fully
//! readable, writable and seekable body.
//!
//! # Error Handling
//!
//! All fallible operations return [`stream::StreamError`]. The one exception is
//! [`to_string_lossy`](stream::BodyStream::to_string_lossy), which logs failures and falls back to
//! an empty string so it can be used wherever a plain string is expected.
//!
//! # Limitations
//!
//! - Streams are synchronous; no operation blocks on external events
//! - Streams carry no internal locking, sharing one between threads needs external synchronization

pub mod body;
pub mod stream;
