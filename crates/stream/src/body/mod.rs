//! Bridges body streams into the `http-body` ecosystem.
//!
//! [`StreamBody`] wraps any [`BodyStream`](crate::stream::BodyStream) and implements
//! [`http_body::Body`], so a stream can be attached directly to an `http::Response`:
//!
//! ```
//! use http::Response;
//! use micro_stream::body::StreamBody;
//! use micro_stream::stream::CallbackStream;
//!
//! let body = StreamBody::new(CallbackStream::infallible(|| "rendered on demand"));
//! let response = Response::builder().status(200).body(body).unwrap();
//! assert_eq!(response.status(), 200);
//! ```

mod stream_body;

pub use stream_body::DEFAULT_CHUNK_SIZE;
pub use stream_body::StreamBody;
