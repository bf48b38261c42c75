//! HTTP transport for the video host API.
//!
//! Async client using `reqwest` with Bearer token authentication.
//! Implements `vidpush_upload::VideoHost`, bridging the upload logic to the
//! wire.

pub mod client;

pub use client::{ApiClient, ClientError};
