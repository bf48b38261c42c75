//! Resumable video upload over the TUS protocol.
//!
//! This crate implements the **upload logic** for pushing video content to a
//! Vimeo-style hosting service. It is a library crate with no HTTP
//! dependencies — `vidpush-client` provides a [`VideoHost`] implementation
//! that bridges to the actual `reqwest` transport.
//!
//! # Pipeline
//!
//! 1. **Negotiate** — create the video resource, receiving an upload ticket
//! 2. **Transfer** — send sequential chunks to the ticket's upload endpoint,
//!    advancing the offset to whatever the server acknowledges
//! 3. **Complete** — the transfer ends once every byte is acknowledged
//!
//! Pull mode (the server fetches the content from a URL itself) is a single
//! request with no transfer loop; see [`Uploader::pull`].

pub mod error;
pub mod policy;
pub mod source;
pub mod ticket;
pub mod transport;
pub mod uploader;

// Re-export primary types for convenience.
pub use error::UploadError;
pub use source::{BytesSource, ContentSource, FileSource};
pub use ticket::{Ticket, TicketUpload};
pub use transport::{ApiResponse, VideoHost};
pub use uploader::{UploadOptions, Uploader};
