//! Upload error types.

/// Errors produced during a video upload.
#[derive(Debug, thiserror::Error)]
pub enum UploadError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("transport error: {0}")]
    Transport(String),

    #[error("upload creation failed: HTTP {status}: {body}")]
    Negotiation { status: u16, body: String },

    #[error("malformed upload ticket: {0}")]
    BadTicket(#[from] serde_json::Error),

    #[error("malformed pull response: {0}")]
    BadPullResponse(serde_json::Error),

    #[error("ticket carries no upload link")]
    MissingUploadLink,

    #[error("chunk transfer failed: HTTP {status}: {body}")]
    ChunkTransfer { status: u16, body: String },

    #[error("bad acknowledged offset: {0}")]
    BadOffset(String),
}
