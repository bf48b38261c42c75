//! Ticket negotiation and the chunked transfer engine.

use std::io::SeekFrom;

use serde_json::{Value, json};
use tracing::debug;

use crate::error::UploadError;
use crate::policy;
use crate::source::ContentSource;
use crate::ticket::Ticket;
use crate::transport::{ApiResponse, VideoHost};

/// TUS protocol version declared on every chunk request.
const TUS_VERSION: &str = "1.0.0";

/// Content type for chunk bodies.
const CHUNK_CONTENT_TYPE: &str = "application/offset+octet-stream";

/// Resource-creation endpoint, shared by push and pull mode.
const VIDEOS_PATH: &str = "/videos";

/// Optional knobs for a push-mode upload.
#[derive(Debug, Default, Clone)]
pub struct UploadOptions {
    /// Video name; falls back to the source's display name.
    pub name: Option<String>,

    /// Optional video description.
    pub description: Option<String>,

    /// Overrides the size-derived chunk-size policy. `Some(0)` falls back
    /// to the policy; a zero-byte chunk could never advance the offset.
    pub chunk_size: Option<u64>,
}

/// Uploads videos to a host over the TUS resumable protocol.
///
/// Holds only the transport; the content source and ticket are threaded
/// through each call, so concurrent uploads through one `Uploader` cannot
/// interfere with each other.
pub struct Uploader<'a> {
    host: &'a dyn VideoHost,
}

impl<'a> Uploader<'a> {
    pub fn new(host: &'a dyn VideoHost) -> Self {
        Self { host }
    }

    /// Uploads `source` in push mode.
    ///
    /// Negotiates an upload ticket, then transfers the content in sequential
    /// chunks until the server has acknowledged every byte. Returns the
    /// ticket so the caller can read the video URI and other metadata.
    pub async fn upload(
        &self,
        source: &mut dyn ContentSource,
        options: &UploadOptions,
    ) -> Result<Ticket, UploadError> {
        let ticket = self.create_video(source, options).await?;
        let chunk_size = match options.chunk_size {
            Some(size) if size > 0 => size,
            _ => policy::chunk_size_for(source.len()),
        };
        self.push_chunks(source, &ticket, chunk_size).await?;
        Ok(ticket)
    }

    /// Asks the host to fetch the video itself from `link` (pull mode).
    ///
    /// A blank `name` falls back to the source's display name. `extra` keys
    /// are merged into the request body last, so callers may override any
    /// top-level field, `upload` included. Returns the response body
    /// verbatim. One request; no chunking, no offset tracking.
    pub async fn pull(
        &self,
        name: &str,
        link: &str,
        source: &dyn ContentSource,
        extra: serde_json::Map<String, Value>,
    ) -> Result<Value, UploadError> {
        let name = if name.trim().is_empty() {
            source.display_name()
        } else {
            name
        };
        let mut body = json!({
            "upload": { "approach": "pull", "link": link },
            "name": name,
        });
        if let Value::Object(map) = &mut body {
            for (key, value) in extra {
                map.insert(key, value);
            }
        }

        let resp = self.host.post(VIDEOS_PATH, &body).await?;
        if resp.status != 201 {
            return Err(UploadError::Negotiation {
                status: resp.status,
                body: resp.body_text(),
            });
        }
        debug!(link, "pull upload created");
        resp.json().map_err(UploadError::BadPullResponse)
    }

    /// Creates the video resource and returns the upload ticket.
    ///
    /// Not retried on failure: resource creation is not idempotent, and a
    /// blind retry could create duplicate videos.
    async fn create_video(
        &self,
        source: &dyn ContentSource,
        options: &UploadOptions,
    ) -> Result<Ticket, UploadError> {
        let name = options
            .name
            .as_deref()
            .unwrap_or_else(|| source.display_name());
        let mut body = json!({
            "name": name,
            "upload": {
                "approach": "tus",
                "size": source.len().to_string(),
            },
        });
        if let Some(description) = &options.description {
            body["description"] = Value::String(description.clone());
        }

        let resp = self.host.post(VIDEOS_PATH, &body).await?;
        if resp.status != 200 {
            return Err(UploadError::Negotiation {
                status: resp.status,
                body: resp.body_text(),
            });
        }
        debug!(size = source.len(), "upload ticket created");
        Ok(serde_json::from_slice(&resp.body)?)
    }

    /// Transfers the content to the ticket's upload endpoint.
    ///
    /// Post-condition loop: the body always runs at least once, so a
    /// zero-length source still issues exactly one (empty) chunk request —
    /// the server needs at least one `PATCH` to mark the upload complete.
    ///
    /// The server's `Upload-Offset` response header is the authoritative new
    /// offset, not `offset + bytes_sent`: a partial server-side write
    /// acknowledges fewer bytes than were sent, and the next chunk restarts
    /// from the acknowledged position.
    async fn push_chunks(
        &self,
        source: &mut dyn ContentSource,
        ticket: &Ticket,
        chunk_size: u64,
    ) -> Result<(), UploadError> {
        let upload_link = ticket
            .upload
            .upload_link
            .as_deref()
            .ok_or(UploadError::MissingUploadLink)?;
        let total = source.len();
        let mut offset: u64 = 0;

        loop {
            source.seek(SeekFrom::Start(offset))?;
            let want = chunk_size.min(total.saturating_sub(offset));
            let mut chunk = vec![0u8; want as usize];
            source.read_exact(&mut chunk)?;

            let headers = vec![
                ("Content-Type".to_string(), CHUNK_CONTENT_TYPE.to_string()),
                ("Tus-Resumable".to_string(), TUS_VERSION.to_string()),
                ("Upload-Offset".to_string(), offset.to_string()),
            ];
            let sent = chunk.len();
            let resp = self.host.patch(upload_link, &headers, chunk).await?;
            if resp.status != 204 {
                return Err(UploadError::ChunkTransfer {
                    status: resp.status,
                    body: resp.body_text(),
                });
            }

            let acked = acknowledged_offset(&resp, offset, sent, total)?;
            debug!(offset, sent, acked, total, "chunk acknowledged");
            offset = acked;

            if offset >= total {
                break;
            }
        }
        Ok(())
    }
}

/// Reads and validates the server's acknowledged offset.
///
/// The offset must stay within `previous..=total`: a value above the total
/// or below the previous offset means the server and client disagree about
/// the transfer, and continuing would corrupt the upload. An acknowledgment
/// with no forward progress after a non-empty chunk would loop forever, so
/// it is rejected as well.
fn acknowledged_offset(
    resp: &ApiResponse,
    previous: u64,
    sent: usize,
    total: u64,
) -> Result<u64, UploadError> {
    let raw = resp
        .headers
        .get("upload-offset")
        .ok_or_else(|| UploadError::BadOffset("missing Upload-Offset response header".into()))?;
    let acked: u64 = raw
        .parse()
        .map_err(|_| UploadError::BadOffset(format!("unparseable Upload-Offset {raw:?}")))?;

    if acked > total {
        return Err(UploadError::BadOffset(format!(
            "acknowledged {acked} exceeds total size {total}"
        )));
    }
    if acked < previous {
        return Err(UploadError::BadOffset(format!(
            "acknowledged {acked} regressed below {previous}"
        )));
    }
    if acked == previous && sent > 0 {
        return Err(UploadError::BadOffset(format!(
            "no progress: still at {acked} after sending {sent} bytes"
        )));
    }
    Ok(acked)
}
