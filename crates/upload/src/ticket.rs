//! Upload ticket returned by the resource-creation endpoint.

use serde::Deserialize;
use serde_json::Value;

/// Server-issued descriptor of how an upload will proceed.
///
/// Deserialized from the `POST /videos` response body. Fields the engine
/// does not interpret are retained in `extra`, so the caller receives the
/// response intact (the ticket usually carries the video `uri`, `link` and
/// player metadata alongside the upload block).
#[derive(Debug, Clone, Deserialize)]
pub struct Ticket {
    pub upload: TicketUpload,

    #[serde(flatten)]
    pub extra: serde_json::Map<String, Value>,
}

/// The `upload` object inside a ticket.
#[derive(Debug, Clone, Deserialize)]
pub struct TicketUpload {
    /// `"tus"` for push mode, `"pull"` for a server-side fetch.
    pub approach: String,

    /// Absolute URL that chunks are `PATCH`ed to. Push mode only.
    #[serde(default)]
    pub upload_link: Option<String>,

    #[serde(flatten)]
    pub extra: serde_json::Map<String, Value>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_push_ticket() {
        let body = r#"{
            "uri": "/videos/1234",
            "name": "clip.mp4",
            "upload": {
                "approach": "tus",
                "size": 10,
                "upload_link": "https://files.example.com/upload/abc"
            }
        }"#;
        let ticket: Ticket = serde_json::from_str(body).unwrap();
        assert_eq!(ticket.upload.approach, "tus");
        assert_eq!(
            ticket.upload.upload_link.as_deref(),
            Some("https://files.example.com/upload/abc")
        );
        assert_eq!(ticket.extra["uri"], "/videos/1234");
        assert_eq!(ticket.upload.extra["size"], 10);
    }

    #[test]
    fn upload_link_is_optional() {
        let body = r#"{"upload": {"approach": "pull"}}"#;
        let ticket: Ticket = serde_json::from_str(body).unwrap();
        assert_eq!(ticket.upload.approach, "pull");
        assert!(ticket.upload.upload_link.is_none());
    }

    #[test]
    fn missing_upload_block_is_an_error() {
        let body = r#"{"uri": "/videos/1234"}"#;
        assert!(serde_json::from_str::<Ticket>(body).is_err());
    }
}
