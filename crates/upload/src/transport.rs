//! Transport boundary between the upload logic and the HTTP layer.
//!
//! [`VideoHost`] is implemented by `vidpush-client` on top of `reqwest`.
//! Using a trait keeps upload logic decoupled from HTTP and testable with
//! mocks.

use std::collections::HashMap;
use std::future::Future;
use std::pin::Pin;

use crate::error::UploadError;

/// One HTTP response, reduced to what the upload logic needs.
#[derive(Debug, Clone)]
pub struct ApiResponse {
    pub status: u16,
    /// Response headers, keyed by lowercased name.
    pub headers: HashMap<String, String>,
    pub body: Vec<u8>,
}

impl ApiResponse {
    /// Parses the body as JSON.
    pub fn json(&self) -> Result<serde_json::Value, serde_json::Error> {
        serde_json::from_slice(&self.body)
    }

    /// Returns the body as lossy UTF-8, for error reporting.
    pub fn body_text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }
}

/// Abstract connection to the video hosting service.
///
/// Implementations return the response for *any* status code — deciding
/// which statuses are acceptable is upload logic, not transport. Transport
/// failures (connect, TLS, timeout) map to [`UploadError::Transport`].
pub trait VideoHost: Send + Sync {
    /// Sends a JSON `POST` to a service-relative path (e.g. `/videos`).
    fn post(
        &self,
        path: &str,
        body: &serde_json::Value,
    ) -> Pin<Box<dyn Future<Output = Result<ApiResponse, UploadError>> + Send + '_>>;

    /// Sends a raw-binary `PATCH` to an absolute URL with the given headers.
    fn patch(
        &self,
        url: &str,
        headers: &[(String, String)],
        body: Vec<u8>,
    ) -> Pin<Box<dyn Future<Output = Result<ApiResponse, UploadError>> + Send + '_>>;
}

#[cfg(test)]
pub(crate) mod mock {
    //! Scripted [`VideoHost`] used by engine tests.

    use std::sync::Mutex;

    use super::*;

    /// A request recorded by [`MockHost`].
    #[derive(Debug, Clone)]
    pub(crate) enum Recorded {
        Post {
            path: String,
            body: serde_json::Value,
        },
        Patch {
            url: String,
            headers: Vec<(String, String)>,
            body: Vec<u8>,
        },
    }

    impl Recorded {
        /// Returns the request header with the given name (PATCH only).
        pub(crate) fn header(&self, name: &str) -> Option<&str> {
            match self {
                Recorded::Patch { headers, .. } => headers
                    .iter()
                    .find(|(k, _)| k.eq_ignore_ascii_case(name))
                    .map(|(_, v)| v.as_str()),
                Recorded::Post { .. } => None,
            }
        }
    }

    /// Pops one canned response per request and records everything sent.
    pub(crate) struct MockHost {
        responses: Mutex<Vec<ApiResponse>>,
        pub(crate) requests: Mutex<Vec<Recorded>>,
    }

    impl MockHost {
        pub(crate) fn new(responses: Vec<ApiResponse>) -> Self {
            Self {
                responses: Mutex::new(responses),
                requests: Mutex::new(Vec::new()),
            }
        }

        /// A 200 response with the given JSON body.
        pub(crate) fn created(body: &str) -> ApiResponse {
            ApiResponse {
                status: 200,
                headers: HashMap::new(),
                body: body.as_bytes().to_vec(),
            }
        }

        /// A 204 chunk acknowledgment carrying `Upload-Offset: <offset>`.
        pub(crate) fn ack(offset: u64) -> ApiResponse {
            let mut headers = HashMap::new();
            headers.insert("upload-offset".to_string(), offset.to_string());
            ApiResponse {
                status: 204,
                headers,
                body: Vec::new(),
            }
        }

        /// An arbitrary-status response with no headers.
        pub(crate) fn status(status: u16, body: &str) -> ApiResponse {
            ApiResponse {
                status,
                headers: HashMap::new(),
                body: body.as_bytes().to_vec(),
            }
        }

        pub(crate) fn recorded(&self) -> Vec<Recorded> {
            self.requests.lock().unwrap().clone()
        }

        fn next(&self) -> ApiResponse {
            let mut responses = self.responses.lock().unwrap();
            assert!(
                !responses.is_empty(),
                "mock host ran out of scripted responses"
            );
            responses.remove(0)
        }
    }

    impl VideoHost for MockHost {
        fn post(
            &self,
            path: &str,
            body: &serde_json::Value,
        ) -> Pin<Box<dyn Future<Output = Result<ApiResponse, UploadError>> + Send + '_>> {
            self.requests.lock().unwrap().push(Recorded::Post {
                path: path.to_string(),
                body: body.clone(),
            });
            let resp = self.next();
            Box::pin(async move { Ok(resp) })
        }

        fn patch(
            &self,
            url: &str,
            headers: &[(String, String)],
            body: Vec<u8>,
        ) -> Pin<Box<dyn Future<Output = Result<ApiResponse, UploadError>> + Send + '_>> {
            self.requests.lock().unwrap().push(Recorded::Patch {
                url: url.to_string(),
                headers: headers.to_vec(),
                body,
            });
            let resp = self.next();
            Box::pin(async move { Ok(resp) })
        }
    }
}
