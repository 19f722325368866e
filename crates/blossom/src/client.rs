//! The upload client
//!
//! One call: hash the bytes, sign an authorization event, `PUT` the raw body
//! (no multipart) to `{server}/upload`, and parse the returned blob
//! descriptor. The body streams in chunks so progress can be reported while
//! the transfer is in flight.

use crate::auth::{authorization_header, sha256_hex, upload_auth_template};
use crate::descriptor::BlobDescriptor;
use crate::error::{Result, UploadError};
use crate::progress::{ProgressFn, ProgressReporter};
use bytes::Bytes;
use nostr_client::{CancelToken, Signer};
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE};
use std::time::{Duration, SystemTime, UNIX_EPOCH};
use tracing::{debug, info, warn};
use url::Url;

/// Default upload deadline (5 minutes)
pub const DEFAULT_UPLOAD_TIMEOUT: Duration = Duration::from_secs(300);
/// Caller-tunable deadline bounds
pub const MIN_UPLOAD_TIMEOUT: Duration = Duration::from_secs(60);
pub const MAX_UPLOAD_TIMEOUT: Duration = Duration::from_secs(600);

const CHUNK_SIZE: usize = 64 * 1024;

/// Options applied to a single upload.
#[derive(Clone, Default)]
pub struct UploadOptions {
    /// Deadline for the whole upload; `None` uses the default, values outside
    /// the tunable bounds are clamped
    pub timeout: Option<Duration>,
    /// Progress callback receiving whole-number percentages
    pub on_progress: Option<ProgressFn>,
    /// Optional caller token; cancellation maps to `UploadError::Aborted`
    pub cancel: Option<CancelToken>,
}

impl UploadOptions {
    fn effective_timeout(&self) -> Duration {
        self.timeout
            .unwrap_or(DEFAULT_UPLOAD_TIMEOUT)
            .clamp(MIN_UPLOAD_TIMEOUT, MAX_UPLOAD_TIMEOUT)
    }
}

/// Client for one Blossom server.
#[derive(Clone)]
pub struct BlossomClient {
    server: Url,
    http: reqwest::Client,
}

impl BlossomClient {
    pub fn new(server: Url) -> Self {
        Self {
            server,
            http: reqwest::Client::new(),
        }
    }

    pub fn server(&self) -> &Url {
        &self.server
    }

    /// Upload a blob, returning the server's descriptor.
    ///
    /// The digest the server reports is cross-checked against the local one;
    /// a mismatch is logged as a warning but the upload still resolves, since
    /// the blob is already stored under the server's digest.
    pub async fn upload(
        &self,
        signer: &dyn Signer,
        data: Vec<u8>,
        mime: &str,
        file_name: &str,
        options: &UploadOptions,
    ) -> Result<BlobDescriptor> {
        let sha256 = sha256_hex(&data);
        let size = data.len() as u64;
        debug!(file_name, size, sha256 = %sha256, "starting upload");

        let now = unix_now();
        let auth_event = signer
            .sign(upload_auth_template(file_name, &sha256, now))
            .await?;
        let header = authorization_header(&auth_event)?;

        let upload_url = self.server.join("upload")?;
        let mime = if mime.is_empty() {
            "application/octet-stream"
        } else {
            mime
        };

        let reporter = ProgressReporter::new(size, options.on_progress.clone());
        let body = chunked_body(data, reporter.clone());

        let timeout = options.effective_timeout();
        let request = self
            .http
            .put(upload_url)
            .header(AUTHORIZATION, header)
            .header(CONTENT_TYPE, mime)
            .body(body);

        let work = async {
            let response = request.send().await.map_err(|e| map_reqwest(e, timeout))?;
            let status = response.status().as_u16();
            if let Some(err) = map_status(status) {
                warn!(status, "upload rejected");
                return Err(err);
            }
            response.text().await.map_err(|e| map_reqwest(e, timeout))
        };

        let body_text = match &options.cancel {
            Some(token) => {
                tokio::select! {
                    biased;
                    _ = token.cancelled() => return Err(UploadError::Aborted),
                    result = tokio::time::timeout(timeout, work) => {
                        result.map_err(|_| UploadError::Timeout(timeout))?
                    }
                }
            }
            None => tokio::time::timeout(timeout, work)
                .await
                .map_err(|_| UploadError::Timeout(timeout))?,
        }?;

        let descriptor = BlobDescriptor::from_json(&body_text)?;
        if descriptor.sha256 != sha256 {
            warn!(
                expected = %sha256,
                got = %descriptor.sha256,
                "server returned different hash"
            );
        }

        reporter.finish();
        info!(url = %descriptor.url, size = descriptor.size, "upload complete");
        Ok(descriptor)
    }
}

/// Map an HTTP status to an upload error; `None` for success statuses.
fn map_status(status: u16) -> Option<UploadError> {
    match status {
        200..=299 => None,
        413 => Some(UploadError::TooLarge),
        400 => Some(UploadError::BadRequest),
        401 | 403 => Some(UploadError::Unauthorized),
        other => Some(UploadError::Status(other)),
    }
}

fn map_reqwest(err: reqwest::Error, timeout: Duration) -> UploadError {
    if err.is_timeout() {
        UploadError::Timeout(timeout)
    } else {
        UploadError::Network(err.to_string())
    }
}

fn chunked_body(data: Vec<u8>, reporter: ProgressReporter) -> reqwest::Body {
    let chunks: Vec<Bytes> = data.chunks(CHUNK_SIZE).map(Bytes::copy_from_slice).collect();
    let stream = futures::stream::iter(chunks.into_iter().map(move |chunk| {
        reporter.record(chunk.len() as u64);
        Ok::<Bytes, std::io::Error>(chunk)
    }));
    reqwest::Body::wrap_stream(stream)
}

fn unix_now() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_map_status() {
        assert!(map_status(200).is_none());
        assert!(map_status(201).is_none());
        assert!(matches!(map_status(413), Some(UploadError::TooLarge)));
        assert!(matches!(map_status(400), Some(UploadError::BadRequest)));
        assert!(matches!(map_status(401), Some(UploadError::Unauthorized)));
        assert!(matches!(map_status(403), Some(UploadError::Unauthorized)));
        assert!(matches!(map_status(500), Some(UploadError::Status(500))));
    }

    #[test]
    fn test_effective_timeout_clamped() {
        let default = UploadOptions::default();
        assert_eq!(default.effective_timeout(), DEFAULT_UPLOAD_TIMEOUT);

        let short = UploadOptions {
            timeout: Some(Duration::from_secs(1)),
            ..Default::default()
        };
        assert_eq!(short.effective_timeout(), MIN_UPLOAD_TIMEOUT);

        let long = UploadOptions {
            timeout: Some(Duration::from_secs(3600)),
            ..Default::default()
        };
        assert_eq!(long.effective_timeout(), MAX_UPLOAD_TIMEOUT);
    }

    #[test]
    fn test_upload_url_join() {
        let client = BlossomClient::new(Url::parse("https://blossom.primal.net/").unwrap());
        let joined = client.server.join("upload").unwrap();
        assert_eq!(joined.as_str(), "https://blossom.primal.net/upload");
    }

    mod upload {
        use super::*;
        use async_trait::async_trait;
        use nostr_core::{Event, EventTemplate, get_event_hash};
        use std::sync::{Arc, Mutex};
        use tokio::io::{AsyncReadExt, AsyncWriteExt};

        struct StubSigner;

        #[async_trait]
        impl Signer for StubSigner {
            fn pubkey(&self) -> String {
                "uploader".to_string()
            }

            async fn sign(&self, template: EventTemplate) -> nostr_client::Result<Event> {
                let unsigned = template.into_unsigned(self.pubkey());
                let id = get_event_hash(&unsigned)?;
                Ok(Event {
                    id,
                    pubkey: unsigned.pubkey,
                    created_at: unsigned.created_at,
                    kind: unsigned.kind,
                    tags: unsigned.tags,
                    content: unsigned.content,
                    sig: "test-signature".to_string(),
                })
            }
        }

        /// One-shot HTTP server: drains the chunked request body, replies with
        /// a canned status and body, and returns the base URL to hit.
        async fn serve_once(status_line: &'static str, body: &'static str) -> Url {
            let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
            let addr = listener.local_addr().unwrap();
            tokio::spawn(async move {
                let (mut socket, _) = listener.accept().await.unwrap();
                let mut request = Vec::new();
                let mut buf = [0u8; 4096];
                loop {
                    let n = socket.read(&mut buf).await.unwrap();
                    if n == 0 {
                        break;
                    }
                    request.extend_from_slice(&buf[..n]);
                    // Last chunk of a chunked body
                    if request.windows(5).any(|w| w == b"0\r\n\r\n") {
                        break;
                    }
                }
                let response = format!(
                    "HTTP/1.1 {status_line}\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{body}",
                    body.len()
                );
                socket.write_all(response.as_bytes()).await.unwrap();
                let _ = socket.shutdown().await;
            });
            Url::parse(&format!("http://{addr}/")).unwrap()
        }

        #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
        async fn test_digest_mismatch_still_resolves() {
            // The server reports a different hash than the uploaded bytes.
            let server = serve_once(
                "200 OK",
                r#"{"url":"http://example.com/deadbeef","sha256":"deadbeef","size":5,"type":"video/mp4"}"#,
            )
            .await;
            let client = BlossomClient::new(server);

            let progress: Arc<Mutex<Vec<u8>>> = Arc::new(Mutex::new(Vec::new()));
            let seen = progress.clone();
            let options = UploadOptions {
                on_progress: Some(Arc::new(move |pct| {
                    if let Ok(mut seen) = seen.lock() {
                        seen.push(pct);
                    }
                })),
                ..Default::default()
            };

            let descriptor = client
                .upload(&StubSigner, b"hello".to_vec(), "video/mp4", "vlog.mp4", &options)
                .await
                .unwrap();

            // The server's descriptor wins despite the mismatch.
            assert_eq!(descriptor.sha256, "deadbeef");
            assert_eq!(descriptor.url, "http://example.com/deadbeef");

            // Progress is monotonic and terminates at 100.
            let seen = progress.lock().unwrap().clone();
            assert_eq!(seen.last(), Some(&100));
            assert!(seen.windows(2).all(|w| w[0] < w[1]));
        }

        #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
        async fn test_413_maps_to_too_large() {
            let server = serve_once("413 Payload Too Large", "").await;
            let client = BlossomClient::new(server);

            let result = client
                .upload(&StubSigner, vec![0u8; 16], "video/mp4", "big.mp4", &UploadOptions::default())
                .await;
            assert!(matches!(result, Err(UploadError::TooLarge)));
        }

        #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
        async fn test_unusable_descriptor_is_rejected() {
            let server = serve_once("200 OK", r#"{"sha256":"","url":""}"#).await;
            let client = BlossomClient::new(server);

            let result = client
                .upload(&StubSigner, b"hi".to_vec(), "text/plain", "a.txt", &UploadOptions::default())
                .await;
            assert!(matches!(result, Err(UploadError::InvalidDescriptor(_))));
        }
    }
}
