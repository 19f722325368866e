//! Media uploads
//!
//! Bridges the Blossom client into the app: uploads go to the configured
//! server, are authorized by the session signer, and come back as the media
//! variant a video event embeds. Dimensions and thumbnail are filled in by
//! the caller, which knows the encoded file; the server only vouches for the
//! bytes.

use crate::session::Session;
use blossom::{BlobDescriptor, BlossomClient, Result, UploadOptions};
use nostr_core::VideoMeta;
use tracing::info;

/// Upload entry point for the signed-in user.
#[derive(Clone)]
pub struct UploadService {
    session: Session,
    blossom: BlossomClient,
}

impl UploadService {
    pub fn new(session: Session) -> Self {
        let blossom = BlossomClient::new(session.config.blossom_server.clone());
        Self { session, blossom }
    }

    /// Upload a media file and return the variant to embed in a video event.
    pub async fn upload(
        &self,
        data: Vec<u8>,
        mime: &str,
        file_name: &str,
        options: &UploadOptions,
    ) -> Result<VideoMeta> {
        let signer = self.session.require_signer()?;
        let descriptor = self
            .blossom
            .upload(signer.as_ref(), data, mime, file_name, options)
            .await?;
        info!(url = %descriptor.url, "media uploaded");
        Ok(media_from_descriptor(descriptor, mime))
    }
}

/// Build the imeta-ready media variant from a server descriptor.
pub fn media_from_descriptor(descriptor: BlobDescriptor, fallback_mime: &str) -> VideoMeta {
    let mime_type = descriptor
        .mime_type
        .filter(|m| !m.is_empty())
        .or_else(|| Some(fallback_mime.to_string()))
        .filter(|m| !m.is_empty());
    VideoMeta {
        url: Some(descriptor.url),
        hash: Some(descriptor.sha256),
        mime_type,
        dimensions: None,
        image: None,
        service: Some("blossom".to_string()),
    }
}
