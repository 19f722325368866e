//! NIP-71: Video Events
//!
//! Kind 21 (normal, typically horizontal/long-form) and kind 22 (short,
//! typically vertical) video posts. The video itself lives on a media server;
//! the event carries one or more `imeta` tags describing each available
//! variant (url, hash, mime type, dimensions, preview image), plus title,
//! duration, and optional editorial tags (content warning, participants,
//! reference links, chapter segments).
//!
//! `imeta` tag values are space-separated `key value` pairs, one variant per
//! tag, matching NIP-92.
//!
//! See: <https://github.com/nostr-protocol/nips/blob/master/71.md>

use crate::nip01::{Event, KIND_SHORT_VIDEO, KIND_VIDEO};
use thiserror::Error;

/// Event kind for normal (long-form) video posts
pub const VIDEO_KIND: u16 = KIND_VIDEO;

/// Event kind for short-form video posts
pub const SHORT_VIDEO_KIND: u16 = KIND_SHORT_VIDEO;

/// Errors that can occur during NIP-71 operations
#[derive(Debug, Error)]
pub enum Nip71Error {
    #[error("invalid event kind: expected 21 or 22, got {0}")]
    InvalidKind(u16),

    #[error("video event has no imeta variant")]
    MissingMedia,

    #[error("invalid segment tag: {0}")]
    InvalidSegment(String),
}

/// Check whether a kind is one of the video kinds.
pub fn is_video_kind(kind: u16) -> bool {
    kind == VIDEO_KIND || kind == SHORT_VIDEO_KIND
}

/// One media variant of a video, parsed from an `imeta` tag.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VideoMeta {
    /// Media URL
    pub url: Option<String>,
    /// SHA-256 of the media file (the `x` field)
    pub hash: Option<String>,
    /// MIME type (the `m` field)
    pub mime_type: Option<String>,
    /// `<width>x<height>` (the `dim` field)
    pub dimensions: Option<String>,
    /// Preview image URL
    pub image: Option<String>,
    /// Hosting service hint (e.g. "blossom")
    pub service: Option<String>,
}

impl VideoMeta {
    /// Parse one `imeta` tag (`["imeta", "url https://…", "m video/mp4", …]`).
    pub fn from_imeta_tag(tag: &[String]) -> Self {
        let mut meta = Self::default();
        for item in tag.iter().skip(1) {
            if let Some((key, value)) = item.split_once(' ') {
                match key {
                    "url" => meta.url = Some(value.to_string()),
                    "x" => meta.hash = Some(value.to_string()),
                    "m" => meta.mime_type = Some(value.to_string()),
                    "dim" => meta.dimensions = Some(value.to_string()),
                    "image" => meta.image = Some(value.to_string()),
                    "service" => meta.service = Some(value.to_string()),
                    // Unknown imeta fields are ignored
                    _ => {}
                }
            }
        }
        meta
    }

    /// Render as an `imeta` tag, in the field order the publisher emits:
    /// dim, url, x, m, image, service.
    pub fn to_imeta_tag(&self) -> Vec<String> {
        let mut tag = vec!["imeta".to_string()];
        if let Some(dim) = &self.dimensions {
            tag.push(format!("dim {}", dim));
        }
        if let Some(url) = &self.url {
            tag.push(format!("url {}", url));
        }
        if let Some(hash) = &self.hash {
            tag.push(format!("x {}", hash));
        }
        if let Some(mime) = &self.mime_type {
            tag.push(format!("m {}", mime));
        }
        if let Some(image) = &self.image {
            tag.push(format!("image {}", image));
        }
        if let Some(service) = &self.service {
            tag.push(format!("service {}", service));
        }
        tag
    }
}

/// A chapter/segment marker inside a video.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Segment {
    /// Start position, `HH:MM:SS.sss` or seconds
    pub start: String,
    /// End position
    pub end: String,
    /// Segment title
    pub title: String,
    /// Optional thumbnail URL for the segment
    pub thumbnail: Option<String>,
}

impl Segment {
    pub fn to_tag(&self) -> Vec<String> {
        let mut tag = vec![
            "segment".to_string(),
            self.start.clone(),
            self.end.clone(),
            self.title.clone(),
        ];
        if let Some(thumbnail) = &self.thumbnail {
            tag.push(thumbnail.clone());
        }
        tag
    }

    fn from_tag(tag: &[String]) -> Result<Self, Nip71Error> {
        if tag.len() < 4 {
            return Err(Nip71Error::InvalidSegment(tag.join(" ")));
        }
        Ok(Self {
            start: tag[1].clone(),
            end: tag[2].clone(),
            title: tag[3].clone(),
            thumbnail: tag.get(4).cloned(),
        })
    }
}

/// A parsed video event (kind 21 or 22).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VideoEvent {
    pub event: Event,
    pub title: Option<String>,
    /// Duration in seconds
    pub duration: Option<u64>,
    pub published_at: Option<u64>,
    pub alt: Option<String>,
    pub content_warning: Option<String>,
    pub hashtags: Vec<String>,
    /// Tagged participants: (pubkey, optional relay)
    pub participants: Vec<(String, Option<String>)>,
    pub reference_links: Vec<String>,
    pub segments: Vec<Segment>,
    pub variants: Vec<VideoMeta>,
}

impl VideoEvent {
    pub fn from_event(event: Event) -> Result<Self, Nip71Error> {
        if !is_video_kind(event.kind) {
            return Err(Nip71Error::InvalidKind(event.kind));
        }

        let mut video = Self {
            title: None,
            duration: None,
            published_at: None,
            alt: None,
            content_warning: None,
            hashtags: Vec::new(),
            participants: Vec::new(),
            reference_links: Vec::new(),
            segments: Vec::new(),
            variants: Vec::new(),
            event,
        };

        for tag in &video.event.tags {
            let Some(name) = tag.first() else { continue };
            match name.as_str() {
                "title" if tag.len() >= 2 => video.title = Some(tag[1].clone()),
                "duration" if tag.len() >= 2 => video.duration = tag[1].parse().ok(),
                "published_at" if tag.len() >= 2 => video.published_at = tag[1].parse().ok(),
                "alt" if tag.len() >= 2 => video.alt = Some(tag[1].clone()),
                "content-warning" if tag.len() >= 2 => {
                    video.content_warning = Some(tag[1].clone())
                }
                "t" if tag.len() >= 2 => video.hashtags.push(tag[1].clone()),
                "p" if tag.len() >= 2 => video
                    .participants
                    .push((tag[1].clone(), tag.get(2).cloned())),
                "r" if tag.len() >= 2 => video.reference_links.push(tag[1].clone()),
                "segment" => video.segments.push(Segment::from_tag(tag)?),
                "imeta" => video.variants.push(VideoMeta::from_imeta_tag(tag)),
                _ => {}
            }
        }

        Ok(video)
    }

    /// Whether this is a short-form (kind 22) video.
    pub fn is_short(&self) -> bool {
        self.event.kind == SHORT_VIDEO_KIND
    }

    /// URL of the first media variant, the one clients play by default.
    pub fn video_url(&self) -> Option<&str> {
        self.variants.first().and_then(|m| m.url.as_deref())
    }

    /// Preview image of the first media variant.
    pub fn thumbnail(&self) -> Option<&str> {
        self.variants.first().and_then(|m| m.image.as_deref())
    }

    /// The free-text description (event content).
    pub fn description(&self) -> &str {
        &self.event.content
    }
}

/// Extract `#word` hashtags from a description, lowercased and deduplicated,
/// preserving first-seen order.
pub fn extract_hashtags(description: &str) -> Vec<String> {
    let mut seen = Vec::new();
    let mut chars = description.char_indices().peekable();
    while let Some((i, c)) = chars.next() {
        if c != '#' {
            continue;
        }
        let rest = &description[i + 1..];
        let word: String = rest
            .chars()
            .take_while(|c| c.is_alphanumeric() || *c == '_')
            .collect();
        if !word.is_empty() {
            let word = word.to_lowercase();
            if !seen.contains(&word) {
                seen.push(word);
            }
        }
    }
    seen
}
