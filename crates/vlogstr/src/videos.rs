//! Video feed, publishing, and deletion
//!
//! Feeds are bounded queries with client-side newest-first ordering; there is
//! no cursor pagination, just a hard cap. Publishing builds the full NIP-71
//! tag set, including a single `imeta` variant for the uploaded blob and
//! hashtags lifted from the description. Deletion publishes a NIP-09 request;
//! the video is immutable and never edited in place.

use crate::notify::Toast;
use crate::session::Session;
use nostr_client::{CacheKey, Filter, Result};
use nostr_core::{
    Event, EventTemplate, KIND_SHORT_VIDEO, KIND_VIDEO, Segment, VideoEvent, VideoMeta,
    create_deletion_tags, extract_hashtags, sort_events,
};
use std::time::Duration;
use tracing::info;

/// A video ready to publish.
#[derive(Debug, Clone)]
pub struct NewVideo {
    /// 21 for long-form, 22 for shorts
    pub kind: u16,
    pub title: String,
    /// Free-text description; becomes the event content, the alt text, and
    /// the hashtag source
    pub description: String,
    pub duration_secs: Option<u64>,
    pub content_warning: Option<String>,
    /// Tagged participants: (pubkey, optional relay)
    pub participants: Vec<(String, Option<String>)>,
    pub reference_links: Vec<String>,
    pub segments: Vec<Segment>,
    /// The uploaded media variant
    pub media: VideoMeta,
}

impl NewVideo {
    pub fn long_form(title: impl Into<String>, description: impl Into<String>, media: VideoMeta) -> Self {
        Self {
            kind: KIND_VIDEO,
            title: title.into(),
            description: description.into(),
            duration_secs: None,
            content_warning: None,
            participants: Vec::new(),
            reference_links: Vec::new(),
            segments: Vec::new(),
            media,
        }
    }

    pub fn short(title: impl Into<String>, description: impl Into<String>, media: VideoMeta) -> Self {
        Self {
            kind: KIND_SHORT_VIDEO,
            ..Self::long_form(title, description, media)
        }
    }
}

/// Build the publish tag set for a new video.
///
/// Tag order: title, published_at, duration, alt, content-warning,
/// participants, reference links, segments, imeta, hashtags.
pub fn build_video_tags(video: &NewVideo, now: u64) -> Vec<Vec<String>> {
    let mut tags = vec![
        vec!["title".to_string(), video.title.clone()],
        vec!["published_at".to_string(), now.to_string()],
    ];

    if let Some(duration) = video.duration_secs
        && duration > 0
    {
        tags.push(vec!["duration".to_string(), duration.to_string()]);
    }

    if !video.description.is_empty() {
        // First 200 chars of the description double as alt text
        let alt: String = video.description.chars().take(200).collect();
        tags.push(vec!["alt".to_string(), alt]);
    }

    if let Some(warning) = &video.content_warning {
        let warning = warning.trim();
        if !warning.is_empty() {
            tags.push(vec!["content-warning".to_string(), warning.to_string()]);
        }
    }

    for (pubkey, relay) in &video.participants {
        let pubkey = pubkey.trim();
        if pubkey.is_empty() {
            continue;
        }
        match relay.as_deref().map(str::trim).filter(|r| !r.is_empty()) {
            Some(relay) => tags.push(vec![
                "p".to_string(),
                pubkey.to_string(),
                relay.to_string(),
            ]),
            None => tags.push(vec!["p".to_string(), pubkey.to_string()]),
        }
    }

    for link in &video.reference_links {
        let link = link.trim();
        if !link.is_empty() {
            tags.push(vec!["r".to_string(), link.to_string()]);
        }
    }

    for segment in &video.segments {
        tags.push(segment.to_tag());
    }

    tags.push(video.media.to_imeta_tag());

    for hashtag in extract_hashtags(&video.description) {
        tags.push(vec!["t".to_string(), hashtag]);
    }

    tags
}

/// Video queries and mutations.
#[derive(Clone)]
pub struct VideoService {
    session: Session,
}

impl VideoService {
    pub fn new(session: Session) -> Self {
        Self { session }
    }

    fn feed_key() -> CacheKey {
        CacheKey::new(["videos"])
    }

    fn user_key(pubkey: &str) -> CacheKey {
        CacheKey::new(["user-videos", pubkey])
    }

    /// The home feed: newest videos of both kinds, hard-capped.
    pub async fn feed(&self) -> Result<Vec<VideoEvent>> {
        let session = &self.session;
        let limit = session.config.feed_limit;
        let events = session
            .cache
            .get_or_fetch(&Self::feed_key(), session.config.feed_staleness, || async {
                let mut events = session
                    .query(
                        vec![Filter::new()
                            .kinds(vec![KIND_VIDEO, KIND_SHORT_VIDEO])
                            .limit(limit)],
                        session.config.short_timeout,
                    )
                    .await?;
                sort_events(&mut events);
                Ok(events)
            })
            .await?;
        Ok(parse_videos(events))
    }

    /// All videos by one author, newest first.
    pub async fn user_videos(&self, pubkey: &str) -> Result<Vec<VideoEvent>> {
        let session = &self.session;
        let events = session
            .cache
            .get_or_fetch(&Self::user_key(pubkey), Duration::ZERO, || async {
                let mut events = session
                    .query(
                        vec![Filter::new()
                            .kinds(vec![KIND_VIDEO, KIND_SHORT_VIDEO])
                            .authors(vec![pubkey.to_string()])
                            .limit(500)],
                        session.config.medium_timeout,
                    )
                    .await?;
                sort_events(&mut events);
                Ok(events)
            })
            .await?;
        Ok(parse_videos(events))
    }

    /// Publish a new video event.
    pub async fn publish(&self, video: NewVideo) -> Result<Event> {
        let session = &self.session;
        let now = session.now();
        let template = EventTemplate {
            created_at: now,
            kind: video.kind,
            tags: build_video_tags(&video, now),
            content: video.description,
        };

        match session.publish(template).await {
            Ok(event) => {
                info!(id = %event.id, kind = event.kind, "video published");
                session
                    .notifier
                    .notify(Toast::success("Success!", "Your vlog has been published"));
                session.cache.invalidate(&Self::feed_key()).await;
                session.cache.invalidate(&Self::user_key(&event.pubkey)).await;
                Ok(event)
            }
            Err(err) => {
                session.notifier.notify(Toast::destructive(
                    "Publish Failed",
                    err.to_string(),
                ));
                Err(err)
            }
        }
    }

    /// Request deletion of one of the user's videos.
    pub async fn delete(&self, video: &Event) -> Result<Event> {
        let session = &self.session;
        if session.signer.is_none() {
            session.notifier.notify(Toast::destructive(
                "Error",
                "You must be logged in to delete videos",
            ));
            return Err(nostr_client::ClientError::NotSignedIn);
        }

        let template = EventTemplate {
            created_at: session.now(),
            kind: nostr_core::DELETION_REQUEST_KIND,
            tags: create_deletion_tags(&[video.id.clone()], &[video.kind]),
            content: "Video deleted by creator".to_string(),
        };

        match session.publish(template).await {
            Ok(event) => {
                session.notifier.notify(Toast::success(
                    "Video Deleted",
                    "Your video has been marked for deletion. It may take time to propagate to all relays.",
                ));
                session.cache.invalidate(&Self::feed_key()).await;
                session.cache.invalidate(&Self::user_key(&video.pubkey)).await;
                Ok(event)
            }
            Err(err) => {
                session
                    .notifier
                    .notify(Toast::destructive("Delete Failed", err.to_string()));
                Err(err)
            }
        }
    }
}

fn parse_videos(events: Vec<Event>) -> Vec<VideoEvent> {
    events
        .into_iter()
        .filter_map(|event| VideoEvent::from_event(event).ok())
        .collect()
}
