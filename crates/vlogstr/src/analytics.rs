//! Creator analytics
//!
//! Aggregates are computed client-side from bounded queries, so every number
//! here is a floor, not an exact total. The overview counts likes strictly
//! (content "+" only) and excludes the creator's own comments; the per-video
//! breakdown uses the full like synonym set. The asymmetry matches how the
//! numbers are presented: the overview is a conservative summary, the
//! breakdown mirrors what the video page shows.

use crate::session::Session;
use nostr_client::{CacheKey, ClientError, Filter, Result};
use nostr_core::{
    COMMENT_KIND, CONTACT_LIST_KIND, Event, KIND_SHORT_TEXT_NOTE, KIND_SHORT_VIDEO, KIND_VIDEO,
    LIKE_CONTENT, REACTION_KIND, is_like,
};
use std::collections::HashSet;
use tracing::debug;

// Comments arrive both as legacy kind 1 replies and as NIP-22 comments.
const COMMENT_KINDS: [u16; 2] = [KIND_SHORT_TEXT_NOTE, COMMENT_KIND];

/// Totals across all of a creator's videos.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AnalyticsOverview {
    pub total_videos: usize,
    pub total_likes: usize,
    pub total_comments: usize,
    pub total_followers: usize,
}

/// Per-video engagement numbers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VideoStats {
    pub video_id: String,
    pub title: String,
    pub likes: usize,
    pub comments: usize,
}

/// Analytics queries for the signed-in creator.
#[derive(Clone)]
pub struct AnalyticsService {
    session: Session,
}

impl AnalyticsService {
    pub fn new(session: Session) -> Self {
        Self { session }
    }

    fn overview_key(pubkey: &str) -> CacheKey {
        CacheKey::new(["analytics", pubkey])
    }

    fn per_video_key(pubkey: &str) -> CacheKey {
        CacheKey::new(["creator-analytics", pubkey])
    }

    /// Dashboard totals for the signed-in creator.
    pub async fn overview(&self) -> Result<AnalyticsOverview> {
        let session = &self.session;
        let Some(pubkey) = session.pubkey() else {
            return Err(ClientError::NotSignedIn);
        };

        let events = session
            .cache
            .get_or_fetch(
                &Self::overview_key(&pubkey),
                session.config.default_staleness,
                || self.fetch_creator_events(&pubkey, 1000),
            )
            .await?;

        let videos: Vec<&Event> = events.iter().filter(|e| is_video(e)).collect();
        let video_ids: HashSet<&str> = videos.iter().map(|v| v.id.as_str()).collect();

        let total_likes = events
            .iter()
            .filter(|e| {
                e.kind == REACTION_KIND
                    && e.content == LIKE_CONTENT
                    && references_any(e, &video_ids)
            })
            .count();
        let total_comments = events
            .iter()
            .filter(|e| {
                COMMENT_KINDS.contains(&e.kind)
                    && e.pubkey != pubkey
                    && references_any(e, &video_ids)
            })
            .count();
        let total_followers = events
            .iter()
            .filter(|e| e.kind == CONTACT_LIST_KIND)
            .map(|e| e.pubkey.as_str())
            .collect::<HashSet<_>>()
            .len();

        debug!(videos = videos.len(), likes = total_likes, "analytics overview computed");
        Ok(AnalyticsOverview {
            total_videos: videos.len(),
            total_likes,
            total_comments,
            total_followers,
        })
    }

    /// Per-video breakdown, newest video first.
    pub async fn per_video(&self) -> Result<Vec<VideoStats>> {
        let session = &self.session;
        let Some(pubkey) = session.pubkey() else {
            return Err(ClientError::NotSignedIn);
        };

        let events = session
            .cache
            .get_or_fetch(
                &Self::per_video_key(&pubkey),
                session.config.default_staleness,
                || self.fetch_creator_events(&pubkey, 2000),
            )
            .await?;

        let mut videos: Vec<&Event> = events.iter().filter(|e| is_video(e)).collect();
        videos.sort_by(|a, b| b.created_at.cmp(&a.created_at));

        Ok(videos
            .iter()
            .map(|video| {
                let likes = events
                    .iter()
                    .filter(|e| is_like(e) && references(e, &video.id))
                    .count();
                let comments = events
                    .iter()
                    .filter(|e| COMMENT_KINDS.contains(&e.kind) && references(e, &video.id))
                    .count();
                VideoStats {
                    video_id: video.id.clone(),
                    title: video
                        .tag_value("title")
                        .filter(|t| !t.is_empty())
                        .unwrap_or("Untitled Video")
                        .to_string(),
                    likes,
                    comments,
                }
            })
            .collect())
    }

    /// One result set feeds all the aggregates: the creator's videos, the
    /// reactions and comments referencing them, and kind 3 events tagging
    /// the creator.
    async fn fetch_creator_events(&self, pubkey: &str, limit: u64) -> Result<Vec<Event>> {
        let session = &self.session;
        let videos = session
            .query(
                vec![Filter::new()
                    .kinds(vec![KIND_VIDEO, KIND_SHORT_VIDEO])
                    .authors(vec![pubkey.to_string()])
                    .limit(limit)],
                session.config.long_timeout,
            )
            .await?;

        let video_ids: Vec<String> = videos.iter().map(|v| v.id.clone()).collect();
        let mut filters = vec![
            Filter::new()
                .kinds(vec![CONTACT_LIST_KIND])
                .pubkey_refs(vec![pubkey.to_string()])
                .limit(1000),
        ];
        if !video_ids.is_empty() {
            filters.push(
                Filter::new()
                    .kinds(vec![REACTION_KIND])
                    .event_refs(video_ids.clone())
                    .limit(limit),
            );
            filters.push(
                Filter::new()
                    .kinds(COMMENT_KINDS.to_vec())
                    .event_refs(video_ids)
                    .limit(limit),
            );
        }

        let mut events = videos;
        let mut engagement = session.query(filters, session.config.long_timeout).await?;
        events.append(&mut engagement);
        Ok(events)
    }
}

fn is_video(event: &Event) -> bool {
    event.kind == KIND_VIDEO || event.kind == KIND_SHORT_VIDEO
}

fn references(event: &Event, video_id: &str) -> bool {
    event.tag_values("e").any(|id| id == video_id)
}

fn references_any(event: &Event, video_ids: &HashSet<&str>) -> bool {
    event.tag_values("e").any(|id| video_ids.contains(id))
}
