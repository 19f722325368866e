//! Profile metadata (kind 0)
//!
//! Profiles are replaceable: only the newest kind 0 event per author counts.
//! The content is JSON with a loose schema; unknown fields are ignored and a
//! malformed payload degrades to an empty profile rather than an error.

use crate::session::Session;
use nostr_client::{CacheKey, Filter, Result};
use nostr_core::{Event, EventTemplate, KIND_METADATA};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Parsed kind 0 content.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfileMetadata {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub picture: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub banner: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub about: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nip05: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub website: Option<String>,
}

impl ProfileMetadata {
    /// Parse from event content. Anything unparseable is an empty profile.
    pub fn from_content(content: &str) -> Self {
        serde_json::from_str(content).unwrap_or_default()
    }

    /// Name to show for this profile: display name, then name, then a
    /// truncated pubkey.
    pub fn display_label(&self, pubkey: &str) -> String {
        self.display_name
            .as_deref()
            .or(self.name.as_deref())
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .unwrap_or_else(|| {
                let prefix: String = pubkey.chars().take(8).collect();
                format!("{prefix}...")
            })
    }
}

/// Pick the newest metadata event per author out of a result set.
pub fn newest_per_author(events: &[Event]) -> Vec<&Event> {
    let mut newest: Vec<&Event> = Vec::new();
    for event in events {
        match newest.iter_mut().find(|e| e.pubkey == event.pubkey) {
            Some(existing) if existing.created_at < event.created_at => *existing = event,
            Some(_) => {}
            None => newest.push(event),
        }
    }
    newest
}

/// Profile queries and updates.
#[derive(Clone)]
pub struct ProfileService {
    session: Session,
}

impl ProfileService {
    pub fn new(session: Session) -> Self {
        Self { session }
    }

    fn key(pubkey: &str) -> CacheKey {
        CacheKey::new(["profile", pubkey])
    }

    /// Metadata for one pubkey. Absent or malformed yields the default.
    pub async fn metadata(&self, pubkey: &str) -> Result<ProfileMetadata> {
        let session = &self.session;
        let events = session
            .cache
            .get_or_fetch(
                &Self::key(pubkey),
                session.config.default_staleness,
                || async {
                    session
                        .query(
                            vec![Filter::new()
                                .kinds(vec![KIND_METADATA])
                                .authors(vec![pubkey.to_string()])
                                .limit(1)],
                            session.config.medium_timeout,
                        )
                        .await
                },
            )
            .await?;

        let newest = events.iter().max_by_key(|e| e.created_at);
        Ok(newest
            .map(|e| ProfileMetadata::from_content(&e.content))
            .unwrap_or_default())
    }

    /// Publish a replacement kind 0 event for the signed-in user.
    pub async fn update(&self, metadata: &ProfileMetadata) -> Result<Event> {
        let session = &self.session;
        let template = EventTemplate {
            created_at: session.now(),
            kind: KIND_METADATA,
            tags: Vec::new(),
            content: serde_json::to_string(metadata).map_err(nostr_client::ClientError::from)?,
        };

        let event = session.publish(template).await?;
        debug!(pubkey = %event.pubkey, "profile updated");
        session.cache.invalidate(&Self::key(&event.pubkey)).await;
        Ok(event)
    }
}
