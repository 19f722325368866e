//! Per-user settings (NIP-78 app data)
//!
//! Settings live in a single addressable kind 30078 event under a fixed
//! identifier. Reads fall back to defaults field by field, so settings saved
//! by an older build keep their values and new fields pick up defaults.
//! Writes replace the whole event and update the cache in place.

use crate::session::Session;
use nostr_client::{CacheKey, Filter, Result};
use nostr_core::{APP_DATA_KIND, Event, EventTemplate, create_app_data_tags};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// The `d` tag identifying the settings event.
pub const SETTINGS_D_TAG: &str = "vlogstr-settings";

/// Human-readable title carried on the settings event.
pub const SETTINGS_TITLE: &str = "Vlogstr Settings";

/// Resolution cap applied at upload time.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum UploadQuality {
    #[serde(rename = "4k")]
    Uhd,
    #[default]
    #[serde(rename = "1080")]
    FullHd,
    #[serde(rename = "720")]
    Hd,
    #[serde(rename = "480")]
    Sd,
}

/// Interface font scale.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FontSize {
    Small,
    #[default]
    Medium,
    Large,
    Xl,
}

fn default_true() -> bool {
    true
}

fn default_language() -> String {
    "en".to_string()
}

/// All user-tunable settings. Unknown fields in stored JSON are ignored;
/// missing fields take their defaults.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserSettings {
    #[serde(default)]
    pub mute_videos_by_default: bool,
    #[serde(default = "default_true")]
    pub autoplay_videos: bool,
    #[serde(default = "default_true")]
    pub hd_video_quality: bool,
    #[serde(default)]
    pub upload_quality: UploadQuality,
    #[serde(default = "default_language")]
    pub language: String,
    #[serde(default)]
    pub compact_mode: bool,
    #[serde(default)]
    pub font_size: FontSize,
    #[serde(default)]
    pub push_notifications: bool,
    #[serde(default = "default_true")]
    pub comment_notifications: bool,
    #[serde(default = "default_true")]
    pub like_notifications: bool,
    #[serde(default = "default_true")]
    pub follow_notifications: bool,
    #[serde(default = "default_true")]
    pub mention_notifications: bool,
}

impl Default for UserSettings {
    fn default() -> Self {
        Self {
            mute_videos_by_default: false,
            autoplay_videos: true,
            hd_video_quality: true,
            upload_quality: UploadQuality::default(),
            language: default_language(),
            compact_mode: false,
            font_size: FontSize::default(),
            push_notifications: false,
            comment_notifications: true,
            like_notifications: true,
            follow_notifications: true,
            mention_notifications: true,
        }
    }
}

impl UserSettings {
    /// Parse from event content, defaulting on any malformed payload.
    pub fn from_content(content: &str) -> Self {
        serde_json::from_str(content).unwrap_or_else(|err| {
            warn!(%err, "malformed settings payload, using defaults");
            Self::default()
        })
    }
}

/// Settings load and save for the signed-in user.
#[derive(Clone)]
pub struct SettingsService {
    session: Session,
}

impl SettingsService {
    pub fn new(session: Session) -> Self {
        Self { session }
    }

    fn key(pubkey: &str) -> CacheKey {
        CacheKey::new(["settings", pubkey])
    }

    /// The signed-in user's settings. Signed-out callers and users with no
    /// stored settings both get the defaults.
    pub async fn get(&self) -> Result<UserSettings> {
        let session = &self.session;
        let Some(pubkey) = session.pubkey() else {
            return Ok(UserSettings::default());
        };

        let events = session
            .cache
            .get_or_fetch(
                &Self::key(&pubkey),
                session.config.default_staleness,
                || async {
                    session
                        .query(
                            vec![Filter::new()
                                .kinds(vec![APP_DATA_KIND])
                                .authors(vec![pubkey.to_string()])
                                .d_tags(vec![SETTINGS_D_TAG.to_string()])
                                .limit(1)],
                            session.config.short_timeout,
                        )
                        .await
                },
            )
            .await?;

        let newest = events.iter().max_by_key(|e| e.created_at);
        Ok(newest
            .map(|e| UserSettings::from_content(&e.content))
            .unwrap_or_default())
    }

    /// Publish the full settings object as the replacement event and update
    /// the cache in place.
    pub async fn update(&self, settings: &UserSettings) -> Result<Event> {
        let session = &self.session;
        let template = EventTemplate {
            created_at: session.now(),
            kind: APP_DATA_KIND,
            tags: create_app_data_tags(SETTINGS_D_TAG, Some(SETTINGS_TITLE)),
            content: serde_json::to_string(settings).map_err(nostr_client::ClientError::from)?,
        };

        let event = session.publish(template).await?;
        debug!(pubkey = %event.pubkey, "settings saved");
        session
            .cache
            .set(
                &Self::key(&event.pubkey),
                vec![event.clone()],
                session.config.default_staleness,
            )
            .await;
        Ok(event)
    }

    /// Load, apply a change, and save.
    pub async fn modify(&self, change: impl FnOnce(&mut UserSettings)) -> Result<UserSettings> {
        let mut settings = self.get().await?;
        change(&mut settings);
        self.update(&settings).await?;
        Ok(settings)
    }
}
