//! Application configuration
//!
//! Per-feature query deadlines and staleness windows. The values mirror how
//! the features behave in production: fast-twitch data (reactions, settings)
//! gets short deadlines, heavyweight aggregation (analytics) gets a long one.

use std::time::Duration;
use url::Url;

/// Relay used when the user has not configured one.
pub const DEFAULT_RELAY: &str = "wss://relay.nostr.band";

/// Blossom server uploads go to.
pub const DEFAULT_BLOSSOM_SERVER: &str = "https://blossom.primal.net";

/// Application configuration shared by all services.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Relay URL, also embedded as the relay hint in comment tags
    pub relay_url: String,
    /// Blossom server for uploads
    pub blossom_server: Url,

    /// Deadline for reaction and settings queries
    pub short_timeout: Duration,
    /// Deadline for video, follow, and profile queries
    pub medium_timeout: Duration,
    /// Deadline for analytics aggregation
    pub long_timeout: Duration,

    /// Staleness window for the video feed
    pub feed_staleness: Duration,
    /// Staleness window for follows, profiles, and analytics
    pub default_staleness: Duration,

    /// Delay before a like toggle re-validates against the relay
    pub reaction_reconcile_delay: Duration,

    /// Default number of events in the home feed
    pub feed_limit: u64,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            relay_url: DEFAULT_RELAY.to_string(),
            blossom_server: Url::parse(DEFAULT_BLOSSOM_SERVER)
                .expect("default Blossom server URL is valid"),
            short_timeout: Duration::from_secs(3),
            medium_timeout: Duration::from_secs(5),
            long_timeout: Duration::from_secs(10),
            feed_staleness: Duration::from_secs(3 * 60),
            default_staleness: Duration::from_secs(5 * 60),
            reaction_reconcile_delay: Duration::from_secs(1),
            feed_limit: 50,
        }
    }
}
