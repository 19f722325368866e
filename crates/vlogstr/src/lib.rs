//! Vlogstr application services
//!
//! The data layer of a Nostr video-sharing client. Each service wraps one
//! feature area (videos, comments, likes, follows, profiles, settings,
//! analytics, uploads) around a shared [`Session`]: a relay client behind the
//! `NostrClient` seam, an optional signer, a query cache with staleness and
//! optimistic-mutation support, and a notifier for user-facing toasts.
//!
//! Nothing in this crate talks to a UI framework; the services return plain
//! data and the routing table maps paths to views.

pub mod analytics;
pub mod comments;
pub mod config;
pub mod following;
pub mod notify;
pub mod profiles;
pub mod reactions;
pub mod routes;
pub mod session;
pub mod settings;
pub mod uploads;
pub mod videos;

pub use analytics::{AnalyticsOverview, AnalyticsService, VideoStats};
pub use comments::{CommentService, CommentThread};
pub use config::{AppConfig, DEFAULT_BLOSSOM_SERVER, DEFAULT_RELAY};
pub use following::{FollowService, FollowedUser};
pub use notify::{CollectingNotifier, Notifier, Toast, ToastVariant, TracingNotifier};
pub use profiles::{ProfileMetadata, ProfileService};
pub use reactions::ReactionService;
pub use routes::Route;
pub use session::Session;
pub use settings::{
    FontSize, SETTINGS_D_TAG, SETTINGS_TITLE, SettingsService, UploadQuality, UserSettings,
};
pub use uploads::UploadService;
pub use videos::{NewVideo, VideoService, build_video_tags};
