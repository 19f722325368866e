//! Client-side route table
//!
//! Paths are matched exactly, with two parameterized forms (`/user/:pubkey`,
//! `/video/:id`) and a catch-all for bare NIP-19 entities at the root, so
//! `/npub1...` or `/nevent1...` deep-links resolve to the right view.

use nostr_core::{Nip19Entity, decode};

/// Where a path leads.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    Home,
    Feed,
    Discover,
    Dashboard,
    /// The signed-in user's own profile
    Profile,
    Settings,
    /// Another user's profile, by hex pubkey
    User(String),
    /// A single video, by hex event id
    Video(String),
    /// An addressable event: kind, author pubkey, d tag
    Addressable {
        kind: u16,
        pubkey: String,
        identifier: String,
    },
    NotFound,
}

impl Route {
    /// Resolve a path to a route.
    pub fn parse(path: &str) -> Route {
        let path = path.trim_end_matches('/');
        match path {
            "" => Route::Home,
            "/feed" => Route::Feed,
            "/discover" => Route::Discover,
            "/dashboard" => Route::Dashboard,
            "/profile" => Route::Profile,
            "/settings" => Route::Settings,
            _ => {
                if let Some(pubkey) = path.strip_prefix("/user/")
                    && !pubkey.is_empty()
                    && !pubkey.contains('/')
                {
                    return Route::User(pubkey.to_string());
                }
                if let Some(id) = path.strip_prefix("/video/")
                    && !id.is_empty()
                    && !id.contains('/')
                {
                    return Route::Video(id.to_string());
                }
                if let Some(entity) = path.strip_prefix('/')
                    && !entity.contains('/')
                    && let Ok(decoded) = decode(entity)
                {
                    return Route::from(decoded);
                }
                Route::NotFound
            }
        }
    }
}

impl From<Nip19Entity> for Route {
    fn from(entity: Nip19Entity) -> Self {
        match entity {
            Nip19Entity::Npub(pubkey) => Route::User(pubkey),
            Nip19Entity::Nprofile(profile) => Route::User(profile.pubkey),
            Nip19Entity::Note(id) => Route::Video(id),
            Nip19Entity::Nevent(event) => Route::Video(event.id),
            Nip19Entity::Naddr(addr) => Route::Addressable {
                kind: addr.kind,
                pubkey: addr.pubkey,
                identifier: addr.identifier,
            },
        }
    }
}
