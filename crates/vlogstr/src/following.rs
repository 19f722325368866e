//! Follows (kind 3 contact lists)
//!
//! A user's follow list is a single replaceable kind 3 event; following or
//! unfollowing republishes the whole list. Follower counts come from a
//! bounded reverse query: kind 3 events tagging the pubkey, counted by unique
//! author. The bound makes large counts approximate.

use crate::profiles::{ProfileMetadata, newest_per_author};
use crate::session::Session;
use nostr_client::{CacheKey, ClientError, Filter, Result};
use nostr_core::{CONTACT_LIST_KIND, ContactList, Event, EventTemplate, KIND_METADATA};
use std::collections::HashSet;
use tracing::debug;

/// A followed profile with its metadata resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FollowedUser {
    pub pubkey: String,
    /// Display name, name, or truncated pubkey
    pub display_name: String,
    pub picture: Option<String>,
}

/// Follow list queries and mutations.
#[derive(Clone)]
pub struct FollowService {
    session: Session,
}

impl FollowService {
    pub fn new(session: Session) -> Self {
        Self { session }
    }

    fn following_key(pubkey: &str) -> CacheKey {
        CacheKey::new(["following", pubkey])
    }

    fn follower_count_key(pubkey: &str) -> CacheKey {
        CacheKey::new(["follower-count", pubkey])
    }

    /// Who `pubkey` follows, with metadata, sorted by display name.
    pub async fn following(&self, pubkey: &str) -> Result<Vec<FollowedUser>> {
        let session = &self.session;
        // One cache entry holds the contact list event plus the metadata
        // events for everyone on it.
        let events = session
            .cache
            .get_or_fetch(
                &Self::following_key(pubkey),
                session.config.default_staleness,
                || async {
                    let contact_events = session
                        .query(
                            vec![Filter::new()
                                .kinds(vec![CONTACT_LIST_KIND])
                                .authors(vec![pubkey.to_string()])
                                .limit(1)],
                            session.config.medium_timeout,
                        )
                        .await?;

                    let Some(list) = newest_contact_list(&contact_events, pubkey) else {
                        return Ok(contact_events);
                    };
                    let pubkeys = list.pubkeys();
                    if pubkeys.is_empty() {
                        return Ok(contact_events);
                    }

                    let mut events = contact_events;
                    let limit = pubkeys.len() as u64;
                    let mut metadata = session
                        .query(
                            vec![Filter::new()
                                .kinds(vec![KIND_METADATA])
                                .authors(pubkeys)
                                .limit(limit)],
                            session.config.medium_timeout,
                        )
                        .await?;
                    events.append(&mut metadata);
                    Ok(events)
                },
            )
            .await?;

        Ok(assemble_following(&events, pubkey))
    }

    /// How many distinct pubkeys follow `pubkey`, bounded at 1000.
    pub async fn follower_count(&self, pubkey: &str) -> Result<usize> {
        let session = &self.session;
        let events = session
            .cache
            .get_or_fetch(
                &Self::follower_count_key(pubkey),
                session.config.default_staleness,
                || async {
                    session
                        .query(
                            vec![Filter::new()
                                .kinds(vec![CONTACT_LIST_KIND])
                                .pubkey_refs(vec![pubkey.to_string()])
                                .limit(1000)],
                            session.config.medium_timeout,
                        )
                        .await
                },
            )
            .await?;

        let followers: HashSet<&str> = events.iter().map(|e| e.pubkey.as_str()).collect();
        Ok(followers.len())
    }

    /// Whether the signed-in user follows `target`.
    pub async fn is_following(&self, target: &str) -> Result<bool> {
        let Some(me) = self.session.pubkey() else {
            return Ok(false);
        };
        let list = self.own_contact_list(&me).await?;
        Ok(list.contains(target))
    }

    /// Add `target` to the signed-in user's follow list.
    pub async fn follow(&self, target: &str) -> Result<Event> {
        self.replace_list(target, |list| list.follow(target)).await
    }

    /// Remove `target` from the signed-in user's follow list.
    pub async fn unfollow(&self, target: &str) -> Result<Event> {
        self.replace_list(target, |list| list.unfollow(target)).await
    }

    async fn replace_list(
        &self,
        target: &str,
        mutate: impl FnOnce(&mut ContactList),
    ) -> Result<Event> {
        let session = &self.session;
        let Some(me) = session.pubkey() else {
            return Err(ClientError::NotSignedIn);
        };

        let mut list = self.own_contact_list(&me).await?;
        mutate(&mut list);

        let template = EventTemplate {
            created_at: session.now(),
            kind: CONTACT_LIST_KIND,
            tags: list.to_tags(),
            content: String::new(),
        };
        let event = session.publish(template).await?;
        debug!(follows = list.len(), "contact list replaced");

        session.cache.invalidate(&Self::following_key(&me)).await;
        session
            .cache
            .invalidate(&Self::follower_count_key(target))
            .await;
        Ok(event)
    }

    /// The signed-in user's current list, fetched fresh so a replacement
    /// never clobbers follows added elsewhere.
    async fn own_contact_list(&self, me: &str) -> Result<ContactList> {
        let session = &self.session;
        let events = session
            .query(
                vec![Filter::new()
                    .kinds(vec![CONTACT_LIST_KIND])
                    .authors(vec![me.to_string()])
                    .limit(1)],
                session.config.medium_timeout,
            )
            .await?;
        Ok(newest_contact_list(&events, me).unwrap_or_default())
    }
}

fn newest_contact_list(events: &[Event], pubkey: &str) -> Option<ContactList> {
    events
        .iter()
        .filter(|e| e.kind == CONTACT_LIST_KIND && e.pubkey == pubkey)
        .max_by_key(|e| e.created_at)
        .and_then(|e| ContactList::from_event(e).ok())
}

fn assemble_following(events: &[Event], pubkey: &str) -> Vec<FollowedUser> {
    let Some(list) = newest_contact_list(events, pubkey) else {
        return Vec::new();
    };

    let metadata_events: Vec<Event> = events
        .iter()
        .filter(|e| e.kind == KIND_METADATA)
        .cloned()
        .collect();
    let newest: Vec<(String, ProfileMetadata)> = newest_per_author(&metadata_events)
        .into_iter()
        .map(|e| (e.pubkey.clone(), ProfileMetadata::from_content(&e.content)))
        .collect();

    let mut users: Vec<FollowedUser> = list
        .pubkeys()
        .into_iter()
        .map(|pk| {
            let metadata = newest
                .iter()
                .find(|(author, _)| *author == pk)
                .map(|(_, m)| m.clone())
                .unwrap_or_default();
            FollowedUser {
                display_name: metadata.display_label(&pk),
                picture: metadata.picture,
                pubkey: pk,
            }
        })
        .collect();

    users.sort_by(|a, b| {
        a.display_name
            .to_lowercase()
            .cmp(&b.display_name.to_lowercase())
    });
    users
}
