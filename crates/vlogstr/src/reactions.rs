//! Likes
//!
//! Reading is a bounded kind-7 query per video. Toggling is optimistic: the
//! cache is patched before the relay confirms, rolled back to a snapshot if
//! the publish fails, and re-validated against the relay after a fixed delay.
//! Every step of a toggle is guarded by the mutation generation taken at its
//! start, so when toggles overlap the newest one wins and stale patches,
//! rollbacks, and reconciliations are dropped.
//!
//! Unliking publishes a NIP-09 deletion referencing only the caller's own
//! reaction event; nobody else's reactions are ever touched.

use crate::notify::Toast;
use crate::session::Session;
use nostr_client::{CacheKey, ClientError, Filter, Result};
use nostr_core::{
    DELETION_REQUEST_KIND, Event, EventTemplate, LIKE_CONTENT, REACTION_KIND,
    create_reaction_tags, is_like,
};
use tracing::debug;

/// Reaction queries and the like toggle.
#[derive(Clone)]
pub struct ReactionService {
    session: Session,
}

impl ReactionService {
    pub fn new(session: Session) -> Self {
        Self { session }
    }

    fn key(event_id: &str) -> CacheKey {
        CacheKey::new(["reactions", event_id])
    }

    /// All reactions to an event.
    pub async fn reactions(&self, event_id: &str) -> Result<Vec<Event>> {
        let session = &self.session;
        session
            .cache
            .get_or_fetch(
                &Self::key(event_id),
                session.config.default_staleness,
                || async {
                    session
                        .query(
                            vec![Filter::new()
                                .kinds(vec![REACTION_KIND])
                                .event_refs(vec![event_id.to_string()])
                                .limit(500)],
                            session.config.short_timeout,
                        )
                        .await
                },
            )
            .await
    }

    /// Number of likes among a set of reactions.
    pub fn like_count(reactions: &[Event]) -> usize {
        reactions.iter().filter(|r| is_like(r)).count()
    }

    /// Whether the given pubkey has liked, per the synonym set.
    pub fn user_liked(reactions: &[Event], pubkey: &str) -> bool {
        reactions.iter().any(|r| is_like(r) && r.pubkey == pubkey)
    }

    /// Toggle the signed-in user's like on a video.
    ///
    /// Returns the new liked state.
    pub async fn toggle_like(&self, target: &Event) -> Result<bool> {
        let session = &self.session;
        let Some(pubkey) = session.pubkey() else {
            return Err(ClientError::NotSignedIn);
        };

        let key = Self::key(&target.id);
        let reactions = self.reactions(&target.id).await?;
        let own_like = reactions
            .iter()
            .find(|r| is_like(r) && r.pubkey == pubkey)
            .cloned();

        let generation = session.cache.begin_mutation(&key).await;
        let snapshot = session.cache.snapshot(&key).await.unwrap_or_default();

        let (template, liked_after) = match &own_like {
            Some(reaction) => {
                // Unlike: optimistically drop the user's likes
                let me = pubkey.clone();
                session
                    .cache
                    .patch_if_current(&key, generation, |events| {
                        events.retain(|r| !(r.pubkey == me && is_like(r)));
                    })
                    .await;

                let template = EventTemplate {
                    created_at: session.now(),
                    kind: DELETION_REQUEST_KIND,
                    tags: vec![vec!["e".to_string(), reaction.id.clone()]],
                    content: "Unliked".to_string(),
                };
                (template, false)
            }
            None => {
                // Like: optimistically append a synthetic reaction
                let synthetic = Event {
                    id: format!("temp-{}", session.now_millis()),
                    pubkey: pubkey.clone(),
                    created_at: session.now(),
                    kind: REACTION_KIND,
                    tags: vec![vec!["e".to_string(), target.id.clone()]],
                    content: LIKE_CONTENT.to_string(),
                    sig: String::new(),
                };
                session
                    .cache
                    .patch_if_current(&key, generation, |events| {
                        events.push(synthetic);
                    })
                    .await;

                let template = EventTemplate {
                    created_at: session.now(),
                    kind: REACTION_KIND,
                    tags: create_reaction_tags(&target.id, target.kind),
                    content: LIKE_CONTENT.to_string(),
                };
                (template, true)
            }
        };

        match session.publish(template).await {
            Ok(_) => {
                self.schedule_reconcile(key, generation);
                Ok(liked_after)
            }
            Err(err) => {
                let rolled_back = session
                    .cache
                    .patch_if_current(&key, generation, |events| *events = snapshot)
                    .await;
                debug!(rolled_back, "like toggle publish failed");
                session
                    .notifier
                    .notify(Toast::destructive("Like Failed", err.to_string()));
                Err(err)
            }
        }
    }

    /// Re-validate against the relay after the configured delay, unless a
    /// newer toggle has started in the meantime.
    fn schedule_reconcile(&self, key: CacheKey, generation: u64) {
        let cache = self.session.cache.clone();
        let delay = self.session.config.reaction_reconcile_delay;
        tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            cache.invalidate_if_current(&key, generation).await;
        });
    }
}
