//! Threaded comments on videos and external URLs
//!
//! A thread is fetched by its root reference (uppercase tags), then assembled
//! client-side: comments whose parent references equal their root references
//! are top-level, everything else is grouped under the comment it replies to.
//! Posting rebuilds the NIP-22 tag set from the root and optional reply and
//! invalidates the thread on success. A failed publish is surfaced to the
//! caller; there is no local retry.

use crate::session::Session;
use nostr_client::{CacheKey, Filter, Result};
use nostr_core::{
    COMMENT_KIND, CommentTarget, Event, EventTemplate, build_comment_tags, create_address,
    is_addressable_kind, is_replaceable_kind, parent_comment_id, sort_events,
};
use std::collections::HashMap;
use tracing::debug;

/// An assembled comment thread.
#[derive(Debug, Clone, Default)]
pub struct CommentThread {
    /// Comments replying directly to the root, newest first
    pub top_level: Vec<Event>,
    /// Replies grouped by the id of the comment they answer, newest first
    pub replies: HashMap<String, Vec<Event>>,
}

impl CommentThread {
    /// Total number of comments in the thread.
    pub fn len(&self) -> usize {
        self.top_level.len() + self.replies.values().map(Vec::len).sum::<usize>()
    }

    pub fn is_empty(&self) -> bool {
        self.top_level.is_empty() && self.replies.is_empty()
    }

    fn assemble(mut events: Vec<Event>) -> Self {
        sort_events(&mut events);
        let mut thread = Self::default();
        for event in events {
            // parent_comment_id is None for comments replying to the root
            match parent_comment_id(&event).map(str::to_string) {
                Some(parent) => thread.replies.entry(parent).or_default().push(event),
                None => thread.top_level.push(event),
            }
        }
        thread
    }
}

/// Comment queries and posting.
#[derive(Clone)]
pub struct CommentService {
    session: Session,
}

impl CommentService {
    pub fn new(session: Session) -> Self {
        Self { session }
    }

    fn key(root: &CommentTarget) -> CacheKey {
        CacheKey::new(["comments".to_string(), root.identifier()])
    }

    fn root_filter(root: &CommentTarget) -> Filter {
        let filter = Filter::new().kinds(vec![COMMENT_KIND]).limit(500);
        match root {
            CommentTarget::Event(event) => {
                let filter = filter.tag("E", vec![event.id.clone()]);
                if is_addressable_kind(event.kind) {
                    filter.tag(
                        "A",
                        vec![create_address(event.kind, &event.pubkey, &event.d_tag)],
                    )
                } else if is_replaceable_kind(event.kind) {
                    filter.tag("A", vec![create_address(event.kind, &event.pubkey, "")])
                } else {
                    filter
                }
            }
            CommentTarget::External(url) => filter.tag("I", vec![url.to_string()]),
        }
    }

    /// Fetch and assemble the thread rooted at `root`.
    pub async fn list(&self, root: &CommentTarget) -> Result<CommentThread> {
        let session = &self.session;
        let events = session
            .cache
            .get_or_fetch(
                &Self::key(root),
                session.config.default_staleness,
                || async {
                    session
                        .query(
                            vec![Self::root_filter(root)],
                            session.config.medium_timeout,
                        )
                        .await
                },
            )
            .await?;
        Ok(CommentThread::assemble(events))
    }

    /// Post a comment on `root`, optionally replying to another comment.
    pub async fn post(
        &self,
        root: &CommentTarget,
        reply: Option<&Event>,
        content: impl Into<String>,
    ) -> Result<Event> {
        let session = &self.session;
        let reply_target = reply.map(CommentTarget::event);
        let template = EventTemplate {
            created_at: session.now(),
            kind: COMMENT_KIND,
            tags: build_comment_tags(root, reply_target.as_ref(), &session.config.relay_url),
            content: content.into(),
        };

        let event = session.publish(template).await?;
        debug!(id = %event.id, root = %root.identifier(), "comment posted");
        session.cache.invalidate(&Self::key(root)).await;
        Ok(event)
    }
}
