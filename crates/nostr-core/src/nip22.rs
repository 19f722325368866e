//! NIP-22: Comment
//!
//! Kind 1111 threaded comments. Every comment carries two reference groups:
//! uppercase tags (`A`/`E`/`I`/`K`/`P`) pointing at the thread root, and
//! lowercase tags (`a`/`e`/`i`/`k`/`p`) pointing at the immediate parent. A
//! top-level comment duplicates its root references into the parent slot,
//! since its parent *is* the root. That duplication is part of the convention
//! and must be reproduced exactly for interoperability with other clients.
//!
//! The target shape decides which reference tags are emitted:
//! - addressable events: `A <kind:pubkey:d>` plus `E <id>`
//! - replaceable events: `A <kind:pubkey:>` (empty d) plus `E <id>`
//! - plain events: `E <id>` only
//! - external URLs: `I <url>` with `K <hostname>`
//!
//! See: <https://github.com/nostr-protocol/nips/blob/master/22.md>

use crate::nip01::{
    Event, KIND_COMMENT, create_address, is_addressable_kind, is_replaceable_kind,
};
use thiserror::Error;
use url::Url;

/// Event kind for comments
pub const COMMENT_KIND: u16 = KIND_COMMENT;

/// Errors that can occur during NIP-22 operations
#[derive(Debug, Error)]
pub enum Nip22Error {
    #[error("invalid event kind: expected 1111, got {0}")]
    InvalidKind(u16),

    #[error("comment has no root reference tag")]
    MissingRootReference,

    #[error("comment has no parent reference tag")]
    MissingParentReference,
}

/// Which reference slot a tag group belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scope {
    /// Uppercase tags pointing at the thread root
    Root,
    /// Lowercase tags pointing at the immediate parent
    Parent,
}

impl Scope {
    fn tag(self, upper: &str, lower: &str) -> String {
        match self {
            Scope::Root => upper.to_string(),
            Scope::Parent => lower.to_string(),
        }
    }
}

/// What a comment points at: a Nostr event or an external URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommentTarget {
    /// A Nostr event of any shape (plain, replaceable, addressable)
    Event(EventRef),
    /// A resource outside Nostr, referenced by URL
    External(Url),
}

/// The subset of an event a comment reference needs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventRef {
    pub id: String,
    pub pubkey: String,
    pub kind: u16,
    /// The d-tag identifier for addressable events; empty otherwise
    pub d_tag: String,
}

impl From<&Event> for EventRef {
    fn from(event: &Event) -> Self {
        Self {
            id: event.id.clone(),
            pubkey: event.pubkey.clone(),
            kind: event.kind,
            d_tag: event.d_tag().unwrap_or_default().to_string(),
        }
    }
}

impl CommentTarget {
    pub fn event(event: &Event) -> Self {
        CommentTarget::Event(EventRef::from(event))
    }

    pub fn external(url: Url) -> Self {
        CommentTarget::External(url)
    }

    /// The cache identity of this target: the event id, or the URL string.
    pub fn identifier(&self) -> String {
        match self {
            CommentTarget::Event(event) => event.id.clone(),
            CommentTarget::External(url) => url.to_string(),
        }
    }
}

/// Emit the reference tags for one target in one scope.
///
/// This is the single source of truth for both the root (uppercase) and the
/// parent (lowercase) tag groups; a top-level comment simply calls it twice
/// with the same target.
pub fn reference_tags_for(
    target: &CommentTarget,
    scope: Scope,
    relay_url: &str,
) -> Vec<Vec<String>> {
    let mut tags = Vec::new();

    match target {
        CommentTarget::Event(event) => {
            if is_addressable_kind(event.kind) {
                tags.push(vec![
                    scope.tag("A", "a"),
                    create_address(event.kind, &event.pubkey, &event.d_tag),
                    relay_url.to_string(),
                ]);
            } else if is_replaceable_kind(event.kind) {
                tags.push(vec![
                    scope.tag("A", "a"),
                    create_address(event.kind, &event.pubkey, ""),
                    relay_url.to_string(),
                ]);
            }
            // Every event shape gets an id reference
            tags.push(vec![
                scope.tag("E", "e"),
                event.id.clone(),
                relay_url.to_string(),
                event.pubkey.clone(),
            ]);
            tags.push(vec![scope.tag("K", "k"), event.kind.to_string()]);
            tags.push(vec![
                scope.tag("P", "p"),
                event.pubkey.clone(),
                relay_url.to_string(),
            ]);
        }
        CommentTarget::External(url) => {
            tags.push(vec![scope.tag("I", "i"), url.to_string()]);
            tags.push(vec![
                scope.tag("K", "k"),
                url.host_str().unwrap_or_default().to_string(),
            ]);
        }
    }

    tags
}

/// Build the full tag set for a new comment.
///
/// Root-scope tags always precede parent-scope tags. When `reply` is `None`
/// the root references are duplicated into the parent slot byte-for-byte.
pub fn build_comment_tags(
    root: &CommentTarget,
    reply: Option<&CommentTarget>,
    relay_url: &str,
) -> Vec<Vec<String>> {
    let mut tags = reference_tags_for(root, Scope::Root, relay_url);
    let parent = reply.unwrap_or(root);
    tags.extend(reference_tags_for(parent, Scope::Parent, relay_url));
    tags
}

/// Check whether an event is a comment.
pub fn is_comment(event: &Event) -> bool {
    event.kind == COMMENT_KIND
}

/// Root event id referenced by a comment (`E` tag).
pub fn get_root_event_id(event: &Event) -> Option<&str> {
    event.tag_value("E")
}

/// Parent event id referenced by a comment (`e` tag).
pub fn get_parent_event_id(event: &Event) -> Option<&str> {
    event.tag_value("e")
}

/// Root address referenced by a comment (`A` tag).
pub fn get_root_address(event: &Event) -> Option<&str> {
    event.tag_value("A")
}

/// Parent address referenced by a comment (`a` tag).
pub fn get_parent_address(event: &Event) -> Option<&str> {
    event.tag_value("a")
}

/// Root kind referenced by a comment (`K` tag). For URL roots this is the
/// hostname, so parsing can fail even on a valid comment.
pub fn get_root_kind(event: &Event) -> Option<u16> {
    event.tag_value("K").and_then(|k| k.parse().ok())
}

/// Parent kind referenced by a comment (`k` tag).
pub fn get_parent_kind(event: &Event) -> Option<u16> {
    event.tag_value("k").and_then(|k| k.parse().ok())
}

/// Root URL referenced by a comment (`I` tag).
pub fn get_root_url(event: &Event) -> Option<&str> {
    event.tag_value("I")
}

/// Whether a comment is top-level: its parent references equal its root
/// references, meaning it replies to the root itself rather than another
/// comment.
pub fn is_top_level(event: &Event) -> bool {
    let roots = (
        get_root_event_id(event),
        get_root_address(event),
        get_root_url(event),
    );
    let parents = (
        get_parent_event_id(event),
        get_parent_address(event),
        event.tag_value("i"),
    );
    roots == parents
}

/// The id of the comment this event replies to, when it is not top-level.
pub fn parent_comment_id(event: &Event) -> Option<&str> {
    if is_top_level(event) {
        None
    } else {
        get_parent_event_id(event)
    }
}

/// Validate that a comment has the structure NIP-22 requires: kind 1111 with
/// at least one root-scope and one parent-scope reference.
pub fn validate_comment(event: &Event) -> Result<(), Nip22Error> {
    if event.kind != COMMENT_KIND {
        return Err(Nip22Error::InvalidKind(event.kind));
    }
    if get_root_event_id(event).is_none()
        && get_root_address(event).is_none()
        && get_root_url(event).is_none()
    {
        return Err(Nip22Error::MissingRootReference);
    }
    if get_parent_event_id(event).is_none()
        && get_parent_address(event).is_none()
        && event.tag_value("i").is_none()
    {
        return Err(Nip22Error::MissingParentReference);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const RELAY: &str = "wss://relay.example.com";

    fn event_ref(id: &str, pubkey: &str, kind: u16, d_tag: &str) -> CommentTarget {
        CommentTarget::Event(EventRef {
            id: id.to_string(),
            pubkey: pubkey.to_string(),
            kind,
            d_tag: d_tag.to_string(),
        })
    }

    fn comment_with_tags(tags: Vec<Vec<String>>) -> Event {
        Event {
            id: "c1".to_string(),
            pubkey: "commenter".to_string(),
            created_at: 1234567890,
            kind: COMMENT_KIND,
            tags,
            content: "nice vlog".to_string(),
            sig: String::new(),
        }
    }

    #[test]
    fn test_plain_root_top_level() {
        // The worked example: plain root event id=r1, author=p1, kind=21
        let root = event_ref("r1", "p1", 21, "");
        let tags = build_comment_tags(&root, None, RELAY);

        assert_eq!(
            tags,
            vec![
                vec!["E".to_string(), "r1".to_string(), RELAY.to_string(), "p1".to_string()],
                vec!["K".to_string(), "21".to_string()],
                vec!["P".to_string(), "p1".to_string(), RELAY.to_string()],
                vec!["e".to_string(), "r1".to_string(), RELAY.to_string(), "p1".to_string()],
                vec!["k".to_string(), "21".to_string()],
                vec!["p".to_string(), "p1".to_string(), RELAY.to_string()],
            ]
        );
    }

    #[test]
    fn test_top_level_parent_tags_mirror_root_tags() {
        for target in [
            event_ref("r1", "p1", 21, ""),
            event_ref("r2", "p2", 3, ""),
            event_ref("r3", "p3", 30078, "vlogstr-settings"),
            CommentTarget::External(Url::parse("https://example.com/video/1").unwrap()),
        ] {
            let tags = build_comment_tags(&target, None, RELAY);
            let mid = tags.len() / 2;
            let (root_tags, parent_tags) = tags.split_at(mid);
            for (root_tag, parent_tag) in root_tags.iter().zip(parent_tags) {
                assert_eq!(root_tag[0].to_lowercase(), parent_tag[0]);
                assert_eq!(root_tag[1..], parent_tag[1..]);
            }
        }
    }

    #[test]
    fn test_addressable_root_gets_both_a_and_e() {
        let root = event_ref("r1", "p1", 30023, "my-article");
        let tags = reference_tags_for(&root, Scope::Root, RELAY);

        assert_eq!(tags[0], vec!["A", "30023:p1:my-article", RELAY]);
        assert_eq!(tags[1], vec!["E", "r1", RELAY, "p1"]);
        assert_eq!(tags[2], vec!["K", "30023"]);
        assert_eq!(tags[3], vec!["P", "p1", RELAY]);
    }

    #[test]
    fn test_replaceable_root_address_has_empty_d() {
        let root = event_ref("r1", "p1", 3, "ignored");
        let tags = reference_tags_for(&root, Scope::Root, RELAY);
        assert_eq!(tags[0], vec!["A", "3:p1:", RELAY]);
        assert_eq!(tags[1][0], "E");
    }

    #[test]
    fn test_url_root() {
        let url = Url::parse("https://example.com/video/1").unwrap();
        let tags = reference_tags_for(&CommentTarget::External(url), Scope::Root, RELAY);
        assert_eq!(tags[0], vec!["I", "https://example.com/video/1"]);
        assert_eq!(tags[1], vec!["K", "example.com"]);
    }

    #[test]
    fn test_exactly_one_root_and_one_parent_id_reference() {
        for root in [
            event_ref("r1", "p1", 21, ""),
            event_ref("r1", "p1", 0, ""),
            event_ref("r1", "p1", 34235, "v"),
        ] {
            let reply = event_ref("c0", "p9", COMMENT_KIND, "");
            let tags = build_comment_tags(&root, Some(&reply), RELAY);
            let uppercase_e = tags.iter().filter(|t| t[0] == "E").count();
            let lowercase_e = tags.iter().filter(|t| t[0] == "e").count();
            assert_eq!(uppercase_e, 1);
            assert_eq!(lowercase_e, 1);
        }
    }

    #[test]
    fn test_reply_parent_differs_from_root() {
        let root = event_ref("r1", "p1", 21, "");
        let reply = event_ref("c0", "p2", COMMENT_KIND, "");
        let tags = build_comment_tags(&root, Some(&reply), RELAY);

        let root_id = tags.iter().find(|t| t[0] == "E").unwrap();
        let parent_id = tags.iter().find(|t| t[0] == "e").unwrap();
        assert_eq!(root_id[1], "r1");
        assert_eq!(parent_id[1], "c0");

        // Root tags precede parent tags
        let first_lower = tags.iter().position(|t| t[0] == "e").unwrap();
        let last_upper = tags.iter().rposition(|t| t[0] == "E").unwrap();
        assert!(last_upper < first_lower);
    }

    #[test]
    fn test_is_top_level_and_parent_comment_id() {
        let root = event_ref("r1", "p1", 21, "");
        let top_level = comment_with_tags(build_comment_tags(&root, None, RELAY));
        assert!(is_top_level(&top_level));
        assert_eq!(parent_comment_id(&top_level), None);

        let reply_target = event_ref("c1", "commenter", COMMENT_KIND, "");
        let nested = comment_with_tags(build_comment_tags(&root, Some(&reply_target), RELAY));
        assert!(!is_top_level(&nested));
        assert_eq!(parent_comment_id(&nested), Some("c1"));
    }

    #[test]
    fn test_validate_comment() {
        let root = event_ref("r1", "p1", 21, "");
        let good = comment_with_tags(build_comment_tags(&root, None, RELAY));
        assert!(validate_comment(&good).is_ok());

        let mut wrong_kind = good.clone();
        wrong_kind.kind = 1;
        assert!(matches!(validate_comment(&wrong_kind), Err(Nip22Error::InvalidKind(1))));

        let no_refs = comment_with_tags(vec![]);
        assert!(matches!(
            validate_comment(&no_refs),
            Err(Nip22Error::MissingRootReference)
        ));
    }

    #[test]
    fn test_target_identifier() {
        let event = event_ref("r1", "p1", 21, "");
        assert_eq!(event.identifier(), "r1");

        let url = CommentTarget::External(Url::parse("https://example.com/v/1").unwrap());
        assert_eq!(url.identifier(), "https://example.com/v/1");
    }
}
