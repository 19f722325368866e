//! NIP-25: Reactions
//!
//! Kind 7 events expressing a reaction to another event. A content of `"+"`
//! means "like"; `"-"` means "dislike"; anything else, including an empty
//! string, is treated as an emoji reaction. Vlogstr additionally accepts a
//! small set of emoji as like synonyms because several popular clients
//! publish them instead of `"+"`; that set is an interoperability
//! accommodation, not part of the NIP. `is_like` and `ReactionType` apply
//! the same set, so the two never disagree about an event.
//!
//! Unliking never mutates or replaces the reaction: the client publishes a
//! NIP-09 deletion request referencing its own reaction event.
//!
//! See: <https://github.com/nostr-protocol/nips/blob/master/25.md>

use crate::nip01::{Event, KIND_REACTION};
use thiserror::Error;

/// Event kind for reactions
pub const REACTION_KIND: u16 = KIND_REACTION;

/// The canonical like content
pub const LIKE_CONTENT: &str = "+";

/// Content values accepted as a "like" signal. `"+"` is canonical; the emoji
/// are synonyms published by other clients in the wild.
pub const LIKE_CONTENT_VALUES: &[&str] = &["+", "\u{2764}\u{fe0f}", "\u{1f919}"];

/// Errors that can occur during NIP-25 operations
#[derive(Debug, Error)]
pub enum Nip25Error {
    #[error("invalid event kind: expected 7, got {0}")]
    InvalidKind(u16),

    #[error("reaction references no event")]
    MissingTarget,
}

/// Interpretation of a reaction's content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReactionType {
    Like,
    Dislike,
    Emoji(String),
}

/// A parsed reaction event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reaction {
    pub event_id: String,
    pub author: String,
    pub target_event_id: String,
    pub target_kind: Option<u16>,
    pub reaction: ReactionType,
}

impl Reaction {
    /// Parse a kind 7 event. The target is the last "e" tag per NIP-25.
    pub fn from_event(event: &Event) -> Result<Self, Nip25Error> {
        if event.kind != REACTION_KIND {
            return Err(Nip25Error::InvalidKind(event.kind));
        }

        let target_event_id = event
            .tags
            .iter()
            .rev()
            .find(|tag| tag.first().map(|s| s.as_str()) == Some("e"))
            .and_then(|tag| tag.get(1))
            .cloned()
            .ok_or(Nip25Error::MissingTarget)?;

        let target_kind = event.tag_value("k").and_then(|k| k.parse().ok());

        let reaction = match event.content.as_str() {
            content if LIKE_CONTENT_VALUES.contains(&content) => ReactionType::Like,
            "-" => ReactionType::Dislike,
            other => ReactionType::Emoji(other.to_string()),
        };

        Ok(Self {
            event_id: event.id.clone(),
            author: event.pubkey.clone(),
            target_event_id,
            target_kind,
            reaction,
        })
    }
}

/// Check whether a kind is the reaction kind.
pub fn is_reaction_kind(kind: u16) -> bool {
    kind == REACTION_KIND
}

/// Whether a reaction event counts as a like, including the synonym set.
pub fn is_like(event: &Event) -> bool {
    event.kind == REACTION_KIND && LIKE_CONTENT_VALUES.contains(&event.content.as_str())
}

/// Build the tag set for a new like on the given target.
///
/// Emits `["e", <id>]` and `["k", <kind>]` so relays and counters can filter
/// reactions by the kind of the reacted-to event.
pub fn create_reaction_tags(target_event_id: &str, target_kind: u16) -> Vec<Vec<String>> {
    vec![
        vec!["e".to_string(), target_event_id.to_string()],
        vec!["k".to_string(), target_kind.to_string()],
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reaction_event(id: &str, pubkey: &str, content: &str, tags: Vec<Vec<String>>) -> Event {
        Event {
            id: id.to_string(),
            pubkey: pubkey.to_string(),
            created_at: 1234567890,
            kind: REACTION_KIND,
            tags,
            content: content.to_string(),
            sig: String::new(),
        }
    }

    #[test]
    fn test_create_reaction_tags() {
        let tags = create_reaction_tags("abc123", 21);
        assert_eq!(
            tags,
            vec![
                vec!["e".to_string(), "abc123".to_string()],
                vec!["k".to_string(), "21".to_string()],
            ]
        );
    }

    #[test]
    fn test_is_like_accepts_synonyms() {
        for content in ["+", "\u{2764}\u{fe0f}", "\u{1f919}"] {
            let event = reaction_event("r1", "pk", content, vec![]);
            assert!(is_like(&event), "content {:?} should count as a like", content);
        }

        let dislike = reaction_event("r2", "pk", "-", vec![]);
        assert!(!is_like(&dislike));

        let other_emoji = reaction_event("r3", "pk", "\u{1f525}", vec![]);
        assert!(!is_like(&other_emoji));
    }

    #[test]
    fn test_is_like_requires_reaction_kind() {
        let mut event = reaction_event("r1", "pk", "+", vec![]);
        event.kind = 1;
        assert!(!is_like(&event));
    }

    #[test]
    fn test_from_event() {
        let event = reaction_event(
            "r1",
            "pk",
            "+",
            create_reaction_tags("abc123", 21),
        );
        let reaction = Reaction::from_event(&event).unwrap();
        assert_eq!(reaction.target_event_id, "abc123");
        assert_eq!(reaction.target_kind, Some(21));
        assert_eq!(reaction.reaction, ReactionType::Like);
    }

    #[test]
    fn test_from_event_uses_last_e_tag() {
        let event = reaction_event(
            "r1",
            "pk",
            "\u{1f525}",
            vec![
                vec!["e".to_string(), "older".to_string()],
                vec!["e".to_string(), "target".to_string()],
            ],
        );
        let reaction = Reaction::from_event(&event).unwrap();
        assert_eq!(reaction.target_event_id, "target");
        assert_eq!(reaction.reaction, ReactionType::Emoji("\u{1f525}".to_string()));
    }

    #[test]
    fn test_from_event_missing_target() {
        let event = reaction_event("r1", "pk", "+", vec![]);
        assert!(matches!(
            Reaction::from_event(&event),
            Err(Nip25Error::MissingTarget)
        ));
    }

    #[test]
    fn test_empty_content_agrees_with_is_like() {
        // Empty content is outside the synonym set for both accessors.
        let event = reaction_event("r1", "pk", "", create_reaction_tags("t", 22));
        assert!(!is_like(&event));
        let reaction = Reaction::from_event(&event).unwrap();
        assert_eq!(reaction.reaction, ReactionType::Emoji(String::new()));
    }

    #[test]
    fn test_synonyms_parse_as_like() {
        for &content in LIKE_CONTENT_VALUES {
            let event = reaction_event("r1", "pk", content, create_reaction_tags("t", 21));
            let reaction = Reaction::from_event(&event).unwrap();
            assert_eq!(reaction.reaction, ReactionType::Like, "content {content:?}");
        }
    }
}
