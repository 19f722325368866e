//! Subscription filters (NIP-01 `REQ` semantics)

use nostr_core::Event;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Filter for relay queries.
///
/// All set conditions must match (AND); values inside one condition are
/// alternatives (OR). Tag conditions serialize as `#`-prefixed keys alongside
/// the fixed fields.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Filter {
    /// Event IDs
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ids: Option<Vec<String>>,

    /// Authors (pubkeys)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub authors: Option<Vec<String>>,

    /// Event kinds
    #[serde(skip_serializing_if = "Option::is_none")]
    pub kinds: Option<Vec<u16>>,

    /// Events since timestamp
    #[serde(skip_serializing_if = "Option::is_none")]
    pub since: Option<u64>,

    /// Events until timestamp
    #[serde(skip_serializing_if = "Option::is_none")]
    pub until: Option<u64>,

    /// Maximum number of events
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<u64>,

    /// Generic tag queries (e.g., #e, #p)
    /// The key is the tag letter prefixed with #, value is list of values
    #[serde(flatten, skip_serializing_if = "HashMap::is_empty")]
    pub tags: HashMap<String, Vec<String>>,
}

impl Filter {
    /// Create a new empty filter.
    pub fn new() -> Self {
        Self::default()
    }

    /// Filter by event IDs.
    pub fn ids(mut self, ids: Vec<String>) -> Self {
        self.ids = Some(ids);
        self
    }

    /// Filter by authors.
    pub fn authors(mut self, authors: Vec<String>) -> Self {
        self.authors = Some(authors);
        self
    }

    /// Filter by kinds.
    pub fn kinds(mut self, kinds: Vec<u16>) -> Self {
        self.kinds = Some(kinds);
        self
    }

    /// Filter by events since timestamp.
    pub fn since(mut self, timestamp: u64) -> Self {
        self.since = Some(timestamp);
        self
    }

    /// Filter by events until timestamp.
    pub fn until(mut self, timestamp: u64) -> Self {
        self.until = Some(timestamp);
        self
    }

    /// Limit number of results.
    pub fn limit(mut self, n: u64) -> Self {
        self.limit = Some(n);
        self
    }

    /// Add a tag filter. The key should be the tag letter (e.g., "e", "p").
    pub fn tag(mut self, key: impl Into<String>, values: Vec<String>) -> Self {
        self.tags.insert(format!("#{}", key.into()), values);
        self
    }

    /// Filter by #e (event reference) tags.
    pub fn event_refs(self, event_ids: Vec<String>) -> Self {
        self.tag("e", event_ids)
    }

    /// Filter by #p (pubkey reference) tags.
    pub fn pubkey_refs(self, pubkeys: Vec<String>) -> Self {
        self.tag("p", pubkeys)
    }

    /// Filter by #a (addressable event coordinate) tags.
    pub fn address_refs(self, addresses: Vec<String>) -> Self {
        self.tag("a", addresses)
    }

    /// Filter by #d (identifier) tags.
    pub fn d_tags(self, identifiers: Vec<String>) -> Self {
        self.tag("d", identifiers)
    }

    /// Filter by #t (hashtag) tags.
    pub fn hashtag_refs(self, hashtags: Vec<String>) -> Self {
        self.tag("t", hashtags)
    }

    /// Filter by #i (external identifier) tags.
    pub fn external_refs(self, identifiers: Vec<String>) -> Self {
        self.tag("i", identifiers)
    }

    /// Whether an event satisfies every condition of this filter.
    ///
    /// `limit` is a result-set bound, not a per-event condition, and is
    /// ignored here.
    pub fn matches(&self, event: &Event) -> bool {
        if let Some(ids) = &self.ids
            && !ids.iter().any(|id| id == &event.id)
        {
            return false;
        }
        if let Some(authors) = &self.authors
            && !authors.iter().any(|a| a == &event.pubkey)
        {
            return false;
        }
        if let Some(kinds) = &self.kinds
            && !kinds.contains(&event.kind)
        {
            return false;
        }
        if let Some(since) = self.since
            && event.created_at < since
        {
            return false;
        }
        if let Some(until) = self.until
            && event.created_at > until
        {
            return false;
        }
        for (key, values) in &self.tags {
            let Some(tag_name) = key.strip_prefix('#') else {
                continue;
            };
            let found = event
                .tag_values(tag_name)
                .any(|v| values.iter().any(|w| w == v));
            if !found {
                return false;
            }
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_test_event(id: &str, pubkey: &str, kind: u16, created_at: u64) -> Event {
        Event {
            id: id.to_string(),
            pubkey: pubkey.to_string(),
            created_at,
            kind,
            tags: vec![],
            content: "test".to_string(),
            sig: "sig".to_string(),
        }
    }

    #[test]
    fn test_filter_serialization() {
        let filter = Filter::new()
            .kinds(vec![21, 22])
            .limit(40)
            .event_refs(vec!["abc".to_string()]);
        let json = serde_json::to_value(&filter).unwrap();
        assert_eq!(json["kinds"], serde_json::json!([21, 22]));
        assert_eq!(json["limit"], 40);
        assert_eq!(json["#e"], serde_json::json!(["abc"]));
        assert!(json.get("ids").is_none());
    }

    #[test]
    fn test_matches_kinds_and_authors() {
        let filter = Filter::new()
            .kinds(vec![21])
            .authors(vec!["pk1".to_string()]);

        assert!(filter.matches(&create_test_event("e1", "pk1", 21, 100)));
        assert!(!filter.matches(&create_test_event("e2", "pk2", 21, 100)));
        assert!(!filter.matches(&create_test_event("e3", "pk1", 22, 100)));
    }

    #[test]
    fn test_matches_time_window() {
        let filter = Filter::new().since(100).until(200);
        assert!(filter.matches(&create_test_event("e1", "pk", 1, 150)));
        assert!(filter.matches(&create_test_event("e2", "pk", 1, 100)));
        assert!(!filter.matches(&create_test_event("e3", "pk", 1, 99)));
        assert!(!filter.matches(&create_test_event("e4", "pk", 1, 201)));
    }

    #[test]
    fn test_matches_tags() {
        let filter = Filter::new().event_refs(vec!["target".to_string()]);

        let mut with_tag = create_test_event("e1", "pk", 7, 100);
        with_tag.tags = vec![vec!["e".to_string(), "target".to_string()]];
        assert!(filter.matches(&with_tag));

        let without = create_test_event("e2", "pk", 7, 100);
        assert!(!filter.matches(&without));
    }

    #[test]
    fn test_matches_ignores_limit() {
        let filter = Filter::new().limit(0);
        assert!(filter.matches(&create_test_event("e1", "pk", 1, 100)));
    }

    #[test]
    fn test_matches_d_tag() {
        let filter = Filter::new().d_tags(vec!["vlogstr-settings".to_string()]);
        let mut event = create_test_event("e1", "pk", 30078, 100);
        event.tags = vec![vec!["d".to_string(), "vlogstr-settings".to_string()]];
        assert!(filter.matches(&event));
    }
}
