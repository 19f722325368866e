mod common;

use common::{seed_event, signed_in};
use nostr_core::{
    COMMENT_KIND, CONTACT_LIST_KIND, KIND_SHORT_TEXT_NOTE, KIND_VIDEO, REACTION_KIND,
};
use vlogstr::AnalyticsService;

fn reaction(id: &str, pubkey: &str, video_id: &str, content: &str) -> nostr_core::Event {
    let mut event = seed_event(id, pubkey, REACTION_KIND, 100);
    event.tags = vec![vec!["e".to_string(), video_id.to_string()]];
    event.content = content.to_string();
    event
}

fn comment(id: &str, pubkey: &str, kind: u16, video_id: &str) -> nostr_core::Event {
    let mut event = seed_event(id, pubkey, kind, 100);
    event.tags = vec![vec!["e".to_string(), video_id.to_string()]];
    event.content = "a comment".to_string();
    event
}

#[tokio::test]
async fn overview_counts_strict_likes_and_foreign_comments() {
    let app = signed_in("creator");
    let analytics = AnalyticsService::new(app.session.clone());

    app.relay.insert(seed_event("v1", "creator", KIND_VIDEO, 100)).await;
    app.relay.insert(seed_event("v2", "creator", KIND_VIDEO, 200)).await;

    // Only the plain "+" counts toward the overview.
    app.relay.insert(reaction("r1", "fan1", "v1", "+")).await;
    app.relay.insert(reaction("r2", "fan2", "v1", "\u{2764}\u{fe0f}")).await;
    app.relay.insert(reaction("r3", "fan3", "v2", "+")).await;

    // The creator's own comment is excluded.
    app.relay.insert(comment("c1", "fan1", COMMENT_KIND, "v1")).await;
    app.relay.insert(comment("c2", "creator", COMMENT_KIND, "v1")).await;
    app.relay.insert(comment("c3", "fan2", KIND_SHORT_TEXT_NOTE, "v2")).await;

    for (id, fan) in [("f1", "fan1"), ("f2", "fan2")] {
        let mut list = seed_event(id, fan, CONTACT_LIST_KIND, 100);
        list.tags = vec![vec!["p".to_string(), "creator".to_string()]];
        app.relay.insert(list).await;
    }

    let overview = analytics.overview().await.unwrap();
    assert_eq!(overview.total_videos, 2);
    assert_eq!(overview.total_likes, 2);
    assert_eq!(overview.total_comments, 2);
    assert_eq!(overview.total_followers, 2);
}

#[tokio::test]
async fn per_video_uses_synonym_likes_and_title_fallback() {
    let app = signed_in("creator");
    let analytics = AnalyticsService::new(app.session.clone());

    let mut titled = seed_event("v1", "creator", KIND_VIDEO, 200);
    titled.tags = vec![vec!["title".to_string(), "Mountain vlog".to_string()]];
    app.relay.insert(titled).await;
    app.relay.insert(seed_event("v2", "creator", KIND_VIDEO, 100)).await;

    // All three synonyms count in the per-video breakdown.
    app.relay.insert(reaction("r1", "fan1", "v1", "+")).await;
    app.relay.insert(reaction("r2", "fan2", "v1", "\u{2764}\u{fe0f}")).await;
    app.relay.insert(reaction("r3", "fan3", "v1", "\u{1f919}")).await;
    app.relay.insert(reaction("r4", "fan4", "v1", "-")).await;

    app.relay.insert(comment("c1", "fan1", COMMENT_KIND, "v2")).await;

    let stats = analytics.per_video().await.unwrap();
    assert_eq!(stats.len(), 2);

    // Newest video first.
    assert_eq!(stats[0].video_id, "v1");
    assert_eq!(stats[0].title, "Mountain vlog");
    assert_eq!(stats[0].likes, 3);
    assert_eq!(stats[0].comments, 0);

    assert_eq!(stats[1].title, "Untitled Video");
    assert_eq!(stats[1].likes, 0);
    assert_eq!(stats[1].comments, 1);
}

#[tokio::test]
async fn overview_requires_sign_in() {
    let app = common::signed_out();
    let analytics = AnalyticsService::new(app.session.clone());
    assert!(analytics.overview().await.is_err());
}

#[tokio::test]
async fn overview_with_no_videos_is_zeroes_except_followers() {
    let app = signed_in("creator");
    let analytics = AnalyticsService::new(app.session.clone());

    let mut list = seed_event("f1", "fan1", CONTACT_LIST_KIND, 100);
    list.tags = vec![vec!["p".to_string(), "creator".to_string()]];
    app.relay.insert(list).await;

    let overview = analytics.overview().await.unwrap();
    assert_eq!(overview.total_videos, 0);
    assert_eq!(overview.total_likes, 0);
    assert_eq!(overview.total_comments, 0);
    assert_eq!(overview.total_followers, 1);
}
