mod common;

use common::{seed_event, signed_in};
use nostr_core::{COMMENT_KIND, CommentTarget, KIND_VIDEO};
use vlogstr::CommentService;

#[tokio::test]
async fn top_level_comment_duplicates_root_tags() {
    let app = signed_in("commenter");
    let comments = CommentService::new(app.session.clone());

    let video = seed_event("r1", "p1", KIND_VIDEO, 100);
    app.relay.insert(video.clone()).await;
    let root = CommentTarget::event(&video);

    let event = comments.post(&root, None, "nice vlog").await.unwrap();
    assert_eq!(event.kind, COMMENT_KIND);

    // Root scope first, then the parent scope repeating the same reference.
    let relay_url = app.session.config.relay_url.clone();
    assert_eq!(
        event.tags,
        vec![
            vec!["E".to_string(), "r1".to_string(), relay_url.clone(), "p1".to_string()],
            vec!["K".to_string(), "21".to_string()],
            vec!["P".to_string(), "p1".to_string(), relay_url.clone()],
            vec!["e".to_string(), "r1".to_string(), relay_url.clone(), "p1".to_string()],
            vec!["k".to_string(), "21".to_string()],
            vec!["p".to_string(), "p1".to_string(), relay_url],
        ]
    );
}

#[tokio::test]
async fn reply_keeps_root_scope_and_points_parent_at_comment() {
    let app = signed_in("commenter");
    let comments = CommentService::new(app.session.clone());

    let video = seed_event("r1", "p1", KIND_VIDEO, 100);
    app.relay.insert(video.clone()).await;
    let root = CommentTarget::event(&video);

    let top = comments.post(&root, None, "first").await.unwrap();
    let reply = comments.post(&root, Some(&top), "agreed").await.unwrap();

    // Uppercase tags still reference the video.
    assert!(reply.tags.iter().any(|t| t[0] == "E" && t[1] == "r1"));
    // Lowercase tags reference the comment being answered.
    assert!(reply.tags.iter().any(|t| t[0] == "e" && t[1] == top.id));
    assert!(
        reply
            .tags
            .iter()
            .any(|t| t[0] == "k" && t[1] == COMMENT_KIND.to_string())
    );
}

#[tokio::test]
async fn list_assembles_thread() {
    let app = signed_in("commenter");
    let comments = CommentService::new(app.session.clone());

    let video = seed_event("r1", "p1", KIND_VIDEO, 100);
    app.relay.insert(video.clone()).await;
    let root = CommentTarget::event(&video);

    let top = comments.post(&root, None, "first").await.unwrap();
    comments.post(&root, Some(&top), "reply one").await.unwrap();
    comments.post(&root, Some(&top), "reply two").await.unwrap();

    let thread = comments.list(&root).await.unwrap();
    assert_eq!(thread.top_level.len(), 1);
    assert_eq!(thread.top_level[0].id, top.id);
    assert_eq!(thread.replies.get(&top.id).map(Vec::len), Some(2));
    assert_eq!(thread.len(), 3);
}

#[tokio::test]
async fn post_invalidates_cached_thread() {
    let app = signed_in("commenter");
    let comments = CommentService::new(app.session.clone());

    let video = seed_event("r1", "p1", KIND_VIDEO, 100);
    app.relay.insert(video.clone()).await;
    let root = CommentTarget::event(&video);

    assert!(comments.list(&root).await.unwrap().is_empty());
    comments.post(&root, None, "hello").await.unwrap();

    // The freshly cached empty result was invalidated by the post.
    let thread = comments.list(&root).await.unwrap();
    assert_eq!(thread.len(), 1);
}

#[tokio::test]
async fn failed_post_surfaces_error() {
    let app = signed_in("commenter");
    app.relay.set_publish_failure(true).await;
    let comments = CommentService::new(app.session.clone());

    let video = seed_event("r1", "p1", KIND_VIDEO, 100);
    let root = CommentTarget::event(&video);

    assert!(comments.post(&root, None, "hello").await.is_err());
    assert!(app.relay.events_of_kind(COMMENT_KIND).await.is_empty());
}

#[tokio::test]
async fn external_url_roots_use_i_tags() {
    let app = signed_in("commenter");
    let comments = CommentService::new(app.session.clone());

    let url = url::Url::parse("https://example.com/watch/99").unwrap();
    let root = CommentTarget::external(url);

    let event = comments.post(&root, None, "seen elsewhere").await.unwrap();
    assert!(
        event
            .tags
            .iter()
            .any(|t| t[0] == "I" && t[1] == "https://example.com/watch/99")
    );
    assert!(event.tags.iter().any(|t| t[0] == "K" && t[1] == "example.com"));

    let thread = comments.list(&root).await.unwrap();
    assert_eq!(thread.len(), 1);
}
