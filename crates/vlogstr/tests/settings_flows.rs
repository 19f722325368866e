mod common;

use common::{signed_in, signed_out};
use nostr_core::APP_DATA_KIND;
use vlogstr::{FontSize, SETTINGS_D_TAG, SettingsService, UploadQuality, UserSettings};

#[tokio::test]
async fn get_returns_defaults_when_nothing_stored() {
    let app = signed_in("user");
    let settings = SettingsService::new(app.session.clone());
    assert_eq!(settings.get().await.unwrap(), UserSettings::default());
}

#[tokio::test]
async fn signed_out_get_returns_defaults() {
    let app = signed_out();
    let settings = SettingsService::new(app.session.clone());
    assert_eq!(settings.get().await.unwrap(), UserSettings::default());
}

#[tokio::test]
async fn update_round_trips_through_event() {
    let app = signed_in("user");
    let settings = SettingsService::new(app.session.clone());

    let mut desired = UserSettings::default();
    desired.compact_mode = true;
    desired.upload_quality = UploadQuality::Hd;
    desired.font_size = FontSize::Large;
    desired.like_notifications = false;

    let event = settings.update(&desired).await.unwrap();
    assert_eq!(event.kind, APP_DATA_KIND);
    assert_eq!(event.d_tag(), Some(SETTINGS_D_TAG));
    assert_eq!(event.tag_value("title"), Some("Vlogstr Settings"));

    // Write-through: the next read reflects the save without a refetch.
    assert_eq!(settings.get().await.unwrap(), desired);

    // The relay stored the replacement event.
    let stored = app.relay.events_of_kind(APP_DATA_KIND).await;
    assert_eq!(stored.len(), 1);
    assert_eq!(UserSettings::from_content(&stored[0].content), desired);
}

#[tokio::test]
async fn modify_applies_change_on_top_of_current() {
    let app = signed_in("user");
    let settings = SettingsService::new(app.session.clone());

    settings
        .modify(|s| s.push_notifications = true)
        .await
        .unwrap();
    let current = settings
        .modify(|s| s.language = "de".to_string())
        .await
        .unwrap();

    assert!(current.push_notifications);
    assert_eq!(current.language, "de");
}

#[tokio::test]
async fn update_requires_sign_in() {
    let app = signed_out();
    let settings = SettingsService::new(app.session.clone());
    assert!(settings.update(&UserSettings::default()).await.is_err());
}

#[tokio::test]
async fn stored_partial_payload_fills_defaults() {
    let app = signed_in("user");
    let settings = SettingsService::new(app.session.clone());

    // An event written by an older build with fewer fields.
    let mut event = common::seed_event("s1", "user", APP_DATA_KIND, 100);
    event.tags = vec![vec!["d".to_string(), SETTINGS_D_TAG.to_string()]];
    event.content = r#"{"muteVideosByDefault":true}"#.to_string();
    app.relay.insert(event).await;

    let current = settings.get().await.unwrap();
    assert!(current.mute_videos_by_default);
    assert!(current.autoplay_videos);
    assert_eq!(current.upload_quality, UploadQuality::FullHd);
}
