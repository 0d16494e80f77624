//! Daily jobs and the persisted settings record.

mod common;

use chrono::{Duration, NaiveDate, Utc};
use common::{CHANNEL_A, CHANNEL_B, CHANNEL_C, Call, Harness};
use signalpost_bot::{BotEvent, SettingsStore};
use signalpost_core::{ButtonAction, ChatId, MessageId, NewWinMessage, ReplyMarkup};
use signalpost_interface::Repository;
use std::collections::BTreeMap;

async fn record_message(h: &Harness, channel: i64, photo: &str, id: i32) {
    h.repository
        .record_win_message(NewWinMessage {
            channel_id: ChatId(channel),
            win_photo: photo.into(),
            win_message_id: MessageId(id),
            win_message_url: format!("https://t.me/c/{}/{}", -channel, id),
        })
        .await
        .unwrap();
}

#[tokio::test]
async fn test_best_win_of_last_day_rebroadcast() {
    let mut h = Harness::new().await;
    let now = Utc::now();
    h.repository
        .insert_win_percent("imgA", 60.0, now - Duration::hours(2));
    h.repository
        .insert_win_percent("imgB", 95.0, now - Duration::hours(1));
    h.repository
        .insert_win_percent("imgC", 40.0, now - Duration::hours(30));
    h.repository
        .insert_win_percent("imgD", 99.0, now - Duration::hours(25));

    record_message(&h, CHANNEL_A, "imgB", 501).await;
    record_message(&h, CHANNEL_B, "imgB", 502).await;
    record_message(&h, -4242, "imgB", 503).await;
    record_message(&h, CHANNEL_A, "imgA", 504).await;
    record_message(&h, CHANNEL_C, "imgD", 505).await;

    h.handle(BotEvent::BestWinRebroadcast).await;

    let copies: Vec<Call> = h
        .endpoint
        .calls()
        .into_iter()
        .filter(|c| matches!(c, Call::Copy { .. }))
        .collect();
    assert_eq!(copies.len(), 2);

    for (copy, (channel, message, top, main)) in copies
        .iter()
        .zip([(CHANNEL_A, 501, 12, 11), (CHANNEL_B, 502, 22, 21)])
    {
        let Call::Copy {
            chat,
            from_chat,
            message_id,
            caption,
            options,
        } = copy
        else {
            unreachable!();
        };
        assert_eq!(*chat, ChatId(channel));
        assert_eq!(*from_chat, ChatId(channel));
        assert_eq!(*message_id, MessageId(message));
        assert_eq!(options.reply_to, Some(MessageId(top)));
        let caption = caption.as_deref().unwrap();
        assert!(caption.starts_with(&format!(
            "👉 <a href=\"https://t.me/c/{}/{}?thread={}\">",
            -channel, message, main
        )));
    }
    assert_eq!(h.coordinator.metrics().snapshot().best_win_rebroadcasts, 2);
}

#[tokio::test]
async fn test_rebroadcast_skipped_without_samples_or_messages() {
    let mut h = Harness::new().await;
    h.handle(BotEvent::BestWinRebroadcast).await;
    assert!(h.endpoint.calls().is_empty());

    h.repository
        .insert_win_percent("lonely", 80.0, Utc::now() - Duration::hours(1));
    h.handle(BotEvent::BestWinRebroadcast).await;
    assert!(h.endpoint.calls().is_empty());
}

#[tokio::test]
async fn test_link_rotation_wraps_after_three() {
    let mut h = Harness::new().await;
    for _ in 0..4 {
        h.handle(BotEvent::LinkRotation).await;
    }

    let sent: Vec<String> = h.endpoint.texts_to(CHANNEL_A);
    assert_eq!(
        sent,
        vec![
            "https://t.me/a/1",
            "https://t.me/a/2",
            "https://t.me/a/3",
            "https://t.me/a/1"
        ]
    );
    assert!(h.endpoint.calls_to(CHANNEL_B).is_empty());
    assert!(h.endpoint.calls_to(CHANNEL_C).is_empty());

    let Some(Call::Text { options, .. }) = h.endpoint.calls_to(CHANNEL_A).pop() else {
        panic!("expected text");
    };
    assert_eq!(options.reply_to, Some(MessageId(12)));
    let Some(ReplyMarkup::Inline(keyboard)) = options.markup else {
        panic!("expected keyboard");
    };
    let button = keyboard.buttons().next().unwrap();
    assert_eq!(button.text, "🧠 AI Signal Bot");
    assert_eq!(
        button.action,
        ButtonAction::Url("https://t.me/signal_bot?start=en_chat".to_string())
    );

    assert_eq!(h.coordinator.settings().link_index(ChatId(CHANNEL_A)), 1);
    let reloaded = SettingsStore::load(h.dir.path().join("state.json"))
        .await
        .unwrap();
    assert_eq!(reloaded.link_index(ChatId(CHANNEL_A)), 1);
}

#[tokio::test]
async fn test_settings_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("state.json");

    let mut store = SettingsStore::load(&path).await.unwrap();
    store.set_moderation(false).await.unwrap();
    store.set_generation(false).await.unwrap();
    store.set_link_index(ChatId(-1001), 2).await.unwrap();
    store
        .mark_big_bucket_used(NaiveDate::from_ymd_opt(2024, 5, 17).unwrap())
        .await
        .unwrap();

    let reloaded = SettingsStore::load(&path).await.unwrap();
    assert_eq!(reloaded.settings(), store.settings());
    assert_eq!(
        reloaded.settings().current_link_index,
        BTreeMap::from([(-1001, 2)])
    );

    let empty = tempfile::tempdir().unwrap();
    let fresh = SettingsStore::load(empty.path().join("state.json"))
        .await
        .unwrap();
    assert!(fresh.moderation_enabled());
    assert!(fresh.generation_enabled());
    assert!(fresh.settings().current_link_index.is_empty());
    assert_eq!(fresh.last_big_bucket_usage(), None);
}
