//! Multi-channel publication of posts, win batches and promos.

mod common;

use common::{CHANNEL_A, CHANNEL_B, CHANNEL_C, CONFIG, Call, Harness, OWNER, WATCH};
use signalpost_core::{ChannelPost, ChatId, FileRef, MessageId};
use std::time::Duration;

#[tokio::test]
async fn test_unmoderated_post_reaches_every_channel_once_in_order() {
    let mut h = Harness::unmoderated().await;
    h.post_fragments(1).await;
    h.win("win1", "120%").await;
    h.settle().await;

    assert!(h.endpoint.calls_to(OWNER).is_empty());

    let captions: Vec<(ChatId, String)> = h
        .endpoint
        .calls()
        .into_iter()
        .filter_map(|c| match c {
            Call::Photo {
                chat,
                caption: Some(caption),
                ..
            } => Some((chat, caption)),
            _ => None,
        })
        .collect();
    assert_eq!(
        captions,
        vec![
            (ChatId(CHANNEL_A), "copy of x1".to_string()),
            (ChatId(CHANNEL_B), "[Spanish] copy of x1".to_string()),
            (ChatId(CHANNEL_C), "[Portuguese] copy of x1".to_string()),
        ]
    );

    for (chat, thread) in [(CHANNEL_A, 11), (CHANNEL_B, 21), (CHANNEL_C, 31)] {
        let calls = h.endpoint.calls_to(chat);
        let documents: Vec<_> = calls
            .iter()
            .filter(|c| matches!(c, Call::Document { .. }))
            .collect();
        assert_eq!(documents.len(), 1);
        match &calls[0] {
            Call::Photo { photo, options, .. } => {
                assert_eq!(photo, &FileRef::from("chart1"));
                assert_eq!(options.reply_to, Some(MessageId(thread)));
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    let post = h.repository.posts().remove(0);
    assert!(post.is_published);
    assert_eq!(
        post.published_channels
            .iter()
            .map(|forecast| forecast.channel_id)
            .collect::<Vec<_>>(),
        vec![ChatId(CHANNEL_A), ChatId(CHANNEL_B), ChatId(CHANNEL_C)]
    );
    assert_eq!(h.coordinator.metrics().posts_published(), 1);
}

#[tokio::test]
async fn test_win_revealed_as_reply_to_chart() {
    let mut h = Harness::unmoderated().await;
    h.post_fragments(1).await;
    h.win("win1", "120%").await;
    h.settle().await;

    for (chat, thread) in [(CHANNEL_A, 11), (CHANNEL_B, 21), (CHANNEL_C, 31)] {
        let calls = h.endpoint.calls_to(chat);
        assert_eq!(calls.len(), 4);
        let Call::Photo { .. } = &calls[0] else {
            panic!("chart first");
        };
        match &calls[2] {
            Call::Text { text, options, .. } => {
                assert_eq!(text, "🔥");
                assert_eq!(options.reply_to, Some(MessageId(thread)));
            }
            other => panic!("unexpected {other:?}"),
        }
        match &calls[3] {
            Call::Photo {
                photo,
                caption,
                options,
                ..
            } => {
                assert_eq!(photo, &FileRef::from("win1"));
                assert!(caption.is_none());
                assert!(options.reply_to.is_some());
                assert_ne!(options.reply_to, Some(MessageId(thread)));
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    let messages = h.repository.win_messages();
    assert_eq!(messages.len(), 3);
    assert!(messages.iter().all(|m| m.win_photo == FileRef::from("win1")));
    assert_eq!(
        messages.iter().map(|m| m.channel_id).collect::<Vec<_>>(),
        vec![ChatId(CHANNEL_A), ChatId(CHANNEL_B), ChatId(CHANNEL_C)]
    );
}

#[tokio::test]
async fn test_approve_publishes_once() {
    let mut h = Harness::new().await;
    h.post_fragments(1).await;
    h.win("win1", "120%").await;
    let id = h.repository.posts()[0].id;

    h.press(&format!("pp:{id}")).await;
    h.press(&format!("pp:{id}")).await;
    h.settle().await;
    h.press(&format!("pp:{id}")).await;
    h.settle().await;

    for chat in [CHANNEL_A, CHANNEL_B, CHANNEL_C] {
        let documents = h
            .endpoint
            .calls_to(chat)
            .into_iter()
            .filter(|c| matches!(c, Call::Document { .. }))
            .count();
        assert_eq!(documents, 1);
    }
    let confirmations = h
        .endpoint
        .texts_to(OWNER)
        .into_iter()
        .filter(|t| *t == h.config.texts.post_published)
        .count();
    assert_eq!(confirmations, 1);
    assert!(h.repository.posts()[0].is_published);
}

fn documents_to(h: &Harness, chat: i64) -> usize {
    h.endpoint
        .calls_to(chat)
        .into_iter()
        .filter(|c| matches!(c, Call::Document { .. }))
        .count()
}

#[tokio::test]
async fn test_send_failure_aborts_pass_and_approval_resumes_it() {
    let mut h = Harness::new().await;
    h.post_fragments(1).await;
    h.win("win1", "120%").await;
    let id = h.repository.posts()[0].id;

    h.endpoint.fail_sends_to(CHANNEL_B);
    h.press(&format!("pp:{id}")).await;
    h.settle().await;

    let post = h.repository.posts().remove(0);
    assert!(!post.is_published);
    assert!(post.is_published_to(ChatId(CHANNEL_A)));
    assert!(!post.is_published_to(ChatId(CHANNEL_B)));
    assert_eq!(documents_to(&h, CHANNEL_A), 1);
    assert!(h.endpoint.calls_to(CHANNEL_B).is_empty());
    assert!(h.endpoint.calls_to(CHANNEL_C).is_empty());
    assert!(h.repository.win_messages().is_empty());
    assert_eq!(h.coordinator.metrics().publish_failures(), 1);
    assert_eq!(h.coordinator.metrics().posts_published(), 0);

    h.endpoint.restore_sends();
    h.press(&format!("pp:{id}")).await;
    h.settle().await;

    for chat in [CHANNEL_A, CHANNEL_B, CHANNEL_C] {
        assert_eq!(documents_to(&h, chat), 1);
    }
    let post = h.repository.posts().remove(0);
    assert!(post.is_published);
    assert_eq!(h.coordinator.metrics().posts_published(), 1);

    // The first pass's channel still gets its win, under its original chart.
    assert_eq!(
        h.repository
            .win_messages()
            .iter()
            .map(|m| m.channel_id)
            .collect::<Vec<_>>(),
        vec![ChatId(CHANNEL_A), ChatId(CHANNEL_B), ChatId(CHANNEL_C)]
    );
    let win_reply = h
        .endpoint
        .calls_to(CHANNEL_A)
        .into_iter()
        .find_map(|c| match c {
            Call::Photo { photo, options, .. } if photo == FileRef::from("win1") => {
                Some(options.reply_to)
            }
            _ => None,
        });
    assert_eq!(win_reply, Some(post.chart_in(ChatId(CHANNEL_A))));
}

#[tokio::test(start_paused = true)]
async fn test_edit_during_publication_is_kept() {
    let config = CONFIG.replace("channel_delay_ms = 0", "channel_delay_ms = 1000");
    let mut h = Harness::with_config(&config).await;
    h.post_fragments(1).await;
    h.win("win1", "120%").await;
    let id = h.repository.posts()[0].id;

    h.press(&format!("pp:{id}")).await;
    // Channel A is out; the pass now waits before channel B.
    tokio::time::sleep(Duration::from_millis(500)).await;
    assert_eq!(documents_to(&h, CHANNEL_A), 1);
    assert!(h.endpoint.calls_to(CHANNEL_B).is_empty());

    h.press_on(&format!("ep:{id}"), MessageId(2)).await;
    h.say(Some("edited copy"), None).await;
    h.settle().await;

    let post = h.repository.posts().remove(0);
    assert!(post.is_published);
    assert_eq!(post.generated_text, "edited copy");
    let caption = h
        .endpoint
        .calls_to(CHANNEL_C)
        .into_iter()
        .find_map(|c| match c {
            Call::Photo { caption, .. } => caption,
            _ => None,
        });
    assert_eq!(caption.as_deref(), Some("[Portuguese] edited copy"));
}

#[tokio::test]
async fn test_voice_post_sends_chart_then_voice() {
    let mut h = Harness::new().await;
    h.post_fragments(1).await;
    h.win("win1", "120%").await;
    let id = h.repository.posts()[0].id;

    h.press_on(&format!("ep:{id}"), MessageId(2)).await;
    h.say(Some("spoken copy"), Some("voice1")).await;
    h.press(&format!("pp:{id}")).await;
    h.settle().await;

    let calls = h.endpoint.calls_to(CHANNEL_B);
    match &calls[0] {
        Call::Photo {
            caption, options, ..
        } => {
            assert!(caption.is_none());
            assert_eq!(options.reply_to, Some(MessageId(21)));
        }
        other => panic!("unexpected {other:?}"),
    }
    match &calls[1] {
        Call::Voice {
            voice,
            caption,
            options,
            ..
        } => {
            assert_eq!(voice, &FileRef::from("voice1"));
            assert_eq!(caption.as_deref(), Some("[Spanish] spoken copy"));
            assert!(options.reply_to.is_some());
        }
        other => panic!("unexpected {other:?}"),
    }
    assert!(matches!(&calls[2], Call::Document { .. }));
}

#[tokio::test]
async fn test_unmoderated_win_batch_sent_in_groups_of_ten() {
    let mut h = Harness::unmoderated().await;
    h.post_fragments(1).await;
    h.win("win1", "120%").await;
    for i in 0..12 {
        h.win(&format!("w{i}"), "50%").await;
    }
    h.tick().await;
    h.tick().await;
    h.settle().await;

    for (chat, thread) in [(CHANNEL_A, 11), (CHANNEL_B, 21), (CHANNEL_C, 31)] {
        let groups: Vec<(usize, Option<MessageId>)> = h
            .endpoint
            .calls_to(chat)
            .into_iter()
            .filter_map(|c| match c {
                Call::MediaGroup {
                    photos, reply_to, ..
                } => Some((photos.len(), reply_to)),
                _ => None,
            })
            .collect();
        assert_eq!(
            groups,
            vec![
                (10, Some(MessageId(thread))),
                (2, Some(MessageId(thread)))
            ]
        );
    }

    let batch = h.repository.batches().remove(0);
    assert!(batch.is_published);
    let batch_messages = h
        .repository
        .win_messages()
        .into_iter()
        .filter(|m| m.win_photo != FileRef::from("win1"))
        .count();
    assert_eq!(batch_messages, 36);
    assert_eq!(h.coordinator.metrics().win_batches_published(), 1);
}

#[tokio::test]
async fn test_moderated_win_batch_previewed_then_published() {
    let mut h = Harness::new().await;
    h.post_fragments(1).await;
    h.win("win1", "120%").await;
    for i in 0..11 {
        h.win(&format!("w{i}"), "50%").await;
    }
    h.tick().await;
    h.endpoint.clear();
    h.tick().await;

    let calls = h.endpoint.calls_to(OWNER);
    assert_eq!(calls.len(), 3);
    assert!(matches!(&calls[0], Call::MediaGroup { photos, reply_to: None, .. } if photos.len() == 10));
    assert!(matches!(&calls[1], Call::MediaGroup { photos, .. } if photos.len() == 1));
    let header_reply = match &calls[2] {
        Call::Text { text, options, .. } => {
            assert_eq!(text, &h.config.texts.wins_header);
            assert!(options.markup.is_some());
            options.reply_to
        }
        other => panic!("unexpected {other:?}"),
    };
    // Anchor and announcement took ids 1 and 2, the groups 3..=13.
    assert_eq!(header_reply, Some(MessageId(13)));
    assert!(h.endpoint.calls_to(CHANNEL_A).is_empty());

    let id = h.repository.batches()[0].id;
    h.press(&format!("pwp:{id}")).await;
    h.press(&format!("pwp:{id}")).await;
    h.settle().await;

    let groups = h
        .endpoint
        .calls_to(CHANNEL_C)
        .into_iter()
        .filter(|c| matches!(c, Call::MediaGroup { .. }))
        .count();
    assert_eq!(groups, 2);
    assert!(h.repository.batches()[0].is_published);
}

#[tokio::test]
async fn test_deleted_win_batch_never_published() {
    let mut h = Harness::new().await;
    h.post_fragments(1).await;
    h.win("win1", "120%").await;
    h.win("w1", "50%").await;
    h.tick().await;
    h.tick().await;

    let id = h.repository.batches()[0].id;
    h.press(&format!("dwp:{id}")).await;
    h.press(&format!("pwp:{id}")).await;
    h.settle().await;

    assert!(h.repository.batches().is_empty());
    assert!(h.endpoint.calls_to(CHANNEL_A).is_empty());
}

#[tokio::test]
async fn test_promo_text_resent_everywhere() {
    let mut h = Harness::new().await;
    h.channel_post(ChannelPost {
        chat_id: ChatId(WATCH),
        message_id: MessageId(77),
        text: Some("#promo Join <now>".to_string()),
        ..ChannelPost::default()
    })
    .await;

    for (chat, thread) in [(CHANNEL_A, 11), (CHANNEL_B, 21), (CHANNEL_C, 31)] {
        let calls = h.endpoint.calls_to(chat);
        assert_eq!(calls.len(), 1);
        match &calls[0] {
            Call::Text { text, options, .. } => {
                assert_eq!(text, "Join &lt;now&gt;");
                assert_eq!(options.reply_to, Some(MessageId(thread)));
            }
            other => panic!("unexpected {other:?}"),
        }
    }
}

#[tokio::test]
async fn test_promo_media_copied_with_clean_caption() {
    let mut h = Harness::new().await;
    h.post_fragments(1).await;
    h.channel_post(ChannelPost {
        chat_id: ChatId(WATCH),
        message_id: MessageId(78),
        caption: Some("Big sale #promo".to_string()),
        photo: Some("banner".into()),
        ..ChannelPost::default()
    })
    .await;

    let copies: Vec<Call> = h
        .endpoint
        .calls()
        .into_iter()
        .filter(|c| matches!(c, Call::Copy { .. }))
        .collect();
    assert_eq!(copies.len(), 3);
    for copy in copies {
        let Call::Copy {
            from_chat,
            message_id,
            caption,
            ..
        } = copy
        else {
            unreachable!();
        };
        assert_eq!(from_chat, ChatId(WATCH));
        assert_eq!(message_id, MessageId(78));
        assert_eq!(caption.as_deref(), Some("Big sale"));
    }
    // Promos do not disturb the post buffer.
    h.win("win1", "120%").await;
    assert_eq!(h.repository.posts().len(), 1);
}
