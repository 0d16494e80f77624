//! Daily jobs: best-win rebroadcast and link rotation.

use crate::{BotConfig, Services, SettingsStore};
use chrono::{DateTime, Duration, Utc};
use signalpost_core::{InlineButton, InlineKeyboard, SendOptions, WinMessage};
use signalpost_error::SignalpostResult;
use signalpost_interface::MessagingEndpoint;
use tracing::{debug, info, instrument, warn};

/// How far back the best win is searched.
pub const BEST_WIN_LOOKBACK_HOURS: i64 = 24;

/// Copy the best win of the last day into each channel's top thread.
///
/// Returns the number of copies sent. Win messages whose channel is no longer
/// configured are skipped.
#[instrument(skip(services, config))]
pub async fn rebroadcast_best_win(
    services: &Services,
    config: &BotConfig,
    now: DateTime<Utc>,
) -> SignalpostResult<usize> {
    let since = now - Duration::hours(BEST_WIN_LOOKBACK_HOURS);
    let Some(best) = services.repository.best_win_percent_since(since).await? else {
        info!("No win samples in the last day");
        return Ok(0);
    };

    let messages = services.repository.win_messages_for(&best.win_photo).await?;
    if messages.is_empty() {
        info!(win_percent = best.win_percent, "Best win was never published");
        return Ok(0);
    }

    let mut sent = 0;
    for message in &messages {
        let Some(channel) = config.channel(message.channel_id) else {
            warn!(channel_id = %message.channel_id, "Win message from unknown channel");
            continue;
        };
        let caption = best_win_caption(message, channel.main_topic_id);
        services
            .endpoint
            .copy_message(
                channel.chat_id(),
                message.channel_id,
                message.win_message_id,
                Some(&caption),
                SendOptions::reply_to(channel.top_topic()),
            )
            .await?;
        sent += 1;
    }

    info!(win_percent = best.win_percent, sent, "Best win rebroadcast");
    Ok(sent)
}

/// Caption linking back to the original win message.
pub fn best_win_caption(message: &WinMessage, main_topic_id: i32) -> String {
    format!(
        "👉 <a href=\"{}?thread={}\">{}</a>",
        message.win_message_url,
        main_topic_id,
        message.created_at.format("%Y/%m/%d %H:%M")
    )
}

/// Send each channel its next rotating link, round-robin.
///
/// The advanced index is persisted before sending. Returns the number of
/// links sent.
#[instrument(skip_all)]
pub async fn rotate_links(
    endpoint: &dyn MessagingEndpoint,
    config: &BotConfig,
    settings: &mut SettingsStore,
) -> SignalpostResult<usize> {
    let mut sent = 0;
    for channel in &config.channels {
        if channel.message_links.is_empty() {
            continue;
        }
        let chat = channel.chat_id();
        let index = settings.link_index(chat) % channel.message_links.len();
        settings
            .set_link_index(chat, (index + 1) % channel.message_links.len())
            .await?;

        let keyboard = InlineKeyboard::column([InlineButton::url(
            &config.texts.cta_button,
            format!(
                "https://t.me/{}?start={}",
                config.telegram.deep_link_bot, channel.utm_source
            ),
        )]);
        endpoint
            .send_text(
                chat,
                &channel.message_links[index],
                SendOptions::reply_to(channel.top_topic()).with_keyboard(keyboard),
            )
            .await?;
        debug!(channel_id = %chat, index, "Link rotated");
        sent += 1;
    }
    Ok(sent)
}
