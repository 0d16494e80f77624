//! Conversions between wire models and domain types.

use crate::types::{self, InlineKeyboardButton, InlineKeyboardMarkup, Update};
use crate::url::message_url;
use serde_json::{Value, json};
use signalpost_core::{
    ButtonAction, CallbackQuery, ChannelPost, ChatId, ChatTarget, FileRef, InboundEvent,
    InlineKeyboard, MessageId, MessageRef, OperatorMessage, ReplyMarkup, SentMessage, UserId,
};

/// Turn an update into the event the bot consumes.
///
/// Channel posts become [`ChannelPost`], private messages with a sender become
/// [`OperatorMessage`] and button presses carrying data become callbacks.
/// Anything else is dropped.
pub fn to_inbound(update: Update) -> Option<InboundEvent> {
    if let Some(post) = update.channel_post {
        return Some(InboundEvent::ChannelPost(channel_post(post)));
    }
    if let Some(message) = update.message {
        return operator_message(message).map(InboundEvent::OperatorMessage);
    }
    if let Some(query) = update.callback_query {
        return callback_query(query).map(InboundEvent::Callback);
    }
    None
}

fn channel_post(message: types::Message) -> ChannelPost {
    ChannelPost {
        chat_id: ChatId(message.chat.id),
        message_id: MessageId(message.message_id),
        text: message.text,
        caption: message.caption,
        // Largest rendition comes last.
        photo: message
            .photo
            .and_then(|sizes| sizes.into_iter().last())
            .map(|size| FileRef(size.file_id)),
        document: message.document.map(|doc| FileRef(doc.file_id)),
    }
}

fn operator_message(message: types::Message) -> Option<OperatorMessage> {
    if message.chat.kind != "private" {
        return None;
    }
    let from = message.from?;
    Some(OperatorMessage {
        from: UserId(from.id),
        chat_id: ChatId(message.chat.id),
        message_id: MessageId(message.message_id),
        text: message.text.or(message.caption),
        voice: message.voice.map(|voice| FileRef(voice.file_id)),
    })
}

fn callback_query(query: types::CallbackQuery) -> Option<CallbackQuery> {
    Some(CallbackQuery {
        id: query.id,
        from: UserId(query.from.id),
        message: query
            .message
            .map(|m| MessageRef::new(ChatId(m.chat.id), MessageId(m.message_id))),
        data: query.data?,
    })
}

/// Receipt for a message the Bot API returned.
pub fn sent_message(message: &types::Message) -> SentMessage {
    let chat_id = ChatId(message.chat.id);
    let message_id = MessageId(message.message_id);
    SentMessage {
        chat_id,
        message_id,
        url: message_url(chat_id, message.chat.username.as_deref(), message_id),
    }
}

/// Wire form of an inline keyboard.
pub fn keyboard_markup(keyboard: &InlineKeyboard) -> InlineKeyboardMarkup {
    InlineKeyboardMarkup {
        inline_keyboard: keyboard
            .rows
            .iter()
            .map(|row| {
                row.iter()
                    .map(|button| {
                        let (callback_data, url) = match &button.action {
                            ButtonAction::Callback(data) => (Some(data.clone()), None),
                            ButtonAction::Url(url) => (None, Some(url.clone())),
                        };
                        InlineKeyboardButton {
                            text: button.text.clone(),
                            callback_data,
                            url,
                        }
                    })
                    .collect()
            })
            .collect(),
    }
}

/// Wire form of any reply markup.
pub fn reply_markup(markup: &ReplyMarkup) -> Value {
    match markup {
        ReplyMarkup::Inline(keyboard) => json!(keyboard_markup(keyboard)),
        ReplyMarkup::ForceReply => json!({ "force_reply": true }),
        ReplyMarkup::RemoveKeyboard => json!({ "remove_keyboard": true }),
    }
}

/// Wire form of a chat addressed by id or username.
pub fn chat_target(target: &ChatTarget) -> Value {
    match target {
        ChatTarget::Id(id) => json!(id.0),
        ChatTarget::Username(name) if name.starts_with('@') => json!(name),
        ChatTarget::Username(name) => json!(format!("@{}", name)),
    }
}
