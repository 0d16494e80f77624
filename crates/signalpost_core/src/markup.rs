//! Outbound message options and transport receipts.

use crate::{ChatId, MessageId};
use serde::{Deserialize, Serialize};

/// What happens when an inline button is pressed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ButtonAction {
    /// Send encoded callback data back to the bot
    Callback(String),
    /// Open a URL
    Url(String),
}

/// One inline button.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InlineButton {
    /// Label
    pub text: String,
    /// Press behaviour
    pub action: ButtonAction,
}

impl InlineButton {
    /// Button that reports `data` back to the bot.
    pub fn callback(text: impl Into<String>, data: impl ToString) -> Self {
        Self {
            text: text.into(),
            action: ButtonAction::Callback(data.to_string()),
        }
    }

    /// Button that opens `url`.
    pub fn url(text: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            action: ButtonAction::Url(url.into()),
        }
    }
}

/// Rows of inline buttons attached under a message.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InlineKeyboard {
    /// Button rows, top to bottom
    pub rows: Vec<Vec<InlineButton>>,
}

impl InlineKeyboard {
    /// Keyboard with one button per row.
    pub fn column(buttons: impl IntoIterator<Item = InlineButton>) -> Self {
        Self {
            rows: buttons.into_iter().map(|button| vec![button]).collect(),
        }
    }

    /// All buttons, row by row.
    pub fn buttons(&self) -> impl Iterator<Item = &InlineButton> {
        self.rows.iter().flatten()
    }
}

/// Markup sent alongside a message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ReplyMarkup {
    /// Inline buttons
    Inline(InlineKeyboard),
    /// Ask the client to open a reply box
    ForceReply,
    /// Hide any custom reply keyboard
    RemoveKeyboard,
}

/// Placement and markup for an outbound message.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SendOptions {
    /// Message (or forum topic root) to reply to
    pub reply_to: Option<MessageId>,
    /// Markup to attach
    pub markup: Option<ReplyMarkup>,
}

impl SendOptions {
    /// Reply to `message_id`.
    pub fn reply_to(message_id: MessageId) -> Self {
        Self {
            reply_to: Some(message_id),
            markup: None,
        }
    }

    /// Attach markup.
    pub fn with_markup(mut self, markup: ReplyMarkup) -> Self {
        self.markup = Some(markup);
        self
    }

    /// Attach an inline keyboard.
    pub fn with_keyboard(self, keyboard: InlineKeyboard) -> Self {
        self.with_markup(ReplyMarkup::Inline(keyboard))
    }
}

/// Chat addressed by id or by public username.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ChatTarget {
    /// Numeric chat id
    Id(ChatId),
    /// Public username without the `@`
    Username(String),
}

/// Receipt for a message the transport accepted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SentMessage {
    /// Chat the message landed in
    pub chat_id: ChatId,
    /// Assigned message id
    pub message_id: MessageId,
    /// Public link to the message
    pub url: String,
}
