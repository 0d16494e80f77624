//! Inbound events delivered by the messaging transport.

use crate::{ChatId, FileRef, MessageId, MessageRef, UserId};
use serde::{Deserialize, Serialize};

/// Everything the bot reacts to, already normalised by the transport.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum InboundEvent {
    /// A post in a channel the bot is a member of
    ChannelPost(ChannelPost),
    /// An inline button press
    Callback(CallbackQuery),
    /// A direct message to the bot
    OperatorMessage(OperatorMessage),
}

/// A channel post as seen by the bot.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChannelPost {
    /// Channel the post appeared in
    pub chat_id: ChatId,
    /// Post id within the channel
    pub message_id: MessageId,
    /// Body of a text post
    pub text: Option<String>,
    /// Caption of a media post
    pub caption: Option<String>,
    /// Largest size of an attached photo
    pub photo: Option<FileRef>,
    /// Attached document
    pub document: Option<FileRef>,
}

impl ChannelPost {
    /// Location of this post.
    pub fn message_ref(&self) -> MessageRef {
        MessageRef::new(self.chat_id, self.message_id)
    }
}

/// An inline button press.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CallbackQuery {
    /// Query id, used to acknowledge the press
    pub id: String,
    /// Who pressed the button
    pub from: UserId,
    /// Message carrying the button, when still accessible
    pub message: Option<MessageRef>,
    /// Encoded action
    pub data: String,
}

/// A direct message from a user to the bot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OperatorMessage {
    /// Sender
    pub from: UserId,
    /// Private chat with the sender
    pub chat_id: ChatId,
    /// Message id within the chat
    pub message_id: MessageId,
    /// Text or caption, HTML formatted
    pub text: Option<String>,
    /// Attached voice note
    pub voice: Option<FileRef>,
}

impl OperatorMessage {
    /// Location of this message.
    pub fn message_ref(&self) -> MessageRef {
        MessageRef::new(self.chat_id, self.message_id)
    }

    /// Parse the message as a bot command, if it is one.
    pub fn command(&self) -> Option<BotCommand> {
        self.text.as_deref().and_then(BotCommand::parse)
    }
}

/// Commands accepted from the operator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum BotCommand {
    /// Render the settings toggles
    Admin,
    /// Attach or remove a URL button; raw arguments follow the command
    Button {
        /// Everything after the command word
        args: String,
    },
}

impl BotCommand {
    /// Parse `/admin` or `/button ...`, tolerating a `@botname` suffix.
    ///
    /// # Examples
    ///
    /// ```
    /// use signalpost_core::BotCommand;
    ///
    /// assert_eq!(BotCommand::parse("/admin@signal_bot"), Some(BotCommand::Admin));
    /// assert_eq!(
    ///     BotCommand::parse("/button https://t.me/chan/5"),
    ///     Some(BotCommand::Button { args: "https://t.me/chan/5".to_string() })
    /// );
    /// assert_eq!(BotCommand::parse("hello"), None);
    /// ```
    pub fn parse(text: &str) -> Option<Self> {
        let text = text.trim();
        let rest = text.strip_prefix('/')?;
        let (word, args) = match rest.split_once(char::is_whitespace) {
            Some((word, args)) => (word, args.trim()),
            None => (rest, ""),
        };
        let name = word.split('@').next().unwrap_or(word);

        match name {
            "admin" => Some(Self::Admin),
            "button" => Some(Self::Button {
                args: args.to_string(),
            }),
            _ => None,
        }
    }
}
