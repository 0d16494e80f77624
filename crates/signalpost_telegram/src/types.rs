//! Wire models for the subset of the Bot API signalpost uses.
//!
//! Only the fields the bot reads are modelled; serde ignores the rest.

use serde::{Deserialize, Serialize};

/// Envelope every Bot API method answers with.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiResponse<T> {
    /// Whether the call succeeded
    pub ok: bool,
    /// Method result on success
    pub result: Option<T>,
    /// Human-readable failure reason
    #[serde(default)]
    pub description: Option<String>,
    /// Numeric failure code
    #[serde(default)]
    pub error_code: Option<i64>,
}

/// One incoming update.
#[derive(Debug, Clone, Deserialize)]
pub struct Update {
    /// Monotonic update identifier
    pub update_id: i64,
    /// Message in a private chat or group
    #[serde(default)]
    pub message: Option<Message>,
    /// Post in a channel the bot administers
    #[serde(default)]
    pub channel_post: Option<Message>,
    /// Inline button press
    #[serde(default)]
    pub callback_query: Option<CallbackQuery>,
}

/// A message as the Bot API reports it.
#[derive(Debug, Clone, Deserialize)]
pub struct Message {
    /// Identifier unique within the chat
    pub message_id: i32,
    /// Chat the message belongs to
    pub chat: Chat,
    /// Sender; absent for channel posts
    #[serde(default)]
    pub from: Option<User>,
    /// Text body
    #[serde(default)]
    pub text: Option<String>,
    /// Media caption
    #[serde(default)]
    pub caption: Option<String>,
    /// Photo renditions, smallest first
    #[serde(default)]
    pub photo: Option<Vec<PhotoSize>>,
    /// Attached document
    #[serde(default)]
    pub document: Option<FileObject>,
    /// Attached voice note
    #[serde(default)]
    pub voice: Option<FileObject>,
}

/// A chat.
#[derive(Debug, Clone, Deserialize)]
pub struct Chat {
    /// Chat identifier
    pub id: i64,
    /// "private", "group", "supergroup" or "channel"
    #[serde(rename = "type")]
    pub kind: String,
    /// Public username, if any
    #[serde(default)]
    pub username: Option<String>,
}

/// A user.
#[derive(Debug, Clone, Deserialize)]
pub struct User {
    /// User identifier
    pub id: i64,
}

/// One rendition of a photo.
#[derive(Debug, Clone, Deserialize)]
pub struct PhotoSize {
    /// Reusable file identifier
    pub file_id: String,
    /// Width in pixels
    #[serde(default)]
    pub width: u32,
    /// Height in pixels
    #[serde(default)]
    pub height: u32,
}

/// A document, voice note or other single file.
#[derive(Debug, Clone, Deserialize)]
pub struct FileObject {
    /// Reusable file identifier
    pub file_id: String,
}

/// An inline button press.
#[derive(Debug, Clone, Deserialize)]
pub struct CallbackQuery {
    /// Identifier used to acknowledge the press
    pub id: String,
    /// Who pressed
    pub from: User,
    /// Message carrying the keyboard
    #[serde(default)]
    pub message: Option<Message>,
    /// Callback payload
    #[serde(default)]
    pub data: Option<String>,
}

/// Result of `copyMessage`.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct MessageIdResult {
    /// Identifier of the copy
    pub message_id: i32,
}

/// Reply target for outgoing messages.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct ReplyParameters {
    /// Message to reply to
    pub message_id: i32,
}

/// An inline keyboard button on the wire.
#[derive(Debug, Clone, Serialize)]
pub struct InlineKeyboardButton {
    /// Label
    pub text: String,
    /// Payload sent back on press
    #[serde(skip_serializing_if = "Option::is_none")]
    pub callback_data: Option<String>,
    /// URL opened on press
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

/// An inline keyboard on the wire.
#[derive(Debug, Clone, Serialize)]
pub struct InlineKeyboardMarkup {
    /// Button rows
    pub inline_keyboard: Vec<Vec<InlineKeyboardButton>>,
}

/// A photo entry of `sendMediaGroup`.
#[derive(Debug, Clone, Serialize)]
pub struct InputMediaPhoto {
    /// Always "photo"
    #[serde(rename = "type")]
    pub kind: &'static str,
    /// File identifier
    pub media: String,
}

impl InputMediaPhoto {
    /// A photo entry for `file_id`.
    pub fn new(file_id: impl Into<String>) -> Self {
        Self {
            kind: "photo",
            media: file_id.into(),
        }
    }
}
