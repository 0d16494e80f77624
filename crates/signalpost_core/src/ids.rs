//! Identifier newtypes shared across crates.

use serde::{Deserialize, Serialize};

/// Transport chat identifier (channels are negative).
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    derive_more::Display,
    derive_more::From,
)]
#[serde(transparent)]
#[display("{}", _0)]
pub struct ChatId(pub i64);

/// Transport user identifier.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    derive_more::Display,
    derive_more::From,
)]
#[serde(transparent)]
#[display("{}", _0)]
pub struct UserId(pub i64);

/// Message identifier, unique within one chat.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    derive_more::Display,
    derive_more::From,
)]
#[serde(transparent)]
#[display("{}", _0)]
pub struct MessageId(pub i32);

/// Opaque reference to media already stored by the transport.
///
/// Re-sending a file by reference avoids uploading it again.
#[derive(
    Debug,
    Clone,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    derive_more::Display,
    derive_more::From,
)]
#[serde(transparent)]
#[display("{}", _0)]
pub struct FileRef(pub String);

impl FileRef {
    /// Borrow the raw reference.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for FileRef {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

/// A message located by chat and id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MessageRef {
    /// Chat holding the message
    pub chat_id: ChatId,
    /// Message id within the chat
    pub message_id: MessageId,
}

impl MessageRef {
    /// Create a new message reference.
    pub fn new(chat_id: ChatId, message_id: MessageId) -> Self {
        Self {
            chat_id,
            message_id,
        }
    }
}
