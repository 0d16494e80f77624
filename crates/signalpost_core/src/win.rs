//! Win media records: batches, strength samples and published copies.

use crate::{ChatId, FileRef, MessageId};
use chrono::{DateTime, Utc};
use regex::Regex;
use serde::{Deserialize, Serialize};
use signalpost_error::{InputError, InputErrorKind};
use std::sync::LazyLock;

static WIN_PERCENT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(\d+(?:\.\d+)?)%").expect("win percent pattern is valid")
});

/// Extract the win strength from a `#win` caption.
///
/// The first `NN%` or `NN.N%` token wins. A caption without a token, or with a
/// token that does not fit a finite number, is an input error: the caller must
/// not record a sample for it.
///
/// # Examples
///
/// ```
/// use signalpost_core::parse_win_percent;
///
/// assert_eq!(parse_win_percent("#win x96 = 9500%").unwrap(), 9500.0);
/// assert_eq!(parse_win_percent("#win 12.5% today").unwrap(), 12.5);
/// assert!(parse_win_percent("#win huge").is_err());
/// ```
pub fn parse_win_percent(caption: &str) -> Result<f64, InputError> {
    let token = WIN_PERCENT
        .captures(caption)
        .and_then(|captures| captures.get(1))
        .ok_or_else(|| {
            InputError::new(InputErrorKind::MissingWinPercent(caption.to_string()))
        })?
        .as_str();

    match token.parse::<f64>() {
        Ok(value) if value.is_finite() => Ok(value),
        _ => Err(InputError::new(InputErrorKind::InvalidWinPercent(
            token.to_string(),
        ))),
    }
}

/// Win images collected during one collection window.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WinBatch {
    /// Repository-assigned identity
    pub id: i32,
    /// Creation timestamp
    pub created_at: DateTime<Utc>,
    /// Images in arrival order, never empty
    pub win_photos: Vec<FileRef>,
    /// Whether the batch reached every channel
    pub is_published: bool,
}

/// One timestamped win strength sample.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WinPercent {
    /// Repository-assigned identity
    pub id: i32,
    /// Creation timestamp
    pub created_at: DateTime<Utc>,
    /// Image the sample was read from
    pub win_photo: FileRef,
    /// Win strength in percent
    pub win_percent: f64,
}

/// A win sample ready to be stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewWinPercent {
    /// Image the sample was read from
    pub win_photo: FileRef,
    /// Win strength in percent
    pub win_percent: f64,
}

/// Where a win image landed in a destination channel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WinMessage {
    /// Repository-assigned identity
    pub id: i32,
    /// Creation timestamp
    pub created_at: DateTime<Utc>,
    /// Destination channel
    pub channel_id: ChatId,
    /// Image that was published
    pub win_photo: FileRef,
    /// Resulting message in the channel
    pub win_message_id: MessageId,
    /// Public link to that message
    pub win_message_url: String,
}

/// A published win copy ready to be stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewWinMessage {
    /// Destination channel
    pub channel_id: ChatId,
    /// Image that was published
    pub win_photo: FileRef,
    /// Resulting message in the channel
    pub win_message_id: MessageId,
    /// Public link to that message
    pub win_message_url: String,
}
