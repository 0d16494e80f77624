//! Composite signal posts.

use crate::{ChatId, FileRef, MessageId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A composite signal unit assembled from four fragments.
///
/// `is_published` flips to true once every destination channel has received the
/// forecast; `published_channels` tracks progress inside a publish pass so a
/// pass that failed halfway can be resumed without re-sending, and keeps each
/// channel's chart so the win can still be revealed under it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Post {
    /// Repository-assigned identity
    pub id: i32,
    /// Creation timestamp
    pub created_at: DateTime<Utc>,
    /// Raw stats text from the `#stat` fragment
    pub stats_text: String,
    /// Generated copy, replaceable by a moderation edit
    pub generated_text: String,
    /// Chart image from the `#chart` fragment
    pub chart_photo: FileRef,
    /// Stats document from the `#file` fragment
    pub stats_file: FileRef,
    /// Win image from the `#win` fragment
    pub win_photo: FileRef,
    /// Optional voice narration attached during moderation
    pub text_voice: Option<FileRef>,
    /// Operator message anchoring the moderation thread
    pub moderation_message_id: Option<MessageId>,
    /// Whether every channel has received the forecast
    pub is_published: bool,
    /// Channels whose forecast has already been sent
    pub published_channels: Vec<ChannelForecast>,
}

/// A forecast delivered to one channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChannelForecast {
    /// Destination channel
    pub channel_id: ChatId,
    /// Chart message the win is revealed under
    pub chart_message_id: MessageId,
}

impl Post {
    /// Whether the forecast already went out to `channel`.
    pub fn is_published_to(&self, channel: ChatId) -> bool {
        self.chart_in(channel).is_some()
    }

    /// Chart message of the forecast sent to `channel`.
    pub fn chart_in(&self, channel: ChatId) -> Option<MessageId> {
        self.published_channels
            .iter()
            .find(|forecast| forecast.channel_id == channel)
            .map(|forecast| forecast.chart_message_id)
    }

    /// Record that the forecast went out to `channel` under `chart`.
    pub fn mark_published_to(&mut self, channel: ChatId, chart: MessageId) {
        if !self.is_published_to(channel) {
            self.published_channels.push(ChannelForecast {
                channel_id: channel,
                chart_message_id: chart,
            });
        }
    }

    /// Replace the copy and narration after an operator edit.
    ///
    /// A text-only edit clears any earlier narration.
    pub fn apply_edit(&mut self, text: impl Into<String>, voice: Option<FileRef>) {
        self.generated_text = text.into();
        self.text_voice = voice;
    }
}

/// A post ready to be stored; the repository assigns id and timestamp.
///
/// # Examples
///
/// ```
/// use signalpost_core::NewPostBuilder;
///
/// let post = NewPostBuilder::default()
///     .stats_text("x1.5 x2.3 x8.4")
///     .generated_text("Big multipliers incoming")
///     .chart_photo("chart")
///     .stats_file("file")
///     .win_photo("win")
///     .build()
///     .unwrap();
/// assert!(post.moderation_message_id.is_none());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, derive_builder::Builder)]
#[builder(setter(into))]
pub struct NewPost {
    /// Raw stats text
    pub stats_text: String,
    /// Generated copy
    pub generated_text: String,
    /// Chart image
    pub chart_photo: FileRef,
    /// Stats document
    pub stats_file: FileRef,
    /// Win image
    pub win_photo: FileRef,
    /// Operator message anchoring the moderation thread
    #[builder(default)]
    pub moderation_message_id: Option<MessageId>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn post() -> Post {
        Post {
            id: 1,
            created_at: Utc::now(),
            stats_text: "stats".to_string(),
            generated_text: "text".to_string(),
            chart_photo: "chart".into(),
            stats_file: "file".into(),
            win_photo: "win".into(),
            text_voice: Some("voice".into()),
            moderation_message_id: None,
            is_published: false,
            published_channels: Vec::new(),
        }
    }

    #[test]
    fn test_mark_published_to_is_idempotent() {
        let mut post = post();
        post.mark_published_to(ChatId(-100), MessageId(5));
        post.mark_published_to(ChatId(-100), MessageId(9));
        assert_eq!(post.published_channels.len(), 1);
        assert!(post.is_published_to(ChatId(-100)));
        assert!(!post.is_published_to(ChatId(-200)));
        assert_eq!(post.chart_in(ChatId(-100)), Some(MessageId(5)));
        assert_eq!(post.chart_in(ChatId(-200)), None);
    }

    #[test]
    fn test_text_edit_clears_voice() {
        let mut post = post();
        post.apply_edit("new copy", None);
        assert_eq!(post.generated_text, "new copy");
        assert!(post.text_voice.is_none());
    }
}
