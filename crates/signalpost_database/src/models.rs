//! Row types mapping the diesel schema onto domain records.

use crate::schema::{posts, win_batches, win_messages, win_percents};
use chrono::{DateTime, Utc};
use diesel::prelude::*;
use signalpost_core::{
    ChannelForecast, ChatId, FileRef, MessageId, NewPost, NewWinMessage, NewWinPercent, Post, WinBatch,
    WinMessage, WinPercent,
};

/// A stored post.
#[derive(Debug, Clone, PartialEq, Queryable, Selectable, Identifiable)]
#[diesel(table_name = posts)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct PostRow {
    pub id: i32,
    pub stats_text: String,
    pub generated_text: String,
    pub chart_photo_id: String,
    pub stats_file_id: String,
    pub win_photo_id: String,
    pub text_voice_id: Option<String>,
    pub moderation_message_id: Option<i32>,
    pub is_published: bool,
    pub published_channels: Vec<i64>,
    pub chart_message_ids: Vec<i32>,
    pub created_at: DateTime<Utc>,
}

impl From<PostRow> for Post {
    fn from(row: PostRow) -> Self {
        Self {
            id: row.id,
            created_at: row.created_at,
            stats_text: row.stats_text,
            generated_text: row.generated_text,
            chart_photo: FileRef(row.chart_photo_id),
            stats_file: FileRef(row.stats_file_id),
            win_photo: FileRef(row.win_photo_id),
            text_voice: row.text_voice_id.map(FileRef),
            moderation_message_id: row.moderation_message_id.map(MessageId),
            is_published: row.is_published,
            published_channels: row
                .published_channels
                .into_iter()
                .zip(row.chart_message_ids)
                .map(|(channel, chart)| ChannelForecast {
                    channel_id: ChatId(channel),
                    chart_message_id: MessageId(chart),
                })
                .collect(),
        }
    }
}

/// A post to insert.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = posts)]
pub struct NewPostRow {
    pub stats_text: String,
    pub generated_text: String,
    pub chart_photo_id: String,
    pub stats_file_id: String,
    pub win_photo_id: String,
    pub moderation_message_id: Option<i32>,
}

impl From<NewPost> for NewPostRow {
    fn from(post: NewPost) -> Self {
        Self {
            stats_text: post.stats_text,
            generated_text: post.generated_text,
            chart_photo_id: post.chart_photo.0,
            stats_file_id: post.stats_file.0,
            win_photo_id: post.win_photo.0,
            moderation_message_id: post.moderation_message_id.map(|id| id.0),
        }
    }
}

/// Mutable post fields.
///
/// `None` narration is written as NULL so a text-only edit clears it.
#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = posts)]
#[diesel(treat_none_as_null = true)]
pub struct UpdatePostRow {
    pub generated_text: String,
    pub text_voice_id: Option<String>,
    pub moderation_message_id: Option<i32>,
    pub is_published: bool,
    pub published_channels: Vec<i64>,
    pub chart_message_ids: Vec<i32>,
}

impl From<&Post> for UpdatePostRow {
    fn from(post: &Post) -> Self {
        Self {
            generated_text: post.generated_text.clone(),
            text_voice_id: post.text_voice.as_ref().map(|voice| voice.0.clone()),
            moderation_message_id: post.moderation_message_id.map(|id| id.0),
            is_published: post.is_published,
            published_channels: post
                .published_channels
                .iter()
                .map(|forecast| forecast.channel_id.0)
                .collect(),
            chart_message_ids: post
                .published_channels
                .iter()
                .map(|forecast| forecast.chart_message_id.0)
                .collect(),
        }
    }
}

/// A stored win batch.
#[derive(Debug, Clone, PartialEq, Queryable, Selectable, Identifiable)]
#[diesel(table_name = win_batches)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct WinBatchRow {
    pub id: i32,
    pub win_photo_ids: Vec<String>,
    pub is_published: bool,
    pub created_at: DateTime<Utc>,
}

impl From<WinBatchRow> for WinBatch {
    fn from(row: WinBatchRow) -> Self {
        Self {
            id: row.id,
            created_at: row.created_at,
            win_photos: row.win_photo_ids.into_iter().map(FileRef).collect(),
            is_published: row.is_published,
        }
    }
}

/// A win batch to insert.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = win_batches)]
pub struct NewWinBatchRow {
    pub win_photo_ids: Vec<String>,
}

/// A stored win sample.
#[derive(Debug, Clone, PartialEq, Queryable, Selectable, Identifiable)]
#[diesel(table_name = win_percents)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct WinPercentRow {
    pub id: i32,
    pub win_photo_id: String,
    pub win_percent: f64,
    pub created_at: DateTime<Utc>,
}

impl From<WinPercentRow> for WinPercent {
    fn from(row: WinPercentRow) -> Self {
        Self {
            id: row.id,
            created_at: row.created_at,
            win_photo: FileRef(row.win_photo_id),
            win_percent: row.win_percent,
        }
    }
}

/// A win sample to insert.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = win_percents)]
pub struct NewWinPercentRow {
    pub win_photo_id: String,
    pub win_percent: f64,
}

impl From<NewWinPercent> for NewWinPercentRow {
    fn from(sample: NewWinPercent) -> Self {
        Self {
            win_photo_id: sample.win_photo.0,
            win_percent: sample.win_percent,
        }
    }
}

/// A stored published win copy.
#[derive(Debug, Clone, PartialEq, Queryable, Selectable, Identifiable)]
#[diesel(table_name = win_messages)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct WinMessageRow {
    pub id: i32,
    pub channel_id: i64,
    pub win_photo_id: String,
    pub win_message_id: i32,
    pub win_message_url: String,
    pub created_at: DateTime<Utc>,
}

impl From<WinMessageRow> for WinMessage {
    fn from(row: WinMessageRow) -> Self {
        Self {
            id: row.id,
            created_at: row.created_at,
            channel_id: ChatId(row.channel_id),
            win_photo: FileRef(row.win_photo_id),
            win_message_id: MessageId(row.win_message_id),
            win_message_url: row.win_message_url,
        }
    }
}

/// A published win copy to insert.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = win_messages)]
pub struct NewWinMessageRow {
    pub channel_id: i64,
    pub win_photo_id: String,
    pub win_message_id: i32,
    pub win_message_url: String,
}

impl From<NewWinMessage> for NewWinMessageRow {
    fn from(message: NewWinMessage) -> Self {
        Self {
            channel_id: message.channel_id.0,
            win_photo_id: message.win_photo.0,
            win_message_id: message.win_message_id.0,
            win_message_url: message.win_message_url,
        }
    }
}
