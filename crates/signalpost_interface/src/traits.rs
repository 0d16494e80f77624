//! Collaborator traits.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use signalpost_core::{
    ChatId, ChatTarget, FileRef, InlineKeyboard, MessageId, NewPost, NewWinMessage,
    NewWinPercent, Post, SendOptions, SentMessage, WinBatch, WinMessage, WinPercent,
};
use signalpost_error::SignalpostResult;

/// Outbound side of the messaging transport.
///
/// Every send returns the transport's receipt; failures surface as
/// transport errors and abort whatever sequence the caller was running.
#[async_trait]
pub trait MessagingEndpoint: Send + Sync {
    /// Send a text message.
    async fn send_text(
        &self,
        chat: ChatId,
        text: &str,
        options: SendOptions,
    ) -> SignalpostResult<SentMessage>;

    /// Send a photo by reference, optionally captioned.
    async fn send_photo(
        &self,
        chat: ChatId,
        photo: &FileRef,
        caption: Option<&str>,
        options: SendOptions,
    ) -> SignalpostResult<SentMessage>;

    /// Send a document by reference.
    async fn send_document(
        &self,
        chat: ChatId,
        document: &FileRef,
        options: SendOptions,
    ) -> SignalpostResult<SentMessage>;

    /// Send a voice note by reference, optionally captioned.
    async fn send_voice(
        &self,
        chat: ChatId,
        voice: &FileRef,
        caption: Option<&str>,
        options: SendOptions,
    ) -> SignalpostResult<SentMessage>;

    /// Send up to one media group of photos; receipts come back in input order.
    async fn send_media_group(
        &self,
        chat: ChatId,
        photos: &[FileRef],
        reply_to: Option<MessageId>,
    ) -> SignalpostResult<Vec<SentMessage>>;

    /// Copy an existing message, replacing its caption when one is given.
    async fn copy_message(
        &self,
        chat: ChatId,
        from_chat: ChatId,
        message_id: MessageId,
        caption: Option<&str>,
        options: SendOptions,
    ) -> SignalpostResult<SentMessage>;

    /// Replace (or with `None`, remove) the inline keyboard of a message.
    async fn edit_message_markup(
        &self,
        chat: &ChatTarget,
        message_id: MessageId,
        keyboard: Option<&InlineKeyboard>,
    ) -> SignalpostResult<()>;

    /// Delete a message.
    async fn delete_message(&self, chat: ChatId, message_id: MessageId) -> SignalpostResult<()>;

    /// Acknowledge an inline button press.
    async fn answer_callback(&self, callback_id: &str) -> SignalpostResult<()>;
}

/// Turns raw stats into human-readable copy.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    /// Generate copy of roughly `target_length` characters.
    async fn generate(&self, stats_text: &str, target_length: u32) -> SignalpostResult<String>;
}

/// Localises generated copy.
#[async_trait]
pub trait Translator: Send + Sync {
    /// Translate `text` into `language`, honouring `language_note`.
    async fn translate(
        &self,
        language: &str,
        language_note: &str,
        text: &str,
    ) -> SignalpostResult<String>;
}

/// Durable storage for every record the bot keeps.
///
/// The repository owns identity assignment and creation timestamps.
#[async_trait]
pub trait Repository: Send + Sync {
    /// Store a new post.
    async fn create_post(&self, post: NewPost) -> SignalpostResult<Post>;

    /// Load a post by id.
    async fn get_post(&self, id: i32) -> SignalpostResult<Option<Post>>;

    /// Persist every mutable field of `post`.
    async fn update_post(&self, post: &Post) -> SignalpostResult<()>;

    /// Remove a post permanently; missing posts are ignored.
    async fn delete_post(&self, id: i32) -> SignalpostResult<()>;

    /// Store a new win batch.
    async fn create_win_batch(&self, win_photos: Vec<FileRef>) -> SignalpostResult<WinBatch>;

    /// Load a win batch by id.
    async fn get_win_batch(&self, id: i32) -> SignalpostResult<Option<WinBatch>>;

    /// Persist the publication state of `batch`.
    async fn update_win_batch(&self, batch: &WinBatch) -> SignalpostResult<()>;

    /// Remove a win batch permanently; missing batches are ignored.
    async fn delete_win_batch(&self, id: i32) -> SignalpostResult<()>;

    /// Record a win strength sample.
    async fn record_win_percent(&self, sample: NewWinPercent) -> SignalpostResult<WinPercent>;

    /// Highest sample created at or after `since`.
    async fn best_win_percent_since(
        &self,
        since: DateTime<Utc>,
    ) -> SignalpostResult<Option<WinPercent>>;

    /// Record where a win image was published.
    async fn record_win_message(&self, message: NewWinMessage) -> SignalpostResult<WinMessage>;

    /// Every published copy of `win_photo`.
    async fn win_messages_for(&self, win_photo: &FileRef) -> SignalpostResult<Vec<WinMessage>>;
}
