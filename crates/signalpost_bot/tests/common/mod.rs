//! Hand-written collaborators shared by the integration tests.

#![allow(dead_code)]

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use signalpost_bot::{BotConfig, BotEvent, BotMetrics, Coordinator, Services, SettingsStore};
use signalpost_core::{
    CallbackQuery, ChannelPost, ChatId, ChatTarget, FileRef, InboundEvent, InlineKeyboard,
    MessageId, MessageRef, NewPost, NewWinMessage, NewWinPercent, OperatorMessage, Post,
    SendOptions, SentMessage, UserId, WinBatch, WinMessage, WinPercent,
};
use signalpost_error::{
    DatabaseError, DatabaseErrorKind, SignalpostResult, TextServiceError, TextServiceErrorKind,
    TransportError, TransportErrorKind,
};
use signalpost_interface::{MessagingEndpoint, Repository, TextGenerator, Translator};
use std::collections::BTreeMap;
use std::sync::Arc;
use tempfile::TempDir;

pub const OWNER: i64 = 100;
pub const WATCH: i64 = -1000;
pub const CHANNEL_A: i64 = -1001;
pub const CHANNEL_B: i64 = -1002;
pub const CHANNEL_C: i64 = -1003;

/// Three channels, zero publish delays, default channel first.
pub const CONFIG: &str = r#"
    [telegram]
    owner_id = 100
    watch_channel_id = -1000
    deep_link_bot = "signal_bot"

    [publishing]
    channel_delay_ms = 0
    reveal_window_secs = 0
    win_emojis = "🔥"

    [[channels]]
    language = "English"
    utm_source = "en_chat"
    channel_id = -1001
    main_topic_id = 11
    top_topic_id = 12
    is_default = true
    message_links = ["https://t.me/a/1", "https://t.me/a/2", "https://t.me/a/3"]

    [[channels]]
    language = "Spanish"
    language_note = "Neutral Latin American Spanish."
    utm_source = "es_chat"
    channel_id = -1002
    main_topic_id = 21
    top_topic_id = 22

    [[channels]]
    language = "Portuguese"
    utm_source = "pt_chat"
    channel_id = -1003
    main_topic_id = 31
    top_topic_id = 32
"#;

/// One outbound call seen by [`RecordingEndpoint`].
#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    Text {
        chat: ChatId,
        text: String,
        options: SendOptions,
    },
    Photo {
        chat: ChatId,
        photo: FileRef,
        caption: Option<String>,
        options: SendOptions,
    },
    Document {
        chat: ChatId,
        document: FileRef,
        options: SendOptions,
    },
    Voice {
        chat: ChatId,
        voice: FileRef,
        caption: Option<String>,
        options: SendOptions,
    },
    MediaGroup {
        chat: ChatId,
        photos: Vec<FileRef>,
        reply_to: Option<MessageId>,
    },
    Copy {
        chat: ChatId,
        from_chat: ChatId,
        message_id: MessageId,
        caption: Option<String>,
        options: SendOptions,
    },
    EditMarkup {
        chat: ChatTarget,
        message_id: MessageId,
        keyboard: Option<InlineKeyboard>,
    },
    Delete {
        chat: ChatId,
        message_id: MessageId,
    },
    Answer {
        callback_id: String,
    },
}

impl Call {
    /// Chat the call targets, when it has a numeric one.
    pub fn chat(&self) -> Option<ChatId> {
        match self {
            Call::Text { chat, .. }
            | Call::Photo { chat, .. }
            | Call::Document { chat, .. }
            | Call::Voice { chat, .. }
            | Call::MediaGroup { chat, .. }
            | Call::Copy { chat, .. }
            | Call::Delete { chat, .. } => Some(*chat),
            Call::EditMarkup {
                chat: ChatTarget::Id(chat),
                ..
            } => Some(*chat),
            _ => None,
        }
    }
}

/// Messaging endpoint that records calls and hands out sequential ids.
#[derive(Debug, Default)]
pub struct RecordingEndpoint {
    calls: Mutex<Vec<Call>>,
    next_id: Mutex<i32>,
    edit_failure: Mutex<Option<String>>,
    failing_chat: Mutex<Option<ChatId>>,
    answer_failure: Mutex<bool>,
}

impl RecordingEndpoint {
    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().clone()
    }

    pub fn calls_to(&self, chat: i64) -> Vec<Call> {
        self.calls()
            .into_iter()
            .filter(|c| c.chat() == Some(ChatId(chat)))
            .collect()
    }

    pub fn texts_to(&self, chat: i64) -> Vec<String> {
        self.calls_to(chat)
            .into_iter()
            .filter_map(|c| match c {
                Call::Text { text, .. } => Some(text),
                _ => None,
            })
            .collect()
    }

    pub fn clear(&self) {
        self.calls.lock().clear();
    }

    /// Make every markup edit fail with `description`.
    pub fn fail_edits(&self, description: &str) {
        *self.edit_failure.lock() = Some(description.to_string());
    }

    /// Reject every send to `chat` until [`Self::restore_sends`].
    pub fn fail_sends_to(&self, chat: i64) {
        *self.failing_chat.lock() = Some(ChatId(chat));
    }

    pub fn restore_sends(&self) {
        *self.failing_chat.lock() = None;
    }

    /// Make every callback answer fail.
    pub fn fail_answers(&self) {
        *self.answer_failure.lock() = true;
    }

    fn check_send(&self, chat: ChatId) -> SignalpostResult<()> {
        if *self.failing_chat.lock() == Some(chat) {
            return Err(TransportError::new(TransportErrorKind::Api {
                code: 403,
                description: "Forbidden: bot is not a member of the channel chat".to_string(),
            })
            .into());
        }
        Ok(())
    }

    /// Record an accepted send; sends to a failing chat are rejected unrecorded.
    fn record(&self, call: Call) -> SignalpostResult<SentMessage> {
        let chat = call.chat().unwrap_or_default();
        self.check_send(chat)?;
        self.calls.lock().push(call);
        Ok(self.receipt(chat))
    }

    fn receipt(&self, chat: ChatId) -> SentMessage {
        let mut next = self.next_id.lock();
        *next += 1;
        SentMessage {
            chat_id: chat,
            message_id: MessageId(*next),
            url: format!("https://t.me/c/{}/{}", -chat.0, *next),
        }
    }
}

#[async_trait]
impl MessagingEndpoint for RecordingEndpoint {
    async fn send_text(
        &self,
        chat: ChatId,
        text: &str,
        options: SendOptions,
    ) -> SignalpostResult<SentMessage> {
        self.record(Call::Text {
            chat,
            text: text.to_string(),
            options,
        })
    }

    async fn send_photo(
        &self,
        chat: ChatId,
        photo: &FileRef,
        caption: Option<&str>,
        options: SendOptions,
    ) -> SignalpostResult<SentMessage> {
        self.record(Call::Photo {
            chat,
            photo: photo.clone(),
            caption: caption.map(str::to_string),
            options,
        })
    }

    async fn send_document(
        &self,
        chat: ChatId,
        document: &FileRef,
        options: SendOptions,
    ) -> SignalpostResult<SentMessage> {
        self.record(Call::Document {
            chat,
            document: document.clone(),
            options,
        })
    }

    async fn send_voice(
        &self,
        chat: ChatId,
        voice: &FileRef,
        caption: Option<&str>,
        options: SendOptions,
    ) -> SignalpostResult<SentMessage> {
        self.record(Call::Voice {
            chat,
            voice: voice.clone(),
            caption: caption.map(str::to_string),
            options,
        })
    }

    async fn send_media_group(
        &self,
        chat: ChatId,
        photos: &[FileRef],
        reply_to: Option<MessageId>,
    ) -> SignalpostResult<Vec<SentMessage>> {
        self.check_send(chat)?;
        self.calls.lock().push(Call::MediaGroup {
            chat,
            photos: photos.to_vec(),
            reply_to,
        });
        Ok(photos.iter().map(|_| self.receipt(chat)).collect())
    }

    async fn copy_message(
        &self,
        chat: ChatId,
        from_chat: ChatId,
        message_id: MessageId,
        caption: Option<&str>,
        options: SendOptions,
    ) -> SignalpostResult<SentMessage> {
        self.record(Call::Copy {
            chat,
            from_chat,
            message_id,
            caption: caption.map(str::to_string),
            options,
        })
    }

    async fn edit_message_markup(
        &self,
        chat: &ChatTarget,
        message_id: MessageId,
        keyboard: Option<&InlineKeyboard>,
    ) -> SignalpostResult<()> {
        self.calls.lock().push(Call::EditMarkup {
            chat: chat.clone(),
            message_id,
            keyboard: keyboard.cloned(),
        });
        if let Some(description) = self.edit_failure.lock().clone() {
            return Err(TransportError::new(TransportErrorKind::Api {
                code: 400,
                description,
            })
            .into());
        }
        Ok(())
    }

    async fn delete_message(&self, chat: ChatId, message_id: MessageId) -> SignalpostResult<()> {
        self.calls.lock().push(Call::Delete { chat, message_id });
        Ok(())
    }

    async fn answer_callback(&self, callback_id: &str) -> SignalpostResult<()> {
        self.calls.lock().push(Call::Answer {
            callback_id: callback_id.to_string(),
        });
        if *self.answer_failure.lock() {
            return Err(TransportError::new(TransportErrorKind::Api {
                code: 400,
                description: "Bad Request: query is too old".to_string(),
            })
            .into());
        }
        Ok(())
    }
}

/// Deterministic copy generator and translator.
#[derive(Debug, Default)]
pub struct FakeTextService {
    pub generated_lengths: Mutex<Vec<u32>>,
    pub generation_failure: Mutex<bool>,
}

#[async_trait]
impl TextGenerator for FakeTextService {
    async fn generate(&self, stats_text: &str, target_length: u32) -> SignalpostResult<String> {
        self.generated_lengths.lock().push(target_length);
        if *self.generation_failure.lock() {
            return Err(TextServiceError::new(TextServiceErrorKind::Api(
                "Server returned 503: overloaded".to_string(),
            ))
            .into());
        }
        Ok(format!("copy of {stats_text}"))
    }
}

#[async_trait]
impl Translator for FakeTextService {
    async fn translate(
        &self,
        language: &str,
        _language_note: &str,
        text: &str,
    ) -> SignalpostResult<String> {
        Ok(format!("[{language}] {text}"))
    }
}

#[derive(Debug, Default)]
struct Tables {
    next_id: i32,
    posts: BTreeMap<i32, Post>,
    batches: BTreeMap<i32, WinBatch>,
    percents: Vec<WinPercent>,
    messages: Vec<WinMessage>,
}

impl Tables {
    fn id(&mut self) -> i32 {
        self.next_id += 1;
        self.next_id
    }
}

/// Repository over in-memory maps.
#[derive(Debug, Default)]
pub struct MemoryRepository {
    tables: Mutex<Tables>,
}

impl MemoryRepository {
    pub fn posts(&self) -> Vec<Post> {
        self.tables.lock().posts.values().cloned().collect()
    }

    pub fn batches(&self) -> Vec<WinBatch> {
        self.tables.lock().batches.values().cloned().collect()
    }

    pub fn win_percents(&self) -> Vec<WinPercent> {
        self.tables.lock().percents.clone()
    }

    pub fn win_messages(&self) -> Vec<WinMessage> {
        self.tables.lock().messages.clone()
    }

    /// Store a sample with an explicit timestamp.
    pub fn insert_win_percent(&self, photo: &str, percent: f64, created_at: DateTime<Utc>) {
        let mut tables = self.tables.lock();
        let id = tables.id();
        tables.percents.push(WinPercent {
            id,
            created_at,
            win_photo: photo.into(),
            win_percent: percent,
        });
    }
}

#[async_trait]
impl Repository for MemoryRepository {
    async fn create_post(&self, post: NewPost) -> SignalpostResult<Post> {
        let mut tables = self.tables.lock();
        let id = tables.id();
        let post = Post {
            id,
            created_at: Utc::now(),
            stats_text: post.stats_text,
            generated_text: post.generated_text,
            chart_photo: post.chart_photo,
            stats_file: post.stats_file,
            win_photo: post.win_photo,
            text_voice: None,
            moderation_message_id: post.moderation_message_id,
            is_published: false,
            published_channels: Vec::new(),
        };
        tables.posts.insert(id, post.clone());
        Ok(post)
    }

    async fn get_post(&self, id: i32) -> SignalpostResult<Option<Post>> {
        Ok(self.tables.lock().posts.get(&id).cloned())
    }

    async fn update_post(&self, post: &Post) -> SignalpostResult<()> {
        let mut tables = self.tables.lock();
        match tables.posts.get_mut(&post.id) {
            Some(stored) => {
                *stored = post.clone();
                Ok(())
            }
            None => Err(DatabaseError::new(DatabaseErrorKind::NotFound).into()),
        }
    }

    async fn delete_post(&self, id: i32) -> SignalpostResult<()> {
        self.tables.lock().posts.remove(&id);
        Ok(())
    }

    async fn create_win_batch(&self, win_photos: Vec<FileRef>) -> SignalpostResult<WinBatch> {
        let mut tables = self.tables.lock();
        let id = tables.id();
        let batch = WinBatch {
            id,
            created_at: Utc::now(),
            win_photos,
            is_published: false,
        };
        tables.batches.insert(id, batch.clone());
        Ok(batch)
    }

    async fn get_win_batch(&self, id: i32) -> SignalpostResult<Option<WinBatch>> {
        Ok(self.tables.lock().batches.get(&id).cloned())
    }

    async fn update_win_batch(&self, batch: &WinBatch) -> SignalpostResult<()> {
        let mut tables = self.tables.lock();
        match tables.batches.get_mut(&batch.id) {
            Some(stored) => {
                *stored = batch.clone();
                Ok(())
            }
            None => Err(DatabaseError::new(DatabaseErrorKind::NotFound).into()),
        }
    }

    async fn delete_win_batch(&self, id: i32) -> SignalpostResult<()> {
        self.tables.lock().batches.remove(&id);
        Ok(())
    }

    async fn record_win_percent(&self, sample: NewWinPercent) -> SignalpostResult<WinPercent> {
        let mut tables = self.tables.lock();
        let id = tables.id();
        let stored = WinPercent {
            id,
            created_at: Utc::now(),
            win_photo: sample.win_photo,
            win_percent: sample.win_percent,
        };
        tables.percents.push(stored.clone());
        Ok(stored)
    }

    async fn best_win_percent_since(
        &self,
        since: DateTime<Utc>,
    ) -> SignalpostResult<Option<WinPercent>> {
        let tables = self.tables.lock();
        let best = tables
            .percents
            .iter()
            .filter(|p| p.created_at >= since)
            .fold(None::<&WinPercent>, |best, p| match best {
                Some(b) if b.win_percent >= p.win_percent => Some(b),
                _ => Some(p),
            });
        Ok(best.cloned())
    }

    async fn record_win_message(&self, message: NewWinMessage) -> SignalpostResult<WinMessage> {
        let mut tables = self.tables.lock();
        let id = tables.id();
        let stored = WinMessage {
            id,
            created_at: Utc::now(),
            channel_id: message.channel_id,
            win_photo: message.win_photo,
            win_message_id: message.win_message_id,
            win_message_url: message.win_message_url,
        };
        tables.messages.push(stored.clone());
        Ok(stored)
    }

    async fn win_messages_for(&self, win_photo: &FileRef) -> SignalpostResult<Vec<WinMessage>> {
        Ok(self
            .tables
            .lock()
            .messages
            .iter()
            .filter(|m| &m.win_photo == win_photo)
            .cloned()
            .collect())
    }
}

/// A coordinator wired to fakes, plus handles on the fakes.
pub struct Harness {
    pub coordinator: Coordinator,
    pub endpoint: Arc<RecordingEndpoint>,
    pub text: Arc<FakeTextService>,
    pub repository: Arc<MemoryRepository>,
    pub config: Arc<BotConfig>,
    pub dir: TempDir,
}

impl Harness {
    pub async fn new() -> Self {
        Self::with_config(CONFIG).await
    }

    pub async fn with_config(toml: &str) -> Self {
        let config = Arc::new(BotConfig::from_toml_str(toml).unwrap());
        let endpoint = Arc::new(RecordingEndpoint::default());
        let text = Arc::new(FakeTextService::default());
        let repository = Arc::new(MemoryRepository::default());
        let services = Services::new(
            endpoint.clone(),
            text.clone(),
            text.clone(),
            repository.clone(),
        );
        let dir = TempDir::new().unwrap();
        let settings = SettingsStore::load(dir.path().join("state.json"))
            .await
            .unwrap();
        let coordinator =
            Coordinator::new(services, Arc::clone(&config), settings, BotMetrics::new());
        Self {
            coordinator,
            endpoint,
            text,
            repository,
            config,
            dir,
        }
    }

    /// Harness with moderation switched off.
    pub async fn unmoderated() -> Self {
        let mut harness = Self::new().await;
        harness
            .press(&signalpost_core::CallbackAction::ToggleModeration { enabled: true }.to_string())
            .await;
        harness.endpoint.clear();
        harness
    }

    pub async fn handle(&mut self, event: BotEvent) {
        self.coordinator.handle(event).await.unwrap();
    }

    pub async fn channel_post(&mut self, post: ChannelPost) {
        self.handle(InboundEvent::ChannelPost(post).into()).await;
    }

    pub async fn stats(&mut self, text: &str) {
        self.channel_post(ChannelPost {
            chat_id: ChatId(WATCH),
            text: Some(format!("#stat {text}")),
            ..ChannelPost::default()
        })
        .await;
    }

    pub async fn chart(&mut self, image: &str) {
        self.channel_post(photo_post("#chart", image)).await;
    }

    pub async fn stats_file(&mut self, file: &str) {
        self.channel_post(ChannelPost {
            chat_id: ChatId(WATCH),
            caption: Some("#file".to_string()),
            document: Some(file.into()),
            ..ChannelPost::default()
        })
        .await;
    }

    pub async fn win(&mut self, image: &str, percent: &str) {
        self.channel_post(photo_post(&format!("#win {percent}"), image))
            .await;
    }

    /// Stats, chart and file for one post, without the win.
    pub async fn post_fragments(&mut self, n: u32) {
        self.stats(&format!("x{n}")).await;
        self.chart(&format!("chart{n}")).await;
        self.stats_file(&format!("file{n}")).await;
    }

    pub async fn tick(&mut self) {
        self.handle(BotEvent::WinWindowTick).await;
    }

    /// Press an inline button as the owner on message 1 of the owner chat.
    pub async fn press(&mut self, data: &str) {
        self.press_on(data, MessageId(1)).await;
    }

    pub async fn press_on(&mut self, data: &str, message: MessageId) {
        self.handle(
            InboundEvent::Callback(CallbackQuery {
                id: "cb".to_string(),
                from: UserId(OWNER),
                message: Some(MessageRef::new(ChatId(OWNER), message)),
                data: data.to_string(),
            })
            .into(),
        )
        .await;
    }

    /// Send a direct message as the owner.
    pub async fn say(&mut self, text: Option<&str>, voice: Option<&str>) {
        self.handle(
            InboundEvent::OperatorMessage(OperatorMessage {
                from: UserId(OWNER),
                chat_id: ChatId(OWNER),
                message_id: MessageId(9000),
                text: text.map(str::to_string),
                voice: voice.map(FileRef::from),
            })
            .into(),
        )
        .await;
    }

    pub async fn settle(&mut self) {
        self.coordinator.join_publications().await;
    }
}

pub fn photo_post(caption: &str, image: &str) -> ChannelPost {
    ChannelPost {
        chat_id: ChatId(WATCH),
        caption: Some(caption.to_string()),
        photo: Some(image.into()),
        ..ChannelPost::default()
    }
}
