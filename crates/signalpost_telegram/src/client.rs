use crate::convert::{chat_target, keyboard_markup, reply_markup, sent_message};
use crate::types::{
    ApiResponse, InputMediaPhoto, Message, MessageIdResult, ReplyParameters, Update,
};
use crate::url::message_url;
use async_trait::async_trait;
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value, json};
use signalpost_core::{
    ChatId, ChatTarget, FileRef, InlineKeyboard, MessageId, SendOptions, SentMessage,
};
use signalpost_error::{SignalpostResult, TransportError, TransportErrorKind};
use signalpost_interface::MessagingEndpoint;
use tracing::instrument;

/// Default Bot API host.
pub const DEFAULT_API_BASE_URL: &str = "https://api.telegram.org";

/// Update kinds requested from `getUpdates`.
const ALLOWED_UPDATES: [&str; 3] = ["message", "channel_post", "callback_query"];

/// Connection settings for the Bot API.
#[derive(Clone, PartialEq, Eq)]
pub struct TelegramConfig {
    /// Bot token issued by BotFather
    pub token: String,
    /// API host, overridable for local Bot API servers
    pub api_base_url: String,
}

impl TelegramConfig {
    /// Settings for `token` against the public API.
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
        }
    }

    /// Use a different API host.
    pub fn with_api_base_url(mut self, url: impl Into<String>) -> Self {
        self.api_base_url = url.into();
        self
    }
}

// Keeps the token out of logs.
impl std::fmt::Debug for TelegramConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TelegramConfig")
            .field("token", &"<redacted>")
            .field("api_base_url", &self.api_base_url)
            .finish()
    }
}

/// Bot API client.
///
/// Every text and caption is sent with HTML parse mode.
#[derive(Debug, Clone)]
pub struct TelegramClient {
    config: TelegramConfig,
    client: reqwest::Client,
}

impl TelegramClient {
    /// Create a new client
    pub fn new(config: TelegramConfig) -> Self {
        tracing::debug!(api_base_url = %config.api_base_url, "Creating Telegram client");
        Self {
            config,
            client: reqwest::Client::new(),
        }
    }

    /// Call a Bot API method and unwrap its envelope.
    #[instrument(skip(self, params))]
    pub async fn call<P, R>(&self, method: &str, params: &P) -> Result<R, TransportError>
    where
        P: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        let url = format!(
            "{}/bot{}/{}",
            self.config.api_base_url.trim_end_matches('/'),
            self.config.token,
            method
        );

        let response = self
            .client
            .post(&url)
            .json(params)
            .send()
            .await
            .map_err(|e| {
                // The URL embeds the token.
                let e = e.without_url();
                tracing::error!(method, "Request failed: {}", e);
                TransportError::new(TransportErrorKind::Http(e.to_string()))
            })?;

        // Failures still come back as a JSON envelope.
        let envelope: ApiResponse<R> = response.json().await.map_err(|e| {
            let e = e.without_url();
            tracing::error!(method, "Failed to parse response: {}", e);
            TransportError::new(TransportErrorKind::Deserialization(e.to_string()))
        })?;

        into_result(envelope)
    }

    /// Long-poll for updates after `offset`.
    pub async fn get_updates(
        &self,
        offset: Option<i64>,
        timeout_secs: u64,
    ) -> Result<Vec<Update>, TransportError> {
        let mut params = json!({
            "timeout": timeout_secs,
            "allowed_updates": ALLOWED_UPDATES,
        });
        if let Some(offset) = offset {
            params["offset"] = json!(offset);
        }
        self.call("getUpdates", &params).await
    }

    /// Remove any webhook so long polling works, optionally dropping the backlog.
    pub async fn delete_webhook(&self, drop_pending_updates: bool) -> Result<(), TransportError> {
        let _: bool = self
            .call(
                "deleteWebhook",
                &json!({ "drop_pending_updates": drop_pending_updates }),
            )
            .await?;
        Ok(())
    }

    async fn send(
        &self,
        method: &str,
        mut params: Map<String, Value>,
        options: SendOptions,
    ) -> Result<SentMessage, TransportError> {
        apply_options(&mut params, options);
        let message: Message = self.call(method, &params).await?;
        Ok(sent_message(&message))
    }
}

fn into_result<R>(envelope: ApiResponse<R>) -> Result<R, TransportError> {
    match envelope {
        ApiResponse {
            ok: true,
            result: Some(result),
            ..
        } => Ok(result),
        ApiResponse {
            description,
            error_code,
            ..
        } => Err(TransportError::new(TransportErrorKind::Api {
            code: error_code.unwrap_or_default(),
            description: description.unwrap_or_else(|| "empty response".to_string()),
        })),
    }
}

fn base_params(chat: ChatId) -> Map<String, Value> {
    let mut params = Map::new();
    params.insert("chat_id".into(), json!(chat.0));
    params
}

fn with_caption(params: &mut Map<String, Value>, field: &str, text: Option<&str>) {
    if let Some(text) = text {
        params.insert(field.into(), json!(text));
        params.insert("parse_mode".into(), json!("HTML"));
    }
}

fn apply_options(params: &mut Map<String, Value>, options: SendOptions) {
    if let Some(reply_to) = options.reply_to {
        params.insert(
            "reply_parameters".into(),
            json!(ReplyParameters {
                message_id: reply_to.0
            }),
        );
    }
    if let Some(markup) = options.markup {
        params.insert("reply_markup".into(), reply_markup(&markup));
    }
}

#[async_trait]
impl MessagingEndpoint for TelegramClient {
    #[instrument(skip(self, text, options))]
    async fn send_text(
        &self,
        chat: ChatId,
        text: &str,
        options: SendOptions,
    ) -> SignalpostResult<SentMessage> {
        let mut params = base_params(chat);
        with_caption(&mut params, "text", Some(text));
        Ok(self.send("sendMessage", params, options).await?)
    }

    #[instrument(skip(self, caption, options))]
    async fn send_photo(
        &self,
        chat: ChatId,
        photo: &FileRef,
        caption: Option<&str>,
        options: SendOptions,
    ) -> SignalpostResult<SentMessage> {
        let mut params = base_params(chat);
        params.insert("photo".into(), json!(photo.as_str()));
        with_caption(&mut params, "caption", caption);
        Ok(self.send("sendPhoto", params, options).await?)
    }

    #[instrument(skip(self, options))]
    async fn send_document(
        &self,
        chat: ChatId,
        document: &FileRef,
        options: SendOptions,
    ) -> SignalpostResult<SentMessage> {
        let mut params = base_params(chat);
        params.insert("document".into(), json!(document.as_str()));
        Ok(self.send("sendDocument", params, options).await?)
    }

    #[instrument(skip(self, caption, options))]
    async fn send_voice(
        &self,
        chat: ChatId,
        voice: &FileRef,
        caption: Option<&str>,
        options: SendOptions,
    ) -> SignalpostResult<SentMessage> {
        let mut params = base_params(chat);
        params.insert("voice".into(), json!(voice.as_str()));
        with_caption(&mut params, "caption", caption);
        Ok(self.send("sendVoice", params, options).await?)
    }

    #[instrument(skip(self, photos), fields(count = photos.len()))]
    async fn send_media_group(
        &self,
        chat: ChatId,
        photos: &[FileRef],
        reply_to: Option<MessageId>,
    ) -> SignalpostResult<Vec<SentMessage>> {
        let mut params = base_params(chat);
        let media: Vec<InputMediaPhoto> = photos
            .iter()
            .map(|photo| InputMediaPhoto::new(photo.as_str()))
            .collect();
        params.insert("media".into(), json!(media));
        apply_options(
            &mut params,
            SendOptions {
                reply_to,
                markup: None,
            },
        );
        let messages: Vec<Message> = self.call("sendMediaGroup", &params).await?;
        Ok(messages.iter().map(sent_message).collect())
    }

    #[instrument(skip(self, caption, options))]
    async fn copy_message(
        &self,
        chat: ChatId,
        from_chat: ChatId,
        message_id: MessageId,
        caption: Option<&str>,
        options: SendOptions,
    ) -> SignalpostResult<SentMessage> {
        let mut params = base_params(chat);
        params.insert("from_chat_id".into(), json!(from_chat.0));
        params.insert("message_id".into(), json!(message_id.0));
        with_caption(&mut params, "caption", caption);
        apply_options(&mut params, options);
        let copy: MessageIdResult = self.call("copyMessage", &params).await?;
        let copy_id = MessageId(copy.message_id);
        Ok(SentMessage {
            chat_id: chat,
            message_id: copy_id,
            url: message_url(chat, None, copy_id),
        })
    }

    #[instrument(skip(self, keyboard))]
    async fn edit_message_markup(
        &self,
        chat: &ChatTarget,
        message_id: MessageId,
        keyboard: Option<&InlineKeyboard>,
    ) -> SignalpostResult<()> {
        let mut params = Map::new();
        params.insert("chat_id".into(), chat_target(chat));
        params.insert("message_id".into(), json!(message_id.0));
        if let Some(keyboard) = keyboard {
            params.insert("reply_markup".into(), json!(keyboard_markup(keyboard)));
        }
        // The result is the edited message, or `true` for inline messages.
        let _: Value = self.call("editMessageReplyMarkup", &params).await?;
        Ok(())
    }

    #[instrument(skip(self))]
    async fn delete_message(&self, chat: ChatId, message_id: MessageId) -> SignalpostResult<()> {
        let mut params = base_params(chat);
        params.insert("message_id".into(), json!(message_id.0));
        let _: bool = self.call("deleteMessage", &params).await?;
        Ok(())
    }

    #[instrument(skip(self))]
    async fn answer_callback(&self, callback_id: &str) -> SignalpostResult<()> {
        let _: bool = self
            .call(
                "answerCallbackQuery",
                &json!({ "callback_query_id": callback_id }),
            )
            .await?;
        Ok(())
    }
}
