//! Moderation submission and timed multi-channel publication.

use crate::texts::escape_html;
use crate::{BotConfig, BotMetrics, ChannelConfig, PendingPost, Services};
use parking_lot::Mutex;
use rand::seq::SliceRandom;
use signalpost_core::{
    CallbackAction, ChatId, FileRef, InlineButton, InlineKeyboard, MEDIA_GROUP_SIZE, MessageId,
    MessageRef, NewPost, NewWinMessage, Post, SendOptions, SentMessage, WinBatch,
};
use signalpost_error::SignalpostResult;
use std::collections::HashSet;
use std::sync::Arc;
use tracing::{debug, info, instrument};

/// A publish pass, identified by what it publishes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Publication {
    /// A post by id
    Post(i32),
    /// A win batch by id
    WinBatch(i32),
}

/// Exclusive right to run one publish pass; released on drop.
#[derive(Debug)]
pub struct PublicationClaim {
    key: Publication,
    in_flight: Arc<Mutex<HashSet<Publication>>>,
}

impl PublicationClaim {
    /// What this claim covers.
    pub fn key(&self) -> Publication {
        self.key
    }
}

impl Drop for PublicationClaim {
    fn drop(&mut self) {
        self.in_flight.lock().remove(&self.key);
    }
}

/// Sends finished content to the operator or to every destination channel.
#[derive(Clone)]
pub struct PublishPipeline {
    services: Services,
    config: Arc<BotConfig>,
    metrics: BotMetrics,
    in_flight: Arc<Mutex<HashSet<Publication>>>,
}

impl PublishPipeline {
    /// Creates a pipeline over `services`.
    pub fn new(services: Services, config: Arc<BotConfig>, metrics: BotMetrics) -> Self {
        Self {
            services,
            config,
            metrics,
            in_flight: Arc::default(),
        }
    }

    /// Claim a publish pass, or `None` if one is already running.
    pub fn claim(&self, key: Publication) -> Option<PublicationClaim> {
        if !self.in_flight.lock().insert(key) {
            debug!(?key, "Publication already in flight");
            return None;
        }
        Some(PublicationClaim {
            key,
            in_flight: Arc::clone(&self.in_flight),
        })
    }

    /// Store a post built from `parts`, generating its copy.
    ///
    /// With moderation on, the raw stats go to the operator first and anchor
    /// the moderation thread.
    #[instrument(skip(self, parts))]
    pub async fn create_post(
        &self,
        parts: PendingPost,
        target_length: u32,
        moderation: bool,
    ) -> SignalpostResult<Post> {
        let anchor = if moderation {
            let sent = self
                .services
                .endpoint
                .send_text(
                    self.config.owner_chat(),
                    &escape_html(&parts.stats_text),
                    SendOptions::default(),
                )
                .await?;
            Some(sent.message_id)
        } else {
            None
        };

        let generated_text = self
            .services
            .generator
            .generate(&parts.stats_text, target_length)
            .await?;

        let post = self
            .services
            .repository
            .create_post(NewPost {
                stats_text: parts.stats_text,
                generated_text,
                chart_photo: parts.chart,
                stats_file: parts.stats_file,
                win_photo: parts.win,
                moderation_message_id: anchor,
            })
            .await?;

        self.metrics.record_post_created();
        info!(post_id = post.id, "Post created");
        Ok(post)
    }

    /// Approve/edit/delete controls for a post.
    pub fn post_keyboard(&self, post_id: i32) -> InlineKeyboard {
        let texts = &self.config.texts;
        InlineKeyboard::column([
            InlineButton::callback(&texts.publish_button, CallbackAction::PublishPost(post_id)),
            InlineButton::callback(&texts.edit_button, CallbackAction::EditPost(post_id)),
            InlineButton::callback(&texts.delete_button, CallbackAction::DeletePost(post_id)),
        ])
    }

    fn win_batch_keyboard(&self, batch_id: i32) -> InlineKeyboard {
        let texts = &self.config.texts;
        InlineKeyboard::column([
            InlineButton::callback(
                &texts.publish_button,
                CallbackAction::PublishWinBatch(batch_id),
            ),
            InlineButton::callback(
                &texts.delete_button,
                CallbackAction::DeleteWinBatch(batch_id),
            ),
        ])
    }

    /// Show a post to the operator with its three controls.
    #[instrument(skip(self, post), fields(post_id = post.id))]
    pub async fn announce_post(&self, post: &Post) -> SignalpostResult<SentMessage> {
        let owner = self.config.owner_chat();
        let options = SendOptions {
            reply_to: post.moderation_message_id,
            markup: None,
        }
        .with_keyboard(self.post_keyboard(post.id));

        let endpoint = &self.services.endpoint;
        let sent = match &post.text_voice {
            Some(voice) => {
                endpoint
                    .send_voice(owner, voice, Some(&post.generated_text), options)
                    .await?
            }
            None => endpoint.send_text(owner, &post.generated_text, options).await?,
        };
        debug!(message_id = %sent.message_id, "Post announced");
        Ok(sent)
    }

    /// Publish a post to every channel, then reveal its win.
    ///
    /// Missing or already published posts are a no-op. Channels already
    /// marked on the post are skipped, so a pass that failed halfway resumes
    /// where it stopped. The win is revealed under every chart that does not
    /// have it yet, including charts sent by an earlier pass.
    #[instrument(skip(self, _claim))]
    pub async fn publish_post(&self, post_id: i32, _claim: PublicationClaim) -> SignalpostResult<()> {
        let repository = &self.services.repository;
        let Some(mut post) = repository.get_post(post_id).await? else {
            debug!("Post no longer exists");
            return Ok(());
        };
        if post.is_published {
            debug!("Post already published");
            return Ok(());
        }

        let publishing = &self.config.publishing;
        let mut sent = 0;

        for channel in &self.config.channels {
            if post.is_published_to(channel.chat_id()) {
                debug!(channel_id = %channel.chat_id(), "Channel already has this post");
                continue;
            }
            if sent > 0 {
                tokio::time::sleep(publishing.channel_delay()).await;
            }

            let chart = self.send_forecast(&post, channel).await?;
            sent += 1;

            // Operator edits may have landed while the forecast was going out.
            let Some(current) = repository.get_post(post_id).await? else {
                debug!("Post deleted during publication");
                return Ok(());
            };
            post = current;
            post.mark_published_to(channel.chat_id(), chart);
            post.is_published = self
                .config
                .channels
                .iter()
                .all(|c| post.is_published_to(c.chat_id()));
            repository.update_post(&post).await?;
        }

        if post.is_published {
            self.metrics.record_post_published();
        }
        info!(channels = sent, "Forecast published, waiting for reveal");

        tokio::time::sleep(publishing.reveal_window()).await;

        let revealed: HashSet<ChatId> = repository
            .win_messages_for(&post.win_photo)
            .await?
            .into_iter()
            .map(|message| message.channel_id)
            .collect();
        let mut reveals = 0;
        for channel in &self.config.channels {
            let Some(chart) = post.chart_in(channel.chat_id()) else {
                continue;
            };
            if revealed.contains(&channel.chat_id()) {
                continue;
            }
            if reveals > 0 {
                tokio::time::sleep(publishing.channel_delay()).await;
            }
            self.reveal_win(&post, channel, chart).await?;
            reveals += 1;
        }

        info!(channels = reveals, "Win revealed");
        Ok(())
    }

    #[instrument(skip(self, post, channel), fields(post_id = post.id, channel_id = %channel.chat_id()))]
    async fn send_forecast(&self, post: &Post, channel: &ChannelConfig) -> SignalpostResult<MessageId> {
        let text = if channel.is_default {
            post.generated_text.clone()
        } else {
            self.services
                .translator
                .translate(&channel.language, &channel.language_note, &post.generated_text)
                .await?
        };

        let endpoint = &self.services.endpoint;
        let chat = channel.chat_id();
        let thread = SendOptions::reply_to(channel.main_topic());

        let chart = match &post.text_voice {
            None => {
                endpoint
                    .send_photo(chat, &post.chart_photo, Some(&text), thread.clone())
                    .await?
            }
            Some(voice) => {
                let chart = endpoint
                    .send_photo(chat, &post.chart_photo, None, thread.clone())
                    .await?;
                endpoint
                    .send_voice(chat, voice, Some(&text), SendOptions::reply_to(chart.message_id))
                    .await?;
                chart
            }
        };

        endpoint
            .send_document(chat, &post.stats_file, thread)
            .await?;
        debug!(chart_id = %chart.message_id, "Forecast sent");
        Ok(chart.message_id)
    }

    #[instrument(skip(self, post, channel), fields(post_id = post.id, channel_id = %channel.chat_id()))]
    async fn reveal_win(
        &self,
        post: &Post,
        channel: &ChannelConfig,
        chart: MessageId,
    ) -> SignalpostResult<()> {
        let endpoint = &self.services.endpoint;
        let chat = channel.chat_id();

        let emoji = self.pick_emoji();
        endpoint
            .send_text(chat, &emoji, SendOptions::reply_to(channel.main_topic()))
            .await?;
        let win = endpoint
            .send_photo(chat, &post.win_photo, None, SendOptions::reply_to(chart))
            .await?;

        self.record_win_message(chat, post.win_photo.clone(), &win)
            .await
    }

    fn pick_emoji(&self) -> String {
        let emojis: Vec<char> = self
            .config
            .publishing
            .win_emojis
            .chars()
            .filter(|c| !c.is_whitespace())
            .collect();
        emojis
            .choose(&mut rand::thread_rng())
            .map(char::to_string)
            .unwrap_or_default()
    }

    async fn record_win_message(
        &self,
        channel: ChatId,
        win_photo: FileRef,
        sent: &SentMessage,
    ) -> SignalpostResult<()> {
        self.services
            .repository
            .record_win_message(NewWinMessage {
                channel_id: channel,
                win_photo,
                win_message_id: sent.message_id,
                win_message_url: sent.url.clone(),
            })
            .await?;
        Ok(())
    }

    /// Show a win batch to the operator: the images, then the controls.
    #[instrument(skip(self, batch), fields(batch_id = batch.id, photos = batch.win_photos.len()))]
    pub async fn preview_win_batch(&self, batch: &WinBatch) -> SignalpostResult<()> {
        let owner = self.config.owner_chat();
        let endpoint = &self.services.endpoint;

        let mut last = None;
        for group in batch.win_photos.chunks(MEDIA_GROUP_SIZE) {
            let sent = endpoint.send_media_group(owner, group, None).await?;
            last = sent.last().map(|m| m.message_id).or(last);
        }

        let options = SendOptions {
            reply_to: last,
            markup: None,
        }
        .with_keyboard(self.win_batch_keyboard(batch.id));
        endpoint
            .send_text(owner, &self.config.texts.wins_header, options)
            .await?;
        Ok(())
    }

    /// Publish a win batch to every channel in media groups.
    ///
    /// Missing or already published batches are a no-op.
    #[instrument(skip(self, _claim))]
    pub async fn publish_win_batch(
        &self,
        batch_id: i32,
        _claim: PublicationClaim,
    ) -> SignalpostResult<()> {
        let repository = &self.services.repository;
        let Some(mut batch) = repository.get_win_batch(batch_id).await? else {
            debug!("Win batch no longer exists");
            return Ok(());
        };
        if batch.is_published {
            debug!("Win batch already published");
            return Ok(());
        }

        let endpoint = &self.services.endpoint;
        for (i, channel) in self.config.channels.iter().enumerate() {
            if i > 0 {
                tokio::time::sleep(self.config.publishing.channel_delay()).await;
            }
            let chat = channel.chat_id();
            for group in batch.win_photos.chunks(MEDIA_GROUP_SIZE) {
                let sent = endpoint
                    .send_media_group(chat, group, Some(channel.main_topic()))
                    .await?;
                for (photo, message) in group.iter().zip(&sent) {
                    self.record_win_message(chat, photo.clone(), message).await?;
                }
            }
            debug!(channel_id = %chat, "Win batch sent");
        }

        batch.is_published = true;
        repository.update_win_batch(&batch).await?;
        self.metrics.record_win_batch_published();
        info!(photos = batch.win_photos.len(), "Win batch published");
        Ok(())
    }

    /// Copy a promotional post into every channel's main thread.
    ///
    /// Media posts are copied with the cleaned caption; text posts are re-sent.
    #[instrument(skip(self, text))]
    pub async fn broadcast_promo(
        &self,
        source: MessageRef,
        text: &str,
        has_media: bool,
    ) -> SignalpostResult<()> {
        let endpoint = &self.services.endpoint;
        let text = escape_html(text);
        for channel in &self.config.channels {
            let thread = SendOptions::reply_to(channel.main_topic());
            if has_media {
                endpoint
                    .copy_message(
                        channel.chat_id(),
                        source.chat_id,
                        source.message_id,
                        Some(&text),
                        thread,
                    )
                    .await?;
            } else {
                endpoint.send_text(channel.chat_id(), &text, thread).await?;
            }
        }
        info!(channels = self.config.channels.len(), "Promo broadcast");
        Ok(())
    }
}
