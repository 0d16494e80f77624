//! Operator actions on pending posts and win batches.

use crate::texts::escape_html;
use crate::{Coordinator, PendingEdit, Publication};
use signalpost_core::{
    CallbackAction, CallbackQuery, ChatTarget, InlineButton, InlineKeyboard, MessageId,
    MessageRef, OperatorMessage, ReplyMarkup, SendOptions,
};
use signalpost_error::SignalpostResult;
use tracing::{debug, info, instrument, warn};

impl Coordinator {
    #[instrument(skip(self, query), fields(data = %query.data))]
    pub(crate) async fn on_callback(&mut self, query: CallbackQuery) -> SignalpostResult<()> {
        if let Err(e) = self.services.endpoint.answer_callback(&query.id).await {
            warn!(error = %e, "Could not answer callback");
        }

        if query.from != self.config.owner() {
            warn!(from = %query.from, "Ignoring callback from non-owner");
            return Ok(());
        }
        let action = match query.data.parse::<CallbackAction>() {
            Ok(action) => action,
            Err(e) => {
                warn!(error = %e, "Ignoring callback");
                return Ok(());
            }
        };

        let message = query.message;
        match action {
            CallbackAction::PublishPost(id) => self.approve(Publication::Post(id), message).await,
            CallbackAction::PublishWinBatch(id) => {
                self.approve(Publication::WinBatch(id), message).await
            }
            CallbackAction::EditPost(id) => self.start_edit(id, message).await,
            CallbackAction::DeletePost(id) => {
                self.services.repository.delete_post(id).await?;
                info!(post_id = id, "Post deleted");
                self.confirm_deletion(message).await
            }
            CallbackAction::DeleteWinBatch(id) => {
                self.services.repository.delete_win_batch(id).await?;
                info!(batch_id = id, "Win batch deleted");
                self.confirm_deletion(message).await
            }
            CallbackAction::ToggleModeration { enabled } => {
                self.settings.set_moderation(!enabled).await?;
                info!(enabled = !enabled, "Moderation toggled");
                self.refresh_admin_panel(message).await
            }
            CallbackAction::ToggleGeneration { enabled } => {
                self.settings.set_generation(!enabled).await?;
                info!(enabled = !enabled, "Generation toggled");
                self.refresh_admin_panel(message).await
            }
        }
    }

    /// Start a publish pass unless the record is gone, published or in flight.
    async fn approve(
        &mut self,
        key: Publication,
        message: Option<MessageRef>,
    ) -> SignalpostResult<()> {
        let repository = &self.services.repository;
        let publishable = match key {
            Publication::Post(id) => repository
                .get_post(id)
                .await?
                .is_some_and(|post| !post.is_published),
            Publication::WinBatch(id) => repository
                .get_win_batch(id)
                .await?
                .is_some_and(|batch| !batch.is_published),
        };
        if !publishable {
            debug!(?key, "Nothing to publish");
            return Ok(());
        }
        let Some(claim) = self.pipeline.claim(key) else {
            return Ok(());
        };

        self.pending_edit = None;
        let options = SendOptions {
            reply_to: message.map(|m| m.message_id),
            markup: Some(ReplyMarkup::RemoveKeyboard),
        };
        self.services
            .endpoint
            .send_text(
                self.config.owner_chat(),
                &self.config.texts.post_published,
                options,
            )
            .await?;

        info!(?key, "Publication approved");
        self.spawn_publication(claim);
        Ok(())
    }

    async fn start_edit(&mut self, post_id: i32, message: Option<MessageRef>) -> SignalpostResult<()> {
        let Some(announcement) = message else {
            debug!("Announcement no longer accessible");
            return Ok(());
        };
        if self.services.repository.get_post(post_id).await?.is_none() {
            debug!(post_id, "Post no longer exists");
            return Ok(());
        }

        let prompt = self
            .services
            .endpoint
            .send_text(
                self.config.owner_chat(),
                &self.config.texts.edit_prompt,
                SendOptions::reply_to(announcement.message_id).with_markup(ReplyMarkup::ForceReply),
            )
            .await?;

        self.pending_edit = Some(PendingEdit {
            post_id,
            announcement: announcement.message_id,
            prompt: prompt.message_id,
        });
        debug!(post_id, "Waiting for edited copy");
        Ok(())
    }

    async fn confirm_deletion(&mut self, message: Option<MessageRef>) -> SignalpostResult<()> {
        self.pending_edit = None;
        let endpoint = &self.services.endpoint;
        if let Some(message) = message {
            if let Err(e) = endpoint.delete_message(message.chat_id, message.message_id).await {
                warn!(error = %e, "Could not delete announcement");
            }
        }
        endpoint
            .send_text(
                self.config.owner_chat(),
                &self.config.texts.post_deleted,
                SendOptions::default(),
            )
            .await?;
        Ok(())
    }

    /// Toggle controls showing the current settings.
    pub fn admin_keyboard(&self) -> InlineKeyboard {
        let texts = &self.config.texts;
        let moderation = self.settings.moderation_enabled();
        let generation = self.settings.generation_enabled();
        InlineKeyboard::column([
            InlineButton::callback(
                texts.toggle_label(&texts.moderation_button, moderation),
                CallbackAction::ToggleModeration {
                    enabled: moderation,
                },
            ),
            InlineButton::callback(
                texts.toggle_label(&texts.generation_button, generation),
                CallbackAction::ToggleGeneration {
                    enabled: generation,
                },
            ),
        ])
    }

    async fn refresh_admin_panel(&self, message: Option<MessageRef>) -> SignalpostResult<()> {
        let Some(message) = message else {
            return Ok(());
        };
        self.services
            .endpoint
            .edit_message_markup(
                &ChatTarget::Id(message.chat_id),
                message.message_id,
                Some(&self.admin_keyboard()),
            )
            .await?;
        Ok(())
    }

    /// Consume the operator's reply to an edit prompt.
    ///
    /// Text replaces the copy and drops any narration; a voice note becomes the
    /// narration, its caption (if any) the copy. Anything else re-prompts.
    #[instrument(skip(self, message), fields(post_id = edit.post_id))]
    pub(crate) async fn apply_edit(
        &mut self,
        edit: PendingEdit,
        message: OperatorMessage,
    ) -> SignalpostResult<()> {
        let owner = self.config.owner_chat();
        let text = message.text.as_deref().map(escape_html);

        if message.voice.is_none() && text.is_none() {
            self.delete_quietly(&[message.message_id, edit.prompt]).await;
            let prompt = self
                .services
                .endpoint
                .send_text(
                    owner,
                    &self.config.texts.invalid_edit,
                    SendOptions::reply_to(edit.announcement).with_markup(ReplyMarkup::ForceReply),
                )
                .await?;
            self.pending_edit = Some(PendingEdit {
                prompt: prompt.message_id,
                ..edit
            });
            debug!("Edit rejected, prompting again");
            return Ok(());
        }

        self.delete_quietly(&[message.message_id, edit.announcement, edit.prompt])
            .await;
        let Some(mut post) = self.services.repository.get_post(edit.post_id).await? else {
            debug!("Post no longer exists");
            return Ok(());
        };

        match message.voice {
            Some(voice) => {
                let text = text.unwrap_or_else(|| post.generated_text.clone());
                post.apply_edit(text, Some(voice));
            }
            None => post.apply_edit(text.unwrap_or_default(), None),
        }

        self.services.repository.update_post(&post).await?;
        let announcement = self.pipeline.announce_post(&post).await?;
        info!(announcement = %announcement.message_id, "Post edited");
        Ok(())
    }

    async fn delete_quietly(&self, messages: &[MessageId]) {
        let owner = self.config.owner_chat();
        for &id in messages {
            if let Err(e) = self.services.endpoint.delete_message(owner, id).await {
                debug!(error = %e, message_id = %id, "Could not delete message");
            }
        }
    }
}
