//! Operator commands: `/admin` and `/button`.

use crate::Coordinator;
use crate::texts::Texts;
use signalpost_core::{
    BotCommand, InlineButton, InlineKeyboard, MessageLink, OperatorMessage, SendOptions,
};
use signalpost_error::{SignalpostError, SignalpostErrorKind, SignalpostResult};
use tracing::{debug, info, instrument, warn};

impl Coordinator {
    /// Commands first, then a pending edit; everything else is ignored.
    #[instrument(skip_all, fields(message_id = %message.message_id))]
    pub(crate) async fn on_operator_message(
        &mut self,
        message: OperatorMessage,
    ) -> SignalpostResult<()> {
        if message.from != self.config.owner() {
            debug!(from = %message.from, "Ignoring message from non-owner");
            return Ok(());
        }

        if let Some(command) = message.command() {
            return match command {
                BotCommand::Admin => self.send_admin_panel().await,
                BotCommand::Button { args } => self.edit_button(&args).await,
            };
        }

        if let Some(edit) = self.pending_edit.take() {
            return self.apply_edit(edit, message).await;
        }

        debug!("Ignoring operator message");
        Ok(())
    }

    async fn send_admin_panel(&self) -> SignalpostResult<()> {
        self.services
            .endpoint
            .send_text(
                self.config.owner_chat(),
                &self.config.texts.admin_settings,
                SendOptions::default().with_keyboard(self.admin_keyboard()),
            )
            .await?;
        Ok(())
    }

    /// `/button <message_link> [button_url button text...]`
    ///
    /// With both a URL and a label the message gets a single URL button,
    /// otherwise its buttons are removed.
    #[instrument(skip(self))]
    async fn edit_button(&self, args: &str) -> SignalpostResult<()> {
        if args.is_empty() {
            debug!("Button command without arguments");
            return Ok(());
        }

        let texts = &self.config.texts;
        let (link, rest) = split_word(args);
        let (url, label) = split_word(rest);

        let link = match MessageLink::parse(link) {
            Ok(link) => link,
            Err(e) => {
                warn!(error = %e, "Rejected message link");
                return self.reply_to_owner(&texts.invalid_message_url).await;
            }
        };

        let keyboard = match (url, label) {
            (url, label) if !url.is_empty() && !label.is_empty() => {
                Some(InlineKeyboard::column([InlineButton::url(label, url)]))
            }
            _ => None,
        };

        let result = self
            .services
            .endpoint
            .edit_message_markup(&link.chat, link.message_id, keyboard.as_ref())
            .await;

        match result {
            Ok(()) if keyboard.is_some() => {
                info!(message_id = %link.message_id, "Button attached");
                self.reply_to_owner(&texts.button_edited).await
            }
            Ok(()) => {
                info!(message_id = %link.message_id, "Buttons removed");
                self.reply_to_owner(&texts.button_deleted).await
            }
            Err(e) => {
                warn!(error = %e, "Button edit failed");
                let reply = Texts::with_error(&texts.button_not_edited, &transport_reason(&e));
                self.reply_to_owner(&reply).await
            }
        }
    }

    async fn reply_to_owner(&self, text: &str) -> SignalpostResult<()> {
        self.services
            .endpoint
            .send_text(self.config.owner_chat(), text, SendOptions::default())
            .await?;
        Ok(())
    }
}

/// The transport's own wording when there is one.
fn transport_reason(error: &SignalpostError) -> String {
    match error.kind() {
        SignalpostErrorKind::Transport(e) => e.description(),
        _ => error.to_string(),
    }
}

/// First whitespace-separated word and the trimmed remainder.
fn split_word(text: &str) -> (&str, &str) {
    let text = text.trim();
    match text.split_once(char::is_whitespace) {
        Some((word, rest)) => (word, rest.trim()),
        None => (text, ""),
    }
}
