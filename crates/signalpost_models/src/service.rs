//! Prompt-templated generator and translator.

use crate::{ChatClient, PromptTemplates};
use async_trait::async_trait;
use signalpost_error::SignalpostResult;
use signalpost_interface::{TextGenerator, Translator};
use tracing::instrument;

/// Generates and translates copy through one chat client.
#[derive(Debug, Clone)]
pub struct OpenAiTextService {
    client: ChatClient,
    prompts: PromptTemplates,
}

impl OpenAiTextService {
    /// Create a service from a client and its templates.
    pub fn new(client: ChatClient, prompts: PromptTemplates) -> Self {
        Self { client, prompts }
    }
}

#[async_trait]
impl TextGenerator for OpenAiTextService {
    #[instrument(skip(self, stats_text), fields(stats_len = stats_text.len()))]
    async fn generate(&self, stats_text: &str, target_length: u32) -> SignalpostResult<String> {
        let prompt = self.prompts.render_generate(stats_text, target_length);
        let text = self.client.complete(prompt).await?;
        tracing::debug!(chars = text.chars().count(), "Generated copy");
        Ok(text)
    }
}

#[async_trait]
impl Translator for OpenAiTextService {
    #[instrument(skip(self, language_note, text))]
    async fn translate(
        &self,
        language: &str,
        language_note: &str,
        text: &str,
    ) -> SignalpostResult<String> {
        let prompt = self.prompts.render_translate(language, language_note, text);
        Ok(self.client.complete(prompt).await?)
    }
}
