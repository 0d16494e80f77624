use crate::{ChatClientConfig, ChatCompletionRequest, ChatCompletionResponse};
use signalpost_error::{TextServiceError, TextServiceErrorKind};
use tracing::instrument;

/// Client for an OpenAI-compatible chat completions API
#[derive(Debug, Clone)]
pub struct ChatClient {
    config: ChatClientConfig,
    client: reqwest::Client,
}

impl ChatClient {
    /// Create a new chat client
    #[instrument(skip(config), fields(base_url = %config.base_url(), model = %config.model()))]
    pub fn new(config: ChatClientConfig) -> Self {
        tracing::debug!("Creating chat client");
        Self {
            config,
            client: reqwest::Client::new(),
        }
    }

    /// Get the client configuration
    pub fn config(&self) -> &ChatClientConfig {
        &self.config
    }

    /// Send a chat completion request
    #[instrument(skip(self, request), fields(model = %request.model))]
    pub async fn chat_completion(
        &self,
        request: &ChatCompletionRequest,
    ) -> Result<ChatCompletionResponse, TextServiceError> {
        let url = self.config.completions_url();
        tracing::debug!("Sending chat completion request to {}", url);

        let mut req = self
            .client
            .post(&url)
            .json(request)
            .header("Content-Type", "application/json");

        if let Some(api_key) = self.config.api_key() {
            req = req.header("Authorization", format!("Bearer {}", api_key));
        }

        let response = req.send().await.map_err(|e| {
            tracing::error!("Request failed: {}", e);
            TextServiceError::new(TextServiceErrorKind::Http(format!("Request failed: {}", e)))
        })?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            tracing::error!(%status, "Completion API returned error");
            return Err(TextServiceError::new(TextServiceErrorKind::Api(format!(
                "Server returned {}: {}",
                status, body
            ))));
        }

        let result = response.json().await.map_err(|e| {
            tracing::error!("Failed to parse response: {}", e);
            TextServiceError::new(TextServiceErrorKind::Deserialization(format!(
                "Failed to parse response: {}",
                e
            )))
        })?;

        tracing::debug!("Chat completion successful");
        Ok(result)
    }

    /// Send `prompt` as a single user turn and return the first choice's text.
    pub async fn complete(&self, prompt: String) -> Result<String, TextServiceError> {
        let request = ChatCompletionRequest::single_prompt(self.config.model().clone(), prompt);
        let response = self.chat_completion(&request).await?;
        response
            .first_content()
            .map(str::to_string)
            .ok_or_else(|| TextServiceError::new(TextServiceErrorKind::EmptyCompletion))
    }
}
