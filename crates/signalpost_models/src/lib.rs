//! OpenAI-compatible text services for signalpost.
//!
//! [`ChatClient`] speaks the chat completions protocol; [`OpenAiTextService`]
//! wraps it with [`PromptTemplates`] to implement the generator and translator
//! traits the publishing pipeline consumes.
//!
//! ```rust,no_run
//! use signalpost_models::{ChatClient, ChatClientConfig, OpenAiTextService, PromptTemplates};
//!
//! let config = ChatClientConfig::new("https://api.openai.com", "gpt-4o").with_api_key("sk-...");
//! let service = OpenAiTextService::new(ChatClient::new(config), PromptTemplates::default());
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod client;
mod config;
mod request;
mod response;
mod service;

pub use client::ChatClient;
pub use config::{
    ChatClientConfig, ChatClientConfigBuilder, DEFAULT_GENERATE_PROMPT, DEFAULT_MODEL,
    DEFAULT_TRANSLATE_PROMPT, PromptTemplates,
};
pub use request::{ChatCompletionRequest, Message};
pub use response::{ChatCompletionResponse, Choice, ChoiceMessage, Usage};
pub use service::OpenAiTextService;
