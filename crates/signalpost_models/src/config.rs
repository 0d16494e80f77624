//! Connection settings and prompt templates.

/// Connection settings for an OpenAI-compatible chat completions API.
#[derive(Debug, Clone, PartialEq, Eq, Hash, derive_builder::Builder, derive_getters::Getters)]
#[builder(setter(into))]
pub struct ChatClientConfig {
    /// Base URL of the API (e.g., "https://api.openai.com")
    base_url: String,
    /// Model identifier sent with every request
    #[builder(default = "DEFAULT_MODEL.to_string()")]
    model: String,
    /// Bearer token; local servers usually need none
    #[builder(default)]
    api_key: Option<String>,
}

/// Model used when none is configured.
pub const DEFAULT_MODEL: &str = "gpt-4o";

impl ChatClientConfig {
    /// Create a configuration without an API key.
    pub fn new(base_url: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            model: model.into(),
            api_key: None,
        }
    }

    /// Set the API key
    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    /// Full URL of the chat completions endpoint.
    pub fn completions_url(&self) -> String {
        format!("{}/v1/chat/completions", self.base_url.trim_end_matches('/'))
    }
}

/// Default generation prompt.
pub const DEFAULT_GENERATE_PROMPT: &str = "Analyse the data below.

{stats_text}

Base the forecast on the multipliers, not on time. The minimum multiplier is 1.
::
Act as a technical analysis expert. Pick the largest values on the timeframe, describe what came before them and comment on what followed and why. No visualisations, no introduction, only a dry forecast.
::
Call it \"the game\", never \"the market\".
::
Format it as a Telegram channel post with emoji but without a headline.
::
Keep it under {text_length} characters.
::
Talk to the reader directly and informally.";

/// Default translation prompt.
pub const DEFAULT_TRANSLATE_PROMPT: &str = "Translate the text into {language}. {language_note}
::
Translate naturally and keep the original style, emoji and formatting as far as possible.
::
Output only the translated text and nothing else.
::
Text: {original_text}";

/// Prompt templates with named placeholders.
///
/// The generation template understands `{stats_text}` and `{text_length}`;
/// the translation template understands `{language}`, `{language_note}` and
/// `{original_text}`. Unknown braces are left untouched.
#[derive(Debug, Clone, PartialEq, Eq, derive_getters::Getters)]
pub struct PromptTemplates {
    generate: String,
    translate: String,
}

impl Default for PromptTemplates {
    fn default() -> Self {
        Self::new(DEFAULT_GENERATE_PROMPT, DEFAULT_TRANSLATE_PROMPT)
    }
}

impl PromptTemplates {
    /// Create templates from raw strings.
    pub fn new(generate: impl Into<String>, translate: impl Into<String>) -> Self {
        Self {
            generate: generate.into(),
            translate: translate.into(),
        }
    }

    /// Render the generation prompt.
    pub fn render_generate(&self, stats_text: &str, text_length: u32) -> String {
        fill(
            &self.generate,
            &[
                ("stats_text", stats_text),
                ("text_length", &text_length.to_string()),
            ],
        )
    }

    /// Render the translation prompt.
    pub fn render_translate(&self, language: &str, language_note: &str, text: &str) -> String {
        fill(
            &self.translate,
            &[
                ("language", language),
                ("language_note", language_note),
                ("original_text", text),
            ],
        )
    }
}

// Single pass so substituted values are never re-scanned for placeholders.
fn fill(template: &str, values: &[(&str, &str)]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;
    while let Some(start) = rest.find('{') {
        out.push_str(&rest[..start]);
        let tail = &rest[start + 1..];
        let replaced = tail.find('}').and_then(|end| {
            let name = &tail[..end];
            values
                .iter()
                .find(|(key, _)| *key == name)
                .map(|(_, value)| (*value, end))
        });
        match replaced {
            Some((value, end)) => {
                out.push_str(value);
                rest = &tail[end + 1..];
            }
            None => {
                out.push('{');
                rest = tail;
            }
        }
    }
    out.push_str(rest);
    out
}
