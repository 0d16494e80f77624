use crate::Texts;
use serde::{Deserialize, Serialize};
use signalpost_core::{ChatId, MessageId, UserId};
use signalpost_error::{ConfigError, SignalpostResult};
use signalpost_models::{DEFAULT_GENERATE_PROMPT, DEFAULT_MODEL, DEFAULT_TRANSLATE_PROMPT};
use signalpost_telegram::DEFAULT_API_BASE_URL;
use std::collections::HashSet;
use std::path::Path;
use std::str::FromStr;
use std::time::Duration;

/// Configuration for the signalpost bot.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BotConfig {
    /// Transport identities
    pub telegram: TelegramSection,
    /// Text generation settings
    #[serde(default)]
    pub generation: GenerationConfig,
    /// Publish timing and thresholds
    #[serde(default)]
    pub publishing: PublishingConfig,
    /// Periodic job cadences
    #[serde(default)]
    pub schedule: ScheduleConfig,
    /// Operator-facing strings
    #[serde(default)]
    pub texts: Texts,
    /// Destination channels in publication order
    pub channels: Vec<ChannelConfig>,
}

impl BotConfig {
    /// Load and validate bot configuration from a TOML file.
    pub fn from_file(path: impl AsRef<Path>) -> SignalpostResult<Self> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(|e| {
            ConfigError::new(format!(
                "Failed to read config file {}: {}",
                path.as_ref().display(),
                e
            ))
        })?;
        Self::from_toml_str(&content)
    }

    /// Parse and validate bot configuration from TOML text.
    pub fn from_toml_str(content: &str) -> SignalpostResult<Self> {
        let config: Self = toml::from_str(content)
            .map_err(|e| ConfigError::new(format!("Failed to parse config: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Check cross-field constraints serde cannot express.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.channels.is_empty() {
            return Err(ConfigError::new("at least one channel is required"));
        }

        let defaults = self.channels.iter().filter(|c| c.is_default).count();
        if defaults != 1 {
            return Err(ConfigError::new(format!(
                "exactly one default channel is required, found {}",
                defaults
            )));
        }

        let mut seen = HashSet::new();
        for channel in &self.channels {
            if !seen.insert(channel.channel_id) {
                return Err(ConfigError::new(format!(
                    "duplicate channel id {}",
                    channel.channel_id
                )));
            }
        }

        if self.generation.lengths.is_empty() {
            return Err(ConfigError::new("at least one length bucket is required"));
        }
        if let Some(bucket) = self
            .generation
            .lengths
            .iter()
            .find(|b| !(b.weight.is_finite() && b.weight > 0.0))
        {
            return Err(ConfigError::new(format!(
                "length bucket {} has non-positive weight {}",
                bucket.length, bucket.weight
            )));
        }

        if self.publishing.win_emojis.trim().is_empty() {
            return Err(ConfigError::new("win_emojis must not be empty"));
        }
        if self.schedule.win_window_minutes == 0 {
            return Err(ConfigError::new("win_window_minutes must be positive"));
        }
        parse_cron(&self.schedule.best_win_cron)?;
        parse_cron(&self.schedule.link_rotation_cron)?;

        Ok(())
    }

    /// The operator's user id.
    pub fn owner(&self) -> UserId {
        UserId(self.telegram.owner_id)
    }

    /// The operator's private chat.
    pub fn owner_chat(&self) -> ChatId {
        ChatId(self.telegram.owner_id)
    }

    /// The channel fragments are read from.
    pub fn watch_channel(&self) -> ChatId {
        ChatId(self.telegram.watch_channel_id)
    }

    /// Look up a destination channel by id.
    pub fn channel(&self, id: ChatId) -> Option<&ChannelConfig> {
        self.channels.iter().find(|c| c.chat_id() == id)
    }
}

/// Parse a cron expression with a seconds field.
pub fn parse_cron(expression: &str) -> Result<cron::Schedule, ConfigError> {
    cron::Schedule::from_str(expression)
        .map_err(|e| ConfigError::new(format!("Invalid cron expression '{}': {}", expression, e)))
}

/// Transport identities.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TelegramSection {
    /// User id of the only operator
    pub owner_id: i64,
    /// Channel carrying tagged fragments
    pub watch_channel_id: i64,
    /// Bot API host
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,
    /// Long-poll timeout per `getUpdates` call
    #[serde(default = "default_poll_timeout_secs")]
    pub poll_timeout_secs: u64,
    /// Username of the bot the link-rotation button deep-links to
    pub deep_link_bot: String,
}

fn default_api_base_url() -> String {
    DEFAULT_API_BASE_URL.to_string()
}

fn default_poll_timeout_secs() -> u64 {
    30
}

/// One weighted target length for generated copy.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LengthBucket {
    /// Target length in characters
    pub length: u32,
    /// Relative selection weight
    pub weight: f64,
}

impl LengthBucket {
    /// A bucket of `length` chosen with `weight`.
    pub const fn new(length: u32, weight: f64) -> Self {
        Self { length, weight }
    }
}

/// Text generation settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerationConfig {
    /// Base URL of the chat completions API
    pub base_url: String,
    /// Model identifier
    pub model: String,
    /// Generation prompt template
    pub generate_prompt: String,
    /// Translation prompt template
    pub translate_prompt: String,
    /// Weighted target lengths; the longest is used at most once a day
    pub lengths: Vec<LengthBucket>,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.openai.com".to_string(),
            model: DEFAULT_MODEL.to_string(),
            generate_prompt: DEFAULT_GENERATE_PROMPT.to_string(),
            translate_prompt: DEFAULT_TRANSLATE_PROMPT.to_string(),
            lengths: vec![
                LengthBucket::new(160, 0.5),
                LengthBucket::new(250, 0.3),
                LengthBucket::new(350, 0.15),
                LengthBucket::new(600, 0.05),
            ],
        }
    }
}

/// Publish timing and thresholds.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PublishingConfig {
    /// Pause between consecutive channels
    pub channel_delay_ms: u64,
    /// Pause between the forecast and the win reveal
    pub reveal_window_secs: u64,
    /// Win strength that finalizes a post regardless of state
    pub big_win_percent: f64,
    /// Markers sent ahead of a revealed win, one picked at random
    pub win_emojis: String,
}

impl Default for PublishingConfig {
    fn default() -> Self {
        Self {
            channel_delay_ms: 1000,
            reveal_window_secs: 180,
            big_win_percent: 10000.0,
            win_emojis: "✅💪🎉👏🔥🤘🚀🥳💎".to_string(),
        }
    }
}

impl PublishingConfig {
    /// Pause between consecutive channels.
    pub fn channel_delay(&self) -> Duration {
        Duration::from_millis(self.channel_delay_ms)
    }

    /// Pause before the win reveal.
    pub fn reveal_window(&self) -> Duration {
        Duration::from_secs(self.reveal_window_secs)
    }
}

/// Periodic job cadences.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScheduleConfig {
    /// Win-window ticker period
    pub win_window_minutes: u64,
    /// Best-win rebroadcast, cron with seconds field, UTC
    pub best_win_cron: String,
    /// Link rotation, cron with seconds field, UTC
    pub link_rotation_cron: String,
}

impl Default for ScheduleConfig {
    fn default() -> Self {
        Self {
            win_window_minutes: 30,
            best_win_cron: "0 0 0 * * *".to_string(),
            link_rotation_cron: "0 0 12 * * *".to_string(),
        }
    }
}

impl ScheduleConfig {
    /// Win-window ticker period.
    pub fn win_window(&self) -> Duration {
        Duration::from_secs(self.win_window_minutes * 60)
    }
}

/// A destination channel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChannelConfig {
    /// Language name handed to the translator
    pub language: String,
    /// Extra translation guidance
    #[serde(default)]
    pub language_note: String,
    /// Deep-link payload identifying this channel
    pub utm_source: String,
    /// Channel chat id
    pub channel_id: i64,
    /// Thread receiving forecasts and wins
    pub main_topic_id: i32,
    /// Thread receiving rebroadcasts and rotated links
    pub top_topic_id: i32,
    /// Whether this channel gets the untranslated copy
    #[serde(default)]
    pub is_default: bool,
    /// Links rotated daily into the top thread
    #[serde(default)]
    pub message_links: Vec<String>,
}

impl ChannelConfig {
    /// Channel chat id.
    pub fn chat_id(&self) -> ChatId {
        ChatId(self.channel_id)
    }

    /// Forecast thread.
    pub fn main_topic(&self) -> MessageId {
        MessageId(self.main_topic_id)
    }

    /// Highlights thread.
    pub fn top_topic(&self) -> MessageId {
        MessageId(self.top_topic_id)
    }
}
