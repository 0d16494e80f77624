//! Signal-post bot: ingestion, moderation and multi-channel publishing.
//!
//! The bot watches one source channel for tagged fragments, assembles them into
//! posts, and fans them out to every destination channel:
//! - **FragmentCollector** / **IngestionMachine**: buffer fragments and decide
//!   when a post or a win batch is complete
//! - **PublishPipeline**: operator moderation, translation and timed fan-out
//! - **Coordinator**: owns all mutable state and routes every event
//! - **Scheduler**: the win-window ticker and the two daily jobs

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod api;
mod collector;
mod config;
mod control;
mod coordinator;
mod event;
mod ingestion;
mod jobs;
mod length;
mod metrics;
mod moderation;
mod publish;
mod scheduler;
mod services;
mod settings;
mod texts;

pub use api::{ApiState, create_router};
pub use collector::{FragmentCollector, PendingPost};
pub use config::{
    BotConfig, ChannelConfig, GenerationConfig, LengthBucket, PublishingConfig, ScheduleConfig,
    TelegramSection, parse_cron,
};
pub use coordinator::{Coordinator, PendingEdit};
pub use event::BotEvent;
pub use ingestion::{CollectionState, IngestionMachine, WinContext, WinOutcome};
pub use jobs::{BEST_WIN_LOOKBACK_HOURS, best_win_caption, rebroadcast_best_win, rotate_links};
pub use length::{LengthChoice, choose_length};
pub use metrics::{BotMetrics, MetricsSnapshot};
pub use publish::{Publication, PublicationClaim, PublishPipeline};
pub use scheduler::Scheduler;
pub use services::Services;
pub use settings::{Settings, SettingsStore};
pub use texts::{Texts, escape_html};
