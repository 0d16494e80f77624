//! Telegram Bot API transport for signalpost.
//!
//! [`TelegramClient`] implements [`signalpost_interface::MessagingEndpoint`]
//! over plain HTTPS calls, and [`UpdatePoller`] turns `getUpdates` long
//! polling into a stream of [`signalpost_core::InboundEvent`]s.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod client;
mod convert;
mod poller;
mod url;

pub mod types;

pub use client::{DEFAULT_API_BASE_URL, TelegramClient, TelegramConfig};
pub use convert::{keyboard_markup, to_inbound};
pub use poller::UpdatePoller;
pub use url::message_url;
