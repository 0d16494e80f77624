//! Core data types for signalpost.
//!
//! This crate holds the domain records (posts, win batches, win samples and
//! their published copies), the tagged fragment model produced from the watched
//! feed, and the small value types shared by the transport and the bot.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod callback;
mod event;
mod fragment;
mod ids;
mod link;
mod markup;
mod post;
mod win;

pub use callback::CallbackAction;
pub use event::{BotCommand, CallbackQuery, ChannelPost, InboundEvent, OperatorMessage};
pub use fragment::{Fragment, Tag};
pub use ids::{ChatId, FileRef, MessageId, MessageRef, UserId};
pub use link::MessageLink;
pub use markup::{
    ButtonAction, ChatTarget, InlineButton, InlineKeyboard, ReplyMarkup, SendOptions, SentMessage,
};
pub use post::{ChannelForecast, NewPost, NewPostBuilder, Post};
pub use win::{
    NewWinMessage, NewWinPercent, WinBatch, WinMessage, WinPercent, parse_win_percent,
};

/// Maximum number of photos the transport accepts in one media group.
pub const MEDIA_GROUP_SIZE: usize = 10;
