//! Trait definitions for the collaborators the bot talks to.
//!
//! The publishing pipeline only ever sees these traits:
//! - [`MessagingEndpoint`]: sends, edits and deletes messages
//! - [`TextGenerator`] and [`Translator`]: turn stats into copy and copy into other languages
//! - [`Repository`]: durable storage for posts, win batches and win bookkeeping

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod traits;

pub use traits::{MessagingEndpoint, Repository, TextGenerator, Translator};
