//! Error types for signalpost.
//!
//! Every concern gets its own error type following the `ErrorKind` + wrapper
//! struct pattern:
//! - `*ErrorKind` enum defines specific error conditions
//! - `*Error` struct wraps the kind with source location tracking
//! - constructors use `#[track_caller]` for automatic location capture
//!
//! All of them convert into [`SignalpostError`], so handlers can use `?`
//! across crate boundaries.
//!
//! # Examples
//!
//! ```
//! use signalpost_error::{SignalpostResult, ConfigError};
//!
//! fn load() -> SignalpostResult<String> {
//!     Err(ConfigError::new("no channels configured"))?
//! }
//!
//! assert!(load().is_err());
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod config;
#[cfg(feature = "database")]
mod database;
mod error;
mod input;
mod storage;
mod text_service;
mod transport;

pub use config::ConfigError;
#[cfg(feature = "database")]
pub use database::{DatabaseError, DatabaseErrorKind};
pub use error::{SignalpostError, SignalpostErrorKind, SignalpostResult};
pub use input::{InputError, InputErrorKind};
pub use storage::{StorageError, StorageErrorKind};
pub use text_service::{TextServiceError, TextServiceErrorKind};
pub use transport::{TransportError, TransportErrorKind};
