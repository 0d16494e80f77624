//! Errors caused by malformed operator or channel input.
//!
//! These are reported back to the operator and never stop the process.

/// Kinds of input-format errors.
#[derive(Debug, Clone, PartialEq, Eq, Hash, derive_more::Display)]
pub enum InputErrorKind {
    /// A `#win` caption without any `NN%` token.
    #[display("No win percent found in caption: {}", _0)]
    MissingWinPercent(String),
    /// A `NN%` token that does not parse as a number.
    #[display("Invalid win percent '{}'", _0)]
    InvalidWinPercent(String),
    /// A message link the `/button` command cannot resolve.
    #[display("Invalid message link: {}", _0)]
    InvalidMessageLink(String),
    /// Callback data that matches no known action.
    #[display("Unknown callback data: {}", _0)]
    UnknownCallback(String),
}

/// Input error with location tracking.
///
/// # Examples
///
/// ```
/// use signalpost_error::{InputError, InputErrorKind};
///
/// let err = InputError::new(InputErrorKind::InvalidWinPercent("9.9.9".to_string()));
/// assert!(format!("{}", err).contains("9.9.9"));
/// ```
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Input Error: {} at line {} in {}", kind, line, file)]
pub struct InputError {
    /// The kind of error that occurred
    pub kind: InputErrorKind,
    /// Line number where error was created
    pub line: u32,
    /// File where error was created
    pub file: &'static str,
}

impl InputError {
    /// Create a new input error with automatic location tracking.
    #[track_caller]
    pub fn new(kind: InputErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }

    /// Get the error kind.
    pub fn kind(&self) -> &InputErrorKind {
        &self.kind
    }
}
