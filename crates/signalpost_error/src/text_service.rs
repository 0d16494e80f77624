//! Error types for the text generation and translation services.

/// Error kinds for text service operations.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, derive_more::Display)]
pub enum TextServiceErrorKind {
    /// HTTP request failed
    #[display("HTTP request failed: {}", _0)]
    Http(String),

    /// API returned an error status
    #[display("API error: {}", _0)]
    Api(String),

    /// Failed to deserialize response
    #[display("Failed to deserialize response: {}", _0)]
    Deserialization(String),

    /// The completion carried no choices
    #[display("Completion returned no text")]
    EmptyCompletion,
}

/// Error wrapper with location tracking.
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Text Service Error: {} at line {} in {}", kind, line, file)]
pub struct TextServiceError {
    /// The error kind
    pub kind: TextServiceErrorKind,
    /// Line number where error occurred
    pub line: u32,
    /// File where error occurred
    pub file: &'static str,
}

impl TextServiceError {
    /// Create a new TextServiceError with automatic location tracking.
    #[track_caller]
    pub fn new(kind: TextServiceErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }
}
