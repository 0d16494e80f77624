//! Messaging transport error types.

/// Error kinds for messaging transport operations.
#[derive(Debug, Clone, PartialEq, Eq, Hash, derive_more::Display)]
pub enum TransportErrorKind {
    /// Request never reached the transport or the connection broke
    #[display("HTTP request failed: {}", _0)]
    Http(String),

    /// The transport rejected the request
    #[display("Transport API error {}: {}", code, description)]
    Api {
        /// Status code reported by the transport
        code: i64,
        /// Human-readable reason reported by the transport
        description: String,
    },

    /// The transport answered with something we could not decode
    #[display("Failed to deserialize response: {}", _0)]
    Deserialization(String),
}

/// Transport error with location tracking.
///
/// # Examples
///
/// ```
/// use signalpost_error::{TransportError, TransportErrorKind};
///
/// let err = TransportError::new(TransportErrorKind::Api {
///     code: 400,
///     description: "Bad Request: message is not modified".to_string(),
/// });
/// assert_eq!(err.description(), "Bad Request: message is not modified");
/// ```
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Transport Error: {} at line {} in {}", kind, line, file)]
pub struct TransportError {
    /// The error kind
    pub kind: TransportErrorKind,
    /// Line number where error occurred
    pub line: u32,
    /// File where error occurred
    pub file: &'static str,
}

impl TransportError {
    /// Create a new TransportError with automatic location tracking.
    #[track_caller]
    pub fn new(kind: TransportErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }

    /// Get the error kind.
    pub fn kind(&self) -> &TransportErrorKind {
        &self.kind
    }

    /// The transport's own message, without location decoration.
    pub fn description(&self) -> String {
        match &self.kind {
            TransportErrorKind::Api { description, .. } => description.clone(),
            TransportErrorKind::Http(message) | TransportErrorKind::Deserialization(message) => {
                message.clone()
            }
        }
    }
}
