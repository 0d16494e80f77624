//! Top-level error wrapper types.

#[cfg(feature = "database")]
use crate::DatabaseError;
use crate::{ConfigError, InputError, StorageError, TextServiceError, TransportError};

/// Every error a signalpost component can raise.
///
/// # Examples
///
/// ```
/// use signalpost_error::{SignalpostError, SignalpostErrorKind, ConfigError};
///
/// let err: SignalpostError = ConfigError::new("missing owner id").into();
/// assert!(matches!(err.kind(), SignalpostErrorKind::Config(_)));
/// ```
#[derive(Debug, derive_more::From, derive_more::Display, derive_more::Error)]
pub enum SignalpostErrorKind {
    /// Configuration error
    #[from(ConfigError)]
    Config(ConfigError),
    /// Malformed operator or channel input
    #[from(InputError)]
    Input(InputError),
    /// Messaging transport failure
    #[from(TransportError)]
    Transport(TransportError),
    /// Text generation or translation failure
    #[from(TextServiceError)]
    TextService(TextServiceError),
    /// Settings record storage failure
    #[from(StorageError)]
    Storage(StorageError),
    /// Database error
    #[cfg(feature = "database")]
    #[from(DatabaseError)]
    Database(DatabaseError),
}

/// Signalpost error with kind discrimination.
#[derive(Debug, derive_more::Display, derive_more::Error)]
#[display("Signalpost Error: {}", _0)]
pub struct SignalpostError(Box<SignalpostErrorKind>);

impl SignalpostError {
    /// Create a new error from a kind.
    pub fn new(kind: SignalpostErrorKind) -> Self {
        Self(Box::new(kind))
    }

    /// Get the error kind.
    pub fn kind(&self) -> &SignalpostErrorKind {
        &self.0
    }

    /// True when the error came from malformed input rather than a failing service.
    pub fn is_input(&self) -> bool {
        matches!(self.kind(), SignalpostErrorKind::Input(_))
    }
}

// Generic From implementation for any type that converts to SignalpostErrorKind
impl<T> From<T> for SignalpostError
where
    T: Into<SignalpostErrorKind>,
{
    fn from(err: T) -> Self {
        Self::new(err.into())
    }
}

/// Result type for signalpost operations.
pub type SignalpostResult<T> = std::result::Result<T, SignalpostError>;
