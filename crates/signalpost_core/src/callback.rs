//! Inline button actions and their wire encoding.

use signalpost_error::{InputError, InputErrorKind};
use std::fmt;
use std::str::FromStr;

/// An operator action carried by an inline button.
///
/// Encoded as `prefix:value` to stay well under the transport's callback size
/// limit. Toggles carry the flag value that was displayed when the control was
/// rendered, so a stale keyboard still flips relative to what the operator saw.
///
/// # Examples
///
/// ```
/// use signalpost_core::CallbackAction;
///
/// let action = CallbackAction::PublishPost(42);
/// assert_eq!(action.to_string(), "pp:42");
/// assert_eq!("pp:42".parse::<CallbackAction>().unwrap(), action);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CallbackAction {
    /// Publish a pending post
    PublishPost(i32),
    /// Start editing a pending post
    EditPost(i32),
    /// Discard a pending post
    DeletePost(i32),
    /// Publish a pending win batch
    PublishWinBatch(i32),
    /// Discard a pending win batch
    DeleteWinBatch(i32),
    /// Flip the moderation toggle
    ToggleModeration {
        /// Value shown on the control
        enabled: bool,
    },
    /// Flip the generation toggle
    ToggleGeneration {
        /// Value shown on the control
        enabled: bool,
    },
}

impl fmt::Display for CallbackAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::PublishPost(id) => write!(f, "pp:{id}"),
            Self::EditPost(id) => write!(f, "ep:{id}"),
            Self::DeletePost(id) => write!(f, "dp:{id}"),
            Self::PublishWinBatch(id) => write!(f, "pwp:{id}"),
            Self::DeleteWinBatch(id) => write!(f, "dwp:{id}"),
            Self::ToggleModeration { enabled } => write!(f, "tm:{}", u8::from(*enabled)),
            Self::ToggleGeneration { enabled } => write!(f, "tr:{}", u8::from(*enabled)),
        }
    }
}

impl FromStr for CallbackAction {
    type Err = InputError;

    fn from_str(data: &str) -> Result<Self, Self::Err> {
        let unknown = || InputError::new(InputErrorKind::UnknownCallback(data.to_string()));

        let (prefix, value) = data.split_once(':').ok_or_else(unknown)?;
        let id = || value.parse::<i32>().map_err(|_| unknown());
        let flag = || match value {
            "1" => Ok(true),
            "0" => Ok(false),
            _ => Err(unknown()),
        };

        match prefix {
            "pp" => Ok(Self::PublishPost(id()?)),
            "ep" => Ok(Self::EditPost(id()?)),
            "dp" => Ok(Self::DeletePost(id()?)),
            "pwp" => Ok(Self::PublishWinBatch(id()?)),
            "dwp" => Ok(Self::DeleteWinBatch(id()?)),
            "tm" => Ok(Self::ToggleModeration { enabled: flag()? }),
            "tr" => Ok(Self::ToggleGeneration { enabled: flag()? }),
            _ => Err(unknown()),
        }
    }
}
