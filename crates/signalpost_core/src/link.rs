//! Public message links.

use crate::{ChatId, ChatTarget, MessageId};
use regex::Regex;
use signalpost_error::{InputError, InputErrorKind};
use std::sync::LazyLock;

static MESSAGE_LINK: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^https://t\.me/(c/)?([A-Za-z0-9_]+)/(\d+)(?:/(\d+))?/?(?:\?.*)?$")
        .expect("message link pattern is valid")
});

/// A message addressed by its public link.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageLink {
    /// Chat holding the message
    pub chat: ChatTarget,
    /// Message id
    pub message_id: MessageId,
}

impl MessageLink {
    /// Parse a `t.me` message link.
    ///
    /// Accepted shapes:
    /// - `https://t.me/<username>/<id>`
    /// - `https://t.me/<username>/<thread>/<id>`
    /// - `https://t.me/c/<internal_id>/<id>` and its threaded form
    ///
    /// # Examples
    ///
    /// ```
    /// use signalpost_core::{ChatId, ChatTarget, MessageId, MessageLink};
    ///
    /// let link = MessageLink::parse("https://t.me/c/2181993369/28/140").unwrap();
    /// assert_eq!(link.chat, ChatTarget::Id(ChatId(-1002181993369)));
    /// assert_eq!(link.message_id, MessageId(140));
    /// ```
    pub fn parse(link: &str) -> Result<Self, InputError> {
        let invalid = || InputError::new(InputErrorKind::InvalidMessageLink(link.to_string()));

        let captures = MESSAGE_LINK.captures(link.trim()).ok_or_else(invalid)?;
        let private = captures.get(1).is_some();
        let chat = &captures[2];
        let message = captures
            .get(4)
            .or_else(|| captures.get(3))
            .ok_or_else(invalid)?
            .as_str();
        let message_id = message.parse::<i32>().map(MessageId).map_err(|_| invalid())?;

        let chat = if private {
            let internal = chat.parse::<i64>().map_err(|_| invalid())?;
            let id = format!("-100{internal}").parse::<i64>().map_err(|_| invalid())?;
            ChatTarget::Id(ChatId(id))
        } else if let Ok(id) = chat.parse::<i64>() {
            ChatTarget::Id(ChatId(id))
        } else {
            ChatTarget::Username(chat.to_string())
        };

        Ok(Self { chat, message_id })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_public_link() {
        let link = MessageLink::parse("https://t.me/airuforum/149").unwrap();
        assert_eq!(link.chat, ChatTarget::Username("airuforum".to_string()));
        assert_eq!(link.message_id, MessageId(149));
    }

    #[test]
    fn test_threaded_public_link_uses_last_id() {
        let link = MessageLink::parse("https://t.me/airuforum/28/806").unwrap();
        assert_eq!(link.message_id, MessageId(806));
    }

    #[test]
    fn test_malformed_links_are_rejected() {
        for link in [
            "",
            "t.me/airuforum/1",
            "https://example.com/airuforum/1",
            "https://t.me/airuforum",
            "https://t.me/c/not_a_number/5",
        ] {
            let err = MessageLink::parse(link).unwrap_err();
            assert!(matches!(err.kind(), InputErrorKind::InvalidMessageLink(_)));
        }
    }
}
