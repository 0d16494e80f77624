//! Public message links.

use signalpost_core::{ChatId, MessageId};

/// Public link to a message.
///
/// Chats with a username get `https://t.me/{username}/{id}`; everything else
/// gets the private `https://t.me/c/{internal id}/{id}` form, where the internal
/// id is the chat id without its `-100` prefix.
pub fn message_url(chat_id: ChatId, username: Option<&str>, message_id: MessageId) -> String {
    match username {
        Some(username) => format!("https://t.me/{}/{}", username, message_id),
        None => {
            let raw = chat_id.0.to_string();
            let internal = raw
                .strip_prefix("-100")
                .map(str::to_string)
                .unwrap_or_else(|| chat_id.0.unsigned_abs().to_string());
            format!("https://t.me/c/{}/{}", internal, message_id)
        }
    }
}
