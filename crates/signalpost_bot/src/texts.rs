//! Operator-facing strings.

use serde::{Deserialize, Serialize};

/// Every string the bot shows the operator or adds to channel posts.
///
/// Labels with a `{status}` placeholder get the on/off marker; failure replies
/// with an `{error}` placeholder get the escaped error message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Texts {
    /// Approve button
    pub publish_button: String,
    /// Edit button
    pub edit_button: String,
    /// Delete button
    pub delete_button: String,
    /// Reply after an approval
    pub post_published: String,
    /// Reply after a deletion
    pub post_deleted: String,
    /// Header under a win batch preview
    pub wins_header: String,
    /// Force-reply prompt opening an edit
    pub edit_prompt: String,
    /// Re-prompt when an edit is neither text nor voice
    pub invalid_edit: String,
    /// Heading of the admin controls
    pub admin_settings: String,
    /// Moderation toggle label
    pub moderation_button: String,
    /// Generation toggle label
    pub generation_button: String,
    /// Marker for an enabled toggle
    pub status_on: String,
    /// Marker for a disabled toggle
    pub status_off: String,
    /// Reply to a malformed `/button` link
    pub invalid_message_url: String,
    /// Reply after attaching a button
    pub button_edited: String,
    /// Reply after removing buttons
    pub button_deleted: String,
    /// Reply when the transport refuses the edit
    pub button_not_edited: String,
    /// Report for a `#win` caption without a usable percent
    pub invalid_win_percent: String,
    /// Label of the call-to-action button under rotated links
    pub cta_button: String,
}

impl Default for Texts {
    fn default() -> Self {
        Self {
            publish_button: "✅ Publish".to_string(),
            edit_button: "✏️ Edit".to_string(),
            delete_button: "❌ Cancel".to_string(),
            post_published: "✅ Post published.".to_string(),
            post_deleted: "❌ Post cancelled.".to_string(),
            wins_header: "📊 Wins of the last hour:".to_string(),
            edit_prompt: "📄 Send new text or a voice message for this post:".to_string(),
            invalid_edit: "❌ Only text or voice messages can edit a post. Try again:"
                .to_string(),
            admin_settings: "Choose what to toggle:".to_string(),
            moderation_button: "{status} Post moderation".to_string(),
            generation_button: "{status} Post generation".to_string(),
            status_on: "✅".to_string(),
            status_off: "❌".to_string(),
            invalid_message_url: "❌ Invalid message link.".to_string(),
            button_edited: "✏️ Button updated.".to_string(),
            button_deleted: "✏️ Button removed.".to_string(),
            button_not_edited: "❌ Could not edit the message.\n<code>{error}</code>".to_string(),
            invalid_win_percent: "❌ Win fragment dropped.\n<code>{error}</code>".to_string(),
            cta_button: "🧠 AI Signal Bot".to_string(),
        }
    }
}

impl Texts {
    /// Toggle label with its status marker filled in.
    pub fn toggle_label(&self, template: &str, enabled: bool) -> String {
        let status = if enabled {
            &self.status_on
        } else {
            &self.status_off
        };
        template.replace("{status}", status)
    }

    /// Failure reply with the escaped error filled in.
    pub fn with_error(template: &str, error: &str) -> String {
        template.replace("{error}", &escape_html(error))
    }
}

/// Escape text for HTML parse mode.
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(c),
        }
    }
    out
}
