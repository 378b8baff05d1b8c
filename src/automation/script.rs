//! AppleScript construction for Messages.app send commands.

use std::fmt;
use std::path::Path;

use serde::{Deserialize, Serialize};

/// What `send_message` content refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MessageKind {
    /// Literal message text
    Text,
    /// Path to a file to send as an attachment
    File,
}

impl MessageKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            MessageKind::Text => "text",
            MessageKind::File => "file",
        }
    }
}

impl fmt::Display for MessageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Messages.app addressee class
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SendTarget {
    /// An individual contact
    Buddy,
    /// A named group chat
    Chat,
}

impl SendTarget {
    pub fn from_is_group(is_group: bool) -> Self {
        if is_group {
            SendTarget::Chat
        } else {
            SendTarget::Buddy
        }
    }

    fn keyword(&self) -> &'static str {
        match self {
            SendTarget::Buddy => "buddy",
            SendTarget::Chat => "chat",
        }
    }
}

/// Quote a value as an AppleScript string literal.
pub fn quote(value: &str) -> String {
    let mut quoted = String::with_capacity(value.len() + 2);
    quoted.push('"');
    for c in value.chars() {
        match c {
            '\\' => quoted.push_str("\\\\"),
            '"' => quoted.push_str("\\\""),
            _ => quoted.push(c),
        }
    }
    quoted.push('"');
    quoted
}

/// `send` clause reading a UTF-8 staging file
pub fn send_text_file_command(staging_path: &Path) -> String {
    format!(
        "send (read (POSIX file {}) as «class utf8»)",
        quote(&staging_path.to_string_lossy())
    )
}

/// `send` clause for a file attachment
pub fn send_attachment_command(file_path: &Path) -> String {
    format!("send POSIX file {}", quote(&file_path.to_string_lossy()))
}

/// Complete script addressing the recipient
pub fn tell_messages(command: &str, target: SendTarget, recipient: &str) -> String {
    format!(
        "tell application \"Messages\" to {} to {} {}",
        command,
        target.keyword(),
        quote(recipient)
    )
}
