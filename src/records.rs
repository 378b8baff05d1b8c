//! Records returned by the gateway and the per-row derivations applied to them.

use serde::Serialize;
use std::fmt;

const BYTES_PER_MB: f64 = 1024.0 * 1024.0;

/// A contact handle from the `handle` table
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Recipient {
    pub id: String,
    pub service: String,
    pub country: Option<String>,
    /// Phone number without the country prefix
    pub uncanonicalized_id: Option<String>,
}

/// Who wrote a message, from the local user's point of view
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Role {
    Me,
    Friend,
}

impl Role {
    pub fn from_is_from_me(is_from_me: bool) -> Self {
        if is_from_me {
            Role::Me
        } else {
            Role::Friend
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Me => "Me",
            Role::Friend => "Friend",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Raw columns of one message row, joined with its sender and attachment
#[derive(Debug, Clone, Default)]
pub struct MessageRow {
    pub rowid: i64,
    pub date: i64,
    pub subject: Option<String>,
    pub text: Option<String>,
    pub is_audio_message: bool,
    pub cache_has_attachments: bool,
    pub attributed_body: Option<Vec<u8>>,
    pub handle_id: Option<String>,
    pub is_from_me: bool,
    pub cache_roomnames: Option<String>,
    pub filename: Option<String>,
    pub mime_type: Option<String>,
    pub total_bytes: Option<i64>,
}

/// A message row enriched with derived, display-ready columns
#[derive(Debug, Clone, Serialize)]
pub struct MessageRecord {
    pub rowid: i64,
    /// Store-native timestamp (nanoseconds since 2001-01-01)
    pub date: i64,
    pub subject: Option<String>,
    pub text: Option<String>,
    pub is_audio_message: bool,
    pub cache_has_attachments: bool,
    #[serde(skip_serializing)]
    pub attributed_body: Option<Vec<u8>>,
    /// Sender or recipient handle identifier
    pub handle_id: Option<String>,
    pub is_from_me: bool,
    /// Group room name, if the message belongs to a group chat
    pub cache_roomnames: Option<String>,
    pub filename: Option<String>,
    pub mime_type: Option<String>,
    pub total_bytes: Option<i64>,

    pub role: Role,
    pub message: Option<String>,
    pub date_readable: Option<String>,
    pub has_attachment: bool,
    pub attachment_type: Option<String>,
    pub attachment_size: Option<String>,
}

impl MessageRecord {
    /// Attach derived columns to a raw row.
    ///
    /// `message` and `date_readable` are computed by the caller since they
    /// depend on the configured decoder and clock.
    pub fn from_row(row: MessageRow, message: Option<String>, date_readable: Option<String>) -> Self {
        let role = Role::from_is_from_me(row.is_from_me);
        let has_attachment = row.filename.is_some();
        let attachment_type = row.mime_type.as_deref().and_then(attachment_type);
        let attachment_size = row.total_bytes.and_then(attachment_size);

        Self {
            rowid: row.rowid,
            date: row.date,
            subject: row.subject,
            text: row.text,
            is_audio_message: row.is_audio_message,
            cache_has_attachments: row.cache_has_attachments,
            attributed_body: row.attributed_body,
            handle_id: row.handle_id,
            is_from_me: row.is_from_me,
            cache_roomnames: row.cache_roomnames,
            filename: row.filename,
            mime_type: row.mime_type,
            total_bytes: row.total_bytes,
            role,
            message,
            date_readable,
            has_attachment,
            attachment_type,
            attachment_size,
        }
    }
}

/// Top-level MIME type, e.g. `image` for `image/jpeg`
pub fn attachment_type(mime_type: &str) -> Option<String> {
    if mime_type.is_empty() {
        return None;
    }
    mime_type.split('/').next().map(String::from)
}

/// Attachment size in megabytes with two decimals, e.g. `1.50 MB`
pub fn attachment_size(total_bytes: i64) -> Option<String> {
    if total_bytes <= 0 {
        return None;
    }
    Some(format!("{:.2} MB", total_bytes as f64 / BYTES_PER_MB))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_labels() {
        assert_eq!(Role::from_is_from_me(true).to_string(), "Me");
        assert_eq!(Role::from_is_from_me(false).to_string(), "Friend");
        assert_eq!(serde_json::to_string(&Role::Me).unwrap(), "\"Me\"");
    }

    #[test]
    fn test_attachment_type() {
        assert_eq!(attachment_type("image/jpeg").as_deref(), Some("image"));
        assert_eq!(attachment_type("audio/x-m4a").as_deref(), Some("audio"));
        assert_eq!(attachment_type("text").as_deref(), Some("text"));
        assert_eq!(attachment_type(""), None);
    }

    #[test]
    fn test_attachment_size() {
        assert_eq!(attachment_size(1_572_864).as_deref(), Some("1.50 MB"));
        assert_eq!(attachment_size(1024).as_deref(), Some("0.00 MB"));
        assert_eq!(attachment_size(0), None);
    }

    #[test]
    fn test_attachment_size_reconstructs_bytes() {
        for bytes in [1_i64, 52_000, 1_048_576, 3_333_333, 987_654_321] {
            let size = attachment_size(bytes).unwrap();
            let mb: f64 = size.trim_end_matches(" MB").parse().unwrap();
            let delta = (mb * BYTES_PER_MB - bytes as f64).abs() / BYTES_PER_MB;
            assert!(delta <= 0.005 + f64::EPSILON, "{} -> {}", bytes, size);
        }
    }

    #[test]
    fn test_from_row_without_attachment() {
        let row = MessageRow {
            rowid: 7,
            text: Some("hi".to_string()),
            ..Default::default()
        };
        let record = MessageRecord::from_row(row, Some("hi".to_string()), None);
        assert_eq!(record.role, Role::Friend);
        assert!(!record.has_attachment);
        assert!(record.attachment_type.is_none());
        assert!(record.attachment_size.is_none());
    }

    #[test]
    fn test_serialized_record_omits_blob() {
        let row = MessageRow {
            attributed_body: Some(vec![1, 2, 3]),
            filename: Some("~/Library/Messages/Attachments/a.jpg".to_string()),
            mime_type: Some("image/jpeg".to_string()),
            total_bytes: Some(2_097_152),
            is_from_me: true,
            ..Default::default()
        };
        let record = MessageRecord::from_row(row, None, Some("2001-01-01 08:00:00".to_string()));
        let json = serde_json::to_value(&record).unwrap();
        assert!(json.get("attributed_body").is_none());
        assert_eq!(json["role"], "Me");
        assert_eq!(json["has_attachment"], true);
        assert_eq!(json["attachment_type"], "image");
        assert_eq!(json["attachment_size"], "2.00 MB");
    }
}
