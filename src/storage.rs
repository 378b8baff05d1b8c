//! Read-only access to the Messages history database.

use std::path::{Path, PathBuf};

use rusqlite::{params, Connection, OpenFlags, Row};
use tracing::{debug, info};

use crate::error::Result;
use crate::records::{MessageRow, Recipient};

/// All handles, in store order.
pub const ALL_RECIPIENTS: &str = r#"
SELECT id, service, country, uncanonicalized_id
FROM handle
"#;

/// Messages joined with sender handle and attachment metadata.
/// Parameters: ?1 = handle id filter (NULL for all), ?2 = limit (-1 for all)
pub const MESSAGES_BY_HANDLE: &str = r#"
SELECT
    message.ROWID,
    message.date,
    message.subject,
    message.text,
    message.is_audio_message,
    message.cache_has_attachments,
    message.attributedBody,
    handle.id,
    message.is_from_me,
    message.cache_roomnames,
    attachment.filename,
    attachment.mime_type,
    attachment.total_bytes
FROM message
LEFT JOIN handle ON message.handle_id = handle.ROWID
LEFT JOIN message_attachment_join ON message.ROWID = message_attachment_join.message_id
LEFT JOIN attachment ON message_attachment_join.attachment_id = attachment.ROWID
WHERE (?1 IS NULL OR handle.id = ?1)
ORDER BY message.date DESC, message.ROWID DESC
LIMIT ?2
"#;

/// Same as [`MESSAGES_BY_HANDLE`] but filtered on the group room name.
pub const MESSAGES_BY_ROOM: &str = r#"
SELECT
    message.ROWID,
    message.date,
    message.subject,
    message.text,
    message.is_audio_message,
    message.cache_has_attachments,
    message.attributedBody,
    handle.id,
    message.is_from_me,
    message.cache_roomnames,
    attachment.filename,
    attachment.mime_type,
    attachment.total_bytes
FROM message
LEFT JOIN handle ON message.handle_id = handle.ROWID
LEFT JOIN message_attachment_join ON message.ROWID = message_attachment_join.message_id
LEFT JOIN attachment ON message_attachment_join.attachment_id = attachment.ROWID
WHERE (?1 IS NULL OR message.cache_roomnames = ?1)
ORDER BY message.date DESC, message.ROWID DESC
LIMIT ?2
"#;

/// Lazily opened connection to the store.
///
/// Not thread-safe; one live connection at most.
pub struct ChatStore {
    db_path: PathBuf,
    conn: Option<Connection>,
}

impl ChatStore {
    pub fn new(db_path: impl Into<PathBuf>) -> Self {
        Self {
            db_path: db_path.into(),
            conn: None,
        }
    }

    pub fn db_path(&self) -> &Path {
        &self.db_path
    }

    pub fn is_open(&self) -> bool {
        self.conn.is_some()
    }

    /// Open the connection if it isn't already.
    pub fn connect(&mut self) -> Result<&Connection> {
        let conn = match self.conn.take() {
            Some(conn) => conn,
            None => {
                let conn = Connection::open_with_flags(
                    &self.db_path,
                    OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_NO_MUTEX,
                )?;
                info!("Opened Messages database at {:?}", self.db_path);
                conn
            }
        };

        Ok(&*self.conn.insert(conn))
    }

    /// Close the connection. Closing an already closed store is a no-op.
    pub fn close(&mut self) -> Result<()> {
        if let Some(conn) = self.conn.take() {
            conn.close().map_err(|(_, e)| e)?;
            info!("Closed Messages database");
        }
        Ok(())
    }

    /// Get all recipient handles
    pub fn recipients(&mut self) -> Result<Vec<Recipient>> {
        let conn = self.connect()?;
        let mut stmt = conn.prepare(ALL_RECIPIENTS)?;

        let recipients = stmt
            .query_map([], |row| {
                Ok(Recipient {
                    id: row.get(0)?,
                    service: row.get(1)?,
                    country: row.get(2)?,
                    uncanonicalized_id: row.get(3)?,
                })
            })?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        Ok(recipients)
    }

    /// Get message rows newest first, optionally filtered and capped.
    pub fn messages(
        &mut self,
        filter: Option<&str>,
        limit: Option<usize>,
        is_group: bool,
    ) -> Result<Vec<MessageRow>> {
        let sql = if is_group {
            MESSAGES_BY_ROOM
        } else {
            MESSAGES_BY_HANDLE
        };
        let limit = limit
            .and_then(|n| i64::try_from(n).ok())
            .unwrap_or(-1);

        debug!(?filter, limit, is_group, "Querying messages");

        let conn = self.connect()?;
        let mut stmt = conn.prepare(sql)?;
        let rows = stmt
            .query_map(params![filter, limit], message_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        Ok(rows)
    }
}

fn message_row(row: &Row<'_>) -> rusqlite::Result<MessageRow> {
    Ok(MessageRow {
        rowid: row.get(0)?,
        date: row.get::<_, Option<i64>>(1)?.unwrap_or(0),
        subject: row.get(2)?,
        text: row.get(3)?,
        is_audio_message: row.get::<_, Option<bool>>(4)?.unwrap_or(false),
        cache_has_attachments: row.get::<_, Option<bool>>(5)?.unwrap_or(false),
        attributed_body: row.get(6)?,
        handle_id: row.get(7)?,
        is_from_me: row.get::<_, Option<bool>>(8)?.unwrap_or(false),
        cache_roomnames: row.get(9)?,
        filename: row.get(10)?,
        mime_type: row.get(11)?,
        total_bytes: row.get(12)?,
    })
}
