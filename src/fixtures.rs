//! Test fixtures: a scratch chat.db with the tables the gateway reads.

use std::path::{Path, PathBuf};

use rusqlite::{params, Connection};
use tempfile::TempDir;

pub struct ChatDbFixture {
    _dir: TempDir,
    path: PathBuf,
    conn: Connection,
}

#[derive(Debug, Clone, Default)]
pub struct FixtureMessage {
    pub rowid: i64,
    pub date: i64,
    pub subject: Option<String>,
    pub text: Option<String>,
    pub is_audio_message: bool,
    pub attributed_body: Option<Vec<u8>>,
    /// `handle.ROWID`, 0 for none
    pub handle: i64,
    pub is_from_me: bool,
    pub room: Option<String>,
}

impl ChatDbFixture {
    pub fn new() -> Self {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("chat.db");
        let conn = Connection::open(&path).unwrap();
        conn.execute_batch(
            r#"
            CREATE TABLE handle (
                ROWID INTEGER PRIMARY KEY AUTOINCREMENT UNIQUE,
                id TEXT NOT NULL,
                country TEXT,
                service TEXT NOT NULL,
                uncanonicalized_id TEXT
            );
            CREATE TABLE message (
                ROWID INTEGER PRIMARY KEY AUTOINCREMENT,
                text TEXT,
                subject TEXT,
                handle_id INTEGER DEFAULT 0,
                date INTEGER,
                is_from_me INTEGER DEFAULT 0,
                is_audio_message INTEGER DEFAULT 0,
                cache_has_attachments INTEGER DEFAULT 0,
                cache_roomnames TEXT,
                attributedBody BLOB
            );
            CREATE TABLE attachment (
                ROWID INTEGER PRIMARY KEY AUTOINCREMENT,
                filename TEXT,
                mime_type TEXT,
                total_bytes INTEGER DEFAULT 0
            );
            CREATE TABLE message_attachment_join (
                message_id INTEGER REFERENCES message (ROWID) ON DELETE CASCADE,
                attachment_id INTEGER REFERENCES attachment (ROWID) ON DELETE CASCADE,
                UNIQUE(message_id, attachment_id)
            );
            "#,
        )
        .unwrap();

        Self {
            _dir: dir,
            path,
            conn,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn add_handle(
        &self,
        rowid: i64,
        id: &str,
        service: &str,
        country: Option<&str>,
        uncanonicalized_id: Option<&str>,
    ) {
        self.conn
            .execute(
                "INSERT INTO handle (ROWID, id, service, country, uncanonicalized_id)
                 VALUES (?1, ?2, ?3, ?4, ?5)",
                params![rowid, id, service, country, uncanonicalized_id],
            )
            .unwrap();
    }

    pub fn add_message(&self, msg: FixtureMessage) {
        self.conn
            .execute(
                "INSERT INTO message (ROWID, date, subject, text, is_audio_message,
                                      attributedBody, handle_id, is_from_me, cache_roomnames)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
                params![
                    msg.rowid,
                    msg.date,
                    msg.subject,
                    msg.text,
                    msg.is_audio_message,
                    msg.attributed_body,
                    msg.handle,
                    msg.is_from_me,
                    msg.room,
                ],
            )
            .unwrap();
    }

    pub fn add_attachment(
        &self,
        message_id: i64,
        rowid: i64,
        filename: &str,
        mime_type: Option<&str>,
        total_bytes: Option<i64>,
    ) {
        self.conn
            .execute(
                "INSERT INTO attachment (ROWID, filename, mime_type, total_bytes)
                 VALUES (?1, ?2, ?3, ?4)",
                params![rowid, filename, mime_type, total_bytes],
            )
            .unwrap();
        self.conn
            .execute(
                "INSERT INTO message_attachment_join (message_id, attachment_id) VALUES (?1, ?2)",
                params![message_id, rowid],
            )
            .unwrap();
        self.conn
            .execute(
                "UPDATE message SET cache_has_attachments = 1 WHERE ROWID = ?1",
                params![message_id],
            )
            .unwrap();
    }
}

/// Build an `attributedBody` typedstream archive around the given text,
/// laid out the way Messages writes it.
pub fn archive(text: &str) -> Vec<u8> {
    let mut blob = Vec::new();
    blob.extend_from_slice(&[0x04, 0x0B]);
    blob.extend_from_slice(b"streamtyped");
    blob.extend_from_slice(&[0x81, 0xE8, 0x03, 0x84, 0x01, 0x40, 0x84, 0x84, 0x84, 0x12]);
    blob.extend_from_slice(b"NSAttributedString");
    blob.extend_from_slice(&[0x00, 0x84, 0x84, 0x08]);
    blob.extend_from_slice(b"NSObject");
    blob.extend_from_slice(&[0x00, 0x85, 0x92, 0x84, 0x84, 0x84, 0x08]);
    blob.extend_from_slice(b"NSString");
    blob.extend_from_slice(&[0x01, 0x94, 0x84, 0x01, b'+']);

    let bytes = text.as_bytes();
    if bytes.len() < 0x80 {
        blob.push(bytes.len() as u8);
    } else if bytes.len() <= u16::MAX as usize {
        blob.push(0x81);
        blob.extend_from_slice(&(bytes.len() as u16).to_le_bytes());
    } else {
        blob.push(0x82);
        blob.extend_from_slice(&(bytes.len() as u32).to_le_bytes());
    }
    blob.extend_from_slice(bytes);

    blob.extend_from_slice(&[0x86, 0x84, 0x02, 0x69, 0x49, 0x01, 0x05, 0x92, 0x84, 0x84, 0x84, 0x0C]);
    blob.extend_from_slice(b"NSDictionary");
    blob.extend_from_slice(&[0x00, 0x94, 0x84, 0x01, 0x69, 0x01, 0x92, 0x84, 0x84, 0x84, 0x08]);
    blob.extend_from_slice(b"NSNumber");
    blob.extend_from_slice(&[0x00, 0x86, 0x86, 0x86]);
    blob
}
