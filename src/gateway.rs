//! The messaging gateway: history reads and outbound sends.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::{info, warn};
use uuid::Uuid;

use crate::automation::script::{
    send_attachment_command, send_text_file_command, tell_messages,
};
use crate::automation::{AutomationRunner, MessageKind, OsaScriptRunner, SendTarget};
use crate::clock::AppleClock;
use crate::config::GatewayConfig;
use crate::decoder::{BodyDecoder, TypedStreamDecoder};
use crate::error::Result;
use crate::records::{MessageRecord, MessageRow, Recipient};
use crate::storage::ChatStore;

/// Result of a send attempt
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SendOutcome {
    pub success: bool,
    /// Empty on success
    pub diagnostic: String,
}

impl SendOutcome {
    pub fn sent() -> Self {
        Self {
            success: true,
            diagnostic: String::new(),
        }
    }

    pub fn failed(diagnostic: impl Into<String>) -> Self {
        Self {
            success: false,
            diagnostic: diagnostic.into(),
        }
    }
}

/// Reads the local Messages store and sends through Messages.app.
///
/// Holds at most one open database connection, released by [`close`](Self::close).
pub struct MessagingGateway {
    store: ChatStore,
    clock: AppleClock,
    decoder: Box<dyn BodyDecoder>,
    runner: Box<dyn AutomationRunner>,
    attachments_dir: PathBuf,
    staging_dir: PathBuf,
}

impl MessagingGateway {
    pub fn new(config: GatewayConfig) -> Self {
        Self {
            store: ChatStore::new(config.db_path),
            clock: AppleClock::new(config.utc_offset),
            decoder: Box::new(TypedStreamDecoder),
            runner: Box::new(OsaScriptRunner::new()),
            attachments_dir: config.attachments_dir,
            staging_dir: config.staging_dir,
        }
    }

    /// Replace the rich-text body decoder
    pub fn with_decoder(mut self, decoder: impl BodyDecoder + 'static) -> Self {
        self.decoder = Box::new(decoder);
        self
    }

    /// Replace the automation runner
    pub fn with_runner(mut self, runner: impl AutomationRunner + 'static) -> Self {
        self.runner = Box::new(runner);
        self
    }

    pub fn clock(&self) -> &AppleClock {
        &self.clock
    }

    pub fn is_connected(&self) -> bool {
        self.store.is_open()
    }

    /// Close the database connection. Safe to call repeatedly.
    pub fn close(&mut self) -> Result<()> {
        self.store.close()
    }

    /// All contact handles, unfiltered, in store order.
    pub fn list_recipients(&mut self) -> Result<Vec<Recipient>> {
        self.store.recipients()
    }

    /// Messages newest first, with derived display columns.
    ///
    /// `recipient` matches the handle id exactly, or the group room name when
    /// `is_group` is set.
    pub fn list_messages(
        &mut self,
        recipient: Option<&str>,
        limit: Option<usize>,
        is_group: bool,
    ) -> Result<Vec<MessageRecord>> {
        let rows = self.store.messages(recipient, limit, is_group)?;
        Ok(rows.into_iter().map(|row| self.enrich(row)).collect())
    }

    fn enrich(&self, row: MessageRow) -> MessageRecord {
        let message = self.message_body(&row);
        let date_readable = self.clock.readable(row.date);
        MessageRecord::from_row(row, message, date_readable)
    }

    /// Plain text, or the decoded rich-text body for own messages without it.
    fn message_body(&self, row: &MessageRow) -> Option<String> {
        if row.is_from_me && row.text.is_none() {
            row.attributed_body
                .as_deref()
                .and_then(|blob| self.decoder.decode(blob))
        } else {
            row.text.clone()
        }
    }

    /// Send text or a file to a buddy or group chat.
    ///
    /// Never fails with an error; problems come back in the outcome.
    pub fn send_message(
        &self,
        content: &str,
        recipient: &str,
        kind: MessageKind,
        is_group: bool,
    ) -> SendOutcome {
        let outcome = match kind {
            MessageKind::File => self.send_file(content, recipient, is_group),
            MessageKind::Text => self.send_text(content, recipient, is_group),
        };

        if outcome.success {
            info!("Successfully sent {} to {}.", kind, recipient);
        } else {
            warn!("Failed to send {} to {}. {}", kind, recipient, outcome.diagnostic);
        }

        outcome
    }

    fn send_file(&self, content: &str, recipient: &str, is_group: bool) -> SendOutcome {
        let path = Path::new(content);

        if !path.starts_with(&self.attachments_dir) {
            warn!(
                "File path should be in the attachments directory: {:?}",
                self.attachments_dir
            );
        }

        if !path.exists() {
            return SendOutcome::failed(format!("File not found: {}", content));
        }

        let file_path = match std::path::absolute(path) {
            Ok(p) => p,
            Err(e) => return SendOutcome::failed(format!("Failed to resolve {}: {}", content, e)),
        };

        let command = send_attachment_command(&file_path);
        self.run(&command, recipient, is_group)
    }

    fn send_text(&self, content: &str, recipient: &str, is_group: bool) -> SendOutcome {
        let staged = match StagedFile::write(&self.staging_dir, content) {
            Ok(staged) => staged,
            Err(e) => return SendOutcome::failed(format!("Failed to stage message text: {}", e)),
        };

        let command = send_text_file_command(staged.path());
        self.run(&command, recipient, is_group)
    }

    fn run(&self, command: &str, recipient: &str, is_group: bool) -> SendOutcome {
        let script = tell_messages(command, SendTarget::from_is_group(is_group), recipient);

        match self.runner.run(&script) {
            Ok(output) if output.success() => SendOutcome::sent(),
            Ok(output) => SendOutcome::failed(output.diagnostic()),
            Err(e) => SendOutcome::failed(format!("Failed to run automation tool: {}", e)),
        }
    }
}

/// Transient file holding message text; removed when dropped.
struct StagedFile {
    path: PathBuf,
}

impl StagedFile {
    fn write(dir: &Path, content: &str) -> io::Result<Self> {
        let name = format!("imessage_tmp-{}.txt", Uuid::new_v4());
        let path = std::path::absolute(dir.join(name))?;
        fs::write(&path, content)?;
        Ok(Self { path })
    }

    fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for StagedFile {
    fn drop(&mut self) {
        if let Err(e) = fs::remove_file(&self.path) {
            warn!("Failed to remove staging file {:?}: {}", self.path, e);
        }
    }
}
