//! Read the macOS Messages history database and send messages through
//! Messages.app.
//!
//! [`MessagingGateway`] lists contact handles and messages from `chat.db`
//! with display-ready derived columns, and sends text or files by running
//! AppleScript through `osascript`.

pub mod automation;
pub mod clock;
pub mod config;
pub mod decoder;
pub mod error;
pub mod gateway;
pub mod records;
pub mod storage;

#[cfg(test)]
pub(crate) mod fixtures;

pub use automation::{AutomationRunner, CommandOutput, MessageKind, OsaScriptRunner};
pub use config::GatewayConfig;
pub use decoder::{BodyDecoder, TypedStreamDecoder};
pub use error::{Error, Result};
pub use gateway::{MessagingGateway, SendOutcome};
pub use records::{MessageRecord, Recipient, Role};
