//! Automation of Messages.app through AppleScript.

pub mod runner;
pub mod script;

pub use runner::{AutomationRunner, CommandOutput, OsaScriptRunner};
pub use script::{MessageKind, SendTarget};
