//! CLI argument parsing using clap.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use imessage_gateway::config::DEFAULT_UTC_OFFSET_HOURS;

/// iMessage Gateway - Read Messages history and send messages via Messages.app
#[derive(Parser, Debug, Clone)]
#[command(name = "imessage-gateway")]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Enable verbose/debug logging
    #[arg(short, long, global = true, env = "IMESSAGE_VERBOSE")]
    pub verbose: bool,

    /// Output results as JSON (useful for piping to other tools)
    #[arg(long, global = true, env = "IMESSAGE_JSON")]
    pub json: bool,

    /// Path to the Messages database (default: ~/Library/Messages/chat.db)
    #[arg(long, value_name = "PATH", global = true, env = "IMESSAGE_DB")]
    pub db: Option<PathBuf>,

    /// Hours east of UTC used when rendering message timestamps
    #[arg(
        long,
        value_name = "HOURS",
        default_value_t = DEFAULT_UTC_OFFSET_HOURS,
        allow_hyphen_values = true,
        global = true,
        env = "IMESSAGE_UTC_OFFSET"
    )]
    pub utc_offset: i32,

    /// Path to the osascript binary
    #[arg(long, value_name = "PATH", global = true, env = "IMESSAGE_OSASCRIPT")]
    pub osascript: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// List all contact handles
    Recipients,

    /// List messages, newest first
    Messages {
        /// Only messages with this handle id (or group room name with --group)
        #[arg(long, short)]
        recipient: Option<String>,

        /// Maximum number of messages to show
        #[arg(long, short = 'n')]
        limit: Option<usize>,

        /// Treat the recipient as a group chat room name
        #[arg(long)]
        group: bool,
    },

    /// Send a text message or a file
    Send {
        /// Phone number, Apple ID, or group chat id
        recipient: String,

        /// Message text, or a file path with --file
        content: String,

        /// Send CONTENT as a file attachment
        #[arg(long)]
        file: bool,

        /// Send to a group chat
        #[arg(long)]
        group: bool,
    },
}

impl Args {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Self::parse()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_send_file_to_group() {
        let args = Args::try_parse_from([
            "imessage-gateway",
            "send",
            "chat123",
            "/Users/me/Pictures/cat.png",
            "--file",
            "--group",
        ])
        .unwrap();

        match args.command {
            Command::Send {
                recipient,
                content,
                file,
                group,
            } => {
                assert_eq!(recipient, "chat123");
                assert_eq!(content, "/Users/me/Pictures/cat.png");
                assert!(file);
                assert!(group);
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_parse_messages_with_negative_offset() {
        let args = Args::try_parse_from([
            "imessage-gateway",
            "--utc-offset",
            "-5",
            "messages",
            "-r",
            "+15551234567",
            "-n",
            "20",
        ])
        .unwrap();

        assert_eq!(args.utc_offset, -5);
        assert!(matches!(
            args.command,
            Command::Messages { recipient: Some(ref r), limit: Some(20), group: false } if r == "+15551234567"
        ));
    }
}
