//! iMessage Gateway - CLI for reading Messages history and sending messages.
//!
//! History comes straight from the local `chat.db`; sends are scripted
//! through Messages.app with `osascript`.

mod cli;
mod display;

use anyhow::{Context, Result};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use cli::{Args, Command};
use display::{print_error, print_info, print_success, MessageDisplay};
use imessage_gateway::{GatewayConfig, MessageKind, MessagingGateway, OsaScriptRunner};

fn main() -> Result<()> {
    let args = Args::parse_args();

    init_logging(args.verbose);

    let mut config = GatewayConfig::for_current_user()
        .context("Could not determine default Messages paths")?
        .with_utc_offset_hours(args.utc_offset)?;
    if let Some(db) = &args.db {
        config = config.with_db_path(db);
    }

    info!("Using Messages database: {:?}", config.db_path);

    let mut gateway = MessagingGateway::new(config);
    if let Some(program) = &args.osascript {
        gateway = gateway.with_runner(OsaScriptRunner::with_program(program));
    }

    let result = run(&mut gateway, &args);
    gateway.close().context("Failed to close Messages database")?;
    result
}

/// Initialize the tracing subscriber for logging
fn init_logging(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .without_time()
        .with_writer(std::io::stderr)
        .init();
}

fn run(gateway: &mut MessagingGateway, args: &Args) -> Result<()> {
    match &args.command {
        Command::Recipients => {
            let recipients = gateway
                .list_recipients()
                .context("Failed to read recipients")?;
            debug!("Found {} recipients", recipients.len());

            if args.json {
                println!("{}", serde_json::to_string_pretty(&recipients)?);
            } else if recipients.is_empty() {
                print_info("No recipients found.");
            } else {
                MessageDisplay::new().display_recipients(&recipients)?;
            }
        }

        Command::Messages {
            recipient,
            limit,
            group,
        } => {
            let messages = gateway
                .list_messages(recipient.as_deref(), *limit, *group)
                .context("Failed to read messages")?;
            debug!("Found {} messages", messages.len());

            if args.json {
                println!("{}", serde_json::to_string_pretty(&messages)?);
            } else if messages.is_empty() {
                print_info("No messages found.");
            } else {
                let display = MessageDisplay::new();
                for msg in &messages {
                    display.display(msg)?;
                }
            }
        }

        Command::Send {
            recipient,
            content,
            file,
            group,
        } => {
            let kind = if *file {
                MessageKind::File
            } else {
                MessageKind::Text
            };
            let outcome = gateway.send_message(content, recipient, kind, *group);

            if args.json {
                println!("{}", serde_json::to_string_pretty(&outcome)?);
            } else if outcome.success {
                print_success(&format!("Sent {} to {}", kind, recipient));
            } else {
                print_error(&outcome.diagnostic);
            }

            if !outcome.success {
                anyhow::bail!("Failed to send {} to {}", kind, recipient);
            }
        }
    }

    Ok(())
}
