//! Message display formatting for terminal output.

use crossterm::execute;
use crossterm::style::{Attribute, Color, Print, ResetColor, SetAttribute, SetForegroundColor};
use std::io::{stdout, Stdout, Write};

use imessage_gateway::{MessageRecord, Recipient};

/// Color scheme for different message elements
pub struct ColorScheme {
    pub timestamp: Color,
    pub sender: Color,
    pub group_name: Color,
    pub message_body: Color,
    pub media_info: Color,
    pub separator: Color,
    pub from_me: Color,
}

impl Default for ColorScheme {
    fn default() -> Self {
        Self {
            timestamp: Color::DarkGrey,
            sender: Color::Cyan,
            group_name: Color::Magenta,
            message_body: Color::White,
            media_info: Color::DarkGrey,
            separator: Color::DarkGrey,
            from_me: Color::Blue,
        }
    }
}

/// Formats and displays message history to the terminal
pub struct MessageDisplay {
    colors: ColorScheme,
    show_separator: bool,
}

impl MessageDisplay {
    pub fn new() -> Self {
        Self {
            colors: ColorScheme::default(),
            show_separator: true,
        }
    }

    /// Display a message to stdout
    pub fn display(&self, msg: &MessageRecord) -> std::io::Result<()> {
        let mut stdout = stdout();

        if self.show_separator {
            self.print_separator(&mut stdout)?;
        }

        self.print_header(&mut stdout, msg)?;
        self.print_content(&mut stdout, msg)?;

        println!();
        stdout.flush()?;
        Ok(())
    }

    /// Display a list of contact handles
    pub fn display_recipients(&self, recipients: &[Recipient]) -> std::io::Result<()> {
        let mut stdout = stdout();

        for recipient in recipients {
            execute!(
                stdout,
                SetForegroundColor(self.colors.sender),
                SetAttribute(Attribute::Bold),
                Print(&recipient.id),
                SetAttribute(Attribute::Reset),
                ResetColor,
                SetForegroundColor(self.colors.media_info),
                Print(format!(" [{}]", recipient.service)),
                ResetColor
            )?;

            if let Some(country) = &recipient.country {
                execute!(
                    stdout,
                    SetForegroundColor(self.colors.media_info),
                    Print(format!(" {}", country)),
                    ResetColor
                )?;
            }
            println!();
        }

        stdout.flush()?;
        Ok(())
    }

    fn print_separator(&self, stdout: &mut Stdout) -> std::io::Result<()> {
        execute!(
            stdout,
            SetForegroundColor(self.colors.separator),
            Print("━".repeat(70)),
            ResetColor
        )?;
        println!();
        Ok(())
    }

    fn print_header(&self, stdout: &mut Stdout, msg: &MessageRecord) -> std::io::Result<()> {
        let timestamp = msg.date_readable.as_deref().unwrap_or("unknown time");

        execute!(
            stdout,
            SetForegroundColor(self.colors.timestamp),
            Print(format!("[{}] ", timestamp)),
            ResetColor
        )?;

        let (label, color) = if msg.is_from_me {
            ("To", self.colors.from_me)
        } else {
            ("From", self.colors.sender)
        };
        let who = msg.handle_id.as_deref().unwrap_or("unknown");

        execute!(
            stdout,
            Print(format!("{} ({}): ", msg.role, label)),
            SetForegroundColor(color),
            SetAttribute(Attribute::Bold),
            Print(who),
            SetAttribute(Attribute::Reset),
            ResetColor
        )?;

        if let Some(room) = &msg.cache_roomnames {
            execute!(
                stdout,
                SetForegroundColor(self.colors.group_name),
                Print(format!(" in {}", room)),
                ResetColor
            )?;
        }

        println!();
        Ok(())
    }

    fn print_content(&self, stdout: &mut Stdout, msg: &MessageRecord) -> std::io::Result<()> {
        if let Some(subject) = &msg.subject {
            execute!(
                stdout,
                SetAttribute(Attribute::Bold),
                Print(subject),
                SetAttribute(Attribute::Reset)
            )?;
            println!();
        }

        match &msg.message {
            Some(body) => execute!(
                stdout,
                SetForegroundColor(self.colors.message_body),
                Print(body),
                ResetColor
            )?,
            None => execute!(
                stdout,
                SetForegroundColor(self.colors.media_info),
                SetAttribute(Attribute::Italic),
                Print(if msg.is_audio_message {
                    "[Audio message]"
                } else {
                    "[No text]"
                }),
                SetAttribute(Attribute::Reset),
                ResetColor
            )?,
        }

        if msg.has_attachment {
            println!();
            let name = msg
                .filename
                .as_deref()
                .and_then(|f| f.rsplit('/').next())
                .unwrap_or("attachment");
            execute!(
                stdout,
                SetForegroundColor(self.colors.media_info),
                Print(format!(
                    "[{}: {} - {}]",
                    msg.attachment_type.as_deref().unwrap_or("file"),
                    name,
                    msg.attachment_size.as_deref().unwrap_or("unknown size")
                )),
                ResetColor
            )?;
        }

        println!();
        Ok(())
    }
}

impl Default for MessageDisplay {
    fn default() -> Self {
        Self::new()
    }
}

/// Print a success message
pub fn print_success(message: &str) {
    let mut stdout = stdout();
    let _ = execute!(
        stdout,
        SetForegroundColor(Color::Green),
        SetAttribute(Attribute::Bold),
        Print("✓ "),
        Print(message),
        SetAttribute(Attribute::Reset),
        ResetColor
    );
    println!();
}

/// Print an error message
pub fn print_error(message: &str) {
    let mut stdout = stdout();
    let _ = execute!(
        stdout,
        SetForegroundColor(Color::Red),
        SetAttribute(Attribute::Bold),
        Print("✗ Error: "),
        SetAttribute(Attribute::Reset),
        SetForegroundColor(Color::Red),
        Print(message),
        ResetColor
    );
    println!();
}

/// Print an info message
pub fn print_info(message: &str) {
    let mut stdout = stdout();
    let _ = execute!(
        stdout,
        SetForegroundColor(Color::Cyan),
        Print("ℹ "),
        Print(message),
        ResetColor
    );
    println!();
}
