//! Process execution for the automation tool.

use std::path::PathBuf;
use std::process::{Command, Stdio};

use tracing::debug;

/// Captured result of one automation run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandOutput {
    /// Exit code, `None` if the process was killed by a signal
    pub exit_code: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

impl CommandOutput {
    pub fn success(&self) -> bool {
        self.exit_code == Some(0)
    }

    /// Best available explanation of a failed run
    pub fn diagnostic(&self) -> String {
        let stderr = self.stderr.trim_end();
        if !stderr.is_empty() {
            return stderr.to_string();
        }
        let stdout = self.stdout.trim_end();
        if !stdout.is_empty() {
            return stdout.to_string();
        }
        match self.exit_code {
            Some(code) => format!("exited with status {}", code),
            None => "terminated by signal".to_string(),
        }
    }
}

/// Runs an automation script and reports how it went.
pub trait AutomationRunner {
    /// Blocks until the script finishes. `Err` only when it could not be started.
    fn run(&self, script: &str) -> std::io::Result<CommandOutput>;
}

/// Runs scripts through `osascript -e <script>`
#[derive(Debug, Clone)]
pub struct OsaScriptRunner {
    program: PathBuf,
}

impl OsaScriptRunner {
    pub fn new() -> Self {
        Self::with_program("osascript")
    }

    /// Use a different executable, e.g. a wrapper script
    pub fn with_program(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
        }
    }
}

impl Default for OsaScriptRunner {
    fn default() -> Self {
        Self::new()
    }
}

impl AutomationRunner for OsaScriptRunner {
    fn run(&self, script: &str) -> std::io::Result<CommandOutput> {
        debug!(program = ?self.program, "Running automation script: {}", script);

        let output = Command::new(&self.program)
            .arg("-e")
            .arg(script)
            .stdin(Stdio::null())
            .output()?;

        Ok(CommandOutput {
            exit_code: output.status.code(),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        })
    }
}
