//! Gateway configuration and per-user default locations.

use std::path::{Path, PathBuf};

use chrono::{FixedOffset, Offset, Utc};

use crate::error::{Error, Result};

/// Display offset applied to store timestamps unless configured otherwise.
pub const DEFAULT_UTC_OFFSET_HOURS: i32 = 8;

/// Configuration for a [`crate::MessagingGateway`].
#[derive(Debug, Clone)]
pub struct GatewayConfig {
    /// Path to the Messages history database
    pub db_path: PathBuf,
    /// Offset added when rendering store timestamps
    pub utc_offset: FixedOffset,
    /// Directory file attachments are expected to live under
    pub attachments_dir: PathBuf,
    /// Directory the transient text staging file is written to
    pub staging_dir: PathBuf,
}

impl GatewayConfig {
    /// Build a configuration rooted at the given home directory.
    pub fn for_home(home: &Path) -> Self {
        Self {
            db_path: home.join("Library").join("Messages").join("chat.db"),
            utc_offset: offset_from_hours(DEFAULT_UTC_OFFSET_HOURS)
                .unwrap_or_else(|_| Utc.fix()),
            attachments_dir: home.join("Pictures"),
            staging_dir: PathBuf::from("."),
        }
    }

    /// Build the default configuration for the current user.
    pub fn for_current_user() -> Result<Self> {
        let home = dirs::home_dir().ok_or(Error::HomeDirUnavailable)?;
        Ok(Self::for_home(&home))
    }

    pub fn with_db_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.db_path = path.into();
        self
    }

    /// Set the display offset in whole hours east of UTC.
    pub fn with_utc_offset_hours(mut self, hours: i32) -> Result<Self> {
        self.utc_offset = offset_from_hours(hours)?;
        Ok(self)
    }

    pub fn with_attachments_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.attachments_dir = dir.into();
        self
    }

    pub fn with_staging_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.staging_dir = dir.into();
        self
    }
}

impl Default for GatewayConfig {
    /// Falls back to the current directory when no home directory is known.
    fn default() -> Self {
        let home = dirs::home_dir().unwrap_or_else(|| PathBuf::from("."));
        Self::for_home(&home)
    }
}

/// Convert whole hours into a fixed offset, rejecting anything past ±23h.
pub fn offset_from_hours(hours: i32) -> Result<FixedOffset> {
    hours
        .checked_mul(3600)
        .and_then(FixedOffset::east_opt)
        .ok_or(Error::InvalidUtcOffset(hours))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_paths_for_home() {
        let config = GatewayConfig::for_home(Path::new("/Users/alice"));
        assert!(config.db_path.ends_with("Library/Messages/chat.db"));
        assert_eq!(config.attachments_dir, PathBuf::from("/Users/alice/Pictures"));
        assert_eq!(config.staging_dir, PathBuf::from("."));
        assert_eq!(config.utc_offset.local_minus_utc(), 8 * 3600);
    }

    #[test]
    fn test_with_utc_offset_hours() {
        let config = GatewayConfig::for_home(Path::new("/tmp"))
            .with_utc_offset_hours(-5)
            .unwrap();
        assert_eq!(config.utc_offset.local_minus_utc(), -5 * 3600);
    }

    #[test]
    fn test_invalid_offset_rejected() {
        assert!(matches!(
            offset_from_hours(24),
            Err(Error::InvalidUtcOffset(24))
        ));
        assert!(offset_from_hours(i32::MAX).is_err());
    }
}
