//! Conversion of store-native timestamps to calendar time.
//!
//! `message.date` counts nanoseconds since 2001-01-01T00:00:00Z (the Apple
//! reference date). The display offset is applied on top of UTC.

use chrono::{DateTime, FixedOffset, NaiveDate, Utc};

const NANOS_PER_SECOND: i64 = 1_000_000_000;

/// Format used for human-readable timestamps.
pub const READABLE_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Converts raw store timestamps using an epoch offset fixed at construction.
#[derive(Debug, Clone, Copy)]
pub struct AppleClock {
    /// Apple reference date as Unix nanoseconds
    epoch_offset_ns: i64,
    display_offset: FixedOffset,
}

impl AppleClock {
    pub fn new(display_offset: FixedOffset) -> Self {
        let reference = NaiveDate::from_ymd_opt(2001, 1, 1)
            .and_then(|d| d.and_hms_opt(0, 0, 0))
            .map(|dt| dt.and_utc().timestamp())
            .unwrap_or(978_307_200);

        Self {
            epoch_offset_ns: reference * NANOS_PER_SECOND,
            display_offset,
        }
    }

    pub fn epoch_offset_ns(&self) -> i64 {
        self.epoch_offset_ns
    }

    /// Convert a raw store timestamp to a zoned datetime.
    ///
    /// Sub-second precision is truncated. Returns `None` when the value falls
    /// outside the representable range.
    pub fn datetime(&self, raw: i64) -> Option<DateTime<FixedOffset>> {
        let unix_ns = raw.checked_add(self.epoch_offset_ns)?;
        let seconds = unix_ns / NANOS_PER_SECOND;
        DateTime::<Utc>::from_timestamp(seconds, 0).map(|dt| dt.with_timezone(&self.display_offset))
    }

    /// Render a raw store timestamp as `YYYY-MM-DD HH:MM:SS`.
    pub fn readable(&self, raw: i64) -> Option<String> {
        self.datetime(raw)
            .map(|dt| dt.format(READABLE_FORMAT).to_string())
    }
}
