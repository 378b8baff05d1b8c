//! Error types for the gateway library.

use thiserror::Error;

/// Errors surfaced by the read path and by configuration.
///
/// The send path never produces these; it reports failures through
/// [`crate::gateway::SendOutcome`] instead.
#[derive(Debug, Error)]
pub enum Error {
    /// The store could not be opened or a query failed.
    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// The requested display offset is outside the valid range.
    #[error("invalid UTC offset: {0} hours")]
    InvalidUtcOffset(i32),

    /// No home directory to resolve per-user default paths against.
    #[error("could not determine home directory")]
    HomeDirUnavailable,
}

pub type Result<T> = std::result::Result<T, Error>;
