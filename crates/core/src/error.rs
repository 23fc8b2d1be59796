//! Error types for the cube core.

use thiserror::Error;

/// Errors raised by cube operations.
///
/// Malformed arguments (a layer outside `0..size`) are contract violations
/// and panic instead of surfacing here.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// A blocked caller was cancelled before it was admitted or before it
    /// obtained its layer lock. All provisional bookkeeping has been undone.
    #[error("operation cancelled")]
    Cancelled,

    /// Construction parameters were rejected.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

/// Result type for cube core operations.
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Check if this error reports a cancelled wait.
    pub fn is_cancelled(&self) -> bool {
        matches!(self, Error::Cancelled)
    }
}
