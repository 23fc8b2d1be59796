//! Unified error types for the cube.
//!
//! This module provides the error type returned by every [`Cube`](crate::Cube)
//! operation and converts the lower crates' errors into it.

use thiserror::Error;

/// All cube errors.
///
/// Cancellation is the only runtime failure of `rotate` and `show`; the
/// other variant is reported at construction time.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// The caller's cancellation token fired while it was blocked.
    ///
    /// No facelet was touched and no hook ran for the cancelled operation.
    #[error("operation cancelled")]
    Cancelled,

    /// Construction parameters were rejected
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

/// Result type for cube operations.
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Check if the operation was abandoned through its cancellation token.
    pub fn is_cancelled(&self) -> bool {
        matches!(self, Error::Cancelled)
    }
}

// Convert from internal core errors
impl From<cube_core::Error> for Error {
    fn from(e: cube_core::Error) -> Self {
        match e {
            cube_core::Error::Cancelled => Error::Cancelled,
            cube_core::Error::InvalidConfig(msg) => Error::InvalidConfig(msg),
        }
    }
}
