//! Error types for livesheet-core

use crate::cell::Position;
use thiserror::Error;

/// Result type alias using [`Error`]
pub type Result<T> = std::result::Result<T, Error>;

/// Structural failures of the sheet API
///
/// None of these leave a partial edit behind: the sheet is unchanged whenever
/// one is returned.
#[derive(Debug, Error)]
pub enum Error {
    /// Position outside the sheet limits
    #[error("Invalid position: row {}, column {}", .0.row, .0.col)]
    InvalidPosition(Position),

    /// Malformed A1-style address
    #[error("Invalid cell address: {0}")]
    InvalidAddress(String),

    /// Formula text could not be parsed
    #[error("Formula parse error: {0}")]
    FormulaParse(String),

    /// The edit would make a cell depend on itself
    #[error("Circular dependency detected involving cell {0}")]
    CircularDependency(Position),

    /// Writing printed output failed
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Whether this error is a rejected circular edit
    pub fn is_circular_dependency(&self) -> bool {
        matches!(self, Error::CircularDependency(_))
    }
}
