//! Error types for animation resolution.

use thiserror::Error;

/// Errors that can occur while building animations.
///
/// Filenames that do not form a sequence are not errors; they simply
/// produce no frames.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// A sprite-sheet grid needs at least one row and one column.
    #[error("invalid sprite sheet grid: {rows} rows x {columns} columns")]
    InvalidGrid { rows: u32, columns: u32 },
}

/// Result type for animation operations.
pub type Result<T> = std::result::Result<T, Error>;
