//! Error type for the facade crate.

use thiserror::Error;

/// Errors from any Glimpse component.
#[derive(Debug, Error)]
pub enum Error {
    /// Folder scanning error.
    #[error(transparent)]
    Scan(#[from] glimpse_index::ScanError),

    /// Animation error.
    #[error(transparent)]
    Anim(#[from] glimpse_anim::Error),
}

/// Result type alias using the facade Error type.
pub type Result<T> = std::result::Result<T, Error>;
