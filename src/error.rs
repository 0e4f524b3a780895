//! Error types
//!
//! Each subsystem has its own error enum; [`Error`] collects them for the
//! server entry points.

use crate::library::LibraryError;
use crate::playlist::PlaylistError;

/// Top-level error type
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Socket or filesystem failure
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The library file could not be loaded
    #[error(transparent)]
    Library(#[from] LibraryError),

    /// A play request was rejected
    #[error(transparent)]
    Playlist(#[from] PlaylistError),
}

/// Result alias used by the server entry points
pub type Result<T> = std::result::Result<T, Error>;
