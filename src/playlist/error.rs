//! Playlist error types

/// Error type for playlist operations
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PlaylistError {
    /// The requested resource is not in the library
    #[error("invalid resource: {0}")]
    InvalidResource(String),
}
