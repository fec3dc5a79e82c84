//! Error types for the playback session

use thiserror::Error;

/// Playback errors
#[derive(Debug, Error)]
pub enum PlaybackError {
    /// The media subsystem could not create a handle for the track
    #[error("Failed to load {uri}: {message}")]
    Load { uri: String, message: String },

    /// A command on a live handle failed
    #[error("Media error: {0}")]
    Media(String),

    /// Index out of bounds
    #[error("Index out of bounds: {0}")]
    IndexOutOfBounds(usize),

    /// Selected track is not part of the session's list
    #[error("Track not in list: {0}")]
    TrackNotFound(String),
}

/// Result type for playback operations
pub type Result<T> = std::result::Result<T, PlaybackError>;
