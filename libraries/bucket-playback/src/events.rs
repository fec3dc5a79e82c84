//! Session Events
//!
//! Event-based communication for UI synchronization. The session queues
//! events as it changes and the rendering surface drains them:
//! - State changes (idle/loading/ready/error)
//! - Track changes (on every successful or attempted selection)
//! - Status updates (every tick from the media handle)
//! - Track completion (just before auto-advance)

use crate::types::SessionState;
use serde::{Deserialize, Serialize};

/// Events emitted by the playback session
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum SessionEvent {
    /// Session state changed
    StateChanged {
        /// The new state
        state: SessionState,
    },

    /// A different track was selected
    TrackChanged {
        /// Index of the new track in the session's list
        index: usize,
        /// Key of the new track
        key: String,
        /// Key of the previously loaded track (if any)
        previous_key: Option<String>,
    },

    /// Status tick from the media handle
    PositionUpdate {
        position_ms: u64,
        duration_ms: u64,
        is_playing: bool,
    },

    /// Track reached its end naturally
    TrackFinished {
        /// Key of the finished track
        key: String,
    },

    /// Shuffle toggled
    ShuffleChanged { enabled: bool },

    /// A track failed to load
    Error {
        /// Error message
        message: String,
    },
}
