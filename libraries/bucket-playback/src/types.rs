//! Core types for the playback session

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Something the session can hand to the media subsystem.
pub trait Track: Clone + Send + Sync {
    /// Unique identifier, used to find the track again after the list changes
    fn key(&self) -> &str;

    /// Retrieval URI passed to [`MediaBackend::load`](crate::MediaBackend::load)
    fn uri(&self) -> &str;

    /// Display name
    fn title(&self) -> &str;
}

#[cfg(feature = "catalog")]
impl Track for bucket_catalog::FileInfo {
    fn key(&self) -> &str {
        &self.key
    }

    fn uri(&self) -> &str {
        &self.file_uri
    }

    fn title(&self) -> &str {
        &self.file_name
    }
}

/// Live status reported by a media handle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct MediaStatus {
    /// Current playback position
    pub position: Duration,

    /// Total duration (zero while unknown)
    pub duration: Duration,

    /// Whether audio is currently audible
    pub is_playing: bool,

    /// Set on exactly one update, when playback reached the end
    pub did_just_finish: bool,
}

impl MediaStatus {
    pub fn position_millis(&self) -> u64 {
        self.position.as_millis() as u64
    }

    pub fn duration_millis(&self) -> u64 {
        self.duration.as_millis() as u64
    }
}

/// Session lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SessionState {
    /// No track loaded
    #[default]
    Idle,

    /// Track requested, handle not ready yet
    Loading,

    /// Handle exists; playing/paused is tracked through [`MediaStatus`]
    Ready,

    /// Last load failed; no handle is retained
    Error,
}

/// Everything a rendering surface shows about playback
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlaybackSnapshot {
    pub state: SessionState,
    pub current_index: Option<usize>,
    pub is_shuffle: bool,
    pub is_playing: bool,
    pub position_millis: u64,
    pub duration_millis: u64,
    /// Message of the last load failure while in [`SessionState::Error`]
    pub error: Option<String>,
}
