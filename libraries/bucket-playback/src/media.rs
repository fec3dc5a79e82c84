//! Platform-agnostic media subsystem traits
//!
//! The session never decodes audio itself. A platform provides a
//! [`MediaBackend`] (rodio on desktop, the host media API on mobile, a
//! scripted fake in tests) that turns a URI into a [`MediaHandle`].

use crate::error::Result;
use crate::types::MediaStatus;
use async_trait::async_trait;
use std::time::Duration;
use tokio::sync::mpsc;

/// Creates media handles
#[async_trait]
pub trait MediaBackend: Send + Sync {
    /// Create a handle bound to `uri`
    ///
    /// With `autoplay`, playback starts as soon as the handle is ready.
    ///
    /// # Returns
    /// * `Ok(LoadedMedia)` - Handle plus its status subscription
    /// * `Err(PlaybackError::Load)` - Handle could not be created
    async fn load(&self, uri: &str, autoplay: bool) -> Result<LoadedMedia>;
}

/// One loaded track in the media subsystem
#[async_trait]
pub trait MediaHandle: Send {
    /// Resume or start playback
    async fn play(&mut self) -> Result<()>;

    /// Pause playback, keeping the position
    async fn pause(&mut self) -> Result<()>;

    /// Jump to `position`; bounds are the handle's business
    async fn seek(&mut self, position: Duration) -> Result<()>;

    /// Release the underlying resources
    ///
    /// The session calls this exactly once and drops the handle afterwards,
    /// whatever the outcome.
    async fn unload(&mut self) -> Result<()>;

    /// Last known status
    fn status(&self) -> MediaStatus;
}

/// Result of [`MediaBackend::load`]
pub struct LoadedMedia {
    pub handle: Box<dyn MediaHandle>,
    pub status: StatusSubscription,
}

/// Create a connected publisher/subscription pair for a new handle.
pub fn status_channel() -> (StatusPublisher, StatusSubscription) {
    let (tx, rx) = mpsc::unbounded_channel();
    (StatusPublisher { tx }, StatusSubscription { rx })
}

/// Backend side of a status feed
#[derive(Debug, Clone)]
pub struct StatusPublisher {
    tx: mpsc::UnboundedSender<MediaStatus>,
}

impl StatusPublisher {
    /// Push an update. Returns `false` once the session unsubscribed.
    pub fn publish(&self, status: MediaStatus) -> bool {
        self.tx.send(status).is_ok()
    }

    /// Whether the session side is gone
    pub fn is_closed(&self) -> bool {
        self.tx.is_closed()
    }
}

/// Session side of a status feed
#[derive(Debug)]
pub struct StatusSubscription {
    rx: mpsc::UnboundedReceiver<MediaStatus>,
}

impl StatusSubscription {
    /// Wait for the next update; `None` once the publisher is gone.
    pub async fn recv(&mut self) -> Option<MediaStatus> {
        self.rx.recv().await
    }

    /// Take an already queued update without waiting.
    pub fn try_recv(&mut self) -> Option<MediaStatus> {
        self.rx.try_recv().ok()
    }

    /// Stop receiving. Updates queued but not yet read are discarded.
    pub fn unsubscribe(mut self) {
        self.rx.close();
    }
}
