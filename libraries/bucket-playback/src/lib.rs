//! Bucket Player - Playback Session
//!
//! Platform-agnostic playback session for Bucket Player.
//!
//! This crate provides:
//! - Track selection over an owned, ordered track list
//! - Transport control (play/pause, seek, next, previous)
//! - Shuffle (uniform pick over the list) and auto-advance on track end
//! - A single-handle lifecycle: the previous handle is always torn down
//!   before the next one is created
//! - A status feed and an event queue for the rendering surface
//!
//! # Architecture
//!
//! `bucket-playback` does not decode or output audio. The platform provides
//! a [`MediaBackend`] that loads a URI into a [`MediaHandle`] and publishes
//! [`MediaStatus`] updates through a [`StatusSubscription`].
//!
//! # Example: Platform Integration
//!
//! ```rust,no_run
//! use async_trait::async_trait;
//! use bucket_playback::{
//!     status_channel, LoadedMedia, MediaBackend, MediaHandle, MediaStatus, PlaybackSession,
//!     Result,
//! };
//! use std::time::Duration;
//!
//! struct MyHandle;
//!
//! #[async_trait]
//! impl MediaHandle for MyHandle {
//!     async fn play(&mut self) -> Result<()> { Ok(()) }
//!     async fn pause(&mut self) -> Result<()> { Ok(()) }
//!     async fn seek(&mut self, _position: Duration) -> Result<()> { Ok(()) }
//!     async fn unload(&mut self) -> Result<()> { Ok(()) }
//!     fn status(&self) -> MediaStatus { MediaStatus::default() }
//! }
//!
//! struct MyBackend;
//!
//! #[async_trait]
//! impl MediaBackend for MyBackend {
//!     async fn load(&self, _uri: &str, _autoplay: bool) -> Result<LoadedMedia> {
//!         // Keep the publisher in the platform's player to push updates
//!         let (_publisher, status) = status_channel();
//!         Ok(LoadedMedia { handle: Box::new(MyHandle), status })
//!     }
//! }
//!
//! # async fn run(files: Vec<bucket_catalog::FileInfo>) -> Result<()> {
//! let mut session = PlaybackSession::new(MyBackend);
//! session.set_tracks(files);
//! session.select_index(0).await?;
//! session.toggle_play_pause().await?;
//! session.next().await?;
//! # Ok(())
//! # }
//! ```

mod error;
mod events;
mod media;
mod session;
mod shuffle;
pub mod types;

// Public exports
pub use error::{PlaybackError, Result};
pub use events::SessionEvent;
pub use media::{
    status_channel, LoadedMedia, MediaBackend, MediaHandle, StatusPublisher, StatusSubscription,
};
pub use session::PlaybackSession;
pub use shuffle::{next_index, previous_index};
pub use types::{MediaStatus, PlaybackSnapshot, SessionState, Track};
