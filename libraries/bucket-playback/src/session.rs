//! Playback session - core orchestration
//!
//! Owns the track list, the selection, the shuffle flag and the single live
//! media handle, and turns transport commands and status updates into
//! handle operations.

use crate::{
    error::{PlaybackError, Result},
    events::SessionEvent,
    media::{LoadedMedia, MediaBackend, MediaHandle, StatusSubscription},
    shuffle::{next_index, previous_index},
    types::{MediaStatus, PlaybackSnapshot, SessionState, Track},
};
use rand::rngs::StdRng;
use rand::{RngCore, SeedableRng};
use std::time::Duration;
use tracing::{debug, info, warn};

/// The handle currently bound to the session
struct ActiveMedia {
    handle: Box<dyn MediaHandle>,
    /// `None` once the backend closed the feed
    status: Option<StatusSubscription>,
}

/// Central playback session
///
/// At most one media handle is alive at any time: every selection tears the
/// previous handle down (unsubscribe, then unload) before asking the backend
/// for the next one. Commands that need a handle are silent no-ops in any
/// state other than [`SessionState::Ready`].
///
/// All methods take `&mut self`, so a selection cannot interleave with
/// another one; a rapid second selection simply runs after the first.
pub struct PlaybackSession<B, T> {
    backend: B,

    // List and selection
    tracks: Vec<T>,
    current_index: Option<usize>,
    current: Option<T>,
    shuffle: bool,

    // Lifecycle
    state: SessionState,
    status: MediaStatus,
    active: Option<ActiveMedia>,
    last_error: Option<String>,

    // Event queue for UI synchronization
    pending_events: Vec<SessionEvent>,

    rng: Box<dyn RngCore + Send>,
}

impl<B: MediaBackend, T: Track> PlaybackSession<B, T> {
    /// Create a session with an entropy-seeded shuffle generator
    pub fn new(backend: B) -> Self {
        Self::with_rng(backend, StdRng::from_entropy())
    }

    /// Create a session with a caller-provided shuffle generator
    pub fn with_rng(backend: B, rng: impl RngCore + Send + 'static) -> Self {
        Self {
            backend,
            tracks: Vec::new(),
            current_index: None,
            current: None,
            shuffle: false,
            state: SessionState::Idle,
            status: MediaStatus::default(),
            active: None,
            last_error: None,
            pending_events: Vec::new(),
            rng: Box::new(rng),
        }
    }

    // ===== List =====

    /// Replace the track list
    ///
    /// The selection follows the loaded track by key. If the track is no
    /// longer listed the selection is cleared, but the loaded track keeps
    /// playing.
    pub fn set_tracks(&mut self, tracks: Vec<T>) {
        self.tracks = tracks;
        self.current_index = self
            .current
            .as_ref()
            .and_then(|current| self.tracks.iter().position(|t| t.key() == current.key()));
        debug!(
            tracks = self.tracks.len(),
            current_index = ?self.current_index,
            "Track list replaced"
        );
    }

    pub fn tracks(&self) -> &[T] {
        &self.tracks
    }

    // ===== Selection =====

    /// Load and autoplay the listed track with the same key as `track`
    pub async fn select_track(&mut self, track: &T) -> Result<()> {
        let index = self
            .tracks
            .iter()
            .position(|t| t.key() == track.key())
            .ok_or_else(|| PlaybackError::TrackNotFound(track.key().to_string()))?;
        self.load_index(index).await
    }

    /// Load and autoplay the track at `index`
    pub async fn select_index(&mut self, index: usize) -> Result<()> {
        if index >= self.tracks.len() {
            return Err(PlaybackError::IndexOutOfBounds(index));
        }
        self.load_index(index).await
    }

    /// Advance to the next track
    ///
    /// In order: no-op on the last track. Shuffle: uniform pick over the
    /// whole list. No-op while nothing is selected.
    pub async fn next(&mut self) -> Result<()> {
        match next_index(
            self.current_index,
            self.tracks.len(),
            self.shuffle,
            &mut self.rng,
        ) {
            Some(index) => self.load_index(index).await,
            None => {
                debug!(current_index = ?self.current_index, "Next ignored");
                Ok(())
            }
        }
    }

    /// Go back one track; no-op on the first track
    pub async fn previous(&mut self) -> Result<()> {
        match previous_index(self.current_index) {
            Some(index) => self.load_index(index).await,
            None => {
                debug!(current_index = ?self.current_index, "Previous ignored");
                Ok(())
            }
        }
    }

    // ===== Transport =====

    /// Pause if playing, play if paused; no-op unless ready
    pub async fn toggle_play_pause(&mut self) -> Result<()> {
        if self.state != SessionState::Ready {
            debug!(state = ?self.state, "Play/pause ignored");
            return Ok(());
        }
        let Some(active) = self.active.as_mut() else {
            return Ok(());
        };

        if self.status.is_playing {
            active.handle.pause().await?;
            self.status.is_playing = false;
        } else {
            active.handle.play().await?;
            self.status.is_playing = true;
        }

        self.push_position_event();
        Ok(())
    }

    /// Seek the loaded track; no-op unless ready
    pub async fn seek(&mut self, position: Duration) -> Result<()> {
        if self.state != SessionState::Ready {
            debug!(state = ?self.state, "Seek ignored");
            return Ok(());
        }
        let Some(active) = self.active.as_mut() else {
            return Ok(());
        };

        active.handle.seek(position).await?;
        self.status.position = position;
        self.push_position_event();
        Ok(())
    }

    /// Flip shuffle on/off
    pub fn toggle_shuffle(&mut self) {
        self.set_shuffle(!self.shuffle);
    }

    pub fn set_shuffle(&mut self, enabled: bool) {
        if self.shuffle != enabled {
            self.shuffle = enabled;
            self.pending_events
                .push(SessionEvent::ShuffleChanged { enabled });
        }
    }

    /// Tear down the loaded track and return to idle
    ///
    /// The selection is kept so `next`/`previous` continue from it.
    pub async fn stop(&mut self) {
        self.teardown().await;
        self.set_state(SessionState::Idle);
    }

    // ===== Status feed =====

    /// Apply one status update from the loaded handle
    ///
    /// A finished update advances exactly like [`next`](Self::next).
    /// Updates arriving while not ready are dropped.
    pub async fn handle_status(&mut self, status: MediaStatus) -> Result<()> {
        if self.state != SessionState::Ready {
            debug!(state = ?self.state, "Status update dropped");
            return Ok(());
        }

        self.status = status;
        self.push_position_event();

        if status.did_just_finish {
            if let Some(track) = &self.current {
                info!(key = %track.key(), "Track finished");
                self.pending_events.push(SessionEvent::TrackFinished {
                    key: track.key().to_string(),
                });
            }
            self.next().await?;
        }

        Ok(())
    }

    /// Apply every update already queued by the loaded handle
    ///
    /// Returns how many updates were applied. Updates from a handle that
    /// was replaced midway (auto-advance) are never delivered.
    pub async fn poll_status(&mut self) -> Result<usize> {
        let mut applied = 0;
        while let Some(status) = self
            .active
            .as_mut()
            .and_then(|active| active.status.as_mut())
            .and_then(|subscription| subscription.try_recv())
        {
            self.handle_status(status).await?;
            applied += 1;
        }
        Ok(applied)
    }

    /// Wait for the next update from the loaded handle without applying it
    ///
    /// Cancel-safe: only the channel receive is awaited, so this can race
    /// other branches in `tokio::select!`. Pass the result to
    /// [`handle_status`](Self::handle_status) outside the race. Never
    /// resolves while nothing is loaded.
    pub async fn recv_status(&mut self) -> MediaStatus {
        loop {
            let received = match self
                .active
                .as_mut()
                .and_then(|active| active.status.as_mut())
            {
                Some(subscription) => subscription.recv().await,
                None => std::future::pending().await,
            };

            match received {
                Some(status) => return status,
                None => {
                    debug!("Status feed closed by backend");
                    if let Some(active) = self.active.as_mut() {
                        active.status = None;
                    }
                }
            }
        }
    }

    /// Wait for the next update from the loaded handle and apply it
    ///
    /// Not cancel-safe: a finished update may be midway through loading the
    /// next track. Use [`recv_status`](Self::recv_status) in `select!` loops.
    pub async fn next_status(&mut self) -> Result<MediaStatus> {
        let status = self.recv_status().await;
        self.handle_status(status).await?;
        Ok(status)
    }

    // ===== Accessors =====

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn current_index(&self) -> Option<usize> {
        self.current_index
    }

    /// The loaded (or last attempted) track
    pub fn current_track(&self) -> Option<&T> {
        self.current.as_ref()
    }

    pub fn is_shuffle(&self) -> bool {
        self.shuffle
    }

    pub fn status(&self) -> MediaStatus {
        self.status
    }

    /// Number of handles the session holds (0 or 1)
    pub fn live_handles(&self) -> usize {
        usize::from(self.active.is_some())
    }

    pub fn snapshot(&self) -> PlaybackSnapshot {
        PlaybackSnapshot {
            state: self.state,
            current_index: self.current_index,
            is_shuffle: self.shuffle,
            is_playing: self.status.is_playing,
            position_millis: self.status.position_millis(),
            duration_millis: self.status.duration_millis(),
            error: self.last_error.clone(),
        }
    }

    /// Take all queued events
    pub fn drain_events(&mut self) -> Vec<SessionEvent> {
        std::mem::take(&mut self.pending_events)
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    // ===== Internals =====

    async fn load_index(&mut self, index: usize) -> Result<()> {
        let track = self.tracks[index].clone();
        let previous_key = self.current.as_ref().map(|t| t.key().to_string());

        self.teardown().await;

        self.current_index = Some(index);
        self.current = Some(track.clone());
        self.last_error = None;
        self.set_state(SessionState::Loading);
        self.pending_events.push(SessionEvent::TrackChanged {
            index,
            key: track.key().to_string(),
            previous_key,
        });

        info!(index, key = %track.key(), "Loading track");

        match self.backend.load(track.uri(), true).await {
            Ok(LoadedMedia { handle, status }) => {
                self.status = handle.status();
                self.active = Some(ActiveMedia {
                    handle,
                    status: Some(status),
                });
                self.set_state(SessionState::Ready);
                Ok(())
            }
            Err(err) => {
                warn!(uri = %track.uri(), error = %err, "Track failed to load");
                let message = err.to_string();
                self.last_error = Some(message.clone());
                self.pending_events.push(SessionEvent::Error { message });
                self.set_state(SessionState::Error);
                Err(err)
            }
        }
    }

    /// Release the live handle, if any. Failures are logged, never returned.
    async fn teardown(&mut self) {
        if let Some(mut active) = self.active.take() {
            if let Some(subscription) = active.status.take() {
                subscription.unsubscribe();
            }
            if let Err(err) = active.handle.unload().await {
                warn!(error = %err, "Error unloading previous track");
            }
        }
        self.status = MediaStatus::default();
    }

    fn set_state(&mut self, state: SessionState) {
        if self.state != state {
            self.state = state;
            self.pending_events.push(SessionEvent::StateChanged { state });
        }
    }

    /// Ticks coalesce: a position update replaces one still at the tail of
    /// the queue, so an undrained queue does not grow with every tick.
    fn push_position_event(&mut self) {
        let event = SessionEvent::PositionUpdate {
            position_ms: self.status.position_millis(),
            duration_ms: self.status.duration_millis(),
            is_playing: self.status.is_playing,
        };
        if let Some(last @ SessionEvent::PositionUpdate { .. }) =
            self.pending_events.last_mut()
        {
            *last = event;
            return;
        }
        self.pending_events.push(event);
    }
}
