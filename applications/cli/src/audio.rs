//! Speaker output through rodio
//!
//! Tracks are downloaded whole, decoded in memory and appended to a fresh
//! [`Sink`]. A watcher task reports the sink's position to the session and
//! flags the end of the track exactly once.

use crate::error::{AppError, Result};
use async_trait::async_trait;
use bucket_playback::{
    status_channel, LoadedMedia, MediaBackend, MediaHandle, MediaStatus, PlaybackError,
    StatusPublisher,
};
use rodio::{Decoder, OutputStream, OutputStreamHandle, Sink, Source};
use std::io::Cursor;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tracing::{debug, info};

pub struct RodioBackend {
    http: reqwest::Client,
    output: OutputStreamHandle,
    poll_interval: Duration,
}

impl RodioBackend {
    /// Open the default output device
    ///
    /// The returned stream must outlive the backend; audio stops when it is
    /// dropped.
    pub fn open(poll_interval: Duration) -> Result<(OutputStream, Self)> {
        let (stream, output) =
            OutputStream::try_default().map_err(|e| AppError::Audio(e.to_string()))?;

        let http = reqwest::Client::builder()
            .user_agent(format!("BucketPlayer/{}", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| AppError::Audio(e.to_string()))?;

        Ok((
            stream,
            Self {
                http,
                output,
                poll_interval,
            },
        ))
    }
}

#[async_trait]
impl MediaBackend for RodioBackend {
    async fn load(&self, uri: &str, autoplay: bool) -> bucket_playback::Result<LoadedMedia> {
        let load_error = |message: String| PlaybackError::Load {
            uri: uri.to_string(),
            message,
        };

        debug!(uri = %uri, "Downloading track");
        let response = self
            .http
            .get(uri)
            .send()
            .await
            .map_err(|e| load_error(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(load_error(format!("HTTP {}", status)));
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| load_error(e.to_string()))?;

        let decoder =
            Decoder::new(Cursor::new(body.to_vec())).map_err(|e| load_error(e.to_string()))?;
        let duration = decoder.total_duration().unwrap_or_default();

        let sink = Sink::try_new(&self.output).map_err(|e| load_error(e.to_string()))?;
        if !autoplay {
            sink.pause();
        }
        sink.append(decoder);
        let sink = Arc::new(sink);

        info!(uri = %uri, duration_ms = duration.as_millis() as u64, "Track loaded");

        let (publisher, status) = status_channel();
        let watcher = tokio::spawn(watch_sink(
            Arc::clone(&sink),
            duration,
            publisher,
            self.poll_interval,
        ));

        Ok(LoadedMedia {
            handle: Box::new(RodioHandle {
                sink,
                duration,
                watcher,
            }),
            status,
        })
    }
}

struct RodioHandle {
    sink: Arc<Sink>,
    duration: Duration,
    watcher: JoinHandle<()>,
}

#[async_trait]
impl MediaHandle for RodioHandle {
    async fn play(&mut self) -> bucket_playback::Result<()> {
        self.sink.play();
        Ok(())
    }

    async fn pause(&mut self) -> bucket_playback::Result<()> {
        self.sink.pause();
        Ok(())
    }

    async fn seek(&mut self, position: Duration) -> bucket_playback::Result<()> {
        self.sink
            .try_seek(position)
            .map_err(|e| PlaybackError::Media(e.to_string()))
    }

    async fn unload(&mut self) -> bucket_playback::Result<()> {
        self.watcher.abort();
        self.sink.stop();
        Ok(())
    }

    fn status(&self) -> MediaStatus {
        sink_status(&self.sink, self.duration)
    }
}

impl Drop for RodioHandle {
    fn drop(&mut self) {
        self.watcher.abort();
    }
}

fn sink_status(sink: &Sink, duration: Duration) -> MediaStatus {
    MediaStatus {
        position: sink.get_pos(),
        duration,
        is_playing: !sink.is_paused() && !sink.empty(),
        did_just_finish: false,
    }
}

async fn watch_sink(
    sink: Arc<Sink>,
    duration: Duration,
    publisher: StatusPublisher,
    interval: Duration,
) {
    let mut ticker = tokio::time::interval(interval);

    loop {
        ticker.tick().await;

        let mut status = sink_status(&sink, duration);
        // An empty sink has played everything appended to it
        status.did_just_finish = sink.empty();

        if !publisher.publish(status) || status.did_just_finish {
            break;
        }
    }
}
