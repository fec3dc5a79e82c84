//! Interactive playback loop
//!
//! Reads commands line by line and applies status updates from the loaded
//! track as they arrive, so auto-advance happens while waiting for input.

use crate::command::{Command, HELP};
use crate::error::Result;
use crate::render::{format_event, format_file_line, format_status};
use bucket_catalog::{CatalogSource, CatalogView, FileInfo};
use bucket_playback::{MediaBackend, PlaybackError, PlaybackSession};
use std::io::Write;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tracing::{debug, warn};

/// Catalog browser plus playback session driven by one input stream
pub struct Shell<S, B> {
    view: CatalogView<S>,
    session: PlaybackSession<B, FileInfo>,
}

impl<S: CatalogSource, B: MediaBackend> Shell<S, B> {
    pub fn new(view: CatalogView<S>, session: PlaybackSession<B, FileInfo>) -> Self {
        Self { view, session }
    }

    pub fn view(&self) -> &CatalogView<S> {
        &self.view
    }

    pub fn session(&self) -> &PlaybackSession<B, FileInfo> {
        &self.session
    }

    /// Fetch the listing for `query` and hand it to the session
    ///
    /// Returns the fetch error message, if any. The list is empty then.
    pub async fn search(&mut self, query: &str) -> Option<String> {
        self.view.set_query(query).await;
        self.session
            .set_tracks(self.view.files().as_slice().to_vec());
        self.view.error().map(str::to_string)
    }

    /// Load the track at `index` before taking input
    ///
    /// A failed load is reported by the next event flush.
    pub async fn start(&mut self, index: usize) {
        if let Err(e) = self.session.select_index(index).await {
            warn!(index, error = %e, "Could not start playback");
        }
    }

    /// Run until `q` or end of input, then stop playback
    pub async fn run<R, W>(&mut self, input: R, out: &mut W) -> Result<()>
    where
        R: AsyncBufRead + Unpin,
        W: Write,
    {
        let mut lines = input.lines();
        self.flush_events(out)?;

        loop {
            // Status first: a finished track advances before more input is read.
            // Only the receive races input; the update (and any auto-advance
            // load it starts) runs to completion in the branch.
            tokio::select! {
                biased;

                status = self.session.recv_status() => {
                    if let Err(e) = self.session.handle_status(status).await {
                        warn!(error = %e, "Auto-advance failed");
                    }
                }
                line = lines.next_line() => {
                    let Some(line) = line? else {
                        debug!("Input closed");
                        break;
                    };
                    if line.trim().is_empty() {
                        continue;
                    }
                    match line.parse::<Command>() {
                        Ok(Command::Quit) => break,
                        Ok(command) => self.apply(command, out).await?,
                        Err(message) => writeln!(out, "{}", message)?,
                    }
                }
            }

            self.flush_events(out)?;
        }

        self.session.stop().await;
        self.flush_events(out)?;
        Ok(())
    }

    async fn apply<W: Write>(&mut self, command: Command, out: &mut W) -> Result<()> {
        let outcome = match command {
            Command::PlayPause => self.session.toggle_play_pause().await,
            Command::Next => self.session.next().await,
            Command::Previous => self.session.previous().await,
            Command::Seek(position) => self.session.seek(position).await,
            Command::Select(index) => match self.session.select_index(index).await {
                Err(PlaybackError::IndexOutOfBounds(_)) => {
                    writeln!(out, "No track {}", index + 1)?;
                    Ok(())
                }
                other => other,
            },
            Command::Shuffle => {
                self.session.toggle_shuffle();
                Ok(())
            }
            Command::Search(query) => {
                if let Some(message) = self.search(&query).await {
                    writeln!(out, "Could not load list: {}", message)?;
                }
                self.print_list(out)?;
                Ok(())
            }
            Command::List => {
                self.print_list(out)?;
                Ok(())
            }
            Command::Info => {
                let snapshot = self.session.snapshot();
                writeln!(
                    out,
                    "{}",
                    format_status(&snapshot, self.session.current_track())
                )?;
                Ok(())
            }
            Command::Help => {
                writeln!(out, "{}", HELP)?;
                Ok(())
            }
            Command::Quit => Ok(()),
        };

        match outcome {
            // Already rendered from the session's error event
            Err(e @ PlaybackError::Load { .. }) => debug!(error = %e, "Command failed"),
            Err(e) => {
                warn!(error = %e, "Command failed");
                writeln!(out, "Playback error: {}", e)?;
            }
            Ok(()) => {}
        }
        Ok(())
    }

    fn print_list<W: Write>(&self, out: &mut W) -> Result<()> {
        let tracks = self.session.tracks();
        if tracks.is_empty() {
            writeln!(out, "No tracks")?;
            return Ok(());
        }

        let current = self.session.current_index();
        for (index, file) in tracks.iter().enumerate() {
            let marker = if Some(index) == current { '>' } else { ' ' };
            writeln!(out, "{}{}", marker, format_file_line(index, file))?;
        }
        Ok(())
    }

    fn flush_events<W: Write>(&mut self, out: &mut W) -> Result<()> {
        for event in self.session.drain_events() {
            if let Some(line) = format_event(&event, self.session.tracks()) {
                writeln!(out, "{}", line)?;
            }
        }
        Ok(())
    }
}
