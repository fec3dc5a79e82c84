//! Plain-text rendering of catalog entries and playback state

use bucket_catalog::FileInfo;
use bucket_playback::{PlaybackSnapshot, SessionEvent, SessionState, Track};

/// `1234567` -> `1.2 MB`
pub fn format_size(bytes: u64) -> String {
    const UNITS: [&str; 4] = ["B", "KB", "MB", "GB"];

    let mut value = bytes as f64;
    let mut unit = 0;
    while value >= 1000.0 && unit < UNITS.len() - 1 {
        value /= 1000.0;
        unit += 1;
    }

    if unit == 0 {
        format!("{} B", bytes)
    } else {
        format!("{:.1} {}", value, UNITS[unit])
    }
}

/// Milliseconds as `m:ss`
pub fn format_clock(millis: u64) -> String {
    let seconds = millis / 1000;
    format!("{}:{:02}", seconds / 60, seconds % 60)
}

/// One catalog row, numbered from 1
pub fn format_file_line(index: usize, file: &FileInfo) -> String {
    let size = file
        .size
        .map(format_size)
        .unwrap_or_else(|| "?".to_string());
    format!("{:>4}  {}  ({})", index + 1, file.file_name, size)
}

pub fn format_status<T: Track>(snapshot: &PlaybackSnapshot, track: Option<&T>) -> String {
    let state = match snapshot.state {
        SessionState::Idle => "stopped",
        SessionState::Loading => "loading",
        SessionState::Ready if snapshot.is_playing => "playing",
        SessionState::Ready => "paused",
        SessionState::Error => "error",
    };

    let mut line = format!("[{}]", state);
    if let Some(track) = track {
        line.push(' ');
        line.push_str(track.title());
    }
    line.push_str(&format!(
        "  {} / {}",
        format_clock(snapshot.position_millis),
        format_clock(snapshot.duration_millis)
    ));
    if snapshot.is_shuffle {
        line.push_str("  shuffle");
    }
    if let Some(error) = &snapshot.error {
        line.push_str(&format!("  ({})", error));
    }
    line
}

/// Message for an event, if it is worth showing
///
/// Position ticks are not rendered; use the `i` command for those.
pub fn format_event<T: Track>(event: &SessionEvent, tracks: &[T]) -> Option<String> {
    match event {
        SessionEvent::TrackChanged { index, key, .. } => {
            let title = tracks
                .get(*index)
                .filter(|track| track.key() == key)
                .map(|track| track.title())
                .unwrap_or(key.as_str());
            Some(format!("Now playing: {}", title))
        }
        SessionEvent::TrackFinished { key } => Some(format!("Finished: {}", key)),
        SessionEvent::ShuffleChanged { enabled } => Some(format!(
            "Shuffle {}",
            if *enabled { "on" } else { "off" }
        )),
        SessionEvent::Error { message } => Some(format!("Playback error: {}", message)),
        SessionEvent::StateChanged { .. } | SessionEvent::PositionUpdate { .. } => None,
    }
}
