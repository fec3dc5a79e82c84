//! Interactive transport commands read from stdin

use std::str::FromStr;
use std::time::Duration;

/// One line of interactive input
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    PlayPause,
    Next,
    Previous,
    Shuffle,
    /// Jump to an absolute position in the current track
    Seek(Duration),
    /// Load the track at this 1-based list position
    Select(usize),
    /// Re-filter the list; empty clears the filter
    Search(String),
    List,
    Info,
    Help,
    Quit,
}

impl FromStr for Command {
    type Err = String;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let line = line.trim();

        if let Some(query) = line.strip_prefix('/') {
            return Ok(Command::Search(query.trim().to_string()));
        }

        let (word, rest) = match line.split_once(char::is_whitespace) {
            Some((word, rest)) => (word, rest.trim()),
            None => (line, ""),
        };

        let command = match word.to_ascii_lowercase().as_str() {
            "p" | "play" | "pause" => Command::PlayPause,
            "n" | "next" => Command::Next,
            "b" | "prev" | "previous" => Command::Previous,
            "s" | "shuffle" => Command::Shuffle,
            "l" | "ls" | "list" => Command::List,
            "i" | "info" => Command::Info,
            "h" | "help" | "?" => Command::Help,
            "q" | "quit" | "exit" => Command::Quit,
            "seek" => Command::Seek(parse_position(rest)?),
            number if number.chars().all(|c| c.is_ascii_digit()) && !number.is_empty() => {
                let position: usize = number
                    .parse()
                    .map_err(|_| format!("track number out of range: {}", number))?;
                if position == 0 {
                    return Err("track numbers start at 1".to_string());
                }
                Command::Select(position - 1)
            }
            "" => return Err("empty command".to_string()),
            other => return Err(format!("unknown command: {} (type h for help)", other)),
        };

        Ok(command)
    }
}

/// Accepts seconds (`90`, `12.5`) or `mm:ss`
fn parse_position(text: &str) -> Result<Duration, String> {
    let invalid = || format!("invalid position: {:?} (use seconds or mm:ss)", text);

    let seconds = match text.split_once(':') {
        Some((minutes, seconds)) => {
            let minutes: u64 = minutes.parse().map_err(|_| invalid())?;
            let seconds: f64 = seconds.parse().map_err(|_| invalid())?;
            if !(0.0..60.0).contains(&seconds) {
                return Err(invalid());
            }
            minutes as f64 * 60.0 + seconds
        }
        None => text.parse::<f64>().map_err(|_| invalid())?,
    };

    Duration::try_from_secs_f64(seconds).map_err(|_| invalid())
}

pub const HELP: &str = "\
Commands:
  p            play / pause
  n            next track
  b            previous track
  s            toggle shuffle
  seek <pos>   jump to position (seconds or mm:ss)
  <number>     play track by list number
  /<text>      filter list by name (/ alone clears)
  l            show list
  i            show status
  q            quit";
