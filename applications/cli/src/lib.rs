//! Bucket Player - terminal front-end
//!
//! Lists the audio files of a public bucket and plays them with
//! next/previous/shuffle and seek controls read from stdin.

pub mod command;
pub mod config;
pub mod error;
pub mod render;
pub mod shell;

#[cfg(feature = "audio-output")]
pub mod audio;

pub use error::{AppError, Result};
