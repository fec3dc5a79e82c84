/// Application error types
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error(transparent)]
    Catalog(#[from] bucket_catalog::CatalogError),

    #[error(transparent)]
    Playback(#[from] bucket_playback::PlaybackError),

    #[error("Audio output error: {0}")]
    Audio(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, AppError>;
