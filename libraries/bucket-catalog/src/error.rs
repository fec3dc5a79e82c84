//! Error types for the catalog fetcher.

use thiserror::Error;

/// Errors that can occur while listing a bucket.
#[derive(Error, Debug)]
pub enum CatalogError {
    /// Transport failure (connect, timeout, body read)
    #[error("Network request failed: {0}")]
    Network(#[from] reqwest::Error),

    /// Listing endpoint answered with a non-success status
    #[error("Failed to fetch files ({status}): {message}")]
    Status { status: u16, message: String },

    /// Listing document could not be decoded
    #[error("Failed to parse listing: {0}")]
    Parse(String),

    /// Invalid bucket URL
    #[error("Invalid bucket URL: {0}")]
    InvalidUrl(String),

    /// Listing was still truncated after the configured page cap
    #[error("Listing still truncated after {pages} pages")]
    PageLimitExceeded { pages: u32 },
}

/// Coarse classification surfaced to the rendering surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Non-success HTTP status or transport failure on any page
    Network,
    /// Malformed listing document
    Parse,
    /// Client misconfiguration or runaway pagination
    Config,
}

impl CatalogError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            CatalogError::Network(_) | CatalogError::Status { .. } => ErrorKind::Network,
            CatalogError::Parse(_) => ErrorKind::Parse,
            CatalogError::InvalidUrl(_) | CatalogError::PageLimitExceeded { .. } => {
                ErrorKind::Config
            }
        }
    }
}

impl From<quick_xml::DeError> for CatalogError {
    fn from(err: quick_xml::DeError) -> Self {
        CatalogError::Parse(err.to_string())
    }
}

impl From<quick_xml::Error> for CatalogError {
    fn from(err: quick_xml::Error) -> Self {
        CatalogError::Parse(err.to_string())
    }
}

/// Result type for catalog operations.
pub type Result<T> = std::result::Result<T, CatalogError>;
