//! Catalog data types.

use crate::uri::{file_name_of, object_uri};
use crate::DEFAULT_MAX_KEYS;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Configuration for listing a bucket.
#[derive(Debug, Clone)]
pub struct CatalogConfig {
    /// Base URL of the bucket (e.g., "https://bucket.s3.us-west-2.amazonaws.com")
    pub bucket_url: String,
    /// Entries requested per page (the endpoint caps this at 1000)
    pub max_keys: u32,
    /// Abort once this many pages were fetched and the listing is still
    /// truncated. `None` follows continuation tokens without bound.
    pub max_pages: Option<u32>,
    /// Per-request timeout
    pub request_timeout: Duration,
    /// Connection timeout
    pub connect_timeout: Duration,
}

impl CatalogConfig {
    /// Create a config for the given bucket with default limits.
    pub fn new(bucket_url: impl Into<String>) -> Self {
        Self {
            bucket_url: bucket_url.into(),
            max_keys: DEFAULT_MAX_KEYS,
            max_pages: None,
            request_timeout: Duration::from_secs(30),
            connect_timeout: Duration::from_secs(10),
        }
    }

    /// Cap the number of pages a single fetch may walk.
    pub fn with_max_pages(mut self, max_pages: u32) -> Self {
        self.max_pages = Some(max_pages);
        self
    }
}

/// One catalog entry.
///
/// `file_uri` and `file_name` are derived from `key`; build entries through
/// [`FileInfo::from_object`] to keep them consistent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileInfo {
    /// Storage object identifier (primary key)
    pub key: String,
    /// Last-modified timestamp as reported by the bucket (not parsed)
    pub last_modified: Option<String>,
    /// Size in bytes, if the listing reported a parsable value
    pub size: Option<u64>,
    /// Fully-qualified, percent-encoded retrieval URL
    pub file_uri: String,
    /// Substring of `key` after the last `/`
    pub file_name: String,
}

impl FileInfo {
    pub fn from_object(
        bucket_url: &str,
        key: impl Into<String>,
        last_modified: Option<String>,
        size: Option<u64>,
    ) -> Self {
        let key = key.into();
        Self {
            file_uri: object_uri(bucket_url, &key),
            file_name: file_name_of(&key).to_string(),
            key,
            last_modified,
            size,
        }
    }
}

/// Decoded listing page, already restricted to audio objects.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListingPage {
    pub entries: Vec<FileInfo>,
    /// Token for the following page (`None` when absent or empty)
    pub next_continuation_token: Option<String>,
    /// Whether the endpoint has more entries after this page
    pub is_truncated: bool,
}

/// Ordered catalog in server listing order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Catalog {
    files: Vec<FileInfo>,
}

impl Catalog {
    pub fn new(files: Vec<FileInfo>) -> Self {
        Self { files }
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, FileInfo> {
        self.files.iter()
    }

    pub fn get(&self, index: usize) -> Option<&FileInfo> {
        self.files.get(index)
    }

    pub fn as_slice(&self) -> &[FileInfo] {
        &self.files
    }

    /// Index of the entry with the given key.
    pub fn position(&self, key: &str) -> Option<usize> {
        self.files.iter().position(|file| file.key == key)
    }

    /// Case-insensitive substring search over file names.
    ///
    /// Keeps listing order. An empty query matches everything, but callers
    /// driving a list screen should go through
    /// [`CatalogView::set_query`](crate::CatalogView::set_query), which
    /// re-fetches on an empty query instead.
    pub fn filter(&self, query: &str) -> Catalog {
        let needle = query.to_lowercase();
        Catalog {
            files: self
                .files
                .iter()
                .filter(|file| file.file_name.to_lowercase().contains(&needle))
                .cloned()
                .collect(),
        }
    }

    pub fn into_inner(self) -> Vec<FileInfo> {
        self.files
    }
}

impl From<Vec<FileInfo>> for Catalog {
    fn from(files: Vec<FileInfo>) -> Self {
        Self::new(files)
    }
}

impl<'a> IntoIterator for &'a Catalog {
    type Item = &'a FileInfo;
    type IntoIter = std::slice::Iter<'a, FileInfo>;

    fn into_iter(self) -> Self::IntoIter {
        self.files.iter()
    }
}

impl IntoIterator for Catalog {
    type Item = FileInfo;
    type IntoIter = std::vec::IntoIter<FileInfo>;

    fn into_iter(self) -> Self::IntoIter {
        self.files.into_iter()
    }
}
