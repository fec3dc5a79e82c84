//! Bucket Player - Catalog
//!
//! Lists the audio files exposed by a public object-storage bucket.
//!
//! # Features
//!
//! - **Pagination**: follows `ListObjectsV2` continuation tokens until the
//!   listing is no longer truncated
//! - **Normalization**: every object becomes a [`FileInfo`] with a
//!   percent-encoded retrieval URI and a display name derived from its key
//! - **Filtering**: only `.mp3` objects are kept; client-side substring
//!   search runs over the fetched set
//! - **List state**: [`CatalogView`] holds files/loading/error for a
//!   rendering surface and decides when a query change re-fetches
//!
//! # Example
//!
//! ```ignore
//! use bucket_catalog::{CatalogClient, CatalogConfig};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = CatalogConfig::new("https://my-bucket.s3.us-west-2.amazonaws.com");
//!     let client = CatalogClient::new(config)?;
//!
//!     let catalog = client.fetch_catalog().await?;
//!     println!("Found {} tracks", catalog.len());
//!
//!     for file in catalog.filter("live").iter() {
//!         println!("{} -> {}", file.file_name, file.file_uri);
//!     }
//!
//!     Ok(())
//! }
//! ```

mod client;
mod error;
mod listing;
mod types;
mod uri;
mod view;

// Re-export main types
pub use client::{CatalogClient, CatalogSource};
pub use error::{CatalogError, ErrorKind, Result};
pub use listing::parse_listing;
pub use types::{Catalog, CatalogConfig, FileInfo, ListingPage};
pub use uri::{decode_object_key, file_name_of, object_uri};
pub use view::{CatalogView, RefetchPolicy};

/// The only object extension the catalog keeps (case-sensitive).
pub const AUDIO_EXTENSION: &str = ".mp3";

/// Page size requested from the listing endpoint.
pub const DEFAULT_MAX_KEYS: u32 = 1000;
