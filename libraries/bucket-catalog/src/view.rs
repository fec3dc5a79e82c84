//! List-screen state: files, loading flag, error, and query handling.

use crate::client::CatalogSource;
use crate::error::CatalogError;
use crate::types::Catalog;
use tracing::{debug, error};

/// What an empty query does.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RefetchPolicy {
    /// Clearing the query always fetches the bucket again
    #[default]
    Always,
    /// Clearing the query shows the last full catalog if one was fetched
    Cached,
}

/// State holder for a list screen.
///
/// Mirrors what a rendering surface needs: the visible `files`, whether a
/// fetch is in flight, and the last error message. Filtering always runs
/// over the last *full* catalog, never over a previously filtered view.
pub struct CatalogView<S> {
    source: S,
    policy: RefetchPolicy,
    query: String,
    full: Option<Catalog>,
    files: Catalog,
    loading: bool,
    error: Option<String>,
    last_error: Option<CatalogError>,
}

impl<S: CatalogSource> CatalogView<S> {
    pub fn new(source: S) -> Self {
        Self::with_policy(source, RefetchPolicy::default())
    }

    pub fn with_policy(source: S, policy: RefetchPolicy) -> Self {
        Self {
            source,
            policy,
            query: String::new(),
            full: None,
            files: Catalog::default(),
            loading: false,
            error: None,
            last_error: None,
        }
    }

    /// Currently visible files.
    pub fn files(&self) -> &Catalog {
        &self.files
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    /// Message of the last failed fetch, cleared when a fetch starts.
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// The last failed fetch's error, for callers that branch on its kind.
    pub fn last_error(&self) -> Option<&CatalogError> {
        self.last_error.as_ref()
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    /// Apply a new search query.
    ///
    /// A non-empty query over an already fetched catalog filters locally.
    /// An empty query (or one issued before anything was fetched) fetches
    /// the bucket, unless [`RefetchPolicy::Cached`] has a catalog to reuse.
    pub async fn set_query(&mut self, query: impl Into<String>) {
        self.query = query.into();

        let reusable = match &self.full {
            Some(full) if !full.is_empty() => {
                if !self.query.is_empty() {
                    Some(full.filter(&self.query))
                } else if self.policy == RefetchPolicy::Cached {
                    Some(full.clone())
                } else {
                    None
                }
            }
            _ => None,
        };

        match reusable {
            Some(files) => {
                self.files = files;
                debug!(query = %self.query, matches = self.files.len(), "Filtered catalog");
            }
            None => self.refresh().await,
        }
    }

    /// Fetch the bucket again and re-apply the current query.
    pub async fn refresh(&mut self) {
        self.loading = true;
        self.error = None;
        self.last_error = None;

        match self.source.fetch_catalog().await {
            Ok(catalog) => {
                self.files = if self.query.is_empty() {
                    catalog.clone()
                } else {
                    catalog.filter(&self.query)
                };
                self.full = Some(catalog);
            }
            Err(err) => {
                error!(error = %err, "Error fetching all files");
                self.error = Some(err.to_string());
                self.last_error = Some(err);
                self.files = Catalog::default();
                self.full = None;
            }
        }

        self.loading = false;
    }
}
