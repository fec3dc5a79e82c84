//! Bucket listing client.

use crate::error::{CatalogError, Result};
use crate::listing::parse_listing;
use crate::types::{Catalog, CatalogConfig, ListingPage};
use async_trait::async_trait;
use reqwest::Client;
use tracing::{debug, info, warn};

/// Anything that can produce a full catalog.
///
/// [`CatalogView`](crate::CatalogView) is generic over this so list state
/// can be driven without a live bucket.
#[async_trait]
pub trait CatalogSource: Send + Sync {
    async fn fetch_catalog(&self) -> Result<Catalog>;
}

/// Client for a public bucket's `ListObjectsV2` endpoint.
///
/// # Example
///
/// ```ignore
/// use bucket_catalog::{CatalogClient, CatalogConfig};
///
/// let client = CatalogClient::new(CatalogConfig::new("https://bucket.example.com"))?;
/// let catalog = client.fetch_catalog().await?;
/// ```
#[derive(Debug, Clone)]
pub struct CatalogClient {
    http: Client,
    config: CatalogConfig,
}

impl CatalogClient {
    /// Create a new client with the given configuration.
    pub fn new(config: CatalogConfig) -> Result<Self> {
        if config.bucket_url.is_empty() {
            return Err(CatalogError::InvalidUrl("URL cannot be empty".into()));
        }

        // Parse and normalize URL
        let bucket_url = config.bucket_url.trim_end_matches('/').to_string();
        if !bucket_url.starts_with("http://") && !bucket_url.starts_with("https://") {
            return Err(CatalogError::InvalidUrl(
                "URL must start with http:// or https://".into(),
            ));
        }
        url::Url::parse(&bucket_url).map_err(|e| CatalogError::InvalidUrl(e.to_string()))?;

        if config.max_keys == 0 {
            return Err(CatalogError::InvalidUrl("max-keys must be at least 1".into()));
        }

        let http = Client::builder()
            .timeout(config.request_timeout)
            .connect_timeout(config.connect_timeout)
            .user_agent(format!("BucketPlayer/{}", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            http,
            config: CatalogConfig {
                bucket_url,
                ..config
            },
        })
    }

    /// Get the normalized bucket URL.
    pub fn bucket_url(&self) -> &str {
        &self.config.bucket_url
    }

    pub fn config(&self) -> &CatalogConfig {
        &self.config
    }

    /// Fetch a single listing page.
    ///
    /// `continuation_token` is the previous page's `NextContinuationToken`,
    /// or `None` for the first page.
    pub async fn fetch_page(&self, continuation_token: Option<&str>) -> Result<ListingPage> {
        let max_keys = self.config.max_keys.to_string();
        let mut params = vec![("list-type", "2"), ("max-keys", max_keys.as_str())];
        if let Some(token) = continuation_token {
            params.push(("continuation-token", token));
        }

        debug!(
            url = %self.config.bucket_url,
            continuation = continuation_token.is_some(),
            "Fetching listing page"
        );

        let response = self
            .http
            .get(&self.config.bucket_url)
            .query(&params)
            .send()
            .await?;

        let status = response.status();

        if status.is_success() {
            let body = response.text().await?;
            let page = parse_listing(&body, &self.config.bucket_url)?;

            debug!(
                entries = page.entries.len(),
                truncated = page.is_truncated,
                "Fetched listing page"
            );

            Ok(page)
        } else {
            let message = match status.canonical_reason() {
                Some(reason) => reason.to_string(),
                None => response.text().await.unwrap_or_default(),
            };
            Err(CatalogError::Status {
                status: status.as_u16(),
                message,
            })
        }
    }

    /// Fetch the whole catalog, following continuation tokens.
    ///
    /// Pages are requested strictly one after another. Any failure aborts the
    /// fetch and nothing fetched so far is returned.
    pub async fn fetch_catalog(&self) -> Result<Catalog> {
        let mut files = Vec::new();
        let mut continuation_token: Option<String> = None;
        let mut has_more = true;
        let mut pages: u32 = 0;

        while has_more {
            if let Some(max_pages) = self.config.max_pages {
                if pages >= max_pages {
                    warn!(pages, "Listing still truncated, giving up");
                    return Err(CatalogError::PageLimitExceeded { pages });
                }
            }

            let page = self
                .fetch_page(continuation_token.as_deref())
                .await
                .map_err(|error| {
                    warn!(%error, page = pages + 1, "Error fetching files");
                    error
                })?;
            pages += 1;

            files.extend(page.entries);
            continuation_token = page.next_continuation_token;
            has_more = page.is_truncated;

            if has_more && continuation_token.is_none() {
                // The endpoint would hand back page one again.
                return Err(CatalogError::Parse(
                    "truncated listing without NextContinuationToken".into(),
                ));
            }
        }

        info!(files = files.len(), pages, "Fetched catalog");

        Ok(Catalog::new(files))
    }
}

#[async_trait]
impl CatalogSource for CatalogClient {
    async fn fetch_catalog(&self) -> Result<Catalog> {
        CatalogClient::fetch_catalog(self).await
    }
}
