//! Exhaustive pagination over the owner listing
//!
//! Pages are requested from 1 upward until the source returns an empty page.
//! Each page fetch runs under the retry policy, unbounded by default, so a
//! transient failure never skips or truncates a page.

use tracing::{debug, info};

use crate::api::RecordSource;
use crate::config::Config;
use crate::error::ApiError;
use crate::models::Record;
use crate::sync::{RetryManager, RetryPolicy};

/// Default listing page size
pub const DEFAULT_PAGE_SIZE: u32 = 100;

/// Drains a [`RecordSource`] into a single ordered list
#[derive(Debug)]
pub struct PaginatedCollector<S> {
    source: S,
    page_size: u32,
    retry: RetryManager,
}

impl<S: RecordSource> PaginatedCollector<S> {
    /// Create a collector with the unbounded retry policy
    pub fn new(source: S, page_size: u32) -> Self {
        Self::with_retry(source, page_size, RetryPolicy::unbounded())
    }

    /// Create a collector with an explicit retry policy
    pub fn with_retry(source: S, page_size: u32, retry: RetryPolicy) -> Self {
        Self {
            source,
            page_size,
            retry: RetryManager::new(retry),
        }
    }

    /// Create a collector using the configured page size and retry policy
    pub fn from_config(source: S, config: &Config) -> Self {
        Self::with_retry(source, config.api.per_page, RetryPolicy::from(&config.retry))
    }

    /// Records requested per page
    pub fn page_size(&self) -> u32 {
        self.page_size
    }

    /// Fetch every record owned by `owner`, in page order then position
    ///
    /// Terminates only once the source returns an empty page; a source that
    /// never does keeps this loop running.
    pub async fn collect(&self, owner: &str) -> Result<Vec<Record>, ApiError> {
        let mut records = Vec::new();
        let mut page = 1u32;

        loop {
            let batch = self
                .retry
                .execute(|| self.source.owned_by(owner, page, self.page_size))
                .await?;

            if batch.is_empty() {
                break;
            }

            debug!(owner = owner, page = page, records = batch.len(), "Collected page");
            records.extend(batch);
            page += 1;
        }

        info!(
            owner = owner,
            pages = page - 1,
            records = records.len(),
            "Collection complete"
        );
        Ok(records)
    }
}
