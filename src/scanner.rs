//! Availability scanning over identifier ranges
//!
//! For every id in a [`ScanRange`] the scanner renders the content template,
//! fingerprints it and asks the [`ExistenceCheck`] whether it was already
//! inscribed. Lookups run through the [`BoundedScheduler`] and each one is
//! wrapped in the configured [`RetryPolicy`], unbounded by default.

use tracing::{debug, info};

use crate::api::ExistenceCheck;
use crate::config::Config;
use crate::error::{ApiError, ValidationError};
use crate::models::{IdentifierResult, ScanRange, ScriptionTemplate};
use crate::payload::utf8_to_hex;
use crate::sync::{BoundedScheduler, RetryManager, RetryPolicy};

/// Default number of lookups in flight
pub const DEFAULT_SCAN_CONCURRENCY: usize = 100;

/// Tuning for an [`AvailabilityScanner`]
#[derive(Debug, Clone, PartialEq)]
pub struct ScanSettings {
    /// Maximum lookups in flight
    pub concurrency: usize,
    /// Retry policy applied to every lookup
    pub retry: RetryPolicy,
}

impl Default for ScanSettings {
    fn default() -> Self {
        Self {
            concurrency: DEFAULT_SCAN_CONCURRENCY,
            retry: RetryPolicy::unbounded(),
        }
    }
}

impl From<&Config> for ScanSettings {
    fn from(config: &Config) -> Self {
        Self {
            concurrency: config.scan.concurrency,
            retry: RetryPolicy::from(&config.retry),
        }
    }
}

/// Finds identifiers whose content has not been inscribed yet
///
/// The scanner holds no per-scan state, so the same instance can be asked
/// for as many ranges as needed.
#[derive(Debug)]
pub struct AvailabilityScanner<C> {
    checker: C,
    template: ScriptionTemplate,
    scheduler: BoundedScheduler,
    retry: RetryManager,
}

impl<C: ExistenceCheck> AvailabilityScanner<C> {
    /// Create a scanner over the given existence check
    pub fn new(
        checker: C,
        template: ScriptionTemplate,
        settings: ScanSettings,
    ) -> Result<Self, ValidationError> {
        Ok(Self {
            checker,
            template,
            scheduler: BoundedScheduler::new(settings.concurrency)?,
            retry: RetryManager::new(settings.retry),
        })
    }

    /// Template the scanned content is rendered from
    pub fn template(&self) -> &ScriptionTemplate {
        &self.template
    }

    /// Look up a single identifier, retrying per policy
    pub async fn check_id(&self, id: u64) -> Result<IdentifierResult, ApiError> {
        let fingerprint = self.template.fingerprint(id);
        let status = self
            .retry
            .execute(|| self.checker.check(&fingerprint))
            .await?;

        if status.found {
            info!(
                id = id,
                creator = status.creator.as_deref().unwrap_or("-"),
                owner = status.current_owner.as_deref().unwrap_or("-"),
                "Claimed"
            );
            Ok(IdentifierResult::Claimed {
                id,
                creator: status.creator,
                current_owner: status.current_owner,
            })
        } else {
            info!(
                id = id,
                payload = %utf8_to_hex(&self.template.render(id)),
                "Available"
            );
            Ok(IdentifierResult::Available { id })
        }
    }

    /// Per-identifier outcomes for the whole range, in ascending id order
    pub async fn scan_detailed(&self, range: ScanRange) -> Result<Vec<IdentifierResult>, ApiError> {
        debug!(
            start = range.start(),
            end = range.end(),
            concurrency = self.scheduler.concurrency(),
            "Scanning range"
        );

        let tasks: Vec<_> = range.ids().map(move |id| move || self.check_id(id)).collect();
        self.scheduler.run(tasks).await
    }

    /// Available identifiers in the range, ascending
    ///
    /// An empty result is a normal outcome; callers widen or move the range
    /// and scan again.
    pub async fn scan(&self, range: ScanRange) -> Result<Vec<u64>, ApiError> {
        let available: Vec<u64> = self
            .scan_detailed(range)
            .await?
            .iter()
            .filter_map(IdentifierResult::available_id)
            .collect();

        info!(
            start = range.start(),
            end = range.end(),
            available = available.len(),
            "Scan complete"
        );
        Ok(available)
    }

    /// Scan ranges in turn until one yields available identifiers
    ///
    /// Returns an empty list only when `ranges` runs out first.
    pub async fn scan_until_found<I>(&self, ranges: I) -> Result<Vec<u64>, ApiError>
    where
        I: IntoIterator<Item = ScanRange>,
    {
        for range in ranges {
            let available = self.scan(range).await?;
            if !available.is_empty() {
                return Ok(available);
            }
            info!(
                start = range.start(),
                end = range.end(),
                "No available ids in range"
            );
        }
        Ok(Vec::new())
    }
}
