//! Upstream access infrastructure
//!
//! This module provides the building blocks every upstream call goes through.
//!
//! # Components
//!
//! - [`retry`]: Retry combinator with bounded or unbounded limits and swappable backoff
//! - [`scheduler`]: Bounded-concurrency batch runner that preserves input order
//! - [`http_client`]: HTTP client mapping upstream failures onto `ApiError`
//!
//! # Example
//!
//! ```ignore
//! use ethscription_scout::sync::{BoundedScheduler, RetryManager, RetryPolicy};
//!
//! let retry = RetryManager::new(RetryPolicy::unbounded());
//! let scheduler = BoundedScheduler::new(100)?;
//!
//! let tasks: Vec<_> = ids
//!     .iter()
//!     .map(|&id| {
//!         let retry = &retry;
//!         move || async move { retry.execute(|| checker.check(id)).await }
//!     })
//!     .collect();
//! let answers = scheduler.run(tasks).await?;
//! ```

pub mod http_client;
pub mod retry;
pub mod scheduler;

// Re-export main types for convenience
pub use http_client::HttpClient;
pub use retry::{Backoff, RetryLimit, RetryManager, RetryPolicy, Retrying};
pub use scheduler::BoundedScheduler;
