//! Ethscriptions API collaborators
//!
//! The scanner and collector only see the two narrow traits defined here.
//! [`EthscriptionsClient`] is the HTTP implementation of both.

pub mod client;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::ApiError;
use crate::models::Record;

pub use client::EthscriptionsClient;

/// Answer of a single existence lookup
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExistenceStatus {
    /// Whether the content has already been inscribed
    pub found: bool,
    /// Creator of the existing ethscription
    pub creator: Option<String>,
    /// Current owner of the existing ethscription
    pub current_owner: Option<String>,
}

impl ExistenceStatus {
    /// Content not inscribed yet
    pub fn not_found() -> Self {
        Self::default()
    }

    /// Content already inscribed by `creator`, now held by `current_owner`
    pub fn claimed(creator: impl Into<String>, current_owner: impl Into<String>) -> Self {
        Self {
            found: true,
            creator: Some(creator.into()),
            current_owner: Some(current_owner.into()),
        }
    }
}

/// Looks up whether content with a given fingerprint exists
///
/// Implementations must not retry internally; transient failures are
/// returned to the caller, which owns the retry policy.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ExistenceCheck: Send + Sync {
    /// Check the SHA-256 hex fingerprint of a rendered content string
    async fn check(&self, fingerprint: &str) -> Result<ExistenceStatus, ApiError>;
}

/// Paged listing of records held by an owner
///
/// An empty page marks the end of the listing.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RecordSource: Send + Sync {
    /// Fetch one page (1-based) of records owned by `owner`
    async fn owned_by(&self, owner: &str, page: u32, per_page: u32)
        -> Result<Vec<Record>, ApiError>;
}
