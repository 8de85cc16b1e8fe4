//! Scan-related domain models
//!
//! This module defines the inclusive identifier range and the per-identifier
//! outcome of an existence check.

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// Largest number of identifiers a single range may cover
pub const MAX_SCAN_SPAN: u64 = 1_000_000;

/// Inclusive range of identifiers to probe
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RangeBounds")]
pub struct ScanRange {
    start: u64,
    end: u64,
}

#[derive(Deserialize)]
struct RangeBounds {
    start: u64,
    end: u64,
}

impl TryFrom<RangeBounds> for ScanRange {
    type Error = ValidationError;

    fn try_from(bounds: RangeBounds) -> Result<Self, Self::Error> {
        ScanRange::new(bounds.start, bounds.end)
    }
}

impl ScanRange {
    /// Create a range, rejecting `start > end` and spans over [`MAX_SCAN_SPAN`]
    pub fn new(start: u64, end: u64) -> Result<Self, ValidationError> {
        if start > end {
            return Err(ValidationError::InvalidRange { start, end });
        }
        let len = (end - start).saturating_add(1);
        if len > MAX_SCAN_SPAN {
            return Err(ValidationError::RangeTooLarge {
                len,
                max: MAX_SCAN_SPAN,
            });
        }
        Ok(Self { start, end })
    }

    /// First identifier in the range
    pub fn start(&self) -> u64 {
        self.start
    }

    /// Last identifier in the range
    pub fn end(&self) -> u64 {
        self.end
    }

    /// Number of identifiers covered
    pub fn len(&self) -> u64 {
        (self.end - self.start).saturating_add(1)
    }

    /// A valid range always holds at least one identifier
    pub fn is_empty(&self) -> bool {
        false
    }

    /// Identifiers in ascending order
    pub fn ids(&self) -> impl Iterator<Item = u64> {
        self.start..=self.end
    }
}

/// Outcome of checking a single identifier
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum IdentifierResult {
    /// Nobody has claimed the content for this identifier
    Available {
        /// Probed identifier
        id: u64,
    },
    /// The content already exists on chain
    Claimed {
        /// Probed identifier
        id: u64,
        /// Address that created the ethscription
        creator: Option<String>,
        /// Address currently owning it
        current_owner: Option<String>,
    },
}

impl IdentifierResult {
    /// The probed identifier
    pub fn id(&self) -> u64 {
        match self {
            IdentifierResult::Available { id } | IdentifierResult::Claimed { id, .. } => *id,
        }
    }

    /// Check if the identifier is still free
    pub fn is_available(&self) -> bool {
        matches!(self, IdentifierResult::Available { .. })
    }

    /// The identifier when available, `None` when claimed
    pub fn available_id(&self) -> Option<u64> {
        match self {
            IdentifierResult::Available { id } => Some(*id),
            IdentifierResult::Claimed { .. } => None,
        }
    }
}
