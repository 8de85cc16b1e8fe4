//! Domain models for ethscription-scout
//!
//! This module contains the core domain models used throughout the application.

pub mod scan;
pub mod template;
pub mod token;

// Re-export commonly used types
pub use scan::{IdentifierResult, ScanRange};
pub use template::{ScriptionTemplate, ID_MARKER};
pub use token::{ParsedToken, Record, TokenEntry, TokenGroup};
