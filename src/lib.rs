//! ethscription-scout - availability scanning and token grouping for ethscriptions
//!
//! This crate finds identifiers whose templated content has not been inscribed
//! yet, drains the paginated owner listing, and groups the minted tokens found
//! there so they can be batch-transferred. Payloads are produced as calldata;
//! signing is left to the caller's wallet.

pub mod aggregate;
pub mod api;
pub mod collector;
pub mod config;
pub mod error;
pub mod logging;
pub mod models;
pub mod payload;
pub mod scanner;
pub mod shutdown;
pub mod sync;
