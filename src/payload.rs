//! Transaction payloads for minting and transferring
//!
//! Only the raw calldata is produced here. Signing and broadcasting belong to
//! the wallet, which this crate never touches.

use base64::{engine::general_purpose::STANDARD, Engine as _};
use serde::Serialize;

use crate::config::Network;
use crate::error::ValidationError;
use crate::models::{ScriptionTemplate, TokenGroup};

/// Hex-encode the UTF-8 bytes of `text`, without a `0x` prefix
pub fn utf8_to_hex(text: &str) -> String {
    hex::encode(text.as_bytes())
}

/// Standard base64 of the UTF-8 bytes of `text`
pub fn utf8_to_base64(text: &str) -> String {
    STANDARD.encode(text.as_bytes())
}

/// Decode standard base64 into UTF-8 text
///
/// Invalid base64 or non-UTF-8 output yields an empty string.
pub fn base64_to_utf8(encoded: &str) -> String {
    STANDARD
        .decode(encoded)
        .ok()
        .and_then(|bytes| String::from_utf8(bytes).ok())
        .unwrap_or_default()
}

/// Calldata that inscribes the template rendered for `id`
pub fn mint_calldata(template: &ScriptionTemplate, id: u64) -> String {
    format!("0x{}", utf8_to_hex(&template.render(id)))
}

/// Calldata that transfers every listed transaction hash in one call
pub fn transfer_calldata<'a, I>(hashes: I) -> String
where
    I: IntoIterator<Item = &'a str>,
{
    let mut calldata = String::from("0x");
    for hash in hashes {
        calldata.push_str(hash.strip_prefix("0x").unwrap_or(hash));
    }
    calldata
}

fn check_count(count: usize, available: usize) -> Result<(), ValidationError> {
    if count == 0 || count > available {
        return Err(ValidationError::InvalidCount { count, available });
    }
    Ok(())
}

/// One mint transaction of a [`MintPlan`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MintItem {
    /// Identifier whose content is inscribed
    pub id: u64,
    /// Nonce to sign the transaction with
    pub nonce: u64,
    /// `0x`-prefixed transaction data
    pub calldata: String,
}

/// Mint transactions for the first `count` available identifiers
///
/// Nonces are consecutive from the caller's starting nonce so the
/// transactions can be sent back to back without waiting for receipts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MintPlan {
    /// Recipient of every mint; `None` sends to the signing wallet itself
    pub to: Option<String>,
    /// Transactions in nonce order
    pub items: Vec<MintItem>,
}

impl MintPlan {
    /// Plan mints for `available` ids, which must be in scan order
    pub fn new(
        template: &ScriptionTemplate,
        available: &[u64],
        count: usize,
        start_nonce: u64,
        to: Option<String>,
    ) -> Result<Self, ValidationError> {
        check_count(count, available.len())?;

        let items = available
            .iter()
            .take(count)
            .zip(start_nonce..)
            .map(|(&id, nonce)| MintItem {
                id,
                nonce,
                calldata: mint_calldata(template, id),
            })
            .collect();

        Ok(Self { to, items })
    }

    /// Number of planned transactions
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Never true for a plan built by [`MintPlan::new`]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// A single batched transfer of the first `count` tokens of a group
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TransferPlan {
    /// Protocol of the transferred tokens
    pub protocol: String,
    /// Ticker of the transferred tokens
    pub tick: String,
    /// Recipient of the transfer
    pub to: String,
    /// Sequence ids being moved, in group order
    pub ids: Vec<String>,
    /// Creating transaction hashes of the moved inscriptions
    pub hashes: Vec<String>,
    /// `0x`-prefixed transaction data
    pub calldata: String,
    /// Explorer pages of the transferred inscriptions, when requested
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub explorer_links: Vec<String>,
}

impl TransferPlan {
    /// Plan a transfer of the group's first `count` entries to `to`
    pub fn new(
        group: &TokenGroup,
        count: usize,
        to: impl Into<String>,
    ) -> Result<Self, ValidationError> {
        check_count(count, group.len())?;

        let selected = &group.entries[..count];

        Ok(Self {
            protocol: group.protocol.clone(),
            tick: group.tick.clone(),
            to: to.into(),
            ids: selected.iter().map(|e| e.sequence_id.clone()).collect(),
            hashes: selected.iter().map(|e| e.hash.clone()).collect(),
            calldata: transfer_calldata(selected.iter().map(|e| e.hash.as_str())),
            explorer_links: Vec::new(),
        })
    }

    /// Attach the explorer page of every transferred inscription
    pub fn with_explorer_links(mut self, network: Network) -> Self {
        self.explorer_links = self.hashes.iter().map(|hash| network.tx_url(hash)).collect();
        self
    }
}
