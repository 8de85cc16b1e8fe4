//! Listing records and the tokens parsed out of them
//!
//! A [`Record`] is one item of the paginated `owned_by` listing. Records whose
//! content matches the mint shape become [`ParsedToken`]s, which are grouped
//! into [`TokenGroup`]s by protocol and tick.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One ethscription as returned by the listing endpoints
///
/// Only the fields the aggregator needs are modeled; anything else in the
/// upstream JSON is ignored. Decoding never fails: a missing, null or
/// non-string field becomes empty, and such a record simply yields no token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Value")]
pub struct Record {
    /// Raw content, usually a `data:` URI
    pub content_uri: String,

    /// Hash of the transaction that created the ethscription
    pub transaction_hash: String,

    /// Current owner, when the upstream reports it
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current_owner: Option<String>,
}

impl Record {
    /// Create a record from its content and creating transaction hash
    pub fn new(content_uri: impl Into<String>, transaction_hash: impl Into<String>) -> Self {
        Self {
            content_uri: content_uri.into(),
            transaction_hash: transaction_hash.into(),
            current_owner: None,
        }
    }
}

impl From<Value> for Record {
    fn from(value: Value) -> Self {
        let field = |name: &str| value.get(name).and_then(Value::as_str).map(str::to_string);
        Self {
            content_uri: field("content_uri").unwrap_or_default(),
            transaction_hash: field("transaction_hash").unwrap_or_default(),
            current_owner: field("current_owner"),
        }
    }
}

/// Mint token extracted from a record's content
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParsedToken {
    /// Transaction hash of the source record
    pub hash: String,
    /// Protocol (`p`)
    pub protocol: String,
    /// Ticker (`tick`)
    pub tick: String,
    /// Sequence id (`id`), digits only
    pub sequence_id: String,
    /// Amount (`amt`), digits only
    pub amount: String,
}

/// A single member of a token group
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenEntry {
    /// Sequence id of the minted token
    pub sequence_id: String,
    /// Transaction hash that carries it
    pub hash: String,
}

/// Tokens sharing a `(protocol, tick)` key, in encounter order
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenGroup {
    /// Protocol of every entry
    pub protocol: String,
    /// Ticker of every entry
    pub tick: String,
    /// Entries in the order their records were fetched
    pub entries: Vec<TokenEntry>,
}

impl TokenGroup {
    /// Number of tokens held in this group
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if the group has no entries
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Check if this group has the given key
    pub fn matches(&self, protocol: &str, tick: &str) -> bool {
        self.protocol == protocol && self.tick == tick
    }
}
