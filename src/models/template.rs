//! Content template expansion
//!
//! A template is the ethscription content with a `${id}` marker standing in
//! for the identifier, e.g.
//! `data:,{"p":"erc-20","op":"mint","tick":"eths","id":"${id}","amt":"1000"}`.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::error::ValidationError;

/// Marker replaced by the identifier
pub const ID_MARKER: &str = "${id}";

/// Validated content template
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ScriptionTemplate {
    raw: String,
}

impl ScriptionTemplate {
    /// Wrap a template string; it must contain [`ID_MARKER`]
    pub fn new(raw: impl Into<String>) -> Result<Self, ValidationError> {
        let raw = raw.into();
        if !raw.contains(ID_MARKER) {
            return Err(ValidationError::MissingIdMarker(raw));
        }
        Ok(Self { raw })
    }

    /// The unexpanded template
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// Content for an identifier; only the first marker is replaced
    pub fn render(&self, id: u64) -> String {
        self.raw.replacen(ID_MARKER, &id.to_string(), 1)
    }

    /// Lowercase hex SHA-256 of the rendered content
    ///
    /// This is the fingerprint the existence endpoint is keyed by.
    pub fn fingerprint(&self, id: u64) -> String {
        hex::encode(Sha256::digest(self.render(id).as_bytes()))
    }
}

impl TryFrom<String> for ScriptionTemplate {
    type Error = ValidationError;

    fn try_from(raw: String) -> Result<Self, Self::Error> {
        Self::new(raw)
    }
}

impl From<ScriptionTemplate> for String {
    fn from(template: ScriptionTemplate) -> Self {
        template.raw
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TEMPLATE: &str =
        r#"data:,{"p":"erc-20","op":"mint","tick":"eths","id":"${id}","amt":"1000"}"#;

    #[test]
    fn test_render_substitutes_identifier() {
        let template = ScriptionTemplate::new(TEMPLATE).unwrap();

        assert_eq!(
            template.render(42),
            r#"data:,{"p":"erc-20","op":"mint","tick":"eths","id":"42","amt":"1000"}"#
        );
    }

    #[test]
    fn test_render_replaces_first_marker_only() {
        let template = ScriptionTemplate::new("data:,${id}-${id}").unwrap();

        assert_eq!(template.render(7), "data:,7-${id}");
    }

    #[test]
    fn test_missing_marker_rejected() {
        assert_eq!(
            ScriptionTemplate::new("data:,plain"),
            Err(ValidationError::MissingIdMarker("data:,plain".to_string()))
        );
    }

    #[test]
    fn test_fingerprint_is_sha256_of_content() {
        let template = ScriptionTemplate::new("${id}").unwrap();

        // sha256("1")
        assert_eq!(
            template.fingerprint(1),
            "6b86b273ff34fce19d6b804eff5a3f5747ada4eaa22f1d49c01e52ddb7875b4b"
        );
    }

    #[test]
    fn test_deserialize_validates_marker() {
        let ok: Result<ScriptionTemplate, _> = serde_json::from_str(r#""data:,${id}""#);
        let bad: Result<ScriptionTemplate, _> = serde_json::from_str(r#""data:,x""#);

        assert!(ok.is_ok());
        assert!(bad.is_err());
    }
}
