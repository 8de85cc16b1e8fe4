//! Token extraction and grouping
//!
//! Records whose content has the mint shape
//! `data:,{"p":"…","op":"mint","tick":"…","id":"<digits>","amt":"<digits>"}`
//! are parsed into [`ParsedToken`]s; everything else is skipped without error.
//! Tokens are then grouped by `(protocol, tick)` in first-seen order.

use regex_lite::Regex;
use std::collections::HashMap;
use std::sync::LazyLock;

use crate::models::{ParsedToken, Record, TokenEntry, TokenGroup};

static MINT_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"data:,\{"p":"(.+)","op":"mint","tick":"(.+)","id":"(\d+)","amt":"(\d+)"\}"#)
        .expect("Invalid regex pattern for mint content")
});

/// Parse a record's content as a mint token
///
/// Returns `None` for any content that does not have the mint shape,
/// including other operations such as `transfer`.
pub fn try_parse_token(record: &Record) -> Option<ParsedToken> {
    let caps = MINT_PATTERN.captures(&record.content_uri)?;

    Some(ParsedToken {
        hash: record.transaction_hash.clone(),
        protocol: caps[1].to_string(),
        tick: caps[2].to_string(),
        sequence_id: caps[3].to_string(),
        amount: caps[4].to_string(),
    })
}

/// Group tokens by `(protocol, tick)`
///
/// Groups appear in the order their key was first seen and each group lists
/// its entries in encounter order.
pub fn group_tokens<I>(tokens: I) -> Vec<TokenGroup>
where
    I: IntoIterator<Item = ParsedToken>,
{
    let mut groups: Vec<TokenGroup> = Vec::new();
    let mut index: HashMap<(String, String), usize> = HashMap::new();

    for token in tokens {
        let entry = TokenEntry {
            sequence_id: token.sequence_id,
            hash: token.hash,
        };

        match index.get(&(token.protocol.clone(), token.tick.clone())) {
            Some(&position) => groups[position].entries.push(entry),
            None => {
                index.insert((token.protocol.clone(), token.tick.clone()), groups.len());
                groups.push(TokenGroup {
                    protocol: token.protocol,
                    tick: token.tick,
                    entries: vec![entry],
                });
            }
        }
    }

    groups
}

/// Parse every record and group the resulting tokens
pub fn aggregate(records: &[Record]) -> Vec<TokenGroup> {
    group_tokens(records.iter().filter_map(try_parse_token))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mint(p: &str, tick: &str, id: u32, hash: &str) -> Record {
        Record::new(
            format!(
                r#"data:,{{"p":"{}","op":"mint","tick":"{}","id":"{}","amt":"1000"}}"#,
                p, tick, id
            ),
            hash,
        )
    }

    fn ids(group: &TokenGroup) -> Vec<&str> {
        group
            .entries
            .iter()
            .map(|e| e.sequence_id.as_str())
            .collect()
    }

    #[test]
    fn test_parse_mint_record() {
        let record = mint("erc-20", "eths", 42, "0xabc");

        let token = try_parse_token(&record).unwrap();

        assert_eq!(
            token,
            ParsedToken {
                hash: "0xabc".to_string(),
                protocol: "erc-20".to_string(),
                tick: "eths".to_string(),
                sequence_id: "42".to_string(),
                amount: "1000".to_string(),
            }
        );
    }

    #[test]
    fn test_non_mint_operation_is_dropped() {
        let record = Record::new(
            r#"data:,{"p":"erc-20","op":"transfer","tick":"eths","id":"1","amt":"1000"}"#,
            "0x01",
        );

        assert_eq!(try_parse_token(&record), None);
        assert!(aggregate(&[record]).is_empty());
    }

    #[test]
    fn test_malformed_content_is_dropped() {
        let records = vec![
            Record::new("data:,hello world", "0x01"),
            Record::new(r#"data:,{"p":"erc-20","op":"mint","tick":"eths"}"#, "0x02"),
            Record::new(
                r#"data:,{"p":"erc-20","op":"mint","tick":"eths","id":"x1","amt":"1"}"#,
                "0x03",
            ),
            Record::new("data:image/png;base64,iVBORw0KGgo=", "0x04"),
        ];

        assert!(records.iter().all(|r| try_parse_token(r).is_none()));
    }

    #[test]
    fn test_grouping_is_stable() {
        let records = vec![
            mint("A", "X", 1, "0x01"),
            mint("A", "X", 2, "0x02"),
            mint("B", "Y", 1, "0x03"),
            mint("A", "X", 3, "0x04"),
        ];

        let groups = aggregate(&records);

        assert_eq!(groups.len(), 2);
        assert!(groups[0].matches("A", "X"));
        assert_eq!(ids(&groups[0]), vec!["1", "2", "3"]);
        assert!(groups[1].matches("B", "Y"));
        assert_eq!(ids(&groups[1]), vec!["1"]);
        assert_eq!(groups[0].entries[2].hash, "0x04");
    }

    #[test]
    fn test_same_tick_different_protocol_are_separate_groups() {
        let records = vec![mint("A", "X", 1, "0x01"), mint("B", "X", 1, "0x02")];

        let groups = aggregate(&records);

        assert_eq!(groups.len(), 2);
        assert!(groups[0].matches("A", "X"));
        assert!(groups[1].matches("B", "X"));
    }

    #[test]
    fn test_mixed_records_keep_encounter_order() {
        let records = vec![
            Record::new("data:,noise", "0x00"),
            mint("erc-20", "eths", 9, "0x09"),
            Record::new(
                r#"data:,{"p":"erc-20","op":"deploy","tick":"eths","max":"21000000"}"#,
                "0x0a",
            ),
            mint("erc-20", "eths", 3, "0x03"),
        ];

        let groups = aggregate(&records);

        assert_eq!(groups.len(), 1);
        assert_eq!(ids(&groups[0]), vec!["9", "3"]);
    }

    #[test]
    fn test_group_tokens_empty() {
        assert!(group_tokens(Vec::new()).is_empty());
    }
}
