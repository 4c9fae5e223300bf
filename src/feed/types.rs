// Keyword feed types.
// Defines the entries served by the trending-keyword endpoint and the snapshot built from them.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Number of entries kept from each fetch.
pub const MAX_ENTRIES: usize = 5;

/// One trending keyword as served by the feed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeywordEntry {
    pub id: i64,
    pub keyword: String,
    /// 1-based position in the ranking.
    pub rank: u32,
}

/// The most recently fetched list of keywords.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct WidgetSnapshot {
    /// Entries in feed order.
    pub entries: Vec<KeywordEntry>,
    /// When the snapshot was persisted. Absent until the store writes it.
    pub last_updated: Option<DateTime<Utc>>,
}

impl WidgetSnapshot {
    pub fn new(entries: Vec<KeywordEntry>) -> Self {
        Self {
            entries,
            last_updated: None,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }
}

/// Parse a feed body into at most `limit` entries.
///
/// The body must be a JSON array. Elements that are not objects, lack a field,
/// carry the wrong type, or have a rank below 1 are skipped without failing the batch.
pub fn parse_entries(body: &str, limit: usize) -> serde_json::Result<Vec<KeywordEntry>> {
    let items: Vec<Value> = serde_json::from_str(body)?;
    Ok(items
        .into_iter()
        .filter_map(|item| serde_json::from_value::<KeywordEntry>(item).ok())
        .filter(|entry| entry.rank >= 1)
        .take(limit)
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn feed(count: usize) -> String {
        let items: Vec<String> = (1..=count)
            .map(|i| format!(r#"{{"id":{i},"keyword":"kw{i}","rank":{i},"category":"news"}}"#))
            .collect();
        format!("[{}]", items.join(","))
    }

    #[test]
    fn test_keeps_first_five_in_order() {
        let entries = parse_entries(&feed(8), MAX_ENTRIES).unwrap();
        assert_eq!(entries.len(), 5);
        let ids: Vec<i64> = entries.iter().map(|e| e.id).collect();
        assert_eq!(ids, vec![1, 2, 3, 4, 5]);
        assert_eq!(entries[0].keyword, "kw1");
    }

    #[test]
    fn test_fewer_than_limit_passes_through() {
        let entries = parse_entries(&feed(3), MAX_ENTRIES).unwrap();
        assert_eq!(entries.len(), 3);

        let entries = parse_entries("[]", MAX_ENTRIES).unwrap();
        assert!(entries.is_empty());
    }

    #[test]
    fn test_malformed_elements_are_dropped() {
        let body = r#"[
            {"id":1,"keyword":"good","rank":1},
            {"id":"x","keyword":"bad id","rank":2},
            "not an object",
            {"keyword":"missing id","rank":3},
            {"id":4,"keyword":"zero rank","rank":0},
            {"id":5,"keyword":"negative rank","rank":-1},
            {"id":6,"keyword":"also good","rank":2}
        ]"#;
        let entries = parse_entries(body, MAX_ENTRIES).unwrap();
        let ids: Vec<i64> = entries.iter().map(|e| e.id).collect();
        assert_eq!(ids, vec![1, 6]);
    }

    #[test]
    fn test_five_valid_among_invalid() {
        let body = r#"[
            {"id":1,"keyword":"a","rank":1},
            null,
            {"id":2,"keyword":"b","rank":2},
            {"id":3,"keyword":"c","rank":3},
            {"id":4,"keyword":"d","rank":4},
            {"id":5,"keyword":"e","rank":5},
            {"id":6,"keyword":"f","rank":6}
        ]"#;
        let entries = parse_entries(body, MAX_ENTRIES).unwrap();
        let ids: Vec<i64> = entries.iter().map(|e| e.id).collect();
        assert_eq!(ids, vec![1, 2, 3, 4, 5]);
    }

    #[test]
    fn test_non_array_body_is_error() {
        assert!(parse_entries(r#"{"id":1}"#, MAX_ENTRIES).is_err());
        assert!(parse_entries("<html>", MAX_ENTRIES).is_err());
    }
}
