//! MetadataRecord: flat key/value snapshot describing a ticker at fetch time.
//!
//! Any key may be missing. Lookups never fail: a key that is not present
//! reads as [`MetadataValue::Absent`], so callers handle absence explicitly
//! instead of through sentinel values.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A single metadata value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MetadataValue {
    Number(f64),
    Text(String),
    Absent,
}

static ABSENT: MetadataValue = MetadataValue::Absent;

impl MetadataValue {
    pub fn as_number(&self) -> Option<f64> {
        match self {
            MetadataValue::Number(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            MetadataValue::Text(s) => Some(s.as_str()),
            _ => None,
        }
    }

    pub fn is_absent(&self) -> bool {
        matches!(self, MetadataValue::Absent)
    }
}

impl From<f64> for MetadataValue {
    fn from(v: f64) -> Self {
        MetadataValue::Number(v)
    }
}

impl From<&str> for MetadataValue {
    fn from(s: &str) -> Self {
        MetadataValue::Text(s.to_string())
    }
}

impl From<String> for MetadataValue {
    fn from(s: String) -> Self {
        MetadataValue::Text(s)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MetadataRecord {
    entries: BTreeMap<String, MetadataValue>,
}

impl MetadataRecord {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a value. Inserting `Absent` removes the key.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<MetadataValue>) {
        let key = key.into();
        match value.into() {
            MetadataValue::Absent => {
                self.entries.remove(&key);
            }
            value => {
                self.entries.insert(key, value);
            }
        }
    }

    pub fn get(&self, key: &str) -> &MetadataValue {
        self.entries.get(key).unwrap_or(&ABSENT)
    }

    pub fn number(&self, key: &str) -> Option<f64> {
        self.get(key).as_number()
    }

    pub fn text(&self, key: &str) -> Option<&str> {
        self.get(key).as_text()
    }

    /// Overlay `other` on top of `self`; keys in `other` win.
    pub fn merge(&mut self, other: MetadataRecord) {
        self.entries.extend(other.entries);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &MetadataValue)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }
}

impl<K: Into<String>, V: Into<MetadataValue>> FromIterator<(K, V)> for MetadataRecord {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut record = MetadataRecord::new();
        for (k, v) in iter {
            record.insert(k, v);
        }
        record
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_key_reads_absent() {
        let record = MetadataRecord::new();
        assert!(record.get("marketCap").is_absent());
        assert_eq!(record.number("marketCap"), None);
    }

    #[test]
    fn typed_accessors() {
        let record: MetadataRecord = [
            ("marketCap", MetadataValue::Number(2.9e12)),
            ("shortName", MetadataValue::Text("Apple Inc.".into())),
        ]
        .into_iter()
        .collect();

        assert_eq!(record.number("marketCap"), Some(2.9e12));
        assert_eq!(record.text("marketCap"), None);
        assert_eq!(record.text("shortName"), Some("Apple Inc."));
        assert_eq!(record.number("shortName"), None);
    }

    #[test]
    fn inserting_absent_removes() {
        let mut record = MetadataRecord::new();
        record.insert("beta", 1.2);
        assert_eq!(record.len(), 1);
        record.insert("beta", MetadataValue::Absent);
        assert!(record.is_empty());
    }

    #[test]
    fn merge_overrides() {
        let mut base: MetadataRecord = [("previousClose", 10.0), ("volume", 5.0)]
            .into_iter()
            .collect();
        let overlay: MetadataRecord = [("previousClose", 11.0)].into_iter().collect();
        base.merge(overlay);
        assert_eq!(base.number("previousClose"), Some(11.0));
        assert_eq!(base.number("volume"), Some(5.0));
    }
}
