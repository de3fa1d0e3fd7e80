//! State types persisted between runs
//!
//! These types are serialized to JSON and kept on disk.

use crate::types::Cursor;
use serde::{Deserialize, Serialize};
use std::collections::{HashSet, VecDeque};

/// On-disk form of the cursor file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CursorDocument {
    /// Lower bound for the next query
    pub last_polled_time: Cursor,
}

/// Transaction hashes already dispatched, oldest first
///
/// Membership checks and inserts are O(1). The order of first insertion
/// is kept so pruning can drop the oldest entries.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProcessedSet {
    order: VecDeque<String>,
    members: HashSet<String>,
}

impl ProcessedSet {
    /// Create a new empty set
    pub fn new() -> Self {
        Self::default()
    }

    /// Check whether a hash has been dispatched
    pub fn contains(&self, tx_hash: &str) -> bool {
        self.members.contains(tx_hash)
    }

    /// Record a hash. Returns false if it was already present.
    pub fn insert(&mut self, tx_hash: impl Into<String>) -> bool {
        let tx_hash = tx_hash.into();
        if self.members.contains(&tx_hash) {
            return false;
        }
        self.members.insert(tx_hash.clone());
        self.order.push_back(tx_hash);
        true
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Iterate hashes oldest first
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.order.iter().map(String::as_str)
    }

    /// Evict the oldest entries down to `keep` once the size exceeds `max`
    ///
    /// Returns true if anything was evicted.
    pub fn prune(&mut self, max: usize, keep: usize) -> bool {
        if self.order.len() <= max {
            return false;
        }
        while self.order.len() > keep {
            if let Some(oldest) = self.order.pop_front() {
                self.members.remove(&oldest);
            }
        }
        true
    }
}

impl FromIterator<String> for ProcessedSet {
    fn from_iter<I: IntoIterator<Item = String>>(iter: I) -> Self {
        let mut set = Self::new();
        for tx_hash in iter {
            set.insert(tx_hash);
        }
        set
    }
}

impl Serialize for ProcessedSet {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(self.order.iter())
    }
}

impl<'de> Deserialize<'de> for ProcessedSet {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let hashes = Vec::<String>::deserialize(deserializer)?;
        Ok(hashes.into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_and_contains() {
        let mut set = ProcessedSet::new();
        assert!(set.is_empty());

        assert!(set.insert("0xabc"));
        assert!(!set.insert("0xabc"));
        assert!(set.contains("0xabc"));
        assert!(!set.contains("0xdef"));
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn test_prune_keeps_most_recent() {
        let mut set: ProcessedSet = (0..1001).map(|i| format!("0x{i}")).collect();

        assert!(set.prune(1000, 500));
        assert_eq!(set.len(), 500);
        assert!(!set.contains("0x0"));
        assert!(!set.contains("0x500"));
        assert!(set.contains("0x501"));
        assert!(set.contains("0x1000"));
        assert_eq!(set.iter().next(), Some("0x501"));
    }

    #[test]
    fn test_prune_at_threshold_is_noop() {
        let mut set: ProcessedSet = (0..1000).map(|i| format!("0x{i}")).collect();
        assert!(!set.prune(1000, 500));
        assert_eq!(set.len(), 1000);
    }

    #[test]
    fn test_duplicate_insert_keeps_first_position() {
        let mut set = ProcessedSet::new();
        set.insert("a");
        set.insert("b");
        set.insert("a");
        assert_eq!(set.iter().collect::<Vec<_>>(), vec!["a", "b"]);
    }

    #[test]
    fn test_serialization_preserves_order() {
        let set: ProcessedSet = ["c", "a", "b"].iter().map(ToString::to_string).collect();

        let json = serde_json::to_string(&set).unwrap();
        assert_eq!(json, r#"["c","a","b"]"#);

        let restored: ProcessedSet = serde_json::from_str(&json).unwrap();
        assert_eq!(restored, set);
    }

    #[test]
    fn test_cursor_document_format() {
        let json = r#"{"last_polled_time":"2025-02-20T12:00:00+00:00"}"#;
        let doc: CursorDocument = serde_json::from_str(json).unwrap();
        assert_eq!(doc.last_polled_time.to_rfc3339(), "2025-02-20T12:00:00+00:00");
    }
}
