//! Ephemeral analysis store.
//!
//! Process-lifetime only — a real deployment swaps in a durable backing store
//! behind the same `AnalysisStore` interface. Append-only; records are never
//! updated, and reads preserve insertion order.

use std::sync::RwLock;

use chrono::Utc;
use uuid::Uuid;

use crate::models::{NewAnalysisRecord, StoredAnalysisRecord};

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("Store lock poisoned")]
    LockFailed,
}

/// Storage abstraction: append one record, query by substring.
pub trait AnalysisStore: Send + Sync {
    fn append(&self, record: NewAnalysisRecord) -> Result<StoredAnalysisRecord, StoreError>;

    /// Case-insensitive substring match against diagnosis text and each
    /// recommendation string. Returns matches in insertion order.
    fn search(&self, query: &str) -> Result<Vec<StoredAnalysisRecord>, StoreError>;
}

/// In-memory store backed by RwLock. Supports concurrent append and read.
pub struct InMemoryStore {
    records: RwLock<Vec<StoredAnalysisRecord>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self {
            records: RwLock::new(Vec::new()),
        }
    }
}

impl Default for InMemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl AnalysisStore for InMemoryStore {
    fn append(&self, record: NewAnalysisRecord) -> Result<StoredAnalysisRecord, StoreError> {
        let stored = StoredAnalysisRecord {
            id: Uuid::new_v4(),
            diagnosis: record.diagnosis,
            confidence: record.confidence,
            recommendations: record.recommendations,
            image_url: record.image_url,
            created_at: Utc::now(),
        };

        let mut records = self.records.write().map_err(|_| StoreError::LockFailed)?;
        records.push(stored.clone());
        Ok(stored)
    }

    fn search(&self, query: &str) -> Result<Vec<StoredAnalysisRecord>, StoreError> {
        let needle = query.to_lowercase();
        let records = self.records.read().map_err(|_| StoreError::LockFailed)?;

        Ok(records
            .iter()
            .filter(|r| {
                r.diagnosis.to_lowercase().contains(&needle)
                    || r.recommendations
                        .iter()
                        .any(|rec| rec.to_lowercase().contains(&needle))
            })
            .cloned()
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    fn record(diagnosis: &str, recommendations: &[&str]) -> NewAnalysisRecord {
        NewAnalysisRecord {
            diagnosis: diagnosis.to_string(),
            confidence: None,
            recommendations: recommendations.iter().map(|r| r.to_string()).collect(),
            image_url: None,
        }
    }

    #[test]
    fn append_assigns_id_and_timestamp() {
        let store = InMemoryStore::new();
        let stored = store.append(record("leaf blight", &[])).unwrap();
        assert!(!stored.id.is_nil());
        assert_eq!(stored.diagnosis, "leaf blight");
    }

    #[test]
    fn search_matches_recommendations_and_is_case_insensitive() {
        let store = InMemoryStore::new();
        store.append(record("leaf blight", &[])).unwrap();
        store
            .append(record("root rot", &["use fungicide"]))
            .unwrap();

        let by_recommendation = store.search("fungicide").unwrap();
        assert_eq!(by_recommendation.len(), 1);
        assert_eq!(by_recommendation[0].diagnosis, "root rot");

        let by_diagnosis = store.search("LEAF").unwrap();
        assert_eq!(by_diagnosis.len(), 1);
        assert_eq!(by_diagnosis[0].diagnosis, "leaf blight");
    }

    #[test]
    fn search_preserves_insertion_order() {
        let store = InMemoryStore::new();
        store.append(record("blight on maize", &[])).unwrap();
        store.append(record("blight on tomato", &[])).unwrap();

        let results = store.search("blight").unwrap();
        assert_eq!(results.len(), 2);
        assert_eq!(results[0].diagnosis, "blight on maize");
        assert_eq!(results[1].diagnosis, "blight on tomato");
    }

    #[test]
    fn no_match_returns_empty() {
        let store = InMemoryStore::new();
        store.append(record("leaf blight", &[])).unwrap();
        assert!(store.search("aphids").unwrap().is_empty());
    }

    #[test]
    fn concurrent_appends_are_both_visible() {
        let store = Arc::new(InMemoryStore::new());

        let a = {
            let store = Arc::clone(&store);
            std::thread::spawn(move || store.append(record("writer a", &[])).unwrap())
        };
        let b = {
            let store = Arc::clone(&store);
            std::thread::spawn(move || store.append(record("writer b", &[])).unwrap())
        };
        a.join().unwrap();
        b.join().unwrap();

        let results = store.search("writer").unwrap();
        assert_eq!(results.len(), 2);
    }
}
