//! Process-wide participant history, replaced wholesale per join and read through snapshots.

use std::sync::Arc;

use indexmap::IndexMap;
use tokio::sync::RwLock;

use crate::state::game::ParticipantRecord;

type Records = IndexMap<String, Arc<ParticipantRecord>>;

/// Copy-on-write store of participant records keyed by provider id.
///
/// Writers clone the map, apply their change, and swap it in under the write lock, so a round
/// always observes either the state before a join or the state after it.
#[derive(Debug, Default)]
pub struct HistoryStore {
    records: RwLock<Arc<Records>>,
}

impl HistoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace the record for `record.id`.
    ///
    /// A re-join keeps the participant's original position in iteration order but discards
    /// their previous history. Returns `true` when an existing record was replaced.
    pub async fn put(&self, record: ParticipantRecord) -> bool {
        let mut guard = self.records.write().await;
        let mut next = Records::clone(&guard);
        let replaced = next
            .insert(record.id.clone(), Arc::new(record))
            .is_some();
        *guard = Arc::new(next);
        replaced
    }

    /// Immutable view of the current records for one round of generation.
    pub async fn snapshot(&self) -> HistorySnapshot {
        let guard = self.records.read().await;
        HistorySnapshot {
            records: Arc::clone(&guard),
        }
    }

    /// Drop every participant, returning how many were removed.
    pub async fn clear(&self) -> usize {
        let mut guard = self.records.write().await;
        let removed = guard.len();
        *guard = Arc::new(Records::new());
        removed
    }
}

/// Read-only set of participants in first-join order.
#[derive(Debug, Clone, Default)]
pub struct HistorySnapshot {
    records: Arc<Records>,
}

impl HistorySnapshot {
    /// Build a snapshot directly from records; later duplicates replace earlier ones in place.
    pub fn from_records(records: impl IntoIterator<Item = ParticipantRecord>) -> Self {
        let records = records
            .into_iter()
            .map(|record| (record.id.clone(), Arc::new(record)))
            .collect();
        Self {
            records: Arc::new(records),
        }
    }

    /// Iterate participants in snapshot order.
    pub fn iter(&self) -> impl Iterator<Item = &ParticipantRecord> {
        self.records.values().map(Arc::as_ref)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Display names in snapshot order, used as answer options.
    pub fn display_names(&self) -> Vec<String> {
        self.iter()
            .map(|record| record.display_name.clone())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(id: &str, name: &str) -> ParticipantRecord {
        ParticipantRecord::new(id.into(), Some(name.into()), vec![], vec![])
    }

    #[tokio::test]
    async fn put_replaces_wholesale_and_keeps_order() {
        let store = HistoryStore::new();
        assert!(!store.put(record("a", "Ada")).await);
        assert!(!store.put(record("b", "Bob")).await);
        assert!(store.put(record("a", "Ada Again")).await);

        let snapshot = store.snapshot().await;
        assert_eq!(snapshot.len(), 2);
        assert_eq!(snapshot.display_names(), vec!["Ada Again", "Bob"]);
    }

    #[tokio::test]
    async fn snapshot_is_isolated_from_later_joins() {
        let store = HistoryStore::new();
        store.put(record("a", "Ada")).await;
        let before = store.snapshot().await;

        store.put(record("b", "Bob")).await;
        store.put(record("a", "Renamed")).await;

        assert_eq!(before.display_names(), vec!["Ada"]);
        assert_eq!(
            store.snapshot().await.display_names(),
            vec!["Renamed", "Bob"]
        );
    }

    #[tokio::test]
    async fn clear_empties_the_store() {
        let store = HistoryStore::new();
        store.put(record("a", "Ada")).await;
        store.put(record("b", "Bob")).await;

        assert_eq!(store.clear().await, 2);
        assert!(store.snapshot().await.is_empty());
    }

    #[tokio::test]
    async fn concurrent_joins_are_all_visible() {
        let store = Arc::new(HistoryStore::new());
        let handles = (0..16)
            .map(|i| {
                let store = Arc::clone(&store);
                tokio::spawn(async move {
                    store
                        .put(record(&format!("user-{i}"), &format!("User {i}")))
                        .await
                })
            })
            .collect::<Vec<_>>();
        for handle in handles {
            handle.await.unwrap();
        }

        assert_eq!(store.snapshot().await.len(), 16);
    }
}
