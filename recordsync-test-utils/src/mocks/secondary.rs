//! Mock implementation of SecondaryStore for testing

use async_trait::async_trait;
use recordsync_core::error::{LookupError, WriteError};
use recordsync_core::{LookupResult, RecordId, SecondaryStore, WriteEntry, WriteResult};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use tokio::sync::watch;

/// A recorded `find` call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FindCall {
    pub ids: Vec<RecordId>,
    pub fields: Vec<String>,
    pub limit: usize,
}

/// Mock implementation of SecondaryStore for testing
///
/// Lookups answer from per-key scripted responses or errors. Completion
/// order can be forced with [`MockSecondaryStore::release_in_order`]: a
/// lookup for a listed key only completes once every key before it has
/// completed. Every listed key must actually be looked up, otherwise the
/// lookups queued behind it never complete.
pub struct MockSecondaryStore {
    behavior: Arc<Mutex<MockBehavior>>,
    find_calls: Arc<Mutex<Vec<FindCall>>>,
    write_calls: Arc<Mutex<Vec<Vec<WriteEntry>>>>,
    turn: watch::Sender<usize>,
}

#[derive(Debug, Clone, Default)]
struct MockBehavior {
    responses: HashMap<RecordId, Vec<LookupResult>>,
    failures: HashMap<RecordId, LookupError>,
    release_order: Vec<RecordId>,
    write_error: Option<WriteError>,
}

impl MockSecondaryStore {
    /// Create a mock store with no records; every lookup returns empty
    pub fn new() -> Self {
        let (turn, _) = watch::channel(0);
        Self {
            behavior: Arc::new(Mutex::new(MockBehavior::default())),
            find_calls: Arc::new(Mutex::new(Vec::new())),
            write_calls: Arc::new(Mutex::new(Vec::new())),
            turn,
        }
    }

    /// Respond to lookups of `key` with `records`
    pub fn expect_lookup(&self, key: &str, records: Vec<LookupResult>) {
        self.behavior
            .lock()
            .unwrap()
            .responses
            .insert(RecordId::new(key), records);
    }

    /// Fail lookups of `key` with `error`
    pub fn expect_lookup_error(&self, key: &str, error: LookupError) {
        self.behavior
            .lock()
            .unwrap()
            .failures
            .insert(RecordId::new(key), error);
    }

    /// Force lookups of the listed keys to complete in this order
    pub fn release_in_order(&self, keys: &[&str]) {
        self.behavior.lock().unwrap().release_order =
            keys.iter().map(|key| RecordId::new(*key)).collect();
        self.turn.send_replace(0);
    }

    /// Fail `batch_write` with `error`
    pub fn expect_write_error(&self, error: WriteError) {
        self.behavior.lock().unwrap().write_error = Some(error);
    }

    /// All recorded `find` calls
    pub fn find_calls(&self) -> Vec<FindCall> {
        self.find_calls.lock().unwrap().clone()
    }

    /// All recorded `batch_write` calls
    pub fn write_calls(&self) -> Vec<Vec<WriteEntry>> {
        self.write_calls.lock().unwrap().clone()
    }

    /// Number of recorded `batch_write` calls
    pub fn write_call_count(&self) -> usize {
        self.write_calls.lock().unwrap().len()
    }

    fn turn_for(&self, ids: &[RecordId]) -> Option<usize> {
        let behavior = self.behavior.lock().unwrap();
        ids.first()
            .and_then(|id| behavior.release_order.iter().position(|key| key == id))
    }
}

impl Default for MockSecondaryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SecondaryStore for MockSecondaryStore {
    async fn find(
        &self,
        ids: &[RecordId],
        fields: &[&str],
        limit: usize,
    ) -> Result<Vec<LookupResult>, LookupError> {
        self.find_calls.lock().unwrap().push(FindCall {
            ids: ids.to_vec(),
            fields: fields.iter().map(|f| f.to_string()).collect(),
            limit,
        });

        let turn = self.turn_for(ids);
        if let Some(turn) = turn {
            let mut rx = self.turn.subscribe();
            let _ = rx.wait_for(|current| *current >= turn).await;
        }

        let outcome = {
            let behavior = self.behavior.lock().unwrap();
            match ids.iter().find_map(|id| behavior.failures.get(id)) {
                Some(error) => Err(error.clone()),
                None => Ok(ids
                    .iter()
                    .filter_map(|id| behavior.responses.get(id))
                    .flatten()
                    .take(limit)
                    .cloned()
                    .collect()),
            }
        };

        if turn.is_some() {
            self.turn.send_modify(|current| *current += 1);
        }

        outcome
    }

    async fn batch_write(&self, entries: Vec<WriteEntry>) -> Result<Vec<WriteResult>, WriteError> {
        self.write_calls.lock().unwrap().push(entries.clone());

        let write_error = self.behavior.lock().unwrap().write_error.clone();
        if let Some(error) = write_error {
            return Err(error);
        }

        Ok(entries
            .into_iter()
            .map(|entry| WriteResult {
                record_id: entry.record_id,
                created: true,
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use recordsync_core::{EntityKind, Fields};

    fn account(key: &str) -> LookupResult {
        LookupResult::new(key, EntityKind::Account, Fields::new())
    }

    #[tokio::test]
    async fn test_scripted_lookup_and_limit() {
        let mock = MockSecondaryStore::new();
        mock.expect_lookup("A1", vec![account("A1"), account("A1")]);

        let found = mock.find(&[RecordId::new("A1")], &["Name"], 1).await.unwrap();

        assert_eq!(found.len(), 1);
        assert_eq!(
            mock.find_calls(),
            vec![FindCall {
                ids: vec![RecordId::new("A1")],
                fields: vec!["Name".to_string()],
                limit: 1,
            }]
        );
    }

    #[tokio::test]
    async fn test_lookup_error() {
        let mock = MockSecondaryStore::new();
        mock.expect_lookup_error("A1", LookupError::unavailable("down"));

        let err = mock.find(&[RecordId::new("A1")], &["Name"], 1).await.unwrap_err();
        assert!(matches!(err, LookupError::Unavailable { .. }));
    }

    #[tokio::test]
    async fn test_release_order_is_enforced() {
        let mock = Arc::new(MockSecondaryStore::new());
        mock.release_in_order(&["first", "second"]);
        let done = Arc::new(Mutex::new(Vec::new()));

        let second = {
            let (mock, done) = (mock.clone(), done.clone());
            tokio::spawn(async move {
                mock.find(&[RecordId::new("second")], &[], 1).await.unwrap();
                done.lock().unwrap().push("second");
            })
        };
        tokio::task::yield_now().await;
        let first = {
            let (mock, done) = (mock.clone(), done.clone());
            tokio::spawn(async move {
                mock.find(&[RecordId::new("first")], &[], 1).await.unwrap();
                done.lock().unwrap().push("first");
            })
        };

        second.await.unwrap();
        first.await.unwrap();

        assert_eq!(*done.lock().unwrap(), vec!["first", "second"]);
    }

    #[tokio::test]
    async fn test_write_error() {
        let mock = MockSecondaryStore::new();
        mock.expect_write_error(WriteError::rejected("nope"));

        let entry = WriteEntry {
            record_id: RecordId::new("R1"),
            payload: Fields::new(),
        };
        assert!(mock.batch_write(vec![entry]).await.is_err());
        assert_eq!(mock.write_call_count(), 1);
    }
}
