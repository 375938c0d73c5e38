//! In-memory store implementations
//!
//! Used by the CLI to run an orchestration against JSON fixtures, and by tests
//! that need real store semantics rather than scripted mocks.

use crate::error::{CreateError, LookupError, Result, WriteError};
use crate::store::{PrimaryStore, SecondaryStore};
use crate::types::{
    CreatedRecord, Fields, LookupResult, RawLookupRecord, RecordId, WriteEntry, WriteResult,
};
use async_trait::async_trait;
use log::{debug, warn};
use serde::Serialize;
use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::sync::RwLock;

/// Record held by [`MemoryPrimaryStore`]
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredRecord {
    pub object_type: String,
    pub fields: Fields,
}

/// Primary store that keeps created records in memory
pub struct MemoryPrimaryStore {
    records: Arc<RwLock<Vec<(RecordId, StoredRecord)>>>,
    next_id: AtomicU64,
    id_prefix: String,
}

impl MemoryPrimaryStore {
    /// Create an empty store issuing ids `R1`, `R2`, ...
    pub fn new() -> Self {
        Self::with_id_prefix("R")
    }

    /// Create an empty store issuing ids `{prefix}1`, `{prefix}2`, ...
    pub fn with_id_prefix(prefix: &str) -> Self {
        Self {
            records: Arc::new(RwLock::new(Vec::new())),
            next_id: AtomicU64::new(1),
            id_prefix: prefix.to_string(),
        }
    }

    /// All created records in creation order
    pub async fn records(&self) -> Vec<(RecordId, StoredRecord)> {
        self.records.read().await.clone()
    }

    pub async fn get(&self, id: &RecordId) -> Option<StoredRecord> {
        self.records
            .read()
            .await
            .iter()
            .find(|(record_id, _)| record_id == id)
            .map(|(_, record)| record.clone())
    }
}

impl Default for MemoryPrimaryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PrimaryStore for MemoryPrimaryStore {
    async fn create(
        &self,
        object_type: &str,
        fields: Fields,
    ) -> std::result::Result<CreatedRecord, CreateError> {
        if object_type.is_empty() {
            return Err(CreateError::rejected("object type is required"));
        }

        let n = self.next_id.fetch_add(1, Ordering::SeqCst);
        let id = RecordId::new(format!("{}{}", self.id_prefix, n));
        debug!("Creating {object_type} record {id}");

        self.records.write().await.push((
            id.clone(),
            StoredRecord {
                object_type: object_type.to_string(),
                fields,
            },
        ));

        Ok(CreatedRecord { id })
    }
}

/// Secondary store backed by in-memory lookup records and a write table
pub struct MemorySecondaryStore {
    records: Arc<RwLock<HashMap<RecordId, Vec<LookupResult>>>>,
    written: Arc<RwLock<HashMap<RecordId, Fields>>>,
}

impl MemorySecondaryStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self {
            records: Arc::new(RwLock::new(HashMap::new())),
            written: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Create a store seeded with typed lookup records
    pub fn with_records(records: impl IntoIterator<Item = LookupResult>) -> Self {
        let mut by_key: HashMap<RecordId, Vec<LookupResult>> = HashMap::new();
        for record in records {
            by_key.entry(record.key.clone()).or_default().push(record);
        }

        Self {
            records: Arc::new(RwLock::new(by_key)),
            written: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Create a store from wire records, dropping unrecognized entity tags
    pub fn from_raw_records(raw: Vec<RawLookupRecord>) -> Self {
        let records = raw.into_iter().filter_map(|record| {
            let key = record.key.clone();
            match LookupResult::try_from(record) {
                Ok(result) => Some(result),
                Err(e) => {
                    warn!("Dropping secondary record {key}: {e}");
                    None
                }
            }
        });
        Self::with_records(records)
    }

    /// Create a store from a JSON array of wire records
    pub fn from_json(json: &str) -> Result<Self> {
        let raw: Vec<RawLookupRecord> = serde_json::from_str(json)?;
        Ok(Self::from_raw_records(raw))
    }

    /// Payload written for a record id, if any
    pub async fn written(&self, id: &RecordId) -> Option<Fields> {
        self.written.read().await.get(id).cloned()
    }

    /// Number of records written so far
    pub async fn written_count(&self) -> usize {
        self.written.read().await.len()
    }
}

impl Default for MemorySecondaryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SecondaryStore for MemorySecondaryStore {
    async fn find(
        &self,
        ids: &[RecordId],
        fields: &[&str],
        limit: usize,
    ) -> std::result::Result<Vec<LookupResult>, LookupError> {
        let records = self.records.read().await;

        let found = ids
            .iter()
            .filter_map(|id| records.get(id))
            .flatten()
            .take(limit)
            .map(|record| LookupResult {
                key: record.key.clone(),
                entity_kind: record.entity_kind,
                payload: record
                    .payload
                    .iter()
                    .filter(|(name, _)| fields.contains(&name.as_str()))
                    .map(|(name, value)| (name.clone(), value.clone()))
                    .collect(),
            })
            .collect::<Vec<_>>();

        debug!(
            "find {ids:?} fields {fields:?} limit {limit}: {} record(s)",
            found.len()
        );
        Ok(found)
    }

    async fn batch_write(
        &self,
        entries: Vec<WriteEntry>,
    ) -> std::result::Result<Vec<WriteResult>, WriteError> {
        let mut written = self.written.write().await;

        let results = entries
            .into_iter()
            .map(|entry| {
                let created = written
                    .insert(entry.record_id.clone(), entry.payload)
                    .is_none();
                WriteResult {
                    record_id: entry.record_id,
                    created,
                }
            })
            .collect();

        Ok(results)
    }
}
