//! Store trait definitions
//!
//! Integration adapters implement these traits; the orchestrator only ever
//! talks to `Arc<dyn PrimaryStore>` and `Arc<dyn SecondaryStore>`.

use crate::error::{CreateError, LookupError, WriteError};
use crate::types::{CreatedRecord, Fields, LookupResult, RecordId, WriteEntry, WriteResult};
use async_trait::async_trait;

/// System of record where the case is created
#[async_trait]
pub trait PrimaryStore: Send + Sync {
    /// Create one record of `object_type` with the given field values
    ///
    /// Fails with [`CreateError`] on validation or connectivity failure.
    async fn create(
        &self,
        object_type: &str,
        fields: Fields,
    ) -> Result<CreatedRecord, CreateError>;
}

/// External lookup/write store consulted for enrichment and write-back
#[async_trait]
pub trait SecondaryStore: Send + Sync {
    /// Point lookup of up to `limit` records among `ids`
    ///
    /// Only `fields` are requested in each payload. An empty result is not an
    /// error.
    async fn find(
        &self,
        ids: &[RecordId],
        fields: &[&str],
        limit: usize,
    ) -> Result<Vec<LookupResult>, LookupError>;

    /// Write a batch of records, one result per entry
    async fn batch_write(&self, entries: Vec<WriteEntry>) -> Result<Vec<WriteResult>, WriteError>;
}
