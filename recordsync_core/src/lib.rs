//! Record Sync Core Library
//!
//! This is the core library for the record sync workflow: a draft is filled
//! from initial parameters, enriched by concurrent secondary store lookups,
//! edited by the user, created in the primary store and finally written back
//! to the secondary store under the new record id.

pub mod draft;
pub mod error;
pub mod fields;
pub mod memory;
pub mod merge;
pub mod orchestrator;
pub mod store;
pub mod types;

// Re-export main types
pub use draft::DraftState;
pub use error::{Error, Result};
pub use memory::{MemoryPrimaryStore, MemorySecondaryStore};
pub use merge::{Enrichment, MergeEvent};
pub use orchestrator::{LookupCompletion, RecordSyncOrchestrator, SubmitOutcome};
pub use store::{PrimaryStore, SecondaryStore};
pub use types::{
    CreatedRecord, DraftRecord, EditableField, EnrichedRecord, EntityKind, Fields, InitParams,
    LookupResult, LookupRole, RawLookupRecord, RecordId, WriteEntry, WriteResult,
};

use error::ValidationError;

/// Orchestrator configuration
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct OrchestratorConfig {
    /// Object type created in the primary store
    pub object_type: String,
    /// Maximum records requested per lookup
    pub lookup_limit: usize,
    /// Whether the form starts visible
    pub open_modal: bool,
}

impl Default for OrchestratorConfig {
    fn default() -> Self {
        Self {
            object_type: fields::CASE_OBJECT.to_string(),
            lookup_limit: 1,
            open_modal: false,
        }
    }
}

impl OrchestratorConfig {
    /// Check the configuration is usable
    pub fn validate(&self) -> std::result::Result<(), ValidationError> {
        if self.object_type.trim().is_empty() {
            return Err(ValidationError::invalid_configuration(
                "object_type must not be empty",
            ));
        }
        if self.lookup_limit == 0 {
            return Err(ValidationError::invalid_configuration(
                "lookup_limit must be at least 1",
            ));
        }
        Ok(())
    }
}
