//! Draft state owned by a single orchestration
//!
//! Holds the [`DraftRecord`] destined for the primary store and the
//! [`EnrichedRecord`] shown to the user, together with the merge log the
//! enriched record was folded from.

use crate::merge::{self, Enrichment, MergeEvent};
use crate::types::{DraftRecord, EditableField, EnrichedRecord};

#[derive(Debug, Clone, Default)]
pub struct DraftState {
    draft: DraftRecord,
    enriched: EnrichedRecord,
    events: Vec<MergeEvent>,
}

impl DraftState {
    pub fn new(draft: DraftRecord) -> Self {
        Self {
            draft,
            enriched: EnrichedRecord::default(),
            events: Vec::new(),
        }
    }

    pub fn draft(&self) -> &DraftRecord {
        &self.draft
    }

    pub fn enriched(&self) -> &EnrichedRecord {
        &self.enriched
    }

    /// Events applied so far, in arrival order
    pub fn events(&self) -> &[MergeEvent] {
        &self.events
    }

    /// Merge a lookup enrichment into the enriched record
    pub fn merge(&mut self, enrichment: Enrichment) {
        self.record(MergeEvent::Enriched(enrichment));
    }

    /// Apply a user edit to both records in lock-step
    pub fn edit(&mut self, field: EditableField, value: impl Into<String>) {
        let value = value.into();
        match field {
            EditableField::Subject => self.draft.subject = Some(value.clone()),
            EditableField::Description => self.draft.description = Some(value.clone()),
        }
        self.record(MergeEvent::Edited(field, value));
    }

    fn record(&mut self, event: MergeEvent) {
        merge::apply(&mut self.enriched, &event);
        self.events.push(event);
    }
}
