//! Merge policy for secondary store lookups
//!
//! Each [`LookupResult`] is decoded into an [`Enrichment`] and applied to
//! exactly one field of the [`EnrichedRecord`]:
//!
//! - Contact → `ContactName` (`"{FirstName} {LastName}"`)
//! - Account → `AccountName`
//! - Case → `Description`, overwriting whatever was there
//!
//! A result carrying none of its kind's fields is not an enrichment. With
//! equal identifiers the same record comes back to a lookup that requested
//! another kind's fields, and that empty payload must not clear anything.
//!
//! The enriched record is always the left fold of an ordered event log, so the
//! outcome of racing lookups and edits can be replayed for any interleaving.

use crate::fields;
use crate::types::{EditableField, EnrichedRecord, EntityKind, LookupResult};
use serde::{Deserialize, Serialize};

/// Typed enrichment payload, one variant per entity kind
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Enrichment {
    Contact {
        first_name: Option<String>,
        last_name: Option<String>,
    },
    Account {
        name: String,
    },
    Case {
        description: String,
    },
}

impl Enrichment {
    /// Decode a lookup result by its entity kind
    ///
    /// Returns `None` when the payload holds none of the fields that kind
    /// merges into.
    pub fn from_lookup(result: &LookupResult) -> Option<Self> {
        match result.entity_kind {
            EntityKind::Contact => {
                let first_name = result.text(fields::CONTACT_FIRST_NAME);
                let last_name = result.text(fields::CONTACT_LAST_NAME);
                if first_name.is_none() && last_name.is_none() {
                    return None;
                }
                Some(Self::Contact {
                    first_name,
                    last_name,
                })
            }
            EntityKind::Account => result
                .text(fields::ACCOUNT_NAME)
                .map(|name| Self::Account { name }),
            EntityKind::Case => result
                .text(fields::DESCRIPTION)
                .map(|description| Self::Case { description }),
        }
    }
}

/// One entry of the merge log
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum MergeEvent {
    /// A lookup result arrived
    Enriched(Enrichment),
    /// The user edited a field
    Edited(EditableField, String),
}

/// Apply one event to an enriched record
pub fn apply(record: &mut EnrichedRecord, event: &MergeEvent) {
    match event {
        MergeEvent::Enriched(Enrichment::Contact {
            first_name,
            last_name,
        }) => {
            record.contact_name = Some(format!(
                "{} {}",
                first_name.as_deref().unwrap_or_default(),
                last_name.as_deref().unwrap_or_default()
            ));
        }
        MergeEvent::Enriched(Enrichment::Account { name }) => {
            record.account_name = Some(name.clone());
        }
        MergeEvent::Enriched(Enrichment::Case { description }) => {
            record.description = Some(description.clone());
        }
        MergeEvent::Edited(EditableField::Subject, value) => {
            record.subject = Some(value.clone());
        }
        MergeEvent::Edited(EditableField::Description, value) => {
            record.description = Some(value.clone());
        }
    }
}

/// Fold an ordered event log into an enriched record
pub fn replay<'a>(events: impl IntoIterator<Item = &'a MergeEvent>) -> EnrichedRecord {
    events
        .into_iter()
        .fold(EnrichedRecord::default(), |mut record, event| {
            apply(&mut record, event);
            record
        })
}
