//! Record sync orchestrator
//!
//! Drives one form session: initialize → concurrent lookups → merge → user
//! edits → create in the primary store → write-back to the secondary store.
//!
//! The orchestrator is a single cooperative task. Lookups are issued together
//! and held in a [`FuturesUnordered`]; each completion is merged into the
//! [`DraftState`] in the order it completes, with no ordering between lookups.
//! Two `Case` results therefore race: the one completing last decides the
//! enriched `Description`.

use crate::OrchestratorConfig;
use crate::draft::DraftState;
use crate::error::{CreateError, LookupError, Result, WriteError};
use crate::fields;
use crate::merge::{Enrichment, MergeEvent};
use crate::store::{PrimaryStore, SecondaryStore};
use crate::types::{
    CreatedRecord, DraftRecord, EditableField, EnrichedRecord, Fields, InitParams, LookupResult,
    LookupRole, RecordId, WriteEntry, WriteResult,
};
use futures::future::{BoxFuture, FutureExt};
use futures::stream::{FuturesUnordered, StreamExt};
use log::{debug, error, info, warn};
use serde_json::Value;
use std::sync::Arc;

/// Completed secondary store lookup, not yet merged
#[derive(Debug)]
pub struct LookupCompletion {
    pub role: LookupRole,
    pub key: RecordId,
    pub result: std::result::Result<Vec<LookupResult>, LookupError>,
}

impl LookupCompletion {
    /// Merge every returned record by entity kind; failures are logged only
    ///
    /// Records without any field of their kind are skipped.
    fn merge_into(self, state: &mut DraftState) {
        match self.result {
            Ok(records) => {
                if records.is_empty() {
                    debug!(
                        "Lookup by {} {} returned no records",
                        self.role.field_name(),
                        self.key
                    );
                }
                for record in &records {
                    let Some(enrichment) = Enrichment::from_lookup(record) else {
                        debug!(
                            "Skipping {} record {} from {} lookup: no {} fields",
                            record.entity_kind,
                            record.key,
                            self.role.field_name(),
                            record.entity_kind
                        );
                        continue;
                    };
                    debug!(
                        "Merging {} record {} from {} lookup",
                        record.entity_kind,
                        record.key,
                        self.role.field_name()
                    );
                    state.merge(enrichment);
                }
            }
            Err(e) => {
                error!(
                    "Lookup by {} {} failed: {e}",
                    self.role.field_name(),
                    self.key
                );
            }
        }
    }
}

/// How far a submit got
#[derive(Debug, Clone, PartialEq)]
pub enum SubmitOutcome {
    /// The primary store did not create the record; nothing was written back
    CreateFailed(CreateError),
    /// The record exists but the write-back failed
    WriteBackFailed {
        record_id: RecordId,
        error: WriteError,
    },
    /// Record created and written back
    Completed {
        record_id: RecordId,
        results: Vec<WriteResult>,
    },
    /// A record was already created in this session; nothing was sent
    AlreadySubmitted { record_id: RecordId },
}

impl SubmitOutcome {
    /// Id of the primary record, when one exists
    pub fn record_id(&self) -> Option<&RecordId> {
        match self {
            Self::CreateFailed(_) => None,
            Self::WriteBackFailed { record_id, .. }
            | Self::Completed { record_id, .. }
            | Self::AlreadySubmitted { record_id } => Some(record_id),
        }
    }
}

type PendingLookup = BoxFuture<'static, LookupCompletion>;

/// Orchestrates one record sync session over a primary and a secondary store
pub struct RecordSyncOrchestrator {
    primary: Arc<dyn PrimaryStore>,
    secondary: Arc<dyn SecondaryStore>,
    config: OrchestratorConfig,
    state: DraftState,
    pending: FuturesUnordered<PendingLookup>,
    created: Option<CreatedRecord>,
    written_back: bool,
    modal_open: bool,
}

impl RecordSyncOrchestrator {
    /// Create a new orchestrator
    pub fn new(
        primary: Arc<dyn PrimaryStore>,
        secondary: Arc<dyn SecondaryStore>,
        config: OrchestratorConfig,
    ) -> Result<Self> {
        config.validate()?;
        debug!("Creating record sync orchestrator with config: {config:?}");

        let modal_open = config.open_modal;
        Ok(Self {
            primary,
            secondary,
            config,
            state: DraftState::default(),
            pending: FuturesUnordered::new(),
            created: None,
            written_back: false,
            modal_open,
        })
    }

    pub fn draft(&self) -> &DraftRecord {
        self.state.draft()
    }

    pub fn enriched(&self) -> &EnrichedRecord {
        self.state.enriched()
    }

    /// Merge log the enriched record was folded from
    pub fn events(&self) -> &[MergeEvent] {
        self.state.events()
    }

    pub fn created(&self) -> Option<&CreatedRecord> {
        self.created.as_ref()
    }

    pub fn is_modal_open(&self) -> bool {
        self.modal_open
    }

    /// Number of lookups still in flight
    pub fn pending_lookups(&self) -> usize {
        self.pending.len()
    }

    /// Populate the draft from `params` and issue the lookups
    ///
    /// Absent `params` is a no-op. Re-initializing starts a fresh session:
    /// the previous draft, enrichments, in-flight lookups and created record
    /// are discarded.
    pub fn initialize(&mut self, params: Option<&InitParams>) -> Result<()> {
        let Some(params) = params else {
            debug!("initialize called without params, nothing to do");
            return Ok(());
        };

        let draft = DraftRecord::from_params(params)?;
        debug!("Initialized draft: {draft:?}");

        self.state = DraftState::new(draft);
        self.pending = FuturesUnordered::new();
        self.created = None;
        self.written_back = false;

        self.find_in_country();
        Ok(())
    }

    /// Issue one `find` per draft identifier, all in flight together
    fn find_in_country(&mut self) {
        for role in LookupRole::ALL {
            let Some(key) = role.key(self.state.draft()).cloned() else {
                debug!("No {} on draft, skipping lookup", role.field_name());
                continue;
            };

            debug!(
                "Looking up {} {key} with fields {:?}",
                role.field_name(),
                role.requested_fields()
            );

            let store = Arc::clone(&self.secondary);
            let limit = self.config.lookup_limit;
            let lookup = async move {
                let result = store
                    .find(std::slice::from_ref(&key), role.requested_fields(), limit)
                    .await;
                LookupCompletion { role, key, result }
            };
            self.pending.push(lookup.boxed());
        }
    }

    /// Wait for the next lookup to complete and merge it
    ///
    /// Returns the role of the completed lookup, or `None` when nothing is in
    /// flight.
    pub async fn next_lookup(&mut self) -> Option<LookupRole> {
        let completion = self.pending.next().await?;
        let role = completion.role;
        completion.merge_into(&mut self.state);
        Some(role)
    }

    /// Wait for every in-flight lookup, merging each as it completes
    pub async fn settle_lookups(&mut self) {
        while self.next_lookup().await.is_some() {}
    }

    /// Route a form edit into the draft and the enriched record
    ///
    /// Only `subject` and `description` are recognized; anything else is
    /// ignored. Returns whether the edit was applied.
    pub fn on_field_edit(&mut self, field_id: &str, value: impl Into<String>) -> bool {
        match EditableField::from_field_id(field_id) {
            Some(field) => {
                self.state.edit(field, value);
                true
            }
            None => {
                debug!("Ignoring edit for unrecognized field '{field_id}'");
                false
            }
        }
    }

    /// Create the record in the primary store, then write back on success
    ///
    /// Lookups still in flight keep merging while the create is pending.
    pub async fn submit(&mut self) -> SubmitOutcome {
        if let Some(created) = &self.created {
            warn!(
                "Record {} already created in this session, ignoring submit",
                created.id
            );
            return SubmitOutcome::AlreadySubmitted {
                record_id: created.id.clone(),
            };
        }

        let object_type = self.config.object_type.clone();
        let values = self.create_fields();
        debug!("Creating {object_type} with fields: {values:?}");

        let primary = Arc::clone(&self.primary);
        let mut create = primary.create(&object_type, values);

        let created = loop {
            tokio::select! {
                result = &mut create => break result,
                Some(completion) = self.pending.next(), if !self.pending.is_empty() => {
                    completion.merge_into(&mut self.state);
                }
            }
        };

        match created {
            Ok(created) => {
                info!("New {object_type} record id: {}", created.id);
                self.on_record_created(created).await
            }
            Err(e) => {
                error!("Failed to create {object_type} record: {e}");
                SubmitOutcome::CreateFailed(e)
            }
        }
    }

    /// Submit, then close the form
    pub async fn save(&mut self) -> SubmitOutcome {
        let outcome = self.submit().await;
        self.close();
        outcome
    }

    /// Hide the form; data is left untouched
    pub fn close(&mut self) {
        self.modal_open = false;
    }

    /// The created id has arrived: record it and trigger the write-back
    async fn on_record_created(&mut self, created: CreatedRecord) -> SubmitOutcome {
        let record_id = created.id.clone();
        self.created = Some(created);

        match self.write_in_country().await {
            Some(Ok(results)) => SubmitOutcome::Completed { record_id, results },
            Some(Err(error)) => SubmitOutcome::WriteBackFailed { record_id, error },
            None => SubmitOutcome::AlreadySubmitted { record_id },
        }
    }

    /// Send the consolidated record to the secondary store
    ///
    /// Gated on a created id and sent at most once per session. Returns `None`
    /// when nothing was sent.
    async fn write_in_country(
        &mut self,
    ) -> Option<std::result::Result<Vec<WriteResult>, WriteError>> {
        let Some(record_id) = self.created.as_ref().map(|c| c.id.clone()) else {
            debug!("No created record yet, write-back not triggered");
            return None;
        };
        if self.written_back {
            return None;
        }
        self.written_back = true;

        let entry = WriteEntry {
            record_id,
            payload: self.write_back_payload(),
        };
        debug!("Writing back: {entry:?}");

        let result = self.secondary.batch_write(vec![entry]).await;
        match &result {
            Ok(results) => info!("Write-back response: {results:?}"),
            Err(e) => error!("Write-back failed: {e}"),
        }
        Some(result)
    }

    /// Fields sent to `PrimaryStore::create`
    fn create_fields(&self) -> Fields {
        let draft = self.state.draft();

        let mut values = Fields::new();
        values.insert(
            fields::CONTACT_ID.to_string(),
            id_value(draft.contact_id.as_ref()),
        );
        values.insert(
            fields::ACCOUNT_ID.to_string(),
            id_value(draft.account_id.as_ref()),
        );
        values.insert(
            fields::SUBJECT.to_string(),
            text_value(draft.subject.as_deref()),
        );
        values.insert(
            fields::DESCRIPTION.to_string(),
            text_value(draft.description.as_deref()),
        );
        values.insert(
            fields::COUNTRY_ORIGIN.to_string(),
            Value::from(fields::DEFAULT_COUNTRY_ORIGIN),
        );
        values
    }

    /// Write-back payload: ids and subject from the draft, description from
    /// the enriched record
    fn write_back_payload(&self) -> Fields {
        let draft = self.state.draft();
        let enriched = self.state.enriched();

        let mut payload = Fields::new();
        payload.insert(
            fields::ACCOUNT_ID.to_string(),
            id_value(draft.account_id.as_ref()),
        );
        payload.insert(
            fields::CONTACT_ID.to_string(),
            id_value(draft.contact_id.as_ref()),
        );
        payload.insert(
            fields::SUBJECT.to_string(),
            text_value(draft.subject.as_deref()),
        );
        payload.insert(
            fields::DESCRIPTION.to_string(),
            text_value(enriched.description.as_deref()),
        );
        payload
    }
}

fn id_value(id: Option<&RecordId>) -> Value {
    text_value(id.map(RecordId::as_str))
}

fn text_value(text: Option<&str>) -> Value {
    text.map_or(Value::Null, Value::from)
}
