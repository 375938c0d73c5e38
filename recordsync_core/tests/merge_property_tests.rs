//! Property tests for the merge fold and the create request

use proptest::prelude::*;
use recordsync_core::merge::{self, Enrichment, MergeEvent};
use recordsync_core::{
    DraftState, EditableField, InitParams, MemoryPrimaryStore, MemorySecondaryStore,
    OrchestratorConfig, RecordSyncOrchestrator,
};
use recordsync_test_utils::ParamsBuilder;
use std::sync::Arc;

fn text() -> impl Strategy<Value = Option<String>> {
    proptest::option::of("[A-Za-z ]{0,12}")
}

fn enrichment() -> impl Strategy<Value = Enrichment> {
    prop_oneof![
        (text(), text()).prop_map(|(first_name, last_name)| Enrichment::Contact {
            first_name,
            last_name
        }),
        "[A-Za-z ]{0,12}".prop_map(|name| Enrichment::Account { name }),
        "[A-Za-z ]{0,12}".prop_map(|description| Enrichment::Case { description }),
    ]
}

fn editable_field() -> impl Strategy<Value = EditableField> {
    prop_oneof![Just(EditableField::Subject), Just(EditableField::Description)]
}

fn event() -> impl Strategy<Value = MergeEvent> {
    prop_oneof![
        enrichment().prop_map(MergeEvent::Enriched),
        (editable_field(), "[a-z]{0,8}").prop_map(|(field, value)| MergeEvent::Edited(field, value)),
    ]
}

fn params() -> impl Strategy<Value = InitParams> {
    (
        proptest::option::of("[A-Z][0-9]{1,3}"),
        proptest::option::of("[A-Z][0-9]{1,3}"),
        proptest::option::of("[A-Z][0-9]{1,3}"),
        proptest::option::of("[a-z ]{0,16}"),
        proptest::option::of("[A-Za-z]{1,10}"),
    )
        .prop_map(|(parent, account, contact, description, country)| {
            let mut builder = ParamsBuilder::new();
            if let Some(id) = parent {
                builder = builder.parent_id(&id);
            }
            if let Some(id) = account {
                builder = builder.account_id(&id);
            }
            if let Some(id) = contact {
                builder = builder.contact_id(&id);
            }
            if let Some(text) = description {
                builder = builder.description(&text);
            }
            if let Some(country) = country {
                builder = builder.field("CountryOrigin__c", country);
            }
            builder.build()
        })
}

proptest! {
    #[test]
    fn test_repeated_edit_is_idempotent(
        history in proptest::collection::vec(event(), 0..8),
        field in editable_field(),
        value in "[a-z]{0,8}",
    ) {
        let mut once = DraftState::default();
        let mut twice = DraftState::default();
        for event in &history {
            match event {
                MergeEvent::Enriched(e) => {
                    once.merge(e.clone());
                    twice.merge(e.clone());
                }
                MergeEvent::Edited(f, v) => {
                    once.edit(*f, v.clone());
                    twice.edit(*f, v.clone());
                }
            }
        }

        once.edit(field, value.clone());
        twice.edit(field, value.clone());
        twice.edit(field, value);

        prop_assert_eq!(once.draft(), twice.draft());
        prop_assert_eq!(once.enriched(), twice.enriched());
    }

    #[test]
    fn test_enrichment_touches_only_its_own_field(
        history in proptest::collection::vec(event(), 0..8),
        enrichment in enrichment(),
    ) {
        let before = merge::replay(&history);
        let mut after = before.clone();
        merge::apply(&mut after, &MergeEvent::Enriched(enrichment.clone()));

        prop_assert_eq!(&before.subject, &after.subject);
        match enrichment {
            Enrichment::Contact { .. } => {
                prop_assert_eq!(&before.account_name, &after.account_name);
                prop_assert_eq!(&before.description, &after.description);
            }
            Enrichment::Account { .. } => {
                prop_assert_eq!(&before.contact_name, &after.contact_name);
                prop_assert_eq!(&before.description, &after.description);
            }
            Enrichment::Case { .. } => {
                prop_assert_eq!(&before.contact_name, &after.contact_name);
                prop_assert_eq!(&before.account_name, &after.account_name);
            }
        }
    }

    #[test]
    fn test_last_description_event_decides(
        history in proptest::collection::vec(event(), 1..12),
    ) {
        let expected = history.iter().rev().find_map(|event| match event {
            MergeEvent::Enriched(Enrichment::Case { description }) => Some(description.clone()),
            MergeEvent::Edited(EditableField::Description, value) => Some(value.clone()),
            _ => None,
        });

        let record = merge::replay(&history);
        prop_assert_eq!(record.description, expected);
    }

    #[test]
    fn test_create_request_follows_draft(params in params(), subject in "[a-z]{1,8}") {
        let runtime = tokio::runtime::Runtime::new().unwrap();
        let primary = Arc::new(MemoryPrimaryStore::new());
        let mut orchestrator = RecordSyncOrchestrator::new(
            primary.clone(),
            Arc::new(MemorySecondaryStore::new()),
            OrchestratorConfig::default(),
        )
        .unwrap();

        orchestrator.initialize(Some(&params)).unwrap();
        orchestrator.on_field_edit("subject", subject.clone());
        let outcome = runtime.block_on(orchestrator.submit());
        let record_id = outcome.record_id().unwrap().clone();
        let stored = runtime.block_on(primary.get(&record_id)).unwrap();

        prop_assert_eq!(stored.object_type.as_str(), "Case");
        prop_assert_eq!(&stored.fields["CountryOrigin__c"], "China");
        prop_assert_eq!(&stored.fields["Subject"], subject.as_str());
        prop_assert_eq!(
            stored.fields["Description"].as_str().map(str::to_string),
            params.text("Description")
        );
        prop_assert_eq!(
            stored.fields["ContactId"].as_str().map(str::to_string),
            params.text("ContactId")
        );
        prop_assert_eq!(
            stored.fields["AccountId"].as_str().map(str::to_string),
            params.text("AccountId")
        );
    }
}
