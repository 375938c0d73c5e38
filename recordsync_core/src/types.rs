//! Data types exchanged with the stores and held by the orchestrator
//!
//! Wire-facing types serialize with the API field names used by both stores
//! (`ParentId`, `recordId`, `service_key5`, ...).

use crate::error::{LookupError, ValidationError};
use crate::fields;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// Field name to value mapping used for every store payload
pub type Fields = BTreeMap<String, Value>;

/// Opaque record identifier
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecordId(String);

impl RecordId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for RecordId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for RecordId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

/// Kind of entity a secondary store record describes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EntityKind {
    Contact,
    Account,
    Case,
}

impl EntityKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Contact => "Contact",
            Self::Account => "Account",
            Self::Case => "Case",
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EntityKind {
    type Err = LookupError;

    fn from_str(tag: &str) -> Result<Self, Self::Err> {
        match tag {
            "Contact" => Ok(Self::Contact),
            "Account" => Ok(Self::Account),
            "Case" => Ok(Self::Case),
            other => Err(LookupError::unrecognized_kind(other)),
        }
    }
}

/// A single record returned by `SecondaryStore::find`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LookupResult {
    pub key: RecordId,
    #[serde(rename = "service_key5")]
    pub entity_kind: EntityKind,
    #[serde(default)]
    pub payload: Fields,
}

impl LookupResult {
    pub fn new(key: impl Into<RecordId>, entity_kind: EntityKind, payload: Fields) -> Self {
        Self {
            key: key.into(),
            entity_kind,
            payload,
        }
    }

    /// String value of a payload field, if present and non-null
    pub fn text(&self, field: &str) -> Option<String> {
        value_to_text(self.payload.get(field)?)
    }
}

/// Secondary store record as it appears on the wire, tag not yet checked
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawLookupRecord {
    pub key: RecordId,
    pub service_key5: String,
    #[serde(default)]
    pub payload: Fields,
}

impl TryFrom<RawLookupRecord> for LookupResult {
    type Error = LookupError;

    fn try_from(raw: RawLookupRecord) -> Result<Self, Self::Error> {
        let entity_kind = raw.service_key5.parse()?;
        Ok(Self {
            key: raw.key,
            entity_kind,
            payload: raw.payload,
        })
    }
}

/// Record produced by `PrimaryStore::create`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreatedRecord {
    pub id: RecordId,
}

/// One entry of a secondary store batch write
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WriteEntry {
    pub record_id: RecordId,
    pub payload: Fields,
}

/// Per-entry outcome of a secondary store batch write
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WriteResult {
    pub record_id: RecordId,
    /// `false` when an existing record was replaced
    pub created: bool,
}

/// Initial parameters handed to the form
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InitParams {
    #[serde(default)]
    pub default_field_values: Fields,
}

impl InitParams {
    pub fn new(default_field_values: Fields) -> Self {
        Self {
            default_field_values,
        }
    }

    /// Parse parameters from a JSON document
    pub fn from_json(json: &str) -> crate::Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// String value of a default field, if present and non-null
    pub fn text(&self, field: &str) -> Option<String> {
        value_to_text(self.default_field_values.get(field)?)
    }

    /// Like [`InitParams::text`] but a present non-scalar value is an error
    pub fn checked_text(&self, field: &str) -> Result<Option<String>, ValidationError> {
        match self.default_field_values.get(field) {
            None | Some(Value::Null) => Ok(None),
            Some(Value::Array(_)) | Some(Value::Object(_)) => Err(
                ValidationError::invalid_parameter(field, "expected a scalar value"),
            ),
            Some(value) => Ok(value_to_text(value)),
        }
    }
}

/// Draft of the record to be created, filled from the initial parameters
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct DraftRecord {
    pub parent_id: Option<RecordId>,
    pub account_id: Option<RecordId>,
    pub contact_id: Option<RecordId>,
    pub subject: Option<String>,
    pub description: Option<String>,
}

impl DraftRecord {
    /// Build a draft from `ParentId`, `AccountId`, `ContactId` and `Description`
    pub fn from_params(params: &InitParams) -> Result<Self, ValidationError> {
        Ok(Self {
            parent_id: params.checked_text(fields::PARENT_ID)?.map(RecordId::from),
            account_id: params.checked_text(fields::ACCOUNT_ID)?.map(RecordId::from),
            contact_id: params.checked_text(fields::CONTACT_ID)?.map(RecordId::from),
            subject: None,
            description: params.checked_text(fields::DESCRIPTION)?,
        })
    }
}

/// Display copy of the draft, enriched by secondary store lookups
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct EnrichedRecord {
    pub contact_name: Option<String>,
    pub account_name: Option<String>,
    pub subject: Option<String>,
    pub description: Option<String>,
}

/// The two text fields a user can edit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EditableField {
    Subject,
    Description,
}

impl EditableField {
    /// Map a form field identifier to an editable field
    ///
    /// Both the bare names and the form's `-id` data attributes are accepted.
    pub fn from_field_id(field_id: &str) -> Option<Self> {
        match field_id {
            "subject" | "subject-id" => Some(Self::Subject),
            "description" | "description-id" => Some(Self::Description),
            _ => None,
        }
    }
}

/// Which draft identifier a lookup was keyed by
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LookupRole {
    Parent,
    Account,
    Contact,
}

impl LookupRole {
    pub const ALL: [LookupRole; 3] = [Self::Parent, Self::Account, Self::Contact];

    /// Fields requested from the secondary store for this role
    pub fn requested_fields(&self) -> &'static [&'static str] {
        match self {
            Self::Parent => fields::REQUESTED_CASE_FIELDS,
            Self::Account => fields::REQUESTED_ACCOUNT_FIELDS,
            Self::Contact => fields::REQUESTED_CONTACT_FIELDS,
        }
    }

    /// Draft field name the role reads its key from
    pub fn field_name(&self) -> &'static str {
        match self {
            Self::Parent => fields::PARENT_ID,
            Self::Account => fields::ACCOUNT_ID,
            Self::Contact => fields::CONTACT_ID,
        }
    }

    /// The draft identifier this role is keyed by
    pub fn key<'a>(&self, draft: &'a DraftRecord) -> Option<&'a RecordId> {
        match self {
            Self::Parent => draft.parent_id.as_ref(),
            Self::Account => draft.account_id.as_ref(),
            Self::Contact => draft.contact_id.as_ref(),
        }
    }
}

fn value_to_text(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn params(value: Value) -> InitParams {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_entity_kind_parse() {
        assert_eq!("Contact".parse::<EntityKind>().unwrap(), EntityKind::Contact);
        assert_eq!("Account".parse::<EntityKind>().unwrap(), EntityKind::Account);
        assert_eq!("Case".parse::<EntityKind>().unwrap(), EntityKind::Case);
        assert!(matches!(
            "case".parse::<EntityKind>(),
            Err(LookupError::UnrecognizedKind { .. })
        ));
    }

    #[test]
    fn test_raw_record_conversion() {
        let raw: RawLookupRecord = serde_json::from_value(json!({
            "key": "A1",
            "service_key5": "Account",
            "payload": {"Name": "Acme"}
        }))
        .unwrap();

        let result = LookupResult::try_from(raw).unwrap();
        assert_eq!(result.entity_kind, EntityKind::Account);
        assert_eq!(result.text("Name").as_deref(), Some("Acme"));
    }

    #[test]
    fn test_raw_record_unknown_tag() {
        let raw = RawLookupRecord {
            key: RecordId::new("X"),
            service_key5: "Opportunity".to_string(),
            payload: Fields::new(),
        };

        let err = LookupResult::try_from(raw).unwrap_err();
        assert_eq!(err, LookupError::unrecognized_kind("Opportunity"));
    }

    #[test]
    fn test_draft_from_params() {
        let params = params(json!({
            "defaultFieldValues": {
                "ParentId": "P1",
                "AccountId": "A1",
                "ContactId": "C1",
                "Description": "orig",
                "Origin": "Web"
            }
        }));

        let draft = DraftRecord::from_params(&params).unwrap();
        assert_eq!(draft.parent_id, Some(RecordId::new("P1")));
        assert_eq!(draft.account_id, Some(RecordId::new("A1")));
        assert_eq!(draft.contact_id, Some(RecordId::new("C1")));
        assert_eq!(draft.description.as_deref(), Some("orig"));
        assert_eq!(draft.subject, None);
    }

    #[test]
    fn test_draft_from_params_missing_and_null() {
        let params = params(json!({
            "defaultFieldValues": {"ParentId": null, "AccountId": "A1"}
        }));

        let draft = DraftRecord::from_params(&params).unwrap();
        assert_eq!(draft.parent_id, None);
        assert_eq!(draft.contact_id, None);
        assert_eq!(draft.account_id, Some(RecordId::new("A1")));
    }

    #[test]
    fn test_draft_from_params_rejects_objects() {
        let params = params(json!({
            "defaultFieldValues": {"ContactId": {"nested": true}}
        }));

        let err = DraftRecord::from_params(&params).unwrap_err();
        assert!(matches!(err, ValidationError::InvalidParameter { .. }));
    }

    #[test]
    fn test_editable_field_ids() {
        assert_eq!(
            EditableField::from_field_id("subject"),
            Some(EditableField::Subject)
        );
        assert_eq!(
            EditableField::from_field_id("description-id"),
            Some(EditableField::Description)
        );
        assert_eq!(EditableField::from_field_id("origin"), None);
        assert_eq!(EditableField::from_field_id("Subject"), None);
    }

    #[test]
    fn test_wire_field_names() {
        let entry = WriteEntry {
            record_id: RecordId::new("R1"),
            payload: Fields::new(),
        };
        let value = serde_json::to_value(&entry).unwrap();
        assert_eq!(value["recordId"], "R1");

        let enriched = EnrichedRecord {
            contact_name: Some("Jane Doe".to_string()),
            ..Default::default()
        };
        let value = serde_json::to_value(&enriched).unwrap();
        assert_eq!(value["ContactName"], "Jane Doe");
    }

    #[test]
    fn test_lookup_roles_request_distinct_fields() {
        assert_eq!(LookupRole::Parent.requested_fields(), &["Subject", "Description"]);
        assert_eq!(LookupRole::Account.requested_fields(), &["Name"]);
        assert_eq!(LookupRole::Contact.requested_fields(), &["LastName", "FirstName"]);
    }
}
