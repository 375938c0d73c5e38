//! Test data builders for creating test scenarios

use recordsync_core::{EntityKind, Fields, InitParams, LookupResult, RecordId};
use serde_json::Value;

/// Builder for initial form parameters
#[derive(Debug, Clone, Default)]
pub struct ParamsBuilder {
    values: Fields,
}

impl ParamsBuilder {
    /// Create an empty parameter builder
    pub fn new() -> Self {
        Self::default()
    }

    /// Parameters of the reference scenario: `P1`, `A1`, `C1`, `"orig"`
    pub fn scenario() -> Self {
        Self::new()
            .parent_id("P1")
            .account_id("A1")
            .contact_id("C1")
            .description("orig")
    }

    pub fn parent_id(self, id: &str) -> Self {
        self.field("ParentId", id)
    }

    pub fn account_id(self, id: &str) -> Self {
        self.field("AccountId", id)
    }

    pub fn contact_id(self, id: &str) -> Self {
        self.field("ContactId", id)
    }

    pub fn description(self, text: &str) -> Self {
        self.field("Description", text)
    }

    /// Set any default field value
    pub fn field(mut self, name: &str, value: impl Into<Value>) -> Self {
        self.values.insert(name.to_string(), value.into());
        self
    }

    /// Build parameters
    pub fn build(self) -> InitParams {
        InitParams::new(self.values)
    }
}

/// Builder for secondary store lookup records
pub struct TestDataBuilder;

impl TestDataBuilder {
    /// Contact record with first and last name
    pub fn contact(key: &str, first_name: &str, last_name: &str) -> LookupResult {
        let mut payload = Fields::new();
        payload.insert("FirstName".to_string(), Value::from(first_name));
        payload.insert("LastName".to_string(), Value::from(last_name));
        LookupResult::new(RecordId::new(key), EntityKind::Contact, payload)
    }

    /// Account record with a name
    pub fn account(key: &str, name: &str) -> LookupResult {
        let mut payload = Fields::new();
        payload.insert("Name".to_string(), Value::from(name));
        LookupResult::new(RecordId::new(key), EntityKind::Account, payload)
    }

    /// Case record with a description
    pub fn case(key: &str, description: &str) -> LookupResult {
        let mut payload = Fields::new();
        payload.insert("Description".to_string(), Value::from(description));
        LookupResult::new(RecordId::new(key), EntityKind::Case, payload)
    }
}
