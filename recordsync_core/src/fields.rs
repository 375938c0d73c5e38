//! Field names shared by both stores
//!
//! The primary store speaks the `Case` schema; the secondary store returns
//! `Contact`, `Account` and `Case` payloads keyed by the same API names.

/// Object type created in the primary store
pub const CASE_OBJECT: &str = "Case";

pub const PARENT_ID: &str = "ParentId";
pub const ACCOUNT_ID: &str = "AccountId";
pub const CONTACT_ID: &str = "ContactId";
pub const SUBJECT: &str = "Subject";
pub const DESCRIPTION: &str = "Description";
pub const COUNTRY_ORIGIN: &str = "CountryOrigin__c";

pub const ACCOUNT_NAME: &str = "Name";
pub const CONTACT_FIRST_NAME: &str = "FirstName";
pub const CONTACT_LAST_NAME: &str = "LastName";

/// Origin country written on every created record
pub const DEFAULT_COUNTRY_ORIGIN: &str = "China";

/// Fields requested for the parent case lookup
pub const REQUESTED_CASE_FIELDS: &[&str] = &[SUBJECT, DESCRIPTION];

/// Fields requested for the account lookup
pub const REQUESTED_ACCOUNT_FIELDS: &[&str] = &[ACCOUNT_NAME];

/// Fields requested for the contact lookup
pub const REQUESTED_CONTACT_FIELDS: &[&str] = &[CONTACT_LAST_NAME, CONTACT_FIRST_NAME];
