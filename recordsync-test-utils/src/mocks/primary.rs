//! Mock implementation of PrimaryStore for testing

use async_trait::async_trait;
use recordsync_core::error::CreateError;
use recordsync_core::{CreatedRecord, Fields, PrimaryStore, RecordId};
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// A recorded `create` call
#[derive(Debug, Clone, PartialEq)]
pub struct CreateCall {
    pub object_type: String,
    pub fields: Fields,
}

/// Mock implementation of PrimaryStore for testing
///
/// Returns a configurable id (default `R1`) or error and records every call.
///
/// # Examples
///
/// ```rust,no_run
/// use recordsync_test_utils::MockPrimaryStore;
/// use recordsync_core::error::CreateError;
///
/// let mock = MockPrimaryStore::new();
/// mock.expect_create_error(CreateError::unavailable("offline"));
/// assert_eq!(mock.call_count(), 0);
/// ```
pub struct MockPrimaryStore {
    behavior: Arc<Mutex<MockBehavior>>,
    calls: Arc<Mutex<Vec<CreateCall>>>,
}

#[derive(Debug, Clone)]
struct MockBehavior {
    result: Result<RecordId, CreateError>,
    delay: Duration,
}

impl Default for MockBehavior {
    fn default() -> Self {
        Self {
            result: Ok(RecordId::new("R1")),
            delay: Duration::ZERO,
        }
    }
}

impl MockPrimaryStore {
    /// Create a new mock store that succeeds with id `R1`
    pub fn new() -> Self {
        Self {
            behavior: Arc::new(Mutex::new(MockBehavior::default())),
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Configure the id returned by `create`
    pub fn expect_created_id(&self, id: &str) {
        self.behavior.lock().unwrap().result = Ok(RecordId::new(id));
    }

    /// Configure `create` to fail
    pub fn expect_create_error(&self, error: CreateError) {
        self.behavior.lock().unwrap().result = Err(error);
    }

    /// Delay every `create` by `delay`
    pub fn set_delay(&self, delay: Duration) {
        self.behavior.lock().unwrap().delay = delay;
    }

    /// All recorded calls
    pub fn calls(&self) -> Vec<CreateCall> {
        self.calls.lock().unwrap().clone()
    }

    /// Number of recorded calls
    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    /// The most recent call
    pub fn last_call(&self) -> Option<CreateCall> {
        self.calls.lock().unwrap().last().cloned()
    }
}

impl Default for MockPrimaryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PrimaryStore for MockPrimaryStore {
    async fn create(
        &self,
        object_type: &str,
        fields: Fields,
    ) -> Result<CreatedRecord, CreateError> {
        self.calls.lock().unwrap().push(CreateCall {
            object_type: object_type.to_string(),
            fields,
        });

        let behavior = self.behavior.lock().unwrap().clone();

        if !behavior.delay.is_zero() {
            tokio::time::sleep(behavior.delay).await;
        }

        behavior.result.map(|id| CreatedRecord { id })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_default_returns_r1() {
        let mock = MockPrimaryStore::new();

        let created = mock.create("Case", Fields::new()).await.unwrap();

        assert_eq!(created.id, RecordId::new("R1"));
        assert_eq!(mock.call_count(), 1);
        assert_eq!(mock.last_call().unwrap().object_type, "Case");
    }

    #[tokio::test]
    async fn test_configured_error_is_returned() {
        let mock = MockPrimaryStore::new();
        mock.expect_create_error(CreateError::rejected("Subject required"));

        let err = mock.create("Case", Fields::new()).await.unwrap_err();

        assert_eq!(err, CreateError::rejected("Subject required"));
        assert_eq!(mock.call_count(), 1);
    }
}
