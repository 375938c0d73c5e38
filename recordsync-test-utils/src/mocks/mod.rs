//! Mock implementations for testing

mod primary;
mod secondary;

pub use primary::{CreateCall, MockPrimaryStore};
pub use secondary::{FindCall, MockSecondaryStore};
