//! Test utilities for the record sync orchestrator
//!
//! This crate provides scripted mock stores and builders for parameters and
//! secondary store records.

pub mod builders;
pub mod mocks;

// Re-export commonly used types
pub use builders::{ParamsBuilder, TestDataBuilder};
pub use mocks::{CreateCall, FindCall, MockPrimaryStore, MockSecondaryStore};
