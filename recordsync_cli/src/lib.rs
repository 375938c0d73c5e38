//! Record Sync CLI library
//!
//! Exposes the configuration layer and the run orchestrator so integration
//! tests can drive them without spawning the binary.

pub mod config;
pub mod error;
pub mod orchestrators;
pub mod terminal;
