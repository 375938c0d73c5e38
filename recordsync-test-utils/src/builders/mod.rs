//! Builders for test parameters and records

mod test_data;

pub use test_data::{ParamsBuilder, TestDataBuilder};
