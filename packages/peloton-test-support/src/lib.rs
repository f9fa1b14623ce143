//! Peloton test support utilities
//!
//! This crate provides helpers shared by the peloton integration tests:
//! unified logging initialization and unique test data.

pub mod logging;
pub mod unique_helpers;
