//! Shared proptest configuration for domain property tests.
//!
//! `PROPTEST_CASES` overrides the case count (default 16) so CI can crank it
//! up without touching the tests.

use proptest::prelude::ProptestConfig;

const DEFAULT_CASES: u32 = 16;

pub fn proptest_config() -> ProptestConfig {
    let cases = std::env::var("PROPTEST_CASES")
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(DEFAULT_CASES);
    ProptestConfig {
        cases,
        failure_persistence: None,
        ..ProptestConfig::default()
    }
}
