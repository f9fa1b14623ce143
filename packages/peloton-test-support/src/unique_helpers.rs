//! Test helpers for generating unique test data.

use uuid::Uuid;

/// Generate a unique string with the given prefix, formatted `{prefix}-{uuid}`.
///
/// ```
/// use peloton_test_support::unique_helpers::unique_str;
///
/// let a = unique_str("identity");
/// let b = unique_str("identity");
/// assert_ne!(a, b);
/// assert!(a.starts_with("identity-"));
/// ```
pub fn unique_str(prefix: &str) -> String {
    format!("{}-{}", prefix, Uuid::new_v4().simple())
}

/// Unique file name with the given prefix and extension.
pub fn unique_file_name(prefix: &str, ext: &str) -> String {
    format!("{}.{}", unique_str(prefix), ext)
}
