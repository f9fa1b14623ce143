//! Join code generation and validation.
//!
//! Join codes are 6-character strings over a 32-symbol alphabet that leaves
//! out `0`, `O`, `I` and `1` so codes survive being read aloud.

use lazy_regex::regex_is_match;
use rand::Rng;

const ALPHABET: &[u8] = b"ABCDEFGHJKLMNPQRSTUVWXYZ23456789";

pub const JOIN_CODE_LEN: usize = 6;

/// Generate a join code from `rng`.
pub fn generate_join_code<R: Rng + ?Sized>(rng: &mut R) -> String {
    (0..JOIN_CODE_LEN)
        .map(|_| ALPHABET[rng.random_range(0..ALPHABET.len())] as char)
        .collect()
}

/// Exact length, exact alphabet. No case folding.
pub fn is_valid_join_code(code: &str) -> bool {
    regex_is_match!("^[A-HJ-NP-Z2-9]{6}$", code)
}

/// Trim surrounding whitespace and uppercase typed input.
pub fn normalize_join_code(raw: &str) -> String {
    raw.trim().to_ascii_uppercase()
}
