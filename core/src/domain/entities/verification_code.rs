//! Verification code generation and format checks.
//!
//! A code is a fixed-width, zero-padded decimal string drawn uniformly from `[0, 10^len)`.
//! The record holding it lives only in the code store; nothing here keeps codes in memory.

use rand::{rngs::OsRng, Rng};

use vc_shared::config::verification::{DEFAULT_CODE_LENGTH, DEFAULT_MAX_ATTEMPTS, MAX_CODE_LENGTH};

/// Default length of the verification code
pub const CODE_LENGTH: usize = DEFAULT_CODE_LENGTH;

/// Default number of verification attempts allowed
pub const MAX_ATTEMPTS: u32 = DEFAULT_MAX_ATTEMPTS;

/// Generates a cryptographically secure random numeric code of `length` digits
///
/// Uses OsRng with `gen_range`, which rejects out-of-range samples instead of reducing
/// modulo the range, so every code in `[0, 10^length)` is equally likely.
///
/// # Arguments
///
/// * `length` - Number of digits, clamped to `1..=MAX_CODE_LENGTH`
pub fn generate_code(length: usize) -> String {
    let length = length.clamp(1, MAX_CODE_LENGTH);
    let upper = 10u64.pow(length as u32);
    let num = OsRng.gen_range(0..upper);
    format!("{:0width$}", num, width = length)
}

/// Checks that `code` has exactly `length` ASCII digits
pub fn is_well_formed_code(code: &str, length: usize) -> bool {
    code.len() == length && code.bytes().all(|b| b.is_ascii_digit())
}
