//! Value objects for the verification domain

pub mod code_key;

pub use code_key::{CodeKey, CodeKeyError, KEY_DELIMITER};
