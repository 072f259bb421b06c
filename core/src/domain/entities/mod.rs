//! Domain entities representing core business objects.

pub mod verification_code;


pub use verification_code::{generate_code, is_well_formed_code, CODE_LENGTH, MAX_ATTEMPTS};
