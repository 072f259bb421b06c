pub mod code;

pub use code::{CheckOutcome, CodeStore, CodeStoreError, InMemoryCodeStore, StoreOutcome};
