#![deny(missing_docs)]

//! Chain protocol - transaction-validation core.
//!
//! Re-exports the protocol crates for single-crate usage.

pub use chain_account as account;
pub use chain_primitives as primitives;
pub use chain_script as script;
pub use chain_tx as tx;
