use chain_primitives::Hash;
use chain_script::interpreter::InterpreterError;

/// A transaction whose shape is malformed. Detected before any program runs.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StructureError {
    #[error("transaction has no inputs")]
    NoInputs,
    #[error("input {index} duplicates input {first}")]
    DuplicateInput { index: usize, first: usize },
    #[error("issuance input {index} has no nonce")]
    UnanchoredIssuance { index: usize },
    #[error("issuance input {index} has a nonce but the transaction has no max time")]
    UnboundedIssuance { index: usize },
    #[error("min time {min_time_ms} is after max time {max_time_ms}")]
    InvalidTimeRange { min_time_ms: u64, max_time_ms: u64 },
    #[error("value of asset {0} overflows")]
    ValueOverflow(Hash),
    #[error("asset {asset_id} is unbalanced: {inputs} in, {outputs} out")]
    Unbalanced { asset_id: Hash, inputs: u64, outputs: u64 },
    #[error("entry {0} is referenced but not in the graph")]
    MissingEntry(Hash),
    #[error("issuance anchor {0} is not a nonce with a time range")]
    BadAnchor(Hash),
}

/// Error types for transaction hashing and validation.
#[derive(Debug, thiserror::Error)]
pub enum TxError {
    /// The transaction is malformed and was rejected before execution.
    #[error("invalid transaction structure: {0}")]
    Structure(#[from] StructureError),
    /// An input's programs did not authorize it.
    #[error("input {index} is invalid: {source}")]
    InputInvalid {
        index: usize,
        #[source]
        source: InterpreterError,
    },
    /// An issuance was presented at or after the end of its window.
    #[error("issuance nonce {nonce_id} expired at {expiration_ms}, now {now_ms}")]
    IssuanceExpired {
        nonce_id: Hash,
        expiration_ms: u64,
        now_ms: u64,
    },
    /// An underlying script error (forwarded from `chain-script`).
    #[error("script error: {0}")]
    Script(#[from] chain_script::ScriptError),
}
