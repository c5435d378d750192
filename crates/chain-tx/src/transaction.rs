//! The flat transaction record.
//!
//! `TxData` is what a client submits: ordered inputs, ordered outputs,
//! time bounds and reference data. Its identity and everything signed
//! over are derived by mapping it to the entry graph (see [`crate::map`]).

use chain_primitives::chainhash::hash_h;
use chain_primitives::Hash;
use serde::{Deserialize, Serialize};

use crate::error::StructureError;
use crate::hashes::{tx_hashes, TxHashes};
use crate::input::TxInput;
use crate::output::TxOutput;
use crate::TxError;

/// A transaction record before mapping.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TxData {
    pub version: u64,
    pub inputs: Vec<TxInput>,
    pub outputs: Vec<TxOutput>,
    /// Earliest time, in milliseconds, at which the transaction is valid.
    pub min_time_ms: u64,
    /// Latest time the transaction is valid. Zero means unbounded.
    pub max_time_ms: u64,
    #[serde(with = "hex", default)]
    pub reference_data: Vec<u8>,
}

impl TxData {
    /// Create an empty version 1 transaction.
    pub fn new() -> Self {
        TxData {
            version: 1,
            ..TxData::default()
        }
    }

    pub fn add_input(&mut self, input: TxInput) -> &mut Self {
        self.inputs.push(input);
        self
    }

    pub fn add_output(&mut self, output: TxOutput) -> &mut Self {
        self.outputs.push(output);
        self
    }

    pub fn with_time_range(mut self, min_time_ms: u64, max_time_ms: u64) -> Self {
        self.min_time_ms = min_time_ms;
        self.max_time_ms = max_time_ms;
        self
    }

    pub fn ref_data_hash(&self) -> Hash {
        hash_h(&self.reference_data)
    }

    /// Check the time bounds are ordered.
    pub fn check_time_range(&self) -> Result<(), StructureError> {
        if self.max_time_ms != 0 && self.min_time_ms > self.max_time_ms {
            return Err(StructureError::InvalidTimeRange {
                min_time_ms: self.min_time_ms,
                max_time_ms: self.max_time_ms,
            });
        }
        Ok(())
    }

    /// Derive the transaction ID and per-input contexts.
    pub fn hashes(&self) -> Result<TxHashes, TxError> {
        tx_hashes(self)
    }

    /// Parse a transaction from JSON.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}
