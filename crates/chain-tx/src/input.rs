//! Transaction inputs: spends of prior outputs and issuances of new value.

use chain_primitives::chainhash::hash_h;
use chain_primitives::{AssetId, Hash};
use chain_script::Script;
use serde::{Deserialize, Serialize};

use crate::hashes::compute_asset_id;

/// A single input of a transaction record.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TxInput {
    /// Witness program run before the program it unlocks.
    pub witness: Script,
    /// Opaque data committed to by the input's entry.
    #[serde(with = "hex", default)]
    pub reference_data: Vec<u8>,
    pub kind: InputKind,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "type")]
pub enum InputKind {
    Spend(SpendInput),
    Issuance(IssuanceInput),
}

/// A spend, carrying the prior output as resolved by the storage layer.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpendInput {
    /// Entry that created the output being spent.
    pub source_id: Hash,
    pub source_position: u64,
    pub asset_id: AssetId,
    pub amount: u64,
    pub vm_version: u64,
    pub control_program: Script,
    /// Reference data hash of the output being spent.
    pub ref_data_hash: Hash,
}

/// Creation of new units of an asset.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct IssuanceInput {
    /// Replay protection. Must not be empty.
    #[serde(with = "hex", default)]
    pub nonce: Vec<u8>,
    pub initial_block_id: Hash,
    #[serde(with = "hex", default)]
    pub asset_definition: Vec<u8>,
    pub vm_version: u64,
    pub issuance_program: Script,
    pub amount: u64,
}

impl TxInput {
    /// Create a spend input.
    pub fn spend(witness: Script, reference_data: Vec<u8>, spend: SpendInput) -> Self {
        TxInput {
            witness,
            reference_data,
            kind: InputKind::Spend(spend),
        }
    }

    /// Create an issuance input.
    pub fn issuance(witness: Script, reference_data: Vec<u8>, issuance: IssuanceInput) -> Self {
        TxInput {
            witness,
            reference_data,
            kind: InputKind::Issuance(issuance),
        }
    }

    pub fn asset_id(&self) -> AssetId {
        match &self.kind {
            InputKind::Spend(s) => s.asset_id,
            InputKind::Issuance(i) => i.asset_id(),
        }
    }

    pub fn amount(&self) -> u64 {
        match &self.kind {
            InputKind::Spend(s) => s.amount,
            InputKind::Issuance(i) => i.amount,
        }
    }

    /// The program this input must satisfy, with its version.
    pub fn program(&self) -> (u64, &Script) {
        match &self.kind {
            InputKind::Spend(s) => (s.vm_version, &s.control_program),
            InputKind::Issuance(i) => (i.vm_version, &i.issuance_program),
        }
    }

    pub fn is_issuance(&self) -> bool {
        matches!(self.kind, InputKind::Issuance(_))
    }
}

impl IssuanceInput {
    pub fn asset_definition_hash(&self) -> Hash {
        hash_h(&self.asset_definition)
    }

    /// The asset this issuance creates, derived from the issuance program.
    pub fn asset_id(&self) -> AssetId {
        compute_asset_id(
            &self.initial_block_id,
            self.vm_version,
            self.issuance_program.to_bytes(),
            &self.asset_definition_hash(),
        )
    }
}
