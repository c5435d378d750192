//! Transaction outputs.

use chain_primitives::chainhash::hash_h;
use chain_primitives::{AssetId, Hash};
use chain_script::Script;
use serde::{Deserialize, Serialize};

/// Value sent to a control program.
///
/// An output whose program starts with OP_FAIL can never be spent and is
/// recorded as a retirement of its value.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TxOutput {
    pub asset_id: AssetId,
    pub amount: u64,
    pub vm_version: u64,
    pub control_program: Script,
    #[serde(with = "hex", default)]
    pub reference_data: Vec<u8>,
}

impl TxOutput {
    pub fn new(asset_id: AssetId, amount: u64, vm_version: u64, control_program: Script) -> Self {
        TxOutput {
            asset_id,
            amount,
            vm_version,
            control_program,
            reference_data: Vec::new(),
        }
    }

    pub fn is_retirement(&self) -> bool {
        self.control_program.is_unspendable()
    }

    pub fn ref_data_hash(&self) -> Hash {
        hash_h(&self.reference_data)
    }
}
