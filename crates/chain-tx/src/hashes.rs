//! Transaction IDs and per-input signature contexts.

use std::collections::BTreeSet;

use chain_primitives::chainhash::tagged_hash;
use chain_primitives::{AssetId, Hash};
use serde::{Deserialize, Serialize};

use crate::entry::Entry;
use crate::error::StructureError;
use crate::map::{map_tx, MappedTx};
use crate::transaction::TxData;
use crate::TxError;

/// Everything a program authorizing one input is checked against.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct VmContext {
    /// The input's Spend or Issuance entry.
    pub entry_id: Hash,
    pub tx_sig_hash: Hash,
    pub ref_data_hash: Hash,
    pub tx_ref_data_hash: Hash,
    /// Set for spends.
    pub output_id: Option<Hash>,
    /// Set for issuances: the anchoring nonce.
    pub nonce_id: Option<Hash>,
}

/// A nonce and the end of the window in which its issuance is valid.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct IssuanceExpiry {
    pub nonce_id: Hash,
    pub expiration_ms: u64,
}

/// The hashes needed to validate a transaction and apply it to state.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TxHashes {
    pub id: Hash,
    /// New spendable outputs, in output order. Retirements are skipped.
    pub output_ids: Vec<Hash>,
    /// One per input, in input order.
    pub vm_contexts: Vec<VmContext>,
    pub issuances: Vec<IssuanceExpiry>,
}

/// The hash signatures for `entry_id` commit to.
pub fn tx_sig_hash(entry_id: &Hash, tx_id: &Hash) -> Hash {
    tagged_hash("sighash", &[entry_id.as_bytes(), tx_id.as_bytes()])
}

/// Derive an asset ID from the chain it lives on and its issuance program.
pub fn compute_asset_id(
    initial_block_id: &Hash,
    vm_version: u64,
    issuance_program: &[u8],
    asset_definition_hash: &Hash,
) -> AssetId {
    tagged_hash(
        "assetid",
        &[
            initial_block_id.as_bytes(),
            &vm_version.to_le_bytes(),
            &(issuance_program.len() as u64).to_le_bytes(),
            issuance_program,
            asset_definition_hash.as_bytes(),
        ],
    )
}

/// Map `tx` and derive its hashes.
pub fn tx_hashes(tx: &TxData) -> Result<TxHashes, TxError> {
    let mapped = map_tx(tx)?;
    Ok(hashes_from_graph(&mapped)?)
}

/// Derive hashes from an already mapped graph.
pub fn hashes_from_graph(mapped: &MappedTx) -> Result<TxHashes, StructureError> {
    let mut output_ids = Vec::new();
    for id in &mapped.header.results {
        if let Entry::Output(_) = mapped.get(id)? {
            output_ids.push(*id);
        }
    }

    let mut vm_contexts = Vec::with_capacity(mapped.inputs.len());
    let mut issuances = Vec::new();
    let mut seen_nonces = BTreeSet::new();

    for entry_id in &mapped.inputs {
        let (ref_data_hash, output_id, nonce_id) = match mapped.get(entry_id)? {
            Entry::Spend(sp) => (sp.data, Some(sp.spent_output), None),
            Entry::Issuance(iss) => {
                let expiry = issuance_expiry(mapped, &iss.anchor)?;
                if seen_nonces.insert(expiry.nonce_id) {
                    issuances.push(expiry);
                }
                (iss.data, None, Some(iss.anchor))
            }
            _ => return Err(StructureError::MissingEntry(*entry_id)),
        };
        vm_contexts.push(VmContext {
            entry_id: *entry_id,
            tx_sig_hash: tx_sig_hash(entry_id, &mapped.id),
            ref_data_hash,
            tx_ref_data_hash: mapped.header.data,
            output_id,
            nonce_id,
        });
    }

    Ok(TxHashes {
        id: mapped.id,
        output_ids,
        vm_contexts,
        issuances,
    })
}

/// The window of an issuance anchor, which must be a nonce with a time range.
fn issuance_expiry(mapped: &MappedTx, anchor: &Hash) -> Result<IssuanceExpiry, StructureError> {
    let Some(Entry::Nonce(nonce)) = mapped.entries.get(anchor) else {
        return Err(StructureError::BadAnchor(*anchor));
    };
    match mapped.entries.get(&nonce.time_range) {
        Some(Entry::TimeRange(tr)) => Ok(IssuanceExpiry {
            nonce_id: *anchor,
            expiration_ms: tr.max_time_ms,
        }),
        _ => Err(StructureError::BadAnchor(*anchor)),
    }
}
