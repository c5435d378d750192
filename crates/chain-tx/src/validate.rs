//! Running each input's programs against its signature context.

use std::collections::HashMap;

use chain_primitives::{AssetId, Hash};
use chain_script::interpreter::{Config, Engine, OutputRequirement, ScriptFlags, TxContext};
use chain_script::Script;
use tracing::{debug, warn};

use crate::entry::Entry;
use crate::hashes::{hashes_from_graph, TxHashes, VmContext};
use crate::map::map_tx;
use crate::transaction::TxData;
use crate::TxError;

/// Read-only chain data a program may consult, resolved before execution.
pub trait ChainState {
    /// Units of `asset_id` currently in circulation.
    fn circulation(&self, asset_id: &AssetId) -> Option<u64>;
}

impl ChainState for HashMap<AssetId, u64> {
    fn circulation(&self, asset_id: &AssetId) -> Option<u64> {
        self.get(asset_id).copied()
    }
}

/// A chain with no recorded assets.
impl ChainState for () {
    fn circulation(&self, _asset_id: &AssetId) -> Option<u64> {
        None
    }
}

/// The view one input's programs get of the transaction.
struct InputContext<'a> {
    tx: &'a TxData,
    vmc: &'a VmContext,
    asset_id: AssetId,
    amount: u64,
    program: &'a [u8],
    state: &'a dyn ChainState,
}

impl TxContext for InputContext<'_> {
    fn tx_sig_hash(&self) -> Hash {
        self.vmc.tx_sig_hash
    }

    fn asset_id(&self) -> AssetId {
        self.asset_id
    }

    fn amount(&self) -> u64 {
        self.amount
    }

    fn program(&self) -> &[u8] {
        self.program
    }

    fn min_time_ms(&self) -> u64 {
        self.tx.min_time_ms
    }

    fn max_time_ms(&self) -> u64 {
        self.tx.max_time_ms
    }

    fn circulation(&self, asset_id: &AssetId) -> Option<u64> {
        self.state.circulation(asset_id)
    }

    fn has_output(&self, req: &OutputRequirement<'_>) -> bool {
        self.tx.outputs.iter().any(|out| {
            out.asset_id == req.asset_id
                && out.amount == req.amount
                && out.control_program.to_bytes() == req.program
                && req.ref_data_hash.map_or(true, |h| h == out.ref_data_hash())
        })
    }
}

fn run_program(
    engine: &Engine,
    witness: &Script,
    program: &Script,
    vm_version: u64,
    ctx: &InputContext<'_>,
    index: usize,
) -> Result<(), TxError> {
    let version = u32::try_from(vm_version).unwrap_or(u32::MAX);
    engine
        .execute(witness, program, version, ScriptFlags::STANDARD, Some(ctx))
        .map_err(|source| TxError::InputInvalid { index, source })
}

/// Check that every input of `tx` is authorized.
///
/// Each input's witness runs followed by the program it unlocks: the
/// spent output's control program or the issuance program. Issuances
/// also run the program of their anchoring nonce. Returns the
/// transaction's hashes on success.
pub fn validate_tx(
    tx: &TxData,
    cfg: &Config,
    state: &dyn ChainState,
) -> Result<TxHashes, TxError> {
    let mapped = map_tx(tx)?;
    let hashes = hashes_from_graph(&mapped)?;
    let engine = Engine::with_config(cfg.clone());

    for (index, (input, vmc)) in tx.inputs.iter().zip(&hashes.vm_contexts).enumerate() {
        let (vm_version, program) = input.program();
        let ctx = InputContext {
            tx,
            vmc,
            asset_id: input.asset_id(),
            amount: input.amount(),
            program: program.to_bytes(),
            state,
        };

        let result = run_program(&engine, &input.witness, program, vm_version, &ctx, index)
            .and_then(|()| {
                let nonce = vmc.nonce_id.as_ref().and_then(|id| mapped.entries.get(id));
                match nonce {
                    Some(Entry::Nonce(n)) => {
                        let nonce_program = Script::from_bytes(&n.program.code);
                        let ctx = InputContext {
                            program: &n.program.code,
                            ..ctx
                        };
                        run_program(
                            &engine,
                            &Script::new(),
                            &nonce_program,
                            n.program.vm_version,
                            &ctx,
                            index,
                        )
                    }
                    _ => Ok(()),
                }
            });

        match &result {
            Ok(()) => debug!(input = index, entry_id = %vmc.entry_id, result = "ok", "input validated"),
            Err(e) => warn!(input = index, entry_id = %vmc.entry_id, error = %e, "input rejected"),
        }
        result?;
    }

    debug!(tx_id = %hashes.id, inputs = tx.inputs.len(), "transaction validated");
    Ok(hashes)
}

/// Reject issuances presented at or after the end of their window.
pub fn check_issuance_windows(hashes: &TxHashes, now_ms: u64) -> Result<(), TxError> {
    for iss in &hashes.issuances {
        if now_ms >= iss.expiration_ms {
            return Err(TxError::IssuanceExpired {
                nonce_id: iss.nonce_id,
                expiration_ms: iss.expiration_ms,
                now_ms,
            });
        }
    }
    Ok(())
}
