//! Mapping a transaction record onto its entry graph.
//!
//! Entries are built bottom-up: spent outputs and spends first, then
//! time ranges, nonces and issuances, then the mux, the results and
//! finally the header. Every reference points at an entry that already
//! exists, so the graph is acyclic by construction.

use std::collections::{BTreeMap, HashMap};

use chain_primitives::chainhash::hash_h;
use chain_primitives::{AssetId, Hash};
use chain_script::opcodes::{OP_ASSET, OP_DROP, OP_EQUAL};
use chain_script::Script;
use tracing::debug;

use crate::entry::*;
use crate::error::StructureError;
use crate::input::{InputKind, IssuanceInput};
use crate::transaction::TxData;
use crate::TxError;

/// Version of the programs generated for nonces.
pub const NONCE_PROGRAM_VERSION: u64 = 1;

/// A transaction's entry graph.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MappedTx {
    /// The transaction ID: the header's entry ID.
    pub id: Hash,
    pub header: Header,
    /// Every entry of the graph by ID.
    pub entries: BTreeMap<Hash, Entry>,
    /// Spend or issuance entry of each input, in input order.
    pub inputs: Vec<Hash>,
}

impl MappedTx {
    pub fn get(&self, id: &Hash) -> Result<&Entry, StructureError> {
        self.entries.get(id).ok_or(StructureError::MissingEntry(*id))
    }
}

/// The program a nonce commits to: `<nonce> DROP ASSET <asset_id> EQUAL`.
///
/// It binds the nonce to the asset being issued, so the same nonce under
/// a different asset yields a different nonce entry.
pub fn nonce_program(nonce: &[u8], asset_id: &AssetId) -> Result<Script, TxError> {
    let mut program = Script::new();
    program
        .append_push_data(nonce)?
        .append_opcodes(&[OP_DROP, OP_ASSET])?
        .append_push_data(asset_id.as_bytes())?
        .append_opcodes(&[OP_EQUAL])?;
    Ok(program)
}

fn add(entries: &mut BTreeMap<Hash, Entry>, entry: Entry) -> Hash {
    let id = entry.id();
    entries.insert(id, entry);
    id
}

/// Sum amounts per asset, failing on overflow.
fn tally(
    totals: &mut BTreeMap<AssetId, u64>,
    asset_id: AssetId,
    amount: u64,
) -> Result<(), StructureError> {
    let total = totals.entry(asset_id).or_insert(0);
    *total = total
        .checked_add(amount)
        .ok_or(StructureError::ValueOverflow(asset_id))?;
    Ok(())
}

fn check_balance(tx: &TxData) -> Result<(), StructureError> {
    let mut ins = BTreeMap::new();
    for input in &tx.inputs {
        tally(&mut ins, input.asset_id(), input.amount())?;
    }
    let mut outs = BTreeMap::new();
    for output in &tx.outputs {
        tally(&mut outs, output.asset_id, output.amount)?;
    }

    for asset_id in ins.keys().chain(outs.keys()) {
        let inputs = ins.get(asset_id).copied().unwrap_or(0);
        let outputs = outs.get(asset_id).copied().unwrap_or(0);
        if inputs != outputs {
            return Err(StructureError::Unbalanced {
                asset_id: *asset_id,
                inputs,
                outputs,
            });
        }
    }
    Ok(())
}

fn map_issuance(
    entries: &mut BTreeMap<Hash, Entry>,
    tx: &TxData,
    index: usize,
    iss: &IssuanceInput,
    data: Hash,
) -> Result<Hash, TxError> {
    if iss.nonce.is_empty() {
        return Err(StructureError::UnanchoredIssuance { index }.into());
    }
    if tx.max_time_ms == 0 {
        return Err(StructureError::UnboundedIssuance { index }.into());
    }
    let asset_id = iss.asset_id();

    let time_range = add(
        entries,
        Entry::TimeRange(TimeRange {
            min_time_ms: tx.min_time_ms,
            max_time_ms: tx.max_time_ms,
        }),
    );
    let program = nonce_program(&iss.nonce, &asset_id)?;
    let anchor = add(
        entries,
        Entry::Nonce(Nonce {
            program: Program {
                vm_version: NONCE_PROGRAM_VERSION,
                code: program.into_bytes(),
            },
            time_range,
        }),
    );

    Ok(add(
        entries,
        Entry::Issuance(Issuance {
            anchor,
            value: AssetAmount {
                asset_id,
                amount: iss.amount,
            },
            data,
        }),
    ))
}

/// Build the entry graph of `tx`.
pub fn map_tx(tx: &TxData) -> Result<MappedTx, TxError> {
    if tx.inputs.is_empty() {
        return Err(StructureError::NoInputs.into());
    }
    tx.check_time_range()?;
    check_balance(tx)?;

    let mut entries = BTreeMap::new();
    let mut inputs = vec![Hash::default(); tx.inputs.len()];
    let mut spent: HashMap<Hash, usize> = HashMap::new();

    for (index, input) in tx.inputs.iter().enumerate() {
        let InputKind::Spend(sp) = &input.kind else {
            continue;
        };
        let control_program = Program {
            vm_version: sp.vm_version,
            code: sp.control_program.to_bytes().to_vec(),
        };
        let prior = Entry::Output(Output {
            source: ValueSource {
                ref_id: sp.source_id,
                value: AssetAmount {
                    asset_id: sp.asset_id,
                    amount: sp.amount,
                },
                position: sp.source_position,
            },
            control_program: control_program.clone(),
            data: sp.ref_data_hash,
        });
        let spent_output = add(&mut entries, prior);
        if let Some(&first) = spent.get(&spent_output) {
            return Err(StructureError::DuplicateInput { index, first }.into());
        }
        spent.insert(spent_output, index);

        let spend_id = add(
            &mut entries,
            Entry::Spend(Spend {
                spent_output,
                program: control_program,
                data: hash_h(&input.reference_data),
            }),
        );
        inputs[index] = spend_id;
    }

    for (index, input) in tx.inputs.iter().enumerate() {
        if let InputKind::Issuance(iss) = &input.kind {
            let data = hash_h(&input.reference_data);
            let id = map_issuance(&mut entries, tx, index, iss, data)?;
            if let Some(first) = inputs.iter().position(|other| *other == id) {
                return Err(StructureError::DuplicateInput { index, first }.into());
            }
            inputs[index] = id;
        }
    }

    let sources = tx
        .inputs
        .iter()
        .zip(&inputs)
        .map(|(input, id)| ValueSource {
            ref_id: *id,
            value: AssetAmount {
                asset_id: input.asset_id(),
                amount: input.amount(),
            },
            position: 0,
        })
        .collect();
    let mux_id = add(&mut entries, Entry::Mux(Mux { sources }));

    let mut results = Vec::with_capacity(tx.outputs.len());
    for (position, out) in tx.outputs.iter().enumerate() {
        let source = ValueSource {
            ref_id: mux_id,
            value: AssetAmount {
                asset_id: out.asset_id,
                amount: out.amount,
            },
            position: position as u64,
        };
        let data = out.ref_data_hash();
        let entry = if out.is_retirement() {
            Entry::Retirement(Retirement { source, data })
        } else {
            Entry::Output(Output {
                source,
                control_program: Program {
                    vm_version: out.vm_version,
                    code: out.control_program.to_bytes().to_vec(),
                },
                data,
            })
        };
        results.push(add(&mut entries, entry));
    }

    let header = Header {
        version: tx.version,
        results,
        data: tx.ref_data_hash(),
        min_time_ms: tx.min_time_ms,
        max_time_ms: tx.max_time_ms,
    };
    let id = add(&mut entries, Entry::Header(header.clone()));

    let mapped = MappedTx {
        id,
        header,
        entries,
        inputs,
    };
    check_references(&mapped)?;

    debug!(tx_id = %id, entries = mapped.entries.len(), "mapped transaction");
    Ok(mapped)
}

/// Every input's references must resolve within the graph, and every
/// issuance must be anchored by a nonce.
fn check_references(mapped: &MappedTx) -> Result<(), StructureError> {
    for id in &mapped.inputs {
        match mapped.get(id)? {
            Entry::Spend(sp) => {
                mapped.get(&sp.spent_output)?;
            }
            Entry::Issuance(iss) => match mapped.get(&iss.anchor)? {
                Entry::Nonce(_) => {}
                _ => return Err(StructureError::BadAnchor(iss.anchor)),
            },
            _ => return Err(StructureError::MissingEntry(*id)),
        }
    }
    for id in &mapped.header.results {
        mapped.get(id)?;
    }
    Ok(())
}
