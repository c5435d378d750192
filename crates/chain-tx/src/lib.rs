/// Chain protocol - Transaction entry graphs, signature contexts, and validation.
///
/// Maps a flat transaction record onto a graph of content-addressed
/// entries, derives the transaction ID and the hash each input is signed
/// over, and runs every input's programs through the script interpreter.

pub mod entry;
pub mod hashes;
pub mod input;
pub mod map;
pub mod output;
pub mod transaction;
pub mod validate;

mod error;
pub use error::{StructureError, TxError};
pub use hashes::{compute_asset_id, tx_hashes, tx_sig_hash, IssuanceExpiry, TxHashes, VmContext};
pub use input::{InputKind, IssuanceInput, SpendInput, TxInput};
pub use map::{map_tx, MappedTx};
pub use output::TxOutput;
pub use transaction::TxData;
pub use validate::{check_issuance_windows, validate_tx, ChainState};
