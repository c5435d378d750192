/// Chain protocol - Cryptographic primitives, hashing, and binary encoding.
///
/// This crate provides the foundational building blocks shared by the
/// script and transaction crates:
/// - Hash functions (SHA-256, SHA-1, RIPEMD-160, Hash160, SHA3-256) and domain-tagged SHA3 hashing
/// - The 32-byte `Hash` identifier used for entry IDs, asset IDs, and sighashes
/// - The canonical byte encoding that entry IDs are hashed over
/// - secp256k1 keys and DER-encoded ECDSA signatures

pub mod hash;
pub mod chainhash;
pub mod encoding;
pub mod ec;

mod error;
pub use error::PrimitivesError;
pub use chainhash::{AssetId, Hash};
