//! Hash function primitives.
//!
//! Provides SHA-256, SHA-1, RIPEMD-160, and Hash160 as used by the script
//! interpreter, plus SHA3-256 and its domain-tagged form, which every
//! consensus identifier (entry IDs, asset IDs, signature hashes) is built
//! from.

use ripemd::Ripemd160;
use sha1::Sha1;
use sha2::{Digest, Sha256};
use sha3::Sha3_256;

pub fn sha256(data: &[u8]) -> [u8; 32] {
    Sha256::digest(data).into()
}

/// SHA-256 applied twice, for OP_HASH256.
pub fn sha256d(data: &[u8]) -> [u8; 32] {
    sha256(&sha256(data))
}

pub fn sha1(data: &[u8]) -> [u8; 20] {
    Sha1::digest(data).into()
}

pub fn ripemd160(data: &[u8]) -> [u8; 20] {
    Ripemd160::digest(data).into()
}

/// RIPEMD-160 of SHA-256, for OP_HASH160.
pub fn hash160(data: &[u8]) -> [u8; 20] {
    ripemd160(&sha256(data))
}

/// SHA3-256, the hash behind reference-data and definition hashes.
pub fn sha3_256(data: &[u8]) -> [u8; 32] {
    Sha3_256::digest(data).into()
}

/// Compute a domain-separated SHA3-256 over a sequence of byte slices.
///
/// The digest covers `len(tag) || tag || parts[0] || parts[1] || ...`,
/// where `len(tag)` is a single byte. Two different tags can never
/// produce the same preimage, so identifiers computed under different
/// tags live in disjoint hash domains even when the payload bytes agree.
///
/// Tags are protocol constants shorter than 256 bytes.
pub fn tagged_sha3_256(tag: &str, parts: &[&[u8]]) -> [u8; 32] {
    debug_assert!(tag.len() <= u8::MAX as usize);
    let mut hasher = Sha3_256::new();
    hasher.update([tag.len() as u8]);
    hasher.update(tag.as_bytes());
    for part in parts {
        hasher.update(part);
    }
    hasher.finalize().into()
}
