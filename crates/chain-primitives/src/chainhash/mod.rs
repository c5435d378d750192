//! 32-byte identifier type.
//!
//! Every content-addressed value in the protocol (entry IDs, transaction
//! IDs, asset IDs, signature hashes) is a `Hash`. Unlike Bitcoin-style
//! hashes the bytes are displayed in storage order, so the hex string of a
//! `Hash` is exactly the hex of the digest bytes.

use std::fmt;
use std::str::FromStr;
use serde::{Serialize, Deserialize, Serializer, Deserializer};
use crate::hash::{sha3_256, tagged_sha3_256};
use crate::PrimitivesError;

/// Size of a Hash in bytes.
pub const HASH_SIZE: usize = 32;

/// A 32-byte content hash.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Default, PartialOrd, Ord)]
pub struct Hash([u8; HASH_SIZE]);

/// Asset identifiers share the representation of every other hash.
pub type AssetId = Hash;

impl Hash {
    pub const fn new(bytes: [u8; HASH_SIZE]) -> Self {
        Hash(bytes)
    }

    /// Take a hash from a slice that must be exactly 32 bytes.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, PrimitivesError> {
        <[u8; HASH_SIZE]>::try_from(bytes).map(Hash).map_err(|_| {
            PrimitivesError::InvalidHash(format!("{} bytes, want {}", bytes.len(), HASH_SIZE))
        })
    }

    /// Parse the 64-character hex form produced by `Display`.
    pub fn from_hex(hex_str: &str) -> Result<Self, PrimitivesError> {
        let mut bytes = [0u8; HASH_SIZE];
        hex::decode_to_slice(hex_str, &mut bytes)?;
        Ok(Hash(bytes))
    }

    pub fn as_bytes(&self) -> &[u8; HASH_SIZE] {
        &self.0
    }

    pub fn to_vec(&self) -> Vec<u8> {
        self.0.to_vec()
    }

    pub fn is_zero(&self) -> bool {
        self.0 == [0u8; HASH_SIZE]
    }
}

impl AsRef<[u8]> for Hash {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl From<[u8; HASH_SIZE]> for Hash {
    fn from(bytes: [u8; HASH_SIZE]) -> Self {
        Hash(bytes)
    }
}

impl fmt::Display for Hash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&hex::encode(self.0))
    }
}

impl FromStr for Hash {
    type Err = PrimitivesError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Hash::from_hex(s)
    }
}

impl Serialize for Hash {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Hash {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// Plain SHA3-256 as a `Hash`; used for definition and reference-data hashes.
pub fn hash_h(data: &[u8]) -> Hash {
    Hash(sha3_256(data))
}

/// [`tagged_sha3_256`] as a `Hash`.
pub fn tagged_hash(tag: &str, parts: &[&[u8]]) -> Hash {
    Hash(tagged_sha3_256(tag, parts))
}
