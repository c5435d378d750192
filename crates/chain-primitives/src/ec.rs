//! secp256k1 keys and the DER-encoded ECDSA signatures that the script
//! signature opcodes check.
//!
//! Signatures are made over a 32-byte prehash (the transaction signature
//! hash) with RFC6979 nonces and are always low-S.

use std::fmt;

use k256::ecdsa::signature::hazmat::{PrehashSigner, PrehashVerifier};
use k256::ecdsa::{SigningKey, VerifyingKey};
use rand::rngs::OsRng;

use crate::PrimitivesError;

const PREHASH_LEN: usize = 32;

fn check_prehash(hash: &[u8]) -> Result<(), PrimitivesError> {
    if hash.len() != PREHASH_LEN {
        return Err(PrimitivesError::InvalidSignature(format!(
            "message hash must be {} bytes, got {}",
            PREHASH_LEN,
            hash.len()
        )));
    }
    Ok(())
}

/// A secp256k1 private key.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PrivateKey(SigningKey);

impl PrivateKey {
    /// A fresh key from the OS random number generator.
    pub fn random() -> Self {
        PrivateKey(SigningKey::random(&mut OsRng))
    }

    /// Parse a 32-byte big-endian scalar. Zero and values at or above the
    /// curve order are rejected.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, PrimitivesError> {
        if bytes.len() != 32 {
            return Err(PrimitivesError::InvalidPrivateKey(format!(
                "expected 32 bytes, got {}",
                bytes.len()
            )));
        }
        SigningKey::from_slice(bytes)
            .map(PrivateKey)
            .map_err(|e| PrimitivesError::InvalidPrivateKey(e.to_string()))
    }

    pub fn from_hex(hex_str: &str) -> Result<Self, PrimitivesError> {
        Self::from_bytes(&hex::decode(hex_str)?)
    }

    pub fn to_bytes(&self) -> [u8; 32] {
        self.0.to_bytes().into()
    }

    pub fn pub_key(&self) -> PublicKey {
        PublicKey(*self.0.verifying_key())
    }

    /// Sign a 32-byte hash.
    pub fn sign(&self, hash: &[u8]) -> Result<Signature, PrimitivesError> {
        check_prehash(hash)?;
        let sig: k256::ecdsa::Signature = self
            .0
            .sign_prehash(hash)
            .map_err(|e| PrimitivesError::InvalidSignature(e.to_string()))?;
        Ok(Signature(sig.normalize_s().unwrap_or(sig)))
    }
}

/// A secp256k1 public key, carried in scripts in SEC1 form.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PublicKey(VerifyingKey);

impl PublicKey {
    /// Parse a compressed (33-byte) or uncompressed (65-byte) SEC1 key.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, PrimitivesError> {
        VerifyingKey::from_sec1_bytes(bytes)
            .map(PublicKey)
            .map_err(|e| PrimitivesError::InvalidPublicKey(e.to_string()))
    }

    pub fn from_hex(hex_str: &str) -> Result<Self, PrimitivesError> {
        Self::from_bytes(&hex::decode(hex_str)?)
    }

    pub fn to_compressed(&self) -> [u8; 33] {
        let mut out = [0u8; 33];
        out.copy_from_slice(self.0.to_encoded_point(true).as_bytes());
        out
    }

    /// Check `sig` over a 32-byte hash. Any other hash length fails.
    pub fn verify(&self, hash: &[u8], sig: &Signature) -> bool {
        hash.len() == PREHASH_LEN && self.0.verify_prehash(hash, &sig.0).is_ok()
    }
}

impl fmt::Display for PublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", hex::encode(self.to_compressed()))
    }
}

/// An ECDSA signature.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Signature(k256::ecdsa::Signature);

impl Signature {
    /// Parse a strict DER `SEQUENCE { r INTEGER, s INTEGER }` with no
    /// trailing bytes. Zero scalars and scalars at or above the curve
    /// order are rejected.
    pub fn from_der(bytes: &[u8]) -> Result<Self, PrimitivesError> {
        k256::ecdsa::Signature::from_der(bytes)
            .map(Signature)
            .map_err(|e| PrimitivesError::InvalidSignature(e.to_string()))
    }

    pub fn to_der(&self) -> Vec<u8> {
        self.0.to_der().as_bytes().to_vec()
    }

    /// True if S is in the lower half of the curve order.
    pub fn is_low_s(&self) -> bool {
        self.0.normalize_s().is_none()
    }
}
