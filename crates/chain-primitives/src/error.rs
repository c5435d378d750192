/// Errors from decoding hashes, keys and signatures.
#[derive(Debug, thiserror::Error)]
pub enum PrimitivesError {
    #[error("invalid hash: {0}")]
    InvalidHash(String),

    #[error("invalid hex: {0}")]
    InvalidHex(#[from] hex::FromHexError),

    #[error("invalid private key: {0}")]
    InvalidPrivateKey(String),

    #[error("invalid public key: {0}")]
    InvalidPublicKey(String),

    #[error("malformed signature: {0}")]
    InvalidSignature(String),
}
