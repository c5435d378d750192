//! Canonical byte encoding of entry bodies.
//!
//! Fixed-width integers are little-endian, counts are VarInts, and every
//! variable-length field carries a VarInt length prefix, so concatenated
//! fields never alias one another.

use crate::Hash;

/// A variable-length unsigned integer: one byte below `0xfd`, otherwise a
/// `0xfd`/`0xfe`/`0xff` marker followed by a little-endian u16/u32/u64.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct VarInt(pub u64);

impl VarInt {
    pub fn encoded_len(&self) -> usize {
        match self.0 {
            0..=0xfc => 1,
            0xfd..=0xffff => 3,
            0x1_0000..=0xffff_ffff => 5,
            _ => 9,
        }
    }

    pub fn encode(&self) -> Vec<u8> {
        let v = self.0;
        let le = v.to_le_bytes();
        match self.encoded_len() {
            1 => vec![v as u8],
            3 => [&[0xfd][..], &le[..2]].concat(),
            5 => [&[0xfe][..], &le[..4]].concat(),
            _ => [&[0xff][..], &le[..]].concat(),
        }
    }
}

impl From<usize> for VarInt {
    fn from(v: usize) -> Self {
        VarInt(v as u64)
    }
}

/// Append-only buffer that produces the canonical encoding.
#[derive(Debug, Default)]
pub struct ByteWriter {
    buf: Vec<u8>,
}

impl ByteWriter {
    pub fn new() -> Self {
        ByteWriter::default()
    }

    /// Raw bytes, no length prefix.
    pub fn write_bytes(&mut self, bytes: &[u8]) {
        self.buf.extend_from_slice(bytes);
    }

    pub fn write_u64_le(&mut self, val: u64) {
        self.write_bytes(&val.to_le_bytes());
    }

    pub fn write_varint(&mut self, varint: VarInt) {
        self.write_bytes(&varint.encode());
    }

    /// A byte string with its VarInt length prefix.
    pub fn write_varstr(&mut self, bytes: &[u8]) {
        self.write_varint(VarInt::from(bytes.len()));
        self.write_bytes(bytes);
    }

    /// A hash as its 32 raw bytes.
    pub fn write_hash(&mut self, hash: &Hash) {
        self.write_bytes(hash.as_bytes());
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.buf
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.buf
    }
}
