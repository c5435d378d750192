//! Content-addressed transaction entries.
//!
//! Each entry variant has its own canonical body encoding and its own
//! hash domain (`entryid:<type>`), so bodies of different variants can
//! never share an ID even when their encoded bytes coincide. Entries
//! reference each other only by ID.
//!
//! # Body encoding
//!
//! Fields are written in declaration order: hashes as 32 raw bytes,
//! integers as 8-byte little endian, byte strings and lists with a
//! VarInt length prefix.

use chain_primitives::chainhash::tagged_hash;
use chain_primitives::encoding::{ByteWriter, VarInt};
use chain_primitives::{AssetId, Hash};
use serde::Serialize;

/// An amount of one asset.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct AssetAmount {
    pub asset_id: AssetId,
    pub amount: u64,
}

impl AssetAmount {
    fn write(&self, w: &mut ByteWriter) {
        w.write_hash(&self.asset_id);
        w.write_u64_le(self.amount);
    }
}

/// A program together with the version of the language it is written in.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Program {
    pub vm_version: u64,
    #[serde(with = "hex")]
    pub code: Vec<u8>,
}

impl Program {
    fn write(&self, w: &mut ByteWriter) {
        w.write_u64_le(self.vm_version);
        w.write_varstr(&self.code);
    }
}

/// Where an amount of value comes from: position `position` of entry `ref_id`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct ValueSource {
    pub ref_id: Hash,
    pub value: AssetAmount,
    pub position: u64,
}

impl ValueSource {
    fn write(&self, w: &mut ByteWriter) {
        w.write_hash(&self.ref_id);
        self.value.write(w);
        w.write_u64_le(self.position);
    }
}

/// Root of a transaction's graph. Its ID is the transaction ID.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Header {
    pub version: u64,
    /// Outputs and retirements, in output order.
    pub results: Vec<Hash>,
    pub data: Hash,
    pub min_time_ms: u64,
    pub max_time_ms: u64,
}

impl Header {
    fn write_body(&self, w: &mut ByteWriter) {
        w.write_u64_le(self.version);
        w.write_varint(VarInt(self.results.len() as u64));
        for r in &self.results {
            w.write_hash(r);
        }
        w.write_hash(&self.data);
        w.write_u64_le(self.min_time_ms);
        w.write_u64_le(self.max_time_ms);
    }
}

/// Collects the value of every input and hands it out to the results.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Mux {
    pub sources: Vec<ValueSource>,
}

impl Mux {
    fn write_body(&self, w: &mut ByteWriter) {
        w.write_varint(VarInt(self.sources.len() as u64));
        for s in &self.sources {
            s.write(w);
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Spend {
    pub spent_output: Hash,
    /// The program that must authorize the spend.
    pub program: Program,
    pub data: Hash,
}

impl Spend {
    fn write_body(&self, w: &mut ByteWriter) {
        w.write_hash(&self.spent_output);
        self.program.write(w);
        w.write_hash(&self.data);
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Issuance {
    /// The Nonce bounding the issuance's replay window.
    pub anchor: Hash,
    pub value: AssetAmount,
    pub data: Hash,
}

impl Issuance {
    fn write_body(&self, w: &mut ByteWriter) {
        w.write_hash(&self.anchor);
        self.value.write(w);
        w.write_hash(&self.data);
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Output {
    pub source: ValueSource,
    pub control_program: Program,
    pub data: Hash,
}

impl Output {
    fn write_body(&self, w: &mut ByteWriter) {
        self.source.write(w);
        self.control_program.write(w);
        w.write_hash(&self.data);
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Retirement {
    pub source: ValueSource,
    pub data: Hash,
}

impl Retirement {
    fn write_body(&self, w: &mut ByteWriter) {
        self.source.write(w);
        w.write_hash(&self.data);
    }
}

/// Ties an issuance to a validity window.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Nonce {
    pub program: Program,
    pub time_range: Hash,
}

impl Nonce {
    fn write_body(&self, w: &mut ByteWriter) {
        self.program.write(w);
        w.write_hash(&self.time_range);
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct TimeRange {
    pub min_time_ms: u64,
    pub max_time_ms: u64,
}

impl TimeRange {
    fn write_body(&self, w: &mut ByteWriter) {
        w.write_u64_le(self.min_time_ms);
        w.write_u64_le(self.max_time_ms);
    }
}

/// A node of the transaction graph.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case", tag = "type")]
pub enum Entry {
    Header(Header),
    Mux(Mux),
    Spend(Spend),
    Issuance(Issuance),
    Output(Output),
    Retirement(Retirement),
    Nonce(Nonce),
    TimeRange(TimeRange),
}

impl Entry {
    pub fn type_name(&self) -> &'static str {
        match self {
            Entry::Header(_) => "txheader",
            Entry::Mux(_) => "mux",
            Entry::Spend(_) => "spend",
            Entry::Issuance(_) => "issuance",
            Entry::Output(_) => "output",
            Entry::Retirement(_) => "retirement",
            Entry::Nonce(_) => "nonce",
            Entry::TimeRange(_) => "timerange",
        }
    }

    /// Canonical encoding of the entry body.
    pub fn body_bytes(&self) -> Vec<u8> {
        let mut w = ByteWriter::new();
        match self {
            Entry::Header(e) => e.write_body(&mut w),
            Entry::Mux(e) => e.write_body(&mut w),
            Entry::Spend(e) => e.write_body(&mut w),
            Entry::Issuance(e) => e.write_body(&mut w),
            Entry::Output(e) => e.write_body(&mut w),
            Entry::Retirement(e) => e.write_body(&mut w),
            Entry::Nonce(e) => e.write_body(&mut w),
            Entry::TimeRange(e) => e.write_body(&mut w),
        }
        w.into_bytes()
    }

    /// The entry ID: the body hashed under the variant's own tag.
    pub fn id(&self) -> Hash {
        let tag = format!("entryid:{}", self.type_name());
        tagged_hash(&tag, &[&self.body_bytes()])
    }
}
