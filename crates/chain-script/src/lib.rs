//! Chain protocol scripts.
//!
//! The opcode table with per-version gating, the instruction decoder and
//! disassembler, a script builder, and the interpreter that runs witness
//! and authorizing programs against a transaction context.

pub mod chunk;
pub mod interpreter;
pub mod opcodes;
pub mod script;

mod error;
pub use error::ScriptError;
pub use interpreter::parsed_opcode::ParsedOpcode;
pub use opcodes::{OpcodeInfo, MAX_SCRIPT_VERSION};
pub use script::Script;
