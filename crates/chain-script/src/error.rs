use crate::interpreter::InterpreterError;

/// Errors from building, parsing and disassembling scripts.
#[derive(Debug, thiserror::Error)]
pub enum ScriptError {
    /// A token in an assembly string is neither an opcode nor hex data.
    #[error("invalid assembly token '{0}'")]
    InvalidAsm(String),

    /// Attempted to append a push opcode without its data.
    #[error("use append_push_data for push data opcodes: {0}")]
    InvalidOpcodeType(String),

    #[error("invalid hex: {0}")]
    InvalidHex(#[from] hex::FromHexError),

    #[error("data too big")]
    DataTooBig,

    /// The push at this position is too large to encode.
    #[error("part too big '{0}'")]
    PartTooBig(usize),

    /// The script bytes do not decode.
    #[error("malformed script: {0}")]
    Malformed(#[from] InterpreterError),
}
