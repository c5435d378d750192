use std::fmt;

/// Why a script failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InterpreterErrorCode {
    // Decoding and setup.
    MalformedPush,
    UnsupportedVersion,
    ScriptTooBig,
    NotPushOnly,
    MissingContext,

    // Resource limits.
    ElementTooBig,
    TooManyOperations,
    TooManyIterations,
    EvalDepth,
    StackOverflow,
    NumberTooBig,

    // Opcode rules.
    DisabledOpcode,
    ReservedOpcode,
    DiscourageUpgradableNOPs,
    EarlyReturn,
    UnbalancedConditional,
    MinimalData,
    InvalidStackOperation,
    InvalidRange,
    DivideByZero,
    InvalidPubKeyCount,
    InvalidSignatureCount,
    NegativeLockTime,
    UnsatisfiedLockTime,
    UnknownAsset,

    // Failed checks.
    Verify,
    EqualVerify,
    NumEqualVerify,
    CheckSigVerify,
    CheckMultiSigVerify,

    // Final stack.
    EmptyStack,
    EvalFalse,
    CleanStack,
}

impl fmt::Display for InterpreterErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

/// A script failure: what kind, and a message naming the offending values.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{code}: {description}")]
pub struct InterpreterError {
    pub code: InterpreterErrorCode,
    pub description: String,
}

impl InterpreterError {
    pub fn new(code: InterpreterErrorCode, description: String) -> Self {
        InterpreterError { code, description }
    }
}
