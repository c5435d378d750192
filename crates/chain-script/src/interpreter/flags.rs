//! Script verification flags (bitmask).

use std::ops::{BitAnd, BitOr, BitOrAssign};

/// Script verification flags controlling interpreter behavior.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ScriptFlags(pub u32);

impl ScriptFlags {
    pub const NONE: ScriptFlags = ScriptFlags(0);
    /// Treat OP_NOP1 and OP_NOP3..OP_NOP10 as errors.
    pub const DISCOURAGE_UPGRADABLE_NOPS: ScriptFlags = ScriptFlags(1 << 0);
    /// Exactly one item may remain on the stack at the end.
    pub const VERIFY_CLEAN_STACK: ScriptFlags = ScriptFlags(1 << 1);
    /// Pushes and numeric operands must use their shortest encoding.
    pub const VERIFY_MINIMAL_DATA: ScriptFlags = ScriptFlags(1 << 2);
    /// The unlocking script may contain only push opcodes.
    pub const VERIFY_SIG_PUSH_ONLY: ScriptFlags = ScriptFlags(1 << 3);
    /// An empty stack at the end counts as success.
    pub const ALLOW_EMPTY_STACK: ScriptFlags = ScriptFlags(1 << 4);

    /// Mode used when validating transactions.
    pub const STANDARD: ScriptFlags = ScriptFlags(
        Self::VERIFY_CLEAN_STACK.0 | Self::VERIFY_MINIMAL_DATA.0 | Self::VERIFY_SIG_PUSH_ONLY.0,
    );

    pub fn has_flag(self, flag: ScriptFlags) -> bool {
        self.0 & flag.0 == flag.0
    }
}

impl BitOr for ScriptFlags {
    type Output = Self;
    fn bitor(self, rhs: Self) -> Self {
        ScriptFlags(self.0 | rhs.0)
    }
}

impl BitOrAssign for ScriptFlags {
    fn bitor_assign(&mut self, rhs: Self) {
        self.0 |= rhs.0;
    }
}

impl BitAnd for ScriptFlags {
    type Output = Self;
    fn bitand(self, rhs: Self) -> Self {
        ScriptFlags(self.0 & rhs.0)
    }
}
