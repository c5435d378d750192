//! Opcode constants and the static opcode table.
//!
//! Every byte value maps to exactly one [`OpcodeInfo`] in [`OPCODE_TABLE`].
//! Whether an opcode may run is a pure function of the table entry and
//! the program's script version, see [`OpcodeInfo::is_disabled`].

/// Highest script version the interpreter knows how to execute.
pub const MAX_SCRIPT_VERSION: u32 = 2;

// Push value
pub const OP_0: u8 = 0x00;
pub const OP_FALSE: u8 = 0x00;
pub const OP_DATA_1: u8 = 0x01;
pub const OP_DATA_2: u8 = 0x02;
pub const OP_DATA_3: u8 = 0x03;
pub const OP_DATA_4: u8 = 0x04;
pub const OP_DATA_5: u8 = 0x05;
pub const OP_DATA_6: u8 = 0x06;
pub const OP_DATA_7: u8 = 0x07;
pub const OP_DATA_8: u8 = 0x08;
pub const OP_DATA_9: u8 = 0x09;
pub const OP_DATA_10: u8 = 0x0a;
pub const OP_DATA_11: u8 = 0x0b;
pub const OP_DATA_12: u8 = 0x0c;
pub const OP_DATA_13: u8 = 0x0d;
pub const OP_DATA_14: u8 = 0x0e;
pub const OP_DATA_15: u8 = 0x0f;
pub const OP_DATA_16: u8 = 0x10;
pub const OP_DATA_17: u8 = 0x11;
pub const OP_DATA_18: u8 = 0x12;
pub const OP_DATA_19: u8 = 0x13;
pub const OP_DATA_20: u8 = 0x14;
pub const OP_DATA_21: u8 = 0x15;
pub const OP_DATA_22: u8 = 0x16;
pub const OP_DATA_23: u8 = 0x17;
pub const OP_DATA_24: u8 = 0x18;
pub const OP_DATA_25: u8 = 0x19;
pub const OP_DATA_26: u8 = 0x1a;
pub const OP_DATA_27: u8 = 0x1b;
pub const OP_DATA_28: u8 = 0x1c;
pub const OP_DATA_29: u8 = 0x1d;
pub const OP_DATA_30: u8 = 0x1e;
pub const OP_DATA_31: u8 = 0x1f;
pub const OP_DATA_32: u8 = 0x20;
pub const OP_DATA_33: u8 = 0x21;
pub const OP_DATA_34: u8 = 0x22;
pub const OP_DATA_35: u8 = 0x23;
pub const OP_DATA_36: u8 = 0x24;
pub const OP_DATA_37: u8 = 0x25;
pub const OP_DATA_38: u8 = 0x26;
pub const OP_DATA_39: u8 = 0x27;
pub const OP_DATA_40: u8 = 0x28;
pub const OP_DATA_41: u8 = 0x29;
pub const OP_DATA_42: u8 = 0x2a;
pub const OP_DATA_43: u8 = 0x2b;
pub const OP_DATA_44: u8 = 0x2c;
pub const OP_DATA_45: u8 = 0x2d;
pub const OP_DATA_46: u8 = 0x2e;
pub const OP_DATA_47: u8 = 0x2f;
pub const OP_DATA_48: u8 = 0x30;
pub const OP_DATA_49: u8 = 0x31;
pub const OP_DATA_50: u8 = 0x32;
pub const OP_DATA_51: u8 = 0x33;
pub const OP_DATA_52: u8 = 0x34;
pub const OP_DATA_53: u8 = 0x35;
pub const OP_DATA_54: u8 = 0x36;
pub const OP_DATA_55: u8 = 0x37;
pub const OP_DATA_56: u8 = 0x38;
pub const OP_DATA_57: u8 = 0x39;
pub const OP_DATA_58: u8 = 0x3a;
pub const OP_DATA_59: u8 = 0x3b;
pub const OP_DATA_60: u8 = 0x3c;
pub const OP_DATA_61: u8 = 0x3d;
pub const OP_DATA_62: u8 = 0x3e;
pub const OP_DATA_63: u8 = 0x3f;
pub const OP_DATA_64: u8 = 0x40;
pub const OP_DATA_65: u8 = 0x41;
pub const OP_DATA_66: u8 = 0x42;
pub const OP_DATA_67: u8 = 0x43;
pub const OP_DATA_68: u8 = 0x44;
pub const OP_DATA_69: u8 = 0x45;
pub const OP_DATA_70: u8 = 0x46;
pub const OP_DATA_71: u8 = 0x47;
pub const OP_DATA_72: u8 = 0x48;
pub const OP_DATA_73: u8 = 0x49;
pub const OP_DATA_74: u8 = 0x4a;
pub const OP_DATA_75: u8 = 0x4b;
pub const OP_PUSHDATA1: u8 = 0x4c;
pub const OP_PUSHDATA2: u8 = 0x4d;
pub const OP_PUSHDATA4: u8 = 0x4e;
pub const OP_1NEGATE: u8 = 0x4f;
pub const OP_RESERVED: u8 = 0x50;
pub const OP_1: u8 = 0x51;
pub const OP_TRUE: u8 = 0x51;
pub const OP_2: u8 = 0x52;
pub const OP_3: u8 = 0x53;
pub const OP_4: u8 = 0x54;
pub const OP_5: u8 = 0x55;
pub const OP_6: u8 = 0x56;
pub const OP_7: u8 = 0x57;
pub const OP_8: u8 = 0x58;
pub const OP_9: u8 = 0x59;
pub const OP_10: u8 = 0x5a;
pub const OP_11: u8 = 0x5b;
pub const OP_12: u8 = 0x5c;
pub const OP_13: u8 = 0x5d;
pub const OP_14: u8 = 0x5e;
pub const OP_15: u8 = 0x5f;
pub const OP_16: u8 = 0x60;

// Control
pub const OP_NOP: u8 = 0x61;
pub const OP_VER: u8 = 0x62;
pub const OP_IF: u8 = 0x63;
pub const OP_NOTIF: u8 = 0x64;
pub const OP_VERIF: u8 = 0x65;
pub const OP_VERNOTIF: u8 = 0x66;
pub const OP_ELSE: u8 = 0x67;
pub const OP_ENDIF: u8 = 0x68;
pub const OP_VERIFY: u8 = 0x69;
pub const OP_RETURN: u8 = 0x6a;
pub const OP_FAIL: u8 = 0x6a;

// Stack
pub const OP_TOALTSTACK: u8 = 0x6b;
pub const OP_FROMALTSTACK: u8 = 0x6c;
pub const OP_2DROP: u8 = 0x6d;
pub const OP_2DUP: u8 = 0x6e;
pub const OP_3DUP: u8 = 0x6f;
pub const OP_2OVER: u8 = 0x70;
pub const OP_2ROT: u8 = 0x71;
pub const OP_2SWAP: u8 = 0x72;
pub const OP_IFDUP: u8 = 0x73;
pub const OP_DEPTH: u8 = 0x74;
pub const OP_DROP: u8 = 0x75;
pub const OP_DUP: u8 = 0x76;
pub const OP_NIP: u8 = 0x77;
pub const OP_OVER: u8 = 0x78;
pub const OP_PICK: u8 = 0x79;
pub const OP_ROLL: u8 = 0x7a;
pub const OP_ROT: u8 = 0x7b;
pub const OP_SWAP: u8 = 0x7c;
pub const OP_TUCK: u8 = 0x7d;

// Splice
pub const OP_CAT: u8 = 0x7e;
pub const OP_SUBSTR: u8 = 0x7f;
pub const OP_LEFT: u8 = 0x80;
pub const OP_RIGHT: u8 = 0x81;
pub const OP_SIZE: u8 = 0x82;

// Bitwise logic
pub const OP_INVERT: u8 = 0x83;
pub const OP_AND: u8 = 0x84;
pub const OP_OR: u8 = 0x85;
pub const OP_XOR: u8 = 0x86;
pub const OP_EQUAL: u8 = 0x87;
pub const OP_EQUALVERIFY: u8 = 0x88;
pub const OP_RESERVED1: u8 = 0x89;
pub const OP_RESERVED2: u8 = 0x8a;

// Arithmetic
pub const OP_1ADD: u8 = 0x8b;
pub const OP_1SUB: u8 = 0x8c;
pub const OP_2MUL: u8 = 0x8d;
pub const OP_2DIV: u8 = 0x8e;
pub const OP_NEGATE: u8 = 0x8f;
pub const OP_ABS: u8 = 0x90;
pub const OP_NOT: u8 = 0x91;
pub const OP_0NOTEQUAL: u8 = 0x92;
pub const OP_ADD: u8 = 0x93;
pub const OP_SUB: u8 = 0x94;
pub const OP_MUL: u8 = 0x95;
pub const OP_DIV: u8 = 0x96;
pub const OP_MOD: u8 = 0x97;
pub const OP_LSHIFT: u8 = 0x98;
pub const OP_RSHIFT: u8 = 0x99;
pub const OP_BOOLAND: u8 = 0x9a;
pub const OP_BOOLOR: u8 = 0x9b;
pub const OP_NUMEQUAL: u8 = 0x9c;
pub const OP_NUMEQUALVERIFY: u8 = 0x9d;
pub const OP_NUMNOTEQUAL: u8 = 0x9e;
pub const OP_LESSTHAN: u8 = 0x9f;
pub const OP_GREATERTHAN: u8 = 0xa0;
pub const OP_LESSTHANOREQUAL: u8 = 0xa1;
pub const OP_GREATERTHANOREQUAL: u8 = 0xa2;
pub const OP_MIN: u8 = 0xa3;
pub const OP_MAX: u8 = 0xa4;
pub const OP_WITHIN: u8 = 0xa5;

// Crypto
pub const OP_RIPEMD160: u8 = 0xa6;
pub const OP_SHA1: u8 = 0xa7;
pub const OP_SHA256: u8 = 0xa8;
pub const OP_HASH160: u8 = 0xa9;
pub const OP_HASH256: u8 = 0xaa;
pub const OP_CODESEPARATOR: u8 = 0xab;
pub const OP_CHECKSIG: u8 = 0xac;
pub const OP_CHECKSIGVERIFY: u8 = 0xad;
pub const OP_CHECKMULTISIG: u8 = 0xae;
pub const OP_CHECKMULTISIGVERIFY: u8 = 0xaf;

// Expansion
pub const OP_NOP1: u8 = 0xb0;
pub const OP_CHECKLOCKTIMEVERIFY: u8 = 0xb1;
pub const OP_NOP2: u8 = 0xb1;
pub const OP_NOP3: u8 = 0xb2;
pub const OP_NOP4: u8 = 0xb3;
pub const OP_NOP5: u8 = 0xb4;
pub const OP_NOP6: u8 = 0xb5;
pub const OP_NOP7: u8 = 0xb6;
pub const OP_NOP8: u8 = 0xb7;
pub const OP_NOP9: u8 = 0xb8;
pub const OP_NOP10: u8 = 0xb9;

// Introspection
pub const OP_EVAL: u8 = 0xc0;
pub const OP_REQUIREOUTPUT: u8 = 0xc1;
pub const OP_ASSET: u8 = 0xc2;
pub const OP_AMOUNT: u8 = 0xc3;
pub const OP_OUTPUTSCRIPT: u8 = 0xc4;
pub const OP_TIME: u8 = 0xc5;
pub const OP_CIRCULATION: u8 = 0xc6;
pub const OP_CATPUSHDATA: u8 = 0xc7;

// Loops
pub const OP_WHILE: u8 = 0xd0;
pub const OP_ENDWHILE: u8 = 0xd1;

// Template matching
pub const OP_SMALLDATA: u8 = 0xf9;
pub const OP_SMALLINTEGER: u8 = 0xfa;
pub const OP_PUBKEYS: u8 = 0xfb;
pub const OP_PUBKEYHASH: u8 = 0xfd;
pub const OP_PUBKEY: u8 = 0xfe;
pub const OP_INVALIDOPCODE: u8 = 0xff;

/// Static description of one opcode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OpcodeInfo {
    /// The opcode byte.
    pub value: u8,
    /// Canonical name, e.g. `OP_CHECKSIG`.
    pub name: &'static str,
    /// Encoded length class: `1` for a bare opcode, `n + 1` for a fixed
    /// push of `n` bytes, and `-1`, `-2` or `-4` for pushes preceded by a
    /// little-endian length of that many bytes.
    pub length: i8,
    /// First script version in which the opcode may execute.
    pub min_version: u32,
    /// Never executable, in any version.
    pub always_disabled: bool,
}

impl OpcodeInfo {
    /// Report whether this opcode is disabled for a program of `version`.
    pub fn is_disabled(&self, version: u32) -> bool {
        self.always_disabled || version < self.min_version
    }

    /// True for opcodes that only push data onto the stack.
    pub fn is_push(&self) -> bool {
        self.value <= OP_16 && self.value != OP_RESERVED
    }

    /// True for opcodes that must be seen even inside a non-executing branch.
    pub fn is_conditional(&self) -> bool {
        matches!(
            self.value,
            OP_IF | OP_NOTIF | OP_ELSE | OP_ENDIF | OP_VERIF | OP_VERNOTIF | OP_WHILE | OP_ENDWHILE
        )
    }
}

const fn op(value: u8, name: &'static str, length: i8) -> OpcodeInfo {
    OpcodeInfo { value, name, length, min_version: 0, always_disabled: false }
}

const fn since(value: u8, name: &'static str, min_version: u32) -> OpcodeInfo {
    OpcodeInfo { value, name, length: 1, min_version, always_disabled: false }
}

const fn disabled(value: u8, name: &'static str) -> OpcodeInfo {
    OpcodeInfo { value, name, length: 1, min_version: 0, always_disabled: true }
}

/// The opcode table, indexed by opcode byte.
pub static OPCODE_TABLE: [OpcodeInfo; 256] = [
    op(OP_0, "OP_0", 1),
    op(OP_DATA_1, "OP_DATA_1", 2),
    op(OP_DATA_2, "OP_DATA_2", 3),
    op(OP_DATA_3, "OP_DATA_3", 4),
    op(OP_DATA_4, "OP_DATA_4", 5),
    op(OP_DATA_5, "OP_DATA_5", 6),
    op(OP_DATA_6, "OP_DATA_6", 7),
    op(OP_DATA_7, "OP_DATA_7", 8),
    op(OP_DATA_8, "OP_DATA_8", 9),
    op(OP_DATA_9, "OP_DATA_9", 10),
    op(OP_DATA_10, "OP_DATA_10", 11),
    op(OP_DATA_11, "OP_DATA_11", 12),
    op(OP_DATA_12, "OP_DATA_12", 13),
    op(OP_DATA_13, "OP_DATA_13", 14),
    op(OP_DATA_14, "OP_DATA_14", 15),
    op(OP_DATA_15, "OP_DATA_15", 16),
    op(OP_DATA_16, "OP_DATA_16", 17),
    op(OP_DATA_17, "OP_DATA_17", 18),
    op(OP_DATA_18, "OP_DATA_18", 19),
    op(OP_DATA_19, "OP_DATA_19", 20),
    op(OP_DATA_20, "OP_DATA_20", 21),
    op(OP_DATA_21, "OP_DATA_21", 22),
    op(OP_DATA_22, "OP_DATA_22", 23),
    op(OP_DATA_23, "OP_DATA_23", 24),
    op(OP_DATA_24, "OP_DATA_24", 25),
    op(OP_DATA_25, "OP_DATA_25", 26),
    op(OP_DATA_26, "OP_DATA_26", 27),
    op(OP_DATA_27, "OP_DATA_27", 28),
    op(OP_DATA_28, "OP_DATA_28", 29),
    op(OP_DATA_29, "OP_DATA_29", 30),
    op(OP_DATA_30, "OP_DATA_30", 31),
    op(OP_DATA_31, "OP_DATA_31", 32),
    op(OP_DATA_32, "OP_DATA_32", 33),
    op(OP_DATA_33, "OP_DATA_33", 34),
    op(OP_DATA_34, "OP_DATA_34", 35),
    op(OP_DATA_35, "OP_DATA_35", 36),
    op(OP_DATA_36, "OP_DATA_36", 37),
    op(OP_DATA_37, "OP_DATA_37", 38),
    op(OP_DATA_38, "OP_DATA_38", 39),
    op(OP_DATA_39, "OP_DATA_39", 40),
    op(OP_DATA_40, "OP_DATA_40", 41),
    op(OP_DATA_41, "OP_DATA_41", 42),
    op(OP_DATA_42, "OP_DATA_42", 43),
    op(OP_DATA_43, "OP_DATA_43", 44),
    op(OP_DATA_44, "OP_DATA_44", 45),
    op(OP_DATA_45, "OP_DATA_45", 46),
    op(OP_DATA_46, "OP_DATA_46", 47),
    op(OP_DATA_47, "OP_DATA_47", 48),
    op(OP_DATA_48, "OP_DATA_48", 49),
    op(OP_DATA_49, "OP_DATA_49", 50),
    op(OP_DATA_50, "OP_DATA_50", 51),
    op(OP_DATA_51, "OP_DATA_51", 52),
    op(OP_DATA_52, "OP_DATA_52", 53),
    op(OP_DATA_53, "OP_DATA_53", 54),
    op(OP_DATA_54, "OP_DATA_54", 55),
    op(OP_DATA_55, "OP_DATA_55", 56),
    op(OP_DATA_56, "OP_DATA_56", 57),
    op(OP_DATA_57, "OP_DATA_57", 58),
    op(OP_DATA_58, "OP_DATA_58", 59),
    op(OP_DATA_59, "OP_DATA_59", 60),
    op(OP_DATA_60, "OP_DATA_60", 61),
    op(OP_DATA_61, "OP_DATA_61", 62),
    op(OP_DATA_62, "OP_DATA_62", 63),
    op(OP_DATA_63, "OP_DATA_63", 64),
    op(OP_DATA_64, "OP_DATA_64", 65),
    op(OP_DATA_65, "OP_DATA_65", 66),
    op(OP_DATA_66, "OP_DATA_66", 67),
    op(OP_DATA_67, "OP_DATA_67", 68),
    op(OP_DATA_68, "OP_DATA_68", 69),
    op(OP_DATA_69, "OP_DATA_69", 70),
    op(OP_DATA_70, "OP_DATA_70", 71),
    op(OP_DATA_71, "OP_DATA_71", 72),
    op(OP_DATA_72, "OP_DATA_72", 73),
    op(OP_DATA_73, "OP_DATA_73", 74),
    op(OP_DATA_74, "OP_DATA_74", 75),
    op(OP_DATA_75, "OP_DATA_75", 76),
    op(OP_PUSHDATA1, "OP_PUSHDATA1", -1),
    op(OP_PUSHDATA2, "OP_PUSHDATA2", -2),
    op(OP_PUSHDATA4, "OP_PUSHDATA4", -4),
    op(OP_1NEGATE, "OP_1NEGATE", 1),
    op(OP_RESERVED, "OP_RESERVED", 1),
    op(OP_1, "OP_1", 1),
    op(OP_2, "OP_2", 1),
    op(OP_3, "OP_3", 1),
    op(OP_4, "OP_4", 1),
    op(OP_5, "OP_5", 1),
    op(OP_6, "OP_6", 1),
    op(OP_7, "OP_7", 1),
    op(OP_8, "OP_8", 1),
    op(OP_9, "OP_9", 1),
    op(OP_10, "OP_10", 1),
    op(OP_11, "OP_11", 1),
    op(OP_12, "OP_12", 1),
    op(OP_13, "OP_13", 1),
    op(OP_14, "OP_14", 1),
    op(OP_15, "OP_15", 1),
    op(OP_16, "OP_16", 1),
    op(OP_NOP, "OP_NOP", 1),
    op(OP_VER, "OP_VER", 1),
    op(OP_IF, "OP_IF", 1),
    op(OP_NOTIF, "OP_NOTIF", 1),
    disabled(OP_VERIF, "OP_VERIF"),
    disabled(OP_VERNOTIF, "OP_VERNOTIF"),
    op(OP_ELSE, "OP_ELSE", 1),
    op(OP_ENDIF, "OP_ENDIF", 1),
    op(OP_VERIFY, "OP_VERIFY", 1),
    op(OP_RETURN, "OP_RETURN", 1),
    op(OP_TOALTSTACK, "OP_TOALTSTACK", 1),
    op(OP_FROMALTSTACK, "OP_FROMALTSTACK", 1),
    op(OP_2DROP, "OP_2DROP", 1),
    op(OP_2DUP, "OP_2DUP", 1),
    op(OP_3DUP, "OP_3DUP", 1),
    op(OP_2OVER, "OP_2OVER", 1),
    op(OP_2ROT, "OP_2ROT", 1),
    op(OP_2SWAP, "OP_2SWAP", 1),
    op(OP_IFDUP, "OP_IFDUP", 1),
    op(OP_DEPTH, "OP_DEPTH", 1),
    op(OP_DROP, "OP_DROP", 1),
    op(OP_DUP, "OP_DUP", 1),
    op(OP_NIP, "OP_NIP", 1),
    op(OP_OVER, "OP_OVER", 1),
    op(OP_PICK, "OP_PICK", 1),
    op(OP_ROLL, "OP_ROLL", 1),
    op(OP_ROT, "OP_ROT", 1),
    op(OP_SWAP, "OP_SWAP", 1),
    op(OP_TUCK, "OP_TUCK", 1),
    since(OP_CAT, "OP_CAT", 1),
    since(OP_SUBSTR, "OP_SUBSTR", 1),
    since(OP_LEFT, "OP_LEFT", 1),
    since(OP_RIGHT, "OP_RIGHT", 1),
    op(OP_SIZE, "OP_SIZE", 1),
    since(OP_INVERT, "OP_INVERT", 1),
    since(OP_AND, "OP_AND", 1),
    since(OP_OR, "OP_OR", 1),
    since(OP_XOR, "OP_XOR", 1),
    op(OP_EQUAL, "OP_EQUAL", 1),
    op(OP_EQUALVERIFY, "OP_EQUALVERIFY", 1),
    op(OP_RESERVED1, "OP_RESERVED1", 1),
    op(OP_RESERVED2, "OP_RESERVED2", 1),
    op(OP_1ADD, "OP_1ADD", 1),
    op(OP_1SUB, "OP_1SUB", 1),
    disabled(OP_2MUL, "OP_2MUL"),
    disabled(OP_2DIV, "OP_2DIV"),
    op(OP_NEGATE, "OP_NEGATE", 1),
    op(OP_ABS, "OP_ABS", 1),
    op(OP_NOT, "OP_NOT", 1),
    op(OP_0NOTEQUAL, "OP_0NOTEQUAL", 1),
    op(OP_ADD, "OP_ADD", 1),
    op(OP_SUB, "OP_SUB", 1),
    since(OP_MUL, "OP_MUL", 1),
    since(OP_DIV, "OP_DIV", 1),
    since(OP_MOD, "OP_MOD", 1),
    since(OP_LSHIFT, "OP_LSHIFT", 1),
    since(OP_RSHIFT, "OP_RSHIFT", 1),
    op(OP_BOOLAND, "OP_BOOLAND", 1),
    op(OP_BOOLOR, "OP_BOOLOR", 1),
    op(OP_NUMEQUAL, "OP_NUMEQUAL", 1),
    op(OP_NUMEQUALVERIFY, "OP_NUMEQUALVERIFY", 1),
    op(OP_NUMNOTEQUAL, "OP_NUMNOTEQUAL", 1),
    op(OP_LESSTHAN, "OP_LESSTHAN", 1),
    op(OP_GREATERTHAN, "OP_GREATERTHAN", 1),
    op(OP_LESSTHANOREQUAL, "OP_LESSTHANOREQUAL", 1),
    op(OP_GREATERTHANOREQUAL, "OP_GREATERTHANOREQUAL", 1),
    op(OP_MIN, "OP_MIN", 1),
    op(OP_MAX, "OP_MAX", 1),
    op(OP_WITHIN, "OP_WITHIN", 1),
    op(OP_RIPEMD160, "OP_RIPEMD160", 1),
    op(OP_SHA1, "OP_SHA1", 1),
    op(OP_SHA256, "OP_SHA256", 1),
    op(OP_HASH160, "OP_HASH160", 1),
    op(OP_HASH256, "OP_HASH256", 1),
    op(OP_CODESEPARATOR, "OP_CODESEPARATOR", 1),
    op(OP_CHECKSIG, "OP_CHECKSIG", 1),
    op(OP_CHECKSIGVERIFY, "OP_CHECKSIGVERIFY", 1),
    op(OP_CHECKMULTISIG, "OP_CHECKMULTISIG", 1),
    op(OP_CHECKMULTISIGVERIFY, "OP_CHECKMULTISIGVERIFY", 1),
    op(OP_NOP1, "OP_NOP1", 1),
    op(OP_CHECKLOCKTIMEVERIFY, "OP_CHECKLOCKTIMEVERIFY", 1),
    op(OP_NOP3, "OP_NOP3", 1),
    op(OP_NOP4, "OP_NOP4", 1),
    op(OP_NOP5, "OP_NOP5", 1),
    op(OP_NOP6, "OP_NOP6", 1),
    op(OP_NOP7, "OP_NOP7", 1),
    op(OP_NOP8, "OP_NOP8", 1),
    op(OP_NOP9, "OP_NOP9", 1),
    op(OP_NOP10, "OP_NOP10", 1),
    op(0xba, "OP_UNKNOWN186", 1),
    op(0xbb, "OP_UNKNOWN187", 1),
    op(0xbc, "OP_UNKNOWN188", 1),
    op(0xbd, "OP_UNKNOWN189", 1),
    op(0xbe, "OP_UNKNOWN190", 1),
    op(0xbf, "OP_UNKNOWN191", 1),
    since(OP_EVAL, "OP_EVAL", 1),
    since(OP_REQUIREOUTPUT, "OP_REQUIREOUTPUT", 1),
    since(OP_ASSET, "OP_ASSET", 1),
    since(OP_AMOUNT, "OP_AMOUNT", 1),
    since(OP_OUTPUTSCRIPT, "OP_OUTPUTSCRIPT", 1),
    since(OP_TIME, "OP_TIME", 1),
    since(OP_CIRCULATION, "OP_CIRCULATION", 1),
    since(OP_CATPUSHDATA, "OP_CATPUSHDATA", 1),
    op(0xc8, "OP_UNKNOWN200", 1),
    op(0xc9, "OP_UNKNOWN201", 1),
    op(0xca, "OP_UNKNOWN202", 1),
    op(0xcb, "OP_UNKNOWN203", 1),
    op(0xcc, "OP_UNKNOWN204", 1),
    op(0xcd, "OP_UNKNOWN205", 1),
    op(0xce, "OP_UNKNOWN206", 1),
    op(0xcf, "OP_UNKNOWN207", 1),
    since(OP_WHILE, "OP_WHILE", 2),
    since(OP_ENDWHILE, "OP_ENDWHILE", 2),
    op(0xd2, "OP_UNKNOWN210", 1),
    op(0xd3, "OP_UNKNOWN211", 1),
    op(0xd4, "OP_UNKNOWN212", 1),
    op(0xd5, "OP_UNKNOWN213", 1),
    op(0xd6, "OP_UNKNOWN214", 1),
    op(0xd7, "OP_UNKNOWN215", 1),
    op(0xd8, "OP_UNKNOWN216", 1),
    op(0xd9, "OP_UNKNOWN217", 1),
    op(0xda, "OP_UNKNOWN218", 1),
    op(0xdb, "OP_UNKNOWN219", 1),
    op(0xdc, "OP_UNKNOWN220", 1),
    op(0xdd, "OP_UNKNOWN221", 1),
    op(0xde, "OP_UNKNOWN222", 1),
    op(0xdf, "OP_UNKNOWN223", 1),
    op(0xe0, "OP_UNKNOWN224", 1),
    op(0xe1, "OP_UNKNOWN225", 1),
    op(0xe2, "OP_UNKNOWN226", 1),
    op(0xe3, "OP_UNKNOWN227", 1),
    op(0xe4, "OP_UNKNOWN228", 1),
    op(0xe5, "OP_UNKNOWN229", 1),
    op(0xe6, "OP_UNKNOWN230", 1),
    op(0xe7, "OP_UNKNOWN231", 1),
    op(0xe8, "OP_UNKNOWN232", 1),
    op(0xe9, "OP_UNKNOWN233", 1),
    op(0xea, "OP_UNKNOWN234", 1),
    op(0xeb, "OP_UNKNOWN235", 1),
    op(0xec, "OP_UNKNOWN236", 1),
    op(0xed, "OP_UNKNOWN237", 1),
    op(0xee, "OP_UNKNOWN238", 1),
    op(0xef, "OP_UNKNOWN239", 1),
    op(0xf0, "OP_UNKNOWN240", 1),
    op(0xf1, "OP_UNKNOWN241", 1),
    op(0xf2, "OP_UNKNOWN242", 1),
    op(0xf3, "OP_UNKNOWN243", 1),
    op(0xf4, "OP_UNKNOWN244", 1),
    op(0xf5, "OP_UNKNOWN245", 1),
    op(0xf6, "OP_UNKNOWN246", 1),
    op(0xf7, "OP_UNKNOWN247", 1),
    op(0xf8, "OP_UNKNOWN248", 1),
    op(OP_SMALLDATA, "OP_SMALLDATA", 1),
    op(OP_SMALLINTEGER, "OP_SMALLINTEGER", 1),
    op(OP_PUBKEYS, "OP_PUBKEYS", 1),
    op(0xfc, "OP_UNKNOWN252", 1),
    op(OP_PUBKEYHASH, "OP_PUBKEYHASH", 1),
    op(OP_PUBKEY, "OP_PUBKEY", 1),
    op(OP_INVALIDOPCODE, "OP_INVALIDOPCODE", 1),
];

/// Look up the table entry for an opcode byte.
pub fn opcode_info(op: u8) -> &'static OpcodeInfo {
    &OPCODE_TABLE[op as usize]
}

/// Return the canonical name of an opcode byte.
pub fn opcode_to_string(op: u8) -> &'static str {
    OPCODE_TABLE[op as usize].name
}

/// Resolve a canonical opcode name back to its byte.
///
/// Accepts the `OP_` names produced by the full disassembly, plus the
/// `OP_FALSE`, `OP_TRUE`, `OP_FAIL` and `OP_NOP2` aliases.
pub fn opcode_from_name(name: &str) -> Option<u8> {
    match name {
        "OP_FALSE" => return Some(OP_FALSE),
        "OP_TRUE" => return Some(OP_TRUE),
        "OP_FAIL" => return Some(OP_FAIL),
        "OP_NOP2" => return Some(OP_NOP2),
        _ => {}
    }
    OPCODE_TABLE.iter().find(|info| info.name == name).map(|info| info.value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_is_indexed_by_value() {
        for (i, info) in OPCODE_TABLE.iter().enumerate() {
            assert_eq!(info.value as usize, i, "entry {} has value {:#04x}", i, info.value);
        }
    }

    #[test]
    fn test_push_lengths() {
        assert_eq!(opcode_info(OP_0).length, 1);
        assert_eq!(opcode_info(OP_DATA_1).length, 2);
        assert_eq!(opcode_info(OP_DATA_75).length, 76);
        assert_eq!(opcode_info(OP_PUSHDATA1).length, -1);
        assert_eq!(opcode_info(OP_PUSHDATA2).length, -2);
        assert_eq!(opcode_info(OP_PUSHDATA4).length, -4);
        assert_eq!(opcode_info(OP_1NEGATE).length, 1);
    }

    #[test]
    fn test_opcode_is_disabled() {
        let tests: Vec<(u8, u32, bool)> = vec![
            (OP_WHILE, 0, true),
            (OP_WHILE, 1, true),
            (OP_WHILE, 2, false),
            (OP_WHILE, 3, false),
            (OP_ENDWHILE, 0, true),
            (OP_ENDWHILE, 1, true),
            (OP_ENDWHILE, 2, false),
            (OP_ENDWHILE, 3, false),
            (OP_CIRCULATION, 1, false),
            (OP_REQUIREOUTPUT, 0, true),
            (OP_REQUIREOUTPUT, 1, false),
            (OP_REQUIREOUTPUT, 2, false),
            (OP_REQUIREOUTPUT, 3, false),
            (OP_CAT, 0, true),
            (OP_CAT, 1, false),
            (OP_2MUL, 5, true),
            (OP_VERIF, 0, true),
            (OP_DUP, 0, false),
            (OP_CHECKSIG, 0, false),
        ];

        for (opcode, version, want) in tests {
            let info = opcode_info(opcode);
            assert_eq!(
                info.is_disabled(version),
                want,
                "{}.is_disabled({})",
                info.name,
                version
            );
        }
    }

    #[test]
    fn test_opcode_from_name() {
        assert_eq!(opcode_from_name("OP_CHECKSIG"), Some(OP_CHECKSIG));
        assert_eq!(opcode_from_name("OP_DATA_20"), Some(OP_DATA_20));
        assert_eq!(opcode_from_name("OP_TRUE"), Some(OP_1));
        assert_eq!(opcode_from_name("OP_UNKNOWN200"), Some(0xc8));
        assert_eq!(opcode_from_name("OP_BOGUS"), None);
    }
}
