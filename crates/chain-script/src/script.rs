//! Script byte strings and their builder.
//!
//! A `Script` is the on-chain encoding of a locking, unlocking or issuance
//! program: opcode bytes interleaved with push data. The type does not
//! carry a version; programs are versioned by whoever stores them.

use std::fmt;

use crate::chunk::encode_push_data;
use crate::interpreter::parsed_opcode::{disasm_string, is_push_only, parse_script, ParsedScript};
use crate::opcodes::*;
use crate::ScriptError;

/// A script, represented as a byte vector newtype.
#[derive(Clone, PartialEq, Eq, Hash, Default)]
pub struct Script(Vec<u8>);

impl Script {
    /// Create a new empty script.
    pub fn new() -> Self {
        Script(Vec::new())
    }

    /// Create a script from a hex-encoded string.
    pub fn from_hex(hex_str: &str) -> Result<Self, ScriptError> {
        Ok(Script(hex::decode(hex_str)?))
    }

    pub fn from_bytes(bytes: &[u8]) -> Self {
        Script(bytes.to_vec())
    }

    /// Assemble a script from its full disassembly.
    ///
    /// Opcode names are emitted as is. Push opcodes take their data from
    /// the following `0x` tokens, exactly as [`Script::disasm`] prints them
    /// in full mode, so the original encoding is preserved. Any other hex
    /// token is pushed with the shortest encoding.
    pub fn from_asm(asm: &str) -> Result<Self, ScriptError> {
        let mut script = Script::new();
        let mut tokens = asm.split_whitespace();

        while let Some(token) = tokens.next() {
            let op = match opcode_from_name(token) {
                Some(op) => op,
                None => {
                    let data = hex::decode(token.trim_start_matches("0x"))
                        .map_err(|_| ScriptError::InvalidAsm(token.to_string()))?;
                    script.append_push_data(&data)?;
                    continue;
                }
            };

            let length = opcode_info(op).length;
            if length == 1 {
                script.0.push(op);
                continue;
            }

            let mut next_hex = || -> Result<Vec<u8>, ScriptError> {
                let t = tokens
                    .next()
                    .ok_or_else(|| ScriptError::InvalidAsm(format!("{} without data", token)))?;
                let h = t
                    .strip_prefix("0x")
                    .ok_or_else(|| ScriptError::InvalidAsm(t.to_string()))?;
                hex::decode(h).map_err(|_| ScriptError::InvalidAsm(t.to_string()))
            };

            let prefix = if length < 0 { next_hex()? } else { Vec::new() };
            let data = next_hex()?;
            let declared = match length {
                n if n > 1 => (n - 1) as usize,
                _ => {
                    let mut le = [0u8; 4];
                    let width = prefix.len().min(4);
                    for (i, b) in prefix[..width].iter().rev().enumerate() {
                        le[i] = *b;
                    }
                    u32::from_le_bytes(le) as usize
                }
            };
            if declared != data.len() || (length < 0 && prefix.len() != (-length) as usize) {
                return Err(ScriptError::InvalidAsm(format!(
                    "{} declares {} bytes, has {}",
                    token,
                    declared,
                    data.len()
                )));
            }

            script.0.push(op);
            match length {
                -1 => script.0.push(data.len() as u8),
                -2 => script.0.extend_from_slice(&(data.len() as u16).to_le_bytes()),
                -4 => script.0.extend_from_slice(&(data.len() as u32).to_le_bytes()),
                _ => {}
            }
            script.0.extend_from_slice(&data);
        }

        Ok(script)
    }

    pub fn to_hex(&self) -> String {
        hex::encode(&self.0)
    }

    /// Disassemble the script.
    ///
    /// See [`ParsedOpcode::print`](crate::interpreter::ParsedOpcode::print)
    /// for the two renderings.
    pub fn disasm(&self, oneline: bool) -> Result<String, ScriptError> {
        match disasm_string(&self.0, oneline) {
            (text, None) => Ok(text),
            (_, Some(e)) => Err(ScriptError::Malformed(e)),
        }
    }

    pub fn to_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Decode the script into instructions.
    pub fn chunks(&self) -> Result<ParsedScript, ScriptError> {
        Ok(parse_script(&self.0)?)
    }

    /// True when every instruction is a push.
    pub fn is_push_only(&self) -> bool {
        parse_script(&self.0)
            .map(|pops| is_push_only(&pops))
            .unwrap_or(false)
    }

    /// True when the script starts with OP_FAIL and so can never be satisfied.
    pub fn is_unspendable(&self) -> bool {
        self.0.first() == Some(&OP_FAIL)
    }

    /// Append a push of `data` using the shortest encoding, so the result
    /// passes minimal-data checks.
    pub fn append_push_data(&mut self, data: &[u8]) -> Result<&mut Self, ScriptError> {
        self.0.extend_from_slice(&encode_push_data(data)?);
        Ok(self)
    }

    /// Append non-push opcodes.
    pub fn append_opcodes(&mut self, opcodes: &[u8]) -> Result<&mut Self, ScriptError> {
        for &op in opcodes {
            if (OP_DATA_1..=OP_PUSHDATA4).contains(&op) {
                return Err(ScriptError::InvalidOpcodeType(opcode_to_string(op).to_string()));
            }
        }
        self.0.extend_from_slice(opcodes);
        Ok(self)
    }

    /// Append a push of the number `n`, using OP_0, OP_1NEGATE and
    /// OP_1..OP_16 where they apply.
    pub fn append_int(&mut self, n: i64) -> &mut Self {
        match n {
            0 => self.0.push(OP_0),
            -1 => self.0.push(OP_1NEGATE),
            1..=16 => self.0.push(OP_1 + (n as u8) - 1),
            _ => {
                let bytes = crate::interpreter::ScriptNumber::from(n).encode();
                // At most nine bytes, always a direct push.
                self.0.push(bytes.len() as u8);
                self.0.extend_from_slice(&bytes);
            }
        }
        self
    }
}

impl From<Vec<u8>> for Script {
    fn from(bytes: Vec<u8>) -> Self {
        Script(bytes)
    }
}

impl AsRef<[u8]> for Script {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl fmt::Display for Script {
    /// Display the script as a lowercase hex string.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}

impl fmt::Debug for Script {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Script({})", self.to_hex())
    }
}

impl serde::Serialize for Script {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> serde::Deserialize<'de> for Script {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Script::from_hex(&s).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const P2PKH_HEX: &str = "76a914e2a623699e81b291c0327f408fea765d534baa2a88ac";

    #[test]
    fn test_from_hex_roundtrip() {
        let script = Script::from_hex(P2PKH_HEX).unwrap();
        assert_eq!(script.len(), 25);
        assert_eq!(script.to_hex(), P2PKH_HEX);
        assert!(Script::from_hex("zz").is_err());
    }

    #[test]
    fn test_disasm_both_forms() {
        let script = Script::from_hex(P2PKH_HEX).unwrap();
        assert_eq!(
            script.disasm(true).unwrap(),
            "OP_DUP OP_HASH160 e2a623699e81b291c0327f408fea765d534baa2a OP_EQUALVERIFY OP_CHECKSIG"
        );
        assert_eq!(
            script.disasm(false).unwrap(),
            "OP_DUP OP_HASH160 OP_DATA_20 0xe2a623699e81b291c0327f408fea765d534baa2a OP_EQUALVERIFY OP_CHECKSIG"
        );
        assert!(Script::from_bytes(&[OP_DATA_2, 1]).disasm(true).is_err());
        assert_eq!(Script::new().disasm(true).unwrap(), "");
    }

    #[test]
    fn test_from_asm_reads_full_disasm() {
        let mut bytes = vec![OP_PUSHDATA2, 2, 0, 0xab, 0xcd, OP_WHILE, OP_1, OP_ENDWHILE];
        bytes.extend_from_slice(&[OP_PUSHDATA1, 1, 0x07, OP_DATA_1, 0x09, OP_0]);
        let script = Script::from_bytes(&bytes);
        let asm = script.disasm(false).unwrap();
        assert_eq!(Script::from_asm(&asm).unwrap(), script);
    }

    #[test]
    fn test_from_asm_errors() {
        assert!(Script::from_asm("OP_BOGUS").is_err());
        assert!(Script::from_asm("OP_DATA_2 0xab").is_err());
        assert!(Script::from_asm("OP_PUSHDATA1 0x02 0xab").is_err());
        assert!(Script::from_asm("OP_DATA_1").is_err());
    }

    #[test]
    fn test_from_asm_bare_hex_is_minimal_push() {
        let script = Script::from_asm("abcd OP_DROP 07").unwrap();
        assert_eq!(script.to_bytes(), &[OP_DATA_2, 0xab, 0xcd, OP_DROP, OP_7]);
    }

    #[test]
    fn test_append_int() {
        let mut script = Script::new();
        script.append_int(0).append_int(-1).append_int(16).append_int(17).append_int(-300);
        assert_eq!(
            script.to_bytes(),
            &[OP_0, OP_1NEGATE, OP_16, OP_DATA_1, 17, OP_DATA_2, 0x2c, 0x81]
        );
    }

    #[test]
    fn test_append_opcodes_rejects_pushes() {
        let mut script = Script::new();
        assert!(script.append_opcodes(&[OP_DUP, OP_CHECKSIG]).is_ok());
        assert!(script.append_opcodes(&[OP_DATA_20]).is_err());
        assert!(script.append_opcodes(&[OP_PUSHDATA4]).is_err());
        assert_eq!(script.to_bytes(), &[OP_DUP, OP_CHECKSIG]);
    }

    #[test]
    fn test_append_push_data() {
        let mut script = Script::new();
        script.append_push_data(&[0xaa; 80]).unwrap();
        assert_eq!(&script.to_bytes()[..2], &[OP_PUSHDATA1, 80]);
        assert_eq!(script.len(), 82);
        script.append_push_data(&[3]).unwrap();
        assert_eq!(script.to_bytes().last(), Some(&OP_3));
    }

    #[test]
    fn test_push_only_and_unspendable() {
        assert!(Script::from_bytes(&[OP_1, OP_DATA_1, 5, OP_16, OP_1NEGATE]).is_push_only());
        assert!(!Script::from_bytes(&[OP_1, OP_DUP]).is_push_only());
        assert!(!Script::from_bytes(&[OP_RESERVED]).is_push_only());
        assert!(Script::from_bytes(&[OP_FAIL, 1]).is_unspendable());
        assert!(!Script::from_bytes(&[OP_1]).is_unspendable());
    }

    #[test]
    fn test_serde_as_hex() {
        let script = Script::from_bytes(&[OP_1, OP_ADD]);
        let json = serde_json::to_string(&script).unwrap();
        assert_eq!(json, "\"5193\"");
        let back: Script = serde_json::from_str(&json).unwrap();
        assert_eq!(back, script);
    }
}
