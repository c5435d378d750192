//! Instruction decoding and disassembly.
//!
//! Decoding walks a script left to right. Each byte selects its entry in
//! [`OPCODE_TABLE`](crate::opcodes::OPCODE_TABLE); push opcodes then take
//! the number of data bytes their length class declares. Both disassembly
//! forms are rendered from the parsed instructions alone.

use std::fmt::Write as _;

use crate::opcodes::*;
use super::error::{InterpreterError, InterpreterErrorCode};

/// One decoded instruction: its table entry plus any pushed data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedOpcode {
    pub opcode: &'static OpcodeInfo,
    /// Pushed bytes. Empty for opcodes that carry no data.
    pub data: Vec<u8>,
}

impl ParsedOpcode {
    /// Build an instruction for the given byte with attached data.
    pub fn new(op: u8, data: Vec<u8>) -> Self {
        ParsedOpcode {
            opcode: opcode_info(op),
            data,
        }
    }

    /// The opcode byte.
    pub fn value(&self) -> u8 {
        self.opcode.value
    }

    pub fn name(&self) -> &'static str {
        self.opcode.name
    }

    pub fn is_disabled(&self, version: u32) -> bool {
        self.opcode.is_disabled(version)
    }

    pub fn is_conditional(&self) -> bool {
        self.opcode.is_conditional()
    }

    /// Check that a push uses the shortest encoding for its data.
    pub fn enforce_minimum_data_push(&self) -> Result<(), InterpreterError> {
        let data_len = self.data.len();
        let op = self.value();
        let want = if data_len == 0 {
            OP_0
        } else if data_len == 1 && (1..=16).contains(&self.data[0]) {
            OP_1 + self.data[0] - 1
        } else if data_len == 1 && self.data[0] == 0x81 {
            OP_1NEGATE
        } else if data_len <= 75 {
            data_len as u8
        } else if data_len <= 0xff {
            OP_PUSHDATA1
        } else if data_len <= 0xffff {
            OP_PUSHDATA2
        } else {
            OP_PUSHDATA4
        };
        if op != want {
            return Err(InterpreterError::new(
                InterpreterErrorCode::MinimalData,
                format!(
                    "data push of {} bytes encoded with opcode {} instead of {}",
                    data_len,
                    self.name(),
                    opcode_to_string(want)
                ),
            ));
        }
        Ok(())
    }

    /// Render the instruction as text.
    ///
    /// The oneline form prints pushed data as bare hex and small integers
    /// as decimals. The full form prints the canonical name followed by
    /// the explicit length field for OP_PUSHDATA1/2/4 and the data in hex.
    pub fn print(&self, oneline: bool) -> String {
        let op = self.value();
        if oneline {
            match op {
                OP_0 => return "0".to_string(),
                OP_1NEGATE => return "-1".to_string(),
                OP_1..=OP_16 => return (op - OP_1 + 1).to_string(),
                _ => {}
            }
            if self.opcode.length == 1 {
                return self.name().to_string();
            }
            return hex::encode(&self.data);
        }

        if self.opcode.length == 1 {
            return self.name().to_string();
        }
        let mut out = self.name().to_string();
        // Writing to a String never fails.
        let _ = match self.opcode.length {
            -1 => write!(out, " 0x{:02x}", self.data.len()),
            -2 => write!(out, " 0x{:04x}", self.data.len()),
            -4 => write!(out, " 0x{:08x}", self.data.len()),
            _ => Ok(()),
        };
        let _ = write!(out, " 0x{}", hex::encode(&self.data));
        out
    }

    /// Encode the instruction back to script bytes.
    pub fn to_bytes(&self) -> Result<Vec<u8>, InterpreterError> {
        let length = self.opcode.length;
        let mut out = Vec::with_capacity(1 + self.data.len() + 4);
        out.push(self.value());
        if length > 0 {
            let want = (length - 1) as usize;
            if self.data.len() != want {
                return Err(InterpreterError::new(
                    InterpreterErrorCode::MalformedPush,
                    format!(
                        "{} requires {} bytes of data, has {}",
                        self.name(),
                        want,
                        self.data.len()
                    ),
                ));
            }
            out.extend_from_slice(&self.data);
            return Ok(out);
        }

        let n = self.data.len();
        let fits = match length {
            -1 => n <= u8::MAX as usize,
            -2 => n <= u16::MAX as usize,
            _ => n <= u32::MAX as usize,
        };
        if !fits {
            return Err(InterpreterError::new(
                InterpreterErrorCode::ElementTooBig,
                format!("{} cannot carry {} bytes", self.name(), n),
            ));
        }
        match length {
            -1 => out.push(n as u8),
            -2 => out.extend_from_slice(&(n as u16).to_le_bytes()),
            _ => out.extend_from_slice(&(n as u32).to_le_bytes()),
        }
        out.extend_from_slice(&self.data);
        Ok(out)
    }
}

/// A parsed script is a sequence of parsed opcodes.
pub type ParsedScript = Vec<ParsedOpcode>;

/// Check if a parsed script is push-only.
pub fn is_push_only(script: &[ParsedOpcode]) -> bool {
    script.iter().all(|pop| pop.opcode.is_push())
}

fn truncated(name: &str, offset: usize, detail: String) -> InterpreterError {
    InterpreterError::new(
        InterpreterErrorCode::MalformedPush,
        format!("opcode {} at offset {}: script truncated, {}", name, offset, detail),
    )
}

/// Decode the instruction starting at `offset`, returning it together with
/// the offset of the next instruction.
fn decode_one(script: &[u8], offset: usize) -> Result<(ParsedOpcode, usize), InterpreterError> {
    let info = opcode_info(script[offset]);
    let length = info.length;

    if length == 1 {
        return Ok((
            ParsedOpcode {
                opcode: info,
                data: Vec::new(),
            },
            offset + 1,
        ));
    }

    let (data_start, data_len) = if length > 1 {
        (offset + 1, (length - 1) as usize)
    } else {
        let width = (-length) as usize;
        let prefix = script.get(offset + 1..offset + 1 + width).ok_or_else(|| {
            truncated(
                info.name,
                offset,
                format!("need {} length bytes, have {}", width, script.len() - offset - 1),
            )
        })?;
        let mut le = [0u8; 4];
        le[..width].copy_from_slice(prefix);
        (offset + 1 + width, u32::from_le_bytes(le) as usize)
    };

    let remaining = script.len() - data_start;
    if data_len > remaining {
        return Err(truncated(
            info.name,
            offset,
            format!("need {} data bytes, have {}", data_len, remaining),
        ));
    }
    let data = script[data_start..data_start + data_len].to_vec();
    Ok((ParsedOpcode { opcode: info, data }, data_start + data_len))
}

/// Decode raw script bytes into instructions.
pub fn parse_script(script: &[u8]) -> Result<ParsedScript, InterpreterError> {
    let mut parsed = Vec::new();
    let mut offset = 0;
    while offset < script.len() {
        let (pop, next) = decode_one(script, offset)?;
        parsed.push(pop);
        offset = next;
    }
    Ok(parsed)
}

/// Encode parsed instructions back to script bytes.
pub fn unparse(script: &[ParsedOpcode]) -> Result<Vec<u8>, InterpreterError> {
    let mut out = Vec::new();
    for pop in script {
        out.extend_from_slice(&pop.to_bytes()?);
    }
    Ok(out)
}

/// Disassemble a script into space separated instructions.
///
/// When decoding fails part way, the instructions decoded so far are
/// followed by `[error]` and the decode error is returned with the text.
pub fn disasm_string(script: &[u8], oneline: bool) -> (String, Option<InterpreterError>) {
    let mut parts = Vec::new();
    let mut offset = 0;
    while offset < script.len() {
        match decode_one(script, offset) {
            Ok((pop, next)) => {
                parts.push(pop.print(oneline));
                offset = next;
            }
            Err(e) => {
                parts.push("[error]".to_string());
                return (parts.join(" "), Some(e));
            }
        }
    }
    (parts.join(" "), None)
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Build the expected oneline and full renderings for every byte value,
    /// along with a well-formed instance of that instruction.
    fn expected(op: u8) -> (ParsedOpcode, String, String) {
        let info = opcode_info(op);
        match op {
            OP_0 => (ParsedOpcode::new(op, vec![]), "0".into(), "OP_0".into()),
            OP_DATA_1..=OP_DATA_75 => {
                let data = vec![0x01; op as usize];
                let h = hex::encode(&data);
                (
                    ParsedOpcode::new(op, data),
                    h.clone(),
                    format!("OP_DATA_{} 0x{}", op, h),
                )
            }
            OP_PUSHDATA1 => (
                ParsedOpcode::new(op, vec![0x01]),
                "01".into(),
                "OP_PUSHDATA1 0x01 0x01".into(),
            ),
            OP_PUSHDATA2 => (
                ParsedOpcode::new(op, vec![0x01, 0x01]),
                "0101".into(),
                "OP_PUSHDATA2 0x0002 0x0101".into(),
            ),
            OP_PUSHDATA4 => (
                ParsedOpcode::new(op, vec![0x01, 0x01, 0x01]),
                "010101".into(),
                "OP_PUSHDATA4 0x00000003 0x010101".into(),
            ),
            OP_1NEGATE => (ParsedOpcode::new(op, vec![]), "-1".into(), "OP_1NEGATE".into()),
            OP_1..=OP_16 => {
                let n = op - OP_1 + 1;
                (ParsedOpcode::new(op, vec![]), n.to_string(), format!("OP_{}", n))
            }
            0xb0 | 0xb2..=0xb9 => {
                let name = format!("OP_NOP{}", op - 0xaf);
                (ParsedOpcode::new(op, vec![]), name.clone(), name)
            }
            0xba..=0xbf | 0xc8..=0xcf | 0xd2..=0xf8 | 0xfc => {
                let name = format!("OP_UNKNOWN{}", op);
                (ParsedOpcode::new(op, vec![]), name.clone(), name)
            }
            _ => (
                ParsedOpcode::new(op, vec![]),
                info.name.to_string(),
                info.name.to_string(),
            ),
        }
    }

    #[test]
    fn test_opcode_disasm_all_bytes() {
        for op in 0..=255u8 {
            let (pop, oneline, full) = expected(op);
            assert_eq!(pop.print(true), oneline, "oneline disasm of {:#04x}", op);
            assert_eq!(pop.print(false), full, "full disasm of {:#04x}", op);
        }
    }

    #[test]
    fn test_named_opcodes() {
        assert_eq!(opcode_to_string(OP_CHECKLOCKTIMEVERIFY), "OP_CHECKLOCKTIMEVERIFY");
        assert_eq!(opcode_to_string(0x6a), "OP_RETURN");
        assert_eq!(opcode_to_string(0xc0), "OP_EVAL");
        assert_eq!(opcode_to_string(0xc6), "OP_CIRCULATION");
        assert_eq!(opcode_to_string(0xd0), "OP_WHILE");
        assert_eq!(opcode_to_string(0xd1), "OP_ENDWHILE");
        assert_eq!(opcode_to_string(0xf9), "OP_SMALLDATA");
        assert_eq!(opcode_to_string(0xff), "OP_INVALIDOPCODE");
    }

    #[test]
    fn test_parse_and_unparse() {
        let mut script = vec![OP_DUP, OP_DATA_2, 0xab, 0xcd, OP_PUSHDATA1, 3, 1, 2, 3];
        script.extend_from_slice(&[OP_PUSHDATA2, 1, 0, 9, OP_WHILE, OP_ENDWHILE]);
        let parsed = parse_script(&script).unwrap();
        assert_eq!(parsed.len(), 6);
        assert_eq!(parsed[1].data, vec![0xab, 0xcd]);
        assert_eq!(parsed[2].data, vec![1, 2, 3]);
        assert_eq!(parsed[3].data, vec![9]);
        assert_eq!(parsed[4].name(), "OP_WHILE");
        assert_eq!(unparse(&parsed).unwrap(), script);
    }

    #[test]
    fn test_parse_truncated() {
        let cases: Vec<Vec<u8>> = vec![
            vec![OP_DATA_5, 0, 0, 0],
            vec![OP_PUSHDATA1],
            vec![OP_PUSHDATA1, 5, 0, 0, 0, 0],
            vec![OP_PUSHDATA2, 1],
            vec![OP_PUSHDATA2, 2, 0, 1],
            vec![OP_PUSHDATA4, 1, 0, 0],
            vec![OP_PUSHDATA4, 0xff, 0xff, 0xff, 0xff, 1],
        ];
        for script in cases {
            let err = parse_script(&script).unwrap_err();
            assert_eq!(err.code, InterpreterErrorCode::MalformedPush, "{:02x?}", script);
        }
    }

    #[test]
    fn test_return_does_not_swallow_tail() {
        let parsed = parse_script(&[OP_RETURN, OP_1, OP_2]).unwrap();
        assert_eq!(parsed.len(), 3);
        assert!(parsed[0].data.is_empty());
    }

    #[test]
    fn test_disasm_string() {
        let script = [OP_DATA_2, 0xab, 0xcd, OP_1, OP_ADD, OP_0];
        assert_eq!(disasm_string(&script, true).0, "abcd 1 OP_ADD 0");
        assert_eq!(
            disasm_string(&script, false).0,
            "OP_DATA_2 0xabcd OP_1 OP_ADD OP_0"
        );

        let (text, err) = disasm_string(&[OP_DUP, OP_DATA_3, 1], true);
        assert_eq!(text, "OP_DUP [error]");
        assert_eq!(err.unwrap().code, InterpreterErrorCode::MalformedPush);
    }

    #[test]
    fn test_minimal_push() {
        assert!(ParsedOpcode::new(OP_DATA_1, vec![5]).enforce_minimum_data_push().is_err());
        assert!(ParsedOpcode::new(OP_DATA_1, vec![0x81]).enforce_minimum_data_push().is_err());
        assert!(ParsedOpcode::new(OP_PUSHDATA1, vec![1; 10]).enforce_minimum_data_push().is_err());
        assert!(ParsedOpcode::new(OP_DATA_1, vec![0x20]).enforce_minimum_data_push().is_ok());
        assert!(ParsedOpcode::new(OP_PUSHDATA1, vec![1; 76]).enforce_minimum_data_push().is_ok());
    }
}
