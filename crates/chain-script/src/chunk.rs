//! Push-data encoding.
//!
//! Chooses the shortest push opcode for a payload: OP_1..OP_16 and
//! OP_1NEGATE for the single bytes they stand for, a direct OP_DATA_n for
//! up to 75 bytes, then OP_PUSHDATA1, OP_PUSHDATA2 and OP_PUSHDATA4 with a
//! little-endian length prefix.

use crate::opcodes::*;
use crate::ScriptError;

/// Compute the opcode and length prefix for a push of `data_len` bytes.
///
/// An empty push is a bare OP_0.
pub fn push_data_prefix(data_len: usize) -> Result<Vec<u8>, ScriptError> {
    if data_len == 0 {
        Ok(vec![OP_0])
    } else if data_len <= 75 {
        Ok(vec![data_len as u8])
    } else if data_len <= 0xFF {
        Ok(vec![OP_PUSHDATA1, data_len as u8])
    } else if data_len <= 0xFFFF {
        let mut buf = vec![OP_PUSHDATA2];
        buf.extend_from_slice(&(data_len as u16).to_le_bytes());
        Ok(buf)
    } else if data_len <= 0xFFFF_FFFF {
        let mut buf = vec![OP_PUSHDATA4];
        buf.extend_from_slice(&(data_len as u32).to_le_bytes());
        Ok(buf)
    } else {
        Err(ScriptError::DataTooBig)
    }
}

/// The opcode that pushes `data` on its own, if there is one.
pub fn small_int_opcode(data: &[u8]) -> Option<u8> {
    match data {
        [n @ 1..=16] => Some(OP_1 + *n - 1),
        [0x81] => Some(OP_1NEGATE),
        _ => None,
    }
}

/// Encode a single payload as a complete, minimally encoded push.
pub fn encode_push_data(data: &[u8]) -> Result<Vec<u8>, ScriptError> {
    if let Some(op) = small_int_opcode(data) {
        return Ok(vec![op]);
    }
    let mut out = push_data_prefix(data.len())?;
    out.extend_from_slice(data);
    Ok(out)
}

/// Encode several payloads as consecutive push instructions.
pub fn encode_push_datas(parts: &[&[u8]]) -> Result<Vec<u8>, ScriptError> {
    let mut result = Vec::new();
    for (i, part) in parts.iter().enumerate() {
        let push = encode_push_data(part).map_err(|_| ScriptError::PartTooBig(i))?;
        result.extend_from_slice(&push);
    }
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_push_data_prefix_boundaries() {
        assert_eq!(push_data_prefix(0).unwrap(), vec![OP_0]);
        assert_eq!(push_data_prefix(1).unwrap(), vec![OP_DATA_1]);
        assert_eq!(push_data_prefix(75).unwrap(), vec![75u8]);
        assert_eq!(push_data_prefix(76).unwrap(), vec![OP_PUSHDATA1, 76]);
        assert_eq!(push_data_prefix(255).unwrap(), vec![OP_PUSHDATA1, 255]);
        assert_eq!(push_data_prefix(256).unwrap(), vec![OP_PUSHDATA2, 0x00, 0x01]);
        assert_eq!(push_data_prefix(65535).unwrap(), vec![OP_PUSHDATA2, 0xFF, 0xFF]);
        assert_eq!(
            push_data_prefix(65536).unwrap(),
            vec![OP_PUSHDATA4, 0x00, 0x00, 0x01, 0x00]
        );
    }

    #[test]
    fn test_encode_push_datas() {
        let parts: Vec<&[u8]> = vec![b"hello", b"world"];
        let encoded = encode_push_datas(&parts).unwrap();
        assert_eq!(hex::encode(encoded), "0568656c6c6f05776f726c64");
        assert!(encode_push_datas(&[]).unwrap().is_empty());
    }

    #[test]
    fn test_encode_push_data_small_values() {
        assert_eq!(encode_push_data(&[]).unwrap(), vec![OP_0]);
        assert_eq!(encode_push_data(&[5]).unwrap(), vec![OP_5]);
        assert_eq!(encode_push_data(&[16]).unwrap(), vec![OP_16]);
        assert_eq!(encode_push_data(&[0x81]).unwrap(), vec![OP_1NEGATE]);
        assert_eq!(encode_push_data(&[0]).unwrap(), vec![OP_DATA_1, 0]);
        assert_eq!(encode_push_data(&[17]).unwrap(), vec![OP_DATA_1, 17]);
    }
}
