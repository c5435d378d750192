//! Data and alt stacks of the script machine.
//!
//! Positions are counted from the top: index 0 is the last item pushed.

use super::error::{InterpreterError, InterpreterErrorCode};
use super::scriptnum::ScriptNumber;

/// Truth value of a stack item: any nonzero byte, except negative zero (a
/// lone sign bit in the last byte).
pub fn as_bool(t: &[u8]) -> bool {
    match t.split_last() {
        None => false,
        Some((last, rest)) => rest.iter().any(|b| *b != 0) || last & 0x7f != 0,
    }
}

/// Canonical encoding of a boolean result.
pub fn from_bool(v: bool) -> Vec<u8> {
    if v {
        vec![1]
    } else {
        Vec::new()
    }
}

fn bad_index(idx: usize, len: usize) -> InterpreterError {
    InterpreterError::new(
        InterpreterErrorCode::InvalidStackOperation,
        format!("index {} is invalid for stack size {}", idx, len),
    )
}

/// A stack of byte strings that decodes numbers with a fixed length limit.
#[derive(Debug, Clone, Default)]
pub struct Stack {
    items: Vec<Vec<u8>>,
    max_num_len: usize,
    require_minimal: bool,
}

impl Stack {
    pub fn new(max_num_len: usize, require_minimal: bool) -> Self {
        Stack {
            items: Vec::new(),
            max_num_len,
            require_minimal,
        }
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Whether numbers and pushes must use their minimal encoding.
    pub fn requires_minimal(&self) -> bool {
        self.require_minimal
    }

    /// Stack contents, bottom first.
    pub fn items(&self) -> &[Vec<u8>] {
        &self.items
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }

    pub fn push(&mut self, data: Vec<u8>) {
        self.items.push(data);
    }

    pub fn push_num(&mut self, n: ScriptNumber) {
        self.items.push(n.encode());
    }

    pub fn push_bool(&mut self, v: bool) {
        self.items.push(from_bool(v));
    }

    /// Vector position of the item `idx` places below the top.
    fn position(&self, idx: usize) -> Result<usize, InterpreterError> {
        let len = self.items.len();
        if idx >= len {
            return Err(bad_index(idx, len));
        }
        Ok(len - 1 - idx)
    }

    pub fn peek(&self, idx: usize) -> Result<&[u8], InterpreterError> {
        let pos = self.position(idx)?;
        Ok(&self.items[pos])
    }

    pub fn peek_num(&self, idx: usize) -> Result<ScriptNumber, InterpreterError> {
        ScriptNumber::decode(self.peek(idx)?, self.max_num_len, self.require_minimal)
    }

    /// Take out the item `idx` places below the top.
    pub fn remove(&mut self, idx: usize) -> Result<Vec<u8>, InterpreterError> {
        let pos = self.position(idx)?;
        Ok(self.items.remove(pos))
    }

    pub fn pop(&mut self) -> Result<Vec<u8>, InterpreterError> {
        self.items.pop().ok_or_else(|| bad_index(0, 0))
    }

    pub fn pop_num(&mut self) -> Result<ScriptNumber, InterpreterError> {
        let data = self.pop()?;
        ScriptNumber::decode(&data, self.max_num_len, self.require_minimal)
    }

    pub fn pop_bool(&mut self) -> Result<bool, InterpreterError> {
        Ok(as_bool(&self.pop()?))
    }

    /// Pop an item that must be exactly 32 bytes, such as an asset id.
    pub fn pop_hash(&mut self) -> Result<[u8; 32], InterpreterError> {
        let data = self.pop()?;
        <[u8; 32]>::try_from(data.as_slice()).map_err(|_| {
            InterpreterError::new(
                InterpreterErrorCode::InvalidStackOperation,
                format!("expected a 32-byte item, got {} bytes", data.len()),
            )
        })
    }

    /// Drop the top `n` items.
    pub fn drop_top(&mut self, n: usize) -> Result<(), InterpreterError> {
        let keep = self
            .items
            .len()
            .checked_sub(n)
            .ok_or_else(|| bad_index(n.saturating_sub(1), self.items.len()))?;
        self.items.truncate(keep);
        Ok(())
    }

    /// Copy the top `n` items, preserving their order.
    pub fn dup_top(&mut self, n: usize) -> Result<(), InterpreterError> {
        self.copy_range(n - 1, n)
    }

    /// Copy the `n` items that sit below the top `n`.
    pub fn over(&mut self, n: usize) -> Result<(), InterpreterError> {
        self.copy_range(2 * n - 1, n)
    }

    /// Push copies of `n` consecutive items, the deepest at index `from`.
    fn copy_range(&mut self, from: usize, n: usize) -> Result<(), InterpreterError> {
        let start = self.position(from)?;
        let copies = self.items[start..start + n].to_vec();
        self.items.extend(copies);
        Ok(())
    }

    /// Move the third group of `n` items to the top.
    pub fn rotate(&mut self, n: usize) -> Result<(), InterpreterError> {
        self.move_to_top(3 * n - 1, n)
    }

    /// Exchange the top two groups of `n` items.
    pub fn swap_top(&mut self, n: usize) -> Result<(), InterpreterError> {
        self.move_to_top(2 * n - 1, n)
    }

    fn move_to_top(&mut self, from: usize, n: usize) -> Result<(), InterpreterError> {
        let start = self.position(from)?;
        let moved: Vec<_> = self.items.drain(start..start + n).collect();
        self.items.extend(moved);
        Ok(())
    }

    /// Copy the item `idx` places below the top onto the top.
    pub fn pick(&mut self, idx: usize) -> Result<(), InterpreterError> {
        let item = self.peek(idx)?.to_vec();
        self.items.push(item);
        Ok(())
    }

    /// Move the item `idx` places below the top onto the top.
    pub fn roll(&mut self, idx: usize) -> Result<(), InterpreterError> {
        let item = self.remove(idx)?;
        self.items.push(item);
        Ok(())
    }

    /// Copy the top item below the second one.
    pub fn tuck(&mut self) -> Result<(), InterpreterError> {
        let pos = self.position(1)?;
        let top = self.peek(0)?.to_vec();
        self.items.insert(pos, top);
        Ok(())
    }
}
