//! Splice and bitwise operations.

use super::error::{InterpreterError, InterpreterErrorCode};
use super::parsed_opcode::ParsedOpcode;
use super::thread::Thread;

impl<'a> Thread<'a> {
    pub(crate) fn check_element_size(&self, len: usize) -> Result<(), InterpreterError> {
        if len > self.cfg.max_script_element_size {
            return Err(InterpreterError::new(
                InterpreterErrorCode::ElementTooBig,
                format!(
                    "result size {} exceeds max allowed size {}",
                    len, self.cfg.max_script_element_size
                ),
            ));
        }
        Ok(())
    }

    /// Pop a non-negative number used as a length or offset.
    pub(crate) fn pop_index(&mut self, what: &str) -> Result<usize, InterpreterError> {
        let n = self.dstack.pop_num()?;
        if n.is_negative() {
            return Err(InterpreterError::new(
                InterpreterErrorCode::InvalidRange,
                format!("{} {} is negative", what, n),
            ));
        }
        n.to_u64()
            .and_then(|v| usize::try_from(v).ok())
            .ok_or_else(|| {
                InterpreterError::new(
                    InterpreterErrorCode::InvalidRange,
                    format!("{} is out of range", what),
                )
            })
    }

    fn range_error(what: &str, end: usize, len: usize) -> InterpreterError {
        InterpreterError::new(
            InterpreterErrorCode::InvalidRange,
            format!("{} reaches byte {} of a {} byte string", what, end, len),
        )
    }

    pub(crate) fn op_cat(&mut self) -> Result<(), InterpreterError> {
        let b = self.dstack.pop()?;
        let mut a = self.dstack.pop()?;
        self.check_element_size(a.len() + b.len())?;
        a.extend_from_slice(&b);
        self.dstack.push(a);
        Ok(())
    }

    /// OP_SUBSTR: `str begin size -> str[begin..begin + size]`.
    pub(crate) fn op_substr(&mut self) -> Result<(), InterpreterError> {
        let size = self.pop_index("size")?;
        let begin = self.pop_index("begin")?;
        let s = self.dstack.pop()?;
        let end = begin
            .checked_add(size)
            .filter(|end| *end <= s.len())
            .ok_or_else(|| Self::range_error("substring", begin.saturating_add(size), s.len()))?;
        self.dstack.push(s[begin..end].to_vec());
        Ok(())
    }

    /// OP_LEFT: `str size -> str[..size]`.
    pub(crate) fn op_left(&mut self) -> Result<(), InterpreterError> {
        let size = self.pop_index("size")?;
        let mut s = self.dstack.pop()?;
        if size > s.len() {
            return Err(Self::range_error("left", size, s.len()));
        }
        s.truncate(size);
        self.dstack.push(s);
        Ok(())
    }

    /// OP_RIGHT: `str size -> last size bytes of str`.
    pub(crate) fn op_right(&mut self) -> Result<(), InterpreterError> {
        let size = self.pop_index("size")?;
        let s = self.dstack.pop()?;
        if size > s.len() {
            return Err(Self::range_error("right", size, s.len()));
        }
        self.dstack.push(s[s.len() - size..].to_vec());
        Ok(())
    }

    pub(crate) fn op_size(&mut self) -> Result<(), InterpreterError> {
        let len = self.dstack.peek(0)?.len();
        self.dstack.push_num(len.into());
        Ok(())
    }

    pub(crate) fn op_invert(&mut self) -> Result<(), InterpreterError> {
        let ba = self.dstack.pop()?;
        let inverted: Vec<u8> = ba.iter().map(|b| b ^ 0xFF).collect();
        self.dstack.push(inverted);
        Ok(())
    }

    /// Combine two equal-length strings byte by byte.
    pub(crate) fn op_bitwise(&mut self, f: fn(u8, u8) -> u8) -> Result<(), InterpreterError> {
        let a = self.dstack.pop()?;
        let b = self.dstack.pop()?;
        if a.len() != b.len() {
            return Err(InterpreterError::new(
                InterpreterErrorCode::InvalidRange,
                format!("byte strings differ in length: {} and {}", a.len(), b.len()),
            ));
        }
        let c: Vec<u8> = a.iter().zip(b.iter()).map(|(&x, &y)| f(x, y)).collect();
        self.dstack.push(c);
        Ok(())
    }

    pub(crate) fn op_equal(&mut self) -> Result<(), InterpreterError> {
        let a = self.dstack.pop()?;
        let b = self.dstack.pop()?;
        self.dstack.push_bool(a == b);
        Ok(())
    }

    pub(crate) fn op_equalverify(&mut self, pop: &ParsedOpcode) -> Result<(), InterpreterError> {
        self.op_equal()?;
        self.abstract_verify(pop, InterpreterErrorCode::EqualVerify)
    }
}
