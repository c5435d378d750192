//! Numeric operations. Operands are decoded with the thread's number
//! length limit; results are pushed unbounded.

use super::error::{InterpreterError, InterpreterErrorCode};
use super::parsed_opcode::ParsedOpcode;
use super::scriptnum::ScriptNumber;
use super::thread::Thread;

impl<'a> Thread<'a> {
    pub(crate) fn op_unary(
        &mut self,
        f: impl FnOnce(ScriptNumber) -> ScriptNumber,
    ) -> Result<(), InterpreterError> {
        let n = self.dstack.pop_num()?;
        self.dstack.push_num(f(n));
        Ok(())
    }

    /// Pop `b` then `a` and push `f(a, b)`.
    pub(crate) fn op_binary(
        &mut self,
        f: impl FnOnce(&ScriptNumber, &ScriptNumber) -> ScriptNumber,
    ) -> Result<(), InterpreterError> {
        let b = self.dstack.pop_num()?;
        let a = self.dstack.pop_num()?;
        self.dstack.push_num(f(&a, &b));
        Ok(())
    }

    /// Pop `b` then `a` and push the truth of `f(a, b)`.
    pub(crate) fn op_compare(
        &mut self,
        f: impl FnOnce(&ScriptNumber, &ScriptNumber) -> bool,
    ) -> Result<(), InterpreterError> {
        self.op_binary(|a, b| f(a, b).into())
    }

    /// DIV and MOD: a zero divisor is an error rather than a result.
    pub(crate) fn op_divide(
        &mut self,
        what: &str,
        f: impl FnOnce(&ScriptNumber, &ScriptNumber) -> Option<ScriptNumber>,
    ) -> Result<(), InterpreterError> {
        let b = self.dstack.pop_num()?;
        let a = self.dstack.pop_num()?;
        let q = f(&a, &b).ok_or_else(|| {
            InterpreterError::new(
                InterpreterErrorCode::DivideByZero,
                format!("{} by zero", what),
            )
        })?;
        self.dstack.push_num(q);
        Ok(())
    }

    /// LSHIFT and RSHIFT. The shift count is bounded by the width of the
    /// largest number an operand may hold.
    pub(crate) fn op_shift(
        &mut self,
        f: impl FnOnce(&ScriptNumber, usize) -> ScriptNumber,
    ) -> Result<(), InterpreterError> {
        let bits = self.pop_index("shift")?;
        let x = self.dstack.pop_num()?;
        let max_bits = 8 * self.cfg.max_script_number_length;
        if bits > max_bits {
            return Err(InterpreterError::new(
                InterpreterErrorCode::NumberTooBig,
                format!("shift of {} bits exceeds {}", bits, max_bits),
            ));
        }
        self.dstack.push_num(f(&x, bits));
        Ok(())
    }

    pub(crate) fn op_numequalverify(&mut self, pop: &ParsedOpcode) -> Result<(), InterpreterError> {
        self.op_compare(|a, b| a == b)?;
        self.abstract_verify(pop, InterpreterErrorCode::NumEqualVerify)
    }

    /// Push whether `min <= x < max`.
    pub(crate) fn op_within(&mut self) -> Result<(), InterpreterError> {
        let max = self.dstack.pop_num()?;
        let min = self.dstack.pop_num()?;
        let x = self.dstack.pop_num()?;
        self.dstack.push_bool(min <= x && x < max);
        Ok(())
    }
}
