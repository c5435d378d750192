use super::error::{InterpreterError, InterpreterErrorCode};
use super::stack::as_bool;
use super::thread::Thread;

impl<'a> Thread<'a> {
    pub(crate) fn op_to_alt_stack(&mut self) -> Result<(), InterpreterError> {
        let item = self.dstack.pop()?;
        self.astack.push(item);
        Ok(())
    }

    pub(crate) fn op_from_alt_stack(&mut self) -> Result<(), InterpreterError> {
        let item = self.astack.pop()?;
        self.dstack.push(item);
        Ok(())
    }

    pub(crate) fn op_ifdup(&mut self) -> Result<(), InterpreterError> {
        if as_bool(self.dstack.peek(0)?) {
            self.dstack.dup_top(1)?;
        }
        Ok(())
    }

    pub(crate) fn op_depth(&mut self) -> Result<(), InterpreterError> {
        let depth = self.dstack.len();
        self.dstack.push_num(depth.into());
        Ok(())
    }

    pub(crate) fn op_nip(&mut self) -> Result<(), InterpreterError> {
        self.dstack.remove(1).map(drop)
    }

    /// Pop the depth operand of PICK and ROLL.
    fn pop_depth(&mut self) -> Result<usize, InterpreterError> {
        let n = self.dstack.pop_num()?;
        usize::try_from(n.clamp_i64()).map_err(|_| {
            InterpreterError::new(
                InterpreterErrorCode::InvalidStackOperation,
                format!("negative stack index {}", n),
            )
        })
    }

    pub(crate) fn op_pick(&mut self) -> Result<(), InterpreterError> {
        let idx = self.pop_depth()?;
        self.dstack.pick(idx)
    }

    pub(crate) fn op_roll(&mut self) -> Result<(), InterpreterError> {
        let idx = self.pop_depth()?;
        self.dstack.roll(idx)
    }
}
