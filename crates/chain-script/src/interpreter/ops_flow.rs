//! Flow control operations: branches, loops, verification and time locks.

use super::error::{InterpreterError, InterpreterErrorCode};
use super::parsed_opcode::ParsedOpcode;
use super::thread::{Cond, Frame, Thread};

impl<'a> Thread<'a> {
    pub(crate) fn op_reserved(&self, pop: &ParsedOpcode) -> Result<(), InterpreterError> {
        Err(InterpreterError::new(
            InterpreterErrorCode::ReservedOpcode,
            format!("attempt to execute reserved opcode {}", pop.name()),
        ))
    }

    fn unbalanced(pop: &ParsedOpcode) -> InterpreterError {
        InterpreterError::new(
            InterpreterErrorCode::UnbalancedConditional,
            format!(
                "encountered opcode {} with no matching opcode to begin conditional execution",
                pop.name()
            ),
        )
    }

    fn open_if(&mut self, negate: bool) -> Result<(), InterpreterError> {
        let cond = if self.is_branch_executing() {
            if self.dstack.pop_bool()? != negate {
                Cond::True
            } else {
                Cond::False
            }
        } else {
            Cond::Skip
        };
        self.cond_stack.push(Frame::If {
            cond,
            seen_else: false,
        });
        Ok(())
    }

    pub(crate) fn op_if(&mut self, _pop: &ParsedOpcode) -> Result<(), InterpreterError> {
        self.open_if(false)
    }

    pub(crate) fn op_notif(&mut self, _pop: &ParsedOpcode) -> Result<(), InterpreterError> {
        self.open_if(true)
    }

    pub(crate) fn op_else(&mut self, pop: &ParsedOpcode) -> Result<(), InterpreterError> {
        match self.cond_stack.last_mut() {
            Some(Frame::If { cond, seen_else }) if !*seen_else => {
                *cond = match *cond {
                    Cond::True => Cond::False,
                    Cond::False => Cond::True,
                    Cond::Skip => Cond::Skip,
                };
                *seen_else = true;
                Ok(())
            }
            _ => Err(Self::unbalanced(pop)),
        }
    }

    pub(crate) fn op_endif(&mut self, pop: &ParsedOpcode) -> Result<(), InterpreterError> {
        match self.cond_stack.last() {
            Some(Frame::If { .. }) => {
                self.cond_stack.pop();
                Ok(())
            }
            _ => Err(Self::unbalanced(pop)),
        }
    }

    /// OP_WHILE pops the loop condition. A true condition enters the body,
    /// a false one skips to the matching ENDWHILE. The body is expected to
    /// leave the next condition on top of the stack.
    pub(crate) fn op_while(&mut self, pc: usize) -> Result<(), InterpreterError> {
        let executing = self.is_branch_executing() && self.dstack.pop_bool()?;
        self.cond_stack.push(Frame::While {
            start: pc,
            executing,
        });
        Ok(())
    }

    /// OP_ENDWHILE closes the loop and, when the body ran, jumps back to
    /// the WHILE so the condition is tested again.
    pub(crate) fn op_endwhile(&mut self, pop: &ParsedOpcode) -> Result<(), InterpreterError> {
        let (start, executing) = match self.cond_stack.last() {
            Some(Frame::While { start, executing }) => (*start, *executing),
            _ => return Err(Self::unbalanced(pop)),
        };
        self.cond_stack.pop();
        if !executing {
            return Ok(());
        }

        self.iterations += 1;
        if self.iterations > self.cfg.max_loop_iterations {
            return Err(InterpreterError::new(
                InterpreterErrorCode::TooManyIterations,
                format!(
                    "loop exceeded the limit of {} iterations",
                    self.cfg.max_loop_iterations
                ),
            ));
        }
        self.jump_to = Some(start);
        Ok(())
    }

    pub(crate) fn op_verify(&mut self, pop: &ParsedOpcode) -> Result<(), InterpreterError> {
        self.abstract_verify(pop, InterpreterErrorCode::Verify)
    }

    pub(crate) fn abstract_verify(
        &mut self,
        pop: &ParsedOpcode,
        code: InterpreterErrorCode,
    ) -> Result<(), InterpreterError> {
        let verified = self.dstack.pop_bool()?;
        if !verified {
            return Err(InterpreterError::new(code, format!("{} failed", pop.name())));
        }
        Ok(())
    }

    /// OP_RETURN, also known as OP_FAIL, ends the script unsuccessfully.
    pub(crate) fn op_return(&mut self) -> Result<(), InterpreterError> {
        Err(InterpreterError::new(
            InterpreterErrorCode::EarlyReturn,
            "script returned early".to_string(),
        ))
    }

    /// Require the transaction's minimum time to be at or past the
    /// millisecond timestamp on top of the stack. The operand stays.
    pub(crate) fn op_check_locktime_verify(&mut self) -> Result<(), InterpreterError> {
        let ctx = self.context("OP_CHECKLOCKTIMEVERIFY")?;

        let lock_time = self.dstack.peek_num(0)?;
        if lock_time.is_negative() {
            return Err(InterpreterError::new(
                InterpreterErrorCode::NegativeLockTime,
                format!("negative lock time: {}", lock_time),
            ));
        }

        let min_time = ctx.min_time_ms();
        match lock_time.to_u64() {
            Some(t) if t <= min_time => Ok(()),
            _ => Err(InterpreterError::new(
                InterpreterErrorCode::UnsatisfiedLockTime,
                format!(
                    "locktime requirement not satisfied: {} > transaction min time {}",
                    lock_time,
                    min_time
                ),
            )),
        }
    }
}
