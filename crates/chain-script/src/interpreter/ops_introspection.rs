//! Transaction introspection and script composition operations.

use chain_primitives::Hash;

use crate::chunk::encode_push_data;

use super::error::{InterpreterError, InterpreterErrorCode};
use super::parsed_opcode::parse_script;
use super::thread::Thread;
use super::OutputRequirement;

impl<'a> Thread<'a> {
    fn pop_amount(&mut self) -> Result<u64, InterpreterError> {
        let n = self.dstack.pop_num()?;
        n.to_u64().ok_or_else(|| {
            InterpreterError::new(
                InterpreterErrorCode::InvalidRange,
                format!("amount {} is not a valid quantity", n),
            )
        })
    }

    /// OP_EVAL pops a program and runs it on the current stacks.
    pub(crate) fn op_eval(&mut self) -> Result<(), InterpreterError> {
        let program = self.dstack.pop()?;
        if self.eval_depth >= self.cfg.max_eval_depth {
            return Err(InterpreterError::new(
                InterpreterErrorCode::EvalDepth,
                format!("OP_EVAL nested deeper than {}", self.cfg.max_eval_depth),
            ));
        }
        let parsed = parse_script(&program)?;

        self.eval_depth += 1;
        let result = self.run_script(&parsed);
        self.eval_depth -= 1;
        result
    }

    /// OP_REQUIREOUTPUT: `amount asset_id program ref_data_hash -> bool`.
    ///
    /// An empty reference data hash matches any output.
    pub(crate) fn op_requireoutput(&mut self) -> Result<(), InterpreterError> {
        let ctx = self.context("OP_REQUIREOUTPUT")?;

        let ref_data = self.dstack.pop()?;
        let ref_data_hash = if ref_data.is_empty() {
            None
        } else {
            Some(Hash::from_bytes(&ref_data).map_err(|e| {
                InterpreterError::new(InterpreterErrorCode::InvalidStackOperation, e.to_string())
            })?)
        };
        let program = self.dstack.pop()?;
        let asset_id = Hash::new(self.dstack.pop_hash()?);
        let amount = self.pop_amount()?;

        let found = ctx.has_output(&OutputRequirement {
            asset_id,
            amount,
            program: &program,
            ref_data_hash,
        });
        self.dstack.push_bool(found);
        Ok(())
    }

    pub(crate) fn op_asset(&mut self) -> Result<(), InterpreterError> {
        let ctx = self.context("OP_ASSET")?;
        self.dstack.push(ctx.asset_id().to_vec());
        Ok(())
    }

    pub(crate) fn op_amount(&mut self) -> Result<(), InterpreterError> {
        let ctx = self.context("OP_AMOUNT")?;
        self.dstack.push_num(ctx.amount().into());
        Ok(())
    }

    pub(crate) fn op_outputscript(&mut self) -> Result<(), InterpreterError> {
        let ctx = self.context("OP_OUTPUTSCRIPT")?;
        self.dstack.push(ctx.program().to_vec());
        Ok(())
    }

    /// OP_TIME pushes the minimum time, then the maximum time.
    pub(crate) fn op_time(&mut self) -> Result<(), InterpreterError> {
        let ctx = self.context("OP_TIME")?;
        self.dstack.push_num(ctx.min_time_ms().into());
        self.dstack.push_num(ctx.max_time_ms().into());
        Ok(())
    }

    pub(crate) fn op_circulation(&mut self) -> Result<(), InterpreterError> {
        let ctx = self.context("OP_CIRCULATION")?;
        let asset_id = Hash::new(self.dstack.pop_hash()?);
        let amount = ctx.circulation(&asset_id).ok_or_else(|| {
            InterpreterError::new(
                InterpreterErrorCode::UnknownAsset,
                format!("no circulation recorded for asset {}", asset_id),
            )
        })?;
        self.dstack.push_num(amount.into());
        Ok(())
    }

    /// OP_CATPUSHDATA: `a b -> a || push(b)`, building a program that
    /// pushes `b`.
    pub(crate) fn op_catpushdata(&mut self) -> Result<(), InterpreterError> {
        let b = self.dstack.pop()?;
        let mut a = self.dstack.pop()?;
        let push = encode_push_data(&b).map_err(|e| {
            InterpreterError::new(InterpreterErrorCode::ElementTooBig, e.to_string())
        })?;
        self.check_element_size(a.len() + push.len())?;
        a.extend_from_slice(&push);
        self.dstack.push(a);
        Ok(())
    }
}
