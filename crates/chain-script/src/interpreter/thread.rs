//! Script execution thread: the interpreter loop.

use tracing::trace;

use crate::opcodes::*;

use super::config::Config;
use super::error::{InterpreterError, InterpreterErrorCode};
use super::flags::ScriptFlags;
use super::ops_crypto::HashType;
use super::parsed_opcode::*;
use super::scriptnum::ScriptNumber;
use super::stack::Stack;
use super::TxContext;

/// State of an IF/NOTIF branch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Cond {
    True,
    False,
    /// Opened inside a branch that is not executing; ELSE cannot flip it.
    Skip,
}

/// One level of the branch and loop nesting stack.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Frame {
    If { cond: Cond, seen_else: bool },
    /// `start` is the offset of the WHILE that opened the loop.
    While { start: usize, executing: bool },
}

impl Frame {
    fn is_executing(&self) -> bool {
        match self {
            Frame::If { cond, .. } => *cond == Cond::True,
            Frame::While { executing, .. } => *executing,
        }
    }
}

/// The execution thread for the script interpreter.
pub struct Thread<'a> {
    /// The main data stack.
    pub dstack: Stack,
    /// The alternate stack used by OP_TOALTSTACK and OP_FROMALTSTACK.
    pub astack: Stack,
    pub cfg: &'a Config,
    /// Version of the program being run; selects the enabled opcodes.
    pub version: u32,
    pub flags: ScriptFlags,
    /// Branch and loop nesting of the script currently running.
    pub(crate) cond_stack: Vec<Frame>,
    /// Non-push opcodes executed in the current top-level script.
    pub num_ops: usize,
    /// Loop iterations taken so far.
    pub iterations: usize,
    /// Current OP_EVAL nesting.
    pub eval_depth: usize,
    /// Target offset set by ENDWHILE for the next instruction.
    pub(crate) jump_to: Option<usize>,
    pub tx_context: Option<&'a dyn TxContext>,
}

impl<'a> Thread<'a> {
    /// Create a thread for a program of the given version.
    pub fn new(
        cfg: &'a Config,
        version: u32,
        flags: ScriptFlags,
        tx_context: Option<&'a dyn TxContext>,
    ) -> Result<Self, InterpreterError> {
        if version > MAX_SCRIPT_VERSION {
            return Err(InterpreterError::new(
                InterpreterErrorCode::UnsupportedVersion,
                format!(
                    "script version {} is above the highest supported version {}",
                    version, MAX_SCRIPT_VERSION
                ),
            ));
        }

        let require_minimal = flags.has_flag(ScriptFlags::VERIFY_MINIMAL_DATA);
        let max_num_len = cfg.max_script_number_length;

        Ok(Thread {
            dstack: Stack::new(max_num_len, require_minimal),
            astack: Stack::new(max_num_len, require_minimal),
            cfg,
            version,
            flags,
            cond_stack: Vec::new(),
            num_ops: 0,
            iterations: 0,
            eval_depth: 0,
            jump_to: None,
            tx_context,
        })
    }

    pub fn has_flag(&self, flag: ScriptFlags) -> bool {
        self.flags.has_flag(flag)
    }

    /// Return true if the innermost branch or loop is executing.
    pub fn is_branch_executing(&self) -> bool {
        self.cond_stack.last().map_or(true, Frame::is_executing)
    }

    pub(crate) fn context(&self, op: &str) -> Result<&'a dyn TxContext, InterpreterError> {
        self.tx_context.ok_or_else(|| {
            InterpreterError::new(
                InterpreterErrorCode::MissingContext,
                format!("{} requires a transaction context", op),
            )
        })
    }

    /// Run the unlocking script then the locking script, and check the
    /// final stack.
    pub fn execute(&mut self, unlocking: &[u8], locking: &[u8]) -> Result<(), InterpreterError> {
        for (what, script) in [("unlocking", unlocking), ("locking", locking)] {
            if script.len() > self.cfg.max_script_size {
                return Err(InterpreterError::new(
                    InterpreterErrorCode::ScriptTooBig,
                    format!(
                        "{} script size {} is larger than the max allowed size {}",
                        what,
                        script.len(),
                        self.cfg.max_script_size
                    ),
                ));
            }
        }

        let uscript = parse_script(unlocking)?;
        let lscript = parse_script(locking)?;

        if self.has_flag(ScriptFlags::VERIFY_SIG_PUSH_ONLY) && !is_push_only(&uscript) {
            return Err(InterpreterError::new(
                InterpreterErrorCode::NotPushOnly,
                "signature script is not push only".to_string(),
            ));
        }

        self.num_ops = 0;
        self.run_script(&uscript)?;

        // Alt stack doesn't persist between scripts.
        self.astack.clear();
        self.num_ops = 0;
        self.run_script(&lscript)?;

        self.check_error_condition()
    }

    /// Execute one decoded script to its end on the current stacks.
    pub(crate) fn run_script(&mut self, script: &[ParsedOpcode]) -> Result<(), InterpreterError> {
        let outer = std::mem::take(&mut self.cond_stack);

        let mut pc = 0;
        while pc < script.len() {
            let pop = &script[pc];
            trace!(pc, op = pop.name(), depth = self.dstack.len(), "step");
            self.execute_opcode(pop, pc)?;
            pc = self.jump_to.take().unwrap_or(pc + 1);

            let combined = self.dstack.len() + self.astack.len();
            if combined > self.cfg.max_stack_size {
                return Err(InterpreterError::new(
                    InterpreterErrorCode::StackOverflow,
                    format!(
                        "combined stack size {} > max allowed {}",
                        combined, self.cfg.max_stack_size
                    ),
                ));
            }
        }

        if !self.cond_stack.is_empty() {
            return Err(InterpreterError::new(
                InterpreterErrorCode::UnbalancedConditional,
                "end of script reached in conditional execution".to_string(),
            ));
        }
        self.cond_stack = outer;
        Ok(())
    }

    fn check_error_condition(&mut self) -> Result<(), InterpreterError> {
        if self.dstack.is_empty() {
            if self.has_flag(ScriptFlags::ALLOW_EMPTY_STACK) {
                return Ok(());
            }
            return Err(InterpreterError::new(
                InterpreterErrorCode::EmptyStack,
                "stack empty at end of script execution".to_string(),
            ));
        }

        if self.has_flag(ScriptFlags::VERIFY_CLEAN_STACK) && self.dstack.len() != 1 {
            return Err(InterpreterError::new(
                InterpreterErrorCode::CleanStack,
                format!("stack contains {} unexpected items", self.dstack.len() - 1),
            ));
        }

        let v = self.dstack.pop_bool()?;
        if !v {
            return Err(InterpreterError::new(
                InterpreterErrorCode::EvalFalse,
                "false stack entry at end of script execution".to_string(),
            ));
        }

        Ok(())
    }

    fn execute_opcode(&mut self, pop: &ParsedOpcode, pc: usize) -> Result<(), InterpreterError> {
        // Disabled opcodes fail wherever they appear, executed or not.
        if pop.is_disabled(self.version) {
            return Err(InterpreterError::new(
                InterpreterErrorCode::DisabledOpcode,
                format!(
                    "attempt to execute disabled opcode {} in version {} script",
                    pop.name(),
                    self.version
                ),
            ));
        }

        if pop.data.len() > self.cfg.max_script_element_size {
            return Err(InterpreterError::new(
                InterpreterErrorCode::ElementTooBig,
                format!(
                    "element size {} exceeds max allowed size {}",
                    pop.data.len(),
                    self.cfg.max_script_element_size
                ),
            ));
        }

        if pop.value() > OP_16 {
            self.count_ops(1)?;
        }

        let executing = self.is_branch_executing();
        if !executing && !pop.is_conditional() {
            return Ok(());
        }

        if executing
            && self.dstack.requires_minimal()
            && pop.value() <= OP_PUSHDATA4
        {
            pop.enforce_minimum_data_push()?;
        }

        self.dispatch_opcode(pop, pc)
    }

    pub(crate) fn count_ops(&mut self, n: usize) -> Result<(), InterpreterError> {
        self.num_ops += n;
        if self.num_ops > self.cfg.max_ops {
            return Err(InterpreterError::new(
                InterpreterErrorCode::TooManyOperations,
                format!("exceeded max operation limit of {}", self.cfg.max_ops),
            ));
        }
        Ok(())
    }

    fn dispatch_opcode(&mut self, pop: &ParsedOpcode, pc: usize) -> Result<(), InterpreterError> {
        match pop.value() {
            OP_FALSE | OP_DATA_1..=OP_DATA_75 | OP_PUSHDATA1 | OP_PUSHDATA2 | OP_PUSHDATA4 => {
                self.dstack.push(pop.data.clone());
                Ok(())
            }
            OP_1NEGATE => {
                self.dstack.push_num(ScriptNumber::from(-1i64));
                Ok(())
            }
            OP_1..=OP_16 => {
                self.dstack.push(vec![pop.value() - (OP_1 - 1)]);
                Ok(())
            }
            OP_NOP | OP_CODESEPARATOR => Ok(()),
            OP_RESERVED | OP_VER | OP_RESERVED1 | OP_RESERVED2 => self.op_reserved(pop),
            OP_IF => self.op_if(pop),
            OP_NOTIF => self.op_notif(pop),
            OP_ELSE => self.op_else(pop),
            OP_ENDIF => self.op_endif(pop),
            OP_VERIFY => self.op_verify(pop),
            OP_RETURN => self.op_return(),
            OP_WHILE => self.op_while(pc),
            OP_ENDWHILE => self.op_endwhile(pop),

            // Stack ops
            OP_TOALTSTACK => self.op_to_alt_stack(),
            OP_FROMALTSTACK => self.op_from_alt_stack(),
            OP_2DROP => self.dstack.drop_top(2),
            OP_2DUP => self.dstack.dup_top(2),
            OP_3DUP => self.dstack.dup_top(3),
            OP_2OVER => self.dstack.over(2),
            OP_2ROT => self.dstack.rotate(2),
            OP_2SWAP => self.dstack.swap_top(2),
            OP_IFDUP => self.op_ifdup(),
            OP_DEPTH => self.op_depth(),
            OP_DROP => self.dstack.drop_top(1),
            OP_DUP => self.dstack.dup_top(1),
            OP_NIP => self.op_nip(),
            OP_OVER => self.dstack.over(1),
            OP_PICK => self.op_pick(),
            OP_ROLL => self.op_roll(),
            OP_ROT => self.dstack.rotate(1),
            OP_SWAP => self.dstack.swap_top(1),
            OP_TUCK => self.dstack.tuck(),

            // Splice
            OP_CAT => self.op_cat(),
            OP_SUBSTR => self.op_substr(),
            OP_LEFT => self.op_left(),
            OP_RIGHT => self.op_right(),
            OP_SIZE => self.op_size(),

            // Bitwise
            OP_INVERT => self.op_invert(),
            OP_AND => self.op_bitwise(|a, b| a & b),
            OP_OR => self.op_bitwise(|a, b| a | b),
            OP_XOR => self.op_bitwise(|a, b| a ^ b),
            OP_EQUAL => self.op_equal(),
            OP_EQUALVERIFY => self.op_equalverify(pop),

            // Arithmetic
            OP_1ADD => self.op_unary(|n| &n + &ScriptNumber::from(1i64)),
            OP_1SUB => self.op_unary(|n| &n - &ScriptNumber::from(1i64)),
            OP_NEGATE => self.op_unary(|n| -n),
            OP_ABS => self.op_unary(|n| n.abs()),
            OP_NOT => self.op_unary(|n| n.is_zero().into()),
            OP_0NOTEQUAL => self.op_unary(|n| (!n.is_zero()).into()),
            OP_ADD => self.op_binary(|a, b| a + b),
            OP_SUB => self.op_binary(|a, b| a - b),
            OP_MUL => self.op_binary(|a, b| a * b),
            OP_DIV => self.op_divide("divide", ScriptNumber::checked_div),
            OP_MOD => self.op_divide("mod", ScriptNumber::checked_rem),
            OP_LSHIFT => self.op_shift(ScriptNumber::shift_left),
            OP_RSHIFT => self.op_shift(ScriptNumber::shift_right),
            OP_BOOLAND => self.op_compare(|a, b| !a.is_zero() && !b.is_zero()),
            OP_BOOLOR => self.op_compare(|a, b| !a.is_zero() || !b.is_zero()),
            OP_NUMEQUAL => self.op_compare(|a, b| a == b),
            OP_NUMEQUALVERIFY => self.op_numequalverify(pop),
            OP_NUMNOTEQUAL => self.op_compare(|a, b| a != b),
            OP_LESSTHAN => self.op_compare(|a, b| a < b),
            OP_GREATERTHAN => self.op_compare(|a, b| a > b),
            OP_LESSTHANOREQUAL => self.op_compare(|a, b| a <= b),
            OP_GREATERTHANOREQUAL => self.op_compare(|a, b| a >= b),
            OP_MIN => self.op_binary(|a, b| a.min(b).clone()),
            OP_MAX => self.op_binary(|a, b| a.max(b).clone()),
            OP_WITHIN => self.op_within(),

            // Crypto
            OP_RIPEMD160 => self.op_hash(HashType::Ripemd160),
            OP_SHA1 => self.op_hash(HashType::Sha1),
            OP_SHA256 => self.op_hash(HashType::Sha256),
            OP_HASH160 => self.op_hash(HashType::Hash160),
            OP_HASH256 => self.op_hash(HashType::Hash256),
            OP_CHECKSIG => self.op_checksig(),
            OP_CHECKSIGVERIFY => self.op_checksigverify(pop),
            OP_CHECKMULTISIG => self.op_checkmultisig(),
            OP_CHECKMULTISIGVERIFY => self.op_checkmultisigverify(pop),
            OP_CHECKLOCKTIMEVERIFY => self.op_check_locktime_verify(),

            // Introspection
            OP_EVAL => self.op_eval(),
            OP_REQUIREOUTPUT => self.op_requireoutput(),
            OP_ASSET => self.op_asset(),
            OP_AMOUNT => self.op_amount(),
            OP_OUTPUTSCRIPT => self.op_outputscript(),
            OP_TIME => self.op_time(),
            OP_CIRCULATION => self.op_circulation(),
            OP_CATPUSHDATA => self.op_catpushdata(),

            OP_NOP1 | OP_NOP3 | OP_NOP4 | OP_NOP5 | OP_NOP6 | OP_NOP7 | OP_NOP8 | OP_NOP9
            | OP_NOP10 => {
                if self.has_flag(ScriptFlags::DISCOURAGE_UPGRADABLE_NOPS) {
                    return Err(InterpreterError::new(
                        InterpreterErrorCode::DiscourageUpgradableNOPs,
                        format!("{} reserved for soft-fork upgrades", pop.name()),
                    ));
                }
                Ok(())
            }

            // Unassigned bytes and the template-matching pseudo opcodes.
            _ => Err(InterpreterError::new(
                InterpreterErrorCode::ReservedOpcode,
                format!("attempt to execute invalid opcode {}", pop.name()),
            )),
        }
    }
}
