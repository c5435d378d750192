//! Versioned script interpreter.
//!
//! Runs a witness (unlocking) program followed by a control (locking)
//! program on a shared stack. The program version selects which opcodes
//! are enabled, and a [`TxContext`] supplies the transaction data read by
//! the introspection and signature opcodes.
//!
//! # Architecture
//!
//! The interpreter does not depend on the transaction crate. Callers
//! implement [`TxContext`] for whatever entry is being authorized.
//!
//! # Example
//!
//! ```ignore
//! use chain_script::interpreter::{Engine, ScriptFlags};
//!
//! let engine = Engine::new();
//! engine.execute(&witness, &program, 1, ScriptFlags::STANDARD, Some(&ctx))?;
//! ```

pub mod config;
pub mod error;
pub mod flags;
mod ops_arithmetic;
mod ops_crypto;
mod ops_data;
mod ops_flow;
mod ops_introspection;
mod ops_stack;
pub mod parsed_opcode;
pub mod scriptnum;
pub mod stack;
pub mod thread;

pub use config::Config;
pub use error::{InterpreterError, InterpreterErrorCode};
pub use flags::ScriptFlags;
pub use parsed_opcode::{ParsedOpcode, ParsedScript};
pub use scriptnum::ScriptNumber;
pub use stack::Stack;

use chain_primitives::{AssetId, Hash};
use tracing::debug;

use crate::Script;
use thread::Thread;

/// An output that OP_REQUIREOUTPUT asks the transaction to contain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputRequirement<'a> {
    pub asset_id: AssetId,
    pub amount: u64,
    pub program: &'a [u8],
    /// `None` matches an output with any reference data.
    pub ref_data_hash: Option<Hash>,
}

/// Transaction data visible to a running program.
pub trait TxContext {
    /// Hash committed to by OP_CHECKSIG and OP_CHECKMULTISIG.
    fn tx_sig_hash(&self) -> Hash;

    /// Asset of the value being authorized.
    fn asset_id(&self) -> AssetId;

    fn amount(&self) -> u64;

    /// Control program of the value being authorized.
    fn program(&self) -> &[u8];

    fn min_time_ms(&self) -> u64;

    /// Zero means the transaction has no upper time bound.
    fn max_time_ms(&self) -> u64;

    /// Units of `asset_id` in circulation, if the asset is known.
    fn circulation(&self, asset_id: &AssetId) -> Option<u64>;

    fn has_output(&self, req: &OutputRequirement<'_>) -> bool;
}

/// The script execution engine.
#[derive(Debug, Clone, Default)]
pub struct Engine {
    cfg: Config,
}

impl Engine {
    pub fn new() -> Self {
        Engine::default()
    }

    pub fn with_config(cfg: Config) -> Self {
        Engine { cfg }
    }

    pub fn config(&self) -> &Config {
        &self.cfg
    }

    /// Execute a witness program, then the control program it unlocks.
    ///
    /// # Arguments
    /// * `unlocking` - The witness program.
    /// * `locking` - The control program.
    /// * `version` - Version of the control program.
    /// * `flags` - Verification flags.
    /// * `tx_context` - Transaction data for introspection and signature opcodes.
    pub fn execute(
        &self,
        unlocking: &Script,
        locking: &Script,
        version: u32,
        flags: ScriptFlags,
        tx_context: Option<&dyn TxContext>,
    ) -> Result<(), InterpreterError> {
        let mut thread = Thread::new(&self.cfg, version, flags, tx_context)?;
        let result = thread.execute(unlocking.to_bytes(), locking.to_bytes());
        if let Err(e) = &result {
            debug!(version, error = %e, "script execution failed");
        }
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::opcodes::*;
    use chain_primitives::chainhash::hash_h;
    use chain_primitives::ec::PrivateKey;
    use chain_primitives::hash::sha256;

    struct MockContext {
        sig_hash: Hash,
        asset_id: AssetId,
        amount: u64,
        program: Vec<u8>,
        min_time: u64,
        max_time: u64,
        outputs: Vec<(AssetId, u64, Vec<u8>, Hash)>,
    }

    impl MockContext {
        fn new() -> Self {
            MockContext {
                sig_hash: hash_h(b"sighash"),
                asset_id: hash_h(b"asset"),
                amount: 500,
                program: vec![OP_1],
                min_time: 1_000,
                max_time: 2_000,
                outputs: vec![(hash_h(b"asset"), 300, vec![OP_2], hash_h(b"ref"))],
            }
        }
    }

    impl TxContext for MockContext {
        fn tx_sig_hash(&self) -> Hash {
            self.sig_hash
        }
        fn asset_id(&self) -> AssetId {
            self.asset_id
        }
        fn amount(&self) -> u64 {
            self.amount
        }
        fn program(&self) -> &[u8] {
            &self.program
        }
        fn min_time_ms(&self) -> u64 {
            self.min_time
        }
        fn max_time_ms(&self) -> u64 {
            self.max_time
        }
        fn circulation(&self, asset_id: &AssetId) -> Option<u64> {
            (*asset_id == self.asset_id).then_some(10_000)
        }
        fn has_output(&self, req: &OutputRequirement<'_>) -> bool {
            self.outputs.iter().any(|(a, n, p, r)| {
                *a == req.asset_id
                    && *n == req.amount
                    && p.as_slice() == req.program
                    && req.ref_data_hash.map_or(true, |h| h == *r)
            })
        }
    }

    fn run(unlock: &[u8], lock: &[u8], version: u32) -> Result<(), InterpreterError> {
        Engine::new().execute(
            &Script::from_bytes(unlock),
            &Script::from_bytes(lock),
            version,
            ScriptFlags::NONE,
            None,
        )
    }

    fn run_ctx(unlock: &Script, lock: &Script, ctx: &MockContext) -> Result<(), InterpreterError> {
        Engine::new().execute(unlock, lock, 1, ScriptFlags::NONE, Some(ctx))
    }

    fn code(r: Result<(), InterpreterError>) -> InterpreterErrorCode {
        r.expect_err("expected failure").code
    }

    #[test]
    fn test_equal() {
        assert!(run(&[OP_1], &[OP_1, OP_EQUAL], 0).is_ok());
        assert_eq!(code(run(&[OP_1], &[OP_2, OP_EQUAL], 0)), InterpreterErrorCode::EvalFalse);
    }

    #[test]
    fn test_arithmetic() {
        assert!(run(&[OP_2, OP_3], &[OP_ADD, OP_5, OP_EQUAL], 0).is_ok());
        assert!(run(&[OP_5, OP_3], &[OP_SUB, OP_2, OP_EQUAL], 0).is_ok());
        assert!(run(&[OP_6, OP_7], &[OP_MUL, OP_DATA_1, 42, OP_EQUAL], 1).is_ok());
        assert!(run(&[OP_7, OP_2], &[OP_DIV, OP_3, OP_EQUAL], 1).is_ok());
        assert!(run(&[OP_3, OP_2], &[OP_LSHIFT, OP_12, OP_EQUAL], 1).is_ok());
        assert!(run(&[OP_1NEGATE, OP_1], &[OP_RSHIFT, OP_1NEGATE, OP_EQUAL], 1).is_ok());
        assert_eq!(code(run(&[OP_1, OP_0], &[OP_DIV], 1)), InterpreterErrorCode::DivideByZero);
    }

    #[test]
    fn test_if_else_endif() {
        assert!(run(&[OP_1], &[OP_IF, OP_2, OP_ELSE, OP_3, OP_ENDIF, OP_2, OP_EQUAL], 0).is_ok());
        assert!(run(&[OP_0], &[OP_IF, OP_2, OP_ELSE, OP_3, OP_ENDIF, OP_3, OP_EQUAL], 0).is_ok());
        assert!(run(&[OP_0], &[OP_NOTIF, OP_1, OP_ENDIF], 0).is_ok());
    }

    #[test]
    fn test_unbalanced_conditionals() {
        assert_eq!(
            code(run(&[OP_1], &[OP_IF, OP_1], 0)),
            InterpreterErrorCode::UnbalancedConditional
        );
        assert_eq!(code(run(&[OP_1], &[OP_ENDIF], 0)), InterpreterErrorCode::UnbalancedConditional);
        assert_eq!(
            code(run(&[OP_1], &[OP_IF, OP_ELSE, OP_ELSE, OP_ENDIF], 0)),
            InterpreterErrorCode::UnbalancedConditional
        );
        assert_eq!(
            code(run(&[OP_1], &[OP_WHILE, OP_0, OP_ENDIF], 2)),
            InterpreterErrorCode::UnbalancedConditional
        );
        // A branch opened in the witness cannot close in the program.
        assert_eq!(
            code(run(&[OP_1, OP_IF], &[OP_ENDIF, OP_1], 0)),
            InterpreterErrorCode::UnbalancedConditional
        );
    }

    #[test]
    fn test_while_counts_down() {
        let lock = [OP_DUP, OP_WHILE, OP_1SUB, OP_DUP, OP_ENDWHILE, OP_0, OP_EQUAL];
        assert!(run(&[OP_3], &lock, 2).is_ok());
        assert!(run(&[OP_0], &lock, 2).is_ok());
    }

    #[test]
    fn test_while_iteration_limit() {
        let lock = [OP_DUP, OP_WHILE, OP_1SUB, OP_DUP, OP_ENDWHILE, OP_0, OP_EQUAL];
        let engine = Engine::with_config(Config {
            max_loop_iterations: 2,
            ..Config::default()
        });
        let res = engine.execute(
            &Script::from_bytes(&[OP_3]),
            &Script::from_bytes(&lock),
            2,
            ScriptFlags::NONE,
            None,
        );
        assert_eq!(code(res), InterpreterErrorCode::TooManyIterations);

        // An unbounded loop stops at whichever limit it reaches first.
        let forever = Script::from_bytes(&[OP_1, OP_WHILE, OP_1, OP_ENDWHILE]);
        let run_forever = |cfg: Config| {
            Engine::with_config(cfg).execute(&Script::new(), &forever, 2, ScriptFlags::NONE, None)
        };
        let res = run_forever(Config {
            max_loop_iterations: 10,
            max_ops: 100_000,
            ..Config::default()
        });
        assert_eq!(code(res), InterpreterErrorCode::TooManyIterations);
        let res = run_forever(Config {
            max_loop_iterations: 100_000,
            max_ops: 10,
            ..Config::default()
        });
        assert_eq!(code(res), InterpreterErrorCode::TooManyOperations);
    }

    #[test]
    fn test_stack_size_limit() {
        let engine = Engine::with_config(Config {
            max_stack_size: 5,
            ..Config::default()
        });
        let exec = |unlock: &[u8], lock: &[u8]| {
            engine.execute(
                &Script::from_bytes(unlock),
                &Script::from_bytes(lock),
                2,
                ScriptFlags::NONE,
                None,
            )
        };

        // Every pass leaves one more item behind.
        let growing = [OP_1, OP_WHILE, OP_1, OP_1, OP_ENDWHILE];
        assert_eq!(code(exec(&[], &growing)), InterpreterErrorCode::StackOverflow);

        // The alt stack counts too.
        let split = [OP_TOALTSTACK, OP_TOALTSTACK, OP_TOALTSTACK, OP_1, OP_1, OP_1];
        assert_eq!(code(exec(&[OP_1, OP_1, OP_1], &split)), InterpreterErrorCode::StackOverflow);
        assert!(exec(&[OP_1, OP_1], &[OP_TOALTSTACK, OP_1, OP_1, OP_1]).is_ok());
    }

    #[test]
    fn test_while_skipped_in_false_branch() {
        let lock = [OP_0, OP_IF, OP_1, OP_WHILE, OP_1, OP_ENDWHILE, OP_ENDIF, OP_1];
        assert!(run(&[], &lock, 2).is_ok());
    }

    #[test]
    fn test_version_gating() {
        let lock = [OP_DUP, OP_WHILE, OP_1SUB, OP_DUP, OP_ENDWHILE, OP_0, OP_EQUAL];
        assert_eq!(code(run(&[OP_3], &lock, 1)), InterpreterErrorCode::DisabledOpcode);

        assert_eq!(code(run(&[OP_1, OP_2], &[OP_CAT], 0)), InterpreterErrorCode::DisabledOpcode);
        assert!(run(&[OP_1, OP_2], &[OP_CAT, OP_DATA_2, 1, 2, OP_EQUAL], 1).is_ok());

        assert_eq!(code(run(&[OP_1], &[], 3)), InterpreterErrorCode::UnsupportedVersion);
    }

    #[test]
    fn test_disabled_opcode_in_unexecuted_branch() {
        let lock = [OP_0, OP_IF, OP_CAT, OP_ENDIF, OP_1];
        assert_eq!(code(run(&[], &lock, 0)), InterpreterErrorCode::DisabledOpcode);
        assert!(run(&[], &lock, 1).is_ok());

        let always = [OP_0, OP_IF, OP_2MUL, OP_ENDIF, OP_1];
        assert_eq!(code(run(&[], &always, 2)), InterpreterErrorCode::DisabledOpcode);
    }

    #[test]
    fn test_fail_always_fails() {
        assert_eq!(code(run(&[OP_1], &[OP_FAIL], 0)), InterpreterErrorCode::EarlyReturn);
        assert!(run(&[OP_1], &[OP_0, OP_IF, OP_FAIL, OP_ENDIF], 0).is_ok());
    }

    #[test]
    fn test_splice() {
        // "abcd" 1 2 SUBSTR -> "bc"
        let unlock = [OP_DATA_4, b'a', b'b', b'c', b'd', OP_1, OP_2];
        assert!(run(&unlock, &[OP_SUBSTR, OP_DATA_2, b'b', b'c', OP_EQUAL], 1).is_ok());
        let unlock = [OP_DATA_4, b'a', b'b', b'c', b'd', OP_3];
        assert!(run(&unlock, &[OP_LEFT, OP_DATA_3, b'a', b'b', b'c', OP_EQUAL], 1).is_ok());
        assert!(run(&unlock, &[OP_RIGHT, OP_DATA_3, b'b', b'c', b'd', OP_EQUAL], 1).is_ok());
        let unlock = [OP_DATA_2, b'a', b'b', OP_3];
        assert_eq!(code(run(&unlock, &[OP_LEFT], 1)), InterpreterErrorCode::InvalidRange);
    }

    #[test]
    fn test_stack_modes() {
        let unlock = Script::from_bytes(&[OP_1, OP_1]);
        let lock = Script::from_bytes(&[OP_1]);
        let engine = Engine::new();
        assert!(engine.execute(&unlock, &lock, 0, ScriptFlags::NONE, None).is_ok());
        let err = engine
            .execute(&unlock, &lock, 0, ScriptFlags::VERIFY_CLEAN_STACK, None)
            .unwrap_err();
        assert_eq!(err.code, InterpreterErrorCode::CleanStack);

        let empty = Script::from_bytes(&[OP_1, OP_DROP]);
        let err = engine.execute(&Script::new(), &empty, 0, ScriptFlags::NONE, None).unwrap_err();
        assert_eq!(err.code, InterpreterErrorCode::EmptyStack);
        assert!(engine
            .execute(&Script::new(), &empty, 0, ScriptFlags::ALLOW_EMPTY_STACK, None)
            .is_ok());
    }

    #[test]
    fn test_sig_push_only_and_minimal_data() {
        let engine = Engine::new();
        let lock = Script::from_bytes(&[OP_1]);
        let err = engine
            .execute(&Script::from_bytes(&[OP_1, OP_DUP]), &lock, 0, ScriptFlags::STANDARD, None)
            .unwrap_err();
        assert_eq!(err.code, InterpreterErrorCode::NotPushOnly);

        // OP_DATA_1 0x05 should have been OP_5.
        let err = engine
            .execute(
                &Script::from_bytes(&[OP_DATA_1, 5]),
                &Script::from_bytes(&[OP_5, OP_EQUAL]),
                0,
                ScriptFlags::STANDARD,
                None,
            )
            .unwrap_err();
        assert_eq!(err.code, InterpreterErrorCode::MinimalData);
    }

    #[test]
    fn test_introspection_opcodes() {
        let ctx = MockContext::new();
        let mut lock = Script::new();
        lock.append_opcodes(&[OP_ASSET])
            .unwrap()
            .append_push_data(ctx.asset_id.as_bytes())
            .unwrap()
            .append_opcodes(&[OP_EQUALVERIFY, OP_AMOUNT])
            .unwrap()
            .append_int(500)
            .append_opcodes(&[OP_NUMEQUALVERIFY, OP_OUTPUTSCRIPT])
            .unwrap()
            .append_push_data(&[OP_1])
            .unwrap()
            .append_opcodes(&[OP_EQUALVERIFY, OP_TIME])
            .unwrap()
            .append_int(2_000)
            .append_opcodes(&[OP_NUMEQUALVERIFY])
            .unwrap()
            .append_int(1_000)
            .append_opcodes(&[OP_NUMEQUAL])
            .unwrap();
        assert!(run_ctx(&Script::new(), &lock, &ctx).is_ok());
    }

    #[test]
    fn test_introspection_requires_context() {
        assert_eq!(code(run(&[], &[OP_ASSET], 1)), InterpreterErrorCode::MissingContext);
    }

    #[test]
    fn test_circulation() {
        let ctx = MockContext::new();
        let mut lock = Script::new();
        lock.append_push_data(ctx.asset_id.as_bytes())
            .unwrap()
            .append_opcodes(&[OP_CIRCULATION])
            .unwrap()
            .append_int(10_000)
            .append_opcodes(&[OP_NUMEQUAL])
            .unwrap();
        assert!(run_ctx(&Script::new(), &lock, &ctx).is_ok());

        let mut unknown = Script::new();
        unknown
            .append_push_data(hash_h(b"other").as_bytes())
            .unwrap()
            .append_opcodes(&[OP_CIRCULATION])
            .unwrap();
        let err = run_ctx(&Script::new(), &unknown, &ctx).unwrap_err();
        assert_eq!(err.code, InterpreterErrorCode::UnknownAsset);
    }

    #[test]
    fn test_requireoutput() {
        let ctx = MockContext::new();
        let build = |amount: i64, ref_data: &[u8]| {
            let mut s = Script::new();
            s.append_int(amount)
                .append_push_data(ctx.asset_id.as_bytes())
                .unwrap()
                .append_push_data(&[OP_2])
                .unwrap()
                .append_push_data(ref_data)
                .unwrap()
                .append_opcodes(&[OP_REQUIREOUTPUT])
                .unwrap();
            s
        };
        let ref_hash = hash_h(b"ref");
        assert!(run_ctx(&Script::new(), &build(300, &[]), &ctx).is_ok());
        assert!(run_ctx(&Script::new(), &build(300, ref_hash.as_bytes()), &ctx).is_ok());
        let err = run_ctx(&Script::new(), &build(301, &[]), &ctx).unwrap_err();
        assert_eq!(err.code, InterpreterErrorCode::EvalFalse);
        let err = run_ctx(&Script::new(), &build(300, hash_h(b"x").as_bytes()), &ctx).unwrap_err();
        assert_eq!(err.code, InterpreterErrorCode::EvalFalse);
    }

    #[test]
    fn test_check_locktime_verify() {
        let ctx = MockContext::new();
        let mut ok = Script::new();
        ok.append_int(1_000).append_opcodes(&[OP_CHECKLOCKTIMEVERIFY]).unwrap();
        assert!(run_ctx(&Script::new(), &ok, &ctx).is_ok());

        let mut late = Script::new();
        late.append_int(1_001).append_opcodes(&[OP_CHECKLOCKTIMEVERIFY]).unwrap();
        let err = run_ctx(&Script::new(), &late, &ctx).unwrap_err();
        assert_eq!(err.code, InterpreterErrorCode::UnsatisfiedLockTime);
    }

    #[test]
    fn test_catpushdata_and_eval() {
        let mut cat = Script::new();
        cat.append_push_data(&[OP_DROP])
            .unwrap()
            .append_push_data(&[0xaa, 0xbb])
            .unwrap()
            .append_opcodes(&[OP_CATPUSHDATA])
            .unwrap()
            .append_push_data(&[OP_DROP, OP_DATA_2, 0xaa, 0xbb])
            .unwrap()
            .append_opcodes(&[OP_EQUAL])
            .unwrap();
        assert!(run_ctx(&Script::new(), &cat, &MockContext::new()).is_ok());

        let mut unlock = Script::new();
        unlock.append_push_data(&[OP_2, OP_3, OP_ADD]).unwrap();
        let eval = Script::from_bytes(&[OP_EVAL, OP_5, OP_EQUAL]);
        assert!(run_ctx(&unlock, &eval, &MockContext::new()).is_ok());
    }

    #[test]
    fn test_eval_depth() {
        let mut inner = Script::new();
        inner
            .append_push_data(&[OP_1])
            .unwrap()
            .append_opcodes(&[OP_EVAL])
            .unwrap();
        let mut unlock = Script::new();
        unlock.append_push_data(inner.to_bytes()).unwrap();
        let lock = Script::from_bytes(&[OP_EVAL]);

        assert!(Engine::new().execute(&unlock, &lock, 1, ScriptFlags::NONE, None).is_ok());

        let shallow = Engine::with_config(Config {
            max_eval_depth: 1,
            ..Config::default()
        });
        let err = shallow.execute(&unlock, &lock, 1, ScriptFlags::NONE, None).unwrap_err();
        assert_eq!(err.code, InterpreterErrorCode::EvalDepth);
    }

    #[test]
    fn test_checksig() {
        let ctx = MockContext::new();
        let key = PrivateKey::random();
        let sig = key.sign(ctx.sig_hash.as_bytes()).unwrap().to_der();

        let mut lock = Script::new();
        lock.append_push_data(&key.pub_key().to_compressed())
            .unwrap()
            .append_opcodes(&[OP_CHECKSIG])
            .unwrap();
        let mut unlock = Script::new();
        unlock.append_push_data(&sig).unwrap();
        assert!(run_ctx(&unlock, &lock, &ctx).is_ok());

        let other = MockContext {
            sig_hash: hash_h(b"different"),
            ..MockContext::new()
        };
        assert_eq!(code(run_ctx(&unlock, &lock, &other)), InterpreterErrorCode::EvalFalse);

        let mut garbage = Script::new();
        garbage.append_push_data(&[0x30, 0x01]).unwrap();
        assert_eq!(code(run_ctx(&garbage, &lock, &ctx)), InterpreterErrorCode::EvalFalse);
    }

    #[test]
    fn test_checkmultisig_ordered() {
        let ctx = MockContext::new();
        let keys: Vec<PrivateKey> = (0..3).map(|_| PrivateKey::random()).collect();
        let sigs: Vec<Vec<u8>> = keys
            .iter()
            .map(|k| k.sign(ctx.sig_hash.as_bytes()).unwrap().to_der())
            .collect();

        let mut lock = Script::new();
        lock.append_int(2);
        for k in &keys {
            lock.append_push_data(&k.pub_key().to_compressed()).unwrap();
        }
        lock.append_int(3).append_opcodes(&[OP_CHECKMULTISIG]).unwrap();

        let mut unlock = Script::new();
        unlock
            .append_push_data(&sigs[0])
            .unwrap()
            .append_push_data(&sigs[2])
            .unwrap();
        assert!(run_ctx(&unlock, &lock, &ctx).is_ok());

        let mut swapped = Script::new();
        swapped
            .append_push_data(&sigs[2])
            .unwrap()
            .append_push_data(&sigs[0])
            .unwrap();
        assert_eq!(code(run_ctx(&swapped, &lock, &ctx)), InterpreterErrorCode::EvalFalse);
    }

    #[test]
    fn test_hash_ops() {
        let mut lock = Script::new();
        lock.append_opcodes(&[OP_SHA256])
            .unwrap()
            .append_push_data(&sha256(b"abc"))
            .unwrap()
            .append_opcodes(&[OP_EQUAL])
            .unwrap();
        let mut unlock = Script::new();
        unlock.append_push_data(b"abc").unwrap();
        assert!(Engine::new().execute(&unlock, &lock, 0, ScriptFlags::NONE, None).is_ok());
    }

    #[test]
    fn test_script_too_big() {
        let big = vec![OP_NOP; config::DEFAULT_MAX_SCRIPT_SIZE + 1];
        assert_eq!(code(run(&[], &big, 0)), InterpreterErrorCode::ScriptTooBig);
    }
}
