//! Interpreter execution limits.

use serde::Deserialize;

pub const DEFAULT_MAX_SCRIPT_SIZE: usize = 10_000;
pub const DEFAULT_MAX_SCRIPT_ELEMENT_SIZE: usize = 520;
pub const DEFAULT_MAX_STACK_SIZE: usize = 1000;
pub const DEFAULT_MAX_OPS: usize = 2000;
/// Nine bytes holds any u64 amount with its sign byte.
pub const DEFAULT_MAX_SCRIPT_NUMBER_LENGTH: usize = 9;
pub const DEFAULT_MAX_PUB_KEYS_PER_MULTISIG: usize = 20;
pub const DEFAULT_MAX_LOOP_ITERATIONS: usize = 1000;
pub const DEFAULT_MAX_EVAL_DEPTH: usize = 4;

/// Script configuration limits.
///
/// Every field has a default, so a node can deserialize a partial table and
/// only override the limits it cares about.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Config {
    pub max_script_size: usize,
    pub max_script_element_size: usize,
    /// Combined depth of the main and alt stacks.
    pub max_stack_size: usize,
    /// Non-push opcodes executed per script, loop bodies included.
    pub max_ops: usize,
    pub max_script_number_length: usize,
    pub max_pub_keys_per_multisig: usize,
    /// Backward jumps taken by ENDWHILE over one whole execution.
    pub max_loop_iterations: usize,
    /// Nesting depth of OP_EVAL.
    pub max_eval_depth: usize,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            max_script_size: DEFAULT_MAX_SCRIPT_SIZE,
            max_script_element_size: DEFAULT_MAX_SCRIPT_ELEMENT_SIZE,
            max_stack_size: DEFAULT_MAX_STACK_SIZE,
            max_ops: DEFAULT_MAX_OPS,
            max_script_number_length: DEFAULT_MAX_SCRIPT_NUMBER_LENGTH,
            max_pub_keys_per_multisig: DEFAULT_MAX_PUB_KEYS_PER_MULTISIG,
            max_loop_iterations: DEFAULT_MAX_LOOP_ITERATIONS,
            max_eval_depth: DEFAULT_MAX_EVAL_DEPTH,
        }
    }
}
