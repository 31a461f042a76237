//! Murmur Eval - the chain evaluator and minimal runtime.
//!
//! # Architecture
//!
//! - `interpreter`: the evaluation loop over message chains, plus the
//!   send entry points (`send`, `send_with_args`, `evaluate_on`,
//!   `evaluate_with_args`, `eval_arg_at`)
//! - `Dispatch`: the seam between the loop and a runtime; the loop owns
//!   terminator, symbol and cache handling, the runtime owns everything
//!   with actual semantics
//! - `Scopes`: cell scoping with parent links, rooted at ground
//! - `Runtime`: the built-in dispatch table (literal constructors,
//!   assignment, arithmetic, control flow) and the code-driven
//!   traversals `each_code` and `walk_code`
//! - `Escape`: the error channel carrying both raised conditions and
//!   `break`/`continue`/`return`

mod dispatch;
mod environment;
mod errors;
mod interpreter;
mod runtime;

pub use dispatch::{Dispatch, Receiver};
pub use environment::{ScopeId, Scopes};
pub use errors::{Condition, ConditionKind, ControlFlow, Escape, EvalResult};
pub use interpreter::{
    eval_arg_at, evaluate_chain, evaluate_on, evaluate_with_args, send, send_with_args,
};
pub use runtime::{EachBinding, IndexRestart, RunError, Runtime};
