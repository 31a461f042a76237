//! The dispatch seam between the chain evaluator and a runtime.

use murmur_ir::{MsgArena, MsgId, Value};

use crate::{Condition, Escape, ScopeId};

/// What a message is sent to.
#[derive(Clone, Debug, PartialEq)]
pub enum Receiver {
    /// No value has been produced yet in this statement; the message
    /// goes to the evaluation context.
    Context,
    /// The value produced by the previous node in the chain.
    Value(Value),
}

/// A runtime the evaluator can send messages through.
///
/// `dispatch` returns `Ok(None)` when the message produced no value at
/// all, which leaves the chain's current value untouched. That is
/// distinct from producing `Value::Nil`, which replaces it.
pub trait Dispatch {
    fn dispatch(
        &mut self,
        arena: &mut MsgArena,
        msg: MsgId,
        context: ScopeId,
        receiver: Receiver,
    ) -> Result<Option<Value>, Escape>;

    /// Offered a raised condition before it escapes `eval_arg_at`; a
    /// `Some` index retries the access there.
    fn restart_index(&mut self, _condition: &Condition) -> Option<i64> {
        None
    }
}
