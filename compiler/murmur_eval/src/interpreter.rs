//! The chain evaluation loop.
//!
//! Evaluation walks a chain node by node, threading the last produced
//! value as the receiver of the next node. Terminators reset the
//! receiver to the context, symbol literals intern-and-cache, and
//! everything else dispatches through the runtime. The walk re-reads
//! `next` from the arena after every node, so code that rewrites the
//! chain it is running on behaves predictably.

use murmur_ir::{Arg, MsgArena, MsgId, Value};
use tracing::trace;

use crate::{Condition, ConditionKind, Dispatch, Escape, EvalResult, Receiver, ScopeId};

/// Evaluate a chain against the context.
pub fn evaluate_chain<D: Dispatch>(
    d: &mut D,
    arena: &mut MsgArena,
    head: MsgId,
    context: ScopeId,
) -> EvalResult {
    evaluate_on(d, arena, head, context, None)
}

/// Evaluate a chain with an explicit starting receiver.
///
/// Returns the last value any node produced, or `Value::Nil` when the
/// chain produced nothing (empty statements, terminators only).
pub fn evaluate_on<D: Dispatch>(
    d: &mut D,
    arena: &mut MsgArena,
    head: MsgId,
    context: ScopeId,
    receiver: Option<Value>,
) -> EvalResult {
    let mut current = receiver;
    let mut last_real: Option<Value> = None;
    let mut cursor = Some(head);

    while let Some(id) = cursor {
        if arena.node(id).is_terminator {
            // Statement boundary: the next node sees the context again.
            current = None;
        } else if arena.is_symbol(id) {
            let value = match arena.node(id).cached.clone() {
                Some(cached) => cached,
                None => {
                    let text = arena.name_text(id);
                    let symbol = Value::Symbol(arena.intern(&text[1..]));
                    arena.cache_value(id, symbol.clone());
                    symbol
                }
            };
            current = Some(value.clone());
            last_real = Some(value);
        } else {
            let receiver = match current.clone() {
                Some(value) => Receiver::Value(value),
                None => Receiver::Context,
            };
            trace!(name = arena.name_text(id), "sending");
            if let Some(value) = send(d, arena, id, context, receiver)? {
                current = Some(value.clone());
                last_real = Some(value);
            }
        }
        cursor = arena.next(id);
    }
    Ok(last_real.unwrap_or(Value::Nil))
}

/// Evaluate a chain with an explicit receiver and explicit arguments
/// for the head node.
///
/// The head acts as a template: a shallow copy takes the given
/// arguments while keeping the original's links, so the rest of the
/// chain runs as written and the original stays reusable.
pub fn evaluate_with_args<D: Dispatch>(
    d: &mut D,
    arena: &mut MsgArena,
    head: MsgId,
    context: ScopeId,
    receiver: Value,
    args: &[Arg],
) -> EvalResult {
    let copy = arena.copy_shallow(head);
    arena.node_mut(copy).arguments.clear();
    arena.node_mut(copy).arguments.extend(args.iter().cloned());
    evaluate_on(d, arena, copy, context, Some(receiver))
}

/// Send one message. A cached node answers its memoized value without
/// dispatching, whatever the receiver.
pub fn send<D: Dispatch>(
    d: &mut D,
    arena: &mut MsgArena,
    msg: MsgId,
    context: ScopeId,
    receiver: Receiver,
) -> Result<Option<Value>, Escape> {
    if let Some(cached) = arena.node(msg).cached.clone() {
        return Ok(Some(cached));
    }
    d.dispatch(arena, msg, context, receiver)
}

/// Templated send: dispatch a copy of the node carrying the given
/// explicit arguments instead of its own. The original node is never
/// touched, so it stays reusable as a template. The cache still
/// short-circuits first.
pub fn send_with_args<D: Dispatch>(
    d: &mut D,
    arena: &mut MsgArena,
    msg: MsgId,
    context: ScopeId,
    receiver: Receiver,
    args: &[Arg],
) -> Result<Option<Value>, Escape> {
    if let Some(cached) = arena.node(msg).cached.clone() {
        return Ok(Some(cached));
    }
    let copy = arena.copy_shallow(msg);
    arena.node_mut(copy).arguments.clear();
    arena.node_mut(copy).arguments.extend(args.iter().cloned());
    d.dispatch(arena, copy, context, receiver)
}

/// Evaluate the argument at `index` of a message.
///
/// Pre-evaluated argument slots come back as-is; message slots evaluate
/// as a chain against the context. An out-of-range index raises a
/// condition, but the runtime's index restart may answer with a
/// replacement index, in which case the access retries from scratch.
pub fn eval_arg_at<D: Dispatch>(
    d: &mut D,
    arena: &mut MsgArena,
    msg: MsgId,
    context: ScopeId,
    index: i64,
) -> EvalResult {
    let mut index = index;
    loop {
        let count = arena.node(msg).arguments.len();
        if let Ok(i) = usize::try_from(index) {
            if i < count {
                return match arena.node(msg).arguments[i].clone() {
                    Arg::Value(value) => Ok(value),
                    Arg::Message(head) => evaluate_chain(d, arena, head, context),
                };
            }
        }
        let condition = Condition::new(
            ConditionKind::IndexOutOfRange { index, count },
            arena.node(msg).loc,
        );
        match d.restart_index(&condition) {
            Some(replacement) => index = replacement,
            None => return Err(Escape::Condition(condition)),
        }
    }
}
