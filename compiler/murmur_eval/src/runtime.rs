//! The minimal prototype runtime.
//!
//! Enough of a language to exercise the chain machinery end to end:
//! literal constructors, assignment, cell lookup, arithmetic and
//! comparison on numbers, text concatenation, and `break`/`continue`/
//! `return` as control-flow escapes. Everything else raises a condition.

use murmur_ir::{Arg, MsgArena, MsgId, Name, SourceLoc, Value};
use std::sync::Arc;
use thiserror::Error;
use tracing::debug;

use crate::{
    eval_arg_at, evaluate_chain, evaluate_on, Condition, ConditionKind, ControlFlow, Dispatch,
    Escape, EvalResult, Receiver, ScopeId, Scopes,
};

/// Handler consulted when an argument index is out of range.
pub type IndexRestart = Box<dyn FnMut(&Condition) -> Option<i64>>;

/// Everything `do_text` can fail with.
#[derive(Debug, Error)]
pub enum RunError {
    #[error(transparent)]
    Parse(#[from] murmur_parse::ParseError),
    #[error(transparent)]
    Escape(#[from] Escape),
}

/// How `each_code` and `walk_code` expose the visited node to the body.
#[derive(Copy, Clone, Debug)]
pub enum EachBinding {
    /// The node becomes the body's starting receiver.
    Receiver,
    /// The node is bound to this cell as quoted code.
    Value(Name),
    /// The running index and the node are bound to these cells.
    IndexValue(Name, Name),
}

pub struct Runtime {
    scopes: Scopes,
    index_restart: Option<IndexRestart>,
}

impl Runtime {
    /// A runtime with `nil`, `true` and `false` bound in the ground
    /// scope.
    pub fn new(arena: &MsgArena) -> Self {
        let mut scopes = Scopes::new();
        scopes.set_cell(ScopeId::GROUND, arena.intern("nil"), Value::Nil);
        scopes.set_cell(ScopeId::GROUND, arena.intern("true"), Value::Bool(true));
        scopes.set_cell(ScopeId::GROUND, arena.intern("false"), Value::Bool(false));
        Runtime {
            scopes,
            index_restart: None,
        }
    }

    /// Install the index restart handler.
    pub fn on_index_restart(&mut self, f: impl FnMut(&Condition) -> Option<i64> + 'static) {
        self.index_restart = Some(Box::new(f));
    }

    /// Bind a cell in the ground scope.
    pub fn set_global(&mut self, name: Name, value: Value) {
        self.scopes.set_cell(ScopeId::GROUND, name, value);
    }

    /// Read a cell visible from the ground scope.
    pub fn global(&self, name: Name) -> Option<Value> {
        self.scopes.lookup(ScopeId::GROUND, name).cloned()
    }

    /// Parse, shuffle and evaluate a whole source text in the ground
    /// scope.
    pub fn do_text(
        &mut self,
        arena: &mut MsgArena,
        source: &str,
        file: &str,
    ) -> Result<Value, RunError> {
        let head = murmur_parse::from_text(arena, source, file)?;
        debug!(file, "evaluating");
        Ok(evaluate_chain(self, arena, head, ScopeId::GROUND)?)
    }

    /// Evaluate `body` once per top-level node of the chain at `head`.
    ///
    /// All iterations share one child scope, so the binding cells rebind
    /// in place. Does not descend into arguments. `next` is re-read
    /// after each iteration, so a body that rewrites the chain steers
    /// the iteration. Body values are discarded; the result is the
    /// original chain as quoted code.
    pub fn each_code(
        &mut self,
        arena: &mut MsgArena,
        head: MsgId,
        context: ScopeId,
        binding: EachBinding,
        body: MsgId,
    ) -> EvalResult {
        let scope = self.scopes.push_child(context);
        let mut cursor = Some(head);
        let mut index: i64 = 0;
        while let Some(id) = cursor {
            self.run_body(arena, id, scope, binding, body, index)?;
            cursor = arena.next(id);
            index += 1;
        }
        Ok(Value::Message(head))
    }

    /// Like [`each_code`](Self::each_code) but visits every reachable
    /// node: arguments first, then the successor.
    pub fn walk_code(
        &mut self,
        arena: &mut MsgArena,
        head: MsgId,
        context: ScopeId,
        binding: EachBinding,
        body: MsgId,
    ) -> EvalResult {
        let scope = self.scopes.push_child(context);
        let mut stack = vec![head];
        let mut index: i64 = 0;
        while let Some(id) = stack.pop() {
            self.run_body(arena, id, scope, binding, body, index)?;
            index += 1;
            if let Some(next) = arena.node(id).next {
                stack.push(next);
            }
            let count = arena.node(id).arguments.len();
            for slot in (0..count).rev() {
                if let Arg::Message(arg_head) = arena.node(id).arguments[slot] {
                    stack.push(arg_head);
                }
            }
        }
        Ok(Value::Message(head))
    }

    fn run_body(
        &mut self,
        arena: &mut MsgArena,
        node: MsgId,
        scope: ScopeId,
        binding: EachBinding,
        body: MsgId,
        index: i64,
    ) -> EvalResult {
        match binding {
            EachBinding::Receiver => {
                evaluate_on(self, arena, body, scope, Some(Value::Message(node)))
            }
            EachBinding::Value(name) => {
                self.scopes.set_cell(scope, name, Value::Message(node));
                evaluate_chain(self, arena, body, scope)
            }
            EachBinding::IndexValue(index_name, value_name) => {
                self.scopes.set_cell(scope, index_name, Value::Int(index));
                self.scopes.set_cell(scope, value_name, Value::Message(node));
                evaluate_chain(self, arena, body, scope)
            }
        }
    }

    fn assign(
        &mut self,
        arena: &mut MsgArena,
        msg: MsgId,
        context: ScopeId,
        loc: SourceLoc,
    ) -> Result<Option<Value>, Escape> {
        let Some(Arg::Message(target)) = arena.node(msg).arguments.first().cloned() else {
            return Err(condition(
                ConditionKind::NotUnderstood {
                    receiver: "assignment".to_owned(),
                    message: "non-message target".to_owned(),
                },
                loc,
            ));
        };
        let name = arena.node(target).name;
        let value = eval_arg_at(self, arena, msg, context, 1)?;
        self.scopes.set_cell(context, name, value.clone());
        Ok(Some(value))
    }

    fn control_flow(
        &mut self,
        arena: &mut MsgArena,
        msg: MsgId,
        context: ScopeId,
        text: &str,
    ) -> Result<Option<Value>, Escape> {
        let value = if arena.node(msg).arguments.is_empty() {
            Value::Nil
        } else {
            eval_arg_at(self, arena, msg, context, 0)?
        };
        let flow = match text {
            "break" => ControlFlow::Break(value),
            "continue" => ControlFlow::Continue,
            _ => ControlFlow::Return(value),
        };
        Err(Escape::ControlFlow(flow))
    }

    fn dispatch_value(
        &mut self,
        arena: &mut MsgArena,
        msg: MsgId,
        context: ScopeId,
        value: Value,
        text: &'static str,
        loc: SourceLoc,
    ) -> Result<Option<Value>, Escape> {
        let argc = arena.node(msg).arguments.len();
        match text {
            "println" => {
                println!("{}", value.render(arena.interner()));
                Ok(Some(value))
            }
            "asText" => Ok(Some(Value::text(&value.render(arena.interner())))),
            "==" | "!=" if argc == 1 => {
                let rhs = eval_arg_at(self, arena, msg, context, 0)?;
                let equal = value == rhs;
                Ok(Some(Value::Bool(if text == "==" { equal } else { !equal })))
            }
            "&&" | "||" if argc == 1 => {
                let Value::Bool(a) = value else {
                    return Err(not_understood(arena, &value, text, loc));
                };
                // Short-circuit: the right side only evaluates when the
                // left side has not already decided.
                if a == (text == "||") {
                    return Ok(Some(Value::Bool(a)));
                }
                let rhs = eval_arg_at(self, arena, msg, context, 0)?;
                let Value::Bool(b) = rhs else {
                    return Err(not_understood(arena, &rhs, text, loc));
                };
                Ok(Some(Value::Bool(b)))
            }
            "+" | "-" | "*" | "/" | "%" | "**" | "<" | ">" | "<=" | ">=" if argc == 1 => {
                self.numeric_op(arena, msg, context, value, text, loc)
            }
            _ => Err(not_understood(arena, &value, text, loc)),
        }
    }

    #[expect(
        clippy::cast_precision_loss,
        reason = "mixed int/decimal arithmetic promotes through f64"
    )]
    fn numeric_op(
        &mut self,
        arena: &mut MsgArena,
        msg: MsgId,
        context: ScopeId,
        lhs: Value,
        op: &'static str,
        loc: SourceLoc,
    ) -> Result<Option<Value>, Escape> {
        let rhs = eval_arg_at(self, arena, msg, context, 0)?;
        if let (Value::Text(a), "+") = (&lhs, op) {
            let mut out = a.to_string();
            push_piece(&mut out, &rhs, arena);
            return Ok(Some(Value::text(&out)));
        }
        let result = match (&lhs, &rhs) {
            (Value::Int(a), Value::Int(b)) => int_op(op, *a, *b, loc)?,
            (Value::Int(a), Value::Decimal(b)) => float_op(op, *a as f64, *b, loc)?,
            (Value::Decimal(a), Value::Int(b)) => float_op(op, *a, *b as f64, loc)?,
            (Value::Decimal(a), Value::Decimal(b)) => float_op(op, *a, *b, loc)?,
            _ => return Err(not_understood(arena, &lhs, op, loc)),
        };
        Ok(Some(result))
    }
}

impl Dispatch for Runtime {
    fn dispatch(
        &mut self,
        arena: &mut MsgArena,
        msg: MsgId,
        context: ScopeId,
        receiver: Receiver,
    ) -> Result<Option<Value>, Escape> {
        let name = arena.node(msg).name;
        let loc = arena.node(msg).loc;
        let text = arena.interner().lookup(name);
        match text {
            "internal:createText" => {
                let raw = raw_text_argument(arena, msg, 0, loc)?;
                Ok(Some(Value::text(&unescape(&raw))))
            }
            "internal:createNumber" => {
                let raw = raw_text_argument(arena, msg, 0, loc)?;
                match raw.parse::<i64>() {
                    Ok(n) => Ok(Some(Value::Int(n))),
                    Err(_) => Err(condition(
                        ConditionKind::InvalidLiteral {
                            what: "number",
                            text: raw.to_string(),
                        },
                        loc,
                    )),
                }
            }
            "internal:createDecimal" => {
                let raw = raw_text_argument(arena, msg, 0, loc)?;
                match raw.parse::<f64>() {
                    Ok(d) => Ok(Some(Value::Decimal(d))),
                    Err(_) => Err(condition(
                        ConditionKind::InvalidLiteral {
                            what: "decimal",
                            text: raw.to_string(),
                        },
                        loc,
                    )),
                }
            }
            "internal:createRegexp" => {
                let pattern = raw_text_argument(arena, msg, 0, loc)?;
                let flags = raw_text_argument(arena, msg, 1, loc)?;
                Ok(Some(Value::Regex { pattern, flags }))
            }
            "internal:concatenateText" => {
                let count = arena.node(msg).arguments.len();
                let mut out = String::new();
                for i in 0..count {
                    #[expect(
                        clippy::cast_possible_wrap,
                        reason = "argument counts are tiny"
                    )]
                    let piece = eval_arg_at(self, arena, msg, context, i as i64)?;
                    push_piece(&mut out, &piece, arena);
                }
                Ok(Some(Value::text(&out)))
            }
            "=" => self.assign(arena, msg, context, loc),
            "break" | "continue" | "return" => self.control_flow(arena, msg, context, text),
            _ => match receiver {
                Receiver::Value(value) => {
                    self.dispatch_value(arena, msg, context, value, text, loc)
                }
                Receiver::Context => match self.scopes.lookup(context, name) {
                    Some(value) => Ok(Some(value.clone())),
                    None => Err(condition(ConditionKind::NoSuchCell(text.to_owned()), loc)),
                },
            },
        }
    }

    fn restart_index(&mut self, condition: &Condition) -> Option<i64> {
        match &mut self.index_restart {
            Some(handler) => handler(condition),
            None => None,
        }
    }
}

fn condition(kind: ConditionKind, loc: SourceLoc) -> Escape {
    Escape::Condition(Condition::new(kind, loc))
}

fn not_understood(arena: &MsgArena, receiver: &Value, message: &str, loc: SourceLoc) -> Escape {
    condition(
        ConditionKind::NotUnderstood {
            receiver: receiver.render(arena.interner()),
            message: message.to_owned(),
        },
        loc,
    )
}

/// Literal constructors carry their raw source text as a pre-evaluated
/// text argument; anything else in that slot is a malformed node.
fn raw_text_argument(
    arena: &MsgArena,
    msg: MsgId,
    index: usize,
    loc: SourceLoc,
) -> Result<Arc<str>, Escape> {
    match arena.node(msg).arguments.get(index) {
        Some(Arg::Value(Value::Text(raw))) => Ok(Arc::clone(raw)),
        _ => Err(condition(
            ConditionKind::InvalidLiteral {
                what: "constructor",
                text: arena.name_text(msg).to_owned(),
            },
            loc,
        )),
    }
}

fn push_piece(out: &mut String, piece: &Value, arena: &MsgArena) {
    match piece {
        Value::Text(t) => out.push_str(t),
        other => out.push_str(&other.render(arena.interner())),
    }
}

fn unescape(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut chars = raw.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('n') => out.push('\n'),
            Some('t') => out.push('\t'),
            Some('r') => out.push('\r'),
            Some('"') => out.push('"'),
            Some('\\') => out.push('\\'),
            Some('e') => out.push('\u{1b}'),
            // Unknown escapes stay as written.
            Some(other) => {
                out.push('\\');
                out.push(other);
            }
            None => out.push('\\'),
        }
    }
    out
}

#[expect(
    clippy::cast_precision_loss,
    reason = "negative exponents fall back to f64"
)]
fn int_op(op: &str, a: i64, b: i64, loc: SourceLoc) -> Result<Value, Escape> {
    let value = match op {
        "+" => Value::Int(a.wrapping_add(b)),
        "-" => Value::Int(a.wrapping_sub(b)),
        "*" => Value::Int(a.wrapping_mul(b)),
        "/" => {
            if b == 0 {
                return Err(condition(ConditionKind::DivisionByZero, loc));
            }
            Value::Int(a.wrapping_div(b))
        }
        "%" => {
            if b == 0 {
                return Err(condition(ConditionKind::DivisionByZero, loc));
            }
            Value::Int(a.wrapping_rem(b))
        }
        "**" => match u32::try_from(b) {
            Ok(exp) => Value::Int(a.wrapping_pow(exp)),
            Err(_) => Value::Decimal((a as f64).powf(b as f64)),
        },
        "<" => Value::Bool(a < b),
        ">" => Value::Bool(a > b),
        "<=" => Value::Bool(a <= b),
        ">=" => Value::Bool(a >= b),
        _ => unreachable!("unknown integer operator {op}"),
    };
    Ok(value)
}

fn float_op(op: &str, a: f64, b: f64, loc: SourceLoc) -> Result<Value, Escape> {
    let value = match op {
        "+" => Value::Decimal(a + b),
        "-" => Value::Decimal(a - b),
        "*" => Value::Decimal(a * b),
        "/" => {
            if b == 0.0 {
                return Err(condition(ConditionKind::DivisionByZero, loc));
            }
            Value::Decimal(a / b)
        }
        "%" => {
            if b == 0.0 {
                return Err(condition(ConditionKind::DivisionByZero, loc));
            }
            Value::Decimal(a % b)
        }
        "**" => Value::Decimal(a.powf(b)),
        "<" => Value::Bool(a < b),
        ">" => Value::Bool(a > b),
        "<=" => Value::Bool(a <= b),
        ">=" => Value::Bool(a >= b),
        _ => unreachable!("unknown decimal operator {op}"),
    };
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn unescape_handles_common_escapes() {
        assert_eq!(unescape(r"a\nb\t\\ \q"), "a\nb\t\\ \\q");
        assert_eq!(unescape(r#"say \"hi\""#), "say \"hi\"");
    }

    #[test]
    fn integer_division_by_zero_raises() {
        let err = int_op("/", 1, 0, SourceLoc::default());
        match err {
            Err(Escape::Condition(c)) => assert_eq!(c.kind, ConditionKind::DivisionByZero),
            other => panic!("expected division condition, got {other:?}"),
        }
    }

    #[test]
    fn negative_exponent_promotes_to_decimal() {
        match int_op("**", 2, -1, SourceLoc::default()) {
            Ok(Value::Decimal(d)) => assert!((d - 0.5).abs() < f64::EPSILON),
            other => panic!("expected decimal, got {other:?}"),
        }
    }
}
