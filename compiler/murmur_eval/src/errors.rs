//! Evaluation escapes: conditions and control flow.
//!
//! Both travel the same `Err` channel but mean different things. A
//! [`Condition`] is a raised error that handlers may resolve through a
//! restart; [`ControlFlow`] is `break`/`continue`/`return` unwinding
//! toward the construct that consumes it. `?` propagates both without
//! the evaluator caring which is which.

use murmur_ir::{SourceLoc, Value};
use thiserror::Error;

/// What went wrong.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConditionKind {
    #[error("argument index {index} out of range for {count} arguments")]
    IndexOutOfRange { index: i64, count: usize },
    #[error("no cell named {0}")]
    NoSuchCell(String),
    #[error("{receiver} does not understand {message}")]
    NotUnderstood { receiver: String, message: String },
    #[error("invalid {what} literal: {text}")]
    InvalidLiteral { what: &'static str, text: String },
    #[error("division by zero")]
    DivisionByZero,
}

/// A raised condition, carrying where it was raised from.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("{kind}")]
pub struct Condition {
    pub kind: ConditionKind,
    pub loc: SourceLoc,
}

impl Condition {
    pub fn new(kind: ConditionKind, loc: SourceLoc) -> Self {
        Condition { kind, loc }
    }
}

/// Non-local control flow unwinding through evaluation.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ControlFlow {
    #[error("break outside a loop")]
    Break(Value),
    #[error("continue outside a loop")]
    Continue,
    #[error("return outside a method")]
    Return(Value),
}

/// Everything that can leave an evaluation early.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Escape {
    #[error("unhandled condition: {0}")]
    Condition(#[from] Condition),
    #[error("{0}")]
    ControlFlow(#[from] ControlFlow),
}

pub type EvalResult<T = Value> = Result<T, Escape>;
