//! Evaluated values.
//!
//! The chain core treats values as mostly opaque: they are what dispatch
//! produces, what argument slots may carry pre-evaluated, and what a
//! cached node wraps. Only the renderer and the minimal runtime look
//! inside.

use crate::{MsgId, Name, StringInterner};
use std::sync::Arc;

/// An evaluated Murmur value.
///
/// `Nil` is the canonical "nothing" of the language. It is a real value,
/// distinct from both a missing chain link (`Option<MsgId>::None`) and a
/// dispatch that produced no value at all (`Ok(None)` at the evaluator).
#[derive(Clone, Debug, PartialEq)]
pub enum Value {
    /// The canonical nothing.
    Nil,
    Bool(bool),
    Int(i64),
    Decimal(f64),
    Text(Arc<str>),
    /// Regexp literal, pattern and flags kept as written.
    Regex { pattern: Arc<str>, flags: Arc<str> },
    /// An interned symbol (`:foo`).
    Symbol(Name),
    /// Quoted code - a message chain held as a value.
    Message(MsgId),
}

impl Value {
    /// Build a text value from a string slice.
    pub fn text(s: &str) -> Self {
        Value::Text(Arc::from(s))
    }

    #[inline]
    pub fn is_nil(&self) -> bool {
        matches!(self, Value::Nil)
    }

    /// Render the value the way the code renderer embeds it.
    ///
    /// `Message` values render as an opaque placeholder here; the
    /// renderer crate substitutes real code text for those.
    pub fn render(&self, interner: &StringInterner) -> String {
        match self {
            Value::Nil => "nil".to_owned(),
            Value::Bool(b) => b.to_string(),
            Value::Int(i) => i.to_string(),
            Value::Decimal(d) => d.to_string(),
            Value::Text(t) => t.to_string(),
            Value::Regex { pattern, flags } => format!("#/{pattern}/{flags}"),
            Value::Symbol(name) => format!(":{}", interner.lookup(*name)),
            Value::Message(id) => format!("#<message {}>", id.index()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn render_scalars() {
        let interner = StringInterner::new();
        assert_eq!(Value::Nil.render(&interner), "nil");
        assert_eq!(Value::Bool(true).render(&interner), "true");
        assert_eq!(Value::Int(123).render(&interner), "123");
        assert_eq!(Value::text("abc").render(&interner), "abc");
    }

    #[test]
    fn render_symbol_keeps_colon() {
        let interner = StringInterner::new();
        let sym = Value::Symbol(interner.intern("foo"));
        assert_eq!(sym.render(&interner), ":foo");
    }

    #[test]
    fn nil_is_its_own_value() {
        assert!(Value::Nil.is_nil());
        assert!(!Value::Int(0).is_nil());
    }
}
