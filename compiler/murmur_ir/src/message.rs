//! Message nodes and their ids.

use crate::{Name, SourceLoc, Value};
use smallvec::SmallVec;
use std::fmt;

/// Index of a message node in its [`MsgArena`](crate::MsgArena).
///
/// Chains link through `MsgId`s instead of owning pointers; a node may be
/// referenced simultaneously as a chain member, as an argument of another
/// node, and as quoted code inside a [`Value::Message`].
#[derive(Copy, Clone, Eq, PartialEq, Hash)]
#[repr(transparent)]
pub struct MsgId(u32);

impl MsgId {
    /// Create a new id.
    #[inline]
    pub const fn new(index: u32) -> Self {
        MsgId(index)
    }

    /// Index into the arena.
    #[inline]
    pub const fn index(self) -> usize {
        self.0 as usize
    }

    /// Raw u32 value.
    #[inline]
    pub const fn raw(self) -> u32 {
        self.0
    }
}

impl fmt::Debug for MsgId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "MsgId({})", self.0)
    }
}

/// One argument slot of a message node.
///
/// A slot holds either a nested message (the head of its own chain) or an
/// already-evaluated literal. The two cases are a real sum type - code
/// that walks arguments must handle both, never assume homogeneity.
#[derive(Clone, Debug, PartialEq)]
pub enum Arg {
    Message(MsgId),
    Value(Value),
}

impl Arg {
    /// The nested message id, if this slot holds one.
    #[inline]
    pub fn as_message(&self) -> Option<MsgId> {
        match self {
            Arg::Message(id) => Some(*id),
            Arg::Value(_) => None,
        }
    }
}

/// One message node: the atomic unit of code-as-data.
///
/// Nodes are mutable at any time, including during evaluation of the very
/// chain they sit on; routines that walk a chain re-read `next` at every
/// step instead of pre-capturing the shape.
///
/// `next` is the owning forward link of the chain. `prev` is a
/// back-reference for context queries only (stack traces, "first on
/// line") and is never consulted for lifetime or copying decisions.
#[derive(Clone, Debug, PartialEq)]
pub struct Message {
    /// Node name; zero-length names are legal and render as `()`.
    pub name: Name,
    /// Ordered argument slots.
    pub arguments: SmallVec<[Arg; 2]>,
    /// Owning forward link.
    pub next: Option<MsgId>,
    /// Query-only back link.
    pub prev: Option<MsgId>,
    /// Statement boundary flag; terminators render as `.`.
    pub is_terminator: bool,
    /// Always present; copied on every structural copy.
    pub loc: SourceLoc,
    /// Memoized result. When present, evaluation returns it verbatim and
    /// never dispatches, regardless of receiver or context.
    pub cached: Option<Value>,
}

impl Message {
    /// Create a plain node with no arguments.
    pub fn new(name: Name, loc: SourceLoc) -> Self {
        Message {
            name,
            arguments: SmallVec::new(),
            next: None,
            prev: None,
            is_terminator: false,
            loc,
            cached: None,
        }
    }

    /// Create a node with a single argument.
    pub fn with_arg(name: Name, arg: Arg, loc: SourceLoc) -> Self {
        let mut message = Message::new(name, loc);
        message.arguments.push(arg);
        message
    }

    /// Create a terminator node (named `.`).
    pub fn terminator(name: Name, loc: SourceLoc) -> Self {
        let mut message = Message::new(name, loc);
        message.is_terminator = true;
        message
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn msg_id_round_trips() {
        let id = MsgId::new(7);
        assert_eq!(id.index(), 7);
        assert_eq!(id.raw(), 7);
        assert_eq!(format!("{id:?}"), "MsgId(7)");
    }

    #[test]
    fn arg_as_message() {
        let arg = Arg::Message(MsgId::new(3));
        assert_eq!(arg.as_message(), Some(MsgId::new(3)));
        assert_eq!(Arg::Value(Value::Nil).as_message(), None);
    }

    #[test]
    fn new_node_defaults() {
        let node = Message::new(Name::EMPTY, SourceLoc::default());
        assert!(node.arguments.is_empty());
        assert!(node.next.is_none());
        assert!(node.prev.is_none());
        assert!(!node.is_terminator);
        assert!(node.cached.is_none());
    }
}
