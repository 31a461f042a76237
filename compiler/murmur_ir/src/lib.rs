//! Murmur IR - the message-chain representation.
//!
//! This crate contains the core data structures for the Murmur runtime:
//! - Spans, source locations and the line index
//! - Names for interned identifiers
//! - Tokens and `TokenList` for lexer output
//! - `Message` nodes, the `Arg` tagged union and the `Value` literal type
//! - `MsgArena`, the arena that owns every node of a program
//! - Worklist-based traversal combinators (`walk`, `each`)
//!
//! # Design Philosophy
//!
//! - **Intern Everything**: node names and symbols are `Name(u32)` handles
//! - **Flatten Everything**: no `Box<Message>`; chains link through
//!   `MsgId(u32)` indices into the arena
//! - **Three kinds of absence**: a missing link is `Option<MsgId>::None`,
//!   "dispatch produced no value" is `Ok(None)` at the evaluator layer, and
//!   the language-level nothing is `Value::Nil` - never a shared null

/// Compile-time assertion that a type has a specific size.
///
/// Used to prevent accidental size regressions in frequently-allocated types.
#[macro_export]
macro_rules! static_assert_size {
    ($ty:ty, $size:expr) => {
        const _: [(); $size] = [(); ::std::mem::size_of::<$ty>()];
    };
}

mod arena;
mod interner;
mod message;
mod name;
mod span;
mod token;
mod value;
pub mod walk;

pub use arena::MsgArena;
pub use interner::StringInterner;
pub use message::{Arg, Message, MsgId};
pub use name::Name;
pub use span::{LineIndex, SourceLoc, Span};
pub use token::{Token, TokenKind, TokenList};
pub use value::Value;
pub use walk::{each, walk};
