//! Operator shuffling: rewriting flat message chains into
//! precedence-shaped argument trees.
//!
//! The parser emits `2 + 3 * 4` as five sibling nodes; shuffling turns
//! that into `2 +(3 *(4))` so evaluation can stay strictly
//! left-to-right. The rewrite is a structural pass over the chain with
//! no evaluation involved, and it is idempotent: a shuffled operator
//! carries arguments, and operators with arguments are left alone.
//!
//! The pass itself is split in two. [`shuffle_with`] is the traversal
//! driver: it walks every chain reachable from the head (the chain
//! itself plus all message-typed arguments, breadth-first through a
//! worklist) and hands each one to a strategy. [`OperatorShuffler`] is
//! the strategy seam; [`PrecedenceShuffler`] is the default strategy.

mod precedence;
mod table;

pub use precedence::PrecedenceShuffler;
pub use table::{OpInfo, OperatorTable};

use murmur_ir::{Arg, MsgArena, MsgId};
use std::collections::VecDeque;
use tracing::trace;

/// Strategy seam for chain rewriting.
///
/// The driver calls `attach` for every node of one chain in order, then
/// `next_message` once at the chain's end. `next_message` performs the
/// rewrite and returns the chain's new head, or `None` when nothing was
/// attached.
pub trait OperatorShuffler {
    fn attach(&mut self, arena: &MsgArena, node: MsgId);
    fn next_message(&mut self, arena: &mut MsgArena) -> Option<MsgId>;
}

/// One chain pending a shuffle, plus where to write its new head.
struct ChainEntry {
    head: MsgId,
    /// `(parent, argument index)` when the chain sits in an argument
    /// slot; `None` for the top-level chain.
    slot: Option<(MsgId, usize)>,
}

/// Shuffle every chain reachable from `head` with the given strategy.
///
/// Returns the possibly-changed top-level head: assignment rewriting can
/// replace the first node of a chain, so callers must continue from the
/// returned id, never from the one they passed in. Argument sub-chains
/// get the same treatment through their recorded slots.
pub fn shuffle_with<S: OperatorShuffler>(
    arena: &mut MsgArena,
    head: MsgId,
    strategy: &mut S,
) -> MsgId {
    let mut new_head = head;
    let mut worklist: VecDeque<ChainEntry> = VecDeque::new();
    worklist.push_back(ChainEntry { head, slot: None });

    while let Some(entry) = worklist.pop_front() {
        trace!(head = ?entry.head, "shuffling chain");
        let mut current = Some(entry.head);
        while let Some(id) = current {
            strategy.attach(arena, id);
            // Argument chains go to the worklist front so inner chains
            // shuffle soon after their statement.
            let mut inserted = 0;
            for (index, arg) in arena.node(id).arguments.iter().enumerate() {
                if let Arg::Message(arg_head) = *arg {
                    worklist.insert(
                        inserted,
                        ChainEntry {
                            head: arg_head,
                            slot: Some((id, index)),
                        },
                    );
                    inserted += 1;
                }
            }
            current = arena.node(id).next;
        }

        if let Some(shuffled) = strategy.next_message(arena) {
            match entry.slot {
                Some((parent, index)) => {
                    arena.node_mut(parent).arguments[index] = Arg::Message(shuffled);
                }
                None => new_head = shuffled,
            }
        }
    }
    new_head
}

/// Shuffle with the default operator table.
pub fn shuffle_operators(arena: &mut MsgArena, head: MsgId) -> MsgId {
    let table = OperatorTable::with_defaults(arena.interner());
    let mut shuffler = PrecedenceShuffler::new(table);
    shuffle_with(arena, head, &mut shuffler)
}

#[cfg(test)]
mod tests {
    use super::*;
    use murmur_ir::{Message, SourceLoc, Value};
    use pretty_assertions::assert_eq;

    /// Build a flat chain of named nodes; `.` builds a terminator.
    fn chain(arena: &mut MsgArena, names: &[&str]) -> MsgId {
        let mut head = None;
        let mut prev: Option<MsgId> = None;
        for &text in names {
            let name = arena.intern(text);
            let node = if text == "." {
                Message::terminator(name, SourceLoc::default())
            } else {
                Message::new(name, SourceLoc::default())
            };
            let id = arena.alloc(node);
            if let Some(p) = prev {
                arena.link(p, id);
            } else {
                head = Some(id);
            }
            prev = Some(id);
        }
        match head {
            Some(h) => h,
            None => panic!("chain needs at least one node"),
        }
    }

    /// Render a chain as `name(args) name ...` for shape assertions.
    fn render(arena: &MsgArena, head: MsgId) -> String {
        let mut out = String::new();
        let mut current = Some(head);
        while let Some(id) = current {
            if !out.is_empty() {
                out.push(' ');
            }
            out.push_str(arena.name_text(id));
            let node = arena.node(id);
            if !node.arguments.is_empty() {
                out.push('(');
                for (i, arg) in node.arguments.iter().enumerate() {
                    if i > 0 {
                        out.push_str(", ");
                    }
                    match arg {
                        Arg::Message(m) => out.push_str(&render(arena, *m)),
                        Arg::Value(v) => out.push_str(&v.render(arena.interner())),
                    }
                }
                out.push(')');
            }
            current = node.next;
        }
        out
    }

    /// Every `next` link must be mirrored by a `prev` link.
    fn assert_links_consistent(arena: &MsgArena, head: MsgId) {
        let mut current = Some(head);
        while let Some(id) = current {
            if let Some(next) = arena.next(id) {
                assert_eq!(arena.prev(next), Some(id), "broken back link after shuffle");
            }
            current = arena.next(id);
        }
    }

    #[test]
    fn precedence_nests_tighter_operators() {
        let mut arena = MsgArena::new();
        let head = chain(&mut arena, &["2", "+", "3", "*", "4"]);
        let head = shuffle_operators(&mut arena, head);
        assert_eq!(render(&arena, head), "2 +(3 *(4))");
        assert_links_consistent(&arena, head);
    }

    #[test]
    fn left_assoc_chains_flat() {
        let mut arena = MsgArena::new();
        let head = chain(&mut arena, &["a", "+", "b", "+", "c"]);
        let head = shuffle_operators(&mut arena, head);
        assert_eq!(render(&arena, head), "a +(b) +(c)");
    }

    #[test]
    fn assignment_takes_target_and_value() {
        let mut arena = MsgArena::new();
        let original = chain(&mut arena, &["x", "=", "3"]);
        let head = shuffle_operators(&mut arena, original);
        assert_ne!(head, original, "assignment must replace the head");
        assert_eq!(render(&arena, head), "=(x, 3)");
    }

    #[test]
    fn assignment_keeps_receiver_prefix() {
        let mut arena = MsgArena::new();
        let head = chain(&mut arena, &["foo", "x", "=", "3"]);
        let head = shuffle_operators(&mut arena, head);
        assert_eq!(render(&arena, head), "foo =(x, 3)");
        assert_links_consistent(&arena, head);
    }

    #[test]
    fn assignment_after_terminator_heads_its_statement() {
        let mut arena = MsgArena::new();
        let head = chain(&mut arena, &["a", ".", "x", "=", "1"]);
        let head = shuffle_operators(&mut arena, head);
        assert_eq!(render(&arena, head), "a . =(x, 1)");
        assert_links_consistent(&arena, head);
    }

    #[test]
    fn assignment_is_right_associative() {
        let mut arena = MsgArena::new();
        let head = chain(&mut arena, &["a", "=", "b", "=", "c"]);
        let head = shuffle_operators(&mut arena, head);
        assert_eq!(render(&arena, head), "=(a, =(b, c))");
    }

    #[test]
    fn assignment_value_spans_operators() {
        let mut arena = MsgArena::new();
        let head = chain(&mut arena, &["x", "=", "b", "+", "c"]);
        let head = shuffle_operators(&mut arena, head);
        assert_eq!(render(&arena, head), "=(x, b +(c))");
    }

    #[test]
    fn terminators_split_statements() {
        let mut arena = MsgArena::new();
        let head = chain(&mut arena, &["a", "+", "b", ".", "c", "*", "d"]);
        let head = shuffle_operators(&mut arena, head);
        assert_eq!(render(&arena, head), "a +(b) . c *(d)");
        assert_links_consistent(&arena, head);
    }

    #[test]
    fn argument_chains_are_shuffled_too() {
        let mut arena = MsgArena::new();
        let inner = chain(&mut arena, &["a", "+", "b"]);
        let foo = chain(&mut arena, &["foo"]);
        arena.append_argument(foo, Arg::Message(inner));
        let head = shuffle_operators(&mut arena, foo);
        assert_eq!(render(&arena, head), "foo(a +(b))");
    }

    #[test]
    fn assignment_inside_argument_patches_the_slot() {
        let mut arena = MsgArena::new();
        let inner = chain(&mut arena, &["x", "=", "1"]);
        let foo = chain(&mut arena, &["foo"]);
        arena.append_argument(foo, Arg::Message(inner));
        let head = shuffle_operators(&mut arena, foo);
        assert_eq!(render(&arena, head), "foo(=(x, 1))");
    }

    #[test]
    fn shuffling_is_idempotent() {
        let mut arena = MsgArena::new();
        let head = chain(&mut arena, &["x", "=", "2", "+", "3", "*", "4"]);
        let once = shuffle_operators(&mut arena, head);
        let rendered = render(&arena, once);
        let twice = shuffle_operators(&mut arena, once);
        assert_eq!(twice, once);
        assert_eq!(render(&arena, twice), rendered);
    }

    #[test]
    fn leading_operator_degrades_to_operand() {
        let mut arena = MsgArena::new();
        let head = chain(&mut arena, &["+", "a"]);
        let head = shuffle_operators(&mut arena, head);
        assert_eq!(render(&arena, head), "+ a");
    }

    #[test]
    fn trailing_operator_degrades_to_operand() {
        let mut arena = MsgArena::new();
        let head = chain(&mut arena, &["a", "+"]);
        let head = shuffle_operators(&mut arena, head);
        assert_eq!(render(&arena, head), "a +");
    }

    #[test]
    fn doubled_operator_reads_as_unary() {
        let mut arena = MsgArena::new();
        let head = chain(&mut arena, &["a", "+", "-", "b"]);
        let head = shuffle_operators(&mut arena, head);
        assert_eq!(render(&arena, head), "a +(- b)");
    }

    #[test]
    fn operator_with_arguments_is_an_operand() {
        let mut arena = MsgArena::new();
        let head = chain(&mut arena, &["a", "+", "b"]);
        let plus = match arena.next(head) {
            Some(p) => p,
            None => panic!("chain lost its second node"),
        };
        arena.append_argument(plus, Arg::Value(Value::Int(9)));
        let shuffled = shuffle_operators(&mut arena, head);
        assert_eq!(shuffled, head);
        assert_eq!(render(&arena, shuffled), "a +(9) b");
    }

    #[test]
    fn empty_table_is_identity() {
        let mut arena = MsgArena::new();
        let head = chain(&mut arena, &["a", "+", "b"]);
        let mut shuffler = PrecedenceShuffler::new(OperatorTable::empty());
        let shuffled = shuffle_with(&mut arena, head, &mut shuffler);
        assert_eq!(shuffled, head);
        assert_eq!(render(&arena, shuffled), "a + b");
    }
}
