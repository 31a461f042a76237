//! Structural traversal over message chains.
//!
//! Both traversals tolerate the callback mutating the chain it is
//! walking: links are re-read from the arena after each callback, never
//! captured up front. A callback that splices nodes into the not-yet
//! visited part of the chain will see them visited; one that cuts the
//! chain short ends the traversal there.

use crate::{Arg, MsgArena, MsgId};

/// Visit every node reachable from `head`: the chain itself, plus every
/// message-typed argument sub-chain, recursively.
///
/// Within one node, argument sub-chains are visited before the node's
/// successor. Uses an explicit stack; argument nesting depth does not
/// consume native stack.
pub fn walk<F>(arena: &mut MsgArena, head: MsgId, visit: &mut F)
where
    F: FnMut(&mut MsgArena, MsgId),
{
    let mut stack = vec![head];
    while let Some(id) = stack.pop() {
        visit(arena, id);
        // Read the shape after the callback so mutations take effect.
        if let Some(next) = arena.node(id).next {
            stack.push(next);
        }
        let arg_count = arena.node(id).arguments.len();
        for slot in (0..arg_count).rev() {
            if let Arg::Message(arg_head) = arena.node(id).arguments[slot] {
                stack.push(arg_head);
            }
        }
    }
}

/// Visit the top-level nodes of the chain starting at `head`, in order,
/// with a running index. Does not descend into arguments.
pub fn each<F>(arena: &mut MsgArena, head: MsgId, f: &mut F)
where
    F: FnMut(&mut MsgArena, usize, MsgId),
{
    let mut current = Some(head);
    let mut index = 0usize;
    while let Some(id) = current {
        f(arena, index, id);
        current = arena.node(id).next;
        index += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Message, SourceLoc};
    use pretty_assertions::assert_eq;

    fn node(arena: &mut MsgArena, name: &str) -> MsgId {
        let name = arena.intern(name);
        arena.alloc(Message::new(name, SourceLoc::default()))
    }

    #[test]
    fn walk_visits_arguments_before_successor() {
        let mut arena = MsgArena::new();
        let a = node(&mut arena, "a");
        let inner1 = node(&mut arena, "inner1");
        let inner2 = node(&mut arena, "inner2");
        let b = node(&mut arena, "b");
        arena.append_argument(a, Arg::Message(inner1));
        arena.append_argument(a, Arg::Message(inner2));
        arena.link(a, b);

        let mut seen = Vec::new();
        walk(&mut arena, a, &mut |arena, id| {
            seen.push(arena.name_text(id).to_owned());
        });
        assert_eq!(seen, ["a", "inner1", "inner2", "b"]);
    }

    #[test]
    fn each_stays_on_top_level() {
        let mut arena = MsgArena::new();
        let a = node(&mut arena, "a");
        let inner = node(&mut arena, "inner");
        let b = node(&mut arena, "b");
        arena.append_argument(a, Arg::Message(inner));
        arena.link(a, b);

        let mut seen = Vec::new();
        each(&mut arena, a, &mut |arena, index, id| {
            seen.push((index, arena.name_text(id).to_owned()));
        });
        assert_eq!(seen, [(0, "a".to_owned()), (1, "b".to_owned())]);
    }

    #[test]
    fn each_sees_nodes_spliced_in_by_the_callback() {
        let mut arena = MsgArena::new();
        let a = node(&mut arena, "a");
        let b = node(&mut arena, "b");
        arena.link(a, b);

        let mut seen = Vec::new();
        each(&mut arena, a, &mut |arena, _index, id| {
            let name = arena.name_text(id).to_owned();
            if name == "a" {
                let mid_name = arena.intern("mid");
                let mid = arena.alloc(Message::new(mid_name, SourceLoc::default()));
                let old_next = arena.next(id);
                arena.link(id, mid);
                arena.set_next(mid, old_next);
            }
            seen.push(name);
        });
        assert_eq!(seen, ["a", "mid", "b"]);
    }
}
