//! Arena owning every message node of a program.
//!
//! Chains are doubly linked through [`MsgId`] indices. The arena is the
//! single owner; everything else (argument slots, quoted-code values,
//! caller-held heads) refers to nodes by id. Nothing is ever freed - a
//! node lives as long as the arena, which matches the original model
//! where node lifetime is shared with whatever references it.

use crate::{Arg, Message, MsgId, Name, SourceLoc, StringInterner, Value};
use smallvec::SmallVec;

/// Arena of message nodes plus the interner their names live in.
pub struct MsgArena {
    nodes: Vec<Message>,
    interner: StringInterner,
}

impl MsgArena {
    /// Create an empty arena.
    pub fn new() -> Self {
        MsgArena {
            nodes: Vec::new(),
            interner: StringInterner::new(),
        }
    }

    /// The interner names and symbols are allocated from.
    #[inline]
    pub fn interner(&self) -> &StringInterner {
        &self.interner
    }

    /// Intern a string into this arena's interner.
    #[inline]
    pub fn intern(&self, s: &str) -> Name {
        self.interner.intern(s)
    }

    /// Text of an interned name.
    #[inline]
    pub fn text(&self, name: Name) -> &'static str {
        self.interner.lookup(name)
    }

    /// Number of nodes allocated so far.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Allocate a node.
    pub fn alloc(&mut self, message: Message) -> MsgId {
        #[expect(
            clippy::cast_possible_truncation,
            reason = "more than u32::MAX live nodes is out of scope"
        )]
        let id = MsgId::new(self.nodes.len() as u32);
        self.nodes.push(message);
        id
    }

    /// Borrow a node.
    #[inline]
    pub fn node(&self, id: MsgId) -> &Message {
        &self.nodes[id.index()]
    }

    /// Mutably borrow a node.
    #[inline]
    pub fn node_mut(&mut self, id: MsgId) -> &mut Message {
        &mut self.nodes[id.index()]
    }

    /// Text of a node's name.
    #[inline]
    pub fn name_text(&self, id: MsgId) -> &'static str {
        self.interner.lookup(self.node(id).name)
    }

    /// Rename a node in place.
    #[inline]
    pub fn set_name(&mut self, id: MsgId, name: Name) {
        self.node_mut(id).name = name;
    }

    // Chain mutation.
    //
    // These are pure structural operations with no evaluation side
    // effects. `set_next`/`set_prev` touch exactly one link each, like
    // the surface-level `next=`/`prev=`; `link` wires both directions.

    #[inline]
    pub fn next(&self, id: MsgId) -> Option<MsgId> {
        self.node(id).next
    }

    #[inline]
    pub fn prev(&self, id: MsgId) -> Option<MsgId> {
        self.node(id).prev
    }

    #[inline]
    pub fn set_next(&mut self, id: MsgId, next: Option<MsgId>) {
        self.node_mut(id).next = next;
    }

    #[inline]
    pub fn set_prev(&mut self, id: MsgId, prev: Option<MsgId>) {
        self.node_mut(id).prev = prev;
    }

    /// Set `left.next = right` and `right.prev = left`.
    pub fn link(&mut self, left: MsgId, right: MsgId) {
        self.node_mut(left).next = Some(right);
        self.node_mut(right).prev = Some(left);
    }

    /// Walk to the end of the chain starting at `id`.
    pub fn last(&self, id: MsgId) -> MsgId {
        let mut current = id;
        while let Some(next) = self.node(current).next {
            current = next;
        }
        current
    }

    /// Splice: walk to the end of the chain and set its `next` there.
    pub fn set_next_of_last(&mut self, id: MsgId, next: Option<MsgId>) {
        let tail = self.last(id);
        self.node_mut(tail).next = next;
        if let Some(n) = next {
            self.node_mut(n).prev = Some(tail);
        }
    }

    /// Append an argument slot.
    pub fn append_argument(&mut self, id: MsgId, arg: Arg) {
        self.node_mut(id).arguments.push(arg);
    }

    /// Prepend an argument slot.
    pub fn prepend_argument(&mut self, id: MsgId, arg: Arg) {
        self.node_mut(id).arguments.insert(0, arg);
    }

    /// Replace the whole argument list.
    pub fn set_arguments(&mut self, id: MsgId, arguments: SmallVec<[Arg; 2]>) {
        self.node_mut(id).arguments = arguments;
    }

    /// Memoize a value onto a node. Evaluation will return it verbatim
    /// from now on, bypassing dispatch.
    pub fn cache_value(&mut self, id: MsgId, value: Value) {
        self.node_mut(id).cached = Some(value);
    }

    /// Copy file/line/position from one node to another.
    pub fn copy_source_location(&mut self, from: MsgId, to: MsgId) {
        let loc = self.node(from).loc;
        self.node_mut(to).loc = loc;
    }

    // Predicates.

    /// Keyword message: length > 1, zero arguments, trailing `:`.
    pub fn is_keyword(&self, id: MsgId) -> bool {
        let node = self.node(id);
        let text = self.interner.lookup(node.name);
        text.len() > 1 && node.arguments.is_empty() && text.ends_with(':')
    }

    /// Symbol literal: length > 1, zero arguments, leading `:`.
    pub fn is_symbol(&self, id: MsgId) -> bool {
        let node = self.node(id);
        let text = self.interner.lookup(node.name);
        text.len() > 1 && node.arguments.is_empty() && text.starts_with(':')
    }

    /// True when the node starts its statement: no `prev`, or `prev` is a
    /// terminator.
    pub fn is_first_on_line(&self, id: MsgId) -> bool {
        match self.node(id).prev {
            None => true,
            Some(prev) => self.node(prev).is_terminator,
        }
    }

    // Copying.

    /// Shallow "template" copy.
    ///
    /// Preserves name, arguments, terminator flag, source location,
    /// cached value and the `next`/`prev` links, but yields a new
    /// identity whose argument list can be replaced without touching the
    /// original. This is what makes a canonical node reusable as a call
    /// template.
    pub fn copy_shallow(&mut self, id: MsgId) -> MsgId {
        let copy = self.node(id).clone();
        self.alloc(copy)
    }

    /// Deep copy of a whole chain.
    ///
    /// Duplicates every node, every message-typed argument and every
    /// downstream `next` node. `prev` links in the copy are re-derived
    /// from the new `next` links, never taken from the original. The
    /// terminator flag and any cached value are copied verbatim.
    ///
    /// Uses an explicit worklist so arbitrarily deep chains cannot
    /// exhaust the native stack.
    pub fn deep_copy(&mut self, head: MsgId) -> MsgId {
        let root = self.clone_detached(head);
        let mut work: Vec<(MsgId, MsgId)> = vec![(head, root)];

        while let Some((orig, copy)) = work.pop() {
            let arg_count = self.node(orig).arguments.len();
            for slot in 0..arg_count {
                if let Arg::Message(arg_head) = self.node(orig).arguments[slot] {
                    let arg_copy = self.clone_detached(arg_head);
                    self.node_mut(copy).arguments[slot] = Arg::Message(arg_copy);
                    work.push((arg_head, arg_copy));
                }
            }
            if let Some(next) = self.node(orig).next {
                let next_copy = self.clone_detached(next);
                self.node_mut(copy).next = Some(next_copy);
                self.node_mut(next_copy).prev = Some(copy);
                work.push((next, next_copy));
            }
        }
        root
    }

    /// Clone one node with links severed; arguments still point at the
    /// original sub-chains until `deep_copy` patches them.
    fn clone_detached(&mut self, id: MsgId) -> MsgId {
        let mut copy = self.node(id).clone();
        copy.next = None;
        copy.prev = None;
        self.alloc(copy)
    }

    /// Build a `cachedResult` node wrapping an already-computed value.
    ///
    /// The idiom for injecting a value into a position where a message
    /// node is structurally required; `send` on it returns the value
    /// regardless of receiver, context or explicit arguments.
    pub fn wrap(&mut self, value: Value) -> MsgId {
        let name = self.intern("cachedResult");
        let mut node = Message::new(name, SourceLoc::synthetic(Name::EMPTY));
        node.cached = Some(value);
        self.alloc(node)
    }
}

impl Default for MsgArena {
    fn default() -> Self {
        Self::new()
    }
}
