//! The default precedence-climbing shuffler.

use murmur_ir::{Arg, MsgArena, MsgId};
use smallvec::SmallVec;
use std::mem;

use crate::{OpInfo, OperatorShuffler, OperatorTable};

/// A contiguous run of already-linked nodes, by its endpoints.
#[derive(Copy, Clone, Debug)]
struct Chain {
    head: MsgId,
    tail: MsgId,
}

/// One parse unit of a statement: either an operand sub-chain or a
/// pending operator node.
#[derive(Copy, Clone, Debug)]
enum Unit {
    Operand(Chain),
    Op { id: MsgId, info: OpInfo },
}

/// Rewrites flat chains into precedence-shaped argument trees.
///
/// `attach` buffers node ids; `next_message` rewrites the buffered chain
/// in place, one terminator-separated statement at a time, and reports
/// the possibly-changed head. Operators that already carry arguments are
/// treated as operands, so running the shuffler over its own output is
/// the identity.
pub struct PrecedenceShuffler {
    table: OperatorTable,
    attached: Vec<MsgId>,
}

impl PrecedenceShuffler {
    pub fn new(table: OperatorTable) -> Self {
        PrecedenceShuffler {
            table,
            attached: Vec::new(),
        }
    }

    /// Rewrite one statement's nodes; returns the statement's new chain.
    fn shuffle_statement(&self, arena: &mut MsgArena, ids: &[MsgId]) -> Chain {
        let units = self.classify(arena, ids);
        let mut pos = 0;
        let chain = parse_expr(arena, &units, &mut pos, u8::MAX);
        debug_assert_eq!(pos, units.len());
        chain
    }

    /// Split a statement into operand runs and operator nodes.
    ///
    /// A node is an operator occurrence only if its name is in the table
    /// and it carries no arguments. Operators in positions where no
    /// infix reading exists (statement start, statement end, right after
    /// another operator) degrade to operands and the chain around them
    /// is left as written.
    fn classify(&self, arena: &MsgArena, ids: &[MsgId]) -> Vec<Unit> {
        let mut units: Vec<Unit> = Vec::new();
        for (i, &id) in ids.iter().enumerate() {
            let node = arena.node(id);
            let info = if node.arguments.is_empty() {
                self.table.lookup(node.name)
            } else {
                None
            };
            let infix_position = matches!(units.last(), Some(Unit::Operand(_)))
                && i + 1 < ids.len();
            match info {
                Some(info) if infix_position => units.push(Unit::Op { id, info }),
                _ => match units.last_mut() {
                    // Adjacent operands are one sub-chain; extend it.
                    Some(Unit::Operand(chain)) => chain.tail = id,
                    _ => units.push(Unit::Operand(Chain { head: id, tail: id })),
                },
            }
        }
        units
    }
}

impl OperatorShuffler for PrecedenceShuffler {
    fn attach(&mut self, _arena: &MsgArena, node: MsgId) {
        self.attached.push(node);
    }

    fn next_message(&mut self, arena: &mut MsgArena) -> Option<MsgId> {
        let nodes = mem::take(&mut self.attached);
        nodes.first()?;

        // Statements are shuffled independently; terminators separate
        // them and survive in place.
        enum Piece {
            Statement(Vec<MsgId>),
            Terminator(MsgId),
        }
        let mut pending: Vec<MsgId> = Vec::new();
        let mut pieces: Vec<Piece> = Vec::new();
        for id in nodes {
            if arena.node(id).is_terminator {
                if !pending.is_empty() {
                    pieces.push(Piece::Statement(mem::take(&mut pending)));
                }
                pieces.push(Piece::Terminator(id));
            } else {
                pending.push(id);
            }
        }
        if !pending.is_empty() {
            pieces.push(Piece::Statement(pending));
        }

        // Rewrite each statement, then relink the pieces in order.
        let mut head: Option<MsgId> = None;
        let mut tail: Option<MsgId> = None;
        for piece in pieces {
            let chain = match piece {
                Piece::Statement(ids) => self.shuffle_statement(arena, &ids),
                Piece::Terminator(term) => {
                    arena.set_next(term, None);
                    Chain {
                        head: term,
                        tail: term,
                    }
                }
            };
            match tail {
                None => {
                    arena.set_prev(chain.head, None);
                    head = Some(chain.head);
                }
                Some(t) => arena.link(t, chain.head),
            }
            tail = Some(chain.tail);
        }
        head
    }
}

/// Precedence climbing over the unit list.
///
/// Consumes operators whose precedence number is at most `limit` (lower
/// binds tighter). A left-associative operator parses its right side
/// with `precedence - 1`, a right-associative one with `precedence`.
fn parse_expr(arena: &mut MsgArena, units: &[Unit], pos: &mut usize, limit: u8) -> Chain {
    let mut lhs = match units[*pos] {
        Unit::Operand(chain) => chain,
        Unit::Op { id, .. } => {
            // classify() guarantees operands in operand positions.
            unreachable!("operator {:?} in operand position", arena.node(id).name)
        }
    };
    *pos += 1;

    while *pos < units.len() {
        let (op, info) = match units[*pos] {
            Unit::Op { id, info } => (id, info),
            Unit::Operand(_) => break,
        };
        if info.precedence > limit {
            break;
        }
        *pos += 1;
        let rhs_limit = if info.right_assoc {
            info.precedence
        } else {
            info.precedence - 1
        };
        let rhs = parse_expr(arena, units, pos, rhs_limit);
        lhs = if info.is_assignment {
            combine_assignment(arena, lhs, op, rhs)
        } else {
            combine(arena, lhs, op, rhs)
        };
    }
    lhs
}

/// `lhs op rhs` becomes `lhs op(rhs)`: the right side moves into the
/// operator's argument list and the operator ends the chain.
fn combine(arena: &mut MsgArena, lhs: Chain, op: MsgId, rhs: Chain) -> Chain {
    arena.set_prev(rhs.head, None);
    arena.set_next(rhs.tail, None);
    arena.set_next(op, None);
    arena.append_argument(op, Arg::Message(rhs.head));
    arena.link(lhs.tail, op);
    Chain {
        head: lhs.head,
        tail: op,
    }
}

/// `recv target op rhs` becomes `recv op(target, rhs)`: the node just
/// before the operator is detached and becomes the first argument, so
/// the operator takes the target's place in the chain. When the target
/// was the statement head, the operator becomes the new head.
fn combine_assignment(arena: &mut MsgArena, lhs: Chain, op: MsgId, rhs: Chain) -> Chain {
    let target = lhs.tail;
    // `prev` may still point at the previous statement when the target
    // heads this one; only links inside the statement count here.
    let before = if lhs.head == target {
        None
    } else {
        arena.prev(target)
    };

    arena.set_prev(rhs.head, None);
    arena.set_next(rhs.tail, None);
    arena.set_next(target, None);
    arena.set_prev(target, None);

    let mut args: SmallVec<[Arg; 2]> = SmallVec::new();
    args.push(Arg::Message(target));
    args.push(Arg::Message(rhs.head));
    arena.set_arguments(op, args);
    arena.set_next(op, None);

    match before {
        Some(b) => {
            arena.link(b, op);
            Chain {
                head: lhs.head,
                tail: op,
            }
        }
        None => {
            arena.set_prev(op, None);
            Chain { head: op, tail: op }
        }
    }
}
