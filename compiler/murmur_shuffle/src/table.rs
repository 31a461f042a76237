//! The operator table: which names bind as infix operators, how tightly,
//! and in which direction.

use murmur_ir::{Name, StringInterner};
use rustc_hash::FxHashMap;

/// Binding data for one operator name.
///
/// Lower `precedence` binds tighter. Assignment operators rewrite to the
/// two-argument form `op(target, value)` instead of the plain
/// `lhs op(rhs)` shape.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct OpInfo {
    pub precedence: u8,
    pub right_assoc: bool,
    pub is_assignment: bool,
}

/// Table mapping operator names to their binding data.
///
/// A name counts as an operator occurrence only when the node carrying it
/// has an empty argument list; `+(2)` is already shuffled and is left
/// alone, which is what makes shuffling idempotent.
#[derive(Debug, Default)]
pub struct OperatorTable {
    entries: FxHashMap<Name, OpInfo>,
}

/// Default levels, tightest first. Precedences start at 1 so that a
/// left-associative operator's right limit (`precedence - 1`) never
/// wraps.
const DEFAULT_LEVELS: &[(&[&str], bool, bool)] = &[
    (&["**"], true, false),
    (&["*", "/", "%"], false, false),
    (&["+", "-"], false, false),
    (&["<<", ">>"], false, false),
    (&["<", ">", "<=", ">="], false, false),
    (&["==", "!=", "=~", "!~"], false, false),
    (&["&"], false, false),
    (&["^"], false, false),
    (&["|"], false, false),
    (&["&&"], false, false),
    (&["||"], false, false),
    (&["..", "..."], false, false),
    (
        &[
            "=", "+=", "-=", "*=", "/=", "%=", "**=", "&=", "|=", "^=", "<<=", ">>=",
        ],
        true,
        true,
    ),
    (&["and", "or"], false, false),
];

impl OperatorTable {
    /// An empty table; shuffling with it is the identity.
    pub fn empty() -> Self {
        OperatorTable {
            entries: FxHashMap::default(),
        }
    }

    /// The default C-like table.
    pub fn with_defaults(interner: &StringInterner) -> Self {
        let mut table = OperatorTable::empty();
        for (level, (names, right_assoc, is_assignment)) in DEFAULT_LEVELS.iter().enumerate() {
            #[expect(
                clippy::cast_possible_truncation,
                reason = "the default table has far fewer than 255 levels"
            )]
            let precedence = (level + 1) as u8;
            for name in *names {
                table.insert(
                    interner.intern(name),
                    OpInfo {
                        precedence,
                        right_assoc: *right_assoc,
                        is_assignment: *is_assignment,
                    },
                );
            }
        }
        table
    }

    pub fn insert(&mut self, name: Name, info: OpInfo) {
        self.entries.insert(name, info);
    }

    pub fn lookup(&self, name: Name) -> Option<OpInfo> {
        self.entries.get(&name).copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_order_multiplication_tighter_than_addition() {
        let interner = StringInterner::new();
        let table = OperatorTable::with_defaults(&interner);
        let mul = match table.lookup(interner.intern("*")) {
            Some(info) => info,
            None => panic!("* missing from default table"),
        };
        let add = match table.lookup(interner.intern("+")) {
            Some(info) => info,
            None => panic!("+ missing from default table"),
        };
        assert!(mul.precedence < add.precedence);
    }

    #[test]
    fn assignment_is_right_assoc() {
        let interner = StringInterner::new();
        let table = OperatorTable::with_defaults(&interner);
        let assign = match table.lookup(interner.intern("=")) {
            Some(info) => info,
            None => panic!("= missing from default table"),
        };
        assert!(assign.right_assoc);
        assert!(assign.is_assignment);
    }

    #[test]
    fn unknown_names_are_not_operators() {
        let interner = StringInterner::new();
        let table = OperatorTable::with_defaults(&interner);
        assert_eq!(table.lookup(interner.intern("foo")), None);
    }
}
