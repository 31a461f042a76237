//! Cell scoping for the minimal runtime.
//!
//! Scopes form a tree rooted at the ground scope; lookup walks parent
//! links, assignment writes into the scope it is given. Like message
//! nodes, scopes live in a flat arena and are addressed by id.

use murmur_ir::{Name, Value};
use rustc_hash::FxHashMap;

/// Index of a scope in [`Scopes`].
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[repr(transparent)]
pub struct ScopeId(u32);

impl ScopeId {
    /// The root scope every program starts in.
    pub const GROUND: ScopeId = ScopeId(0);

    fn index(self) -> usize {
        self.0 as usize
    }
}

struct Scope {
    parent: Option<ScopeId>,
    cells: FxHashMap<Name, Value>,
}

/// Arena of scopes.
pub struct Scopes {
    scopes: Vec<Scope>,
}

impl Scopes {
    /// Create the arena with an empty ground scope.
    pub fn new() -> Self {
        Scopes {
            scopes: vec![Scope {
                parent: None,
                cells: FxHashMap::default(),
            }],
        }
    }

    /// Create a child scope.
    pub fn push_child(&mut self, parent: ScopeId) -> ScopeId {
        #[expect(
            clippy::cast_possible_truncation,
            reason = "more than u32::MAX live scopes is out of scope"
        )]
        let id = ScopeId(self.scopes.len() as u32);
        self.scopes.push(Scope {
            parent: Some(parent),
            cells: FxHashMap::default(),
        });
        id
    }

    /// Bind or rebind a cell in exactly this scope.
    pub fn set_cell(&mut self, scope: ScopeId, name: Name, value: Value) {
        self.scopes[scope.index()].cells.insert(name, value);
    }

    /// Look a cell up, walking parent scopes.
    pub fn lookup(&self, scope: ScopeId, name: Name) -> Option<&Value> {
        let mut current = Some(scope);
        while let Some(id) = current {
            let scope = &self.scopes[id.index()];
            if let Some(value) = scope.cells.get(&name) {
                return Some(value);
            }
            current = scope.parent;
        }
        None
    }
}

impl Default for Scopes {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use murmur_ir::StringInterner;

    #[test]
    fn lookup_walks_parents() {
        let interner = StringInterner::new();
        let x = interner.intern("x");
        let mut scopes = Scopes::new();
        scopes.set_cell(ScopeId::GROUND, x, Value::Int(1));
        let child = scopes.push_child(ScopeId::GROUND);
        assert_eq!(scopes.lookup(child, x), Some(&Value::Int(1)));
    }

    #[test]
    fn child_shadows_parent() {
        let interner = StringInterner::new();
        let x = interner.intern("x");
        let mut scopes = Scopes::new();
        scopes.set_cell(ScopeId::GROUND, x, Value::Int(1));
        let child = scopes.push_child(ScopeId::GROUND);
        scopes.set_cell(child, x, Value::Int(2));
        assert_eq!(scopes.lookup(child, x), Some(&Value::Int(2)));
        assert_eq!(scopes.lookup(ScopeId::GROUND, x), Some(&Value::Int(1)));
    }

    #[test]
    fn missing_cell_is_none() {
        let interner = StringInterner::new();
        let scopes = Scopes::new();
        assert_eq!(scopes.lookup(ScopeId::GROUND, interner.intern("y")), None);
    }
}
