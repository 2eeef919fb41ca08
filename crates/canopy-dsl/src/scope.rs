// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! Nested variable scopes.
//!
//! Scopes live in a [`ScopeArena`] and refer to their parent by [`ScopeId`].
//! The arena is filled while a process graph is constructed and is only read
//! afterwards, so compilation never needs locks to look names up.

use std::collections::BTreeMap;

use crate::Variable;

/// Index of a scope inside its [`ScopeArena`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ScopeId(usize);

impl ScopeId {
    /// Position of the scope in the arena.
    pub fn index(self) -> usize {
        self.0
    }
}

impl std::fmt::Display for ScopeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "scope#{}", self.0)
    }
}

/// A symbol table of variable declarations with an optional parent link.
#[derive(Debug, Clone, Default)]
pub struct VariableScope {
    variables: BTreeMap<String, Variable>,
    parent: Option<ScopeId>,
}

impl VariableScope {
    /// Variables declared directly in this scope, ordered by name.
    pub fn variables(&self) -> &BTreeMap<String, Variable> {
        &self.variables
    }

    /// The enclosing scope, `None` for the root.
    pub fn parent(&self) -> Option<ScopeId> {
        self.parent
    }
}

/// Owner of every scope of one process graph.
#[derive(Debug, Clone, Default)]
pub struct ScopeArena {
    scopes: Vec<VariableScope>,
}

impl ScopeArena {
    /// Create an empty arena.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a scope without a parent.
    pub fn root(&mut self, variables: BTreeMap<String, Variable>) -> ScopeId {
        self.push(VariableScope {
            variables,
            parent: None,
        })
    }

    /// Add a scope nested in `parent`.
    ///
    /// # Panics
    ///
    /// Panics if `parent` does not belong to this arena.
    pub fn child(&mut self, parent: ScopeId, variables: BTreeMap<String, Variable>) -> ScopeId {
        assert!(
            parent.0 < self.scopes.len(),
            "parent {} is not part of this arena",
            parent
        );
        self.push(VariableScope {
            variables,
            parent: Some(parent),
        })
    }

    fn push(&mut self, scope: VariableScope) -> ScopeId {
        let id = ScopeId(self.scopes.len());
        self.scopes.push(scope);
        id
    }

    /// Borrow a scope for lookups.
    ///
    /// # Panics
    ///
    /// Panics if `id` does not belong to this arena.
    pub fn get(&self, id: ScopeId) -> ScopeRef<'_> {
        assert!(id.0 < self.scopes.len(), "{} is not part of this arena", id);
        ScopeRef { arena: self, id }
    }

    /// Number of scopes in the arena.
    pub fn len(&self) -> usize {
        self.scopes.len()
    }

    /// Returns true if no scope has been created.
    pub fn is_empty(&self) -> bool {
        self.scopes.is_empty()
    }
}

/// A borrowed view of one scope and, through it, its whole parent chain.
#[derive(Debug, Clone, Copy)]
pub struct ScopeRef<'a> {
    arena: &'a ScopeArena,
    id: ScopeId,
}

impl<'a> ScopeRef<'a> {
    /// Identifier of this scope.
    pub fn id(&self) -> ScopeId {
        self.id
    }

    fn scope(&self) -> &'a VariableScope {
        &self.arena.scopes[self.id.0]
    }

    /// The enclosing scope's id.
    pub fn parent_id(&self) -> Option<ScopeId> {
        self.scope().parent
    }

    /// The enclosing scope.
    pub fn parent(&self) -> Option<ScopeRef<'a>> {
        self.parent_id().map(|id| self.arena.get(id))
    }

    /// Variables declared directly in this scope.
    pub fn variables(&self) -> &'a BTreeMap<String, Variable> {
        &self.scope().variables
    }

    /// Look a name up in this scope only.
    pub fn local(&self, name: &str) -> Option<&'a Variable> {
        self.scope().variables.get(name)
    }

    /// Look a name up here, then in each enclosing scope.
    pub fn lookup(&self, name: &str) -> Option<&'a Variable> {
        self.resolve(name).map(|(_, variable)| variable)
    }

    /// Like [`lookup`](Self::lookup), also reporting which scope declared the
    /// binding.
    pub fn resolve(&self, name: &str) -> Option<(ScopeId, &'a Variable)> {
        let mut current = Some(*self);
        while let Some(scope) = current {
            if let Some(variable) = scope.local(name) {
                return Some((scope.id, variable));
            }
            current = scope.parent();
        }
        None
    }

    /// Number of enclosing scopes (0 for the root).
    pub fn depth(&self) -> usize {
        let mut depth = 0;
        let mut current = self.parent();
        while let Some(scope) = current {
            depth += 1;
            current = scope.parent();
        }
        depth
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::VariableType;

    fn var(var_type: VariableType) -> Variable {
        Variable {
            var_type,
            value: None,
            description: None,
        }
    }

    fn vars(entries: &[(&str, VariableType)]) -> BTreeMap<String, Variable> {
        entries
            .iter()
            .map(|(name, ty)| (name.to_string(), var(*ty)))
            .collect()
    }

    #[test]
    fn test_lookup_local() {
        let mut arena = ScopeArena::new();
        let root = arena.root(vars(&[("x", VariableType::Number)]));
        let scope = arena.get(root);

        assert_eq!(scope.lookup("x").unwrap().var_type, VariableType::Number);
        assert!(scope.lookup("y").is_none());
        assert!(scope.parent().is_none());
        assert_eq!(scope.depth(), 0);
    }

    #[test]
    fn test_lookup_falls_back_to_parent() {
        let mut arena = ScopeArena::new();
        let root = arena.root(vars(&[("x", VariableType::Number)]));
        let child = arena.child(root, vars(&[("y", VariableType::String)]));
        let grandchild = arena.child(child, BTreeMap::new());

        let scope = arena.get(grandchild);
        assert_eq!(scope.resolve("x").unwrap().0, root);
        assert_eq!(scope.resolve("y").unwrap().0, child);
        assert!(scope.local("x").is_none());
        assert!(scope.lookup("z").is_none());
        assert_eq!(scope.depth(), 2);
    }

    #[test]
    fn test_local_binding_shadows_parent() {
        let mut arena = ScopeArena::new();
        let root = arena.root(vars(&[("x", VariableType::Number)]));
        let child = arena.child(root, vars(&[("x", VariableType::String)]));

        let (declared_in, variable) = arena.get(child).resolve("x").unwrap();
        assert_eq!(declared_in, child);
        assert_eq!(variable.var_type, VariableType::String);

        // The parent still sees its own binding
        assert_eq!(
            arena.get(root).lookup("x").unwrap().var_type,
            VariableType::Number
        );
    }

    #[test]
    fn test_sibling_scopes_are_isolated() {
        let mut arena = ScopeArena::new();
        let root = arena.root(BTreeMap::new());
        let left = arena.child(root, vars(&[("a", VariableType::Boolean)]));
        let right = arena.child(root, vars(&[("b", VariableType::Boolean)]));

        assert!(arena.get(left).lookup("b").is_none());
        assert!(arena.get(right).lookup("a").is_none());
        assert_eq!(arena.get(right).parent_id(), Some(root));
        assert_eq!(arena.len(), 3);
    }

    #[test]
    #[should_panic(expected = "not part of this arena")]
    fn test_child_of_foreign_scope_panics() {
        let mut other = ScopeArena::new();
        other.root(BTreeMap::new());
        let foreign = other.child(ScopeId(0), BTreeMap::new());

        let mut arena = ScopeArena::new();
        arena.child(foreign, BTreeMap::new());
    }
}
