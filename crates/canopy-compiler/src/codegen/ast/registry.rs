// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! Visitor registry.
//!
//! Maps node type tags to the visitor generating code for them. Resolution is
//! an exact tag lookup. The registry is filled before compilation starts and
//! only read afterwards, so one instance can serve parallel compilations.
//!
//! Visitors are found in two ways:
//! - [`VisitorRegistry::register`] for explicit registration
//! - [`VisitorRegistry::discover`] collecting every [`VisitorRegistration`]
//!   submitted with `inventory`, which is how the built-in node types and
//!   any linked-in extension crate make themselves known:
//!
//! ```ignore
//! fn create_approval_visitor() -> VisitorRef {
//!     Arc::new(ApprovalVisitor)
//! }
//!
//! static APPROVAL: VisitorRegistration = VisitorRegistration {
//!     node_type: "approval",
//!     create: create_approval_visitor,
//! };
//! inventory::submit! { &APPROVAL }
//! ```

use std::collections::HashMap;
use std::sync::{Arc, OnceLock};

use super::visitor::NodeVisitor;

/// Shared handle to a visitor.
pub type VisitorRef = Arc<dyn NodeVisitor>;

/// A visitor announced with `inventory::submit!`.
pub struct VisitorRegistration {
    /// Node type tag the visitor handles.
    pub node_type: &'static str,
    /// Creates the visitor.
    pub create: fn() -> VisitorRef,
}

// Register VisitorRegistration with inventory
inventory::collect!(&'static VisitorRegistration);

/// Generators by node type tag.
#[derive(Clone, Default)]
pub struct VisitorRegistry {
    entries: HashMap<String, VisitorRef>,
}

impl VisitorRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a registry holding every visitor submitted with `inventory`.
    pub fn discover() -> Self {
        let mut registry = Self::new();
        for registration in inventory::iter::<&'static VisitorRegistration> {
            registry.register_shared(registration.node_type, (registration.create)());
        }
        tracing::debug!(
            node_types = registry.len(),
            "Discovered node visitors"
        );
        registry
    }

    /// The discovered registry, built once and shared for the process lifetime.
    pub fn builtin() -> &'static VisitorRegistry {
        static REGISTRY: OnceLock<VisitorRegistry> = OnceLock::new();
        REGISTRY.get_or_init(Self::discover)
    }

    /// Bind `node_type` to `visitor`, returning the previous binding.
    pub fn register<V: NodeVisitor + 'static>(
        &mut self,
        node_type: impl Into<String>,
        visitor: V,
    ) -> Option<VisitorRef> {
        self.register_shared(node_type, Arc::new(visitor))
    }

    /// Bind `node_type` to an already shared visitor, returning the previous
    /// binding. The last registration for a tag wins.
    pub fn register_shared(
        &mut self,
        node_type: impl Into<String>,
        visitor: VisitorRef,
    ) -> Option<VisitorRef> {
        self.entries.insert(node_type.into(), visitor)
    }

    /// The visitor handling `node_type`, if one is registered.
    pub fn find_visitor(&self, node_type: &str) -> Option<&dyn NodeVisitor> {
        self.entries.get(node_type).map(|v| v.as_ref())
    }

    /// Returns true if `node_type` has a visitor.
    pub fn contains(&self, node_type: &str) -> bool {
        self.entries.contains_key(node_type)
    }

    /// Registered node type tags, sorted.
    pub fn node_types(&self) -> Vec<&str> {
        let mut types: Vec<&str> = self.entries.keys().map(String::as_str).collect();
        types.sort_unstable();
        types
    }

    /// Number of registered node types.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if no visitor is registered.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl std::fmt::Debug for VisitorRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VisitorRegistry")
            .field("node_types", &self.node_types())
            .finish()
    }
}
