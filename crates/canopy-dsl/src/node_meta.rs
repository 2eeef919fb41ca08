// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! Node type metadata collected at link time.
//!
//! Built-in node types register themselves in `node_registration.rs`; crates
//! adding their own node types can submit a [`NodeTypeMeta`] the same way:
//!
//! ```ignore
//! static APPROVAL_META: NodeTypeMeta = NodeTypeMeta {
//!     id: "approval",
//!     display_name: "Approval",
//!     description: "Waits for a human decision",
//!     category: "execution",
//!     composite: false,
//!     schema_fn: schema_approval,
//! };
//! inventory::submit! { &APPROVAL_META }
//! ```

/// Function generating the JSON Schema of a node type's attributes
pub type SchemaGeneratorFn = fn() -> schemars::schema::RootSchema;

/// Metadata for a node type - registered via inventory
#[derive(Debug, Clone)]
pub struct NodeTypeMeta {
    /// Node type tag as used in definitions (e.g. "task", "for-each")
    pub id: &'static str,
    /// Display name for UI
    pub display_name: &'static str,
    /// Description of the node type
    pub description: &'static str,
    /// Category: "event", "control", "execution" or "container"
    pub category: &'static str,
    /// Whether nodes of this type own a sub-graph
    pub composite: bool,
    /// Function to generate JSON Schema for this node type's attributes
    pub schema_fn: SchemaGeneratorFn,
}

// Register NodeTypeMeta with inventory
inventory::collect!(&'static NodeTypeMeta);

/// Get all registered node type metadata
pub fn get_all_node_types() -> impl Iterator<Item = &'static NodeTypeMeta> {
    inventory::iter::<&'static NodeTypeMeta>
        .into_iter()
        .copied()
}

/// Find node type metadata by tag
pub fn find_node_type(id: &str) -> Option<&'static NodeTypeMeta> {
    get_all_node_types().find(|m| m.id == id)
}
