// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! Process Definition Types - Single Source of Truth
//!
//! This crate defines the process model used throughout the codebase:
//! - Deserialization of process definition JSON
//! - The in-memory node graph with nested variable scopes (see [`graph`])
//! - Typed attributes of the built-in node types
//! - Node type metadata and JSON Schema generation via schemars

// Provide imports needed by schema_types.rs
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use thiserror::Error;

// Include the schema types
include!("schema_types.rs");

// Process graph construction
pub mod graph;

// Nested variable scopes
pub mod scope;

// Node type metadata for runtime introspection
pub mod node_meta;

// JSON Schema generation
pub mod schema;

// Node type metadata registration (auto-registers node types with inventory)
mod node_registration;

pub use graph::{CompositeBody, Connection, GraphError, Node, ProcessGraph};
pub use scope::{ScopeArena, ScopeId, ScopeRef, VariableScope};

// ============================================================================
// Errors
// ============================================================================

/// Errors raised while loading a process definition.
#[derive(Debug, Error)]
pub enum DslError {
    /// The definition is not valid JSON or does not match the schema.
    #[error("Failed to parse process definition: {0}")]
    Parse(#[from] serde_json::Error),

    /// The definition parsed but violates a structural invariant.
    #[error(transparent)]
    Graph(#[from] GraphError),
}

// ============================================================================
// Parsing Functions
// ============================================================================

/// Parse a process definition from a JSON value
pub fn parse_process_definition(json: &serde_json::Value) -> Result<ProcessDefinition, DslError> {
    Ok(ProcessDefinition::deserialize(json)?)
}

// ============================================================================
// Built-in Node Types
// ============================================================================

/// Node type tags understood out of the box.
///
/// Node types are open: any tag can appear in a definition and be handled by
/// a generator registered elsewhere. This enum only names the built-in ones.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, strum::EnumString, strum::EnumIter, strum::EnumCount,
)]
pub enum BuiltinNodeType {
    #[strum(serialize = "start")]
    Start,
    #[strum(serialize = "end")]
    End,
    #[strum(serialize = "task")]
    Task,
    #[strum(serialize = "work-item")]
    WorkItem,
    #[strum(serialize = "split")]
    Split,
    #[strum(serialize = "join")]
    Join,
    #[strum(serialize = "timer")]
    Timer,
    #[strum(serialize = "milestone")]
    Milestone,
    #[strum(serialize = "sub")]
    Sub,
    #[strum(serialize = "for-each")]
    ForEach,
    #[strum(serialize = "event-sub")]
    EventSub,
}

impl BuiltinNodeType {
    /// The tag used in process definitions.
    pub const fn tag(self) -> &'static str {
        match self {
            BuiltinNodeType::Start => "start",
            BuiltinNodeType::End => "end",
            BuiltinNodeType::Task => "task",
            BuiltinNodeType::WorkItem => "work-item",
            BuiltinNodeType::Split => "split",
            BuiltinNodeType::Join => "join",
            BuiltinNodeType::Timer => "timer",
            BuiltinNodeType::Milestone => "milestone",
            BuiltinNodeType::Sub => "sub",
            BuiltinNodeType::ForEach => "for-each",
            BuiltinNodeType::EventSub => "event-sub",
        }
    }

    /// Whether nodes of this type own a sub-graph.
    pub const fn is_composite(self) -> bool {
        matches!(
            self,
            BuiltinNodeType::Sub | BuiltinNodeType::ForEach | BuiltinNodeType::EventSub
        )
    }
}

impl std::fmt::Display for BuiltinNodeType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.tag())
    }
}

/// Metadata about a node type for documentation
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeTypeInfo {
    #[serde(rename = "type")]
    pub node_type: String,
    pub category: String,
    pub description: String,
    pub composite: bool,
}

/// Get metadata for all node types (collected via inventory)
pub fn get_node_types() -> Vec<NodeTypeInfo> {
    let mut types: Vec<NodeTypeInfo> = node_meta::get_all_node_types()
        .map(|meta| NodeTypeInfo {
            node_type: meta.id.to_string(),
            category: meta.category.to_string(),
            description: meta.description.to_string(),
            composite: meta.composite,
        })
        .collect();

    // Sort by node type for consistent ordering
    types.sort_by(|a, b| a.node_type.cmp(&b.node_type));

    types
}

// ============================================================================
// VariableType Helper Methods
// ============================================================================

impl VariableType {
    /// Get as string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            VariableType::String => "string",
            VariableType::Integer => "integer",
            VariableType::Number => "number",
            VariableType::Boolean => "boolean",
            VariableType::Array => "array",
            VariableType::Object => "object",
        }
    }
}

impl std::fmt::Display for VariableType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use strum::{EnumCount, IntoEnumIterator};

    #[test]
    fn test_builtin_tags_round_trip() {
        for ty in BuiltinNodeType::iter() {
            let parsed: BuiltinNodeType = ty.tag().parse().unwrap();
            assert_eq!(parsed, ty);
        }
        assert!("approval".parse::<BuiltinNodeType>().is_err());
    }

    #[test]
    fn test_every_builtin_type_has_metadata() {
        let types = get_node_types();
        assert_eq!(types.len(), BuiltinNodeType::COUNT);
        for ty in BuiltinNodeType::iter() {
            let meta = node_meta::find_node_type(ty.tag()).unwrap();
            assert_eq!(meta.composite, ty.is_composite(), "{}", ty);
        }
    }

    #[test]
    fn test_parse_process_definition() {
        let def = parse_process_definition(&json!({
            "id": "p",
            "variables": { "amount": { "type": "number", "value": 10 } },
            "nodes": [
                { "id": "s", "type": "start" },
                { "id": "t", "type": "task", "name": "Check", "attributes": { "expr": "#{amount}" } }
            ],
            "connections": [ { "from": "s", "to": "t" } ]
        }))
        .unwrap();

        assert_eq!(def.nodes.len(), 2);
        assert_eq!(def.variables["amount"].var_type, VariableType::Number);
        assert_eq!(def.variables["amount"].value, Some(json!(10)));
        assert_eq!(def.nodes[1].attributes["expr"], json!("#{amount}"));
        assert!(def.nodes[1].nodes.is_none());
    }

    #[test]
    fn test_attribute_defaults() {
        let end: EndAttributes = serde_json::from_value(json!({})).unwrap();
        assert!(end.terminate);

        let sub: SubProcessAttributes = serde_json::from_value(json!({})).unwrap();
        assert!(sub.auto_complete);

        let split: SplitAttributes =
            serde_json::from_value(json!({ "kind": "xor", "constraints": [ { "to": "a", "expr": "x > 1" } ] }))
                .unwrap();
        assert_eq!(split.kind, SplitKind::Xor);
        assert_eq!(split.constraints[0].priority, 0);
    }
}
