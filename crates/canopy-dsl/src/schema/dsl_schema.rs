// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! DSL Schema Generation
//!
//! Generates JSON Schema for process definitions from the Rust type
//! definitions, plus the attribute schema of every registered node type.

use schemars::schema_for;
use serde_json::{Value, json};

use crate::node_meta::{self, NodeTypeMeta};
use crate::{DSL_VERSION, JoinKind, ProcessDefinition, SplitKind};

fn node_type_entry(meta: &NodeTypeMeta) -> Value {
    let attributes_schema = (meta.schema_fn)();
    json!({
        "type": meta.id,
        "displayName": meta.display_name,
        "description": meta.description,
        "category": meta.category,
        "composite": meta.composite,
        "schema": serde_json::to_value(&attributes_schema).unwrap_or(Value::Null)
    })
}

/// Generate the complete DSL schema with node type metadata
pub fn generate_dsl_schema() -> Value {
    let schema = schema_for!(ProcessDefinition);
    let mut schema_json = serde_json::to_value(&schema).unwrap_or(Value::Null);

    // SplitKind and JoinKind only appear inside attribute schemas, expose
    // them alongside the root definitions for schema consumers
    if let Value::Object(ref mut map) = schema_json
        && let Some(Value::Object(definitions)) = map.get_mut("definitions")
    {
        for (name, kind_schema) in [
            ("SplitKind", schema_for!(SplitKind)),
            ("JoinKind", schema_for!(JoinKind)),
        ] {
            definitions.insert(
                name.to_string(),
                serde_json::to_value(&kind_schema.schema).unwrap_or(Value::Null),
            );
        }
    }

    let mut node_types: Vec<Value> = node_meta::get_all_node_types()
        .map(node_type_entry)
        .collect();

    // Sort by type tag for consistent ordering
    node_types.sort_by(|a, b| {
        let a_type = a.get("type").and_then(|v| v.as_str()).unwrap_or("");
        let b_type = b.get("type").and_then(|v| v.as_str()).unwrap_or("");
        a_type.cmp(b_type)
    });

    if let Value::Object(ref mut map) = schema_json {
        map.insert("x-node-types".to_string(), Value::Array(node_types));
        map.insert(
            "x-dsl-version".to_string(),
            Value::String(DSL_VERSION.to_string()),
        );
    }

    schema_json
}

/// Get the schema entry for a specific node type tag
pub fn get_node_type_schema(node_type: &str) -> Option<Value> {
    node_meta::find_node_type(node_type).map(node_type_entry)
}
