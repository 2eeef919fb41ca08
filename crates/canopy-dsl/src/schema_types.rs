// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
// Process Definition Types - Single Source of Truth
//
// These types define the process definition format and are used by:
// 1. Graph construction - deserializing process JSON into the node model
// 2. Node visitors - typed access to each built-in node's attributes
// 3. schema::dsl_schema - JSON Schema generation via schemars
//
// NOTE: This file is included by lib.rs via include!() macro, so it cannot
// have `use` statements or `//!` doc comments. Imports are provided by the
// including module.

/// DSL version - bump when making breaking changes
pub const DSL_VERSION: &str = "1.2.0";

// ============================================================================
// Root Types
// ============================================================================

/// Complete process definition
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProcessDefinition {
    /// Process identifier, used as the runtime process id
    pub id: String,

    /// Human-readable process name
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// Process version string
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,

    /// Process-level (global) variables. Keys are variable names.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub variables: BTreeMap<String, Variable>,

    /// Top-level nodes, in emission order
    #[serde(default)]
    pub nodes: Vec<NodeDefinition>,

    /// Control-flow connections between top-level nodes
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub connections: Vec<ConnectionDefinition>,
}

/// A single node of a process graph.
///
/// A node with a `nodes` array is a composite node: it owns an embedded
/// sub-graph and a variable scope nested in the enclosing one.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct NodeDefinition {
    /// Node identifier, unique among its siblings
    pub id: String,

    /// Node type tag (e.g. "task", "split", "sub"). Selects the generator.
    #[serde(rename = "type")]
    pub node_type: String,

    /// Human-readable node name
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// Type-specific attributes
    #[serde(default, skip_serializing_if = "serde_json::Map::is_empty")]
    pub attributes: serde_json::Map<String, serde_json::Value>,

    /// Variables declared in this composite node's own scope
    #[serde(skip_serializing_if = "Option::is_none")]
    pub variables: Option<BTreeMap<String, Variable>>,

    /// Child nodes of a composite node
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nodes: Option<Vec<NodeDefinition>>,

    /// Connections between the child nodes of a composite node
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub connections: Vec<ConnectionDefinition>,
}

/// A control-flow edge between two sibling nodes
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ConnectionDefinition {
    /// Source node ID
    pub from: String,

    /// Target node ID
    pub to: String,

    /// Optional connection label (e.g. a split branch name)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

// ============================================================================
// Variables
// ============================================================================

/// Data types for process variables.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[schemars(title = "VariableType")]
#[serde(rename_all = "lowercase")]
pub enum VariableType {
    /// String value
    String,
    /// Integer value
    Integer,
    /// Numeric value (floating point)
    Number,
    /// Boolean value
    Boolean,
    /// Array of values
    Array,
    /// JSON object
    Object,
}

/// A typed variable declaration.
///
/// Variables live in a scope: process-level variables in the root scope,
/// composite node variables in the composite's own scope.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[schemars(title = "Variable")]
pub struct Variable {
    /// Variable type
    #[serde(rename = "type")]
    pub var_type: VariableType,

    /// Initial value (must match the declared type)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<serde_json::Value>,

    /// Human-readable description
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

// ============================================================================
// Built-in Node Attributes
// ============================================================================

/// Attributes of a `start` node
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
#[schemars(title = "StartAttributes")]
#[serde(rename_all = "camelCase")]
pub struct StartAttributes {
    /// Signal that triggers the process (none = started explicitly)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub signal: Option<String>,
}

/// Attributes of an `end` node
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[schemars(title = "EndAttributes")]
#[serde(rename_all = "camelCase")]
pub struct EndAttributes {
    /// Whether reaching this node terminates the whole process instance
    #[serde(default = "default_true")]
    pub terminate: bool,
}

/// Attributes of a `task` (script action) node
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[schemars(title = "TaskAttributes")]
#[serde(rename_all = "camelCase")]
pub struct TaskAttributes {
    /// Expression evaluated when the task runs, with or without `#{}`
    pub expr: String,

    /// Variable receiving the expression result
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output: Option<String>,
}

/// Attributes of a `work-item` node
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[schemars(title = "WorkItemAttributes")]
#[serde(rename_all = "camelCase")]
pub struct WorkItemAttributes {
    /// Name of the work item handler executing this node
    pub work_name: String,

    /// Handler parameters. `#{...}` values are expressions, others literals.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub parameters: BTreeMap<String, String>,
}

/// Gateway semantics of a `split` node
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum SplitKind {
    /// Exactly one outgoing branch (first matching constraint)
    Xor,
    /// All outgoing branches
    And,
    /// Every branch whose constraint holds
    Or,
}

/// A branch constraint of a `split` node
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct SplitConstraint {
    /// Target sibling node ID
    pub to: String,

    /// Condition expression
    pub expr: String,

    /// Evaluation priority (lower first)
    #[serde(default)]
    pub priority: u32,
}

/// Attributes of a `split` node
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[schemars(title = "SplitAttributes")]
#[serde(rename_all = "camelCase")]
pub struct SplitAttributes {
    /// Gateway semantics
    pub kind: SplitKind,

    /// Branch constraints (ignored for `and`)
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub constraints: Vec<SplitConstraint>,
}

/// Synchronization semantics of a `join` node
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum JoinKind {
    /// Wait for all incoming branches
    And,
    /// Continue on the first incoming branch
    Xor,
    /// Continue on the first branch, discard the rest
    Discriminator,
}

/// Attributes of a `join` node
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[schemars(title = "JoinAttributes")]
#[serde(rename_all = "camelCase")]
pub struct JoinAttributes {
    /// Synchronization semantics
    pub kind: JoinKind,
}

/// Attributes of a `timer` node
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[schemars(title = "TimerAttributes")]
#[serde(rename_all = "camelCase")]
pub struct TimerAttributes {
    /// ISO-8601 duration literal (e.g. "PT5S") or a `#{...}` expression
    pub delay: String,
}

/// Attributes of a `milestone` node
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[schemars(title = "MilestoneAttributes")]
#[serde(rename_all = "camelCase")]
pub struct MilestoneAttributes {
    /// Completion condition expression
    pub condition: String,
}

/// Attributes of a `sub` (embedded sub-process) composite node
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[schemars(title = "SubProcessAttributes")]
#[serde(rename_all = "camelCase")]
pub struct SubProcessAttributes {
    /// Complete the sub-process when no child node is active
    #[serde(default = "default_true")]
    pub auto_complete: bool,
}

/// Attributes of a `for-each` composite node
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[schemars(title = "ForEachAttributes")]
#[serde(rename_all = "camelCase")]
pub struct ForEachAttributes {
    /// Collection expression, resolved in the enclosing scope
    pub collection: String,

    /// Iteration variable, declared in the node's own scope
    pub item: String,

    /// Variable collecting the per-iteration results
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output: Option<String>,
}

/// Attributes of an `event-sub` composite node
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[schemars(title = "EventSubProcessAttributes")]
#[serde(rename_all = "camelCase")]
pub struct EventSubProcessAttributes {
    /// Signal that starts the event sub-process
    pub signal: String,
}

fn default_true() -> bool {
    true
}
