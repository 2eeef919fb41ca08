// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! In-memory process graph.
//!
//! [`ProcessGraph::from_definition`] turns a [`ProcessDefinition`] into the
//! node tree consumed by the compiler. Construction enforces the structural
//! invariants the compiler relies on:
//! - node ids are non-empty, unique among siblings and free of the
//!   [`UNIQUE_ID_SEPARATOR`], so unique ids are unique across the whole tree
//! - connections only join siblings of the same graph
//! - every composite node owns exactly one scope, nested in the scope that
//!   was active where the composite was declared

use std::collections::{BTreeMap, HashSet};

use thiserror::Error;

use crate::scope::{ScopeArena, ScopeId, ScopeRef};
use crate::{BuiltinNodeType, ConnectionDefinition, NodeDefinition, ProcessDefinition, Variable};

/// Separator between the ids that make up a node's unique id.
pub const UNIQUE_ID_SEPARATOR: char = ':';

/// Errors raised while constructing a [`ProcessGraph`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GraphError {
    /// A node has an empty id.
    #[error("[G001] Node in graph '{graph}' has an empty id")]
    EmptyNodeId { graph: String },

    /// Two siblings share an id.
    #[error("[G002] Duplicate node id '{node_id}' in graph '{graph}'")]
    DuplicateNodeId { graph: String, node_id: String },

    /// A connection references a node that is not a sibling.
    #[error(
        "[G003] Connection {from} -> {to} in graph '{graph}' references unknown node '{missing}'"
    )]
    UnknownConnectionEndpoint {
        graph: String,
        from: String,
        to: String,
        missing: String,
    },

    /// A node declares variables but no sub-graph to scope them.
    #[error(
        "[G004] Node '{node_id}' (type '{node_type}') declares variables but has no child nodes"
    )]
    VariablesWithoutSubgraph { node_id: String, node_type: String },

    /// A node id contains the unique id separator.
    #[error("[G005] Node id '{node_id}' in graph '{graph}' contains reserved separator ':'")]
    ReservedSeparator { graph: String, node_id: String },
}

/// A control-flow edge between two siblings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Connection {
    /// Source node id.
    pub from: String,
    /// Target node id.
    pub to: String,
    /// Optional label.
    pub label: Option<String>,
}

impl From<&ConnectionDefinition> for Connection {
    fn from(def: &ConnectionDefinition) -> Self {
        Self {
            from: def.from.clone(),
            to: def.to.clone(),
            label: def.label.clone(),
        }
    }
}

/// The embedded sub-graph of a composite node.
#[derive(Debug, Clone)]
pub struct CompositeBody {
    /// Child nodes in declaration order.
    pub nodes: Vec<Node>,
    /// Connections between the child nodes.
    pub connections: Vec<Connection>,
    /// The composite's own scope.
    pub scope: ScopeId,
}

/// A node of the process graph.
#[derive(Debug, Clone)]
pub struct Node {
    /// Id, unique among siblings.
    pub id: String,
    /// Ids from the root down to this node, joined by [`UNIQUE_ID_SEPARATOR`].
    pub unique_id: String,
    /// Type tag selecting the generator.
    pub node_type: String,
    /// Display name.
    pub name: Option<String>,
    /// Type-specific attributes.
    pub attributes: serde_json::Map<String, serde_json::Value>,
    /// Sub-graph, present for composite nodes only.
    pub composite: Option<CompositeBody>,
}

impl Node {
    /// Returns true if this node owns a sub-graph.
    pub fn is_composite(&self) -> bool {
        self.composite.is_some()
    }

    /// The built-in node type matching this node's tag, if any.
    pub fn builtin_type(&self) -> Option<BuiltinNodeType> {
        self.node_type.parse().ok()
    }

    /// Child nodes (empty for plain nodes).
    pub fn children(&self) -> &[Node] {
        self.composite
            .as_ref()
            .map(|c| c.nodes.as_slice())
            .unwrap_or_default()
    }

    /// Number of nodes in the subtree rooted at this node, itself included.
    pub fn subtree_len(&self) -> usize {
        1 + self.children().iter().map(Node::subtree_len).sum::<usize>()
    }
}

/// A fully constructed process graph.
#[derive(Debug, Clone)]
pub struct ProcessGraph {
    /// Process id.
    pub id: String,
    /// Process name.
    pub name: Option<String>,
    /// Process version.
    pub version: Option<String>,
    /// Top-level nodes.
    pub nodes: Vec<Node>,
    /// Connections between top-level nodes.
    pub connections: Vec<Connection>,
    scopes: ScopeArena,
    root_scope: ScopeId,
}

impl ProcessGraph {
    /// Build the graph described by `definition`.
    pub fn from_definition(definition: &ProcessDefinition) -> Result<Self, GraphError> {
        let mut scopes = ScopeArena::new();
        let root_scope = scopes.root(definition.variables.clone());

        let mut builder = GraphBuilder {
            scopes: &mut scopes,
        };
        let nodes = builder.build_nodes(&definition.id, None, &definition.nodes, root_scope)?;
        let connections = build_connections(&definition.id, &nodes, &definition.connections)?;

        Ok(Self {
            id: definition.id.clone(),
            name: definition.name.clone(),
            version: definition.version.clone(),
            nodes,
            connections,
            scopes,
            root_scope,
        })
    }

    /// Parse a JSON process definition and build its graph.
    pub fn from_json(json: &str) -> Result<Self, crate::DslError> {
        let definition: ProcessDefinition = serde_json::from_str(json)?;
        Ok(Self::from_definition(&definition)?)
    }

    /// All scopes of this graph.
    pub fn scopes(&self) -> &ScopeArena {
        &self.scopes
    }

    /// The process-level scope.
    pub fn root_scope(&self) -> ScopeRef<'_> {
        self.scopes.get(self.root_scope)
    }

    /// Total number of nodes, nested ones included.
    pub fn node_count(&self) -> usize {
        self.nodes.iter().map(Node::subtree_len).sum()
    }

    /// Find a node by its unique id (e.g. `"B:C"`).
    pub fn find(&self, unique_id: &str) -> Option<&Node> {
        let mut nodes = self.nodes.as_slice();
        let mut found = None;
        for id in unique_id.split(UNIQUE_ID_SEPARATOR) {
            let node = nodes.iter().find(|n| n.id == id)?;
            nodes = node.children();
            found = Some(node);
        }
        found
    }
}

struct GraphBuilder<'a> {
    scopes: &'a mut ScopeArena,
}

impl GraphBuilder<'_> {
    fn build_nodes(
        &mut self,
        graph: &str,
        parent_unique_id: Option<&str>,
        definitions: &[NodeDefinition],
        scope: ScopeId,
    ) -> Result<Vec<Node>, GraphError> {
        let mut seen = HashSet::new();
        let mut nodes = Vec::with_capacity(definitions.len());

        for def in definitions {
            if def.id.is_empty() {
                return Err(GraphError::EmptyNodeId {
                    graph: graph.to_string(),
                });
            }
            if def.id.contains(UNIQUE_ID_SEPARATOR) {
                return Err(GraphError::ReservedSeparator {
                    graph: graph.to_string(),
                    node_id: def.id.clone(),
                });
            }
            if !seen.insert(def.id.as_str()) {
                return Err(GraphError::DuplicateNodeId {
                    graph: graph.to_string(),
                    node_id: def.id.clone(),
                });
            }

            let unique_id = match parent_unique_id {
                Some(parent) => format!("{}{}{}", parent, UNIQUE_ID_SEPARATOR, def.id),
                None => def.id.clone(),
            };

            let composite = match &def.nodes {
                Some(children) => Some(self.build_composite(def, &unique_id, children, scope)?),
                None if def.variables.as_ref().is_some_and(|v| !v.is_empty()) => {
                    return Err(GraphError::VariablesWithoutSubgraph {
                        node_id: unique_id,
                        node_type: def.node_type.clone(),
                    });
                }
                None => None,
            };

            nodes.push(Node {
                id: def.id.clone(),
                unique_id,
                node_type: def.node_type.clone(),
                name: def.name.clone(),
                attributes: def.attributes.clone(),
                composite,
            });
        }

        Ok(nodes)
    }

    fn build_composite(
        &mut self,
        def: &NodeDefinition,
        unique_id: &str,
        children: &[NodeDefinition],
        enclosing: ScopeId,
    ) -> Result<CompositeBody, GraphError> {
        let variables: BTreeMap<String, Variable> = def.variables.clone().unwrap_or_default();
        let scope = self.scopes.child(enclosing, variables);
        let nodes = self.build_nodes(unique_id, Some(unique_id), children, scope)?;
        let connections = build_connections(unique_id, &nodes, &def.connections)?;
        Ok(CompositeBody {
            nodes,
            connections,
            scope,
        })
    }
}

fn build_connections(
    graph: &str,
    nodes: &[Node],
    definitions: &[ConnectionDefinition],
) -> Result<Vec<Connection>, GraphError> {
    let ids: HashSet<&str> = nodes.iter().map(|n| n.id.as_str()).collect();
    definitions
        .iter()
        .map(|def| {
            for endpoint in [&def.from, &def.to] {
                if !ids.contains(endpoint.as_str()) {
                    return Err(GraphError::UnknownConnectionEndpoint {
                        graph: graph.to_string(),
                        from: def.from.clone(),
                        to: def.to.clone(),
                        missing: endpoint.clone(),
                    });
                }
            }
            Ok(Connection::from(def))
        })
        .collect()
}
