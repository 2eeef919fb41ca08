// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! Build instructions and the body they are appended to.
//!
//! A [`BuildInstruction`] is one unit of generated code addressed at a
//! factory handle: the root process factory or the builder of an enclosing
//! composite node. Visitors only ever append to a [`Body`].

use proc_macro2::{Ident, TokenStream};
use quote::ToTokens;

use canopy_dsl::{Connection, Node};

/// What an instruction constructs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InstructionKind {
    /// Declares a variable in the handle's scope.
    Variable {
        /// Variable name.
        name: String,
    },
    /// Creates a node.
    Node {
        /// Unique id of the node.
        unique_id: String,
        /// Type tag of the node.
        node_type: String,
    },
    /// Connects two sibling nodes.
    Connection {
        /// Source node id.
        from: String,
        /// Target node id.
        to: String,
    },
    /// Completes a composite node after its children.
    Close {
        /// Unique id of the composite node.
        unique_id: String,
    },
}

/// One unit of generated construction code.
#[derive(Debug, Clone)]
pub struct BuildInstruction {
    /// What the instruction constructs.
    pub kind: InstructionKind,
    /// Factory handle the instruction is addressed to.
    pub factory: String,
    /// Generated statements.
    pub tokens: TokenStream,
}

/// Ordered sequence of build instructions.
#[derive(Debug, Clone, Default)]
pub struct Body {
    instructions: Vec<BuildInstruction>,
}

impl Body {
    /// Create an empty body.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an instruction.
    pub fn push(&mut self, instruction: BuildInstruction) {
        self.instructions.push(instruction);
    }

    /// Append the construction code of `node`.
    pub fn add_node(&mut self, factory: &Ident, node: &Node, tokens: TokenStream) {
        self.push(BuildInstruction {
            kind: InstructionKind::Node {
                unique_id: node.unique_id.clone(),
                node_type: node.node_type.clone(),
            },
            factory: factory.to_string(),
            tokens,
        });
    }

    /// Append a variable declaration.
    pub fn add_variable(&mut self, factory: &Ident, name: &str, tokens: TokenStream) {
        self.push(BuildInstruction {
            kind: InstructionKind::Variable {
                name: name.to_string(),
            },
            factory: factory.to_string(),
            tokens,
        });
    }

    /// Append a connection.
    pub fn add_connection(&mut self, factory: &Ident, connection: &Connection, tokens: TokenStream) {
        self.push(BuildInstruction {
            kind: InstructionKind::Connection {
                from: connection.from.clone(),
                to: connection.to.clone(),
            },
            factory: factory.to_string(),
            tokens,
        });
    }

    /// Append the completion of a composite node.
    pub fn add_close(&mut self, factory: &Ident, node: &Node, tokens: TokenStream) {
        self.push(BuildInstruction {
            kind: InstructionKind::Close {
                unique_id: node.unique_id.clone(),
            },
            factory: factory.to_string(),
            tokens,
        });
    }

    /// Number of instructions.
    pub fn len(&self) -> usize {
        self.instructions.len()
    }

    /// Returns true if nothing was emitted.
    pub fn is_empty(&self) -> bool {
        self.instructions.is_empty()
    }

    /// Iterate over the instructions in emission order.
    pub fn iter(&self) -> std::slice::Iter<'_, BuildInstruction> {
        self.instructions.iter()
    }

    /// Unique ids of the nodes created, in emission order.
    pub fn node_ids(&self) -> Vec<&str> {
        self.instructions
            .iter()
            .filter_map(|i| match &i.kind {
                InstructionKind::Node { unique_id, .. } => Some(unique_id.as_str()),
                _ => None,
            })
            .collect()
    }

    /// Position of the instruction creating the node `unique_id`.
    pub fn position(&self, unique_id: &str) -> Option<usize> {
        self.instructions.iter().position(
            |i| matches!(&i.kind, InstructionKind::Node { unique_id: id, .. } if id == unique_id),
        )
    }

    /// The generated code belonging to node `unique_id`: its creation and,
    /// for composites, its completion.
    pub fn fragment(&self, unique_id: &str) -> TokenStream {
        let mut tokens = TokenStream::new();
        for instruction in &self.instructions {
            let belongs = match &instruction.kind {
                InstructionKind::Node { unique_id: id, .. }
                | InstructionKind::Close { unique_id: id } => id == unique_id,
                _ => false,
            };
            if belongs {
                tokens.extend(instruction.tokens.clone());
            }
        }
        tokens
    }
}

impl<'a> IntoIterator for &'a Body {
    type Item = &'a BuildInstruction;
    type IntoIter = std::slice::Iter<'a, BuildInstruction>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl ToTokens for Body {
    fn to_tokens(&self, tokens: &mut TokenStream) {
        for instruction in &self.instructions {
            tokens.extend(instruction.tokens.clone());
        }
    }
}
