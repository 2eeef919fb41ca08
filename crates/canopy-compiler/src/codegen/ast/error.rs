// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! Code generation errors.
//!
//! Every error names the offending node by unique id and type tag so a
//! process author can find it in the source definition.

use canopy_dsl::Node;
use thiserror::Error;

/// Fatal errors that abort a compilation pass.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[allow(missing_docs)] // Fields are self-documenting from variant docs
pub enum CompileError {
    /// A node's attributes violate its type's schema.
    #[error("[C001] Node '{node_id}' (type '{node_type}'): malformed attribute: {reason}")]
    MalformedAttribute {
        node_id: String,
        node_type: String,
        reason: String,
    },

    /// An expression references a variable no scope in the chain declares.
    #[error(
        "[C002] Node '{node_id}' (type '{node_type}'): expression '{expression}' references undefined variable '{variable}'"
    )]
    ScopeResolutionFailure {
        node_id: String,
        node_type: String,
        variable: String,
        expression: String,
    },

    /// An expression opens with `#{` but does not close with `}`.
    #[error(
        "[C003] Node '{node_id}' (type '{node_type}'): expression '{expression}' opens with '#{{' but does not end with '}}'"
    )]
    MalformedExpressionDelimiter {
        node_id: String,
        node_type: String,
        expression: String,
    },

    /// A composite's own scope is not nested in the scope it is visited with.
    #[error(
        "[C004] Node '{node_id}' (type '{node_type}'): composite scope is not nested in the enclosing scope"
    )]
    ScopeChainMismatch { node_id: String, node_type: String },
}

impl CompileError {
    /// A [`CompileError::MalformedAttribute`] for `node`.
    pub fn malformed(node: &Node, reason: impl Into<String>) -> Self {
        CompileError::MalformedAttribute {
            node_id: node.unique_id.clone(),
            node_type: node.node_type.clone(),
            reason: reason.into(),
        }
    }

    /// Unique id of the node the error was raised for.
    pub fn node_id(&self) -> &str {
        match self {
            CompileError::MalformedAttribute { node_id, .. }
            | CompileError::ScopeResolutionFailure { node_id, .. }
            | CompileError::MalformedExpressionDelimiter { node_id, .. }
            | CompileError::ScopeChainMismatch { node_id, .. } => node_id,
        }
    }

    /// Type tag of the node the error was raised for.
    pub fn node_type(&self) -> &str {
        match self {
            CompileError::MalformedAttribute { node_type, .. }
            | CompileError::ScopeResolutionFailure { node_type, .. }
            | CompileError::MalformedExpressionDelimiter { node_type, .. }
            | CompileError::ScopeChainMismatch { node_type, .. } => node_type,
        }
    }
}
