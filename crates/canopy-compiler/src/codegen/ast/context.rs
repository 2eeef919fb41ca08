// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! Visit context for AST-based code generation.
//!
//! Holds what every visitor reads but never changes during a pass: the
//! registry, the options and the scope arena. Also provides identifier
//! generation utilities.

use proc_macro2::{Ident, Span};

use canopy_dsl::{Node, ScopeArena, ScopeId, ScopeRef};

use super::registry::VisitorRegistry;
use crate::options::CompilerOptions;

/// Name of the root process factory in generated code.
pub const ROOT_FACTORY: &str = "factory";

/// Read-only state shared by all visitors of one compilation pass.
#[derive(Debug, Clone, Copy)]
pub struct VisitContext<'a> {
    /// Generators by node type tag.
    pub registry: &'a VisitorRegistry,
    /// Options of this pass.
    pub options: &'a CompilerOptions,
    scopes: &'a ScopeArena,
}

impl<'a> VisitContext<'a> {
    /// Create a visit context.
    pub fn new(
        registry: &'a VisitorRegistry,
        options: &'a CompilerOptions,
        scopes: &'a ScopeArena,
    ) -> Self {
        Self {
            registry,
            options,
            scopes,
        }
    }

    /// Borrow a scope of the graph being compiled.
    pub fn scope(&self, id: ScopeId) -> ScopeRef<'a> {
        self.scopes.get(id)
    }

    /// The runtime crate as an identifier.
    pub fn runtime(&self) -> Ident {
        Self::runtime_ident(self.options)
    }

    /// The runtime crate configured in `options` as an identifier.
    pub fn runtime_ident(options: &CompilerOptions) -> Ident {
        Ident::new(
            &Self::sanitize_ident(&options.runtime_crate),
            Span::call_site(),
        )
    }

    /// A path inside the runtime crate, e.g. `canopy_runtime::nodes::TimerNodeFactory`.
    pub fn runtime_path(&self, path: &str) -> String {
        format!("{}::{}", self.runtime(), path)
    }

    /// The root factory handle.
    pub fn root_factory() -> Ident {
        Ident::new(ROOT_FACTORY, Span::call_site())
    }

    /// Sanitize a string to be a valid Rust identifier.
    /// Replaces invalid characters with underscores.
    pub fn sanitize_ident(s: &str) -> String {
        let mut result = String::with_capacity(s.len());
        for (i, c) in s.chars().enumerate() {
            if c.is_ascii_alphanumeric() || c == '_' {
                // First character cannot be a digit
                if i == 0 && c.is_ascii_digit() {
                    result.push('_');
                }
                result.push(c);
            } else {
                result.push('_');
            }
        }
        // Ensure we have at least one character
        if result.is_empty() {
            result.push_str("_empty");
        }
        result
    }

    /// The handle of the builder created for `node`.
    ///
    /// Derived from the type tag and the unique id. Sanitizing is lossy, so
    /// visitors reserve the final name with
    /// [`CompilationMetadata::claim_handle`](super::metadata::CompilationMetadata::claim_handle).
    pub fn node_ident(node: &Node) -> Ident {
        let name = format!(
            "{}_{}",
            Self::sanitize_ident(&node.node_type),
            Self::sanitize_ident(&node.unique_id)
        );
        Ident::new(&name, Span::call_site())
    }
}
