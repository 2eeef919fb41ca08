// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! Compilation metadata.
//!
//! Process-wide artifacts accumulated by every visitor during one
//! compilation pass. Requests for the same import, helper, work item or
//! signal collapse to one entry.

use std::collections::{BTreeMap, BTreeSet};

use canopy_dsl::{Node, ScopeId, VariableType};
use proc_macro2::{Ident, TokenStream};

/// Kind of a non-fatal finding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiagnosticKind {
    /// No generator is registered for the node's type tag; the node was skipped.
    UnsupportedNodeType,
    /// An expression opened with `#{` without closing `}`; it was truncated.
    MalformedExpressionDelimiter,
}

impl DiagnosticKind {
    /// Stable diagnostic code.
    pub fn code(&self) -> &'static str {
        match self {
            DiagnosticKind::UnsupportedNodeType => "W001",
            DiagnosticKind::MalformedExpressionDelimiter => "W002",
        }
    }
}

/// A non-fatal finding recorded in diagnostics mode.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    /// What was found.
    pub kind: DiagnosticKind,
    /// Unique id of the node concerned.
    pub node_id: String,
    /// Type tag of the node concerned.
    pub node_type: String,
    /// Human-readable detail.
    pub message: String,
}

impl Diagnostic {
    /// A node was skipped because its type tag has no generator.
    pub fn unsupported_node_type(node: &Node) -> Self {
        Self {
            kind: DiagnosticKind::UnsupportedNodeType,
            node_id: node.unique_id.clone(),
            node_type: node.node_type.clone(),
            message: format!(
                "no generator registered for type '{}', node skipped",
                node.node_type
            ),
        }
    }

    /// An expression lacked its closing delimiter and was truncated.
    pub fn malformed_delimiter(node: &Node, expression: &str) -> Self {
        Self {
            kind: DiagnosticKind::MalformedExpressionDelimiter,
            node_id: node.unique_id.clone(),
            node_type: node.node_type.clone(),
            message: format!(
                "expression '{}' lacks the closing '}}', last character dropped",
                expression
            ),
        }
    }
}

impl std::fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "[{}] Node '{}' (type '{}'): {}",
            self.kind.code(),
            self.node_id,
            self.node_type,
            self.message
        )
    }
}

/// A variable reference bound to the scope declaring it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedReference {
    /// Variable name.
    pub name: String,
    /// Scope the binding was found in.
    pub scope: ScopeId,
    /// Declared type.
    pub var_type: VariableType,
}

/// A bare expression with every variable it reads resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedExpression {
    /// Expression text without delimiters.
    pub text: String,
    /// Resolved references, in order of first use.
    pub references: Vec<ResolvedReference>,
}

impl ResolvedExpression {
    /// The resolution of `name`, if the expression reads it.
    pub fn reference(&self, name: &str) -> Option<&ResolvedReference> {
        self.references.iter().find(|r| r.name == name)
    }
}

/// Shared accumulator for one compilation pass.
#[derive(Debug, Clone, Default)]
pub struct CompilationMetadata {
    process_id: String,
    imports: BTreeSet<String>,
    helpers: BTreeMap<String, TokenStream>,
    work_items: BTreeSet<String>,
    signals: BTreeSet<String>,
    expressions: BTreeMap<(String, String), ResolvedExpression>,
    diagnostics: Vec<Diagnostic>,
    handles: BTreeSet<String>,
}

impl CompilationMetadata {
    /// Create empty metadata for process `process_id`.
    pub fn new(process_id: impl Into<String>) -> Self {
        Self {
            process_id: process_id.into(),
            ..Self::default()
        }
    }

    /// Reserve a builder handle, suffixing `_2`, `_3`, ... if `base` is taken.
    ///
    /// Sanitized ids can coincide (`"é"` and `"è"` both become `_`), so every
    /// handle in a program goes through here.
    pub fn claim_handle(&mut self, base: &Ident) -> Ident {
        let base_name = base.to_string();
        let mut name = base_name.clone();
        let mut n = 2;
        while !self.handles.insert(name.clone()) {
            name = format!("{}_{}", base_name, n);
            n += 1;
        }
        Ident::new(&name, base.span())
    }

    /// Id of the process being compiled.
    pub fn process_id(&self) -> &str {
        &self.process_id
    }

    /// Request an import; returns false if it was already requested.
    pub fn add_import(&mut self, path: impl Into<String>) -> bool {
        self.imports.insert(path.into())
    }

    /// Requested imports, sorted.
    pub fn imports(&self) -> impl Iterator<Item = &str> {
        self.imports.iter().map(String::as_str)
    }

    /// Declare a helper item; the first declaration under a name wins.
    pub fn add_helper(&mut self, name: &str, tokens: TokenStream) -> bool {
        if self.helpers.contains_key(name) {
            return false;
        }
        self.helpers.insert(name.to_string(), tokens);
        true
    }

    /// Returns true if a helper named `name` was declared.
    pub fn has_helper(&self, name: &str) -> bool {
        self.helpers.contains_key(name)
    }

    /// Declared helpers, sorted by name.
    pub fn helpers(&self) -> impl Iterator<Item = (&str, &TokenStream)> {
        self.helpers.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Record a work item handler the process needs.
    pub fn add_work_item(&mut self, name: &str) -> bool {
        self.work_items.insert(name.to_string())
    }

    /// Work item handlers the process needs, sorted.
    pub fn work_items(&self) -> impl Iterator<Item = &str> {
        self.work_items.iter().map(String::as_str)
    }

    /// Record a signal the process reacts to.
    pub fn add_signal(&mut self, name: &str) -> bool {
        self.signals.insert(name.to_string())
    }

    /// Signals the process reacts to, sorted.
    pub fn signals(&self) -> impl Iterator<Item = &str> {
        self.signals.iter().map(String::as_str)
    }

    /// Record the resolution of `attribute` on node `node_id`.
    pub fn record_expression(
        &mut self,
        node_id: &str,
        attribute: &str,
        expression: ResolvedExpression,
    ) {
        self.expressions
            .insert((node_id.to_string(), attribute.to_string()), expression);
    }

    /// The recorded resolution of `attribute` on node `node_id`.
    pub fn expression(&self, node_id: &str, attribute: &str) -> Option<&ResolvedExpression> {
        self.expressions
            .get(&(node_id.to_string(), attribute.to_string()))
    }

    /// Number of recorded expressions.
    pub fn expression_count(&self) -> usize {
        self.expressions.len()
    }

    /// Record a non-fatal finding.
    pub fn add_diagnostic(&mut self, diagnostic: Diagnostic) {
        self.diagnostics.push(diagnostic);
    }

    /// Recorded findings, in order.
    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }
}
