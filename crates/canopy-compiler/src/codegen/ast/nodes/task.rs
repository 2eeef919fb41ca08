// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! Task node visitor.
//!
//! A task evaluates one expression. The expression may be written with or
//! without the `#{...}` delimiter; every variable it reads must be declared
//! in the scope chain. The optional `output` names the variable receiving
//! the result, which must resolve as well.

use std::sync::Arc;

use proc_macro2::Ident;
use quote::quote;

use canopy_dsl::{BuiltinNodeType, Node, ScopeRef, TaskAttributes};

use super::super::context::VisitContext;
use super::super::error::CompileError;
use super::super::instruction::Body;
use super::super::metadata::CompilationMetadata;
use super::super::registry::{VisitorRef, VisitorRegistration};
use super::super::visitor::{
    NodeVisitor, emit_done, emit_node_header, expression_tokens, normalize_attribute,
    parse_attributes, require_variable, resolve_expression,
};
use super::require_non_empty;

/// Emits `action_node` with the task's expression.
#[derive(Debug, Clone, Copy, Default)]
pub struct TaskNodeVisitor;

impl NodeVisitor for TaskNodeVisitor {
    fn visit_node(
        &self,
        cx: &VisitContext<'_>,
        factory: &Ident,
        node: &Node,
        body: &mut Body,
        scope: ScopeRef<'_>,
        metadata: &mut CompilationMetadata,
    ) -> Result<(), CompileError> {
        let attrs: TaskAttributes = parse_attributes(node)?;
        require_non_empty(node, "expr", &attrs.expr)?;

        let expression = resolve_expression(cx, node, "expr", &attrs.expr, scope, metadata)?;
        let output = match &attrs.output {
            Some(output) => {
                let output = normalize_attribute(cx, node, "output", output, metadata)?.trim();
                require_non_empty(node, "output", output)?;
                Some(require_variable(node, output, scope)?.name)
            }
            None => None,
        };

        let (handle, header) =
            emit_node_header(cx, factory, node, "action_node", "ActionNodeFactory", metadata);
        let action = expression_tokens(cx, &expression);
        let output = output.map(|name| quote! { #handle.output(#name); });
        let done = emit_done(&handle);

        body.add_node(
            factory,
            node,
            quote! {
                #header
                #handle.action(#action);
                #output
                #done
            },
        );
        Ok(())
    }
}

fn create_task_visitor() -> VisitorRef {
    Arc::new(TaskNodeVisitor)
}

static TASK_VISITOR: VisitorRegistration = VisitorRegistration {
    node_type: BuiltinNodeType::Task.tag(),
    create: create_task_visitor,
};

inventory::submit! { &TASK_VISITOR }
