// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! Work item node visitor.
//!
//! Work items hand a unit of work to an external handler, selected by work
//! name. Parameter values written as `#{...}` are expressions evaluated
//! against the process variables; anything else is passed as a literal.

use std::sync::Arc;

use proc_macro2::{Ident, TokenStream};
use quote::quote;

use canopy_dsl::{BuiltinNodeType, Node, ScopeRef, WorkItemAttributes};

use super::super::context::VisitContext;
use super::super::error::CompileError;
use super::super::expression::is_expression;
use super::super::instruction::Body;
use super::super::metadata::CompilationMetadata;
use super::super::registry::{VisitorRef, VisitorRegistration};
use super::super::visitor::{
    NodeVisitor, emit_done, emit_node_header, expression_tokens, parse_attributes,
    resolve_expression,
};
use super::require_non_empty;

/// Emits `work_item_node` with its work name and parameters.
#[derive(Debug, Clone, Copy, Default)]
pub struct WorkItemNodeVisitor;

impl NodeVisitor for WorkItemNodeVisitor {
    fn visit_node(
        &self,
        cx: &VisitContext<'_>,
        factory: &Ident,
        node: &Node,
        body: &mut Body,
        scope: ScopeRef<'_>,
        metadata: &mut CompilationMetadata,
    ) -> Result<(), CompileError> {
        let attrs: WorkItemAttributes = parse_attributes(node)?;
        require_non_empty(node, "workName", &attrs.work_name)?;

        let (handle, header) = emit_node_header(
            cx,
            factory,
            node,
            "work_item_node",
            "WorkItemNodeFactory",
            metadata,
        );

        let mut parameters: Vec<TokenStream> = Vec::with_capacity(attrs.parameters.len());
        for (key, value) in &attrs.parameters {
            if is_expression(value) {
                let attribute = format!("parameters.{}", key);
                let expression = resolve_expression(cx, node, &attribute, value, scope, metadata)?;
                let expression = expression_tokens(cx, &expression);
                parameters.push(quote! { #handle.parameter_expression(#key, #expression); });
            } else {
                parameters.push(quote! { #handle.parameter(#key, #value); });
            }
        }

        metadata.add_work_item(&attrs.work_name);
        let work_name = &attrs.work_name;
        let done = emit_done(&handle);

        body.add_node(
            factory,
            node,
            quote! {
                #header
                #handle.work_name(#work_name);
                #(#parameters)*
                #done
            },
        );
        Ok(())
    }
}

fn create_work_item_visitor() -> VisitorRef {
    Arc::new(WorkItemNodeVisitor)
}

static WORK_ITEM_VISITOR: VisitorRegistration = VisitorRegistration {
    node_type: BuiltinNodeType::WorkItem.tag(),
    create: create_work_item_visitor,
};

inventory::submit! { &WORK_ITEM_VISITOR }
