// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! Milestone node visitor.

use std::sync::Arc;

use proc_macro2::Ident;
use quote::{format_ident, quote};

use canopy_dsl::{BuiltinNodeType, MilestoneAttributes, Node, ScopeRef};

use super::super::context::VisitContext;
use super::super::error::CompileError;
use super::super::instruction::Body;
use super::super::metadata::CompilationMetadata;
use super::super::registry::{VisitorRef, VisitorRegistration};
use super::super::visitor::{
    CONDITION_HELPER, NodeVisitor, emit_done, emit_node_header, expression_tokens,
    parse_attributes, register_condition_helper, resolve_expression,
};
use super::require_non_empty;

/// Emits `milestone_node`, reached once its condition holds.
#[derive(Debug, Clone, Copy, Default)]
pub struct MilestoneNodeVisitor;

impl NodeVisitor for MilestoneNodeVisitor {
    fn visit_node(
        &self,
        cx: &VisitContext<'_>,
        factory: &Ident,
        node: &Node,
        body: &mut Body,
        scope: ScopeRef<'_>,
        metadata: &mut CompilationMetadata,
    ) -> Result<(), CompileError> {
        let attrs: MilestoneAttributes = parse_attributes(node)?;
        require_non_empty(node, "condition", &attrs.condition)?;

        let condition =
            resolve_expression(cx, node, "condition", &attrs.condition, scope, metadata)?;
        register_condition_helper(cx, metadata);

        let (handle, header) = emit_node_header(
            cx,
            factory,
            node,
            "milestone_node",
            "MilestoneNodeFactory",
            metadata,
        );
        let condition = expression_tokens(cx, &condition);
        let helper = format_ident!("{}", CONDITION_HELPER);
        let done = emit_done(&handle);

        body.add_node(
            factory,
            node,
            quote! {
                #header
                #handle.condition(#condition, #helper);
                #done
            },
        );
        Ok(())
    }
}

fn create_milestone_visitor() -> VisitorRef {
    Arc::new(MilestoneNodeVisitor)
}

static MILESTONE_VISITOR: VisitorRegistration = VisitorRegistration {
    node_type: BuiltinNodeType::Milestone.tag(),
    create: create_milestone_visitor,
};

inventory::submit! { &MILESTONE_VISITOR }
