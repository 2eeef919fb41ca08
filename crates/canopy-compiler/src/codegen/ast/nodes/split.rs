// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! Split (diverging gateway) node visitor.
//!
//! `xor` and `or` splits choose their outgoing branches with constraints,
//! one per target node, evaluated through the shared `eval_condition`
//! helper. `and` splits take every branch and accept no constraints.

use std::sync::Arc;

use proc_macro2::{Ident, TokenStream};
use quote::{format_ident, quote};

use canopy_dsl::{BuiltinNodeType, Node, ScopeRef, SplitAttributes, SplitKind};

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

/// Emits `split_node` with its kind and branch constraints.
#[derive(Debug, Clone, Copy, Default)]
pub struct SplitNodeVisitor;

impl NodeVisitor for SplitNodeVisitor {
    fn visit_node(
        &self,
        cx: &VisitContext<'_>,
        factory: &Ident,
        node: &Node,
        body: &mut Body,
        scope: ScopeRef<'_>,
        metadata: &mut CompilationMetadata,
    ) -> Result<(), CompileError> {
        let attrs: SplitAttributes = parse_attributes(node)?;
        if attrs.kind == SplitKind::And && !attrs.constraints.is_empty() {
            return Err(CompileError::malformed(
                node,
                "an 'and' split takes every branch and accepts no constraints",
            ));
        }

        let (handle, header) =
            emit_node_header(cx, factory, node, "split_node", "SplitFactory", metadata);
        let runtime = cx.runtime();
        let kind = format_ident!(
            "{}",
            match attrs.kind {
                SplitKind::Xor => "Xor",
                SplitKind::And => "And",
                SplitKind::Or => "Or",
            }
        );

        let mut constraints: Vec<TokenStream> = Vec::with_capacity(attrs.constraints.len());
        for constraint in &attrs.constraints {
            require_non_empty(node, "constraints.to", &constraint.to)?;
            let attribute = format!("constraints.{}", constraint.to);
            let expression =
                resolve_expression(cx, node, &attribute, &constraint.expr, scope, metadata)?;
            let expression = expression_tokens(cx, &expression);
            let to = &constraint.to;
            let priority = constraint.priority;
            let helper = format_ident!("{}", CONDITION_HELPER);
            constraints.push(quote! {
                #handle.constraint(#to, #priority, #expression, #helper);
            });
        }

        if attrs.kind != SplitKind::And {
            register_condition_helper(cx, metadata);
        }
        let done = emit_done(&handle);

        body.add_node(
            factory,
            node,
            quote! {
                #header
                #handle.kind(#runtime::SplitKind::#kind);
                #(#constraints)*
                #done
            },
        );
        Ok(())
    }
}

fn create_split_visitor() -> VisitorRef {
    Arc::new(SplitNodeVisitor)
}

static SPLIT_VISITOR: VisitorRegistration = VisitorRegistration {
    node_type: BuiltinNodeType::Split.tag(),
    create: create_split_visitor,
};

inventory::submit! { &SPLIT_VISITOR }
