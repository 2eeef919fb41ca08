// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! Join (converging gateway) node visitor.

use std::sync::Arc;

use proc_macro2::Ident;
use quote::{format_ident, quote};

use canopy_dsl::{BuiltinNodeType, JoinAttributes, JoinKind, Node, ScopeRef};

use super::super::context::VisitContext;
use super::super::error::CompileError;
use super::super::instruction::Body;
use super::super::metadata::CompilationMetadata;
use super::super::registry::{VisitorRef, VisitorRegistration};
use super::super::visitor::{NodeVisitor, emit_done, emit_node_header, parse_attributes};

/// Emits `join_node` with its kind.
#[derive(Debug, Clone, Copy, Default)]
pub struct JoinNodeVisitor;

impl NodeVisitor for JoinNodeVisitor {
    fn visit_node(
        &self,
        cx: &VisitContext<'_>,
        factory: &Ident,
        node: &Node,
        body: &mut Body,
        _scope: ScopeRef<'_>,
        metadata: &mut CompilationMetadata,
    ) -> Result<(), CompileError> {
        let attrs: JoinAttributes = parse_attributes(node)?;
        let (handle, header) =
            emit_node_header(cx, factory, node, "join_node", "JoinFactory", metadata);
        let runtime = cx.runtime();
        let kind = format_ident!(
            "{}",
            match attrs.kind {
                JoinKind::And => "And",
                JoinKind::Xor => "Xor",
                JoinKind::Discriminator => "Discriminator",
            }
        );
        let done = emit_done(&handle);

        body.add_node(
            factory,
            node,
            quote! {
                #header
                #handle.kind(#runtime::JoinKind::#kind);
                #done
            },
        );
        Ok(())
    }
}

fn create_join_visitor() -> VisitorRef {
    Arc::new(JoinNodeVisitor)
}

static JOIN_VISITOR: VisitorRegistration = VisitorRegistration {
    node_type: BuiltinNodeType::Join.tag(),
    create: create_join_visitor,
};

inventory::submit! { &JOIN_VISITOR }
