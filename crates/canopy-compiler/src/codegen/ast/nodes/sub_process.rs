// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! Embedded sub-process node visitor.
//!
//! The simplest composite: a `composite_node` whose children run in the
//! node's own variable scope.

use std::sync::Arc;

use proc_macro2::Ident;
use quote::quote;

use canopy_dsl::{BuiltinNodeType, Node, ScopeRef, SubProcessAttributes};

use super::super::context::VisitContext;
use super::super::error::CompileError;
use super::super::instruction::Body;
use super::super::metadata::CompilationMetadata;
use super::super::registry::{VisitorRef, VisitorRegistration};
use super::super::visitor::{Composite, CompositeNodeVisitor, emit_node_header, parse_attributes};

/// Opens a `composite_node` for the embedded sub-process.
#[derive(Debug, Clone, Copy, Default)]
pub struct SubProcessVisitor;

impl CompositeNodeVisitor for SubProcessVisitor {
    fn open_composite(
        &self,
        cx: &VisitContext<'_>,
        factory: &Ident,
        node: &Node,
        body: &mut Body,
        _scope: ScopeRef<'_>,
        metadata: &mut CompilationMetadata,
    ) -> Result<Ident, CompileError> {
        let attrs: SubProcessAttributes = parse_attributes(node)?;
        let (handle, header) = emit_node_header(
            cx,
            factory,
            node,
            "composite_node",
            "CompositeContextNodeFactory",
            metadata,
        );
        let auto_complete = attrs.auto_complete;

        body.add_node(
            factory,
            node,
            quote! {
                #header
                #handle.auto_complete(#auto_complete);
            },
        );
        Ok(handle)
    }
}

fn create_sub_process_visitor() -> VisitorRef {
    Arc::new(Composite(SubProcessVisitor))
}

static SUB_PROCESS_VISITOR: VisitorRegistration = VisitorRegistration {
    node_type: BuiltinNodeType::Sub.tag(),
    create: create_sub_process_visitor,
};

inventory::submit! { &SUB_PROCESS_VISITOR }
