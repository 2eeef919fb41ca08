// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! Start node visitor.

use std::sync::Arc;

use proc_macro2::Ident;
use quote::quote;

use canopy_dsl::{BuiltinNodeType, Node, ScopeRef, StartAttributes};

use super::super::context::VisitContext;
use super::super::error::CompileError;
use super::super::instruction::Body;
use super::super::metadata::CompilationMetadata;
use super::super::registry::{VisitorRef, VisitorRegistration};
use super::super::visitor::{NodeVisitor, emit_done, emit_node_header, parse_attributes};
use super::require_non_empty;

/// Emits `start_node`, with a trigger when the process starts on a signal.
#[derive(Debug, Clone, Copy, Default)]
pub struct StartNodeVisitor;

impl NodeVisitor for StartNodeVisitor {
    fn visit_node(
        &self,
        cx: &VisitContext<'_>,
        factory: &Ident,
        node: &Node,
        body: &mut Body,
        _scope: ScopeRef<'_>,
        metadata: &mut CompilationMetadata,
    ) -> Result<(), CompileError> {
        let attrs: StartAttributes = parse_attributes(node)?;
        if let Some(signal) = &attrs.signal {
            require_non_empty(node, "signal", signal)?;
        }

        let (handle, header) =
            emit_node_header(cx, factory, node, "start_node", "StartNodeFactory", metadata);
        let trigger = attrs.signal.as_ref().map(|signal| {
            metadata.add_signal(signal);
            quote! { #handle.trigger(#signal); }
        });
        let done = emit_done(&handle);

        body.add_node(factory, node, quote! { #header #trigger #done });
        Ok(())
    }
}

fn create_start_visitor() -> VisitorRef {
    Arc::new(StartNodeVisitor)
}

static START_VISITOR: VisitorRegistration = VisitorRegistration {
    node_type: BuiltinNodeType::Start.tag(),
    create: create_start_visitor,
};

inventory::submit! { &START_VISITOR }
