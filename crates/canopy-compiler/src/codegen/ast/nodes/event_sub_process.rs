// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! Event sub-process node visitor.

use std::sync::Arc;

use proc_macro2::Ident;
use quote::quote;

use canopy_dsl::{BuiltinNodeType, EventSubProcessAttributes, Node, ScopeRef};

use super::super::context::VisitContext;
use super::super::error::CompileError;
use super::super::instruction::Body;
use super::super::metadata::CompilationMetadata;
use super::super::registry::{VisitorRef, VisitorRegistration};
use super::super::visitor::{Composite, CompositeNodeVisitor, emit_node_header, parse_attributes};
use super::require_non_empty;

/// Opens an `event_sub_process_node` triggered by a signal.
#[derive(Debug, Clone, Copy, Default)]
pub struct EventSubProcessVisitor;

impl CompositeNodeVisitor for EventSubProcessVisitor {
    fn open_composite(
        &self,
        cx: &VisitContext<'_>,
        factory: &Ident,
        node: &Node,
        body: &mut Body,
        _scope: ScopeRef<'_>,
        metadata: &mut CompilationMetadata,
    ) -> Result<Ident, CompileError> {
        let attrs: EventSubProcessAttributes = parse_attributes(node)?;
        require_non_empty(node, "signal", &attrs.signal)?;
        metadata.add_signal(&attrs.signal);

        let (handle, header) = emit_node_header(
            cx,
            factory,
            node,
            "event_sub_process_node",
            "EventSubProcessNodeFactory",
            metadata,
        );
        let signal = &attrs.signal;

        body.add_node(
            factory,
            node,
            quote! {
                #header
                #handle.trigger(#signal);
            },
        );
        Ok(handle)
    }
}

fn create_event_sub_process_visitor() -> VisitorRef {
    Arc::new(Composite(EventSubProcessVisitor))
}

static EVENT_SUB_PROCESS_VISITOR: VisitorRegistration = VisitorRegistration {
    node_type: BuiltinNodeType::EventSub.tag(),
    create: create_event_sub_process_visitor,
};

inventory::submit! { &EVENT_SUB_PROCESS_VISITOR }
