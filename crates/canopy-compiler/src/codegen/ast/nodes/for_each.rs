// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! For-each (multi-instance) node visitor.
//!
//! The children run once per element of `collection`. The collection
//! expression and the optional `output` variable belong to the enclosing
//! graph and resolve in the enclosing scope. The `item` variable holds the
//! current element and must be declared in the node's own scope, where the
//! children can see it.

use std::sync::Arc;

use proc_macro2::Ident;
use quote::quote;

use canopy_dsl::{BuiltinNodeType, ForEachAttributes, Node, ScopeRef};

use super::super::context::VisitContext;
use super::super::error::CompileError;
use super::super::instruction::Body;
use super::super::metadata::CompilationMetadata;
use super::super::registry::{VisitorRef, VisitorRegistration};
use super::super::visitor::{
    Composite, CompositeNodeVisitor, emit_node_header, expression_tokens, normalize_attribute,
    parse_attributes, require_variable, resolve_expression,
};
use super::require_non_empty;

/// Opens a `for_each_node` iterating over a collection.
#[derive(Debug, Clone, Copy, Default)]
pub struct ForEachVisitor;

impl CompositeNodeVisitor for ForEachVisitor {
    fn open_composite(
        &self,
        cx: &VisitContext<'_>,
        factory: &Ident,
        node: &Node,
        body: &mut Body,
        scope: ScopeRef<'_>,
        metadata: &mut CompilationMetadata,
    ) -> Result<Ident, CompileError> {
        let attrs: ForEachAttributes = parse_attributes(node)?;
        require_non_empty(node, "collection", &attrs.collection)?;
        let item = normalize_attribute(cx, node, "item", &attrs.item, metadata)?.trim();
        require_non_empty(node, "item", item)?;

        let own_scope = node
            .composite
            .as_ref()
            .map(|composite| cx.scope(composite.scope))
            .ok_or_else(|| CompileError::malformed(node, "composite node declares no child nodes"))?;
        if own_scope.local(item).is_none() {
            return Err(CompileError::malformed(
                node,
                format!(
                    "item variable '{}' must be declared in the node's own variables",
                    item
                ),
            ));
        }

        let collection =
            resolve_expression(cx, node, "collection", &attrs.collection, scope, metadata)?;
        let output = match &attrs.output {
            Some(output) => {
                let output = normalize_attribute(cx, node, "output", output, metadata)?.trim();
                require_non_empty(node, "output", output)?;
                Some(require_variable(node, output, scope)?.name)
            }
            None => None,
        };

        let (handle, header) = emit_node_header(
            cx,
            factory,
            node,
            "for_each_node",
            "ForEachNodeFactory",
            metadata,
        );
        let collection = expression_tokens(cx, &collection);
        let output = output.map(|name| quote! { #handle.output_collection(#name); });

        body.add_node(
            factory,
            node,
            quote! {
                #header
                #handle.collection_expression(#collection);
                #handle.variable_name(#item);
                #output
            },
        );
        Ok(handle)
    }
}

fn create_for_each_visitor() -> VisitorRef {
    Arc::new(Composite(ForEachVisitor))
}

static FOR_EACH_VISITOR: VisitorRegistration = VisitorRegistration {
    node_type: BuiltinNodeType::ForEach.tag(),
    create: create_for_each_visitor,
};

inventory::submit! { &FOR_EACH_VISITOR }
