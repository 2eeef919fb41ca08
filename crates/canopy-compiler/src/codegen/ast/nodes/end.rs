// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! End node visitor.

use std::sync::Arc;

use proc_macro2::Ident;
use quote::quote;

use canopy_dsl::{BuiltinNodeType, EndAttributes, Node, ScopeRef};

use super::super::context::VisitContext;
use super::super::error::CompileError;
use super::super::instruction::Body;
use super::super::metadata::CompilationMetadata;
use super::super::registry::{VisitorRef, VisitorRegistration};
use super::super::visitor::{NodeVisitor, emit_done, emit_node_header, parse_attributes};

/// Emits `end_node` with its terminate flag.
#[derive(Debug, Clone, Copy, Default)]
pub struct EndNodeVisitor;

impl NodeVisitor for EndNodeVisitor {
    fn visit_node(
        &self,
        cx: &VisitContext<'_>,
        factory: &Ident,
        node: &Node,
        body: &mut Body,
        _scope: ScopeRef<'_>,
        metadata: &mut CompilationMetadata,
    ) -> Result<(), CompileError> {
        let attrs: EndAttributes = parse_attributes(node)?;
        let (handle, header) =
            emit_node_header(cx, factory, node, "end_node", "EndNodeFactory", metadata);
        let terminate = attrs.terminate;
        let done = emit_done(&handle);

        body.add_node(
            factory,
            node,
            quote! {
                #header
                #handle.terminate(#terminate);
                #done
            },
        );
        Ok(())
    }
}

fn create_end_visitor() -> VisitorRef {
    Arc::new(EndNodeVisitor)
}

static END_VISITOR: VisitorRegistration = VisitorRegistration {
    node_type: BuiltinNodeType::End.tag(),
    create: create_end_visitor,
};

inventory::submit! { &END_VISITOR }

#[cfg(test)]
mod tests {
    use super::super::super::test_support::*;
    use serde_json::json;

    #[test]
    fn test_end_terminates_by_default() {
        let generation =
            generate_default(process(json!({}), json!([{ "id": "E", "type": "end" }]))).unwrap();
        let code = generation.body.fragment("E").to_string();
        assert!(code.contains("factory . end_node (\"E\")"));
        assert!(code.contains("end_E . terminate (true)"));
    }

    #[test]
    fn test_end_without_termination() {
        let generation = generate_default(process(
            json!({}),
            json!([{ "id": "E", "type": "end", "attributes": { "terminate": false } }]),
        ))
        .unwrap();
        assert!(
            generation
                .body
                .fragment("E")
                .to_string()
                .contains("end_E . terminate (false)")
        );
    }

    #[test]
    fn test_non_boolean_terminate_is_malformed() {
        let err = generate_default(process(
            json!({}),
            json!([{ "id": "E", "type": "end", "attributes": { "terminate": "yes" } }]),
        ))
        .unwrap_err();
        assert!(err.to_string().starts_with("[C001] Node 'E' (type 'end')"));
    }
}
