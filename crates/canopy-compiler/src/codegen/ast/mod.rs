// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! AST-based code generation for process compilation.
//!
//! A pass seeds the traversal with the root graph and the root scope and
//! dispatches every node to the visitor registered for its type tag.
//! Composite visitors recurse into their children with their own scope. The
//! result is an ordered [`Body`] of build instructions plus the
//! [`CompilationMetadata`] gathered on the way, rendered into Rust source
//! with syn/quote instead of string templating.

pub mod context;
pub mod error;
pub mod expression;
pub mod instruction;
pub mod metadata;
pub mod nodes;
pub mod program;
pub mod registry;
pub mod visitor;

use proc_macro2::TokenStream;
use quote::quote;
use tracing::info;

use canopy_dsl::ProcessGraph;
use context::VisitContext;
use error::CompileError;
use instruction::Body;
use metadata::CompilationMetadata;
use registry::VisitorRegistry;

use crate::options::CompilerOptions;

/// Output of one traversal: the instructions and the metadata gathered.
#[derive(Debug, Clone)]
pub struct Generation {
    /// Build instructions in emission order.
    pub body: Body,
    /// Artifacts shared across visitors.
    pub metadata: CompilationMetadata,
}

/// Rendered program together with the traversal it was rendered from.
#[derive(Debug, Clone)]
pub struct CompiledProgram {
    /// Generated Rust source.
    pub source: String,
    /// Instructions and metadata behind the source.
    pub generation: Generation,
}

/// Traverse `graph` and collect its build instructions.
///
/// Root variables are declared first, then every node is visited in
/// depth-first pre-order, then the root connections are emitted.
///
/// # Errors
///
/// Returns the first `CompileError` raised by a visitor; partial output is
/// dropped.
pub fn generate(
    graph: &ProcessGraph,
    registry: &VisitorRegistry,
    options: &CompilerOptions,
) -> Result<Generation, CompileError> {
    info!(
        process_id = %graph.id,
        nodes = graph.node_count(),
        "Generating process build code"
    );

    let cx = VisitContext::new(registry, options, graph.scopes());
    let factory = VisitContext::root_factory();
    let root = graph.root_scope();
    let mut body = Body::new();
    let mut metadata = CompilationMetadata::new(&graph.id);

    visitor::emit_scope_variables(&cx, &factory, root, &mut body);
    visitor::visit_nodes(&cx, &factory, &graph.nodes, &mut body, root, &mut metadata)?;
    visitor::visit_connections(&factory, &graph.connections, &mut body);

    info!(
        process_id = %graph.id,
        instructions = body.len(),
        diagnostics = metadata.diagnostics().len(),
        "Generated process build code"
    );
    Ok(Generation { body, metadata })
}

/// Compile a process graph to Rust source code.
///
/// This is the main entry point for AST-based code generation.
///
/// # Errors
///
/// Returns `CompileError` if a visitor rejects a node.
pub fn compile(
    graph: &ProcessGraph,
    registry: &VisitorRegistry,
    options: &CompilerOptions,
) -> Result<CompiledProgram, CompileError> {
    let generation = generate(graph, registry, options)?;
    let runtime = VisitContext::runtime_ident(options);
    let tokens = program::emit_program(graph, &generation, &runtime);
    Ok(CompiledProgram {
        source: tokens.to_string(),
        generation,
    })
}

/// Convert a serde_json::Value to a TokenStream that constructs it.
///
/// Scalars become inline constructors. Arrays and objects are serialized at
/// codegen time and parsed when the generated code runs.
pub fn json_to_tokens(value: &serde_json::Value) -> TokenStream {
    match value {
        serde_json::Value::Null => {
            quote! { serde_json::Value::Null }
        }
        serde_json::Value::Bool(b) => {
            quote! { serde_json::Value::Bool(#b) }
        }
        serde_json::Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                quote! { serde_json::Value::Number(serde_json::Number::from(#i)) }
            } else if let Some(u) = n.as_u64() {
                quote! { serde_json::Value::Number(serde_json::Number::from(#u)) }
            } else if let Some(f) = n.as_f64() {
                quote! {
                    serde_json::Number::from_f64(#f)
                        .map(serde_json::Value::Number)
                        .unwrap_or(serde_json::Value::Null)
                }
            } else {
                quote! { serde_json::Value::Null }
            }
        }
        serde_json::Value::String(s) => {
            quote! { serde_json::Value::String(#s.to_string()) }
        }
        serde_json::Value::Array(_) | serde_json::Value::Object(_) => {
            let json_str = value.to_string();
            quote! {
                serde_json::from_str::<serde_json::Value>(#json_str)
                    .unwrap_or(serde_json::Value::Null)
            }
        }
    }
}


#[cfg(test)]
mod tests {
    use super::test_support::*;
    use super::*;
    use instruction::InstructionKind;
    use serde_json::json;

    fn nested_process() -> serde_json::Value {
        json!({
            "id": "orders",
            "name": "Orders",
            "variables": { "x": { "type": "number", "value": 1 } },
            "nodes": [
                { "id": "A", "type": "task", "attributes": { "expr": "#{x}" } },
                {
                    "id": "B",
                    "type": "sub",
                    "variables": { "y": { "type": "number" } },
                    "nodes": [
                        { "id": "C", "type": "task", "attributes": { "expr": "#{y}" } }
                    ]
                }
            ],
            "connections": [ { "from": "A", "to": "B" } ]
        })
    }

    #[test]
    fn test_nested_scopes_resolve_through_the_chain() {
        let graph = graph(nested_process());
        let generation =
            generate(&graph, VisitorRegistry::builtin(), &CompilerOptions::default()).unwrap();

        assert_eq!(generation.body.node_ids(), vec!["A", "B", "B:C"]);

        let root = graph.root_scope().id();
        let b_scope = graph.find("B").unwrap().composite.as_ref().unwrap().scope;
        let a = generation.metadata.expression("A", "expr").unwrap();
        assert_eq!(a.reference("x").unwrap().scope, root);
        let c = generation.metadata.expression("B:C", "expr").unwrap();
        assert_eq!(c.reference("y").unwrap().scope, b_scope);

        // C's scope still reaches the root binding.
        let c_scope = graph.scopes().get(b_scope);
        assert_eq!(c_scope.resolve("x").unwrap().0, root);
    }

    #[test]
    fn test_instruction_layout() {
        let generation = generate_default(nested_process()).unwrap();
        let kinds: Vec<&InstructionKind> = generation.body.iter().map(|i| &i.kind).collect();

        assert!(matches!(kinds[0], InstructionKind::Variable { name } if name == "x"));
        assert!(matches!(kinds[1], InstructionKind::Node { unique_id, .. } if unique_id == "A"));
        assert!(matches!(kinds[2], InstructionKind::Node { unique_id, .. } if unique_id == "B"));
        assert!(matches!(kinds[3], InstructionKind::Variable { name } if name == "y"));
        assert!(matches!(kinds[4], InstructionKind::Node { unique_id, .. } if unique_id == "B:C"));
        assert!(matches!(kinds[5], InstructionKind::Close { unique_id } if unique_id == "B"));
        assert!(matches!(kinds[6], InstructionKind::Connection { from, to } if from == "A" && to == "B"));
        assert_eq!(kinds.len(), 7);

        let child = generation.body.iter().nth(4).unwrap();
        assert_eq!(child.factory, "sub_B");
    }

    #[test]
    fn test_shadowing_resolves_nearest_binding() {
        let value = process(
            json!({ "x": { "type": "number" } }),
            json!([{
                "id": "B",
                "type": "sub",
                "variables": { "x": { "type": "string" } },
                "nodes": [ { "id": "C", "type": "task", "attributes": { "expr": "#{x}" } } ]
            }]),
        );
        let graph = graph(value);
        let generation =
            generate(&graph, VisitorRegistry::builtin(), &CompilerOptions::default()).unwrap();

        let x = generation.metadata.expression("B:C", "expr").unwrap();
        let x = x.reference("x").unwrap();
        assert_ne!(x.scope, graph.root_scope().id());
        assert_eq!(x.var_type, canopy_dsl::VariableType::String);
    }

    #[test]
    fn test_sibling_scope_is_not_visible() {
        let value = process(
            json!({}),
            json!([
                {
                    "id": "B1",
                    "type": "sub",
                    "variables": { "y": { "type": "number" } },
                    "nodes": [ { "id": "C", "type": "end" } ]
                },
                {
                    "id": "B2",
                    "type": "sub",
                    "nodes": [ { "id": "C", "type": "task", "attributes": { "expr": "#{y}" } } ]
                }
            ]),
        );
        let err = generate_default(value).unwrap_err();
        assert_eq!(err.node_id(), "B2:C");
        assert!(matches!(err, CompileError::ScopeResolutionFailure { .. }));
    }

    #[test]
    fn test_ids_sanitized_alike_get_distinct_handles() {
        let value = process(
            json!({}),
            json!([
                { "id": "é", "type": "sub", "nodes": [ { "id": "x", "type": "end" } ] },
                { "id": "è", "type": "sub", "nodes": [ { "id": "x", "type": "end" } ] }
            ]),
        );
        let generation = generate_default(value).unwrap();

        let factories: Vec<&str> = generation
            .body
            .iter()
            .filter(|i| matches!(i.kind, InstructionKind::Node { .. }))
            .map(|i| i.factory.as_str())
            .collect();
        assert_eq!(factories, vec!["factory", "sub__", "factory", "sub___2"]);
        assert!(generation.body.fragment("è").to_string().contains("let mut sub___2"));
    }

    #[test]
    fn test_cycles_terminate_and_emit_each_node_once() {
        let value = json!({
            "id": "loop",
            "nodes": [
                { "id": "A", "type": "start" },
                {
                    "id": "B",
                    "type": "sub",
                    "nodes": [
                        {
                            "id": "C",
                            "type": "sub",
                            "nodes": [ { "id": "D", "type": "end" } ]
                        }
                    ]
                },
                { "id": "E", "type": "end" }
            ],
            "connections": [
                { "from": "A", "to": "B" },
                { "from": "B", "to": "A", "label": "again" },
                { "from": "B", "to": "E" }
            ]
        });
        let generation = generate_default(value).unwrap();

        assert_eq!(generation.body.node_ids(), vec!["A", "B", "B:C", "B:C:D", "E"]);
        let connections = generation
            .body
            .iter()
            .filter(|i| matches!(i.kind, InstructionKind::Connection { .. }))
            .count();
        assert_eq!(connections, 3);
    }

    #[test]
    fn test_compile_renders_parseable_source() {
        let graph = graph(nested_process());
        let program =
            compile(&graph, VisitorRegistry::builtin(), &CompilerOptions::default()).unwrap();

        let file = syn::parse_file(&program.source).expect("generated source should parse");
        assert!(!file.items.is_empty());
        assert!(program.source.contains("create_process"));
        assert!(program.source.contains("canopy_runtime"));
    }

    #[test]
    fn test_json_to_tokens_scalars() {
        assert!(json_to_tokens(&json!(null)).to_string().contains("Null"));
        assert!(json_to_tokens(&json!(true)).to_string().contains("true"));
        assert!(json_to_tokens(&json!(42)).to_string().contains("42"));
        assert!(json_to_tokens(&json!("hello")).to_string().contains("hello"));
        assert!(json_to_tokens(&json!(1.5)).to_string().contains("from_f64"));
    }

    #[test]
    fn test_json_to_tokens_nested_values_parse_at_runtime() {
        let tokens = json_to_tokens(&json!({ "a": [1, 2] })).to_string();
        assert!(tokens.contains("from_str"));
        assert!(syn::parse_str::<syn::Expr>(&json_to_tokens(&json!([1, {"b": null}])).to_string()).is_ok());
    }
}
