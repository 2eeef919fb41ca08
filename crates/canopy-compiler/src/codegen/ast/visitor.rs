// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! Node visitor contract and composite recursion.
//!
//! A [`NodeVisitor`] turns one node into build instructions addressed at the
//! factory handle of the graph the node lives in. Composite node types
//! implement [`CompositeNodeVisitor`] instead and are registered wrapped in
//! [`Composite`], which takes care of the nested part:
//!
//! 1. the composite's own instructions ([`CompositeNodeVisitor::open_composite`])
//! 2. the variables of the composite's scope
//! 3. every child, in order, through the registry and with the child scope
//! 4. the sub-graph's connections
//! 5. the closing instruction ([`CompositeNodeVisitor::close_composite`])
//!
//! Traversal follows node ownership only. Connections, back-edges included,
//! are emitted as instructions and never followed, so every node is visited
//! exactly once.

use proc_macro2::{Ident, TokenStream};
use quote::{format_ident, quote};
use serde::de::DeserializeOwned;

use canopy_dsl::{Connection, Node, ScopeRef, VariableType};

use super::context::VisitContext;
use super::error::CompileError;
use super::expression;
use super::instruction::Body;
use super::json_to_tokens;
use super::metadata::{CompilationMetadata, Diagnostic, ResolvedExpression, ResolvedReference};

/// Name of the helper evaluating gateway and milestone conditions.
pub const CONDITION_HELPER: &str = "eval_condition";

/// Generates the construction code of one node type.
///
/// Implementations read the node and the enclosing scope and write only to
/// `body` and `metadata`. They are shared between threads through the
/// registry, so they must not keep per-compilation state.
pub trait NodeVisitor: Send + Sync {
    /// Append the instructions reconstructing `node` to `body`.
    ///
    /// `factory` is the handle of the graph `node` belongs to and `scope`
    /// the scope active in that graph.
    fn visit_node(
        &self,
        cx: &VisitContext<'_>,
        factory: &Ident,
        node: &Node,
        body: &mut Body,
        scope: ScopeRef<'_>,
        metadata: &mut CompilationMetadata,
    ) -> Result<(), CompileError>;
}

/// Generates the construction code of a node type owning a sub-graph.
pub trait CompositeNodeVisitor: Send + Sync {
    /// Emit the composite's own instructions and return the handle its
    /// children are addressed to.
    ///
    /// `scope` is the enclosing scope. The composite's own scope is
    /// available through `cx.scope(..)` on the node's body.
    fn open_composite(
        &self,
        cx: &VisitContext<'_>,
        factory: &Ident,
        node: &Node,
        body: &mut Body,
        scope: ScopeRef<'_>,
        metadata: &mut CompilationMetadata,
    ) -> Result<Ident, CompileError>;

    /// Emit the instruction completing the composite after its children.
    fn close_composite(&self, handle: &Ident, node: &Node, body: &mut Body) {
        body.add_close(handle, node, quote! { #handle.done(); });
    }
}

/// Adapts a [`CompositeNodeVisitor`] to the registry's [`NodeVisitor`] contract.
#[derive(Debug, Clone, Copy, Default)]
pub struct Composite<V>(pub V);

impl<V: CompositeNodeVisitor> NodeVisitor for Composite<V> {
    fn visit_node(
        &self,
        cx: &VisitContext<'_>,
        factory: &Ident,
        node: &Node,
        body: &mut Body,
        scope: ScopeRef<'_>,
        metadata: &mut CompilationMetadata,
    ) -> Result<(), CompileError> {
        let Some(composite) = node.composite.as_ref() else {
            return Err(CompileError::malformed(
                node,
                "composite node declares no child nodes",
            ));
        };

        let child_scope = cx.scope(composite.scope);
        if child_scope.parent_id() != Some(scope.id()) {
            return Err(CompileError::ScopeChainMismatch {
                node_id: node.unique_id.clone(),
                node_type: node.node_type.clone(),
            });
        }

        let handle = self
            .0
            .open_composite(cx, factory, node, body, scope, metadata)?;

        emit_scope_variables(cx, &handle, child_scope, body);
        visit_nodes(cx, &handle, &composite.nodes, body, child_scope, metadata)?;
        visit_connections(&handle, &composite.connections, body);

        self.0.close_composite(&handle, node, body);
        Ok(())
    }
}

/// Visit `nodes` in order with the visitor registered for each type tag.
///
/// Nodes whose tag has no visitor are skipped; with diagnostics on, the skip
/// is recorded. The first error aborts the walk.
pub fn visit_nodes(
    cx: &VisitContext<'_>,
    factory: &Ident,
    nodes: &[Node],
    body: &mut Body,
    scope: ScopeRef<'_>,
    metadata: &mut CompilationMetadata,
) -> Result<(), CompileError> {
    for node in nodes {
        match cx.registry.find_visitor(&node.node_type) {
            Some(visitor) => {
                tracing::debug!(
                    node_id = %node.unique_id,
                    node_type = %node.node_type,
                    scope = %scope.id(),
                    "Visiting node"
                );
                visitor.visit_node(cx, factory, node, body, scope, metadata)?;
            }
            None if cx.options.diagnostics => {
                tracing::warn!(
                    node_id = %node.unique_id,
                    node_type = %node.node_type,
                    "No generator registered for node type, node skipped"
                );
                metadata.add_diagnostic(Diagnostic::unsupported_node_type(node));
            }
            None => {
                tracing::debug!(
                    node_id = %node.unique_id,
                    node_type = %node.node_type,
                    "No generator registered for node type, node skipped"
                );
            }
        }
    }
    Ok(())
}

/// Emit one connection instruction per edge.
pub fn visit_connections(factory: &Ident, connections: &[Connection], body: &mut Body) {
    for connection in connections {
        let from = &connection.from;
        let to = &connection.to;
        let tokens = match &connection.label {
            Some(label) => quote! { #factory.connection_labeled(#from, #to, #label); },
            None => quote! { #factory.connection(#from, #to); },
        };
        body.add_connection(factory, connection, tokens);
    }
}

/// Emit a variable declaration for every binding of `scope`, on `handle`.
pub fn emit_scope_variables(
    cx: &VisitContext<'_>,
    handle: &Ident,
    scope: ScopeRef<'_>,
    body: &mut Body,
) {
    let runtime = cx.runtime();
    for (name, variable) in scope.variables() {
        let data_type = data_type_ident(variable.var_type);
        let default = match &variable.value {
            Some(value) => {
                let value = json_to_tokens(value);
                quote! { Some(#value) }
            }
            None => quote! { None },
        };
        body.add_variable(
            handle,
            name,
            quote! { #handle.variable(#name, #runtime::DataType::#data_type, #default); },
        );
    }
}

fn data_type_ident(var_type: VariableType) -> Ident {
    let name = match var_type {
        VariableType::String => "String",
        VariableType::Integer => "Integer",
        VariableType::Number => "Number",
        VariableType::Boolean => "Boolean",
        VariableType::Array => "Array",
        VariableType::Object => "Object",
    };
    format_ident!("{}", name)
}

/// Deserialize the attributes of `node` into its typed attribute struct.
pub fn parse_attributes<T: DeserializeOwned>(node: &Node) -> Result<T, CompileError> {
    serde_json::from_value(serde_json::Value::Object(node.attributes.clone()))
        .map_err(|e| CompileError::malformed(node, e.to_string()))
}

/// Emit the creation of the builder for `node` through `factory.<method>(id)`.
///
/// Returns the builder handle and the statements creating it, which also
/// attach the unique id and, when present, the display name. The factory
/// type is imported from the runtime crate's `nodes` module.
pub fn emit_node_header(
    cx: &VisitContext<'_>,
    factory: &Ident,
    node: &Node,
    method: &str,
    factory_type: &str,
    metadata: &mut CompilationMetadata,
) -> (Ident, TokenStream) {
    metadata.add_import(cx.runtime_path(&format!("nodes::{}", factory_type)));

    let handle = metadata.claim_handle(&VisitContext::node_ident(node));
    let method = format_ident!("{}", method);
    let factory_type = format_ident!("{}", factory_type);
    let id = &node.id;
    let unique_id = &node.unique_id;
    let name = node.name.as_ref().map(|name| quote! { #handle.name(#name); });

    let tokens = quote! {
        let mut #handle: #factory_type = #factory.#method(#id);
        #handle.metadata("UniqueId", #unique_id);
        #name
    };
    (handle, tokens)
}

/// The statement completing a plain node's builder.
pub fn emit_done(handle: &Ident) -> TokenStream {
    quote! { #handle.done(); }
}

/// Strip the `#{...}` delimiter from the value of `attribute`.
///
/// A missing closing delimiter is truncated silently, recorded in
/// diagnostics mode, and rejected in strict mode.
pub fn normalize_attribute<'r>(
    cx: &VisitContext<'_>,
    node: &Node,
    attribute: &str,
    raw: &'r str,
    metadata: &mut CompilationMetadata,
) -> Result<&'r str, CompileError> {
    if expression::is_malformed(raw) {
        if cx.options.strict_expressions {
            return Err(CompileError::MalformedExpressionDelimiter {
                node_id: node.unique_id.clone(),
                node_type: node.node_type.clone(),
                expression: raw.to_string(),
            });
        }
        if cx.options.diagnostics {
            tracing::warn!(
                node_id = %node.unique_id,
                attribute,
                expression = raw,
                "Expression lacks its closing delimiter, truncated"
            );
            metadata.add_diagnostic(Diagnostic::malformed_delimiter(node, raw));
        }
    }
    Ok(expression::strip_expression(raw))
}

/// Normalize the expression in `attribute` and resolve every variable it
/// reads against `scope`.
///
/// See [`normalize_attribute`] for delimiter handling. The resolution is
/// recorded in `metadata` under the node's unique id and `attribute`.
pub fn resolve_expression(
    cx: &VisitContext<'_>,
    node: &Node,
    attribute: &str,
    raw: &str,
    scope: ScopeRef<'_>,
    metadata: &mut CompilationMetadata,
) -> Result<ResolvedExpression, CompileError> {
    let text = normalize_attribute(cx, node, attribute, raw, metadata)?;
    let references = expression::variable_references(text)
        .into_iter()
        .map(|name| match scope.resolve(name) {
            Some((declared_in, variable)) => Ok(ResolvedReference {
                name: name.to_string(),
                scope: declared_in,
                var_type: variable.var_type,
            }),
            None => Err(CompileError::ScopeResolutionFailure {
                node_id: node.unique_id.clone(),
                node_type: node.node_type.clone(),
                variable: name.to_string(),
                expression: text.to_string(),
            }),
        })
        .collect::<Result<Vec<_>, _>>()?;

    let resolved = ResolvedExpression {
        text: text.to_string(),
        references,
    };
    metadata.record_expression(&node.unique_id, attribute, resolved.clone());
    Ok(resolved)
}

/// The runtime expression constructor for a resolved expression.
pub fn expression_tokens(cx: &VisitContext<'_>, expression: &ResolvedExpression) -> TokenStream {
    let runtime = cx.runtime();
    let text = &expression.text;
    let names = expression.references.iter().map(|r| r.name.as_str());
    quote! { #runtime::Expression::new(#text, &[#(#names),*]) }
}

/// Resolve a plain variable name, which must be declared in the scope chain.
pub fn require_variable(
    node: &Node,
    name: &str,
    scope: ScopeRef<'_>,
) -> Result<ResolvedReference, CompileError> {
    match scope.resolve(name) {
        Some((declared_in, variable)) => Ok(ResolvedReference {
            name: name.to_string(),
            scope: declared_in,
            var_type: variable.var_type,
        }),
        None => Err(CompileError::ScopeResolutionFailure {
            node_id: node.unique_id.clone(),
            node_type: node.node_type.clone(),
            variable: name.to_string(),
            expression: name.to_string(),
        }),
    }
}

/// Declare the condition evaluation helper once per program.
pub fn register_condition_helper(cx: &VisitContext<'_>, metadata: &mut CompilationMetadata) {
    if metadata.has_helper(CONDITION_HELPER) {
        return;
    }
    let runtime = cx.runtime();
    let name = format_ident!("{}", CONDITION_HELPER);
    metadata.add_helper(
        CONDITION_HELPER,
        quote! {
            fn #name(ctx: &#runtime::ProcessContext, expression: &#runtime::Expression) -> bool {
                ctx.evaluate(expression)
                    .ok()
                    .and_then(|value| value.as_bool())
                    .unwrap_or(false)
            }
        },
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codegen::ast::registry::VisitorRegistry;
    use crate::options::CompilerOptions;
    use canopy_dsl::{CompositeBody, ScopeArena, Variable};
    use std::collections::BTreeMap;
    use std::sync::{Arc, Mutex};

    /// Records the order of visits and the scope each node was visited with.
    #[derive(Clone, Default)]
    struct Recorder {
        visits: Arc<Mutex<Vec<(String, usize)>>>,
    }

    impl NodeVisitor for Recorder {
        fn visit_node(
            &self,
            _cx: &VisitContext<'_>,
            factory: &Ident,
            node: &Node,
            body: &mut Body,
            scope: ScopeRef<'_>,
            _metadata: &mut CompilationMetadata,
        ) -> Result<(), CompileError> {
            self.visits
                .lock()
                .unwrap()
                .push((node.unique_id.clone(), scope.id().index()));
            let id = &node.id;
            body.add_node(factory, node, quote! { #factory.leaf(#id); });
            Ok(())
        }
    }

    struct RecordingComposite(Recorder);

    impl CompositeNodeVisitor for RecordingComposite {
        fn open_composite(
            &self,
            cx: &VisitContext<'_>,
            factory: &Ident,
            node: &Node,
            body: &mut Body,
            scope: ScopeRef<'_>,
            metadata: &mut CompilationMetadata,
        ) -> Result<Ident, CompileError> {
            self.0.visit_node(cx, factory, node, body, scope, metadata)?;
            Ok(VisitContext::node_ident(node))
        }
    }

    struct Failing;

    impl NodeVisitor for Failing {
        fn visit_node(
            &self,
            _cx: &VisitContext<'_>,
            _factory: &Ident,
            node: &Node,
            _body: &mut Body,
            _scope: ScopeRef<'_>,
            _metadata: &mut CompilationMetadata,
        ) -> Result<(), CompileError> {
            Err(CompileError::malformed(node, "always fails"))
        }
    }

    fn leaf(parent: Option<&str>, id: &str, node_type: &str) -> Node {
        Node {
            id: id.to_string(),
            unique_id: parent.map_or(id.to_string(), |p| format!("{}:{}", p, id)),
            node_type: node_type.to_string(),
            name: None,
            attributes: serde_json::Map::new(),
            composite: None,
        }
    }

    fn composite(id: &str, nodes: Vec<Node>, scope: canopy_dsl::ScopeId) -> Node {
        Node {
            composite: Some(CompositeBody {
                nodes,
                connections: Vec::new(),
                scope,
            }),
            ..leaf(None, id, "group")
        }
    }

    fn registry(recorder: &Recorder) -> VisitorRegistry {
        let mut registry = VisitorRegistry::new();
        registry.register("leaf", recorder.clone());
        registry.register("group", Composite(RecordingComposite(recorder.clone())));
        registry
    }

    fn var(var_type: VariableType) -> Variable {
        Variable {
            var_type,
            value: None,
            description: None,
        }
    }

    #[test]
    fn test_composite_visits_children_in_pre_order_with_child_scope() {
        let recorder = Recorder::default();
        let registry = registry(&recorder);
        let options = CompilerOptions::default();

        let mut scopes = ScopeArena::new();
        let root = scopes.root(BTreeMap::new());
        let outer = scopes.child(root, BTreeMap::new());
        let inner = scopes.child(outer, BTreeMap::new());

        let nodes = vec![
            leaf(None, "A", "leaf"),
            composite(
                "B",
                vec![
                    leaf(Some("B"), "C", "leaf"),
                    Node {
                        unique_id: "B:D".to_string(),
                        ..composite("D", vec![leaf(Some("B:D"), "E", "leaf")], inner)
                    },
                    leaf(Some("B"), "F", "leaf"),
                ],
                outer,
            ),
            leaf(None, "G", "leaf"),
        ];

        let cx = VisitContext::new(&registry, &options, &scopes);
        let mut body = Body::new();
        let mut metadata = CompilationMetadata::new("p");
        visit_nodes(
            &cx,
            &VisitContext::root_factory(),
            &nodes,
            &mut body,
            scopes.get(root),
            &mut metadata,
        )
        .unwrap();

        let visits = recorder.visits.lock().unwrap().clone();
        let expected = vec![
            ("A".to_string(), root.index()),
            ("B".to_string(), root.index()),
            ("B:C".to_string(), outer.index()),
            ("B:D".to_string(), outer.index()),
            ("B:D:E".to_string(), inner.index()),
            ("B:F".to_string(), outer.index()),
            ("G".to_string(), root.index()),
        ];
        assert_eq!(visits, expected);
        assert_eq!(body.node_ids(), vec!["A", "B", "B:C", "B:D", "B:D:E", "B:F", "G"]);
    }

    #[test]
    fn test_unregistered_tag_is_skipped_and_siblings_emit() {
        let recorder = Recorder::default();
        let registry = registry(&recorder);
        let mut scopes = ScopeArena::new();
        let root = scopes.root(BTreeMap::new());
        let nodes = vec![
            leaf(None, "A", "leaf"),
            leaf(None, "X", "annotation"),
            leaf(None, "B", "leaf"),
        ];

        for diagnostics in [false, true] {
            let options = CompilerOptions::default().with_diagnostics(diagnostics);
            let cx = VisitContext::new(&registry, &options, &scopes);
            let mut body = Body::new();
            let mut metadata = CompilationMetadata::new("p");
            visit_nodes(
                &cx,
                &VisitContext::root_factory(),
                &nodes,
                &mut body,
                scopes.get(root),
                &mut metadata,
            )
            .unwrap();

            assert_eq!(body.node_ids(), vec!["A", "B"]);
            assert_eq!(metadata.diagnostics().len(), usize::from(diagnostics));
        }
    }

    #[test]
    fn test_child_failure_aborts_traversal() {
        let recorder = Recorder::default();
        let mut registry = registry(&recorder);
        registry.register("broken", Failing);
        let options = CompilerOptions::default();
        let mut scopes = ScopeArena::new();
        let root = scopes.root(BTreeMap::new());
        let group = scopes.child(root, BTreeMap::new());
        let nodes = vec![
            composite("B", vec![leaf(Some("B"), "C", "broken")], group),
            leaf(None, "Z", "leaf"),
        ];

        let cx = VisitContext::new(&registry, &options, &scopes);
        let mut body = Body::new();
        let mut metadata = CompilationMetadata::new("p");
        let err = visit_nodes(
            &cx,
            &VisitContext::root_factory(),
            &nodes,
            &mut body,
            scopes.get(root),
            &mut metadata,
        )
        .unwrap_err();

        assert_eq!(err.node_id(), "B:C");
        let visited: Vec<String> = recorder
            .visits
            .lock()
            .unwrap()
            .iter()
            .map(|(id, _)| id.clone())
            .collect();
        assert_eq!(visited, vec!["B"]);
    }

    #[test]
    fn test_composite_scope_must_be_nested_in_enclosing_scope() {
        let recorder = Recorder::default();
        let registry = registry(&recorder);
        let options = CompilerOptions::default();
        let mut scopes = ScopeArena::new();
        let root = scopes.root(BTreeMap::new());
        let other_root = scopes.root(BTreeMap::new());
        let foreign = scopes.child(other_root, BTreeMap::new());

        let cx = VisitContext::new(&registry, &options, &scopes);
        let mut body = Body::new();
        let mut metadata = CompilationMetadata::new("p");
        let err = visit_nodes(
            &cx,
            &VisitContext::root_factory(),
            &[composite("B", vec![], foreign)],
            &mut body,
            scopes.get(root),
            &mut metadata,
        )
        .unwrap_err();

        assert!(matches!(err, CompileError::ScopeChainMismatch { .. }));
        assert!(body.is_empty());
    }

    #[test]
    fn test_composite_without_body_is_malformed() {
        let recorder = Recorder::default();
        let registry = registry(&recorder);
        let options = CompilerOptions::default();
        let mut scopes = ScopeArena::new();
        let root = scopes.root(BTreeMap::new());

        let cx = VisitContext::new(&registry, &options, &scopes);
        let mut metadata = CompilationMetadata::new("p");
        let err = visit_nodes(
            &cx,
            &VisitContext::root_factory(),
            &[leaf(None, "B", "group")],
            &mut Body::new(),
            scopes.get(root),
            &mut metadata,
        )
        .unwrap_err();

        assert!(matches!(err, CompileError::MalformedAttribute { .. }));
    }

    #[test]
    fn test_resolve_expression_records_declaring_scope() {
        let registry = VisitorRegistry::new();
        let options = CompilerOptions::default();
        let mut scopes = ScopeArena::new();
        let root = scopes.root(BTreeMap::from([
            ("x".to_string(), var(VariableType::Number)),
            ("y".to_string(), var(VariableType::String)),
        ]));
        let child = scopes.child(
            root,
            BTreeMap::from([("y".to_string(), var(VariableType::Integer))]),
        );

        let cx = VisitContext::new(&registry, &options, &scopes);
        let node = leaf(Some("B"), "C", "task");
        let mut metadata = CompilationMetadata::new("p");
        let resolved = resolve_expression(
            &cx,
            &node,
            "expr",
            "#{x + y}",
            scopes.get(child),
            &mut metadata,
        )
        .unwrap();

        assert_eq!(resolved.text, "x + y");
        assert_eq!(resolved.reference("x").unwrap().scope, root);
        let y = resolved.reference("y").unwrap();
        assert_eq!((y.scope, y.var_type), (child, VariableType::Integer));
        assert_eq!(metadata.expression("B:C", "expr"), Some(&resolved));
    }

    #[test]
    fn test_resolve_expression_fails_on_undeclared_variable() {
        let registry = VisitorRegistry::new();
        let options = CompilerOptions::default();
        let mut scopes = ScopeArena::new();
        let root = scopes.root(BTreeMap::new());

        let cx = VisitContext::new(&registry, &options, &scopes);
        let node = leaf(None, "A", "task");
        let err = resolve_expression(
            &cx,
            &node,
            "expr",
            "#{z}",
            scopes.get(root),
            &mut CompilationMetadata::new("p"),
        )
        .unwrap_err();

        assert_eq!(
            err,
            CompileError::ScopeResolutionFailure {
                node_id: "A".to_string(),
                node_type: "task".to_string(),
                variable: "z".to_string(),
                expression: "z".to_string(),
            }
        );
    }

    #[test]
    fn test_malformed_delimiter_modes() {
        let registry = VisitorRegistry::new();
        let mut scopes = ScopeArena::new();
        let root = scopes.root(BTreeMap::from([(
            "amoun".to_string(),
            var(VariableType::Number),
        )]));
        let node = leaf(None, "A", "task");

        // Permissive: truncated silently.
        let options = CompilerOptions::default();
        let cx = VisitContext::new(&registry, &options, &scopes);
        let mut metadata = CompilationMetadata::new("p");
        let resolved =
            resolve_expression(&cx, &node, "expr", "#{amount", scopes.get(root), &mut metadata)
                .unwrap();
        assert_eq!(resolved.text, "amoun");
        assert!(metadata.diagnostics().is_empty());

        // Diagnostics: truncated and recorded.
        let options = CompilerOptions::default().with_diagnostics(true);
        let cx = VisitContext::new(&registry, &options, &scopes);
        let mut metadata = CompilationMetadata::new("p");
        resolve_expression(&cx, &node, "expr", "#{amount", scopes.get(root), &mut metadata)
            .unwrap();
        assert_eq!(metadata.diagnostics()[0].kind.code(), "W002");

        // Strict: fatal.
        let options = CompilerOptions::default().with_strict_expressions(true);
        let cx = VisitContext::new(&registry, &options, &scopes);
        let err = resolve_expression(
            &cx,
            &node,
            "expr",
            "#{amount",
            scopes.get(root),
            &mut CompilationMetadata::new("p"),
        )
        .unwrap_err();
        assert!(matches!(err, CompileError::MalformedExpressionDelimiter { .. }));
    }

    #[test]
    fn test_parse_attributes_reports_malformed() {
        let mut node = leaf(None, "T", "timer");
        node.attributes
            .insert("delay".to_string(), serde_json::json!(5));
        let err = parse_attributes::<canopy_dsl::TimerAttributes>(&node).unwrap_err();
        assert!(err.to_string().starts_with("[C001] Node 'T' (type 'timer')"));
    }

    #[test]
    fn test_condition_helper_registered_once() {
        let registry = VisitorRegistry::new();
        let options = CompilerOptions::default();
        let scopes = ScopeArena::new();
        let cx = VisitContext::new(&registry, &options, &scopes);
        let mut metadata = CompilationMetadata::new("p");

        register_condition_helper(&cx, &mut metadata);
        register_condition_helper(&cx, &mut metadata);
        assert_eq!(metadata.helpers().count(), 1);
    }
}
