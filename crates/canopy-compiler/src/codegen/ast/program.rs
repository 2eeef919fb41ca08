// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! Program assembly for AST-based code generation.
//!
//! Wraps the build instructions of one pass into a self-contained Rust
//! module: the runtime prelude, the node factory imports requested by the
//! visitors, the shared helpers, and a `create_process` function replaying
//! every instruction against a fresh `ProcessFactory`.

use proc_macro2::{Ident, Span, TokenStream};
use quote::quote;

use super::Generation;
use canopy_dsl::ProcessGraph;

/// Emit the complete program for `graph`.
pub fn emit_program(graph: &ProcessGraph, generation: &Generation, runtime: &Ident) -> TokenStream {
    let imports = emit_imports(generation, runtime);
    let helpers = emit_helpers(generation);
    let create_process = emit_create_process(graph, generation);

    quote! {
        #imports
        #helpers
        #create_process
    }
}

/// Emit the prelude and one `use` per requested import.
///
/// Imports are recorded as `::`-separated paths; a path that is not a
/// sequence of identifiers is skipped.
fn emit_imports(generation: &Generation, runtime: &Ident) -> TokenStream {
    let imports: Vec<TokenStream> = generation
        .metadata
        .imports()
        .filter_map(|path| {
            let segments: Vec<Ident> = path
                .split("::")
                .map(path_segment)
                .collect::<Option<_>>()?;
            Some(quote! {
                #[allow(unused_imports)]
                use #(#segments)::*;
            })
        })
        .collect();

    quote! {
        use #runtime::prelude::*;
        #(#imports)*
    }
}

fn path_segment(segment: &str) -> Option<Ident> {
    let mut chars = segment.chars();
    let first = chars.next()?;
    if !(first.is_ascii_alphabetic() || first == '_') {
        return None;
    }
    if !chars.all(|c| c.is_ascii_alphanumeric() || c == '_') {
        return None;
    }
    Some(Ident::new(segment, Span::call_site()))
}

/// Emit the helper items, one per name.
fn emit_helpers(generation: &Generation) -> TokenStream {
    let helpers = generation.metadata.helpers().map(|(_, tokens)| tokens);
    quote! { #(#helpers)* }
}

/// Emit `create_process`, which builds and validates the process.
fn emit_create_process(graph: &ProcessGraph, generation: &Generation) -> TokenStream {
    let id = &graph.id;
    let name = graph.name.as_ref().map(|name| quote! { factory.name(#name); });
    let version = graph
        .version
        .as_ref()
        .map(|version| quote! { factory.version(#version); });
    let body = &generation.body;

    quote! {
        /// Build the process definition.
        pub fn create_process() -> Process {
            let mut factory = ProcessFactory::new(#id);
            #name
            #version
            #body
            factory.validate().build()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::*;
    use super::*;
    use serde_json::json;

    fn runtime() -> Ident {
        Ident::new("canopy_runtime", Span::call_site())
    }

    fn render(value: serde_json::Value) -> String {
        let graph = graph(value.clone());
        let generation = generate_default(value).unwrap();
        emit_program(&graph, &generation, &runtime()).to_string()
    }

    #[test]
    fn test_program_structure() {
        let code = render(json!({
            "id": "orders",
            "name": "Orders",
            "version": "2.0",
            "nodes": [
                { "id": "S", "type": "start" },
                { "id": "E", "type": "end" }
            ],
            "connections": [ { "from": "S", "to": "E" } ]
        }));

        assert!(code.contains("use canopy_runtime :: prelude :: * ;"));
        assert!(code.contains("use canopy_runtime :: nodes :: StartNodeFactory ;"));
        assert!(code.contains("use canopy_runtime :: nodes :: EndNodeFactory ;"));
        assert!(code.contains("pub fn create_process () -> Process"));
        assert!(code.contains("ProcessFactory :: new (\"orders\")"));
        assert!(code.contains("factory . name (\"Orders\")"));
        assert!(code.contains("factory . version (\"2.0\")"));
        assert!(code.contains("factory . connection (\"S\" , \"E\")"));
        assert!(code.contains("factory . validate () . build ()"));

        let start = code.find("start_node").unwrap();
        let end = code.find("end_node").unwrap();
        let connection = code.find("connection (").unwrap();
        assert!(start < end && end < connection);
    }

    #[test]
    fn test_program_without_name_or_version() {
        let code = render(json!({ "id": "bare", "nodes": [] }));
        assert!(!code.contains("factory . name"));
        assert!(!code.contains("factory . version"));
        assert!(syn::parse_file(&code).is_ok());
    }

    #[test]
    fn test_helpers_emitted_once() {
        let code = render(json!({
            "id": "gates",
            "variables": { "ok": { "type": "boolean" } },
            "nodes": [
                { "id": "M1", "type": "milestone", "attributes": { "condition": "#{ok}" } },
                { "id": "M2", "type": "milestone", "attributes": { "condition": "#{!ok}" } }
            ]
        }));
        assert_eq!(code.matches("fn eval_condition").count(), 1);
        assert!(syn::parse_file(&code).is_ok());
    }

    #[test]
    fn test_invalid_import_paths_skipped() {
        assert!(path_segment("nodes").is_some());
        assert!(path_segment("_private").is_some());
        assert!(path_segment("my-crate").is_none());
        assert!(path_segment("9lives").is_none());
        assert!(path_segment("").is_none());
    }
}
