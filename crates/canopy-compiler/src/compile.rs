// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! Process compilation orchestration
//!
//! Ties the stages together: parse the definition, construct the graph, run
//! the visitor pass, render the program. The caller owns the registry, so
//! one registry can serve any number of concurrent compilations.

use sha2::{Digest, Sha256};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::Instant;
use thiserror::Error;
use tracing::info;

use canopy_dsl::{DslError, GraphError, ProcessDefinition, ProcessGraph};

use crate::codegen::ast::{self, error::CompileError, metadata::Diagnostic, registry::VisitorRegistry};
use crate::options::CompilerOptions;
use crate::paths::{generated_file_name, get_generated_dir};

/// Errors raised while compiling a process definition.
#[derive(Debug, Error)]
pub enum CompilationError {
    /// The definition could not be parsed.
    #[error("Invalid process definition: {0}")]
    Dsl(#[from] DslError),

    /// The definition parsed but does not form a valid graph.
    #[error("Invalid process graph: {0}")]
    Graph(#[from] GraphError),

    /// A visitor rejected a node.
    #[error("Code generation failed: {0}")]
    Codegen(#[from] CompileError),

    /// The generated source could not be written.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

/// Input for compilation.
#[derive(Debug, Clone)]
pub struct CompilationInput {
    /// The process definition.
    pub definition: ProcessDefinition,
    /// Options of the pass.
    pub options: CompilerOptions,
}

/// Result of compiling a process definition.
#[derive(Debug, Clone)]
pub struct CompilationResult {
    /// Id of the compiled process.
    pub process_id: String,
    /// Generated Rust source.
    pub source: String,
    /// SHA-256 checksum of the generated source, hex encoded.
    pub source_checksum: String,
    /// Number of nodes in the graph, nested ones included.
    pub node_count: usize,
    /// Number of build instructions emitted.
    pub instruction_count: usize,
    /// Non-fatal findings (diagnostics mode only).
    pub diagnostics: Vec<Diagnostic>,
    /// Work item handlers the process needs.
    pub work_items: Vec<String>,
    /// Signals the process reacts to.
    pub signals: Vec<String>,
}

/// Compile a process definition to Rust source.
///
/// This is the main compilation entry point.
pub fn compile_process(
    input: &CompilationInput,
    registry: &VisitorRegistry,
) -> Result<CompilationResult, CompilationError> {
    let started = Instant::now();
    let graph = ProcessGraph::from_definition(&input.definition)?;
    let program = ast::compile(&graph, registry, &input.options)?;

    let mut hasher = Sha256::new();
    hasher.update(program.source.as_bytes());
    let source_checksum = format!("{:x}", hasher.finalize());

    let metadata = &program.generation.metadata;
    let result = CompilationResult {
        process_id: graph.id.clone(),
        node_count: graph.node_count(),
        instruction_count: program.generation.body.len(),
        diagnostics: metadata.diagnostics().to_vec(),
        work_items: metadata.work_items().map(str::to_string).collect(),
        signals: metadata.signals().map(str::to_string).collect(),
        source_checksum,
        source: program.source,
    };

    info!(
        process_id = %result.process_id,
        nodes = result.node_count,
        instructions = result.instruction_count,
        source_bytes = result.source.len(),
        duration_ms = started.elapsed().as_millis() as u64,
        "Compiled process"
    );
    Ok(result)
}

/// Parse a JSON process definition and compile it.
pub fn compile_process_json(
    json: &str,
    options: CompilerOptions,
    registry: &VisitorRegistry,
) -> Result<CompilationResult, CompilationError> {
    let definition: ProcessDefinition = serde_json::from_str(json).map_err(DslError::from)?;
    compile_process(
        &CompilationInput {
            definition,
            options,
        },
        registry,
    )
}

/// Write the source of a compiled process to disk.
///
/// The source is written to `{output_dir}/{process_id}.rs`; without an
/// output directory, to the process's generated directory under `DATA_DIR`.
///
/// # Returns
/// Path of the written source file
pub fn write_source(result: &CompilationResult, output_dir: Option<&Path>) -> io::Result<PathBuf> {
    let dir = match output_dir {
        Some(dir) => dir.to_path_buf(),
        None => get_generated_dir(&result.process_id),
    };
    fs::create_dir_all(&dir)?;

    let path = dir.join(generated_file_name(&result.process_id));
    fs::write(&path, &result.source)?;

    info!(
        process_id = %result.process_id,
        checksum = %result.source_checksum,
        path = %path.display(),
        "Wrote generated source"
    );
    Ok(path)
}

/// Compile a process and write the generated source to disk.
///
/// See [`write_source`] for where the file goes.
pub fn translate_process(
    input: &CompilationInput,
    registry: &VisitorRegistry,
    output_dir: Option<&Path>,
) -> Result<PathBuf, CompilationError> {
    let result = compile_process(input, registry)?;
    Ok(write_source(&result, output_dir)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn registry() -> &'static VisitorRegistry {
        VisitorRegistry::builtin()
    }

    #[test]
    fn test_compile_process_json() {
        let result = compile_process_json(
            r#"{
                "id": "hello",
                "nodes": [
                    { "id": "S", "type": "start", "attributes": { "signal": "go" } },
                    { "id": "W", "type": "work-item", "attributes": { "workName": "greet" } },
                    { "id": "E", "type": "end" }
                ],
                "connections": [ { "from": "S", "to": "W" }, { "from": "W", "to": "E" } ]
            }"#,
            CompilerOptions::default(),
            registry(),
        )
        .unwrap();

        assert_eq!(result.process_id, "hello");
        assert_eq!(result.node_count, 3);
        assert_eq!(result.instruction_count, 5);
        assert_eq!(result.source_checksum.len(), 64);
        assert_eq!(result.work_items, vec!["greet"]);
        assert_eq!(result.signals, vec!["go"]);
        assert!(result.diagnostics.is_empty());
    }

    #[test]
    fn test_checksum_is_stable() {
        let json = r#"{ "id": "p", "nodes": [ { "id": "E", "type": "end" } ] }"#;
        let first = compile_process_json(json, CompilerOptions::default(), registry()).unwrap();
        let second = compile_process_json(json, CompilerOptions::default(), registry()).unwrap();
        assert_eq!(first.source, second.source);
        assert_eq!(first.source_checksum, second.source_checksum);
    }

    #[test]
    fn test_error_layers() {
        let err = compile_process_json("{", CompilerOptions::default(), registry()).unwrap_err();
        assert!(matches!(err, CompilationError::Dsl(_)));

        let err = compile_process_json(
            r#"{ "id": "p", "nodes": [ { "id": "A", "type": "end" }, { "id": "A", "type": "end" } ] }"#,
            CompilerOptions::default(),
            registry(),
        )
        .unwrap_err();
        assert!(matches!(err, CompilationError::Graph(GraphError::DuplicateNodeId { .. })));

        let err = compile_process_json(
            r##"{ "id": "p", "nodes": [ { "id": "T", "type": "task", "attributes": { "expr": "#{nope}" } } ] }"##,
            CompilerOptions::default(),
            registry(),
        )
        .unwrap_err();
        assert!(err.to_string().starts_with("Code generation failed: [C002]"));
    }

    #[test]
    fn test_translate_process_writes_source() {
        let dir = tempfile::tempdir().unwrap();
        let input = CompilationInput {
            definition: serde_json::from_str(r#"{ "id": "order-sync", "nodes": [] }"#).unwrap(),
            options: CompilerOptions::default(),
        };

        let path = translate_process(&input, registry(), Some(dir.path())).unwrap();
        assert_eq!(path, dir.path().join("order_sync.rs"));
        let written = fs::read_to_string(&path).unwrap();
        assert!(written.contains("create_process"));
    }
}
