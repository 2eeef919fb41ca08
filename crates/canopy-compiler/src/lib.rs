// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! Canopy Compiler - Process Definitions to Runtime Build Code
//!
//! This crate compiles process definitions (hierarchical graphs of typed
//! nodes) into Rust source that reconstructs the process through a runtime
//! `ProcessFactory`. The runtime crate itself is not part of this workspace;
//! generated code imports it by name (see [`CompilerOptions::runtime_crate`]).
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Process Compilation Pipeline                      │
//! └─────────────────────────────────────────────────────────────────────────┘
//!
//!     ┌─────────────┐      ┌─────────────┐      ┌─────────────┐
//!     │ Definition  │      │   Process   │      │    Build    │
//!     │   (JSON)    │─────▶│    Graph    │─────▶│ Instructions│──▶ Rust source
//!     │             │      │  + scopes   │      │ + metadata  │
//!     └─────────────┘      └─────────────┘      └─────────────┘
//!                                                      ▲
//!                                               ┌─────────────┐
//!                                               │   Visitor   │
//!                                               │  Registry   │
//!                                               └─────────────┘
//! ```
//!
//! # Compilation Pipeline
//!
//! 1. **Parse**: Load the process definition from JSON
//! 2. **Build Graph**: Validate ids and connections, create one scope per composite
//! 3. **Visit**: Dispatch every node to the visitor registered for its type tag;
//!    composite visitors recurse into their children with their own scope
//! 4. **Assemble**: Render imports, helpers and `create_process()`
//! 5. **Write Source**: Optionally write the program under `DATA_DIR`
//!
//! # Usage
//!
//! ```ignore
//! use canopy_compiler::{CompilerOptions, VisitorRegistry, compile_process_json};
//!
//! let result = compile_process_json(&json, CompilerOptions::from_env(), VisitorRegistry::builtin())?;
//! println!("{}", result.source);
//! ```
//!
//! # Extending
//!
//! Node types are open. A crate linked into the compiler can add a type by
//! implementing [`NodeVisitor`] (or [`CompositeNodeVisitor`] wrapped in
//! [`Composite`]) and submitting a [`VisitorRegistration`] with `inventory`.
//! Unregistered tags are skipped.
//!
//! # Modules
//!
//! - [`codegen`]: Node-visitor code generation
//! - [`compile`]: Compilation orchestration
//! - [`options`]: Compiler configuration
//! - [`paths`]: File path utilities for generated sources

#![deny(missing_docs)]

/// Node-visitor code generation.
pub mod codegen;

/// Compilation orchestration.
pub mod compile;

/// Compiler configuration.
pub mod options;

/// File path utilities for generated sources.
pub mod paths;

// Re-export main types
pub use codegen::ast::context::VisitContext;
pub use codegen::ast::error::CompileError;
pub use codegen::ast::instruction::{Body, BuildInstruction, InstructionKind};
pub use codegen::ast::metadata::{
    CompilationMetadata, Diagnostic, DiagnosticKind, ResolvedExpression, ResolvedReference,
};
pub use codegen::ast::registry::{VisitorRef, VisitorRegistration, VisitorRegistry};
pub use codegen::ast::visitor::{Composite, CompositeNodeVisitor, NodeVisitor};
pub use codegen::ast::{CompiledProgram, Generation, generate};
pub use compile::{
    CompilationError, CompilationInput, CompilationResult, compile_process, compile_process_json,
    translate_process, write_source,
};
pub use options::CompilerOptions;
pub use paths::{get_data_dir, get_generated_dir, get_generated_source_path};

// Re-export DSL types for convenience
pub use canopy_dsl::{ProcessDefinition, ProcessGraph};
