// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! Process compiler CLI
//!
//! Compiles a process definition JSON file to Rust build code.
//!
//! Usage:
//!
//! ```text
//! canopy-compile --definition <path> [--output <dir>] [--diagnostics] [--strict-expressions] [--runtime-crate <name>]
//! ```
//!
//! Example:
//!
//! ```text
//! canopy-compile --definition order-flow.json --output ./generated --diagnostics
//! ```

use canopy_compiler::compile::{CompilationInput, compile_process, write_source};
use canopy_compiler::{CompilerOptions, ProcessDefinition, VisitorRegistry};
use std::fs;
use std::io;
use std::path::PathBuf;
use std::process::ExitCode;

fn print_usage() {
    eprintln!(
        r#"Usage: canopy-compile [OPTIONS]

Compile a process definition JSON file to Rust build code.

OPTIONS:
    --definition <path>     Path to process definition JSON file (required)
    --output <dir>          Directory the generated source is written to
                            (default: $DATA_DIR/processes/<id>/generated)
    --diagnostics           Report skipped node types and truncated expressions
    --strict-expressions    Fail on expressions missing their closing '}}'
    --runtime-crate <name>  Crate the generated code builds against
    --help                  Show this help message

ENVIRONMENT:
    DATA_DIR                    Data directory for generated sources (default: .data)
    CANOPY_DIAGNOSTICS          Same as --diagnostics when set to 1/true/yes/on
    CANOPY_STRICT_EXPRESSIONS   Same as --strict-expressions when set to 1/true/yes/on
    CANOPY_RUNTIME_CRATE        Same as --runtime-crate (default: canopy_runtime)
    RUST_LOG                    Log filter (default: warn)

EXAMPLES:
    # Compile into a specific directory
    canopy-compile --definition order-flow.json --output ./generated

    # Compile with diagnostics
    canopy-compile --definition order-flow.json --diagnostics
"#
    );
}

struct Args {
    definition_path: PathBuf,
    output_dir: Option<PathBuf>,
    diagnostics: bool,
    strict_expressions: bool,
    runtime_crate: Option<String>,
}

fn parse_args() -> Result<Args, String> {
    let args: Vec<String> = std::env::args().collect();

    let mut definition_path: Option<PathBuf> = None;
    let mut output_dir: Option<PathBuf> = None;
    let mut diagnostics = false;
    let mut strict_expressions = false;
    let mut runtime_crate: Option<String> = None;

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--help" | "-h" => {
                print_usage();
                std::process::exit(0);
            }
            "--definition" => {
                i += 1;
                if i >= args.len() {
                    return Err("--definition requires a path".to_string());
                }
                definition_path = Some(PathBuf::from(&args[i]));
            }
            "--output" => {
                i += 1;
                if i >= args.len() {
                    return Err("--output requires a directory".to_string());
                }
                output_dir = Some(PathBuf::from(&args[i]));
            }
            "--runtime-crate" => {
                i += 1;
                if i >= args.len() {
                    return Err("--runtime-crate requires a name".to_string());
                }
                runtime_crate = Some(args[i].clone());
            }
            "--diagnostics" => {
                diagnostics = true;
            }
            "--strict-expressions" => {
                strict_expressions = true;
            }
            arg => {
                return Err(format!("Unknown argument: {}", arg));
            }
        }
        i += 1;
    }

    let definition_path = definition_path.ok_or("--definition is required")?;

    Ok(Args {
        definition_path,
        output_dir,
        diagnostics,
        strict_expressions,
        runtime_crate,
    })
}

fn options_from(args: &Args) -> CompilerOptions {
    let mut options = CompilerOptions::from_env();
    if args.diagnostics {
        options = options.with_diagnostics(true);
    }
    if args.strict_expressions {
        options = options.with_strict_expressions(true);
    }
    if let Some(runtime_crate) = &args.runtime_crate {
        options = options.with_runtime_crate(runtime_crate.clone());
    }
    options
}

fn main() -> ExitCode {
    // Initialize minimal logging (default to warn if RUST_LOG not set)
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "warn".into()),
        )
        .with_writer(io::stderr)
        .init();

    let args = match parse_args() {
        Ok(args) => args,
        Err(e) => {
            eprintln!("Error: {}", e);
            eprintln!();
            print_usage();
            return ExitCode::FAILURE;
        }
    };

    // Read definition JSON
    let definition_json = match fs::read_to_string(&args.definition_path) {
        Ok(json) => json,
        Err(e) => {
            eprintln!(
                "Error reading definition file {:?}: {}",
                args.definition_path, e
            );
            return ExitCode::FAILURE;
        }
    };

    // Parse definition
    let definition: ProcessDefinition = match serde_json::from_str(&definition_json) {
        Ok(definition) => definition,
        Err(e) => {
            eprintln!("Error parsing definition JSON: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let options = options_from(&args);
    let diagnostics = options.diagnostics;
    eprintln!("Compiling process: {}", definition.id);

    let input = CompilationInput {
        definition,
        options,
    };
    let registry = VisitorRegistry::builtin();

    let result = match compile_process(&input, registry) {
        Ok(result) => result,
        Err(e) => {
            eprintln!("Compilation failed: {}", e);
            return ExitCode::FAILURE;
        }
    };

    if diagnostics {
        for diagnostic in &result.diagnostics {
            eprintln!("warning: {}", diagnostic);
        }
    }

    let path = match write_source(&result, args.output_dir.as_deref()) {
        Ok(path) => path,
        Err(e) => {
            eprintln!("Error writing generated source: {}", e);
            return ExitCode::FAILURE;
        }
    };

    eprintln!("Compilation successful:");
    eprintln!("  Nodes: {}", result.node_count);
    eprintln!("  Instructions: {}", result.instruction_count);
    eprintln!("  Checksum: {}", result.source_checksum);
    // Print final path to stdout for scripts to capture
    println!("{}", path.display());

    ExitCode::SUCCESS
}
