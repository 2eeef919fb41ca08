// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
use std::path::PathBuf;

use crate::codegen::ast::context::VisitContext;

/// Get the base data directory path from environment variable or default
///
/// The data directory can be configured via the `DATA_DIR` environment variable.
/// If not set, defaults to `./.data` for local development.
pub fn get_data_dir() -> PathBuf {
    std::env::var("DATA_DIR")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from(".data"))
}

/// Construct the directory generated sources of a process are written to
///
/// # Returns
/// `{data_dir}/processes/{process_id}/generated`
pub fn get_generated_dir(process_id: &str) -> PathBuf {
    get_data_dir()
        .join("processes")
        .join(process_id)
        .join("generated")
}

/// File name of the generated source of a process.
///
/// The process id is reduced to identifier characters so it is always a
/// single path component.
pub fn generated_file_name(process_id: &str) -> String {
    format!("{}.rs", VisitContext::sanitize_ident(process_id))
}

/// Construct the generated source file path
///
/// # Returns
/// `{data_dir}/processes/{process_id}/generated/{process_id}.rs`
pub fn get_generated_source_path(process_id: &str) -> PathBuf {
    get_generated_dir(process_id).join(generated_file_name(process_id))
}
