// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! Visitors for the built-in node types.
//!
//! Each module holds one visitor and submits it to the registry with
//! `inventory`, keyed by the node type tag from [`canopy_dsl::BuiltinNodeType`].

pub mod end;
pub mod event_sub_process;
pub mod for_each;
pub mod join;
pub mod milestone;
pub mod split;
pub mod start;
pub mod sub_process;
pub mod task;
pub mod timer;
pub mod work_item;

use canopy_dsl::Node;

use super::error::CompileError;

/// Reject an empty or blank required attribute.
pub(crate) fn require_non_empty(
    node: &Node,
    attribute: &str,
    value: &str,
) -> Result<(), CompileError> {
    if value.trim().is_empty() {
        return Err(CompileError::malformed(
            node,
            format!("'{}' must not be empty", attribute),
        ));
    }
    Ok(())
}
