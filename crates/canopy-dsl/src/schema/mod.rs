// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! Schema Generation Module
//!
//! Generates the JSON Schema of the process definition format, including the
//! attribute schema of every registered node type, for documentation and
//! editor tooling.

pub mod dsl_schema;

pub use dsl_schema::{generate_dsl_schema, get_node_type_schema};
