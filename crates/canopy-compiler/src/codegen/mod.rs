// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! Code generation modules for process compilation.
//!
//! This module contains the node-visitor engine translating process graphs
//! into runtime build code using syn/quote.

pub mod ast;
