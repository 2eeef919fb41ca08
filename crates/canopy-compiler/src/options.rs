// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! Compiler configuration.
//!
//! Options default to the permissive behavior: unregistered node types are
//! skipped silently and malformed `#{` delimiters are truncated. They can be
//! set from the environment and overridden by the CLI.
//!
//! | Variable | Effect |
//! |---|---|
//! | `CANOPY_DIAGNOSTICS` | record skipped nodes and truncated expressions |
//! | `CANOPY_STRICT_EXPRESSIONS` | treat malformed delimiters as fatal |
//! | `CANOPY_RUNTIME_CRATE` | crate the generated code builds against |

/// Crate name generated code imports the process factory from.
pub const DEFAULT_RUNTIME_CRATE: &str = "canopy_runtime";

/// Options for one compilation pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompilerOptions {
    /// Record diagnostics for skipped node types and malformed delimiters.
    pub diagnostics: bool,
    /// Fail on expressions that open with `#{` but lack the closing `}`.
    pub strict_expressions: bool,
    /// Crate name the generated code imports the runtime factory from.
    pub runtime_crate: String,
}

impl Default for CompilerOptions {
    fn default() -> Self {
        Self {
            diagnostics: false,
            strict_expressions: false,
            runtime_crate: DEFAULT_RUNTIME_CRATE.to_string(),
        }
    }
}

impl CompilerOptions {
    /// Read options from `CANOPY_*` environment variables.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        Self {
            diagnostics: lookup("CANOPY_DIAGNOSTICS")
                .map(|v| parse_flag(&v))
                .unwrap_or(defaults.diagnostics),
            strict_expressions: lookup("CANOPY_STRICT_EXPRESSIONS")
                .map(|v| parse_flag(&v))
                .unwrap_or(defaults.strict_expressions),
            runtime_crate: lookup("CANOPY_RUNTIME_CRATE")
                .filter(|v| !v.trim().is_empty())
                .unwrap_or(defaults.runtime_crate),
        }
    }

    /// Enable or disable diagnostics collection.
    pub fn with_diagnostics(mut self, enabled: bool) -> Self {
        self.diagnostics = enabled;
        self
    }

    /// Enable or disable strict expression delimiters.
    pub fn with_strict_expressions(mut self, enabled: bool) -> Self {
        self.strict_expressions = enabled;
        self
    }

    /// Set the runtime crate name.
    pub fn with_runtime_crate(mut self, name: impl Into<String>) -> Self {
        self.runtime_crate = name.into();
        self
    }
}

fn parse_flag(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}
