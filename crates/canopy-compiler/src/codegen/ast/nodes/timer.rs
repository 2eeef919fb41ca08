// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! Timer node visitor.
//!
//! The delay is either a literal or a `#{...}` expression computed from
//! process variables. Literals are an ISO-8601 duration (`PT5M`, `P1DT12H`,
//! `PT0.5S`), a repeating interval `R[n]/<duration>` (`R3/PT1H`), or a plain
//! number of milliseconds.

use std::sync::Arc;

use proc_macro2::Ident;
use quote::quote;

use canopy_dsl::{BuiltinNodeType, Node, ScopeRef, TimerAttributes};

use super::super::context::VisitContext;
use super::super::error::CompileError;
use super::super::expression::is_expression;
use super::super::instruction::Body;
use super::super::metadata::CompilationMetadata;
use super::super::registry::{VisitorRef, VisitorRegistration};
use super::super::visitor::{
    NodeVisitor, emit_done, emit_node_header, expression_tokens, parse_attributes,
    resolve_expression,
};
use super::require_non_empty;

/// Emits `timer_node` with a literal or computed delay.
#[derive(Debug, Clone, Copy, Default)]
pub struct TimerNodeVisitor;

/// Count the `<number><unit>` designators of `part`.
///
/// Units must appear in the order of `units`, each at most once. Only the
/// seconds designator takes a fraction.
fn duration_components(part: &str, units: &str) -> Option<usize> {
    let mut allowed = units;
    let mut count = 0;
    let mut chars = part.chars().peekable();
    while chars.peek().is_some() {
        let mut digits = 0;
        let mut fraction_digits = None;
        while let Some(&c) = chars.peek() {
            if c.is_ascii_digit() {
                match fraction_digits.as_mut() {
                    Some(n) => *n += 1,
                    None => digits += 1,
                }
            } else if matches!(c, '.' | ',') && fraction_digits.is_none() && digits > 0 {
                fraction_digits = Some(0);
            } else {
                break;
            }
            chars.next();
        }
        if digits == 0 || fraction_digits == Some(0) {
            return None;
        }
        let unit = chars.next()?;
        if fraction_digits.is_some() && unit != 'S' {
            return None;
        }
        let position = allowed.find(unit)?;
        allowed = &allowed[position + unit.len_utf8()..];
        count += 1;
    }
    Some(count)
}

fn is_iso_duration(text: &str) -> bool {
    let Some(rest) = text.strip_prefix('P') else {
        return false;
    };
    let (date, time) = match rest.split_once('T') {
        Some((date, time)) => (date, Some(time)),
        None => (rest, None),
    };
    let Some(date_count) = duration_components(date, "YMWD") else {
        return false;
    };
    match time {
        Some(time) => duration_components(time, "HMS").is_some_and(|n| n > 0),
        None => date_count > 0,
    }
}

fn is_delay_literal(delay: &str) -> bool {
    if let Some(rest) = delay.strip_prefix('R') {
        return match rest.split_once('/') {
            Some((count, duration)) => {
                count.chars().all(|c| c.is_ascii_digit()) && is_iso_duration(duration)
            }
            None => false,
        };
    }
    is_iso_duration(delay) || (!delay.is_empty() && delay.chars().all(|c| c.is_ascii_digit()))
}

impl NodeVisitor for TimerNodeVisitor {
    fn visit_node(
        &self,
        cx: &VisitContext<'_>,
        factory: &Ident,
        node: &Node,
        body: &mut Body,
        scope: ScopeRef<'_>,
        metadata: &mut CompilationMetadata,
    ) -> Result<(), CompileError> {
        let attrs: TimerAttributes = parse_attributes(node)?;
        let delay = attrs.delay.trim();
        require_non_empty(node, "delay", delay)?;

        let (handle, header) =
            emit_node_header(cx, factory, node, "timer_node", "TimerNodeFactory", metadata);
        let delay = if is_expression(delay) {
            let expression = resolve_expression(cx, node, "delay", delay, scope, metadata)?;
            let expression = expression_tokens(cx, &expression);
            quote! { #handle.delay_expression(#expression); }
        } else if is_delay_literal(delay) {
            quote! { #handle.delay(#delay); }
        } else {
            return Err(CompileError::malformed(
                node,
                format!(
                    "delay '{}' is neither a duration nor an expression",
                    delay
                ),
            ));
        };
        let done = emit_done(&handle);

        body.add_node(
            factory,
            node,
            quote! {
                #header
                #delay
                #done
            },
        );
        Ok(())
    }
}

fn create_timer_visitor() -> VisitorRef {
    Arc::new(TimerNodeVisitor)
}

static TIMER_VISITOR: VisitorRegistration = VisitorRegistration {
    node_type: BuiltinNodeType::Timer.tag(),
    create: create_timer_visitor,
};

inventory::submit! { &TIMER_VISITOR }
