// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! Expression normalization.
//!
//! Attributes mark embedded expressions with a `#{...}` delimiter. The
//! functions here strip that delimiter and list the variables an expression
//! reads, so visitors can resolve them against the active scope.

/// Opening delimiter of an embedded expression.
pub const EXPRESSION_PREFIX: &str = "#{";

/// Closing delimiter of an embedded expression.
pub const EXPRESSION_SUFFIX: char = '}';

/// Words that never name a variable.
const KEYWORDS: &[&str] = &[
    "true",
    "false",
    "null",
    "and",
    "or",
    "not",
    "in",
    "empty",
    "instanceof",
    "eq",
    "ne",
    "lt",
    "gt",
    "le",
    "ge",
    "div",
    "mod",
];

/// Returns true if `text` opens with the `#{` delimiter.
pub fn is_expression(text: &str) -> bool {
    text.starts_with(EXPRESSION_PREFIX)
}

/// Returns true if `text` opens with `#{` but does not close with `}`.
pub fn is_malformed(text: &str) -> bool {
    match text.strip_prefix(EXPRESSION_PREFIX) {
        Some(inner) => !inner.ends_with(EXPRESSION_SUFFIX),
        None => false,
    }
}

/// Strip the `#{...}` delimiter from `text`.
///
/// Text without the `#{` prefix is returned unchanged. The closing delimiter
/// is not checked: the final character is dropped whatever it is, so
/// malformed input loses its last character instead of failing.
pub fn strip_expression(text: &str) -> &str {
    match text.strip_prefix(EXPRESSION_PREFIX) {
        Some(inner) => {
            let mut chars = inner.chars();
            chars.next_back();
            chars.as_str()
        }
        None => text,
    }
}

fn is_ident_start(c: char) -> bool {
    c.is_alphabetic() || c == '_'
}

fn is_ident_continue(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

/// List the variables a bare expression reads, in order of first use.
///
/// Only root identifiers count: `order.total` reads `order`, `size(items)`
/// reads `items`. String literals, numbers and keywords are skipped.
pub fn variable_references(expression: &str) -> Vec<&str> {
    let chars: Vec<(usize, char)> = expression.char_indices().collect();
    let mut references: Vec<&str> = Vec::new();
    let mut previous: Option<char> = None;
    let mut i = 0;

    while i < chars.len() {
        let (start, c) = chars[i];

        if c == '"' || c == '\'' {
            i += 1;
            while i < chars.len() {
                let d = chars[i].1;
                if d == '\\' {
                    i += 2;
                    continue;
                }
                i += 1;
                if d == c {
                    break;
                }
            }
            previous = Some(c);
            continue;
        }

        if c.is_ascii_digit() {
            while i < chars.len()
                && (chars[i].1.is_ascii_alphanumeric() || matches!(chars[i].1, '.' | '_'))
            {
                i += 1;
            }
            previous = Some('0');
            continue;
        }

        if is_ident_start(c) {
            let mut j = i;
            while j < chars.len() && is_ident_continue(chars[j].1) {
                j += 1;
            }
            let end = chars.get(j).map_or(expression.len(), |(idx, _)| *idx);
            let ident = &expression[start..end];
            let next = chars[j..]
                .iter()
                .map(|(_, ch)| *ch)
                .find(|ch| !ch.is_whitespace());

            let is_member = previous == Some('.');
            let is_call = next == Some('(');
            if !is_member && !is_call && !KEYWORDS.contains(&ident) && !references.contains(&ident)
            {
                references.push(ident);
            }
            previous = Some('a');
            i = j;
            continue;
        }

        if !c.is_whitespace() {
            previous = Some(c);
        }
        i += 1;
    }

    references
}
