// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Entry point: tokenize and validate a filter argument vector.

use crate::error::FilterReport;
use crate::lexer::{join_args, tokenize};
use crate::token::Token;
use crate::validator::validate;

/// Tokenize and validate a filter expression given as an argument vector.
///
/// On success, returns the tokens in source order. On failure, returns the
/// full diagnostic report: every malformed token, grammar error, and
/// unbalanced parenthesis found, with their source ranges.
pub fn parse<S: AsRef<str>>(args: &[S]) -> Result<Vec<Token>, FilterReport> {
    let source = join_args(args);
    let (tokens, malformed) = tokenize(&source);
    let (parse_errors, unbalanced) = validate(&tokens);

    if malformed.is_empty() && parse_errors.is_empty() && unbalanced.is_empty() {
        Ok(tokens)
    } else {
        Err(FilterReport { source, malformed, parse: parse_errors, unbalanced })
    }
}

#[cfg(test)]
#[path = "parser_tests.rs"]
mod tests;
