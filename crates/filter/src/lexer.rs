// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Lexer for filter expressions.
//!
//! Filters arrive as an argument vector, so one statement may be split
//! across words (`fact = value`) or packed into one (`fact=value`). The
//! lexer joins the vector with spaces and merges such fragments into
//! single statement tokens, keeping byte spans into the joined source for
//! diagnostics.

use std::sync::LazyLock;

use regex::Regex;

use crate::error::FilterError;
use crate::span::Span;
use crate::token::{Token, TokenKind};

/// Comparison operators, longest first so prefixes never shadow them.
const OPERATORS: [&str; 7] = ["<=", ">=", "!=", "=~", "=", "<", ">"];

/// Function statement: `func(args)`, optionally `.accessor` and a
/// comparison, e.g. `fact('os').value=Linux`.
// Allow expect here as the regex is compile-time verified to be valid
#[allow(clippy::expect_used)]
static FSTATEMENT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[a-zA-Z_]\w*\([^)]*\)(?:\.\w+)?(?:(?:<=|>=|!=|=~|=|<|>)[^\s)]+)?")
        .expect("constant regex pattern is valid")
});

/// A statement's left-hand side: fact names, class names, structured keys.
#[allow(clippy::expect_used)]
static BARE_WORD: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[\w.:/-]+$").expect("constant regex pattern is valid")
});

/// Join an argument vector into the single-line source the lexer scans.
pub fn join_args<S: AsRef<str>>(args: &[S]) -> String {
    args.iter().map(|a| a.as_ref()).collect::<Vec<_>>().join(" ")
}

/// Tokenize a filter source string.
///
/// Returns the recognized tokens plus a malformed-token error for every
/// range that fits no token kind. Lexing continues past errors so one pass
/// reports everything.
pub fn tokenize(source: &str) -> (Vec<Token>, Vec<FilterError>) {
    Lexer { source, pos: 0 }.run()
}

struct Lexer<'a> {
    source: &'a str,
    pos: usize,
}

impl<'a> Lexer<'a> {
    fn run(mut self) -> (Vec<Token>, Vec<FilterError>) {
        let mut tokens = Vec::new();
        let mut errors = Vec::new();

        while let Some(ch) = self.peek() {
            if ch.is_whitespace() {
                self.pos += ch.len_utf8();
                continue;
            }

            if ch == '(' || ch == ')' {
                let kind = if ch == '(' { TokenKind::LParen } else { TokenKind::RParen };
                let span = Span::new(self.pos, self.pos + 1);
                tokens.push(Token::new(kind, span.slice(self.source), span));
                self.pos += 1;
                continue;
            }

            if let Some(m) = FSTATEMENT.find(self.rest()) {
                let span = Span::new(self.pos, self.pos + m.end());
                tokens.push(Token::new(TokenKind::FStatement, m.as_str(), span));
                self.pos = span.end;
                continue;
            }

            // `!` negates unless it opens a `!=` comparison.
            if ch == '!' && !self.rest().starts_with("!=") {
                let span = Span::new(self.pos, self.pos + 1);
                tokens.push(Token::new(TokenKind::Not, "!", span));
                self.pos += 1;
                continue;
            }

            // An operator with nothing on its left can never be valid;
            // swallow any attached value so the error covers one range.
            if let Some(op) = operator_at(self.rest()) {
                let start = self.pos;
                self.pos += op.len();
                self.skip_spaces();
                let value_end = self.scan_value_end();
                let end = if value_end > self.pos { value_end } else { start + op.len() };
                let span = Span::new(start, end);
                errors.push(FilterError::MalformedToken {
                    value: span.slice(self.source).to_string(),
                    span,
                });
                self.pos = span.end.max(self.pos);
                continue;
            }

            self.word(&mut tokens, &mut errors);
        }

        (tokens, errors)
    }

    /// Lex one word, merging `word op value` fragments into a statement.
    fn word(&mut self, tokens: &mut Vec<Token>, errors: &mut Vec<FilterError>) {
        let start = self.pos;
        let end = self.word_end();
        let word = &self.source[start..end];
        let span = Span::new(start, end);
        self.pos = end;

        match word {
            "and" => tokens.push(Token::new(TokenKind::And, word, span)),
            "or" => tokens.push(Token::new(TokenKind::Or, word, span)),
            "not" => tokens.push(Token::new(TokenKind::Not, word, span)),
            _ => {
                if let Some((left, op, right)) = split_inline_op(word) {
                    if !BARE_WORD.is_match(left) {
                        errors.push(FilterError::MalformedToken {
                            value: word.to_string(),
                            span,
                        });
                    } else if right.is_empty() {
                        // `fact=` — the value may be the next word.
                        self.merge_value(span, &format!("{}{}", left, op), tokens, errors);
                    } else {
                        tokens.push(Token::new(TokenKind::Statement, word, span));
                    }
                } else if BARE_WORD.is_match(word) {
                    // Bare word: a class statement, unless an operator
                    // follows and turns it into a split comparison.
                    let checkpoint = self.pos;
                    self.skip_spaces();
                    match operator_at(self.rest()) {
                        Some(op) => {
                            self.pos += op.len();
                            self.merge_value(span, &format!("{}{}", word, op), tokens, errors);
                        }
                        None => {
                            self.pos = checkpoint;
                            tokens.push(Token::new(TokenKind::Statement, word, span));
                        }
                    }
                } else {
                    errors.push(FilterError::MalformedToken { value: word.to_string(), span });
                }
            }
        }
    }

    /// Complete a `lhs op` fragment with the value that follows, or record
    /// the fragment as malformed when nothing does.
    fn merge_value(
        &mut self,
        lhs_span: Span,
        lhs_with_op: &str,
        tokens: &mut Vec<Token>,
        errors: &mut Vec<FilterError>,
    ) {
        let op_end = self.pos;
        self.skip_spaces();
        let value_start = self.pos;
        let value_end = self.scan_value_end();

        if value_end > value_start {
            let value = &self.source[value_start..value_end];
            let span = lhs_span.merge(Span::new(value_start, value_end));
            tokens.push(Token::new(
                TokenKind::Statement,
                format!("{}{}", lhs_with_op, value),
                span,
            ));
            self.pos = value_end;
        } else {
            let span = lhs_span.merge(Span::new(lhs_span.start, op_end));
            errors.push(FilterError::MalformedToken {
                value: span.slice(self.source).to_string(),
                span,
            });
            self.pos = op_end.max(self.pos);
        }
    }

    fn peek(&self) -> Option<char> {
        self.rest().chars().next()
    }

    fn rest(&self) -> &'a str {
        &self.source[self.pos..]
    }

    fn skip_spaces(&mut self) {
        while let Some(ch) = self.peek() {
            if !ch.is_whitespace() {
                break;
            }
            self.pos += ch.len_utf8();
        }
    }

    /// End of the word starting at the current position.
    fn word_end(&self) -> usize {
        self.rest()
            .find(|c: char| c.is_whitespace() || c == '(' || c == ')')
            .map(|i| self.pos + i)
            .unwrap_or(self.source.len())
    }

    /// End of a comparison value: anything up to whitespace or `)`.
    fn scan_value_end(&self) -> usize {
        self.rest()
            .find(|c: char| c.is_whitespace() || c == ')')
            .map(|i| self.pos + i)
            .unwrap_or(self.source.len())
    }
}

fn operator_at(s: &str) -> Option<&'static str> {
    OPERATORS.iter().find(|op| s.starts_with(**op)).copied()
}

/// Split `word` at its first comparison operator, if it has one.
fn split_inline_op(word: &str) -> Option<(&str, &'static str, &str)> {
    for (idx, _) in word.char_indices() {
        if let Some(op) = operator_at(&word[idx..]) {
            return Some((&word[..idx], op, &word[idx + op.len()..]));
        }
    }
    None
}

#[cfg(test)]
#[path = "lexer_tests.rs"]
mod tests;
