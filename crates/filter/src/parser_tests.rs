// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

use crate::error::FilterError;
use crate::token::TokenKind;

use proptest::prelude::*;

#[test]
fn split_comparison_with_group_parses() {
    let tokens = parse(&["fact", "=", "value", "and", "(", "class", ")"]).unwrap();
    let kinds: Vec<TokenKind> = tokens.iter().map(|t| t.kind).collect();
    assert_eq!(
        kinds,
        vec![
            TokenKind::Statement,
            TokenKind::And,
            TokenKind::LParen,
            TokenKind::Statement,
            TokenKind::RParen,
        ]
    );
    let values: Vec<&str> = tokens.iter().map(|t| t.value.as_str()).collect();
    assert_eq!(values, vec!["fact=value", "and", "(", "class", ")"]);
}

#[test]
fn leading_connective_is_a_parse_error_at_the_start() {
    let report = parse(&["and", "x"]).unwrap_err();
    assert!(report.malformed.is_empty());
    assert!(report.unbalanced.is_empty());
    assert_eq!(report.parse.len(), 1);
    assert_eq!(report.parse[0].span().start, 0);
}

#[test]
fn empty_vector_parses_to_no_tokens() {
    let tokens = parse::<&str>(&[]).unwrap();
    assert!(tokens.is_empty());
}

#[test]
fn report_buckets_every_kind_of_problem() {
    let report = parse(&["&bad", "and", "and", "x", ")"]).unwrap_err();
    assert_eq!(report.malformed.len(), 1);
    assert!(!report.parse.is_empty());
    assert_eq!(report.unbalanced.len(), 1);
    assert_eq!(report.source, "&bad and and x )");
}

#[test]
fn report_highlights_offending_ranges() {
    let report = parse(&["and", "x"]).unwrap_err();
    let rendered = report.highlighted();
    assert_eq!(rendered, "and x\n^^^");

    let display = report.to_string();
    assert!(display.contains("unexpected 'and' after start of expression"), "{}", display);
    assert!(display.ends_with("and x\n^^^"), "{}", display);
}

#[test]
fn report_errors_are_ordered_by_position() {
    let report = parse(&[")", "=x"]).unwrap_err();
    let spans: Vec<usize> = report.errors().iter().map(|e| e.span().start).collect();
    let mut sorted = spans.clone();
    sorted.sort_unstable();
    assert_eq!(spans, sorted);
    assert!(report.errors().iter().any(|e| matches!(e, FilterError::UnbalancedParen { .. })));
    assert!(report.errors().iter().any(|e| matches!(e, FilterError::MalformedToken { .. })));
}

proptest! {
    /// Arbitrary argument vectors never panic the parser, and every error
    /// span stays inside the joined source.
    #[test]
    fn parse_never_panics(args in proptest::collection::vec("[a-z=<>!~()& ]{0,8}", 0..8)) {
        let source = join_args(&args);
        match parse(&args) {
            Ok(tokens) => {
                for token in tokens {
                    prop_assert!(token.span.end <= source.len());
                }
            }
            Err(report) => {
                prop_assert!(!report.is_empty());
                for error in report.errors() {
                    prop_assert!(error.span().end <= source.len() + 1);
                }
            }
        }
    }

    /// Well-formed `key=value` chains always parse.
    #[test]
    fn simple_chains_always_parse(
        pairs in proptest::collection::vec(("[a-z]{1,6}", "[a-z0-9]{1,6}"), 1..5)
    ) {
        let mut args: Vec<String> = Vec::new();
        for (i, (key, value)) in pairs.iter().enumerate() {
            if i > 0 {
                args.push("and".to_string());
            }
            args.push(format!("{}={}", key, value));
        }
        let tokens = parse(&args).unwrap();
        prop_assert_eq!(tokens.len(), pairs.len() * 2 - 1);
    }
}
