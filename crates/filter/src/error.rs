// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Error types and the bucketed diagnostic report for filter expressions.

use std::fmt;

use thiserror::Error;

use crate::span::{highlight, Span};

/// A single problem found while lexing or validating a filter expression.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum FilterError {
    /// A token that is not a statement, operator, or parenthesis.
    #[error("malformed token {value:?} at position {}", span.start)]
    MalformedToken {
        /// The offending source text.
        value: String,
        /// Source location span for the error.
        span: Span,
    },

    /// A token in a position the grammar does not allow.
    #[error("unexpected {found} after {after} at position {}", span.start)]
    Parse {
        /// What was found.
        found: String,
        /// What it illegally followed.
        after: String,
        /// Source location span for the error.
        span: Span,
    },

    /// A parenthesis with no partner.
    #[error("unbalanced parenthesis at position {}", span.start)]
    UnbalancedParen {
        /// Source location span for the error.
        span: Span,
    },
}

impl FilterError {
    /// Get the span associated with this error.
    pub fn span(&self) -> Span {
        match self {
            Self::MalformedToken { span, .. } => *span,
            Self::Parse { span, .. } => *span,
            Self::UnbalancedParen { span } => *span,
        }
    }
}

/// Every problem found in one filter expression, bucketed by kind and
/// reported together with the offending ranges highlighted.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FilterReport {
    /// The joined source the spans refer to.
    pub source: String,
    /// Malformed-token errors, in source order.
    pub malformed: Vec<FilterError>,
    /// Grammar errors, in source order.
    pub parse: Vec<FilterError>,
    /// Unbalanced-parenthesis errors, in source order.
    pub unbalanced: Vec<FilterError>,
}

impl FilterReport {
    pub fn is_empty(&self) -> bool {
        self.malformed.is_empty() && self.parse.is_empty() && self.unbalanced.is_empty()
    }

    /// All errors across the buckets, ordered by source position.
    pub fn errors(&self) -> Vec<&FilterError> {
        let mut all: Vec<&FilterError> =
            self.malformed.iter().chain(&self.parse).chain(&self.unbalanced).collect();
        all.sort_by_key(|e| (e.span().start, e.span().end));
        all
    }

    /// The source with every offending range underlined.
    pub fn highlighted(&self) -> String {
        let spans: Vec<Span> = self.errors().iter().map(|e| e.span()).collect();
        highlight(&self.source, &spans)
    }
}

impl fmt::Display for FilterReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "invalid filter expression:")?;
        for error in self.errors() {
            writeln!(f, "  {}", error)?;
        }
        write!(f, "{}", self.highlighted())
    }
}

impl std::error::Error for FilterReport {}
