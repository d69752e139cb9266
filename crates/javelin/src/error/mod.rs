//! # Error Types
//!
//! Error types for lexing, grammar loading, parsing and compilation.
//!
//! ## Overview
//!
//! - [`LexerError`]: the token source could not classify a character sequence
//! - [`GrammarError`]: a grammar is malformed (dangling references, unreachable
//!   rules, empty productions, bad grammar text)
//! - [`ParseError`]: a single file failed to parse, either because of a lexical
//!   or syntax error in the input or because of an internal tree building error
//! - [`TreeBuildError`]: a completed rule could not be reduced to a tree node.
//!   This is always a grammar/tree builder mismatch, never a problem with the
//!   input, and the pipeline treats it as fatal
//! - [`CompileError`]: the pipeline as a whole could not continue
//!
//! User facing problems are also turned into [`Diagnostic`]s and funneled into
//! a [`DiagnosticCollector`].
//!
//! ## Diagnostics Support
//!
//! When the `diagnostics` feature is enabled, errors integrate with [`miette`]
//! and carry error codes.

pub mod diagnostics;

pub use diagnostics::{CompilerDiagnostics, Diagnostic, DiagnosticCollector, Severity};

use crate::lexer::TokenKind;
use crate::syntax::ParsePosition;
use compact_str::CompactString;
use std::path::PathBuf;
use thiserror::Error;

#[cfg(feature = "diagnostics")]
use miette::Diagnostic as MietteDiagnostic;

/// Lexer error with location information
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[cfg_attr(feature = "diagnostics", derive(MietteDiagnostic))]
#[error("{kind}")]
pub struct LexerError {
    pub position: ParsePosition,
    #[source]
    pub kind: LexerErrorKind,
}

impl LexerError {
    #[must_use]
    pub const fn new(position: ParsePosition, kind: LexerErrorKind) -> Self {
        Self { position, kind }
    }
}

/// Types of lexer errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[cfg_attr(feature = "diagnostics", derive(MietteDiagnostic))]
pub enum LexerErrorKind {
    #[error("Unexpected character: '{char}'")]
    #[cfg_attr(feature = "diagnostics", diagnostic(code(lexer::unexpected_char)))]
    UnexpectedChar { char: char },

    #[error("Reached end of input while inside comment")]
    #[cfg_attr(feature = "diagnostics", diagnostic(code(lexer::unterminated_comment)))]
    UnterminatedComment,

    #[error("String literal not closed")]
    #[cfg_attr(feature = "diagnostics", diagnostic(code(lexer::unterminated_string)))]
    UnterminatedString,

    #[error("Character literal not closed")]
    #[cfg_attr(feature = "diagnostics", diagnostic(code(lexer::unterminated_char)))]
    UnterminatedChar,

    #[error("Illegal escape sequence: \\{escape}")]
    #[cfg_attr(feature = "diagnostics", diagnostic(code(lexer::invalid_escape)))]
    InvalidEscape { escape: char },

    #[error("Invalid character literal: {reason}")]
    #[cfg_attr(feature = "diagnostics", diagnostic(code(lexer::invalid_char)))]
    InvalidCharLiteral { reason: &'static str },

    #[error("Invalid number format: {reason}")]
    #[cfg_attr(feature = "diagnostics", diagnostic(code(lexer::invalid_number)))]
    InvalidNumber { reason: &'static str },

    #[error("{kind} literal too large")]
    #[cfg_attr(feature = "diagnostics", diagnostic(code(lexer::number_too_large)))]
    NumberTooLarge { kind: &'static str },
}

impl LexerErrorKind {
    /// Create an unexpected character error
    #[must_use]
    pub const fn unexpected_char(char: char) -> Self {
        Self::UnexpectedChar { char }
    }

    /// Create an invalid escape sequence error
    #[must_use]
    pub const fn invalid_escape(escape: char) -> Self {
        Self::InvalidEscape { escape }
    }

    /// Create an invalid character literal error
    #[must_use]
    pub const fn invalid_char(reason: &'static str) -> Self {
        Self::InvalidCharLiteral { reason }
    }

    /// Create an invalid number format error
    #[must_use]
    pub const fn invalid_number(reason: &'static str) -> Self {
        Self::InvalidNumber { reason }
    }

    /// Create a literal overflow error
    #[must_use]
    pub const fn too_large(kind: &'static str) -> Self {
        Self::NumberTooLarge { kind }
    }
}

/// Errors found while reading, expanding or validating a grammar
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GrammarError {
    #[error("Rule {rule} references undefined rule {name}")]
    UndefinedRule { rule: String, name: String },

    #[error("Rule {0} is not reachable from the start symbol")]
    UnreachableRule(String),

    #[error("Rule {0} has an empty production")]
    EmptyProduction(String),

    #[error("Start rule {0} is not defined")]
    MissingStartRule(String),

    #[error("Unknown token {token} in rule {rule}")]
    UnknownToken { rule: String, token: String },

    #[error("Grammar text, line {line}: {message}")]
    Syntax { line: usize, message: String },
}

/// A completed rule could not be turned into a tree node.
///
/// Every variant means the grammar and the tree builder disagree.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TreeBuildError {
    #[error("No reduction registered for rule {rule}")]
    NoReduction { rule: CompactString },

    #[error("Rule {rule}: expected {expected}, found {found}")]
    UnexpectedOperand {
        rule: CompactString,
        expected: &'static str,
        found: &'static str,
    },

    #[error("Rule {rule}: ran out of operands")]
    MissingOperand { rule: CompactString },
}

/// Why a single source file could not be parsed
#[derive(Debug, Clone, PartialEq, Error)]
#[cfg_attr(feature = "diagnostics", derive(MietteDiagnostic))]
pub enum ParseError {
    #[error(transparent)]
    #[cfg_attr(feature = "diagnostics", diagnostic(transparent))]
    Lexical(#[from] LexerError),

    #[error("Syntax error at {position}: found {found}, expected one of: {}", display_expected(.expected))]
    #[cfg_attr(feature = "diagnostics", diagnostic(code(parser::syntax)))]
    Syntax {
        position: ParsePosition,
        found: TokenKind,
        expected: Vec<TokenKind>,
    },

    #[error("Internal error: {0}")]
    #[cfg_attr(feature = "diagnostics", diagnostic(code(parser::internal)))]
    Internal(#[from] TreeBuildError),
}

fn display_expected(expected: &[TokenKind]) -> String {
    expected
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

impl ParseError {
    /// Where in the input the error was found
    #[must_use]
    pub const fn position(&self) -> Option<ParsePosition> {
        match self {
            Self::Lexical(error) => Some(error.position),
            Self::Syntax { position, .. } => Some(*position),
            Self::Internal(_) => None,
        }
    }

    /// Whether this is a grammar/tree builder bug rather than a problem with the input
    #[must_use]
    pub const fn is_internal(&self) -> bool {
        matches!(self, Self::Internal(_))
    }

    /// Token kinds that would have allowed the parse to continue
    #[must_use]
    pub fn expected(&self) -> &[TokenKind] {
        match self {
            Self::Syntax { expected, .. } => expected,
            _ => &[],
        }
    }
}

/// Errors that stop the compilation pipeline
#[derive(Debug, Error)]
pub enum CompileError {
    #[error("Cannot read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Internal error while parsing {}: {source}", origin.display())]
    Internal {
        origin: PathBuf,
        #[source]
        source: TreeBuildError,
    },

    #[error("Failed to build thread pool: {0}")]
    ThreadPool(String),

    #[error(transparent)]
    Grammar(#[from] GrammarError),

    #[error("{stage} failed with {errors} error(s)")]
    StageFailed { stage: &'static str, errors: usize },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn syntax_error_lists_expected_tokens() {
        let error = ParseError::Syntax {
            position: ParsePosition::new(1, 11),
            found: TokenKind::Semicolon,
            expected: vec![TokenKind::LeftParenthesis, TokenKind::Identifier],
        };
        assert_eq!(
            error.to_string(),
            "Syntax error at 1:11: found ';', expected one of: '(', identifier"
        );
        assert_eq!(error.position(), Some(ParsePosition::new(1, 11)));
        assert!(!error.is_internal());
    }

    #[test]
    fn lexical_errors_are_transparent() {
        let error: ParseError =
            LexerError::new(ParsePosition::new(2, 3), LexerErrorKind::UnterminatedComment).into();
        assert_eq!(error.to_string(), "Reached end of input while inside comment");
        assert_eq!(error.position(), Some(ParsePosition::new(2, 3)));
    }

    #[test]
    fn internal_errors_are_flagged() {
        let error: ParseError = TreeBuildError::NoReduction {
            rule: "Foo -> 'bar'".into(),
        }
        .into();
        assert!(error.is_internal());
        assert_eq!(error.position(), None);
    }
}
