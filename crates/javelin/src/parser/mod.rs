//! # Parser Module
//!
//! Ties a grammar, its predict cache and a tree builder together into a
//! [`Parser`] that can be shared by any number of concurrent parses.
//!
//! ## Overview
//!
//! - [`Parser`]: parses one token source or one source text
//! - [`ParallelParser`]: parses a [`ParseBatch`] of files, on a rayon thread
//!   pool when the `parallel` feature is enabled
//! - [`source::SourceProvider`]: finds the source files of a compilation
//!
//! ## Example
//!
//! ```rust
//! use javelin::parser::Parser;
//! use javelin::syntax::TreeNode;
//!
//! let parser = Parser::for_goal("Block").expect("bundled grammar is valid");
//! let block = parser.parse_str("{ int a = b + c; }").expect("valid block");
//! let TreeNode::Block(block) = block else { panic!("not a block") };
//! assert_eq!(block.statements.len(), 1);
//! ```

pub mod parallel;
pub mod source;

pub use parallel::{FileParseResult, ParallelConfig, ParallelParser, ParseBatch, ParseSummary, aggregate_results};

use crate::earley::{EarleyConfig, EarleyParser};
use crate::error::{GrammarError, ParseError};
use crate::grammar::{Grammar, PredictCache, java};
use crate::lexer::{Lexer, TokenSource};
use crate::syntax::{SyntaxTree, TreeBuilder, TreeNode};
use std::path::Path;
use std::sync::Arc;
use std::time::Instant;

/// Everything a parse needs that does not change between files
#[derive(Debug)]
pub struct Parser {
    grammar: Grammar,
    predictions: PredictCache,
    builder: TreeBuilder,
    config: EarleyConfig,
}

impl Parser {
    /// Parser for whole compilation units of the bundled Java grammar
    ///
    /// # Errors
    ///
    /// Returns a [`GrammarError`] if the bundled grammar does not validate.
    pub fn java() -> Result<Self, GrammarError> {
        let grammar = java::compilation_unit_grammar()?;
        let builder = TreeBuilder::java(&grammar);
        Ok(Self::new(grammar, builder))
    }

    /// Parser for a single construct of the Java grammar, such as `Block` or
    /// `Expression`
    ///
    /// # Errors
    ///
    /// Returns [`GrammarError::UndefinedRule`] if the grammar has no collection `goal`.
    pub fn for_goal(goal: &str) -> Result<Self, GrammarError> {
        let grammar = java::grammar_for_goal(goal)?;
        let builder = TreeBuilder::java(&grammar);
        Ok(Self::new(grammar, builder))
    }

    /// Parser for an arbitrary grammar, producing generic nodes
    #[must_use]
    pub fn generic(grammar: Grammar) -> Self {
        let builder = TreeBuilder::generic(&grammar);
        Self::new(grammar, builder)
    }

    #[must_use]
    pub fn new(grammar: Grammar, builder: TreeBuilder) -> Self {
        let predictions = PredictCache::new(&grammar);
        Self {
            grammar,
            predictions,
            builder,
            config: EarleyConfig::default(),
        }
    }

    #[must_use]
    pub fn with_config(mut self, config: EarleyConfig) -> Self {
        self.config = config;
        self
    }

    #[must_use]
    pub const fn grammar(&self) -> &Grammar {
        &self.grammar
    }

    #[must_use]
    pub const fn config(&self) -> &EarleyConfig {
        &self.config
    }

    /// The chart parser over this parser's shared tables
    #[must_use]
    pub fn earley(&self) -> EarleyParser<'_> {
        EarleyParser::new(&self.grammar, &self.predictions, &self.builder, &self.config)
    }

    /// Parse everything `source` produces
    ///
    /// # Errors
    ///
    /// Returns the lexical or syntax error that stopped the parse, or
    /// [`ParseError::Internal`] if the grammar and tree builder disagree.
    pub fn parse(&self, source: &mut impl TokenSource) -> Result<TreeNode, ParseError> {
        self.earley().parse(source).map(Arc::unwrap_or_clone)
    }

    /// Parse a source text
    ///
    /// # Errors
    ///
    /// See [`parse`](Self::parse).
    pub fn parse_str(&self, text: &str) -> Result<TreeNode, ParseError> {
        self.parse(&mut Lexer::new(text))
    }

    /// Parse the text of the file at `origin` into its syntax tree
    ///
    /// # Errors
    ///
    /// See [`parse`](Self::parse).
    pub fn parse_source(&self, origin: &Path, text: &str) -> Result<SyntaxTree, ParseError> {
        let started = Instant::now();
        let result = self.parse_str(text);
        match &result {
            Ok(_) => log::debug!("parsed {} in {:?}", origin.display(), started.elapsed()),
            Err(error) => log::warn!("{}: {error}", origin.display()),
        }
        result.map(|root| SyntaxTree::new(origin, root))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grammar::GrammarBuilder;
    use crate::lexer::TokenKind;

    #[test]
    fn parsers_are_shareable_between_threads() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Parser>();
    }

    #[test]
    fn source_origin_is_kept() {
        let parser = Parser::java().expect("bundled grammar is valid");
        let tree = parser
            .parse_source(Path::new("src/Empty.java"), "class Empty {}")
            .expect("valid compilation unit");
        assert_eq!(tree.origin(), Path::new("src/Empty.java"));
        let unit = tree.compilation_unit().expect("compilation unit root");
        assert_eq!(unit.types.len(), 1);
    }

    #[test]
    fn generic_parsers_accept_any_grammar() {
        let grammar = GrammarBuilder::new()
            .read("Pair ::= '(' IDENTIFIER ',' IDENTIFIER ')' ;")
            .and_then(GrammarBuilder::build)
            .expect("grammar should build");
        let parser = Parser::generic(grammar);
        let node = parser.parse_str("(a, b)").expect("valid pair");
        assert_eq!(node.leaf_kinds().first(), Some(&TokenKind::LeftParenthesis));
        assert_eq!(node.leaf_kinds().len(), 5);
    }
}
