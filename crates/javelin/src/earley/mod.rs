//! # Earley Parser
//!
//! A chart parser for any context-free grammar without empty rules,
//! including left recursive and ambiguous ones.
//!
//! The chart has one [`Column`](chart::Column) per significant input token.
//! Each column is closed by predicting and completing until nothing new is
//! added; scanning the next token then seeds the following column. Completed
//! rules are reduced through the [`TreeBuilder`] as soon as they complete, so
//! every state carries the tree nodes of the parts it has matched.
//!
//! A parser borrows the grammar, its [`PredictCache`] and the tree builder,
//! all of which are read only and can be shared by any number of parses
//! running on different threads.
//!
//! ## Ambiguity
//!
//! States are deduplicated by rule, dot and origin. When two derivations of
//! the same rule cover the same span, the one that reached the column first
//! is kept. Insertion order is deterministic, so the same input always gives
//! the same tree.

mod chart;
mod config;
mod merged;
mod parser;
mod state;

pub use chart::{Column, Segment, StateSet};
pub use config::EarleyConfig;
pub use merged::{MergedMultiState, MultiState};
pub use state::{State, StateKey};

use crate::error::ParseError;
use crate::grammar::{Grammar, PredictCache};
use crate::lexer::TokenSource;
use crate::syntax::{TreeBuilder, TreeNode};
use std::sync::Arc;

/// Earley parser over a borrowed grammar.
///
/// # Example
///
/// ```rust
/// use javelin::earley::{EarleyConfig, EarleyParser};
/// use javelin::grammar::{GrammarBuilder, PredictCache};
/// use javelin::lexer::Lexer;
/// use javelin::syntax::TreeBuilder;
///
/// let grammar = GrammarBuilder::new()
///     .read("Goal ::= Sum END_OF_INPUT ; Sum ::= Sum '+' INT_LITERAL | INT_LITERAL ;")?
///     .build()?;
/// let predictions = PredictCache::new(&grammar);
/// let builder = TreeBuilder::generic(&grammar);
/// let config = EarleyConfig::default();
/// let parser = EarleyParser::new(&grammar, &predictions, &builder, &config);
///
/// let root = parser.parse(&mut Lexer::new("1 + 2 + 3")).expect("valid input");
/// assert_eq!(root.leaf_kinds().len(), 6);
/// # Ok::<(), javelin::error::GrammarError>(())
/// ```
#[derive(Debug, Clone, Copy)]
pub struct EarleyParser<'g> {
    grammar: &'g Grammar,
    predictions: &'g PredictCache,
    builder: &'g TreeBuilder,
    config: &'g EarleyConfig,
}

impl<'g> EarleyParser<'g> {
    #[must_use]
    pub const fn new(
        grammar: &'g Grammar,
        predictions: &'g PredictCache,
        builder: &'g TreeBuilder,
        config: &'g EarleyConfig,
    ) -> Self {
        Self {
            grammar,
            predictions,
            builder,
            config,
        }
    }

    #[must_use]
    pub const fn grammar(&self) -> &'g Grammar {
        self.grammar
    }

    #[must_use]
    pub const fn config(&self) -> &'g EarleyConfig {
        self.config
    }

    /// Parse everything `source` produces and return the reduced start rule.
    ///
    /// # Errors
    ///
    /// - [`ParseError::Lexical`] for the first `ERROR` token
    /// - [`ParseError::Syntax`] at the first token no state can accept
    /// - [`ParseError::Internal`] when a completed rule cannot be reduced
    pub fn parse(&self, source: &mut impl TokenSource) -> Result<Arc<TreeNode>, ParseError> {
        parser::parse(self, source)
    }
}
