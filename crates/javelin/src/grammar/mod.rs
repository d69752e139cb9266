//! # Grammar Module
//!
//! The immutable grammar model the Earley parser runs on.
//!
//! ## Overview
//!
//! - [`Rule`]: one production, a dense [`RuleId`], the name of the nonterminal it
//!   belongs to and an ordered list of [`Part`]s
//! - [`RuleCollection`]: all alternatives of one nonterminal
//! - [`Grammar`]: every rule and collection plus the start symbol
//! - [`GrammarBuilder`]: expands optional and repeated groups into plain rules
//!   and validates the result
//! - [`PredictCache`]: per nonterminal, the rules to instantiate on prediction
//!
//! A built grammar never has empty rules. Optional groups become extra
//! alternatives and each zero-or-more group becomes a generated, left recursive
//! `ZOM_n` collection.
//!
//! ## Usage
//!
//! ```rust
//! use javelin::grammar::GrammarBuilder;
//!
//! let grammar = GrammarBuilder::new()
//!     .read("Goal ::= List END_OF_INPUT ; List ::= '(' [ IDENTIFIER { ',' IDENTIFIER } ] ')' ;")?
//!     .start("Goal")
//!     .build()?;
//! assert_eq!(grammar.get_rules("List").map(|c| c.rules().len()), Some(3));
//! # Ok::<(), javelin::error::GrammarError>(())
//! ```

mod builder;
pub mod java;
mod predict;
mod reader;
mod validate;

pub use builder::{Element, GrammarBuilder};
pub use predict::PredictCache;

use crate::error::GrammarError;
use crate::lexer::TokenKind;
use hashbrown::HashMap;
use lasso::{RodeoReader, Spur};
use smallvec::SmallVec;
use std::fmt::Write;

/// Prefix of generated zero-or-more collections
pub const ZOM_PREFIX: &str = "ZOM_";

/// Dense, stable index of a rule within one [`Grammar`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RuleId(u32);

impl RuleId {
    #[must_use]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

/// Interned nonterminal name
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RuleName(Spur);

/// One element of a production
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Part {
    Token(TokenKind),
    Rule(RuleName),
}

/// A single production `name -> parts`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rule {
    id: RuleId,
    name: RuleName,
    parts: SmallVec<[Part; 4]>,
}

impl Rule {
    #[must_use]
    pub const fn id(&self) -> RuleId {
        self.id
    }

    #[must_use]
    pub const fn name(&self) -> RuleName {
        self.name
    }

    #[must_use]
    pub fn parts(&self) -> &[Part] {
        &self.parts
    }

    /// Number of parts
    #[must_use]
    pub fn size(&self) -> usize {
        self.parts.len()
    }

    #[must_use]
    pub fn part(&self, index: usize) -> Option<Part> {
        self.parts.get(index).copied()
    }

    /// The nonterminal of a unit production `X -> Y`
    #[must_use]
    pub fn unit_target(&self) -> Option<RuleName> {
        match self.parts.as_slice() {
            [Part::Rule(name)] => Some(*name),
            _ => None,
        }
    }

    /// Whether this is `X -> X ...`
    #[must_use]
    pub fn is_left_recursive(&self) -> bool {
        self.parts.len() > 1 && self.parts[0] == Part::Rule(self.name)
    }
}

/// The alternatives of one nonterminal, in definition order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleCollection {
    name: RuleName,
    rules: SmallVec<[RuleId; 4]>,
}

impl RuleCollection {
    #[must_use]
    pub const fn name(&self) -> RuleName {
        self.name
    }

    #[must_use]
    pub fn rules(&self) -> &[RuleId] {
        &self.rules
    }
}

/// An immutable, validated grammar.
///
/// `Grammar` is `Send + Sync` and is shared read-only by every parse.
#[derive(Debug)]
pub struct Grammar {
    rules: Vec<Rule>,
    collections: Vec<RuleCollection>,
    by_name: HashMap<RuleName, usize, ahash::RandomState>,
    names: RodeoReader,
    start: RuleName,
}

impl Grammar {
    /// The alternatives of the nonterminal called `name`
    #[must_use]
    pub fn get_rules(&self, name: &str) -> Option<&RuleCollection> {
        self.lookup(name).and_then(|name| self.collection(name))
    }

    #[must_use]
    pub fn collection(&self, name: RuleName) -> Option<&RuleCollection> {
        self.by_name.get(&name).map(|&index| &self.collections[index])
    }

    /// Collections in definition order
    pub fn collections(&self) -> impl Iterator<Item = &RuleCollection> {
        self.collections.iter()
    }

    /// The rule with the given id.
    ///
    /// # Panics
    ///
    /// Panics if `id` was not produced by this grammar.
    #[must_use]
    pub fn rule(&self, id: RuleId) -> &Rule {
        &self.rules[id.index()]
    }

    /// All rules, indexed by [`RuleId::index`]
    #[must_use]
    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    #[must_use]
    pub fn number_of_rules(&self) -> usize {
        self.rules.len()
    }

    #[must_use]
    pub const fn start(&self) -> RuleName {
        self.start
    }

    /// The text of an interned name
    #[must_use]
    pub fn name(&self, name: RuleName) -> &str {
        self.names.resolve(&name.0)
    }

    /// The interned name for `name`, if the grammar uses it
    #[must_use]
    pub fn lookup(&self, name: &str) -> Option<RuleName> {
        self.names.get(name).map(RuleName)
    }

    /// Check that every rule reference resolves, that no rule is empty and that
    /// every collection is reachable from the start symbol.
    ///
    /// # Errors
    ///
    /// Returns the first structural problem found.
    pub fn validate_rules(&self) -> Result<(), GrammarError> {
        validate::validate(self)
    }

    /// Render a rule as `Name -> 'token' Other`
    #[must_use]
    pub fn describe(&self, id: RuleId) -> String {
        let rule = self.rule(id);
        let mut text = format!("{} ->", self.name(rule.name));
        for part in rule.parts() {
            let _ = match part {
                Part::Token(kind) => write!(text, " {kind}"),
                Part::Rule(name) => write!(text, " {}", self.name(*name)),
            };
        }
        text
    }
}
