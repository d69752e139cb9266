//! The bundled Java grammar.
//!
//! The grammar text lives in `java.grammar` next to this file and is written
//! in the format read by [`GrammarBuilder::read`]:
//!
//! ```text
//! # comment
//! Name ::= 'keyword' IDENTIFIER [Optional] {Repeated} | Other ;
//! ```
//!
//! Quoted texts are fixed tokens, upper-case names are token kinds, every
//! other name refers to a rule. The text has no goal of its own; callers pick
//! one so that the same rules serve whole files and smaller fragments.

use super::{Element, Grammar, GrammarBuilder};
use crate::error::GrammarError;
use crate::lexer::TokenKind;

/// The Java grammar text, without a goal
pub const JAVA_GRAMMAR: &str = include_str!("java.grammar");

/// Name of the generated goal collection
pub const GOAL: &str = "Goal";

/// `Goal ::= [CompilationUnit] END_OF_INPUT`, the grammar for whole source files
///
/// # Errors
///
/// Fails only if the bundled grammar text is broken.
pub fn compilation_unit_grammar() -> Result<Grammar, GrammarError> {
    with_goal(Element::Optional(vec![Element::rule("CompilationUnit")]))
}

/// `Goal ::= name END_OF_INPUT`, keeping only the rules `name` can reach.
///
/// Used to parse fragments such as a single `Block` or `Expression`.
///
/// # Errors
///
/// Returns [`GrammarError::UndefinedRule`] if the grammar has no rule `name`.
pub fn grammar_for_goal(name: &str) -> Result<Grammar, GrammarError> {
    with_goal(Element::rule(name))
}

fn with_goal(target: Element) -> Result<Grammar, GrammarError> {
    GrammarBuilder::new()
        .rule(GOAL, vec![target, Element::Token(TokenKind::EndOfInput)])
        .read(JAVA_GRAMMAR)?
        .start(GOAL)
        .prune_unreachable(true)
        .build()
}
