use crate::error::GrammarError;
use crate::grammar::{Grammar, Part, Rule, RuleCollection, RuleId, RuleName, ZOM_PREFIX, reader};
use crate::lexer::TokenKind;
use compact_str::CompactString;
use hashbrown::{HashMap, HashSet};
use lasso::Rodeo;
use smallvec::{SmallVec, smallvec};

type Production = SmallVec<[Part; 4]>;

/// One element of a production before expansion
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Element {
    Token(TokenKind),
    Rule(CompactString),
    /// `[ ... ]`
    Optional(Vec<Element>),
    /// `{ ... }`
    ZeroOrMore(Vec<Element>),
}

impl Element {
    #[must_use]
    pub fn rule(name: &str) -> Self {
        Self::Rule(name.into())
    }
}

/// Builder for [`Grammar`]s.
///
/// Alternatives may contain optional and zero-or-more groups. [`build`](Self::build)
/// expands them:
///
/// - `A ::= x [y] z` becomes `A -> x z` and `A -> x y z`
/// - `A ::= x {y}` becomes `A -> x`, `A -> x ZOM_1`, `ZOM_1 -> y` and `ZOM_1 -> ZOM_1 y`
///
/// Identical zero-or-more bodies share one generated collection.
///
/// # Example
///
/// ```rust
/// use javelin::grammar::{Element, GrammarBuilder};
/// use javelin::lexer::TokenKind;
///
/// let grammar = GrammarBuilder::new()
///     .rule("Goal", vec![Element::rule("Block"), Element::Token(TokenKind::EndOfInput)])
///     .rule("Block", vec![
///         Element::Token(TokenKind::LeftCurly),
///         Element::ZeroOrMore(vec![Element::Token(TokenKind::Semicolon)]),
///         Element::Token(TokenKind::RightCurly),
///     ])
///     .start("Goal")
///     .build()
///     .expect("Failed to build grammar");
/// assert!(grammar.get_rules("ZOM_1").is_some());
/// ```
#[derive(Debug, Default)]
pub struct GrammarBuilder {
    alternatives: Vec<(CompactString, Vec<Element>)>,
    start: Option<CompactString>,
    prune_unreachable: bool,
}

impl GrammarBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add one alternative for `name`
    #[must_use]
    pub fn rule(mut self, name: &str, elements: Vec<Element>) -> Self {
        self.alternatives.push((name.into(), elements));
        self
    }

    /// Add every production of a grammar text, see [`java`](crate::grammar::java)
    /// for the format.
    ///
    /// # Errors
    ///
    /// Returns [`GrammarError::Syntax`] or [`GrammarError::UnknownToken`] for
    /// malformed text.
    pub fn read(mut self, text: &str) -> Result<Self, GrammarError> {
        self.alternatives.extend(reader::read(text)?);
        Ok(self)
    }

    /// Set the start symbol
    #[must_use]
    pub fn start(mut self, name: &str) -> Self {
        self.start = Some(name.into());
        self
    }

    /// Drop collections the start symbol cannot reach instead of rejecting them
    #[must_use]
    pub fn prune_unreachable(mut self, prune: bool) -> Self {
        self.prune_unreachable = prune;
        self
    }

    /// Expand, number and validate the rules.
    ///
    /// # Errors
    ///
    /// Returns a [`GrammarError`] if an alternative expands to nothing, the start
    /// symbol is missing, a rule reference dangles, or (unless pruning) a rule is
    /// unreachable.
    pub fn build(self) -> Result<Grammar, GrammarError> {
        let start_name = self
            .start
            .clone()
            .or_else(|| self.alternatives.first().map(|(name, _)| name.clone()))
            .ok_or_else(|| GrammarError::MissingStartRule(String::new()))?;

        let mut expander = Expander::default();
        for (name, elements) in &self.alternatives {
            let lhs = RuleName(expander.interner.get_or_intern(name.as_str()));
            for parts in expander.expand(elements)? {
                if parts.is_empty() {
                    return Err(GrammarError::EmptyProduction(name.to_string()));
                }
                expander.add(lhs, parts);
            }
        }
        let start = RuleName(expander.interner.get_or_intern(start_name.as_str()));

        let mut productions = expander.productions;
        if self.prune_unreachable {
            let reachable = reachable_from(start, &productions);
            productions.retain(|(name, _)| reachable.contains(name));
        }

        let grammar = assemble(productions, expander.interner, start);
        grammar.validate_rules()?;
        log::debug!(
            "Built grammar with {} rules in {} collections",
            grammar.number_of_rules(),
            grammar.collections.len()
        );
        Ok(grammar)
    }
}

#[derive(Default)]
struct Expander {
    interner: Rodeo,
    /// Productions grouped by collection, collections in first seen order
    productions: Vec<(RuleName, Vec<Production>)>,
    zom_rules: HashMap<Vec<Element>, RuleName, ahash::RandomState>,
}

impl Expander {
    fn add(&mut self, name: RuleName, parts: Production) {
        match self.productions.iter_mut().find(|(existing, _)| *existing == name) {
            Some((_, alternatives)) => {
                if !alternatives.contains(&parts) {
                    alternatives.push(parts);
                }
            }
            None => self.productions.push((name, vec![parts])),
        }
    }

    /// Every plain sequence `elements` can stand for, shortest first
    fn expand(&mut self, elements: &[Element]) -> Result<Vec<Production>, GrammarError> {
        let mut sequences: Vec<Production> = vec![Production::new()];
        for element in elements {
            match element {
                Element::Token(kind) => {
                    for sequence in &mut sequences {
                        sequence.push(Part::Token(*kind));
                    }
                }
                Element::Rule(name) => {
                    let name = RuleName(self.interner.get_or_intern(name.as_str()));
                    for sequence in &mut sequences {
                        sequence.push(Part::Rule(name));
                    }
                }
                Element::Optional(inner) => {
                    let inner = self.expand(inner)?;
                    sequences = with_optional(&sequences, &inner);
                }
                Element::ZeroOrMore(inner) => {
                    let zom = self.zero_or_more(inner)?;
                    sequences = with_optional(&sequences, &[smallvec![Part::Rule(zom)]]);
                }
            }
        }
        Ok(sequences)
    }

    fn zero_or_more(&mut self, inner: &[Element]) -> Result<RuleName, GrammarError> {
        if let Some(&name) = self.zom_rules.get(inner) {
            return Ok(name);
        }
        let text = format!("{ZOM_PREFIX}{}", self.zom_rules.len() + 1);
        let name = RuleName(self.interner.get_or_intern(&text));
        self.zom_rules.insert(inner.to_vec(), name);

        for body in self.expand(inner)? {
            if body.is_empty() {
                return Err(GrammarError::EmptyProduction(text));
            }
            let mut repeated: Production = smallvec![Part::Rule(name)];
            repeated.extend(body.iter().copied());
            self.add(name, body);
            self.add(name, repeated);
        }
        Ok(name)
    }
}

fn with_optional(sequences: &[Production], optional: &[Production]) -> Vec<Production> {
    let mut result = Vec::with_capacity(sequences.len() * (optional.len() + 1));
    for sequence in sequences {
        result.push(sequence.clone());
        for present in optional {
            let mut extended = sequence.clone();
            extended.extend(present.iter().copied());
            result.push(extended);
        }
    }
    result
}

fn reachable_from(
    start: RuleName,
    productions: &[(RuleName, Vec<Production>)],
) -> HashSet<RuleName, ahash::RandomState> {
    let index: HashMap<RuleName, &Vec<Production>, ahash::RandomState> =
        productions.iter().map(|(name, alternatives)| (*name, alternatives)).collect();
    let mut reachable = HashSet::with_hasher(ahash::RandomState::new());
    let mut pending = vec![start];
    while let Some(name) = pending.pop() {
        if !reachable.insert(name) {
            continue;
        }
        for parts in index.get(&name).into_iter().flat_map(|alternatives| alternatives.iter()) {
            for part in parts {
                if let Part::Rule(child) = part {
                    pending.push(*child);
                }
            }
        }
    }
    reachable
}

fn assemble(productions: Vec<(RuleName, Vec<Production>)>, interner: Rodeo, start: RuleName) -> Grammar {
    let mut rules = Vec::new();
    let mut collections = Vec::with_capacity(productions.len());
    let mut by_name = HashMap::with_hasher(ahash::RandomState::new());
    for (name, alternatives) in productions {
        let mut ids = SmallVec::new();
        for parts in alternatives {
            let id = RuleId(u32::try_from(rules.len()).unwrap_or(u32::MAX));
            rules.push(Rule { id, name, parts });
            ids.push(id);
        }
        by_name.insert(name, collections.len());
        collections.push(RuleCollection { name, rules: ids });
    }
    Grammar {
        rules,
        collections,
        by_name,
        names: interner.into_reader(),
        start,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parts_of(grammar: &Grammar, name: &str) -> Vec<String> {
        grammar
            .get_rules(name)
            .map(|collection| collection.rules().iter().map(|id| grammar.describe(*id)).collect())
            .unwrap_or_default()
    }

    #[test]
    fn optional_groups_become_alternatives() {
        let grammar = GrammarBuilder::new()
            .read("Goal ::= 'class' ['final'] ['static'] END_OF_INPUT ;")
            .and_then(GrammarBuilder::build)
            .expect("grammar should build");
        assert_eq!(
            parts_of(&grammar, "Goal"),
            [
                "Goal -> 'class' end of input",
                "Goal -> 'class' 'static' end of input",
                "Goal -> 'class' 'final' end of input",
                "Goal -> 'class' 'final' 'static' end of input",
            ]
        );
    }

    #[test]
    fn zero_or_more_is_left_recursive_and_shared() {
        let grammar = GrammarBuilder::new()
            .read("Goal ::= Head Tail END_OF_INPUT ; Head ::= 'class' {','} ; Tail ::= 'final' {','} ;")
            .and_then(GrammarBuilder::build)
            .expect("grammar should build");
        assert_eq!(parts_of(&grammar, "ZOM_1"), ["ZOM_1 -> ','", "ZOM_1 -> ZOM_1 ','"]);
        assert!(grammar.get_rules("ZOM_2").is_none());
        assert_eq!(parts_of(&grammar, "Tail"), ["Tail -> 'final'", "Tail -> 'final' ZOM_1"]);
    }

    #[test]
    fn fully_optional_alternative_is_rejected() {
        let error = GrammarBuilder::new()
            .read("Goal ::= Item END_OF_INPUT ; Item ::= [';'] ;")
            .and_then(GrammarBuilder::build)
            .expect_err("empty alternative");
        assert_eq!(error, GrammarError::EmptyProduction("Item".into()));
    }

    #[test]
    fn pruning_drops_unreachable_collections() {
        let text = "Goal ::= Item END_OF_INPUT ; Item ::= IDENTIFIER ; Unused ::= ';' ;";
        let error = GrammarBuilder::new()
            .read(text)
            .and_then(GrammarBuilder::build)
            .expect_err("unreachable rule");
        assert_eq!(error, GrammarError::UnreachableRule("Unused".into()));

        let grammar = GrammarBuilder::new()
            .read(text)
            .and_then(|builder| builder.prune_unreachable(true).build())
            .expect("pruned grammar should build");
        assert!(grammar.get_rules("Unused").is_none());
        assert_eq!(grammar.number_of_rules(), 2);
    }
}
