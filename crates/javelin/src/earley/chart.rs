//! State sets and columns of the chart

use crate::earley::merged::{MergedMultiState, MultiState};
use crate::earley::state::{State, StateKey};
use crate::grammar::{Grammar, Part, RuleName};
use crate::lexer::TokenKind;
use hashbrown::{HashMap, HashSet};
use smallvec::SmallVec;
use std::collections::BTreeSet;

type Indices = SmallVec<[usize; 4]>;

/// States in insertion order, indexed by what they wait on
#[derive(Debug, Default)]
pub struct StateSet {
    states: Vec<State>,
    completed: Vec<usize>,
    waiting_on_rule: HashMap<RuleName, Indices, ahash::RandomState>,
    waiting_on_token: HashMap<TokenKind, Indices, ahash::RandomState>,
}

impl StateSet {
    /// Add a state; deduplication is the caller's business
    pub fn insert(&mut self, state: State, grammar: &Grammar) -> usize {
        let index = self.states.len();
        match state.next_part(grammar) {
            None => self.completed.push(index),
            Some(Part::Rule(name)) => self.waiting_on_rule.entry(name).or_default().push(index),
            Some(Part::Token(kind)) => self.waiting_on_token.entry(kind).or_default().push(index),
        }
        self.states.push(state);
        index
    }

    #[must_use]
    pub fn get(&self, index: usize) -> Option<&State> {
        self.states.get(index)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.states.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }

    fn lookup<'s>(&'s self, indices: Option<&'s Indices>) -> impl Iterator<Item = &'s State> {
        indices
            .into_iter()
            .flatten()
            .filter_map(|&index| self.states.get(index))
    }
}

impl MultiState for StateSet {
    fn completed_states(&self) -> impl Iterator<Item = &State> {
        self.completed.iter().filter_map(|&index| self.states.get(index))
    }

    fn predict_rule_names(&self) -> HashSet<RuleName, ahash::RandomState> {
        self.waiting_on_rule.keys().copied().collect()
    }

    fn states_waiting_on_rule(&self, name: RuleName) -> impl Iterator<Item = &State> {
        self.lookup(self.waiting_on_rule.get(&name))
    }

    fn states_waiting_on_token(&self, kind: TokenKind) -> impl Iterator<Item = &State> {
        self.lookup(self.waiting_on_token.get(&kind))
    }

    fn possible_next_tokens(&self) -> BTreeSet<TokenKind> {
        self.waiting_on_token.keys().copied().collect()
    }
}

/// How a state entered its column
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Segment {
    /// Advanced over the token that ends at this column
    Scanned,
    /// Advanced over a rule completed at this column
    Completed,
    /// Predicted here with the dot at the start
    Predicted,
}

/// All states valid at one input offset.
///
/// The states are kept in three sets by how they were produced and queried
/// through a [`MergedMultiState`]. A state is added at most once per
/// `(rule, dot, origin)`; the first derivation to arrive is kept.
#[derive(Debug)]
pub struct Column {
    index: usize,
    scanned: StateSet,
    completed: StateSet,
    predicted: StateSet,
    keys: HashSet<StateKey, ahash::RandomState>,
    predicted_names: HashSet<RuleName, ahash::RandomState>,
    agenda: Vec<(Segment, usize)>,
}

impl Column {
    #[must_use]
    pub fn new(index: usize) -> Self {
        Self {
            index,
            scanned: StateSet::default(),
            completed: StateSet::default(),
            predicted: StateSet::default(),
            keys: HashSet::with_hasher(ahash::RandomState::new()),
            predicted_names: HashSet::with_hasher(ahash::RandomState::new()),
            agenda: Vec::new(),
        }
    }

    /// Position of this column in the input, in significant tokens
    #[must_use]
    pub const fn index(&self) -> usize {
        self.index
    }

    /// Add `state` unless an equal state is present. Returns whether it was added.
    pub fn add(&mut self, segment: Segment, state: State, grammar: &Grammar) -> bool {
        if !self.keys.insert(state.key()) {
            return false;
        }
        let set = match segment {
            Segment::Scanned => &mut self.scanned,
            Segment::Completed => &mut self.completed,
            Segment::Predicted => &mut self.predicted,
        };
        let index = set.insert(state, grammar);
        self.agenda.push((segment, index));
        true
    }

    /// Record that `name` is predicted here. Returns `false` if it already was.
    pub fn mark_predicted(&mut self, name: RuleName) -> bool {
        self.predicted_names.insert(name)
    }

    /// The `n`th state added to this column
    #[must_use]
    pub fn agenda(&self, n: usize) -> Option<&State> {
        let &(segment, index) = self.agenda.get(n)?;
        match segment {
            Segment::Scanned => self.scanned.get(index),
            Segment::Completed => self.completed.get(index),
            Segment::Predicted => self.predicted.get(index),
        }
    }

    /// Every state of the column behind one query surface
    #[must_use]
    pub fn view(&self) -> MergedMultiState<'_, StateSet> {
        MergedMultiState::new(&self.scanned, non_empty(&self.completed), non_empty(&self.predicted))
    }

    /// Number of states
    #[must_use]
    pub fn len(&self) -> usize {
        self.keys.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    /// State counts per segment, for tracing
    #[must_use]
    pub fn segment_sizes(&self) -> (usize, usize, usize) {
        (self.scanned.len(), self.completed.len(), self.predicted.len())
    }
}

fn non_empty(set: &StateSet) -> Option<&StateSet> {
    (!set.is_empty()).then_some(set)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grammar::GrammarBuilder;

    #[test]
    fn states_are_deduplicated_by_rule_dot_and_origin() {
        let grammar = GrammarBuilder::new()
            .read("Goal ::= Nested END_OF_INPUT ; Nested ::= IDENTIFIER | '(' Nested ')' ;")
            .and_then(GrammarBuilder::build)
            .expect("grammar should build");
        let rule = grammar.rules()[1].id();

        let mut column = Column::new(0);
        assert!(column.add(Segment::Predicted, State::predicted(rule, 0), &grammar));
        assert!(!column.add(Segment::Scanned, State::predicted(rule, 0), &grammar));
        assert!(column.add(Segment::Predicted, State::predicted(rule, 1), &grammar));
        assert_eq!(column.len(), 2);
        assert_eq!(column.segment_sizes(), (0, 0, 2));
        assert_eq!(column.agenda(1).map(State::origin), Some(1));
        assert!(column.view().possible_next_tokens().contains(&TokenKind::Identifier));
    }
}
