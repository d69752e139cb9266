//! One query surface over several state sets of the same column

use crate::earley::state::State;
use crate::grammar::RuleName;
use crate::lexer::TokenKind;
use hashbrown::HashSet;
use std::collections::BTreeSet;

/// The queries the parser runs against the states of one column
pub trait MultiState {
    /// States whose dot is at the end of their rule
    fn completed_states(&self) -> impl Iterator<Item = &State>;

    /// Nonterminals that pending states wait on
    fn predict_rule_names(&self) -> HashSet<RuleName, ahash::RandomState>;

    /// Pending states whose next part is the nonterminal `name`
    fn states_waiting_on_rule(&self, name: RuleName) -> impl Iterator<Item = &State>;

    /// Pending states whose next part is the token `kind`
    fn states_waiting_on_token(&self, kind: TokenKind) -> impl Iterator<Item = &State>;

    /// Token kinds that pending states wait on
    fn possible_next_tokens(&self) -> BTreeSet<TokenKind>;
}

/// Union view over up to three state sets.
///
/// Every query answers with the union of the same query on each present
/// constituent; nothing is copied into a combined set.
#[derive(Debug)]
pub struct MergedMultiState<'a, M> {
    m1: &'a M,
    m2: Option<&'a M>,
    m3: Option<&'a M>,
}

impl<M> Clone for MergedMultiState<'_, M> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<M> Copy for MergedMultiState<'_, M> {}

impl<'a, M: MultiState> MergedMultiState<'a, M> {
    #[must_use]
    pub const fn new(m1: &'a M, m2: Option<&'a M>, m3: Option<&'a M>) -> Self {
        Self { m1, m2, m3 }
    }

    fn parts(&self) -> impl Iterator<Item = &'a M> {
        std::iter::once(self.m1).chain(self.m2).chain(self.m3)
    }
}

impl<M: MultiState> MultiState for MergedMultiState<'_, M> {
    fn completed_states(&self) -> impl Iterator<Item = &State> {
        self.parts().flat_map(MultiState::completed_states)
    }

    fn predict_rule_names(&self) -> HashSet<RuleName, ahash::RandomState> {
        let mut names = self.m1.predict_rule_names();
        for part in self.parts().skip(1) {
            names.extend(part.predict_rule_names());
        }
        names
    }

    fn states_waiting_on_rule(&self, name: RuleName) -> impl Iterator<Item = &State> {
        self.parts().flat_map(move |part| part.states_waiting_on_rule(name))
    }

    fn states_waiting_on_token(&self, kind: TokenKind) -> impl Iterator<Item = &State> {
        self.parts().flat_map(move |part| part.states_waiting_on_token(kind))
    }

    fn possible_next_tokens(&self) -> BTreeSet<TokenKind> {
        self.parts().flat_map(MultiState::possible_next_tokens).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::earley::chart::StateSet;
    use crate::grammar::{Grammar, GrammarBuilder};

    fn grammar() -> Grammar {
        GrammarBuilder::new()
            .read("Goal ::= Sum END_OF_INPUT ; Sum ::= Sum '+' Number | Number ; Number ::= INT_LITERAL | '(' Sum ')' ;")
            .and_then(GrammarBuilder::build)
            .expect("grammar should build")
    }

    fn set(grammar: &Grammar, rules: &[usize]) -> StateSet {
        let mut set = StateSet::default();
        for &index in rules {
            set.insert(State::predicted(grammar.rules()[index].id(), 0), grammar);
        }
        set
    }

    #[test]
    fn queries_are_unions_of_the_constituents() {
        let grammar = grammar();
        let (a, b, c) = (set(&grammar, &[0, 1]), set(&grammar, &[2]), set(&grammar, &[3, 4]));
        let merged = MergedMultiState::new(&a, Some(&b), Some(&c));

        let tokens: BTreeSet<_> = [TokenKind::IntLiteral, TokenKind::LeftParenthesis].into();
        assert_eq!(merged.possible_next_tokens(), tokens);

        let sum = grammar.lookup("Sum").expect("Sum is interned");
        let mut names = a.predict_rule_names();
        names.extend(b.predict_rule_names());
        names.extend(c.predict_rule_names());
        assert_eq!(merged.predict_rule_names(), names);
        assert_eq!(merged.states_waiting_on_rule(sum).count(), 2);
        assert_eq!(merged.completed_states().count(), 0);
    }

    #[test]
    fn a_single_constituent_is_passed_through() {
        let grammar = grammar();
        let a = set(&grammar, &[3, 4]);
        let merged = MergedMultiState::new(&a, None, None);
        assert_eq!(merged.possible_next_tokens(), a.possible_next_tokens());
        assert_eq!(
            merged.states_waiting_on_token(TokenKind::IntLiteral).count(),
            a.states_waiting_on_token(TokenKind::IntLiteral).count()
        );
    }
}
