use crate::grammar::{Grammar, RuleId, RuleName};
use hashbrown::HashMap;
use smallvec::SmallVec;

/// For every nonterminal, the rules a waiting state predicts.
///
/// Built once per grammar and only read afterwards, so one cache is shared by
/// every parse.
#[derive(Debug, Clone)]
pub struct PredictCache {
    predictions: HashMap<RuleName, SmallVec<[RuleId; 4]>, ahash::RandomState>,
}

impl PredictCache {
    #[must_use]
    pub fn new(grammar: &Grammar) -> Self {
        let predictions = grammar
            .collections()
            .map(|collection| (collection.name(), collection.rules().iter().copied().collect()))
            .collect();
        Self { predictions }
    }

    /// Rules to instantiate at dot 0 when a state waits on `name`.
    ///
    /// Unknown names predict nothing.
    #[must_use]
    pub fn get(&self, name: RuleName) -> &[RuleId] {
        self.predictions.get(&name).map(|ids| ids.as_slice()).unwrap_or_default()
    }

    /// Number of nonterminals with predictions
    #[must_use]
    pub fn len(&self) -> usize {
        self.predictions.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.predictions.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grammar::GrammarBuilder;

    #[test]
    fn predictions_are_the_alternatives_in_order() {
        let grammar = GrammarBuilder::new()
            .read("Goal ::= Value END_OF_INPUT ; Value ::= Pair | IDENTIFIER ; Pair ::= '(' Value ')' ;")
            .and_then(GrammarBuilder::build)
            .expect("grammar should build");
        let cache = PredictCache::new(&grammar);
        let value = grammar.lookup("Value").expect("Value exists");
        let expected = grammar.get_rules("Value").expect("Value exists").rules();
        assert_eq!(cache.get(value), expected);
        assert_eq!(cache.get(value).len(), 2);
        assert_eq!(cache.len(), 3);
    }
}
