use crate::error::GrammarError;
use crate::grammar::{Grammar, Part};
use hashbrown::HashSet;

/// Structural checks, in order: start symbol, dangling references, empty
/// rules, reachability.
pub(crate) fn validate(grammar: &Grammar) -> Result<(), GrammarError> {
    let start = grammar.start();
    if grammar.collection(start).is_none() {
        return Err(GrammarError::MissingStartRule(grammar.name(start).to_string()));
    }

    for rule in grammar.rules() {
        for part in rule.parts() {
            if let Part::Rule(name) = part
                && grammar.collection(*name).is_none()
            {
                return Err(GrammarError::UndefinedRule {
                    rule: grammar.name(rule.name()).to_string(),
                    name: grammar.name(*name).to_string(),
                });
            }
        }
    }

    if let Some(rule) = grammar.rules().iter().find(|rule| rule.size() == 0) {
        return Err(GrammarError::EmptyProduction(grammar.name(rule.name()).to_string()));
    }

    let mut reachable = HashSet::with_hasher(ahash::RandomState::new());
    let mut pending = vec![start];
    while let Some(name) = pending.pop() {
        if !reachable.insert(name) {
            continue;
        }
        let Some(collection) = grammar.collection(name) else {
            continue;
        };
        for &id in collection.rules() {
            pending.extend(grammar.rule(id).parts().iter().filter_map(|part| match part {
                Part::Rule(child) => Some(*child),
                Part::Token(_) => None,
            }));
        }
    }
    if let Some(unreachable) = grammar.collections().find(|c| !reachable.contains(&c.name())) {
        return Err(GrammarError::UnreachableRule(grammar.name(unreachable.name()).to_string()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use crate::error::GrammarError;
    use crate::grammar::GrammarBuilder;

    fn build(text: &str) -> Result<crate::grammar::Grammar, GrammarError> {
        GrammarBuilder::new().read(text)?.start("Goal").build()
    }

    #[test]
    fn dangling_reference() {
        assert_eq!(
            build("Goal ::= Missing END_OF_INPUT ;").map(|_| ()),
            Err(GrammarError::UndefinedRule {
                rule: "Goal".into(),
                name: "Missing".into()
            })
        );
    }

    #[test]
    fn missing_start_rule_is_reported_first() {
        let result = GrammarBuilder::new()
            .read("Item ::= Missing ;")
            .and_then(|builder| builder.start("Goal").build());
        assert_eq!(result.map(|_| ()), Err(GrammarError::MissingStartRule("Goal".into())));
    }

    #[test]
    fn unreachable_collection() {
        assert_eq!(
            build("Goal ::= IDENTIFIER END_OF_INPUT ; Island ::= ';' ;").map(|_| ()),
            Err(GrammarError::UnreachableRule("Island".into()))
        );
    }
}
