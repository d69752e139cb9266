//! Property-based tests
//!
//! These tests use proptest to generate random inputs and check properties
//! that hold for every input: leaves are never lost or reordered, parsing is
//! deterministic, and merged state views answer with plain unions.

use javelin::earley::{MergedMultiState, MultiState, State, StateSet};
use javelin::grammar::{Grammar, GrammarBuilder};
use javelin::lexer::{Lexer, TokenKind, TokenValue};
use javelin::parser::Parser;
use javelin::syntax::TreeNode;
use javelin::syntax::expr::Expression;
use proptest::prelude::*;
use std::collections::BTreeSet;

const SUMS: &str = "Goal ::= Sum END_OF_INPUT ; Sum ::= Sum '+' Product | Sum '-' Product | Product ; \
                    Product ::= Product '*' Atom | Atom ; Atom ::= IDENTIFIER | INT_LITERAL | '(' Sum ')' ;";

fn grammar(text: &str) -> Grammar {
    GrammarBuilder::new()
        .read(text)
        .and_then(GrammarBuilder::build)
        .expect("grammar should build")
}

/// Random sentences of the sums grammar, as source text
fn sum() -> impl Strategy<Value = String> {
    let atom = prop_oneof![
        "[a-z][a-z0-9]{0,3}".prop_filter("reserved words are not names", |name| is_name(name)),
        (0u32..1000).prop_map(|value| value.to_string()),
    ];
    atom.prop_recursive(4, 32, 4, |inner| {
        prop_oneof![
            (inner.clone(), prop::sample::select(vec!["+", "-", "*"]), inner.clone())
                .prop_map(|(left, operator, right)| format!("{left} {operator} {right}")),
            inner.prop_map(|sum| format!("({sum})")),
        ]
    })
}

fn is_name(text: &str) -> bool {
    Lexer::new(text).next_token().kind == TokenKind::Identifier
}

fn significant_kinds(source: &str) -> Vec<TokenKind> {
    Lexer::new(source)
        .tokenize()
        .into_iter()
        .map(|token| token.kind)
        .filter(|kind| *kind != TokenKind::Whitespace)
        .collect()
}

fn state_set(grammar: &Grammar, rules: &[usize]) -> StateSet {
    let mut set = StateSet::default();
    for &index in rules {
        let rule = &grammar.rules()[index % grammar.rules().len()];
        set.insert(State::predicted(rule.id(), 0), grammar);
    }
    set
}

proptest! {
    #[test]
    fn generic_trees_keep_every_token_in_order(source in sum()) {
        let parser = Parser::generic(grammar(SUMS));
        let root = parser.parse_str(&source).expect("generated sentences are valid");
        prop_assert_eq!(root.leaf_kinds(), significant_kinds(&source));
    }

    #[test]
    fn parsing_is_deterministic(source in sum()) {
        let parser = Parser::for_goal("Expression").expect("Expression is a rule");
        let first = parser.parse_str(&source).expect("generated sentences are valid");
        let second = parser.parse_str(&source).expect("generated sentences are valid");
        prop_assert_eq!(first, second);
    }

    #[test]
    fn repeated_arguments_keep_source_order(names in prop::collection::vec("x[0-9]{1,3}", 1..24)) {
        let source = format!("f({})", names.join(", "));
        let parser = Parser::for_goal("Expression").expect("Expression is a rule");
        let Ok(TreeNode::Expression(Expression::MethodInvocation(invocation))) = parser.parse_str(&source) else {
            return Err(TestCaseError::fail(format!("{source} is not a method invocation")));
        };
        let parsed: Vec<String> = invocation
            .arguments
            .iter()
            .map(|argument| match argument {
                Expression::Name(name) => name.to_string(),
                other => format!("{other:?}"),
            })
            .collect();
        prop_assert_eq!(parsed, names);
    }

    #[test]
    fn additive_chains_associate_to_the_left(count in 2usize..16) {
        let source = (0..count).map(|index| format!("v{index}")).collect::<Vec<_>>().join(" - ");
        let parser = Parser::for_goal("Expression").expect("Expression is a rule");
        let mut current = parser
            .parse_str(&source)
            .ok()
            .and_then(TreeNode::into_expression)
            .expect("valid chain");
        for index in (1..count).rev() {
            let Expression::Binary { left, operator, right } = current else {
                return Err(TestCaseError::fail("expected a subtraction"));
            };
            prop_assert_eq!(operator, TokenKind::Minus);
            let wanted = format!("v{index}");
            prop_assert!(matches!(*right, Expression::Name(ref name) if name.to_string() == wanted));
            current = *left;
        }
        prop_assert!(matches!(current, Expression::Name(ref name) if name.to_string() == "v0"));
    }

    #[test]
    fn merged_views_answer_with_unions(
        a in prop::collection::vec(0usize..64, 1..6),
        b in prop::collection::vec(0usize..64, 0..6),
        c in prop::collection::vec(0usize..64, 0..6),
    ) {
        let grammar = grammar(SUMS);
        let (a, b, c) = (state_set(&grammar, &a), state_set(&grammar, &b), state_set(&grammar, &c));
        let merged = MergedMultiState::new(&a, Some(&b), Some(&c));

        let mut tokens = a.possible_next_tokens();
        tokens.extend(b.possible_next_tokens());
        tokens.extend(c.possible_next_tokens());
        prop_assert_eq!(merged.possible_next_tokens(), tokens);

        let mut names = a.predict_rule_names();
        names.extend(b.predict_rule_names());
        names.extend(c.predict_rule_names());
        prop_assert_eq!(merged.predict_rule_names(), names);

        for kind in [TokenKind::Identifier, TokenKind::IntLiteral, TokenKind::LeftParenthesis] {
            let waiting = a.states_waiting_on_token(kind).count()
                + b.states_waiting_on_token(kind).count()
                + c.states_waiting_on_token(kind).count();
            prop_assert_eq!(merged.states_waiting_on_token(kind).count(), waiting);
        }

        // an empty constituent changes nothing
        let empty = StateSet::default();
        let padded = MergedMultiState::new(&a, Some(&empty), None);
        prop_assert_eq!(padded.possible_next_tokens(), a.possible_next_tokens());
        let alone = MergedMultiState::new(&a, None, None);
        let expected: BTreeSet<_> = a.possible_next_tokens();
        prop_assert_eq!(alone.possible_next_tokens(), expected);
    }

    #[test]
    fn decimal_ints_keep_their_value(value in 0u32..=(i32::MAX as u32)) {
        let token = Lexer::new(&value.to_string()).next_token();
        prop_assert_eq!(token.kind, TokenKind::IntLiteral);
        prop_assert_eq!(token.value, TokenValue::Int(value as i32));
    }

    #[test]
    fn hex_ints_cover_every_bit_pattern(value in any::<u32>()) {
        let token = Lexer::new(&format!("0x{value:X}")).next_token();
        prop_assert_eq!(token.kind, TokenKind::IntLiteral);
        prop_assert_eq!(token.value, TokenValue::Int(value as i32));
    }

    #[test]
    fn decimal_longs_keep_their_value(value in 0u64..=(i64::MAX as u64)) {
        let token = Lexer::new(&format!("{value}L")).next_token();
        prop_assert_eq!(token.kind, TokenKind::LongLiteral);
        prop_assert_eq!(token.value, TokenValue::Long(value as i64));
    }

    #[test]
    fn names_lex_as_single_tokens(name in "[A-Za-z_$][A-Za-z0-9_$]{0,12}") {
        let tokens = Lexer::new(&name).tokenize();
        prop_assert_eq!(tokens.len(), 2);
        prop_assert_eq!(tokens[0].text.as_str(), name.as_str());
        let kind = tokens[0].kind;
        prop_assert!(
            kind == TokenKind::Identifier || kind.is_keyword() || matches!(kind, TokenKind::True | TokenKind::False | TokenKind::Null),
            "{} lexed as {}", name, kind
        );
    }
}
