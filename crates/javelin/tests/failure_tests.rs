//! Inputs that must be rejected, and what the rejection says

use javelin::error::{Diagnostic, GrammarError, LexerErrorKind, ParseError};
use javelin::lexer::TokenKind;
use javelin::parser::Parser;
use javelin::syntax::ParsePosition;
use pretty_assertions::assert_eq;
use std::path::Path;

fn java() -> Parser {
    Parser::java().expect("bundled grammar is valid")
}

fn syntax_error(parser: &Parser, source: &str) -> (ParsePosition, TokenKind, Vec<TokenKind>) {
    match parser.parse_str(source) {
        Err(ParseError::Syntax { position, found, expected }) => (position, found, expected),
        other => panic!("expected a syntax error for {source:?}, got {other:?}"),
    }
}

fn lexical_error(source: &str) -> (ParsePosition, LexerErrorKind) {
    match java().parse_str(source) {
        Err(ParseError::Lexical(error)) => (error.position, error.kind),
        other => panic!("expected a lexical error for {source:?}, got {other:?}"),
    }
}

#[test]
fn missing_semicolon_after_field() {
    let (position, found, expected) = syntax_error(&java(), "class A { int x = 1 }");
    assert_eq!(position, ParsePosition::new(1, 21));
    assert_eq!(found, TokenKind::RightCurly);
    for kind in [TokenKind::Semicolon, TokenKind::Comma, TokenKind::Plus, TokenKind::QuestionMark] {
        assert!(expected.contains(&kind), "{kind} should be expected");
    }
    assert!(!expected.contains(&TokenKind::RightCurly));
}

#[test]
fn unclosed_class_body_ends_prematurely() {
    let (_, found, expected) = syntax_error(&java(), "class A {\n  void m() { }\n");
    assert_eq!(found, TokenKind::EndOfInput);
    assert!(expected.contains(&TokenKind::RightCurly));
}

#[test]
fn error_position_counts_lines() {
    let (position, found, _) = syntax_error(&java(), "class A {\n  void m() {\n    int = 3;\n  }\n}\n");
    assert_eq!(position, ParsePosition::new(3, 9));
    assert_eq!(found, TokenKind::Equal);
}

#[test]
fn trailing_tokens_after_the_unit() {
    let (position, found, expected) = syntax_error(&java(), "class A { } }");
    assert_eq!(position, ParsePosition::new(1, 13));
    assert_eq!(found, TokenKind::RightCurly);
    assert!(expected.contains(&TokenKind::EndOfInput));
    assert!(expected.contains(&TokenKind::Class));
}

#[test]
fn statements_are_not_allowed_at_top_level() {
    let (position, found, _) = syntax_error(&java(), "x = 1;");
    assert_eq!(position, ParsePosition::new(1, 1));
    assert_eq!(found, TokenKind::Identifier);
}

#[test]
fn fragment_goals_reject_incomplete_input() {
    let parser = Parser::for_goal("Expression").expect("Expression is a rule");
    let (_, found, expected) = syntax_error(&parser, "a +");
    assert_eq!(found, TokenKind::EndOfInput);
    assert!(expected.contains(&TokenKind::Identifier));

    let (position, found, _) = syntax_error(&parser, "a b");
    assert_eq!(position, ParsePosition::new(1, 3));
    assert_eq!(found, TokenKind::Identifier);
}

#[test]
fn unknown_goal_is_a_grammar_error() {
    let error = Parser::for_goal("NoSuchRule").expect_err("no such rule");
    assert!(matches!(error, GrammarError::UndefinedRule { ref name, .. } if name == "NoSuchRule"));
}

#[test]
fn lexical_errors_stop_the_parse() {
    let (position, kind) = lexical_error("class A { # }");
    assert_eq!(position, ParsePosition::new(1, 11));
    assert_eq!(kind, LexerErrorKind::unexpected_char('#'));

    let (position, kind) = lexical_error("class A {\n  String s = \"open;\n}");
    assert_eq!(position, ParsePosition::new(2, 14));
    assert_eq!(kind, LexerErrorKind::UnterminatedString);

    let (_, kind) = lexical_error("class A { /* never closed");
    assert_eq!(kind, LexerErrorKind::UnterminatedComment);

    let (_, kind) = lexical_error("class A { int x = 2147483649; }");
    assert!(matches!(kind, LexerErrorKind::NumberTooLarge { .. }));
}

#[test]
fn lexical_error_after_a_syntax_error_is_not_reached() {
    // the syntax error comes first in the input, so it is the one reported
    let (position, found, _) = syntax_error(&java(), "class { # }");
    assert_eq!(position, ParsePosition::new(1, 7));
    assert_eq!(found, TokenKind::LeftCurly);
}

#[test]
fn diagnostics_render_origin_position_and_expected_tokens() {
    let error = java()
        .parse_source(Path::new("Bad.java"), "class A { int x = ; }")
        .expect_err("missing initializer");
    assert!(!error.is_internal());
    assert_eq!(error.position(), Some(ParsePosition::new(1, 19)));
    assert!(error.expected().contains(&TokenKind::Identifier));

    let diagnostic = Diagnostic::from_parse_error(Path::new("Bad.java"), &error);
    assert!(diagnostic.is_error());
    let rendered = diagnostic.to_string();
    assert!(
        rendered.starts_with("Bad.java:1:19: error: Syntax error at 1:19: found ';', expected one of: "),
        "{rendered}"
    );
    assert!(rendered.contains("identifier"), "{rendered}");
}
