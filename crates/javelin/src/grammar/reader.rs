//! Reader for the textual grammar format.
//!
//! ```text
//! # comment
//! Name ::= 'token' OtherRule [ optional ] { repeated } | alternative ;
//! ```
//!
//! Quoted texts name fixed tokens, upper-case names such as `IDENTIFIER` name
//! the remaining token kinds and anything else is a nonterminal.

use crate::error::GrammarError;
use crate::grammar::Element;
use crate::lexer::TokenKind;
use compact_str::CompactString;

#[derive(Debug, Clone, PartialEq, Eq)]
enum Lexeme {
    Name(CompactString),
    Quoted(CompactString),
    Define,
    Bar,
    Semicolon,
    OpenOptional,
    CloseOptional,
    OpenRepeat,
    CloseRepeat,
}

struct Scanner<'a> {
    chars: std::iter::Peekable<std::str::CharIndices<'a>>,
    text: &'a str,
    line: usize,
}

impl<'a> Scanner<'a> {
    fn new(text: &'a str) -> Self {
        Self {
            chars: text.char_indices().peekable(),
            text,
            line: 1,
        }
    }

    fn error(&self, message: impl Into<String>) -> GrammarError {
        GrammarError::Syntax {
            line: self.line,
            message: message.into(),
        }
    }

    fn next(&mut self) -> Result<Option<(Lexeme, usize)>, GrammarError> {
        while let Some(&(_, c)) = self.chars.peek() {
            if c == '#' {
                while self.chars.next_if(|&(_, c)| c != '\n').is_some() {}
            } else if c.is_whitespace() {
                if c == '\n' {
                    self.line += 1;
                }
                self.chars.next();
            } else {
                break;
            }
        }
        let Some((start, c)) = self.chars.next() else {
            return Ok(None);
        };
        let line = self.line;
        let lexeme = match c {
            '|' => Lexeme::Bar,
            ';' => Lexeme::Semicolon,
            '[' => Lexeme::OpenOptional,
            ']' => Lexeme::CloseOptional,
            '{' => Lexeme::OpenRepeat,
            '}' => Lexeme::CloseRepeat,
            ':' => {
                if self.chars.next_if(|&(_, c)| c == ':').is_none()
                    || self.chars.next_if(|&(_, c)| c == '=').is_none()
                {
                    return Err(self.error("expected '::='"));
                }
                Lexeme::Define
            }
            '\'' => {
                let mut end = None;
                for (index, c) in self.chars.by_ref() {
                    if c == '\'' {
                        end = Some(index);
                        break;
                    }
                    if c == '\n' {
                        break;
                    }
                }
                let end = end.ok_or_else(|| self.error("unterminated quoted token"))?;
                if end == start + 1 {
                    return Err(self.error("empty quoted token"));
                }
                Lexeme::Quoted(self.text[start + 1..end].into())
            }
            c if c.is_ascii_alphabetic() || c == '_' => {
                let mut end = start + c.len_utf8();
                while let Some((index, c)) =
                    self.chars.next_if(|&(_, c)| c.is_ascii_alphanumeric() || c == '_')
                {
                    end = index + c.len_utf8();
                }
                Lexeme::Name(self.text[start..end].into())
            }
            other => return Err(self.error(format!("unexpected character {other:?}"))),
        };
        Ok(Some((lexeme, line)))
    }
}

fn is_token_name(name: &str) -> bool {
    name.chars().any(|c| c.is_ascii_uppercase())
        && name.chars().all(|c| c.is_ascii_uppercase() || c.is_ascii_digit() || c == '_')
}

/// Parse grammar text into `(name, elements)` alternatives in source order
pub(crate) fn read(text: &str) -> Result<Vec<(CompactString, Vec<Element>)>, GrammarError> {
    let mut scanner = Scanner::new(text);
    let mut lexemes = Vec::new();
    while let Some(lexeme) = scanner.next()? {
        lexemes.push(lexeme);
    }

    let mut alternatives = Vec::new();
    let mut position = 0;
    while position < lexemes.len() {
        let (Lexeme::Name(name), line) = &lexemes[position] else {
            return Err(GrammarError::Syntax {
                line: lexemes[position].1,
                message: "expected a rule name".into(),
            });
        };
        if !matches!(lexemes.get(position + 1), Some((Lexeme::Define, _))) {
            return Err(GrammarError::Syntax {
                line: *line,
                message: format!("expected '::=' after {name}"),
            });
        }
        position += 2;
        loop {
            let (elements, next) = sequence(name, &lexemes, position, None)?;
            alternatives.push((name.clone(), elements));
            position = next;
            match lexemes.get(position) {
                Some((Lexeme::Bar, _)) => position += 1,
                Some((Lexeme::Semicolon, _)) => {
                    position += 1;
                    break;
                }
                Some((_, line)) => {
                    return Err(GrammarError::Syntax {
                        line: *line,
                        message: format!("unexpected input in rule {name}"),
                    });
                }
                None => {
                    return Err(GrammarError::Syntax {
                        line: scanner.line,
                        message: format!("rule {name} is not terminated by ';'"),
                    });
                }
            }
        }
    }
    Ok(alternatives)
}

/// Read elements up to `|`, `;` or the closing bracket of the enclosing group
fn sequence(
    rule: &str,
    lexemes: &[(Lexeme, usize)],
    mut position: usize,
    close: Option<&Lexeme>,
) -> Result<(Vec<Element>, usize), GrammarError> {
    let mut elements = Vec::new();
    while let Some((lexeme, line)) = lexemes.get(position) {
        match lexeme {
            Lexeme::Name(name) if is_token_name(name) => {
                let kind = TokenKind::from_grammar_name(name).ok_or_else(|| GrammarError::UnknownToken {
                    rule: rule.into(),
                    token: name.to_string(),
                })?;
                elements.push(Element::Token(kind));
            }
            Lexeme::Name(name) => elements.push(Element::Rule(name.clone())),
            Lexeme::Quoted(text) => {
                let kind = TokenKind::from_text(text).ok_or_else(|| GrammarError::UnknownToken {
                    rule: rule.into(),
                    token: format!("'{text}'"),
                })?;
                elements.push(Element::Token(kind));
            }
            Lexeme::OpenOptional | Lexeme::OpenRepeat => {
                let (closing, wrap): (Lexeme, fn(Vec<Element>) -> Element) = if *lexeme == Lexeme::OpenOptional {
                    (Lexeme::CloseOptional, Element::Optional)
                } else {
                    (Lexeme::CloseRepeat, Element::ZeroOrMore)
                };
                let (inner, next) = sequence(rule, lexemes, position + 1, Some(&closing))?;
                if lexemes.get(next).map(|(lexeme, _)| lexeme) != Some(&closing) {
                    return Err(GrammarError::Syntax {
                        line: *line,
                        message: format!("unclosed group in rule {rule}"),
                    });
                }
                if inner.is_empty() {
                    return Err(GrammarError::Syntax {
                        line: *line,
                        message: format!("empty group in rule {rule}"),
                    });
                }
                elements.push(wrap(inner));
                position = next;
            }
            Lexeme::CloseOptional | Lexeme::CloseRepeat if Some(lexeme) == close => break,
            Lexeme::Bar | Lexeme::Semicolon if close.is_none() => break,
            _ => {
                return Err(GrammarError::Syntax {
                    line: *line,
                    message: format!("unexpected input in rule {rule}"),
                });
            }
        }
        position += 1;
    }
    Ok((elements, position))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_alternatives_and_groups() {
        let rules = read(
            "# lists
             List ::= '(' [ IDENTIFIER { ',' IDENTIFIER } ] ')'
                    | '[' ']' ;",
        )
        .expect("valid grammar text");
        assert_eq!(rules.len(), 2);
        assert_eq!(
            rules[0].1,
            vec![
                Element::Token(TokenKind::LeftParenthesis),
                Element::Optional(vec![
                    Element::Token(TokenKind::Identifier),
                    Element::ZeroOrMore(vec![
                        Element::Token(TokenKind::Comma),
                        Element::Token(TokenKind::Identifier),
                    ]),
                ]),
                Element::Token(TokenKind::RightParenthesis),
            ]
        );
        assert_eq!(
            rules[1].1,
            vec![Element::Token(TokenKind::LeftBracket), Element::Token(TokenKind::RightBracket)]
        );
    }

    #[test]
    fn quoted_bars_and_brackets_are_tokens() {
        let rules = read("Op ::= '|' | '||' | '{' | ']' ;").expect("valid grammar text");
        let kinds: Vec<_> = rules.iter().map(|(_, elements)| elements[0].clone()).collect();
        assert_eq!(
            kinds,
            [
                Element::Token(TokenKind::BitOr),
                Element::Token(TokenKind::LogicalOr),
                Element::Token(TokenKind::LeftCurly),
                Element::Token(TokenKind::RightBracket),
            ]
        );
    }

    #[test]
    fn reports_unknown_tokens_and_syntax_errors() {
        assert_eq!(
            read("Item ::= NUMBER ;"),
            Err(GrammarError::UnknownToken {
                rule: "Item".into(),
                token: "NUMBER".into()
            })
        );
        assert!(matches!(read("Item ::= ';'"), Err(GrammarError::Syntax { .. })));
        assert!(matches!(
            read("Item ::= ';' ;\nOther ::= [ ',' ;"),
            Err(GrammarError::Syntax { line: 2, .. })
        ));
    }
}
