//! # Token Sources
//!
//! The parser pulls tokens one at a time from a [`TokenSource`], so a token
//! source can react to the parser's state between tokens (see
//! [`TokenSource::set_inside_type_context`]).
//!
//! - [`Lexer`](super::Lexer): lazy tokenization of source text
//! - [`VecTokenSource`]: a pre-built sequence of tokens

use crate::lexer::{Token, TokenKind};
use crate::syntax::ParsePosition;
use std::collections::VecDeque;

/// Produces the tokens of one source file
pub trait TokenSource {
    /// The next token. Once the input is exhausted this keeps returning
    /// [`TokenKind::EndOfInput`].
    fn next_token(&mut self) -> Token;

    /// Whether [`next_token`](Self::next_token) can return anything but end of input
    fn has_more_tokens(&self) -> bool;

    /// Tell the token source whether a `>` may close a type argument list.
    ///
    /// While set, `>` characters are never combined into `>>`, `>>>`, `>=`,
    /// `>>=` or `>>>=`.
    fn set_inside_type_context(&mut self, inside: bool);

    /// Where the next token starts
    fn position(&self) -> ParsePosition;
}

/// Token source over an already tokenized input.
///
/// The type context flag is ignored; the tokens are fixed.
#[derive(Debug, Clone, Default)]
pub struct VecTokenSource {
    tokens: VecDeque<Token>,
    end: ParsePosition,
}

impl VecTokenSource {
    /// Create a token source; an [`TokenKind::EndOfInput`] token in `tokens` ends it early
    #[must_use]
    pub fn new(tokens: impl IntoIterator<Item = Token>) -> Self {
        let mut tokens: VecDeque<Token> = tokens.into_iter().collect();
        if let Some(index) = tokens.iter().position(|token| token.kind == TokenKind::EndOfInput) {
            tokens.truncate(index);
        }
        let end = tokens.back().map_or_else(ParsePosition::start, |token| {
            let width = u32::try_from(token.text.chars().count()).unwrap_or(u32::MAX);
            ParsePosition::new(token.position.line, token.position.column.saturating_add(width))
        });
        Self { tokens, end }
    }

    /// Tokens of the given kinds on one line, one column apart
    #[must_use]
    pub fn from_kinds(kinds: impl IntoIterator<Item = TokenKind>) -> Self {
        let mut column = 1;
        Self::new(kinds.into_iter().map(|kind| {
            let token = Token::new(kind, kind.text(), ParsePosition::new(1, column));
            column += 1;
            token
        }))
    }
}

impl TokenSource for VecTokenSource {
    fn next_token(&mut self) -> Token {
        self.tokens
            .pop_front()
            .unwrap_or_else(|| Token::end_of_input(self.end))
    }

    fn has_more_tokens(&self) -> bool {
        !self.tokens.is_empty()
    }

    fn set_inside_type_context(&mut self, _inside: bool) {}

    fn position(&self) -> ParsePosition {
        self.tokens.front().map_or(self.end, |token| token.position)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ends_with_end_of_input_forever() {
        let mut source = VecTokenSource::from_kinds([TokenKind::LeftCurly, TokenKind::RightCurly]);
        assert!(source.has_more_tokens());
        assert_eq!(source.next_token().kind, TokenKind::LeftCurly);
        assert_eq!(source.next_token().kind, TokenKind::RightCurly);
        assert!(!source.has_more_tokens());
        assert_eq!(source.next_token().kind, TokenKind::EndOfInput);
        assert_eq!(source.next_token().kind, TokenKind::EndOfInput);
    }
}
