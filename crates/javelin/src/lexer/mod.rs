//! # Lexer
//!
//! A hand written maximal munch lexer and the token source contract the parser
//! consumes.
//!
//! ## Overview
//!
//! [`Lexer`] turns source text into [`Token`]s one at a time. Trivia
//! (whitespace, line terminators, comments) is returned like any other token;
//! the parser skips it. Input that cannot be tokenized produces a
//! [`TokenKind::Error`] token whose value carries the [`LexerErrorKind`].
//!
//! ## Generic type context
//!
//! `>>` may close two type argument lists or be a shift operator. The parser
//! knows which one it can accept and tells the token source through
//! [`TokenSource::set_inside_type_context`]; while that flag is set every `>`
//! is returned as a single [`TokenKind::Gt`].

mod stream;
mod token;

pub use stream::{TokenSource, VecTokenSource};
pub use token::{Token, TokenKind, TokenValue};

use crate::error::LexerErrorKind;
use crate::syntax::ParsePosition;
use compact_str::CompactString;

type Lexed = Result<(TokenKind, TokenValue), LexerErrorKind>;

/// Tokenizer over a single source text.
#[derive(Debug, Clone)]
pub struct Lexer<'a> {
    source: &'a str,
    /// Byte offset of the next character
    offset: usize,
    line: u32,
    column: u32,
    token_start: usize,
    token_position: ParsePosition,
    inside_type_context: bool,
}

impl<'a> Lexer<'a> {
    #[must_use]
    pub fn new(source: &'a str) -> Self {
        Self {
            source,
            offset: 0,
            line: 1,
            column: 1,
            token_start: 0,
            token_position: ParsePosition::start(),
            inside_type_context: false,
        }
    }

    /// The position of the next character to be read
    #[must_use]
    pub const fn position(&self) -> ParsePosition {
        ParsePosition::new(self.line, self.column)
    }

    /// Tokenize everything that is left, including trivia and the final
    /// [`TokenKind::EndOfInput`].
    #[must_use]
    pub fn tokenize(mut self) -> Vec<Token> {
        let mut tokens = Vec::new();
        loop {
            let token = self.next_token();
            let done = token.kind == TokenKind::EndOfInput;
            tokens.push(token);
            if done {
                return tokens;
            }
        }
    }

    /// Read the next token
    pub fn next_token(&mut self) -> Token {
        self.token_start = self.offset;
        self.token_position = self.position();
        let Some(c) = self.bump() else {
            return Token::end_of_input(self.token_position);
        };
        let lexed = self.lex(c);
        let text = CompactString::from(&self.source[self.token_start..self.offset]);
        match lexed {
            Ok((kind, value)) => Token::new(kind, text, self.token_position).with_value(value),
            Err(error) => Token::new(TokenKind::Error, text, self.token_position)
                .with_value(TokenValue::Error(error)),
        }
    }

    fn lex(&mut self, c: char) -> Lexed {
        let kind = match c {
            ' ' | '\t' | '\u{000C}' => {
                self.eat_while(|c| matches!(c, ' ' | '\t' | '\u{000C}'));
                TokenKind::Whitespace
            }
            '\n' => TokenKind::Lf,
            '\r' => {
                if self.eat('\n') {
                    TokenKind::CrLf
                } else {
                    TokenKind::Cr
                }
            }
            '\u{001A}' => TokenKind::Sub,
            '(' => TokenKind::LeftParenthesis,
            ')' => TokenKind::RightParenthesis,
            '{' => TokenKind::LeftCurly,
            '}' => TokenKind::RightCurly,
            '[' => TokenKind::LeftBracket,
            ']' => TokenKind::RightBracket,
            ';' => TokenKind::Semicolon,
            ',' => TokenKind::Comma,
            '@' => TokenKind::At,
            '?' => TokenKind::QuestionMark,
            '~' => TokenKind::Tilde,
            '.' => return self.dot(),
            ':' => self.pick(':', TokenKind::DoubleColon, TokenKind::Colon),
            '=' => self.pick('=', TokenKind::DoubleEqual, TokenKind::Equal),
            '!' => self.pick('=', TokenKind::NotEqual, TokenKind::Not),
            '*' => self.pick('=', TokenKind::MultiplyEqual, TokenKind::Multiply),
            '%' => self.pick('=', TokenKind::RemainderEqual, TokenKind::Remainder),
            '^' => self.pick('=', TokenKind::BitXorEqual, TokenKind::BitXor),
            '<' => {
                if self.eat('<') {
                    self.pick('=', TokenKind::LeftShiftEqual, TokenKind::LeftShift)
                } else {
                    self.pick('=', TokenKind::Le, TokenKind::Lt)
                }
            }
            '>' => self.greater_than(),
            '&' => {
                if self.eat('&') {
                    TokenKind::LogicalAnd
                } else {
                    self.pick('=', TokenKind::BitAndEqual, TokenKind::BitAnd)
                }
            }
            '|' => {
                if self.eat('|') {
                    TokenKind::LogicalOr
                } else {
                    self.pick('=', TokenKind::BitOrEqual, TokenKind::BitOr)
                }
            }
            '+' => {
                if self.eat('+') {
                    TokenKind::Increment
                } else {
                    self.pick('=', TokenKind::PlusEqual, TokenKind::Plus)
                }
            }
            '-' => {
                if self.eat('-') {
                    TokenKind::Decrement
                } else if self.eat('>') {
                    TokenKind::Arrow
                } else {
                    self.pick('=', TokenKind::MinusEqual, TokenKind::Minus)
                }
            }
            '/' => return self.slash(),
            '\'' => return self.char_literal(),
            '"' => return self.string_literal(),
            '0'..='9' => return self.number(c),
            c if is_identifier_start(c) => return Ok((self.identifier(), TokenValue::None)),
            other => return Err(LexerErrorKind::unexpected_char(other)),
        };
        Ok((kind, TokenValue::None))
    }

    fn greater_than(&mut self) -> TokenKind {
        if self.inside_type_context {
            return TokenKind::Gt;
        }
        if self.eat('>') {
            if self.eat('>') {
                self.pick('=', TokenKind::RightShiftUnsignedEqual, TokenKind::RightShiftUnsigned)
            } else {
                self.pick('=', TokenKind::RightShiftEqual, TokenKind::RightShift)
            }
        } else {
            self.pick('=', TokenKind::Ge, TokenKind::Gt)
        }
    }

    fn dot(&mut self) -> Lexed {
        if self.peek().is_some_and(|c| c.is_ascii_digit()) {
            let mut digits = String::from("0");
            return self.fraction(&mut digits);
        }
        if self.peek() == Some('.') && self.peek_second() == Some('.') {
            self.bump();
            self.bump();
            return Ok((TokenKind::Ellipsis, TokenValue::None));
        }
        Ok((TokenKind::Dot, TokenValue::None))
    }

    fn slash(&mut self) -> Lexed {
        if self.eat('/') {
            self.eat_while(|c| c != '\n' && c != '\r');
            return Ok((TokenKind::OnelineComment, TokenValue::None));
        }
        if self.eat('*') {
            loop {
                match self.bump() {
                    None => return Err(LexerErrorKind::UnterminatedComment),
                    Some('*') if self.eat('/') => {
                        return Ok((TokenKind::MultilineComment, TokenValue::None));
                    }
                    Some(_) => {}
                }
            }
        }
        Ok((self.pick('=', TokenKind::DivideEqual, TokenKind::Divide), TokenValue::None))
    }

    fn identifier(&mut self) -> TokenKind {
        self.eat_while(is_identifier_part);
        let text = &self.source[self.token_start..self.offset];
        match TokenKind::from_text(text) {
            Some(kind) if kind.is_keyword() || kind.is_literal() => kind,
            _ => TokenKind::Identifier,
        }
    }

    fn char_literal(&mut self) -> Lexed {
        let value = match self.bump() {
            None | Some('\n' | '\r') => return Err(LexerErrorKind::UnterminatedChar),
            Some('\'') => return Err(LexerErrorKind::invalid_char("empty character literal")),
            Some('\\') => self.escape()?,
            Some(c) => c,
        };
        if self.eat('\'') {
            return Ok((TokenKind::CharacterLiteral, TokenValue::Char(value)));
        }
        // skip to the closing quote so lexing resumes after the broken literal
        self.eat_while(|c| c != '\'' && c != '\n' && c != '\r');
        if self.eat('\'') {
            Err(LexerErrorKind::invalid_char("more than one character"))
        } else {
            Err(LexerErrorKind::UnterminatedChar)
        }
    }

    fn string_literal(&mut self) -> Lexed {
        let mut value = CompactString::default();
        loop {
            match self.bump() {
                None | Some('\n' | '\r') => return Err(LexerErrorKind::UnterminatedString),
                Some('"') => return Ok((TokenKind::StringLiteral, TokenValue::String(value))),
                Some('\\') => value.push(self.escape()?),
                Some(c) => value.push(c),
            }
        }
    }

    /// Decode the escape sequence following a backslash
    fn escape(&mut self) -> Result<char, LexerErrorKind> {
        let Some(c) = self.bump() else {
            return Err(LexerErrorKind::UnterminatedString);
        };
        let decoded = match c {
            'b' => '\u{0008}',
            't' => '\t',
            'n' => '\n',
            'f' => '\u{000C}',
            'r' => '\r',
            '"' => '"',
            '\'' => '\'',
            '\\' => '\\',
            '0'..='7' => {
                // up to three octal digits, at most \377
                let max_digits = if c <= '3' { 3 } else { 2 };
                let mut value = c.to_digit(8).unwrap_or(0);
                for _ in 1..max_digits {
                    match self.peek().and_then(|c| c.to_digit(8)) {
                        Some(digit) => {
                            self.bump();
                            value = value * 8 + digit;
                        }
                        None => break,
                    }
                }
                char::from_u32(value).ok_or(LexerErrorKind::invalid_escape(c))?
            }
            'u' => {
                while self.eat('u') {}
                let mut value = 0;
                for _ in 0..4 {
                    let digit = self
                        .bump()
                        .and_then(|c| c.to_digit(16))
                        .ok_or(LexerErrorKind::invalid_escape('u'))?;
                    value = value * 16 + digit;
                }
                char::from_u32(value).ok_or(LexerErrorKind::invalid_escape('u'))?
            }
            other => return Err(LexerErrorKind::invalid_escape(other)),
        };
        Ok(decoded)
    }

    fn number(&mut self, first: char) -> Lexed {
        if first == '0' {
            match self.peek() {
                Some('x' | 'X') => {
                    self.bump();
                    return self.radix_integer(16);
                }
                Some('b' | 'B') => {
                    self.bump();
                    return self.radix_integer(2);
                }
                _ => {}
            }
        }
        // octal and floating point literals both may start with "0", so the
        // digits are read before deciding: "09.5" is a double, "09" an error
        let mut digits = String::from(first);
        self.read_digits(&mut digits, 10);
        match self.peek() {
            Some('.') if self.peek_second() != Some('.') => {
                check_underscores(&digits)?;
                self.fraction_and_exponent(&mut digits)
            }
            Some('e' | 'E' | 'f' | 'F' | 'd' | 'D') => {
                check_underscores(&digits)?;
                self.fraction_and_exponent(&mut digits)
            }
            _ if first == '0' && digits.len() > 1 => self.octal(&digits[1..]),
            _ => self.integer_value(&digits, 10),
        }
    }

    /// The digits of an octal literal after its leading `0`
    fn octal(&mut self, digits: &str) -> Lexed {
        if digits.chars().any(|c| c != '_' && !c.is_digit(8)) {
            return Err(LexerErrorKind::invalid_number("digit out of range for an octal number"));
        }
        self.integer_value(digits, 8)
    }

    fn radix_integer(&mut self, radix: u32) -> Lexed {
        let mut digits = String::new();
        self.read_digits(&mut digits, radix);
        if digits.is_empty() {
            return Err(LexerErrorKind::invalid_number("no digits"));
        }
        if digits.starts_with('_') {
            return Err(LexerErrorKind::invalid_number("'_' directly after the radix prefix"));
        }
        self.integer_value(&digits, radix)
    }

    /// Read digits of `radix` and underscores into `digits`
    fn read_digits(&mut self, digits: &mut String, radix: u32) {
        while let Some(c) = self.peek() {
            if c == '_' || c.is_digit(radix) {
                digits.push(c);
                self.bump();
            } else {
                break;
            }
        }
    }

    fn integer_value(&mut self, digits: &str, radix: u32) -> Lexed {
        check_underscores(digits)?;
        let is_long = self.eat('l') || self.eat('L');
        let clean: String = digits.chars().filter(|c| *c != '_').collect();
        let parsed = u128::from_str_radix(&clean, radix);
        if is_long {
            // a decimal long may be 2^63 so that -9223372036854775808L works
            let max = if radix == 10 { 1u128 << 63 } else { u128::from(u64::MAX) };
            match parsed {
                Ok(value) if value <= max => {
                    Ok((TokenKind::LongLiteral, TokenValue::Long(value as u64 as i64)))
                }
                _ => Err(LexerErrorKind::too_large("Long")),
            }
        } else {
            let max = if radix == 10 { 1u128 << 31 } else { u128::from(u32::MAX) };
            match parsed {
                Ok(value) if value <= max => {
                    Ok((TokenKind::IntLiteral, TokenValue::Int(value as u32 as i32)))
                }
                _ => Err(LexerErrorKind::too_large("Integer")),
            }
        }
    }

    /// Continue a decimal floating point literal after its integer digits
    fn fraction_and_exponent(&mut self, digits: &mut String) -> Lexed {
        if self.eat('.') {
            return self.fraction(digits);
        }
        self.exponent_and_suffix(digits)
    }

    /// Continue a floating point literal after its `.`, which is already consumed
    fn fraction(&mut self, digits: &mut String) -> Lexed {
        digits.push('.');
        let start = digits.len();
        self.read_digits(digits, 10);
        if digits.len() > start {
            check_underscores(&digits[start..])?;
        }
        self.exponent_and_suffix(digits)
    }

    fn exponent_and_suffix(&mut self, digits: &mut String) -> Lexed {
        if let Some(e @ ('e' | 'E')) = self.peek() {
            self.bump();
            digits.push(e);
            if let Some(sign @ ('+' | '-')) = self.peek() {
                self.bump();
                digits.push(sign);
            }
            let start = digits.len();
            self.read_digits(digits, 10);
            if digits.len() == start {
                return Err(LexerErrorKind::invalid_number("empty exponent"));
            }
            check_underscores(&digits[start..])?;
        }
        let clean: String = digits.chars().filter(|c| *c != '_').collect();
        if self.eat('f') || self.eat('F') {
            let value: f32 = clean
                .parse()
                .map_err(|_| LexerErrorKind::invalid_number("malformed float"))?;
            if value.is_infinite() {
                return Err(LexerErrorKind::too_large("Float"));
            }
            return Ok((TokenKind::FloatLiteral, TokenValue::Float(value)));
        }
        let _ = self.eat('d') || self.eat('D');
        let value: f64 = clean
            .parse()
            .map_err(|_| LexerErrorKind::invalid_number("malformed double"))?;
        if value.is_infinite() {
            return Err(LexerErrorKind::too_large("Double"));
        }
        Ok((TokenKind::DoubleLiteral, TokenValue::Double(value)))
    }

    fn pick(&mut self, next: char, matched: TokenKind, otherwise: TokenKind) -> TokenKind {
        if self.eat(next) { matched } else { otherwise }
    }

    fn peek(&self) -> Option<char> {
        self.source[self.offset..].chars().next()
    }

    fn peek_second(&self) -> Option<char> {
        let mut chars = self.source[self.offset..].chars();
        chars.next();
        chars.next()
    }

    fn eat(&mut self, expected: char) -> bool {
        if self.peek() == Some(expected) {
            self.bump();
            true
        } else {
            false
        }
    }

    fn eat_while(&mut self, mut predicate: impl FnMut(char) -> bool) {
        while self.peek().is_some_and(&mut predicate) {
            self.bump();
        }
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.offset += c.len_utf8();
        match c {
            '\n' => {
                self.line += 1;
                self.column = 1;
            }
            // a lone carriage return ends a line, the \n of \r\n does it otherwise
            '\r' if self.peek() != Some('\n') => {
                self.line += 1;
                self.column = 1;
            }
            _ => self.column += 1,
        }
        Some(c)
    }
}

impl TokenSource for Lexer<'_> {
    fn next_token(&mut self) -> Token {
        Lexer::next_token(self)
    }

    fn has_more_tokens(&self) -> bool {
        self.offset < self.source.len()
    }

    fn set_inside_type_context(&mut self, inside: bool) {
        self.inside_type_context = inside;
    }

    fn position(&self) -> ParsePosition {
        Lexer::position(self)
    }
}

fn check_underscores(digits: &str) -> Result<(), LexerErrorKind> {
    if digits.ends_with('_') {
        Err(LexerErrorKind::invalid_number("'_' at the end of a number"))
    } else {
        Ok(())
    }
}

fn is_identifier_start(c: char) -> bool {
    c.is_alphabetic() || c == '_' || c == '$'
}

fn is_identifier_part(c: char) -> bool {
    c.is_alphanumeric() || c == '_' || c == '$'
}
