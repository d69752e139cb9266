use crate::error::LexerErrorKind;
use crate::syntax::ParsePosition;
use compact_str::CompactString;
use std::fmt;

macro_rules! token_kinds {
    (
        fixed { $($fixed:ident => $text:literal,)* }
        named { $($named:ident => $grammar_name:literal, $display:literal;)* }
    ) => {
        /// Every kind of token the lexer can produce.
        ///
        /// Kinds in the `fixed` group always have the same source text; they are
        /// referenced from grammar text by that text in quotes (`'{'`, `'class'`).
        /// The `named` kinds are referenced by an upper-case name (`IDENTIFIER`).
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub enum TokenKind {
            $($fixed,)*
            $($named,)*
        }

        impl TokenKind {
            /// All token kinds in declaration order
            pub const ALL: &'static [TokenKind] = &[$(TokenKind::$fixed,)* $(TokenKind::$named,)*];

            /// Look up a kind with fixed source text, such as `"("` or `"while"`
            #[must_use]
            pub fn from_text(text: &str) -> Option<Self> {
                match text {
                    $($text => Some(Self::$fixed),)*
                    _ => None,
                }
            }

            /// Look up a named kind by its grammar name, such as `"IDENTIFIER"`
            #[must_use]
            pub fn from_grammar_name(name: &str) -> Option<Self> {
                match name {
                    $($grammar_name => Some(Self::$named),)*
                    _ => None,
                }
            }

            /// Source text for fixed kinds, a readable description otherwise
            #[must_use]
            pub const fn text(self) -> &'static str {
                match self {
                    $(Self::$fixed => $text,)*
                    $(Self::$named => $display,)*
                }
            }
        }
    };
}

token_kinds! {
    fixed {
        // separators
        LeftParenthesis => "(",
        RightParenthesis => ")",
        LeftCurly => "{",
        RightCurly => "}",
        LeftBracket => "[",
        RightBracket => "]",
        Semicolon => ";",
        Comma => ",",
        Dot => ".",
        Ellipsis => "...",
        At => "@",
        DoubleColon => "::",

        // keywords
        Abstract => "abstract",
        Assert => "assert",
        Boolean => "boolean",
        Break => "break",
        Byte => "byte",
        Case => "case",
        Catch => "catch",
        Char => "char",
        Class => "class",
        Const => "const",
        Continue => "continue",
        Default => "default",
        Do => "do",
        Double => "double",
        Else => "else",
        Enum => "enum",
        Extends => "extends",
        Final => "final",
        Finally => "finally",
        Float => "float",
        For => "for",
        If => "if",
        Goto => "goto",
        Implements => "implements",
        Import => "import",
        Instanceof => "instanceof",
        Int => "int",
        Interface => "interface",
        Long => "long",
        Native => "native",
        New => "new",
        Package => "package",
        Private => "private",
        Protected => "protected",
        Public => "public",
        Return => "return",
        Short => "short",
        Static => "static",
        Strictfp => "strictfp",
        Super => "super",
        Switch => "switch",
        Synchronized => "synchronized",
        This => "this",
        Throw => "throw",
        Throws => "throws",
        Transient => "transient",
        Try => "try",
        Void => "void",
        Volatile => "volatile",
        While => "while",

        // operators
        Equal => "=",
        Gt => ">",
        Lt => "<",
        Not => "!",
        Tilde => "~",
        QuestionMark => "?",
        Colon => ":",
        Arrow => "->",
        DoubleEqual => "==",
        Ge => ">=",
        Le => "<=",
        NotEqual => "!=",
        LogicalAnd => "&&",
        LogicalOr => "||",
        Increment => "++",
        Decrement => "--",
        Plus => "+",
        Minus => "-",
        Multiply => "*",
        Divide => "/",
        BitAnd => "&",
        BitOr => "|",
        BitXor => "^",
        Remainder => "%",
        LeftShift => "<<",
        RightShift => ">>",
        RightShiftUnsigned => ">>>",
        PlusEqual => "+=",
        MinusEqual => "-=",
        MultiplyEqual => "*=",
        DivideEqual => "/=",
        BitAndEqual => "&=",
        BitOrEqual => "|=",
        BitXorEqual => "^=",
        RemainderEqual => "%=",
        LeftShiftEqual => "<<=",
        RightShiftEqual => ">>=",
        RightShiftUnsignedEqual => ">>>=",

        // keyword-like literals
        True => "true",
        False => "false",
        Null => "null",
    }
    named {
        Identifier => "IDENTIFIER", "identifier";
        IntLiteral => "INT_LITERAL", "int literal";
        LongLiteral => "LONG_LITERAL", "long literal";
        FloatLiteral => "FLOAT_LITERAL", "float literal";
        DoubleLiteral => "DOUBLE_LITERAL", "double literal";
        CharacterLiteral => "CHARACTER_LITERAL", "character literal";
        StringLiteral => "STRING_LITERAL", "string literal";
        Whitespace => "WHITESPACE", "whitespace";
        Lf => "LF", "line feed";
        Cr => "CR", "carriage return";
        CrLf => "CRLF", "carriage return line feed";
        MultilineComment => "MULTILINE_COMMENT", "multiline comment";
        OnelineComment => "ONELINE_COMMENT", "comment";
        Sub => "SUB", "substitute character";
        EndOfInput => "END_OF_INPUT", "end of input";
        Error => "ERROR", "error";
    }
}

impl TokenKind {
    /// Reserved words, excluding `true`, `false` and `null`
    #[must_use]
    pub fn is_keyword(self) -> bool {
        (Self::Abstract..=Self::While).contains(&self)
    }

    #[must_use]
    pub fn is_operator(self) -> bool {
        (Self::Equal..=Self::RightShiftUnsignedEqual).contains(&self)
    }

    #[must_use]
    pub fn is_separator(self) -> bool {
        (Self::LeftParenthesis..=Self::DoubleColon).contains(&self)
    }

    /// Kinds whose token carries a decoded literal value
    #[must_use]
    pub fn is_literal(self) -> bool {
        matches!(
            self,
            Self::IntLiteral
                | Self::LongLiteral
                | Self::FloatLiteral
                | Self::DoubleLiteral
                | Self::CharacterLiteral
                | Self::StringLiteral
                | Self::True
                | Self::False
                | Self::Null
        )
    }

    /// Whitespace, line terminators, comments and the trailing SUB character.
    ///
    /// The parser never sees trivia.
    #[must_use]
    pub fn is_trivia(self) -> bool {
        matches!(
            self,
            Self::Whitespace
                | Self::Lf
                | Self::Cr
                | Self::CrLf
                | Self::MultilineComment
                | Self::OnelineComment
                | Self::Sub
        )
    }

    /// Compound assignment operators and `=`
    #[must_use]
    pub fn is_assignment(self) -> bool {
        self == Self::Equal || (Self::PlusEqual..=Self::RightShiftUnsignedEqual).contains(&self)
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_keyword() || self.is_operator() || self.is_separator() || self.is_literal() {
            match self {
                Self::IntLiteral
                | Self::LongLiteral
                | Self::FloatLiteral
                | Self::DoubleLiteral
                | Self::CharacterLiteral
                | Self::StringLiteral => f.write_str(self.text()),
                _ => write!(f, "'{}'", self.text()),
            }
        } else {
            f.write_str(self.text())
        }
    }
}

/// The decoded value of a token, if it has one.
#[derive(Debug, Clone, PartialEq)]
pub enum TokenValue {
    /// Keywords, operators, separators, identifiers and trivia
    None,
    Int(i32),
    Long(i64),
    Float(f32),
    Double(f64),
    Char(char),
    String(CompactString),
    /// Why the input could not be tokenized; only on [`TokenKind::Error`]
    Error(LexerErrorKind),
}

/// A token produced by a token source.
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    /// The kind of this token
    pub kind: TokenKind,
    /// The source text that this token represents
    pub text: CompactString,
    /// Where the token starts
    pub position: ParsePosition,
    /// The decoded value of literals, or the error of an `ERROR` token
    pub value: TokenValue,
}

impl Token {
    /// Create a token without a decoded value
    #[must_use]
    pub fn new(kind: TokenKind, text: impl Into<CompactString>, position: ParsePosition) -> Self {
        Self {
            kind,
            text: text.into(),
            position,
            value: TokenValue::None,
        }
    }

    /// Attach a decoded value
    #[must_use]
    pub fn with_value(mut self, value: TokenValue) -> Self {
        self.value = value;
        self
    }

    /// The end of input marker at `position`
    #[must_use]
    pub fn end_of_input(position: ParsePosition) -> Self {
        Self::new(TokenKind::EndOfInput, "", position)
    }

    /// The lexer error carried by an `ERROR` token
    #[must_use]
    pub fn error(&self) -> Option<&LexerErrorKind> {
        match &self.value {
            TokenValue::Error(kind) => Some(kind),
            _ => None,
        }
    }
}
