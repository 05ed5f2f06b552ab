use super::keywords::Keyword;
use crate::span::Span;
use serde::Serialize;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum TokenKind {
    Keyword(Keyword),

    // Literals
    String,
    Integer,     // 42
    BigInt,      // 42L
    SmallInt,    // 42S
    TinyInt,     // 42Y
    ByteLength,  // 42M
    Decimal,     // 4.2, 4e2
    Double,      // 4.2D
    BigDecimal,  // 4.2BD

    // Identifiers
    Identifier,
    JobIdentifier,        // nightly-load_01
    BackQuotedIdentifier, // `a b`

    // Delimiters
    LeftParen,  // (
    RightParen, // )
    Comma,      // ,
    Dot,        // .
    Semicolon,  // ;

    // Operators
    Eq,         // = or ==
    NullSafeEq, // <=>
    NotEq,      // <>
    BangEq,     // !=
    Lt,         // <
    LtEq,       // <= or !>
    Gt,         // >
    GtEq,       // >= or !<
    Plus,       // +
    Minus,      // -
    Asterisk,   // *
    Slash,      // /
    Percent,    // %
    Tilde,      // ~
    Ampersand,  // &
    Pipe,       // |
    Caret,      // ^

    // Hidden channel
    SimpleComment,
    BracketedEmptyComment,
    BracketedComment,
    Whitespace,

    Unrecognized,
    Eof,
}

impl TokenKind {
    /// Whitespace and comments never reach the parser.
    pub fn is_hidden(self) -> bool {
        matches!(
            self,
            TokenKind::SimpleComment
                | TokenKind::BracketedEmptyComment
                | TokenKind::BracketedComment
                | TokenKind::Whitespace
        )
    }

    pub fn is_comment(self) -> bool {
        self.is_hidden() && self != TokenKind::Whitespace
    }

    pub fn is_number(self) -> bool {
        matches!(
            self,
            TokenKind::Integer
                | TokenKind::BigInt
                | TokenKind::SmallInt
                | TokenKind::TinyInt
                | TokenKind::ByteLength
                | TokenKind::Decimal
                | TokenKind::Double
                | TokenKind::BigDecimal
        )
    }

    pub fn is_literal(self) -> bool {
        self == TokenKind::String || self.is_number()
    }

    pub fn is_identifier(self) -> bool {
        matches!(
            self,
            TokenKind::Identifier | TokenKind::JobIdentifier | TokenKind::BackQuotedIdentifier
        )
    }

    pub fn keyword(self) -> Option<Keyword> {
        match self {
            TokenKind::Keyword(kw) => Some(kw),
            _ => None,
        }
    }

    /// Name of the token class, as used in "expected ..." messages.
    pub fn describe(self) -> String {
        let text = match self {
            TokenKind::Keyword(kw) => return format!("'{}'", kw.as_str()),
            TokenKind::String => "string literal",
            TokenKind::Integer => "integer literal",
            TokenKind::BigInt => "bigint literal",
            TokenKind::SmallInt => "smallint literal",
            TokenKind::TinyInt => "tinyint literal",
            TokenKind::ByteLength => "byte length literal",
            TokenKind::Decimal => "decimal literal",
            TokenKind::Double => "double literal",
            TokenKind::BigDecimal => "bigdecimal literal",
            TokenKind::Identifier | TokenKind::JobIdentifier | TokenKind::BackQuotedIdentifier => {
                "identifier"
            }
            TokenKind::LeftParen => "'('",
            TokenKind::RightParen => "')'",
            TokenKind::Comma => "','",
            TokenKind::Dot => "'.'",
            TokenKind::Semicolon => "';'",
            TokenKind::Eq => "'='",
            TokenKind::NullSafeEq => "'<=>'",
            TokenKind::NotEq => "'<>'",
            TokenKind::BangEq => "'!='",
            TokenKind::Lt => "'<'",
            TokenKind::LtEq => "'<='",
            TokenKind::Gt => "'>'",
            TokenKind::GtEq => "'>='",
            TokenKind::Plus => "'+'",
            TokenKind::Minus => "'-'",
            TokenKind::Asterisk => "'*'",
            TokenKind::Slash => "'/'",
            TokenKind::Percent => "'%'",
            TokenKind::Tilde => "'~'",
            TokenKind::Ampersand => "'&'",
            TokenKind::Pipe => "'|'",
            TokenKind::Caret => "'^'",
            TokenKind::SimpleComment
            | TokenKind::BracketedEmptyComment
            | TokenKind::BracketedComment => "comment",
            TokenKind::Whitespace => "whitespace",
            TokenKind::Unrecognized => "unrecognized character",
            TokenKind::Eof => "end of input",
        };
        text.to_string()
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TokenKind::Keyword(kw) => write!(f, "{}", kw.as_str()),
            other => write!(f, "{:?}", other),
        }
    }
}

/// A classified slice of the input.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Token {
    pub kind: TokenKind,
    /// Source text, except for back-quoted identifiers where it holds the unquoted name.
    pub text: String,
    pub span: Span,
}

impl Token {
    pub fn new(kind: TokenKind, text: impl Into<String>, span: Span) -> Self {
        Self {
            kind,
            text: text.into(),
            span,
        }
    }

    pub fn is_keyword(&self, kw: Keyword) -> bool {
        self.kind == TokenKind::Keyword(kw)
    }

    /// Case-insensitive comparison against a plain identifier, used for soft keywords.
    pub fn is_word(&self, word: &str) -> bool {
        self.kind == TokenKind::Identifier && self.text.eq_ignore_ascii_case(word)
    }
}
