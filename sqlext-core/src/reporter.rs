//! Turns recognition failures into [`ParseError`]s.
//!
//! Every function here returns `Err`; callers write `return ErrorReporter::unexpected(..)`
//! or use the result with `?`. No recovery is attempted: the first error ends the parse.

use crate::error::{ParseError, ParseErrorKind, ParseResult};
use crate::lexer::{Token, TokenKind};
use crate::span::{SourcePosition, Span};

pub struct ErrorReporter;

impl ErrorReporter {
    /// Syntax error with a zero-width span at `position`.
    pub fn report<T>(position: SourcePosition, message: impl Into<String>) -> ParseResult<T> {
        Self::report_span(Span::point(position), message)
    }

    /// Syntax error covering an explicit span.
    pub fn report_span<T>(span: Span, message: impl Into<String>) -> ParseResult<T> {
        Err(Self::build(ParseErrorKind::Syntax, span, message.into()))
    }

    /// "expected X, found Y", located at the start of the offending token.
    pub fn unexpected<T>(expected: &str, found: &Token) -> ParseResult<T> {
        let message = format!("expected {}, found {}", expected, Self::describe(found));
        Self::report(found.span.start, message)
    }

    pub fn lexical<T>(span: Span, message: impl Into<String>) -> ParseResult<T> {
        Err(Self::build(ParseErrorKind::Lexical, span, message.into()))
    }

    pub fn classification<T>(span: Span, message: impl Into<String>) -> ParseResult<T> {
        Err(Self::build(ParseErrorKind::Classification, span, message.into()))
    }

    /// How a token is named in error messages.
    pub fn describe(token: &Token) -> String {
        match token.kind {
            TokenKind::Eof => "end of input".to_string(),
            TokenKind::BackQuotedIdentifier => format!("'`{}`'", token.text.replace('`', "``")),
            _ => format!("'{}'", token.text),
        }
    }

    fn build(kind: ParseErrorKind, span: Span, message: String) -> ParseError {
        tracing::debug!(%kind, position = %span.start, "{}", message);
        ParseError::new(kind, message, span)
    }
}
