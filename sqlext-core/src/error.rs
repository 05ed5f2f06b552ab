//! Error types for sqlext-core.

use crate::span::Span;
use std::fmt;
use thiserror::Error;

/// Which stage of the pipeline rejected the input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ParseErrorKind {
    /// Unterminated string literal or bracketed comment
    Lexical,
    /// No production matches the next token, or a recognized construct is malformed
    Syntax,
    /// A parse node with no command mapping reached the dispatcher. This is a gap in
    /// grammar coverage rather than bad user input.
    Classification,
}

impl fmt::Display for ParseErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParseErrorKind::Lexical => write!(f, "lexical error"),
            ParseErrorKind::Syntax => write!(f, "syntax error"),
            ParseErrorKind::Classification => write!(f, "classification error"),
        }
    }
}

/// The single failure type of the parsing pipeline.
#[derive(Error, Debug, Clone, PartialEq)]
#[error("{message} ({})", .span.start)]
pub struct ParseError {
    pub kind: ParseErrorKind,
    pub message: String,
    pub span: Span,
}

/// Result type for parsing operations
pub type ParseResult<T> = Result<T, ParseError>;

impl ParseError {
    pub fn new(kind: ParseErrorKind, message: impl Into<String>, span: Span) -> Self {
        Self {
            kind,
            message: message.into(),
            span,
        }
    }

    pub fn syntax(message: impl Into<String>, span: Span) -> Self {
        Self::new(ParseErrorKind::Syntax, message, span)
    }

    pub fn lexical(message: impl Into<String>, span: Span) -> Self {
        Self::new(ParseErrorKind::Lexical, message, span)
    }

    pub fn classification(message: impl Into<String>, span: Span) -> Self {
        Self::new(ParseErrorKind::Classification, message, span)
    }

    pub fn line(&self) -> u32 {
        self.span.start.line
    }

    pub fn column(&self) -> u32 {
        self.span.start.column
    }

    /// Render the error against the statement it came from:
    ///
    /// ```text
    /// expected ')', found 'FROM'(line 1, pos 14)
    ///
    /// == SQL ==
    /// SELECT max(a FROM t
    /// --------------^^^
    /// ```
    pub fn render(&self, source: &str) -> String {
        let line = self.line() as usize;
        let mut out = format!("{}({})\n\n== SQL ==\n", self.message, self.span.start);
        let lines: Vec<&str> = source.split('\n').collect();
        let split = line.min(lines.len());
        for text in &lines[..split] {
            out.push_str(text.trim_end_matches('\r'));
            out.push('\n');
        }
        out.push_str(&"-".repeat(self.column() as usize));
        out.push_str("^^^\n");
        for text in &lines[split..] {
            out.push_str(text.trim_end_matches('\r'));
            out.push('\n');
        }
        out
    }
}

impl serde::Serialize for ParseError {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.collect_str(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::span::SourcePosition;

    fn at(line: u32, column: u32, offset: usize) -> Span {
        Span::point(SourcePosition::new(line, column, offset))
    }

    #[test]
    fn test_error_messages() {
        let err = ParseError::syntax("expected ')', found 'FROM'", at(1, 13, 13));
        assert_eq!(err.to_string(), "expected ')', found 'FROM' (line 1, pos 13)");
        assert_eq!(err.kind, ParseErrorKind::Syntax);

        let err = ParseError::lexical("unterminated string literal", at(2, 0, 9));
        assert_eq!(err.to_string(), "unterminated string literal (line 2, pos 0)");
        assert_eq!(err.line(), 2);
        assert_eq!(err.column(), 0);
    }

    #[test]
    fn test_render_places_caret_under_column() {
        let sql = "SELECT max(a\nFROM t";
        let err = ParseError::syntax("expected ')', found 'FROM'", at(2, 0, 13));
        let rendered = err.render(sql);
        assert_eq!(
            rendered,
            "expected ')', found 'FROM'(line 2, pos 0)\n\n== SQL ==\nSELECT max(a\nFROM t\n^^^\n"
        );
    }

    #[test]
    fn test_render_single_line() {
        let err = ParseError::syntax("boom", at(1, 3, 3));
        let rendered = err.render("abc def");
        assert!(rendered.ends_with("abc def\n---^^^\n"));
    }

    #[test]
    fn test_serializes_as_string() {
        let err = ParseError::classification("no command for expression", at(1, 0, 0));
        let json = serde_json::to_string(&err).unwrap();
        assert_eq!(json, "\"no command for expression (line 1, pos 0)\"");
    }
}
