//! Recursive-descent parser for the extended SQL dialect.
//!
//! This module turns the visible token stream into a [`ParseNode`], organized into:
//! - `statements`: statement dispatch, MERGE / LOAD / EXPORT and opaque statements
//! - `query`: the query sub-grammar (WITH, SELECT, set operations, relations)
//! - `expressions`: the operator precedence chain and primary expressions
//!
//! Decisions use one token of lookahead at statement start and at most three tokens
//! elsewhere. The first mismatch raises a [`ParseError`]; there is no recovery.
//!
//! [`ParseError`]: crate::error::ParseError

mod expressions;
mod query;
mod statements;

use crate::ast::*;
use crate::error::ParseResult;
use crate::lexer::{Keyword, Token, TokenKind};
use crate::reporter::ErrorReporter;
use crate::span::{SourcePosition, Span};
use crate::stream::TokenStream;

/// Deepest nesting of expressions, queries and relations accepted before the parse
/// fails. Keeps recursion within a default 2 MiB thread stack.
pub const MAX_NESTING_DEPTH: usize = 32;

/// Parser over a single input string
pub struct Parser {
    pub(crate) stream: TokenStream,
    /// While set, the plain identifiers MATCHED, UPDATE, SOURCE and TARGET are read as
    /// keywords. Only the merge clause productions turn it on.
    pub(crate) soft_keywords: bool,
    depth: usize,
}

impl Parser {
    pub fn new(input: &str) -> Self {
        Self {
            stream: TokenStream::new(input),
            soft_keywords: false,
            depth: 0,
        }
    }

    /// Parse exactly one statement, optionally followed by `;`.
    pub fn parse_statement(&mut self) -> ParseResult<ParseNode> {
        let statement = self.parse_statement_body()?;
        self.consume(TokenKind::Semicolon)?;
        self.expect_end()?;
        Ok(ParseNode::Statement(statement))
    }

    /// Parse a `;`-separated script. Empty statements are skipped.
    pub fn parse_script(&mut self) -> ParseResult<Vec<ParseNode>> {
        let mut nodes = Vec::new();
        loop {
            while self.consume(TokenKind::Semicolon)?.is_some() {}
            if self.stream.is_at_end()? {
                return Ok(nodes);
            }
            nodes.push(ParseNode::Statement(self.parse_statement_body()?));
            if self.consume(TokenKind::Semicolon)?.is_none() {
                self.expect_end()?;
            }
        }
    }

    /// Parse a standalone expression.
    pub fn parse_standalone_expression(&mut self) -> ParseResult<ParseNode> {
        let expr = self.parse_expression()?;
        self.expect_end()?;
        Ok(ParseNode::Expression(expr))
    }

    /// Whitespace and comments seen so far.
    pub fn hidden_tokens(&self) -> &[Token] {
        self.stream.hidden_tokens()
    }

    fn expect_end(&mut self) -> ParseResult<()> {
        let token = self.current_token()?;
        if token.kind == TokenKind::Eof {
            Ok(())
        } else {
            ErrorReporter::unexpected("end of input", &token)
        }
    }
}

// ============================================================================
// Token-level helpers
// ============================================================================

impl Parser {
    /// Get the current token
    pub(crate) fn current_token(&mut self) -> ParseResult<Token> {
        Ok(self.stream.peek(0)?.clone())
    }

    pub(crate) fn current_kind(&mut self) -> ParseResult<TokenKind> {
        self.stream.peek_kind(0)
    }

    /// Peek at the kind of the token `offset` positions ahead
    pub(crate) fn peek_kind(&mut self, offset: usize) -> ParseResult<TokenKind> {
        self.stream.peek_kind(offset)
    }

    /// Advance to the next token, returning the consumed one
    pub(crate) fn advance(&mut self) -> ParseResult<Token> {
        self.stream.next()
    }

    pub(crate) fn check(&mut self, kind: TokenKind) -> ParseResult<bool> {
        Ok(self.current_kind()? == kind)
    }

    pub(crate) fn check_keyword(&mut self, kw: Keyword) -> ParseResult<bool> {
        Ok(self.stream.peek(0)?.is_keyword(kw))
    }

    /// Consume the current token if it has the given kind
    pub(crate) fn consume(&mut self, kind: TokenKind) -> ParseResult<Option<Token>> {
        if self.check(kind)? {
            Ok(Some(self.advance()?))
        } else {
            Ok(None)
        }
    }

    pub(crate) fn consume_keyword(&mut self, kw: Keyword) -> ParseResult<bool> {
        Ok(self.consume(TokenKind::Keyword(kw))?.is_some())
    }

    /// Expect a specific token kind and advance, or report what was found instead
    pub(crate) fn expect(&mut self, kind: TokenKind) -> ParseResult<Token> {
        let token = self.current_token()?;
        if token.kind == kind {
            self.advance()
        } else {
            ErrorReporter::unexpected(&kind.describe(), &token)
        }
    }

    pub(crate) fn expect_keyword(&mut self, kw: Keyword) -> ParseResult<Token> {
        self.expect(TokenKind::Keyword(kw))
    }

    /// Start of the current token
    pub(crate) fn start_position(&mut self) -> ParseResult<SourcePosition> {
        Ok(self.stream.peek(0)?.span.start)
    }

    /// Span from `start` to the end of the last consumed token
    pub(crate) fn span_from(&self, start: SourcePosition) -> Span {
        Span::new(start, self.stream.last_end())
    }

    /// Run `parse` one nesting level deeper.
    pub(crate) fn nested<T>(
        &mut self,
        parse: impl FnOnce(&mut Self) -> ParseResult<T>,
    ) -> ParseResult<T> {
        if self.depth >= MAX_NESTING_DEPTH {
            let start = self.start_position()?;
            return ErrorReporter::report(start, "expression nesting too deep");
        }
        self.depth += 1;
        let result = parse(self);
        self.depth -= 1;
        result
    }

    // ==================== Soft keywords ====================

    /// Whether the token `offset` ahead is the soft keyword `word` in the current context.
    pub(crate) fn at_soft_keyword(&mut self, offset: usize, word: &str) -> ParseResult<bool> {
        if !self.soft_keywords {
            return Ok(false);
        }
        Ok(self.stream.peek(offset)?.is_word(word))
    }

    pub(crate) fn expect_soft_keyword(&mut self, word: &str) -> ParseResult<Token> {
        if self.at_soft_keyword(0, word)? {
            self.advance()
        } else {
            let token = self.current_token()?;
            ErrorReporter::unexpected(&format!("'{}'", word), &token)
        }
    }

    // ==================== Identifiers ====================

    /// Whether a token of this kind can start an identifier.
    pub(crate) fn is_identifier_kind(kind: TokenKind) -> bool {
        match kind {
            TokenKind::Keyword(kw) => !kw.is_reserved(),
            other => other.is_identifier(),
        }
    }

    pub(crate) fn at_identifier(&mut self, offset: usize) -> ParseResult<bool> {
        Ok(Self::is_identifier_kind(self.peek_kind(offset)?))
    }

    /// identifier : IDENTIFIER | JOBIDENTIFIER | BACKQUOTED_IDENTIFIER | nonReserved
    pub(crate) fn parse_identifier(&mut self) -> ParseResult<Ident> {
        let token = self.current_token()?;
        if !Self::is_identifier_kind(token.kind) {
            return ErrorReporter::unexpected("identifier", &token);
        }
        self.advance()?;
        Ok(Ident {
            quoted: token.kind == TokenKind::BackQuotedIdentifier,
            value: token.text,
            span: token.span,
        })
    }

    /// identifier ('.' identifier)*
    pub(crate) fn parse_qualified_name(&mut self) -> ParseResult<QualifiedName> {
        let start = self.start_position()?;
        let mut parts = vec![self.parse_identifier()?];
        while self.check(TokenKind::Dot)? && self.at_identifier(1)? {
            self.advance()?; // consume '.'
            parts.push(self.parse_identifier()?);
        }
        Ok(QualifiedName {
            parts,
            span: self.span_from(start),
        })
    }

    /// '(' identifier (',' identifier)* ')'
    pub(crate) fn parse_identifier_list(&mut self) -> ParseResult<Vec<Ident>> {
        self.expect(TokenKind::LeftParen)?;
        let mut idents = vec![self.parse_identifier()?];
        while self.consume(TokenKind::Comma)?.is_some() {
            idents.push(self.parse_identifier()?);
        }
        self.expect(TokenKind::RightParen)?;
        Ok(idents)
    }

    /// Optional alias: `AS name` or a bare non-reserved name.
    pub(crate) fn parse_optional_alias(&mut self) -> ParseResult<Option<Ident>> {
        if self.consume_keyword(Keyword::As)? {
            return Ok(Some(self.parse_identifier()?));
        }
        if self.at_identifier(0)? {
            return Ok(Some(self.parse_identifier()?));
        }
        Ok(None)
    }
}

// ============================================================================
// Entry points
// ============================================================================

/// Parse a single statement.
pub fn parse_statement(sql: &str) -> ParseResult<ParseNode> {
    Parser::new(sql).parse_statement()
}

/// Parse every statement of a `;`-separated script.
pub fn parse_script(sql: &str) -> ParseResult<Vec<ParseNode>> {
    Parser::new(sql).parse_script()
}

/// Parse a bare expression.
pub fn parse_expression(sql: &str) -> ParseResult<ParseNode> {
    Parser::new(sql).parse_standalone_expression()
}
