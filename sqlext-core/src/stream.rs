//! Parser-facing view of the lexer output.

use crate::error::ParseResult;
use crate::lexer::{Lexer, Token, TokenKind};
use crate::span::{SourcePosition, Span};
use std::collections::VecDeque;

/// Buffers visible tokens on demand for arbitrary lookahead. Whitespace and comments are
/// kept aside with their spans instead of being dropped.
pub struct TokenStream {
    lexer: Lexer,
    buffer: VecDeque<Token>,
    hidden: Vec<Token>,
    eof: Token,
    reached_end: bool,
    last_end: SourcePosition,
}

impl TokenStream {
    pub fn new(input: &str) -> Self {
        Self {
            lexer: Lexer::new(input),
            buffer: VecDeque::new(),
            hidden: Vec::new(),
            eof: Token::new(TokenKind::Eof, "", Span::default()),
            reached_end: false,
            last_end: SourcePosition::START,
        }
    }

    /// Lex until `k + 1` visible tokens are buffered or the input is exhausted.
    fn fill(&mut self, k: usize) -> ParseResult<()> {
        while self.buffer.len() <= k && !self.reached_end {
            let token = self.lexer.next_token()?;
            if token.kind == TokenKind::Eof {
                self.eof = token;
                self.reached_end = true;
            } else if token.kind.is_hidden() {
                self.hidden.push(token);
            } else {
                self.buffer.push_back(token);
            }
        }
        Ok(())
    }

    /// The visible token `k` positions ahead; `Eof` past the end.
    pub fn peek(&mut self, k: usize) -> ParseResult<&Token> {
        self.fill(k)?;
        Ok(self.buffer.get(k).unwrap_or(&self.eof))
    }

    pub fn peek_kind(&mut self, k: usize) -> ParseResult<TokenKind> {
        Ok(self.peek(k)?.kind)
    }

    /// Consume one visible token. Keeps returning `Eof` at the end.
    pub fn next(&mut self) -> ParseResult<Token> {
        self.fill(0)?;
        let token = match self.buffer.pop_front() {
            Some(token) => token,
            None => self.eof.clone(),
        };
        self.last_end = token.span.end;
        Ok(token)
    }

    /// End of the most recently consumed token.
    pub fn last_end(&self) -> SourcePosition {
        self.last_end
    }

    /// Whitespace and comments lexed so far, in source order.
    pub fn hidden_tokens(&self) -> &[Token] {
        &self.hidden
    }

    pub fn is_at_end(&mut self) -> ParseResult<bool> {
        Ok(self.peek_kind(0)? == TokenKind::Eof)
    }
}
