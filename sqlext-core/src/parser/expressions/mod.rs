//! Expression parsing.
//!
//! - `precedence`: boolean connectives, predicates, comparison and arithmetic levels
//! - `primary`: constants, column references, function calls, CASE, CAST, subqueries

mod precedence;
mod primary;

use crate::ast::Expression;
use crate::error::ParseResult;
use crate::lexer::TokenKind;
use crate::parser::Parser;

impl Parser {
    /// Entry point for expression parsing
    pub(crate) fn parse_expression(&mut self) -> ParseResult<Expression> {
        self.nested(Self::parse_or_expression)
    }

    /// Comma-separated expressions up to and including the closing ')'.
    /// Assumes the opening '(' has already been consumed.
    pub(super) fn parse_expression_list_tail(&mut self) -> ParseResult<Vec<Expression>> {
        let mut items = vec![self.parse_expression()?];
        while self.consume(TokenKind::Comma)?.is_some() {
            items.push(self.parse_expression()?);
        }
        self.expect(TokenKind::RightParen)?;
        Ok(items)
    }
}
