//! Operator precedence chain.
//!
//! Precedence (lowest to highest):
//! 1. Boolean OR: `OR`
//! 2. Boolean AND: `AND`
//! 3. Negation: `NOT`, `!`, `EXISTS (query)`
//! 4. Predicates: `[NOT] BETWEEN`, `[NOT] IN`, `[NOT] LIKE | RLIKE`, `IS [NOT] NULL`
//! 5. Comparison: `=`, `==`, `<=>`, `<>`, `!=`, `<`, `<=`, `>`, `>=`
//! 6. Bitwise OR: `|`
//! 7. Bitwise XOR: `^`
//! 8. Bitwise AND: `&`
//! 9. Additive: `+`, `-`
//! 10. Multiplicative: `*`, `/`, `%`, `DIV`
//! 11. Unary: `-`, `+`, `~`
//! 12. Primary

use crate::ast::{BinaryOperator, Expression, ExpressionKind, UnaryOperator};
use crate::error::ParseResult;
use crate::lexer::{Keyword, TokenKind};
use crate::parser::Parser;

fn binary(op: BinaryOperator, left: Expression, right: Expression) -> Expression {
    let span = left.span.merge(right.span);
    Expression::new(
        ExpressionKind::Binary {
            op,
            left: Box::new(left),
            right: Box::new(right),
        },
        span,
    )
}

impl Parser {
    pub(super) fn parse_or_expression(&mut self) -> ParseResult<Expression> {
        let mut left = self.parse_and_expression()?;
        while self.consume_keyword(Keyword::Or)? {
            let right = self.parse_and_expression()?;
            left = binary(BinaryOperator::Or, left, right);
        }
        Ok(left)
    }

    fn parse_and_expression(&mut self) -> ParseResult<Expression> {
        let mut left = self.parse_not_expression()?;
        while self.consume_keyword(Keyword::And)? {
            let right = self.parse_not_expression()?;
            left = binary(BinaryOperator::And, left, right);
        }
        Ok(left)
    }

    /// NOT expr | EXISTS (query) | predicate
    fn parse_not_expression(&mut self) -> ParseResult<Expression> {
        let start = self.start_position()?;
        if self.consume_keyword(Keyword::Not)? {
            let operand = self.nested(Self::parse_not_expression)?;
            return Ok(Expression::new(
                ExpressionKind::Unary {
                    op: UnaryOperator::Not,
                    operand: Box::new(operand),
                },
                self.span_from(start),
            ));
        }
        if self.check_keyword(Keyword::Exists)? && self.peek_kind(1)? == TokenKind::LeftParen {
            self.advance()?; // consume EXISTS
            self.advance()?; // consume '('
            let query = self.parse_query()?;
            self.expect(TokenKind::RightParen)?;
            return Ok(Expression::new(
                ExpressionKind::Exists(Box::new(query)),
                self.span_from(start),
            ));
        }
        self.parse_predicate()
    }

    /// A comparison optionally followed by one predicate.
    fn parse_predicate(&mut self) -> ParseResult<Expression> {
        let start = self.start_position()?;
        let expr = self.parse_comparison_expression()?;

        let negated = self.check_keyword(Keyword::Not)?
            && matches!(
                self.peek_kind(1)?,
                TokenKind::Keyword(Keyword::Between | Keyword::In | Keyword::Like | Keyword::RLike)
            );
        if negated {
            self.advance()?; // consume NOT
        }

        let kind = match self.current_kind()? {
            TokenKind::Keyword(Keyword::Between) => {
                self.advance()?;
                let low = self.parse_comparison_expression()?;
                self.expect_keyword(Keyword::And)?;
                let high = self.parse_comparison_expression()?;
                ExpressionKind::Between {
                    expr: Box::new(expr),
                    negated,
                    low: Box::new(low),
                    high: Box::new(high),
                }
            }
            TokenKind::Keyword(Keyword::In) => {
                self.advance()?;
                self.expect(TokenKind::LeftParen)?;
                if self.at_query_start(0)? {
                    let query = self.parse_query()?;
                    self.expect(TokenKind::RightParen)?;
                    ExpressionKind::InSubquery {
                        expr: Box::new(expr),
                        negated,
                        query: Box::new(query),
                    }
                } else {
                    let list = self.parse_expression_list_tail()?;
                    ExpressionKind::InList {
                        expr: Box::new(expr),
                        negated,
                        list,
                    }
                }
            }
            TokenKind::Keyword(kw @ (Keyword::Like | Keyword::RLike)) => {
                self.advance()?;
                let pattern = self.parse_comparison_expression()?;
                ExpressionKind::Like {
                    expr: Box::new(expr),
                    negated,
                    regex: kw == Keyword::RLike,
                    pattern: Box::new(pattern),
                }
            }
            TokenKind::Keyword(Keyword::Is) => {
                self.advance()?;
                let negated = self.consume_keyword(Keyword::Not)?;
                self.expect_keyword(Keyword::Null)?;
                ExpressionKind::IsNull {
                    expr: Box::new(expr),
                    negated,
                }
            }
            _ => return Ok(expr),
        };

        Ok(Expression::new(kind, self.span_from(start)))
    }

    fn parse_comparison_expression(&mut self) -> ParseResult<Expression> {
        let mut left = self.parse_bitwise_or_expression()?;
        loop {
            let op = match self.current_kind()? {
                TokenKind::Eq => BinaryOperator::Eq,
                TokenKind::NullSafeEq => BinaryOperator::NullSafeEq,
                TokenKind::NotEq | TokenKind::BangEq => BinaryOperator::NotEq,
                TokenKind::Lt => BinaryOperator::Lt,
                TokenKind::LtEq => BinaryOperator::LtEq,
                TokenKind::Gt => BinaryOperator::Gt,
                TokenKind::GtEq => BinaryOperator::GtEq,
                _ => break,
            };
            self.advance()?;
            let right = self.parse_bitwise_or_expression()?;
            left = binary(op, left, right);
        }
        Ok(left)
    }

    fn parse_bitwise_or_expression(&mut self) -> ParseResult<Expression> {
        let mut left = self.parse_bitwise_xor_expression()?;
        while self.consume(TokenKind::Pipe)?.is_some() {
            let right = self.parse_bitwise_xor_expression()?;
            left = binary(BinaryOperator::BitOr, left, right);
        }
        Ok(left)
    }

    fn parse_bitwise_xor_expression(&mut self) -> ParseResult<Expression> {
        let mut left = self.parse_bitwise_and_expression()?;
        while self.consume(TokenKind::Caret)?.is_some() {
            let right = self.parse_bitwise_and_expression()?;
            left = binary(BinaryOperator::BitXor, left, right);
        }
        Ok(left)
    }

    fn parse_bitwise_and_expression(&mut self) -> ParseResult<Expression> {
        let mut left = self.parse_additive_expression()?;
        while self.consume(TokenKind::Ampersand)?.is_some() {
            let right = self.parse_additive_expression()?;
            left = binary(BinaryOperator::BitAnd, left, right);
        }
        Ok(left)
    }

    fn parse_additive_expression(&mut self) -> ParseResult<Expression> {
        let mut left = self.parse_multiplicative_expression()?;
        loop {
            let op = match self.current_kind()? {
                TokenKind::Plus => BinaryOperator::Add,
                TokenKind::Minus => BinaryOperator::Subtract,
                _ => break,
            };
            self.advance()?;
            let right = self.parse_multiplicative_expression()?;
            left = binary(op, left, right);
        }
        Ok(left)
    }

    fn parse_multiplicative_expression(&mut self) -> ParseResult<Expression> {
        let mut left = self.parse_unary_expression()?;
        loop {
            let op = match self.current_kind()? {
                TokenKind::Asterisk => BinaryOperator::Multiply,
                TokenKind::Slash => BinaryOperator::Divide,
                TokenKind::Percent => BinaryOperator::Modulo,
                TokenKind::Keyword(Keyword::Div) => BinaryOperator::IntDivide,
                _ => break,
            };
            self.advance()?;
            let right = self.parse_unary_expression()?;
            left = binary(op, left, right);
        }
        Ok(left)
    }

    fn parse_unary_expression(&mut self) -> ParseResult<Expression> {
        let start = self.start_position()?;
        let op = match self.current_kind()? {
            TokenKind::Minus => UnaryOperator::Minus,
            TokenKind::Plus => UnaryOperator::Plus,
            TokenKind::Tilde => UnaryOperator::BitNot,
            _ => return self.parse_primary_expression(),
        };
        self.advance()?;
        let operand = self.nested(Self::parse_unary_expression)?;
        Ok(Expression::new(
            ExpressionKind::Unary {
                op,
                operand: Box::new(operand),
            },
            self.span_from(start),
        ))
    }
}
