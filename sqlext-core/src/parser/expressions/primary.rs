//! Primary expressions and constants.

use crate::ast::*;
use crate::error::ParseResult;
use crate::lexer::{unescape_string, Keyword, TokenKind};
use crate::parser::Parser;
use crate::reporter::ErrorReporter;

fn number_kind(kind: TokenKind) -> Option<NumberKind> {
    Some(match kind {
        TokenKind::Integer => NumberKind::Integer,
        TokenKind::BigInt => NumberKind::BigInt,
        TokenKind::SmallInt => NumberKind::SmallInt,
        TokenKind::TinyInt => NumberKind::TinyInt,
        TokenKind::ByteLength => NumberKind::ByteLength,
        TokenKind::Decimal => NumberKind::Decimal,
        TokenKind::Double => NumberKind::Double,
        TokenKind::BigDecimal => NumberKind::BigDecimal,
        _ => return None,
    })
}

impl Parser {
    pub(super) fn parse_primary_expression(&mut self) -> ParseResult<Expression> {
        let token = self.current_token()?;
        let start = token.span.start;

        let kind = match token.kind {
            TokenKind::Keyword(Keyword::CurrentDate) => {
                self.advance()?;
                ExpressionKind::CurrentDate
            }
            TokenKind::Keyword(Keyword::CurrentTimestamp) => {
                self.advance()?;
                ExpressionKind::CurrentTimestamp
            }
            TokenKind::Keyword(Keyword::Case) => self.parse_case()?,
            TokenKind::Keyword(Keyword::Cast) => self.parse_cast()?,
            TokenKind::Keyword(Keyword::Null | Keyword::True | Keyword::False | Keyword::Interval)
            | TokenKind::String => ExpressionKind::Literal(self.parse_constant()?.value),
            k if k.is_number() => ExpressionKind::Literal(self.parse_constant()?.value),
            TokenKind::Asterisk => {
                self.advance()?;
                ExpressionKind::Star { qualifier: None }
            }
            TokenKind::LeftParen => self.parse_parenthesized()?,
            TokenKind::Identifier if self.peek_kind(1)? == TokenKind::String => {
                ExpressionKind::Literal(self.parse_constant()?.value)
            }
            k if Self::is_identifier_kind(k) => self.parse_name_expression()?,
            _ => return ErrorReporter::unexpected("expression", &token),
        };

        Ok(Expression::new(kind, self.span_from(start)))
    }

    /// Column reference, qualified star or function call.
    fn parse_name_expression(&mut self) -> ParseResult<ExpressionKind> {
        let name = self.parse_qualified_name()?;

        if self.check(TokenKind::Dot)? && self.peek_kind(1)? == TokenKind::Asterisk {
            self.advance()?; // consume '.'
            self.advance()?; // consume '*'
            return Ok(ExpressionKind::Star {
                qualifier: Some(name),
            });
        }

        if self.consume(TokenKind::LeftParen)?.is_none() {
            return Ok(ExpressionKind::Column(name));
        }

        let distinct = if self.consume_keyword(Keyword::Distinct)? {
            true
        } else {
            self.consume_keyword(Keyword::All)?;
            false
        };
        let args = if self.consume(TokenKind::RightParen)?.is_some() {
            Vec::new()
        } else {
            self.parse_expression_list_tail()?
        };
        Ok(ExpressionKind::Function {
            name,
            distinct,
            args,
        })
    }

    /// '(' query ')' | '(' expression ')' | '(' expression (',' expression)+ ')'
    fn parse_parenthesized(&mut self) -> ParseResult<ExpressionKind> {
        if self.at_query_start(1)? {
            self.advance()?; // consume '('
            let query = self.parse_query()?;
            self.expect(TokenKind::RightParen)?;
            return Ok(ExpressionKind::Subquery(Box::new(query)));
        }

        self.advance()?; // consume '('
        let first = self.parse_expression()?;
        if self.consume(TokenKind::RightParen)?.is_some() {
            return Ok(ExpressionKind::Nested(Box::new(first)));
        }
        self.expect(TokenKind::Comma)?;
        let mut items = vec![first];
        items.extend(self.parse_expression_list_tail()?);
        Ok(ExpressionKind::Row(items))
    }

    /// CASE [operand] WHEN ... THEN ... [ELSE ...] END
    fn parse_case(&mut self) -> ParseResult<ExpressionKind> {
        self.expect_keyword(Keyword::Case)?;
        let operand = if self.check_keyword(Keyword::When)? {
            None
        } else {
            Some(Box::new(self.parse_expression()?))
        };

        let mut branches = Vec::new();
        while self.consume_keyword(Keyword::When)? {
            let condition = self.parse_expression()?;
            self.expect_keyword(Keyword::Then)?;
            let result = self.parse_expression()?;
            branches.push(WhenBranch { condition, result });
        }
        if branches.is_empty() {
            let token = self.current_token()?;
            return ErrorReporter::unexpected("'WHEN'", &token);
        }

        let else_result = if self.consume_keyword(Keyword::Else)? {
            Some(Box::new(self.parse_expression()?))
        } else {
            None
        };
        self.expect_keyword(Keyword::End)?;

        Ok(ExpressionKind::Case {
            operand,
            branches,
            else_result,
        })
    }

    /// CAST '(' expression AS dataType ')'
    fn parse_cast(&mut self) -> ParseResult<ExpressionKind> {
        self.expect_keyword(Keyword::Cast)?;
        self.expect(TokenKind::LeftParen)?;
        let expr = self.parse_expression()?;
        self.expect_keyword(Keyword::As)?;
        let data_type = self.parse_data_type()?;
        self.expect(TokenKind::RightParen)?;
        Ok(ExpressionKind::Cast {
            expr: Box::new(expr),
            data_type,
        })
    }

    /// ARRAY<t> | MAP<k, v> | name ['(' INTEGER (',' INTEGER)* ')']
    pub(crate) fn parse_data_type(&mut self) -> ParseResult<DataType> {
        let name = self.parse_identifier()?;
        let upper = name.value.to_ascii_uppercase();

        if upper == "ARRAY" && self.consume(TokenKind::Lt)?.is_some() {
            let element = self.nested(Self::parse_data_type)?;
            self.expect(TokenKind::Gt)?;
            return Ok(DataType::Array(Box::new(element)));
        }
        if upper == "MAP" && self.consume(TokenKind::Lt)?.is_some() {
            let key = self.nested(Self::parse_data_type)?;
            self.expect(TokenKind::Comma)?;
            let value = self.nested(Self::parse_data_type)?;
            self.expect(TokenKind::Gt)?;
            return Ok(DataType::Map(Box::new(key), Box::new(value)));
        }

        let mut params = Vec::new();
        if self.consume(TokenKind::LeftParen)?.is_some() {
            loop {
                let token = self.expect(TokenKind::Integer)?;
                match token.text.parse::<u32>() {
                    Ok(value) => params.push(value),
                    Err(_) => {
                        return ErrorReporter::report_span(
                            token.span,
                            format!("type parameter {} is out of range", token.text),
                        )
                    }
                }
                if self.consume(TokenKind::Comma)?.is_none() {
                    break;
                }
            }
            self.expect(TokenKind::RightParen)?;
        }

        Ok(DataType::Primitive {
            name: upper,
            params,
        })
    }

    // ==================== Constants ====================

    /// NULL | interval | identifier STRING | '-'? number | TRUE | FALSE | STRING+
    pub(crate) fn parse_constant(&mut self) -> ParseResult<Constant> {
        let token = self.current_token()?;
        let start = token.span.start;

        let value = match token.kind {
            TokenKind::Keyword(Keyword::Null) => {
                self.advance()?;
                Literal::Null
            }
            TokenKind::Keyword(Keyword::True) => {
                self.advance()?;
                Literal::Boolean(true)
            }
            TokenKind::Keyword(Keyword::False) => {
                self.advance()?;
                Literal::Boolean(false)
            }
            TokenKind::Keyword(Keyword::Interval) => {
                self.advance()?;
                Literal::Interval(self.parse_interval_fields()?)
            }
            TokenKind::String => {
                let mut value = String::new();
                while let Some(part) = self.consume(TokenKind::String)? {
                    value.push_str(&unescape_string(&part.text));
                }
                Literal::String(value)
            }
            TokenKind::Minus if number_kind(self.peek_kind(1)?).is_some() => {
                self.advance()?; // consume '-'
                let number = self.advance()?;
                match number_kind(number.kind) {
                    Some(kind) => Literal::Number {
                        kind,
                        text: format!("-{}", number.text),
                    },
                    None => return ErrorReporter::unexpected("number", &number),
                }
            }
            TokenKind::Identifier if self.peek_kind(1)? == TokenKind::String => {
                self.advance()?;
                let value = self.expect(TokenKind::String)?;
                Literal::Typed {
                    type_name: token.text.to_ascii_uppercase(),
                    value: unescape_string(&value.text),
                }
            }
            kind => match number_kind(kind) {
                Some(kind) => {
                    self.advance()?;
                    Literal::Number {
                        kind,
                        text: token.text.clone(),
                    }
                }
                None => return ErrorReporter::unexpected("constant", &token),
            },
        };

        Ok(Constant {
            value,
            span: self.span_from(start),
        })
    }

    /// intervalField+ after the INTERVAL keyword
    fn parse_interval_fields(&mut self) -> ParseResult<IntervalLiteral> {
        let mut fields = vec![self.parse_interval_field()?];
        while self.at_interval_field()? {
            fields.push(self.parse_interval_field()?);
        }
        Ok(IntervalLiteral { fields })
    }

    /// A value followed by a unit name, so `INTERVAL 1 DAY + 2` stops before `+`.
    fn at_interval_field(&mut self) -> ParseResult<bool> {
        let value_at = match self.current_kind()? {
            TokenKind::Plus | TokenKind::Minus => 1,
            _ => 0,
        };
        let value_kind = self.peek_kind(value_at)?;
        let is_value = matches!(value_kind, TokenKind::Integer | TokenKind::Decimal)
            || (value_at == 0 && value_kind == TokenKind::String);
        Ok(is_value && self.at_identifier(value_at + 1)?)
    }

    /// ('+' | '-')? (INTEGER | DECIMAL) | STRING, then unit [TO unit]
    fn parse_interval_field(&mut self) -> ParseResult<IntervalField> {
        let mut value = String::new();
        if let Some(sign) = self.consume(TokenKind::Minus)? {
            value.push_str(&sign.text);
        } else {
            self.consume(TokenKind::Plus)?;
        }

        let token = self.current_token()?;
        match token.kind {
            TokenKind::Integer | TokenKind::Decimal => value.push_str(&token.text),
            TokenKind::String if value.is_empty() => value = unescape_string(&token.text),
            _ => return ErrorReporter::unexpected("interval value", &token),
        }
        self.advance()?;

        let unit = self.parse_identifier()?.value.to_ascii_uppercase();
        let to_unit = if self.check_keyword(Keyword::To)? && self.at_identifier(1)? {
            self.advance()?; // consume TO
            Some(self.parse_identifier()?.value.to_ascii_uppercase())
        } else {
            None
        };
        Ok(IntervalField {
            value,
            unit,
            to_unit,
        })
    }
}
