//! Query sub-grammar: WITH, set operations, SELECT, relations and joins.

use crate::ast::*;
use crate::error::ParseResult;
use crate::lexer::{Keyword, TokenKind};
use crate::parser::Parser;
use crate::reporter::ErrorReporter;

impl Parser {
    /// Whether the token `offset` ahead starts a query.
    pub(crate) fn at_query_start(&mut self, offset: usize) -> ParseResult<bool> {
        Ok(matches!(
            self.peek_kind(offset)?,
            TokenKind::Keyword(Keyword::Select | Keyword::With | Keyword::Values | Keyword::Table)
        ))
    }

    /// [WITH ...] queryBody [ORDER BY ...] [LIMIT expression]
    pub(crate) fn parse_query(&mut self) -> ParseResult<Query> {
        self.nested(Self::parse_query_inner)
    }

    fn parse_query_inner(&mut self) -> ParseResult<Query> {
        let start = self.start_position()?;

        let mut with = Vec::new();
        if self.consume_keyword(Keyword::With)? {
            with.push(self.parse_named_query()?);
            while self.consume(TokenKind::Comma)?.is_some() {
                with.push(self.parse_named_query()?);
            }
        }

        let body = self.parse_query_body()?;

        let mut order_by = Vec::new();
        if self.consume_keyword(Keyword::Order)? {
            self.expect_keyword(Keyword::By)?;
            order_by.push(self.parse_sort_item()?);
            while self.consume(TokenKind::Comma)?.is_some() {
                order_by.push(self.parse_sort_item()?);
            }
        }

        let limit = if self.consume_keyword(Keyword::Limit)? {
            Some(self.parse_expression()?)
        } else {
            None
        };

        Ok(Query {
            with,
            body,
            order_by,
            limit,
            span: self.span_from(start),
        })
    }

    /// name [(columns)] AS (query)
    fn parse_named_query(&mut self) -> ParseResult<NamedQuery> {
        let start = self.start_position()?;
        let name = self.parse_identifier()?;
        let columns = if self.check(TokenKind::LeftParen)? {
            self.parse_identifier_list()?
        } else {
            Vec::new()
        };
        self.consume_keyword(Keyword::As)?;
        self.expect(TokenKind::LeftParen)?;
        let query = self.parse_query()?;
        self.expect(TokenKind::RightParen)?;
        Ok(NamedQuery {
            name,
            columns,
            query: Box::new(query),
            span: self.span_from(start),
        })
    }

    /// UNION, EXCEPT and MINUS are left-associative and bind looser than INTERSECT.
    fn parse_query_body(&mut self) -> ParseResult<QueryBody> {
        let start = self.start_position()?;
        let mut left = self.parse_intersect_term()?;
        loop {
            let op = match self.current_kind()? {
                TokenKind::Keyword(Keyword::Union) => SetOperator::Union,
                TokenKind::Keyword(Keyword::Except | Keyword::SetMinus) => SetOperator::Except,
                _ => break,
            };
            self.advance()?;
            let quantifier = self.parse_set_quantifier()?;
            let right = self.parse_intersect_term()?;
            left = QueryBody::SetOperation {
                op,
                quantifier,
                left: Box::new(left),
                right: Box::new(right),
                span: self.span_from(start),
            };
        }
        Ok(left)
    }

    fn parse_intersect_term(&mut self) -> ParseResult<QueryBody> {
        let start = self.start_position()?;
        let mut left = self.parse_query_primary()?;
        while self.consume_keyword(Keyword::Intersect)? {
            let quantifier = self.parse_set_quantifier()?;
            let right = self.parse_query_primary()?;
            left = QueryBody::SetOperation {
                op: SetOperator::Intersect,
                quantifier,
                left: Box::new(left),
                right: Box::new(right),
                span: self.span_from(start),
            };
        }
        Ok(left)
    }

    fn parse_set_quantifier(&mut self) -> ParseResult<Option<SetQuantifier>> {
        if self.consume_keyword(Keyword::Distinct)? {
            Ok(Some(SetQuantifier::Distinct))
        } else if self.consume_keyword(Keyword::All)? {
            Ok(Some(SetQuantifier::All))
        } else {
            Ok(None)
        }
    }

    fn parse_query_primary(&mut self) -> ParseResult<QueryBody> {
        let token = self.current_token()?;
        let start = token.span.start;
        match token.kind {
            TokenKind::Keyword(Keyword::Select) => {
                Ok(QueryBody::Select(Box::new(self.parse_select()?)))
            }
            TokenKind::Keyword(Keyword::Table) => {
                self.advance()?; // consume TABLE
                let name = self.parse_qualified_name()?;
                Ok(QueryBody::Table {
                    name,
                    span: self.span_from(start),
                })
            }
            TokenKind::Keyword(Keyword::Values) => {
                self.advance()?; // consume VALUES
                let mut rows = vec![self.parse_expression()?];
                while self.consume(TokenKind::Comma)?.is_some() {
                    rows.push(self.parse_expression()?);
                }
                Ok(QueryBody::Values {
                    rows,
                    span: self.span_from(start),
                })
            }
            TokenKind::LeftParen => {
                self.advance()?; // consume '('
                let query = self.parse_query()?;
                self.expect(TokenKind::RightParen)?;
                Ok(QueryBody::Nested(Box::new(Query {
                    span: self.span_from(start),
                    ..query
                })))
            }
            _ => ErrorReporter::unexpected("query", &token),
        }
    }

    // ==================== SELECT ====================

    fn parse_select(&mut self) -> ParseResult<Select> {
        let start = self.start_position()?;
        self.expect_keyword(Keyword::Select)?;
        let quantifier = self.parse_set_quantifier()?;

        let mut projection = vec![self.parse_named_expression()?];
        while self.consume(TokenKind::Comma)?.is_some() {
            projection.push(self.parse_named_expression()?);
        }

        let mut from = Vec::new();
        if self.consume_keyword(Keyword::From)? {
            from.push(self.parse_relation()?);
            while self.consume(TokenKind::Comma)?.is_some() {
                from.push(self.parse_relation()?);
            }
        }

        let selection = if self.consume_keyword(Keyword::Where)? {
            Some(self.parse_expression()?)
        } else {
            None
        };

        let group_by = if self.check_keyword(Keyword::Group)? {
            Some(self.parse_group_by()?)
        } else {
            None
        };

        let having = if self.consume_keyword(Keyword::Having)? {
            Some(self.parse_expression()?)
        } else {
            None
        };

        Ok(Select {
            quantifier,
            projection,
            from,
            selection,
            group_by,
            having,
            span: self.span_from(start),
        })
    }

    /// expression [AS] [alias]
    fn parse_named_expression(&mut self) -> ParseResult<NamedExpression> {
        let start = self.start_position()?;
        let expr = self.parse_expression()?;
        let alias = self.parse_optional_alias()?;
        Ok(NamedExpression {
            expr,
            alias,
            span: self.span_from(start),
        })
    }

    /// GROUP BY expression, ... [WITH ROLLUP | WITH CUBE | GROUPING SETS (...)]
    fn parse_group_by(&mut self) -> ParseResult<GroupBy> {
        let start = self.start_position()?;
        self.expect_keyword(Keyword::Group)?;
        self.expect_keyword(Keyword::By)?;

        let mut expressions = vec![self.parse_expression()?];
        while self.consume(TokenKind::Comma)?.is_some() {
            expressions.push(self.parse_expression()?);
        }

        let grouping = if self.consume_keyword(Keyword::With)? {
            if self.consume_keyword(Keyword::Rollup)? {
                Grouping::Rollup
            } else if self.consume_keyword(Keyword::Cube)? {
                Grouping::Cube
            } else {
                let token = self.current_token()?;
                return ErrorReporter::unexpected("'ROLLUP' or 'CUBE'", &token);
            }
        } else if self.consume_keyword(Keyword::Grouping)? {
            self.expect_keyword(Keyword::Sets)?;
            self.expect(TokenKind::LeftParen)?;
            let mut sets = vec![self.parse_grouping_set()?];
            while self.consume(TokenKind::Comma)?.is_some() {
                sets.push(self.parse_grouping_set()?);
            }
            self.expect(TokenKind::RightParen)?;
            Grouping::Sets(sets)
        } else {
            Grouping::Plain
        };

        Ok(GroupBy {
            expressions,
            grouping,
            span: self.span_from(start),
        })
    }

    /// '(' [expression, ...] ')' | expression
    fn parse_grouping_set(&mut self) -> ParseResult<Vec<Expression>> {
        if self.check(TokenKind::LeftParen)? && self.peek_kind(1)? == TokenKind::RightParen {
            self.advance()?;
            self.advance()?;
            return Ok(Vec::new());
        }
        let expr = self.parse_expression()?;
        Ok(match expr.kind {
            ExpressionKind::Row(items) => items,
            ExpressionKind::Nested(inner) => vec![*inner],
            _ => vec![expr],
        })
    }

    fn parse_sort_item(&mut self) -> ParseResult<SortItem> {
        let start = self.start_position()?;
        let expr = self.parse_expression()?;
        let ascending = if self.consume_keyword(Keyword::Asc)? {
            Some(true)
        } else if self.consume_keyword(Keyword::Desc)? {
            Some(false)
        } else {
            None
        };
        let nulls_first = if self.consume_keyword(Keyword::Nulls)? {
            if self.consume_keyword(Keyword::First)? {
                Some(true)
            } else if self.consume_keyword(Keyword::Last)? {
                Some(false)
            } else {
                let token = self.current_token()?;
                return ErrorReporter::unexpected("'FIRST' or 'LAST'", &token);
            }
        } else {
            None
        };
        Ok(SortItem {
            expr,
            ascending,
            nulls_first,
            span: self.span_from(start),
        })
    }

    // ==================== Relations ====================

    fn parse_relation(&mut self) -> ParseResult<Relation> {
        let start = self.start_position()?;
        let primary = self.nested(Self::parse_relation_primary)?;
        let mut joins = Vec::new();
        while let Some(join) = self.parse_join()? {
            joins.push(join);
        }
        Ok(Relation {
            primary,
            joins,
            span: self.span_from(start),
        })
    }

    fn parse_relation_primary(&mut self) -> ParseResult<RelationPrimary> {
        let start = self.start_position()?;
        if self.check(TokenKind::LeftParen)? {
            if self.at_query_start(1)? {
                self.advance()?; // consume '('
                let query = self.parse_query()?;
                self.expect(TokenKind::RightParen)?;
                let alias = self.parse_optional_alias()?;
                return Ok(RelationPrimary::Subquery {
                    query: Box::new(query),
                    alias,
                    span: self.span_from(start),
                });
            }
            self.advance()?; // consume '('
            let relation = self.parse_relation()?;
            self.expect(TokenKind::RightParen)?;
            return Ok(RelationPrimary::Nested(Box::new(relation)));
        }

        let name = self.parse_qualified_name()?;
        let alias = self.parse_optional_alias()?;
        Ok(RelationPrimary::Table {
            name,
            alias,
            span: self.span_from(start),
        })
    }

    /// One join, or `None` when the next token does not start a join.
    fn parse_join(&mut self) -> ParseResult<Option<Join>> {
        let start = self.start_position()?;
        let natural = self.consume_keyword(Keyword::Natural)?;

        let join_type = match self.current_kind()? {
            TokenKind::Keyword(Keyword::Join) => JoinType::Inner,
            TokenKind::Keyword(Keyword::Inner) => {
                self.advance()?;
                JoinType::Inner
            }
            TokenKind::Keyword(Keyword::Cross) => {
                self.advance()?;
                JoinType::Cross
            }
            TokenKind::Keyword(Keyword::Left) => {
                self.advance()?;
                if self.consume_keyword(Keyword::Semi)? {
                    JoinType::LeftSemi
                } else if self.consume_keyword(Keyword::Anti)? {
                    JoinType::LeftAnti
                } else {
                    self.consume_keyword(Keyword::Outer)?;
                    JoinType::LeftOuter
                }
            }
            TokenKind::Keyword(Keyword::Right) => {
                self.advance()?;
                self.consume_keyword(Keyword::Outer)?;
                JoinType::RightOuter
            }
            TokenKind::Keyword(Keyword::Full) => {
                self.advance()?;
                self.consume_keyword(Keyword::Outer)?;
                JoinType::FullOuter
            }
            TokenKind::Keyword(Keyword::Semi) => {
                self.advance()?;
                JoinType::LeftSemi
            }
            TokenKind::Keyword(Keyword::Anti) => {
                self.advance()?;
                JoinType::LeftAnti
            }
            _ if natural => {
                let token = self.current_token()?;
                return ErrorReporter::unexpected("'JOIN'", &token);
            }
            _ => return Ok(None),
        };
        self.expect_keyword(Keyword::Join)?;

        let relation = self.parse_relation_primary()?;
        let criteria = if natural {
            None
        } else if self.consume_keyword(Keyword::On)? {
            Some(JoinCriteria::On(self.parse_expression()?))
        } else if self.consume_keyword(Keyword::Using)? {
            Some(JoinCriteria::Using(self.parse_identifier_list()?))
        } else {
            None
        };

        Ok(Some(Join {
            join_type,
            natural,
            relation,
            criteria,
            span: self.span_from(start),
        }))
    }
}
