//! Statement-level productions: MERGE, LOAD, EXPORT, queries and opaque statements.

use crate::ast::*;
use crate::error::ParseResult;
use crate::lexer::{unescape_string, Keyword, TokenKind};
use crate::parser::Parser;
use crate::reporter::ErrorReporter;

impl Parser {
    /// Pick the statement production from the first token.
    pub(crate) fn parse_statement_body(&mut self) -> ParseResult<Statement> {
        let token = self.current_token()?;
        match token.kind {
            TokenKind::Keyword(Keyword::Merge) => Ok(Statement::Merge(self.parse_merge()?)),
            TokenKind::Keyword(Keyword::Load) => Ok(Statement::Load(self.parse_load()?)),
            TokenKind::Keyword(Keyword::Export) => Ok(Statement::Export(self.parse_export()?)),
            TokenKind::Keyword(Keyword::With | Keyword::Select | Keyword::Values | Keyword::Table)
            | TokenKind::LeftParen => Ok(Statement::Query(self.parse_query()?)),
            TokenKind::Keyword(_)
            | TokenKind::Identifier
            | TokenKind::JobIdentifier
            | TokenKind::BackQuotedIdentifier => Ok(Statement::Opaque(self.parse_opaque()?)),
            _ => ErrorReporter::unexpected("statement", &token),
        }
    }

    // ==================== MERGE ====================

    /// MERGE INTO target [alias] USING source [alias] ON condition mergeClause+
    fn parse_merge(&mut self) -> ParseResult<MergeStatement> {
        let start = self.start_position()?;
        self.expect_keyword(Keyword::Merge)?;
        self.expect_keyword(Keyword::Into)?;
        let target = self.parse_qualified_name()?;
        let target_alias = self.parse_optional_alias()?;

        self.expect_keyword(Keyword::Using)?;
        let source = if self.check(TokenKind::LeftParen)? {
            self.advance()?; // consume '('
            let query = self.parse_query()?;
            self.expect(TokenKind::RightParen)?;
            MergeSourceNode::Query(Box::new(query))
        } else {
            MergeSourceNode::Table(self.parse_qualified_name()?)
        };
        let source_alias = self.parse_optional_alias()?;

        self.expect_keyword(Keyword::On)?;
        let condition = self.parse_expression()?;

        let mut clauses = Vec::new();
        loop {
            if !self.check_keyword(Keyword::When)? {
                if clauses.is_empty() {
                    let token = self.current_token()?;
                    return ErrorReporter::unexpected("'WHEN'", &token);
                }
                break;
            }
            let saved = self.soft_keywords;
            self.soft_keywords = true;
            let clause = self.parse_merge_clause();
            self.soft_keywords = saved;
            clauses.push(clause?);
        }

        Ok(MergeStatement {
            target,
            target_alias,
            source,
            source_alias,
            condition,
            clauses,
            span: self.span_from(start),
        })
    }

    /// WHEN [NOT] MATCHED [BY SOURCE|TARGET] [AND condition] THEN action
    fn parse_merge_clause(&mut self) -> ParseResult<MergeClauseNode> {
        let start = self.start_position()?;
        self.expect_keyword(Keyword::When)?;

        let kind = if self.consume_keyword(Keyword::Not)? {
            self.expect_soft_keyword("MATCHED")?;
            if self.consume_keyword(Keyword::By)? {
                if self.at_soft_keyword(0, "SOURCE")? {
                    self.advance()?;
                    MergeMatch::NotMatchedBySource
                } else if self.at_soft_keyword(0, "TARGET")? {
                    self.advance()?;
                    MergeMatch::NotMatched
                } else {
                    let token = self.current_token()?;
                    return ErrorReporter::unexpected("'SOURCE' or 'TARGET'", &token);
                }
            } else {
                MergeMatch::NotMatched
            }
        } else {
            self.expect_soft_keyword("MATCHED")?;
            MergeMatch::Matched
        };

        let condition = if self.consume_keyword(Keyword::And)? {
            Some(self.parse_clause_expression()?)
        } else {
            None
        };
        self.expect_keyword(Keyword::Then)?;

        let action = match kind {
            MergeMatch::NotMatched => self.parse_insert_action()?,
            MergeMatch::Matched | MergeMatch::NotMatchedBySource => {
                self.parse_update_or_delete(kind == MergeMatch::Matched)?
            }
        };

        Ok(MergeClauseNode {
            kind,
            condition,
            action,
            span: self.span_from(start),
        })
    }

    /// UPDATE SET (* | assignment, ...) | DELETE
    fn parse_update_or_delete(&mut self, allow_star: bool) -> ParseResult<MergeActionNode> {
        if self.consume_keyword(Keyword::Delete)? {
            return Ok(MergeActionNode::Delete);
        }
        if !self.at_soft_keyword(0, "UPDATE")? {
            let token = self.current_token()?;
            return ErrorReporter::unexpected("'UPDATE' or 'DELETE'", &token);
        }
        self.advance()?; // consume UPDATE
        self.expect_keyword(Keyword::Set)?;

        if allow_star && self.consume(TokenKind::Asterisk)?.is_some() {
            return Ok(MergeActionNode::UpdateAll);
        }
        let mut assignments = vec![self.parse_assignment()?];
        while self.consume(TokenKind::Comma)?.is_some() {
            assignments.push(self.parse_assignment()?);
        }
        Ok(MergeActionNode::Update(assignments))
    }

    /// INSERT (* | [(columns)] VALUES (expression, ...))
    fn parse_insert_action(&mut self) -> ParseResult<MergeActionNode> {
        self.expect_keyword(Keyword::Insert)?;
        if self.consume(TokenKind::Asterisk)?.is_some() {
            return Ok(MergeActionNode::InsertAll);
        }
        let columns = if self.check(TokenKind::LeftParen)? {
            self.parse_identifier_list()?
        } else {
            Vec::new()
        };
        self.expect_keyword(Keyword::Values)?;
        self.expect(TokenKind::LeftParen)?;
        let mut values = vec![self.parse_clause_expression()?];
        while self.consume(TokenKind::Comma)?.is_some() {
            values.push(self.parse_clause_expression()?);
        }
        self.expect(TokenKind::RightParen)?;
        Ok(MergeActionNode::Insert { columns, values })
    }

    fn parse_assignment(&mut self) -> ParseResult<Assignment> {
        let start = self.start_position()?;
        let target = self.parse_qualified_name()?;
        self.expect(TokenKind::Eq)?;
        let value = self.parse_clause_expression()?;
        Ok(Assignment {
            target,
            value,
            span: self.span_from(start),
        })
    }

    /// Expressions inside a merge clause are ordinary expressions: soft keywords are
    /// plain names again.
    fn parse_clause_expression(&mut self) -> ParseResult<Expression> {
        let saved = self.soft_keywords;
        self.soft_keywords = false;
        let result = self.parse_expression();
        self.soft_keywords = saved;
        result
    }

    // ==================== LOAD ====================

    /// LOAD DATA [LOCAL] INPATH 'path' [OVERWRITE] INTO TABLE t [PARTITION (...)] [OPTIONS (...)]
    fn parse_load(&mut self) -> ParseResult<LoadStatement> {
        let start = self.start_position()?;
        self.expect_keyword(Keyword::Load)?;
        self.expect_keyword(Keyword::Data)?;
        let local = self.consume_keyword(Keyword::Local)?;
        self.expect_keyword(Keyword::InPath)?;
        let path = self.parse_string_constant()?;
        let overwrite = self.consume_keyword(Keyword::Overwrite)?;
        self.expect_keyword(Keyword::Into)?;
        self.expect_keyword(Keyword::Table)?;
        let table = self.parse_qualified_name()?;

        let partition = if self.check_keyword(Keyword::Partition)? {
            Some(self.parse_partition_spec()?)
        } else {
            None
        };
        let options = if self.consume_keyword(Keyword::Options)? {
            Some(self.parse_option_list()?)
        } else {
            None
        };

        Ok(LoadStatement {
            path,
            local,
            overwrite,
            table,
            partition,
            options,
            span: self.span_from(start),
        })
    }

    // ==================== EXPORT ====================

    /// EXPORT query TO 'path' [FORMAT name] [OPTIONS (...)]
    fn parse_export(&mut self) -> ParseResult<ExportStatement> {
        let start = self.start_position()?;
        self.expect_keyword(Keyword::Export)?;
        let query = self.parse_query()?;
        self.expect_keyword(Keyword::To)?;
        let path = self.parse_string_constant()?;
        let format = if self.consume_keyword(Keyword::Format)? {
            Some(self.parse_identifier()?)
        } else {
            None
        };
        let options = if self.consume_keyword(Keyword::Options)? {
            Some(self.parse_option_list()?)
        } else {
            None
        };

        Ok(ExportStatement {
            query: Box::new(query),
            path,
            format,
            options,
            span: self.span_from(start),
        })
    }

    // ==================== Shared clauses ====================

    /// PARTITION '(' partitionVal (',' partitionVal)* ')'
    pub(crate) fn parse_partition_spec(&mut self) -> ParseResult<PartitionSpecNode> {
        let start = self.start_position()?;
        self.expect_keyword(Keyword::Partition)?;
        self.expect(TokenKind::LeftParen)?;
        let mut entries = vec![self.parse_partition_val()?];
        while self.consume(TokenKind::Comma)?.is_some() {
            entries.push(self.parse_partition_val()?);
        }
        self.expect(TokenKind::RightParen)?;
        Ok(PartitionSpecNode {
            entries,
            span: self.span_from(start),
        })
    }

    fn parse_partition_val(&mut self) -> ParseResult<PartitionVal> {
        let start = self.start_position()?;
        let column = self.parse_identifier()?;
        let value = if self.consume(TokenKind::Eq)?.is_some() {
            Some(self.parse_constant()?)
        } else {
            None
        };
        Ok(PartitionVal {
            column,
            value,
            span: self.span_from(start),
        })
    }

    /// '(' optionVal (',' optionVal)* ')'
    pub(crate) fn parse_option_list(&mut self) -> ParseResult<OptionListNode> {
        let start = self.start_position()?;
        self.expect(TokenKind::LeftParen)?;
        let mut entries = vec![self.parse_option_val()?];
        while self.consume(TokenKind::Comma)?.is_some() {
            entries.push(self.parse_option_val()?);
        }
        self.expect(TokenKind::RightParen)?;
        Ok(OptionListNode {
            entries,
            span: self.span_from(start),
        })
    }

    /// (identifier ('.' identifier)* | STRING) '='? constant
    fn parse_option_val(&mut self) -> ParseResult<OptionVal> {
        let start = self.start_position()?;
        let key = if self.check(TokenKind::String)? {
            let token = self.advance()?;
            unescape_string(&token.text)
        } else {
            let name = self.parse_qualified_name()?;
            name.parts
                .iter()
                .map(|part| part.value.as_str())
                .collect::<Vec<_>>()
                .join(".")
        };
        let key_span = self.span_from(start);
        self.consume(TokenKind::Eq)?;
        let value = self.parse_constant()?;
        Ok(OptionVal {
            key,
            key_span,
            value,
            span: self.span_from(start),
        })
    }

    /// One or more adjacent string literals
    fn parse_string_constant(&mut self) -> ParseResult<Constant> {
        if !self.check(TokenKind::String)? {
            let token = self.current_token()?;
            return ErrorReporter::unexpected("string literal", &token);
        }
        self.parse_constant()
    }

    // ==================== Opaque statements ====================

    /// Any other statement: the tokens up to `;` or end of input, with balanced
    /// parentheses.
    fn parse_opaque(&mut self) -> ParseResult<OpaqueStatement> {
        let start = self.start_position()?;
        let leading = self.current_token()?.text.to_ascii_uppercase();
        let mut tokens = Vec::new();
        let mut depth = 0usize;

        loop {
            let token = self.current_token()?;
            match token.kind {
                TokenKind::Eof if depth > 0 => return ErrorReporter::unexpected("')'", &token),
                TokenKind::Eof => break,
                TokenKind::Semicolon if depth == 0 => break,
                TokenKind::Unrecognized => {
                    return ErrorReporter::unexpected("a valid token", &token)
                }
                TokenKind::LeftParen => depth += 1,
                TokenKind::RightParen => {
                    if depth == 0 {
                        return ErrorReporter::unexpected("';' or end of input", &token);
                    }
                    depth -= 1;
                }
                _ => {}
            }
            tokens.push(self.advance()?);
        }

        tracing::debug!(leading = %leading, tokens = tokens.len(), "opaque statement");
        Ok(OpaqueStatement {
            leading,
            tokens,
            span: self.span_from(start),
        })
    }
}
