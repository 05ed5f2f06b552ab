//! Statement dispatcher: maps a parse tree onto exactly one [`Command`].

use crate::ast::*;
use crate::command::*;
use crate::error::ParseResult;
use crate::reporter::ErrorReporter;
use crate::span::Span;
use std::collections::HashSet;

/// Map the top-level node to its command.
///
/// MERGE, LOAD and EXPORT statements get their own variants; queries and every other
/// statement become [`Command::Passthrough`]. A bare expression has no mapping and is
/// reported as a classification error.
pub fn dispatch(node: ParseNode) -> ParseResult<Command> {
    let command = match node {
        ParseNode::Statement(Statement::Merge(merge)) => Command::Merge(dispatch_merge(merge)?),
        ParseNode::Statement(Statement::Load(load)) => Command::Load(dispatch_load(load)?),
        ParseNode::Statement(Statement::Export(export)) => {
            Command::Export(dispatch_export(export)?)
        }
        ParseNode::Statement(stmt @ (Statement::Query(_) | Statement::Opaque(_))) => {
            Command::Passthrough(stmt)
        }
        ParseNode::Expression(expr) => {
            return ErrorReporter::classification(
                expr.span,
                "no command mapping for a bare expression",
            )
        }
    };
    tracing::debug!(command = command.name(), "dispatched statement");
    Ok(command)
}

fn dispatch_merge(merge: MergeStatement) -> ParseResult<MergeCommand> {
    check_merge_clause_order(&merge.clauses)?;

    let mut clauses = Vec::with_capacity(merge.clauses.len());
    for clause in merge.clauses {
        let action = match clause.action {
            MergeActionNode::UpdateAll => MergeAction::UpdateAll,
            MergeActionNode::Delete => MergeAction::Delete,
            MergeActionNode::InsertAll => MergeAction::InsertAll,
            MergeActionNode::Update(assignments) => MergeAction::Update(
                assignments
                    .into_iter()
                    .map(|a| ColumnAssignment {
                        column: a.target.parts.into_iter().map(|p| p.value).collect(),
                        value: a.value,
                    })
                    .collect(),
            ),
            MergeActionNode::Insert { columns, values } => {
                if !columns.is_empty() && columns.len() != values.len() {
                    return ErrorReporter::report_span(
                        clause.span,
                        format!(
                            "INSERT names {} columns but supplies {} values",
                            columns.len(),
                            values.len()
                        ),
                    );
                }
                MergeAction::Insert {
                    columns: columns.into_iter().map(|c| c.value).collect(),
                    values,
                }
            }
        };
        clauses.push(MergeClause {
            kind: clause.kind,
            condition: clause.condition,
            action,
        });
    }

    let source = match merge.source {
        MergeSourceNode::Table(name) => MergeSource::Table(TableIdentifier::from(&name)),
        MergeSourceNode::Query(query) => MergeSource::Query(query),
    };

    Ok(MergeCommand {
        target: TableIdentifier::from(&merge.target),
        target_alias: merge.target_alias.map(|a| a.value),
        source,
        source_alias: merge.source_alias.map(|a| a.value),
        condition: merge.condition,
        clauses,
    })
}

/// Within each kind of WHEN clause only the last one may omit its condition.
fn check_merge_clause_order(clauses: &[MergeClauseNode]) -> ParseResult<()> {
    for (i, clause) in clauses.iter().enumerate() {
        if clause.condition.is_some() {
            continue;
        }
        let shadowed = clauses[i + 1..].iter().any(|later| later.kind == clause.kind);
        if shadowed {
            let label = match clause.kind {
                MergeMatch::Matched => "MATCHED",
                MergeMatch::NotMatched => "NOT MATCHED",
                MergeMatch::NotMatchedBySource => "NOT MATCHED BY SOURCE",
            };
            return ErrorReporter::report_span(
                clause.span,
                format!("only the last WHEN {} clause can omit the condition", label),
            );
        }
    }
    Ok(())
}

fn dispatch_load(load: LoadStatement) -> ParseResult<LoadCommand> {
    Ok(LoadCommand {
        path: path_value(&load.path)?,
        local: load.local,
        overwrite: load.overwrite,
        table: TableIdentifier::from(&load.table),
        partition: load.partition.as_ref().map(partition_spec).transpose()?,
        options: option_entries(load.options.as_ref())?,
    })
}

fn dispatch_export(export: ExportStatement) -> ParseResult<ExportCommand> {
    let format = export
        .format
        .map(|f| f.value.to_ascii_lowercase())
        .unwrap_or_else(|| DEFAULT_EXPORT_FORMAT.to_string());
    Ok(ExportCommand {
        path: path_value(&export.path)?,
        format,
        options: option_entries(export.options.as_ref())?,
        query: *export.query,
    })
}

fn path_value(constant: &Constant) -> ParseResult<String> {
    match &constant.value {
        Literal::String(path) if !path.is_empty() => Ok(path.clone()),
        Literal::String(_) => ErrorReporter::report_span(constant.span, "path must not be empty"),
        _ => ErrorReporter::report_span(constant.span, "path must be a string literal"),
    }
}

fn partition_spec(node: &PartitionSpecNode) -> ParseResult<PartitionSpec> {
    let mut seen = HashSet::new();
    let mut entries = Vec::with_capacity(node.entries.len());
    for entry in &node.entries {
        if !seen.insert(entry.column.value.to_ascii_lowercase()) {
            return ErrorReporter::report_span(
                entry.span,
                format!("duplicate partition column '{}'", entry.column.value),
            );
        }
        entries.push(PartitionEntry {
            column: entry.column.value.clone(),
            value: entry.value.as_ref().map(literal_value).transpose()?,
        });
    }
    Ok(PartitionSpec { entries })
}

fn option_entries(node: Option<&OptionListNode>) -> ParseResult<Vec<OptionEntry>> {
    let Some(node) = node else {
        return Ok(Vec::new());
    };
    let mut seen = HashSet::new();
    let mut entries = Vec::with_capacity(node.entries.len());
    for entry in &node.entries {
        if !seen.insert(entry.key.as_str()) {
            return ErrorReporter::report_span(
                entry.key_span,
                format!("duplicate option key '{}'", entry.key),
            );
        }
        entries.push(OptionEntry {
            key: entry.key.clone(),
            value: literal_value(&entry.value)?,
        });
    }
    Ok(entries)
}

// ==================== Literals ====================

/// Convert a constant into a typed value, checking numeric ranges.
pub fn literal_value(constant: &Constant) -> ParseResult<LiteralValue> {
    Ok(match &constant.value {
        Literal::Null => LiteralValue::Null,
        Literal::Boolean(b) => LiteralValue::Boolean(*b),
        Literal::String(s) => LiteralValue::String(s.clone()),
        Literal::Typed { type_name, value } => LiteralValue::Typed {
            type_name: type_name.clone(),
            value: value.clone(),
        },
        Literal::Interval(interval) => LiteralValue::Interval(interval.clone()),
        Literal::Number { kind, text } => number_value(*kind, text, constant.span)?,
    })
}

fn out_of_range<T>(text: &str, type_name: &str, min: &str, max: &str, span: Span) -> ParseResult<T> {
    ErrorReporter::report_span(
        span,
        format!(
            "numeric literal {} does not fit in range [{}, {}] for type {}",
            text, min, max, type_name
        ),
    )
}

/// Drop a type suffix of `len` characters.
fn strip_suffix(text: &str, len: usize) -> &str {
    &text[..text.len().saturating_sub(len)]
}

fn number_value(kind: NumberKind, text: &str, span: Span) -> ParseResult<LiteralValue> {
    match kind {
        NumberKind::Integer => {
            if let Ok(n) = text.parse::<i32>() {
                Ok(LiteralValue::Int(n))
            } else if let Ok(n) = text.parse::<i64>() {
                Ok(LiteralValue::Long(n))
            } else {
                Ok(LiteralValue::Decimal(text.to_string()))
            }
        }
        NumberKind::BigInt => match strip_suffix(text, 1).parse::<i64>() {
            Ok(n) => Ok(LiteralValue::Long(n)),
            Err(_) => out_of_range(
                text,
                "bigint",
                &i64::MIN.to_string(),
                &i64::MAX.to_string(),
                span,
            ),
        },
        NumberKind::SmallInt => match strip_suffix(text, 1).parse::<i16>() {
            Ok(n) => Ok(LiteralValue::Short(n)),
            Err(_) => out_of_range(
                text,
                "smallint",
                &i16::MIN.to_string(),
                &i16::MAX.to_string(),
                span,
            ),
        },
        NumberKind::TinyInt => match strip_suffix(text, 1).parse::<i8>() {
            Ok(n) => Ok(LiteralValue::Byte(n)),
            Err(_) => out_of_range(
                text,
                "tinyint",
                &i8::MIN.to_string(),
                &i8::MAX.to_string(),
                span,
            ),
        },
        NumberKind::ByteLength => byte_length(text, span),
        NumberKind::Decimal => Ok(LiteralValue::Decimal(text.to_string())),
        NumberKind::BigDecimal => Ok(LiteralValue::Decimal(strip_suffix(text, 2).to_string())),
        NumberKind::Double => match strip_suffix(text, 1).parse::<f64>() {
            Ok(n) if n.is_finite() => Ok(LiteralValue::Double(n)),
            _ => out_of_range(
                text,
                "double",
                &format!("{:e}", f64::MIN),
                &format!("{:e}", f64::MAX),
                span,
            ),
        },
    }
}

/// `10B`, `4K`, `64M`, `2G` with binary multiples.
fn byte_length(text: &str, span: Span) -> ParseResult<LiteralValue> {
    if text.starts_with('-') {
        return ErrorReporter::report_span(span, format!("byte length {} must not be negative", text));
    }
    let unit = text.chars().last().map(|c| c.to_ascii_uppercase());
    let multiplier: u64 = match unit {
        Some('B') => 1,
        Some('K') => 1 << 10,
        Some('M') => 1 << 20,
        Some('G') => 1 << 30,
        _ => return ErrorReporter::report_span(span, format!("invalid byte length {}", text)),
    };
    strip_suffix(text, 1)
        .parse::<u64>()
        .ok()
        .and_then(|n| n.checked_mul(multiplier))
        .map(LiteralValue::ByteLength)
        .map_or_else(
            || out_of_range(text, "byte length", "0", &u64::MAX.to_string(), span),
            Ok,
        )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ParseErrorKind;
    use crate::span::SourcePosition;

    fn number(kind: NumberKind, text: &str) -> ParseResult<LiteralValue> {
        literal_value(&Constant {
            value: Literal::Number {
                kind,
                text: text.to_string(),
            },
            span: Span::point(SourcePosition::START),
        })
    }

    #[test]
    fn test_plain_integers_widen() {
        assert_eq!(number(NumberKind::Integer, "42").unwrap(), LiteralValue::Int(42));
        assert_eq!(
            number(NumberKind::Integer, "3000000000").unwrap(),
            LiteralValue::Long(3_000_000_000)
        );
        assert_eq!(
            number(NumberKind::Integer, "-99999999999999999999").unwrap(),
            LiteralValue::Decimal("-99999999999999999999".into())
        );
    }

    #[test]
    fn test_suffixed_integers_must_fit() {
        assert_eq!(number(NumberKind::TinyInt, "127Y").unwrap(), LiteralValue::Byte(127));
        assert_eq!(number(NumberKind::SmallInt, "-5s").unwrap(), LiteralValue::Short(-5));
        assert_eq!(number(NumberKind::BigInt, "10L").unwrap(), LiteralValue::Long(10));

        let err = number(NumberKind::TinyInt, "128Y").unwrap_err();
        assert_eq!(err.kind, ParseErrorKind::Syntax);
        assert_eq!(
            err.message,
            "numeric literal 128Y does not fit in range [-128, 127] for type tinyint"
        );
    }

    #[test]
    fn test_fractional_values() {
        assert_eq!(number(NumberKind::Double, "1.5D").unwrap(), LiteralValue::Double(1.5));
        assert_eq!(
            number(NumberKind::BigDecimal, "1.50BD").unwrap(),
            LiteralValue::Decimal("1.50".into())
        );
        assert_eq!(
            number(NumberKind::Decimal, "2.34").unwrap(),
            LiteralValue::Decimal("2.34".into())
        );
        assert!(number(NumberKind::Double, "1e400D").is_err());
    }

    #[test]
    fn test_byte_lengths() {
        assert_eq!(
            number(NumberKind::ByteLength, "64M").unwrap(),
            LiteralValue::ByteLength(64 * 1024 * 1024)
        );
        assert_eq!(number(NumberKind::ByteLength, "10b").unwrap(), LiteralValue::ByteLength(10));
        assert!(number(NumberKind::ByteLength, "-1K").is_err());
        assert!(number(NumberKind::ByteLength, "99999999999999999999G").is_err());
    }

    #[test]
    fn test_bare_expression_is_a_classification_gap() {
        let node = crate::parser::parse_expression("a + 1").unwrap();
        let err = dispatch(node).unwrap_err();
        assert_eq!(err.kind, ParseErrorKind::Classification);
    }
}
