//! Parser Integration Tests
//!
//! Tests for the lexer and parser through the public API, covering:
//! - Lexing idempotence and span monotonicity
//! - Decimal literal disambiguation
//! - Back-quote escaping
//! - Extended statements (MERGE, LOAD, EXPORT)
//! - Ordinary queries and opaque statements
//! - Error locality and rendering
//! - Statement completeness for interactive input

use sqlext::is_statement_complete;
use sqlext_core::ast::{QueryBody, Statement};
use sqlext_core::{parse_script, parse_statement, Lexer, ParseErrorKind, ParseNode, TokenKind};

fn visible(sql: &str) -> Vec<(TokenKind, String)> {
    Lexer::new(sql)
        .tokenize()
        .unwrap()
        .into_iter()
        .filter(|t| !t.kind.is_hidden() && t.kind != TokenKind::Eof)
        .map(|t| (t.kind, t.text))
        .collect()
}

const SCRIPT: &str = "MERGE INTO db.t AS t USING (SELECT * FROM s) src ON t.id = src.id\n\
                      WHEN MATCHED AND src.deleted THEN DELETE\n\
                      WHEN MATCHED THEN UPDATE SET *\n\
                      WHEN NOT MATCHED THEN INSERT *;\n\
                      /* load the day */ LOAD DATA LOCAL INPATH '/d/2024-01-01' OVERWRITE\n\
                      INTO TABLE `raw`.events PARTITION (dt = '2024-01-01') OPTIONS ('sep' = '\\t');\n\
                      -- export\n\
                      EXPORT SELECT a, 1.5BD, 10L, 2.5E3 FROM t TO 's3://out' FORMAT PARQUET;";

// ============================================================================
// Lexing Properties
// ============================================================================

#[test]
fn test_relexing_gives_identical_tokens() {
    let first = Lexer::new(SCRIPT).tokenize().unwrap();
    let second = Lexer::new(SCRIPT).tokenize().unwrap();
    assert_eq!(first, second);

    let mut lexer = Lexer::new(SCRIPT);
    lexer.tokenize().unwrap();
    lexer.reset();
    assert_eq!(lexer.tokenize().unwrap(), first);
}

#[test]
fn test_spans_are_monotonic() {
    let tokens = Lexer::new(SCRIPT).tokenize().unwrap();
    for pair in tokens.windows(2) {
        assert!(
            pair[0].span.end <= pair[1].span.start,
            "overlapping tokens: {:?}",
            pair
        );
    }
    for token in &tokens[..tokens.len() - 1] {
        assert!(!token.span.is_empty(), "empty token: {:?}", token);
    }
}

#[test]
fn test_crlf_counts_as_one_line() {
    let tokens = visible("a\r\nb");
    assert_eq!(tokens.len(), 2);
    let all = Lexer::new("a\r\nb").tokenize().unwrap();
    assert_eq!(all[2].span.start.line, 2);
    assert_eq!(all[2].span.start.column, 0);
}

// ============================================================================
// Decimal Disambiguation
// ============================================================================

#[test]
fn test_decimal_followed_by_digit_is_one_literal() {
    assert_eq!(visible("2.34"), vec![(TokenKind::Decimal, "2.34".to_string())]);
}

#[test]
fn test_decimal_followed_by_letter_is_not_complete() {
    let tokens = visible("2.3W");
    assert_ne!(tokens[0], (TokenKind::Decimal, "2.3".to_string()));
    assert_eq!(tokens[0], (TokenKind::Integer, "2".to_string()));
}

#[test]
fn test_typed_literal_before_whitespace() {
    assert_eq!(
        visible("12.0D 34"),
        vec![
            (TokenKind::Double, "12.0D".to_string()),
            (TokenKind::Integer, "34".to_string()),
        ]
    );
}

#[test]
fn test_numbers_in_a_projection() {
    let tokens = visible("SELECT 1.5BD, 10L, 2.5E3, 7Y");
    let kinds: Vec<_> = tokens.iter().map(|t| t.0).collect();
    assert_eq!(
        kinds,
        vec![
            TokenKind::Keyword(sqlext_core::Keyword::Select),
            TokenKind::BigDecimal,
            TokenKind::Comma,
            TokenKind::BigInt,
            TokenKind::Comma,
            TokenKind::Decimal,
            TokenKind::Comma,
            TokenKind::TinyInt,
        ]
    );
}

// ============================================================================
// Quoting
// ============================================================================

#[test]
fn test_back_quote_escape() {
    assert_eq!(
        visible("`a``b`"),
        vec![(TokenKind::BackQuotedIdentifier, "a`b".to_string())]
    );
}

#[test]
fn test_quoted_table_name() {
    let node = parse_statement("LOAD DATA INPATH 'p' INTO TABLE `my``db`.`t 1`").unwrap();
    let ParseNode::Statement(Statement::Load(load)) = node else {
        panic!("expected LOAD");
    };
    assert_eq!(load.table.parts[0].value, "my`db");
    assert_eq!(load.table.parts[1].value, "t 1");
    assert!(load.table.parts.iter().all(|p| p.quoted));
}

// ============================================================================
// Statements
// ============================================================================

#[test]
fn test_script_with_comments() {
    let nodes = parse_script(SCRIPT);
    assert!(nodes.is_ok(), "Failed to parse script: {:?}", nodes.err());
    let labels: Vec<_> = nodes
        .unwrap()
        .iter()
        .map(|n| match n {
            ParseNode::Statement(s) => s.label(),
            ParseNode::Expression(_) => "expression",
        })
        .collect();
    assert_eq!(labels, vec!["merge", "load", "export"]);
}

#[test]
fn test_queries_parse() {
    let queries = [
        "SELECT 1",
        "SELECT a, b FROM t WHERE a = 1 AND NOT b",
        "SELECT count(*) FROM t GROUP BY a HAVING count(*) > 1 ORDER BY 1 DESC LIMIT 5",
        "SELECT * FROM a LEFT JOIN b ON a.k = b.k WHERE b.k IS NULL",
        "WITH x AS (SELECT 1 AS one) SELECT one FROM x",
        "SELECT CASE WHEN a > 0 THEN 'pos' ELSE 'neg' END FROM t",
        "SELECT CAST(a AS BIGINT), b DIV 2, c % 3 FROM t",
        "SELECT * FROM t WHERE d BETWEEN DATE '2024-01-01' AND CURRENT_DATE",
        "SELECT a FROM t UNION ALL SELECT b FROM u",
        "VALUES (1, 2), (3, 4)",
        "TABLE db.t",
        "SELECT x FROM t WHERE x RLIKE '^a' AND y NOT IN (1, 2)",
    ];
    for sql in queries {
        let result = parse_statement(sql);
        assert!(result.is_ok(), "Failed to parse {}: {:?}", sql, result.err());
        assert!(
            matches!(result.unwrap(), ParseNode::Statement(Statement::Query(_))),
            "{} is not a query",
            sql
        );
    }
}

#[test]
fn test_opaque_statements() {
    for sql in [
        "CREATE TABLE t (a INT, b STRING) USING parquet",
        "DROP TABLE IF EXISTS t",
        "SHOW TABLES",
        "SET spark.sql.shuffle.partitions = 10",
        "INSERT INTO t VALUES (1, 'x')",
    ] {
        let result = parse_statement(sql);
        assert!(result.is_ok(), "Failed to parse {}: {:?}", sql, result.err());
        assert!(matches!(
            result.unwrap(),
            ParseNode::Statement(Statement::Opaque(_))
        ));
    }
}

#[test]
fn test_export_of_set_operation() {
    let node = parse_statement("EXPORT SELECT 1 UNION SELECT 2 TO '/o'").unwrap();
    let ParseNode::Statement(Statement::Export(export)) = node else {
        panic!("expected EXPORT");
    };
    assert!(matches!(export.query.body, QueryBody::SetOperation { .. }));
}

// ============================================================================
// Errors
// ============================================================================

#[test]
fn test_missing_close_paren_is_reported_at_its_offset() {
    let sql = "SELECT count(a FROM t";
    let err = parse_statement(sql).unwrap_err();
    assert_eq!(err.kind, ParseErrorKind::Syntax);
    assert_eq!(err.span.start.column, 15);
    assert_eq!(err.span.end.column, 15);
    assert_eq!(err.line(), 1);
}

#[test]
fn test_missing_close_paren_in_load() {
    let sql = "LOAD DATA INPATH 'p' INTO TABLE t PARTITION (dt = '1'";
    let err = parse_statement(sql).unwrap_err();
    assert_eq!(err.message, "expected ')', found end of input");
    assert_eq!(err.span.start.column, sql.len() as u32);
}

#[test]
fn test_error_rendering() {
    let sql = "SELECT a\nFROM t WHERE";
    let err = parse_statement(sql).unwrap_err();
    let rendered = err.render(sql);
    assert!(rendered.starts_with("expected expression, found end of input(line 2, pos 12)"));
    assert!(rendered.contains("== SQL ==\nSELECT a\nFROM t WHERE\n------------^^^\n"));
}

#[test]
fn test_unterminated_literals_are_lexical() {
    for (sql, column) in [("SELECT 'abc", 7), ("SELECT 1 /* never closed", 9)] {
        let err = parse_statement(sql).unwrap_err();
        assert_eq!(err.kind, ParseErrorKind::Lexical, "{}", sql);
        assert_eq!(err.span.start.column, column, "{}", sql);
    }
}

#[test]
fn test_extended_keyword_commits() {
    let err = parse_statement("LOAD TABLE t").unwrap_err();
    assert_eq!(err.message, "expected 'DATA', found 'TABLE'");
}

// ============================================================================
// Statement Completeness
// ============================================================================

#[test]
fn test_statement_completeness() {
    assert!(is_statement_complete("SELECT 1;"));
    assert!(is_statement_complete("SELECT 1;\n"));
    assert!(is_statement_complete("SELECT 1; -- done\n"));
    assert!(is_statement_complete("SELECT 1; SELECT 2;"));

    // A later statement is still open
    assert!(!is_statement_complete("SELECT 1; SELECT"));
    assert!(!is_statement_complete("SELECT 1"));
    assert!(!is_statement_complete(""));

    // Semicolons inside strings and comments do not count
    assert!(!is_statement_complete("SELECT 'a;b'"));
    assert!(!is_statement_complete("SELECT 1 -- ;\n"));
    assert!(!is_statement_complete("SELECT 'a;"));
    assert!(!is_statement_complete("SELECT 1; /* open"));
}
