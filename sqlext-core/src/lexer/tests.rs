use super::*;
use crate::error::ParseErrorKind;

fn lex(input: &str) -> Vec<Token> {
    Lexer::new(input).tokenize().unwrap()
}

/// Visible tokens as (kind, text), without the trailing `Eof`.
fn visible(input: &str) -> Vec<(TokenKind, String)> {
    lex(input)
        .into_iter()
        .filter(|t| !t.kind.is_hidden() && t.kind != TokenKind::Eof)
        .map(|t| (t.kind, t.text))
        .collect()
}

fn kinds(input: &str) -> Vec<TokenKind> {
    visible(input).into_iter().map(|(k, _)| k).collect()
}

fn single(input: &str) -> (TokenKind, String) {
    let tokens = visible(input);
    assert_eq!(tokens.len(), 1, "expected one token for {:?}, got {:?}", input, tokens);
    tokens.into_iter().next().unwrap()
}

// ==================== Keywords & identifiers ====================

#[test]
fn test_keywords_are_case_insensitive() {
    assert_eq!(
        kinds("select From wHeRe"),
        vec![
            TokenKind::Keyword(Keyword::Select),
            TokenKind::Keyword(Keyword::From),
            TokenKind::Keyword(Keyword::Where),
        ]
    );
}

#[test]
fn test_keyword_token_keeps_source_text() {
    let (kind, text) = single("merge");
    assert_eq!(kind, TokenKind::Keyword(Keyword::Merge));
    assert_eq!(text, "merge");
}

#[test]
fn test_alternate_keyword_spellings() {
    assert_eq!(single("REGEXP").0, TokenKind::Keyword(Keyword::RLike));
    assert_eq!(single("temp").0, TokenKind::Keyword(Keyword::Temporary));
    assert_eq!(single("SCHEMA").0, TokenKind::Keyword(Keyword::Database));
    assert_eq!(single("!").0, TokenKind::Keyword(Keyword::Not));
}

#[test]
fn test_identifier_containing_keyword_prefix() {
    assert_eq!(single("selected"), (TokenKind::Identifier, "selected".to_string()));
    assert_eq!(single("_tmp1"), (TokenKind::Identifier, "_tmp1".to_string()));
}

#[test]
fn test_soft_keywords_lex_as_identifiers() {
    for word in ["MATCHED", "update", "Source", "TARGET"] {
        assert_eq!(single(word).0, TokenKind::Identifier, "{}", word);
    }
}

#[test]
fn test_job_identifier() {
    assert_eq!(
        single("nightly-load_01"),
        (TokenKind::JobIdentifier, "nightly-load_01".to_string())
    );
    // Spaces keep the minus an operator.
    assert_eq!(
        kinds("a - b"),
        vec![TokenKind::Identifier, TokenKind::Minus, TokenKind::Identifier]
    );
    // A leading minus never starts an identifier.
    assert_eq!(kinds("-x"), vec![TokenKind::Minus, TokenKind::Identifier]);
}

#[test]
fn test_back_quoted_identifier() {
    assert_eq!(
        single("`my table`"),
        (TokenKind::BackQuotedIdentifier, "my table".to_string())
    );
}

#[test]
fn test_back_quote_escape() {
    let tokens = lex("`a``b`");
    assert_eq!(tokens.len(), 2);
    assert_eq!(tokens[0].kind, TokenKind::BackQuotedIdentifier);
    assert_eq!(tokens[0].text, "a`b");
    assert_eq!(tokens[0].span.end.column, 6);
}

#[test]
fn test_empty_back_quoted_identifier() {
    assert_eq!(single("``"), (TokenKind::BackQuotedIdentifier, String::new()));
}

#[test]
fn test_unterminated_back_quote_degrades_to_unrecognized() {
    let tokens = visible("`abc");
    assert_eq!(tokens[0], (TokenKind::Unrecognized, "`".to_string()));
    assert_eq!(tokens[1], (TokenKind::Identifier, "abc".to_string()));
}

#[test]
fn test_back_quote_falls_back_to_last_close() {
    // The escaped reading of "```" never terminates, so "``" closes as an empty name.
    assert_eq!(
        visible("``` x"),
        vec![
            (TokenKind::BackQuotedIdentifier, String::new()),
            (TokenKind::Unrecognized, "`".to_string()),
            (TokenKind::Identifier, "x".to_string()),
        ]
    );
}

// ==================== Numeric literals ====================

#[test]
fn test_integer_and_suffixes() {
    assert_eq!(single("42"), (TokenKind::Integer, "42".to_string()));
    assert_eq!(single("10L").0, TokenKind::BigInt);
    assert_eq!(single("10s").0, TokenKind::SmallInt);
    assert_eq!(single("10Y").0, TokenKind::TinyInt);
    assert_eq!(single("10B").0, TokenKind::ByteLength);
    assert_eq!(single("64m").0, TokenKind::ByteLength);
    assert_eq!(single("10BD").0, TokenKind::BigDecimal);
    assert_eq!(single("10D").0, TokenKind::Double);
}

#[test]
fn test_decimal_forms() {
    assert_eq!(single("2.34"), (TokenKind::Decimal, "2.34".to_string()));
    assert_eq!(single("2."), (TokenKind::Decimal, "2.".to_string()));
    assert_eq!(single(".5"), (TokenKind::Decimal, ".5".to_string()));
    assert_eq!(single("1e10"), (TokenKind::Decimal, "1e10".to_string()));
    assert_eq!(single("1.5E-3"), (TokenKind::Decimal, "1.5E-3".to_string()));
    assert_eq!(single("1.5BD"), (TokenKind::BigDecimal, "1.5BD".to_string()));
}

#[test]
fn test_decimal_followed_by_letter_is_reinterpreted() {
    assert_eq!(
        visible("2.3W"),
        vec![
            (TokenKind::Integer, "2".to_string()),
            (TokenKind::Dot, ".".to_string()),
            (TokenKind::Identifier, "3W".to_string()),
        ]
    );
}

#[test]
fn test_typed_double_before_whitespace() {
    assert_eq!(
        visible("12.0D 34"),
        vec![
            (TokenKind::Double, "12.0D".to_string()),
            (TokenKind::Integer, "34".to_string()),
        ]
    );
}

#[test]
fn test_second_dot_is_not_inspected() {
    assert_eq!(
        visible("2.3.4"),
        vec![
            (TokenKind::Decimal, "2.3".to_string()),
            (TokenKind::Decimal, ".4".to_string()),
        ]
    );
}

#[test]
fn test_digit_led_identifier() {
    assert_eq!(single("123abc"), (TokenKind::Identifier, "123abc".to_string()));
    assert_eq!(single("1_000"), (TokenKind::Identifier, "1_000".to_string()));
}

#[test]
fn test_exponent_with_sign_is_not_a_job_identifier() {
    assert_eq!(single("1E-5"), (TokenKind::Decimal, "1E-5".to_string()));
}

#[test]
fn test_qualified_name_with_dot() {
    assert_eq!(
        kinds("db.tbl"),
        vec![TokenKind::Identifier, TokenKind::Dot, TokenKind::Identifier]
    );
    // "t.5" is not a decimal: the '.' is followed by a digit only after the identifier.
    assert_eq!(
        kinds("a.5x"),
        vec![TokenKind::Identifier, TokenKind::Dot, TokenKind::Identifier]
    );
}

// ==================== Strings ====================

#[test]
fn test_strings_keep_quotes() {
    assert_eq!(single("'abc'"), (TokenKind::String, "'abc'".to_string()));
    assert_eq!(single("\"abc\""), (TokenKind::String, "\"abc\"".to_string()));
}

#[test]
fn test_backslash_escapes_delimiter() {
    let (kind, text) = single(r"'it\'s'");
    assert_eq!(kind, TokenKind::String);
    assert_eq!(unescape_string(&text), "it's");
}

#[test]
fn test_unterminated_string() {
    let err = Lexer::new("SELECT 'abc").tokenize().unwrap_err();
    assert_eq!(err.kind, ParseErrorKind::Lexical);
    assert_eq!(err.span.start.column, 7);
    assert_eq!(err.span.end.column, 8);
}

#[test]
fn test_unescape() {
    assert_eq!(unescape_string(r"'a\nb\tc'"), "a\nb\tc");
    assert_eq!(unescape_string(r"'\\'"), "\\");
    assert_eq!(unescape_string(r"'A'"), "A");
    assert_eq!(unescape_string(r"'\101'"), "A");
    assert_eq!(unescape_string(r"'100\%'"), "100\\%");
    assert_eq!(unescape_string(r"'\q'"), "q");
    assert_eq!(unescape_string("\"x\""), "x");
}

// ==================== Operators & punctuation ====================

#[test]
fn test_operators() {
    assert_eq!(
        kinds("= == <=> <> != < <= !> > >= !< + - * / % ~ & | ^"),
        vec![
            TokenKind::Eq,
            TokenKind::Eq,
            TokenKind::NullSafeEq,
            TokenKind::NotEq,
            TokenKind::BangEq,
            TokenKind::Lt,
            TokenKind::LtEq,
            TokenKind::LtEq,
            TokenKind::Gt,
            TokenKind::GtEq,
            TokenKind::GtEq,
            TokenKind::Plus,
            TokenKind::Minus,
            TokenKind::Asterisk,
            TokenKind::Slash,
            TokenKind::Percent,
            TokenKind::Tilde,
            TokenKind::Ampersand,
            TokenKind::Pipe,
            TokenKind::Caret,
        ]
    );
}

#[test]
fn test_punctuation() {
    assert_eq!(
        kinds("( , ) . ;"),
        vec![
            TokenKind::LeftParen,
            TokenKind::Comma,
            TokenKind::RightParen,
            TokenKind::Dot,
            TokenKind::Semicolon,
        ]
    );
}

#[test]
fn test_unrecognized_character() {
    assert_eq!(
        visible("a # b"),
        vec![
            (TokenKind::Identifier, "a".to_string()),
            (TokenKind::Unrecognized, "#".to_string()),
            (TokenKind::Identifier, "b".to_string()),
        ]
    );
}

// ==================== Comments & whitespace ====================

#[test]
fn test_line_comment_includes_terminator() {
    let tokens = lex("a -- note\nb");
    assert_eq!(tokens[2].kind, TokenKind::SimpleComment);
    assert_eq!(tokens[2].text, "-- note\n");
    assert_eq!(tokens[3].kind, TokenKind::Identifier);
    assert_eq!(tokens[3].span.start.line, 2);
}

#[test]
fn test_double_minus_always_comments() {
    assert_eq!(kinds("x --y"), vec![TokenKind::Identifier]);
}

#[test]
fn test_bracketed_comments() {
    let tokens = lex("/**/ /* c */");
    assert_eq!(tokens[0].kind, TokenKind::BracketedEmptyComment);
    assert_eq!(tokens[2].kind, TokenKind::BracketedComment);
    assert_eq!(tokens[2].text, "/* c */");
    assert!(tokens[2].kind.is_comment());
}

#[test]
fn test_hint_is_not_a_comment() {
    assert_eq!(
        kinds("/*+ x */"),
        vec![
            TokenKind::Slash,
            TokenKind::Asterisk,
            TokenKind::Plus,
            TokenKind::Identifier,
            TokenKind::Asterisk,
            TokenKind::Slash,
        ]
    );
}

#[test]
fn test_unterminated_bracketed_comment() {
    let err = Lexer::new("SELECT /* never").tokenize().unwrap_err();
    assert_eq!(err.kind, ParseErrorKind::Lexical);
    assert_eq!(err.span.start.column, 7);
    assert_eq!(err.span.end.column, 9);
}

#[test]
fn test_whitespace_run_is_one_token() {
    let tokens = lex("a \t\r\n  b");
    assert_eq!(tokens.len(), 4);
    assert_eq!(tokens[1].kind, TokenKind::Whitespace);
    assert_eq!(tokens[2].span.start.line, 2);
    assert_eq!(tokens[2].span.start.column, 2);
}

// ==================== Token classes ====================

#[test]
fn test_token_class_predicates() {
    let tokens = lex("SELECT 'x', 10L, 2.5BD, `q`, a-b /* c */ ~");
    let find = |kind: TokenKind| tokens.iter().find(|t| t.kind == kind).unwrap();

    let select = find(TokenKind::Keyword(Keyword::Select));
    assert!(select.is_keyword(Keyword::Select));
    assert!(!select.is_keyword(Keyword::From));
    assert_eq!(select.kind.keyword(), Some(Keyword::Select));

    for kind in [TokenKind::String, TokenKind::BigInt, TokenKind::BigDecimal] {
        assert!(find(kind).kind.is_literal(), "{:?}", kind);
        assert_eq!(kind.keyword(), None);
    }
    assert!(!TokenKind::String.is_number());
    assert!(TokenKind::BigInt.is_number());

    for kind in [TokenKind::BackQuotedIdentifier, TokenKind::JobIdentifier] {
        let token = find(kind);
        assert!(token.kind.is_identifier(), "{:?}", kind);
        assert!(!token.kind.is_literal(), "{:?}", kind);
    }

    let comment = find(TokenKind::BracketedComment);
    assert!(comment.kind.is_hidden() && comment.kind.is_comment());
    assert!(TokenKind::Whitespace.is_hidden() && !TokenKind::Whitespace.is_comment());
    assert!(!TokenKind::Tilde.is_literal() && !TokenKind::Tilde.is_hidden());
}

// ==================== Sequence properties ====================

#[test]
fn test_relexing_is_idempotent() {
    let sql = "MERGE INTO t USING s ON t.id = s.id WHEN MATCHED THEN DELETE -- x\n";
    let first = lex(sql);
    let mut lexer = Lexer::new(sql);
    assert_eq!(lexer.tokenize().unwrap(), first);
    lexer.reset();
    assert_eq!(lexer.tokenize().unwrap(), first);
    assert_eq!(Lexer::new(sql).tokenize().unwrap(), first);
}

#[test]
fn test_spans_are_monotonic_and_non_empty() {
    let sql = "SELECT `a``b`, 1.5e3D, 'x\\'y' /* c */ FROM t -- end\r\nWHERE a <=> 2";
    let tokens = lex(sql);
    for pair in tokens.windows(2) {
        assert!(pair[0].span.end <= pair[1].span.start, "{:?}", pair);
    }
    for token in tokens.iter().filter(|t| t.kind != TokenKind::Eof) {
        assert!(!token.span.is_empty(), "{:?}", token);
    }
}

#[test]
fn test_spans_slice_back_to_source() {
    let sql = "LOAD DATA INPATH 'é/x' INTO TABLE t";
    for token in lex(sql).iter().filter(|t| t.kind != TokenKind::Eof) {
        assert_eq!(token.span.slice(sql), Some(token.text.as_str()));
    }
}

#[test]
fn test_eof_repeats_and_iterator_stops() {
    let mut lexer = Lexer::new("a");
    lexer.next_token().unwrap();
    assert_eq!(lexer.next_token().unwrap().kind, TokenKind::Eof);
    assert_eq!(lexer.next_token().unwrap().kind, TokenKind::Eof);

    let collected: Vec<_> = Lexer::new("a b").collect();
    assert_eq!(collected.len(), 4);
    assert!(matches!(collected.last(), Some(Ok(t)) if t.kind == TokenKind::Eof));
}

#[test]
fn test_iterator_stops_after_error() {
    let results: Vec<_> = Lexer::new("a 'b").collect();
    assert_eq!(results.len(), 3);
    assert!(results[2].is_err());
}
