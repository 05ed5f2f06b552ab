//! Lexer for the extended SQL dialect.
//!
//! At each position every applicable token rule is measured and the longest match wins.
//! Ties are broken by rule order: keywords, strings, then the numeric literal forms
//! (BigInt, SmallInt, TinyInt, ByteLength, Integer, Decimal, Double, BigDecimal), then
//! plain identifiers and finally the long job-identifier form.

mod keywords;
mod token;

#[cfg(test)]
mod tests;

pub use keywords::Keyword;
pub use token::{Token, TokenKind};

use crate::error::ParseResult;
use crate::reporter::ErrorReporter;
use crate::scanner::CharScanner;
use crate::span::{SourcePosition, Span};

pub struct Lexer {
    scanner: CharScanner,
    finished: bool,
}

fn is_word_char(ch: char) -> bool {
    ch.is_ascii_alphanumeric() || ch == '_'
}

fn is_job_char(ch: char) -> bool {
    is_word_char(ch) || ch == '-'
}

/// Tie-break rank among the numeric rules; lower wins.
fn numeric_rank(kind: TokenKind) -> u8 {
    match kind {
        TokenKind::BigInt => 0,
        TokenKind::SmallInt => 1,
        TokenKind::TinyInt => 2,
        TokenKind::ByteLength => 3,
        TokenKind::Integer => 4,
        TokenKind::Decimal => 5,
        TokenKind::Double => 6,
        _ => 7,
    }
}

impl Lexer {
    pub fn new(input: &str) -> Self {
        Self {
            scanner: CharScanner::new(input),
            finished: false,
        }
    }

    /// Restart from the first character. Lexing again yields the same tokens.
    pub fn reset(&mut self) {
        self.scanner.reset();
        self.finished = false;
    }

    /// Lex the whole input, hidden tokens included, ending with `Eof`.
    pub fn tokenize(&mut self) -> ParseResult<Vec<Token>> {
        let mut tokens = Vec::new();
        loop {
            let token = self.next_token()?;
            let done = token.kind == TokenKind::Eof;
            tokens.push(token);
            if done {
                return Ok(tokens);
            }
        }
    }

    /// Produce the next token. At end of input this returns `Eof`, repeatedly.
    pub fn next_token(&mut self) -> ParseResult<Token> {
        let start = self.scanner.position();
        let Some(ch) = self.scanner.current() else {
            return Ok(Token::new(TokenKind::Eof, "", Span::point(start)));
        };

        let (kind, len) = match ch {
            ' ' | '\t' | '\n' | '\r' => (
                TokenKind::Whitespace,
                self.scanner
                    .run_length(0, |c| matches!(c, ' ' | '\t' | '\n' | '\r')),
            ),
            '\'' | '"' => return self.read_string(ch, start),
            '`' => return Ok(self.read_back_quoted(start)),
            '-' if self.scanner.peek(1) == Some('-') => {
                (TokenKind::SimpleComment, self.line_comment_len())
            }
            '/' if self.scanner.peek(1) == Some('*') => match self.bracketed_comment(start)? {
                Some(measured) => measured,
                None => (TokenKind::Slash, 1),
            },
            c if is_word_char(c) => self.measure_word(),
            '.' => self.measure_number().unwrap_or((TokenKind::Dot, 1)),
            '(' => (TokenKind::LeftParen, 1),
            ')' => (TokenKind::RightParen, 1),
            ',' => (TokenKind::Comma, 1),
            ';' => (TokenKind::Semicolon, 1),
            '<' => match (self.scanner.peek(1), self.scanner.peek(2)) {
                (Some('='), Some('>')) => (TokenKind::NullSafeEq, 3),
                (Some('='), _) => (TokenKind::LtEq, 2),
                (Some('>'), _) => (TokenKind::NotEq, 2),
                _ => (TokenKind::Lt, 1),
            },
            '>' => match self.scanner.peek(1) {
                Some('=') => (TokenKind::GtEq, 2),
                _ => (TokenKind::Gt, 1),
            },
            '=' => match self.scanner.peek(1) {
                Some('=') => (TokenKind::Eq, 2),
                _ => (TokenKind::Eq, 1),
            },
            '!' => match self.scanner.peek(1) {
                Some('=') => (TokenKind::BangEq, 2),
                Some('>') => (TokenKind::LtEq, 2),
                Some('<') => (TokenKind::GtEq, 2),
                _ => (TokenKind::Keyword(Keyword::Not), 1),
            },
            '+' => (TokenKind::Plus, 1),
            '-' => (TokenKind::Minus, 1),
            '*' => (TokenKind::Asterisk, 1),
            '/' => (TokenKind::Slash, 1),
            '%' => (TokenKind::Percent, 1),
            '~' => (TokenKind::Tilde, 1),
            '&' => (TokenKind::Ampersand, 1),
            '|' => (TokenKind::Pipe, 1),
            '^' => (TokenKind::Caret, 1),
            _ => (TokenKind::Unrecognized, 1),
        };

        let text = self.scanner.take(len);
        Ok(self.finish(kind, text, start))
    }

    fn finish(&self, kind: TokenKind, text: String, start: SourcePosition) -> Token {
        let token = Token::new(kind, text, Span::new(start, self.scanner.position()));
        tracing::trace!(kind = %token.kind, span = %token.span, "token");
        token
    }

    /// Span of the next `n` characters, which must all sit on the current line.
    fn delimiter_span(start: SourcePosition, n: usize) -> Span {
        let end = SourcePosition::new(start.line, start.column + n as u32, start.offset + n);
        Span::new(start, end)
    }

    /// Quoted string; a backslash escapes whatever follows it, the delimiter included.
    fn read_string(&mut self, quote: char, start: SourcePosition) -> ParseResult<Token> {
        let mut i = 1;
        loop {
            match self.scanner.peek(i) {
                None => {
                    return ErrorReporter::lexical(
                        Self::delimiter_span(start, 1),
                        "unterminated string literal",
                    )
                }
                Some('\\') => i += 2,
                Some(c) if c == quote => break,
                Some(_) => i += 1,
            }
        }
        let text = self.scanner.take(i + 1);
        Ok(self.finish(TokenKind::String, text, start))
    }

    /// Back-quoted identifier. A doubled back-quote stands for one back-quote. Without a
    /// closing quote the opening one becomes an `Unrecognized` token.
    fn read_back_quoted(&mut self, start: SourcePosition) -> Token {
        let mut name = String::new();
        // Longest closing point seen so far, kept in case a later `` pair never closes.
        let mut fallback: Option<(usize, String)> = None;
        let mut i = 1;
        let closed = loop {
            match self.scanner.peek(i) {
                None => break fallback.take(),
                Some('`') if self.scanner.peek(i + 1) == Some('`') => {
                    fallback = Some((i + 1, name.clone()));
                    name.push('`');
                    i += 2;
                }
                Some('`') => break Some((i + 1, name)),
                Some(c) => {
                    name.push(c);
                    i += 1;
                }
            }
        };

        match closed {
            Some((len, name)) => {
                self.scanner.take(len);
                self.finish(TokenKind::BackQuotedIdentifier, name, start)
            }
            None => {
                let text = self.scanner.take(1);
                self.finish(TokenKind::Unrecognized, text, start)
            }
        }
    }

    /// `--` up to and including the line terminator.
    fn line_comment_len(&self) -> usize {
        let mut len = 2 + self.scanner.run_length(2, |c| c != '\r' && c != '\n');
        if self.scanner.peek(len) == Some('\r') {
            len += 1;
        }
        if self.scanner.peek(len) == Some('\n') {
            len += 1;
        }
        len
    }

    /// Measure a comment starting at `/*`. `None` when the input is a `/*+` hint, which is
    /// not a comment in this dialect.
    fn bracketed_comment(&self, start: SourcePosition) -> ParseResult<Option<(TokenKind, usize)>> {
        if self.scanner.lookahead_matches("/**/") {
            return Ok(Some((TokenKind::BracketedEmptyComment, 4)));
        }
        match self.scanner.peek(2) {
            Some('+') => return Ok(None),
            None => {
                return ErrorReporter::lexical(
                    Self::delimiter_span(start, 2),
                    "unterminated bracketed comment",
                )
            }
            Some(_) => {}
        }
        let mut i = 3;
        loop {
            match (self.scanner.peek(i), self.scanner.peek(i + 1)) {
                (Some('*'), Some('/')) => return Ok(Some((TokenKind::BracketedComment, i + 2))),
                (None, _) => {
                    return ErrorReporter::lexical(
                        Self::delimiter_span(start, 2),
                        "unterminated bracketed comment",
                    )
                }
                _ => i += 1,
            }
        }
    }

    /// A run of word characters: keyword, identifier, number or job identifier.
    fn measure_word(&self) -> (TokenKind, usize) {
        let ident_len = self.scanner.run_length(0, is_word_char);
        let word: String = (0..ident_len).filter_map(|i| self.scanner.peek(i)).collect();

        let mut best = match Keyword::lookup(&word) {
            Some(kw) => (TokenKind::Keyword(kw), ident_len),
            None => (TokenKind::Identifier, ident_len),
        };

        if let Some((kind, len)) = self.measure_number() {
            // Numbers start with a digit so they never tie with a keyword, and they beat
            // identifiers on equal length.
            if len >= best.1 {
                best = (kind, len);
            }
        }

        let job_len = self.scanner.run_length(0, is_job_char);
        if job_len > best.1 {
            best = (TokenKind::JobIdentifier, job_len);
        }
        best
    }

    /// Longest numeric literal at the cursor, if any.
    fn measure_number(&self) -> Option<(TokenKind, usize)> {
        let s = &self.scanner;
        let digits = s.run_length(0, |c| c.is_ascii_digit());
        let mut candidates: Vec<(TokenKind, usize)> = Vec::new();

        if digits > 0 {
            candidates.push((TokenKind::Integer, digits));
            match s.peek(digits).map(|c| c.to_ascii_uppercase()) {
                Some('L') => candidates.push((TokenKind::BigInt, digits + 1)),
                Some('S') => candidates.push((TokenKind::SmallInt, digits + 1)),
                Some('Y') => candidates.push((TokenKind::TinyInt, digits + 1)),
                Some('B' | 'K' | 'M' | 'G') => candidates.push((TokenKind::ByteLength, digits + 1)),
                _ => {}
            }
            let exponent = self.exponent_end(digits);
            if let Some(end) = exponent {
                candidates.push((TokenKind::Decimal, end));
            }
            for end in [Some(digits), exponent].into_iter().flatten() {
                if self.suffix_at(end, "D") {
                    candidates.push((TokenKind::Double, end + 1));
                }
                if self.suffix_at(end, "BD") {
                    candidates.push((TokenKind::BigDecimal, end + 2));
                }
            }
        }

        if s.peek(digits) == Some('.') {
            let fraction = s.run_length(digits + 1, |c| c.is_ascii_digit());
            if digits > 0 || fraction > 0 {
                let base = digits + 1 + fraction;
                for end in [Some(base), self.exponent_end(base)].into_iter().flatten() {
                    if self.is_valid_decimal(end) {
                        candidates.push((TokenKind::Decimal, end));
                    }
                    if self.suffix_at(end, "D") && self.is_valid_decimal(end + 1) {
                        candidates.push((TokenKind::Double, end + 1));
                    }
                    if self.suffix_at(end, "BD") && self.is_valid_decimal(end + 2) {
                        candidates.push((TokenKind::BigDecimal, end + 2));
                    }
                }
            }
        }

        candidates.into_iter().max_by(|a, b| {
            a.1.cmp(&b.1)
                .then(numeric_rank(b.0).cmp(&numeric_rank(a.0)))
        })
    }

    /// End of an exponent (`E [+-]? DIGIT+`) starting `at` characters ahead.
    fn exponent_end(&self, at: usize) -> Option<usize> {
        if !matches!(self.scanner.peek(at), Some('e' | 'E')) {
            return None;
        }
        let mut i = at + 1;
        if matches!(self.scanner.peek(i), Some('+' | '-')) {
            i += 1;
        }
        match self.scanner.run_length(i, |c| c.is_ascii_digit()) {
            0 => None,
            n => Some(i + n),
        }
    }

    fn suffix_at(&self, at: usize, suffix: &str) -> bool {
        suffix
            .chars()
            .enumerate()
            .all(|(i, expected)| match self.scanner.peek(at + i) {
                Some(c) => c.eq_ignore_ascii_case(&expected),
                None => false,
            })
    }

    /// A literal ending `end` characters ahead is complete only if the character after it
    /// cannot continue a word. A following `.` is not inspected.
    fn is_valid_decimal(&self, end: usize) -> bool {
        !matches!(self.scanner.peek(end), Some(c) if is_word_char(c))
    }
}

impl Iterator for Lexer {
    type Item = ParseResult<Token>;

    /// Yields every token including `Eof`, then stops. Stops after the first error.
    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }
        let result = self.next_token();
        match &result {
            Ok(token) if token.kind != TokenKind::Eof => {}
            _ => self.finished = true,
        }
        Some(result)
    }
}

/// Decode the value of a string token (quotes included in `raw`).
pub fn unescape_string(raw: &str) -> String {
    let mut chars = raw.chars();
    let quote = chars.next();
    let body: Vec<char> = chars.collect();
    let body = match (quote, body.last()) {
        (Some(q), Some(last)) if *last == q => &body[..body.len() - 1],
        _ => &body[..],
    };

    let mut out = String::with_capacity(body.len());
    let mut i = 0;
    while i < body.len() {
        let ch = body[i];
        if ch != '\\' || i + 1 >= body.len() {
            out.push(ch);
            i += 1;
            continue;
        }

        let next = body[i + 1];
        if next == 'u' && i + 6 <= body.len() {
            let hex: String = body[i + 2..i + 6].iter().collect();
            if let Some(decoded) = u32::from_str_radix(&hex, 16).ok().and_then(char::from_u32) {
                out.push(decoded);
                i += 6;
                continue;
            }
        }
        if i + 4 <= body.len()
            && ('0'..='3').contains(&next)
            && ('0'..='7').contains(&body[i + 2])
            && ('0'..='7').contains(&body[i + 3])
        {
            let octal: String = body[i + 1..i + 4].iter().collect();
            if let Some(decoded) = u32::from_str_radix(&octal, 8).ok().and_then(char::from_u32) {
                out.push(decoded);
                i += 4;
                continue;
            }
        }

        match next {
            '0' => out.push('\u{0000}'),
            'b' => out.push('\u{0008}'),
            'n' => out.push('\n'),
            'r' => out.push('\r'),
            't' => out.push('\t'),
            'Z' => out.push('\u{001A}'),
            '%' => out.push_str("\\%"),
            '_' => out.push_str("\\_"),
            other => out.push(other),
        }
        i += 2;
    }
    out
}
