//! Character scanner with line/column tracking.

use crate::span::SourcePosition;

/// Walks the input one character at a time and keeps the source position of the
/// current character.
///
/// Only `\n` ends a line. A `\r` advances the column like any other character, so a
/// `\r\n` pair counts as a single line terminator.
#[derive(Debug, Clone)]
pub struct CharScanner {
    input: Vec<char>,
    index: usize,
    line: u32,
    column: u32,
    offset: usize,
}

impl CharScanner {
    pub fn new(input: &str) -> Self {
        Self {
            input: input.chars().collect(),
            index: 0,
            line: 1,
            column: 0,
            offset: 0,
        }
    }

    /// The character under the cursor, `None` at end of input.
    pub fn current(&self) -> Option<char> {
        self.input.get(self.index).copied()
    }

    /// Look `k` characters past the current one without consuming anything.
    /// `peek(0)` is the current character.
    pub fn peek(&self, k: usize) -> Option<char> {
        self.input.get(self.index + k).copied()
    }

    /// Consume the current character and return it.
    pub fn advance(&mut self) -> Option<char> {
        let ch = self.current()?;
        self.index += 1;
        self.offset += ch.len_utf8();
        if ch == '\n' {
            self.line += 1;
            self.column = 0;
        } else {
            self.column += 1;
        }
        Some(ch)
    }

    /// Consume `n` characters and return them as a string.
    pub fn take(&mut self, n: usize) -> String {
        let mut text = String::with_capacity(n);
        for _ in 0..n {
            match self.advance() {
                Some(ch) => text.push(ch),
                None => break,
            }
        }
        text
    }

    pub fn position(&self) -> SourcePosition {
        SourcePosition::new(self.line, self.column, self.offset)
    }

    pub fn is_eof(&self) -> bool {
        self.index >= self.input.len()
    }

    /// Rewind to the start of the input.
    pub fn reset(&mut self) {
        self.index = 0;
        self.line = 1;
        self.column = 0;
        self.offset = 0;
    }

    /// Length of the run of characters starting `from` characters ahead that all
    /// satisfy `pred`.
    pub fn run_length(&self, from: usize, pred: impl Fn(char) -> bool) -> usize {
        let mut n = 0;
        while let Some(ch) = self.peek(from + n) {
            if !pred(ch) {
                break;
            }
            n += 1;
        }
        n
    }

    /// Whether the input at the cursor starts with `text`, ignoring ASCII case.
    pub fn lookahead_matches(&self, text: &str) -> bool {
        text.chars()
            .enumerate()
            .all(|(i, expected)| match self.peek(i) {
                Some(ch) => ch.eq_ignore_ascii_case(&expected),
                None => false,
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tracks_lines_and_columns() {
        let mut scanner = CharScanner::new("ab\ncd");
        scanner.advance();
        scanner.advance();
        assert_eq!(scanner.position(), SourcePosition::new(1, 2, 2));
        scanner.advance();
        assert_eq!(scanner.position(), SourcePosition::new(2, 0, 3));
        scanner.advance();
        assert_eq!(scanner.position(), SourcePosition::new(2, 1, 4));
    }

    #[test]
    fn test_crlf_is_one_line_break() {
        let mut scanner = CharScanner::new("a\r\nb");
        scanner.take(3);
        let pos = scanner.position();
        assert_eq!(pos.line, 2);
        assert_eq!(pos.column, 0);
        assert_eq!(scanner.current(), Some('b'));
    }

    #[test]
    fn test_offsets_are_bytes() {
        let mut scanner = CharScanner::new("é1");
        scanner.advance();
        let pos = scanner.position();
        assert_eq!(pos.column, 1);
        assert_eq!(pos.offset, 2);
    }

    #[test]
    fn test_peek_and_reset() {
        let mut scanner = CharScanner::new("xyz");
        assert_eq!(scanner.peek(2), Some('z'));
        assert_eq!(scanner.peek(3), None);
        scanner.take(3);
        assert!(scanner.is_eof());
        scanner.reset();
        assert_eq!(scanner.current(), Some('x'));
        assert_eq!(scanner.position(), SourcePosition::START);
    }

    #[test]
    fn test_run_length_and_lookahead() {
        let scanner = CharScanner::new("abc12-x");
        assert_eq!(scanner.run_length(0, |c| c.is_ascii_alphabetic()), 3);
        assert_eq!(scanner.run_length(3, |c| c.is_ascii_digit()), 2);
        assert!(scanner.lookahead_matches("ABC"));
        assert!(!scanner.lookahead_matches("abcd"));
    }
}
