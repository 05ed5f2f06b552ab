//! sqlext-core - Front end for the extended SQL dialect.
//!
//! This crate turns SQL text into typed commands without touching storage or executing
//! anything. The pipeline runs strictly forward:
//!
//! - **Scanner**: character cursor with line/column tracking
//! - **Lexer**: longest-match tokenizer, including the numeric literal disambiguation
//! - **TokenStream**: lookahead buffer that sets whitespace and comments aside
//! - **Parser**: recursive descent over statements, queries and expressions
//! - **Dispatcher**: maps the parse tree onto a [`Command`]
//!
//! Every failure is a [`ParseError`] carrying the span of the offending input.
//!
//! # Example
//!
//! ```rust
//! use sqlext_core::{parse_command, Command};
//!
//! let cmd = parse_command("LOAD DATA INPATH '/data/day1' INTO TABLE sales.events").unwrap();
//! match cmd {
//!     Command::Load(load) => {
//!         assert_eq!(load.path, "/data/day1");
//!         assert_eq!(load.table.qualified_name(), "sales.events");
//!     }
//!     other => panic!("unexpected {}", other.name()),
//! }
//! ```

pub mod ast;
pub mod command;
pub mod dispatch;
pub mod error;
pub mod lexer;
pub mod parser;
pub mod reporter;
pub mod scanner;
pub mod span;
pub mod stream;

// Re-export main types for convenience
pub use ast::{Expression, ParseNode, Query, Statement};
pub use command::{
    Command, ExportCommand, LiteralValue, LoadCommand, MergeAction, MergeCommand, OptionEntry,
    PartitionSpec, TableIdentifier,
};
pub use dispatch::dispatch;
pub use error::{ParseError, ParseErrorKind, ParseResult};
pub use lexer::{Keyword, Lexer, Token, TokenKind};
pub use parser::{parse_expression, parse_script, parse_statement, Parser};
pub use reporter::ErrorReporter;
pub use span::{SourcePosition, Span};
pub use stream::TokenStream;

/// Parse one statement and dispatch it.
pub fn parse_command(sql: &str) -> ParseResult<Command> {
    dispatch(parse_statement(sql)?)
}

/// Parse a script and dispatch every statement in order.
pub fn parse_commands(sql: &str) -> ParseResult<Vec<Command>> {
    parse_script(sql)?.into_iter().map(dispatch).collect()
}
