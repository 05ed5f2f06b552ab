pub mod config;
pub mod error;
pub mod scan;

pub use config::{Config, OutputFormat};
pub use error::{ExtError, ExtResult};
pub use scan::{list_input_files, CombineFilter, ExecutionContext, FileStatus, LocalContext};
pub use sqlext_core::{
    dispatch, parse_command, parse_commands, parse_script, parse_statement, Command, ParseError,
};

use sqlext_core::{Lexer, TokenKind};

use std::path::Path;

/// Parse and dispatch every statement of a script file.
pub fn parse_file(path: &Path) -> ExtResult<Vec<Command>> {
    let sql = std::fs::read_to_string(path)?;
    let commands = parse_commands(&sql)?;
    tracing::info!(file = %path.display(), statements = commands.len(), "parsed script");
    Ok(commands)
}

/// Whether the last visible token of `sql` is a `;`. Unterminated strings and comments
/// count as incomplete.
pub fn is_statement_complete(sql: &str) -> bool {
    let mut last = None;
    for token in Lexer::new(sql) {
        match token {
            Ok(token) if token.kind == TokenKind::Eof => break,
            Ok(token) if !token.kind.is_hidden() => last = Some(token.kind),
            Ok(_) => {}
            Err(_) => return false,
        }
    }
    last == Some(TokenKind::Semicolon)
}
