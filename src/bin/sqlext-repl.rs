//! sqlext Interactive Shell
//!
//! Reads `;`-terminated statements, parses them and prints the dispatched command.
//! Nothing is executed.
//!
//! Usage: sqlext-repl [OPTIONS]
//!
//! Options:
//!   -c, --config-dir <DIR>  Directory holding sqlext.toml (default: .)
//!   -d, --debug             Print commands with Debug formatting instead of JSON

use clap::Parser;
use colored::Colorize;
use rustyline::completion::{Completer, Pair};
use rustyline::error::ReadlineError;
use rustyline::highlight::Highlighter;
use rustyline::hint::Hinter;
use rustyline::validate::Validator;
use rustyline::{Context, Editor, Helper};
use sqlext::{is_statement_complete, Command, Config, OutputFormat};
use sqlext_core::Keyword;
use std::borrow::Cow;
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser, Debug)]
#[command(name = "sqlext-repl")]
#[command(about = "Interactive shell for the extended SQL parser", long_about = None)]
struct Args {
    /// Directory holding sqlext.toml and .env
    #[arg(short, long, default_value = ".")]
    config_dir: PathBuf,

    /// Print commands with Debug formatting
    #[arg(short, long)]
    debug: bool,
}

/// Keyword completion
struct SqlHelper {
    completions: Vec<String>,
}

impl SqlHelper {
    fn new() -> Self {
        let completions = Keyword::ALL
            .iter()
            .map(|kw| kw.as_str().to_string())
            .collect();
        Self { completions }
    }

    fn word_start(line: &str) -> usize {
        line.rfind(|c: char| c.is_whitespace() || c == '(' || c == ',')
            .map(|i| i + 1)
            .unwrap_or(0)
    }
}

impl Completer for SqlHelper {
    type Candidate = Pair;

    fn complete(
        &self,
        line: &str,
        pos: usize,
        _ctx: &Context<'_>,
    ) -> Result<(usize, Vec<Pair>), ReadlineError> {
        let start = Self::word_start(&line[..pos]);
        let word = line[start..pos].to_ascii_uppercase();

        let matches: Vec<Pair> = self
            .completions
            .iter()
            .filter(|c| !word.is_empty() && c.starts_with(&word))
            .map(|c| Pair {
                display: c.clone(),
                replacement: c.clone(),
            })
            .collect();

        Ok((start, matches))
    }
}

impl Hinter for SqlHelper {
    type Hint = String;

    fn hint(&self, line: &str, pos: usize, _ctx: &Context<'_>) -> Option<String> {
        if pos < line.len() {
            return None;
        }

        let word = &line[Self::word_start(line)..];
        if word.is_empty() {
            return None;
        }

        let upper = word.to_ascii_uppercase();
        self.completions
            .iter()
            .find(|c| c.starts_with(&upper) && c.len() > upper.len())
            .map(|c| c[upper.len()..].to_string())
    }
}

impl Highlighter for SqlHelper {
    fn highlight_hint<'h>(&self, hint: &'h str) -> Cow<'h, str> {
        Cow::Owned(hint.truecolor(100, 100, 100).to_string())
    }
}

impl Validator for SqlHelper {}

impl Helper for SqlHelper {}

fn print_banner() {
    println!(
        "  {} {}",
        "sqlext interactive shell".white().bold(),
        env!("CARGO_PKG_VERSION").dimmed()
    );
    println!(
        "  End statements with {}. Type {} for help, {} to quit\n",
        ";".yellow(),
        ".help".yellow(),
        ".exit".yellow()
    );
}

fn print_help() {
    println!("\n{}", "Commands:".white().bold());
    println!("  {}        Show this help", ".help".yellow());
    println!("  {}        Exit the shell", ".exit".yellow());
    println!("  {}       Clear the screen", ".clear".yellow());
    println!("  {}      Switch output between json and debug", ".format".yellow());

    println!("\n{}", "Extended statements:".white().bold());
    println!(
        "  {}",
        "MERGE INTO t USING s ON t.id = s.id WHEN MATCHED THEN DELETE;".green()
    );
    println!(
        "  {}",
        "LOAD DATA INPATH '/data/day1' INTO TABLE events PARTITION (dt);".green()
    );
    println!(
        "  {}",
        "EXPORT SELECT * FROM events TO '/out' FORMAT parquet;".green()
    );
    println!("\n  Anything else is parsed and passed through.\n");
}

fn print_command(command: &Command, format: OutputFormat) {
    match format {
        OutputFormat::Json => match command.to_json().and_then(|v| serde_json::to_string_pretty(&v)) {
            Ok(json) => println!("{} {}", command.name().cyan().bold(), json),
            Err(e) => println!("{} {}", "Error:".red().bold(), e),
        },
        OutputFormat::Debug => println!("{} {:#?}", command.name().cyan().bold(), command),
    }
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    let config = Config::load(&args.config_dir)?;

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| config.log.filter.clone().into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let mut format = if args.debug {
        OutputFormat::Debug
    } else {
        config.output.format
    };

    print_banner();

    let mut rl = Editor::new()?;
    rl.set_helper(Some(SqlHelper::new()));

    // Load history
    let history_file = std::env::var("HOME")
        .map(|h| PathBuf::from(h).join(".sqlext_history"))
        .unwrap_or_else(|_| PathBuf::from(".sqlext_history"));
    let _ = rl.load_history(&history_file);

    let mut buffer = String::new();

    loop {
        let prompt = if buffer.is_empty() {
            format!("{}{} ", "sqlext".cyan(), ">".white())
        } else {
            format!("{} ", "...".dimmed())
        };

        match rl.readline(&prompt) {
            Ok(line) => {
                let trimmed = line.trim();

                if buffer.is_empty() && trimmed.starts_with('.') {
                    match trimmed {
                        ".exit" | ".quit" | ".q" => {
                            println!("{}", "Goodbye!".dimmed());
                            break;
                        }
                        ".help" | ".h" | ".?" => print_help(),
                        ".clear" => {
                            print!("\x1B[2J\x1B[1;1H");
                            print_banner();
                        }
                        ".format" => {
                            format = match format {
                                OutputFormat::Json => OutputFormat::Debug,
                                OutputFormat::Debug => OutputFormat::Json,
                            };
                            println!("  {} {:?}", "Output format:".dimmed(), format);
                        }
                        other => {
                            println!("  {} {}", "Unknown command:".red(), other);
                            println!("  Type {} for help", ".help".yellow());
                        }
                    }
                    continue;
                }

                if trimmed.is_empty() && buffer.is_empty() {
                    continue;
                }

                buffer.push_str(&line);
                buffer.push('\n');
                if !is_statement_complete(&buffer) {
                    continue;
                }

                let source = std::mem::take(&mut buffer);
                let _ = rl.add_history_entry(source.trim());

                match sqlext::parse_commands(&source) {
                    Ok(commands) => {
                        for command in &commands {
                            print_command(command, format);
                        }
                    }
                    Err(err) => {
                        println!("{} {}", "Error:".red().bold(), err.kind);
                        println!("{}", err.render(&source).red());
                    }
                }
            }
            Err(ReadlineError::Interrupted) => {
                if buffer.is_empty() {
                    println!("{}", "Type .exit to quit".dimmed());
                } else {
                    println!("{}", "Cancelled".dimmed());
                    buffer.clear();
                }
            }
            Err(ReadlineError::Eof) => {
                println!("{}", "Goodbye!".dimmed());
                break;
            }
            Err(err) => {
                println!("{} {:?}", "Error:".red(), err);
                break;
            }
        }
    }

    // Save history
    let _ = rl.save_history(&history_file);
    Ok(())
}
