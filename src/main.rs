use clap::{Parser, Subcommand};
use colored::Colorize;
use sqlext::{list_input_files, CombineFilter, Command, Config, LocalContext, OutputFormat};
use sqlext_core::{Lexer, ParseError, TokenKind};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser, Debug)]
#[command(name = "sqlext")]
#[command(about = "Parse extended SQL into typed commands", long_about = None)]
struct Args {
    /// Directory holding sqlext.toml and .env
    #[arg(long, default_value = ".")]
    config_dir: PathBuf,

    #[command(subcommand)]
    command: Cmd,
}

#[derive(Subcommand, Debug)]
enum Cmd {
    /// Parse statements and print the dispatched commands
    Parse {
        /// SQL text (reads --file when omitted)
        sql: Option<String>,

        /// Read the script from a file
        #[arg(short, long)]
        file: Option<PathBuf>,

        /// Output format: json or debug (defaults to the configured format)
        #[arg(long)]
        format: Option<OutputFormat>,
    },

    /// Print the token stream with spans
    Tokens {
        /// SQL text (reads --file when omitted)
        sql: Option<String>,

        /// Read the input from a file
        #[arg(short, long)]
        file: Option<PathBuf>,

        /// Include whitespace and comments
        #[arg(long)]
        all: bool,
    },

    /// List the files of a directory the scan filter accepts
    Scan {
        /// Table directory
        dir: PathBuf,
    },
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    let config = Config::load(&args.config_dir)?;

    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| config.log.filter.clone().into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    match args.command {
        Cmd::Parse { sql, file, format } => {
            let source = read_input(sql, file)?;
            let format = format.unwrap_or(config.output.format);
            match sqlext::parse_commands(&source) {
                Ok(commands) => print_commands(&commands, format)?,
                Err(err) => fail(&err, &source),
            }
        }
        Cmd::Tokens { sql, file, all } => {
            let source = read_input(sql, file)?;
            match Lexer::new(&source).tokenize() {
                Ok(tokens) => {
                    for token in tokens {
                        if token.kind.is_hidden() && !all {
                            continue;
                        }
                        print_token(&token.kind, &token.text, &token.span.to_string());
                    }
                }
                Err(err) => fail(&err, &source),
            }
        }
        Cmd::Scan { dir } => {
            let filter = CombineFilter::new(config.scan.skip_path_filter);
            let ctx = LocalContext::new(config);
            let files = list_input_files(&ctx, &filter, &dir);
            if files.is_empty() {
                println!("{} No input files accepted in {}", "!".yellow(), dir.display());
            }
            for file in files {
                println!("{}", file.display());
            }
        }
    }

    Ok(())
}

/// SQL from the argument, or the file when no argument was given.
fn read_input(sql: Option<String>, file: Option<PathBuf>) -> anyhow::Result<String> {
    match (sql, file) {
        (Some(sql), _) => Ok(sql),
        (None, Some(path)) => Ok(std::fs::read_to_string(&path)?),
        (None, None) => anyhow::bail!("Provide SQL text or --file <path>"),
    }
}

fn print_commands(commands: &[Command], format: OutputFormat) -> anyhow::Result<()> {
    for command in commands {
        match format {
            OutputFormat::Json => {
                println!("{}", serde_json::to_string_pretty(&command.to_json()?)?)
            }
            OutputFormat::Debug => println!("{} {:#?}", command.name().cyan().bold(), command),
        }
    }
    Ok(())
}

fn print_token(kind: &TokenKind, text: &str, span: &str) {
    let kind_label = format!("{:<22}", kind.to_string());
    let kind_label = if kind.is_hidden() {
        kind_label.dimmed()
    } else if kind.keyword().is_some() {
        kind_label.cyan()
    } else if kind.is_literal() {
        kind_label.green()
    } else if *kind == TokenKind::Unrecognized {
        kind_label.red()
    } else {
        kind_label.normal()
    };
    println!("{} {:<28} {}", kind_label, format!("{:?}", text), span.dimmed());
}

fn fail(err: &ParseError, source: &str) -> ! {
    eprintln!("{} {}", "Error:".red().bold(), err.kind);
    eprintln!("{}", err.render(source).red());
    std::process::exit(1);
}
