//! CLI module for colit
//!
//! ## Commands
//!
//! - `check <file>` - Type check a file, resolving every collection literal
//! - `expand <file>` - Check a file and print it with every literal rewritten into its builder call
//! - `lex <file>` - Tokenize only (debug)
//! - `parse <file>` - Parse and reprint, or dump the AST (debug)
//!
//! ## Modules
//!
//! - `commands` - Command implementations
//! - `prelude` - Checker configuration from flags, prelude files and `COLIT_PRELUDE`
//!
//! ## Design
//!
//! The CLI uses clap for argument parsing with derive macros.
//! Command functions return `CliResult<T>` instead of calling `process::exit`.
//! Only the top-level `run()` function handles errors and exits.

// Enforce explicit error handling - no panicking in production code
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]

pub mod commands;
pub mod prelude;

use std::io;
use std::path::PathBuf;
use std::process;

use clap::{Args, Parser, Subcommand, ValueEnum};
use thiserror::Error;

// ============================================================================
// CLI Error handling
// ============================================================================

/// Exit code for CLI operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExitCode(pub i32);

impl ExitCode {
    pub const SUCCESS: ExitCode = ExitCode(0);
    pub const FAILURE: ExitCode = ExitCode(1);
    /// Invalid invocation or unreadable input.
    pub const USAGE: ExitCode = ExitCode(2);
}

/// Error type for CLI operations.
///
/// The CLI entry point catches these errors, prints them, and exits with [`CliError::exit_code`].
#[derive(Debug, Error)]
pub enum CliError {
    #[error("Cannot read '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("Source file '{path}' is too large ({size} bytes, max {max} bytes)")]
    TooLarge { path: PathBuf, size: u64, max: u64 },
    /// Prelude or builtin declarations failed to load; carries the rendered diagnostics.
    #[error("Failed to load declarations from '{unit}':\n{rendered}")]
    Prelude { unit: String, rendered: String },
    /// The input has errors; carries the rendered diagnostics.
    #[error("{0}")]
    Diagnostics(String),
}

impl CliError {
    pub fn exit_code(&self) -> ExitCode {
        match self {
            CliError::Io { .. } | CliError::TooLarge { .. } | CliError::Prelude { .. } => ExitCode::USAGE,
            CliError::Diagnostics(_) => ExitCode::FAILURE,
        }
    }
}

/// Result type for CLI operations.
pub type CliResult<T> = Result<T, CliError>;

const VERSION: &str = env!("CARGO_PKG_VERSION");

// ============================================================================
// Clap CLI definition
// ============================================================================

/// Collection literal resolution for the colit language
#[derive(Parser, Debug)]
#[command(name = "colit")]
#[command(version = VERSION)]
#[command(about = "Resolve and desugar collection literals", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Type check a file
    Check {
        #[arg(value_name = "FILE")]
        file: PathBuf,
        /// Output format for results and diagnostics
        #[arg(long, value_enum, default_value_t = OutputFormat::Human)]
        format: OutputFormat,
        #[command(flatten)]
        options: CheckOptions,
    },

    /// Check a file and print it with every collection literal rewritten
    Expand {
        #[arg(value_name = "FILE")]
        file: PathBuf,
        /// Spaces per indentation level
        #[arg(long, default_value_t = 4)]
        indent: usize,
        /// Print builder blocks one statement per line
        #[arg(long)]
        multiline: bool,
        #[command(flatten)]
        options: CheckOptions,
    },

    /// Tokenize only (debug)
    Lex {
        #[arg(value_name = "FILE")]
        file: PathBuf,
    },

    /// Parse and reprint a file (debug)
    Parse {
        #[arg(value_name = "FILE")]
        file: PathBuf,
        /// Dump the AST instead of reprinting
        #[arg(long)]
        ast: bool,
    },
}

/// Checker configuration shared by `check` and `expand`.
#[derive(Args, Debug, Clone, Default)]
pub struct CheckOptions {
    /// Do not load the standard prelude (no builders are visible unless declared)
    #[arg(long)]
    pub no_prelude: bool,
    /// Extra declaration file loaded before the input (repeatable)
    #[arg(long = "prelude", value_name = "FILE")]
    pub prelude: Vec<PathBuf>,
    /// Container class for sequence literals with no expected type
    #[arg(long, value_name = "CLASS")]
    pub default_sequence: Option<String>,
    /// Container class for dictionary literals with no expected type
    #[arg(long, value_name = "CLASS")]
    pub default_dictionary: Option<String>,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Human,
    Json,
}

// ============================================================================
// CLI entry point
// ============================================================================

/// Main CLI entry point.
///
/// This is the only place where `process::exit` is called. All command
/// implementations return `CliResult` and errors are handled here.
pub fn run() {
    let cli = Cli::parse();

    match execute(cli) {
        Ok(exit_code) => {
            if exit_code != ExitCode::SUCCESS {
                process::exit(exit_code.0);
            }
        }
        Err(e) => {
            eprintln!("{e}");
            process::exit(e.exit_code().0);
        }
    }
}

/// Execute the CLI command and return result.
fn execute(cli: Cli) -> CliResult<ExitCode> {
    match cli.command {
        Command::Check { file, format, options } => commands::check_file(&file, &options, format),
        Command::Expand {
            file,
            indent,
            multiline,
            options,
        } => {
            let config = crate::format::FormatConfig::new()
                .with_indent_width(indent)
                .with_inline_blocks(!multiline);
            commands::expand_file(&file, &options, config)
        }
        Command::Lex { file } => commands::lex_file(&file),
        Command::Parse { file, ast } => commands::parse_file(&file, ast),
    }
}

// ============================================================================
// Tests
// ============================================================================
