//! colit source printer
//!
//! Prints a program back as colit source. Used by `colit expand` to show a checked program with every collection
//! literal replaced by the builder call chosen for it.

mod config;
mod formatter;
mod writer;

pub use config::FormatConfig;
pub use formatter::Formatter;

use crate::frontend::ast::Program;
use crate::frontend::diagnostics::CompileError;
use crate::frontend::{parser, typechecker};

/// Print a program with the given settings
pub fn format_program(program: &Program, config: FormatConfig) -> String {
    Formatter::new(config).format(program)
}

/// Check `source` with the default checker configuration and print the rewritten program
pub fn expand_source(source: &str) -> Result<String, Vec<CompileError>> {
    let (program, _) = typechecker::check_source(source)?;
    Ok(format_program(&program, FormatConfig::default()))
}

/// Parse and reprint `source` without checking it
pub fn reformat_source(source: &str, config: FormatConfig) -> Result<String, Vec<CompileError>> {
    let program = parser::parse_source(source)?;
    Ok(format_program(&program, config))
}
