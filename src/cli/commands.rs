//! CLI command implementations
//!
//! Every command reads one source file, runs the frontend up to the phase it needs and prints the result to
//! stdout. Diagnostics are rendered through `miette` and returned as [`CliError::Diagnostics`].

use std::fs;
use std::path::Path;

use serde_json::{Value, json};

use super::prelude::{build_config, checker_for};
use super::{CheckOptions, CliError, CliResult, ExitCode, OutputFormat};
use crate::format::{FormatConfig, format_program};
use crate::frontend::ast::Program;
use crate::frontend::diagnostics::{CompileError, line_col};
use crate::frontend::typechecker::TypeChecker;
use crate::frontend::{lexer, parser};

/// Maximum source file size (100 MB)
///
/// Files larger than this are rejected to prevent out-of-memory conditions
/// during checking.
const MAX_SOURCE_SIZE: u64 = 100 * 1024 * 1024;

/// Read source file contents.
///
/// ## Errors
///
/// Returns an error if:
/// - The file cannot be read (I/O error)
/// - The file exceeds `MAX_SOURCE_SIZE` (100 MB)
pub fn read_source(path: &Path) -> CliResult<String> {
    let io_error = |source| CliError::Io {
        path: path.to_path_buf(),
        source,
    };
    let metadata = fs::metadata(path).map_err(io_error)?;
    if metadata.len() > MAX_SOURCE_SIZE {
        return Err(CliError::TooLarge {
            path: path.to_path_buf(),
            size: metadata.len(),
            max: MAX_SOURCE_SIZE,
        });
    }
    fs::read_to_string(path).map_err(io_error)
}

/// Render errors against their source, one `miette` report per error.
pub fn render_errors(file_name: &str, source: &str, errors: Vec<CompileError>) -> String {
    let reports: Vec<String> = errors
        .into_iter()
        .map(|err| format!("{:?}", miette::Report::new(err.with_source(file_name, source))))
        .collect();
    reports.join("\n").trim_end().to_string()
}

/// Lex and display tokens.
pub fn lex_file(path: &Path) -> CliResult<ExitCode> {
    let source = read_source(path)?;
    let tokens = lexer::lex(&source).map_err(|errs| diagnostics_error(path, &source, errs))?;
    for tok in &tokens {
        println!("{tok:?}");
    }
    Ok(ExitCode::SUCCESS)
}

/// Parse a file and reprint it, or dump its AST.
pub fn parse_file(path: &Path, dump_ast: bool) -> CliResult<ExitCode> {
    let source = read_source(path)?;
    let program = parser::parse_source(&source).map_err(|errs| diagnostics_error(path, &source, errs))?;
    if dump_ast {
        println!("{program:#?}");
    } else {
        print!("{}", format_program(&program, FormatConfig::default()));
    }
    Ok(ExitCode::SUCCESS)
}

/// Type check a file.
///
/// Human output lists the type of every `val`; JSON output is a single object with the val types, the class
/// chosen for every literal and the diagnostics. In JSON mode errors do not produce a [`CliError`]: the report is
/// printed and the exit code is [`ExitCode::FAILURE`].
pub fn check_file(path: &Path, options: &CheckOptions, format: OutputFormat) -> CliResult<ExitCode> {
    let source = read_source(path)?;
    let mut checker = checker_for(build_config(options)?)?;
    let result = check_into(&mut checker, &source);

    match format {
        OutputFormat::Human => match result {
            Ok(_) => {
                for (name, ty) in &checker.type_info().val_types {
                    println!("{name}: {}", checker.symbols().display(ty));
                }
                println!("✓ Type check passed!");
                Ok(ExitCode::SUCCESS)
            }
            Err(errs) => Err(diagnostics_error(path, &source, errs)),
        },
        OutputFormat::Json => {
            let errors = result.err().unwrap_or_default();
            let report = json_report(&path.display().to_string(), &source, &checker, &errors);
            println!("{report:#}");
            Ok(if errors.is_empty() { ExitCode::SUCCESS } else { ExitCode::FAILURE })
        }
    }
}

/// Check a file and print it with every collection literal rewritten into its builder call.
pub fn expand_file(path: &Path, options: &CheckOptions, config: FormatConfig) -> CliResult<ExitCode> {
    let source = read_source(path)?;
    let mut checker = checker_for(build_config(options)?)?;
    let program = check_into(&mut checker, &source).map_err(|errs| diagnostics_error(path, &source, errs))?;
    print!("{}", format_program(&program, config));
    Ok(ExitCode::SUCCESS)
}

fn check_into(checker: &mut TypeChecker, source: &str) -> Result<Program, Vec<CompileError>> {
    let mut program = parser::parse_source(source)?;
    checker.check_program(&mut program)?;
    Ok(program)
}

fn diagnostics_error(path: &Path, source: &str, errors: Vec<CompileError>) -> CliError {
    CliError::Diagnostics(render_errors(&path.display().to_string(), source, errors))
}

/// Machine-readable result of `colit check --format json`.
pub fn json_report(file_name: &str, source: &str, checker: &TypeChecker, errors: &[CompileError]) -> Value {
    let info = checker.type_info();
    let vals: Vec<Value> = info
        .val_types
        .iter()
        .map(|(name, ty)| json!({ "name": name, "type": checker.symbols().display(ty).to_string() }))
        .collect();
    let literals: Vec<Value> = info
        .literal_choices
        .iter()
        .map(|(id, class)| json!({ "literal": id.0, "class": checker.symbols().class(*class).name }))
        .collect();
    let diagnostics: Vec<Value> = errors
        .iter()
        .map(|e| {
            let (line, column) = line_col(source, e.span.start);
            json!({
                "kind": e.kind.to_string(),
                "code": e.code,
                "message": e.message,
                "line": line,
                "column": column,
                "notes": e.notes,
                "hints": e.hints,
            })
        })
        .collect();
    json!({
        "file": file_name,
        "ok": errors.is_empty(),
        "vals": vals,
        "literals": literals,
        "diagnostics": diagnostics,
    })
}
