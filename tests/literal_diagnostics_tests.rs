//! Diagnostics-focused tests for literal resolution.
//!
//! These tests are "frontend only": they parse and check a program and assert on the reported errors, their codes
//! and where they point.

use colit::cli::commands::render_errors;
use colit::frontend::config::CheckConfig;
use colit::frontend::diagnostics::{CompileError, ErrorKind, line_col};
use colit::frontend::parser::{self, MAX_NESTING_DEPTH};
use colit::frontend::typechecker::{TypeChecker, check_source};

const NO_BUILDERS: &str = "NoBuildersForCollectionLiteralFound";
const CANT_CHOOSE: &str = "CantChooseBuilder";

fn typecheck_errors_with(config: CheckConfig, src: &str) -> Vec<CompileError> {
    let mut checker = TypeChecker::with_config(config).expect("declarations load");
    let mut program = parser::parse_source(src).expect("parser failed");
    match checker.check_program(&mut program) {
        Ok(()) => vec![],
        Err(errs) => errs,
    }
}

fn typecheck_errors(src: &str) -> Vec<CompileError> {
    typecheck_errors_with(CheckConfig::default(), src)
}

#[test]
fn every_failed_literal_is_reported() {
    let src = "val a = [1]\nval b = [\"k\": 2]\n";
    let errs = typecheck_errors_with(CheckConfig::default().with_prelude(false), src);
    assert_eq!(errs.len(), 2, "{errs:#?}");
    assert!(errs.iter().all(|e| e.code == Some(NO_BUILDERS)));
    assert_eq!(line_col(src, errs[0].span.start), (1, 9));
    assert_eq!(line_col(src, errs[1].span.start), (2, 9));
}

#[test]
fn supertype_without_builder_names_the_class() {
    let errs = typecheck_errors("val c: Collection<Int> = [1, 2]");
    assert_eq!(errs.len(), 1, "{errs:#?}");
    assert_eq!(errs[0].code, Some(NO_BUILDERS));
    assert_eq!(
        errs[0].message,
        "No builders for collection literal found for class 'Collection'"
    );
}

#[test]
fn non_collection_expected_type() {
    let errs = typecheck_errors("val n: Int = [1]");
    assert_eq!(errs.len(), 1, "{errs:#?}");
    assert_eq!(errs[0].message, "No builders for collection literal found for class 'Int'");
}

#[test]
fn dictionary_literal_for_a_sequence_class() {
    let errs = typecheck_errors("val s: Set<Int> = [1: 2]");
    assert_eq!(errs.len(), 1, "{errs:#?}");
    assert_eq!(errs[0].message, "No builders for collection literal found for class 'Set'");
}

#[test]
fn intersection_of_two_buildable_classes_cannot_choose() {
    let errs = typecheck_errors("val a: List<Int> & Set<Int> = [1]");
    assert_eq!(errs.len(), 1, "{errs:#?}");
    assert_eq!(errs[0].code, Some(CANT_CHOOSE));
}

#[test]
fn undeclared_default_container() {
    let config = CheckConfig::default().with_default_sequence_container("Deque");
    let errs = typecheck_errors_with(config, "val a = [1]");
    assert_eq!(errs.len(), 1, "{errs:#?}");
    assert_eq!(errs[0].code, Some(NO_BUILDERS));
    assert_eq!(errs[0].message, "No builders for collection literal found");
    assert!(
        errs[0].notes.iter().any(|n| n.contains("'Deque' is not a declared class")),
        "{:?}",
        errs[0].notes
    );
}

#[test]
fn element_errors_are_reported() {
    let errs = typecheck_errors("val a = [foo(1), 2]");
    assert!(
        errs.iter().any(|e| e.message == "Unresolved reference 'foo'"),
        "{errs:#?}"
    );
}

#[test]
fn rendered_diagnostic_carries_code_and_file() {
    let src = "val a: List<Int> & Set<Int> = [1]\n";
    let errs = typecheck_errors(src);
    let rendered = render_errors("inter.colit", src, errs);
    assert!(rendered.contains("colit::CantChooseBuilder"), "{rendered}");
    assert!(rendered.contains("inter.colit"), "{rendered}");
}

#[test]
fn deep_nesting_is_a_syntax_error_not_a_crash() {
    let nested = |depth: usize| format!("val a = {}1{}", "[".repeat(depth), "]".repeat(depth));
    assert!(check_source(&nested(MAX_NESTING_DEPTH - 1)).is_ok());

    let errs = check_source(&nested(200)).expect_err("nesting limit");
    assert_eq!(errs.len(), 1, "{errs:#?}");
    assert_eq!(errs[0].kind, ErrorKind::Syntax);
    assert_eq!(line_col(&nested(200), errs[0].span.start), (1, 9 + MAX_NESTING_DEPTH));
}
