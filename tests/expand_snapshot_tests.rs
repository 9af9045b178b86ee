//! Snapshot tests for `expand`: checked programs printed with every literal desugared.
//!
//! Run with: `cargo test --test expand_snapshot_tests`
//! Review changes: `cargo insta review`

use colit::format::{FormatConfig, expand_source, format_program};
use colit::frontend::config::CheckConfig;
use colit::frontend::parser;
use colit::frontend::typechecker::TypeChecker;

fn expand(source: &str) -> String {
    expand_source(source)
        .unwrap_or_else(|errs| panic!("expected {source:?} to check, got {errs:#?}"))
        .trim_end()
        .to_string()
}

#[test]
fn test_declared_set() {
    insta::assert_snapshot!(expand("val a: Set<Int> = [1, 2, 3]"), @"val a: Set<Int> = Set.buildFrom<Int>(3) { add(1); add(2); add(3) }");
}

#[test]
fn test_default_list() {
    insta::assert_snapshot!(expand("val a = [1, 2.5]"), @"val a = List.buildFrom<Number>(2) { add(1); add(2.5) }");
}

#[test]
fn test_dictionary() {
    insta::assert_snapshot!(expand(r#"val m = ["a": 1, "b": 2]"#), @r#"val m = Map.buildFrom<String, Int>(2) { add("a", 1); add("b", 2) }"#);
}

#[test]
fn test_empty_literals() {
    insta::assert_snapshot!(expand("val e = []"), @"val e = List.buildFrom<Nothing>(0) {}");
    insta::assert_snapshot!(expand("val s: Set<String> = []"), @"val s: Set<String> = Set.buildFrom<String>(0) {}");
}

#[test]
fn test_nested_literals() {
    insta::assert_snapshot!(
        expand("val n = [[1], [2, 3]]"),
        @"val n = List.buildFrom<List<Int>>(2) { add(List.buildFrom<Int>(1) { add(1) }); add(List.buildFrom<Int>(2) { add(2); add(3) }) }"
    );
}

#[test]
fn test_nested_literals_with_declared_element_class() {
    insta::assert_snapshot!(
        expand("val n: List<Set<Int>> = [[1], [2, 3]]"),
        @"val n: List<Set<Int>> = List.buildFrom<Set<Int>>(2) { add(Set.buildFrom<Int>(1) { add(1) }); add(Set.buildFrom<Int>(2) { add(2); add(3) }) }"
    );
}

#[test]
fn test_literal_argument() {
    insta::assert_snapshot!(expand("fun takes(xs: Set<Int>): Unit\nval r = takes([1, 2])"), @r"
    fun takes(xs: Set<Int>): Unit
    val r = takes(Set.buildFrom<Int>(2) { add(1); add(2) })
    ");
}

#[test]
fn test_multiline_blocks() {
    let mut program = parser::parse_source("val a: Set<Int> = [1, 2]").expect("parser failed");
    let mut checker = TypeChecker::with_config(CheckConfig::default()).expect("prelude loads");
    checker.check_program(&mut program).expect("checks");
    let printed = format_program(&program, FormatConfig::new().with_inline_blocks(false).with_indent_width(2));
    insta::assert_snapshot!(printed.trim_end(), @r"
    val a: Set<Int> = Set.buildFrom<Int>(2) {
      add(1)
      add(2)
    }
    ");
}
