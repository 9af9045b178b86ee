//! Property-based tests for literal desugaring
//!
//! These tests use proptest to verify invariants across many randomly
//! generated literals, catching edge cases that hand-written tests might miss.

use colit::format::{FormatConfig, expand_source, reformat_source};
use proptest::prelude::*;

// =============================================================================
// Strategies
// =============================================================================

fn ints_strategy() -> impl Strategy<Value = Vec<u32>> {
    prop::collection::vec(0u32..10_000, 0..12)
}

fn entries_strategy() -> impl Strategy<Value = Vec<(String, u32)>> {
    prop::collection::vec(("[a-z]{1,6}", 0u32..100), 1..8)
}

fn sequence_source(declared: &str, elements: &[u32]) -> String {
    let items: Vec<String> = elements.iter().map(u32::to_string).collect();
    format!("val a: {declared} = [{}]", items.join(", "))
}

fn block(statements: &[String]) -> String {
    if statements.is_empty() {
        "{}".to_string()
    } else {
        format!("{{ {} }}", statements.join("; "))
    }
}

// =============================================================================
// Desugaring properties
// =============================================================================

proptest! {
    /// Property: a sequence literal becomes one `add` per element, in source order, with the element count as size
    #[test]
    fn sequence_adds_keep_source_order(elements in ints_strategy()) {
        let source = sequence_source("Set<Int>", &elements);
        let expanded = expand_source(&source).expect("literal checks");

        let adds: Vec<String> = elements.iter().map(|e| format!("add({e})")).collect();
        let expected = format!(
            "val a: Set<Int> = Set.buildFrom<Int>({}) {}\n",
            elements.len(),
            block(&adds)
        );
        prop_assert_eq!(expanded, expected);
    }

    /// Property: every dictionary entry becomes `add(key, value)` with the key first
    #[test]
    fn dictionary_adds_pass_key_before_value(entries in entries_strategy()) {
        let items: Vec<String> = entries.iter().map(|(k, v)| format!("\"{k}\": {v}")).collect();
        let source = format!("val m = [{}]", items.join(", "));
        let expanded = expand_source(&source).expect("literal checks");

        let adds: Vec<String> = entries.iter().map(|(k, v)| format!("add(\"{k}\", {v})")).collect();
        let expected = format!(
            "val m = Map.buildFrom<String, Int>({}) {}\n",
            entries.len(),
            block(&adds)
        );
        prop_assert_eq!(expanded, expected);
    }

    /// Property: the declared class decides which builder is called
    #[test]
    fn declared_class_decides_the_builder(elements in ints_strategy(), class in prop::sample::select(vec!["List", "Set", "MutableList"])) {
        let source = sequence_source(&format!("{class}<Int>"), &elements);
        let expanded = expand_source(&source).expect("literal checks");
        let call = format!("= {class}.buildFrom<Int>(");
        prop_assert!(expanded.contains(&call), "{}", expanded);
    }

    /// Property: printing an expansion and checking it again is a fixed point
    #[test]
    fn expansion_is_idempotent(elements in ints_strategy()) {
        let source = sequence_source("List<Int>", &elements);
        let once = expand_source(&source).expect("literal checks");
        let twice = expand_source(&once).expect("expansion checks");
        prop_assert_eq!(once, twice);
    }

    /// Property: reprinting unchecked literals round-trips
    #[test]
    fn reformat_round_trips_literals(elements in ints_strategy()) {
        let source = format!("{}\n", sequence_source("List<Int>", &elements));
        let printed = reformat_source(&source, FormatConfig::default()).expect("parses");
        prop_assert_eq!(printed, source);
    }
}
