//! Assertions over transform output and diagnostics.

use stylable::{Meta, StylableResults};

/// Selectors of the top-level output rules, in order.
pub fn rule_selectors(results: &StylableResults) -> Vec<String> {
    output_rules(results)
        .map(|rule| rule.selector.clone())
        .collect()
}

/// Value of `prop` in the first output rule with exactly `selector`.
pub fn declaration(results: &StylableResults, selector: &str, prop: &str) -> Option<String> {
    output_rules(results)
        .filter(|rule| rule.selector == selector)
        .find_map(|rule| rule.declaration(prop).map(|decl| decl.value.clone()))
}

fn output_rules(results: &StylableResults) -> impl Iterator<Item = &stylable::parser::Rule> {
    results
        .meta
        .output_ast
        .iter()
        .flat_map(|ast| ast.rules())
}

/// Codes of every analysis and transform diagnostic.
pub fn diagnostic_codes(meta: &Meta) -> Vec<&'static str> {
    meta.all_diagnostics().map(|diagnostic| diagnostic.code).collect()
}

pub fn assert_no_diagnostics(meta: &Meta) {
    let found: Vec<String> = meta.all_diagnostics().map(|d| d.format()).collect();
    assert!(
        found.is_empty(),
        "Expected no diagnostics for {}, got:\n{}",
        meta.source.display(),
        found.join("\n")
    );
}

pub fn assert_has_code(meta: &Meta, code: &str) {
    let found = diagnostic_codes(meta);
    assert!(
        found.contains(&code),
        "Expected {code} for {}, got {found:?}",
        meta.source.display()
    );
}
