//! Every diagnostic code the compiler can report.
//!
//! A code must identify exactly one problem. The `const` assertion below
//! fails the build when two features register the same code.

use crate::semantic::features::{
    classes, codes as common, containers, custom_properties, custom_selectors, elements, global,
    imports, keyframes, layers, mixins, namespace, pseudo_elements, scope, states, values, vars,
};

pub const ALL_CODES: &[&[&str]] = &[
    common::ALL,
    imports::codes::ALL,
    namespace::codes::ALL,
    classes::codes::ALL,
    elements::codes::ALL,
    vars::codes::ALL,
    keyframes::codes::ALL,
    layers::codes::ALL,
    containers::codes::ALL,
    custom_properties::codes::ALL,
    custom_selectors::codes::ALL,
    scope::codes::ALL,
    mixins::codes::ALL,
    states::codes::ALL,
    pseudo_elements::codes::ALL,
    global::codes::ALL,
    values::codes::ALL,
];

const _: () = assert!(codes_are_unique(ALL_CODES), "duplicate diagnostic code");

const fn str_eq(a: &str, b: &str) -> bool {
    let (a, b) = (a.as_bytes(), b.as_bytes());
    if a.len() != b.len() {
        return false;
    }
    let mut i = 0;
    while i < a.len() {
        if a[i] != b[i] {
            return false;
        }
        i += 1;
    }
    true
}

/// No code appears twice across all tables.
pub const fn codes_are_unique(tables: &[&[&str]]) -> bool {
    let mut t1 = 0;
    while t1 < tables.len() {
        let mut c1 = 0;
        while c1 < tables[t1].len() {
            let mut t2 = t1;
            while t2 < tables.len() {
                let mut c2 = if t2 == t1 { c1 + 1 } else { 0 };
                while c2 < tables[t2].len() {
                    if str_eq(tables[t1][c1], tables[t2][c2]) {
                        return false;
                    }
                    c2 += 1;
                }
                t2 += 1;
            }
            c1 += 1;
        }
        t1 += 1;
    }
    true
}

/// Iterate all registered codes.
pub fn all_codes() -> impl Iterator<Item = &'static str> {
    ALL_CODES.iter().flat_map(|table| table.iter().copied())
}
