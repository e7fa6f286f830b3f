//! Vars, keyframes, custom properties and mixins across files.

use pretty_assertions::assert_eq;

use crate::helpers::assertions::*;
use crate::helpers::fixtures::{IMPORT_THEME, THEME};
use crate::helpers::project::Project;

#[test]
fn test_imported_vars_and_keyframes() {
    let source = format!("{IMPORT_THEME} .a {{ color: value(accent); animation: fade 2s; }}");
    let project = Project::new(&[("entry.st.css", &source), ("theme.st.css", THEME)]);
    let results = project.transform("entry.st.css");

    assert_eq!(declaration(&results, ".entry__a", "color").as_deref(), Some("red"));
    assert_eq!(
        declaration(&results, ".entry__a", "animation").as_deref(),
        Some("theme__fade 2s")
    );
    assert_no_diagnostics(&results.meta);
}

#[test]
fn test_theme_exports() {
    let project = Project::new(&[("theme.st.css", THEME)]);
    let exports = project.transform("theme.st.css").exports;

    assert_eq!(exports.st_vars["base"], "red");
    assert_eq!(exports.st_vars["accent"], "red");
    assert_eq!(exports.keyframes["fade"], "theme__fade");
    assert_eq!(exports.classes["panel"], "theme__panel");
}

#[test]
fn test_imported_custom_property_keeps_origin_namespace() {
    let project = Project::new(&[
        (
            "entry.st.css",
            ":import { -st-from: './tokens.st.css'; -st-named: --gap; } .a { margin: var(--gap); --own: 1px; }",
        ),
        ("tokens.st.css", ".root { --gap: 4px; }"),
    ]);
    let results = project.transform("entry.st.css");

    assert_eq!(
        declaration(&results, ".entry__a", "margin").as_deref(),
        Some("var(--tokens-gap)")
    );
    assert_eq!(declaration(&results, ".entry__a", "--entry-own").as_deref(), Some("1px"));
    assert_eq!(results.exports.vars["own"], "--entry-own");
}

#[test]
fn test_mixin_from_another_stylesheet() {
    let project = Project::new(&[
        (
            "entry.st.css",
            ":import { -st-from: './kit.st.css'; -st-named: card; } .a { -st-mixin: card(pad 8px); }",
        ),
        (
            "kit.st.css",
            ":vars { pad: 2px; } .card { padding: value(pad); } .card:hover { opacity: 0.5; }",
        ),
    ]);
    let results = project.transform("entry.st.css");

    assert_eq!(declaration(&results, ".entry__a", "padding").as_deref(), Some("8px"));
    assert_eq!(
        declaration(&results, ".entry__a:hover", "opacity").as_deref(),
        Some("0.5")
    );
}

#[test]
fn test_named_mixin_arguments_leave_other_vars_alone() {
    let project = Project::new(&[(
        "entry.st.css",
        ":vars { color1: red; color2: blue; color3: black; } \
         .y { a: value(color1); b: value(color2); c: value(color3); } \
         .x { -st-mixin: y(color1 green, color2 yellow); }",
    )]);
    let results = project.transform("entry.st.css");

    assert_eq!(declaration(&results, ".entry__x", "a").as_deref(), Some("green"));
    assert_eq!(declaration(&results, ".entry__x", "b").as_deref(), Some("yellow"));
    assert_eq!(declaration(&results, ".entry__x", "c").as_deref(), Some("black"));
    assert_eq!(declaration(&results, ".entry__y", "a").as_deref(), Some("red"));
}

#[test]
fn test_vars_cycle_across_files_is_reported() {
    let project = Project::new(&[
        (
            "entry.st.css",
            ":import { -st-from: './other.st.css'; -st-named: b; } :vars { a: value(b); } .x { color: value(a); }",
        ),
        (
            "other.st.css",
            ":import { -st-from: './entry.st.css'; -st-named: a; } :vars { b: value(a); }",
        ),
    ]);
    let results = project.transform("entry.st.css");

    assert_has_code(&results.meta, "ST1602");
}

#[test]
fn test_st_scope_and_layers() {
    let project = Project::new(&[(
        "entry.st.css",
        "@layer base; @st-scope .root { .item { color: red; } } .x { container-name: card; }",
    )]);
    let results = project.transform("entry.st.css");

    assert_eq!(
        rule_selectors(&results),
        vec![".entry__root .entry__item", ".entry__x"]
    );
    assert_eq!(results.exports.layers["base"], "entry__base");
    assert_eq!(
        declaration(&results, ".entry__x", "container-name").as_deref(),
        Some("entry__card")
    );
}
