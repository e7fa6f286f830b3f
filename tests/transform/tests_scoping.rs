//! Selector scoping of local and imported symbols.

use pretty_assertions::assert_eq;

use crate::helpers::assertions::*;
use crate::helpers::fixtures::{BUTTON, IMPORT_BUTTON};
use crate::helpers::project::Project;

#[test]
fn test_local_classes_get_namespace_prefix() {
    let project = Project::new(&[("entry.st.css", ".root .title {} .title > .icon:hover {}")]);
    let results = project.transform("entry.st.css");

    assert_eq!(
        rule_selectors(&results),
        vec![
            ".entry__root .entry__title",
            ".entry__title > .entry__icon:hover",
        ]
    );
    assert_eq!(results.exports.namespace, "entry");
    assert_no_diagnostics(&results.meta);
}

#[test]
fn test_declared_namespace_wins_over_file_name() {
    let project = Project::new(&[("entry.st.css", "@st-namespace \"Gallery\"; .item {}")]);
    let results = project.transform("entry.st.css");

    assert_eq!(rule_selectors(&results), vec![".Gallery__item"]);
    assert_eq!(results.exports.classes["item"], "Gallery__item");
}

#[test]
fn test_imported_element_and_its_parts() {
    let source = format!("{IMPORT_BUTTON} Button {{}} Button::label {{}} .label {{}}");
    let project = Project::new(&[("entry.st.css", &source), ("button.st.css", BUTTON)]);
    let results = project.transform("entry.st.css");

    assert_eq!(
        rule_selectors(&results),
        vec![
            ".button__root",
            ".button__root .button__label",
            ".button__label",
        ]
    );
    assert_eq!(results.exports.classes["label"], "button__label");
}

#[test]
fn test_imported_element_states() {
    let source = format!("{IMPORT_BUTTON} Button:pressed {{}} Button:size(large) {{}}");
    let project = Project::new(&[("entry.st.css", &source), ("button.st.css", BUTTON)]);
    let results = project.transform("entry.st.css");

    assert_eq!(
        rule_selectors(&results),
        vec![
            ".button__root.button--pressed",
            ".button__root.button---size-5-large",
        ]
    );
}

#[test]
fn test_extends_exposes_parts_and_states_of_base() {
    let source = format!(
        "{IMPORT_BUTTON} .cta {{ -st-extends: Button; }} .cta::label {{}} .cta:pressed {{}}"
    );
    let project = Project::new(&[("entry.st.css", &source), ("button.st.css", BUTTON)]);
    let results = project.transform("entry.st.css");

    let selectors = rule_selectors(&results);
    assert!(selectors.contains(&".entry__cta .button__label".to_string()));
    assert!(selectors.contains(&".entry__cta.button--pressed".to_string()));
}

#[test]
fn test_global_classes_are_left_alone() {
    let project = Project::new(&[(
        "entry.st.css",
        ":global(.theme-dark) .panel {} .legacy { -st-global: \".old-panel\"; }",
    )]);
    let results = project.transform("entry.st.css");

    assert_eq!(rule_selectors(&results), vec![".theme-dark .entry__panel", ".old-panel"]);
    assert_eq!(results.exports.classes["legacy"], "old-panel");
    assert!(results.meta.globals.contains("theme-dark"));
}

#[test]
fn test_global_selector_and_directive_register_every_class() {
    let project = Project::new(&[(
        "entry.st.css",
        ":global(.c .d) {} .x { -st-global: '.a .b'; }",
    )]);
    let results = project.transform("entry.st.css");

    assert_eq!(rule_selectors(&results), vec![".c .d", ".a .b"]);
    let mut globals: Vec<_> = results.meta.globals.iter().cloned().collect();
    globals.sort();
    assert_eq!(globals, vec!["a", "b", "c", "d"]);
}

#[test]
fn test_css_text_contains_scoped_rules() {
    let project = Project::new(&[("entry.st.css", ".title { color: red; }")]);
    let css = project.transform("entry.st.css").css();

    assert!(css.contains(".entry__title"), "unexpected output: {css}");
    assert!(css.contains("color: red"), "unexpected output: {css}");
}
