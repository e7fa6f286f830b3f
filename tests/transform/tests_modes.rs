//! Output options carried by the configuration.

use pretty_assertions::assert_eq;
use stylable::Mode;
use stylable::parser::Node;

use crate::helpers::assertions::*;
use crate::helpers::project::Project;

#[test]
fn test_development_mode_comments_each_rule() {
    let project = Project::with_config(&[("entry.st.css", ".a {} .b .c {}")], |config| {
        config.with_mode(Mode::Development)
    });
    let results = project.transform("entry.st.css");
    let output = results.meta.output_ast.as_ref().unwrap();

    let comments: Vec<&str> = output
        .nodes
        .iter()
        .filter_map(|node| match node {
            Node::Comment(comment) => Some(comment.text.as_str()),
            _ => None,
        })
        .collect();
    assert_eq!(comments, vec![" .a ", " .b .c "]);
    assert_eq!(rule_selectors(&results), vec![".entry__a", ".entry__b .entry__c"]);
}

#[test]
fn test_production_mode_has_no_comments() {
    let project = Project::new(&[("entry.st.css", ".a {}")]);
    let results = project.transform("entry.st.css");
    let output = results.meta.output_ast.as_ref().unwrap();

    assert!(!output.nodes.iter().any(|node| matches!(node, Node::Comment(_))));
}

#[test]
fn test_custom_delimiter() {
    let project = Project::with_config(&[("entry.st.css", ".a {} .b { -st-compose: a; }")], |config| {
        config.with_delimiter("_")
    });
    let results = project.transform("entry.st.css");

    assert_eq!(rule_selectors(&results), vec![".entry_a", ".entry_b"]);
    assert_eq!(results.exports.classes["b"], "entry_b entry_a");
}

#[test]
fn test_exports_cx_uses_namespace_for_states() {
    let project = Project::new(&[(
        "entry.st.css",
        ".root { -st-states: open, tone(string); }",
    )]);
    let exports = project.transform("entry.st.css").exports;

    assert_eq!(
        exports.cx("root", &[("open", None), ("tone", Some("dark"))]),
        "entry__root entry--open entry---tone-4-dark"
    );
}
