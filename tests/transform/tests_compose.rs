//! `-st-compose` in the export map.

use pretty_assertions::assert_eq;

use crate::helpers::assertions::*;
use crate::helpers::project::Project;

fn class_exports(project: &Project, name: &str) -> Vec<(String, String)> {
    project
        .transform(name)
        .exports
        .classes
        .into_iter()
        .collect()
}

#[test]
fn test_local_compose_lists_dependencies_after_dependents() {
    let project = Project::new(&[("entry.st.css", ".a {} .b { -st-compose: a; }")]);

    assert_eq!(
        class_exports(&project, "entry.st.css"),
        vec![
            ("root".to_string(), "entry__root".to_string()),
            ("a".to_string(), "entry__a".to_string()),
            ("b".to_string(), "entry__b entry__a".to_string()),
        ]
    );
}

#[test]
fn test_extends_is_not_part_of_the_export() {
    let project = Project::new(&[(
        "entry.st.css",
        ".base {} .a { -st-extends: base; } .b { -st-extends: base; -st-compose: a; }",
    )]);

    assert_eq!(
        class_exports(&project, "entry.st.css"),
        vec![
            ("root".to_string(), "entry__root".to_string()),
            ("base".to_string(), "entry__base".to_string()),
            ("a".to_string(), "entry__a".to_string()),
            ("b".to_string(), "entry__b entry__a".to_string()),
        ]
    );
}

#[test]
fn test_compose_follows_imports_transitively() {
    let project = Project::new(&[
        (
            "entry.st.css",
            ":import { -st-from: './inner.st.css'; -st-named: c; } .b { -st-compose: c; }",
        ),
        (
            "inner.st.css",
            ":import { -st-from: './deep.st.css'; -st-named: d; } .c { -st-compose: d; }",
        ),
        ("deep.st.css", ".d {}"),
    ]);
    let results = project.transform("entry.st.css");

    assert_eq!(results.exports.classes["b"], "entry__b inner__c deep__d");
}

#[test]
fn test_compose_of_global_class() {
    let project = Project::new(&[(
        "entry.st.css",
        ".reset { -st-global: \".normalize\"; } .page { -st-compose: reset; }",
    )]);
    let results = project.transform("entry.st.css");

    assert_eq!(results.exports.classes["page"], "entry__page normalize");
}

#[test]
fn test_compose_cycle_terminates_with_warning() {
    let project = Project::new(&[(
        "entry.st.css",
        ".a { -st-compose: b; } .b { -st-compose: c; } .c { -st-compose: a; }",
    )]);
    let results = project.transform("entry.st.css");

    assert_eq!(results.exports.classes["a"], "entry__a entry__b entry__c");
    assert_has_code(&results.meta, "ST0307");
}

#[test]
fn test_unknown_compose_target_is_a_warning() {
    let project = Project::new(&[("entry.st.css", ".a { -st-compose: missing; }")]);
    let results = project.transform("entry.st.css");

    assert_has_code(&results.meta, "ST0306");
    assert_eq!(results.exports.classes["a"], "entry__a");
}
