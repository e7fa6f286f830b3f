//! Import forms and how unresolved imports surface.

use pretty_assertions::assert_eq;
use stylable::{ExternalModule, ExternalModules, StylableError};

use crate::helpers::assertions::*;
use crate::helpers::fixtures::BUTTON;
use crate::helpers::project::Project;

#[test]
fn test_st_import_matches_pseudo_import() {
    let project = Project::new(&[
        (
            "entry.st.css",
            "@st-import Button, [label as caption] from \"./button.st.css\"; Button {} .caption {}",
        ),
        ("button.st.css", BUTTON),
    ]);
    let results = project.transform("entry.st.css");

    assert_eq!(rule_selectors(&results), vec![".button__root", ".button__label"]);
    assert_eq!(results.exports.classes["caption"], "button__label");
}

#[test]
fn test_package_request_walks_up_to_node_modules() {
    let project = Project::new(&[
        (
            "src/entry.st.css",
            ":import { -st-from: 'ui/button.st.css'; -st-default: Button; } Button {}",
        ),
        ("node_modules/ui/button.st.css", BUTTON),
    ]);
    let results = project.transform("src/entry.st.css");

    assert_eq!(rule_selectors(&results), vec![".button__root"]);
    assert_no_diagnostics(&results.meta);
}

#[test]
fn test_missing_file_is_a_hard_error() {
    let project = Project::new(&[(
        "entry.st.css",
        ":import { -st-from: './gone.st.css'; -st-default: Gone; } .a { -st-extends: Gone; }",
    )]);
    let error = project.stylable.transform("entry.st.css").unwrap_err();

    match error {
        StylableError::ModuleNotFound { request, .. } => assert_eq!(request, "./gone.st.css"),
        other => panic!("expected ModuleNotFound, got {other:?}"),
    }
}

#[test]
fn test_unused_missing_import_is_never_resolved() {
    let project = Project::new(&[(
        "entry.st.css",
        ":import { -st-from: './gone.st.css'; -st-default: Gone; } .a {}",
    )]);
    let results = project.transform("entry.st.css");

    assert_eq!(rule_selectors(&results), vec![".entry__a"]);
}

#[test]
fn test_unknown_named_symbol() {
    let project = Project::new(&[
        (
            "entry.st.css",
            ":import { -st-from: './button.st.css'; -st-named: nope; } .nope {}",
        ),
        ("button.st.css", BUTTON),
    ]);
    let results = project.transform("entry.st.css");

    assert_has_code(&results.meta, "ST0110");
    assert_eq!(rule_selectors(&results), vec![".entry__nope"]);
}

#[test]
fn test_registered_js_module_provides_formatter() {
    let external = ExternalModules::new();
    external.register(
        "/p/format.js",
        ExternalModule::new().with_formatter("px", |args: &[String]| {
            Ok(format!("{}px", args.join("")))
        }),
    );
    let project = Project::with_config(
        &[(
            "entry.st.css",
            ":import { -st-from: './format.js'; -st-named: px; } .a { width: px(12); }",
        )],
        |config| config.with_external_modules(external),
    );
    let results = project.transform("entry.st.css");

    assert_eq!(declaration(&results, ".entry__a", "width").as_deref(), Some("12px"));
}
