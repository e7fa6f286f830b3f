//! Style depth over real import graphs.

use std::path::PathBuf;

use rstest::rstest;
use stylable::{DepthCalculator, StylableError, StylesheetGraph};

use crate::helpers::project::{Project, path};

fn chain_project() -> Project {
    Project::new(&[
        ("base.st.css", ".root {}"),
        (
            "button.st.css",
            ":import { -st-from: './base.st.css'; -st-default: Base; } .root { -st-extends: Base; }",
        ),
        (
            "page.st.css",
            ":import { -st-from: './button.st.css'; -st-default: Button; } Button {}",
        ),
        ("theme.st.css", ":vars { c: red; }"),
        ("cycle-a.st.css", ":import { -st-from: './cycle-b.st.css'; -st-named: x; }"),
        ("cycle-b.st.css", ":import { -st-from: './cycle-a.st.css'; -st-named: y; }"),
    ])
}

#[rstest]
#[case("base.st.css", 1)]
#[case("button.st.css", 2)]
#[case("page.st.css", 3)]
#[case("theme.st.css", 1)]
fn test_depth_follows_imports(#[case] file: &str, #[case] expected: usize) {
    let project = chain_project();
    assert_eq!(project.stylable.depth(file).unwrap(), expected);
}

#[test]
fn test_import_cycle_terminates() {
    let project = chain_project();
    let depth = project.stylable.depth("cycle-a.st.css").unwrap();
    assert_eq!(depth, 2);
}

#[test]
fn test_view_folds_into_its_stylesheet() {
    let project = chain_project();
    let graph = StylesheetGraph::new(project.stylable.resolver()).with_view(
        path("base.tsx"),
        vec![path("base.st.css"), path("theme.st.css")],
    );
    let mut calculator = DepthCalculator::new(graph);

    // base.tsx imports theme (depth 1), so base sits one level above it.
    assert_eq!(calculator.depth(&path("base.st.css")).unwrap(), 2);
    assert_eq!(calculator.depth(&path("page.st.css")).unwrap(), 4);
}

#[test]
fn test_two_views_for_one_stylesheet_is_an_error() {
    let project = chain_project();
    let graph = StylesheetGraph::new(project.stylable.resolver())
        .with_view(path("base.tsx"), vec![path("base.st.css")])
        .with_view(path("base.jsx"), vec![path("base.st.css")]);
    let mut calculator = DepthCalculator::new(graph);

    let error = calculator.depth(&path("base.st.css")).unwrap_err();
    match error {
        StylableError::ViewConflict { views, .. } => assert_eq!(views.len(), 2),
        other => panic!("expected a view conflict, got {other:?}"),
    }
}

#[test]
fn test_depth_of_unregistered_module_is_zero() {
    let project = chain_project();
    let graph = StylesheetGraph::new(project.stylable.resolver());
    let mut calculator = DepthCalculator::new(graph);

    assert_eq!(calculator.depth(&PathBuf::from("/p/widget.tsx")).unwrap(), 0);
}
