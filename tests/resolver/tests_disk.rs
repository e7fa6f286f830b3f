//! The default real file system, against a temporary directory.

use std::fs;

use pretty_assertions::assert_eq;
use stylable::{Stylable, StylableConfig, StylableError, VerbatimNamespace};
use tempfile::TempDir;

fn project_dir(files: &[(&str, &str)]) -> TempDir {
    let dir = tempfile::tempdir().unwrap();
    for (name, source) in files {
        let path = dir.path().join(name);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(path, source).unwrap();
    }
    dir
}

fn stylable_for(dir: &TempDir) -> Stylable {
    Stylable::new(StylableConfig::new(dir.path()).with_namespace_resolver(VerbatimNamespace))
}

#[test]
fn test_transform_from_disk() {
    let dir = project_dir(&[
        (
            "src/app.st.css",
            ":import { -st-from: '../lib/card.st.css'; -st-default: Card; } .main { -st-extends: Card; } .main::title {}",
        ),
        ("lib/card.st.css", ".root {} .title {}"),
    ]);
    let stylable = stylable_for(&dir);
    let results = stylable.transform("src/app.st.css").unwrap();

    assert_eq!(results.exports.classes["main"], "app__main");
    assert!(results.css().contains(".app__main .card__title"));
}

#[test]
fn test_missing_entry_is_an_io_error() {
    let dir = project_dir(&[]);
    let stylable = stylable_for(&dir);

    let error = stylable.transform("nope.st.css").unwrap_err();
    assert!(matches!(error, StylableError::Io { .. }), "got {error:?}");
}

#[test]
fn test_default_namespace_is_hashed_and_stable() {
    let dir = project_dir(&[("button.st.css", ".root {}")]);
    let first = Stylable::new(StylableConfig::new(dir.path()))
        .transform("button.st.css")
        .unwrap();
    let second = Stylable::new(StylableConfig::new(dir.path()))
        .transform("button.st.css")
        .unwrap();

    assert!(first.exports.namespace.starts_with("button"));
    assert_ne!(first.exports.namespace, "button");
    assert_eq!(first.exports.namespace, second.exports.namespace);
}
