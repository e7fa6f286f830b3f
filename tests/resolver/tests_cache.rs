//! Cache reuse and invalidation by modification time.

use std::rc::Rc;

use pretty_assertions::assert_eq;

use crate::helpers::fixtures::{BUTTON, IMPORT_BUTTON};
use crate::helpers::project::Project;

#[test]
fn test_unchanged_file_is_served_from_cache() {
    let project = Project::new(&[("entry.st.css", ".a {}")]);

    let first = project.process("entry.st.css");
    let reads = project.fs.read_count();
    let second = project.process("entry.st.css");

    assert!(Rc::ptr_eq(&first, &second));
    assert_eq!(reads, 1);
    assert_eq!(project.fs.read_count(), 1);
}

#[test]
fn test_repeated_transforms_are_identical() {
    let source = format!("{IMPORT_BUTTON} .a {{ -st-extends: Button; }} .a::label {{}}");
    let project = Project::new(&[("entry.st.css", &source), ("button.st.css", BUTTON)]);

    let first = project.transform("entry.st.css");
    let reads = project.fs.read_count();
    let second = project.transform("entry.st.css");

    assert_eq!(first.css(), second.css());
    assert_eq!(first.exports, second.exports);
    assert_eq!(project.fs.read_count(), reads, "second pass must not re-read files");
}

#[test]
fn test_touch_forces_exactly_one_reread() {
    let project = Project::new(&[("entry.st.css", ".a {}")]);

    let first = project.process("entry.st.css");
    let reads = project.fs.read_count();
    project.touch("entry.st.css");
    let second = project.process("entry.st.css");
    let third = project.process("entry.st.css");

    assert!(!Rc::ptr_eq(&first, &second));
    assert!(Rc::ptr_eq(&second, &third));
    assert_eq!(project.fs.read_count(), reads + 1);
}

#[test]
fn test_rewritten_dependency_is_picked_up() {
    let project = Project::new(&[
        (
            "entry.st.css",
            ":import { -st-from: './theme.st.css'; -st-named: color; } .a { color: value(color); }",
        ),
        ("theme.st.css", ":vars { color: red; }"),
    ]);
    let before = project.transform("entry.st.css");
    project.write("theme.st.css", ":vars { color: blue; }");
    let after = project.transform("entry.st.css");

    assert!(before.css().contains("color: red"));
    assert!(after.css().contains("color: blue"));
}

#[test]
fn test_virtual_stylesheet_is_never_read() {
    let project = Project::new(&[]);

    let meta = project
        .stylable
        .add_virtual("virtual.st.css", ".a {}")
        .unwrap();
    let processed = project.process("virtual.st.css");

    assert!(Rc::ptr_eq(&meta, &processed));
    assert_eq!(project.fs.read_count(), 0);
    assert_eq!(project.transform("virtual.st.css").exports.classes["a"], "virtual__a");
}
