//! Following symbols to the stylesheet that defines them.

use std::path::PathBuf;

use pretty_assertions::assert_eq;
use stylable::SymbolNamespace;

use crate::helpers::project::{Project, path};

fn project() -> Project {
    Project::new(&[
        (
            "entry.st.css",
            ":import { -st-from: './middle.st.css'; -st-default: Middle; -st-named: part; } \
             .a { -st-extends: Middle; } .part {}",
        ),
        (
            "middle.st.css",
            ":import { -st-from: './base.st.css'; -st-default: Base; -st-named: part; } \
             .root { -st-extends: Base; }",
        ),
        ("base.st.css", ".root {} .part {}"),
    ])
}

#[test]
fn test_origin_of_extended_class_crosses_files() {
    let project = project();
    let meta = project.process("entry.st.css");
    let symbol = meta
        .symbols
        .get(SymbolNamespace::Main, "a")
        .cloned()
        .unwrap();

    let origin = project
        .stylable
        .resolve_symbol_origin(&symbol, &meta)
        .unwrap()
        .unwrap();

    assert_eq!(origin.meta.source, path("base.st.css"));
    assert_eq!(origin.class().map(|class| class.name.as_str()), Some("root"));
}

#[test]
fn test_origin_of_reexported_name() {
    let project = project();
    let meta = project.process("entry.st.css");
    let symbol = meta
        .symbols
        .get(SymbolNamespace::Main, "part")
        .cloned()
        .unwrap();

    let origin = project
        .stylable
        .resolve_symbol_origin(&symbol, &meta)
        .unwrap()
        .unwrap();

    assert_eq!(origin.meta.source, PathBuf::from("/p/base.st.css"));
}

#[test]
fn test_local_symbol_is_its_own_origin() {
    let project = Project::new(&[("entry.st.css", ".a {}")]);
    let meta = project.process("entry.st.css");
    let symbol = meta.symbols.get(SymbolNamespace::Main, "a").cloned().unwrap();

    let origin = project
        .stylable
        .resolve_symbol_origin(&symbol, &meta)
        .unwrap()
        .unwrap();

    assert_eq!(origin.meta.source, path("entry.st.css"));
}
