//! What the symbol table records for each construct.

use std::path::{Path, PathBuf};

use pretty_assertions::assert_eq;
use stylable::semantic::{StateDef, StateParamType, Symbol, process};
use stylable::{SymbolNamespace, VerbatimNamespace};

fn analyze(source: &str) -> stylable::Meta {
    process(Path::new("/p/comp/entry.st.css"), source, &VerbatimNamespace).unwrap()
}

#[test]
fn test_import_record_fields() {
    let meta = analyze(
        ":import { -st-from: '../ui/button.st.css'; -st-default: Button; \
         -st-named: label as caption, keyframes(spin), --gap; }",
    );
    let record = &meta.imports[0];

    assert_eq!(record.request, "../ui/button.st.css");
    assert_eq!(record.context, PathBuf::from("/p/comp"));
    assert_eq!(record.default_name.as_deref(), Some("Button"));
    assert_eq!(record.named["caption"], "label");
    assert_eq!(record.keyframes["spin"], "spin");
    assert_eq!(record.custom_properties["--gap"], "--gap");
    assert!(record.resolved_path().is_none());
}

#[test]
fn test_imports_land_in_their_symbol_tables() {
    let meta = analyze(
        "@st-import Button, [caption, keyframes(spin), layer(base)] from \"./button.st.css\";",
    );

    assert!(matches!(
        meta.symbols.get(SymbolNamespace::Main, "Button"),
        Some(Symbol::Import(_))
    ));
    assert!(meta.symbols.get(SymbolNamespace::Main, "caption").is_some());
    assert!(meta.symbols.contains(SymbolNamespace::Keyframes, "spin"));
    assert!(meta.symbols.contains(SymbolNamespace::Layer, "base"));
}

#[test]
fn test_state_definitions() {
    let meta = analyze(
        ".root { -st-states: open, size(enum(s, m)) m, label(string), odd(\":nth-child(odd)\"); }",
    );
    let root = meta.root().unwrap();

    assert_eq!(root.states["open"], StateDef::Boolean);
    assert_eq!(
        root.states["size"],
        StateDef::Param {
            ty: StateParamType::Enum(vec!["s".into(), "m".into()]),
            default: Some("m".into()),
        }
    );
    assert_eq!(
        root.states["label"],
        StateDef::Param {
            ty: StateParamType::String,
            default: None,
        }
    );
    assert_eq!(root.states["odd"], StateDef::Mapped(":nth-child(odd)".into()));
}

#[test]
fn test_vars_and_local_names() {
    let meta = analyze(
        ":vars { gap: 4px; wide: calc(value(gap) * 2); } \
         @keyframes :global(spin) {} @layer theme, reset; .x { container-name: side; }",
    );

    assert_eq!(meta.symbols.var("wide").unwrap().value, "calc(value(gap) * 2)");
    let spin = meta.symbols.named(SymbolNamespace::Keyframes, "spin").unwrap();
    assert!(spin.global);
    let layers: Vec<&str> = meta
        .symbols
        .named_symbols(SymbolNamespace::Layer)
        .map(|layer| layer.name.as_str())
        .collect();
    assert_eq!(layers, vec!["theme", "reset"]);
    assert!(meta.symbols.contains(SymbolNamespace::Container, "side"));
}

#[test]
fn test_extends_compose_and_global_on_class() {
    let meta = analyze(
        ".a {} .b { -st-extends: a; -st-compose: a; } .c { -st-global: \".legacy\"; }",
    );

    let b = meta.symbols.class("b").unwrap();
    assert_eq!(b.extends.as_deref(), Some("a"));
    assert_eq!(b.compose, vec!["a"]);
    assert!(meta.symbols.class("c").unwrap().global.is_some());
}
