use std::path::Path;
use std::rc::Rc;

use pretty_assertions::assert_eq;

use super::*;
use crate::namespace::VerbatimNamespace;
use crate::parser::Node;
use crate::resolver::{ExternalModule, ExternalModules, MemoryFileSystem, MixinEntry, NodeModuleResolver};
use crate::semantic::features::{classes, custom_selectors, mixins, states, values as value_codes};

const ENTRY: &str = "/p/entry.st.css";

fn resolver_with(files: &[(&str, &str)], external: ExternalModules) -> StylableResolver {
    let fs = Rc::new(MemoryFileSystem::with_files(files.iter().copied()));
    StylableResolver::new(
        fs,
        Rc::new(VerbatimNamespace),
        Rc::new(NodeModuleResolver),
        Rc::new(external),
    )
}

fn run(files: &[(&str, &str)]) -> TransformResult {
    run_with(files, ExternalModules::new(), &TransformOptions::default())
}

fn run_with(files: &[(&str, &str)], external: ExternalModules, options: &TransformOptions) -> TransformResult {
    let resolver = resolver_with(files, external);
    let meta = resolver.process(Path::new(ENTRY)).unwrap();
    transform(&resolver, meta, options).unwrap()
}

fn entry(source: &str) -> TransformResult {
    run(&[(ENTRY, source)])
}

fn rules(result: &TransformResult) -> Vec<&Rule> {
    result
        .meta
        .output_ast
        .as_ref()
        .unwrap()
        .nodes
        .iter()
        .filter_map(Node::as_rule)
        .collect()
}

fn selectors(result: &TransformResult) -> Vec<String> {
    rules(result).iter().map(|rule| rule.selector.clone()).collect()
}

fn decl(result: &TransformResult, selector: &str, prop: &str) -> Option<String> {
    rules(result)
        .into_iter()
        .filter(|rule| rule.selector == selector)
        .find_map(|rule| rule.declaration(prop).map(|decl| decl.value.clone()))
}

fn codes(result: &TransformResult) -> Vec<&'static str> {
    result.meta.transform_diagnostics.iter().map(|d| d.code).collect()
}

#[test]
fn test_scopes_local_classes() {
    let result = entry(".root .a {} .b:hover {}");
    assert_eq!(selectors(&result), vec![".entry__root .entry__a", ".entry__b:hover"]);
    assert!(result.meta.transform_diagnostics.is_empty());
}

#[test]
fn test_compose_exports() {
    let result = entry(".a {} .b { -st-compose: a; }");
    let classes: Vec<(&str, &str)> = result
        .exports
        .classes
        .iter()
        .map(|(k, v)| (k.as_str(), v.as_str()))
        .collect();
    assert_eq!(
        classes,
        vec![
            ("root", "entry__root"),
            ("a", "entry__a"),
            ("b", "entry__b entry__a"),
        ]
    );
    // Directives never reach the output.
    assert_eq!(decl(&result, ".entry__b", "-st-compose"), None);
}

#[test]
fn test_circular_compose_terminates() {
    let result = entry(".a { -st-compose: b; } .b { -st-compose: a; }");
    assert_eq!(result.exports.classes["a"], "entry__a entry__b");
    assert!(codes(&result).contains(&classes::codes::CIRCULAR_COMPOSE));
}

#[test]
fn test_nested_rules_are_flattened() {
    let result = entry(".a { color: red; &:hover { color: blue; } .b { color: green; } }");
    assert_eq!(
        selectors(&result),
        vec![".entry__a", ".entry__a:hover", ".entry__a .entry__b"]
    );
    assert_eq!(decl(&result, ".entry__a:hover", "color").as_deref(), Some("blue"));
}

#[test]
fn test_development_mode_keeps_authored_selector() {
    let options = TransformOptions {
        mode: Mode::Development,
        ..TransformOptions::default()
    };
    let result = run_with(&[(ENTRY, ".a {}")], ExternalModules::new(), &options);
    let output = result.meta.output_ast.unwrap();
    assert!(matches!(&output.nodes[0], Node::Comment(comment) if comment.text == " .a "));
}

#[test]
fn test_boolean_and_param_states() {
    let result = entry(
        ".x { -st-states: loading, step(enum(one, done)); } .x:loading {} .x:step(done) {} .x:hover {}",
    );
    assert_eq!(
        selectors(&result),
        vec![
            ".entry__x",
            ".entry__x.entry--loading",
            ".entry__x.entry---step-4-done",
            ".entry__x:hover",
        ]
    );
}

#[test]
fn test_unknown_state_is_reported() {
    let result = entry(".x {} .x:nope {}");
    assert!(codes(&result).contains(&states::codes::UNKNOWN_STATE_USAGE));
}

#[test]
fn test_states_are_inherited_through_extends() {
    let result = run(&[
        (
            ENTRY,
            ":import { -st-from: './button.st.css'; -st-default: Button; } .x { -st-extends: Button; } .x:pressed {}",
        ),
        ("/p/button.st.css", ".root { -st-states: pressed; }"),
    ]);
    assert_eq!(selectors(&result)[1], ".entry__x.button--pressed");
}

#[test]
fn test_global_selectors_are_collected() {
    let result = entry(":global(.a) .b {} .c { -st-global: \".d\"; } .c:hover {}");
    assert_eq!(selectors(&result), vec![".a .entry__b", ".d", ".d:hover"]);
    let globals: Vec<&str> = result.meta.globals.iter().map(String::as_str).collect();
    assert_eq!(globals, vec!["a", "d"]);
}

#[test]
fn test_custom_selectors_expand_before_scoping() {
    let result = entry("@custom-selector :--heading .h1, .h2; :--heading:hover {}");
    assert_eq!(selectors(&result), vec![".entry__h1:hover, .entry__h2:hover"]);
}

#[test]
fn test_circular_custom_selector() {
    let result = entry("@custom-selector :--a :--b; @custom-selector :--b :--a; :--a {}");
    assert!(codes(&result).contains(&custom_selectors::codes::CIRCULAR_CUSTOM_SELECTOR));
}

#[test]
fn test_pseudo_element_of_imported_root() {
    let result = run(&[
        (
            ENTRY,
            ":import { -st-from: './button.st.css'; -st-default: Button; } .root { -st-extends: Button; } .root::label {}",
        ),
        ("/p/button.st.css", ".root {} .label {}"),
    ]);
    assert_eq!(selectors(&result)[1], ".entry__root .button__label");
}

#[test]
fn test_value_substitution_and_cycles() {
    let result = entry(
        ":vars { size: 2px; border: value(size) solid; a: value(b); b: value(a); } \
         .x { border: value(border); margin: value(a); padding: value(nope); }",
    );
    assert_eq!(decl(&result, ".entry__x", "border").as_deref(), Some("2px solid"));
    let found = codes(&result);
    assert!(found.contains(&value_codes::codes::CYCLIC_VALUE));
    assert!(found.contains(&value_codes::codes::UNKNOWN_VAR));
    assert_eq!(result.exports.st_vars["border"], "2px solid");
}

#[test]
fn test_imported_var_value() {
    let result = run(&[
        (
            ENTRY,
            ":import { -st-from: './theme.st.css'; -st-named: color; } .x { color: value(color); }",
        ),
        ("/p/theme.st.css", ":vars { base: red; color: value(base); }"),
    ]);
    assert_eq!(decl(&result, ".entry__x", "color").as_deref(), Some("red"));
}

#[test]
fn test_custom_value_path() {
    let result = entry(
        ":vars { colors: st-map(main red, accent blue); } .x { color: value(colors, accent); }",
    );
    assert_eq!(decl(&result, ".entry__x", "color").as_deref(), Some("blue"));
}

#[test]
fn test_keyframes_and_animation() {
    let result = entry("@keyframes spin { from { color: red; } } .x { animation: spin 1s linear; }");
    assert_eq!(decl(&result, ".entry__x", "animation").as_deref(), Some("entry__spin 1s linear"));
    assert_eq!(result.exports.keyframes["spin"], "entry__spin");
}

#[test]
fn test_custom_properties_are_scoped() {
    let result = entry(".x { --color: red; background: var(--color); }");
    assert_eq!(decl(&result, ".entry__x", "--entry-color").as_deref(), Some("red"));
    assert_eq!(decl(&result, ".entry__x", "background").as_deref(), Some("var(--entry-color)"));
    assert_eq!(result.exports.vars["color"], "--entry-color");
}

#[test]
fn test_class_mixin_with_named_args() {
    let result = entry(
        ":vars { color: red; } .mix { color: value(color); } .mix:hover { color: green; } \
         .x { -st-mixin: mix(color blue); }",
    );
    assert_eq!(decl(&result, ".entry__x", "color").as_deref(), Some("blue"));
    assert!(selectors(&result).contains(&".entry__x:hover".to_string()));
}

#[test]
fn test_partial_mixin_keeps_only_overridden() {
    let result = entry(
        ":vars { color: red; } .mix { color: value(color); margin: 0; } \
         .x { -st-partial-mixin: mix(color blue); }",
    );
    assert_eq!(decl(&result, ".entry__x", "color").as_deref(), Some("blue"));
    assert_eq!(decl(&result, ".entry__x", "margin"), None);
}

#[test]
fn test_circular_and_unknown_mixins() {
    let result = entry(".a { -st-mixin: b; } .b { -st-mixin: a; } .c { -st-mixin: nope; }");
    let found = codes(&result);
    assert!(found.contains(&mixins::codes::CIRCULAR_MIXIN));
    assert!(found.contains(&mixins::codes::UNKNOWN_MIXIN));
}

#[test]
fn test_js_mixin_and_formatter() {
    let external = ExternalModules::new();
    external.register(
        "/p/mixins.js",
        ExternalModule::new()
            .with_mixin("pad", |args: &[String]| {
                let size = args.first().cloned().unwrap_or_default();
                Ok(vec![
                    ("padding".to_string(), MixinEntry::Value(size)),
                    (
                        "&:hover".to_string(),
                        MixinEntry::Nested(vec![("color".into(), MixinEntry::Value("red".into()))]),
                    ),
                ])
            })
            .with_formatter("double", |args: &[String]| {
                let value: f64 = args[0].trim_end_matches("px").parse().map_err(|_| "nan".to_string())?;
                Ok(format!("{}px", value * 2.0))
            }),
    );
    let result = run_with(
        &[(
            ENTRY,
            ":import { -st-from: './mixins.js'; -st-named: pad, double; } \
             .x { -st-mixin: pad(4px); width: double(5px); }",
        )],
        external,
        &TransformOptions::default(),
    );
    assert_eq!(decl(&result, ".entry__x", "padding").as_deref(), Some("4px"));
    assert_eq!(decl(&result, ".entry__x", "width").as_deref(), Some("10px"));
    assert_eq!(decl(&result, ".entry__x:hover", "color").as_deref(), Some("red"));
}

#[test]
fn test_missing_import_fails_the_transform() {
    let resolver = resolver_with(
        &[(ENTRY, ":import { -st-from: './missing.st.css'; -st-named: a; } .a {}")],
        ExternalModules::new(),
    );
    let meta = resolver.process(Path::new(ENTRY)).unwrap();
    let error = transform(&resolver, meta, &TransformOptions::default()).unwrap_err();
    assert!(matches!(error, crate::error::StylableError::ModuleNotFound { .. }));
}

#[test]
fn test_st_scope_prefixes_rules() {
    let result = entry("@st-scope .root { .a {} }");
    assert_eq!(selectors(&result), vec![".entry__root .entry__a"]);
}
