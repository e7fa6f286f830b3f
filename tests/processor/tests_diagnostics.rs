//! Each malformed construct yields its diagnostic code.

use std::path::Path;

use rstest::rstest;
use stylable::VerbatimNamespace;
use stylable::semantic::features::{
    classes, custom_properties, custom_selectors, elements, global, imports, keyframes, layers,
    mixins, namespace, scope, states, vars,
};
use stylable::semantic::process;

use crate::helpers::assertions::{assert_has_code, assert_no_diagnostics};

fn analyze(source: &str) -> stylable::Meta {
    process(Path::new("/p/entry.st.css"), source, &VerbatimNamespace).unwrap()
}

#[rstest]
#[case::empty_namespace("@st-namespace \"\";", namespace::codes::EMPTY_NAMESPACE_DEF)]
#[case::invalid_namespace("@st-namespace \"1bad\";", namespace::codes::INVALID_NAMESPACE_DEF)]
#[case::extends_on_complex(".a .b { -st-extends: X; }", classes::codes::DIRECTIVE_ON_COMPLEX_SELECTOR)]
#[case::invalid_extends(".a { -st-extends: a b; }", classes::codes::INVALID_EXTENDS)]
#[case::unknown_compose(".a { -st-compose: nope; }", classes::codes::UNKNOWN_COMPOSE_SYMBOL)]
#[case::import_without_from(":import { -st-default: X; }", imports::codes::MISSING_IMPORT_FROM)]
#[case::empty_from(":import { -st-from: \"\"; -st-default: X; }", imports::codes::EMPTY_IMPORT_FROM)]
#[case::lower_case_default(
    ":import { -st-from: \"./x.st.css\"; -st-default: button; }",
    imports::codes::DEFAULT_IMPORT_IS_LOWER_CASE
)]
#[case::redeclared_import(
    ":import { -st-from: \"./x.st.css\"; -st-named: a; } :import { -st-from: \"./y.st.css\"; -st-named: a; }",
    imports::codes::REDECLARED_IMPORT_SYMBOL
)]
#[case::duplicate_var(":vars { a: 1; a: 2; }", vars::codes::DUPLICATE_VAR)]
#[case::scope_without_param("@st-scope { .a {} }", scope::codes::MISSING_SCOPING_PARAM)]
#[case::keyframes_without_name("@keyframes {}", keyframes::codes::KEYFRAMES_NO_NAME)]
#[case::reserved_keyframes("@keyframes none {}", keyframes::codes::RESERVED_KEYFRAMES_NAME)]
#[case::nested_keyframes(".a { @keyframes spin {} }", keyframes::codes::ILLEGAL_KEYFRAMES_NESTING)]
#[case::empty_global(":global() {}", global::codes::EMPTY_GLOBAL)]
#[case::partial_without_args(".a {} .b { -st-partial-mixin: a; }", mixins::codes::PARTIAL_MIXIN_WITHOUT_ARGS)]
#[case::states_on_complex(".a .b { -st-states: x; }", states::codes::STATE_DEFINITION_IN_COMPLEX)]
#[case::native_state(".a { -st-states: hover; }", states::codes::RESERVED_NATIVE_STATE)]
#[case::duplicate_state(".a { -st-states: x, x; }", states::codes::DUPLICATE_STATE)]
#[case::invalid_layer("@layer 1x;", layers::codes::INVALID_LAYER_NAME)]
#[case::property_without_dashes("@property color {}", custom_properties::codes::ILLEGAL_PROPERTY_NAME)]
#[case::invalid_custom_selector("@custom-selector foo;", custom_selectors::codes::INVALID_CUSTOM_SELECTOR)]
#[case::unknown_component("Gallery {}", elements::codes::UNKNOWN_COMPONENT)]
fn test_reports(#[case] source: &str, #[case] code: &str) {
    assert_has_code(&analyze(source), code);
}

#[test]
fn test_well_formed_sheet_is_clean() {
    let meta = analyze(
        "@st-namespace \"Card\"; \
         :import { -st-from: \"./button.st.css\"; -st-default: Button; } \
         :vars { gap: 4px; } \
         .root { -st-states: open, tone(enum(light, dark)); } \
         .title { -st-extends: Button; } \
         @keyframes slide { from { margin: 0; } } \
         @custom-selector :--head .title, .root;",
    );
    assert_no_diagnostics(&meta);
    assert_eq!(meta.namespace, "Card");
}

#[test]
fn test_diagnostics_carry_line_and_column() {
    let meta = analyze(".ok {}\n.a .b { -st-states: x; }");
    let diagnostic = meta
        .diagnostics
        .with_code(states::codes::STATE_DEFINITION_IN_COMPLEX)
        .into_iter()
        .next()
        .unwrap();

    assert_eq!(diagnostic.span.start.line, 1);
    assert!(diagnostic.format().contains("ST1301"));
}
