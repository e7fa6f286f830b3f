//! Custom properties (`--x`), scoped to `--ns-x` unless declared global.

use text_size::TextRange;

use crate::parser::{AtRule, Declaration, Rule, ValueNode, parse_value};
use crate::semantic::symbols::{NamedSymbol, Symbol, SymbolNamespace};

use super::{AnalyzeContext, Feature, Parent, is_directive_rule};

pub mod codes {
    pub const INVALID_GLOBAL_CUSTOM_PROPERTY: &str = "ST0901";
    pub const ILLEGAL_PROPERTY_NAME: &str = "ST0902";
    pub const UNKNOWN_IMPORTED_PROPERTY: &str = "ST0903";

    pub const ALL: &[&str] = &[
        INVALID_GLOBAL_CUSTOM_PROPERTY,
        ILLEGAL_PROPERTY_NAME,
        UNKNOWN_IMPORTED_PROPERTY,
    ];
}

pub const GLOBAL_CUSTOM_PROPERTY: &str = "st-global-custom-property";

pub struct CustomProperties;

pub fn is_custom_property(name: &str) -> bool {
    name.len() > 2 && name.starts_with("--")
}

/// `--x` in namespace `ns` → `--ns-x`.
pub fn scoped_custom_property(namespace: &str, name: &str) -> String {
    format!("--{namespace}-{}", name.trim_start_matches("--"))
}

/// Custom properties referenced through `var(--x)` anywhere in a value.
pub fn var_references(value: &str) -> Vec<String> {
    fn collect(nodes: &[ValueNode], found: &mut Vec<String>) {
        for node in nodes {
            if let ValueNode::Function { name, nodes } = node {
                if name == "var" {
                    if let Some(ValueNode::Word(first)) =
                        nodes.iter().find(|node| !node.is_space())
                    {
                        if is_custom_property(first) {
                            found.push(first.clone());
                        }
                    }
                }
                collect(nodes, found);
            }
        }
    }
    let mut found = Vec::new();
    collect(&parse_value(value), &mut found);
    found
}

fn define(cx: &mut AnalyzeContext<'_>, name: &str, global: bool, range: TextRange) {
    match cx.meta.symbols.get_mut(SymbolNamespace::CustomProperty, name) {
        Some(Symbol::CustomProperty(existing)) => existing.global |= global,
        _ => {
            cx.meta
                .symbols
                .insert(Symbol::CustomProperty(NamedSymbol::local(name, global, range)));
        }
    }
}

impl Feature for CustomProperties {
    fn name(&self) -> &'static str {
        "custom-properties"
    }

    fn analyze_declaration(&self, cx: &mut AnalyzeContext<'_>, decl: &Declaration, rule: &Rule) {
        if is_directive_rule(rule) {
            return;
        }
        if is_custom_property(&decl.prop) {
            define(cx, &decl.prop, false, decl.range);
        }
        for name in var_references(&decl.value) {
            define(cx, &name, false, decl.range);
        }
    }

    fn analyze_at_rule(&self, cx: &mut AnalyzeContext<'_>, at_rule: &AtRule, _parent: Parent<'_>) {
        match at_rule.name.as_str() {
            "property" => {
                let name = at_rule.params.trim();
                if is_custom_property(name) {
                    define(cx, name, false, at_rule.range);
                } else {
                    cx.error(
                        codes::ILLEGAL_PROPERTY_NAME,
                        at_rule.range,
                        format!("@property name \"{name}\" must start with \"--\""),
                    );
                }
            }
            GLOBAL_CUSTOM_PROPERTY => {
                for name in at_rule.params.split(',').map(str::trim) {
                    if is_custom_property(name) {
                        define(cx, name, true, at_rule.range);
                    } else {
                        cx.error(
                            codes::INVALID_GLOBAL_CUSTOM_PROPERTY,
                            at_rule.range,
                            format!("@{GLOBAL_CUSTOM_PROPERTY} expects \"--\" names, got \"{name}\""),
                        );
                    }
                }
            }
            _ => {}
        }
    }
}
