//! Container query names: `container-name`, `container` and `@container`.

use smol_str::SmolStr;
use text_size::TextRange;

use crate::error::Result;
use crate::parser::{Declaration, Node, Rule};
use crate::semantic::symbols::{NamedSymbol, Symbol, SymbolNamespace};

use super::{AnalyzeContext, Feature, is_directive_rule, is_ident};

pub mod codes {
    pub const INVALID_CONTAINER_NAME: &str = "ST0801";
    pub const UNKNOWN_IMPORTED_CONTAINER: &str = "ST0802";
    pub const UNKNOWN_CONTAINER: &str = "ST0803";

    pub const ALL: &[&str] = &[
        INVALID_CONTAINER_NAME,
        UNKNOWN_IMPORTED_CONTAINER,
        UNKNOWN_CONTAINER,
    ];
}

const RESERVED_NAMES: &[&str] = &["and", "not", "or", "none"];

pub struct Containers;

/// Names declared by a `container-name` or `container` declaration.
pub fn declared_container_names(decl: &Declaration) -> Option<Vec<&str>> {
    let names = match decl.prop.as_str() {
        "container-name" => decl.value.as_str(),
        "container" => decl.value.split('/').next().unwrap_or_default(),
        _ => return None,
    };
    Some(names.split_whitespace().collect())
}

/// The container name referenced by `@container name (...)`, if any.
pub fn container_query_name(params: &str) -> Option<&str> {
    let first = params.split_whitespace().next()?;
    (is_ident(first) && !RESERVED_NAMES.contains(&first)).then_some(first)
}

impl Feature for Containers {
    fn name(&self) -> &'static str {
        "containers"
    }

    fn analyze_declaration(&self, cx: &mut AnalyzeContext<'_>, decl: &Declaration, rule: &Rule) {
        if is_directive_rule(rule) {
            return;
        }
        let Some(names) = declared_container_names(decl) else {
            return;
        };
        if names == ["none"] {
            return;
        }
        for name in names {
            if !is_ident(name) || RESERVED_NAMES.contains(&name) {
                cx.error(
                    codes::INVALID_CONTAINER_NAME,
                    decl.range,
                    format!("invalid container name \"{name}\""),
                );
                continue;
            }
            if !cx.meta.symbols.contains(SymbolNamespace::Container, name) {
                cx.meta
                    .symbols
                    .insert(Symbol::Container(NamedSymbol::local(name, false, decl.range)));
            }
        }
    }

    fn analyze_done(&self, cx: &mut AnalyzeContext<'_>) -> Result<()> {
        let mut unknown: Vec<(SmolStr, TextRange)> = Vec::new();
        cx.meta.ast.walk(&mut |node, _| {
            if let Node::AtRule(at_rule) = node {
                if at_rule.name == "container" {
                    if let Some(name) = container_query_name(&at_rule.params) {
                        unknown.push((name.into(), at_rule.range));
                    }
                }
            }
        });
        for (name, range) in unknown {
            if !cx.meta.symbols.contains(SymbolNamespace::Container, &name) {
                cx.warning(
                    codes::UNKNOWN_CONTAINER,
                    range,
                    format!("unknown container \"{name}\""),
                );
            }
        }
        Ok(())
    }
}
