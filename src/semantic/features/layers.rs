//! `@layer` names.

use crate::parser::AtRule;
use crate::semantic::symbols::{NamedSymbol, Symbol, SymbolNamespace};

use super::{AnalyzeContext, Feature, Parent, is_ident, strip_global};

pub mod codes {
    pub const INVALID_LAYER_NAME: &str = "ST0701";
    pub const UNKNOWN_IMPORTED_LAYER: &str = "ST0702";

    pub const ALL: &[&str] = &[INVALID_LAYER_NAME, UNKNOWN_IMPORTED_LAYER];
}

pub struct Layers;

/// Layer names of `@layer a, b.c` as `(segment, global)` pairs.
pub fn layer_names(params: &str) -> Vec<(&str, bool)> {
    params
        .split(',')
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
        .flat_map(|entry| {
            let (name, global) = strip_global(entry);
            name.split('.').map(move |segment| (segment.trim(), global))
        })
        .collect()
}

impl Feature for Layers {
    fn name(&self) -> &'static str {
        "layers"
    }

    fn analyze_at_rule(&self, cx: &mut AnalyzeContext<'_>, at_rule: &AtRule, _parent: Parent<'_>) {
        if at_rule.name != "layer" {
            return;
        }
        for (name, global) in layer_names(&at_rule.params) {
            if !is_ident(name) {
                cx.error(
                    codes::INVALID_LAYER_NAME,
                    at_rule.range,
                    format!("invalid layer name \"{name}\""),
                );
                continue;
            }
            let imported = cx
                .meta
                .symbols
                .named(SymbolNamespace::Layer, name)
                .is_some_and(|existing| existing.import.is_some());
            if !imported {
                cx.meta
                    .symbols
                    .insert(Symbol::Layer(NamedSymbol::local(name, global, at_rule.range)));
            }
        }
    }
}
