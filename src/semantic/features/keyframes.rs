//! `@keyframes` symbols and `animation` references.

use crate::parser::AtRule;
use crate::semantic::symbols::{NamedSymbol, Symbol};

use super::{AnalyzeContext, Feature, Parent, strip_global};

pub mod codes {
    pub const KEYFRAMES_NO_NAME: &str = "ST0601";
    pub const ILLEGAL_KEYFRAMES_NESTING: &str = "ST0602";
    pub const UNKNOWN_IMPORTED_KEYFRAMES: &str = "ST0603";
    pub const RESERVED_KEYFRAMES_NAME: &str = "ST0604";

    pub const ALL: &[&str] = &[
        KEYFRAMES_NO_NAME,
        ILLEGAL_KEYFRAMES_NESTING,
        UNKNOWN_IMPORTED_KEYFRAMES,
        RESERVED_KEYFRAMES_NAME,
    ];
}

const RESERVED_NAMES: &[&str] = &[
    "none", "initial", "inherit", "unset", "revert", "revert-layer", "default",
];

pub fn is_keyframes_at_rule(at_rule: &AtRule) -> bool {
    matches!(
        at_rule.name.as_str(),
        "keyframes" | "-webkit-keyframes" | "-moz-keyframes"
    )
}

pub struct Keyframes;

impl Feature for Keyframes {
    fn name(&self) -> &'static str {
        "keyframes"
    }

    fn analyze_at_rule(&self, cx: &mut AnalyzeContext<'_>, at_rule: &AtRule, parent: Parent<'_>) {
        if !is_keyframes_at_rule(at_rule) {
            return;
        }
        if matches!(parent, Parent::Rule(_)) {
            cx.error(
                codes::ILLEGAL_KEYFRAMES_NESTING,
                at_rule.range,
                "@keyframes cannot be nested inside a rule",
            );
            return;
        }
        let (name, global) = strip_global(&at_rule.params);
        if name.is_empty() {
            cx.error(codes::KEYFRAMES_NO_NAME, at_rule.range, "@keyframes is missing a name");
            return;
        }
        if RESERVED_NAMES.contains(&name) {
            cx.error(
                codes::RESERVED_KEYFRAMES_NAME,
                at_rule.range,
                format!("keyframes name \"{name}\" is reserved"),
            );
            return;
        }
        cx.meta
            .symbols
            .insert(Symbol::Keyframes(NamedSymbol::local(name, global, at_rule.range)));
    }
}

/// Properties whose value may reference keyframes names.
pub fn is_animation_property(prop: &str) -> bool {
    matches!(
        prop,
        "animation" | "animation-name" | "-webkit-animation" | "-webkit-animation-name"
    )
}
