//! `@st-scope <selector> { rules }`: every inner rule is prefixed with the
//! scoped scope selector and the at-rule itself is dropped from the output.

use smol_str::SmolStr;

use crate::parser::{AtRule, SelectorNode, parse_selector_list};

use super::{AnalyzeContext, Feature, Parent, walk_scoped};

pub mod codes {
    pub const MISSING_SCOPING_PARAM: &str = "ST1101";
    pub const SCOPE_NOT_AT_ROOT: &str = "ST1102";

    pub const ALL: &[&str] = &[MISSING_SCOPING_PARAM, SCOPE_NOT_AT_ROOT];
}

pub const ST_SCOPE: &str = "st-scope";

pub struct Scope;

impl Feature for Scope {
    fn name(&self) -> &'static str {
        "st-scope"
    }

    fn analyze_at_rule(&self, cx: &mut AnalyzeContext<'_>, at_rule: &AtRule, parent: Parent<'_>) {
        if at_rule.name != ST_SCOPE {
            return;
        }
        if !parent.is_root() {
            cx.error(
                codes::SCOPE_NOT_AT_ROOT,
                at_rule.range,
                "@st-scope must be declared at the stylesheet root",
            );
        }
        if at_rule.params.trim().is_empty() {
            cx.error(
                codes::MISSING_SCOPING_PARAM,
                at_rule.range,
                "@st-scope is missing a scoping selector",
            );
            return;
        }

        let mut classes: Vec<SmolStr> = Vec::new();
        for selector in parse_selector_list(&at_rule.params) {
            walk_scoped(&selector, &mut |node| {
                if let SelectorNode::Class(class) = node {
                    classes.push(class.clone());
                }
            });
        }
        for class in classes {
            cx.declare_class(&class, at_rule.range);
        }
    }
}
