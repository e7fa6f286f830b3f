//! Element (type selector) symbols. Capitalized type selectors name
//! components; one matching an import stands for that import.

use smol_str::SmolStr;

use crate::parser::{Rule, SelectorList, SelectorNode};
use crate::semantic::symbols::{ElementSymbol, Symbol};

use super::{AnalyzeContext, Feature, Parent, is_directive_rule, walk_scoped};

pub mod codes {
    pub const UNKNOWN_COMPONENT: &str = "ST0401";

    pub const ALL: &[&str] = &[UNKNOWN_COMPONENT];
}

pub struct Elements;

pub fn is_component_name(name: &str) -> bool {
    name.chars().next().is_some_and(char::is_uppercase)
}

impl Feature for Elements {
    fn name(&self) -> &'static str {
        "elements"
    }

    fn analyze_rule(
        &self,
        cx: &mut AnalyzeContext<'_>,
        rule: &Rule,
        selectors: &SelectorList,
        _parent: Parent<'_>,
    ) {
        if is_directive_rule(rule) {
            return;
        }
        let mut names: Vec<SmolStr> = Vec::new();
        for selector in selectors {
            walk_scoped(selector, &mut |node| {
                if let SelectorNode::Type(name) = node {
                    if is_component_name(name) && !names.contains(name) {
                        names.push(name.clone());
                    }
                }
            });
        }

        for name in names {
            if cx.meta.symbols.element(&name).is_some() {
                continue;
            }
            let alias = cx.meta.symbols.import(&name).map(|import| import.reference.clone());
            if alias.is_none() {
                cx.warning(
                    codes::UNKNOWN_COMPONENT,
                    rule.range,
                    format!("unknown component \"{name}\", it is not imported"),
                );
            }
            cx.meta.symbols.insert(Symbol::Element(ElementSymbol {
                name,
                alias,
                range: rule.range,
            }));
        }
    }
}
