//! `:global()` selectors: content is emitted untouched and its class names
//! are exempt from scoping.

use crate::parser::{PseudoArgs, Rule, SelectorList, SelectorNode};

use super::{AnalyzeContext, Feature, Parent};

pub mod codes {
    pub const UNSUPPORTED_MULTI_SELECTORS_IN_GLOBAL: &str = "ST1501";
    pub const EMPTY_GLOBAL: &str = "ST1502";

    pub const ALL: &[&str] = &[UNSUPPORTED_MULTI_SELECTORS_IN_GLOBAL, EMPTY_GLOBAL];
}

pub struct Global;

pub fn is_global_pseudo(name: &str) -> bool {
    name.eq_ignore_ascii_case("global")
}

impl Feature for Global {
    fn name(&self) -> &'static str {
        "global"
    }

    fn analyze_rule(
        &self,
        cx: &mut AnalyzeContext<'_>,
        rule: &Rule,
        selectors: &SelectorList,
        _parent: Parent<'_>,
    ) {
        let mut empty = false;
        for selector in selectors {
            selector.walk(&mut |node| {
                if let SelectorNode::PseudoClass { name, args } = node {
                    let has_content = match args {
                        Some(PseudoArgs::Selectors(list)) => {
                            list.iter().any(|inner| !inner.nodes.is_empty())
                        }
                        Some(PseudoArgs::Raw(raw)) => !raw.trim().is_empty(),
                        None => false,
                    };
                    empty |= is_global_pseudo(name) && !has_content;
                }
            });
        }
        if empty {
            cx.warning(codes::EMPTY_GLOBAL, rule.range, ":global() has no selector");
        }
    }
}
