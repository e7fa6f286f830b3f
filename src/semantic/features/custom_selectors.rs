//! `@custom-selector :--name <selector-list>;`

use smol_str::SmolStr;

use crate::parser::{AtRule, SelectorNode, parse_selector_list};
use crate::semantic::symbols::{CustomSelectorSymbol, Symbol};

use super::{AnalyzeContext, Feature, Parent, walk_scoped};

pub mod codes {
    pub const INVALID_CUSTOM_SELECTOR: &str = "ST1001";
    pub const UNKNOWN_CUSTOM_SELECTOR: &str = "ST1002";
    pub const CIRCULAR_CUSTOM_SELECTOR: &str = "ST1003";

    pub const ALL: &[&str] = &[
        INVALID_CUSTOM_SELECTOR,
        UNKNOWN_CUSTOM_SELECTOR,
        CIRCULAR_CUSTOM_SELECTOR,
    ];
}

pub struct CustomSelectors;

/// `:--name` pseudo-class name (`--name`) → `name`.
pub fn custom_selector_name(pseudo_class: &str) -> Option<&str> {
    pseudo_class.strip_prefix("--").filter(|name| !name.is_empty())
}

/// Split params into `(name, selector)`; the name keeps no `:--` prefix.
pub fn parse_custom_selector(params: &str) -> Option<(&str, &str)> {
    let params = params.trim();
    let split = params.find(char::is_whitespace)?;
    let name = params[..split].strip_prefix(":--")?;
    let selector = params[split..].trim();
    (!name.is_empty() && !selector.is_empty()).then_some((name, selector))
}

impl Feature for CustomSelectors {
    fn name(&self) -> &'static str {
        "custom-selectors"
    }

    fn analyze_at_rule(&self, cx: &mut AnalyzeContext<'_>, at_rule: &AtRule, _parent: Parent<'_>) {
        if at_rule.name != "custom-selector" {
            return;
        }
        let Some((name, selector)) = parse_custom_selector(&at_rule.params) else {
            cx.error(
                codes::INVALID_CUSTOM_SELECTOR,
                at_rule.range,
                format!(
                    "invalid @custom-selector \"{}\", expected \":--name <selector>\"",
                    at_rule.params
                ),
            );
            return;
        };

        let list = parse_selector_list(selector);
        let mut classes: Vec<SmolStr> = Vec::new();
        for branch in &list {
            walk_scoped(branch, &mut |node| {
                if let SelectorNode::Class(class) = node {
                    classes.push(class.clone());
                }
            });
        }
        for class in classes {
            cx.declare_class(&class, at_rule.range);
        }

        cx.meta.symbols.insert(Symbol::CustomSelector(CustomSelectorSymbol {
            name: name.into(),
            selector: list,
            range: at_rule.range,
        }));
    }
}
