//! Class symbols and the `-st-extends`, `-st-global`, `-st-compose` directives.

use smol_str::SmolStr;

use crate::error::Result;
use crate::parser::{
    Declaration, Rule, SelectorList, SelectorNode, ValueNode, parse_selector_list, parse_value,
    split_by_comma, unquote,
};
use crate::semantic::symbols::{Symbol, SymbolNamespace};

use super::{AnalyzeContext, Feature, Parent, is_directive_rule, single_class_of, walk_scoped};

pub mod codes {
    pub const DIRECTIVE_ON_COMPLEX_SELECTOR: &str = "ST0301";
    pub const INVALID_EXTENDS: &str = "ST0302";
    pub const UNKNOWN_EXTENDS_SYMBOL: &str = "ST0303";
    pub const INVALID_GLOBAL: &str = "ST0304";
    pub const INVALID_COMPOSE: &str = "ST0305";
    pub const UNKNOWN_COMPOSE_SYMBOL: &str = "ST0306";
    pub const CIRCULAR_COMPOSE: &str = "ST0307";
    pub const CIRCULAR_EXTENDS: &str = "ST0308";

    pub const ALL: &[&str] = &[
        DIRECTIVE_ON_COMPLEX_SELECTOR,
        INVALID_EXTENDS,
        UNKNOWN_EXTENDS_SYMBOL,
        INVALID_GLOBAL,
        INVALID_COMPOSE,
        UNKNOWN_COMPOSE_SYMBOL,
        CIRCULAR_COMPOSE,
        CIRCULAR_EXTENDS,
    ];
}

pub const EXTENDS: &str = "-st-extends";
pub const GLOBAL: &str = "-st-global";
pub const COMPOSE: &str = "-st-compose";

pub struct Classes;

impl Feature for Classes {
    fn name(&self) -> &'static str {
        "classes"
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
                if let SelectorNode::Class(name) = node {
                    names.push(name.clone());
                }
            });
        }
        for name in names {
            cx.declare_class(&name, rule.range);
        }
    }

    fn analyze_declaration(&self, cx: &mut AnalyzeContext<'_>, decl: &Declaration, rule: &Rule) {
        if !matches!(decl.prop.as_str(), EXTENDS | GLOBAL | COMPOSE) {
            return;
        }
        let Some(class_name) = single_class_of(rule) else {
            cx.error(
                codes::DIRECTIVE_ON_COMPLEX_SELECTOR,
                decl.range,
                format!("{} is only allowed on a simple class selector", decl.prop),
            );
            return;
        };

        match decl.prop.as_str() {
            EXTENDS => match parse_extends(&decl.value) {
                Some(target) => {
                    if let Some(class) = cx.declare_class(&class_name, rule.range) {
                        class.extends = Some(target);
                    }
                }
                None => cx.error(
                    codes::INVALID_EXTENDS,
                    decl.range,
                    format!("{EXTENDS} expects a single symbol, got \"{}\"", decl.value),
                ),
            },
            GLOBAL => {
                let list = parse_selector_list(unquote(&decl.value));
                if list.iter().all(|selector| selector.nodes.is_empty()) {
                    cx.error(
                        codes::INVALID_GLOBAL,
                        decl.range,
                        format!("{GLOBAL} expects a selector"),
                    );
                } else if let Some(class) = cx.declare_class(&class_name, rule.range) {
                    class.global = Some(list);
                }
            }
            _ => match parse_compose(&decl.value) {
                Some(names) => {
                    if let Some(class) = cx.declare_class(&class_name, rule.range) {
                        for name in names {
                            if !class.compose.contains(&name) {
                                class.compose.push(name);
                            }
                        }
                    }
                }
                None => cx.error(
                    codes::INVALID_COMPOSE,
                    decl.range,
                    format!("{COMPOSE} expects a list of class names, got \"{}\"", decl.value),
                ),
            },
        }
    }

    fn analyze_done(&self, cx: &mut AnalyzeContext<'_>) -> Result<()> {
        let mut unknown: Vec<(&'static str, String, text_size::TextRange)> = Vec::new();
        for class in cx.meta.symbols.classes() {
            let references = class
                .extends
                .iter()
                .map(|name| (codes::UNKNOWN_EXTENDS_SYMBOL, name))
                .chain(class.compose.iter().map(|name| (codes::UNKNOWN_COMPOSE_SYMBOL, name)));
            for (code, name) in references {
                let known = matches!(
                    cx.meta.symbols.get(SymbolNamespace::Main, name),
                    Some(Symbol::Class(_) | Symbol::Import(_))
                );
                if !known {
                    unknown.push((
                        code,
                        format!("class \"{}\" references unknown symbol \"{name}\"", class.name),
                        class.range,
                    ));
                }
            }
        }
        for (code, message, range) in unknown {
            cx.warning(code, range, message);
        }
        Ok(())
    }
}

/// `Name` or the functional mixin form `Name(args)`.
pub fn parse_extends(value: &str) -> Option<SmolStr> {
    let nodes = parse_value(value.trim());
    match nodes.as_slice() {
        [ValueNode::Word(name)] => Some(name.as_str().into()),
        [ValueNode::Function { name, .. }] if !name.is_empty() => Some(name.as_str().into()),
        _ => None,
    }
}

/// Whether `-st-extends` carries mixin arguments: `Name(var value)`.
pub fn extends_mixin_call(value: &str) -> bool {
    matches!(
        parse_value(value.trim()).as_slice(),
        [ValueNode::Function { name, .. }] if !name.is_empty()
    )
}

fn parse_compose(value: &str) -> Option<Vec<SmolStr>> {
    split_by_comma(&parse_value(value))
        .into_iter()
        .filter(|part| !part.is_empty())
        .map(|part| match part.as_slice() {
            [ValueNode::Word(name)] => Some(SmolStr::from(name.as_str())),
            _ => None,
        })
        .collect()
}
