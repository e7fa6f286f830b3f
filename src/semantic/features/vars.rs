//! `:vars { name: value }` build variables.

use crate::parser::{Node, Rule, SelectorList};
use crate::semantic::symbols::{Symbol, SymbolNamespace, VarSymbol};

use super::{AnalyzeContext, Feature, Parent, codes as common};

pub mod codes {
    pub const NO_VARS_IN_NESTED_SCOPE: &str = "ST0501";
    pub const DUPLICATE_VAR: &str = "ST0502";
    pub const INVALID_VARS_CONTENT: &str = "ST0503";

    pub const ALL: &[&str] = &[NO_VARS_IN_NESTED_SCOPE, DUPLICATE_VAR, INVALID_VARS_CONTENT];
}

pub struct Vars;

pub fn is_vars_rule(rule: &Rule) -> bool {
    rule.selector.trim() == ":vars"
}

impl Feature for Vars {
    fn name(&self) -> &'static str {
        "vars"
    }

    fn analyze_rule(
        &self,
        cx: &mut AnalyzeContext<'_>,
        rule: &Rule,
        _selectors: &SelectorList,
        parent: Parent<'_>,
    ) {
        if !is_vars_rule(rule) {
            return;
        }
        if !parent.is_root() {
            cx.error(
                codes::NO_VARS_IN_NESTED_SCOPE,
                rule.range,
                "cannot use :vars inside of a nested scope",
            );
            return;
        }

        for node in &rule.nodes {
            let decl = match node {
                Node::Decl(decl) => decl,
                Node::Comment(_) => continue,
                other => {
                    cx.warning(
                        codes::INVALID_VARS_CONTENT,
                        other.range(),
                        ":vars may only contain declarations",
                    );
                    continue;
                }
            };
            let name = decl.prop.as_str();
            match cx.meta.symbols.get(SymbolNamespace::Main, name) {
                Some(Symbol::Var(_)) => cx.warning(
                    codes::DUPLICATE_VAR,
                    decl.range,
                    format!("var \"{name}\" is defined more than once, the last one is used"),
                ),
                Some(other) => {
                    let kind = other.kind();
                    cx.warning(
                        common::REDECLARE_SYMBOL,
                        decl.range,
                        format!("var \"{name}\" redeclares the {kind} \"{name}\""),
                    );
                    continue;
                }
                None => {}
            }
            cx.meta.symbols.insert(Symbol::Var(VarSymbol {
                name: name.into(),
                value: decl.value.clone(),
                range: decl.range,
            }));
        }
    }
}
