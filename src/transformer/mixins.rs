//! Rule bodies and mixin application.
//!
//! A class mixin copies the declarations of rules that are exactly the
//! mixin class into the consuming rule. Rules that start with the mixin
//! class but select further (`.mix:hover`, `.mix .part`) are appended
//! after the consumer with the consumer's selector in front. JS mixins
//! return declarations and nested rules directly.

use std::rc::Rc;

use rustc_hash::FxHashSet;
use smol_str::SmolStr;
use text_size::TextRange;

use crate::error::Result;
use crate::parser::{
    Declaration, Node, Rule, Selector, SelectorList, SelectorNode, parse_selector_list,
    stringify_selector_list,
};
use crate::resolver::{ExternalSymbol, JsMixin, MixinEntry};
use crate::semantic::Meta;
use crate::semantic::features::classes::{EXTENDS, extends_mixin_call};
use crate::semantic::features::is_directive_rule;
use crate::semantic::features::mixins::{MIXIN, MixinCall, PARTIAL_MIXIN, codes, parse_mixin_calls};
use crate::semantic::features::values::value_references;
use crate::semantic::symbols::{Symbol, SymbolNamespace};

use super::values::Overrides;
use super::{Transformer, nest_selectors};

impl Transformer<'_> {
    /// Declarations of a rule body, with mixins applied in place. Rules a
    /// mixin adds after the consumer go to `trailing`.
    ///
    /// With a `filter`, only declarations whose value references one of
    /// the filtered vars are kept (partial mixins).
    pub(super) fn rule_body(
        &mut self,
        meta: &Rc<Meta>,
        nodes: &[Node],
        scoped: &[Selector],
        overrides: Option<&Overrides>,
        filter: Option<&FxHashSet<SmolStr>>,
        trailing: &mut Vec<Node>,
    ) -> Result<Vec<Node>> {
        let mut body = Vec::new();
        for node in nodes {
            match node {
                Node::Decl(decl) => {
                    let mixin = match decl.prop.as_str() {
                        MIXIN => Some(false),
                        PARTIAL_MIXIN => Some(true),
                        EXTENDS if extends_mixin_call(&decl.value) => Some(false),
                        _ => None,
                    };
                    if let Some(partial) = mixin {
                        // Invalid lists were reported by the processor.
                        let Ok(calls) = parse_mixin_calls(&decl.value, partial) else {
                            continue;
                        };
                        for call in &calls {
                            self.apply_mixin(meta, call, scoped, decl.range, &mut body, trailing)?;
                        }
                        continue;
                    }
                    if let Some(filter) = filter {
                        let referenced = value_references(&decl.value)
                            .iter()
                            .any(|name| filter.contains(name));
                        if !referenced {
                            continue;
                        }
                    }
                    if let Some(decl) = self.transform_declaration(meta, decl, overrides)? {
                        body.push(Node::Decl(decl));
                    }
                }
                Node::Comment(comment) if filter.is_none() => body.push(Node::Comment(comment.clone())),
                _ => {}
            }
        }
        Ok(body)
    }

    fn apply_mixin(
        &mut self,
        meta: &Rc<Meta>,
        call: &MixinCall,
        scoped: &[Selector],
        range: TextRange,
        body: &mut Vec<Node>,
        trailing: &mut Vec<Node>,
    ) -> Result<()> {
        if meta.symbols.get(SymbolNamespace::Main, &call.name).is_none() {
            if self.is_current(meta) {
                self.diagnostics.warning(
                    codes::UNKNOWN_MIXIN,
                    range,
                    format!("unknown mixin \"{}\"", call.name),
                );
            }
            return Ok(());
        }

        if let Some(external) = self.external_symbol(meta, &call.name, codes::JS_MIXIN_FAILED, range)? {
            return match external {
                ExternalSymbol::Mixin(mixin) => {
                    self.apply_js_mixin(meta, call, &mixin, scoped, range, body, trailing)
                }
                ExternalSymbol::Formatter(_) => {
                    self.diagnostics.warning(
                        codes::UNSUPPORTED_MIXIN_SYMBOL,
                        range,
                        format!("\"{}\" is a formatter and cannot be used as a mixin", call.name),
                    );
                    Ok(())
                }
            };
        }

        let Some(origin) = self.resolver.resolve_symbol(meta, SymbolNamespace::Main, &call.name)? else {
            if self.is_current(meta) {
                self.diagnostics.warning(
                    codes::UNKNOWN_MIXIN,
                    range,
                    format!("cannot resolve mixin \"{}\"", call.name),
                );
            }
            return Ok(());
        };
        let class_name = match &origin.symbol {
            Symbol::Class(class) => class.name.clone(),
            other => {
                self.diagnostics.warning(
                    codes::UNSUPPORTED_MIXIN_SYMBOL,
                    range,
                    format!("{} \"{}\" cannot be used as a mixin", other.kind(), call.name),
                );
                return Ok(());
            }
        };

        let key = (origin.meta.source.clone(), class_name.clone());
        if self.mixin_stack.contains(&key) {
            self.diagnostics.warning(
                codes::CIRCULAR_MIXIN,
                range,
                format!("circular mixin \"{}\"", call.name),
            );
            return Ok(());
        }

        let overrides = if call.args.is_empty() {
            None
        } else {
            match call.named_args() {
                Ok(values) => Some(Overrides {
                    source: origin.meta.source.clone(),
                    values,
                }),
                Err(message) => {
                    self.diagnostics.error(codes::INVALID_MIXIN_ARGS, range, message);
                    return Ok(());
                }
            }
        };
        let filter = call
            .partial
            .then(|| partial_filter(&origin.meta, overrides.as_ref()));

        tracing::trace!(mixin = %call.name, from = %origin.meta.source.display(), "applying class mixin");
        self.mixin_stack.push(key);
        let applied = self.apply_class_mixin(
            &origin.meta,
            &class_name,
            scoped,
            overrides.as_ref(),
            filter.as_ref(),
            range,
            body,
            trailing,
        );
        self.mixin_stack.pop();
        applied
    }

    #[allow(clippy::too_many_arguments)]
    fn apply_class_mixin(
        &mut self,
        mixin_meta: &Rc<Meta>,
        class_name: &str,
        scoped: &[Selector],
        overrides: Option<&Overrides>,
        filter: Option<&FxHashSet<SmolStr>>,
        range: TextRange,
        body: &mut Vec<Node>,
        trailing: &mut Vec<Node>,
    ) -> Result<()> {
        let mut rules = Vec::new();
        collect_rules(&mixin_meta.ast.nodes, None, &mut rules);

        for (authored, rule) in rules {
            if let [selector] = authored.as_slice() {
                if selector.as_single_class() == Some(class_name) {
                    let declarations =
                        self.rule_body(mixin_meta, &rule.nodes, scoped, overrides, filter, trailing)?;
                    body.extend(declarations);
                    continue;
                }
            }

            let mut selectors: SelectorList = Vec::new();
            for selector in &authored {
                let starts_with_class = matches!(
                    selector.nodes.first(),
                    Some(SelectorNode::Class(name)) if name == class_name
                );
                if !starts_with_class || scoped.is_empty() {
                    continue;
                }
                let rest = Selector::new(selector.nodes[1..].to_vec());
                let chain = self.resolver.resolve_extends(mixin_meta, class_name)?;
                let rest = self.scope_selector(mixin_meta, &rest, chain, range)?;
                for consumer in scoped {
                    let mut nodes = consumer.nodes.clone();
                    nodes.extend(rest.nodes.iter().cloned());
                    selectors.push(Selector::new(nodes));
                }
            }
            if selectors.is_empty() {
                continue;
            }

            let mut nested = Vec::new();
            let declarations =
                self.rule_body(mixin_meta, &rule.nodes, &selectors, overrides, filter, &mut nested)?;
            if !declarations.is_empty() {
                trailing.push(Node::Rule(Rule {
                    selector: stringify_selector_list(&selectors),
                    nodes: declarations,
                    range,
                }));
            }
            trailing.extend(nested);
        }
        Ok(())
    }

    #[allow(clippy::too_many_arguments)]
    fn apply_js_mixin(
        &mut self,
        meta: &Rc<Meta>,
        call: &MixinCall,
        mixin: &JsMixin,
        scoped: &[Selector],
        range: TextRange,
        body: &mut Vec<Node>,
        trailing: &mut Vec<Node>,
    ) -> Result<()> {
        match mixin(&call.args) {
            Ok(entries) => self.emit_mixin_entries(meta, &entries, scoped, range, body, trailing),
            Err(message) => {
                self.diagnostics.error(
                    codes::JS_MIXIN_FAILED,
                    range,
                    format!("mixin \"{}\" failed: {message}", call.name),
                );
                Ok(())
            }
        }
    }

    fn emit_mixin_entries(
        &mut self,
        meta: &Rc<Meta>,
        entries: &[(String, MixinEntry)],
        scoped: &[Selector],
        range: TextRange,
        body: &mut Vec<Node>,
        trailing: &mut Vec<Node>,
    ) -> Result<()> {
        for (key, entry) in entries {
            match entry {
                MixinEntry::Value(value) => {
                    let decl = Declaration {
                        prop: key.clone(),
                        value: value.clone(),
                        important: false,
                        range,
                    };
                    if let Some(decl) = self.transform_declaration(meta, &decl, None)? {
                        body.push(Node::Decl(decl));
                    }
                }
                MixinEntry::Nested(children) => {
                    if scoped.is_empty() {
                        continue;
                    }
                    let relative = parse_selector_list(key);
                    let relative = self.scope_selector_list(meta, &relative, range)?;
                    let selectors = nest_selectors(&scoped.to_vec(), &relative);
                    let mut nested_body = Vec::new();
                    let mut nested_trailing = Vec::new();
                    self.emit_mixin_entries(
                        meta,
                        children,
                        &selectors,
                        range,
                        &mut nested_body,
                        &mut nested_trailing,
                    )?;
                    if !nested_body.is_empty() {
                        trailing.push(Node::Rule(Rule {
                            selector: stringify_selector_list(&selectors),
                            nodes: nested_body,
                            range,
                        }));
                    }
                    trailing.extend(nested_trailing);
                }
            }
        }
        Ok(())
    }
}

/// Style rules of a stylesheet with their `&`-resolved selectors. Rules
/// inside at-rules are not mixed in.
fn collect_rules<'a>(
    nodes: &'a [Node],
    parent: Option<&SelectorList>,
    rules: &mut Vec<(SelectorList, &'a Rule)>,
) {
    for node in nodes {
        let Node::Rule(rule) = node else {
            continue;
        };
        if is_directive_rule(rule) {
            continue;
        }
        let own = parse_selector_list(&rule.selector);
        let authored = match parent {
            Some(parent) => nest_selectors(parent, &own),
            None => own,
        };
        rules.push((authored.clone(), rule));
        collect_rules(&rule.nodes, Some(&authored), rules);
    }
}

/// Vars a partial mixin keeps: the overridden ones and every var whose
/// value depends on them.
fn partial_filter(meta: &Meta, overrides: Option<&Overrides>) -> FxHashSet<SmolStr> {
    let mut names: FxHashSet<SmolStr> = overrides
        .map(|overrides| overrides.values.keys().cloned().collect())
        .unwrap_or_default();
    if names.is_empty() {
        return names;
    }
    loop {
        let before = names.len();
        for var in meta.symbols.vars() {
            if names.contains(&var.name) {
                continue;
            }
            if value_references(&var.value).iter().any(|name| names.contains(name)) {
                names.insert(var.name.clone());
            }
        }
        if names.len() == before {
            return names;
        }
    }
}
