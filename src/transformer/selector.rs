//! Selector scoping.
//!
//! Walks each selector left to right keeping an inference context: the
//! `-st-extends` chain of the class or element currently in scope. States
//! and pseudo-elements are looked up along that chain; a combinator resets
//! it to the stylesheet root.

use std::rc::Rc;

use smol_str::SmolStr;
use text_size::TextRange;

use crate::base::constants::ROOT_CLASS;
use crate::error::Result;
use crate::parser::{
    Combinator, PseudoArgs, Selector, SelectorList, SelectorNode, stringify_selector_list, unquote,
};
use crate::semantic::Meta;
use crate::semantic::features::custom_selectors::{codes as custom_selector_codes, custom_selector_name};
use crate::semantic::features::global::{codes as global_codes, is_global_pseudo};
use crate::semantic::features::imports::codes as import_codes;
use crate::semantic::features::pseudo_elements::{codes as pseudo_element_codes, is_native_pseudo_element};
use crate::semantic::features::states::{
    codes as state_codes, boolean_state_class, is_native_pseudo_class, param_state_class,
    validate_state_argument,
};
use crate::semantic::symbols::{StateDef, SymbolNamespace};

use super::{Chain, Transformer};

/// Combine an enclosing selector list with a nested one. `&` is replaced by
/// the enclosing branch; a branch without `&` becomes its descendant.
/// Lists of equal length (more than one branch) pair up positionally,
/// anything else is combined as a cross product.
pub fn nest_selectors(parent: &SelectorList, child: &SelectorList) -> SelectorList {
    let combine = |outer: &Selector, inner: &Selector| {
        if inner.contains_nesting() {
            replace_nesting(inner, outer)
        } else {
            let mut nodes = outer.nodes.clone();
            nodes.push(SelectorNode::Combinator(Combinator::Descendant));
            nodes.extend(inner.nodes.iter().cloned());
            Selector::new(nodes)
        }
    };
    if parent.len() == child.len() && parent.len() > 1 {
        parent
            .iter()
            .zip(child)
            .map(|(outer, inner)| combine(outer, inner))
            .collect()
    } else {
        parent
            .iter()
            .flat_map(|outer| child.iter().map(move |inner| combine(outer, inner)))
            .collect()
    }
}

fn replace_nesting(selector: &Selector, replacement: &Selector) -> Selector {
    let mut nodes = Vec::with_capacity(selector.nodes.len());
    for node in &selector.nodes {
        match node {
            SelectorNode::Nesting => nodes.extend(replacement.nodes.iter().cloned()),
            SelectorNode::PseudoClass {
                name,
                args: Some(PseudoArgs::Selectors(list)),
            } => nodes.push(SelectorNode::PseudoClass {
                name: name.clone(),
                args: Some(PseudoArgs::Selectors(
                    list.iter()
                        .map(|inner| replace_nesting(inner, replacement))
                        .collect(),
                )),
            }),
            other => nodes.push(other.clone()),
        }
    }
    Selector::new(nodes)
}

impl Transformer<'_> {
    // ========================================================================
    // CUSTOM SELECTORS
    // ========================================================================

    /// Replace `:--name` with its definition. A definition with several
    /// branches multiplies the selector.
    pub(super) fn expand_custom_selectors(
        &mut self,
        meta: &Rc<Meta>,
        list: &SelectorList,
        range: TextRange,
    ) -> SelectorList {
        let mut expanded = Vec::with_capacity(list.len());
        for selector in list {
            expanded.extend(self.expand_selector(meta, selector, range));
        }
        expanded
    }

    fn expand_selector(&mut self, meta: &Rc<Meta>, selector: &Selector, range: TextRange) -> Vec<Selector> {
        let mut partials: Vec<Vec<SelectorNode>> = vec![Vec::new()];
        for node in &selector.nodes {
            let fragment = match node {
                SelectorNode::PseudoClass { name, args: None } => match custom_selector_name(name) {
                    Some(custom) => self.custom_selector_fragment(meta, custom, range),
                    None => None,
                },
                _ => None,
            };
            match (fragment, node) {
                (Some(branches), _) => {
                    partials = partials
                        .iter()
                        .flat_map(|partial| {
                            branches.iter().map(move |branch| {
                                let mut nodes = partial.clone();
                                nodes.extend(branch.nodes.iter().cloned());
                                nodes
                            })
                        })
                        .collect();
                }
                (
                    None,
                    SelectorNode::PseudoClass {
                        name,
                        args: Some(PseudoArgs::Selectors(inner)),
                    },
                ) => {
                    let inner = self.expand_custom_selectors(meta, inner, range);
                    for partial in &mut partials {
                        partial.push(SelectorNode::PseudoClass {
                            name: name.clone(),
                            args: Some(PseudoArgs::Selectors(inner.clone())),
                        });
                    }
                }
                (None, other) => {
                    for partial in &mut partials {
                        partial.push(other.clone());
                    }
                }
            }
        }
        partials.into_iter().map(Selector::new).collect()
    }

    /// The expanded definition of `name` in `meta`, or `None` when it is
    /// unknown or already being expanded.
    fn custom_selector_fragment(
        &mut self,
        meta: &Rc<Meta>,
        name: &str,
        range: TextRange,
    ) -> Option<SelectorList> {
        let Some(symbol) = meta.symbols.custom_selector(name) else {
            if self.is_current(meta) {
                self.diagnostics.warning(
                    custom_selector_codes::UNKNOWN_CUSTOM_SELECTOR,
                    range,
                    format!("unknown custom selector \":--{name}\""),
                );
            }
            return None;
        };
        let key = (meta.source.clone(), SmolStr::from(name));
        if self.custom_selector_stack.contains(&key) {
            self.diagnostics.warning(
                custom_selector_codes::CIRCULAR_CUSTOM_SELECTOR,
                range,
                format!("circular custom selector \":--{name}\""),
            );
            return None;
        }
        self.custom_selector_stack.push(key);
        let expanded = self.expand_custom_selectors(meta, &symbol.selector, range);
        self.custom_selector_stack.pop();
        Some(expanded)
    }

    // ========================================================================
    // SCOPING
    // ========================================================================

    pub(super) fn scope_selector_list(
        &mut self,
        meta: &Rc<Meta>,
        list: &SelectorList,
        range: TextRange,
    ) -> Result<SelectorList> {
        let root = self.root_chain(meta)?;
        list.iter()
            .map(|selector| self.scope_selector(meta, selector, root.clone(), range))
            .collect()
    }

    /// Scope one selector starting from the `start` context.
    pub(super) fn scope_selector(
        &mut self,
        meta: &Rc<Meta>,
        selector: &Selector,
        start: Chain,
        range: TextRange,
    ) -> Result<Selector> {
        let mut chain = start;
        let mut nodes = Vec::with_capacity(selector.nodes.len());
        for node in &selector.nodes {
            match node {
                SelectorNode::Class(name) => {
                    let (emitted, next) = self.scope_class(meta, name, range)?;
                    nodes.extend(emitted);
                    chain = next;
                }
                SelectorNode::Type(name) => match self.scope_element(meta, name, range)? {
                    Some((emitted, next)) => {
                        nodes.extend(emitted);
                        chain = next;
                    }
                    None => {
                        nodes.push(node.clone());
                        chain = Vec::new();
                    }
                },
                SelectorNode::Combinator(_) => {
                    nodes.push(node.clone());
                    chain = self.root_chain(meta)?;
                }
                SelectorNode::PseudoClass { name, args } => {
                    let emitted = self.scope_pseudo_class(meta, node, name, args.as_ref(), &chain, range)?;
                    nodes.extend(emitted);
                }
                SelectorNode::PseudoElement { name, .. } => {
                    let (emitted, next) = self.scope_pseudo_element(meta, node, name, &chain, range)?;
                    nodes.extend(emitted);
                    chain = next;
                }
                other => nodes.push(other.clone()),
            }
        }
        Ok(Selector::new(nodes))
    }

    /// `.name` → `.ns__name` of the defining stylesheet, or its
    /// `-st-global` selector.
    pub(super) fn scope_class(
        &mut self,
        meta: &Rc<Meta>,
        name: &str,
        range: TextRange,
    ) -> Result<(Vec<SelectorNode>, Chain)> {
        let chain = self.resolver.resolve_extends(meta, name)?;
        let Some(origin) = chain.first() else {
            let is_import = meta
                .symbols
                .get(SymbolNamespace::Main, name)
                .is_some_and(|symbol| symbol.import_ref().is_some());
            if is_import && self.is_current(meta) {
                self.diagnostics.warning(
                    import_codes::UNKNOWN_IMPORTED_SYMBOL,
                    range,
                    format!("cannot resolve imported symbol \"{name}\""),
                );
            }
            let local = self.scoped_name(&meta.namespace, name);
            return Ok((vec![SelectorNode::Class(local.into())], Vec::new()));
        };
        let Some(class) = origin.class() else {
            let local = self.scoped_name(&meta.namespace, name);
            return Ok((vec![SelectorNode::Class(local.into())], Vec::new()));
        };
        if let Some(global) = &class.global {
            let emitted = self.emit_global(global, range);
            return Ok((emitted, chain));
        }
        let scoped = self.scoped_name(&origin.meta.namespace, &class.name);
        Ok((vec![SelectorNode::Class(scoped.into())], chain))
    }

    /// A component type selector standing for an imported stylesheet's root.
    fn scope_element(
        &mut self,
        meta: &Rc<Meta>,
        name: &str,
        range: TextRange,
    ) -> Result<Option<(Vec<SelectorNode>, Chain)>> {
        if meta.symbols.element(name).is_none_or(|element| element.alias.is_none()) {
            return Ok(None);
        }
        let Some(origin) = self.resolver.resolve_symbol(meta, SymbolNamespace::Element, name)? else {
            if self.is_current(meta) {
                self.diagnostics.warning(
                    import_codes::UNKNOWN_IMPORTED_SYMBOL,
                    range,
                    format!("cannot resolve imported element \"{name}\""),
                );
            }
            return Ok(None);
        };
        let Some(class) = origin.class() else {
            return Ok(None);
        };
        let chain = self.resolver.resolve_extends(&origin.meta, &class.name)?;
        let scoped = self.scoped_name(&origin.meta.namespace, &class.name);
        Ok(Some((vec![SelectorNode::Class(scoped.into())], chain)))
    }

    /// Emit a `:global()` / `-st-global` selector untouched and exempt its
    /// classes from scoping.
    fn emit_global(&mut self, list: &SelectorList, range: TextRange) -> Vec<SelectorNode> {
        for selector in list {
            for class in selector.class_names() {
                self.globals.insert(class.to_string());
            }
        }
        if list.len() > 1 {
            self.diagnostics.info(
                global_codes::UNSUPPORTED_MULTI_SELECTORS_IN_GLOBAL,
                range,
                "only a single selector is supported inside :global()",
            );
        }
        match list.as_slice() {
            [single] => single.nodes.clone(),
            _ => vec![SelectorNode::Raw(stringify_selector_list(list))],
        }
    }

    fn scope_pseudo_class(
        &mut self,
        meta: &Rc<Meta>,
        node: &SelectorNode,
        name: &str,
        args: Option<&PseudoArgs>,
        chain: &Chain,
        range: TextRange,
    ) -> Result<Vec<SelectorNode>> {
        if is_global_pseudo(name) {
            return Ok(match args {
                Some(PseudoArgs::Selectors(list)) => self.emit_global(list, range),
                _ => vec![node.clone()],
            });
        }

        for link in chain {
            let Some(state) = link.class().and_then(|class| class.states.get(name)) else {
                continue;
            };
            return Ok(self.encode_state(&link.meta, name, state, args, node, range));
        }

        if let Some(PseudoArgs::Selectors(list)) = args {
            let scoped = self.scope_selector_list(meta, list, range)?;
            return Ok(vec![SelectorNode::PseudoClass {
                name: name.into(),
                args: Some(PseudoArgs::Selectors(scoped)),
            }]);
        }
        if !is_native_pseudo_class(name) && custom_selector_name(name).is_none() && self.is_current(meta) {
            self.diagnostics.warning(
                state_codes::UNKNOWN_STATE_USAGE,
                range,
                format!("unknown pseudo-state \":{name}\""),
            );
        }
        Ok(vec![node.clone()])
    }

    fn encode_state(
        &mut self,
        owner: &Meta,
        name: &str,
        state: &StateDef,
        args: Option<&PseudoArgs>,
        node: &SelectorNode,
        range: TextRange,
    ) -> Vec<SelectorNode> {
        match state {
            StateDef::Boolean => vec![SelectorNode::Class(
                boolean_state_class(&owner.namespace, name).into(),
            )],
            StateDef::Mapped(selector) => vec![SelectorNode::Raw(unquote(selector).trim().to_string())],
            StateDef::Param { ty, default } => {
                let authored = match args {
                    Some(PseudoArgs::Raw(raw)) => raw.trim().to_string(),
                    Some(PseudoArgs::Selectors(list)) => stringify_selector_list(list),
                    None => String::new(),
                };
                let argument = if authored.is_empty() {
                    default.clone()
                } else {
                    Some(authored)
                };
                let Some(argument) = argument else {
                    self.diagnostics.warning(
                        state_codes::NO_STATE_ARGUMENT,
                        range,
                        format!("pseudo-state \":{name}\" expects an argument"),
                    );
                    return vec![node.clone()];
                };
                if let Err(message) = validate_state_argument(ty, &argument) {
                    self.diagnostics.warning(
                        state_codes::INVALID_STATE_ARGUMENT,
                        range,
                        format!("pseudo-state \":{name}\": {message}"),
                    );
                }
                vec![SelectorNode::Class(
                    param_state_class(&owner.namespace, name, &argument).into(),
                )]
            }
        }
    }

    /// `::part` is a class of the stylesheet whose root is in scope; the
    /// result is a descendant selector and the context moves to the part.
    fn scope_pseudo_element(
        &mut self,
        meta: &Rc<Meta>,
        node: &SelectorNode,
        name: &str,
        chain: &Chain,
        range: TextRange,
    ) -> Result<(Vec<SelectorNode>, Chain)> {
        for link in chain {
            if link.class().is_none_or(|class| class.name != ROOT_CLASS) {
                continue;
            }
            let target = Rc::clone(&link.meta);

            if target.symbols.class(name).is_some() {
                let (emitted, part_chain) = self.scope_class(&target, name, range)?;
                let mut nodes = vec![SelectorNode::Combinator(Combinator::Descendant)];
                nodes.extend(emitted);
                return Ok((nodes, part_chain));
            }

            if target.symbols.custom_selector(name).is_some() {
                let Some(fragment) = self.custom_selector_fragment(&target, name, range) else {
                    return Ok((vec![node.clone()], Vec::new()));
                };
                let key = (target.source.clone(), SmolStr::from(name));
                self.custom_selector_stack.push(key);
                let scoped = self.scope_selector_list(&target, &fragment, range);
                self.custom_selector_stack.pop();
                let scoped = scoped?;
                let mut nodes = vec![SelectorNode::Combinator(Combinator::Descendant)];
                match scoped.as_slice() {
                    [single] => nodes.extend(single.nodes.iter().cloned()),
                    _ => nodes.push(SelectorNode::PseudoClass {
                        name: "is".into(),
                        args: Some(PseudoArgs::Selectors(scoped)),
                    }),
                }
                return Ok((nodes, Vec::new()));
            }
        }

        if !is_native_pseudo_element(name) && self.is_current(meta) {
            self.diagnostics.warning(
                pseudo_element_codes::UNKNOWN_PSEUDO_ELEMENT,
                range,
                format!("unknown pseudo-element \"::{name}\""),
            );
        }
        Ok((vec![node.clone()], Vec::new()))
    }
}
