//! Transformer: turns a processed [`Meta`] into scoped CSS and an export map.
//!
//! ```text
//! Meta.ast ──▶ custom selector expansion ──▶ & nesting ──▶ selector scoping
//!          ──▶ declarations (value(), mixins, custom properties, names)
//!          ──▶ Meta.output_ast (flat) + StylableExports
//! ```
//!
//! Cross-file lookups go through the [`StylableResolver`]. A request that
//! cannot be resolved is reported as a diagnostic here and the affected
//! fragment is emitted as authored; other resolver failures abort.

mod exports;
mod mixins;
mod selector;
mod values;

use std::path::PathBuf;
use std::rc::Rc;

use indexmap::IndexSet;
use rustc_hash::FxHashMap;
use smol_str::SmolStr;
use text_size::TextRange;

use crate::config::Mode;
use crate::custom_values::CustomValueTypes;
use crate::diagnostics::Diagnostics;
use crate::error::Result;
use crate::parser::{
    AtRule, Comment, Node, Rule, SelectorList, Stylesheet, parse_selector_list,
    stringify_selector_list,
};
use crate::resolver::{ResolvedOrigin, StylableResolver};
use crate::semantic::Meta;
use crate::semantic::features::containers::container_query_name;
use crate::semantic::features::custom_properties::GLOBAL_CUSTOM_PROPERTY;
use crate::semantic::features::imports::codes as import_codes;
use crate::semantic::features::is_directive_rule;
use crate::semantic::features::keyframes::is_keyframes_at_rule;
use crate::semantic::features::layers::layer_names;
use crate::semantic::features::namespace::is_namespace_directive;
use crate::semantic::features::scope::ST_SCOPE;
use crate::semantic::symbols::SymbolNamespace;

pub use exports::StylableExports;
pub use selector::nest_selectors;

/// Knobs of one transform.
#[derive(Debug, Clone)]
pub struct TransformOptions {
    pub mode: Mode,
    pub delimiter: String,
    pub custom_values: CustomValueTypes,
}

impl Default for TransformOptions {
    fn default() -> Self {
        Self {
            mode: Mode::Production,
            delimiter: crate::base::constants::DEFAULT_DELIMITER.to_string(),
            custom_values: CustomValueTypes::new(),
        }
    }
}

/// The transformed copy of a meta and its exports.
#[derive(Debug, Clone)]
pub struct TransformResult {
    /// Carries `output_ast`, `globals` and `transform_diagnostics`.
    pub meta: Meta,
    pub exports: StylableExports,
}

/// Transform `meta`. Starts a new resolver pass, so request memos from
/// earlier transforms are not reused.
///
/// Missing symbols are diagnostics; an import request the module resolver
/// cannot map to a file fails the whole transform with `ModuleNotFound`.
#[tracing::instrument(level = "debug", skip_all, fields(path = %meta.source.display()))]
pub fn transform(
    resolver: &StylableResolver,
    meta: Rc<Meta>,
    options: &TransformOptions,
) -> Result<TransformResult> {
    resolver.begin_pass();
    Transformer::new(resolver, options, meta).run()
}

/// Selector of the enclosing rule: authored (custom selectors expanded,
/// `&` resolved) and scoped.
#[derive(Debug, Clone)]
struct ParentSelector {
    authored: SelectorList,
    scoped: SelectorList,
}

type Chain = Vec<ResolvedOrigin>;

struct Transformer<'a> {
    resolver: &'a StylableResolver,
    options: &'a TransformOptions,
    meta: Rc<Meta>,
    diagnostics: Diagnostics,
    globals: IndexSet<String>,
    root_chains: FxHashMap<PathBuf, Chain>,
    /// Custom selectors currently being expanded.
    custom_selector_stack: Vec<(PathBuf, SmolStr)>,
    /// Class mixins currently being applied.
    mixin_stack: Vec<(PathBuf, SmolStr)>,
}

impl<'a> Transformer<'a> {
    fn new(resolver: &'a StylableResolver, options: &'a TransformOptions, meta: Rc<Meta>) -> Self {
        Self {
            resolver,
            options,
            diagnostics: meta.transform_diagnostics.clone(),
            meta,
            globals: IndexSet::new(),
            root_chains: FxHashMap::default(),
            custom_selector_stack: Vec::new(),
            mixin_stack: Vec::new(),
        }
    }

    fn run(mut self) -> Result<TransformResult> {
        let meta = Rc::clone(&self.meta);
        let mut output = Vec::new();
        self.transform_nodes(&meta.ast.nodes, None, &mut output)?;
        let exports = self.exports()?;

        let mut result = (*meta).clone();
        result.output_ast = Some(Stylesheet::new(output));
        result.globals.extend(self.globals);
        result.transform_diagnostics = self.diagnostics;
        tracing::debug!(
            namespace = %result.namespace,
            classes = exports.classes.len(),
            diagnostics = result.transform_diagnostics.len(),
            "stylesheet transformed"
        );
        Ok(TransformResult {
            meta: result,
            exports,
        })
    }

    // ========================================================================
    // HELPERS
    // ========================================================================

    fn is_current(&self, meta: &Meta) -> bool {
        meta.source == self.meta.source
    }

    fn scoped_name(&self, namespace: &str, name: &str) -> String {
        format!("{namespace}{}{name}", self.options.delimiter)
    }

    fn root_chain(&mut self, meta: &Rc<Meta>) -> Result<Chain> {
        if let Some(chain) = self.root_chains.get(&meta.source) {
            return Ok(chain.clone());
        }
        let chain = self.resolver.resolve_extends(meta, crate::base::constants::ROOT_CLASS)?;
        self.root_chains.insert(meta.source.clone(), chain.clone());
        Ok(chain)
    }

    /// Scoped or global name of a keyframes / layer / container symbol.
    fn scoped_symbol_name(
        &mut self,
        meta: &Rc<Meta>,
        namespace: SymbolNamespace,
        name: &str,
        range: TextRange,
    ) -> Result<Option<String>> {
        if meta.symbols.get(namespace, name).is_none() {
            return Ok(None);
        }
        let Some(origin) = self.resolver.resolve_symbol(meta, namespace, name)? else {
            if self.is_current(meta) {
                self.diagnostics.warning(
                    import_codes::UNKNOWN_IMPORTED_SYMBOL,
                    range,
                    format!("cannot resolve imported symbol \"{name}\""),
                );
            }
            return Ok(None);
        };
        let Some(named) = origin.symbol.as_named() else {
            return Ok(None);
        };
        if named.global {
            return Ok(Some(named.name.to_string()));
        }
        Ok(Some(self.scoped_name(&origin.meta.namespace, &named.name)))
    }

    // ========================================================================
    // TREE
    // ========================================================================

    fn transform_nodes(
        &mut self,
        nodes: &[Node],
        parent: Option<&ParentSelector>,
        output: &mut Vec<Node>,
    ) -> Result<()> {
        for node in nodes {
            match node {
                Node::Rule(rule) if is_directive_rule(rule) => {}
                Node::Rule(rule) => self.transform_rule(rule, parent, output)?,
                Node::AtRule(at_rule) => self.transform_at_rule(at_rule, parent, output)?,
                Node::Comment(comment) if parent.is_none() => {
                    output.push(Node::Comment(comment.clone()));
                }
                Node::Comment(_) | Node::Decl(_) => {}
            }
        }
        Ok(())
    }

    fn transform_rule(
        &mut self,
        rule: &Rule,
        parent: Option<&ParentSelector>,
        output: &mut Vec<Node>,
    ) -> Result<()> {
        let meta = Rc::clone(&self.meta);
        let authored = parse_selector_list(&rule.selector);
        let expanded = self.expand_custom_selectors(&meta, &authored, rule.range);
        let authored = match parent {
            Some(parent) => nest_selectors(&parent.authored, &expanded),
            None => expanded,
        };
        let scoped = self.scope_selector_list(&meta, &authored, rule.range)?;
        let current = ParentSelector { authored, scoped };

        let mut trailing = Vec::new();
        let body = self.rule_body(&meta, &rule.nodes, &current.scoped, None, None, &mut trailing)?;

        if self.options.mode == Mode::Development {
            output.push(Node::Comment(Comment {
                text: format!(" {} ", rule.selector.trim()),
                range: rule.range,
            }));
        }
        output.push(Node::Rule(Rule {
            selector: stringify_selector_list(&current.scoped),
            nodes: body,
            range: rule.range,
        }));
        output.extend(trailing);
        self.transform_children(&rule.nodes, Some(&current), output)
    }

    /// Nested rules and at-rules only; declarations and comments are part
    /// of the enclosing body.
    fn transform_children(
        &mut self,
        nodes: &[Node],
        parent: Option<&ParentSelector>,
        output: &mut Vec<Node>,
    ) -> Result<()> {
        for child in nodes {
            match child {
                Node::Rule(rule) if is_directive_rule(rule) => {}
                Node::Rule(rule) => self.transform_rule(rule, parent, output)?,
                Node::AtRule(at_rule) => self.transform_at_rule(at_rule, parent, output)?,
                _ => {}
            }
        }
        Ok(())
    }

    fn transform_at_rule(
        &mut self,
        at_rule: &AtRule,
        parent: Option<&ParentSelector>,
        output: &mut Vec<Node>,
    ) -> Result<()> {
        let name = at_rule.name.as_str();
        if matches!(name, "st-import" | "custom-selector") || name == GLOBAL_CUSTOM_PROPERTY {
            return Ok(());
        }
        if is_namespace_directive(at_rule) {
            return Ok(());
        }
        if name == ST_SCOPE {
            return self.transform_scope(at_rule, parent, output);
        }
        if is_keyframes_at_rule(at_rule) {
            output.push(Node::AtRule(self.transform_keyframes(at_rule)?));
            return Ok(());
        }

        let meta = Rc::clone(&self.meta);
        let params = match name {
            "layer" => self.transform_layer_params(&meta, &at_rule.params, at_rule.range)?,
            "container" => self.transform_container_params(&meta, &at_rule.params, at_rule.range)?,
            "property" => self.custom_property_name(&meta, at_rule.params.trim(), at_rule.range)?,
            _ => at_rule.params.clone(),
        };
        let nodes = match &at_rule.nodes {
            Some(nodes) => Some(self.transform_at_rule_body(nodes, parent)?),
            None => None,
        };
        output.push(Node::AtRule(AtRule {
            name: at_rule.name.clone(),
            params,
            nodes,
            range: at_rule.range,
        }));
        Ok(())
    }

    /// Body of a conditional / grouping at-rule. Declarations directly in
    /// the body belong to the enclosing rule, or to the at-rule itself at
    /// the top level (`@font-face`, `@page`, ...).
    fn transform_at_rule_body(
        &mut self,
        nodes: &[Node],
        parent: Option<&ParentSelector>,
    ) -> Result<Vec<Node>> {
        let meta = Rc::clone(&self.meta);
        let mut body = Vec::new();
        let has_declarations = nodes.iter().any(|node| matches!(node, Node::Decl(_)));
        if has_declarations {
            let mut trailing = Vec::new();
            match parent {
                Some(parent) => {
                    let declarations =
                        self.rule_body(&meta, nodes, &parent.scoped, None, None, &mut trailing)?;
                    let range = nodes.first().map(Node::range).unwrap_or_default();
                    body.push(Node::Rule(Rule {
                        selector: stringify_selector_list(&parent.scoped),
                        nodes: declarations,
                        range,
                    }));
                }
                None => {
                    let declarations = self.rule_body(&meta, nodes, &[], None, None, &mut trailing)?;
                    body.extend(declarations);
                }
            }
            body.extend(trailing);
            self.transform_children(nodes, parent, &mut body)?;
        } else {
            self.transform_nodes(nodes, parent, &mut body)?;
        }
        Ok(body)
    }

    /// `@st-scope .x { .y {} }` → `.ns__x .ns__y {}`; the at-rule is removed.
    fn transform_scope(
        &mut self,
        at_rule: &AtRule,
        parent: Option<&ParentSelector>,
        output: &mut Vec<Node>,
    ) -> Result<()> {
        let Some(nodes) = &at_rule.nodes else {
            return Ok(());
        };
        let meta = Rc::clone(&self.meta);
        let scope = parse_selector_list(&at_rule.params);
        let scope = self.expand_custom_selectors(&meta, &scope, at_rule.range);
        let authored = match parent {
            Some(parent) => nest_selectors(&parent.authored, &scope),
            None => scope,
        };
        if authored.iter().all(|selector| selector.nodes.is_empty()) {
            // Reported by the processor; keep the rules unscoped.
            return self.transform_nodes(nodes, parent, output);
        }
        let scoped = self.scope_selector_list(&meta, &authored, at_rule.range)?;
        let scope = ParentSelector { authored, scoped };
        self.transform_nodes(nodes, Some(&scope), output)
    }

    fn transform_keyframes(&mut self, at_rule: &AtRule) -> Result<AtRule> {
        let meta = Rc::clone(&self.meta);
        let (name, global) = crate::semantic::features::strip_global(&at_rule.params);
        let params = if global {
            name.to_string()
        } else {
            self.scoped_symbol_name(&meta, SymbolNamespace::Keyframes, name, at_rule.range)?
                .unwrap_or_else(|| at_rule.params.clone())
        };
        let nodes = match &at_rule.nodes {
            Some(frames) => {
                let mut body = Vec::new();
                for frame in frames {
                    match frame {
                        Node::Rule(rule) => {
                            let mut trailing = Vec::new();
                            let nodes =
                                self.rule_body(&meta, &rule.nodes, &[], None, None, &mut trailing)?;
                            body.push(Node::Rule(Rule {
                                selector: rule.selector.clone(),
                                nodes,
                                range: rule.range,
                            }));
                        }
                        other => body.push(other.clone()),
                    }
                }
                Some(body)
            }
            None => None,
        };
        Ok(AtRule {
            name: at_rule.name.clone(),
            params,
            nodes,
            range: at_rule.range,
        })
    }

    fn transform_layer_params(
        &mut self,
        meta: &Rc<Meta>,
        params: &str,
        range: TextRange,
    ) -> Result<String> {
        let mut entries = Vec::new();
        for entry in params.split(',').map(str::trim).filter(|entry| !entry.is_empty()) {
            let mut segments = Vec::new();
            for (segment, global) in layer_names(entry) {
                let renamed = if global {
                    None
                } else {
                    self.scoped_symbol_name(meta, SymbolNamespace::Layer, segment, range)?
                };
                segments.push(renamed.unwrap_or_else(|| segment.to_string()));
            }
            entries.push(segments.join("."));
        }
        Ok(entries.join(", "))
    }

    fn transform_container_params(
        &mut self,
        meta: &Rc<Meta>,
        params: &str,
        range: TextRange,
    ) -> Result<String> {
        let Some(name) = container_query_name(params) else {
            return Ok(params.to_string());
        };
        let Some(scoped) = self.scoped_symbol_name(meta, SymbolNamespace::Container, name, range)?
        else {
            return Ok(params.to_string());
        };
        let rest = params.trim_start()[name.len()..].to_string();
        Ok(format!("{scoped}{rest}"))
    }
}

#[cfg(test)]
mod tests;
