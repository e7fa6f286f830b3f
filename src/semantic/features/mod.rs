//! Feature stages of the processor.
//!
//! Each CSS concept (imports, classes, states, ...) is a unit struct
//! implementing [`Feature`]. The processor walks the tree once and calls
//! every stage in [`FEATURES`] order for each node. Modules without
//! analysis hooks (`pseudo_elements`, `values`) only own the diagnostic
//! codes and helpers the transformer reports with.

pub mod classes;
pub mod containers;
pub mod custom_properties;
pub mod custom_selectors;
pub mod elements;
pub mod global;
pub mod imports;
pub mod keyframes;
pub mod layers;
pub mod mixins;
pub mod namespace;
pub mod pseudo_elements;
pub mod scope;
pub mod states;
pub mod values;
pub mod vars;

use std::path::PathBuf;

use smol_str::SmolStr;
use text_size::TextRange;

use crate::error::Result;
use crate::namespace::NamespaceResolver;
use crate::parser::{
    AtRule, Declaration, PseudoArgs, Rule, Selector, SelectorList, SelectorNode, Stylesheet,
    parse_selector_list,
};

use super::meta::Meta;
use super::symbols::{ClassSymbol, Symbol, SymbolNamespace};

/// Codes not owned by a single feature.
pub mod codes {
    pub const REDECLARE_SYMBOL: &str = "ST0001";

    pub const ALL: &[&str] = &[REDECLARE_SYMBOL];
}

/// Where a node sits in the tree.
#[derive(Debug, Clone, Copy)]
pub enum Parent<'a> {
    Root,
    Rule(&'a Rule),
    AtRule(&'a AtRule),
}

impl Parent<'_> {
    pub fn is_root(&self) -> bool {
        matches!(self, Parent::Root)
    }
}

/// Mutable state shared by the stages while one file is analyzed.
pub struct AnalyzeContext<'a> {
    pub meta: &'a mut Meta,
    pub namespace_resolver: &'a dyn NamespaceResolver,
    /// Last `@st-namespace` value seen.
    pub declared_namespace: Option<String>,
    /// Origin path from an `st-namespace-reference` comment.
    pub namespace_reference: Option<PathBuf>,
}

impl<'a> AnalyzeContext<'a> {
    pub fn new(meta: &'a mut Meta, namespace_resolver: &'a dyn NamespaceResolver) -> Self {
        Self {
            meta,
            namespace_resolver,
            declared_namespace: None,
            namespace_reference: None,
        }
    }

    pub fn error(&mut self, code: &'static str, range: TextRange, message: impl Into<String>) {
        self.meta.diagnostics.error(code, range, message);
    }

    pub fn warning(&mut self, code: &'static str, range: TextRange, message: impl Into<String>) {
        self.meta.diagnostics.warning(code, range, message);
    }

    pub fn info(&mut self, code: &'static str, range: TextRange, message: impl Into<String>) {
        self.meta.diagnostics.info(code, range, message);
    }

    /// Get or create the class `name`. A class named like an import becomes
    /// an alias of it; a clash with a var is reported and yields `None`.
    pub fn declare_class(&mut self, name: &str, range: TextRange) -> Option<&mut ClassSymbol> {
        enum Existing {
            Class,
            Import(super::symbols::ImportRef),
            Other(&'static str),
        }

        let existing = self
            .meta
            .symbols
            .get(SymbolNamespace::Main, name)
            .map(|symbol| match symbol {
                Symbol::Class(_) => Existing::Class,
                Symbol::Import(import) => Existing::Import(import.reference.clone()),
                other => Existing::Other(other.kind()),
            });

        match existing {
            Some(Existing::Class) => {}
            Some(Existing::Import(reference)) => {
                let mut class = ClassSymbol::new(name, range);
                class.alias = Some(reference);
                self.meta.symbols.insert(Symbol::Class(class));
            }
            Some(Existing::Other(kind)) => {
                self.warning(
                    codes::REDECLARE_SYMBOL,
                    range,
                    format!("class \"{name}\" redeclares the {kind} \"{name}\""),
                );
                return None;
            }
            None => {
                self.meta
                    .symbols
                    .insert(Symbol::Class(ClassSymbol::new(name, range)));
            }
        }
        self.meta.symbols.class_mut(name)
    }
}

/// One analysis stage. Every hook defaults to doing nothing.
pub trait Feature: Sync {
    fn name(&self) -> &'static str;

    /// Runs before the walk with the whole tree.
    fn analyze_init(&self, _cx: &mut AnalyzeContext<'_>, _ast: &Stylesheet) {}

    fn analyze_at_rule(&self, _cx: &mut AnalyzeContext<'_>, _at_rule: &AtRule, _parent: Parent<'_>) {}

    fn analyze_rule(
        &self,
        _cx: &mut AnalyzeContext<'_>,
        _rule: &Rule,
        _selectors: &SelectorList,
        _parent: Parent<'_>,
    ) {
    }

    fn analyze_declaration(&self, _cx: &mut AnalyzeContext<'_>, _decl: &Declaration, _rule: &Rule) {}

    /// Runs after the walk; `cx.meta.ast` is available again.
    fn analyze_done(&self, _cx: &mut AnalyzeContext<'_>) -> Result<()> {
        Ok(())
    }
}

/// Stages in the order they run. Imports come first so later stages can
/// see every imported name; namespace resolution happens in `analyze_done`.
pub static FEATURES: &[&dyn Feature] = &[
    &imports::Imports,
    &namespace::Namespace,
    &classes::Classes,
    &elements::Elements,
    &states::States,
    &global::Global,
    &vars::Vars,
    &keyframes::Keyframes,
    &layers::Layers,
    &containers::Containers,
    &custom_properties::CustomProperties,
    &custom_selectors::CustomSelectors,
    &scope::Scope,
    &mixins::Mixins,
];

// ============================================================================
// HELPERS
// ============================================================================

/// `:import` and `:vars` rules hold directives, not styles.
pub fn is_directive_rule(rule: &Rule) -> bool {
    matches!(rule.selector.trim(), ":import" | ":vars")
}

/// The class name when the rule's selector is exactly one class.
pub fn single_class_of(rule: &Rule) -> Option<SmolStr> {
    let list = parse_selector_list(&rule.selector);
    match list.as_slice() {
        [selector] => selector.as_single_class().map(SmolStr::from),
        _ => None,
    }
}

/// Visit nodes that take part in scoping: descends into selector arguments
/// of pseudo-classes except `:global()`.
pub fn walk_scoped(selector: &Selector, visit: &mut impl FnMut(&SelectorNode)) {
    for node in &selector.nodes {
        match node {
            SelectorNode::PseudoClass { name, .. } if name.eq_ignore_ascii_case("global") => {}
            SelectorNode::PseudoClass {
                args: Some(PseudoArgs::Selectors(list)),
                ..
            } => {
                visit(node);
                for inner in list {
                    walk_scoped(inner, visit);
                }
            }
            _ => visit(node),
        }
    }
}

/// Split `:global(name)` into `(name, true)`; anything else is `(value, false)`.
pub fn strip_global(value: &str) -> (&str, bool) {
    let trimmed = value.trim();
    match trimmed
        .strip_prefix(":global(")
        .and_then(|rest| rest.strip_suffix(')'))
    {
        Some(inner) => (inner.trim(), true),
        None => (trimmed, false),
    }
}

/// A CSS identifier: letters, digits, `-`, `_`, not starting with a digit.
pub fn is_ident(value: &str) -> bool {
    let mut chars = value.chars();
    match chars.next() {
        Some(first) if first.is_ascii_digit() => false,
        Some(first) => {
            (first.is_alphanumeric() || first == '-' || first == '_')
                && chars.all(|ch| ch.is_alphanumeric() || ch == '-' || ch == '_')
        }
        None => false,
    }
}
