//! Declaration values: `value()` substitution, formatters, custom value
//! flattening and renaming of custom properties, keyframes and containers.

use std::path::PathBuf;
use std::rc::Rc;

use indexmap::IndexMap;
use smol_str::SmolStr;
use text_size::TextRange;

use crate::error::Result;
use crate::parser::{Declaration, ValueNode, parse_value, split_by_comma, stringify_value};
use crate::resolver::{ExternalSymbol, ImportTarget};
use crate::semantic::Meta;
use crate::semantic::features::custom_properties::{is_custom_property, scoped_custom_property};
use crate::semantic::features::imports::codes as import_codes;
use crate::semantic::features::keyframes::is_animation_property;
use crate::semantic::features::values::{VALUE_FUNCTION, codes, value_call_args};
use crate::semantic::symbols::{ImportedName, Symbol, SymbolNamespace};

use super::Transformer;

/// Var values that replace a stylesheet's own `:vars` while a mixin from
/// that stylesheet is applied.
#[derive(Debug, Clone)]
pub(super) struct Overrides {
    pub source: PathBuf,
    pub values: IndexMap<SmolStr, String>,
}

impl Overrides {
    fn get(&self, meta: &Meta, name: &str) -> Option<&String> {
        (self.source == meta.source)
            .then(|| self.values.get(name))
            .flatten()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum NameKind {
    Plain,
    Animation,
    Container,
}

type ValueStack = Vec<(PathBuf, SmolStr)>;

impl Transformer<'_> {
    /// The transformed copy of `decl`, or `None` for `-st-*` directives.
    pub(super) fn transform_declaration(
        &mut self,
        meta: &Rc<Meta>,
        decl: &Declaration,
        overrides: Option<&Overrides>,
    ) -> Result<Option<Declaration>> {
        if decl.prop.starts_with("-st-") {
            return Ok(None);
        }
        let value = self.evaluate(meta, &decl.value, overrides, decl.range)?;
        let value = self.flatten_custom_values(&value, decl.range);
        let prop = if is_custom_property(&decl.prop) {
            self.custom_property_name(meta, &decl.prop, decl.range)?
        } else {
            decl.prop.clone()
        };
        let kind = if is_animation_property(&decl.prop) {
            NameKind::Animation
        } else if matches!(decl.prop.as_str(), "container" | "container-name") {
            NameKind::Container
        } else {
            NameKind::Plain
        };
        let nodes = self.rename_in_value(meta, kind, &parse_value(&value), true, decl.range)?;
        Ok(Some(Declaration {
            prop,
            value: stringify_value(&nodes),
            important: decl.important,
            range: decl.range,
        }))
    }

    /// Substitute `value()` calls and formatters in `text`.
    pub(super) fn evaluate(
        &mut self,
        meta: &Rc<Meta>,
        text: &str,
        overrides: Option<&Overrides>,
        range: TextRange,
    ) -> Result<String> {
        let mut stack = ValueStack::new();
        self.evaluate_text(meta, text, overrides, range, &mut stack)
    }

    /// Final CSS text of a local `:vars` entry.
    pub(super) fn evaluated_var(&mut self, name: &str, range: TextRange) -> Result<Option<String>> {
        let meta = Rc::clone(&self.meta);
        let mut stack = ValueStack::new();
        let value = self.var_value(&meta, name, None, range, &mut stack)?;
        Ok(value.map(|value| self.flatten_custom_values(&value, range)))
    }

    fn evaluate_text(
        &mut self,
        meta: &Rc<Meta>,
        text: &str,
        overrides: Option<&Overrides>,
        range: TextRange,
        stack: &mut ValueStack,
    ) -> Result<String> {
        if !text.contains('(') {
            return Ok(text.to_string());
        }
        let nodes = self.evaluate_nodes(meta, &parse_value(text), overrides, range, stack)?;
        Ok(stringify_value(&nodes))
    }

    fn evaluate_nodes(
        &mut self,
        meta: &Rc<Meta>,
        nodes: &[ValueNode],
        overrides: Option<&Overrides>,
        range: TextRange,
        stack: &mut ValueStack,
    ) -> Result<Vec<ValueNode>> {
        let mut evaluated = Vec::with_capacity(nodes.len());
        for node in nodes {
            match node {
                ValueNode::Function { name, nodes: args } if name == VALUE_FUNCTION => {
                    match self.value_call(meta, args, overrides, range, stack)? {
                        Some(text) => evaluated.push(ValueNode::Word(text)),
                        None => evaluated.push(node.clone()),
                    }
                }
                ValueNode::Function { name, nodes: args } => {
                    let args = self.evaluate_nodes(meta, args, overrides, range, stack)?;
                    match self.apply_formatter(meta, name, &args, range)? {
                        Some(text) => evaluated.push(ValueNode::Word(text)),
                        None => evaluated.push(ValueNode::Function {
                            name: name.clone(),
                            nodes: args,
                        }),
                    }
                }
                other => evaluated.push(other.clone()),
            }
        }
        Ok(evaluated)
    }

    /// `value(name)` or `value(name, key, ...)`; `None` keeps the call as authored.
    fn value_call(
        &mut self,
        meta: &Rc<Meta>,
        args: &[ValueNode],
        overrides: Option<&Overrides>,
        range: TextRange,
        stack: &mut ValueStack,
    ) -> Result<Option<String>> {
        let Some((name, path)) = value_call_args(args) else {
            self.report_once(codes::MISSING_VALUE_ARGS, range, "value() expects a var name".to_string());
            return Ok(None);
        };
        let Some(raw) = self.var_value(meta, &name, overrides, range, stack)? else {
            return Ok(None);
        };
        if path.is_empty() {
            return Ok(Some(raw));
        }
        let options = self.options;
        let custom_values = &options.custom_values;
        let boxed = match custom_values.parse(&raw) {
            Ok(boxed) => boxed,
            Err(error) => {
                self.report_once(codes::INVALID_CUSTOM_VALUE, range, error.to_string());
                return Ok(None);
            }
        };
        match custom_values.get_path(&boxed, &path) {
            Ok(inner) => Ok(Some(custom_values.serialize(inner))),
            Err(error) => {
                self.report_once(codes::UNKNOWN_VALUE_PATH, range, error.to_string());
                Ok(None)
            }
        }
    }

    /// Evaluated text of var `name` as seen from `meta`, following imports.
    fn var_value(
        &mut self,
        meta: &Rc<Meta>,
        name: &str,
        overrides: Option<&Overrides>,
        range: TextRange,
        stack: &mut ValueStack,
    ) -> Result<Option<String>> {
        if let Some(value) = overrides.and_then(|overrides| overrides.get(meta, name)) {
            return Ok(Some(value.clone()));
        }
        let key = (meta.source.clone(), SmolStr::from(name));
        if stack.contains(&key) {
            let cycle: Vec<&str> = stack.iter().map(|(_, var)| var.as_str()).collect();
            self.report_once(
                codes::CYCLIC_VALUE,
                range,
                format!("cyclic value: {} -> {name}", cycle.join(" -> ")),
            );
            return Ok(None);
        }

        match meta.symbols.get(SymbolNamespace::Main, name) {
            Some(Symbol::Var(var)) => {
                let raw = var.value.clone();
                stack.push(key);
                let evaluated = self.evaluate_text(meta, &raw, overrides, range, stack);
                stack.pop();
                evaluated.map(Some)
            }
            Some(symbol) if symbol.import_ref().is_some() => {
                match self.resolver.resolve_symbol(meta, SymbolNamespace::Main, name)? {
                    Some(origin) => match &origin.symbol {
                        Symbol::Var(var) => {
                            stack.push(key);
                            let value = self.var_value(&origin.meta, &var.name, None, range, stack);
                            stack.pop();
                            value
                        }
                        other => {
                            self.report_once(
                                codes::CANNOT_USE_AS_VALUE,
                                range,
                                format!("{} \"{name}\" cannot be used as a value", other.kind()),
                            );
                            Ok(None)
                        }
                    },
                    None => {
                        self.report_once(
                            import_codes::UNKNOWN_IMPORTED_SYMBOL,
                            range,
                            format!("cannot resolve imported var \"{name}\""),
                        );
                        Ok(None)
                    }
                }
            }
            Some(other) => {
                self.report_once(
                    codes::CANNOT_USE_AS_VALUE,
                    range,
                    format!("{} \"{name}\" cannot be used as a value", other.kind()),
                );
                Ok(None)
            }
            None => {
                self.report_once(codes::UNKNOWN_VAR, range, format!("unknown var \"{name}\""));
                Ok(None)
            }
        }
    }

    fn report_once(&mut self, code: &'static str, range: TextRange, message: String) {
        let reported = self
            .diagnostics
            .iter()
            .any(|diagnostic| diagnostic.code == code && diagnostic.range == range && diagnostic.message == message);
        if !reported {
            self.diagnostics.warning(code, range, message);
        }
    }

    // ========================================================================
    // EXTERNAL MODULES
    // ========================================================================

    /// The external export bound to local name `name`, if it is imported
    /// from a non-stylesheet module.
    pub(super) fn external_symbol(
        &mut self,
        meta: &Rc<Meta>,
        name: &str,
        failure_code: &'static str,
        range: TextRange,
    ) -> Result<Option<ExternalSymbol>> {
        let Some(reference) = meta
            .symbols
            .get(SymbolNamespace::Main, name)
            .and_then(Symbol::import_ref)
            .cloned()
        else {
            return Ok(None);
        };
        let ImportTarget::External(path) = self.resolver.resolve_import(meta, reference.import)? else {
            return Ok(None);
        };
        let module = match self.resolver.external_modules().require(&path) {
            Ok(module) => module,
            Err(error) => {
                self.report_once(failure_code, range, error.to_string());
                return Ok(None);
            }
        };
        let imported = match &reference.imported {
            ImportedName::Default => None,
            ImportedName::Named(imported) => Some(imported.as_str()),
        };
        Ok(module.get(imported).cloned())
    }

    fn apply_formatter(
        &mut self,
        meta: &Rc<Meta>,
        name: &str,
        args: &[ValueNode],
        range: TextRange,
    ) -> Result<Option<String>> {
        let Some(ExternalSymbol::Formatter(formatter)) =
            self.external_symbol(meta, name, codes::FORMATTER_FAILED, range)?
        else {
            return Ok(None);
        };
        let args: Vec<String> = split_by_comma(args)
            .iter()
            .map(|arg| stringify_value(arg).trim().to_string())
            .filter(|arg| !arg.is_empty())
            .collect();
        match formatter(&args) {
            Ok(text) => Ok(Some(text)),
            Err(message) => {
                self.report_once(
                    codes::FORMATTER_FAILED,
                    range,
                    format!("formatter \"{name}\" failed: {message}"),
                );
                Ok(None)
            }
        }
    }

    // ========================================================================
    // NAMES
    // ========================================================================

    /// Replace `st-array(...)` and friends with their CSS text.
    fn flatten_custom_values(&mut self, value: &str, range: TextRange) -> String {
        if !value.contains('(') {
            return value.to_string();
        }
        let nodes = self.flatten_nodes(&parse_value(value), range);
        stringify_value(&nodes)
    }

    fn flatten_nodes(&mut self, nodes: &[ValueNode], range: TextRange) -> Vec<ValueNode> {
        let options = self.options;
        let custom_values = &options.custom_values;
        let mut flattened = Vec::with_capacity(nodes.len());
        for node in nodes {
            match node {
                ValueNode::Function { name, .. } if custom_values.get(name).is_some() => {
                    match custom_values.parse(&node.to_string()) {
                        Ok(boxed) => flattened.push(ValueNode::Word(custom_values.to_css(&boxed))),
                        Err(error) => {
                            self.report_once(codes::INVALID_CUSTOM_VALUE, range, error.to_string());
                            flattened.push(node.clone());
                        }
                    }
                }
                ValueNode::Function { name, nodes: args } => {
                    flattened.push(ValueNode::Function {
                        name: name.clone(),
                        nodes: self.flatten_nodes(args, range),
                    });
                }
                other => flattened.push(other.clone()),
            }
        }
        flattened
    }

    /// `--x` → `--ns-x` of the defining stylesheet; global ones are kept.
    pub(super) fn custom_property_name(
        &mut self,
        meta: &Rc<Meta>,
        name: &str,
        range: TextRange,
    ) -> Result<String> {
        let symbol = meta.symbols.get(SymbolNamespace::CustomProperty, name);
        let Some(symbol) = symbol else {
            return Ok(scoped_custom_property(&meta.namespace, name));
        };
        if symbol.import_ref().is_none() {
            return Ok(match symbol.as_named() {
                Some(named) if named.global => name.to_string(),
                _ => scoped_custom_property(&meta.namespace, name),
            });
        }
        match self.resolver.resolve_symbol(meta, SymbolNamespace::CustomProperty, name)? {
            Some(origin) => Ok(match origin.symbol.as_named() {
                Some(named) if named.global => named.name.to_string(),
                Some(named) => scoped_custom_property(&origin.meta.namespace, &named.name),
                None => scoped_custom_property(&origin.meta.namespace, name),
            }),
            None => {
                self.report_once(
                    import_codes::UNKNOWN_IMPORTED_SYMBOL,
                    range,
                    format!("cannot resolve imported custom property \"{name}\""),
                );
                Ok(scoped_custom_property(&meta.namespace, name))
            }
        }
    }

    /// Scope `var(--x)` references anywhere, and keyframes / container
    /// names at the top level of the properties that name them.
    fn rename_in_value(
        &mut self,
        meta: &Rc<Meta>,
        kind: NameKind,
        nodes: &[ValueNode],
        top_level: bool,
        range: TextRange,
    ) -> Result<Vec<ValueNode>> {
        let mut renamed = Vec::with_capacity(nodes.len());
        let mut after_slash = false;
        for node in nodes {
            match node {
                ValueNode::Function { name, nodes: args } if name == "var" => {
                    let mut args = args.clone();
                    if let Some(ValueNode::Word(first)) = args.iter_mut().find(|arg| !arg.is_space()) {
                        if is_custom_property(first) {
                            let scoped = self.custom_property_name(meta, first, range)?;
                            *first = scoped;
                        }
                    }
                    renamed.push(ValueNode::Function {
                        name: name.clone(),
                        nodes: self.rename_in_value(meta, NameKind::Plain, &args, false, range)?,
                    });
                }
                ValueNode::Function { name, nodes: args } => renamed.push(ValueNode::Function {
                    name: name.clone(),
                    nodes: self.rename_in_value(meta, NameKind::Plain, args, false, range)?,
                }),
                ValueNode::Div { value, .. } => {
                    match value {
                        '/' => after_slash = true,
                        ',' => after_slash = false,
                        _ => {}
                    }
                    renamed.push(node.clone());
                }
                ValueNode::Word(word) if top_level && kind != NameKind::Plain => {
                    let namespace = match kind {
                        NameKind::Container if !after_slash => Some(SymbolNamespace::Container),
                        NameKind::Animation => Some(SymbolNamespace::Keyframes),
                        _ => None,
                    };
                    let scoped = match namespace {
                        Some(namespace) => self.scoped_symbol_name(meta, namespace, word, range)?,
                        None => None,
                    };
                    renamed.push(ValueNode::Word(scoped.unwrap_or_else(|| word.clone())));
                }
                other => renamed.push(other.clone()),
            }
        }
        Ok(renamed)
    }
}
