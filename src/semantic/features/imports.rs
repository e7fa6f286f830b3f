//! `:import { -st-from; -st-default; -st-named }` and `@st-import`.

use smol_str::SmolStr;
use text_size::TextRange;

use crate::parser::{AtRule, Node, Rule, SelectorList, Stylesheet, ValueNode, parse_value, split_by_comma, unquote};
use crate::semantic::meta::ImportRecord;
use crate::semantic::symbols::{
    ImportRef, ImportSymbol, ImportedName, NamedSymbol, Symbol, SymbolNamespace,
};

use super::{AnalyzeContext, Feature, Parent};

pub mod codes {
    pub const INVALID_ST_IMPORT_FORMAT: &str = "ST0101";
    pub const EMPTY_IMPORT_FROM: &str = "ST0102";
    pub const MISSING_IMPORT_FROM: &str = "ST0103";
    pub const MULTIPLE_FROM_IN_IMPORT: &str = "ST0104";
    pub const ILLEGAL_PROP_IN_IMPORT: &str = "ST0105";
    pub const DEFAULT_IMPORT_IS_LOWER_CASE: &str = "ST0106";
    pub const NO_IMPORT_IN_NESTED_SCOPE: &str = "ST0107";
    pub const REDECLARED_IMPORT_SYMBOL: &str = "ST0108";
    pub const INVALID_NAMED_IMPORT: &str = "ST0109";
    pub const UNKNOWN_IMPORTED_SYMBOL: &str = "ST0110";

    pub const ALL: &[&str] = &[
        INVALID_ST_IMPORT_FORMAT,
        EMPTY_IMPORT_FROM,
        MISSING_IMPORT_FROM,
        MULTIPLE_FROM_IN_IMPORT,
        ILLEGAL_PROP_IN_IMPORT,
        DEFAULT_IMPORT_IS_LOWER_CASE,
        NO_IMPORT_IN_NESTED_SCOPE,
        REDECLARED_IMPORT_SYMBOL,
        INVALID_NAMED_IMPORT,
        UNKNOWN_IMPORTED_SYMBOL,
    ];
}

pub struct Imports;

impl Feature for Imports {
    fn name(&self) -> &'static str {
        "imports"
    }

    fn analyze_init(&self, cx: &mut AnalyzeContext<'_>, ast: &Stylesheet) {
        for node in &ast.nodes {
            match node {
                Node::Rule(rule) if is_import_rule(rule) => {
                    if let Some(record) = parse_import_rule(cx, rule) {
                        register(cx, record);
                    }
                }
                Node::AtRule(at_rule) if at_rule.name == "st-import" => {
                    if let Some(record) = parse_st_import(cx, at_rule) {
                        register(cx, record);
                    }
                }
                _ => {}
            }
        }
    }

    fn analyze_rule(
        &self,
        cx: &mut AnalyzeContext<'_>,
        rule: &Rule,
        _selectors: &SelectorList,
        parent: Parent<'_>,
    ) {
        if !parent.is_root() && is_import_rule(rule) {
            cx.error(
                codes::NO_IMPORT_IN_NESTED_SCOPE,
                rule.range,
                "cannot use :import inside of a nested scope",
            );
        }
    }

    fn analyze_at_rule(&self, cx: &mut AnalyzeContext<'_>, at_rule: &AtRule, parent: Parent<'_>) {
        if !parent.is_root() && at_rule.name == "st-import" {
            cx.error(
                codes::NO_IMPORT_IN_NESTED_SCOPE,
                at_rule.range,
                "cannot use @st-import inside of a nested scope",
            );
        }
    }
}

pub fn is_import_rule(rule: &Rule) -> bool {
    rule.selector.trim() == ":import"
}

fn parse_import_rule(cx: &mut AnalyzeContext<'_>, rule: &Rule) -> Option<ImportRecord> {
    let mut record = ImportRecord::new("", cx.meta.context_dir(), rule.range);
    let mut from_count = 0;

    for node in &rule.nodes {
        let Node::Decl(decl) = node else {
            if !matches!(node, Node::Comment(_)) {
                cx.warning(
                    codes::ILLEGAL_PROP_IN_IMPORT,
                    node.range(),
                    "only declarations are allowed inside :import",
                );
            }
            continue;
        };
        match decl.prop.as_str() {
            "-st-from" => {
                from_count += 1;
                let request = unquote(&decl.value);
                if request.is_empty() {
                    cx.error(codes::EMPTY_IMPORT_FROM, decl.range, "empty -st-from in :import");
                }
                record.request = request.to_string();
            }
            "-st-default" => {
                let name = decl.value.trim();
                check_default_name(cx, name, decl.range);
                record.default_name = Some(name.into());
            }
            "-st-named" => parse_named(cx, &decl.value, &mut record, decl.range),
            other => cx.warning(
                codes::ILLEGAL_PROP_IN_IMPORT,
                decl.range,
                format!("\"{other}\" is not a valid :import property"),
            ),
        }
    }

    if from_count == 0 {
        cx.error(codes::MISSING_IMPORT_FROM, rule.range, ":import is missing -st-from");
        return None;
    }
    if from_count > 1 {
        cx.warning(
            codes::MULTIPLE_FROM_IN_IMPORT,
            rule.range,
            "multiple -st-from in :import, the last one is used",
        );
    }
    (!record.request.is_empty()).then_some(record)
}

/// `@st-import Default, [a, b as c, keyframes(k)] from "./x.st.css";`
fn parse_st_import(cx: &mut AnalyzeContext<'_>, at_rule: &AtRule) -> Option<ImportRecord> {
    let params = at_rule.params.trim();
    let mut record = ImportRecord::new("", cx.meta.context_dir(), at_rule.range);

    // Side effect only: `@st-import "./x.st.css";`
    if is_quoted(params) {
        record.request = unquote(params).to_string();
        return (!record.request.is_empty()).then_some(record);
    }

    let invalid = |cx: &mut AnalyzeContext<'_>| {
        cx.error(
            codes::INVALID_ST_IMPORT_FORMAT,
            at_rule.range,
            format!("invalid @st-import \"{params}\""),
        );
    };

    let Some((head, from)) = split_from_clause(params) else {
        invalid(cx);
        return None;
    };
    let from = from.trim().trim_end_matches(';').trim();
    if !is_quoted(from) {
        invalid(cx);
        return None;
    }
    record.request = unquote(from).to_string();
    if record.request.is_empty() {
        cx.error(codes::EMPTY_IMPORT_FROM, at_rule.range, "empty from in @st-import");
        return None;
    }

    let head = head.trim();
    let (default_part, named_part) = match head.find('[') {
        Some(open) => {
            let Some(close) = head.rfind(']').filter(|close| *close > open) else {
                invalid(cx);
                return None;
            };
            (&head[..open], Some(&head[open + 1..close]))
        }
        None => (head, None),
    };

    let default_name = default_part.trim().trim_end_matches(',').trim();
    if !default_name.is_empty() {
        if default_name.contains(|ch: char| ch.is_whitespace() || ch == ',') {
            invalid(cx);
            return None;
        }
        check_default_name(cx, default_name, at_rule.range);
        record.default_name = Some(default_name.into());
    }
    if let Some(named) = named_part {
        parse_named(cx, named, &mut record, at_rule.range);
    }
    Some(record)
}

fn is_quoted(value: &str) -> bool {
    value.len() >= 2
        && ((value.starts_with('"') && value.ends_with('"'))
            || (value.starts_with('\'') && value.ends_with('\'')))
}

/// Split at the last standalone `from` keyword.
fn split_from_clause(params: &str) -> Option<(&str, &str)> {
    params
        .rmatch_indices("from")
        .find(|(index, _)| {
            let before = params[..*index].chars().next_back();
            let after = params[index + 4..].chars().next();
            before.is_none_or(|ch| ch.is_whitespace() || ch == ']')
                && after.is_some_and(|ch| ch.is_whitespace() || ch == '"' || ch == '\'')
        })
        .map(|(index, _)| (&params[..index], &params[index + 4..]))
}

fn check_default_name(cx: &mut AnalyzeContext<'_>, name: &str, range: TextRange) {
    if name.chars().next().is_some_and(char::is_lowercase) {
        cx.warning(
            codes::DEFAULT_IMPORT_IS_LOWER_CASE,
            range,
            format!("default import \"{name}\" should start with an upper-case letter"),
        );
    }
}

/// `a, b as c, keyframes(k as k2), layer(l), container(c), --prop`
fn parse_named(cx: &mut AnalyzeContext<'_>, value: &str, record: &mut ImportRecord, range: TextRange) {
    for part in split_by_comma(&parse_value(value)) {
        match part.as_slice() {
            [] => {}
            [ValueNode::Function { name, nodes }] if is_typed_import(name) => {
                for inner in split_by_comma(nodes) {
                    if inner.is_empty() {
                        continue;
                    }
                    match as_pair(&inner) {
                        Some((imported, local)) => {
                            let map = match name.as_str() {
                                "keyframes" => &mut record.keyframes,
                                "layer" => &mut record.layers,
                                _ => &mut record.containers,
                            };
                            map.insert(local, imported);
                        }
                        None => invalid_named(cx, &inner, range),
                    }
                }
            }
            _ => match as_pair(&part) {
                Some((imported, local)) if imported.starts_with("--") => {
                    record.custom_properties.insert(local, imported);
                }
                Some((imported, local)) => {
                    record.named.insert(local, imported);
                }
                None => invalid_named(cx, &part, range),
            },
        }
    }
}

fn is_typed_import(name: &str) -> bool {
    matches!(name, "keyframes" | "layer" | "container")
}

fn invalid_named(cx: &mut AnalyzeContext<'_>, part: &[ValueNode], range: TextRange) {
    cx.error(
        codes::INVALID_NAMED_IMPORT,
        range,
        format!(
            "invalid named import \"{}\"",
            crate::parser::stringify_value(part).trim()
        ),
    );
}

/// `name` or `name as local`, returned as `(imported, local)`.
fn as_pair(nodes: &[ValueNode]) -> Option<(SmolStr, SmolStr)> {
    let words: Vec<&str> = nodes
        .iter()
        .filter(|node| !node.is_space())
        .map(|node| match node {
            ValueNode::Word(word) => Some(word.as_str()),
            _ => None,
        })
        .collect::<Option<_>>()?;
    match words.as_slice() {
        [name] => Some(((*name).into(), (*name).into())),
        [imported, "as", local] => Some(((*imported).into(), (*local).into())),
        _ => None,
    }
}

fn register(cx: &mut AnalyzeContext<'_>, record: ImportRecord) {
    let import = cx.meta.imports.len();
    let range = record.range;
    let reference = |imported: ImportedName| ImportRef { import, imported };

    if let Some(default_name) = &record.default_name {
        add_import_symbol(cx, default_name, reference(ImportedName::Default), range);
    }
    for (local, imported) in &record.named {
        add_import_symbol(cx, local, reference(ImportedName::Named(imported.clone())), range);
    }
    let typed = [
        (&record.keyframes, SymbolNamespace::Keyframes),
        (&record.layers, SymbolNamespace::Layer),
        (&record.containers, SymbolNamespace::Container),
        (&record.custom_properties, SymbolNamespace::CustomProperty),
    ];
    for (map, namespace) in typed {
        for (local, imported) in map {
            let named = NamedSymbol::imported(
                local.clone(),
                reference(ImportedName::Named(imported.clone())),
                range,
            );
            cx.meta.symbols.insert(match namespace {
                SymbolNamespace::Keyframes => Symbol::Keyframes(named),
                SymbolNamespace::Layer => Symbol::Layer(named),
                SymbolNamespace::Container => Symbol::Container(named),
                _ => Symbol::CustomProperty(named),
            });
        }
    }

    tracing::trace!(request = %record.request, "import registered");
    cx.meta.imports.push(record);
}

fn add_import_symbol(cx: &mut AnalyzeContext<'_>, name: &SmolStr, reference: ImportRef, range: TextRange) {
    if cx.meta.symbols.contains(SymbolNamespace::Main, name) {
        cx.warning(
            codes::REDECLARED_IMPORT_SYMBOL,
            range,
            format!("\"{name}\" is imported more than once, the last import is used"),
        );
    }
    cx.meta.symbols.insert(Symbol::Import(ImportSymbol {
        name: name.clone(),
        reference,
        range,
    }));
}
