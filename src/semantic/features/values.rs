//! `value()` references and custom value diagnostics.

use smol_str::SmolStr;

use crate::parser::{ValueNode, parse_value, split_by_comma, stringify_value};

pub mod codes {
    pub const UNKNOWN_VAR: &str = "ST1601";
    pub const CYCLIC_VALUE: &str = "ST1602";
    pub const CANNOT_USE_AS_VALUE: &str = "ST1603";
    pub const UNKNOWN_VALUE_PATH: &str = "ST1604";
    pub const INVALID_CUSTOM_VALUE: &str = "ST1605";
    pub const FORMATTER_FAILED: &str = "ST1606";
    pub const MISSING_VALUE_ARGS: &str = "ST1607";

    pub const ALL: &[&str] = &[
        UNKNOWN_VAR,
        CYCLIC_VALUE,
        CANNOT_USE_AS_VALUE,
        UNKNOWN_VALUE_PATH,
        INVALID_CUSTOM_VALUE,
        FORMATTER_FAILED,
        MISSING_VALUE_ARGS,
    ];
}

pub const VALUE_FUNCTION: &str = "value";

/// `value(name, key, ...)` arguments: the var name and the path into it.
pub fn value_call_args(nodes: &[ValueNode]) -> Option<(SmolStr, Vec<String>)> {
    let mut parts = split_by_comma(nodes)
        .into_iter()
        .map(|part| stringify_value(&part).trim().to_string());
    let name = parts.next().filter(|name| !name.is_empty())?;
    Some((name.into(), parts.collect()))
}

/// Names referenced through `value()` anywhere in a value, nested calls included.
pub fn value_references(value: &str) -> Vec<SmolStr> {
    fn collect(nodes: &[ValueNode], found: &mut Vec<SmolStr>) {
        for node in nodes {
            if let ValueNode::Function { name, nodes } = node {
                if name == VALUE_FUNCTION {
                    if let Some((var, _)) = value_call_args(nodes) {
                        found.push(var);
                    }
                }
                collect(nodes, found);
            }
        }
    }
    let mut found = Vec::new();
    collect(&parse_value(value), &mut found);
    found
}
