//! Pseudo-state definitions (`-st-states`) and their class encoding.

use smol_str::SmolStr;

use crate::base::constants::{BOOLEAN_STATE_DELIMITER, PARAM_STATE_DELIMITER};
use crate::parser::{Declaration, Rule, ValueNode, parse_value, split_by_comma, stringify_value};
use crate::semantic::symbols::{StateDef, StateParamType};

use super::{AnalyzeContext, Feature, single_class_of};

pub mod codes {
    pub const STATE_DEFINITION_IN_COMPLEX: &str = "ST1301";
    pub const UNKNOWN_STATE_TYPE: &str = "ST1302";
    pub const RESERVED_NATIVE_STATE: &str = "ST1303";
    pub const UNKNOWN_STATE_USAGE: &str = "ST1304";
    pub const NO_STATE_ARGUMENT: &str = "ST1305";
    pub const INVALID_STATE_ARGUMENT: &str = "ST1306";
    pub const DUPLICATE_STATE: &str = "ST1307";
    pub const INVALID_STATE_DEFINITION: &str = "ST1308";

    pub const ALL: &[&str] = &[
        STATE_DEFINITION_IN_COMPLEX,
        UNKNOWN_STATE_TYPE,
        RESERVED_NATIVE_STATE,
        UNKNOWN_STATE_USAGE,
        NO_STATE_ARGUMENT,
        INVALID_STATE_ARGUMENT,
        DUPLICATE_STATE,
        INVALID_STATE_DEFINITION,
    ];
}

pub const STATES: &str = "-st-states";

/// Pseudo-classes that are always passed through untouched.
pub const NATIVE_PSEUDO_CLASSES: &[&str] = &[
    "active",
    "any",
    "any-link",
    "autofill",
    "blank",
    "checked",
    "current",
    "default",
    "defined",
    "dir",
    "disabled",
    "empty",
    "enabled",
    "first",
    "first-child",
    "first-of-type",
    "focus",
    "focus-visible",
    "focus-within",
    "fullscreen",
    "future",
    "has",
    "host",
    "host-context",
    "hover",
    "in-range",
    "indeterminate",
    "invalid",
    "is",
    "lang",
    "last-child",
    "last-of-type",
    "left",
    "link",
    "local-link",
    "matches",
    "modal",
    "not",
    "nth-child",
    "nth-col",
    "nth-last-child",
    "nth-last-col",
    "nth-last-of-type",
    "nth-of-type",
    "only-child",
    "only-of-type",
    "optional",
    "out-of-range",
    "past",
    "paused",
    "picture-in-picture",
    "placeholder-shown",
    "playing",
    "popover-open",
    "read-only",
    "read-write",
    "required",
    "right",
    "root",
    "scope",
    "target",
    "target-within",
    "user-invalid",
    "user-valid",
    "valid",
    "visited",
    "where",
];

pub fn is_native_pseudo_class(name: &str) -> bool {
    let lower = name.to_ascii_lowercase();
    lower.starts_with("-webkit-")
        || lower.starts_with("-moz-")
        || lower.starts_with("-ms-")
        || NATIVE_PSEUDO_CLASSES.contains(&lower.as_str())
}

pub struct States;

impl Feature for States {
    fn name(&self) -> &'static str {
        "states"
    }

    fn analyze_declaration(&self, cx: &mut AnalyzeContext<'_>, decl: &Declaration, rule: &Rule) {
        if decl.prop != STATES {
            return;
        }
        let Some(class_name) = single_class_of(rule) else {
            cx.error(
                codes::STATE_DEFINITION_IN_COMPLEX,
                decl.range,
                format!("{STATES} is only allowed on a simple class selector"),
            );
            return;
        };

        let (states, problems) = parse_states(&decl.value);
        for (code, message) in problems {
            cx.error(code, decl.range, message);
        }

        let mut reports = Vec::new();
        if let Some(class) = cx.declare_class(&class_name, rule.range) {
            for (name, state) in states {
                if is_native_pseudo_class(&name) {
                    reports.push((
                        codes::RESERVED_NATIVE_STATE,
                        format!("state \"{name}\" shadows a native pseudo-class"),
                    ));
                }
                if class.states.insert(name.clone(), state).is_some() {
                    reports.push((
                        codes::DUPLICATE_STATE,
                        format!("state \"{name}\" is defined more than once"),
                    ));
                }
            }
        }
        for (code, message) in reports {
            cx.warning(code, decl.range, message);
        }
    }
}

type Problem = (&'static str, String);

/// Parse `a, b(string), c(enum(x, y)) x, d(".mapped")`.
pub fn parse_states(value: &str) -> (Vec<(SmolStr, StateDef)>, Vec<Problem>) {
    let mut states = Vec::new();
    let mut problems = Vec::new();

    for part in split_by_comma(&parse_value(value)) {
        match part.as_slice() {
            [] => {}
            [ValueNode::Word(name)] => states.push((name.as_str().into(), StateDef::Boolean)),
            [ValueNode::Function { name, nodes }, rest @ ..] if !name.is_empty() => {
                let default = stringify_value(rest).trim().to_string();
                let default = (!default.is_empty()).then_some(default);
                match parse_state_type(nodes) {
                    Ok(StateKind::Mapped(selector)) => {
                        states.push((name.as_str().into(), StateDef::Mapped(selector)))
                    }
                    Ok(StateKind::Param(ty)) => {
                        states.push((name.as_str().into(), StateDef::Param { ty, default }))
                    }
                    Err(found) => problems.push((
                        codes::UNKNOWN_STATE_TYPE,
                        format!("state \"{name}\" has unknown type \"{found}\""),
                    )),
                }
            }
            other => problems.push((
                codes::INVALID_STATE_DEFINITION,
                format!("invalid state definition \"{}\"", stringify_value(other).trim()),
            )),
        }
    }
    (states, problems)
}

enum StateKind {
    Param(StateParamType),
    Mapped(String),
}

fn parse_state_type(nodes: &[ValueNode]) -> Result<StateKind, String> {
    let significant: Vec<&ValueNode> = nodes.iter().filter(|node| !node.is_space()).collect();
    match significant.as_slice() {
        [ValueNode::String { value, .. }] => Ok(StateKind::Mapped(value.trim().to_string())),
        [ValueNode::Word(word)] => param_type(word, None),
        [ValueNode::Function { name, nodes }] => param_type(name, Some(nodes)),
        _ => Err(stringify_value(nodes).trim().to_string()),
    }
}

fn param_type(name: &str, args: Option<&Vec<ValueNode>>) -> Result<StateKind, String> {
    match (name, args) {
        ("string", _) => Ok(StateKind::Param(StateParamType::String)),
        ("number", _) => Ok(StateKind::Param(StateParamType::Number)),
        ("enum", Some(args)) => {
            let options = split_by_comma(args)
                .iter()
                .map(|option| stringify_value(option).trim().to_string())
                .filter(|option| !option.is_empty())
                .collect();
            Ok(StateKind::Param(StateParamType::Enum(options)))
        }
        _ => Err(name.to_string()),
    }
}

// ============================================================================
// ENCODING
// ============================================================================

/// `ns--state`
pub fn boolean_state_class(namespace: &str, state: &str) -> String {
    format!("{namespace}{BOOLEAN_STATE_DELIMITER}{state}")
}

/// `ns---state-<len>-<arg>`. The argument length prefix keeps delimiters
/// inside the argument unambiguous; whitespace becomes `_` and other
/// non-identifier characters are escaped.
pub fn param_state_class(namespace: &str, state: &str, argument: &str) -> String {
    let sanitized: String = argument
        .chars()
        .map(|ch| if ch.is_whitespace() { '_' } else { ch })
        .collect();
    format!(
        "{namespace}{PARAM_STATE_DELIMITER}{state}-{}-{}",
        argument.chars().count(),
        escape_identifier(&sanitized)
    )
}

/// Escape characters that cannot appear in a class name.
pub fn escape_identifier(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for ch in value.chars() {
        if ch.is_ascii_alphanumeric() || ch == '-' || ch == '_' || !ch.is_ascii() {
            escaped.push(ch);
        } else {
            escaped.push('\\');
            escaped.push(ch);
        }
    }
    escaped
}

/// Check an argument against the state's type; `Err` holds the message.
pub fn validate_state_argument(ty: &StateParamType, argument: &str) -> Result<(), String> {
    match ty {
        StateParamType::String => Ok(()),
        StateParamType::Number => argument
            .trim()
            .parse::<f64>()
            .map(|_| ())
            .map_err(|_| format!("\"{argument}\" is not a number")),
        StateParamType::Enum(options) => {
            if options.iter().any(|option| option == argument.trim()) {
                Ok(())
            } else {
                Err(format!(
                    "\"{argument}\" is not one of: {}",
                    options.join(", ")
                ))
            }
        }
    }
}
