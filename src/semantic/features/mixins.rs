//! `-st-mixin` / `-st-partial-mixin` calls.

use indexmap::IndexMap;
use smol_str::SmolStr;

use crate::parser::{Declaration, Rule, ValueNode, parse_value, split_by_comma, stringify_value};

use super::{AnalyzeContext, Feature, is_directive_rule};

pub mod codes {
    pub const INVALID_MIXIN_ARGS: &str = "ST1201";
    pub const UNKNOWN_MIXIN: &str = "ST1202";
    pub const CIRCULAR_MIXIN: &str = "ST1203";
    pub const JS_MIXIN_FAILED: &str = "ST1204";
    pub const PARTIAL_MIXIN_WITHOUT_ARGS: &str = "ST1205";
    pub const UNSUPPORTED_MIXIN_SYMBOL: &str = "ST1206";

    pub const ALL: &[&str] = &[
        INVALID_MIXIN_ARGS,
        UNKNOWN_MIXIN,
        CIRCULAR_MIXIN,
        JS_MIXIN_FAILED,
        PARTIAL_MIXIN_WITHOUT_ARGS,
        UNSUPPORTED_MIXIN_SYMBOL,
    ];
}

pub const MIXIN: &str = "-st-mixin";
pub const PARTIAL_MIXIN: &str = "-st-partial-mixin";

/// One entry of a mixin list: `name` or `name(arg, arg)`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MixinCall {
    pub name: SmolStr,
    /// Raw, trimmed argument texts.
    pub args: Vec<String>,
    pub partial: bool,
}

impl MixinCall {
    /// Class mixin arguments: each one is `var-name value`.
    pub fn named_args(&self) -> Result<IndexMap<SmolStr, String>, String> {
        let mut named = IndexMap::new();
        for arg in &self.args {
            let mut parts = arg.splitn(2, char::is_whitespace);
            let name = parts.next().unwrap_or_default();
            let value = parts.next().map(str::trim).unwrap_or_default();
            if name.is_empty() || value.is_empty() {
                return Err(format!(
                    "mixin \"{}\" argument \"{arg}\" must be \"name value\"",
                    self.name
                ));
            }
            named.insert(SmolStr::from(name), value.to_string());
        }
        Ok(named)
    }
}

/// Parse a mixin declaration value.
pub fn parse_mixin_calls(value: &str, partial: bool) -> Result<Vec<MixinCall>, String> {
    split_by_comma(&parse_value(value))
        .into_iter()
        .filter(|part| !part.is_empty())
        .map(|part| match part.as_slice() {
            [ValueNode::Word(name)] => Ok(MixinCall {
                name: name.as_str().into(),
                args: Vec::new(),
                partial,
            }),
            [ValueNode::Function { name, nodes }] if !name.is_empty() => Ok(MixinCall {
                name: name.as_str().into(),
                args: split_by_comma(nodes)
                    .iter()
                    .map(|arg| stringify_value(arg).trim().to_string())
                    .filter(|arg| !arg.is_empty())
                    .collect(),
                partial,
            }),
            other => Err(format!("invalid mixin \"{}\"", stringify_value(other).trim())),
        })
        .collect()
}

pub struct Mixins;

impl Feature for Mixins {
    fn name(&self) -> &'static str {
        "mixins"
    }

    fn analyze_declaration(&self, cx: &mut AnalyzeContext<'_>, decl: &Declaration, rule: &Rule) {
        let partial = match decl.prop.as_str() {
            MIXIN => false,
            PARTIAL_MIXIN => true,
            _ => return,
        };
        if is_directive_rule(rule) {
            return;
        }
        match parse_mixin_calls(&decl.value, partial) {
            Ok(calls) => {
                for call in calls.iter().filter(|call| partial && call.args.is_empty()) {
                    cx.warning(
                        codes::PARTIAL_MIXIN_WITHOUT_ARGS,
                        decl.range,
                        format!(
                            "partial mixin \"{}\" has no overrides, nothing will be applied",
                            call.name
                        ),
                    );
                }
            }
            Err(message) => cx.error(codes::INVALID_MIXIN_ARGS, decl.range, message),
        }
    }
}
