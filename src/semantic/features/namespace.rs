//! `@st-namespace` / `@namespace` and the `st-namespace-reference` comment.

use std::path::Path;

use crate::base::constants::NAMESPACE_REFERENCE_DIRECTIVE;
use crate::error::Result;
use crate::namespace::{is_valid_namespace, local_name_from_path};
use crate::parser::{AtRule, Node, Stylesheet, unquote};
use crate::resolver::path::absolutize;

use super::{AnalyzeContext, Feature, Parent};

pub mod codes {
    pub const EMPTY_NAMESPACE_DEF: &str = "ST0201";
    pub const INVALID_NAMESPACE_DEF: &str = "ST0202";
    pub const INVALID_NAMESPACE_REFERENCE: &str = "ST0203";

    pub const ALL: &[&str] = &[
        EMPTY_NAMESPACE_DEF,
        INVALID_NAMESPACE_DEF,
        INVALID_NAMESPACE_REFERENCE,
    ];
}

pub struct Namespace;

/// `@st-namespace "x"` always; `@namespace` only with a plain string, so
/// native `@namespace svg url(...)` is left alone.
pub fn is_namespace_directive(at_rule: &AtRule) -> bool {
    let params = at_rule.params.trim();
    match at_rule.name.as_str() {
        "st-namespace" => true,
        "namespace" => params.starts_with('"') || params.starts_with('\''),
        _ => false,
    }
}

impl Feature for Namespace {
    fn name(&self) -> &'static str {
        "namespace"
    }

    fn analyze_init(&self, cx: &mut AnalyzeContext<'_>, ast: &Stylesheet) {
        for node in &ast.nodes {
            let Node::Comment(comment) = node else {
                continue;
            };
            let Some(rest) = comment.text.trim().strip_prefix(NAMESPACE_REFERENCE_DIRECTIVE) else {
                continue;
            };
            match rest.trim_start().strip_prefix('=') {
                Some(value) if !unquote(value).is_empty() => {
                    let reference = absolutize(&cx.meta.context_dir(), Path::new(unquote(value)));
                    cx.namespace_reference = Some(reference);
                }
                _ => cx.error(
                    codes::INVALID_NAMESPACE_REFERENCE,
                    comment.range,
                    format!("{NAMESPACE_REFERENCE_DIRECTIVE} expects =\"path\""),
                ),
            }
        }
    }

    fn analyze_at_rule(&self, cx: &mut AnalyzeContext<'_>, at_rule: &AtRule, _parent: Parent<'_>) {
        if !is_namespace_directive(at_rule) {
            return;
        }
        let params = at_rule.params.trim();
        let quoted = params.len() >= 2
            && (params.starts_with('"') || params.starts_with('\''))
            && params.ends_with(&params[..1]);
        let value = unquote(params);

        if value.is_empty() {
            cx.error(
                codes::EMPTY_NAMESPACE_DEF,
                at_rule.range,
                "namespace must not be empty",
            );
        } else if !quoted || !is_valid_namespace(value) {
            cx.error(
                codes::INVALID_NAMESPACE_DEF,
                at_rule.range,
                format!("invalid namespace \"{params}\", expected a quoted identifier"),
            );
        } else {
            // Last one wins.
            cx.declared_namespace = Some(value.to_string());
        }
    }

    fn analyze_done(&self, cx: &mut AnalyzeContext<'_>) -> Result<()> {
        let source = cx.meta.source.clone();
        let local = cx
            .declared_namespace
            .clone()
            .unwrap_or_else(|| local_name_from_path(&source));
        let (origin, source_arg) = match &cx.namespace_reference {
            Some(reference) => (reference.clone(), Some(source.as_path())),
            None => (source.clone(), None),
        };
        let namespace = cx.namespace_resolver.resolve(&local, &origin, source_arg)?;
        tracing::debug!(path = %source.display(), %namespace, "namespace resolved");
        cx.meta.local_namespace = local;
        cx.meta.namespace = namespace;
        Ok(())
    }
}
