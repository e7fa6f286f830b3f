//! Turns one stylesheet's text into a [`Meta`].
//!
//! The tree is walked once; every [`Feature`](super::features::Feature)
//! stage sees each node in [`FEATURES`] order. Processing never looks at
//! other files: imports are recorded, not resolved.

use std::path::Path;

use crate::error::{Result, StylableError};
use crate::namespace::NamespaceResolver;
use crate::parser::{AtRule, Node, Stylesheet, parse, parse_selector_list};

use super::features::keyframes::is_keyframes_at_rule;
use super::features::{AnalyzeContext, FEATURES, Parent, is_directive_rule};
use super::meta::Meta;

/// Parse and analyze `source`. Only a parse failure or a failing namespace
/// strategy is an `Err`; everything else becomes a diagnostic on the meta.
#[tracing::instrument(level = "debug", skip_all, fields(path = %path.display()))]
pub fn process(path: &Path, source: &str, namespace_resolver: &dyn NamespaceResolver) -> Result<Meta> {
    let ast = parse(source).map_err(|source| StylableError::Parse {
        path: path.to_path_buf(),
        source,
    })?;
    process_ast(path, source, ast, namespace_resolver)
}

/// Analyze an already parsed tree.
pub fn process_ast(
    path: &Path,
    source: &str,
    ast: Stylesheet,
    namespace_resolver: &dyn NamespaceResolver,
) -> Result<Meta> {
    let mut meta = Meta::new(path, source, ast);
    let ast = std::mem::take(&mut meta.ast);
    {
        let mut cx = AnalyzeContext::new(&mut meta, namespace_resolver);
        for feature in FEATURES {
            feature.analyze_init(&mut cx, &ast);
        }
        walk_nodes(&mut cx, &ast.nodes, Parent::Root);
        cx.meta.ast = ast;
        for feature in FEATURES {
            feature.analyze_done(&mut cx)?;
        }
    }
    tracing::debug!(
        namespace = %meta.namespace,
        symbols = meta.symbols.len(),
        diagnostics = meta.diagnostics.len(),
        "stylesheet processed"
    );
    Ok(meta)
}

fn walk_nodes(cx: &mut AnalyzeContext<'_>, nodes: &[Node], parent: Parent<'_>) {
    for node in nodes {
        match node {
            Node::Rule(rule) => {
                let selectors = parse_selector_list(&rule.selector);
                for feature in FEATURES {
                    feature.analyze_rule(cx, rule, &selectors, parent);
                }
                for decl in rule.declarations() {
                    for feature in FEATURES {
                        feature.analyze_declaration(cx, decl, rule);
                    }
                }
                if !is_directive_rule(rule) {
                    walk_nodes(cx, &rule.nodes, Parent::Rule(rule));
                }
            }
            Node::AtRule(at_rule) => {
                for feature in FEATURES {
                    feature.analyze_at_rule(cx, at_rule, parent);
                }
                walk_at_rule_body(cx, at_rule);
            }
            Node::Decl(_) | Node::Comment(_) => {}
        }
    }
}

/// Keyframe selectors (`from`, `50%`) are not class selectors.
fn walk_at_rule_body(cx: &mut AnalyzeContext<'_>, at_rule: &AtRule) {
    if is_keyframes_at_rule(at_rule) {
        return;
    }
    if let Some(nodes) = &at_rule.nodes {
        walk_nodes(cx, nodes, Parent::AtRule(at_rule));
    }
}
