//! Stylesheet syntax tree.
//!
//! A mutable, position-tracked tree of rules, at-rules, declarations and
//! comments. Stylable constructs (`:import`, `@st-import`, `-st-*`
//! declarations, ...) are ordinary nodes here; their meaning is assigned by
//! the semantic passes.

use text_size::TextRange;

/// A parsed stylesheet.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Stylesheet {
    pub nodes: Vec<Node>,
}

/// A node of the stylesheet tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    Rule(Rule),
    AtRule(AtRule),
    Decl(Declaration),
    Comment(Comment),
}

/// `selector { nodes }`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rule {
    pub selector: String,
    pub nodes: Vec<Node>,
    pub range: TextRange,
}

/// `@name params;` or `@name params { nodes }`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AtRule {
    pub name: String,
    pub params: String,
    pub nodes: Option<Vec<Node>>,
    pub range: TextRange,
}

/// `prop: value` with an optional `!important` flag
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Declaration {
    pub prop: String,
    pub value: String,
    pub important: bool,
    pub range: TextRange,
}

/// `/* text */` (text excludes the delimiters)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Comment {
    pub text: String,
    pub range: TextRange,
}

impl Node {
    pub fn range(&self) -> TextRange {
        match self {
            Node::Rule(rule) => rule.range,
            Node::AtRule(at_rule) => at_rule.range,
            Node::Decl(decl) => decl.range,
            Node::Comment(comment) => comment.range,
        }
    }

    pub fn as_rule(&self) -> Option<&Rule> {
        match self {
            Node::Rule(rule) => Some(rule),
            _ => None,
        }
    }

    pub fn as_at_rule(&self) -> Option<&AtRule> {
        match self {
            Node::AtRule(at_rule) => Some(at_rule),
            _ => None,
        }
    }

    pub fn as_decl(&self) -> Option<&Declaration> {
        match self {
            Node::Decl(decl) => Some(decl),
            _ => None,
        }
    }
}

impl Rule {
    pub fn new(selector: impl Into<String>, range: TextRange) -> Self {
        Self {
            selector: selector.into(),
            nodes: Vec::new(),
            range,
        }
    }

    /// Declarations directly inside this rule.
    pub fn declarations(&self) -> impl Iterator<Item = &Declaration> {
        self.nodes.iter().filter_map(Node::as_decl)
    }

    /// Last declaration with the given property.
    pub fn declaration(&self, prop: &str) -> Option<&Declaration> {
        self.declarations().filter(|decl| decl.prop == prop).last()
    }
}

impl Declaration {
    pub fn new(prop: impl Into<String>, value: impl Into<String>, range: TextRange) -> Self {
        Self {
            prop: prop.into(),
            value: value.into(),
            important: false,
            range,
        }
    }
}

impl Stylesheet {
    pub fn new(nodes: Vec<Node>) -> Self {
        Self { nodes }
    }

    /// Top-level rules, in source order.
    pub fn rules(&self) -> impl Iterator<Item = &Rule> {
        self.nodes.iter().filter_map(Node::as_rule)
    }

    /// Visit every node depth-first, parents before children.
    pub fn walk(&self, visit: &mut impl FnMut(&Node, usize)) {
        fn walk_nodes(nodes: &[Node], depth: usize, visit: &mut impl FnMut(&Node, usize)) {
            for node in nodes {
                visit(node, depth);
                match node {
                    Node::Rule(rule) => walk_nodes(&rule.nodes, depth + 1, visit),
                    Node::AtRule(AtRule {
                        nodes: Some(nodes), ..
                    }) => walk_nodes(nodes, depth + 1, visit),
                    _ => {}
                }
            }
        }
        walk_nodes(&self.nodes, 0, visit);
    }

    /// Serialize back to CSS text.
    pub fn to_css(&self) -> String {
        let mut out = String::new();
        for node in &self.nodes {
            write_node(&mut out, node, 0);
        }
        out
    }
}

const INDENT: &str = "    ";

fn write_node(out: &mut String, node: &Node, depth: usize) {
    let indent = INDENT.repeat(depth);
    match node {
        Node::Rule(rule) => {
            out.push_str(&indent);
            out.push_str(&rule.selector);
            write_block(out, &rule.nodes, depth);
        }
        Node::AtRule(at_rule) => {
            out.push_str(&indent);
            out.push('@');
            out.push_str(&at_rule.name);
            if !at_rule.params.is_empty() {
                out.push(' ');
                out.push_str(&at_rule.params);
            }
            match &at_rule.nodes {
                Some(nodes) => write_block(out, nodes, depth),
                None => out.push_str(";\n"),
            }
        }
        Node::Decl(decl) => {
            out.push_str(&indent);
            out.push_str(&decl.prop);
            out.push_str(": ");
            out.push_str(&decl.value);
            if decl.important {
                out.push_str(" !important");
            }
            out.push_str(";\n");
        }
        Node::Comment(comment) => {
            out.push_str(&indent);
            out.push_str("/*");
            out.push_str(&comment.text);
            out.push_str("*/\n");
        }
    }
}

fn write_block(out: &mut String, nodes: &[Node], depth: usize) {
    if nodes.is_empty() {
        out.push_str(" {}\n");
        return;
    }
    out.push_str(" {\n");
    for node in nodes {
        write_node(out, node, depth + 1);
    }
    out.push_str(&INDENT.repeat(depth));
    out.push_str("}\n");
}
