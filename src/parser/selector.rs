//! Selector parser.
//!
//! Parses a rule prelude into a [`SelectorList`] of flat node sequences
//! (compound parts separated by [`Combinator`] nodes). Pseudo-classes that
//! take selectors (`:not()`, `:is()`, `:global()`, ...) carry a nested list;
//! every other argument is kept raw. Parsing never fails: anything
//! unrecognized is preserved as a [`SelectorNode::Raw`] node.

use std::fmt;

use smol_str::SmolStr;

pub type SelectorList = Vec<Selector>;

/// One comma-separated branch of a selector list.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Selector {
    pub nodes: Vec<SelectorNode>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SelectorNode {
    /// `.name`
    Class(SmolStr),
    /// `name` (type / element selector)
    Type(SmolStr),
    /// `#name`
    Id(SmolStr),
    /// `*`
    Universal,
    /// `[content]`
    Attribute(String),
    /// `:name` or `:name(args)`
    PseudoClass {
        name: SmolStr,
        args: Option<PseudoArgs>,
    },
    /// `::name` or `::name(args)`
    PseudoElement {
        name: SmolStr,
        args: Option<String>,
    },
    /// `&`
    Nesting,
    Combinator(Combinator),
    /// `/* text */`
    Comment(String),
    /// Text emitted verbatim.
    Raw(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PseudoArgs {
    Selectors(SelectorList),
    Raw(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Combinator {
    /// whitespace
    Descendant,
    /// `>`
    Child,
    /// `+`
    NextSibling,
    /// `~`
    SubsequentSibling,
}

/// Pseudo-classes whose argument is parsed as a selector list.
const SELECTOR_PSEUDO_CLASSES: &[&str] = &[
    "not",
    "is",
    "where",
    "has",
    "matches",
    "any",
    "-webkit-any",
    "-moz-any",
    "global",
    "host",
    "host-context",
];

// ============================================================================
// PARSING
// ============================================================================

/// Parse a selector list (comma-separated selectors).
pub fn parse_selector_list(input: &str) -> SelectorList {
    split_top_level(input, ',')
        .into_iter()
        .map(|part| parse_selector(part.trim()))
        .collect()
}

/// Parse a single selector (no top-level commas expected).
pub fn parse_selector(input: &str) -> Selector {
    let mut cursor = Cursor::new(input);
    let mut nodes: Vec<SelectorNode> = Vec::new();
    let mut pending_space = false;

    while let Some(ch) = cursor.peek() {
        match ch {
            c if c.is_whitespace() => {
                cursor.bump();
                pending_space = true;
            }
            '>' | '+' | '~' => {
                cursor.bump();
                let combinator = match ch {
                    '>' => Combinator::Child,
                    '+' => Combinator::NextSibling,
                    _ => Combinator::SubsequentSibling,
                };
                nodes.push(SelectorNode::Combinator(combinator));
                pending_space = false;
            }
            _ => {
                let after_combinator = matches!(nodes.last(), Some(SelectorNode::Combinator(_)));
                if pending_space && !nodes.is_empty() && !after_combinator {
                    nodes.push(SelectorNode::Combinator(Combinator::Descendant));
                }
                pending_space = false;
                nodes.push(parse_node(&mut cursor, ch));
            }
        }
    }

    Selector { nodes }
}

fn parse_node(cursor: &mut Cursor<'_>, ch: char) -> SelectorNode {
    match ch {
        '.' => {
            cursor.bump();
            SelectorNode::Class(cursor.ident().into())
        }
        '#' => {
            cursor.bump();
            SelectorNode::Id(cursor.ident().into())
        }
        '*' => {
            cursor.bump();
            SelectorNode::Universal
        }
        '&' => {
            cursor.bump();
            SelectorNode::Nesting
        }
        '[' => {
            cursor.bump();
            SelectorNode::Attribute(cursor.balanced('[', ']').to_string())
        }
        ':' if cursor.peek_nth(1) == Some(':') => {
            cursor.bump();
            cursor.bump();
            let name: SmolStr = cursor.ident().into();
            let args = cursor
                .eat('(')
                .then(|| cursor.balanced('(', ')').to_string());
            SelectorNode::PseudoElement { name, args }
        }
        ':' => {
            cursor.bump();
            let name: SmolStr = cursor.ident().into();
            let args = cursor.eat('(').then(|| {
                let inner = cursor.balanced('(', ')');
                if SELECTOR_PSEUDO_CLASSES.contains(&name.to_ascii_lowercase().as_str()) {
                    PseudoArgs::Selectors(parse_selector_list(inner))
                } else {
                    PseudoArgs::Raw(inner.to_string())
                }
            });
            SelectorNode::PseudoClass { name, args }
        }
        '/' if cursor.peek_nth(1) == Some('*') => SelectorNode::Comment(cursor.comment().to_string()),
        c if is_ident_start(c) => SelectorNode::Type(cursor.ident().into()),
        c => {
            cursor.bump();
            SelectorNode::Raw(c.to_string())
        }
    }
}

fn is_ident_start(ch: char) -> bool {
    ch.is_ascii_alphabetic() || ch == '_' || ch == '-' || ch == '\\' || !ch.is_ascii()
}

fn is_ident_char(ch: char) -> bool {
    ch.is_ascii_alphanumeric() || ch == '_' || ch == '-' || !ch.is_ascii()
}

/// Split `input` at top-level occurrences of `separator`, ignoring separators
/// inside parentheses, brackets, strings and comments.
pub(crate) fn split_top_level(input: &str, separator: char) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut depth = 0usize;
    let mut quote: Option<char> = None;
    let mut start = 0;
    let mut chars = input.char_indices().peekable();
    while let Some((index, ch)) = chars.next() {
        if let Some(q) = quote {
            if ch == '\\' {
                chars.next();
            } else if ch == q {
                quote = None;
            }
            continue;
        }
        match ch {
            '"' | '\'' => quote = Some(ch),
            '\\' => {
                chars.next();
            }
            '(' | '[' => depth += 1,
            ')' | ']' => depth = depth.saturating_sub(1),
            c if c == separator && depth == 0 => {
                parts.push(&input[start..index]);
                start = index + c.len_utf8();
            }
            _ => {}
        }
    }
    parts.push(&input[start..]);
    parts
}

struct Cursor<'a> {
    input: &'a str,
    pos: usize,
}

impl<'a> Cursor<'a> {
    fn new(input: &'a str) -> Self {
        Self { input, pos: 0 }
    }

    fn rest(&self) -> &'a str {
        &self.input[self.pos..]
    }

    fn peek(&self) -> Option<char> {
        self.rest().chars().next()
    }

    fn peek_nth(&self, n: usize) -> Option<char> {
        self.rest().chars().nth(n)
    }

    fn bump(&mut self) -> Option<char> {
        let ch = self.peek()?;
        self.pos += ch.len_utf8();
        Some(ch)
    }

    fn eat(&mut self, expected: char) -> bool {
        if self.peek() == Some(expected) {
            self.bump();
            true
        } else {
            false
        }
    }

    /// Identifier, including CSS escapes (`\:`).
    fn ident(&mut self) -> &'a str {
        let start = self.pos;
        while let Some(ch) = self.peek() {
            if ch == '\\' {
                self.bump();
                self.bump();
            } else if is_ident_char(ch) {
                self.bump();
            } else {
                break;
            }
        }
        &self.input[start..self.pos]
    }

    /// Content up to the matching `close`; the closing char is consumed.
    fn balanced(&mut self, open: char, close: char) -> &'a str {
        let start = self.pos;
        let mut depth = 0usize;
        let mut quote: Option<char> = None;
        while let Some(ch) = self.bump() {
            if let Some(q) = quote {
                if ch == '\\' {
                    self.bump();
                } else if ch == q {
                    quote = None;
                }
                continue;
            }
            match ch {
                '"' | '\'' => quote = Some(ch),
                c if c == open => depth += 1,
                c if c == close => {
                    if depth == 0 {
                        return &self.input[start..self.pos - c.len_utf8()];
                    }
                    depth -= 1;
                }
                _ => {}
            }
        }
        &self.input[start..]
    }

    /// Comment body (without delimiters); the cursor must be at `/*`.
    fn comment(&mut self) -> &'a str {
        self.pos += 2;
        let start = self.pos;
        match self.rest().find("*/") {
            Some(end) => {
                self.pos += end + 2;
                &self.input[start..start + end]
            }
            None => {
                self.pos = self.input.len();
                &self.input[start..]
            }
        }
    }
}

// ============================================================================
// QUERIES
// ============================================================================

impl Selector {
    pub fn new(nodes: Vec<SelectorNode>) -> Self {
        Self { nodes }
    }

    /// The class name if this selector is exactly one class (`.a`).
    pub fn as_single_class(&self) -> Option<&str> {
        match self.significant_nodes().as_slice() {
            [SelectorNode::Class(name)] => Some(name.as_str()),
            _ => None,
        }
    }

    /// The type name if this selector is exactly one type selector (`Button`).
    pub fn as_single_type(&self) -> Option<&str> {
        match self.significant_nodes().as_slice() {
            [SelectorNode::Type(name)] => Some(name.as_str()),
            _ => None,
        }
    }

    fn significant_nodes(&self) -> Vec<&SelectorNode> {
        self.nodes
            .iter()
            .filter(|node| !matches!(node, SelectorNode::Comment(_)))
            .collect()
    }

    /// Visit every node, descending into selector arguments of pseudo-classes.
    pub fn walk(&self, visit: &mut impl FnMut(&SelectorNode)) {
        for node in &self.nodes {
            visit(node);
            if let SelectorNode::PseudoClass {
                args: Some(PseudoArgs::Selectors(list)),
                ..
            } = node
            {
                for selector in list {
                    selector.walk(visit);
                }
            }
        }
    }

    /// Every class name mentioned anywhere in this selector.
    pub fn class_names(&self) -> Vec<SmolStr> {
        let mut names = Vec::new();
        self.walk(&mut |node| {
            if let SelectorNode::Class(name) = node {
                names.push(name.clone());
            }
        });
        names
    }

    pub fn contains_nesting(&self) -> bool {
        let mut found = false;
        self.walk(&mut |node| found |= matches!(node, SelectorNode::Nesting));
        found
    }
}

// ============================================================================
// STRINGIFY
// ============================================================================

impl fmt::Display for Combinator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Combinator::Descendant => " ",
            Combinator::Child => " > ",
            Combinator::NextSibling => " + ",
            Combinator::SubsequentSibling => " ~ ",
        })
    }
}

impl fmt::Display for SelectorNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SelectorNode::Class(name) => write!(f, ".{name}"),
            SelectorNode::Type(name) => f.write_str(name),
            SelectorNode::Id(name) => write!(f, "#{name}"),
            SelectorNode::Universal => f.write_str("*"),
            SelectorNode::Attribute(content) => write!(f, "[{content}]"),
            SelectorNode::PseudoClass { name, args } => {
                write!(f, ":{name}")?;
                match args {
                    Some(PseudoArgs::Selectors(list)) => {
                        write!(f, "({})", stringify_selector_list(list))
                    }
                    Some(PseudoArgs::Raw(raw)) => write!(f, "({raw})"),
                    None => Ok(()),
                }
            }
            SelectorNode::PseudoElement { name, args } => {
                write!(f, "::{name}")?;
                match args {
                    Some(raw) => write!(f, "({raw})"),
                    None => Ok(()),
                }
            }
            SelectorNode::Nesting => f.write_str("&"),
            SelectorNode::Combinator(combinator) => combinator.fmt(f),
            SelectorNode::Comment(text) => write!(f, "/*{text}*/"),
            SelectorNode::Raw(raw) => f.write_str(raw),
        }
    }
}

impl fmt::Display for Selector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for node in &self.nodes {
            node.fmt(f)?;
        }
        Ok(())
    }
}

pub fn stringify_selector_list(list: &[Selector]) -> String {
    list.iter()
        .map(|selector| selector.to_string().trim().to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_compound_and_combinators() {
        let list = parse_selector_list(".a:hover > Button .b");
        assert_eq!(list.len(), 1);
        assert_eq!(
            list[0].nodes,
            vec![
                SelectorNode::Class("a".into()),
                SelectorNode::PseudoClass {
                    name: "hover".into(),
                    args: None
                },
                SelectorNode::Combinator(Combinator::Child),
                SelectorNode::Type("Button".into()),
                SelectorNode::Combinator(Combinator::Descendant),
                SelectorNode::Class("b".into()),
            ]
        );
    }

    #[test]
    fn test_parse_list_splits_top_level_commas_only() {
        let list = parse_selector_list(".a:not(.b, .c), .d");
        assert_eq!(list.len(), 2);
        match &list[0].nodes[1] {
            SelectorNode::PseudoClass {
                args: Some(PseudoArgs::Selectors(inner)),
                ..
            } => assert_eq!(inner.len(), 2),
            other => panic!("unexpected node {other:?}"),
        }
    }

    #[test]
    fn test_parse_pseudo_element_and_state_argument() {
        let list = parse_selector_list(".x::icon:loading(done)");
        assert_eq!(
            list[0].nodes[1],
            SelectorNode::PseudoElement {
                name: "icon".into(),
                args: None
            }
        );
        assert_eq!(
            list[0].nodes[2],
            SelectorNode::PseudoClass {
                name: "loading".into(),
                args: Some(PseudoArgs::Raw("done".into()))
            }
        );
    }

    #[test]
    fn test_parse_custom_selector_reference() {
        let list = parse_selector_list(":--heading");
        assert_eq!(
            list[0].nodes,
            vec![SelectorNode::PseudoClass {
                name: "--heading".into(),
                args: None
            }]
        );
    }

    #[test]
    fn test_stringify_normalizes_combinators() {
        let list = parse_selector_list(".a>.b ,  &:hover  [data-x=\"1, 2\"]");
        assert_eq!(
            stringify_selector_list(&list),
            ".a > .b, &:hover [data-x=\"1, 2\"]"
        );
    }

    #[test]
    fn test_single_class_query() {
        assert_eq!(parse_selector(".root").as_single_class(), Some("root"));
        assert_eq!(parse_selector(".root .x").as_single_class(), None);
        assert_eq!(parse_selector("Button").as_single_type(), Some("Button"));
    }

    #[test]
    fn test_class_names_descend_into_global() {
        let selector = parse_selector(":global(.c .d) .x");
        let names: Vec<String> = selector
            .class_names()
            .iter()
            .map(|name| name.to_string())
            .collect();
        assert_eq!(names, vec!["c", "d", "x"]);
    }
}
