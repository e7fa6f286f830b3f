//! Declaration value parser.
//!
//! Splits a value into words, strings, functions, dividers and spaces,
//! keeping enough of the original whitespace to serialize the value back
//! unchanged. Used for `value()` substitution, `-st-*` directive arguments
//! and custom value types.

use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValueNode {
    Word(String),
    String {
        quote: char,
        value: String,
    },
    /// `name(nodes)`; `name` is empty for a bare parenthesized group.
    Function {
        name: String,
        nodes: Vec<ValueNode>,
    },
    Space(String),
    /// `,`, `/` or `:` with the whitespace around it.
    Div {
        value: char,
        before: String,
        after: String,
    },
    Comment(String),
}

impl ValueNode {
    pub fn word(value: impl Into<String>) -> Self {
        ValueNode::Word(value.into())
    }

    pub fn is_space(&self) -> bool {
        matches!(self, ValueNode::Space(_))
    }

    pub fn is_comma(&self) -> bool {
        matches!(self, ValueNode::Div { value: ',', .. })
    }

    /// Word text or unquoted string content.
    pub fn text(&self) -> Option<&str> {
        match self {
            ValueNode::Word(value) | ValueNode::String { value, .. } => Some(value),
            _ => None,
        }
    }
}

/// Parse a declaration value.
pub fn parse_value(input: &str) -> Vec<ValueNode> {
    let mut parser = ValueParser {
        chars: input.chars().collect(),
        pos: 0,
    };
    parser.nodes(false)
}

struct ValueParser {
    chars: Vec<char>,
    pos: usize,
}

impl ValueParser {
    fn peek(&self) -> Option<char> {
        self.chars.get(self.pos).copied()
    }

    fn nodes(&mut self, in_function: bool) -> Vec<ValueNode> {
        let mut nodes = Vec::new();
        while let Some(ch) = self.peek() {
            match ch {
                ')' if in_function => {
                    self.pos += 1;
                    break;
                }
                c if c.is_whitespace() => {
                    let space = self.take_while(char::is_whitespace);
                    match self.peek() {
                        Some(',' | '/' | ':') => {
                            let value = self.chars[self.pos];
                            self.pos += 1;
                            let after = self.take_while(char::is_whitespace);
                            nodes.push(ValueNode::Div {
                                value,
                                before: space,
                                after,
                            });
                        }
                        _ => nodes.push(ValueNode::Space(space)),
                    }
                }
                ',' | '/' | ':' if !self.starts_comment() => {
                    self.pos += 1;
                    let after = self.take_while(char::is_whitespace);
                    nodes.push(ValueNode::Div {
                        value: ch,
                        before: String::new(),
                        after,
                    });
                }
                '"' | '\'' => nodes.push(self.string(ch)),
                '/' => nodes.push(self.comment()),
                '(' => {
                    self.pos += 1;
                    let inner = self.nodes(true);
                    nodes.push(ValueNode::Function {
                        name: String::new(),
                        nodes: inner,
                    });
                }
                _ => nodes.push(self.word_or_function()),
            }
        }
        nodes
    }

    fn starts_comment(&self) -> bool {
        self.peek() == Some('/') && self.chars.get(self.pos + 1) == Some(&'*')
    }

    fn take_while(&mut self, predicate: impl Fn(char) -> bool) -> String {
        let start = self.pos;
        while self.peek().is_some_and(&predicate) {
            self.pos += 1;
        }
        self.chars[start..self.pos].iter().collect()
    }

    fn string(&mut self, quote: char) -> ValueNode {
        self.pos += 1;
        let mut value = String::new();
        while let Some(ch) = self.peek() {
            self.pos += 1;
            if ch == '\\' {
                value.push(ch);
                if let Some(next) = self.peek() {
                    value.push(next);
                    self.pos += 1;
                }
            } else if ch == quote {
                break;
            } else {
                value.push(ch);
            }
        }
        ValueNode::String { quote, value }
    }

    fn comment(&mut self) -> ValueNode {
        self.pos += 2;
        let start = self.pos;
        while self.pos < self.chars.len() {
            if self.chars[self.pos] == '*' && self.chars.get(self.pos + 1) == Some(&'/') {
                let text = self.chars[start..self.pos].iter().collect();
                self.pos += 2;
                return ValueNode::Comment(text);
            }
            self.pos += 1;
        }
        ValueNode::Comment(self.chars[start..].iter().collect())
    }

    fn word_or_function(&mut self) -> ValueNode {
        let word = self.take_while(|c| {
            !(c.is_whitespace() || matches!(c, '(' | ')' | ',' | '/' | ':' | '"' | '\''))
        });
        if self.peek() != Some('(') {
            if word.is_empty() {
                // Stray `)` outside any function.
                self.pos += 1;
                return ValueNode::Word(")".to_string());
            }
            return ValueNode::Word(word);
        }
        self.pos += 1;
        if word.eq_ignore_ascii_case("url") {
            let raw = self.raw_until_close();
            return ValueNode::Function {
                name: word,
                nodes: vec![ValueNode::Word(raw)],
            };
        }
        let nodes = self.nodes(true);
        ValueNode::Function { name: word, nodes }
    }

    /// Raw text up to the matching `)` (consumed).
    fn raw_until_close(&mut self) -> String {
        let start = self.pos;
        let mut depth = 0usize;
        while let Some(ch) = self.peek() {
            self.pos += 1;
            match ch {
                '(' => depth += 1,
                ')' if depth == 0 => {
                    return self.chars[start..self.pos - 1].iter().collect();
                }
                ')' => depth -= 1,
                _ => {}
            }
        }
        self.chars[start..].iter().collect()
    }
}

impl fmt::Display for ValueNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValueNode::Word(value) => f.write_str(value),
            ValueNode::String { quote, value } => write!(f, "{quote}{value}{quote}"),
            ValueNode::Function { name, nodes } => {
                write!(f, "{name}({})", stringify_value(nodes))
            }
            ValueNode::Space(space) => f.write_str(space),
            ValueNode::Div {
                value,
                before,
                after,
            } => write!(f, "{before}{value}{after}"),
            ValueNode::Comment(text) => write!(f, "/*{text}*/"),
        }
    }
}

pub fn stringify_value(nodes: &[ValueNode]) -> String {
    nodes.iter().map(ToString::to_string).collect()
}

/// Split nodes at top-level commas; spaces around each part are dropped.
pub fn split_by_comma(nodes: &[ValueNode]) -> Vec<Vec<ValueNode>> {
    let mut parts = vec![Vec::new()];
    for node in nodes {
        if node.is_comma() {
            parts.push(Vec::new());
        } else if let Some(last) = parts.last_mut() {
            last.push(node.clone());
        }
    }
    for part in &mut parts {
        while part.first().is_some_and(ValueNode::is_space) {
            part.remove(0);
        }
        while part.last().is_some_and(ValueNode::is_space) {
            part.pop();
        }
    }
    parts
}

/// Strip one layer of matching quotes.
pub fn unquote(value: &str) -> &str {
    let trimmed = value.trim();
    for quote in ['"', '\''] {
        if trimmed.len() >= 2 && trimmed.starts_with(quote) && trimmed.ends_with(quote) {
            return &trimmed[1..trimmed.len() - 1];
        }
    }
    trimmed
}
