//! Block parser: groups tokens into rules, at-rules and declarations.
//!
//! A statement is everything up to the next `{`, `;` or `}` at parenthesis
//! depth zero. A `{` turns the statement into a rule (or an at-rule with a
//! body); otherwise it is a declaration, or a body-less at-rule.

use text_size::{TextRange, TextSize};

use super::ast::{AtRule, Comment, Declaration, Node, Rule, Stylesheet};
use super::errors::{ErrorCode, ParseError};
use super::lexer::{Token, TokenKind, tokenize};

/// Parse a stylesheet. Any malformed construct aborts with a [`ParseError`].
pub fn parse(source: &str) -> Result<Stylesheet, ParseError> {
    let tokens = tokenize(source)?;
    let mut parser = Parser {
        source,
        tokens,
        pos: 0,
    };
    let nodes = parser.parse_nodes(None)?;
    Ok(Stylesheet::new(nodes))
}

/// How a statement prelude ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Terminator {
    /// `{` (consumed)
    Block,
    /// `;` (consumed)
    Semicolon,
    /// `}` (left for the enclosing block)
    CloseBrace,
    Eof,
}

struct Prelude {
    /// Token indices of the prelude, trivia included.
    tokens: std::ops::Range<usize>,
    terminator: Terminator,
    /// Offset just past the terminator (or the prelude end for `}`/EOF).
    end: TextSize,
}

struct Parser<'a> {
    source: &'a str,
    tokens: Vec<Token<'a>>,
    pos: usize,
}

impl<'a> Parser<'a> {
    fn peek(&self) -> Option<&Token<'a>> {
        self.tokens.get(self.pos)
    }

    fn eof_offset(&self) -> TextSize {
        TextSize::new(self.source.len() as u32)
    }

    /// Parse nodes until EOF (top level) or the `}` closing the block opened at `open`.
    fn parse_nodes(&mut self, open: Option<TextRange>) -> Result<Vec<Node>, ParseError> {
        let mut nodes = Vec::new();
        loop {
            let Some(token) = self.peek() else {
                return match open {
                    Some(range) => Err(ParseError::new(ErrorCode::P0201, range)),
                    None => Ok(nodes),
                };
            };
            match token.kind {
                TokenKind::Whitespace | TokenKind::Semicolon => self.pos += 1,
                TokenKind::Comment => {
                    let text = &token.text[2..token.text.len() - 2];
                    nodes.push(Node::Comment(Comment {
                        text: text.to_string(),
                        range: token.range,
                    }));
                    self.pos += 1;
                }
                TokenKind::RBrace => {
                    if open.is_some() {
                        self.pos += 1;
                        return Ok(nodes);
                    }
                    return Err(ParseError::new(ErrorCode::P0202, token.range));
                }
                TokenKind::AtKeyword => nodes.push(self.parse_at_rule()?),
                _ => nodes.push(self.parse_rule_or_declaration(open.is_some())?),
            }
        }
    }

    fn parse_at_rule(&mut self) -> Result<Node, ParseError> {
        let keyword = &self.tokens[self.pos];
        let name = keyword.text[1..].to_string();
        let start = keyword.range.start();
        let block_open = keyword.range;
        self.pos += 1;
        let prelude = self.collect_prelude()?;
        let params = self.text_of(&prelude.tokens).trim().to_string();
        let nodes = match prelude.terminator {
            Terminator::Block => Some(self.parse_nodes(Some(block_open))?),
            _ => None,
        };
        let end = self.node_end(&prelude);
        Ok(Node::AtRule(AtRule {
            name,
            params,
            nodes,
            range: TextRange::new(start, end),
        }))
    }

    fn parse_rule_or_declaration(&mut self, in_block: bool) -> Result<Node, ParseError> {
        let first = self.tokens[self.pos].clone();
        let prelude = self.collect_prelude()?;
        if prelude.terminator == Terminator::Block {
            let selector = self.text_of(&prelude.tokens).trim().to_string();
            let nodes = self.parse_nodes(Some(first.range))?;
            let end = self.node_end(&prelude);
            return Ok(Node::Rule(Rule {
                selector,
                nodes,
                range: TextRange::new(first.range.start(), end),
            }));
        }
        if !in_block {
            return Err(ParseError::new(ErrorCode::P0301, first.range).with_word(first.text));
        }
        self.declaration(prelude, &first)
    }

    fn declaration(&self, prelude: Prelude, first: &Token<'a>) -> Result<Node, ParseError> {
        let mut depth = 0usize;
        let colon = self.tokens[prelude.tokens.clone()]
            .iter()
            .position(|token| {
                match token.kind {
                    TokenKind::LParen | TokenKind::LBracket => depth += 1,
                    TokenKind::RParen | TokenKind::RBracket => depth = depth.saturating_sub(1),
                    TokenKind::Colon if depth == 0 => return true,
                    _ => {}
                }
                false
            })
            .map(|offset| prelude.tokens.start + offset);
        let Some(colon) = colon else {
            return Err(ParseError::new(ErrorCode::P0301, first.range).with_word(first.text));
        };
        let prop = self.text_of(&(prelude.tokens.start..colon)).trim().to_string();
        if prop.is_empty() {
            return Err(ParseError::new(ErrorCode::P0302, first.range));
        }
        let raw_value = self.text_of(&(colon + 1..prelude.tokens.end)).trim();
        let (value, important) = split_important(raw_value);
        let end = self.node_end(&prelude);
        Ok(Node::Decl(Declaration {
            prop,
            value: value.to_string(),
            important,
            range: TextRange::new(first.range.start(), end),
        }))
    }

    /// Consume a statement prelude, tracking nesting so that `;` inside
    /// parentheses or brackets stays part of the value (`url(data:...;base64,...)`).
    /// A brace before the group closes is fatal.
    fn collect_prelude(&mut self) -> Result<Prelude, ParseError> {
        let start = self.pos;
        let mut open: Vec<&Token<'a>> = Vec::new();
        while let Some(token) = self.tokens.get(self.pos) {
            match token.kind {
                TokenKind::LParen | TokenKind::LBracket => open.push(token),
                TokenKind::RParen => match open.pop() {
                    Some(opener) if opener.kind == TokenKind::LParen => {}
                    _ => return Err(ParseError::new(ErrorCode::P0204, token.range)),
                },
                TokenKind::RBracket => match open.pop() {
                    Some(opener) if opener.kind == TokenKind::LBracket => {}
                    _ => return Err(ParseError::new(ErrorCode::P0206, token.range)),
                },
                TokenKind::LBrace | TokenKind::Semicolon | TokenKind::RBrace
                    if open.is_empty() =>
                {
                    let end = self.pos;
                    let terminator = match token.kind {
                        TokenKind::LBrace => Terminator::Block,
                        TokenKind::Semicolon => Terminator::Semicolon,
                        _ => Terminator::CloseBrace,
                    };
                    let end_offset = match terminator {
                        Terminator::CloseBrace => token.range.start(),
                        _ => token.range.end(),
                    };
                    if terminator != Terminator::CloseBrace {
                        self.pos += 1;
                    }
                    return Ok(Prelude {
                        tokens: start..end,
                        terminator,
                        end: end_offset,
                    });
                }
                TokenKind::LBrace | TokenKind::RBrace => {
                    if let Some(opener) = open.last() {
                        return Err(unclosed(opener));
                    }
                }
                _ => {}
            }
            self.pos += 1;
        }
        if let Some(opener) = open.last() {
            return Err(unclosed(opener));
        }
        Ok(Prelude {
            tokens: start..self.pos,
            terminator: Terminator::Eof,
            end: self.eof_offset(),
        })
    }

    /// End offset of a node: for block nodes, the token just consumed (`}`).
    fn node_end(&self, prelude: &Prelude) -> TextSize {
        match prelude.terminator {
            Terminator::Block => self
                .pos
                .checked_sub(1)
                .and_then(|index| self.tokens.get(index))
                .map(|token| token.range.end())
                .unwrap_or(prelude.end),
            _ => prelude.end,
        }
    }

    fn text_of(&self, tokens: &std::ops::Range<usize>) -> &'a str {
        if tokens.is_empty() {
            return "";
        }
        let start = self.tokens[tokens.start].range.start();
        let end = self.tokens[tokens.end - 1].range.end();
        let source: &'a str = self.source;
        &source[TextRange::new(start, end)]
    }
}

fn unclosed(opener: &Token<'_>) -> ParseError {
    let code = match opener.kind {
        TokenKind::LBracket => ErrorCode::P0205,
        _ => ErrorCode::P0203,
    };
    ParseError::new(code, opener.range)
}

fn split_important(value: &str) -> (&str, bool) {
    if let Some(bang) = value.rfind('!') {
        let flag = value[bang + 1..].trim();
        if flag.eq_ignore_ascii_case("important") {
            return (value[..bang].trim_end(), true);
        }
    }
    (value, false)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn first_rule(source: &str) -> Rule {
        match parse(source).unwrap().nodes.remove(0) {
            Node::Rule(rule) => rule,
            other => panic!("expected rule, got {other:?}"),
        }
    }

    #[test]
    fn test_parse_rule_with_declarations() {
        let rule = first_rule(".a:hover { color: red; background: url(a;b.png) }");
        assert_eq!(rule.selector, ".a:hover");
        let decls: Vec<_> = rule.declarations().collect();
        assert_eq!(decls.len(), 2);
        assert_eq!(decls[0].prop, "color");
        assert_eq!(decls[0].value, "red");
        assert_eq!(decls[1].value, "url(a;b.png)");
    }

    #[test]
    fn test_parse_important() {
        let rule = first_rule(".a { color: red !important; }");
        let decl = rule.declarations().next().unwrap();
        assert_eq!(decl.value, "red");
        assert!(decl.important);
    }

    #[test]
    fn test_parse_at_rules() {
        let sheet = parse("@st-namespace \"x\";\n@media (max-width: 10px) { .a {} }").unwrap();
        let namespace = sheet.nodes[0].as_at_rule().unwrap();
        assert_eq!(namespace.name, "st-namespace");
        assert_eq!(namespace.params, "\"x\"");
        assert!(namespace.nodes.is_none());
        let media = sheet.nodes[1].as_at_rule().unwrap();
        assert_eq!(media.params, "(max-width: 10px)");
        assert_eq!(media.nodes.as_ref().unwrap().len(), 1);
    }

    #[test]
    fn test_parse_nested_rule() {
        let rule = first_rule(".a { color: red; &:hover { color: blue } .b { } }");
        assert_eq!(rule.nodes.len(), 3);
        assert_eq!(rule.nodes[1].as_rule().unwrap().selector, "&:hover");
    }

    #[test]
    fn test_parse_import_block() {
        let rule = first_rule(":import { -st-from: \"./a.st.css\"; -st-named: a, b }");
        assert_eq!(rule.selector, ":import");
        assert_eq!(rule.declaration("-st-named").unwrap().value, "a, b");
    }

    #[test]
    fn test_node_range_covers_block() {
        let source = ".a { color: red }";
        let rule = first_rule(source);
        assert_eq!(u32::from(rule.range.end()) as usize, source.len());
    }

    #[test]
    fn test_unclosed_block_is_fatal() {
        let error = parse(".a { color: red").unwrap_err();
        assert_eq!(error.code, ErrorCode::P0201);
    }

    #[test]
    fn test_unexpected_close_brace_is_fatal() {
        let error = parse(".a {} }").unwrap_err();
        assert_eq!(error.code, ErrorCode::P0202);
    }

    #[test]
    fn test_declaration_at_root_is_fatal() {
        let error = parse("color: red;").unwrap_err();
        assert_eq!(error.code, ErrorCode::P0301);
    }

    #[test]
    fn test_missing_colon_is_fatal() {
        let error = parse(".a { color red; }").unwrap_err();
        assert_eq!(error.code, ErrorCode::P0301);
    }

    #[test]
    fn test_semicolon_inside_data_url() {
        let rule = first_rule(".x { background: url(data:image/png;base64,AAAA); color: red }");
        let decls: Vec<_> = rule.declarations().collect();
        assert_eq!(decls.len(), 2);
        assert_eq!(decls[0].value, "url(data:image/png;base64,AAAA)");
        assert_eq!(decls[1].value, "red");
    }

    #[test]
    fn test_unclosed_paren_is_fatal() {
        let error = parse(".a { color: rgb(1, 2; }").unwrap_err();
        assert_eq!(error.code, ErrorCode::P0203);
    }

    #[test]
    fn test_round_trip_to_css() {
        let sheet = parse(".a{color:red}@layer x;").unwrap();
        assert_eq!(sheet.to_css(), ".a {\n    color: red;\n}\n@layer x;\n");
    }
}
