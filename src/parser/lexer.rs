//! Logos-based CSS tokenizer
//!
//! Produces a flat token stream (trivia included) that the block parser
//! groups into rules, at-rules and declarations.

use logos::Logos;
use text_size::{TextRange, TextSize};

use super::errors::{ErrorCode, ParseError};

/// A token with its kind, text, and position
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token<'a> {
    pub kind: TokenKind,
    pub text: &'a str,
    pub range: TextRange,
}

/// Tokenizer failure reasons.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LexError {
    UnterminatedString,
    UnterminatedComment,
    #[default]
    Unexpected,
}

impl LexError {
    fn code(self) -> ErrorCode {
        match self {
            LexError::UnterminatedString => ErrorCode::P0101,
            LexError::UnterminatedComment => ErrorCode::P0102,
            LexError::Unexpected => ErrorCode::P0103,
        }
    }
}

/// Lexer wrapping the logos-generated tokenizer
pub struct Lexer<'a> {
    inner: logos::Lexer<'a, TokenKind>,
}

impl<'a> Lexer<'a> {
    pub fn new(input: &'a str) -> Self {
        Self {
            inner: TokenKind::lexer(input),
        }
    }
}

impl<'a> Iterator for Lexer<'a> {
    type Item = Result<Token<'a>, ParseError>;

    fn next(&mut self) -> Option<Self::Item> {
        let kind = self.inner.next()?;
        let span = self.inner.span();
        let range = TextRange::new(TextSize::new(span.start as u32), TextSize::new(span.end as u32));
        Some(match kind {
            Ok(kind) => Ok(Token {
                kind,
                text: self.inner.slice(),
                range,
            }),
            Err(error) => Err(ParseError::new(error.code(), range)),
        })
    }
}

/// Tokenize an entire string, stopping at the first lexical error
pub fn tokenize(input: &str) -> Result<Vec<Token<'_>>, ParseError> {
    Lexer::new(input).collect()
}

/// Token kinds
#[derive(Logos, Debug, Clone, Copy, PartialEq, Eq)]
#[logos(error = LexError)]
pub enum TokenKind {
    // =========================================================================
    // TRIVIA
    // =========================================================================
    #[regex(r"[ \t\r\n\f]+")]
    Whitespace,

    #[token("/*", lex_comment)]
    Comment,

    // =========================================================================
    // LITERALS
    // =========================================================================
    #[token("\"", |lex| lex_string(lex, '"'))]
    #[token("'", |lex| lex_string(lex, '\''))]
    String,

    #[regex(r"@[-a-zA-Z_][-a-zA-Z0-9_]*")]
    AtKeyword,

    #[regex(r#"[^ \t\r\n\f{}();:\[\]"'/@]+"#)]
    Word,

    // =========================================================================
    // PUNCTUATION
    // =========================================================================
    #[token("{")]
    LBrace,
    #[token("}")]
    RBrace,
    #[token("(")]
    LParen,
    #[token(")")]
    RParen,
    #[token("[")]
    LBracket,
    #[token("]")]
    RBracket,
    #[token(";")]
    Semicolon,
    #[token(":")]
    Colon,
    #[token("/")]
    Slash,
    #[token("@")]
    At,
}

fn lex_comment(lex: &mut logos::Lexer<TokenKind>) -> Result<(), LexError> {
    match lex.remainder().find("*/") {
        Some(end) => {
            lex.bump(end + 2);
            Ok(())
        }
        None => {
            lex.bump(lex.remainder().len());
            Err(LexError::UnterminatedComment)
        }
    }
}

fn lex_string(lex: &mut logos::Lexer<TokenKind>, quote: char) -> Result<(), LexError> {
    let mut escaped = false;
    for (index, ch) in lex.remainder().char_indices() {
        if escaped {
            escaped = false;
            continue;
        }
        match ch {
            '\\' => escaped = true,
            '\n' => {
                lex.bump(index);
                return Err(LexError::UnterminatedString);
            }
            c if c == quote => {
                lex.bump(index + c.len_utf8());
                return Ok(());
            }
            _ => {}
        }
    }
    lex.bump(lex.remainder().len());
    Err(LexError::UnterminatedString)
}

impl TokenKind {
    pub fn is_trivia(self) -> bool {
        matches!(self, TokenKind::Whitespace | TokenKind::Comment)
    }
}
