//! Lexer for the loom expression language.

use logos::Logos;
use std::ops::Range;

/// A byte-offset span into the source string, attached to every token.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(test, derive(serde::Serialize))]
pub struct Span {
    pub start: u32,
    pub end: u32,
}

impl Span {
    pub fn new(range: Range<usize>) -> Self {
        Self {
            start: range.start as u32,
            end: range.end as u32,
        }
    }

    pub fn join(self, other: Span) -> Span {
        Span {
            start: self.start.min(other.start),
            end: self.end.max(other.end),
        }
    }
}

impl From<Span> for Range<usize> {
    fn from(span: Span) -> Range<usize> {
        span.start as usize..span.end as usize
    }
}

#[derive(Logos, Debug, PartialEq, Clone)]
#[cfg_attr(test, derive(serde::Serialize))]
#[logos(skip r"[ \t\r\n]+")]
pub enum TokenKind {
    #[token("if")]
    If,

    #[regex(r"[0-9]+", |lex| lex.slice().parse::<i64>().ok())]
    Integer(i64),

    #[regex(r"[A-Za-z_][A-Za-z0-9_]*", |lex| lex.slice().to_string())]
    Identifier(String),

    #[token("==")]
    EqEq,

    #[token("=")]
    Eq,

    #[token("~")]
    Tilde,

    #[token("+")]
    Plus,

    #[token("-")]
    Minus,

    #[token("*")]
    Star,

    #[token("/")]
    Slash,

    #[token(",")]
    Comma,

    #[token("(")]
    ParenOpen,

    #[token(")")]
    ParenClose,
}

impl std::fmt::Display for TokenKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TokenKind::If => write!(f, "if"),
            TokenKind::Integer(v) => write!(f, "{v}"),
            TokenKind::Identifier(name) => write!(f, "{name}"),
            TokenKind::EqEq => write!(f, "=="),
            TokenKind::Eq => write!(f, "="),
            TokenKind::Tilde => write!(f, "~"),
            TokenKind::Plus => write!(f, "+"),
            TokenKind::Minus => write!(f, "-"),
            TokenKind::Star => write!(f, "*"),
            TokenKind::Slash => write!(f, "/"),
            TokenKind::Comma => write!(f, ","),
            TokenKind::ParenOpen => write!(f, "("),
            TokenKind::ParenClose => write!(f, ")"),
        }
    }
}

/// A single lexed token together with its source span.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(test, derive(serde::Serialize))]
pub struct Token {
    pub kind: TokenKind,
    pub span: Span,
}

impl std::fmt::Display for Token {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.kind)
    }
}

#[derive(Debug, Clone, thiserror::Error, PartialEq)]
pub enum LexError {
    #[error("unrecognized input: {remainder:?}")]
    Unrecognized { remainder: String, span: Span },
}

/// Tokenizes an entire source string, bailing out on the first run of
/// unrecognized bytes.
pub fn tokenize(src: &str) -> Result<Vec<Token>, LexError> {
    let mut lexer = TokenKind::lexer(src);
    let mut tokens = Vec::new();

    while let Some(result) = lexer.next() {
        match result {
            Ok(kind) => tokens.push(Token {
                kind,
                span: Span::new(lexer.span()),
            }),
            Err(()) => {
                let span = Span::new(lexer.span());
                return Err(LexError::Unrecognized {
                    remainder: src[lexer.span()].to_string(),
                    span,
                });
            }
        }
    }

    Ok(tokens)
}
