#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

//! Tokenizer, grammar engine and AST for the loom expression language.
//!
//! `loom-core` turns source text into an [`ast::Expr`] tree. It has no
//! notion of evaluation; that lives in `loom-eval`.

pub mod ast;
pub mod parser;
pub mod token;

pub use ast::{BinOpKind, Expr};
pub use parser::{parse, parse_exact, ParseError};
pub use token::{tokenize, LexError, Span, Token, TokenKind};
