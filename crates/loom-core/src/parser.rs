//! Recursive-descent grammar engine.
//!
//! Each non-terminal is an ordinary function that tries its alternatives in
//! declared order, backtracking to the position it started at when an
//! alternative fails. There is no separate CST: a non-terminal's function
//! builds the final `Expr` node directly.
//!
//! ```text
//! Sequence   := Expr "," Sequence | Expr Sequence | Expr
//! Expr       := Assign | Link | If | Equality
//! Assign     := Variable "=" Expr
//! Link       := Variable "~" Expr
//! If         := "if" Expr
//! Equality   := PlusMinus "==" Equality | PlusMinus
//! PlusMinus  := MulDiv ("+"|"-") PlusMinus | MulDiv
//! MulDiv     := Atom ("*"|"/") MulDiv | Atom
//! Atom       := "(" Sequence ")" | Integer | Variable
//! ```

use std::rc::Rc;

use crate::ast::{BinOpKind, Expr};
use crate::token::{Token, TokenKind};

#[derive(Debug, Clone, thiserror::Error, PartialEq)]
pub enum ParseError {
    #[error("no rule matched for {rule} at token {pos}")]
    NoRuleMatched { rule: &'static str, pos: usize },

    #[error("unconsumed tokens starting at {pos}")]
    UnconsumedTokens { pos: usize },
}

type PResult<T> = Result<(T, usize), ParseError>;

/// Parses as much of `tokens` as forms a single `Sequence`, returning the
/// node and the number of tokens consumed. Leftover tokens are not an
/// error here; callers that need a full-stream parse should use
/// [`parse_exact`].
pub fn parse(tokens: &[Token]) -> Result<(Rc<Expr>, usize), ParseError> {
    parse_sequence(tokens, 0)
}

/// Parses `tokens` as a single `Sequence` and requires the whole stream to
/// be consumed.
pub fn parse_exact(tokens: &[Token]) -> Result<Rc<Expr>, ParseError> {
    let (expr, pos) = parse_sequence(tokens, 0)?;
    if pos != tokens.len() {
        return Err(ParseError::UnconsumedTokens { pos });
    }
    Ok(expr)
}

fn peek(tokens: &[Token], pos: usize) -> Option<&Token> {
    tokens.get(pos)
}

fn parse_sequence(tokens: &[Token], pos: usize) -> PResult<Rc<Expr>> {
    let (first, mut pos) = parse_expr(tokens, pos)?;
    let mut items = vec![first];

    loop {
        if let Some(Token { kind: TokenKind::Comma, .. }) = peek(tokens, pos) {
            if let Ok((next, next_pos)) = parse_expr(tokens, pos + 1) {
                items.push(next);
                pos = next_pos;
                continue;
            }
        }
        match parse_expr(tokens, pos) {
            Ok((next, next_pos)) => {
                items.push(next);
                pos = next_pos;
            }
            Err(_) => break,
        }
    }

    if items.len() == 1 {
        Ok((items.pop().unwrap(), pos))
    } else {
        let span = items[0].span().join(items[items.len() - 1].span());
        Ok((Rc::new(Expr::Sequence { items, span }), pos))
    }
}

fn parse_expr(tokens: &[Token], pos: usize) -> PResult<Rc<Expr>> {
    if let Ok(result) = parse_assign(tokens, pos) {
        return Ok(result);
    }
    if let Ok(result) = parse_link(tokens, pos) {
        return Ok(result);
    }
    if let Ok(result) = parse_if(tokens, pos) {
        return Ok(result);
    }
    parse_equality(tokens, pos).map_err(|_| ParseError::NoRuleMatched { rule: "Expr", pos })
}

fn parse_assign(tokens: &[Token], pos: usize) -> PResult<Rc<Expr>> {
    let (name, pos) = parse_variable(tokens, pos)?;
    match peek(tokens, pos) {
        Some(Token { kind: TokenKind::Eq, .. }) => {
            let (value, pos) = parse_expr(tokens, pos + 1)?;
            let span = name.span().join(value.span());
            Ok((Rc::new(Expr::Assign { name, value, span }), pos))
        }
        _ => Err(ParseError::NoRuleMatched { rule: "Assign", pos }),
    }
}

fn parse_link(tokens: &[Token], pos: usize) -> PResult<Rc<Expr>> {
    let (name, pos) = parse_variable(tokens, pos)?;
    match peek(tokens, pos) {
        Some(Token { kind: TokenKind::Tilde, .. }) => {
            let (value, pos) = parse_expr(tokens, pos + 1)?;
            let span = name.span().join(value.span());
            Ok((Rc::new(Expr::Link { name, value, span }), pos))
        }
        _ => Err(ParseError::NoRuleMatched { rule: "Link", pos }),
    }
}

fn parse_if(tokens: &[Token], pos: usize) -> PResult<Rc<Expr>> {
    match peek(tokens, pos) {
        Some(Token { kind: TokenKind::If, span: if_span }) => {
            let if_span = *if_span;
            let (operand, pos) = parse_expr(tokens, pos + 1)?;
            let span = if_span.join(operand.span());
            Ok((Rc::new(Expr::If { operand, span }), pos))
        }
        _ => Err(ParseError::NoRuleMatched { rule: "If", pos }),
    }
}

fn parse_equality(tokens: &[Token], pos: usize) -> PResult<Rc<Expr>> {
    let (lhs, pos) = parse_plusminus(tokens, pos)?;
    match peek(tokens, pos) {
        Some(Token { kind: TokenKind::EqEq, .. }) => {
            let (rhs, pos) = parse_equality(tokens, pos + 1)?;
            let span = lhs.span().join(rhs.span());
            Ok((Rc::new(Expr::BinOp { op: BinOpKind::Eq, lhs, rhs, span }), pos))
        }
        _ => Ok((lhs, pos)),
    }
}

fn parse_plusminus(tokens: &[Token], pos: usize) -> PResult<Rc<Expr>> {
    let (lhs, pos) = parse_muldiv(tokens, pos)?;
    let op = match peek(tokens, pos) {
        Some(Token { kind: TokenKind::Plus, .. }) => Some(BinOpKind::Add),
        Some(Token { kind: TokenKind::Minus, .. }) => Some(BinOpKind::Sub),
        _ => None,
    };
    match op {
        Some(op) => {
            let (rhs, pos) = parse_plusminus(tokens, pos + 1)?;
            let span = lhs.span().join(rhs.span());
            Ok((Rc::new(Expr::BinOp { op, lhs, rhs, span }), pos))
        }
        None => Ok((lhs, pos)),
    }
}

fn parse_muldiv(tokens: &[Token], pos: usize) -> PResult<Rc<Expr>> {
    let (lhs, pos) = parse_atom(tokens, pos)?;
    let op = match peek(tokens, pos) {
        Some(Token { kind: TokenKind::Star, .. }) => Some(BinOpKind::Mul),
        Some(Token { kind: TokenKind::Slash, .. }) => Some(BinOpKind::Div),
        _ => None,
    };
    match op {
        Some(op) => {
            let (rhs, pos) = parse_muldiv(tokens, pos + 1)?;
            let span = lhs.span().join(rhs.span());
            Ok((Rc::new(Expr::BinOp { op, lhs, rhs, span }), pos))
        }
        None => Ok((lhs, pos)),
    }
}

fn parse_atom(tokens: &[Token], pos: usize) -> PResult<Rc<Expr>> {
    match peek(tokens, pos) {
        Some(Token { kind: TokenKind::ParenOpen, span: open_span }) => {
            let open_span = *open_span;
            let (inner, pos) = parse_sequence(tokens, pos + 1)?;
            match peek(tokens, pos) {
                Some(Token { kind: TokenKind::ParenClose, span: close_span }) => {
                    let span = open_span.join(*close_span);
                    Ok((Rc::new(Expr::Paren { inner, span }), pos + 1))
                }
                _ => Err(ParseError::NoRuleMatched { rule: "Atom", pos }),
            }
        }
        Some(Token { kind: TokenKind::Integer(value), span }) => {
            Ok((Rc::new(Expr::IntLiteral { value: *value, span: *span }), pos + 1))
        }
        _ => parse_variable(tokens, pos),
    }
}

fn parse_variable(tokens: &[Token], pos: usize) -> PResult<Rc<Expr>> {
    match peek(tokens, pos) {
        Some(Token { kind: TokenKind::Identifier(name), span }) => {
            Ok((Rc::new(Expr::Variable { name: name.clone(), span: *span }), pos + 1))
        }
        _ => Err(ParseError::NoRuleMatched { rule: "Variable", pos }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::token::tokenize;

    fn parse_str(src: &str) -> Rc<Expr> {
        let tokens = tokenize(src).expect("lex");
        parse_exact(&tokens).expect("parse")
    }

    #[test]
    fn test_precedence_mul_over_add() {
        let expr = parse_str("2+3*4");
        match &*expr {
            Expr::BinOp { op: BinOpKind::Add, lhs, rhs, .. } => {
                assert!(matches!(&**lhs, Expr::IntLiteral { value: 2, .. }));
                assert!(matches!(&**rhs, Expr::BinOp { op: BinOpKind::Mul, .. }));
            }
            other => panic!("unexpected shape: {other:?}"),
        }
    }

    #[test]
    fn test_equality_binds_loosest() {
        let expr = parse_str("a == b + c");
        match &*expr {
            Expr::BinOp { op: BinOpKind::Eq, lhs, rhs, .. } => {
                assert!(matches!(&**lhs, Expr::Variable { .. }));
                assert!(matches!(&**rhs, Expr::BinOp { op: BinOpKind::Add, .. }));
            }
            other => panic!("unexpected shape: {other:?}"),
        }
    }

    #[test]
    fn test_parens_build_paren_node() {
        let expr = parse_str("(2+3)*4");
        match &*expr {
            Expr::BinOp { op: BinOpKind::Mul, lhs, .. } => {
                assert!(matches!(&**lhs, Expr::Paren { .. }));
            }
            other => panic!("unexpected shape: {other:?}"),
        }
    }

    #[test]
    fn test_comma_and_juxtaposition_sequence() {
        let comma = parse_str("1, 2, 3");
        let juxt = parse_str("1 2 3");
        match (&*comma, &*juxt) {
            (Expr::Sequence { items: a, .. }, Expr::Sequence { items: b, .. }) => {
                assert_eq!(a.len(), 3);
                assert_eq!(b.len(), 3);
            }
            other => panic!("unexpected shape: {other:?}"),
        }
    }

    #[test]
    fn test_assign_and_link() {
        let assign = parse_str("x = 1");
        assert!(matches!(&*assign, Expr::Assign { .. }));
        let link = parse_str("x ~ 1");
        assert!(matches!(&*link, Expr::Link { .. }));
    }

    #[test]
    fn test_if_takes_an_operand() {
        let expr = parse_str("if x");
        match &*expr {
            Expr::If { operand, .. } => assert!(matches!(&**operand, Expr::Variable { .. })),
            other => panic!("unexpected shape: {other:?}"),
        }
    }

    #[test]
    fn test_unconsumed_tokens_is_an_error() {
        let tokens = tokenize("1 )").unwrap();
        assert!(matches!(parse_exact(&tokens), Err(ParseError::UnconsumedTokens { .. })));
    }

    #[test]
    fn test_no_rule_matched_on_empty_atom() {
        let tokens = tokenize("1 +").unwrap();
        assert!(matches!(parse_exact(&tokens), Err(ParseError::NoRuleMatched { .. })));
    }

    #[test]
    fn test_partial_parse_reports_consumed_count() {
        let tokens = tokenize("1 + 2 )").unwrap();
        let (_, consumed) = parse(&tokens).unwrap();
        assert_eq!(consumed, tokens.len() - 1);
    }
}
