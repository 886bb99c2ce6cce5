//! The tree-walking evaluator.
//!
//! `eval` threads a [`Context`] through an [`Expr`], in post-order: every
//! sub-expression is evaluated before the node itself combines the
//! results. The returned context's `val` slot carries the node's value;
//! assignment-shaped nodes instead thread the (possibly mutated) receiver
//! context forward.

use loom_core::{BinOpKind, Expr, Span};

use crate::context::Context;
use crate::error::EvalError;
use crate::value::Value;

pub fn eval(expr: &Expr, ctx: Context) -> Result<Context, EvalError> {
    match expr {
        Expr::IntLiteral { value, .. } => Ok(ctx.with_val(Value::Int(*value))),

        Expr::Variable { name, span } => eval_variable(name, *span, ctx),

        Expr::Sequence { items, .. } => {
            let mut cur = ctx;
            for item in items {
                cur = eval(item, cur)?;
            }
            Ok(cur)
        }

        Expr::Assign { name, value, .. } => {
            let binding = lvalue_name(name);
            let result = eval(value, ctx.clone())?;
            let bound = result.val().expect("rvalue evaluation always sets val");
            ctx.set(binding, bound.clone());
            Ok(ctx.with_val(bound))
        }

        Expr::Link { name, value, .. } => {
            let binding = lvalue_name(name);
            let quoted = Value::Quoted(value.clone());
            ctx.set(binding, quoted.clone());
            Ok(ctx.with_val(quoted))
        }

        Expr::BinOp { op, lhs, rhs, span } => eval_binop(*op, lhs, rhs, *span, ctx),

        Expr::Paren { inner, .. } => {
            let child = ctx.child();
            let result = eval(inner, child)?;
            let val = result.val().expect("every expression sets val");
            Ok(ctx.with_val(val))
        }

        Expr::If { operand, span } => eval_if(operand, *span, ctx),
    }
}

fn lvalue_name(expr: &Expr) -> &str {
    expr.as_variable_name()
        .expect("Assign/Link name operand is always a Variable, enforced by the grammar")
}

fn eval_variable(name: &str, span: Span, ctx: Context) -> Result<Context, EvalError> {
    if name == "this" {
        return Ok(ctx.with_val(Value::Context(ctx.snapshot())));
    }

    match ctx.lookup(name, span)? {
        Value::Quoted(quoted) => eval(&quoted, ctx),
        Value::Context(captured) => Ok(captured.snapshot().reparent(ctx)),
        Value::Int(v) => Ok(ctx.with_val(Value::Int(v))),
    }
}

fn numeric_val(ctx: &Context, op: &'static str, span: Span) -> Result<i64, EvalError> {
    ctx.val()
        .and_then(|v| v.as_int())
        .ok_or(EvalError::TypeMismatch { op, span })
}

fn eval_binop(
    op: BinOpKind,
    lhs: &Expr,
    rhs: &Expr,
    span: Span,
    ctx: Context,
) -> Result<Context, EvalError> {
    let op_name = match op {
        BinOpKind::Add => "+",
        BinOpKind::Sub => "-",
        BinOpKind::Mul => "*",
        BinOpKind::Div => "/",
        BinOpKind::Eq => "==",
    };

    let lhs_ctx = eval(lhs, ctx.clone())?;
    let lhs_val = numeric_val(&lhs_ctx, op_name, lhs.span())?;

    let rhs_ctx = eval(rhs, ctx.clone())?;
    let rhs_val = numeric_val(&rhs_ctx, op_name, rhs.span())?;

    let result = match op {
        BinOpKind::Add => lhs_val.checked_add(rhs_val),
        BinOpKind::Sub => lhs_val.checked_sub(rhs_val),
        BinOpKind::Mul => lhs_val.checked_mul(rhs_val),
        BinOpKind::Div => {
            if rhs_val == 0 {
                return Err(EvalError::DivisionByZero { span });
            }
            lhs_val.checked_div(rhs_val)
        }
        BinOpKind::Eq => Some(if lhs_val == rhs_val { 1 } else { 0 }),
    };

    let result = result.ok_or(EvalError::Overflow { op: op_name, span })?;
    Ok(ctx.with_val(Value::Int(result)))
}

fn eval_if(operand: &Expr, span: Span, ctx: Context) -> Result<Context, EvalError> {
    let cond_ctx = eval(operand, ctx)?;
    let cond_val = cond_ctx.val().expect("rvalue evaluation always sets val");
    cond_ctx.set("cond", cond_val.clone());

    if cond_val.as_int().is_none() {
        return Err(EvalError::TypeMismatch { op: "if", span });
    }

    if cond_val.is_truthy() {
        let then = cond_ctx.lookup("then", span)?;
        eval_stored(&then, cond_ctx)
    } else if cond_ctx.contains("else") {
        let else_ = cond_ctx.lookup("else", span)?;
        eval_stored(&else_, cond_ctx)
    } else {
        Ok(cond_ctx)
    }
}

/// Evaluates a value that was fetched directly out of a context's slots
/// (as `If` does for `then`/`else`) using the same rules as dereferencing
/// a bare variable — a `Reference` re-runs its expression, a captured
/// environment is merged in, a plain integer is returned as-is.
fn eval_stored(value: &Value, ctx: Context) -> Result<Context, EvalError> {
    match value {
        Value::Quoted(expr) => eval(expr, ctx),
        Value::Context(captured) => Ok(captured.snapshot().reparent(ctx)),
        Value::Int(v) => Ok(ctx.with_val(Value::Int(*v))),
    }
}
