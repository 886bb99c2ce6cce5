//! Runtime values.

use std::rc::Rc;

use loom_core::Expr;

use crate::context::Context;

/// A value that can be bound to a name or carried in a context's `val` slot.
///
/// `Quoted` holds an unevaluated parse tree; unlike a closure, it carries no
/// scope of its own, it is re-evaluated against whatever context looks it
/// up. `Context` holds a captured environment, produced only by `this`; it
/// is merged into the lookup site rather than evaluated.
#[derive(Clone, Debug, PartialEq)]
pub enum Value {
    Int(i64),
    Quoted(Rc<Expr>),
    Context(Context),
}

impl Value {
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Value::Int(v) => Some(*v),
            Value::Quoted(_) | Value::Context(_) => None,
        }
    }

    pub fn is_truthy(&self) -> bool {
        matches!(self, Value::Int(v) if *v != 0)
    }
}
