//! Errors raised while evaluating an [`loom_core::Expr`] against a
//! [`crate::Context`].

use loom_core::Span;

#[derive(Debug, Clone, thiserror::Error, PartialEq)]
pub enum EvalError {
    #[error("unknown variable {name:?}")]
    UnknownVariable { name: String, span: Span },

    #[error("type mismatch: expected an integer for {op}")]
    TypeMismatch { op: &'static str, span: Span },

    #[error("division by zero")]
    DivisionByZero { span: Span },

    #[error("integer overflow evaluating {op}")]
    Overflow { op: &'static str, span: Span },
}

impl EvalError {
    pub fn span(&self) -> Span {
        match self {
            EvalError::UnknownVariable { span, .. }
            | EvalError::TypeMismatch { span, .. }
            | EvalError::DivisionByZero { span }
            | EvalError::Overflow { span, .. } => *span,
        }
    }
}
