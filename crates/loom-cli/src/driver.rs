//! Shared tokenize → parse → evaluate pipeline used by both the REPL and
//! the script runner.

use loom_core::{parse, tokenize};
use loom_eval::{eval, Context, Value};

use crate::colors::Colors;
use crate::diagnostics::render;

pub struct LineReport {
    pub ctx: Context,
    /// `Some` when the line produced a value (REPL-visible output).
    pub value: Option<Value>,
    /// Set when parsing left tokens unconsumed; warn but don't fail.
    pub warning: Option<String>,
    /// Set on a lex, parse or eval error; the input context is unchanged.
    pub error: Option<String>,
}

/// Runs one line of input against `ctx`, returning the updated context
/// (flattened, see [`Context::flatten`]) along with whatever should be
/// reported to the user.
pub fn run_line(src: &str, ctx: Context, colored: bool) -> LineReport {
    let tokens = match tokenize(src) {
        Ok(tokens) => tokens,
        Err(e) => {
            return LineReport {
                ctx,
                value: None,
                warning: None,
                error: Some(render(&e, src, colored)),
            };
        }
    };

    let (expr, consumed) = match parse(&tokens) {
        Ok(result) => result,
        Err(e) => {
            return LineReport {
                ctx,
                value: None,
                warning: None,
                error: Some(render(&e, src, colored)),
            };
        }
    };

    let warning = (consumed < tokens.len())
        .then(|| format!("warning: stuff unparsed on the line ({} tokens)", tokens.len() - consumed));

    match eval(&expr, ctx.clone()) {
        Ok(result) => {
            let value = result.val();
            LineReport { ctx: result.flatten(), value, warning, error: None }
        }
        Err(e) => LineReport {
            ctx,
            value: None,
            warning,
            error: Some(render(&e, src, colored)),
        },
    }
}

/// Formats a value for REPL/script output, using `colors` the way the
/// reference CLI colorizes its own output.
pub fn format_value(value: &Value, colors: Colors) -> String {
    match value {
        Value::Int(v) => format!("{}{v}{}", colors.blue, colors.reset),
        Value::Quoted(_) => format!("{}<quoted expression>{}", colors.dim, colors.reset),
        Value::Context(_) => format!("{}<context>{}", colors.dim, colors.reset),
    }
}
