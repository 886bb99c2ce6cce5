//! Script runner: evaluates a file line by line against one running
//! context, with no prompt, exiting non-zero if any line failed.

use std::io::{BufRead, Write};

use loom_eval::Context;

use crate::colors::Colors;
use crate::driver::{format_value, run_line};

/// Returns `true` iff every non-blank line evaluated without a fatal
/// lex/parse/eval error.
pub fn run(
    input: impl BufRead,
    mut ostream: impl Write,
    mut estream: impl Write,
    colored: bool,
) -> std::io::Result<bool> {
    let colors = Colors::new(colored);
    let mut ctx = Context::root();
    let mut ok = true;

    for line in input.lines() {
        let line = line?;
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }

        let report = run_line(trimmed, ctx.clone(), colored);

        if let Some(warning) = &report.warning {
            writeln!(estream, "{warning}")?;
        }

        if let Some(error) = &report.error {
            writeln!(estream, "{error}")?;
            ok = false;
            continue;
        }

        ctx = report.ctx;
        if let Some(value) = &report.value {
            writeln!(ostream, "{}", format_value(value, colors))?;
        }
    }

    Ok(ok)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_script_runs_to_completion_and_reports_success() {
        let mut out = Vec::new();
        let mut err = Vec::new();
        let ok = run("x = 2\nx * 3\n".as_bytes(), &mut out, &mut err, false).unwrap();
        assert!(ok);
        let out = String::from_utf8(out).unwrap();
        assert!(out.contains('6'));
    }

    #[test]
    fn test_script_reports_failure_on_eval_error() {
        let mut out = Vec::new();
        let mut err = Vec::new();
        let ok = run("1/0\n".as_bytes(), &mut out, &mut err, false).unwrap();
        assert!(!ok);
        let err = String::from_utf8(err).unwrap();
        assert!(!err.is_empty());
    }
}
