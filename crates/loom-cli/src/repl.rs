//! Interactive read-eval-print loop.

use std::io::{BufRead, Write};

use loom_eval::Context;

use crate::colors::Colors;
use crate::driver::{format_value, run_line};

const PROMPT: &str = ">> ";

/// Reads lines from `input` until EOF, evaluating each against a single
/// running [`Context`]. Blank lines are skipped. Errors go to `estream`
/// without advancing the context; values go to `ostream`.
pub fn run(
    mut input: impl BufRead,
    mut ostream: impl Write,
    mut estream: impl Write,
    colored: bool,
) -> std::io::Result<()> {
    let colors = Colors::new(colored);
    let mut ctx = Context::root();
    let mut line = String::new();

    loop {
        write!(ostream, "{PROMPT}")?;
        ostream.flush()?;

        line.clear();
        if input.read_line(&mut line)? == 0 {
            break;
        }

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
            continue;
        }

        ctx = report.ctx;
        if let Some(value) = &report.value {
            writeln!(ostream, "{}", format_value(value, colors))?;
        }
    }

    Ok(())
}
