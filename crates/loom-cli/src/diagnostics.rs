//! Renders lex/parse/eval errors against the source line they occurred in.

use annotate_snippets::{AnnotationKind, Level, Renderer, Snippet};
use loom_core::{LexError, ParseError, Span};
use loom_eval::EvalError;

pub trait Diagnostic {
    fn message(&self) -> String;
    fn span(&self) -> Option<Span>;
}

impl Diagnostic for LexError {
    fn message(&self) -> String {
        self.to_string()
    }

    fn span(&self) -> Option<Span> {
        match self {
            LexError::Unrecognized { span, .. } => Some(*span),
        }
    }
}

impl Diagnostic for ParseError {
    fn message(&self) -> String {
        self.to_string()
    }

    fn span(&self) -> Option<Span> {
        None
    }
}

impl Diagnostic for EvalError {
    fn message(&self) -> String {
        self.to_string()
    }

    fn span(&self) -> Option<Span> {
        Some(self.span())
    }
}

/// Renders one diagnostic against `source`, with or without ANSI color.
pub fn render(diag: &dyn Diagnostic, source: &str, colored: bool) -> String {
    let message = diag.message();
    let renderer = if colored { Renderer::styled() } else { Renderer::plain() };

    let range = match diag.span() {
        Some(span) => adjust_range(span, source.len()),
        None => return format!("error: {message}"),
    };

    let snippet = Snippet::source(source)
        .line_start(1)
        .annotation(AnnotationKind::Primary.span(range).label(&message));

    let report = Level::ERROR.primary_title(&message).element(snippet);
    renderer.render(&[report])
}

fn adjust_range(span: Span, limit: usize) -> std::ops::Range<usize> {
    let start = span.start as usize;
    let end = span.end as usize;
    if start == end {
        start..(start + 1).min(limit)
    } else {
        start..end
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_includes_message() {
        let err = LexError::Unrecognized {
            remainder: "$".to_string(),
            span: Span { start: 4, end: 5 },
        };
        let out = render(&err, "1 + $", false);
        assert!(out.contains("unrecognized input"));
    }

    #[test]
    fn test_render_without_span_falls_back_to_plain() {
        let err = ParseError::UnconsumedTokens { pos: 2 };
        let out = render(&err, "1 )", false);
        assert!(out.contains("unconsumed tokens"));
    }
}
