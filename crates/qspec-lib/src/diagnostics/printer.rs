//! Builder-pattern printer for rendering diagnostics.

use std::fmt::Write;

use annotate_snippets::{AnnotationKind, Level, Renderer, Snippet};
use qspec_core::Span;

use super::{Diagnostic, Diagnostics};

/// Builder for rendering diagnostics with various options.
pub struct DiagnosticsPrinter<'d, 's> {
    diagnostics: &'d Diagnostics,
    source: Option<&'s str>,
    path: Option<&'s str>,
    colored: bool,
}

impl<'d, 's> DiagnosticsPrinter<'d, 's> {
    pub fn new(diagnostics: &'d Diagnostics) -> Self {
        Self {
            diagnostics,
            source: None,
            path: None,
            colored: false,
        }
    }

    pub fn source(mut self, source: &'s str) -> Self {
        self.source = Some(source);
        self
    }

    pub fn path(mut self, path: &'s str) -> Self {
        self.path = Some(path);
        self
    }

    pub fn colored(mut self, value: bool) -> Self {
        self.colored = value;
        self
    }

    pub fn render(&self) -> String {
        let mut out = String::new();
        self.format(&mut out).expect("String write never fails");
        out
    }

    pub fn format(&self, w: &mut impl Write) -> std::fmt::Result {
        let mut first = true;
        for diag in self.diagnostics.iter() {
            if !first {
                w.write_char('\n')?;
            }
            first = false;

            match self.source {
                Some(source) => self.write_snippet(w, diag, source)?,
                None => write!(w, "{diag}")?,
            }
        }
        Ok(())
    }

    fn write_snippet(
        &self,
        w: &mut impl Write,
        diag: &Diagnostic,
        source: &str,
    ) -> std::fmt::Result {
        let primary = AnnotationKind::Primary.span(annotation_range(diag.span, source));
        let mut snippet = diag.related.iter().fold(
            Snippet::source(source).line_start(1).annotation(primary),
            |snippet, related| {
                snippet.annotation(
                    AnnotationKind::Context
                        .span(annotation_range(related.span, source))
                        .label(&related.message),
                )
            },
        );
        if let Some(path) = self.path {
            snippet = snippet.path(path);
        }

        let renderer = if self.colored {
            Renderer::styled()
        } else {
            Renderer::plain()
        };
        let report = [Level::ERROR.primary_title(&diag.message).element(snippet)];
        write!(w, "{}", renderer.render(&report))
    }
}

/// Byte range for an annotation. Empty spans widen to the next character so
/// the caret has something to point at; at end of input they stay empty.
fn annotation_range(span: Span, source: &str) -> std::ops::Range<usize> {
    let start = span.start.offset.min(source.len());
    let end = span.end.offset.min(source.len());

    if start == end {
        let width = source[start..].chars().next().map_or(0, char::len_utf8);
        return start..start + width;
    }

    start..end
}
