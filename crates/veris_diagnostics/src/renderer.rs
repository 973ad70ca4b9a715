//! Diagnostic rendering with source excerpts, caret markers, and context lines.

use crate::diagnostic::Diagnostic;
use crate::label::LabelStyle;
use veris_source::SourceDb;

/// Renders diagnostics with a source snippet, a caret marker under the
/// offending span, and surrounding context lines.
///
/// Produces output like:
/// ```text
/// top.v:2:6: error: [E003] expected ';', found 'endmodule'
///   1 | module m;
///   2 | wire a
///     |      ^
///   3 | endmodule
/// help: insert ';'
/// ```
pub struct SnippetRenderer {
    /// Number of context lines shown above and below the offending line.
    pub radius: u32,
}

impl SnippetRenderer {
    /// Creates a renderer with the given context radius.
    pub fn new(radius: u32) -> Self {
        Self { radius }
    }

    /// Renders a single diagnostic into a formatted string.
    ///
    /// Diagnostics with a dummy span render the header line only.
    pub fn render(&self, diag: &Diagnostic, source_db: &SourceDb) -> String {
        let mut out = String::new();
        let code = diag.effective_code();

        if diag.primary_span.is_dummy() {
            out.push_str(&format!(
                "<input>: {}: [{}] {}\n",
                diag.severity, code, diag.message
            ));
        } else {
            let resolved = source_db.resolve_span(diag.primary_span);
            out.push_str(&format!(
                "{resolved}: {}: [{}] {}\n",
                diag.severity, code, diag.message
            ));
            self.render_snippet(diag, source_db, &mut out);
        }

        for note in &diag.notes {
            out.push_str(&format!("note: {note}\n"));
        }
        if let Some(suggestion) = &diag.suggestion {
            out.push_str(&format!("help: {suggestion}\n"));
        }
        out
    }

    /// Renders all diagnostics, in order, separated by blank lines.
    pub fn render_all(&self, diags: &[Diagnostic], source_db: &SourceDb) -> String {
        diags
            .iter()
            .map(|d| self.render(d, source_db))
            .collect::<Vec<_>>()
            .join("\n")
    }

    fn render_snippet(&self, diag: &Diagnostic, source_db: &SourceDb, out: &mut String) {
        let file = source_db.get_file(diag.primary_span.file);
        let (line, col) = file.line_col(diag.primary_span.start);
        let first = line.saturating_sub(self.radius).max(1);
        let last = (line + self.radius).min(file.line_count());
        let gutter = format!("{last}").len();

        for n in first..=last {
            let Some(text) = file.line_text(n) else { continue };
            out.push_str(&format!("  {n:>gutter$} | {text}\n"));
            if n == line {
                // Caret marker under the offending span, clamped to the line.
                let line_len = text.chars().count() as u32;
                let span_len = diag.primary_span.len().max(1);
                let width = span_len.min(line_len.saturating_sub(col - 1).max(1)) as usize;
                let pad = " ".repeat((col - 1) as usize);
                let carets = "^".repeat(width);
                let label = diag
                    .labels
                    .iter()
                    .find(|l| l.style == LabelStyle::Primary)
                    .map(|l| format!(" {}", l.message))
                    .unwrap_or_default();
                out.push_str(&format!("  {:>gutter$} | {pad}{carets}{label}\n", ""));
            }
        }
    }
}

impl Default for SnippetRenderer {
    fn default() -> Self {
        Self::new(1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::code::{Category, DiagnosticCode};
    use crate::severity::Severity;
    use veris_source::Span;

    fn db_with(content: &str) -> (SourceDb, veris_source::FileId) {
        let mut db = SourceDb::new();
        let id = db.add_source("top.v", content.to_string());
        (db, id)
    }

    #[test]
    fn header_and_caret() {
        let (db, id) = db_with("module m;\nwire a\nendmodule\n");
        // span covers "a" on line 2 (offset 15..16)
        let diag = Diagnostic::error(
            DiagnosticCode::MISSING_TOKEN,
            "expected ';', found 'endmodule'",
            Span::new(id, 15, 16),
        );
        let out = SnippetRenderer::default().render(&diag, &db);
        assert!(out.contains("top.v:2:6: error: [E003] expected ';', found 'endmodule'"));
        assert!(out.contains("2 | wire a"));
        assert!(out.contains("|      ^"));
        // radius 1 context
        assert!(out.contains("1 | module m;"));
        assert!(out.contains("3 | endmodule"));
    }

    #[test]
    fn caret_length_matches_span() {
        let (db, id) = db_with("assign foo = bar;\n");
        let diag = Diagnostic::warning(
            DiagnosticCode::new(Category::Warning, 0),
            "something about foo",
            Span::new(id, 7, 10),
        );
        let out = SnippetRenderer::default().render(&diag, &db);
        assert!(out.contains("^^^"), "expected 3-caret underline: {out}");
    }

    #[test]
    fn radius_zero_no_context() {
        let (db, id) = db_with("line one\nline two\nline three\n");
        let diag = Diagnostic::error(
            DiagnosticCode::SYNTAX_ERROR,
            "syntax error",
            Span::new(id, 9, 13),
        );
        let out = SnippetRenderer::new(0).render(&diag, &db);
        assert!(out.contains("line two"));
        assert!(!out.contains("line one"));
        assert!(!out.contains("line three"));
    }

    #[test]
    fn primary_label_after_caret() {
        use crate::label::Label;
        let (db, id) = db_with("wire a\n");
        let diag = Diagnostic::error(
            DiagnosticCode::MISSING_TOKEN,
            "expected ';'",
            Span::new(id, 5, 6),
        )
        .with_label(Label::primary(Span::new(id, 5, 6), "expected ';' here"));
        let out = SnippetRenderer::default().render(&diag, &db);
        assert!(out.contains("^ expected ';' here"), "{out}");
    }

    #[test]
    fn suggestion_rendered_as_help() {
        let (db, id) = db_with("wire a\n");
        let diag = Diagnostic::error(
            DiagnosticCode::MISSING_TOKEN,
            "expected ';'",
            Span::new(id, 5, 6),
        )
        .with_suggestion("insert ';'");
        let out = SnippetRenderer::default().render(&diag, &db);
        assert!(out.contains("help: insert ';'"));
    }

    #[test]
    fn dummy_span_header_only() {
        let db = SourceDb::new();
        let diag = Diagnostic::uncoded(Severity::Warning, "one-hot with 20 states", Span::DUMMY);
        let out = SnippetRenderer::default().render(&diag, &db);
        assert!(out.contains("<input>: warning: [W000] one-hot with 20 states"));
        assert!(!out.contains(" | "));
    }

    #[test]
    fn inferred_code_in_header() {
        let (db, id) = db_with("??\n");
        let diag = Diagnostic::uncoded(Severity::Error, "unexpected token '?'", Span::new(id, 0, 1));
        let out = SnippetRenderer::default().render(&diag, &db);
        assert!(out.contains("[E002]"));
    }
}
