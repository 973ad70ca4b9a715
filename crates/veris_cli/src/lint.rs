//! The `veris lint` subcommand.

use std::path::Path;

use veris_common::Interner;
use veris_config::LintConfig;
use veris_diagnostics::{DiagnosticSink, Report, SnippetRenderer};
use veris_lint::LintEngine;
use veris_source::SourceDb;

use crate::{LintArgs, ReportFormat};

/// Lexes, parses, builds, and lints the file; renders the report.
///
/// Returns exit code 1 when the report contains errors.
pub fn run(args: &LintArgs) -> i32 {
    let mut source_db = SourceDb::new();
    let file = match source_db.load_file(Path::new(&args.file)) {
        Ok(file) => file,
        Err(err) => {
            eprintln!("error: cannot read '{}': {err}", args.file);
            return 2;
        }
    };

    let mut config = match veris_config::load_config(Path::new(".")) {
        Ok(config) => config.lint,
        Err(err) => {
            eprintln!("error: {err}");
            return 2;
        }
    };
    config.allow.extend(args.allow.iter().cloned());
    config.deny.extend(args.deny.iter().cloned());

    let source = source_db.get_file(file).content.clone();
    let report = analyze(&source, file, &config);

    match args.format {
        ReportFormat::Text => {
            let renderer = SnippetRenderer::new(args.radius);
            let mut all = report.errors.clone();
            all.extend(report.warnings.clone());
            print!("{}", renderer.render_all(&all, &source_db));
            println!("{}", report.summary());
        }
        ReportFormat::Json => match serde_json::to_string_pretty(&report) {
            Ok(json) => println!("{json}"),
            Err(err) => {
                eprintln!("error: {err}");
                return 2;
            }
        },
    }

    if report.error_count() > 0 {
        1
    } else {
        0
    }
}

/// Runs the full front-end over one source buffer.
pub fn analyze(source: &str, file: veris_source::FileId, config: &LintConfig) -> Report {
    let interner = Interner::new();
    let sink = DiagnosticSink::new();

    match veris_ast::parse_and_build(source, file, &interner, &sink) {
        Ok((modules, _comments)) => {
            let engine = LintEngine::new(config);
            engine.run(&modules, &sink);
        }
        Err(internal) => {
            // A builder failure is a bug in veris, not in the user's source.
            eprintln!("{internal}");
        }
    }

    Report::from_diagnostics(sink.take_all())
}

#[cfg(test)]
mod tests {
    use super::*;
    use veris_source::FileId;

    #[test]
    fn clean_module_yields_clean_report() {
        let report = analyze(
            "module m(input a, output w); assign w = a; endmodule",
            FileId::from_raw(0),
            &LintConfig::default(),
        );
        assert!(report.is_clean());
    }

    #[test]
    fn undriven_wire_reported() {
        let report = analyze(
            "module m; wire a; endmodule",
            FileId::from_raw(0),
            &LintConfig::default(),
        );
        assert_eq!(report.error_count(), 1);
        assert_eq!(
            format!("{}", report.errors[0].effective_code()),
            "E101"
        );
        assert!(report.errors[0].message.contains("'a'"));
    }

    #[test]
    fn parse_errors_included() {
        let report = analyze(
            "module m(input a; endmodule",
            FileId::from_raw(0),
            &LintConfig::default(),
        );
        assert!(report.error_count() > 0);
    }

    #[test]
    fn allow_list_respected() {
        let config = LintConfig {
            allow: vec!["undriven-signal".to_string()],
            deny: Vec::new(),
        };
        let report = analyze("module m; wire a; endmodule", FileId::from_raw(0), &config);
        assert_eq!(report.error_count(), 0);
    }
}
