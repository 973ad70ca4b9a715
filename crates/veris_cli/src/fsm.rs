//! The `veris fsm` subcommands.

use std::io::Read;
use std::path::Path;

use veris_common::Interner;
use veris_diagnostics::{DiagnosticSink, Severity, SnippetRenderer};
use veris_fsm::{extract_fsm, generate_verilog, templates, validate, Fsm, FsmGenOptions};
use veris_source::SourceDb;

use crate::{FsmCommand, FsmGenerateArgs};

/// Dispatches one `veris fsm` subcommand.
pub fn run(command: &FsmCommand) -> i32 {
    match command {
        FsmCommand::Templates => list_templates(),
        FsmCommand::Template { id } => print_template(id),
        FsmCommand::Generate(args) => generate(args),
        FsmCommand::Extract { file } => extract(file),
    }
}

fn list_templates() -> i32 {
    for template in templates::registry() {
        println!("{:<20} {}", template.id, template.description);
    }
    0
}

fn print_template(id: &str) -> i32 {
    let Some(fsm) = templates::by_id(id) else {
        eprintln!("error: no template named '{id}'");
        return 2;
    };
    match serde_json::to_string_pretty(&fsm) {
        Ok(json) => {
            println!("{json}");
            0
        }
        Err(err) => {
            eprintln!("error: {err}");
            2
        }
    }
}

fn generate(args: &FsmGenerateArgs) -> i32 {
    let json = if args.fsm == "-" {
        let mut buffer = String::new();
        if let Err(err) = std::io::stdin().read_to_string(&mut buffer) {
            eprintln!("error: cannot read stdin: {err}");
            return 2;
        }
        buffer
    } else {
        match std::fs::read_to_string(&args.fsm) {
            Ok(content) => content,
            Err(err) => {
                eprintln!("error: cannot read '{}': {err}", args.fsm);
                return 2;
            }
        }
    };

    let fsm: Fsm = match serde_json::from_str(&json) {
        Ok(fsm) => fsm,
        Err(err) => {
            eprintln!("error: invalid FSM JSON: {err}");
            return 2;
        }
    };

    // Surface structural problems before generating; errors still allow
    // generation to be attempted only when an initial state exists.
    let mut had_errors = false;
    for diag in validate(&fsm) {
        had_errors |= diag.severity == Severity::Error;
        eprintln!("{}: {}", diag.severity, diag.message);
    }

    let opts = FsmGenOptions {
        state_reg: args.state_reg.clone(),
        next_state: args.next_state.clone(),
        sync_reset: args.sync_reset,
        banner: !args.no_banner,
    };
    let text = match generate_verilog(&fsm, &opts) {
        Ok(text) => text,
        Err(err) => {
            eprintln!("error: {err}");
            return 1;
        }
    };

    match &args.output {
        Some(path) => {
            if let Err(err) = std::fs::write(path, &text) {
                eprintln!("error: cannot write '{path}': {err}");
                return 2;
            }
        }
        None => print!("{text}"),
    }

    if had_errors {
        1
    } else {
        0
    }
}

fn extract(file: &str) -> i32 {
    let mut source_db = SourceDb::new();
    let file_id = match source_db.load_file(Path::new(file)) {
        Ok(id) => id,
        Err(err) => {
            eprintln!("error: cannot read '{file}': {err}");
            return 2;
        }
    };

    let source = source_db.get_file(file_id).content.clone();
    let interner = Interner::new();
    let sink = DiagnosticSink::new();
    let modules = match veris_ast::parse_and_build(&source, file_id, &interner, &sink) {
        Ok((modules, _)) => modules,
        Err(internal) => {
            eprintln!("{internal}");
            return 2;
        }
    };

    if sink.has_errors() {
        let renderer = SnippetRenderer::default();
        eprint!("{}", renderer.render_all(&sink.take_all(), &source_db));
        eprintln!("error: '{file}' has parse errors; not extracting");
        return 1;
    }

    let Some(module) = modules.first() else {
        eprintln!("error: '{file}' contains no modules");
        return 1;
    };

    let outcome = extract_fsm(module);
    if !outcome.success {
        for reason in &outcome.reasons {
            eprintln!("extraction failed: {reason}");
        }
        eprintln!("confidence: {:.1}", outcome.confidence);
        return 1;
    }

    eprintln!("confidence: {:.1}", outcome.confidence);
    match serde_json::to_string_pretty(&outcome.fsm) {
        Ok(json) => {
            println!("{json}");
            0
        }
        Err(err) => {
            eprintln!("error: {err}");
            2
        }
    }
}
