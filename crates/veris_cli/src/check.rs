//! The `veris check` subcommand.

use std::path::Path;

use veris_check::{probe, run_check};

use crate::CheckArgs;

/// Runs the external syntax checker on the file.
///
/// Absence of the tool is reported and exits 0: the checker is optional.
pub fn run(args: &CheckArgs) -> i32 {
    let source = match std::fs::read_to_string(&args.file) {
        Ok(source) => source,
        Err(err) => {
            eprintln!("error: cannot read '{}': {err}", args.file);
            return 2;
        }
    };

    let mut config = match veris_config::load_config(Path::new(".")) {
        Ok(config) => config.check,
        Err(err) => {
            eprintln!("error: {err}");
            return 2;
        }
    };
    if let Some(tool) = &args.tool {
        config.tool = tool.clone();
    }
    if let Some(std) = &args.std {
        config.standard = std.clone();
    }
    config.include_dirs.extend(args.include.iter().cloned());
    for define in &args.define {
        let (key, value) = define.split_once('=').unwrap_or((define.as_str(), "1"));
        config.defines.push((key.to_string(), value.to_string()));
    }

    let runtime = match tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime,
        Err(err) => {
            eprintln!("error: {err}");
            return 2;
        }
    };

    runtime.block_on(async {
        let availability = probe(&config.tool).await;
        if !availability.available {
            println!("{}; skipping external check", availability.detail);
            return 0;
        }

        match run_check(&source, &args.file, &config).await {
            Ok(report) => {
                for diag in &report.diagnostics {
                    match diag.column {
                        Some(col) => println!(
                            "{}:{}:{col}: {}: {}",
                            diag.file, diag.line, diag.severity, diag.message
                        ),
                        None => println!(
                            "{}:{}: {}: {}",
                            diag.file, diag.line, diag.severity, diag.message
                        ),
                    }
                }
                if report.diagnostics.is_empty() {
                    println!("{}: no issues found", args.file);
                }
                if report.has_errors() {
                    1
                } else {
                    0
                }
            }
            Err(err) => {
                eprintln!("error: {err}");
                2
            }
        }
    })
}
