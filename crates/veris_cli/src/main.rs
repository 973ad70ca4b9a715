//! Veris CLI: the command-line interface for the Verilog/FSM toolkit.
//!
//! Provides `veris lint` for static analysis, `veris fmt` for round-trip
//! formatting, `veris fsm` for template/generate/extract round trips, and
//! `veris check` for running the external syntax checker.

#![warn(missing_docs)]

mod check;
mod fmt;
mod fsm;
mod lint;

use std::process;

use clap::{Parser, Subcommand, ValueEnum};

/// Veris: a Verilog front-end and FSM toolkit.
#[derive(Parser, Debug)]
#[command(name = "veris", version, about = "Verilog analysis and FSM round-trip toolkit")]
pub struct Cli {
    /// Suppress all output except errors.
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Enable verbose (debug-level) output.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// The subcommand to run.
    #[command(subcommand)]
    pub command: Command,
}

/// Available CLI commands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Parse a source file and run the lint rules.
    Lint(LintArgs),
    /// Parse a source file and print it formatted.
    Fmt(FmtArgs),
    /// FSM operations: templates, generation, extraction.
    #[command(subcommand)]
    Fsm(FsmCommand),
    /// Run the external syntax checker on a source file.
    Check(CheckArgs),
}

/// Arguments for `veris lint`.
#[derive(Parser, Debug)]
pub struct LintArgs {
    /// The Verilog source file.
    pub file: String,

    /// Rule names to suppress (e.g., `--allow incomplete-sensitivity`).
    #[arg(long, num_args = 1..)]
    pub allow: Vec<String>,

    /// Rule names to promote to errors.
    #[arg(long, num_args = 1..)]
    pub deny: Vec<String>,

    /// Output format for diagnostics.
    #[arg(short, long, value_enum, default_value_t = ReportFormat::Text)]
    pub format: ReportFormat,

    /// Context lines around each snippet.
    #[arg(long, default_value_t = 1)]
    pub radius: u32,
}

/// Arguments for `veris fmt`.
#[derive(Parser, Debug)]
pub struct FmtArgs {
    /// The Verilog source file.
    pub file: String,

    /// Rewrite the file in place instead of printing to stdout.
    #[arg(short, long)]
    pub write: bool,
}

/// Subcommands of `veris fsm`.
#[derive(Subcommand, Debug)]
pub enum FsmCommand {
    /// List the built-in FSM templates.
    Templates,
    /// Print a template as FSM JSON.
    Template {
        /// The template id (e.g., `traffic-light`).
        id: String,
    },
    /// Generate synthesizable Verilog from an FSM JSON file.
    Generate(FsmGenerateArgs),
    /// Extract an FSM from a Verilog source file, printed as JSON.
    Extract {
        /// The Verilog source file.
        file: String,
    },
}

/// Arguments for `veris fsm generate`.
#[derive(Parser, Debug)]
pub struct FsmGenerateArgs {
    /// The FSM description (JSON), or `-` for stdin.
    pub fsm: String,

    /// Write the generated Verilog here instead of stdout.
    #[arg(short, long)]
    pub output: Option<String>,

    /// Use a synchronous reset.
    #[arg(long)]
    pub sync_reset: bool,

    /// Name of the state register.
    #[arg(long, default_value = "current_state")]
    pub state_reg: String,

    /// Name of the next-state register.
    #[arg(long, default_value = "next_state")]
    pub next_state: String,

    /// Skip the comment banner.
    #[arg(long)]
    pub no_banner: bool,
}

/// Arguments for `veris check`.
#[derive(Parser, Debug)]
pub struct CheckArgs {
    /// The Verilog source file.
    pub file: String,

    /// Checker executable (default from veris.toml, falling back to iverilog).
    #[arg(long)]
    pub tool: Option<String>,

    /// Language standard: 1995, 2001, or 2005.
    #[arg(long)]
    pub std: Option<String>,

    /// Include directories.
    #[arg(short = 'I', value_name = "DIR")]
    pub include: Vec<String>,

    /// Preprocessor defines, as `KEY=VALUE`.
    #[arg(short = 'D', value_name = "KEY=VALUE")]
    pub define: Vec<String>,
}

/// Diagnostic output format.
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum ReportFormat {
    /// Human-readable text with source snippets.
    Text,
    /// Machine-readable JSON.
    Json,
}

fn main() {
    let cli = Cli::parse();

    let level = if cli.quiet {
        log::LevelFilter::Error
    } else if cli.verbose {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Info
    };
    env_logger::Builder::new().filter_level(level).init();

    let exit_code = match cli.command {
        Command::Lint(args) => lint::run(&args),
        Command::Fmt(args) => fmt::run(&args),
        Command::Fsm(command) => fsm::run(&command),
        Command::Check(args) => check::run(&args),
    };
    process::exit(exit_code);
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parse_lint_command() {
        let cli = Cli::parse_from(["veris", "lint", "top.v", "--deny", "missing-default-case"]);
        match cli.command {
            Command::Lint(args) => {
                assert_eq!(args.file, "top.v");
                assert_eq!(args.deny, vec!["missing-default-case"]);
                assert_eq!(args.format, ReportFormat::Text);
            }
            other => panic!("expected lint, got {other:?}"),
        }
    }

    #[test]
    fn parse_fsm_generate_command() {
        let cli = Cli::parse_from(["veris", "fsm", "generate", "fsm.json", "--sync-reset"]);
        match cli.command {
            Command::Fsm(FsmCommand::Generate(args)) => {
                assert_eq!(args.fsm, "fsm.json");
                assert!(args.sync_reset);
                assert_eq!(args.state_reg, "current_state");
            }
            other => panic!("expected fsm generate, got {other:?}"),
        }
    }

    #[test]
    fn parse_check_command() {
        let cli = Cli::parse_from([
            "veris", "check", "top.v", "--std", "2001", "-I", "rtl", "-D", "SIM=1",
        ]);
        match cli.command {
            Command::Check(args) => {
                assert_eq!(args.std.as_deref(), Some("2001"));
                assert_eq!(args.include, vec!["rtl"]);
                assert_eq!(args.define, vec!["SIM=1"]);
            }
            other => panic!("expected check, got {other:?}"),
        }
    }
}
