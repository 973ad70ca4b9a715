//! Probing and invoking the external checker.

use crate::error::CheckError;
use crate::parse::{parse_tool_output, ToolDiagnostic};
use log::debug;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio::process::Command;
use veris_config::CheckConfig;
use veris_diagnostics::Severity;

/// Result of probing for the external checker.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Availability {
    /// Whether the tool was found on `PATH`.
    pub available: bool,
    /// The resolved path when available, otherwise an explanation.
    pub detail: String,
}

/// The outcome of one checker invocation.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CheckReport {
    /// Diagnostics parsed from the checker output (plus any synthesized for
    /// timeout or spawn failure).
    pub diagnostics: Vec<ToolDiagnostic>,
    /// Whether the invocation hit the wall-clock timeout.
    pub timed_out: bool,
    /// The checker's exit code, when it ran to completion.
    pub exit_code: Option<i32>,
}

impl CheckReport {
    /// Returns `true` if any diagnostic has error severity.
    pub fn has_errors(&self) -> bool {
        self.diagnostics
            .iter()
            .any(|d| d.severity == Severity::Error)
    }
}

/// Probes `PATH` for the named tool.
///
/// Never fails: an absent tool yields `available = false` with an
/// explanatory string.
pub async fn probe(tool: &str) -> Availability {
    let paths: Vec<PathBuf> = std::env::var_os("PATH")
        .map(|p| std::env::split_paths(&p).collect())
        .unwrap_or_default();
    probe_in(&paths, tool).await
}

/// Probes the given directories for the named tool.
pub async fn probe_in(paths: &[PathBuf], tool: &str) -> Availability {
    for dir in paths {
        let candidate = dir.join(tool);
        if let Ok(metadata) = tokio::fs::metadata(&candidate).await {
            if metadata.is_file() {
                return Availability {
                    available: true,
                    detail: candidate.display().to_string(),
                };
            }
        }
        #[cfg(windows)]
        {
            let candidate = dir.join(format!("{tool}.exe"));
            if let Ok(metadata) = tokio::fs::metadata(&candidate).await {
                if metadata.is_file() {
                    return Availability {
                        available: true,
                        detail: candidate.display().to_string(),
                    };
                }
            }
        }
    }
    Availability {
        available: false,
        detail: format!("'{tool}' not found on PATH"),
    }
}

/// Runs the checker in syntax-only mode against `source`.
///
/// The source is written to a uniquely named temporary directory and checked
/// with `<tool> -o <null> -g<standard> [-I<dir>]* [-D<k>=<v>]* <file>`.
/// Temporary files are removed on every exit path. Timeout and spawn
/// failure become diagnostics in the report rather than errors.
pub async fn run_check(
    source: &str,
    filename: &str,
    config: &CheckConfig,
) -> Result<CheckReport, CheckError> {
    let staging = tempfile::Builder::new().prefix("veris-check-").tempdir()?;
    // Keep only the final component so a path-like filename can't escape
    // the staging directory.
    let base = Path::new(filename)
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| "input.v".to_string());
    let temp_file = staging.path().join(&base);
    tokio::fs::write(&temp_file, source).await?;

    let mut command = Command::new(&config.tool);
    command
        .arg("-o")
        .arg(null_device())
        .arg(format!("-g{}", config.standard));
    for dir in &config.include_dirs {
        command.arg(format!("-I{dir}"));
    }
    for (key, value) in &config.defines {
        command.arg(format!("-D{key}={value}"));
    }
    command.arg(&temp_file);
    command.kill_on_drop(true);

    debug!(
        "running {} on {} (timeout {}s)",
        config.tool,
        temp_file.display(),
        config.timeout_secs
    );

    let timeout = Duration::from_secs(config.timeout_secs);
    let output = match tokio::time::timeout(timeout, command.output()).await {
        Err(_) => {
            return Ok(CheckReport {
                diagnostics: vec![ToolDiagnostic {
                    file: filename.to_string(),
                    line: 1,
                    column: None,
                    severity: Severity::Error,
                    message: format!(
                        "'{}' timed out after {} seconds",
                        config.tool, config.timeout_secs
                    ),
                }],
                timed_out: true,
                exit_code: None,
            });
        }
        Ok(Err(spawn_err)) => {
            return Ok(CheckReport {
                diagnostics: vec![ToolDiagnostic {
                    file: filename.to_string(),
                    line: 1,
                    column: None,
                    severity: Severity::Error,
                    message: format!("failed to run '{}': {spawn_err}", config.tool),
                }],
                timed_out: false,
                exit_code: None,
            });
        }
        Ok(Ok(output)) => output,
    };

    let mut text = String::from_utf8_lossy(&output.stdout).into_owned();
    text.push_str(&String::from_utf8_lossy(&output.stderr));
    let temp_path = temp_file.display().to_string();
    let diagnostics = parse_tool_output(&text, &temp_path, filename);

    Ok(CheckReport {
        diagnostics,
        timed_out: false,
        exit_code: output.status.code(),
    })
}

/// The platform's discard target for the checker's object output.
fn null_device() -> &'static str {
    if cfg!(windows) {
        "NUL"
    } else {
        "/dev/null"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn probe_missing_tool() {
        let availability = probe("veris-definitely-not-a-real-tool").await;
        assert!(!availability.available);
        assert!(availability.detail.contains("not found"));
    }

    #[tokio::test]
    async fn probe_in_finds_staged_tool() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("fakecheck"), "#!/bin/sh\n").unwrap();
        let availability = probe_in(&[dir.path().to_path_buf()], "fakecheck").await;
        assert!(availability.available);
        assert!(availability.detail.contains("fakecheck"));
    }

    #[tokio::test]
    async fn probe_in_empty_paths() {
        let availability = probe_in(&[], "anything").await;
        assert!(!availability.available);
    }

    #[tokio::test]
    async fn spawn_failure_becomes_diagnostic() {
        let config = CheckConfig {
            tool: "veris-definitely-not-a-real-tool".to_string(),
            ..CheckConfig::default()
        };
        let report = run_check("module m; endmodule", "m.v", &config)
            .await
            .unwrap();
        assert!(!report.timed_out);
        assert_eq!(report.diagnostics.len(), 1);
        assert_eq!(report.diagnostics[0].severity, Severity::Error);
        assert!(report.diagnostics[0].message.contains("failed to run"));
        assert!(report.has_errors());
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn silent_tool_yields_clean_report() {
        // `true` ignores its arguments and exits 0 with no output.
        let config = CheckConfig {
            tool: "true".to_string(),
            ..CheckConfig::default()
        };
        let report = run_check("module m; endmodule", "m.v", &config)
            .await
            .unwrap();
        assert!(report.diagnostics.is_empty());
        assert_eq!(report.exit_code, Some(0));
        assert!(!report.has_errors());
    }

    #[test]
    fn null_device_is_platform_shaped() {
        let device = null_device();
        assert!(device == "/dev/null" || device == "NUL");
    }
}
