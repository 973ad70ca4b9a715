//! Lenient parsing of external-checker output.
//!
//! Two formats are tolerated:
//!
//! - `file:line[:col]: severity: message` (primary)
//! - `file:line: message` (fallback; severity inferred from message keywords)
//!
//! Lines matching neither format are skipped. The checker's exact format
//! varies by version, so the fallback parser is intentionally lenient and
//! may misclassify obscure output.

use serde::{Deserialize, Serialize};
use veris_diagnostics::Severity;

/// One diagnostic parsed from external-checker output.
///
/// Positions are the checker's own 1-based line/column values for the
/// caller-provided filename (temporary paths are rewritten before this type
/// is constructed).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolDiagnostic {
    /// The file the checker attributed the message to.
    pub file: String,
    /// 1-based line number.
    pub line: u32,
    /// 1-based column number, when the checker reported one.
    pub column: Option<u32>,
    /// Parsed or inferred severity.
    pub severity: Severity,
    /// The message text.
    pub message: String,
}

/// Parses checker output, rewriting `temp_path` back to `user_file`.
pub fn parse_tool_output(output: &str, temp_path: &str, user_file: &str) -> Vec<ToolDiagnostic> {
    output
        .lines()
        .filter_map(|line| parse_line(line))
        .map(|mut diag| {
            if diag.file == temp_path {
                diag.file = user_file.to_string();
            }
            diag
        })
        .collect()
}

/// Parses a single output line, returning `None` for unrecognized shapes.
pub fn parse_line(line: &str) -> Option<ToolDiagnostic> {
    let line = line.trim_end();
    // Find the first `:<digits>:` boundary; everything before it is the file.
    let (file, rest) = split_location(line)?;
    let (line_no, rest) = take_number(rest)?;
    let rest = rest.strip_prefix(':')?;

    // Optional column: another number-colon group.
    let (column, rest) = match take_number(rest) {
        Some((col, after)) if after.starts_with(':') => (Some(col), &after[1..]),
        _ => (None, rest),
    };

    let rest = rest.trim_start();
    if rest.is_empty() {
        return None;
    }

    // Primary format: an explicit severity word before the message.
    let (severity, message) = match split_severity(rest) {
        Some(pair) => pair,
        None => (infer_severity(rest), rest.to_string()),
    };

    Some(ToolDiagnostic {
        file: file.to_string(),
        line: line_no,
        column,
        severity,
        message,
    })
}

/// Splits `file:...` at the first colon followed by a digit.
fn split_location(line: &str) -> Option<(&str, &str)> {
    let bytes = line.as_bytes();
    for (i, b) in bytes.iter().enumerate() {
        if *b == b':' && bytes.get(i + 1).is_some_and(|n| n.is_ascii_digit()) && i > 0 {
            return Some((&line[..i], &line[i + 1..]));
        }
    }
    None
}

/// Takes a leading decimal number, returning it and the remainder.
fn take_number(s: &str) -> Option<(u32, &str)> {
    let end = s.bytes().take_while(|b| b.is_ascii_digit()).count();
    if end == 0 {
        return None;
    }
    let value = s[..end].parse().ok()?;
    Some((value, &s[end..]))
}

/// Splits an explicit `severity: message` prefix, when present.
fn split_severity(rest: &str) -> Option<(Severity, String)> {
    let (word, message) = rest.split_once(':')?;
    let severity = match word.trim() {
        "error" | "fatal" => Severity::Error,
        "warning" => Severity::Warning,
        "info" | "note" => Severity::Info,
        _ => return None,
    };
    Some((severity, message.trim_start().to_string()))
}

/// Infers a severity from message keywords (fallback format).
fn infer_severity(message: &str) -> Severity {
    let lower = message.to_ascii_lowercase();
    if lower.contains("warning") {
        Severity::Warning
    } else if lower.contains("error") || lower.contains("syntax") || lower.contains("undefined") {
        Severity::Error
    } else {
        // Unknown shapes from a failing compile lean toward error.
        Severity::Error
    }
}
