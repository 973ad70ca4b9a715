//! Configuration types deserialized from `veris.toml`.

use serde::{Deserialize, Serialize};

/// The top-level configuration parsed from `veris.toml`.
///
/// Every table is optional; defaults match the behavior of a bare
/// installation.
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
pub struct VerisConfig {
    /// Formatter settings.
    #[serde(default)]
    pub format: FormatConfig,
    /// Lint settings (allow/deny rule lists).
    #[serde(default)]
    pub lint: LintConfig,
    /// External syntax-checker settings.
    #[serde(default)]
    pub check: CheckConfig,
}

/// Formatter settings, mirroring the generator's options.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FormatConfig {
    /// Spaces per indentation level.
    #[serde(default = "default_indent")]
    pub indent: u8,
    /// Use tabs instead of spaces.
    #[serde(default)]
    pub tabs: bool,
    /// Soft line-width target.
    #[serde(default = "default_line_width")]
    pub line_width: u16,
    /// Pad port names to a common column in module headers.
    #[serde(default)]
    pub align_ports: bool,
    /// Pad declared names to a common column in wire/reg declarations.
    #[serde(default)]
    pub align_decls: bool,
    /// Re-emit source comments above the nearest following item.
    #[serde(default = "default_true")]
    pub preserve_comments: bool,
}

impl Default for FormatConfig {
    fn default() -> Self {
        Self {
            indent: default_indent(),
            tabs: false,
            line_width: default_line_width(),
            align_ports: false,
            align_decls: false,
            preserve_comments: true,
        }
    }
}

/// Lint settings: which rules to suppress or promote.
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
pub struct LintConfig {
    /// Rule names to suppress (e.g. `"incomplete-sensitivity"`).
    #[serde(default)]
    pub allow: Vec<String>,
    /// Rule names to promote to error severity.
    #[serde(default)]
    pub deny: Vec<String>,
}

/// External syntax-checker settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckConfig {
    /// The checker executable name, looked up on `PATH`.
    #[serde(default = "default_tool")]
    pub tool: String,
    /// Language standard passed as `-g<standard>`: `1995`, `2001`, or `2005`.
    #[serde(default = "default_standard")]
    pub standard: String,
    /// Include directories passed as `-I<dir>`.
    #[serde(default)]
    pub include_dirs: Vec<String>,
    /// Preprocessor defines passed as `-D<key>=<value>`.
    #[serde(default)]
    pub defines: Vec<(String, String)>,
    /// Wall-clock timeout for the checker process, in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for CheckConfig {
    fn default() -> Self {
        Self {
            tool: default_tool(),
            standard: default_standard(),
            include_dirs: Vec::new(),
            defines: Vec::new(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

fn default_indent() -> u8 {
    2
}

fn default_line_width() -> u16 {
    100
}

fn default_true() -> bool {
    true
}

fn default_tool() -> String {
    "iverilog".to_string()
}

fn default_standard() -> String {
    "2005".to_string()
}

fn default_timeout_secs() -> u64 {
    10
}
