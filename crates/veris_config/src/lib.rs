//! Project configuration loaded from `veris.toml`.
//!
//! Controls formatter options, lint rule allow/deny lists, and the external
//! syntax-checker invocation.

#![warn(missing_docs)]

pub mod error;
pub mod loader;
pub mod types;

pub use error::ConfigError;
pub use loader::{load_config, load_config_from_str};
pub use types::{CheckConfig, FormatConfig, LintConfig, VerisConfig};
