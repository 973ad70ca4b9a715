//! Configuration file loading and validation.

use crate::error::ConfigError;
use crate::types::VerisConfig;
use std::path::Path;

/// Loads and validates a `veris.toml` configuration from a project directory.
///
/// A missing file yields the default configuration.
pub fn load_config(project_dir: &Path) -> Result<VerisConfig, ConfigError> {
    let config_path = project_dir.join("veris.toml");
    if !config_path.exists() {
        return Ok(VerisConfig::default());
    }
    let content = std::fs::read_to_string(&config_path)?;
    load_config_from_str(&content)
}

/// Parses and validates a `veris.toml` configuration from a string.
pub fn load_config_from_str(content: &str) -> Result<VerisConfig, ConfigError> {
    let config: VerisConfig =
        toml::from_str(content).map_err(|e| ConfigError::ParseError(e.to_string()))?;
    validate_config(&config)?;
    Ok(config)
}

fn validate_config(config: &VerisConfig) -> Result<(), ConfigError> {
    if config.format.indent == 0 {
        return Err(ConfigError::ValidationError(
            "format.indent must be at least 1".to_string(),
        ));
    }
    match config.check.standard.as_str() {
        "1995" | "2001" | "2005" => {}
        other => {
            return Err(ConfigError::ValidationError(format!(
                "check.standard must be 1995, 2001, or 2005, got '{other}'"
            )));
        }
    }
    if config.check.timeout_secs == 0 {
        return Err(ConfigError::ValidationError(
            "check.timeout_secs must be at least 1".to_string(),
        ));
    }
    Ok(())
}
