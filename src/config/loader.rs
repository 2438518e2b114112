//! Configuration loading from files (std only).

use std::fs;
use std::path::Path;

use crate::error::{ConfigError, Error, Result};

use super::ControlConfig;

/// Load configuration from a TOML file.
///
/// # Errors
///
/// Returns an error if the file cannot be read or parsed.
///
/// # Example
///
/// ```rust,ignore
/// use axis_motion::load_config;
///
/// let config = load_config("axis.toml")?;
/// ```
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<ControlConfig> {
    let content = fs::read_to_string(path.as_ref()).map_err(|e| {
        let msg = heapless::String::try_from(e.to_string().as_str()).unwrap_or_default();
        Error::Config(ConfigError::IoError(msg))
    })?;

    parse_config(&content)
}

/// Parse configuration from a TOML string.
///
/// # Errors
///
/// Returns an error if the TOML is invalid or fails validation.
pub fn parse_config(content: &str) -> Result<ControlConfig> {
    let config: ControlConfig = toml::from_str(content).map_err(|e| {
        let msg = heapless::String::try_from(e.message()).unwrap_or_default();
        Error::Config(ConfigError::ParseError(msg))
    })?;

    // Validate the configuration
    super::validation::validate_config(&config)?;

    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_minimal_config() {
        let toml = r#"
[homing]
speed = 400.0
"#;

        let config = parse_config(toml).unwrap();
        assert_eq!(config.homing.speed, 400.0);
        // Untouched tables keep their defaults.
        assert_eq!(config.safety.debounce_dwell_ms, 100);
    }

    #[test]
    fn test_parse_rejects_invalid_values() {
        let toml = r#"
[motion]
max_speed = -10.0
"#;

        assert!(parse_config(toml).is_err());
    }
}
