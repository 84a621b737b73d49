//! Configuration parser for JSON and TOML sources

use crate::{ConfigError, ConfigValidator, PredictorConfig, Result};

/// Configuration format
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    Json,
    Toml,
}

/// Configuration parser
pub struct ConfigParser;

impl ConfigParser {
    /// Parse and validate configuration from a string
    pub fn load(content: &str, format: ConfigFormat) -> Result<PredictorConfig> {
        let config = Self::parse_string(content, format)?;
        ConfigValidator::validate(&config)?;
        log::debug!("Loaded {format:?} configuration");
        Ok(config)
    }

    /// Parse configuration from a string without validating it
    pub fn parse_string(content: &str, format: ConfigFormat) -> Result<PredictorConfig> {
        match format {
            ConfigFormat::Json => Self::parse_json(content),
            ConfigFormat::Toml => Self::parse_toml(content),
        }
    }

    /// Parse JSON configuration
    fn parse_json(content: &str) -> Result<PredictorConfig> {
        serde_json::from_str(content)
            .map_err(|e| ConfigError::Parse(format!("JSON parse error: {}", e)))
    }

    /// Parse TOML configuration
    fn parse_toml(content: &str) -> Result<PredictorConfig> {
        toml::from_str(content).map_err(|e| ConfigError::Parse(format!("TOML parse error: {}", e)))
    }

    /// Format named by a `<script type="...">` media type. A missing or
    /// empty type means JSON.
    pub fn detect_format(media_type: &str) -> Result<ConfigFormat> {
        let essence = media_type
            .split(';')
            .next()
            .unwrap_or_default()
            .trim()
            .to_ascii_lowercase();

        match essence.as_str() {
            "" | "application/json" | "text/json" => Ok(ConfigFormat::Json),
            "application/toml" | "text/toml" => Ok(ConfigFormat::Toml),
            _ => Err(ConfigError::Parse(format!(
                "Unsupported config media type: {}",
                media_type
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::AnonymousFormKeys;

    #[test]
    fn test_partial_json_keeps_defaults() {
        let config = ConfigParser::load(
            r#"{"timing": {"form_save_debounce_ms": 800}, "forms": {"anonymous_keys": "document_index"}}"#,
            ConfigFormat::Json,
        )
        .unwrap();

        assert_eq!(config.timing.form_save_debounce_ms, 800);
        assert_eq!(config.timing.resize_debounce_ms, 250);
        assert_eq!(config.forms.anonymous_keys, AnonymousFormKeys::DocumentIndex);
        assert_eq!(config.forms.key_prefix, "form_");
    }

    #[test]
    fn test_toml() {
        let config = ConfigParser::load(
            r#"
[charts]
home_strength = 50.0
home_team = "Hosts"

[service_worker]
enabled = false
"#,
            ConfigFormat::Toml,
        )
        .unwrap();

        assert_eq!(config.charts.home_strength, 50.0);
        assert_eq!(config.charts.home_team, "Hosts");
        assert_eq!(config.charts.away_strength, 60.0);
        assert!(!config.service_worker.enabled);
    }

    #[test]
    fn test_invalid_values_fail_validation() {
        let err = ConfigParser::load(
            r#"{"layout": {"small_breakpoint_px": 1200.0}}"#,
            ConfigFormat::Json,
        )
        .unwrap_err();
        assert!(matches!(err, ConfigError::Validation(_)));
    }

    #[test]
    fn test_malformed_input() {
        assert!(matches!(
            ConfigParser::load("{", ConfigFormat::Json),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn test_detect_format() {
        assert_eq!(
            ConfigParser::detect_format("application/json").unwrap(),
            ConfigFormat::Json
        );
        assert_eq!(ConfigParser::detect_format("").unwrap(), ConfigFormat::Json);
        assert_eq!(
            ConfigParser::detect_format("Application/TOML; charset=utf-8").unwrap(),
            ConfigFormat::Toml
        );
        assert!(ConfigParser::detect_format("text/yaml").is_err());
    }
}
