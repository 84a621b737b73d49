//! Configuration system for the Football Predictor page runtime
//! Timings, storage keys, selectors, layout breakpoints and chart fallbacks

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub mod chart_defaults;
pub mod parser;
pub mod validation;

pub use chart_defaults::ChartDefaults;
pub use parser::{ConfigFormat, ConfigParser};
pub use validation::ConfigValidator;

/// Configuration errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Validation error: {0}")]
    Validation(String),
}

pub type Result<T> = std::result::Result<T, ConfigError>;

/// Complete page runtime configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PredictorConfig {
    pub timing: TimingConfig,
    pub forms: FormConfig,
    pub tracking: TrackingConfig,
    pub tooltip: TooltipConfig,
    pub layout: LayoutConfig,
    pub charts: ChartDefaults,
    pub service_worker: ServiceWorkerConfig,
}

/// Debounce windows and effect durations, in milliseconds
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimingConfig {
    pub form_save_debounce_ms: u32,
    pub resize_debounce_ms: u32,
    pub button_loading_ms: u32,
    pub select_flash_ms: u32,
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            form_save_debounce_ms: 500,
            resize_debounce_ms: 250,
            button_loading_ms: 2000,
            select_flash_ms: 200,
        }
    }
}

/// How forms without an `id` are keyed in storage
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnonymousFormKeys {
    /// Every anonymous form shares one key; the last save wins
    #[default]
    Shared,
    /// Anonymous forms get a key suffixed with their document position
    DocumentIndex,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FormConfig {
    pub key_prefix: String,
    pub anonymous_name: String,
    pub anonymous_keys: AnonymousFormKeys,
}

impl Default for FormConfig {
    fn default() -> Self {
        Self {
            key_prefix: "form_".to_string(),
            anonymous_name: "default".to_string(),
            anonymous_keys: AnonymousFormKeys::Shared,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrackingConfig {
    /// Elements whose clicks are reported
    pub selector: String,
    pub max_text_chars: usize,
    pub event_name: String,
}

impl Default for TrackingConfig {
    fn default() -> Self {
        Self {
            selector: "a, button, .card".to_string(),
            max_text_chars: 50,
            event_name: "user_interaction".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TooltipConfig {
    pub attribute: String,
    pub class_name: String,
    pub gap_px: f64,
}

impl Default for TooltipConfig {
    fn default() -> Self {
        Self {
            attribute: "data-tooltip".to_string(),
            class_name: "custom-tooltip".to_string(),
            gap_px: 10.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    pub small_breakpoint_px: f64,
    pub medium_breakpoint_px: f64,
    pub small_font_px: u32,
    pub medium_font_px: u32,
    pub large_font_px: u32,
    pub parallax_speed: f64,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            small_breakpoint_px: 768.0,
            medium_breakpoint_px: 1024.0,
            small_font_px: 14,
            medium_font_px: 16,
            large_font_px: 18,
            parallax_speed: 0.5,
        }
    }
}

impl LayoutConfig {
    /// Root font size for a viewport width
    pub fn font_size_for(&self, viewport_width: f64) -> u32 {
        if viewport_width < self.small_breakpoint_px {
            self.small_font_px
        } else if viewport_width < self.medium_breakpoint_px {
            self.medium_font_px
        } else {
            self.large_font_px
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServiceWorkerConfig {
    pub enabled: bool,
    pub script_url: String,
}

impl Default for ServiceWorkerConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            script_url: "/static/sw.js".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = PredictorConfig::default();
        assert_eq!(config.timing.form_save_debounce_ms, 500);
        assert_eq!(config.timing.resize_debounce_ms, 250);
        assert_eq!(config.forms.key_prefix, "form_");
        assert_eq!(config.forms.anonymous_keys, AnonymousFormKeys::Shared);
        assert_eq!(config.tracking.max_text_chars, 50);
        assert_eq!(config.tooltip.gap_px, 10.0);
        assert!(ConfigValidator::validate(&config).is_ok());
    }

    #[test]
    fn test_font_size_breakpoints() {
        let layout = LayoutConfig::default();
        assert_eq!(layout.font_size_for(375.0), 14);
        assert_eq!(layout.font_size_for(767.9), 14);
        assert_eq!(layout.font_size_for(768.0), 16);
        assert_eq!(layout.font_size_for(1023.0), 16);
        assert_eq!(layout.font_size_for(1440.0), 18);
    }
}
