//! Configuration validation utilities

use crate::{ConfigError, PredictorConfig, Result};

/// Upper bound for any configured delay
const MAX_DELAY_MS: u32 = 60_000;

/// Configuration validator
pub struct ConfigValidator;

impl ConfigValidator {
    /// Validate a complete configuration
    pub fn validate(config: &PredictorConfig) -> Result<()> {
        Self::validate_timing(&config.timing)?;
        Self::validate_forms(&config.forms)?;
        Self::validate_tracking(&config.tracking)?;
        Self::validate_tooltip(&config.tooltip)?;
        Self::validate_layout(&config.layout)?;
        Self::validate_charts(&config.charts)?;

        if config.service_worker.enabled && config.service_worker.script_url.is_empty() {
            return Err(ConfigError::Validation(
                "Service worker enabled without a script_url".to_string(),
            ));
        }

        Ok(())
    }

    fn validate_timing(timing: &crate::TimingConfig) -> Result<()> {
        for (name, value) in [
            ("form_save_debounce_ms", timing.form_save_debounce_ms),
            ("resize_debounce_ms", timing.resize_debounce_ms),
            ("button_loading_ms", timing.button_loading_ms),
            ("select_flash_ms", timing.select_flash_ms),
        ] {
            if value > MAX_DELAY_MS {
                return Err(ConfigError::Validation(format!(
                    "Invalid {}: {}. Must be at most {}",
                    name, value, MAX_DELAY_MS
                )));
            }
        }
        Ok(())
    }

    fn validate_forms(forms: &crate::FormConfig) -> Result<()> {
        if forms.key_prefix.is_empty() {
            return Err(ConfigError::Validation(
                "Form key prefix cannot be empty".to_string(),
            ));
        }
        if forms.anonymous_name.is_empty() {
            return Err(ConfigError::Validation(
                "Anonymous form name cannot be empty".to_string(),
            ));
        }
        Ok(())
    }

    fn validate_tracking(tracking: &crate::TrackingConfig) -> Result<()> {
        if tracking.selector.trim().is_empty() {
            return Err(ConfigError::Validation(
                "Tracking selector cannot be empty".to_string(),
            ));
        }
        if tracking.max_text_chars == 0 {
            return Err(ConfigError::Validation(
                "max_text_chars must be positive".to_string(),
            ));
        }
        if tracking.event_name.is_empty() {
            return Err(ConfigError::Validation(
                "Tracking event name cannot be empty".to_string(),
            ));
        }
        Ok(())
    }

    fn validate_tooltip(tooltip: &crate::TooltipConfig) -> Result<()> {
        if tooltip.attribute.is_empty() || tooltip.class_name.is_empty() {
            return Err(ConfigError::Validation(
                "Tooltip attribute and class name are required".to_string(),
            ));
        }
        if !tooltip.gap_px.is_finite() || tooltip.gap_px < 0.0 {
            return Err(ConfigError::Validation(format!(
                "Invalid tooltip gap: {}",
                tooltip.gap_px
            )));
        }
        Ok(())
    }

    fn validate_layout(layout: &crate::LayoutConfig) -> Result<()> {
        if !(layout.small_breakpoint_px > 0.0
            && layout.small_breakpoint_px < layout.medium_breakpoint_px)
        {
            return Err(ConfigError::Validation(format!(
                "Breakpoints must be positive and increasing: {} / {}",
                layout.small_breakpoint_px, layout.medium_breakpoint_px
            )));
        }

        if layout.small_font_px == 0 || layout.medium_font_px == 0 || layout.large_font_px == 0 {
            return Err(ConfigError::Validation(
                "Font sizes must be positive".to_string(),
            ));
        }

        if !(0.0..=2.0).contains(&layout.parallax_speed) {
            return Err(ConfigError::Validation(format!(
                "Invalid parallax_speed: {}. Must be between 0.0 and 2.0",
                layout.parallax_speed
            )));
        }
        Ok(())
    }

    fn validate_charts(charts: &crate::ChartDefaults) -> Result<()> {
        for (name, value) in charts.numeric_fields() {
            if !value.is_finite() || value < 0.0 {
                return Err(ConfigError::Validation(format!(
                    "Invalid chart default {}: {}",
                    name, value
                )));
            }
        }

        let total =
            charts.home_win_probability + charts.draw_probability + charts.away_win_probability;
        if total > 100.0 + f64::EPSILON * 100.0 {
            return Err(ConfigError::Validation(format!(
                "Default outcome probabilities sum to {}%",
                total
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_empty_prefix() {
        let mut config = PredictorConfig::default();
        config.forms.key_prefix.clear();
        assert!(ConfigValidator::validate(&config).is_err());
    }

    #[test]
    fn test_rejects_negative_default() {
        let mut config = PredictorConfig::default();
        config.charts.h2h_draws = -1.0;
        assert!(ConfigValidator::validate(&config).is_err());

        config.charts.h2h_draws = f64::NAN;
        assert!(ConfigValidator::validate(&config).is_err());
    }

    #[test]
    fn test_rejects_probabilities_over_hundred() {
        let mut config = PredictorConfig::default();
        config.charts.home_win_probability = 80.0;
        assert!(ConfigValidator::validate(&config).is_err());
    }

    #[test]
    fn test_rejects_inconsistent_breakpoints() {
        let mut config = PredictorConfig::default();
        config.layout.medium_breakpoint_px = config.layout.small_breakpoint_px;
        assert!(ConfigValidator::validate(&config).is_err());

        config.layout.small_breakpoint_px = 0.0;
        assert!(ConfigValidator::validate(&config).is_err());
    }

    #[test]
    fn test_rejects_long_delays() {
        let mut config = PredictorConfig::default();
        config.timing.button_loading_ms = 120_000;
        assert!(ConfigValidator::validate(&config).is_err());
    }

    #[test]
    fn test_service_worker_needs_url() {
        let mut config = PredictorConfig::default();
        config.service_worker.script_url.clear();
        assert!(ConfigValidator::validate(&config).is_err());

        config.service_worker.enabled = false;
        assert!(ConfigValidator::validate(&config).is_ok());
    }
}
