//! Tunable constants of the inversion pipeline.

use serde::{Deserialize, Serialize};

use crate::color::Component;
use crate::error::ConfigError;

/// Which formula decides whether a region was originally light.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ThemeEvaluator {
    /// Compare the fitted darkness scores of text and background.
    #[default]
    Heuristic,
    /// Compare WCAG relative luminances of text and background.
    Contrast,
}

/// Configuration of the inversion pipeline. Every field has a default, so a
/// partial TOML document only overrides what it names.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InversionConfig {
    /// Vibrancy bias used when inverting CSS values.
    pub css_vibrancy_bias: Component,
    /// Vibrancy bias used when inverting bitmaps.
    pub bitmap_vibrancy_bias: Component,
    /// A region without background is light if its text is darker than this.
    pub light_text_threshold: Component,
    /// A region without text is light if its background is less dark than
    /// this.
    pub light_background_threshold: Component,
    /// The formula used to classify regions.
    pub theme_evaluator: ThemeEvaluator,
    /// Emit derived custom properties for variables that can not be resolved
    /// statically. When disabled such variables are left alone.
    pub spread_variables: bool,
    /// Prefix of the derived custom properties.
    pub spread_prefix: String,
    /// Keep backgrounds that are already dark enough unchanged.
    pub darken_backgrounds: bool,
    /// Media condition that generated rules are wrapped in. Empty disables
    /// wrapping.
    pub dark_media_query: String,
}

impl Default for InversionConfig {
    fn default() -> Self {
        Self {
            css_vibrancy_bias: 0.49,
            bitmap_vibrancy_bias: 0.55,
            light_text_threshold: 0.6,
            light_background_threshold: 0.4,
            theme_evaluator: ThemeEvaluator::Heuristic,
            spread_variables: true,
            spread_prefix: "--nightshade-".to_string(),
            darken_backgrounds: false,
            dark_media_query: "(prefers-color-scheme: dark)".to_string(),
        }
    }
}

impl InversionConfig {
    /// Parse and validate a configuration from TOML.
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(text)?;
        config.validate()?;
        log::debug!("loaded inversion config: {config:?}");
        Ok(config)
    }

    /// Check that every field is in range.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let in_range = |value: Component| (0.0..=1.0).contains(&value);

        for (name, value) in [
            ("css_vibrancy_bias", self.css_vibrancy_bias),
            ("bitmap_vibrancy_bias", self.bitmap_vibrancy_bias),
        ] {
            if !in_range(value) {
                return Err(ConfigError::Bias { name, value });
            }
        }

        for (name, value) in [
            ("light_text_threshold", self.light_text_threshold),
            ("light_background_threshold", self.light_background_threshold),
        ] {
            if !in_range(value) {
                return Err(ConfigError::Threshold { name, value });
            }
        }

        if !self.spread_prefix.starts_with("--") || self.spread_prefix.len() <= 2 {
            return Err(ConfigError::Prefix(self.spread_prefix.clone()));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = InversionConfig::default();
        assert_eq!(config.css_vibrancy_bias, 0.49);
        assert_eq!(config.bitmap_vibrancy_bias, 0.55);
        assert_eq!(config.theme_evaluator, ThemeEvaluator::Heuristic);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn partial_toml() {
        let config = InversionConfig::from_toml_str(
            r#"
            theme_evaluator = "contrast"
            spread_prefix = "--dark-"
            "#,
        )
        .unwrap();
        assert_eq!(config.theme_evaluator, ThemeEvaluator::Contrast);
        assert_eq!(config.spread_prefix, "--dark-");
        assert_eq!(config.light_text_threshold, 0.6);

        assert_eq!(
            InversionConfig::from_toml_str("").unwrap(),
            InversionConfig::default()
        );
    }

    #[test]
    fn invalid_values() {
        assert!(matches!(
            InversionConfig::from_toml_str("css_vibrancy_bias = 1.5"),
            Err(ConfigError::Bias {
                name: "css_vibrancy_bias",
                ..
            })
        ));
        assert!(matches!(
            InversionConfig::from_toml_str("light_text_threshold = -1.0"),
            Err(ConfigError::Threshold { .. })
        ));
        assert!(matches!(
            InversionConfig::from_toml_str("spread_prefix = \"--\""),
            Err(ConfigError::Prefix(_))
        ));
        assert!(matches!(
            InversionConfig::from_toml_str("spread_variables = 3"),
            Err(ConfigError::Parse(_))
        ));
    }
}
