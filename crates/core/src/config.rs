use crate::error::{EditorError, Result};
use crate::raster::Rgb;
use dotenvy::dotenv;
use std::env;

const BACKGROUND_VAR: &str = "MAP_EDITOR_BACKGROUND";
const ROTATION_STEP_VAR: &str = "MAP_EDITOR_ROTATION_STEP";
const DISPLAY_SCALE_VAR: &str = "MAP_EDITOR_DISPLAY_SCALE";

#[derive(Clone, Debug, PartialEq)]
pub struct EditorConfig {
    /// Fill color for crop areas outside the image (written with alpha 0).
    pub background: Rgb,
    /// Degrees added per rotate key press.
    pub rotation_step_degrees: f64,
    /// World units per source pixel.
    pub display_scale: f64,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            background: Rgb::BLACK,
            rotation_step_degrees: 90.0,
            display_scale: 1.0,
        }
    }
}

impl EditorConfig {
    /// Reads overrides from the environment, defaulting anything unset.
    pub fn load() -> Result<Self> {
        // Load .env file if it exists, ignore if it doesn't
        let _ = dotenv();
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn builder() -> EditorConfigBuilder {
        EditorConfigBuilder::default()
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let mut config = Self::default();

        if let Some(value) = lookup(BACKGROUND_VAR) {
            config.background = Rgb::parse(&value).ok_or_else(|| {
                EditorError::config(format!(
                    "{BACKGROUND_VAR} must be #rrggbb or r,g,b, got {value:?}"
                ))
            })?;
        }
        if let Some(value) = lookup(ROTATION_STEP_VAR) {
            config.rotation_step_degrees = parse_finite(ROTATION_STEP_VAR, &value)?;
        }
        if let Some(value) = lookup(DISPLAY_SCALE_VAR) {
            let scale = parse_finite(DISPLAY_SCALE_VAR, &value)?;
            if scale <= 0.0 {
                return Err(EditorError::config(format!("{DISPLAY_SCALE_VAR} must be positive")));
            }
            config.display_scale = scale;
        }

        Ok(config)
    }
}

fn parse_finite(key: &str, value: &str) -> Result<f64> {
    value
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .ok_or_else(|| EditorError::config(format!("{key} must be a number, got {value:?}")))
}

#[derive(Default)]
pub struct EditorConfigBuilder {
    background: Option<Rgb>,
    rotation_step_degrees: Option<f64>,
    display_scale: Option<f64>,
}

impl EditorConfigBuilder {
    pub fn background(mut self, background: Rgb) -> Self {
        self.background = Some(background);
        self
    }

    pub fn rotation_step(mut self, degrees: f64) -> Self {
        self.rotation_step_degrees = Some(degrees);
        self
    }

    pub fn display_scale(mut self, scale: f64) -> Self {
        self.display_scale = Some(scale);
        self
    }

    pub fn build(self) -> EditorConfig {
        let default = EditorConfig::default();
        EditorConfig {
            background: self.background.unwrap_or(default.background),
            rotation_step_degrees: self
                .rotation_step_degrees
                .unwrap_or(default.rotation_step_degrees),
            display_scale: self
                .display_scale
                .filter(|s| s.is_finite() && *s > 0.0)
                .unwrap_or(default.display_scale),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn unset_environment_gives_defaults() {
        let config = EditorConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config, EditorConfig::default());
    }

    #[test]
    fn reads_overrides() {
        let config = EditorConfig::from_lookup(lookup(&[
            (BACKGROUND_VAR, "#102030"),
            (ROTATION_STEP_VAR, "15"),
            (DISPLAY_SCALE_VAR, "0.05"),
        ]))
        .unwrap();
        assert_eq!(config.background, Rgb::new(16, 32, 48));
        assert_eq!(config.rotation_step_degrees, 15.0);
        assert_eq!(config.display_scale, 0.05);
    }

    #[test]
    fn malformed_values_fail() {
        for pairs in [
            [(BACKGROUND_VAR, "blue")],
            [(ROTATION_STEP_VAR, "fast")],
            [(DISPLAY_SCALE_VAR, "-1")],
            [(DISPLAY_SCALE_VAR, "inf")],
        ] {
            let result = EditorConfig::from_lookup(lookup(&pairs));
            assert!(matches!(result, Err(EditorError::Config(_))));
        }
    }

    #[test]
    fn builder_overrides_defaults() {
        let config = EditorConfig::builder()
            .background(Rgb::new(1, 2, 3))
            .rotation_step(45.0)
            .display_scale(0.0)
            .build();
        assert_eq!(config.background, Rgb::new(1, 2, 3));
        assert_eq!(config.rotation_step_degrees, 45.0);
        assert_eq!(config.display_scale, 1.0);
    }
}
