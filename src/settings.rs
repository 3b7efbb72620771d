//! Run settings
//!
//! Supplied by the host page as JSON (never persisted).

use serde::{Deserialize, Serialize};

use crate::consts::{SPEED_DEFAULT, SPEED_MAX, SPEED_MIN};

/// Quality preset levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum QualityPreset {
    Low,
    #[default]
    Medium,
    High,
}

impl QualityPreset {
    pub fn as_str(&self) -> &'static str {
        match self {
            QualityPreset::Low => "Low",
            QualityPreset::Medium => "Medium",
            QualityPreset::High => "High",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "low" => Some(QualityPreset::Low),
            "medium" | "med" => Some(QualityPreset::Medium),
            "high" => Some(QualityPreset::High),
            _ => None,
        }
    }

    /// Stars in the night sky
    pub fn star_count(&self) -> usize {
        match self {
            QualityPreset::Low => 0,
            QualityPreset::Medium => 50,
            QualityPreset::High => 120,
        }
    }

    /// Grass blades along the ground line
    pub fn grass_count(&self) -> usize {
        match self {
            QualityPreset::Low => 8,
            QualityPreset::Medium => 20,
            QualityPreset::High => 40,
        }
    }

    /// Sparkles scattered along the laser beam each frame
    pub fn beam_sparkles(&self) -> usize {
        match self {
            QualityPreset::Low => 0,
            QualityPreset::Medium => 10,
            QualityPreset::High => 20,
        }
    }
}

/// Settings for a simulation session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Run speed (1 - 10); every stage delay is divided by it
    pub speed: u32,
    /// Graphics quality preset
    pub quality: QualityPreset,
    /// Reduced motion (no beam sparkles, no success pulse)
    pub reduced_motion: bool,
    /// Fixed RNG seed for reproducible demos (time-based when absent)
    pub seed: Option<u64>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            speed: SPEED_DEFAULT,
            quality: QualityPreset::Medium,
            reduced_motion: false,
            seed: None,
        }
    }
}

impl Settings {
    /// Create settings from a quality preset
    pub fn from_preset(preset: QualityPreset) -> Self {
        Self {
            quality: preset,
            ..Self::default()
        }
    }

    /// Parse settings from JSON, clamping out-of-range values
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        let mut settings: Settings = serde_json::from_str(json)?;
        settings.set_speed(settings.speed);
        Ok(settings)
    }

    /// Parse settings from JSON, falling back to defaults on error
    pub fn from_json_or_default(json: &str) -> Self {
        match Self::from_json(json) {
            Ok(settings) => {
                log::info!(
                    "Loaded settings (speed {}, quality {})",
                    settings.speed,
                    settings.quality.as_str()
                );
                settings
            }
            Err(e) => {
                log::warn!("Invalid settings JSON ({e}), using defaults");
                Self::default()
            }
        }
    }

    /// Set the run speed, clamped to the slider range
    pub fn set_speed(&mut self, speed: u32) {
        self.speed = speed.clamp(SPEED_MIN, SPEED_MAX);
    }

    /// Speed as the divisor applied to stage delays
    pub fn speed_factor(&self) -> f64 {
        f64::from(self.speed.clamp(SPEED_MIN, SPEED_MAX))
    }

    /// Effective beam sparkle count (respects reduced_motion)
    pub fn beam_sparkles(&self) -> usize {
        if self.reduced_motion {
            0
        } else {
            self.quality.beam_sparkles()
        }
    }

    /// Whether the completion pulse should play
    pub fn success_pulse(&self) -> bool {
        !self.reduced_motion
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let settings = Settings::default();
        assert_eq!(settings.speed, 5);
        assert_eq!(settings.quality, QualityPreset::Medium);
        assert_eq!(settings.speed_factor(), 5.0);
        assert!(settings.success_pulse());
    }

    #[test]
    fn test_speed_clamped() {
        let mut settings = Settings::default();
        settings.set_speed(0);
        assert_eq!(settings.speed, 1);
        settings.set_speed(42);
        assert_eq!(settings.speed, 10);
    }

    #[test]
    fn test_from_json_partial() {
        let settings = Settings::from_json(r#"{"quality":"high","speed":99}"#).unwrap();
        assert_eq!(settings.quality, QualityPreset::High);
        assert_eq!(settings.speed, 10);
        assert!(!settings.reduced_motion);
        assert_eq!(settings.seed, None);
    }

    #[test]
    fn test_from_json_invalid_falls_back() {
        let settings = Settings::from_json_or_default("not json");
        assert_eq!(settings, Settings::default());
    }

    #[test]
    fn test_reduced_motion_disables_effects() {
        let settings = Settings {
            reduced_motion: true,
            ..Settings::from_preset(QualityPreset::High)
        };
        assert_eq!(settings.beam_sparkles(), 0);
        assert!(!settings.success_pulse());
    }

    #[test]
    fn test_preset_parse() {
        assert_eq!(QualityPreset::parse("MED"), Some(QualityPreset::Medium));
        assert_eq!(QualityPreset::parse("ultra"), None);
    }
}
