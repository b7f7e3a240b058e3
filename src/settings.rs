//! Player-tunable game settings
//!
//! The JSON shape matches what the settings screen stores, so field names are
//! camelCase. Anything out of range is clamped rather than rejected.

use serde::{Deserialize, Serialize};

/// Game settings/preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Settings {
    /// Enemies spawned in wave 1 (each later wave adds one)
    pub enemies_base: i32,
    /// Seconds between health pack spawn rolls
    pub health_pack_interval_sec: f32,
    /// Ground hitbox thickness in pixels
    pub ground_thickness: i32,
    /// Health removed from the ball per enemy contact
    pub damage_per_enemy: i32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            enemies_base: 1,
            health_pack_interval_sec: 12.0,
            ground_thickness: 24,
            damage_per_enemy: 10,
        }
    }
}

impl Settings {
    pub const MIN_ENEMIES_BASE: i32 = 1;
    pub const MIN_HEALTH_PACK_INTERVAL: f32 = 2.0;
    pub const GROUND_THICKNESS_RANGE: (i32, i32) = (4, 120);
    pub const DAMAGE_RANGE: (i32, i32) = (1, 200);

    /// Copy with every field forced into its valid range
    pub fn clamped(&self) -> Self {
        let interval = if self.health_pack_interval_sec.is_finite() {
            self.health_pack_interval_sec.max(Self::MIN_HEALTH_PACK_INTERVAL)
        } else {
            Self::default().health_pack_interval_sec
        };
        Self {
            enemies_base: self.enemies_base.max(Self::MIN_ENEMIES_BASE),
            health_pack_interval_sec: interval,
            ground_thickness: self
                .ground_thickness
                .clamp(Self::GROUND_THICKNESS_RANGE.0, Self::GROUND_THICKNESS_RANGE.1),
            damage_per_enemy: self
                .damage_per_enemy
                .clamp(Self::DAMAGE_RANGE.0, Self::DAMAGE_RANGE.1),
        }
    }

    /// Parse settings JSON; missing fields fall back to defaults, values are clamped
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        let settings: Settings = serde_json::from_str(json)?;
        Ok(settings.clamped())
    }

    /// Parse settings JSON, logging and falling back to defaults on failure
    pub fn from_json_or_default(json: &str) -> Self {
        match Self::from_json(json) {
            Ok(settings) => {
                log::info!("Loaded settings: {:?}", settings);
                settings
            }
            Err(e) => {
                log::warn!("Invalid settings ({}), using defaults", e);
                Self::default()
            }
        }
    }

    pub fn to_json(&self) -> String {
        // Plain struct of numbers, serialization cannot fail
        serde_json::to_string(self).unwrap_or_default()
    }

    pub fn ground_thickness_px(&self) -> f32 {
        self.ground_thickness as f32
    }

    pub fn damage(&self) -> f32 {
        self.damage_per_enemy as f32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_in_range() {
        let settings = Settings::default();
        assert_eq!(settings.clamped(), settings);
    }

    #[test]
    fn test_clamp_out_of_range() {
        let settings = Settings {
            enemies_base: -3,
            health_pack_interval_sec: 0.5,
            ground_thickness: 500,
            damage_per_enemy: 0,
        }
        .clamped();

        assert_eq!(settings.enemies_base, 1);
        assert_eq!(settings.health_pack_interval_sec, 2.0);
        assert_eq!(settings.ground_thickness, 120);
        assert_eq!(settings.damage_per_enemy, 1);
    }

    #[test]
    fn test_nan_interval_falls_back() {
        let settings = Settings {
            health_pack_interval_sec: f32::NAN,
            ..Default::default()
        }
        .clamped();
        assert_eq!(settings.health_pack_interval_sec, 12.0);
    }

    #[test]
    fn test_from_json_partial() {
        let settings = Settings::from_json(r#"{"enemiesBase": 4, "groundThickness": 2}"#).unwrap();
        assert_eq!(settings.enemies_base, 4);
        assert_eq!(settings.ground_thickness, 4);
        assert_eq!(settings.damage_per_enemy, 10);
        assert_eq!(settings.health_pack_interval_sec, 12.0);
    }

    #[test]
    fn test_from_json_invalid_falls_back() {
        assert!(Settings::from_json("not json").is_err());
        assert_eq!(Settings::from_json_or_default("not json"), Settings::default());
    }

    #[test]
    fn test_json_round_trip_uses_camel_case() {
        let json = Settings::default().to_json();
        assert!(json.contains("healthPackIntervalSec"));
        assert_eq!(Settings::from_json(&json).unwrap(), Settings::default());
    }
}
