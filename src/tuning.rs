//! Data-driven game balance
//!
//! Defaults reproduce the shipped feel of the game. A JSON override (from
//! LocalStorage on web) may replace any subset of fields.

use serde::{Deserialize, Serialize};

use crate::error::TuningError;

/// Balance knobs for speed, spawning and power-ups
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    /// Scroll speed at the start of a run (pixels/frame)
    pub initial_speed: f32,
    /// Hard cap on scroll speed (pixels/frame)
    pub max_speed: f32,
    /// Speed gained per elapsed millisecond
    pub speed_accel: f32,
    /// Score at which the multiplicative speed ramp reaches 2x
    pub speed_score_divisor: f32,
    /// Spawn interval at score 0 (ms)
    pub spawn_interval_ms: f32,
    /// Shortest spawn interval (ms)
    pub min_spawn_interval_ms: f32,
    /// Spawn interval shrink per point (ms)
    pub spawn_ms_per_point: f32,
    /// How long a collected power-up stays active (ms)
    pub power_up_duration_ms: f32,
    /// Chance that an obstacle spawn also drops a power-up
    pub power_up_chance: f64,
    /// Reaching this score wins the run
    pub victory_score: u32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            initial_speed: 4.0,
            max_speed: 14.0,
            speed_accel: 0.0006,
            speed_score_divisor: 600.0,
            spawn_interval_ms: 1600.0,
            min_spawn_interval_ms: 700.0,
            spawn_ms_per_point: 8.0,
            power_up_duration_ms: 5000.0,
            power_up_chance: 0.06,
            victory_score: 999,
        }
    }
}

impl Tuning {
    /// LocalStorage key for designer overrides
    #[allow(dead_code)]
    const STORAGE_KEY: &'static str = "color_flip_rush_tuning";

    /// Parse and validate an override
    pub fn from_json(json: &str) -> Result<Self, TuningError> {
        let tuning: Tuning = serde_json::from_str(json)?;
        tuning.validate()?;
        Ok(tuning)
    }

    /// Check that the values describe a playable game
    pub fn validate(&self) -> Result<(), TuningError> {
        let values = [
            ("initial_speed", self.initial_speed),
            ("max_speed", self.max_speed),
            ("speed_accel", self.speed_accel),
            ("speed_score_divisor", self.speed_score_divisor),
            ("spawn_interval_ms", self.spawn_interval_ms),
            ("min_spawn_interval_ms", self.min_spawn_interval_ms),
            ("spawn_ms_per_point", self.spawn_ms_per_point),
            ("power_up_duration_ms", self.power_up_duration_ms),
        ];
        if let Some(&(field, _)) = values.iter().find(|(_, v)| !v.is_finite()) {
            return Err(TuningError::Invalid {
                field,
                reason: "must be finite",
            });
        }
        if !(self.initial_speed > 0.0) {
            return Err(TuningError::Invalid {
                field: "initial_speed",
                reason: "must be positive",
            });
        }
        if self.max_speed < self.initial_speed {
            return Err(TuningError::Invalid {
                field: "max_speed",
                reason: "must not be below initial_speed",
            });
        }
        if self.speed_accel < 0.0 || self.spawn_ms_per_point < 0.0 {
            return Err(TuningError::Invalid {
                field: "speed_accel",
                reason: "ramps must not be negative",
            });
        }
        if !(self.speed_score_divisor > 0.0) {
            return Err(TuningError::Invalid {
                field: "speed_score_divisor",
                reason: "must be positive",
            });
        }
        if !(self.min_spawn_interval_ms > 0.0) || self.min_spawn_interval_ms > self.spawn_interval_ms {
            return Err(TuningError::Invalid {
                field: "min_spawn_interval_ms",
                reason: "must be positive and not above spawn_interval_ms",
            });
        }
        if !(0.0..=1.0).contains(&self.power_up_chance) {
            return Err(TuningError::Invalid {
                field: "power_up_chance",
                reason: "must be a probability",
            });
        }
        if self.victory_score == 0 {
            return Err(TuningError::Invalid {
                field: "victory_score",
                reason: "must be at least 1",
            });
        }
        Ok(())
    }

    /// Load the override from LocalStorage, falling back to defaults (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(Some(json)) = storage.get_item(Self::STORAGE_KEY) {
                match Self::from_json(&json) {
                    Ok(tuning) => {
                        log::info!("Loaded tuning override");
                        return tuning;
                    }
                    Err(e) => log::warn!("{} - using default tuning", e),
                }
            }
        }

        Self::default()
    }

    /// Native stub
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Self {
        Self::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        assert!(Tuning::default().validate().is_ok());
    }

    #[test]
    fn test_partial_override_keeps_defaults() {
        let tuning = Tuning::from_json(r#"{ "max_speed": 20.0, "victory_score": 50 }"#).unwrap();
        assert_eq!(tuning.max_speed, 20.0);
        assert_eq!(tuning.victory_score, 50);
        assert_eq!(tuning.initial_speed, Tuning::default().initial_speed);
    }

    #[test]
    fn test_rejects_garbage() {
        assert!(matches!(
            Tuning::from_json("not json"),
            Err(TuningError::Parse(_))
        ));
    }

    #[test]
    fn test_rejects_inverted_spawn_intervals() {
        let err = Tuning::from_json(r#"{ "min_spawn_interval_ms": 5000.0 }"#).unwrap_err();
        match err {
            TuningError::Invalid { field, .. } => assert_eq!(field, "min_spawn_interval_ms"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_rejects_non_finite_values() {
        for (field, tuning) in [
            (
                "max_speed",
                Tuning {
                    max_speed: f32::NAN,
                    ..Tuning::default()
                },
            ),
            (
                "spawn_interval_ms",
                Tuning {
                    spawn_interval_ms: f32::INFINITY,
                    ..Tuning::default()
                },
            ),
        ] {
            match tuning.validate() {
                Err(TuningError::Invalid { field: got, .. }) => assert_eq!(got, field),
                other => panic!("expected {field} to be rejected, got {other:?}"),
            }
        }
    }

    #[test]
    fn test_rejects_max_below_initial() {
        let err = Tuning::from_json(r#"{ "max_speed": 1.0 }"#).unwrap_err();
        assert!(err.to_string().contains("max_speed"));
    }
}
