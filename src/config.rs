//! Simulation configuration.
//!
//! Every field has a default matching the stock lanyard, so a JSON file only
//! needs the values it overrides.

use crate::band::Smoothing;
use crate::camera::Camera;
use crate::error::{Result, SimError};
use crate::math::CurveType;
use crate::physics::{Chain, RopeMode, SleepConfig};
use glam::Vec3;
use log::info;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum TimestepMode {
    /// Step once per frame with the frame's `dt`.
    #[default]
    Variable,
    /// Step in fixed increments, carrying the remainder between frames.
    Fixed { step: f32, max_substeps: u32 },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    pub gravity: Vec3,
    pub chain_origin: Vec3,
    pub camera_position: Vec3,
    /// Vertical field of view; only the camera uses it.
    pub fov_degrees: f32,
    pub min_speed: f32,
    pub max_speed: f32,
    pub damping: f32,
    pub rope_length: f32,
    pub rope_mode: RopeMode,
    pub card_pivot: Vec3,
    pub curve_type: CurveType,
    pub spin_gain: f32,
    pub can_sleep: bool,
    pub sleep: SleepConfig,
    pub timestep: TimestepMode,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            gravity: Vec3::new(0.0, -40.0, 0.0),
            chain_origin: Vec3::new(0.0, 4.0, 0.0),
            camera_position: Vec3::new(0.0, 0.0, 30.0),
            fov_degrees: 20.0,
            min_speed: 0.0,
            max_speed: 50.0,
            damping: 4.0,
            rope_length: 1.0,
            rope_mode: RopeMode::Taut,
            card_pivot: Vec3::new(0.0, 1.5, 0.0),
            curve_type: CurveType::Chordal,
            spin_gain: 0.25,
            can_sleep: true,
            sleep: SleepConfig::default(),
            timestep: TimestepMode::Variable,
        }
    }
}

impl SimulationConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_gravity(mut self, gravity: Vec3) -> Self {
        self.gravity = gravity;
        self
    }

    pub fn with_camera_position(mut self, position: Vec3) -> Self {
        self.camera_position = position;
        self
    }

    pub fn with_speeds(mut self, min_speed: f32, max_speed: f32) -> Self {
        self.min_speed = min_speed;
        self.max_speed = max_speed;
        self
    }

    pub fn with_rope_mode(mut self, mode: RopeMode) -> Self {
        self.rope_mode = mode;
        self
    }

    pub fn with_timestep(mut self, timestep: TimestepMode) -> Self {
        self.timestep = timestep;
        self
    }

    pub fn with_can_sleep(mut self, can_sleep: bool) -> Self {
        self.can_sleep = can_sleep;
        self
    }

    pub fn smoothing(&self) -> Smoothing {
        Smoothing::new(self.min_speed, self.max_speed)
    }

    pub fn build_chain(&self) -> Chain {
        Chain::builder()
            .origin(self.chain_origin)
            .rope_length(self.rope_length)
            .rope_mode(self.rope_mode)
            .card_pivot(self.card_pivot)
            .damping(self.damping, self.damping)
            .can_sleep(self.can_sleep)
            .sleep(self.sleep)
            .build()
    }

    pub fn build_camera(&self) -> Camera {
        Camera::looking_at(self.camera_position, Vec3::ZERO).with_fov_degrees(self.fov_degrees)
    }

    pub fn validate(&self) -> Result<()> {
        let vectors = [
            ("gravity", self.gravity),
            ("chain_origin", self.chain_origin),
            ("camera_position", self.camera_position),
            ("card_pivot", self.card_pivot),
        ];
        for (field, value) in vectors {
            if !value.is_finite() {
                return Err(SimError::invalid(field, "must be finite"));
            }
        }

        if self.camera_position == Vec3::ZERO {
            return Err(SimError::invalid(
                "camera_position",
                "must not sit on the point the camera looks at",
            ));
        }
        if !(self.fov_degrees > 0.0 && self.fov_degrees < 180.0) {
            return Err(SimError::invalid("fov_degrees", "must be in (0, 180)"));
        }
        if !(self.min_speed >= 0.0 && self.min_speed.is_finite()) {
            return Err(SimError::invalid("min_speed", "must be finite and >= 0"));
        }
        if !(self.max_speed >= self.min_speed && self.max_speed.is_finite()) {
            return Err(SimError::invalid(
                "max_speed",
                format!("must be finite and >= min_speed ({})", self.min_speed),
            ));
        }
        if !(self.damping >= 0.0 && self.damping.is_finite()) {
            return Err(SimError::invalid("damping", "must be finite and >= 0"));
        }
        if !(self.rope_length > 0.0 && self.rope_length.is_finite()) {
            return Err(SimError::invalid("rope_length", "must be finite and > 0"));
        }
        if !self.spin_gain.is_finite() {
            return Err(SimError::invalid("spin_gain", "must be finite"));
        }
        if !(self.sleep.time_until_sleep > 0.0
            && self.sleep.linear_threshold >= 0.0
            && self.sleep.angular_threshold >= 0.0)
        {
            return Err(SimError::invalid(
                "sleep",
                "thresholds must be >= 0 and time_until_sleep > 0",
            ));
        }
        if let TimestepMode::Fixed { step, max_substeps } = self.timestep {
            if !(step > 0.0 && step.is_finite()) {
                return Err(SimError::invalid("timestep.step", "must be finite and > 0"));
            }
            if max_substeps == 0 {
                return Err(SimError::invalid("timestep.max_substeps", "must be at least 1"));
            }
        }
        Ok(())
    }

    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_json_string(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let json = fs::read_to_string(path)?;
        let config = Self::from_json_str(&json)?;
        info!("loaded config from {}", path.display());
        Ok(config)
    }

    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        fs::write(path, self.to_json_string()?)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let config = SimulationConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.timestep, TimestepMode::Variable);
        assert_eq!(TimestepMode::default(), TimestepMode::Variable);
    }

    #[test]
    fn partial_json_fills_in_defaults() {
        let config = SimulationConfig::from_json_str(
            r#"{ "gravity": [0.0, -9.81, 0.0], "timestep": { "mode": "fixed", "step": 0.016666668, "max_substeps": 4 } }"#,
        )
        .unwrap();

        assert_eq!(config.gravity, Vec3::new(0.0, -9.81, 0.0));
        assert_eq!(config.max_speed, 50.0);
        assert_eq!(config.rope_mode, RopeMode::Taut);
        assert!(matches!(config.timestep, TimestepMode::Fixed { max_substeps: 4, .. }));
    }

    #[test]
    fn rejects_inverted_speeds() {
        let err = SimulationConfig::new().with_speeds(10.0, 5.0).validate().unwrap_err();
        assert!(matches!(err, SimError::InvalidConfig { field: "max_speed", .. }));
    }

    #[test]
    fn rejects_zero_substeps() {
        let config = SimulationConfig::new().with_timestep(TimestepMode::Fixed {
            step: 1.0 / 60.0,
            max_substeps: 0,
        });
        assert!(config.validate().is_err());
    }

    #[test]
    fn malformed_json_is_reported() {
        let err = SimulationConfig::from_json_str("{ \"gravity\": 3 }").unwrap_err();
        assert!(matches!(err, SimError::Json(_)));
    }

    #[test]
    fn save_then_load() {
        let path = std::env::temp_dir().join(format!("lanyard-config-{}.json", std::process::id()));
        let config = SimulationConfig::new()
            .with_rope_mode(RopeMode::Slack)
            .with_camera_position(Vec3::new(5.0, 0.0, 15.0));
        config.save(&path).unwrap();

        let loaded = SimulationConfig::load(&path).unwrap();
        std::fs::remove_file(&path).ok();
        assert_eq!(loaded, config);
    }
}
