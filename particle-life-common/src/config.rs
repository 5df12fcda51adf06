use crate::vecmath::Vector3;
use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Live simulation parameters, read by the engine at the start of every step.
///
/// The renderer/UI layer owns the value and mutates it between ticks; the engine
/// never subscribes to changes. Every field has a default so partial TOML files load.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct Config {
    /// Radius of the containment sphere.
    pub radius: f64,
    /// Lower bound for randomized interaction gains.
    pub min_g: f64,
    /// Upper bound for randomized interaction gains.
    pub max_g: f64,
    /// Pairs further apart than this contribute no force.
    pub max_interaction_distance: f64,
    /// Fraction of the distance to the origin recovered per step by an escaped particle.
    pub push_back_force: f64,
    pub collision_enabled: bool,
    pub paused: bool,
    pub faked_depth_enabled: bool,
    /// Clamp velocity magnitudes to `max_velocity` after the damped update.
    pub limit_velocity: bool,
    pub max_velocity: f64,

    // Presentation-only fields. Stored here so one struct round-trips the UI state.
    pub spinning: bool,
    pub spinning_speed: f64,
    pub zoom: f64,
    /// Camera Euler rotation; used for the faked depth radius and the collision pressure pan.
    pub view_rotation: Vector3,
    pub sound_enabled: bool,
    pub sound_volume: f64,
    pub sound_max_frequency: f64,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            radius: 240.0,
            min_g: -0.3,
            max_g: 0.3,
            max_interaction_distance: 400.0,
            push_back_force: 0.008,
            collision_enabled: true,
            paused: false,
            faked_depth_enabled: true,
            limit_velocity: false,
            max_velocity: 1.0,
            spinning: true,
            spinning_speed: 0.002,
            zoom: 1.0,
            view_rotation: Vector3::new(-std::f64::consts::PI / 8.0, std::f64::consts::PI / 4.0, 0.0),
            sound_enabled: false,
            sound_volume: 0.05,
            sound_max_frequency: 1200.0,
        }
    }
}

impl Config {
    /// Loads the configuration from a TOML file and validates it.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path_ref = path.as_ref();

        let config_str = std::fs::read_to_string(path_ref)
            .map_err(|e| anyhow::anyhow!("Failed to read config file '{}': {}", path_ref.display(), e))?;
        let config: Config = toml::from_str(&config_str)
            .map_err(|e| anyhow::anyhow!("Failed to parse TOML from '{}': {}", path_ref.display(), e))?;

        config.validate()?;
        Ok(config)
    }

    /// Checks the ranges the engine relies on.
    pub fn validate(&self) -> Result<()> {
        if !(self.radius > 0.0) {
            anyhow::bail!("radius must be positive (got {}).", self.radius);
        }
        if !(self.max_interaction_distance >= 0.0) {
            anyhow::bail!("max_interaction_distance must not be negative (got {}).", self.max_interaction_distance);
        }
        if !self.min_g.is_finite() || !self.max_g.is_finite() || self.min_g > self.max_g {
            anyhow::bail!("min_g ({}) must not exceed max_g ({}).", self.min_g, self.max_g);
        }
        if !(0.0..=1.0).contains(&self.push_back_force) {
            anyhow::bail!("push_back_force must lie in [0, 1] (got {}).", self.push_back_force);
        }
        if !(self.max_velocity >= 0.0) {
            anyhow::bail!("max_velocity must not be negative (got {}).", self.max_velocity);
        }
        Ok(())
    }

    /// Restores every field to its stock value.
    pub fn reset_to_defaults(&mut self) {
        *self = Config::default();
    }

    pub fn toggle_pause(&mut self) {
        self.paused = !self.paused;
    }

    pub fn toggle_collision(&mut self) {
        self.collision_enabled = !self.collision_enabled;
    }
}
