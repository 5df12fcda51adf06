use crate::config::Config;
use crate::vecmath::Vector3;
use log::warn;
use serde::{Deserialize, Serialize};

/// Velocity blend factor applied after force accumulation: `v = (v + f) * DAMPING`.
pub const DAMPING: f64 = 0.5;

/// Presentation radius of a particle when faked depth is off (half the stroke of 8).
pub const BASE_PARTICLE_RADIUS: f64 = 4.0;

/// Parameters derived from the configuration, fixed for the duration of one step.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StepParams {
    pub radius: f64,
    pub max_interaction_distance: f64,
    pub push_back_force: f64,
    pub damping: f64,
    /// `Some(limit)` when velocity limiting is on.
    pub max_velocity: Option<f64>,
    pub collision_enabled: bool,
    pub faked_depth_enabled: bool,
    pub paused: bool,
    pub view_rotation: Vector3,
}

impl StepParams {
    /// Converts the live configuration into the values consumed by one step.
    ///
    /// `Config::validate` is the gate for malformed input. A value that slipped past it is
    /// brought into range here with a warning, and NaN becomes the lower bound.
    pub fn from_config(config: &Config) -> Self {
        StepParams {
            radius: config.radius,
            max_interaction_distance: in_range(
                "max_interaction_distance",
                config.max_interaction_distance,
                0.0,
                f64::INFINITY,
            ),
            push_back_force: in_range("push_back_force", config.push_back_force, 0.0, 1.0),
            damping: DAMPING,
            max_velocity: config
                .limit_velocity
                .then(|| in_range("max_velocity", config.max_velocity, 0.0, f64::INFINITY)),
            collision_enabled: config.collision_enabled,
            faked_depth_enabled: config.faked_depth_enabled,
            paused: config.paused,
            view_rotation: config.view_rotation,
        }
    }
}

fn in_range(name: &str, value: f64, min: f64, max: f64) -> f64 {
    if value >= min && value <= max {
        return value;
    }
    let clamped = if value > max { max } else { min };
    warn!("{} = {} is out of range [{}, {}], using {} for this step.", name, value, min, max, clamped);
    clamped
}
