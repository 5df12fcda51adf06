use crate::vecmath::Vector3;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Gains keyed by `[from_color][to_color]`.
pub type GainTable = BTreeMap<String, BTreeMap<String, f64>>;

/// A self-contained capture of the world at one instant.
///
/// Holds deep copies only, so it never aliases live simulation state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    /// Opaque unique token.
    pub id: String,
    /// Creation time in milliseconds since the Unix epoch.
    pub created_at: u64,
    pub radius: f64,
    pub min_g: f64,
    pub max_g: f64,
    pub max_interaction_distance: f64,
    pub push_back_force: f64,
    pub collision_enabled: bool,
    pub interaction_matrix: GainTable,
    /// Groups in world order; particles keep their order within each group.
    pub groups: Vec<GroupSnapshot>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupSnapshot {
    pub color: String,
    pub particles: Vec<ParticleSnapshot>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ParticleSnapshot {
    pub radius: f64,
    pub position: Vector3,
    /// Omitted when the particle was at rest.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub velocity: Option<Vector3>,
}

impl Snapshot {
    /// Total number of particles across all groups.
    pub fn particle_count(&self) -> usize {
        self.groups.iter().map(|g| g.particles.len()).sum()
    }

    /// Group colors in order.
    pub fn colors(&self) -> impl Iterator<Item = &str> {
        self.groups.iter().map(|g| g.color.as_str())
    }
}

impl ParticleSnapshot {
    pub fn new(radius: f64, position: Vector3, velocity: Vector3) -> Self {
        ParticleSnapshot {
            radius,
            position,
            velocity: (!velocity.is_zero()).then_some(velocity),
        }
    }

    /// Stored velocity, or zero when it was omitted.
    pub fn velocity_or_zero(&self) -> Vector3 {
        self.velocity.unwrap_or(Vector3::ZERO)
    }
}
