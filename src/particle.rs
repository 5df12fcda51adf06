use particle_life_common::{Vector3, BASE_PARTICLE_RADIUS};
use serde::{Deserialize, Serialize};

/// A point particle. Owned by the world's flat particle sequence.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Particle {
    /// Index into the world's particle sequence.
    pub id: usize,
    /// Index into the world's group list.
    pub group: usize,
    pub position: Vector3,
    pub velocity: Vector3,
    /// Presentation radius; load-bearing only for collision resolution.
    pub radius: f64,
}

impl Particle {
    pub fn new(id: usize, group: usize, position: Vector3) -> Self {
        Particle {
            id,
            group,
            position,
            velocity: Vector3::ZERO,
            radius: BASE_PARTICLE_RADIUS,
        }
    }
}

/// Color-keyed read index over the particle sequence. Does not own particles.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Group {
    pub color: String,
    /// Ids of member particles, in creation order.
    pub particles: Vec<usize>,
}

impl Group {
    pub fn new(color: impl Into<String>) -> Self {
        Group { color: color.into(), particles: Vec::new() }
    }

    pub fn len(&self) -> usize {
        self.particles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }
}
