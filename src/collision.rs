use crate::particle::Particle;
use particle_life_common::{clamp, Vector3};
use serde::{Deserialize, Serialize};

/// Read-only summary of the last collision pass, for audio/feedback consumers.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct CollisionPressure {
    /// Number of overlapping pairs found.
    pub collisions: usize,
    /// Mean horizontal position of the colliding pairs in view space, in [-1, 1].
    pub pan: f64,
    /// Mean view-space depth of the colliding pairs mapped to [0, 1]. Zero when nothing collided.
    pub depth: f64,
}

impl CollisionPressure {
    /// Collisions per particle pair slot, `collisions / (2 * particle_count)`.
    pub fn intensity(&self, particle_count: usize) -> f64 {
        if particle_count == 0 {
            return 0.0;
        }
        self.collisions as f64 / (particle_count * 2) as f64
    }
}

/// One relaxation pass over every unordered particle pair.
///
/// Overlapping pairs are pushed apart along the line of centers by a quarter of the
/// overlap each. Pairs are visited in sequence order and see positions already moved
/// earlier in the pass. Coincident centers are separated along +x.
pub fn resolve_collisions(particles: &mut [Particle], radius: f64, view_rotation: Vector3) -> CollisionPressure {
    let mut collisions = 0usize;
    let mut pan = 0.0;
    let mut depth = 0.0;

    for i in 0..particles.len() {
        let (head, tail) = particles.split_at_mut(i + 1);
        let a = &mut head[i];
        for b in tail.iter_mut() {
            let delta = b.position - a.position;
            let dist = delta.magnitude();
            let overlap = a.radius + b.radius - dist;
            if overlap <= 0.0 {
                continue;
            }
            let direction = if dist > 0.0 { delta.scale(1.0 / dist) } else { Vector3::new(1.0, 0.0, 0.0) };
            let shift = direction.scale(overlap / 4.0);
            a.position -= shift;
            b.position += shift;

            let view_a = a.position.rotate(view_rotation);
            let view_b = b.position.rotate(view_rotation);
            pan += (view_a.x + view_b.x) / radius / 2.0;
            depth += (view_a.z + view_b.z) / radius / 2.0;
            collisions += 1;
        }
    }

    if collisions == 0 {
        return CollisionPressure::default();
    }
    let n = collisions as f64;
    CollisionPressure {
        collisions,
        pan: clamp(pan / n, -1.0, 1.0),
        depth: clamp((depth / n + 1.0) / 2.0, 0.0, 1.0),
    }
}
