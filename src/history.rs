use crate::error::{EngineError, EngineResult};
use crate::matrix::InteractionMatrix;
use crate::particle::{Group, Particle};
use crate::simulation::{check_state, SimulationWorld};
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine as _;
use log::{info, warn};
use particle_life_common::{Config, GroupSnapshot, ParticleSnapshot, Snapshot};
use std::collections::{HashSet, VecDeque};
use std::time::{SystemTime, UNIX_EPOCH};

/// Bounded, insertion-ordered history of captured world states.
///
/// Holds at most [`SnapshotStore::CAPACITY`] snapshots; pushing past that evicts the oldest.
#[derive(Debug, Clone, Default)]
pub struct SnapshotStore {
    snapshots: VecDeque<Snapshot>,
}

impl SnapshotStore {
    pub const CAPACITY: usize = 10;

    pub fn new() -> Self {
        Self::default()
    }

    /// Deep-copies the world and the reproducibility-relevant config fields.
    ///
    /// Rejected while paused.
    pub fn capture(world: &SimulationWorld, config: &Config) -> EngineResult<Snapshot> {
        if config.paused {
            warn!("Ignoring snapshot capture while paused.");
            return Err(EngineError::CaptureOnPaused);
        }
        let particles = world.particles();
        let groups = world
            .groups()
            .iter()
            .map(|group| GroupSnapshot {
                color: group.color.clone(),
                particles: group
                    .particles
                    .iter()
                    .map(|&id| {
                        let p = &particles[id];
                        ParticleSnapshot::new(p.radius, p.position, p.velocity)
                    })
                    .collect(),
            })
            .collect();

        Ok(Snapshot {
            id: new_snapshot_id(),
            created_at: now_millis(),
            radius: config.radius,
            min_g: config.min_g,
            max_g: config.max_g,
            max_interaction_distance: config.max_interaction_distance,
            push_back_force: config.push_back_force,
            collision_enabled: config.collision_enabled,
            interaction_matrix: world.matrix().to_table(),
            groups,
        })
    }

    /// Appends a snapshot, evicting the oldest once over capacity.
    pub fn push(&mut self, snapshot: Snapshot) {
        self.snapshots.push_back(snapshot);
        while self.snapshots.len() > Self::CAPACITY {
            if let Some(evicted) = self.snapshots.pop_front() {
                info!("Snapshot history full, evicted {}.", evicted.id);
            }
        }
    }

    /// Captures and pushes in one go, returning the new snapshot's id.
    pub fn capture_and_push(&mut self, world: &SimulationWorld, config: &Config) -> EngineResult<String> {
        let snapshot = Self::capture(world, config)?;
        let id = snapshot.id.clone();
        self.push(snapshot);
        info!("Captured snapshot {} ({} in history).", id, self.len());
        Ok(id)
    }

    /// Replaces the world's particles, groups and matrix with the snapshot's, and writes the snapshot's
    /// config fields back. Nothing changes unless the whole snapshot is valid.
    pub fn restore(world: &mut SimulationWorld, config: &mut Config, snapshot: &Snapshot) -> EngineResult<()> {
        validate_snapshot(snapshot)?;

        let colors: Vec<String> = snapshot.groups.iter().map(|g| g.color.clone()).collect();
        let matrix = InteractionMatrix::from_table(&colors, &snapshot.interaction_matrix)
            .map_err(|e| EngineError::InvalidSnapshotData(e.to_string()))?;

        let mut particles = Vec::with_capacity(snapshot.particle_count());
        let mut groups = Vec::with_capacity(snapshot.groups.len());
        for (group_idx, group_snapshot) in snapshot.groups.iter().enumerate() {
            let mut group = Group::new(group_snapshot.color.clone());
            for particle_snapshot in &group_snapshot.particles {
                let id = particles.len();
                particles.push(Particle {
                    id,
                    group: group_idx,
                    position: particle_snapshot.position,
                    velocity: particle_snapshot.velocity_or_zero(),
                    radius: particle_snapshot.radius,
                });
                group.particles.push(id);
            }
            groups.push(group);
        }
        check_state(&particles, &groups, &matrix)?;

        world.replace_state(particles, groups, matrix);
        config.radius = snapshot.radius;
        config.min_g = snapshot.min_g;
        config.max_g = snapshot.max_g;
        config.max_interaction_distance = snapshot.max_interaction_distance;
        config.push_back_force = snapshot.push_back_force;
        config.collision_enabled = snapshot.collision_enabled;

        info!(
            "Restored snapshot {} ({} groups, {} particles).",
            snapshot.id,
            snapshot.groups.len(),
            world.particle_count()
        );
        Ok(())
    }

    /// Snapshots in insertion order, newest last.
    pub fn snapshots(&self) -> impl Iterator<Item = &Snapshot> {
        self.snapshots.iter()
    }

    pub fn latest(&self) -> Option<&Snapshot> {
        self.snapshots.back()
    }

    pub fn get(&self, id: &str) -> Option<&Snapshot> {
        self.snapshots.iter().find(|s| s.id == id)
    }

    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    pub fn clear(&mut self) {
        self.snapshots.clear();
    }
}

/// Portable text form: MessagePack body, URL-safe base64 without padding.
pub fn encode(snapshot: &Snapshot) -> EngineResult<String> {
    let bytes = rmp_serde::to_vec_named(snapshot)
        .map_err(|e| EngineError::InvalidSnapshotData(format!("failed to encode snapshot: {}", e)))?;
    Ok(URL_SAFE_NO_PAD.encode(bytes))
}

/// Inverse of [`encode`]. Any malformed payload yields `InvalidSnapshotData`.
pub fn decode(text: &str) -> EngineResult<Snapshot> {
    let bytes = URL_SAFE_NO_PAD
        .decode(text.trim())
        .map_err(|e| EngineError::InvalidSnapshotData(format!("not a snapshot payload: {}", e)))?;
    let snapshot: Snapshot = rmp_serde::from_slice(&bytes)
        .map_err(|e| EngineError::InvalidSnapshotData(format!("corrupted snapshot payload: {}", e)))?;
    validate_snapshot(&snapshot)?;
    Ok(snapshot)
}

/// Human-readable JSON form, for file and clipboard collaborators.
pub fn to_json(snapshot: &Snapshot) -> EngineResult<String> {
    serde_json::to_string(snapshot)
        .map_err(|e| EngineError::InvalidSnapshotData(format!("failed to encode snapshot: {}", e)))
}

pub fn from_json(text: &str) -> EngineResult<Snapshot> {
    let snapshot: Snapshot = serde_json::from_str(text)
        .map_err(|e| EngineError::InvalidSnapshotData(format!("malformed snapshot JSON: {}", e)))?;
    validate_snapshot(&snapshot)?;
    Ok(snapshot)
}

/// Structural checks a decoded snapshot must pass before it may touch a world.
pub fn validate_snapshot(snapshot: &Snapshot) -> EngineResult<()> {
    let invalid = |msg: String| Err(EngineError::InvalidSnapshotData(msg));

    if snapshot.id.is_empty() {
        return invalid("missing snapshot id".to_string());
    }
    if !(snapshot.radius > 0.0) || !snapshot.radius.is_finite() {
        return invalid(format!("radius must be positive and finite (got {})", snapshot.radius));
    }
    if !snapshot.min_g.is_finite() || !snapshot.max_g.is_finite() || snapshot.min_g > snapshot.max_g {
        return invalid(format!("bad gain range [{}, {}]", snapshot.min_g, snapshot.max_g));
    }
    if !(snapshot.max_interaction_distance >= 0.0) {
        return invalid(format!("bad max_interaction_distance {}", snapshot.max_interaction_distance));
    }
    if !(0.0..=1.0).contains(&snapshot.push_back_force) {
        return invalid(format!("bad push_back_force {}", snapshot.push_back_force));
    }

    let mut colors = HashSet::new();
    for group in &snapshot.groups {
        if group.color.is_empty() || !colors.insert(group.color.as_str()) {
            return invalid(format!("empty or duplicate group color '{}'", group.color));
        }
        for particle in &group.particles {
            let velocity_ok = particle.velocity.map_or(true, |v| v.is_finite());
            if !particle.position.is_finite() || !velocity_ok || !(particle.radius >= 0.0) || !particle.radius.is_finite() {
                return invalid(format!("non-finite particle data in group '{}'", group.color));
            }
        }
    }
    for from in &colors {
        let Some(row) = snapshot.interaction_matrix.get(*from) else {
            return invalid(format!("interaction matrix has no row for '{}'", from));
        };
        for to in &colors {
            match row.get(*to) {
                Some(gain) if gain.is_finite() => {}
                _ => return invalid(format!("interaction matrix has no finite entry ({}, {})", from, to)),
            }
        }
    }
    Ok(())
}

fn new_snapshot_id() -> String {
    format!("{:016x}{:016x}", rand::random::<u64>(), rand::random::<u64>())
}

fn now_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}
