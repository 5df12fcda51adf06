use crate::collision::{resolve_collisions, CollisionPressure};
use crate::error::{EngineError, EngineResult};
use crate::matrix::{gain_distribution, InteractionMatrix};
use crate::particle::{Group, Particle};
use log::{debug, info, trace};
use particle_life_common::{clamp, Config, StepParams, Vector3, BASE_PARTICLE_RADIUS};
use rand::prelude::*;
use rayon::prelude::*;
use std::collections::HashSet;
use std::f64::consts::TAU;
use std::time::Instant;

/// The stock ten-color palette, one group per color.
pub const DEFAULT_PALETTE: [&str; 10] = [
    "#fb7185", "#fb923c", "#facc15", "#4ade80", "#22d3ee", "#60a5fa", "#a78bfa", "#e879f9", "#ffffff", "#94a3b8",
];

/// Particles per group in the stock setup.
pub const DEFAULT_GROUP_SIZE: usize = 75;

/// Owns every particle, the group index and the interaction matrix, and advances them one tick at a time.
///
/// Invariants:
/// - `particles[i].id == i`, and every particle is listed by exactly one group (the one named by `particle.group`).
/// - `matrix.colors()[g] == groups[g].color` for every group, so every active pair has a gain.
pub struct SimulationWorld {
    particles: Vec<Particle>,
    groups: Vec<Group>,
    matrix: InteractionMatrix,
    /// Source of every random draw (placement and gains).
    rng: StdRng,
    step_count: u64,
    collision_pressure: CollisionPressure,
}

impl Default for SimulationWorld {
    fn default() -> Self {
        Self::new()
    }
}

impl SimulationWorld {
    /// Creates an empty world seeded from the operating system.
    pub fn new() -> Self {
        Self::from_rng(StdRng::from_os_rng())
    }

    /// Creates an empty world with a reproducible random stream.
    pub fn with_seed(seed: u64) -> Self {
        Self::from_rng(StdRng::seed_from_u64(seed))
    }

    fn from_rng(rng: StdRng) -> Self {
        SimulationWorld {
            particles: Vec::new(),
            groups: Vec::new(),
            matrix: InteractionMatrix::new(),
            rng,
            step_count: 0,
            collision_pressure: CollisionPressure::default(),
        }
    }

    /// Adds `count` particles of a new group `color`, placed uniformly inside the containment sphere
    /// at rest. The matrix gains a full row and column for the color, drawn from `[min_g, max_g]`.
    ///
    /// `count == 0` is a no-op. A color that already names a group is rejected.
    pub fn add_group(&mut self, count: usize, color: &str, config: &Config) -> EngineResult<()> {
        if count == 0 {
            return Ok(());
        }
        if self.groups.iter().any(|g| g.color == color) {
            return Err(EngineError::InvariantViolation(format!("group '{}' already exists", color)));
        }
        if !(config.radius > 0.0) {
            return Err(EngineError::InvalidConfig(format!("radius must be positive (got {})", config.radius)));
        }
        let dist = gain_distribution(config.min_g, config.max_g)?;

        let group_idx = self.groups.len();
        let first_id = self.particles.len();
        let positions: Vec<Vector3> = (0..count).map(|_| random_point_in_sphere(config.radius, &mut self.rng)).collect();

        let rng = &mut self.rng;
        self.matrix.insert_color(color, || rng.sample(&dist))?;

        let mut group = Group::new(color);
        for (offset, position) in positions.into_iter().enumerate() {
            let id = first_id + offset;
            self.particles.push(Particle::new(id, group_idx, position));
            group.particles.push(id);
        }
        self.groups.push(group);

        info!("Added group {} with {} particles ({} total).", color, count, self.particles.len());
        Ok(())
    }

    /// Resets the world and adds one group of `count_per_group` particles per palette color,
    /// then randomizes the interactions.
    pub fn populate_default(&mut self, count_per_group: usize, config: &Config) -> EngineResult<()> {
        self.reset();
        for color in DEFAULT_PALETTE {
            self.add_group(count_per_group, color, config)?;
        }
        self.randomize_interactions(config)
    }

    /// Draws a fresh gain in `[min_g, max_g]` for every ordered pair of group colors.
    ///
    /// Every particle is brought to rest where it stands.
    pub fn randomize_interactions(&mut self, config: &Config) -> EngineResult<()> {
        let colors: Vec<String> = self.groups.iter().map(|g| g.color.clone()).collect();
        self.matrix = InteractionMatrix::randomize(&colors, config.min_g, config.max_g, &mut self.rng)?;
        for particle in &mut self.particles {
            particle.velocity = Vector3::ZERO;
        }
        info!(
            "Randomized {}x{} interaction matrix in [{}, {}].",
            colors.len(),
            colors.len(),
            config.min_g,
            config.max_g
        );
        Ok(())
    }

    /// Edits a single gain.
    pub fn set_gain(&mut self, from: &str, to: &str, gain: f64) -> EngineResult<()> {
        self.matrix.set_gain(from, to, gain)
    }

    /// Advances the world by one tick using the configuration as it stands now.
    ///
    /// While paused only the presentation radii are refreshed.
    pub fn step(&mut self, config: &Config) {
        let params = StepParams::from_config(config);

        if params.paused {
            self.collision_pressure = CollisionPressure::default();
        } else {
            let step_start = Instant::now();

            // --- 1. Accumulate forces for every particle against the unchanged positions ---
            let forces = self.accumulate_forces(&params);

            // --- 2. Apply: damped velocity, integrate, contain ---
            for (particle, force) in self.particles.iter_mut().zip(forces) {
                integrate(particle, force, &params);
            }

            // --- 3. Separate overlapping particles ---
            self.collision_pressure = if params.collision_enabled {
                resolve_collisions(&mut self.particles, params.radius, params.view_rotation)
            } else {
                CollisionPressure::default()
            };

            self.step_count += 1;
            trace!(
                "Step {} completed in {:.2} ms ({} collisions)",
                self.step_count,
                step_start.elapsed().as_secs_f64() * 1000.0,
                self.collision_pressure.collisions
            );
        }

        // --- 4. Presentation radii ---
        self.update_radii(&params);
    }

    /// Sums the pull of every other particle on each particle. Reads positions only.
    fn accumulate_forces(&self, params: &StepParams) -> Vec<Vector3> {
        let particles = &self.particles;
        let groups = &self.groups;
        let matrix = &self.matrix;
        let max_distance = params.max_interaction_distance;

        particles
            .par_iter()
            .map(|p| {
                let mut force = Vector3::ZERO;
                for (other_group, group) in groups.iter().enumerate() {
                    let gain = matrix.gain_at(p.group, other_group);
                    for &q_id in &group.particles {
                        if q_id == p.id {
                            continue;
                        }
                        let d = particles[q_id].position - p.position;
                        let dist = d.magnitude();
                        if dist > 0.0 && dist <= max_distance {
                            force += d.scale(gain / dist);
                        }
                    }
                }
                force
            })
            .collect()
    }

    fn update_radii(&mut self, params: &StepParams) {
        if !params.faked_depth_enabled {
            for particle in &mut self.particles {
                particle.radius = BASE_PARTICLE_RADIUS;
            }
            return;
        }
        for particle in &mut self.particles {
            particle.radius = faked_depth_radius(particle.position, params.radius, params.view_rotation);
        }
    }

    /// Removes every particle, group and gain.
    pub fn reset(&mut self) {
        self.particles.clear();
        self.groups.clear();
        self.matrix.clear();
        self.collision_pressure = CollisionPressure::default();
        self.step_count = 0;
        debug!("World reset.");
    }

    /// Swaps in a complete new state. Callers build and validate all three parts first.
    pub(crate) fn replace_state(&mut self, particles: Vec<Particle>, groups: Vec<Group>, matrix: InteractionMatrix) {
        self.particles = particles;
        self.groups = groups;
        self.matrix = matrix;
        self.collision_pressure = CollisionPressure::default();
        self.step_count = 0;
    }

    /// Verifies the group partition and matrix coverage.
    pub fn check_invariants(&self) -> EngineResult<()> {
        check_state(&self.particles, &self.groups, &self.matrix)
    }

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    pub fn groups(&self) -> &[Group] {
        &self.groups
    }

    pub fn matrix(&self) -> &InteractionMatrix {
        &self.matrix
    }

    pub fn particle_count(&self) -> usize {
        self.particles.len()
    }

    pub fn group_color(&self, particle: &Particle) -> &str {
        &self.groups[particle.group].color
    }

    /// Number of unpaused steps run since the world was last reset or restored.
    pub fn step_count(&self) -> u64 {
        self.step_count
    }

    /// Signal from the most recent collision pass.
    pub fn collision_pressure(&self) -> CollisionPressure {
        self.collision_pressure
    }
}

/// Velocity blend, optional speed limit, position update and soft containment for one particle.
fn integrate(particle: &mut Particle, force: Vector3, params: &StepParams) {
    let mut velocity = (particle.velocity + force).scale(params.damping);
    if let Some(limit) = params.max_velocity {
        let speed = velocity.magnitude();
        if speed > limit {
            velocity = velocity.scale(limit / speed);
        }
    }
    particle.velocity = velocity;
    particle.position += velocity;

    if particle.position.magnitude() > params.radius {
        particle.position = particle.position.lerp(Vector3::ZERO, params.push_back_force);
    }
}

/// Radius that grows as the particle comes toward the viewer: `clamp(((z + R) / R) * 4 + 4, 4, 12) / 2`.
pub fn faked_depth_radius(position: Vector3, radius: f64, view_rotation: Vector3) -> f64 {
    let view = position.rotate(view_rotation);
    clamp(((view.z + radius) / radius) * 4.0 + 4.0, 4.0, 12.0) / 2.0
}

/// Uniform sample inside a solid sphere via inverse CDF on the radius.
fn random_point_in_sphere<R: Rng>(radius: f64, rng: &mut R) -> Vector3 {
    let theta = TAU * rng.random::<f64>();
    let phi = (2.0 * rng.random::<f64>() - 1.0).acos();
    let r = radius * rng.random::<f64>().cbrt();
    Vector3::new(r * phi.sin() * theta.cos(), r * phi.sin() * theta.sin(), r * phi.cos())
}

pub(crate) fn check_state(particles: &[Particle], groups: &[Group], matrix: &InteractionMatrix) -> EngineResult<()> {
    let mut seen = vec![false; particles.len()];
    for (group_idx, group) in groups.iter().enumerate() {
        for &id in &group.particles {
            let Some(particle) = particles.get(id) else {
                return Err(EngineError::InvariantViolation(format!(
                    "group '{}' references missing particle {}",
                    group.color, id
                )));
            };
            if seen[id] {
                return Err(EngineError::InvariantViolation(format!("particle {} belongs to two groups", id)));
            }
            seen[id] = true;
            if particle.id != id || particle.group != group_idx {
                return Err(EngineError::InvariantViolation(format!(
                    "particle {} is indexed inconsistently by group '{}'",
                    id, group.color
                )));
            }
        }
    }
    if let Some(orphan) = seen.iter().position(|s| !s) {
        return Err(EngineError::InvariantViolation(format!("particle {} belongs to no group", orphan)));
    }

    let mut colors = HashSet::new();
    for group in groups {
        if !colors.insert(group.color.as_str()) {
            return Err(EngineError::InvariantViolation(format!("duplicate group color '{}'", group.color)));
        }
    }
    let aligned =
        matrix.len() == groups.len() && matrix.colors().iter().zip(groups).all(|(c, g)| *c == g.color);
    if !aligned {
        return Err(EngineError::InvariantViolation(
            "interaction matrix does not cover exactly the active groups".to_string(),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn quiet_config() -> Config {
        Config {
            collision_enabled: false,
            faked_depth_enabled: false,
            ..Config::default()
        }
    }

    /// World with one particle per entry of `placement`, each group given explicit positions.
    fn world_with(placement: &[(&str, Vec<Vector3>)], config: &Config) -> SimulationWorld {
        let mut world = SimulationWorld::with_seed(1);
        for (color, positions) in placement {
            world.add_group(positions.len(), color, config).unwrap();
        }
        world.randomize_interactions(config).unwrap();
        for (color, positions) in placement {
            let ids = world.groups.iter().find(|g| g.color == *color).unwrap().particles.clone();
            for (id, pos) in ids.into_iter().zip(positions) {
                world.particles[id].position = *pos;
            }
        }
        world
    }

    fn zero_gains(world: &mut SimulationWorld) {
        let colors: Vec<String> = world.matrix.colors().to_vec();
        for a in &colors {
            for b in &colors {
                world.set_gain(a, b, 0.0).unwrap();
            }
        }
    }

    #[test]
    fn add_group_places_particles_inside_sphere_at_rest() {
        let config = Config::default();
        let mut world = SimulationWorld::with_seed(42);
        world.add_group(200, "red", &config).unwrap();
        world.add_group(0, "blue", &config).unwrap();

        assert_eq!(world.particle_count(), 200);
        assert_eq!(world.groups().len(), 1);
        assert!(world.particles().iter().all(|p| p.position.magnitude() <= config.radius));
        assert!(world.particles().iter().all(|p| p.velocity.is_zero()));
        assert!(world.matrix().gain("red", "red").is_some());
        world.check_invariants().unwrap();

        assert!(matches!(
            world.add_group(3, "red", &config),
            Err(EngineError::InvariantViolation(_))
        ));
    }

    #[test]
    fn new_group_gets_full_matrix_row_and_column() {
        let config = Config::default();
        let mut world = SimulationWorld::with_seed(5);
        world.add_group(2, "a", &config).unwrap();
        world.add_group(2, "b", &config).unwrap();
        for from in ["a", "b"] {
            for to in ["a", "b"] {
                let g = world.matrix().gain(from, to).unwrap();
                assert!(g >= config.min_g && g <= config.max_g);
            }
        }
        world.check_invariants().unwrap();
    }

    #[test]
    fn populate_default_uses_palette() {
        let config = Config::default();
        let mut world = SimulationWorld::with_seed(9);
        world.populate_default(3, &config).unwrap();
        assert_eq!(world.groups().len(), DEFAULT_PALETTE.len());
        assert_eq!(world.particle_count(), 3 * DEFAULT_PALETTE.len());
        assert_eq!(world.group_color(&world.particles()[4]), "#fb923c");
        world.check_invariants().unwrap();
    }

    #[test]
    fn asymmetric_gains_are_read_per_direction() {
        let config = quiet_config();
        let mut world = world_with(
            &[("a", vec![Vector3::new(0.0, 0.0, 0.0)]), ("b", vec![Vector3::new(10.0, 0.0, 0.0)])],
            &config,
        );
        zero_gains(&mut world);
        world.set_gain("a", "b", 2.0).unwrap();
        world.set_gain("b", "a", -1.0).unwrap();

        world.step(&config);
        // a is pulled toward b: v = (0 + 2 * unit(+x)) * 0.5
        assert_eq!(world.particles()[0].velocity, Vector3::new(1.0, 0.0, 0.0));
        // b is pushed away from a: v = (0 - 1 * unit(-x)) * 0.5
        assert_eq!(world.particles()[1].velocity, Vector3::new(0.5, 0.0, 0.0));
    }

    #[test]
    fn forces_use_positions_from_before_the_step() {
        let config = quiet_config();
        let mut world = world_with(
            &[("a", vec![Vector3::new(0.0, 0.0, 0.0)]), ("b", vec![Vector3::new(20.0, 0.0, 0.0)])],
            &config,
        );
        zero_gains(&mut world);
        world.set_gain("a", "b", 4.0).unwrap();
        world.set_gain("b", "a", 4.0).unwrap();

        world.step(&config);
        // Both see the initial 20-unit separation, so the motion is mirror-symmetric.
        let a = world.particles()[0];
        let b = world.particles()[1];
        assert_eq!(a.velocity, Vector3::new(2.0, 0.0, 0.0));
        assert_eq!(b.velocity, Vector3::new(-2.0, 0.0, 0.0));
        assert_eq!(a.position, Vector3::new(2.0, 0.0, 0.0));
        assert_eq!(b.position, Vector3::new(18.0, 0.0, 0.0));
    }

    #[test]
    fn later_particles_see_earlier_ones_where_they_started() {
        let config = quiet_config();
        let mut world = world_with(
            &[
                ("a", vec![Vector3::new(0.0, 0.0, 0.0)]),
                ("b", vec![Vector3::new(20.0, 0.0, 0.0)]),
                ("c", vec![Vector3::new(0.0, 10.0, 0.0)]),
            ],
            &config,
        );
        zero_gains(&mut world);
        world.set_gain("a", "b", 2.0).unwrap();
        world.set_gain("c", "a", 1.0).unwrap();

        world.step(&config);
        // a moves to (1, 0, 0) this step, but c is still pulled straight down the y axis
        // toward a's starting point; no x component may leak in.
        let [a, b, c] = [world.particles()[0], world.particles()[1], world.particles()[2]];
        assert_eq!(a.velocity, Vector3::new(1.0, 0.0, 0.0));
        assert_eq!(a.position, Vector3::new(1.0, 0.0, 0.0));
        assert_eq!(b.velocity, Vector3::ZERO);
        assert_eq!(c.velocity, Vector3::new(0.0, -0.5, 0.0));
        assert_eq!(c.position, Vector3::new(0.0, 9.5, 0.0));
    }

    #[test]
    fn pairs_beyond_cutoff_or_coincident_contribute_nothing() {
        let mut config = quiet_config();
        config.max_interaction_distance = 50.0;
        let mut world = world_with(
            &[(
                "a",
                vec![Vector3::new(0.0, 0.0, 0.0), Vector3::new(0.0, 0.0, 0.0), Vector3::new(50.5, 0.0, 0.0)],
            )],
            &config,
        );
        world.set_gain("a", "a", 1.0).unwrap();

        world.step(&config);
        for p in world.particles() {
            assert!(p.velocity.is_finite());
        }
        // Coincident pair adds nothing, the third particle is beyond the cutoff.
        assert_eq!(world.particles()[0].velocity, Vector3::ZERO);
        assert_eq!(world.particles()[1].velocity, Vector3::ZERO);
        assert_eq!(world.particles()[2].velocity, Vector3::ZERO);
    }

    #[test]
    fn pair_exactly_at_cutoff_still_interacts() {
        let mut config = quiet_config();
        config.max_interaction_distance = 10.0;
        let mut world = world_with(&[("a", vec![Vector3::new(0.0, 0.0, 0.0), Vector3::new(0.0, 10.0, 0.0)])], &config);
        world.set_gain("a", "a", 1.0).unwrap();
        world.step(&config);
        assert_eq!(world.particles()[0].velocity, Vector3::new(0.0, 0.5, 0.0));
    }

    #[test]
    fn escaped_particle_is_pulled_back_by_fraction() {
        let mut config = quiet_config();
        config.radius = 100.0;
        config.push_back_force = 0.25;
        let mut world = world_with(&[("a", vec![Vector3::new(200.0, 0.0, 0.0)])], &config);

        world.step(&config);
        let p = world.particles()[0];
        assert_eq!(p.position, Vector3::new(150.0, 0.0, 0.0));
        assert!(p.position.magnitude() < 200.0);
    }

    #[test]
    fn contained_particle_is_not_pulled() {
        let mut config = quiet_config();
        config.radius = 100.0;
        let mut world = world_with(&[("a", vec![Vector3::new(60.0, 0.0, 0.0)])], &config);
        world.step(&config);
        assert_eq!(world.particles()[0].position, Vector3::new(60.0, 0.0, 0.0));
    }

    #[test]
    fn velocity_limit_caps_speed() {
        let mut config = quiet_config();
        config.limit_velocity = true;
        config.max_velocity = 0.1;
        let mut world = world_with(
            &[("a", vec![Vector3::new(0.0, 0.0, 0.0)]), ("b", vec![Vector3::new(0.0, 0.0, 10.0)])],
            &config,
        );
        zero_gains(&mut world);
        world.set_gain("a", "b", 3.0).unwrap();
        world.step(&config);
        let v = world.particles()[0].velocity;
        assert!((v.magnitude() - 0.1).abs() < 1e-12);
        assert!(v.z > 0.0);
    }

    #[test]
    fn paused_step_leaves_motion_untouched() {
        let mut config = Config::default();
        let mut world = SimulationWorld::with_seed(11);
        world.populate_default(5, &config).unwrap();
        for _ in 0..3 {
            world.step(&config);
        }
        let before: Vec<(Vector3, Vector3)> = world.particles().iter().map(|p| (p.position, p.velocity)).collect();

        config.paused = true;
        for _ in 0..10 {
            world.step(&config);
        }
        let after: Vec<(Vector3, Vector3)> = world.particles().iter().map(|p| (p.position, p.velocity)).collect();
        assert_eq!(before, after);
        assert_eq!(world.step_count(), 3);
    }

    #[test]
    fn randomize_redraws_gains_and_stops_particles() {
        let config = Config::default();
        let mut world = SimulationWorld::with_seed(21);
        world.populate_default(4, &config).unwrap();
        for _ in 0..5 {
            world.step(&config);
        }
        let first = world.matrix().clone();
        let before: Vec<Vector3> = world.particles().iter().map(|p| p.position).collect();
        assert!(world.particles().iter().any(|p| !p.velocity.is_zero()));

        world.randomize_interactions(&config).unwrap();
        assert_ne!(&first, world.matrix());
        assert!(world.particles().iter().all(|p| p.velocity.is_zero()));
        let after: Vec<Vector3> = world.particles().iter().map(|p| p.position).collect();
        assert_eq!(before, after);
        world.check_invariants().unwrap();
    }

    #[test]
    fn randomize_rejects_inverted_range() {
        let mut config = Config::default();
        let mut world = SimulationWorld::with_seed(2);
        world.add_group(2, "a", &config).unwrap();
        config.min_g = 1.0;
        config.max_g = -1.0;
        assert!(matches!(world.randomize_interactions(&config), Err(EngineError::InvalidConfig(_))));
    }

    #[test]
    fn faked_depth_radius_tracks_view_depth() {
        let r = 240.0;
        assert_eq!(faked_depth_radius(Vector3::ZERO, r, Vector3::ZERO), 4.0);
        assert_eq!(faked_depth_radius(Vector3::new(0.0, 0.0, r), r, Vector3::ZERO), 6.0);
        assert_eq!(faked_depth_radius(Vector3::new(0.0, 0.0, -r), r, Vector3::ZERO), 2.0);
        assert_eq!(faked_depth_radius(Vector3::new(0.0, 0.0, 10.0 * r), r, Vector3::ZERO), 6.0);
    }

    #[test]
    fn radii_follow_faked_depth_toggle_even_when_paused() {
        let mut config = Config {
            paused: true,
            view_rotation: Vector3::ZERO,
            ..Config::default()
        };
        let mut world = world_with(&[("a", vec![Vector3::new(0.0, 0.0, 240.0)])], &config);
        world.step(&config);
        assert_eq!(world.particles()[0].radius, 6.0);
        config.faked_depth_enabled = false;
        world.step(&config);
        assert_eq!(world.particles()[0].radius, BASE_PARTICLE_RADIUS);
    }

    #[test]
    fn collision_pass_runs_only_when_enabled() {
        let mut config = quiet_config();
        let mut world = world_with(&[("a", vec![Vector3::new(0.0, 0.0, 0.0), Vector3::new(4.0, 0.0, 0.0)])], &config);
        world.set_gain("a", "a", 0.0).unwrap();

        world.step(&config);
        assert_eq!(world.collision_pressure().collisions, 0);
        assert_eq!(world.particles()[1].position, Vector3::new(4.0, 0.0, 0.0));

        config.collision_enabled = true;
        world.step(&config);
        // overlap = 4 + 4 - 4 = 4, one unit each
        assert_eq!(world.collision_pressure().collisions, 1);
        assert_eq!(world.particles()[0].position, Vector3::new(-1.0, 0.0, 0.0));
        assert_eq!(world.particles()[1].position, Vector3::new(5.0, 0.0, 0.0));
    }

    #[test]
    fn reset_empties_world() {
        let config = Config::default();
        let mut world = SimulationWorld::with_seed(4);
        world.populate_default(2, &config).unwrap();
        world.step(&config);
        assert_eq!(world.step_count(), 1);
        world.reset();
        assert_eq!(world.step_count(), 0);
        assert_eq!(world.particle_count(), 0);
        assert!(world.groups().is_empty());
        assert!(world.matrix().is_empty());
        world.check_invariants().unwrap();
        world.step(&config);
    }

    #[test]
    fn check_state_detects_broken_partition() {
        let mut matrix = InteractionMatrix::new();
        matrix.insert_color("a", || 0.0).unwrap();
        let particles = vec![Particle::new(0, 0, Vector3::ZERO), Particle::new(1, 0, Vector3::ZERO)];

        let orphan = vec![Group { color: "a".into(), particles: vec![0] }];
        assert!(check_state(&particles, &orphan, &matrix).is_err());

        let doubled = vec![Group { color: "a".into(), particles: vec![0, 1, 1] }];
        assert!(check_state(&particles, &doubled, &matrix).is_err());

        let ok = vec![Group { color: "a".into(), particles: vec![0, 1] }];
        assert!(check_state(&particles, &ok, &matrix).is_ok());
        assert!(check_state(&particles, &ok, &InteractionMatrix::new()).is_err());
    }
}
