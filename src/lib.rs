//! Particle life engine: colored groups of particles pulling and pushing on each other
//! according to a random interaction matrix, inside a soft containment sphere.

pub mod collision;
pub mod error;
pub mod history;
pub mod matrix;
pub mod particle;
pub mod simulation;

pub use collision::CollisionPressure;
pub use error::{EngineError, EngineResult};
pub use history::SnapshotStore;
pub use matrix::InteractionMatrix;
pub use particle::{Group, Particle};
pub use particle_life_common::{Config, Snapshot, StepParams, Vector3};
pub use simulation::{SimulationWorld, DEFAULT_GROUP_SIZE, DEFAULT_PALETTE};
