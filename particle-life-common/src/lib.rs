pub mod config;
pub mod snapshot;
pub mod step_params;
pub mod vecmath;

// Re-export key types for easier use by dependent crates
pub use config::Config;
pub use snapshot::{GainTable, GroupSnapshot, ParticleSnapshot, Snapshot};
pub use step_params::{StepParams, BASE_PARTICLE_RADIUS, DAMPING};
pub use vecmath::{clamp, Vector3};
