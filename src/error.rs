use thiserror::Error;

/// Errors surfaced by the simulation engine.
#[derive(Error, Debug)]
pub enum EngineError {
    /// A broken internal invariant (missing matrix entry, particle in no group or in two).
    /// Treat as a programming error.
    #[error("Invariant violation: {0}")]
    InvariantViolation(String),
    /// A decoded snapshot payload was malformed or corrupted. The live world is untouched.
    #[error("Invalid snapshot data: {0}")]
    InvalidSnapshotData(String),
    #[error("Cannot capture a snapshot while the simulation is paused")]
    CaptureOnPaused,
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

pub type EngineResult<T> = std::result::Result<T, EngineError>;
