//! Flappy Sim - a deterministic gap-flying environment for policy evaluation
//!
//! Core modules:
//! - `sim`: Deterministic simulation (entities, spawning, physics, collisions, observations)
//! - `env`: The environment facade controllers talk to (`reset`, `step`, `observe`)
//! - `config`: Immutable, serializable simulation parameters
//! - `policy`: Action normalization and the controller seam
//! - `eval`: Parallel fitness evaluation over independent environments

pub mod config;
pub mod env;
pub mod error;
pub mod eval;
pub mod policy;
pub mod sim;

pub use config::{ResetPolicy, SimConfig};
pub use env::Environment;
pub use error::{Result, SimError};
pub use eval::{
    EpisodeReport, EvalConfig, PolicyFitness, evaluate_policy, evaluate_population, run_episode,
};
pub use policy::{Action, GapFollower, Policy};
pub use sim::{Observation, Termination};

/// Default simulation constants
pub mod consts {
    /// World dimensions (pixels)
    pub const WORLD_WIDTH: f32 = 600.0;
    pub const WORLD_HEIGHT: f32 = 600.0;

    /// Velocity gained per tick (y grows downward)
    pub const GRAVITY: f32 = 0.5;
    /// Velocity set by a flap
    pub const FLAP_STRENGTH: f32 = -8.0;
    /// Ticks during which further flaps are ignored
    pub const FLAP_COOLDOWN_TICKS: u32 = 5;

    /// Obstacle defaults
    pub const OBSTACLE_SPEED: f32 = 2.0;
    pub const OBSTACLE_WIDTH: f32 = 60.0;
    pub const GAP_SIZE: f32 = 160.0;
    /// Idle ticks between two spawns
    pub const SPAWN_INTERVAL: u32 = 160;

    /// Side of the body's square
    pub const BODY_SIZE: f32 = 40.0;

    /// Scoring
    pub const SCORE_INCREMENT: u64 = 2;
    pub const MAX_SCORE: u64 = 30_000;
}
