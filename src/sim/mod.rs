//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - One fixed tick per `step`, no wall-clock time
//! - Seeded RNG only
//! - Stable iteration order (obstacles in insertion order)
//! - No rendering or platform dependencies

pub mod collision;
pub mod observe;
pub mod spawner;
pub mod state;
pub mod tick;

pub use collision::{Rect, Termination, nearest_upcoming, resolve};
pub use observe::{Observation, encode};
pub use spawner::spawn_tick;
pub use state::{Body, Obstacle, RngState, World};
pub use tick::integrate;
