//! The environment controllers interact with
//!
//! Owns the world, its configuration and the spawn RNG, and exposes the
//! `reset` / `observe` / `step` contract.

use rand_pcg::Pcg32;

use crate::config::{ResetPolicy, SimConfig};
use crate::error::Result;
use crate::policy::Action;
use crate::sim::state::{Body, Obstacle, RngState, World};
use crate::sim::{Observation, Termination, observe, resolve, tick};

/// One independent simulation instance
#[derive(Debug, Clone)]
pub struct Environment {
    config: SimConfig,
    world: World,
    rng: Pcg32,
}

impl Environment {
    /// Build an environment with a seeded spawn RNG (stream 0)
    pub fn new(config: SimConfig, seed: u64) -> Result<Self> {
        Self::with_rng_state(config, RngState::new(seed))
    }

    /// Build an environment on an explicit PCG seed/stream
    pub fn with_rng_state(config: SimConfig, rng_state: RngState) -> Result<Self> {
        config.validate()?;
        let world = World::new(&config);
        Ok(Self {
            config,
            world,
            rng: rng_state.to_rng(),
        })
    }

    /// Start a new episode
    ///
    /// Score and body always reset. Obstacles, the spawn countdown and the
    /// tick counter follow the configured [`ResetPolicy`]. The RNG stream is
    /// never rewound.
    pub fn reset(&mut self) {
        let clear = self.config.reset_policy == ResetPolicy::ClearObstacles;
        self.world.reset(&self.config, clear);
    }

    /// Normalized observation of the current state (no side effects)
    pub fn observe(&self) -> Observation {
        observe::encode(&self.world, &self.config)
    }

    /// Like [`observe`](Self::observe) but fails if a component leaves `[0, 1]`
    pub fn observe_checked(&self) -> Result<Observation> {
        observe::encode_checked(&self.world, &self.config)
    }

    /// Advance one tick; returns whether the episode is still alive
    ///
    /// Accepts anything convertible to [`Action`]; integers are normalized
    /// with nonzero meaning "flap".
    pub fn step(&mut self, action: impl Into<Action>) -> bool {
        let action = action.into();
        tick::tick(&mut self.world, &self.config, action, &mut self.rng).is_none()
    }

    /// Why the current state is terminal, if it is
    pub fn termination(&self) -> Option<Termination> {
        resolve(&self.world, &self.config)
    }

    pub fn is_alive(&self) -> bool {
        self.termination().is_none()
    }

    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    pub fn world(&self) -> &World {
        &self.world
    }

    pub fn body(&self) -> &Body {
        &self.world.body
    }

    pub fn obstacles(&self) -> &[Obstacle] {
        &self.world.obstacles
    }

    pub fn score(&self) -> u64 {
        self.world.score
    }

    pub fn ticks(&self) -> u64 {
        self.world.ticks
    }

    /// Mutable world access for scripted test scenarios
    #[cfg(test)]
    pub(crate) fn world_mut(&mut self) -> &mut World {
        &mut self.world
    }
}
