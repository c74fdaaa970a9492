//! Environment configuration
//!
//! Every tunable of the simulation lives in [`SimConfig`], fixed for the
//! lifetime of an environment. Configs deserialize from partial JSON, falling
//! back to the defaults in [`crate::consts`] for missing fields.

use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::error::{Result, SimError};

/// What `reset()` does with obstacles still on screen
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ResetPolicy {
    /// Drop all obstacles and restart the spawn countdown, so a reset world
    /// is indistinguishable from a freshly constructed one (apart from RNG).
    #[default]
    ClearObstacles,
    /// Keep obstacles and the spawn countdown running across resets.
    KeepObstacles,
}

impl ResetPolicy {
    pub fn as_str(&self) -> &'static str {
        match self {
            ResetPolicy::ClearObstacles => "clear",
            ResetPolicy::KeepObstacles => "keep",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "clear" | "clear_obstacles" => Some(ResetPolicy::ClearObstacles),
            "keep" | "keep_obstacles" => Some(ResetPolicy::KeepObstacles),
            _ => None,
        }
    }
}

/// Immutable simulation parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    /// World width in pixels
    pub width: f32,
    /// World height in pixels (y grows downward)
    pub height: f32,
    /// Added to the body's velocity every tick
    pub gravity: f32,
    /// Velocity set by a flap (negative = upward)
    pub flap_strength: f32,
    /// Leftward obstacle speed, pixels per tick (must be positive)
    pub obstacle_speed: f32,
    /// Idle ticks between two obstacle spawns
    pub spawn_interval: u32,
    /// Ticks a flap blocks further flaps
    pub flap_cooldown_ticks: u32,
    /// Vertical extent of every obstacle's gap
    pub gap_size: f32,
    /// Horizontal extent of every obstacle
    pub obstacle_width: f32,
    /// Side of the body's square
    pub body_size: f32,
    /// Score added per surviving tick
    pub score_increment: u64,
    /// Episode ends (successfully) once the score exceeds this
    pub max_score: u64,
    /// Obstacle handling on reset
    pub reset_policy: ResetPolicy,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            width: WORLD_WIDTH,
            height: WORLD_HEIGHT,
            gravity: GRAVITY,
            flap_strength: FLAP_STRENGTH,
            obstacle_speed: OBSTACLE_SPEED,
            spawn_interval: SPAWN_INTERVAL,
            flap_cooldown_ticks: FLAP_COOLDOWN_TICKS,
            gap_size: GAP_SIZE,
            obstacle_width: OBSTACLE_WIDTH,
            body_size: BODY_SIZE,
            score_increment: SCORE_INCREMENT,
            max_score: MAX_SCORE,
            reset_policy: ResetPolicy::default(),
        }
    }
}

impl SimConfig {
    /// Default config with a different world size
    pub fn with_size(width: f32, height: f32) -> Self {
        Self {
            width,
            height,
            ..Self::default()
        }
    }

    /// Parse a (possibly partial) JSON document and validate it
    pub fn from_json(json: &str) -> Result<Self> {
        let config: SimConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Serialize to pretty JSON
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Reject configurations the simulation cannot run
    pub fn validate(&self) -> Result<()> {
        let positive = [
            ("width", self.width),
            ("height", self.height),
            ("gap_size", self.gap_size),
            ("obstacle_width", self.obstacle_width),
            ("body_size", self.body_size),
        ];
        for (name, value) in positive {
            if !value.is_finite() || value <= 0.0 {
                return Err(SimError::InvalidConfig(format!(
                    "{name} must be finite and positive, got {value}"
                )));
            }
        }

        let finite = [
            ("gravity", self.gravity),
            ("flap_strength", self.flap_strength),
            ("obstacle_speed", self.obstacle_speed),
        ];
        for (name, value) in finite {
            if !value.is_finite() {
                return Err(SimError::InvalidConfig(format!(
                    "{name} must be finite, got {value}"
                )));
            }
        }

        if self.obstacle_speed <= 0.0 {
            return Err(SimError::InvalidConfig(format!(
                "obstacle_speed must be positive, got {}",
                self.obstacle_speed
            )));
        }

        // gap_top is drawn from [0, height - gap_size); that range must hold
        // at least one value.
        if self.gap_size >= self.height {
            return Err(SimError::InvalidConfig(format!(
                "gap_size ({}) must be smaller than height ({})",
                self.gap_size, self.height
            )));
        }

        if self.body_size >= self.height {
            return Err(SimError::InvalidConfig(format!(
                "body_size ({}) must be smaller than height ({})",
                self.body_size, self.height
            )));
        }

        Ok(())
    }

    /// Number of distinct integer gap offsets a spawn can draw from
    pub fn gap_top_choices(&self) -> u32 {
        (self.height - self.gap_size).ceil() as u32
    }

    /// Body start position for a fresh episode
    pub fn body_start(&self) -> (f32, f32) {
        ((self.width / 3.0).floor(), (self.height / 2.0).floor())
    }
}
