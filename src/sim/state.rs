//! World state and entity types
//!
//! Plain value types. Nothing here knows about ticks or collisions; the
//! spawner, integrator and resolver are free functions over these.

use rand_pcg::Pcg32;

use crate::config::SimConfig;

/// The controlled falling square
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Body {
    /// Fixed horizontal position (left edge)
    x: f32,
    /// Vertical position (top edge, y grows downward)
    pub y: f32,
    /// Vertical speed, applied to `y` on the next tick
    pub velocity: f32,
    /// Side of the square
    size: f32,
    /// Ticks left before another flap is accepted
    pub flap_cooldown: u32,
}

impl Body {
    pub fn new(x: f32, y: f32, size: f32) -> Self {
        Self {
            x,
            y,
            velocity: 0.0,
            size,
            flap_cooldown: 0,
        }
    }

    /// Body at the episode start position for `config`
    pub fn spawn(config: &SimConfig) -> Self {
        let (x, y) = config.body_start();
        Self::new(x, y, config.body_size)
    }

    #[inline]
    pub fn x(&self) -> f32 {
        self.x
    }

    #[inline]
    pub fn size(&self) -> f32 {
        self.size
    }

    /// Right edge
    #[inline]
    pub fn right(&self) -> f32 {
        self.x + self.size
    }

    /// Bottom edge
    #[inline]
    pub fn bottom(&self) -> f32 {
        self.y + self.size
    }

    /// Vertical centre
    #[inline]
    pub fn center_y(&self) -> f32 {
        self.y + self.size / 2.0
    }
}

/// A vertical barrier with one passable gap
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Obstacle {
    /// Left edge
    pub x: f32,
    /// Top of the gap
    pub gap_top: f32,
    /// Vertical extent of the gap
    pub gap_size: f32,
    /// Horizontal extent
    pub width: f32,
}

impl Obstacle {
    pub fn new(x: f32, gap_top: f32, gap_size: f32, width: f32) -> Self {
        Self {
            x,
            gap_top,
            gap_size,
            width,
        }
    }

    /// Right edge
    #[inline]
    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    /// Bottom of the gap
    #[inline]
    pub fn gap_bottom(&self) -> f32 {
        self.gap_top + self.gap_size
    }

    /// Vertical centre of the gap
    #[inline]
    pub fn gap_center(&self) -> f32 {
        self.gap_top + self.gap_size / 2.0
    }

    /// Fully scrolled past the left edge
    #[inline]
    pub fn is_offscreen(&self) -> bool {
        self.x < -self.width
    }
}

/// Seed + stream pair for an isolated PCG sequence
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RngState {
    pub seed: u64,
    pub stream: u64,
}

impl RngState {
    pub fn new(seed: u64) -> Self {
        Self { seed, stream: 0 }
    }

    pub fn with_stream(seed: u64, stream: u64) -> Self {
        Self { seed, stream }
    }

    /// Distinct streams never share a sequence, even with equal seeds
    pub fn to_rng(&self) -> Pcg32 {
        Pcg32::new(self.seed, self.stream)
    }
}

/// Complete simulation state apart from the RNG
#[derive(Debug, Clone, PartialEq)]
pub struct World {
    /// The controlled body
    pub body: Body,
    /// Live obstacles in insertion order (ascending x at spawn time)
    pub obstacles: Vec<Obstacle>,
    /// Score accumulated this episode
    pub score: u64,
    /// Ticks until the next spawn; spawns when <= 0
    pub spawn_cooldown: i64,
    /// Ticks simulated since construction or the last clearing reset
    pub ticks: u64,
}

impl World {
    /// Fresh world: body at its start position, no obstacles, spawn due now
    pub fn new(config: &SimConfig) -> Self {
        Self {
            body: Body::spawn(config),
            obstacles: Vec::new(),
            score: 0,
            spawn_cooldown: 0,
            ticks: 0,
        }
    }

    /// Start a new episode on this world
    ///
    /// `clear_obstacles` also restarts the spawn countdown and tick counter.
    pub fn reset(&mut self, config: &SimConfig, clear_obstacles: bool) {
        self.score = 0;
        self.body = Body::spawn(config);
        if clear_obstacles {
            self.obstacles.clear();
            self.spawn_cooldown = 0;
            self.ticks = 0;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::Rng;

    #[test]
    fn test_body_spawns_at_start() {
        let config = SimConfig::default();
        let body = Body::spawn(&config);
        assert_eq!(body.x(), 200.0);
        assert_eq!(body.y, 300.0);
        assert_eq!(body.velocity, 0.0);
        assert_eq!(body.size(), 40.0);
        assert_eq!(body.flap_cooldown, 0);
        assert_eq!(body.right(), 240.0);
        assert_eq!(body.center_y(), 320.0);
    }

    #[test]
    fn test_obstacle_offscreen_boundary() {
        let mut obstacle = Obstacle::new(-60.0, 100.0, 160.0, 60.0);
        assert!(!obstacle.is_offscreen());
        obstacle.x = -60.5;
        assert!(obstacle.is_offscreen());
        assert_eq!(obstacle.gap_bottom(), 260.0);
        assert_eq!(obstacle.gap_center(), 180.0);
    }

    #[test]
    fn test_rng_streams_are_isolated() {
        let mut a = RngState::with_stream(7, 0).to_rng();
        let mut b = RngState::with_stream(7, 1).to_rng();
        let mut a2 = RngState::with_stream(7, 0).to_rng();

        let seq_a: Vec<u32> = (0..8).map(|_| a.random()).collect();
        let seq_b: Vec<u32> = (0..8).map(|_| b.random()).collect();
        let seq_a2: Vec<u32> = (0..8).map(|_| a2.random()).collect();

        assert_eq!(seq_a, seq_a2);
        assert_ne!(seq_a, seq_b);
    }

    #[test]
    fn test_reset_keeps_or_clears_obstacles() {
        let config = SimConfig::default();
        let mut world = World::new(&config);
        world.obstacles.push(Obstacle::new(300.0, 10.0, 160.0, 60.0));
        world.score = 42;
        world.spawn_cooldown = 17;
        world.body.y = 12.0;

        world.reset(&config, false);
        assert_eq!(world.score, 0);
        assert_eq!(world.body, Body::spawn(&config));
        assert_eq!(world.obstacles.len(), 1);
        assert_eq!(world.spawn_cooldown, 17);

        world.reset(&config, true);
        assert!(world.obstacles.is_empty());
        assert_eq!(world.spawn_cooldown, 0);
    }
}
