//! Collision resolution and termination
//!
//! Termination is never stored: it is recomputed from the current world on
//! every query, so these functions can be tested without stepping.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::state::{Body, Obstacle, World};
use crate::config::SimConfig;

/// Why an episode ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Termination {
    /// Score passed the ceiling: a successful run
    ScoreCap,
    /// Body left the vertical bounds of the world
    OutOfBounds,
    /// Body overlapped a bar of the nearest obstacle
    HitObstacle,
}

impl Termination {
    /// True when the episode ended by completing, not by crashing
    pub fn is_success(&self) -> bool {
        matches!(self, Termination::ScoreCap)
    }
}

/// Axis-aligned rectangle with inclusive edges
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub min: Vec2,
    pub max: Vec2,
}

impl Rect {
    pub fn new(min: Vec2, max: Vec2) -> Self {
        Self { min, max }
    }

    pub fn from_body(body: &Body) -> Self {
        Self::new(
            Vec2::new(body.x(), body.y),
            Vec2::new(body.right(), body.bottom()),
        )
    }

    /// Strict separation on either axis means no overlap; shared edges overlap
    pub fn overlaps(&self, other: &Rect) -> bool {
        let separated_x = self.min.x > other.max.x || self.max.x < other.min.x;
        let separated_y = self.min.y > other.max.y || self.max.y < other.min.y;
        !(separated_x || separated_y)
    }
}

/// The two solid bars of an obstacle: above and below the gap
pub fn obstacle_bars(obstacle: &Obstacle, world_height: f32) -> (Rect, Rect) {
    let top = Rect::new(
        Vec2::new(obstacle.x, 0.0),
        Vec2::new(obstacle.right(), obstacle.gap_top),
    );
    let bottom = Rect::new(
        Vec2::new(obstacle.x, obstacle.gap_bottom()),
        Vec2::new(obstacle.right(), world_height),
    );
    (top, bottom)
}

/// Nearest obstacle whose right edge has not yet passed the body's left edge
///
/// Ties on `x` go to the earliest inserted obstacle.
pub fn nearest_upcoming<'a>(obstacles: &'a [Obstacle], body: &Body) -> Option<&'a Obstacle> {
    obstacles
        .iter()
        .filter(|o| o.right() >= body.x())
        .min_by(|a, b| a.x.partial_cmp(&b.x).unwrap_or(std::cmp::Ordering::Equal))
}

/// Body outside `[0, height - size)`
#[inline]
pub fn out_of_bounds(body: &Body, config: &SimConfig) -> bool {
    body.y < 0.0 || body.y >= config.height - body.size()
}

/// Collision check against world bounds and the nearest upcoming obstacle
///
/// The top bar is tested first and short-circuits; only then the bottom bar.
pub fn collision(world: &World, config: &SimConfig) -> Option<Termination> {
    let body = &world.body;
    if out_of_bounds(body, config) {
        return Some(Termination::OutOfBounds);
    }

    let obstacle = nearest_upcoming(&world.obstacles, body)?;
    let body_rect = Rect::from_body(body);
    let (top, bottom) = obstacle_bars(obstacle, config.height);

    if body_rect.overlaps(&top) {
        return Some(Termination::HitObstacle);
    }
    if body_rect.overlaps(&bottom) {
        return Some(Termination::HitObstacle);
    }
    None
}

/// Full termination check: score ceiling first, then collisions
pub fn resolve(world: &World, config: &SimConfig) -> Option<Termination> {
    if world.score > config.max_score {
        return Some(Termination::ScoreCap);
    }
    collision(world, config)
}
