//! Observation encoding for controllers
//!
//! Projects the world onto two normalized distances to the nearest upcoming
//! obstacle's gap. Encoding never mutates state.

use glam::Vec2;

use super::collision::nearest_upcoming;
use super::state::World;
use crate::config::SimConfig;
use crate::error::{Result, SimError};

/// Normalized controller input
///
/// Both components are in `[0, 1]` while the body is inside the world; `0.5`
/// means "aligned" on that axis.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Observation {
    /// Horizontal distance from the body's right edge to the obstacle's left edge
    pub dx: f32,
    /// Vertical distance from the body's centre to the gap centre (positive = gap below)
    pub dy: f32,
}

impl Observation {
    /// Raw signed distances in pixels, before normalization
    pub fn raw(world: &World, config: &SimConfig) -> Vec2 {
        let body = &world.body;
        match nearest_upcoming(&world.obstacles, body) {
            Some(obstacle) => Vec2::new(
                obstacle.x - body.right(),
                obstacle.gap_center() - body.center_y(),
            ),
            None => Vec2::new(config.width, config.height / 2.0),
        }
    }

    pub fn in_unit_range(&self) -> bool {
        (0.0..=1.0).contains(&self.dx) && (0.0..=1.0).contains(&self.dy)
    }
}

/// Map a signed distance in `[-dimension, dimension]` onto `[0, 1]`
#[inline]
fn normalize(value: f32, dimension: f32) -> f32 {
    (value + dimension) / (2.0 * dimension)
}

/// Encode the current world
pub fn encode(world: &World, config: &SimConfig) -> Observation {
    let raw = Observation::raw(world, config);
    Observation {
        dx: normalize(raw.x, config.width),
        dy: normalize(raw.y, config.height),
    }
}

/// Encode, failing if a component falls outside `[0, 1]`
pub fn encode_checked(world: &World, config: &SimConfig) -> Result<Observation> {
    let observation = encode(world, config);
    if observation.in_unit_range() {
        Ok(observation)
    } else {
        Err(SimError::ObservationOutOfRange {
            dx: observation.dx,
            dy: observation.dy,
        })
    }
}
