//! Cooldown-driven obstacle spawning

use rand::Rng;

use super::state::{Obstacle, World};
use crate::config::SimConfig;

/// Run the spawner for one tick
///
/// Appends an obstacle at the right edge when the countdown has run out and
/// restarts it, otherwise counts down. Returns the spawned obstacle, if any.
pub fn spawn_tick<R: Rng>(
    world: &mut World,
    config: &SimConfig,
    rng: &mut R,
) -> Option<Obstacle> {
    if world.spawn_cooldown > 0 {
        world.spawn_cooldown -= 1;
        return None;
    }

    let gap_top = rng.random_range(0..config.gap_top_choices()) as f32;
    let obstacle = Obstacle::new(config.width, gap_top, config.gap_size, config.obstacle_width);
    world.obstacles.push(obstacle);
    world.spawn_cooldown = i64::from(config.spawn_interval);

    log::trace!(
        "tick {}: spawned obstacle gap_top={} ({} live)",
        world.ticks,
        gap_top,
        world.obstacles.len()
    );

    Some(obstacle)
}
