//! Fixed-step simulation tick
//!
//! Advances the world by exactly one tick. Ordering inside a tick is part of
//! the contract: spawn, scroll and prune obstacles, resolve the flap, move the
//! body with the pre-tick velocity, then apply gravity, then score.

use rand::Rng;

use super::collision::{Termination, resolve};
use super::spawner::spawn_tick;
use super::state::World;
use crate::config::SimConfig;
use crate::policy::Action;

/// Advance the world by one tick and report how (if) the episode ended
pub fn tick<R: Rng>(
    world: &mut World,
    config: &SimConfig,
    action: Action,
    rng: &mut R,
) -> Option<Termination> {
    world.ticks += 1;
    spawn_tick(world, config, rng);
    integrate(world, config, action);
    resolve(world, config)
}

/// Physics for one tick (everything except spawning and collision)
pub fn integrate(world: &mut World, config: &SimConfig, action: Action) {
    // Scroll, then prune in the same tick
    for obstacle in &mut world.obstacles {
        obstacle.x -= config.obstacle_speed;
    }
    world.obstacles.retain(|o| !o.is_offscreen());

    let body = &mut world.body;
    if action.is_flap() && body.flap_cooldown == 0 {
        body.velocity = config.flap_strength;
        body.flap_cooldown = config.flap_cooldown_ticks;
    } else if body.flap_cooldown > 0 {
        body.flap_cooldown -= 1;
    }

    // Position uses the velocity from before this tick's gravity
    body.y += body.velocity;
    body.velocity += config.gravity;

    world.score += config.score_increment;
}
