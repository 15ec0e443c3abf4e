//! Frame clock.
//!
//! Hosts call [`update_world_time`] once per frame before running
//! [`messaging_schedule`](crate::setup::messaging_schedule), so delayed
//! destroys and pickup sounds count down in scaled world time.
use bevy_ecs::prelude::*;

use crate::resources::worldtime::WorldTime;

/// Advance [`WorldTime`] by the unscaled frame delta `dt` (seconds).
///
/// The stored `delta` is `dt * time_scale`. A missing `WorldTime` is created
/// with defaults.
pub fn update_world_time(world: &mut World, dt: f32) {
    let mut clock = world.get_resource_or_insert_with(WorldTime::default);
    let scaled = dt * clock.time_scale;
    clock.elapsed += scaled;
    clock.delta = scaled;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn delta_is_scaled() {
        let mut world = World::new();
        world.insert_resource(WorldTime::default().with_time_scale(0.5));
        update_world_time(&mut world, 0.2);
        update_world_time(&mut world, 0.2);
        let wt = world.resource::<WorldTime>();
        assert!((wt.delta - 0.1).abs() < 1e-6);
        assert!((wt.elapsed - 0.2).abs() < 1e-6);
    }
}
