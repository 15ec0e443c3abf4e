//! Delayed destruction system.
//!
//! Each frame [`destroy_after_system`] subtracts `WorldTime::delta` from every
//! [`DestroyAfter`] and destroys the entities whose time has run out. The
//! component is removed first, so a pooled entity comes back without a stale
//! countdown.

use bevy_ecs::prelude::*;

use crate::components::destroyafter::DestroyAfter;
use crate::resources::worldtime::WorldTime;
use crate::systems::pool::destroy;

/// Count down [`DestroyAfter`] and destroy expired entities.
pub fn destroy_after_system(world: &mut World) {
    let dt = world
        .get_resource::<WorldTime>()
        .map(|t| t.delta)
        .unwrap_or_default();

    let mut expired = Vec::new();
    let mut query = world.query::<(Entity, &mut DestroyAfter)>();
    for (entity, mut countdown) in query.iter_mut(world) {
        countdown.remaining -= dt;
        if countdown.remaining <= 0.0 {
            expired.push(entity);
        }
    }

    for entity in expired {
        world.entity_mut(entity).remove::<DestroyAfter>();
        destroy(world, entity);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::systems::time::update_world_time;

    #[test]
    fn entity_is_despawned_once_time_runs_out() {
        let mut world = World::new();
        world.insert_resource(WorldTime::default());
        let entity = world.spawn(DestroyAfter::new(0.25)).id();

        update_world_time(&mut world, 0.2);
        destroy_after_system(&mut world);
        assert!(world.get_entity(entity).is_ok());

        update_world_time(&mut world, 0.2);
        destroy_after_system(&mut world);
        assert!(world.get_entity(entity).is_err());
    }

    #[test]
    fn slow_motion_stretches_the_countdown() {
        let mut world = World::new();
        world.insert_resource(WorldTime::default().with_time_scale(0.5));
        let entity = world.spawn(DestroyAfter::new(0.15)).id();

        update_world_time(&mut world, 0.2);
        destroy_after_system(&mut world);
        assert!(world.get_entity(entity).is_ok());
        assert!((world.get::<DestroyAfter>(entity).unwrap().remaining - 0.05).abs() < 1e-6);
    }
}
