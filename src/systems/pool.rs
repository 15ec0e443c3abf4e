//! Pool-aware instantiate and destroy.
//!
//! [`instantiate`], [`destroy`] and [`destroy_after`] are what gameplay code
//! calls. When a [`PoolManager`] is present and enabled they go through the
//! global events [`POOL_INSTANTIATE`] and [`POOL_DESTROY`], whose listeners
//! ([`pool_instantiate`], [`pool_destroy`]) reuse and recycle entities.
//! Otherwise they spawn and despawn directly.

use bevy_ecs::prelude::*;
use log::{debug, trace};

use crate::components::destroyafter::DestroyAfter;
use crate::components::pooled::Pooled;
use crate::error::DispatchError;
use crate::events::message::DispatchResult;
use crate::resources::pool::{PoolManager, Prefab};
use crate::systems::globalevents::{register_global, send_global, send_global_return};
use crate::utility::activate;

/// Global event answered by the pool with a ready entity.
pub const POOL_INSTANTIATE: &str = "PoolManager Instantiate";
/// Global event carrying `(entity, delay)` to the pool.
pub const POOL_DESTROY: &str = "PoolManager Destroy";

/// Spawn an entity from `prefab`, reusing a pooled one when possible.
pub fn instantiate(world: &mut World, prefab: &Prefab) -> Entity {
    if pool_enabled(world) {
        match send_global_return::<Prefab, Entity>(world, POOL_INSTANTIATE, prefab.clone()) {
            DispatchResult::Handled { value, .. } => return value,
            DispatchResult::Unhandled => {
                debug!("pool is enabled but nobody answers '{}'", POOL_INSTANTIATE)
            }
        }
    }
    spawn_fresh(world, prefab, None)
}

/// Destroy `entity` now.
pub fn destroy(world: &mut World, entity: Entity) {
    destroy_after(world, entity, 0.0);
}

/// Destroy `entity` once `seconds` of world time have passed.
///
/// Pooled entities are deactivated and kept for reuse; all others are
/// despawned. A missing entity is ignored.
pub fn destroy_after(world: &mut World, entity: Entity, seconds: f32) {
    if world.get_entity(entity).is_err() {
        debug!("destroy({:?}) on a missing entity", entity);
        return;
    }
    if pool_enabled(world) && send_global(world, POOL_DESTROY, (entity, seconds)) > 0 {
        return;
    }
    release_or_despawn(world, entity, seconds, false);
}

/// Listener for [`POOL_INSTANTIATE`].
pub fn pool_instantiate(In(prefab): In<Prefab>, world: &mut World) -> Entity {
    loop {
        let next = world
            .get_resource_mut::<PoolManager>()
            .and_then(|mut pool| pool.take(&prefab.key));
        let Some(entity) = next else {
            break;
        };
        if world.get_entity(entity).is_err() {
            continue;
        }
        activate(world, entity, true);
        if let Some(mut pool) = world.get_resource_mut::<PoolManager>() {
            pool.record_reuse();
        }
        trace!("reused pooled '{}' {:?}", prefab.key, entity);
        return entity;
    }
    let entity = spawn_fresh(world, &prefab, Some(Pooled(prefab.key.clone())));
    if let Some(mut pool) = world.get_resource_mut::<PoolManager>() {
        pool.record_spawn();
    }
    entity
}

/// Listener for [`POOL_DESTROY`].
pub fn pool_destroy(In((entity, delay)): In<(Entity, f32)>, world: &mut World) {
    if world.get_entity(entity).is_err() {
        debug!("pool destroy on a missing entity {:?}", entity);
        return;
    }
    release_or_despawn(world, entity, delay, true);
}

/// Register the pool listeners on the global events.
pub fn register_pool_listeners(world: &mut World) -> Result<(), DispatchError> {
    register_global(world, POOL_INSTANTIATE, pool_instantiate)?;
    register_global(world, POOL_DESTROY, pool_destroy)?;
    Ok(())
}

fn pool_enabled(world: &World) -> bool {
    world
        .get_resource::<PoolManager>()
        .is_some_and(|pool| pool.enabled)
}

fn spawn_fresh(world: &mut World, prefab: &Prefab, pooled: Option<Pooled>) -> Entity {
    let mut entity = world.spawn_empty();
    if let Some(pooled) = pooled {
        entity.insert(pooled);
    }
    (prefab.build)(&mut entity);
    entity.id()
}

fn release_or_despawn(world: &mut World, entity: Entity, delay: f32, pooling: bool) {
    if delay > 0.0 {
        world.entity_mut(entity).insert(DestroyAfter::new(delay));
        return;
    }
    let key = world.get::<Pooled>(entity).map(|p| p.0.clone());
    match key {
        Some(key) if pooling => {
            // Already inactive entities still go on the free list.
            activate(world, entity, false);
            if let Some(mut pool) = world.get_resource_mut::<PoolManager>() {
                pool.release(&key, entity);
            }
            trace!("returned {:?} to pool '{}'", entity, key);
        }
        _ => {
            world.despawn(entity);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::group::Group;

    fn bullet(entity: &mut EntityWorldMut) {
        entity.insert(Group::new("bullet"));
    }

    #[test]
    fn without_pool_entities_are_spawned_and_despawned() {
        let mut world = World::new();
        let prefab = Prefab::new("bullet", bullet);
        let entity = instantiate(&mut world, &prefab);
        assert_eq!(world.get::<Group>(entity).map(Group::name), Some("bullet"));
        assert!(world.get::<Pooled>(entity).is_none());

        destroy(&mut world, entity);
        assert!(world.get_entity(entity).is_err());
    }

    #[test]
    fn delayed_destroy_adds_countdown() {
        let mut world = World::new();
        let entity = world.spawn_empty().id();
        destroy_after(&mut world, entity, 2.0);
        assert_eq!(world.get::<DestroyAfter>(entity), Some(&DestroyAfter::new(2.0)));
    }

    #[test]
    fn destroying_a_missing_entity_is_a_no_op() {
        let mut world = World::new();
        let entity = world.spawn_empty().id();
        world.despawn(entity);
        destroy(&mut world, entity);
    }

    #[test]
    fn inactive_pooled_entity_is_still_released() {
        let mut world = World::new();
        world.insert_resource(PoolManager::new(true));
        register_pool_listeners(&mut world).unwrap();
        let prefab = Prefab::new("bullet", bullet);

        let entity = instantiate(&mut world, &prefab);
        activate(&mut world, entity, false);
        destroy(&mut world, entity);
        assert_eq!(world.resource::<PoolManager>().free_count("bullet"), 1);

        assert_eq!(instantiate(&mut world, &prefab), entity);
        assert!(crate::utility::is_active(&world, entity));
    }

    #[test]
    fn disabled_pool_without_listeners_falls_back_to_spawn() {
        let mut world = World::new();
        world.insert_resource(PoolManager::new(false));
        let entity = instantiate(&mut world, &Prefab::new("bullet", bullet));
        assert!(world.get::<Pooled>(entity).is_none());
    }
}
