//! Object pool resource.
//!
//! [`PoolManager`] keeps deactivated entities per prefab key so they can be
//! handed out again instead of spawning new ones. It is reached through the
//! global events `"PoolManager Instantiate"` and `"PoolManager Destroy"`
//! (see [`crate::systems::pool`]), so callers never hold it directly.

use std::fmt;

use bevy_ecs::prelude::*;
use rustc_hash::FxHashMap;

/// What to spawn: a pool key plus a function that fills in a fresh entity.
#[derive(Clone)]
pub struct Prefab {
    pub key: String,
    pub build: fn(&mut EntityWorldMut),
}

impl Prefab {
    pub fn new(key: impl Into<String>, build: fn(&mut EntityWorldMut)) -> Self {
        Self {
            key: key.into(),
            build,
        }
    }
}

impl fmt::Debug for Prefab {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Prefab").field("key", &self.key).finish()
    }
}

/// Free lists of pooled entities by prefab key.
#[derive(Resource, Debug, Default)]
pub struct PoolManager {
    pub enabled: bool,
    free: FxHashMap<String, Vec<Entity>>,
    spawned: usize,
    recycled: usize,
}

impl PoolManager {
    pub fn new(enabled: bool) -> Self {
        Self {
            enabled,
            ..Self::default()
        }
    }

    /// Pop a free entity for `key`, if any.
    pub(crate) fn take(&mut self, key: &str) -> Option<Entity> {
        self.free.get_mut(key).and_then(Vec::pop)
    }

    /// Return `entity` to the free list for `key`.
    pub(crate) fn release(&mut self, key: &str, entity: Entity) {
        let list = self.free.entry(key.to_string()).or_default();
        if !list.contains(&entity) {
            list.push(entity);
        }
    }

    pub(crate) fn record_spawn(&mut self) {
        self.spawned += 1;
    }

    pub(crate) fn record_reuse(&mut self) {
        self.recycled += 1;
    }

    /// Number of free entities waiting under `key`.
    pub fn free_count(&self, key: &str) -> usize {
        self.free.get(key).map_or(0, Vec::len)
    }

    /// Entities spawned fresh by the pool.
    pub fn spawned(&self) -> usize {
        self.spawned
    }

    /// Entities handed out again from a free list.
    pub fn recycled(&self) -> usize {
        self.recycled
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn free_list_is_lifo_and_deduplicated() {
        let mut world = World::new();
        let a = world.spawn_empty().id();
        let b = world.spawn_empty().id();

        let mut pool = PoolManager::new(true);
        pool.release("bullet", a);
        pool.release("bullet", b);
        pool.release("bullet", b);
        assert_eq!(pool.free_count("bullet"), 2);
        assert_eq!(pool.take("bullet"), Some(b));
        assert_eq!(pool.take("bullet"), Some(a));
        assert_eq!(pool.take("bullet"), None);
        assert_eq!(pool.take("rocket"), None);
    }
}
