use bevy_ecs::prelude::Component;

/// Marks an entity spawned through the object pool, with the prefab key it
/// was built from.
///
/// Destroying a pooled entity deactivates it and puts it back on the free
/// list for its key instead of despawning it.
#[derive(Component, Clone, Debug, PartialEq, Eq)]
pub struct Pooled(pub String);
