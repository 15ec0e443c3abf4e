//! Delayed destruction component.
//!
//! [`DestroyAfter`] counts down world time each frame. When it runs out, the
//! entity is handed to [`destroy`](crate::systems::pool::destroy), which
//! despawns it or returns it to the object pool.
//!
//! # Usage
//!
//! ```ignore
//! // Either attach it directly...
//! world.entity_mut(bullet).insert(DestroyAfter::new(5.0));
//! // ...or go through the pool-aware wrapper:
//! destroy_after(world, bullet, 5.0);
//! ```
//!
//! # Related
//!
//! - [`crate::systems::destroyafter::destroy_after_system`] – the countdown

use bevy_ecs::prelude::Component;

/// Seconds of world time left before the entity is destroyed.
///
/// The countdown uses [`WorldTime::delta`](crate::resources::worldtime::WorldTime),
/// so slow motion stretches it.
#[derive(Component, Debug, Clone, Copy, PartialEq)]
pub struct DestroyAfter {
    pub remaining: f32,
}

impl DestroyAfter {
    pub fn new(seconds: f32) -> Self {
        DestroyAfter { remaining: seconds }
    }
}
