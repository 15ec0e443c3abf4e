//! Marker for entities created by the messaging layer.
//!
//! Handler systems, global listeners and the cache/pickup observers are all
//! entities in bevy_ecs. They carry [`MessagingOwned`] so
//! [`teardown_messaging`](crate::setup::teardown_messaging) can find and
//! despawn them, and so scene cleanup code can skip them.

use bevy_ecs::prelude::Component;

/// Tag component for entities owned by the messaging layer.
#[derive(Component, Clone, Copy, Debug)]
pub struct MessagingOwned;
