//! Trigger volume events.
//!
//! Collision detection is not part of this crate: whatever detects overlaps
//! (a physics step, a test, the demo scene) triggers [`TriggerEnterEvent`] and
//! [`TriggerExitEvent`] with the trigger entity and the collider entity that
//! entered or left it. Pickups observe these events (see
//! [`crate::systems::itempickup`]).

use bevy_ecs::prelude::*;

/// A collider entered a trigger volume.
#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub struct TriggerEnterEvent {
    /// The entity owning the trigger (e.g. a pickup).
    pub trigger: Entity,
    /// The collider that entered.
    pub collider: Entity,
}

/// A collider left a trigger volume.
#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub struct TriggerExitEvent {
    pub trigger: Entity,
    pub collider: Entity,
}
