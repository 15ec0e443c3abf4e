//! Entity activation events.
//!
//! [`activate`](crate::utility::activate) toggles the bevy_ecs
//! [`Disabled`](bevy_ecs::entity_disabling::Disabled) marker. When an entity
//! comes back to life, an [`ActivatedEvent`] is triggered so components can
//! restore their runtime state (a recycled pickup becomes collectable again).

use bevy_ecs::prelude::*;

/// Event triggered after an entity has been re-activated.
#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub struct ActivatedEvent {
    pub entity: Entity,
}
