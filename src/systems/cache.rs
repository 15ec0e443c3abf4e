//! Observers keeping the dispatch cache consistent with the hierarchy.
//!
//! The [`Dispatcher`] memoizes which ancestor answered a message. Any change
//! of parent links can make such an entry wrong, so these observers drop the
//! whole cache when:
//!
//! - a [`ChildOf`] is inserted (an entity is parented or reparented),
//! - a [`ChildOf`] is replaced or removed (reparenting, detaching, despawning
//!   a child),
//! - a [`Handlers`] component is replaced or removed.
//!
//! They are spawned by [`install_messaging`](crate::setup::install_messaging).

use bevy_ecs::hierarchy::ChildOf;
use bevy_ecs::lifecycle::{Insert, Replace};
use bevy_ecs::observer::On;
use bevy_ecs::prelude::*;

use crate::components::handlers::Handlers;
use crate::resources::dispatcher::Dispatcher;

/// Drop cached resolutions when an entity gains or changes its parent.
pub fn invalidate_on_parent_insert(
    _trigger: On<Insert, ChildOf>,
    dispatcher: Option<ResMut<Dispatcher>>,
) {
    if let Some(mut dispatcher) = dispatcher {
        dispatcher.invalidate();
    }
}

/// Drop cached resolutions when a parent link goes away or is overwritten.
pub fn invalidate_on_parent_replace(
    _trigger: On<Replace, ChildOf>,
    dispatcher: Option<ResMut<Dispatcher>>,
) {
    if let Some(mut dispatcher) = dispatcher {
        dispatcher.invalidate();
    }
}

/// Drop cached resolutions when an entity loses its handler table.
pub fn invalidate_on_handlers_replace(
    _trigger: On<Replace, Handlers>,
    dispatcher: Option<ResMut<Dispatcher>>,
) {
    if let Some(mut dispatcher) = dispatcher {
        dispatcher.invalidate();
    }
}
