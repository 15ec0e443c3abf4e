//! Global event registration and delivery.
//!
//! Functions over the [`GlobalEvents`] resource:
//!
//! - [`register_global`] / [`unregister_global`] – add or remove a listener
//! - [`send_global`] – fire-and-forget broadcast to every listener
//! - [`send_global_return`] – ask the first listener for a value
//!
//! Sending to a name nobody listens to is not an error; it simply reaches
//! zero listeners.
//!
//! # Example
//!
//! ```ignore
//! fn show_hud_text(In(text): In<String>) {
//!     log::info!("HUD: {text}");
//! }
//!
//! register_global(world, "HUDText", show_hud_text)?;
//! send_global(world, "HUDText", "Picked up a Medkit.".to_string());
//! ```

use bevy_ecs::prelude::*;
use log::{debug, warn};

use crate::components::handlers::{ErasedSystem, Signature};
use crate::components::messagingowned::MessagingOwned;
use crate::error::DispatchError;
use crate::events::message::DispatchResult;
use crate::resources::globalevents::{GlobalEvents, ListenerId};

/// Register `system` as a listener for global events named `name`.
///
/// Inserts the [`GlobalEvents`] resource if it is missing.
pub fn register_global<A, R, M>(
    world: &mut World,
    name: impl Into<String>,
    system: impl IntoSystem<In<A>, R, M> + 'static,
) -> Result<ListenerId<A, R>, DispatchError>
where
    A: Send + 'static,
    R: Send + 'static,
{
    let name = name.into();
    if name.is_empty() {
        return Err(DispatchError::EmptyName);
    }

    let id = world.register_system(system);
    world.entity_mut(id.entity()).insert(MessagingOwned);

    let signature = Signature::of::<A, R>();
    debug!("registered global listener '{}' {}", name, signature);
    world
        .get_resource_or_insert_with(GlobalEvents::default)
        .add(name, signature, ErasedSystem::new(id));
    Ok(id)
}

/// Remove a listener previously returned by [`register_global`].
///
/// Returns `true` when the listener was registered under `name`.
pub fn unregister_global<A, R>(world: &mut World, name: &str, id: ListenerId<A, R>) -> bool
where
    A: Send + 'static,
    R: Send + 'static,
{
    let removed = world
        .get_resource_mut::<GlobalEvents>()
        .and_then(|mut events| events.remove(name, &Signature::of::<A, R>(), id.entity()));
    match removed {
        Some(listener) => {
            world.despawn(listener.entity());
            true
        }
        None => false,
    }
}

/// Broadcast `args` to every listener of `name` that takes `A` and returns
/// nothing, in registration order.
///
/// Returns how many listeners ran. A listener that fails to run is logged and
/// skipped.
pub fn send_global<A>(world: &mut World, name: &str, args: A) -> usize
where
    A: Clone + Send + 'static,
{
    let listeners = world
        .get_resource::<GlobalEvents>()
        .map(|events| events.listeners::<A, ()>(name))
        .unwrap_or_default();
    if listeners.is_empty() {
        debug!("global event '{}' has no listeners", name);
        return 0;
    }

    let mut delivered = 0;
    for id in listeners {
        match world.run_system_with(id, args.clone()) {
            Ok(()) => delivered += 1,
            Err(err) => warn!("global listener for '{}' failed: {}", name, err),
        }
    }
    delivered
}

/// Deliver `args` to the first listener of `name` that takes `A` and returns
/// `R`, and return its value.
pub fn send_global_return<A, R>(world: &mut World, name: &str, args: A) -> DispatchResult<R>
where
    A: Send + 'static,
    R: Send + 'static,
{
    let first = world
        .get_resource::<GlobalEvents>()
        .and_then(|events| events.listeners::<A, R>(name).into_iter().next());
    let Some(id) = first else {
        debug!("global event '{}' has no returning listener", name);
        return DispatchResult::Unhandled;
    };

    match world.run_system_with(id, args) {
        Ok(value) => DispatchResult::Handled {
            owner: id.entity(),
            value,
        },
        Err(err) => {
            warn!("global listener for '{}' failed: {}", name, err);
            DispatchResult::Unhandled
        }
    }
}
