//! Upward message dispatch.
//!
//! Delivers a named, typed message from a starting entity to the nearest
//! entity on its upward path (the entity itself, then its
//! [`ChildOf`] parent, then that parent's parent, up to the root) that has a
//! handler registered under the same name with exactly the same signature.
//!
//! # Soft dispatch
//!
//! A message nobody answers is not an error. [`send_upwards`] returns the
//! result type's default (`false`, `0`, `None`, empty string). Only a missing
//! starting entity ([`DispatchError::InvalidNode`]), an empty name, or a
//! handler that cannot run are reported.
//!
//! # Example
//!
//! ```ignore
//! fn get_inventory(In(call): In<Call<()>>) -> Option<Entity> {
//!     Some(call.owner)
//! }
//!
//! register_handler(world, player, "GetInventory", get_inventory)?;
//!
//! // From a collider two levels below the player:
//! let inventory: Option<Entity> = send_upwards(world, collider, "GetInventory", ())?;
//! ```
//!
//! # Related
//!
//! - [`crate::components::handlers::Handlers`] – where handlers are stored
//! - [`crate::resources::dispatcher::Dispatcher`] – settings and resolution cache
//! - [`crate::systems::globalevents`] – tree-independent broadcast

use bevy_ecs::hierarchy::ChildOf;
use bevy_ecs::prelude::*;
use log::{debug, trace, warn};

use crate::components::handlers::{Call, ErasedSystem, HandlerId, Handlers, Signature};
use crate::components::messagingowned::MessagingOwned;
use crate::error::DispatchError;
use crate::events::message::{DispatchResult, Message, Reach};
use crate::resources::dispatcher::Dispatcher;
use crate::resources::messagingconfig::DuplicatePolicy;

/// Register `system` on `node` as the handler for messages named `name`
/// carrying `A` and expecting `R`.
///
/// A second registration under the same name and signature on the same
/// entity follows [`Dispatcher::duplicates`]: `Replace` unregisters the old
/// handler, `Reject` fails with [`DispatchError::AmbiguousRegistration`].
pub fn register_handler<A, R, M>(
    world: &mut World,
    node: Entity,
    name: impl Into<String>,
    system: impl IntoSystem<In<Call<A>>, R, M> + 'static,
) -> Result<HandlerId<A, R>, DispatchError>
where
    A: Send + 'static,
    R: Send + 'static,
{
    let name = name.into();
    if name.is_empty() {
        return Err(DispatchError::EmptyName);
    }
    if world.get_entity(node).is_err() {
        return Err(DispatchError::InvalidNode(node));
    }

    let signature = Signature::of::<A, R>();
    let policy = world
        .get_resource::<Dispatcher>()
        .map(|d| d.duplicates)
        .unwrap_or_default();
    let exists = world
        .get::<Handlers>(node)
        .is_some_and(|h| h.contains(&name, &signature));
    if exists && policy == DuplicatePolicy::Reject {
        return Err(DispatchError::AmbiguousRegistration {
            name,
            signature: signature.to_string(),
        });
    }

    let id = world.register_system(system);
    world.entity_mut(id.entity()).insert(MessagingOwned);

    let displaced = {
        let mut entity = world.entity_mut(node);
        if !entity.contains::<Handlers>() {
            entity.insert(Handlers::default());
        }
        entity
            .get_mut::<Handlers>()
            .and_then(|mut handlers| {
                handlers.insert(name.clone(), signature, ErasedSystem::new(id))
            })
    };
    if let Some(old) = displaced {
        warn!(
            "handler '{}' {} on {:?} replaced by a newer registration",
            name, signature, node
        );
        world.despawn(old.entity());
    }

    invalidate_cache(world);
    debug!("registered handler '{}' {} on {:?}", name, signature, node);
    Ok(id)
}

/// Remove the handler for `name` taking `A` and returning `R` from `node`.
///
/// Returns `true` when a handler was removed. The handler's system is
/// unregistered, and the [`Handlers`] component is removed along with the
/// entity's last handler.
pub fn unregister_handler<A, R>(world: &mut World, node: Entity, name: &str) -> bool
where
    A: Send + 'static,
    R: Send + 'static,
{
    let signature = Signature::of::<A, R>();
    let Ok(mut entity) = world.get_entity_mut(node) else {
        return false;
    };
    let Some(mut handlers) = entity.get_mut::<Handlers>() else {
        return false;
    };
    let Some(removed) = handlers.remove(name, &signature) else {
        return false;
    };
    if handlers.is_empty() {
        entity.remove::<Handlers>();
    }

    world.despawn(removed.entity());
    invalidate_cache(world);
    debug!("unregistered handler '{}' {} from {:?}", name, signature, node);
    true
}

/// Deliver `message` upwards from `node` and report who handled it.
pub fn dispatch_upwards<A, R>(
    world: &mut World,
    node: Entity,
    message: Message<A, R>,
) -> Result<DispatchResult<R>, DispatchError>
where
    A: Send + 'static,
    R: Send + 'static,
{
    if world.get_entity(node).is_err() {
        return Err(DispatchError::InvalidNode(node));
    }
    let (name, args, reach) = message.into_parts();
    if name.is_empty() {
        return Err(DispatchError::EmptyName);
    }

    let signature = Signature::of::<A, R>();
    let Some(owner) = resolve_owner(world, node, &name, signature, reach) else {
        debug!(
            "'{}' {} from {:?} found no receiver",
            name, signature, node
        );
        return Ok(DispatchResult::Unhandled);
    };
    let Some(id) = world
        .get::<Handlers>(owner)
        .and_then(|h| h.get::<A, R>(&name))
    else {
        return Ok(DispatchResult::Unhandled);
    };

    let call = Call {
        owner,
        sender: node,
        args,
    };
    match world.run_system_with(id, call) {
        Ok(value) => Ok(DispatchResult::Handled { owner, value }),
        Err(err) => {
            if let Some(mut dispatcher) = world.get_resource_mut::<Dispatcher>() {
                dispatcher.forget(node, reach, signature, &name);
            }
            Err(DispatchError::HandlerFailed {
                name,
                reason: err.to_string(),
            })
        }
    }
}

/// Soft upward dispatch: the nearest handler's result, or `R::default()` when
/// nothing on the path answers.
pub fn send_upwards<A, R>(
    world: &mut World,
    node: Entity,
    name: &str,
    args: A,
) -> Result<R, DispatchError>
where
    A: Send + 'static,
    R: Send + Default + 'static,
{
    dispatch_upwards(world, node, Message::new(name, args))
        .map(DispatchResult::into_value_or_default)
}

/// Like [`send_upwards`], but the walk starts at `node`'s parent.
pub fn send_to_ancestors<A, R>(
    world: &mut World,
    node: Entity,
    name: &str,
    args: A,
) -> Result<R, DispatchError>
where
    A: Send + 'static,
    R: Send + Default + 'static,
{
    dispatch_upwards(world, node, Message::new(name, args).ancestors_only())
        .map(DispatchResult::into_value_or_default)
}

/// Find the entity whose handler should receive the message.
fn resolve_owner(
    world: &mut World,
    sender: Entity,
    name: &str,
    signature: Signature,
    reach: Reach,
) -> Option<Entity> {
    let (cache_enabled, max_depth) = world
        .get_resource::<Dispatcher>()
        .map(|d| (d.cache_enabled, d.max_depth))
        .unwrap_or((false, usize::MAX));

    if cache_enabled {
        let cached = world
            .resource::<Dispatcher>()
            .cached(sender, reach, signature, name);
        if let Some(owner) = cached {
            if has_handler(world, owner, name, &signature) {
                world.resource_mut::<Dispatcher>().record_hit();
                trace!("'{}' from {:?} -> {:?} (cached)", name, sender, owner);
                return Some(owner);
            }
            debug!("stale cache entry for '{}' from {:?}", name, sender);
            world
                .resource_mut::<Dispatcher>()
                .forget(sender, reach, signature, name);
        }
    }

    let found = walk(world, sender, name, &signature, reach, max_depth);

    if cache_enabled {
        let mut dispatcher = world.resource_mut::<Dispatcher>();
        dispatcher.record_miss();
        if let Some(owner) = found {
            dispatcher.remember(sender, reach, signature, name, owner);
        }
    }
    if let Some(owner) = found {
        trace!("'{}' from {:?} -> {:?}", name, sender, owner);
    }
    found
}

/// Linear walk from `sender` through its ancestors.
fn walk(
    world: &World,
    sender: Entity,
    name: &str,
    signature: &Signature,
    reach: Reach,
    max_depth: usize,
) -> Option<Entity> {
    let mut current = match reach {
        Reach::IncludeSelf => Some(sender),
        Reach::AncestorsOnly => parent_of(world, sender),
    };
    let mut depth = 0;
    while let Some(entity) = current {
        if depth > max_depth {
            warn!(
                "'{}' from {:?} gave up after {} parent links",
                name, sender, max_depth
            );
            return None;
        }
        if has_handler(world, entity, name, signature) {
            return Some(entity);
        }
        current = parent_of(world, entity);
        depth += 1;
    }
    None
}

fn has_handler(world: &World, entity: Entity, name: &str, signature: &Signature) -> bool {
    world
        .get::<Handlers>(entity)
        .is_some_and(|h| h.contains(name, signature))
}

fn parent_of(world: &World, entity: Entity) -> Option<Entity> {
    world.get::<ChildOf>(entity).map(|child_of| child_of.parent())
}

fn invalidate_cache(world: &mut World) {
    if let Some(mut dispatcher) = world.get_resource_mut::<Dispatcher>() {
        dispatcher.invalidate();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resources::messagingconfig::MessagingConfig;

    fn answer(In(_call): In<Call<()>>) -> i32 {
        42
    }

    #[test]
    fn dispatch_without_dispatcher_resource_still_walks() {
        let mut world = World::new();
        let root = world.spawn_empty().id();
        let child = world.spawn(ChildOf(root)).id();
        register_handler(&mut world, root, "Answer", answer).unwrap();

        let value: i32 = send_upwards(&mut world, child, "Answer", ()).unwrap();
        assert_eq!(value, 42);
    }

    #[test]
    fn depth_limit_stops_the_walk() {
        let mut world = World::new();
        world.insert_resource(Dispatcher::new(&MessagingConfig {
            max_depth: 1,
            ..MessagingConfig::new()
        }));
        let root = world.spawn_empty().id();
        let mid = world.spawn(ChildOf(root)).id();
        let leaf = world.spawn(ChildOf(mid)).id();
        register_handler(&mut world, root, "Answer", answer).unwrap();

        let from_mid: i32 = send_upwards(&mut world, mid, "Answer", ()).unwrap();
        let from_leaf: i32 = send_upwards(&mut world, leaf, "Answer", ()).unwrap();
        assert_eq!(from_mid, 42);
        assert_eq!(from_leaf, 0);
    }
}
