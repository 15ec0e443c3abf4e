//! Messaging context setup and teardown.
//!
//! Everything the messaging layer needs lives on the [`World`] it is given:
//!
//! | Resource | Purpose |
//! |----------|---------|
//! | [`Dispatcher`] | dispatch settings and resolution cache |
//! | [`GlobalEvents`] | global listeners |
//! | [`UniqueIds`] | non-repeating ID generator |
//! | [`WorldTime`] | frame delta for delayed destroys and pickup sounds |
//! | `Messages<AudioCmd>` | sound requests |
//! | [`PoolManager`] | object pool (only when enabled in the config) |
//!
//! [`install_messaging`] inserts these and spawns the observers keeping the
//! dispatch cache valid and resetting re-activated pickups.
//! [`teardown_messaging`] removes all of it again.

use bevy_ecs::entity_disabling::Disabled;
use bevy_ecs::observer::Observer;
use bevy_ecs::prelude::*;
use bevy_ecs::query::Allow;
use log::{info, warn};

use crate::components::handlers::Handlers;
use crate::components::messagingowned::MessagingOwned;
use crate::error::DispatchError;
use crate::events::audio::AudioCmd;
use crate::resources::dispatcher::Dispatcher;
use crate::resources::globalevents::GlobalEvents;
use crate::resources::messagingconfig::MessagingConfig;
use crate::resources::pool::PoolManager;
use crate::resources::uniqueid::UniqueIds;
use crate::resources::worldtime::WorldTime;
use crate::systems::audio::update_audio_cmds;
use crate::systems::cache::{
    invalidate_on_handlers_replace, invalidate_on_parent_insert, invalidate_on_parent_replace,
};
use crate::systems::destroyafter::destroy_after_system;
use crate::systems::itempickup::{
    on_pickup_trigger_enter, on_pickup_trigger_exit, pickup_depletion_system,
    reset_pickup_on_activation,
};
use crate::systems::pool::register_pool_listeners;

/// Install the messaging resources and observers on `world`.
///
/// Calling it on a world that already has a [`Dispatcher`] does nothing.
pub fn install_messaging(world: &mut World, config: &MessagingConfig) -> Result<(), DispatchError> {
    if world.contains_resource::<Dispatcher>() {
        warn!("messaging is already installed on this world");
        return Ok(());
    }

    world.insert_resource(Dispatcher::new(config));
    world.init_resource::<GlobalEvents>();
    world.insert_resource(match config.id_seed {
        Some(seed) => UniqueIds::with_seed(seed),
        None => UniqueIds::new(),
    });
    world.init_resource::<WorldTime>();
    world.init_resource::<Messages<AudioCmd>>();

    world.spawn((Observer::new(invalidate_on_parent_insert), MessagingOwned));
    world.spawn((Observer::new(invalidate_on_parent_replace), MessagingOwned));
    world.spawn((Observer::new(invalidate_on_handlers_replace), MessagingOwned));
    world.spawn((Observer::new(on_pickup_trigger_enter), MessagingOwned));
    world.spawn((Observer::new(on_pickup_trigger_exit), MessagingOwned));
    world.spawn((Observer::new(reset_pickup_on_activation), MessagingOwned));
    // Observers must be registered before anything triggers.
    world.flush();

    if config.pool_enabled {
        world.insert_resource(PoolManager::new(true));
        register_pool_listeners(world)?;
    }

    info!(
        "messaging installed (cache: {}, max depth: {}, duplicates: {}, pool: {})",
        config.cache_enabled, config.max_depth, config.duplicates, config.pool_enabled
    );
    Ok(())
}

/// Remove everything [`install_messaging`] and later registrations added.
///
/// Handler systems, global listeners and observers are despawned, every
/// [`Handlers`] component is removed, and the messaging resources are
/// dropped. [`WorldTime`] and the audio queue are left in place.
pub fn teardown_messaging(world: &mut World) {
    let owned: Vec<Entity> = world
        .query_filtered::<Entity, With<MessagingOwned>>()
        .iter(world)
        .collect();
    let despawned = owned.len();
    for entity in owned {
        world.despawn(entity);
    }

    let with_handlers: Vec<Entity> = world
        .query_filtered::<Entity, (With<Handlers>, Allow<Disabled>)>()
        .iter(world)
        .collect();
    for entity in with_handlers {
        world.entity_mut(entity).remove::<Handlers>();
    }

    world.remove_resource::<Dispatcher>();
    world.remove_resource::<GlobalEvents>();
    world.remove_resource::<UniqueIds>();
    world.remove_resource::<PoolManager>();
    info!("messaging torn down ({} systems and observers removed)", despawned);
}

/// The per-frame messaging systems, in order.
pub fn messaging_schedule() -> Schedule {
    let mut schedule = Schedule::default();
    schedule.add_systems(
        (
            destroy_after_system,
            pickup_depletion_system,
            update_audio_cmds,
        )
            .chain(),
    );
    schedule
}
