//! Item pickup resolution.
//!
//! When a collider enters a pickup's trigger, [`resolve_pickup`] asks the
//! collider's hierarchy for its inventory and offers the item:
//!
//! 1. `GetInventory` (`() -> Option<Entity>`) from the collider upwards. No
//!    answer means the collider can't carry anything.
//! 2. Recipient tags are checked against the collider's [`Group`].
//! 3. `GetItemCount` (`ItemType -> i32`) before the attempt. This and the
//!    give messages below are also sent from the collider, so any node on
//!    the way up may answer or refuse.
//! 4. `TryGiveItem`, `TryGiveUnitBank` or `TryGiveUnits` depending on the
//!    item kind (see [`crate::components::itemtype`]).
//! 5. On success the pickup plays its sound, hides itself, and reports the
//!    amount actually added. On failure it plays the fail sound once per
//!    trigger stay. Either way a `"HUDText"` global event carries the message.
//!
//! Depleted pickups are deactivated by [`pickup_depletion_system`] when their
//! sound has played, and reset by [`reset_pickup_on_activation`] when they
//! come back (e.g. out of the object pool).

use bevy_ecs::message::Messages;
use bevy_ecs::observer::On;
use bevy_ecs::prelude::*;
use log::{debug, error, info};

use crate::components::group::Group;
use crate::components::itempickup::{Hidden, ItemPickup, PickupState};
use crate::components::itemtype::ItemKind;
use crate::components::pooled::Pooled;
use crate::error::DispatchError;
use crate::events::activation::ActivatedEvent;
use crate::events::audio::AudioCmd;
use crate::events::trigger::{TriggerEnterEvent, TriggerExitEvent};
use crate::resources::worldtime::WorldTime;
use crate::systems::dispatch::send_upwards;
use crate::systems::globalevents::send_global;
use crate::systems::pool::destroy;
use crate::utility::{activate, is_active};

/// Global event name for on-screen text.
pub const HUD_TEXT: &str = "HUDText";

/// What happened when a collider touched a pickup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PickupOutcome {
    /// The pickup or collider is gone, inactive, or already depleted.
    Ignored,
    /// Nothing above the collider answered `GetInventory`.
    NoInventory,
    /// The collider's group is not among the recipient tags.
    NotRecipient,
    /// The inventory took the item; `amount` units were added.
    PickedUp { amount: i32 },
    /// The inventory refused the item.
    Refused,
}

/// Offer `pickup`'s item to the inventory above `collider`.
pub fn resolve_pickup(
    world: &mut World,
    pickup: Entity,
    collider: Entity,
) -> Result<PickupOutcome, DispatchError> {
    if !is_active(world, pickup) || world.get_entity(collider).is_err() {
        return Ok(PickupOutcome::Ignored);
    }
    let Some(config) = world.get::<ItemPickup>(pickup).cloned() else {
        return Ok(PickupOutcome::Ignored);
    };
    if world.get::<PickupState>(pickup).is_some_and(|s| s.depleted) {
        return Ok(PickupOutcome::Ignored);
    }

    let inventory: Option<Entity> = send_upwards(world, collider, "GetInventory", ())?;
    if inventory.is_none() {
        debug!("{:?} touched pickup {:?} but has no inventory", collider, pickup);
        return Ok(PickupOutcome::NoInventory);
    }

    let group = world.get::<Group>(collider).map(|g| g.name().to_string());
    if !config.accepts(group.as_deref()) {
        return Ok(PickupOutcome::NotRecipient);
    }

    let item = config.item.clone();
    let before: i32 = send_upwards(world, collider, "GetItemCount", item.clone())?;
    let given: bool = match item.kind {
        ItemKind::Item => send_upwards(world, collider, "TryGiveItem", (item.clone(), config.id))?,
        ItemKind::UnitBank => send_upwards(
            world,
            collider,
            "TryGiveUnitBank",
            (item.clone(), config.amount, config.id),
        )?,
        ItemKind::Unit => {
            send_upwards(world, collider, "TryGiveUnits", (item.clone(), config.amount))?
        }
    };

    if given {
        let after: i32 = send_upwards(world, collider, "GetItemCount", item)?;
        let amount = after - before;
        let sound_remaining = match &config.sounds.pickup {
            Some(sound) => {
                play(world, sound, config.sounds.pickup_slomo);
                world.entity_mut(pickup).insert(Hidden);
                config.sounds.pickup_duration.max(0.0)
            }
            None => 0.0,
        };
        if let Some(mut state) = world.get_mut::<PickupState>(pickup) {
            state.depleted = true;
            state.picked_up_amount = amount;
            state.sound_remaining = sound_remaining;
        }
        hud(world, config.message(true, amount));
        Ok(PickupOutcome::PickedUp { amount })
    } else {
        let first_failure = world
            .get_mut::<PickupState>(pickup)
            .map(|mut state| !std::mem::replace(&mut state.already_failed, true))
            .unwrap_or(true);
        if first_failure {
            if let Some(sound) = &config.sounds.fail {
                play(world, sound, config.sounds.fail_slomo);
            }
        }
        hud(world, config.message(false, config.amount));
        Ok(PickupOutcome::Refused)
    }
}

/// The collider left the pickup's trigger.
pub fn leave_pickup(world: &mut World, pickup: Entity) {
    if let Some(mut state) = world.get_mut::<PickupState>(pickup) {
        state.already_failed = false;
    }
}

/// Queue [`resolve_pickup`] when something enters a pickup's trigger.
pub fn on_pickup_trigger_enter(
    event: On<TriggerEnterEvent>,
    pickups: Query<(), With<ItemPickup>>,
    mut commands: Commands,
) {
    let TriggerEnterEvent { trigger: pickup, collider } = *event.event();
    if pickups.get(pickup).is_err() {
        return;
    }
    commands.queue(move |world: &mut World| {
        match resolve_pickup(world, pickup, collider) {
            Ok(outcome) => debug!("pickup {:?} by {:?}: {:?}", pickup, collider, outcome),
            Err(err) => error!("pickup {:?} by {:?} failed: {}", pickup, collider, err),
        }
    });
}

/// Queue [`leave_pickup`] when something leaves a pickup's trigger.
pub fn on_pickup_trigger_exit(
    trigger: On<TriggerExitEvent>,
    pickups: Query<(), With<ItemPickup>>,
    mut commands: Commands,
) {
    let pickup = trigger.event().trigger;
    if pickups.get(pickup).is_err() {
        return;
    }
    commands.queue(move |world: &mut World| leave_pickup(world, pickup));
}

/// Restore a pickup that comes back into play.
pub fn reset_pickup_on_activation(
    trigger: On<ActivatedEvent>,
    mut pickups: Query<&mut PickupState>,
    mut commands: Commands,
) {
    let entity = trigger.event().entity;
    if let Ok(mut state) = pickups.get_mut(entity) {
        state.reset();
        commands.entity(entity).remove::<Hidden>();
    }
}

/// Deactivate depleted pickups whose pickup sound has finished.
pub fn pickup_depletion_system(world: &mut World) {
    let dt = world
        .get_resource::<WorldTime>()
        .map(|t| t.delta)
        .unwrap_or_default();

    let mut finished = Vec::new();
    let mut query = world.query::<(Entity, &mut PickupState)>();
    for (entity, mut state) in query.iter_mut(world) {
        if !state.depleted {
            continue;
        }
        state.sound_remaining -= dt;
        if state.sound_remaining <= 0.0 {
            finished.push(entity);
        }
    }

    for entity in finished {
        if world.get::<Pooled>(entity).is_some() {
            destroy(world, entity);
        } else {
            activate(world, entity, false);
        }
    }
}

fn play(world: &mut World, sound: &str, slomo: bool) {
    let pitch = if slomo {
        world
            .get_resource::<WorldTime>()
            .map_or(1.0, |t| t.time_scale)
    } else {
        1.0
    };
    if let Some(mut messages) = world.get_resource_mut::<Messages<AudioCmd>>() {
        messages.write(AudioCmd::PlayFx {
            id: sound.to_string(),
            pitch,
        });
    }
}

fn hud(world: &mut World, text: String) {
    if send_global(world, HUD_TEXT, text.clone()) == 0 {
        info!("{}", text);
    }
}
