//! Integration tests for item pickups resolved through upward dispatch.
//!
//! Tests are organized by category.
//!
//! # Usage
//!
//! ```sh
//! cargo test --test pickup_integration
//! ```

use bevy_ecs::hierarchy::ChildOf;
use bevy_ecs::prelude::*;

use upsend::components::group::Group;
use upsend::components::handlers::Call;
use upsend::components::inventory::Inventory;
use upsend::components::itempickup::{Hidden, ItemPickup, PickupSounds, PickupState};
use upsend::components::itemtype::{ItemKind, ItemType};
use upsend::events::audio::AudioCmd;
use upsend::events::trigger::{TriggerEnterEvent, TriggerExitEvent};
use upsend::resources::messagingconfig::MessagingConfig;
use upsend::resources::worldtime::WorldTime;
use upsend::setup::{install_messaging, messaging_schedule};
use upsend::systems::dispatch::register_handler;
use upsend::systems::globalevents::register_global;
use upsend::systems::inventory::register_inventory_handlers;
use upsend::systems::itempickup::{HUD_TEXT, PickupOutcome, resolve_pickup};
use upsend::systems::time::update_world_time;
use upsend::utility::{activate, is_active};

// =============================================================================
// Test Scene
// =============================================================================

#[derive(Resource, Default)]
struct HudLog(Vec<String>);

fn record_hud(In(text): In<String>, mut log: ResMut<HudLog>) {
    log.0.push(text);
}

struct Scene {
    player: Entity,
    body: Entity,
    collider: Entity,
}

/// player (Inventory) <- body <- collider ("player" group)
fn scene(inventory: Inventory) -> (World, Scene) {
    let mut world = World::new();
    install_messaging(&mut world, &MessagingConfig::new()).unwrap();
    world.init_resource::<HudLog>();
    register_global(&mut world, HUD_TEXT, record_hud).unwrap();

    let player = world.spawn(inventory).id();
    let body = world.spawn(ChildOf(player)).id();
    let collider = world.spawn((ChildOf(body), Group::new("player"))).id();
    register_inventory_handlers(&mut world, player).unwrap();
    (
        world,
        Scene {
            player,
            body,
            collider,
        },
    )
}

fn refuse_units(In(_): In<Call<(ItemType, i32)>>) -> bool {
    false
}

fn medkit() -> ItemType {
    ItemType::new(ItemKind::Item, "Medkit")
}

fn ammo() -> ItemType {
    ItemType::new(ItemKind::Unit, "9mm").with_display_names("bullet", "9mm bullets")
}

fn with_sounds(pickup: ItemPickup, duration: f32) -> ItemPickup {
    pickup.with_sounds(PickupSounds {
        pickup: Some("pickup".into()),
        pickup_duration: duration,
        pickup_slomo: true,
        fail: Some("fail".into()),
        fail_slomo: false,
    })
}

fn enter(world: &mut World, pickup: Entity, collider: Entity) {
    world.trigger(TriggerEnterEvent {
        trigger: pickup,
        collider,
    });
    world.flush();
}

fn exit(world: &mut World, pickup: Entity, collider: Entity) {
    world.trigger(TriggerExitEvent {
        trigger: pickup,
        collider,
    });
    world.flush();
}

fn sounds(world: &mut World) -> Vec<AudioCmd> {
    world
        .resource_mut::<Messages<AudioCmd>>()
        .drain()
        .collect()
}

fn hud(world: &World) -> Vec<String> {
    world.resource::<HudLog>().0.clone()
}

fn count(world: &World, player: Entity, name: &str) -> i32 {
    world.get::<Inventory>(player).unwrap().count(name)
}

// =============================================================================
// CATEGORY 1: Successful Pickups
// =============================================================================

#[test]
fn item_reaches_inventory_two_levels_up() {
    let (mut world, scene) = scene(Inventory::new());
    let pickup = world
        .spawn(with_sounds(ItemPickup::new(medkit(), 1).with_id(77), 0.5))
        .id();

    enter(&mut world, pickup, scene.collider);

    assert_eq!(count(&world, scene.player, "Medkit"), 1);
    assert_eq!(world.get::<Inventory>(scene.player).unwrap().item_ids(), &[77]);
    assert_eq!(hud(&world), vec!["Picked up Medkit.".to_string()]);
    let state = world.get::<PickupState>(pickup).unwrap();
    assert!(state.depleted);
    assert_eq!(state.picked_up_amount, 1);
    assert!(world.entity(pickup).contains::<Hidden>());
    assert_eq!(
        sounds(&mut world),
        vec![AudioCmd::PlayFx {
            id: "pickup".into(),
            pitch: 1.0
        }]
    );
}

#[test]
fn units_report_the_amount_actually_added() {
    let mut inventory = Inventory::new().with_capacity("9mm", 30);
    inventory.add("9mm", 25);
    let (mut world, scene) = scene(inventory);
    let pickup = world.spawn(ItemPickup::new(ammo(), 20)).id();

    let outcome = resolve_pickup(&mut world, pickup, scene.collider).unwrap();

    assert_eq!(outcome, PickupOutcome::PickedUp { amount: 5 });
    assert_eq!(count(&world, scene.player, "9mm"), 30);
    assert_eq!(hud(&world), vec!["Picked up 5 bullets.".to_string()]);
}

#[test]
fn unit_bank_uses_the_single_message() {
    let (mut world, scene) = scene(Inventory::new());
    let pistol = ItemType::new(ItemKind::UnitBank, "Pistol").with_display_names("pistol", "9mm Pistol");
    let pickup = world.spawn(ItemPickup::new(pistol, 12)).id();

    enter(&mut world, pickup, scene.collider);

    let inventory = world.get::<Inventory>(scene.player).unwrap();
    assert_eq!(inventory.count("Pistol"), 1);
    assert_eq!(inventory.bank_units("Pistol"), 12);
    assert_eq!(hud(&world), vec!["Picked up 9mm Pistol.".to_string()]);
}

#[test]
fn pickup_sound_pitch_follows_slow_motion() {
    let (mut world, scene) = scene(Inventory::new());
    world.resource_mut::<WorldTime>().time_scale = 0.5;
    let pickup = world.spawn(with_sounds(ItemPickup::new(medkit(), 1), 0.5)).id();

    enter(&mut world, pickup, scene.collider);

    assert_eq!(
        sounds(&mut world),
        vec![AudioCmd::PlayFx {
            id: "pickup".into(),
            pitch: 0.5
        }]
    );
}

#[test]
fn depleted_pickup_is_ignored() {
    let (mut world, scene) = scene(Inventory::new());
    let pickup = world.spawn(ItemPickup::new(ammo(), 10)).id();

    resolve_pickup(&mut world, pickup, scene.collider).unwrap();
    let outcome = resolve_pickup(&mut world, pickup, scene.collider).unwrap();

    assert_eq!(outcome, PickupOutcome::Ignored);
    assert_eq!(count(&world, scene.player, "9mm"), 10);
}

// =============================================================================
// CATEGORY 2: Refusals and Filtering
// =============================================================================

#[test]
fn fail_sound_plays_once_until_the_collider_leaves() {
    let (mut world, scene) = scene(Inventory::new().with_capacity("9mm", 0));
    let pickup = world.spawn(with_sounds(ItemPickup::new(ammo(), 20), 0.5)).id();
    let fail = AudioCmd::PlayFx {
        id: "fail".into(),
        pitch: 1.0,
    };

    enter(&mut world, pickup, scene.collider);
    assert_eq!(sounds(&mut world), vec![fail.clone()]);

    enter(&mut world, pickup, scene.collider);
    assert!(sounds(&mut world).is_empty());

    exit(&mut world, pickup, scene.collider);
    enter(&mut world, pickup, scene.collider);
    assert_eq!(sounds(&mut world), vec![fail]);

    assert_eq!(
        hud(&world),
        vec!["Can't pick up 20 bullets right now.".to_string(); 3]
    );
    let state = world.get::<PickupState>(pickup).unwrap();
    assert!(!state.depleted);
    assert!(!world.entity(pickup).contains::<Hidden>());
}

#[test]
fn node_between_collider_and_inventory_can_refuse() {
    let (mut world, scene) = scene(Inventory::new());
    register_handler(&mut world, scene.body, "TryGiveUnits", refuse_units).unwrap();
    let pickup = world.spawn(ItemPickup::new(ammo(), 5)).id();

    let outcome = resolve_pickup(&mut world, pickup, scene.collider).unwrap();

    assert_eq!(outcome, PickupOutcome::Refused);
    assert_eq!(count(&world, scene.player, "9mm"), 0);
    assert!(!world.get::<PickupState>(pickup).unwrap().depleted);
}

#[test]
fn recipient_tags_filter_colliders() {
    let (mut world, scene) = scene(Inventory::new());
    let pickup = world
        .spawn(ItemPickup::new(medkit(), 1).with_recipient_tags(["enemy"]))
        .id();

    let outcome = resolve_pickup(&mut world, pickup, scene.collider).unwrap();

    assert_eq!(outcome, PickupOutcome::NotRecipient);
    assert_eq!(count(&world, scene.player, "Medkit"), 0);
    assert!(hud(&world).is_empty());
}

#[test]
fn collider_without_inventory_is_ignored() {
    let (mut world, _scene) = scene(Inventory::new());
    let stray = world.spawn(Group::new("player")).id();
    let pickup = world.spawn(ItemPickup::new(medkit(), 1)).id();

    let outcome = resolve_pickup(&mut world, pickup, stray).unwrap();

    assert_eq!(outcome, PickupOutcome::NoInventory);
    assert!(!world.get::<PickupState>(pickup).unwrap().depleted);
    assert!(hud(&world).is_empty());
}

#[test]
fn non_pickup_triggers_are_ignored() {
    let (mut world, scene) = scene(Inventory::new());
    let door = world.spawn_empty().id();

    enter(&mut world, door, scene.collider);

    assert!(hud(&world).is_empty());
}

// =============================================================================
// CATEGORY 3: Depletion and Re-activation
// =============================================================================

#[test]
fn depleted_pickup_deactivates_after_its_sound() {
    let (mut world, scene) = scene(Inventory::new());
    let pickup = world.spawn(with_sounds(ItemPickup::new(medkit(), 1), 0.5)).id();
    let mut schedule = messaging_schedule();

    enter(&mut world, pickup, scene.collider);

    update_world_time(&mut world, 0.3);
    schedule.run(&mut world);
    assert!(is_active(&world, pickup));

    update_world_time(&mut world, 0.3);
    schedule.run(&mut world);
    assert!(!is_active(&world, pickup));
}

#[test]
fn reactivation_resets_the_pickup() {
    let (mut world, scene) = scene(Inventory::new());
    let pickup = world.spawn(with_sounds(ItemPickup::new(medkit(), 1), 0.0)).id();
    let mut schedule = messaging_schedule();

    enter(&mut world, pickup, scene.collider);
    update_world_time(&mut world, 0.1);
    schedule.run(&mut world);
    assert!(!is_active(&world, pickup));

    // Inactive pickups don't react.
    assert_eq!(
        resolve_pickup(&mut world, pickup, scene.collider).unwrap(),
        PickupOutcome::Ignored
    );

    activate(&mut world, pickup, true);
    world.flush();
    assert_eq!(world.get::<PickupState>(pickup), Some(&PickupState::default()));
    assert!(!world.entity(pickup).contains::<Hidden>());

    enter(&mut world, pickup, scene.collider);
    assert_eq!(count(&world, scene.player, "Medkit"), 2);
}
