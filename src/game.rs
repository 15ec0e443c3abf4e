//! Demo scene driven by the `upsend` binary.
//!
//! The scene is a small hierarchy with the inventory at the top and the
//! collider two levels below it, so every pickup has to reach the inventory
//! through upward dispatch:
//!
//! ```text
//! player (Inventory + handlers)
//! └── body
//!     └── collider (Group "player")
//! ```
//!
//! Pickups are read from JSON. Each frame the collider touches every pickup
//! and leaves again; an ammo pickup is respawned through the object pool.

use bevy_ecs::prelude::*;
use log::{error, info};

use crate::components::group::Group;
use crate::components::inventory::Inventory;
use crate::components::itempickup::ItemPickup;
use crate::components::itemtype::{ItemKind, ItemType};
use crate::error::DispatchError;
use crate::events::trigger::{TriggerEnterEvent, TriggerExitEvent};
use crate::resources::pool::Prefab;
use crate::resources::uniqueid::UniqueIds;
use crate::systems::globalevents::register_global;
use crate::systems::inventory::register_inventory_handlers;
use crate::systems::itempickup::HUD_TEXT;
use crate::systems::pool::instantiate;
use crate::systems::time::update_world_time;
use crate::utility::is_active;

/// Pickup definitions placed in the demo scene.
pub const DEMO_PICKUPS: &str = r#"[
    {
        "item": {
            "kind": "item",
            "name": "Medkit",
            "display_name": "medkit",
            "display_name_full": "Medkit",
            "description": "Restores health"
        },
        "recipient_tags": ["player"],
        "sounds": { "pickup": "pickup_medkit", "pickup_duration": 0.05 }
    },
    {
        "amount": 12,
        "item": {
            "kind": "unit_bank",
            "name": "Pistol",
            "display_name": "pistol",
            "display_name_full": "9mm Pistol"
        },
        "sounds": { "pickup": "pickup_weapon", "fail": "pickup_fail" }
    },
    {
        "amount": 20,
        "item": { "kind": "unit", "name": "Shells", "display_name": "shell", "display_name_full": "shotgun shells" },
        "recipient_tags": ["enemy"]
    }
]"#;

/// Seconds per simulated frame.
pub const FRAME_TIME: f32 = 1.0 / 60.0;

/// Entities of the demo scene.
#[derive(Debug, Clone)]
pub struct DemoScene {
    pub player: Entity,
    pub body: Entity,
    pub collider: Entity,
    pub pickups: Vec<Entity>,
}

/// Global listener printing HUD text.
pub fn log_hud_text(In(text): In<String>) {
    info!("HUD: {}", text);
}

fn ammo_item() -> ItemType {
    ItemType::new(ItemKind::Unit, "9mm")
        .with_display_names("bullet", "9mm bullets")
        .with_description("Pistol ammunition")
}

fn build_ammo_pickup(entity: &mut EntityWorldMut) {
    let mut pickup = ItemPickup::new(ammo_item(), 15).with_recipient_tags(["player"]);
    pickup.sounds.pickup = Some("pickup_ammo".into());
    entity.insert(pickup);
}

/// Prefab of the respawning ammo pickup.
pub fn ammo_prefab() -> Prefab {
    Prefab::new("ammo_pickup", build_ammo_pickup)
}

/// Spawn the demo hierarchy and pickups.
///
/// Expects messaging to be installed on `world`.
pub fn spawn_demo_scene(world: &mut World) -> Result<DemoScene, DispatchError> {
    register_global(world, HUD_TEXT, log_hud_text)?;

    let player = world
        .spawn(Inventory::new().with_capacity("9mm", 40).with_capacity("Pistol", 1))
        .id();
    let body = world.spawn(ChildOf(player)).id();
    let collider = world.spawn((ChildOf(body), Group::new("player"))).id();
    register_inventory_handlers(world, player)?;

    let definitions: Vec<ItemPickup> = match serde_json::from_str(DEMO_PICKUPS) {
        Ok(definitions) => definitions,
        Err(err) => {
            error!("demo pickup definitions are invalid: {}", err);
            Vec::new()
        }
    };
    let mut pickups = Vec::with_capacity(definitions.len() + 1);
    for definition in definitions {
        let id = world
            .get_resource_mut::<UniqueIds>()
            .map_or(0, |mut ids| ids.next_id());
        pickups.push(world.spawn(definition.with_id(id)).id());
    }
    pickups.push(instantiate(world, &ammo_prefab()));

    info!(
        "demo scene: player {:?}, body {:?}, collider {:?}, {} pickups",
        player,
        body,
        collider,
        pickups.len()
    );
    Ok(DemoScene {
        player,
        body,
        collider,
        pickups,
    })
}

/// Run one demo frame: touch every live pickup, advance time, run
/// `schedule`, and respawn the ammo pickup once it is gone.
pub fn run_demo_frame(world: &mut World, scene: &mut DemoScene, schedule: &mut Schedule) {
    for &pickup in &scene.pickups {
        if !is_active(world, pickup) {
            continue;
        }
        world.trigger(TriggerEnterEvent {
            trigger: pickup,
            collider: scene.collider,
        });
        world.trigger(TriggerExitEvent {
            trigger: pickup,
            collider: scene.collider,
        });
    }
    world.flush();

    update_world_time(world, FRAME_TIME);
    schedule.run(world);

    if let Some(last) = scene.pickups.last_mut()
        && !is_active(world, *last)
    {
        *last = instantiate(world, &ammo_prefab());
    }

    if let Some(inventory) = world.get::<Inventory>(scene.player) {
        info!(
            "inventory: Medkit {}, Pistol {} ({} rounds), 9mm {}",
            inventory.count("Medkit"),
            inventory.count("Pistol"),
            inventory.bank_units("Pistol"),
            inventory.count("9mm")
        );
    }
}
