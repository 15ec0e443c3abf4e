//! Inventory message handlers.
//!
//! [`register_inventory_handlers`] makes an entity carrying an [`Inventory`]
//! answer the messages pickups send upwards:
//!
//! | Name | Arguments | Result |
//! |------|-----------|--------|
//! | `GetInventory` | `()` | `Option<Entity>` (the inventory entity) |
//! | `GetItemCount` | `ItemType` | `i32` |
//! | `TryGiveItem` | `(ItemType, i32)` item id | `bool` |
//! | `TryGiveUnitBank` | `(ItemType, i32, i32)` units, id | `bool` |
//! | `TryGiveUnits` | `(ItemType, i32)` units | `bool` |

use bevy_ecs::prelude::*;

use crate::components::handlers::Call;
use crate::components::inventory::Inventory;
use crate::components::itemtype::ItemType;
use crate::error::DispatchError;
use crate::systems::dispatch::register_handler;

pub fn get_inventory(In(call): In<Call<()>>, inventories: Query<(), With<Inventory>>) -> Option<Entity> {
    inventories.get(call.owner).ok().map(|_| call.owner)
}

pub fn get_item_count(In(call): In<Call<ItemType>>, inventories: Query<&Inventory>) -> i32 {
    inventories
        .get(call.owner)
        .map_or(0, |inventory| inventory.count(&call.args.name))
}

pub fn try_give_item(
    In(call): In<Call<(ItemType, i32)>>,
    mut inventories: Query<&mut Inventory>,
) -> bool {
    let (item, id) = call.args;
    inventories
        .get_mut(call.owner)
        .is_ok_and(|mut inventory| inventory.add_item(&item.name, id))
}

pub fn try_give_unit_bank(
    In(call): In<Call<(ItemType, i32, i32)>>,
    mut inventories: Query<&mut Inventory>,
) -> bool {
    let (item, units, id) = call.args;
    inventories
        .get_mut(call.owner)
        .is_ok_and(|mut inventory| inventory.add_unit_bank(&item.name, units, id))
}

/// Succeeds when at least one unit fits.
pub fn try_give_units(
    In(call): In<Call<(ItemType, i32)>>,
    mut inventories: Query<&mut Inventory>,
) -> bool {
    let (item, units) = call.args;
    inventories
        .get_mut(call.owner)
        .is_ok_and(|mut inventory| inventory.add(&item.name, units) > 0)
}

/// Register the five inventory handlers on `entity`.
pub fn register_inventory_handlers(world: &mut World, entity: Entity) -> Result<(), DispatchError> {
    register_handler(world, entity, "GetInventory", get_inventory)?;
    register_handler(world, entity, "GetItemCount", get_item_count)?;
    register_handler(world, entity, "TryGiveItem", try_give_item)?;
    register_handler(world, entity, "TryGiveUnitBank", try_give_unit_bank)?;
    register_handler(world, entity, "TryGiveUnits", try_give_units)?;
    Ok(())
}
