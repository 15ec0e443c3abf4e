//! A minimal inventory used by the demo scene and the tests.
//!
//! Counts items by [`ItemType::name`](crate::components::itemtype::ItemType),
//! with an optional per-name capacity. Unit banks are counted as one item
//! each and their rounds are kept separately. The handlers answering the
//! pickup messages live in [`crate::systems::inventory`].

use bevy_ecs::prelude::Component;
use rustc_hash::FxHashMap;

#[derive(Component, Debug, Default, Clone)]
pub struct Inventory {
    counts: FxHashMap<String, i32>,
    capacity: FxHashMap<String, i32>,
    bank_units: FxHashMap<String, i32>,
    item_ids: Vec<i32>,
}

impl Inventory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Limit how many of `name` the inventory can hold.
    pub fn with_capacity(mut self, name: impl Into<String>, max: i32) -> Self {
        self.capacity.insert(name.into(), max.max(0));
        self
    }

    pub fn count(&self, name: &str) -> i32 {
        self.counts.get(name).copied().unwrap_or(0)
    }

    /// Add up to `amount` of `name`, capped by its capacity. Returns how
    /// many were added.
    pub fn add(&mut self, name: &str, amount: i32) -> i32 {
        let current = self.count(name);
        let room = self
            .capacity
            .get(name)
            .map_or(i32::MAX - current, |max| (max - current).max(0));
        let added = amount.clamp(0, room);
        if added > 0 {
            *self.counts.entry(name.to_string()).or_default() += added;
        }
        added
    }

    /// Store a discrete item. Fails when the item is at capacity.
    pub fn add_item(&mut self, name: &str, id: i32) -> bool {
        if self.add(name, 1) == 0 {
            return false;
        }
        self.item_ids.push(id);
        true
    }

    /// Store a unit bank and the units it carries.
    pub fn add_unit_bank(&mut self, name: &str, units: i32, id: i32) -> bool {
        if !self.add_item(name, id) {
            return false;
        }
        *self.bank_units.entry(name.to_string()).or_default() += units.max(0);
        true
    }

    /// Units held by unit banks named `name`.
    pub fn bank_units(&self, name: &str) -> i32 {
        self.bank_units.get(name).copied().unwrap_or(0)
    }

    /// Ids of the discrete items stored so far, in pickup order.
    pub fn item_ids(&self) -> &[i32] {
        &self.item_ids
    }
}
