//! Pick-up-able item component.
//!
//! An [`ItemPickup`] offers an [`ItemType`] to whatever collider enters its
//! trigger. The pickup never knows where the inventory lives: it asks the
//! collider's hierarchy through upward dispatch (`GetInventory`,
//! `GetItemCount`, `TryGive*`), so the inventory can sit on the collider
//! itself or any number of levels above it.
//!
//! Runtime state is kept in [`PickupState`] and reset when a pooled pickup is
//! re-activated.
//!
//! # Related
//!
//! - [`crate::systems::itempickup`] – trigger handling and depletion
//! - [`crate::components::itemtype`] – what a pickup gives

use bevy_ecs::prelude::*;
use serde::{Deserialize, Serialize};

use crate::components::itemtype::{ItemKind, ItemType};

/// Sounds played on pickup success and failure.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
pub struct PickupSounds {
    /// Played when the item is taken.
    #[serde(default)]
    pub pickup: Option<String>,
    /// Length of the pickup sound; the pickup disappears once it has played.
    #[serde(default)]
    pub pickup_duration: f32,
    /// Pitch follows the world time scale.
    #[serde(default = "yes")]
    pub pickup_slomo: bool,
    /// Played when the recipient can't take the item (e.g. ammo full).
    #[serde(default)]
    pub fail: Option<String>,
    #[serde(default = "yes")]
    pub fail_slomo: bool,
}

fn yes() -> bool {
    true
}

/// HUD message templates.
///
/// Placeholders: `{0}` indefinite article, `{1}` display name, `{2}` full
/// display name, `{3}` description, `{4}` amount.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct PickupMessages {
    pub success_single: String,
    pub success_multiple: String,
    pub fail_single: String,
    pub fail_multiple: String,
}

impl Default for PickupMessages {
    fn default() -> Self {
        Self {
            success_single: "Picked up {2}.".into(),
            success_multiple: "Picked up {4} {1}s.".into(),
            fail_single: "Can't pick up {2} right now.".into(),
            fail_multiple: "Can't pick up {4} {1}s right now.".into(),
        }
    }
}

/// Pickup configuration.
#[derive(Component, Serialize, Deserialize, Debug, Clone, PartialEq)]
#[require(PickupState)]
pub struct ItemPickup {
    /// Item instance id passed to `TryGiveItem` / `TryGiveUnitBank`.
    #[serde(default)]
    pub id: i32,
    /// Units given by `Unit` and `UnitBank` pickups.
    #[serde(default)]
    pub amount: i32,
    pub item: ItemType,
    /// Collider groups allowed to take the item. Empty means anyone.
    #[serde(default)]
    pub recipient_tags: Vec<String>,
    #[serde(default)]
    pub sounds: PickupSounds,
    #[serde(default)]
    pub messages: PickupMessages,
}

impl ItemPickup {
    /// A pickup giving `amount` of `item`. `Unit` pickups give at least one.
    pub fn new(item: ItemType, amount: i32) -> Self {
        let amount = if item.kind == ItemKind::Unit {
            amount.max(1)
        } else {
            amount
        };
        Self {
            id: 0,
            amount,
            item,
            recipient_tags: Vec::new(),
            sounds: PickupSounds::default(),
            messages: PickupMessages::default(),
        }
    }

    pub fn with_id(mut self, id: i32) -> Self {
        self.id = id;
        self
    }

    pub fn with_recipient_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.recipient_tags = tags.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_sounds(mut self, sounds: PickupSounds) -> Self {
        self.sounds = sounds;
        self
    }

    pub fn with_messages(mut self, messages: PickupMessages) -> Self {
        self.messages = messages;
        self
    }

    /// Whether a collider in `group` may take this item.
    pub fn accepts(&self, group: Option<&str>) -> bool {
        self.recipient_tags.is_empty()
            || group.is_some_and(|g| self.recipient_tags.iter().any(|t| t == g))
    }

    /// The HUD message for a success or failure involving `amount` units.
    pub fn message(&self, success: bool, amount: i32) -> String {
        let single = amount < 2 || self.item.kind == ItemKind::UnitBank;
        let template = match (success, single) {
            (true, true) => &self.messages.success_single,
            (true, false) => &self.messages.success_multiple,
            (false, true) => &self.messages.fail_single,
            (false, false) => &self.messages.fail_multiple,
        };
        template
            .replace("{0}", &self.item.indefinite_article)
            .replace("{1}", &self.item.display_name)
            .replace("{2}", &self.item.display_name_full)
            .replace("{3}", &self.item.description)
            .replace("{4}", &amount.to_string())
    }
}

/// Runtime state of a pickup.
#[derive(Component, Debug, Clone, Default, PartialEq)]
pub struct PickupState {
    /// The item has been taken; the pickup is gone once its sound finishes.
    pub depleted: bool,
    /// A failure was reported and the collider has not left yet.
    pub already_failed: bool,
    /// Units actually added by the last successful pickup.
    pub picked_up_amount: i32,
    /// Seconds of pickup sound left to play.
    pub sound_remaining: f32,
}

impl PickupState {
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

/// Marker for entities that should not be drawn.
#[derive(Component, Debug, Clone, Copy)]
pub struct Hidden;
