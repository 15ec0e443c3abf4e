//! Item type records used by pickups and inventories.
//!
//! An [`ItemType`] describes *what* a pickup gives. Its [`ItemKind`] selects
//! which inventory message the pickup sends:
//!
//! | Kind | Message | Arguments |
//! |------|---------|-----------|
//! | `Item` | `TryGiveItem` | `(ItemType, id)` |
//! | `UnitBank` | `TryGiveUnitBank` | `(ItemType, amount, id)` |
//! | `Unit` | `TryGiveUnits` | `(ItemType, amount)` |
//!
//! Item types are plain data and deserialize from JSON:
//!
//! ```json
//! {
//!   "kind": "unit",
//!   "name": "9mm",
//!   "display_name": "bullet",
//!   "display_name_full": "9mm bullets",
//!   "indefinite_article": "a",
//!   "description": "Pistol ammunition"
//! }
//! ```

use serde::{Deserialize, Serialize};

/// Category of an item type.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "snake_case")]
pub enum ItemKind {
    /// A single discrete item (a key, a medkit).
    #[default]
    Item,
    /// A container of units (a weapon with a magazine).
    UnitBank,
    /// Loose units (ammunition).
    Unit,
}

/// Display and identity data for a kind of item.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct ItemType {
    #[serde(default)]
    pub kind: ItemKind,
    /// Identifier used by inventories to count items of this type.
    pub name: String,
    #[serde(default)]
    pub display_name: String,
    #[serde(default)]
    pub display_name_full: String,
    #[serde(default = "default_article")]
    pub indefinite_article: String,
    #[serde(default)]
    pub description: String,
}

fn default_article() -> String {
    "a".to_string()
}

impl ItemType {
    /// An item type whose display names default to `name`.
    pub fn new(kind: ItemKind, name: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            kind,
            display_name: name.clone(),
            display_name_full: name.clone(),
            indefinite_article: default_article(),
            description: String::new(),
            name,
        }
    }

    pub fn with_display_names(
        mut self,
        display_name: impl Into<String>,
        display_name_full: impl Into<String>,
    ) -> Self {
        self.display_name = display_name.into();
        self.display_name_full = display_name_full.into();
        self
    }

    pub fn with_article(mut self, article: impl Into<String>) -> Self {
        self.indefinite_article = article.into();
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }
}
