use bevy_ecs::prelude::Component;

/// Tag naming the group an entity belongs to (`"player"`, `"enemy"`, ...).
///
/// Pickups compare a collider's group with their recipient tags.
#[derive(Component, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Group(String);

impl Group {
    pub fn new(name: impl Into<String>) -> Self {
        Group(name.into())
    }

    pub fn name(&self) -> &str {
        &self.0
    }
}
