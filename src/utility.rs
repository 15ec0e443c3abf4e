//! Miscellaneous helpers.
//!
//! Float sanitizing and rounding, list shuffling, random sounds, type names
//! for messages, parent lookup and entity activation. Instantiate/destroy wrappers that honor the object pool
//! live in [`crate::systems::pool`]; unique IDs come from
//! [`UniqueIds`](crate::resources::uniqueid::UniqueIds).

use std::any::type_name;

use bevy_ecs::entity_disabling::Disabled;
use bevy_ecs::hierarchy::ChildOf;
use bevy_ecs::message::Messages;
use bevy_ecs::prelude::*;
use log::debug;

use crate::events::activation::ActivatedEvent;
use crate::events::audio::AudioCmd;

/// Default epsilon for [`snap_to_zero`].
pub const SNAP_EPSILON: f32 = 0.0001;
/// Default factor for [`reduce_decimals`] (three decimals).
pub const DECIMAL_FACTOR: f32 = 1000.0;

/// Replace a NaN `value` with `prev`.
pub fn nan_safe_f32(value: f32, prev: f32) -> f32 {
    if value.is_nan() { prev } else { value }
}

/// Replace NaN components of `value` with the matching component of `prev`.
pub fn nan_safe_vec<const N: usize>(value: [f32; N], prev: [f32; N]) -> [f32; N] {
    std::array::from_fn(|i| nan_safe_f32(value[i], prev[i]))
}

/// Snap a value whose magnitude is below `epsilon` to zero.
pub fn snap_to_zero(value: f32, epsilon: f32) -> f32 {
    if value.abs() < epsilon { 0.0 } else { value }
}

/// [`snap_to_zero`] applied per component.
pub fn snap_vec_to_zero<const N: usize>(value: [f32; N], epsilon: f32) -> [f32; N] {
    value.map(|v| snap_to_zero(v, epsilon))
}

/// Round `value` to the precision given by `factor` (1000 keeps three
/// decimals).
pub fn reduce_decimals(value: f32, factor: f32) -> f32 {
    (value * factor).round() / factor
}

/// Zero the vertical (y) component.
pub fn horizontal_vector([x, _, z]: [f32; 3]) -> [f32; 3] {
    [x, 0.0, z]
}

/// Shuffle in place: every index `i` is swapped with a random index in
/// `[i, len)`.
pub fn randomize_list<T>(list: &mut [T], rng: &mut fastrand::Rng) {
    let size = list.len();
    for i in 0..size {
        let swap_with = rng.usize(i..size);
        list.swap(i, swap_with);
    }
}

/// A random element, or `None` for an empty slice.
pub fn random_object<'a, T>(list: &'a [T], rng: &mut fastrand::Rng) -> Option<&'a T> {
    if list.is_empty() {
        return None;
    }
    list.get(rng.usize(..list.len()))
}

/// Queue one of `sounds`, picked at random, at a random pitch in
/// `pitch_range`.
///
/// Returns the chosen sound id. Nothing is queued for an empty list or when
/// the world has no audio queue.
pub fn play_random_sound(
    world: &mut World,
    sounds: &[String],
    (min_pitch, max_pitch): (f32, f32),
    rng: &mut fastrand::Rng,
) -> Option<String> {
    let id = random_object(sounds, rng)?.clone();
    let pitch = min_pitch + rng.f32() * (max_pitch - min_pitch);
    let mut messages = world.get_resource_mut::<Messages<AudioCmd>>()?;
    messages.write(AudioCmd::PlayFx {
        id: id.clone(),
        pitch,
    });
    Some(id)
}

/// Short, syntax-style name for a type, for log and HUD messages.
///
/// `type_alias::<f32>()` is `"f32"`, `type_alias::<String>()` is `"String"`;
/// anything not in the table gets its full type name.
pub fn type_alias<T: ?Sized + 'static>() -> &'static str {
    let full = type_name::<T>();
    match full {
        "alloc::string::String" => "String",
        "&str" => "str",
        "bevy_ecs::entity::Entity" => "Entity",
        "[f32; 2]" => "Vector2",
        "[f32; 3]" => "Vector3",
        "[f32; 4]" => "Vector4",
        _ => full,
    }
}

/// The hierarchy parent of `entity`, if it has one.
pub fn get_parent(world: &World, entity: Entity) -> Option<Entity> {
    world.get::<ChildOf>(entity).map(ChildOf::parent)
}

/// Activate or deactivate an entity.
///
/// Deactivation inserts [`Disabled`], which hides the entity from default
/// queries. Re-activation removes it and triggers [`ActivatedEvent`].
/// Missing entities are ignored.
pub fn activate(world: &mut World, entity: Entity, active: bool) {
    let Ok(mut entity_mut) = world.get_entity_mut(entity) else {
        debug!("activate({:?}, {}) on a missing entity", entity, active);
        return;
    };
    let is_disabled = entity_mut.contains::<Disabled>();
    if active && is_disabled {
        entity_mut.remove::<Disabled>();
        world.trigger(ActivatedEvent { entity });
    } else if !active && !is_disabled {
        entity_mut.insert(Disabled);
    }
}

/// Whether `entity` exists and is not disabled.
pub fn is_active(world: &World, entity: Entity) -> bool {
    world
        .get_entity(entity)
        .is_ok_and(|e| !e.contains::<Disabled>())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nan_is_replaced_by_previous() {
        assert_eq!(nan_safe_f32(f32::NAN, 3.0), 3.0);
        assert_eq!(nan_safe_f32(1.5, 3.0), 1.5);
        assert_eq!(nan_safe_f32(f32::NAN, 0.0), 0.0);
        assert_eq!(
            nan_safe_vec([1.0, f32::NAN, 3.0], [9.0, 8.0, 7.0]),
            [1.0, 8.0, 3.0]
        );
    }

    #[test]
    fn tiny_values_snap_to_zero() {
        assert_eq!(snap_to_zero(0.00005, SNAP_EPSILON), 0.0);
        assert_eq!(snap_to_zero(-0.00005, SNAP_EPSILON), 0.0);
        assert_eq!(snap_to_zero(0.5, SNAP_EPSILON), 0.5);
        assert_eq!(
            snap_vec_to_zero([0.00001, 2.0, -0.00002], SNAP_EPSILON),
            [0.0, 2.0, 0.0]
        );
    }

    #[test]
    fn decimals_are_reduced() {
        assert!((reduce_decimals(1.234_567, DECIMAL_FACTOR) - 1.235).abs() < 1e-6);
        assert!((reduce_decimals(2.5, 1.0) - 3.0).abs() < 1e-6);
    }

    #[test]
    fn horizontal_vector_drops_y() {
        assert_eq!(horizontal_vector([1.0, 5.0, -2.0]), [1.0, 0.0, -2.0]);
    }

    #[test]
    fn randomize_list_is_a_permutation() {
        let mut rng = fastrand::Rng::with_seed(9);
        let mut list: Vec<u32> = (0..32).collect();
        randomize_list(&mut list, &mut rng);
        let mut sorted = list.clone();
        sorted.sort_unstable();
        assert_eq!(sorted, (0..32).collect::<Vec<_>>());
    }

    #[test]
    fn random_object_of_empty_is_none() {
        let mut rng = fastrand::Rng::with_seed(1);
        let empty: [u8; 0] = [];
        assert!(random_object(&empty, &mut rng).is_none());
        let items = ["a", "b", "c"];
        let picked = random_object(&items, &mut rng).unwrap();
        assert!(items.contains(picked));
    }

    #[test]
    fn random_sound_is_queued_within_pitch_range() {
        let mut world = World::new();
        world.init_resource::<Messages<AudioCmd>>();
        let mut rng = fastrand::Rng::with_seed(4);
        let sounds = vec!["step1".to_string(), "step2".to_string()];

        let id = play_random_sound(&mut world, &sounds, (0.9, 1.1), &mut rng).unwrap();
        let queued: Vec<AudioCmd> = world.resource_mut::<Messages<AudioCmd>>().drain().collect();
        assert_eq!(queued.len(), 1);
        let AudioCmd::PlayFx { id: played, pitch } = &queued[0];
        assert_eq!(played, &id);
        assert!(sounds.contains(played));
        assert!((0.9..=1.1).contains(pitch));

        assert!(play_random_sound(&mut world, &[], (1.0, 1.0), &mut rng).is_none());
    }

    #[test]
    fn parent_of_child_and_root() {
        let mut world = World::new();
        let root = world.spawn_empty().id();
        let child = world.spawn(ChildOf(root)).id();
        assert_eq!(get_parent(&world, child), Some(root));
        assert_eq!(get_parent(&world, root), None);
    }

    #[test]
    fn type_aliases() {
        assert_eq!(type_alias::<f32>(), "f32");
        assert_eq!(type_alias::<bool>(), "bool");
        assert_eq!(type_alias::<String>(), "String");
        assert_eq!(type_alias::<[f32; 3]>(), "Vector3");
    }

    #[test]
    fn activate_toggles_disabled() {
        let mut world = World::new();
        let entity = world.spawn_empty().id();
        assert!(is_active(&world, entity));

        activate(&mut world, entity, false);
        assert!(!is_active(&world, entity));
        assert!(world.entity(entity).contains::<Disabled>());

        activate(&mut world, entity, true);
        assert!(is_active(&world, entity));

        world.despawn(entity);
        assert!(!is_active(&world, entity));
        activate(&mut world, entity, true);
    }
}
