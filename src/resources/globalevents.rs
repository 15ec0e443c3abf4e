//! Global (tree-independent) event listener registry.
//!
//! Where upward dispatch targets the nearest ancestor that can answer,
//! [`GlobalEvents`] broadcasts to every listener registered under a name,
//! regardless of where anything sits in the hierarchy. It is used for
//! fire-and-forget notifications such as HUD text and for reaching singleton
//! services like the object pool.
//!
//! Listeners are one-shot systems taking `In<A>` and returning `R`, keyed by
//! name and [`Signature`]. See [`crate::systems::globalevents`] for the
//! register/send functions.

use bevy_ecs::prelude::*;
use bevy_ecs::system::SystemId;
use rustc_hash::FxHashMap;
use smallvec::SmallVec;

use crate::components::handlers::{ErasedSystem, Signature};

/// Typed id of a registered global listener.
pub type ListenerId<A, R> = SystemId<In<A>, R>;

type Listeners = SmallVec<[ErasedSystem; 4]>;

/// Global listeners by name and signature, in registration order.
#[derive(Resource, Debug, Default)]
pub struct GlobalEvents {
    by_name: FxHashMap<String, FxHashMap<Signature, Listeners>>,
}

impl GlobalEvents {
    pub(crate) fn add(&mut self, name: String, signature: Signature, listener: ErasedSystem) {
        self.by_name
            .entry(name)
            .or_default()
            .entry(signature)
            .or_default()
            .push(listener);
    }

    /// Remove the listener whose system lives on `system`.
    pub(crate) fn remove(
        &mut self,
        name: &str,
        signature: &Signature,
        system: Entity,
    ) -> Option<ErasedSystem> {
        let sigs = self.by_name.get_mut(name)?;
        let listeners = sigs.get_mut(signature)?;
        let index = listeners.iter().position(|l| l.entity() == system)?;
        let removed = listeners.remove(index);
        if listeners.is_empty() {
            sigs.remove(signature);
        }
        if sigs.is_empty() {
            self.by_name.remove(name);
        }
        Some(removed)
    }

    /// Typed ids of all listeners for `name` taking `A` and returning `R`.
    pub fn listeners<A, R>(&self, name: &str) -> SmallVec<[ListenerId<A, R>; 4]>
    where
        A: 'static,
        R: 'static,
    {
        self.by_name
            .get(name)
            .and_then(|sigs| sigs.get(&Signature::of::<A, R>()))
            .map(|listeners| {
                listeners
                    .iter()
                    .filter_map(ErasedSystem::typed::<In<A>, R>)
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Number of listeners under `name`, across signatures.
    pub fn listener_count(&self, name: &str) -> usize {
        self.by_name
            .get(name)
            .map(|sigs| sigs.values().map(SmallVec::len).sum())
            .unwrap_or(0)
    }

    /// Remove every listener, returning their system entities.
    pub(crate) fn drain(&mut self) -> Vec<Entity> {
        self.by_name
            .drain()
            .flat_map(|(_, sigs)| sigs.into_values())
            .flat_map(|listeners| listeners.into_iter().map(|l| l.entity()))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hud(In(_text): In<String>) {}

    fn count(In(_text): In<String>) -> usize {
        1
    }

    #[test]
    fn listeners_are_kept_in_order_and_typed() {
        let mut world = World::new();
        let first = world.register_system(hud);
        let second = world.register_system(hud);
        let returning = world.register_system(count);

        let mut events = GlobalEvents::default();
        events.add(
            "HUDText".into(),
            Signature::of::<String, ()>(),
            ErasedSystem::new(first),
        );
        events.add(
            "HUDText".into(),
            Signature::of::<String, ()>(),
            ErasedSystem::new(second),
        );
        events.add(
            "HUDText".into(),
            Signature::of::<String, usize>(),
            ErasedSystem::new(returning),
        );

        let ids = events.listeners::<String, ()>("HUDText");
        assert_eq!(ids.as_slice(), &[first, second]);
        assert_eq!(events.listeners::<String, usize>("HUDText").len(), 1);
        assert!(events.listeners::<i32, ()>("HUDText").is_empty());
        assert_eq!(events.listener_count("HUDText"), 3);
    }

    #[test]
    fn remove_and_drain() {
        let mut world = World::new();
        let first = world.register_system(hud);
        let second = world.register_system(hud);
        let sig = Signature::of::<String, ()>();

        let mut events = GlobalEvents::default();
        events.add("HUDText".into(), sig, ErasedSystem::new(first));
        events.add("HUDText".into(), sig, ErasedSystem::new(second));

        assert!(events.remove("HUDText", &sig, first.entity()).is_some());
        assert!(events.remove("HUDText", &sig, first.entity()).is_none());
        assert_eq!(events.listener_count("HUDText"), 1);

        let drained = events.drain();
        assert_eq!(drained, vec![second.entity()]);
        assert_eq!(events.listener_count("HUDText"), 0);
    }
}
