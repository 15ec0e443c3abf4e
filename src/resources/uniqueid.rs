//! Unique ID generator resource.
//!
//! [`UniqueIds`] hands out random positive integers that are guaranteed not
//! to repeat until the whole range has been used. It replaces a process-wide
//! dictionary with state owned by the world, so separate worlds (and separate
//! tests) never share IDs.

use bevy_ecs::prelude::Resource;
use log::warn;
use rustc_hash::FxHashSet;

/// Upper bound (exclusive) of generated IDs.
pub const UNIQUE_ID_RANGE: i32 = 1_000_000_000;

/// Non-repeating random ID generator.
#[derive(Resource, Debug)]
pub struct UniqueIds {
    rng: fastrand::Rng,
    issued: FxHashSet<i32>,
    range: i32,
}

impl Default for UniqueIds {
    fn default() -> Self {
        Self::new()
    }
}

impl UniqueIds {
    /// Generator seeded from the OS.
    pub fn new() -> Self {
        Self::from_rng(fastrand::Rng::new(), UNIQUE_ID_RANGE)
    }

    /// Deterministic generator.
    pub fn with_seed(seed: u64) -> Self {
        Self::from_rng(fastrand::Rng::with_seed(seed), UNIQUE_ID_RANGE)
    }

    /// Deterministic generator over `[0, range)`.
    pub fn with_seed_and_range(seed: u64, range: i32) -> Self {
        Self::from_rng(fastrand::Rng::with_seed(seed), range.max(1))
    }

    fn from_rng(rng: fastrand::Rng, range: i32) -> Self {
        Self {
            rng,
            issued: FxHashSet::default(),
            range,
        }
    }

    /// A positive integer not returned before by this generator.
    ///
    /// Once every value in the range has been issued, the history is cleared
    /// and generation starts over.
    pub fn next_id(&mut self) -> i32 {
        loop {
            if self.issued.len() >= self.range as usize {
                warn!(
                    "{} unique IDs have been generated, clearing history and starting over",
                    self.issued.len()
                );
                self.clear();
            }
            let id = self.rng.i32(0..self.range);
            if self.issued.insert(id) {
                return id;
            }
        }
    }

    /// Forget every issued ID.
    pub fn clear(&mut self) {
        self.issued.clear();
    }

    pub fn contains(&self, id: i32) -> bool {
        self.issued.contains(&id)
    }

    /// Number of IDs issued since the last clear.
    pub fn len(&self) -> usize {
        self.issued.len()
    }

    pub fn is_empty(&self) -> bool {
        self.issued.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_do_not_repeat_within_range() {
        let mut ids = UniqueIds::with_seed_and_range(3, 64);
        let mut seen = FxHashSet::default();
        for _ in 0..64 {
            let id = ids.next_id();
            assert!((0..64).contains(&id));
            assert!(seen.insert(id), "id {id} issued twice");
        }
        assert_eq!(ids.len(), 64);
    }

    #[test]
    fn exhausted_range_starts_over() {
        let mut ids = UniqueIds::with_seed_and_range(11, 4);
        for _ in 0..4 {
            ids.next_id();
        }
        let id = ids.next_id();
        assert!((0..4).contains(&id));
        assert_eq!(ids.len(), 1);
        assert!(ids.contains(id));
    }

    #[test]
    fn same_seed_same_sequence() {
        let mut a = UniqueIds::with_seed(42);
        let mut b = UniqueIds::with_seed(42);
        let first: Vec<i32> = (0..8).map(|_| a.next_id()).collect();
        let second: Vec<i32> = (0..8).map(|_| b.next_id()).collect();
        assert_eq!(first, second);
        assert!(first.iter().all(|id| *id >= 0 && *id < UNIQUE_ID_RANGE));
    }

    #[test]
    fn clear_forgets_history() {
        let mut ids = UniqueIds::with_seed(1);
        let id = ids.next_id();
        ids.clear();
        assert!(ids.is_empty());
        assert!(!ids.contains(id));
    }
}
