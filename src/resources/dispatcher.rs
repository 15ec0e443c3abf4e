//! Dispatcher resource: settings and lookup cache for upward dispatch.
//!
//! The [`Dispatcher`] holds no handlers itself; they live on entities in
//! [`Handlers`](crate::components::handlers::Handlers) components. It only
//! remembers which ancestor answered a given (sender, message) pair so that
//! repeated dispatches (every trigger enter asks the same collider for its
//! inventory) skip the walk.
//!
//! # Invalidation
//!
//! The whole cache is dropped whenever handlers are registered or removed and
//! whenever a [`ChildOf`](bevy_ecs::hierarchy::ChildOf) link is inserted or
//! replaced (see [`crate::systems::cache`]). Cache hits are additionally
//! validated against the world before use, so a despawned owner is never
//! returned.

use bevy_ecs::prelude::*;
use log::trace;
use rustc_hash::FxHashMap;

use crate::components::handlers::Signature;
use crate::events::message::Reach;
use crate::resources::messagingconfig::{DuplicatePolicy, MessagingConfig};

type CacheKey = (Entity, Reach, Signature);

/// Upward dispatch settings and resolution cache.
#[derive(Resource, Debug)]
pub struct Dispatcher {
    /// Whether resolutions are memoized.
    pub cache_enabled: bool,
    /// Maximum number of parent links followed by one walk.
    pub max_depth: usize,
    /// Policy for registering a handler twice on one entity.
    pub duplicates: DuplicatePolicy,
    cache: FxHashMap<CacheKey, FxHashMap<String, Entity>>,
    hits: u64,
    misses: u64,
}

impl Default for Dispatcher {
    fn default() -> Self {
        Self::new(&MessagingConfig::default())
    }
}

impl Dispatcher {
    pub fn new(config: &MessagingConfig) -> Self {
        Self {
            cache_enabled: config.cache_enabled,
            max_depth: config.max_depth,
            duplicates: config.duplicates,
            cache: FxHashMap::default(),
            hits: 0,
            misses: 0,
        }
    }

    /// Previously resolved owner for this sender and message, if any.
    pub fn cached(
        &self,
        sender: Entity,
        reach: Reach,
        signature: Signature,
        name: &str,
    ) -> Option<Entity> {
        self.cache
            .get(&(sender, reach, signature))?
            .get(name)
            .copied()
    }

    pub fn remember(
        &mut self,
        sender: Entity,
        reach: Reach,
        signature: Signature,
        name: &str,
        owner: Entity,
    ) {
        self.cache
            .entry((sender, reach, signature))
            .or_default()
            .insert(name.to_string(), owner);
    }

    pub fn forget(&mut self, sender: Entity, reach: Reach, signature: Signature, name: &str) {
        let key = (sender, reach, signature);
        if let Some(names) = self.cache.get_mut(&key) {
            names.remove(name);
            if names.is_empty() {
                self.cache.remove(&key);
            }
        }
    }

    /// Drop every cached resolution.
    pub fn invalidate(&mut self) {
        if !self.cache.is_empty() {
            trace!("dispatch cache invalidated ({} senders)", self.cache.len());
            self.cache.clear();
        }
    }

    /// Number of cached (sender, message) resolutions.
    pub fn cached_len(&self) -> usize {
        self.cache.values().map(FxHashMap::len).sum()
    }

    pub(crate) fn record_hit(&mut self) {
        self.hits += 1;
    }

    pub(crate) fn record_miss(&mut self) {
        self.misses += 1;
    }

    /// Dispatches answered from the cache.
    pub fn hits(&self) -> u64 {
        self.hits
    }

    /// Dispatches that had to walk the hierarchy.
    pub fn misses(&self) -> u64 {
        self.misses
    }
}
