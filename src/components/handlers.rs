//! Per-entity message handler registry.
//!
//! The [`Handlers`] component turns an entity into a message receiver. Each
//! handler is a one-shot system registered under a capability name and a
//! typed [`Signature`]. Upward dispatch (see
//! [`crate::systems::dispatch`]) walks from a starting entity through its
//! [`ChildOf`](bevy_ecs::hierarchy::ChildOf) ancestors and runs the first
//! handler whose name and signature both match.
//!
//! Handlers under the same name with different signatures coexist; selection
//! is by exact signature only.
//!
//! # Handler Signature
//!
//! A handler for arguments `A` returning `R` is any system taking
//! `In<Call<A>>` and returning `R`:
//!
//! ```ignore
//! fn get_item_count(
//!     In(call): In<Call<ItemType>>,
//!     inventories: Query<&Inventory>,
//! ) -> i32 {
//!     inventories
//!         .get(call.owner)
//!         .map(|inv| inv.count(&call.args.name))
//!         .unwrap_or(0)
//! }
//! ```

use std::any::{Any, TypeId, type_name};
use std::fmt;
use std::hash::{Hash, Hasher};

use bevy_ecs::prelude::*;
use bevy_ecs::system::{SystemId, SystemInput};
use rustc_hash::FxHashMap;

/// Input handed to an upward message handler.
#[derive(Debug, Clone, PartialEq)]
pub struct Call<A> {
    /// The entity the handler is registered on.
    pub owner: Entity,
    /// The entity the dispatch started from.
    pub sender: Entity,
    /// The message arguments.
    pub args: A,
}

/// Typed id of a registered upward handler.
pub type HandlerId<A, R> = SystemId<In<Call<A>>, R>;

/// Argument and result types of a handler or message.
///
/// Equality and hashing consider only the [`TypeId`]s; the type names are kept
/// for log and error output.
#[derive(Clone, Copy)]
pub struct Signature {
    args: TypeId,
    result: TypeId,
    args_name: &'static str,
    result_name: &'static str,
}

impl Signature {
    /// Signature of a handler taking `A` and returning `R`.
    pub fn of<A: 'static, R: 'static>() -> Self {
        Self {
            args: TypeId::of::<A>(),
            result: TypeId::of::<R>(),
            args_name: type_name::<A>(),
            result_name: type_name::<R>(),
        }
    }

    pub fn args_name(&self) -> &'static str {
        self.args_name
    }

    pub fn result_name(&self) -> &'static str {
        self.result_name
    }
}

impl PartialEq for Signature {
    fn eq(&self, other: &Self) -> bool {
        self.args == other.args && self.result == other.result
    }
}

impl Eq for Signature {}

impl Hash for Signature {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.args.hash(state);
        self.result.hash(state);
    }
}

impl fmt::Debug for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "fn({}) -> {}", self.args_name, self.result_name)
    }
}

impl fmt::Display for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

/// A registered system id with its input/output types erased.
///
/// Keeps the system's entity so it can be despawned (and thereby unregistered)
/// without knowing its types.
pub struct ErasedSystem {
    entity: Entity,
    id: Box<dyn Any + Send + Sync>,
}

impl ErasedSystem {
    pub(crate) fn new<I, O>(id: SystemId<I, O>) -> Self
    where
        I: SystemInput + 'static,
        O: 'static,
    {
        Self {
            entity: id.entity(),
            id: Box::new(id),
        }
    }

    /// Recover the typed id. `None` when `I`/`O` do not match the registration.
    pub(crate) fn typed<I, O>(&self) -> Option<SystemId<I, O>>
    where
        I: SystemInput + 'static,
        O: 'static,
    {
        self.id.downcast_ref::<SystemId<I, O>>().copied()
    }

    /// The entity holding the registered system.
    pub fn entity(&self) -> Entity {
        self.entity
    }
}

impl fmt::Debug for ErasedSystem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ErasedSystem")
            .field("entity", &self.entity)
            .finish()
    }
}

/// Message handlers registered on an entity, keyed by name then signature.
///
/// Mutate through [`register_handler`](crate::systems::dispatch::register_handler)
/// and [`unregister_handler`](crate::systems::dispatch::unregister_handler) so
/// the handler systems and the dispatch cache stay in sync.
#[derive(Component, Debug, Default)]
pub struct Handlers {
    by_name: FxHashMap<String, FxHashMap<Signature, ErasedSystem>>,
}

impl Handlers {
    /// Whether a handler for `name` with exactly `signature` exists.
    pub fn contains(&self, name: &str, signature: &Signature) -> bool {
        self.by_name
            .get(name)
            .is_some_and(|sigs| sigs.contains_key(signature))
    }

    /// Typed id of the handler for `name` taking `A` and returning `R`.
    pub fn get<A, R>(&self, name: &str) -> Option<HandlerId<A, R>>
    where
        A: Send + 'static,
        R: 'static,
    {
        self.by_name
            .get(name)?
            .get(&Signature::of::<A, R>())?
            .typed::<In<Call<A>>, R>()
    }

    /// Store a handler. Returns the one it displaced, if any.
    pub(crate) fn insert(
        &mut self,
        name: String,
        signature: Signature,
        system: ErasedSystem,
    ) -> Option<ErasedSystem> {
        self.by_name
            .entry(name)
            .or_default()
            .insert(signature, system)
    }

    pub(crate) fn remove(&mut self, name: &str, signature: &Signature) -> Option<ErasedSystem> {
        let sigs = self.by_name.get_mut(name)?;
        let removed = sigs.remove(signature);
        if sigs.is_empty() {
            self.by_name.remove(name);
        }
        removed
    }

    /// Entities of every registered handler system.
    pub fn system_entities(&self) -> impl Iterator<Item = Entity> + '_ {
        self.by_name
            .values()
            .flat_map(|sigs| sigs.values().map(ErasedSystem::entity))
    }

    /// Registered capability names.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.by_name.keys().map(String::as_str)
    }

    /// Number of handlers across all names and signatures.
    pub fn len(&self) -> usize {
        self.by_name.values().map(FxHashMap::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.by_name.is_empty()
    }
}
