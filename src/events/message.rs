//! Message and result types for upward dispatch.
//!
//! A [`Message`] is built per dispatch call and consumed by delivery. The
//! result type `R` is part of the message's type so the dispatcher can match
//! handlers by exact signature.

use std::marker::PhantomData;

use bevy_ecs::prelude::Entity;

/// Where the upward walk starts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Reach {
    /// The starting entity itself is the first candidate.
    #[default]
    IncludeSelf,
    /// Skip the starting entity and begin at its parent.
    AncestorsOnly,
}

/// A named message carrying arguments `A` and expecting a result `R`.
#[derive(Debug, Clone)]
pub struct Message<A, R> {
    name: String,
    args: A,
    reach: Reach,
    _result: PhantomData<fn() -> R>,
}

impl<A, R> Message<A, R> {
    pub fn new(name: impl Into<String>, args: A) -> Self {
        Self {
            name: name.into(),
            args,
            reach: Reach::IncludeSelf,
            _result: PhantomData,
        }
    }

    /// Start the walk at the sender's parent instead of the sender.
    pub fn ancestors_only(mut self) -> Self {
        self.reach = Reach::AncestorsOnly;
        self
    }

    pub fn with_reach(mut self, reach: Reach) -> Self {
        self.reach = reach;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn args(&self) -> &A {
        &self.args
    }

    pub fn reach(&self) -> Reach {
        self.reach
    }

    pub(crate) fn into_parts(self) -> (String, A, Reach) {
        (self.name, self.args, self.reach)
    }
}

/// Outcome of a dispatch.
#[derive(Debug, Clone, PartialEq)]
pub enum DispatchResult<R> {
    /// A handler ran. `owner` is the entity it is registered on (for global
    /// events, the listener's system entity).
    Handled { owner: Entity, value: R },
    /// Nothing on the path (or no listener) matched.
    Unhandled,
}

impl<R> DispatchResult<R> {
    pub fn is_handled(&self) -> bool {
        matches!(self, DispatchResult::Handled { .. })
    }

    pub fn owner(&self) -> Option<Entity> {
        match self {
            DispatchResult::Handled { owner, .. } => Some(*owner),
            DispatchResult::Unhandled => None,
        }
    }

    pub fn value(self) -> Option<R> {
        match self {
            DispatchResult::Handled { value, .. } => Some(value),
            DispatchResult::Unhandled => None,
        }
    }
}

impl<R: Default> DispatchResult<R> {
    /// The handler's value, or `R::default()` when unhandled.
    pub fn into_value_or_default(self) -> R {
        self.value().unwrap_or_default()
    }
}
