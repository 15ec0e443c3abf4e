//! Error types for the messaging layer and its configuration.
//!
//! Unmatched messages are never errors: [`send_upwards`] falls back to the
//! result type's default. Only structural problems surface as
//! [`DispatchError`].
//!
//! [`send_upwards`]: crate::systems::dispatch::send_upwards

use bevy_ecs::prelude::Entity;
use thiserror::Error;

/// Errors returned by handler registration and upward dispatch.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DispatchError {
    /// The starting (or owning) entity does not exist in the world.
    #[error("entity {0:?} does not exist")]
    InvalidNode(Entity),
    /// Messages and handlers must have a non-empty name.
    #[error("message name is empty")]
    EmptyName,
    /// A handler with the same name and signature already exists on the entity
    /// and the duplicate policy is `reject`.
    #[error("handler '{name}' {signature} is already registered on this entity")]
    AmbiguousRegistration { name: String, signature: String },
    /// The matched handler system could not be run.
    #[error("handler '{name}' failed to run: {reason}")]
    HandlerFailed { name: String, reason: String },
}

/// Errors raised while loading or saving [`MessagingConfig`].
///
/// [`MessagingConfig`]: crate::resources::messagingconfig::MessagingConfig
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("failed to load config file: {0}")]
    Load(String),
    #[error("failed to save config file: {0}")]
    Save(String),
    #[error("invalid value '{value}' for '{key}'")]
    Invalid { key: String, value: String },
}
