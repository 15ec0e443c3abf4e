//! upsend library.
//!
//! Name-based upward message dispatch over a `bevy_ecs` entity hierarchy,
//! plus the gameplay pieces built on it: global events, an object pool,
//! unique IDs, utility helpers, and item pickups. The modules are public for
//! use by the demo binary and the integration tests.

pub mod components;
pub mod error;
pub mod events;
pub mod game;
pub mod resources;
pub mod setup;
pub mod systems;
pub mod utility;
