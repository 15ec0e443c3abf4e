//! Event and message types.
//!
//! Submodules:
//! - [`activation`] – an entity was re-activated
//! - [`audio`] – sound requests for the audio backend
//! - [`message`] – upward messages and their dispatch results
//! - [`trigger`] – colliders entering and leaving trigger volumes
pub mod activation;
pub mod audio;
pub mod message;
pub mod trigger;
