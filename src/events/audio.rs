//! Sound requests.
//!
//! Playback is outside this crate. Gameplay code writes [`AudioCmd`]
//! messages into `Messages<AudioCmd>`; an audio backend (or a test) reads
//! them.

use bevy_ecs::message::Message;

/// Commands for the audio backend.
#[derive(Message, Debug, Clone, PartialEq)]
pub enum AudioCmd {
    /// Play a sound effect once at the given pitch.
    PlayFx { id: String, pitch: f32 },
}
