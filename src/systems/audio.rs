//! Audio command queue maintenance.
//!
//! Pickups write [`AudioCmd`] messages; playing them is up to whatever audio
//! backend the host has. This module only keeps the queue healthy and offers
//! a logging stand-in backend used by the demo binary.
//!
//! - [`update_audio_cmds`] swaps the double buffer of `Messages<AudioCmd>` once
//!   per frame so unread commands don't pile up.
//! - [`log_audio_cmds`] reads this frame's commands and logs them.

use bevy_ecs::message::MessageReader;
use bevy_ecs::prelude::*;
use log::info;

use crate::events::audio::AudioCmd;

/// Advance the `Messages<AudioCmd>` buffers.
///
/// Bevy ECS' [`Messages`] API requires calling `update()` once per frame to
/// drop messages that were never read.
pub fn update_audio_cmds(mut msgs: ResMut<Messages<AudioCmd>>) {
    msgs.update();
}

/// Log every audio command written since the last run.
pub fn log_audio_cmds(mut reader: MessageReader<AudioCmd>) {
    for cmd in reader.read() {
        match cmd {
            AudioCmd::PlayFx { id, pitch } => info!("play fx '{}' at pitch {:.2}", id, pitch),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unread_commands_are_dropped_after_two_updates() {
        let mut world = World::new();
        world.init_resource::<Messages<AudioCmd>>();
        world.resource_mut::<Messages<AudioCmd>>().write(AudioCmd::PlayFx {
            id: "pickup".into(),
            pitch: 1.0,
        });

        let mut schedule = Schedule::default();
        schedule.add_systems(update_audio_cmds);
        schedule.run(&mut world);
        assert_eq!(world.resource::<Messages<AudioCmd>>().len(), 1);
        schedule.run(&mut world);
        assert!(world.resource::<Messages<AudioCmd>>().is_empty());
    }
}
