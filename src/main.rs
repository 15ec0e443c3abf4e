//! upsend demo binary.
//!
//! Builds a world, installs the messaging layer from `config.ini`, spawns the
//! demo scene from [`upsend::game`], and runs it for a fixed number of frames
//! while logging HUD text, sounds and inventory contents.

use std::path::PathBuf;
use std::process::ExitCode;

use bevy_ecs::prelude::*;
use clap::Parser;

use upsend::game::{run_demo_frame, spawn_demo_scene};
use upsend::resources::dispatcher::Dispatcher;
use upsend::resources::messagingconfig::MessagingConfig;
use upsend::resources::pool::PoolManager;
use upsend::setup::{install_messaging, messaging_schedule, teardown_messaging};
use upsend::systems::audio::log_audio_cmds;
use upsend::systems::destroyafter::destroy_after_system;

/// Upward message dispatch demo.
#[derive(Parser)]
#[command(version, about = "Runs the upward message dispatch demo scene.")]
struct Cli {
    /// INI file with [dispatch], [pool] and [ids] settings.
    #[arg(long, value_name = "PATH", default_value = "./config.ini")]
    config: PathBuf,

    /// Number of frames to simulate.
    #[arg(long, default_value_t = 3)]
    frames: u32,

    /// Seed for unique ID generation (overrides the config file).
    #[arg(long)]
    seed: Option<u64>,
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    let mut config = MessagingConfig::with_path(&cli.config);
    if let Err(e) = config.load_from_file() {
        // Missing file is fine, defaults apply.
        log::warn!("{}", e);
    }
    if cli.seed.is_some() {
        config.id_seed = cli.seed;
    }

    let mut world = World::new();
    if let Err(e) = install_messaging(&mut world, &config) {
        log::error!("failed to install messaging: {}", e);
        return ExitCode::FAILURE;
    }

    let mut scene = match spawn_demo_scene(&mut world) {
        Ok(scene) => scene,
        Err(e) => {
            log::error!("failed to build the demo scene: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let mut schedule = messaging_schedule();
    schedule.add_systems(log_audio_cmds.before(destroy_after_system));

    for frame in 0..cli.frames {
        log::info!("--- frame {} ---", frame);
        run_demo_frame(&mut world, &mut scene, &mut schedule);
    }

    if let Some(dispatcher) = world.get_resource::<Dispatcher>() {
        log::info!(
            "dispatch cache: {} hits, {} misses",
            dispatcher.hits(),
            dispatcher.misses()
        );
    }
    if let Some(pool) = world.get_resource::<PoolManager>() {
        log::info!(
            "pool: {} spawned, {} recycled",
            pool.spawned(),
            pool.recycled()
        );
    }

    teardown_messaging(&mut world);
    ExitCode::SUCCESS
}
