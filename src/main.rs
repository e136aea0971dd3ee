//! inkpin headless runner.
//!
//! Loads a configuration and a scene, then runs the frame driver for a fixed
//! number of frames and reports what happened. Useful to check tuning values
//! without a renderer:
//!
//! ```sh
//! cargo run --release -- --scene scenes/demo.json --demo --frames 600
//! ```

use std::path::PathBuf;

use bevy_ecs::prelude::*;
use clap::Parser;
use log::{debug, error, info, warn};

use inkpin::components::mapposition::MapPosition;
use inkpin::components::rigidbody::RigidBody;
use inkpin::components::stroke::Stroke;
use inkpin::events::stroke::{STROKES_COMPLETED_SIGNAL, STROKES_DISCARDED_SIGNAL};
use inkpin::game::{FrameDriver, SceneDescription, build_world, change_state};
use inkpin::resources::gameconfig::GameConfig;
use inkpin::resources::gamestate::GameStates;
use inkpin::resources::pinregistry::PinRegistry;
use inkpin::resources::worldsignals::WorldSignals;
use inkpin::resources::worldtime::WorldTime;

/// Draw-to-physics stroke sandbox
#[derive(Parser)]
#[command(version, about = "Runs an inkpin scene headless and reports the outcome.")]
struct Cli {
    /// INI configuration file. Defaults to ./config.ini when present.
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// JSON scene file. The built-in demo scene is used when omitted.
    #[arg(long, value_name = "PATH")]
    scene: Option<PathBuf>,

    /// Number of frames to run.
    #[arg(long, default_value_t = 600)]
    frames: u32,

    /// Seconds per frame.
    #[arg(long, default_value_t = 1.0 / 60.0)]
    frame_dt: f32,

    /// Multiplier applied to every frame delta.
    #[arg(long, default_value_t = 1.0)]
    time_scale: f32,

    /// Start in demo mode so the scripted hand draws.
    #[arg(long)]
    demo: bool,
}

fn load_config(path: Option<PathBuf>) -> Result<GameConfig, inkpin::error::ConfigError> {
    match path {
        Some(path) => {
            let mut config = GameConfig::with_path(path);
            config.load_from_file()?;
            Ok(config)
        }
        None => {
            let mut config = GameConfig::new();
            if config.config_path.exists()
                && let Err(e) = config.load_from_file()
            {
                warn!("Ignoring {}: {}", config.config_path.display(), e);
                config = GameConfig::new();
            }
            Ok(config)
        }
    }
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    let config = match load_config(cli.config) {
        Ok(config) => config,
        Err(e) => {
            error!("{e}");
            eprintln!("Error: {e}");
            std::process::exit(1);
        }
    };
    let scene = match cli.scene {
        Some(path) => match SceneDescription::load(&path) {
            Ok(scene) => scene,
            Err(e) => {
                eprintln!("Error: {e}");
                std::process::exit(1);
            }
        },
        None => SceneDescription::demo(),
    };

    let mut world = build_world(config);
    let time = *world.resource::<WorldTime>();
    world.insert_resource(time.with_time_scale(cli.time_scale.max(0.0)));
    scene.spawn_into(&mut world);
    let state = if cli.demo {
        GameStates::Demo
    } else {
        GameStates::Playing
    };
    change_state(&mut world, state);

    let mut driver = FrameDriver::new();
    let mut physics_steps = 0u64;
    for _ in 0..cli.frames {
        physics_steps += u64::from(driver.tick(&mut world, cli.frame_dt));
    }

    log_stroke_poses(&mut world);

    let signals = world.resource::<WorldSignals>();
    let completed = signals.get_integer(STROKES_COMPLETED_SIGNAL).unwrap_or(0);
    let discarded = signals.get_integer(STROKES_DISCARDED_SIGNAL).unwrap_or(0);
    let joints = world.resource::<PinRegistry>().joint_count();
    info!(
        "Ran {} frames ({} physics steps): {} strokes completed, {} discarded, {} joints alive",
        cli.frames, physics_steps, completed, discarded, joints
    );
}

/// Where a renderer would draw each stroke this frame.
fn log_stroke_poses(world: &mut World) {
    let alpha = world.resource::<WorldTime>().alpha();
    let mut strokes = world.query_filtered::<(Entity, &RigidBody, &MapPosition), With<Stroke>>();
    for (entity, body, position) in strokes.iter(world) {
        let drawn = if body.interpolate {
            body.interpolated_position(position.pos, alpha)
        } else {
            position.pos
        };
        debug!("Stroke {:?} at {:?}", entity, drawn);
    }
}
