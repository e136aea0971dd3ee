//! World assembly, scene spawning and the frame driver.
//!
//! [`build_world`] inserts every resource and observer the stroke pipeline
//! needs. Scene objects are spawned through the `spawn_*` helpers, either
//! directly or from a JSON [`SceneDescription`]. [`FrameDriver::tick`] then
//! advances the world by one rendered frame.

use std::path::Path;

use bevy_ecs::message::Messages;
use bevy_ecs::observer::Observer;
use bevy_ecs::prelude::*;
use glam::Vec2;
use log::info;
use serde::{Deserialize, Serialize};

use crate::components::bodytag::BodyTag;
use crate::components::collider::Collider;
use crate::components::demohand::DemoHand;
use crate::components::drawzone::DrawZone;
use crate::components::gear::Gear;
use crate::components::globaltransform2d::GlobalTransform2D;
use crate::components::lift::Lift;
use crate::components::mapposition::MapPosition;
use crate::components::rigidbody::RigidBody;
use crate::components::rotation::Rotation;
use crate::error::ConfigError;
use crate::events::gamestate::{GameStateChangedEvent, observe_gamestate_change_event};
use crate::events::input::PointerSample;
use crate::events::level::level_unload_observer;
use crate::events::stroke::stroke_completed_observer;
use crate::resources::contactstate::ContactState;
use crate::resources::drawstate::DrawState;
use crate::resources::gameconfig::{GameConfig, LayerNames};
use crate::resources::gamestate::{GameState, GameStates, NextGameState};
use crate::resources::pinregistry::PinRegistry;
use crate::resources::tagregistry::TagRegistry;
use crate::resources::worldsignals::WorldSignals;
use crate::resources::worldtime::WorldTime;
use crate::systems::attachment::{contact_observer, joint_break_observer};
use crate::systems::collision::detect_contacts;
use crate::systems::demohand::demo_hand_system;
use crate::systems::gamestate::{check_pending_state, state_is_demo};
use crate::systems::gear::gear_auto_rotate;
use crate::systems::input::pointer_input;
use crate::systems::joints::solve_joints;
use crate::systems::lift::lift_motion;
use crate::systems::physics::{derive_velocities, integrate_bodies};
use crate::systems::propagate_transforms::propagate_transforms;
use crate::systems::time::{update_timers, update_world_time};
use crate::systems::zone::{zone_fade_system, zone_timer_observer};

/// Angular drag of free-spinning gears.
const GEAR_ANGULAR_DRAG: f32 = 0.05;

/// Create a world holding `config` and every resource and observer the game
/// relies on.
pub fn build_world(config: GameConfig) -> World {
    let mut world = World::new();

    let mut tags = TagRegistry::from_layers(&config.layers);
    tags.validate();

    world.insert_resource(WorldTime::default().with_fixed_delta(config.fixed_timestep));
    world.insert_resource(config);
    world.insert_resource(tags);
    world.insert_resource(DrawState::default());
    world.insert_resource(PinRegistry::default());
    world.insert_resource(ContactState::default());
    world.insert_resource(WorldSignals::default());
    world.insert_resource(GameState::new());
    world.insert_resource(NextGameState::new());
    world.init_resource::<Messages<PointerSample>>();

    world.spawn(Observer::new(observe_gamestate_change_event));
    world.spawn(Observer::new(contact_observer));
    world.spawn(Observer::new(joint_break_observer));
    world.spawn(Observer::new(stroke_completed_observer));
    world.spawn(Observer::new(zone_timer_observer));
    world.spawn(Observer::new(level_unload_observer));
    world.flush();

    world
}

/// Request a state change and apply it right away.
pub fn change_state(world: &mut World, state: GameStates) {
    world.resource_mut::<NextGameState>().set(state);
    world.trigger(GameStateChangedEvent {});
    world.flush();
}

/// Tag of the layer `role` picks out of the configured layer names.
fn role_tag(world: &World, role: fn(&LayerNames) -> &String) -> BodyTag {
    let layers = &world.resource::<GameConfig>().layers;
    world.resource::<TagRegistry>().classify(role(layers))
}

/// Spawn a drawing zone covering `size` from its bottom-left corner `min`.
pub fn spawn_zone(world: &mut World, min: Vec2, size: Vec2) -> Entity {
    let tag = role_tag(world, |l| &l.draw_zone);
    world
        .spawn((
            DrawZone::default(),
            MapPosition::from_vec(min),
            Rotation::default(),
            GlobalTransform2D::new(min, 0.0),
            Collider::rect(size.x, size.y).as_sensor(),
            tag,
        ))
        .id()
}

/// A gear with the configured pin capacity, thresholds and impulse.
pub fn configured_gear(config: &GameConfig) -> Gear {
    let mut gear = Gear::new(config.max_pins)
        .with_break_thresholds(config.break_force, config.break_torque);
    gear.down_impulse = config.down_impulse;
    gear
}

/// Spawn a gear on an axle at `center`.
///
/// Self-rotating gears are kinematic. The others are dynamic bodies locked
/// in place that spin freely under the strokes hanging on them.
pub fn spawn_gear(world: &mut World, center: Vec2, radius: f32, gear: Gear) -> Entity {
    let tag = role_tag(world, |l| &l.gear);
    let body = if gear.auto_rotate.is_some() {
        RigidBody::kinematic()
    } else {
        let density = world.resource::<GameConfig>().density;
        let mass = density * std::f32::consts::PI * radius * radius;
        let mut body = RigidBody::dynamic(mass, 0.5 * mass * radius * radius);
        body.freeze_position = true;
        body.gravity_scale = 0.0;
        body.angular_drag = GEAR_ANGULAR_DRAG;
        body
    };
    world
        .spawn((
            gear,
            body,
            MapPosition::from_vec(center),
            Rotation::default(),
            GlobalTransform2D::new(center, 0.0),
            Collider::circle(radius),
            tag,
        ))
        .id()
}

/// Spawn a lift platform of `size`, centered on its start point.
pub fn spawn_lift(world: &mut World, lift: Lift, size: Vec2) -> Entity {
    let tag = role_tag(world, |l| &l.lift);
    let start = lift.point_a;
    world
        .spawn((
            lift,
            RigidBody::kinematic(),
            MapPosition::from_vec(start),
            Rotation::default(),
            GlobalTransform2D::new(start, 0.0),
            Collider::centered_rect(size.x, size.y),
            tag,
        ))
        .id()
}

/// Spawn an immovable block on `layer`.
pub fn spawn_static(world: &mut World, min: Vec2, size: Vec2, layer: &str) -> Entity {
    let tag = world.resource::<TagRegistry>().classify(layer);
    world
        .spawn((
            MapPosition::from_vec(min),
            Rotation::default(),
            GlobalTransform2D::new(min, 0.0),
            Collider::rect(size.x, size.y),
            tag,
        ))
        .id()
}

pub fn spawn_demo_hand(world: &mut World, hand: DemoHand) -> Entity {
    world.spawn(hand).id()
}

/// Runs the per-frame and fixed-step schedules.
pub struct FrameDriver {
    frame: Schedule,
    physics: Schedule,
}

impl Default for FrameDriver {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameDriver {
    pub fn new() -> Self {
        let mut frame = Schedule::default();
        frame.add_systems(
            (
                check_pending_state,
                pointer_input,
                demo_hand_system.run_if(state_is_demo),
                update_timers,
                zone_fade_system,
                propagate_transforms,
            )
                .chain(),
        );

        let mut physics = Schedule::default();
        physics.add_systems(
            (
                integrate_bodies,
                gear_auto_rotate,
                lift_motion,
                solve_joints,
                derive_velocities,
                propagate_transforms,
                detect_contacts,
            )
                .chain(),
        );

        Self { frame, physics }
    }

    /// Run one physics step regardless of the accumulator.
    pub fn step_physics(&mut self, world: &mut World) {
        self.physics.run(world);
    }

    /// Advance the world by a frame of `dt` seconds.
    ///
    /// Returns the number of physics steps taken. At most `max_substeps`
    /// run; time beyond that is dropped.
    pub fn tick(&mut self, world: &mut World, dt: f32) -> u32 {
        update_world_time(world, dt);
        self.frame.run(world);

        let max_substeps = world.resource::<GameConfig>().max_substeps;
        let mut steps = 0;
        loop {
            let time = world.resource::<WorldTime>();
            if time.fixed_delta <= 0.0 || time.accumulator < time.fixed_delta {
                break;
            }
            if steps >= max_substeps {
                let mut time = world.resource_mut::<WorldTime>();
                time.accumulator = time.accumulator.min(time.fixed_delta);
                break;
            }
            self.physics.run(world);
            let mut time = world.resource_mut::<WorldTime>();
            time.accumulator -= time.fixed_delta;
            steps += 1;
        }

        world.clear_trackers();
        steps
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ZoneDescription {
    pub min: Vec2,
    pub size: Vec2,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GearDescription {
    pub center: Vec2,
    pub radius: f32,
    /// Overrides the configured `max_pins`.
    #[serde(default)]
    pub max_pins: Option<usize>,
    /// Degrees per second; absent for a free-spinning gear.
    #[serde(default)]
    pub auto_rotate: Option<f32>,
    #[serde(default)]
    pub clockwise: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LiftDescription {
    pub from: Vec2,
    pub to: Vec2,
    pub speed: f32,
    pub size: Vec2,
    #[serde(default)]
    pub wait_at_ends: Option<f32>,
    #[serde(default)]
    pub auto_start: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BlockDescription {
    pub min: Vec2,
    pub size: Vec2,
    #[serde(default)]
    pub layer: String,
}

/// JSON scene fixture for the headless runner.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SceneDescription {
    pub zones: Vec<ZoneDescription>,
    pub gears: Vec<GearDescription>,
    pub lifts: Vec<LiftDescription>,
    pub blocks: Vec<BlockDescription>,
    /// Polyline walked by the demo hand.
    pub demo_path: Vec<Vec2>,
}

impl SceneDescription {
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&text).map_err(|source| ConfigError::Scene {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Built-in scene: one zone above a gear, with a lift off to the side.
    pub fn demo() -> Self {
        Self {
            zones: vec![ZoneDescription {
                min: Vec2::new(-3.0, 0.0),
                size: Vec2::new(6.0, 3.0),
            }],
            gears: vec![GearDescription {
                center: Vec2::new(0.0, -2.0),
                radius: 0.5,
                max_pins: None,
                auto_rotate: None,
                clockwise: false,
            }],
            lifts: vec![LiftDescription {
                from: Vec2::new(5.0, -3.0),
                to: Vec2::new(5.0, 1.0),
                speed: 1.0,
                size: Vec2::new(2.0, 0.3),
                wait_at_ends: None,
                auto_start: true,
            }],
            blocks: Vec::new(),
            demo_path: vec![
                Vec2::new(-1.5, 1.5),
                Vec2::new(0.0, 1.0),
                Vec2::new(1.5, 1.5),
            ],
        }
    }

    /// Spawn every object of the scene.
    pub fn spawn_into(&self, world: &mut World) {
        for zone in &self.zones {
            spawn_zone(world, zone.min, zone.size);
        }
        for desc in &self.gears {
            let mut gear = configured_gear(world.resource::<GameConfig>());
            if let Some(max_pins) = desc.max_pins {
                gear.max_pins = max_pins;
            }
            if let Some(rate) = desc.auto_rotate {
                gear = gear.with_auto_rotate(rate, desc.clockwise);
            }
            spawn_gear(world, desc.center, desc.radius, gear);
        }
        for desc in &self.lifts {
            let mut lift = Lift::new(desc.from, desc.to, desc.speed);
            if let Some(wait) = desc.wait_at_ends {
                lift = lift.with_wait(wait);
            }
            if desc.auto_start {
                lift = lift.with_auto_start();
            }
            spawn_lift(world, lift, desc.size);
        }
        for block in &self.blocks {
            spawn_static(world, block.min, block.size, &block.layer);
        }
        if self.demo_path.len() >= 2 {
            spawn_demo_hand(world, DemoHand::new(self.demo_path.clone()));
        }
        info!(
            "Scene spawned: {} zones, {} gears, {} lifts, {} blocks",
            self.zones.len(),
            self.gears.len(),
            self.lifts.len(),
            self.blocks.len()
        );
    }
}
