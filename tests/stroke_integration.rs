//! Integration tests for the stroke lifecycle: zone gating, ribbon growth,
//! finalization, discard and clearing.
//!
//! # Usage
//!
//! ```sh
//! cargo test --test stroke_integration
//! ```

use bevy_ecs::message::Messages;
use bevy_ecs::prelude::*;
use glam::Vec2;

use inkpin::components::bodytag::BodyTag;
use inkpin::components::collider::Collider;
use inkpin::components::drawzone::{DrawZone, ZoneState};
use inkpin::components::mapposition::MapPosition;
use inkpin::components::rigidbody::{BodyType, RigidBody};
use inkpin::components::stroke::{Stroke, StrokeMesh};
use inkpin::components::timer::Timer;
use inkpin::events::input::{PointerPhase, PointerSample};
use inkpin::events::level::LevelUnloadEvent;
use inkpin::events::stroke::{STROKES_COMPLETED_SIGNAL, STROKES_DISCARDED_SIGNAL};
use inkpin::game::{FrameDriver, build_world, change_state, spawn_zone};
use inkpin::resources::drawstate::DrawState;
use inkpin::resources::gameconfig::GameConfig;
use inkpin::resources::gamestate::GameStates;
use inkpin::resources::worldsignals::WorldSignals;
use inkpin::systems::stroke::{add_stroke_point, begin_stroke, clear_all_strokes, end_stroke};

const EPSILON: f32 = 1e-4;

fn approx_eq(a: f32, b: f32) -> bool {
    (a - b).abs() < EPSILON
}

fn world_with_zone(config: GameConfig) -> (World, Entity) {
    let mut world = build_world(config);
    let zone = spawn_zone(&mut world, Vec2::new(-5.0, -5.0), Vec2::new(10.0, 10.0));
    (world, zone)
}

fn stroke_count(world: &mut World) -> usize {
    world.query::<&Stroke>().iter(world).count()
}

fn signal(world: &World, key: &str) -> i32 {
    world
        .resource::<WorldSignals>()
        .get_integer(key)
        .unwrap_or(0)
}

fn write_pointer(world: &mut World, x: f32, y: f32, phase: PointerPhase) {
    world
        .resource_mut::<Messages<PointerSample>>()
        .write(PointerSample::new(x, y, phase));
}

// =============================================================================
// Drawing
// =============================================================================

#[test]
fn ribbon_grows_with_spaced_samples() {
    let (mut world, _) = world_with_zone(GameConfig::new());

    let stroke = begin_stroke(&mut world, Vec2::new(0.0, 0.0)).unwrap();
    assert!(add_stroke_point(&mut world, Vec2::new(1.0, 0.0)));
    // Closer than min_point_distance to the last sample.
    assert!(!add_stroke_point(&mut world, Vec2::new(1.02, 0.0)));
    assert!(add_stroke_point(&mut world, Vec2::new(2.0, 0.0)));

    let ribbon = &world.get::<Stroke>(stroke).unwrap().ribbon;
    assert_eq!(ribbon.sample_count(), 3);
    assert_eq!(ribbon.vertex_count(), 6);
    assert_eq!(ribbon.triangle_count(), 4);
    assert!(approx_eq(ribbon.path_length(), 2.0));

    let mesh = world.get::<StrokeMesh>(stroke).unwrap();
    assert_eq!(mesh.vertices.len(), 6);
    assert_eq!(mesh.indices.len(), 4);
    assert_eq!(mesh.uvs.len(), 6);
}

#[test]
fn stroke_in_progress_is_a_tagged_sensor() {
    let (mut world, _) = world_with_zone(GameConfig::new());
    let stroke = begin_stroke(&mut world, Vec2::ZERO).unwrap();
    add_stroke_point(&mut world, Vec2::new(1.0, 0.0));

    assert_eq!(*world.get::<BodyTag>(stroke).unwrap(), BodyTag::Line);
    assert!(world.get::<Collider>(stroke).unwrap().sensor);
    assert!(world.get::<RigidBody>(stroke).is_none());
}

#[test]
fn begin_outside_zone_is_ignored() {
    let (mut world, _) = world_with_zone(GameConfig::new());
    assert!(begin_stroke(&mut world, Vec2::new(20.0, 0.0)).is_none());
    assert!(!world.resource::<DrawState>().is_drawing());
    assert_eq!(stroke_count(&mut world), 0);
}

#[test]
fn only_one_stroke_at_a_time() {
    let (mut world, _) = world_with_zone(GameConfig::new());
    assert!(begin_stroke(&mut world, Vec2::ZERO).is_some());
    assert!(begin_stroke(&mut world, Vec2::new(1.0, 1.0)).is_none());
    assert_eq!(stroke_count(&mut world), 1);
}

#[test]
fn leaving_the_zone_stops_growth() {
    let (mut world, _) = world_with_zone(GameConfig::new());
    let stroke = begin_stroke(&mut world, Vec2::new(4.0, 0.0)).unwrap();
    assert!(!add_stroke_point(&mut world, Vec2::new(6.0, 0.0)));
    assert!(add_stroke_point(&mut world, Vec2::new(4.5, 0.0)));
    assert_eq!(world.get::<Stroke>(stroke).unwrap().ribbon.sample_count(), 2);
}

// =============================================================================
// Release
// =============================================================================

#[test]
fn end_without_stroke_is_a_no_op() {
    let (mut world, zone) = world_with_zone(GameConfig::new());
    assert!(end_stroke(&mut world).is_none());
    assert_eq!(stroke_count(&mut world), 0);
    assert!(world.get::<DrawZone>(zone).unwrap().is_active());
    assert_eq!(signal(&world, STROKES_COMPLETED_SIGNAL), 0);
}

#[test]
fn second_end_after_release_is_a_no_op() {
    let (mut world, _) = world_with_zone(GameConfig::new());
    let stroke = begin_stroke(&mut world, Vec2::new(-1.0, 0.0)).unwrap();
    add_stroke_point(&mut world, Vec2::new(1.0, 0.0));
    assert_eq!(end_stroke(&mut world), Some(stroke));
    assert_eq!(signal(&world, STROKES_COMPLETED_SIGNAL), 1);

    assert!(end_stroke(&mut world).is_none());
    assert_eq!(signal(&world, STROKES_COMPLETED_SIGNAL), 1);
    assert_eq!(signal(&world, STROKES_DISCARDED_SIGNAL), 0);
    assert!(world.get_entity(stroke).is_ok());
    assert!(world.get::<Stroke>(stroke).unwrap().finalized);
    assert!(world.get::<RigidBody>(stroke).is_some());
}

#[test]
fn single_sample_stroke_is_discarded() {
    let (mut world, zone) = world_with_zone(GameConfig::new());
    let stroke = begin_stroke(&mut world, Vec2::ZERO).unwrap();
    assert!(end_stroke(&mut world).is_none());

    assert!(world.get_entity(stroke).is_err());
    assert!(!world.resource::<DrawState>().is_drawing());
    assert_eq!(signal(&world, STROKES_DISCARDED_SIGNAL), 1);
    assert_eq!(signal(&world, STROKES_COMPLETED_SIGNAL), 0);
    // The zone is spent even by a discarded stroke.
    assert!(!world.get::<DrawZone>(zone).unwrap().is_active());
}

#[test]
fn released_stroke_becomes_dynamic_body() {
    let (mut world, _) = world_with_zone(GameConfig::new());
    let stroke = begin_stroke(&mut world, Vec2::new(0.0, 1.0)).unwrap();
    add_stroke_point(&mut world, Vec2::new(1.0, 1.0));
    add_stroke_point(&mut world, Vec2::new(2.0, 1.0));
    assert_eq!(end_stroke(&mut world), Some(stroke));

    let position = world.get::<MapPosition>(stroke).unwrap().pos;
    assert!(approx_eq(position.x, 1.0));
    assert!(approx_eq(position.y, 1.0));

    let s = world.get::<Stroke>(stroke).unwrap();
    assert!(s.finalized);
    let centroid = s.ribbon.vertex_centroid();
    assert!(approx_eq(centroid.x, 0.0));
    assert!(approx_eq(centroid.y, 0.0));

    let body = world.get::<RigidBody>(stroke).unwrap();
    assert_eq!(body.body_type, BodyType::Dynamic);
    assert!(body.ccd);
    assert!(body.interpolate);
    assert!(body.mass > 0.0);
    assert!(body.inertia > 0.0);

    let collider = world.get::<Collider>(stroke).unwrap();
    assert!(!collider.sensor);
    assert!(approx_eq(collider.material.friction, 0.4));
    assert!(approx_eq(collider.material.bounciness, 0.05));

    assert_eq!(signal(&world, STROKES_COMPLETED_SIGNAL), 1);
    assert!(!world.resource::<DrawState>().is_drawing());
}

#[test]
fn release_fades_the_zone_out() {
    let (mut world, zone) = world_with_zone(GameConfig::new());
    begin_stroke(&mut world, Vec2::ZERO);
    add_stroke_point(&mut world, Vec2::new(1.0, 0.0));
    end_stroke(&mut world);

    assert_eq!(world.get::<DrawZone>(zone).unwrap().state, ZoneState::Fading);
    assert!(world.get::<Timer>(zone).is_some());
    // A fading zone no longer accepts strokes.
    assert!(begin_stroke(&mut world, Vec2::new(1.0, 1.0)).is_none());

    let mut driver = FrameDriver::new();
    driver.tick(&mut world, 0.1);
    let alpha = world.get::<DrawZone>(zone).unwrap().alpha;
    assert!(alpha < 1.0 && alpha > 0.0);

    for _ in 0..5 {
        driver.tick(&mut world, 0.1);
    }
    let draw_zone = world.get::<DrawZone>(zone).unwrap();
    assert_eq!(draw_zone.state, ZoneState::Inactive);
    assert!(approx_eq(draw_zone.alpha, 0.0));
    assert!(world.get::<Timer>(zone).is_none());
}

#[test]
fn release_without_fade_deactivates_at_once() {
    let mut config = GameConfig::new();
    config.fade_out = false;
    let (mut world, zone) = world_with_zone(config);
    begin_stroke(&mut world, Vec2::ZERO);
    add_stroke_point(&mut world, Vec2::new(1.0, 0.0));
    end_stroke(&mut world);

    assert_eq!(world.get::<DrawZone>(zone).unwrap().state, ZoneState::Inactive);
    assert!(world.get::<Timer>(zone).is_none());
}

#[test]
fn second_zone_still_accepts_after_first_is_spent() {
    let (mut world, first) = world_with_zone(GameConfig::new());
    let second = spawn_zone(&mut world, Vec2::new(-5.0, -5.0), Vec2::new(10.0, 10.0));
    begin_stroke(&mut world, Vec2::ZERO);
    add_stroke_point(&mut world, Vec2::new(1.0, 0.0));
    end_stroke(&mut world);

    let stroke = begin_stroke(&mut world, Vec2::new(0.0, 2.0)).unwrap();
    let zone = world.get::<Stroke>(stroke).unwrap().zone.unwrap();
    assert!(zone == first || zone == second);
    assert!(world.get::<DrawZone>(zone).unwrap().is_active());
}

// =============================================================================
// Clearing
// =============================================================================

#[test]
fn clear_all_strokes_removes_finished_and_active() {
    let mut world = build_world(GameConfig::new());
    for y in [0.0, 3.0] {
        spawn_zone(&mut world, Vec2::new(-5.0, y - 1.0), Vec2::new(10.0, 2.0));
    }
    begin_stroke(&mut world, Vec2::ZERO);
    add_stroke_point(&mut world, Vec2::new(1.0, 0.0));
    end_stroke(&mut world);
    begin_stroke(&mut world, Vec2::new(0.0, 3.0));

    assert_eq!(clear_all_strokes(&mut world), 2);
    assert_eq!(stroke_count(&mut world), 0);
    assert!(!world.resource::<DrawState>().is_drawing());
}

#[test]
fn level_unload_clears_strokes() {
    let (mut world, _) = world_with_zone(GameConfig::new());
    begin_stroke(&mut world, Vec2::ZERO);
    add_stroke_point(&mut world, Vec2::new(1.0, 0.0));
    end_stroke(&mut world);

    world.trigger(LevelUnloadEvent);
    world.flush();
    assert_eq!(stroke_count(&mut world), 0);
}

// =============================================================================
// Pointer input
// =============================================================================

#[test]
fn pointer_samples_draw_while_playing() {
    let (mut world, _) = world_with_zone(GameConfig::new());
    change_state(&mut world, GameStates::Playing);
    let mut driver = FrameDriver::new();

    write_pointer(&mut world, 0.0, 0.0, PointerPhase::Began);
    write_pointer(&mut world, 0.5, 0.0, PointerPhase::Moved);
    write_pointer(&mut world, 0.5, 0.0, PointerPhase::Stationary);
    write_pointer(&mut world, 1.0, 0.0, PointerPhase::Moved);
    driver.tick(&mut world, 1.0 / 60.0);
    assert!(world.resource::<DrawState>().is_drawing());

    write_pointer(&mut world, 1.0, 0.0, PointerPhase::Ended);
    driver.tick(&mut world, 1.0 / 60.0);
    assert!(!world.resource::<DrawState>().is_drawing());
    assert_eq!(signal(&world, STROKES_COMPLETED_SIGNAL), 1);

    let ribbon_samples = world
        .query::<&Stroke>()
        .iter(&world)
        .map(|s| s.ribbon.sample_count())
        .next();
    assert_eq!(ribbon_samples, Some(3));
}

#[test]
fn pointer_input_is_gated_outside_playing() {
    let (mut world, _) = world_with_zone(GameConfig::new());
    change_state(&mut world, GameStates::Paused);
    let mut driver = FrameDriver::new();

    write_pointer(&mut world, 0.0, 0.0, PointerPhase::Began);
    write_pointer(&mut world, 1.0, 0.0, PointerPhase::Moved);
    driver.tick(&mut world, 1.0 / 60.0);
    assert_eq!(stroke_count(&mut world), 0);
}

#[test]
fn pointer_end_is_honoured_while_gated() {
    let (mut world, _) = world_with_zone(GameConfig::new());
    change_state(&mut world, GameStates::Playing);
    let mut driver = FrameDriver::new();

    write_pointer(&mut world, 0.0, 0.0, PointerPhase::Began);
    write_pointer(&mut world, 1.0, 0.0, PointerPhase::Moved);
    driver.tick(&mut world, 1.0 / 60.0);

    change_state(&mut world, GameStates::Paused);
    write_pointer(&mut world, 1.0, 0.0, PointerPhase::Ended);
    driver.tick(&mut world, 1.0 / 60.0);
    assert!(!world.resource::<DrawState>().is_drawing());
    assert_eq!(signal(&world, STROKES_COMPLETED_SIGNAL), 1);
}
