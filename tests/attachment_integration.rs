//! Integration tests for pinning strokes to gears, joint breaks and lift
//! mounting.
//!
//! # Usage
//!
//! ```sh
//! cargo test --test attachment_integration
//! ```

use bevy_ecs::hierarchy::ChildOf;
use bevy_ecs::prelude::*;
use glam::Vec2;

use inkpin::components::gear::Gear;
use inkpin::components::joint::{Joint, JointKind};
use inkpin::components::lift::{Lift, LiftAttachment};
use inkpin::components::mapposition::MapPosition;
use inkpin::components::rigidbody::RigidBody;
use inkpin::events::collision::{ContactEvent, ContactPhase};
use inkpin::events::joint::JointBreakEvent;
use inkpin::game::{
    FrameDriver, build_world, configured_gear, spawn_gear, spawn_lift, spawn_zone,
};
use inkpin::resources::gameconfig::GameConfig;
use inkpin::resources::pinregistry::PinRegistry;
use inkpin::systems::attachment::{
    PinRejection, attach_to_lift, break_joint, despawn_mechanism, try_pin,
};
use inkpin::systems::joints::solve_joints;
use inkpin::systems::physics::integrate_bodies;
use inkpin::systems::propagate_transforms::world_transform;
use inkpin::systems::stroke::{add_stroke_point, begin_stroke, clear_all_strokes, end_stroke};

const EPSILON: f32 = 1e-4;

fn approx_eq(a: f32, b: f32) -> bool {
    (a - b).abs() < EPSILON
}

fn approx_vec(a: Vec2, b: Vec2, tolerance: f32) -> bool {
    a.distance(b) < tolerance
}

/// Draw and release a stroke through `points`, each in a fresh zone.
fn draw_stroke(world: &mut World, points: &[Vec2]) -> Entity {
    spawn_zone(world, Vec2::new(-10.0, -10.0), Vec2::new(20.0, 20.0));
    let stroke = begin_stroke(world, points[0]).unwrap();
    for p in &points[1..] {
        add_stroke_point(world, *p);
    }
    assert_eq!(end_stroke(world), Some(stroke));
    stroke
}

fn horizontal_stroke(world: &mut World, y: f32) -> Entity {
    draw_stroke(world, &[Vec2::new(-1.0, y), Vec2::new(1.0, y)])
}

fn gear_at(world: &mut World, center: Vec2) -> Entity {
    let gear = configured_gear(world.resource::<GameConfig>());
    spawn_gear(world, center, 0.5, gear)
}

fn pin_count(world: &World, gear: Entity) -> usize {
    world.get::<Gear>(gear).unwrap().pin_count
}

fn joint_entities(world: &mut World) -> usize {
    world.query::<&Joint>().iter(world).count()
}

// =============================================================================
// Pinning
// =============================================================================

#[test]
fn stroke_through_center_gets_hinge_only() {
    let mut world = build_world(GameConfig::new());
    let gear = gear_at(&mut world, Vec2::ZERO);
    let stroke = horizontal_stroke(&mut world, 0.0);

    let pin = try_pin(&mut world, stroke, gear, Vec2::new(0.4, 0.0)).unwrap();
    assert!(pin.distance.is_none());
    assert_eq!(pin_count(&world, gear), 1);
    assert_eq!(world.resource::<PinRegistry>().joint_count(), 1);
    assert_eq!(joint_entities(&mut world), 1);

    let hinge = world.get::<Joint>(pin.hinge).unwrap();
    assert!(hinge.is_hinge());
    assert_eq!(hinge.body_a, stroke);
    assert_eq!(hinge.body_b, gear);
}

#[test]
fn stroke_beside_center_gets_holding_joint() {
    let mut world = build_world(GameConfig::new());
    let gear = gear_at(&mut world, Vec2::ZERO);
    let stroke = horizontal_stroke(&mut world, 0.4);
    let contact = Vec2::new(0.0, 0.3);

    let pin = try_pin(&mut world, stroke, gear, contact).unwrap();
    let distance = pin.distance.unwrap();
    assert_eq!(world.resource::<PinRegistry>().joint_count(), 2);

    let stroke_pose = world_transform(&world, stroke).unwrap();
    let gear_pose = world_transform(&world, gear).unwrap();

    let hinge = world.get::<Joint>(pin.hinge).unwrap();
    let (a, b) = hinge.world_anchors(&stroke_pose, &gear_pose);
    assert!(approx_vec(a, Vec2::ZERO, EPSILON));
    assert!(approx_vec(b, Vec2::ZERO, EPSILON));

    let holding = world.get::<Joint>(distance).unwrap();
    let (a, b) = holding.world_anchors(&stroke_pose, &gear_pose);
    assert!(approx_vec(a, contact, EPSILON));
    assert!(approx_vec(b, Vec2::ZERO, EPSILON));
    match holding.kind {
        JointKind::Distance {
            distance,
            max_distance_only,
        } => {
            assert!(approx_eq(distance, 0.3));
            assert!(max_distance_only);
        }
        JointKind::Hinge => panic!("holding joint should be a distance joint"),
    }
}

#[test]
fn pin_gives_stroke_a_downward_kick() {
    let mut world = build_world(GameConfig::new());
    let gear = gear_at(&mut world, Vec2::ZERO);
    let stroke = horizontal_stroke(&mut world, 0.0);
    try_pin(&mut world, stroke, gear, Vec2::ZERO).unwrap();

    let body = world.get::<RigidBody>(stroke).unwrap();
    assert!(body.velocity.y < 0.0);
    assert!(approx_eq(body.velocity.x, 0.0));
}

#[test]
fn full_gear_rejects_more_strokes() {
    let mut world = build_world(GameConfig::new());
    let gear = gear_at(&mut world, Vec2::ZERO);
    let first = horizontal_stroke(&mut world, 0.0);
    let second = horizontal_stroke(&mut world, 0.1);

    try_pin(&mut world, first, gear, Vec2::ZERO).unwrap();
    assert_eq!(
        try_pin(&mut world, second, gear, Vec2::ZERO),
        Err(PinRejection::PinCapacityExceeded)
    );
    assert_eq!(pin_count(&world, gear), 1);
    assert_eq!(joint_entities(&mut world), 1);
}

#[test]
fn repeated_contact_does_not_pin_twice() {
    let mut world = build_world(GameConfig::new());
    let mut gear_component = configured_gear(world.resource::<GameConfig>());
    gear_component.max_pins = 3;
    let gear = spawn_gear(&mut world, Vec2::ZERO, 0.5, gear_component);
    let stroke = horizontal_stroke(&mut world, 0.0);

    try_pin(&mut world, stroke, gear, Vec2::ZERO).unwrap();
    assert_eq!(
        try_pin(&mut world, stroke, gear, Vec2::ZERO),
        Err(PinRejection::DuplicateAttachment)
    );
    assert_eq!(pin_count(&world, gear), 1);
}

#[test]
fn stroke_being_drawn_is_not_pinned() {
    let mut world = build_world(GameConfig::new());
    let gear = gear_at(&mut world, Vec2::ZERO);
    spawn_zone(&mut world, Vec2::new(-10.0, -10.0), Vec2::new(20.0, 20.0));
    let stroke = begin_stroke(&mut world, Vec2::new(-1.0, 0.0)).unwrap();
    add_stroke_point(&mut world, Vec2::new(1.0, 0.0));

    assert_eq!(
        try_pin(&mut world, stroke, gear, Vec2::ZERO),
        Err(PinRejection::NotFinalized)
    );
    assert_eq!(pin_count(&world, gear), 0);
}

#[test]
fn contact_event_routes_to_pinning() {
    let mut world = build_world(GameConfig::new());
    let gear = gear_at(&mut world, Vec2::ZERO);
    let stroke = horizontal_stroke(&mut world, 0.0);

    for phase in [ContactPhase::Enter, ContactPhase::Stay] {
        world.trigger(ContactEvent {
            a: gear,
            b: stroke,
            point: Vec2::new(0.3, 0.0),
            relative_velocity: Vec2::ZERO,
            phase,
        });
        world.flush();
    }
    assert_eq!(pin_count(&world, gear), 1);
    assert!(world.resource::<PinRegistry>().is_pinned(stroke, gear));
}

#[test]
fn three_strokes_two_gears() {
    let mut world = build_world(GameConfig::new());
    let gear_a = gear_at(&mut world, Vec2::new(-3.0, 0.0));
    let gear_b = gear_at(&mut world, Vec2::new(3.0, 0.0));
    let s1 = draw_stroke(&mut world, &[Vec2::new(-4.0, 0.0), Vec2::new(-2.0, 0.0)]);
    let s2 = draw_stroke(&mut world, &[Vec2::new(-4.0, 0.2), Vec2::new(-2.0, 0.2)]);
    let s3 = draw_stroke(&mut world, &[Vec2::new(2.0, 0.0), Vec2::new(4.0, 0.0)]);

    assert!(try_pin(&mut world, s1, gear_a, Vec2::new(-3.0, 0.0)).is_ok());
    assert_eq!(
        try_pin(&mut world, s2, gear_a, Vec2::new(-3.0, 0.2)),
        Err(PinRejection::PinCapacityExceeded)
    );
    assert!(try_pin(&mut world, s3, gear_b, Vec2::new(3.0, 0.0)).is_ok());

    assert_eq!(pin_count(&world, gear_a), 1);
    assert_eq!(pin_count(&world, gear_b), 1);
    {
        let registry = world.resource::<PinRegistry>();
        assert!(registry.is_pinned(s1, gear_a));
        assert!(!registry.is_pinned(s2, gear_a));
        assert!(registry.is_pinned(s3, gear_b));
    }

    assert_eq!(clear_all_strokes(&mut world), 3);
    assert_eq!(pin_count(&world, gear_a), 0);
    assert_eq!(pin_count(&world, gear_b), 0);
    assert_eq!(joint_entities(&mut world), 0);
    assert!(world.resource::<PinRegistry>().is_empty());
}

// =============================================================================
// Breaking and releasing
// =============================================================================

#[test]
fn joint_break_tears_down_pin_once() {
    let mut world = build_world(GameConfig::new());
    let gear = gear_at(&mut world, Vec2::ZERO);
    let stroke = horizontal_stroke(&mut world, 0.4);
    let pin = try_pin(&mut world, stroke, gear, Vec2::new(0.0, 0.3)).unwrap();
    let distance = pin.distance.unwrap();

    assert!(break_joint(&mut world, pin.hinge));
    assert_eq!(pin_count(&world, gear), 0);
    assert!(world.get_entity(pin.hinge).is_err());
    assert!(world.get_entity(distance).is_err());

    // The second joint of the same pin reports too late.
    assert!(!break_joint(&mut world, distance));
    assert_eq!(pin_count(&world, gear), 0);
    assert!(world.resource::<PinRegistry>().is_empty());
}

#[test]
fn duplicate_break_events_are_harmless() {
    let mut world = build_world(GameConfig::new());
    let gear = gear_at(&mut world, Vec2::ZERO);
    let stroke = horizontal_stroke(&mut world, 0.4);
    let pin = try_pin(&mut world, stroke, gear, Vec2::new(0.0, 0.3)).unwrap();

    world.trigger(JointBreakEvent { joint: pin.hinge });
    world.trigger(JointBreakEvent { joint: pin.hinge });
    world.trigger(JointBreakEvent {
        joint: pin.distance.unwrap(),
    });
    world.flush();

    assert_eq!(pin_count(&world, gear), 0);
    assert_eq!(joint_entities(&mut world), 0);
    // The freed slot can be used again.
    assert!(try_pin(&mut world, stroke, gear, Vec2::new(0.0, 0.3)).is_ok());
}

#[test]
fn overloaded_joint_breaks_during_simulation() {
    let mut config = GameConfig::new();
    config.break_force = 1e-6;
    let mut world = build_world(config);
    let gear = gear_at(&mut world, Vec2::ZERO);
    let stroke = horizontal_stroke(&mut world, 0.4);
    try_pin(&mut world, stroke, gear, Vec2::new(0.0, 0.3)).unwrap();

    // Without contact detection, so the stroke is not pinned again.
    let mut schedule = Schedule::default();
    schedule.add_systems((integrate_bodies, solve_joints).chain());
    schedule.run(&mut world);

    assert_eq!(pin_count(&world, gear), 0);
    assert!(world.resource::<PinRegistry>().is_empty());
    assert_eq!(joint_entities(&mut world), 0);
}

#[test]
fn clearing_strokes_frees_gear_slots() {
    let mut world = build_world(GameConfig::new());
    let gear = gear_at(&mut world, Vec2::ZERO);
    let stroke = horizontal_stroke(&mut world, 0.0);
    try_pin(&mut world, stroke, gear, Vec2::ZERO).unwrap();

    clear_all_strokes(&mut world);
    assert_eq!(pin_count(&world, gear), 0);
    assert_eq!(joint_entities(&mut world), 0);
    assert!(world.resource::<PinRegistry>().is_empty());
}

#[test]
fn despawning_gear_releases_its_joints() {
    let mut world = build_world(GameConfig::new());
    let gear = gear_at(&mut world, Vec2::ZERO);
    let stroke = horizontal_stroke(&mut world, 0.4);
    try_pin(&mut world, stroke, gear, Vec2::new(0.0, 0.3)).unwrap();

    despawn_mechanism(&mut world, gear);
    assert!(world.get_entity(gear).is_err());
    assert_eq!(joint_entities(&mut world), 0);
    assert!(world.resource::<PinRegistry>().is_empty());
}

// =============================================================================
// Simulation
// =============================================================================

#[test]
fn falling_stroke_gets_pinned_and_hangs() {
    let mut world = build_world(GameConfig::new());
    let gear = gear_at(&mut world, Vec2::ZERO);
    let stroke = horizontal_stroke(&mut world, 1.0);

    let mut driver = FrameDriver::new();
    for _ in 0..60 {
        driver.tick(&mut world, 1.0 / 60.0);
    }
    assert_eq!(pin_count(&world, gear), 1);
    assert!(world.resource::<PinRegistry>().is_pinned(stroke, gear));

    for _ in 0..60 {
        driver.tick(&mut world, 1.0 / 60.0);
    }
    // The hinge keeps the stroke's anchor on the gear center.
    let pins = world.resource::<PinRegistry>().pins_of(gear).to_vec();
    let stroke_pose = world_transform(&world, stroke).unwrap();
    let gear_pose = world_transform(&world, gear).unwrap();
    let hinge = world.get::<Joint>(pins[0].hinge).unwrap();
    let (a, b) = hinge.world_anchors(&stroke_pose, &gear_pose);
    assert!(approx_vec(a, b, 0.05));
    // The gear stays on its axle.
    assert!(approx_vec(gear_pose.position, Vec2::ZERO, EPSILON));
}

// =============================================================================
// Lifts
// =============================================================================

#[test]
fn stroke_mounts_on_lift_keeping_pose() {
    let mut world = build_world(GameConfig::new());
    let lift = spawn_lift(
        &mut world,
        Lift::new(Vec2::new(0.0, -1.0), Vec2::new(0.0, 4.0), 1.0),
        Vec2::new(4.0, 0.5),
    );
    let stroke = horizontal_stroke(&mut world, 0.0);

    assert!(attach_to_lift(&mut world, stroke, lift));
    assert_eq!(world.get::<ChildOf>(stroke).unwrap().parent(), lift);
    assert_eq!(world.get::<LiftAttachment>(stroke).unwrap().lift, lift);
    assert!(!world.get::<RigidBody>(stroke).unwrap().is_simulated());

    let local = world.get::<MapPosition>(stroke).unwrap().pos;
    assert!(approx_vec(local, Vec2::new(0.0, 1.0), EPSILON));

    // Only the first lift contact counts.
    assert!(!attach_to_lift(&mut world, stroke, lift));
}

#[test]
fn mounting_on_lift_keeps_gear_pins() {
    let mut world = build_world(GameConfig::new());
    let gear = gear_at(&mut world, Vec2::ZERO);
    let lift = spawn_lift(
        &mut world,
        Lift::new(Vec2::new(0.0, -1.0), Vec2::new(0.0, 4.0), 1.0),
        Vec2::new(4.0, 0.5),
    );
    let stroke = horizontal_stroke(&mut world, 0.0);
    let pin = try_pin(&mut world, stroke, gear, Vec2::ZERO).unwrap();

    assert!(attach_to_lift(&mut world, stroke, lift));
    assert_eq!(pin_count(&world, gear), 1);
    assert_eq!(world.resource::<PinRegistry>().pins_of(gear), &[pin]);
    assert!(world.get::<Joint>(pin.hinge).is_some());
}

#[test]
fn lift_contact_on_pinned_stroke_does_not_churn_pins() {
    let mut world = build_world(GameConfig::new());
    let gear = gear_at(&mut world, Vec2::ZERO);
    // A parked lift under the right end of the stroke.
    let lift = spawn_lift(
        &mut world,
        Lift::new(Vec2::new(1.0, 0.0), Vec2::new(1.0, 4.0), 1.0),
        Vec2::new(0.5, 0.5),
    );
    let stroke = horizontal_stroke(&mut world, 0.0);
    let pin = try_pin(&mut world, stroke, gear, Vec2::ZERO).unwrap();

    let mut driver = FrameDriver::new();
    for step in 0..5 {
        driver.step_physics(&mut world);
        assert_eq!(
            world.resource::<PinRegistry>().pins_of(gear),
            &[pin],
            "Pin changed at step {}",
            step
        );
    }

    assert_eq!(world.get::<LiftAttachment>(stroke).unwrap().lift, lift);
    assert_eq!(pin_count(&world, gear), 1);
    assert_eq!(joint_entities(&mut world), 1);
}
