//! Attachment resolver: pins strokes to gears and mounts them on lifts.
//!
//! [`contact_observer`] receives every [`ContactEvent`] and dispatches on the
//! tags of the two bodies. Work that needs the whole world (spawning joints,
//! re-parenting) is queued as a command closure, so it runs right after the
//! contact pass that reported it.
//!
//! All pins are recorded in the [`PinRegistry`] resource; the gear's own
//! `pin_count` mirrors the registry and is what enforces `max_pins`.

use std::fmt;

use bevy_ecs::hierarchy::ChildOf;
use bevy_ecs::observer::On;
use bevy_ecs::prelude::*;
use glam::Vec2;
use log::{debug, info};

use crate::components::bodytag::BodyTag;
use crate::components::gear::Gear;
use crate::components::joint::Joint;
use crate::components::lift::LiftAttachment;
use crate::components::mapposition::MapPosition;
use crate::components::rigidbody::RigidBody;
use crate::components::rotation::Rotation;
use crate::components::stroke::Stroke;
use crate::events::collision::ContactEvent;
use crate::events::joint::JointBreakEvent;
use crate::geometry;
use crate::resources::contactstate::ContactState;
use crate::resources::pinregistry::{Pin, PinRegistry};
use crate::systems::propagate_transforms::world_transform;

/// Points this close to the outline boundary count as inside it.
pub const CONTAINMENT_TOLERANCE: f32 = 1e-4;

/// Why a pin attempt did nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PinRejection {
    NotFinalized,
    DuplicateAttachment,
    PinCapacityExceeded,
    /// One of the bodies lacks the components a pin needs.
    ConfigurationError,
}

impl fmt::Display for PinRejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PinRejection::NotFinalized => write!(f, "stroke is still being drawn"),
            PinRejection::DuplicateAttachment => write!(f, "stroke already pinned to this gear"),
            PinRejection::PinCapacityExceeded => write!(f, "gear has no free pin"),
            PinRejection::ConfigurationError => write!(f, "body is missing pin components"),
        }
    }
}

/// Route contacts between strokes and mechanisms.
///
/// Both `Enter` and `Stay` contacts are considered: a stroke resting on a
/// full gear gets pinned as soon as a slot frees up.
pub fn contact_observer(
    trigger: On<ContactEvent>,
    tags: Query<&BodyTag>,
    mut commands: Commands,
) {
    let event = *trigger.event();
    let tag_of = |entity| tags.get(entity).copied().unwrap_or_default();
    let (stroke, other) = match (tag_of(event.a), tag_of(event.b)) {
        (BodyTag::Line, _) => (event.a, event.b),
        (_, BodyTag::Line) => (event.b, event.a),
        _ => return,
    };

    match tag_of(other) {
        BodyTag::Gear => {
            commands.queue(move |world: &mut World| {
                if let Err(reason) = try_pin(world, stroke, other, event.point) {
                    debug!("Pin {:?} -> {:?} skipped: {}", stroke, other, reason);
                }
            });
        }
        BodyTag::Lift => {
            commands.queue(move |world: &mut World| {
                attach_to_lift(world, stroke, other);
            });
        }
        _ => {}
    }
}

/// Pin `stroke` to `gear` after they touched at `contact_point`.
///
/// A hinge always fastens the stroke to the gear's center. When the stroke
/// does not cover the center, a max-distance joint from the contact point
/// keeps it from sliding off.
pub fn try_pin(
    world: &mut World,
    stroke: Entity,
    gear: Entity,
    contact_point: Vec2,
) -> Result<Pin, PinRejection> {
    let outline = match world.get::<Stroke>(stroke) {
        Some(s) if s.finalized => s.ribbon.outline().to_vec(),
        Some(_) => return Err(PinRejection::NotFinalized),
        None => return Err(PinRejection::ConfigurationError),
    };
    let (break_force, break_torque, down_impulse) = {
        let gear_component = world
            .get::<Gear>(gear)
            .ok_or(PinRejection::ConfigurationError)?;
        if world.resource::<PinRegistry>().is_pinned(stroke, gear) {
            return Err(PinRejection::DuplicateAttachment);
        }
        if !gear_component.has_capacity() {
            return Err(PinRejection::PinCapacityExceeded);
        }
        (
            gear_component.break_force,
            gear_component.break_torque,
            gear_component.down_impulse,
        )
    };
    let stroke_pose = world_transform(world, stroke).ok_or(PinRejection::ConfigurationError)?;
    let gear_pose = world_transform(world, gear).ok_or(PinRejection::ConfigurationError)?;

    let center = gear_pose.position;
    let passes_center = geometry::contains_point(
        &outline,
        stroke_pose.inverse_transform_point(center),
        CONTAINMENT_TOLERANCE,
    );

    let hinge = world
        .spawn(
            Joint::hinge(
                stroke,
                gear,
                stroke_pose.inverse_transform_point(center),
                gear_pose.inverse_transform_point(center),
            )
            .with_break_thresholds(break_force, break_torque),
        )
        .id();
    let distance = (!passes_center).then(|| {
        world
            .spawn(
                Joint::max_distance(
                    stroke,
                    gear,
                    stroke_pose.inverse_transform_point(contact_point),
                    gear_pose.inverse_transform_point(center),
                    contact_point.distance(center),
                )
                .with_break_thresholds(break_force, break_torque),
            )
            .id()
    });

    if let Some(mut body) = world.get_mut::<RigidBody>(stroke) {
        body.gravity_scale = body.gravity_scale.max(1.0);
        body.ccd = true;
        body.interpolate = true;
        body.apply_impulse(Vec2::NEG_Y * down_impulse);
    }
    if let Some(mut gear_component) = world.get_mut::<Gear>(gear) {
        gear_component.try_reserve();
    }

    let pin = Pin {
        stroke,
        hinge,
        distance,
    };
    world.resource_mut::<PinRegistry>().register(gear, pin);
    info!(
        "Stroke {:?} pinned to gear {:?} ({})",
        stroke,
        gear,
        if passes_center {
            "through center"
        } else {
            "with holding joint"
        }
    );
    Ok(pin)
}

/// Tear down the pin owning a broken joint.
pub fn joint_break_observer(trigger: On<JointBreakEvent>, mut commands: Commands) {
    let joint = trigger.event().joint;
    commands.queue(move |world: &mut World| {
        break_joint(world, joint);
    });
}

/// Remove the pin that owns `joint`. Returns false if it was already gone,
/// which happens when both joints of a pin break in the same step.
pub fn break_joint(world: &mut World, joint: Entity) -> bool {
    let Some((mechanism, pin)) = world.resource_mut::<PinRegistry>().remove_joint(joint) else {
        debug!("Joint {:?} already released", joint);
        return false;
    };
    drop_pin(world, mechanism, pin);
    info!(
        "Pin between stroke {:?} and {:?} broke",
        pin.stroke, mechanism
    );
    true
}

/// Release every joint in which `body` takes part.
pub fn release_joints_of(world: &mut World, body: Entity) -> usize {
    let removed = world
        .resource_mut::<PinRegistry>()
        .remove_all_for_body(body);
    for (mechanism, pin) in &removed {
        drop_pin(world, *mechanism, *pin);
    }
    if !removed.is_empty() {
        debug!("Released {} pins of {:?}", removed.len(), body);
    }
    removed.len()
}

fn drop_pin(world: &mut World, mechanism: Entity, pin: Pin) {
    for joint in pin.joints() {
        if let Ok(entity) = world.get_entity_mut(joint) {
            entity.despawn();
        }
    }
    if let Some(mut gear) = world.get_mut::<Gear>(mechanism) {
        gear.release();
    }
}

/// Despawn a gear or lift together with the joints hanging on it.
pub fn despawn_mechanism(world: &mut World, mechanism: Entity) {
    release_joints_of(world, mechanism);
    world.resource_mut::<ContactState>().forget(mechanism);
    if let Ok(entity) = world.get_entity_mut(mechanism) {
        entity.despawn();
    }
}

/// Mount a finalized stroke on `lift`, keeping its current world pose.
///
/// The stroke becomes a frozen child of the lift and follows it through
/// transform propagation. Gear pins it already has are kept. Only the first
/// lift contact counts.
pub fn attach_to_lift(world: &mut World, stroke: Entity, lift: Entity) -> bool {
    let finalized = world.get::<Stroke>(stroke).is_some_and(|s| s.finalized);
    if !finalized || world.get::<LiftAttachment>(stroke).is_some() {
        return false;
    }
    let (Some(stroke_pose), Some(lift_pose)) =
        (world_transform(world, stroke), world_transform(world, lift))
    else {
        return false;
    };

    let (local_position, local_rotation) = stroke_pose.relative_to(&lift_pose);
    world.entity_mut(stroke).insert((
        ChildOf(lift),
        MapPosition::from_vec(local_position),
        Rotation {
            degrees: local_rotation,
        },
        LiftAttachment { lift },
    ));
    if let Some(mut body) = world.get_mut::<RigidBody>(stroke) {
        body.freeze();
    }
    info!("Stroke {:?} attached to lift {:?}", stroke, lift);
    true
}
