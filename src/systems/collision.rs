//! Contact detection.
//!
//! Runs at the end of every physics step, after transform propagation. Pairs
//! are culled by world AABB (swept over the step for `ccd` bodies), then
//! tested exactly with [`Collider::contact`]. Every touching pair triggers a
//! [`ContactEvent`], tagged `Enter` or `Stay` against the previous step.
//!
//! Skipped pairs:
//! - either collider is a sensor (zones, strokes still being drawn);
//! - neither side has a moving body;
//! - the two bodies are already joined by a pin.

use bevy_ecs::prelude::*;
use glam::Vec2;
use log::debug;

use crate::components::collider::Collider;
use crate::components::globaltransform2d::GlobalTransform2D;
use crate::components::rigidbody::{BodyType, RigidBody};
use crate::events::collision::ContactEvent;
use crate::resources::contactstate::ContactState;
use crate::resources::pinregistry::PinRegistry;
use crate::systems::propagate_transforms::world_transform;

/// Poses tested along the sweep of a `ccd` body.
pub const SWEEP_SAMPLES: usize = 8;

struct Candidate {
    entity: Entity,
    collider: Collider,
    pose: GlobalTransform2D,
    /// Pose at the start of the step, for swept bodies.
    prev_pose: Option<GlobalTransform2D>,
    body: Option<RigidBody>,
}

impl Candidate {
    fn moves(&self) -> bool {
        self.body
            .as_ref()
            .is_some_and(|b| b.body_type != BodyType::Static && !b.frozen)
    }

    fn pose_at(&self, t: f32) -> GlobalTransform2D {
        match self.prev_pose {
            Some(prev) if t < 1.0 => GlobalTransform2D::new(
                prev.position.lerp(self.pose.position, t),
                prev.rotation_degrees + (self.pose.rotation_degrees - prev.rotation_degrees) * t,
            ),
            _ => self.pose,
        }
    }

    fn bounds(&self) -> (Vec2, Vec2) {
        let (min, max) = self.collider.aabb(&self.pose);
        match self.prev_pose {
            Some(prev) => {
                let (prev_min, prev_max) = self.collider.aabb(&prev);
                (min.min(prev_min), max.max(prev_max))
            }
            None => (min, max),
        }
    }

    fn velocity_at(&self, point: Vec2) -> Vec2 {
        self.body
            .as_ref()
            .map_or(Vec2::ZERO, |b| b.point_velocity(point - self.pose.position))
    }
}

fn overlaps(a: (Vec2, Vec2), b: (Vec2, Vec2)) -> bool {
    a.0.x <= b.1.x && a.1.x >= b.0.x && a.0.y <= b.1.y && a.1.y >= b.0.y
}

/// Earliest contact between two candidates over the step.
fn sweep_contact(a: &Candidate, b: &Candidate) -> Option<Vec2> {
    let samples = if a.prev_pose.is_some() || b.prev_pose.is_some() {
        SWEEP_SAMPLES
    } else {
        1
    };
    (1..=samples).find_map(|k| {
        let t = k as f32 / samples as f32;
        a.collider
            .contact(&a.pose_at(t), &b.collider, &b.pose_at(t))
    })
}

fn gather(world: &mut World) -> Vec<Candidate> {
    let mut query = world.query::<(Entity, &Collider, Option<&RigidBody>)>();
    let world: &World = world;
    query
        .iter(world)
        .filter(|(_, collider, _)| !collider.sensor)
        .filter_map(|(entity, collider, body)| {
            let pose = world_transform(world, entity)?;
            let prev_pose = body
                .filter(|b| b.ccd && b.is_simulated())
                .map(|b| GlobalTransform2D::new(b.prev_position, b.prev_rotation));
            Some(Candidate {
                entity,
                collider: collider.clone(),
                pose,
                prev_pose,
                body: body.cloned(),
            })
        })
        .collect()
}

/// Find touching pairs and trigger a [`ContactEvent`] for each.
pub fn detect_contacts(world: &mut World) {
    let candidates = gather(world);

    let mut pairs = Vec::new();
    let mut contacts = Vec::new();
    {
        let registry = world.resource::<PinRegistry>();
        for (i, a) in candidates.iter().enumerate() {
            for b in &candidates[i + 1..] {
                if !a.moves() && !b.moves() {
                    continue;
                }
                if registry.are_jointed(a.entity, b.entity) {
                    continue;
                }
                if !overlaps(a.bounds(), b.bounds()) {
                    continue;
                }
                let Some(point) = sweep_contact(a, b) else {
                    continue;
                };
                pairs.push((a.entity, b.entity));
                contacts.push((point, a.velocity_at(point) - b.velocity_at(point)));
            }
        }
    }

    let phases = world.resource_mut::<ContactState>().update(&pairs);
    for (((a, b), (point, relative_velocity)), phase) in pairs.into_iter().zip(contacts).zip(phases)
    {
        debug!("Contact {:?} <-> {:?} at {:?} ({:?})", a, b, point, phase);
        world.trigger(ContactEvent {
            a,
            b,
            point,
            relative_velocity,
            phase,
        });
    }
    world.flush();
}
