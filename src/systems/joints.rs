//! Position-based joint solver.
//!
//! Each iteration projects every joint once, Gauss-Seidel style: the anchor
//! error along the joint normal is split between the two bodies in
//! proportion to their generalized inverse masses
//! (`w = 1/m + cross(r, n)^2 / I`), moving and rotating them in place.
//!
//! The total correction a joint needed over the step gives its reaction
//! (`force ~ sum |lambda| / dt^2`), which is compared with the break
//! thresholds. Joints over a threshold trigger [`JointBreakEvent`].

use bevy_ecs::prelude::*;
use glam::Vec2;
use log::debug;

use crate::components::joint::{Joint, JointKind};
use crate::components::mapposition::MapPosition;
use crate::components::rigidbody::RigidBody;
use crate::components::rotation::Rotation;
use crate::events::joint::JointBreakEvent;
use crate::geometry::{cross, rotate};
use crate::resources::worldtime::WorldTime;
use crate::systems::propagate_transforms::world_transform;

pub const SOLVER_ITERATIONS: usize = 4;

/// Errors smaller than this are treated as solved.
const SLOP: f32 = 1e-6;

#[derive(Debug, Clone, Copy)]
struct BodyState {
    position: Vec2,
    rotation: f32,
    inverse_mass: f32,
    inverse_inertia: f32,
}

impl BodyState {
    /// World pose of `entity`. Only roots can have a nonzero inverse mass,
    /// so [`BodyState::write`] never touches a child's local pose.
    fn read(world: &World, entity: Entity) -> Option<Self> {
        let pose = world_transform(world, entity)?;
        let (position, rotation) = (pose.position, pose.rotation_degrees);
        let (inverse_mass, inverse_inertia) = world
            .get::<RigidBody>(entity)
            .map_or((0.0, 0.0), |b| (b.inverse_mass(), b.inverse_inertia()));
        Some(Self {
            position,
            rotation,
            inverse_mass,
            inverse_inertia,
        })
    }

    fn write(&self, world: &mut World, entity: Entity) {
        if self.inverse_mass > 0.0
            && let Some(mut position) = world.get_mut::<MapPosition>(entity)
        {
            position.pos = self.position;
        }
        if self.inverse_inertia > 0.0
            && let Some(mut rotation) = world.get_mut::<Rotation>(entity)
        {
            rotation.degrees = self.rotation;
        }
    }

    fn anchor(&self, local: Vec2) -> Vec2 {
        self.position + rotate(local, self.rotation)
    }

    fn generalized_inverse_mass(&self, r: Vec2, n: Vec2) -> f32 {
        let rn = cross(r, n);
        self.inverse_mass + self.inverse_inertia * rn * rn
    }

    /// Move the body by `impulse` applied at offset `r`.
    fn apply_correction(&mut self, r: Vec2, impulse: Vec2) {
        self.position += impulse * self.inverse_mass;
        self.rotation += (self.inverse_inertia * cross(r, impulse)).to_degrees();
    }
}

#[derive(Debug, Default, Clone, Copy)]
struct Reaction {
    impulse: f32,
    torque: f32,
}

/// Project one joint. Returns the correction magnitude and its torque arm.
fn project(joint: &Joint, a: &mut BodyState, b: &mut BodyState) -> Option<Reaction> {
    let pa = a.anchor(joint.anchor_a);
    let pb = b.anchor(joint.anchor_b);
    let delta = pb - pa;
    let length = delta.length();

    let error = match joint.kind {
        JointKind::Hinge => length,
        JointKind::Distance {
            distance,
            max_distance_only,
        } => {
            let stretch = length - distance;
            if max_distance_only && stretch <= 0.0 {
                return None;
            }
            stretch
        }
    };
    if error.abs() <= SLOP || length <= SLOP {
        return None;
    }

    let n = delta / length;
    let ra = pa - a.position;
    let rb = pb - b.position;
    let w = a.generalized_inverse_mass(ra, n) + b.generalized_inverse_mass(rb, n);
    if w <= 0.0 {
        return None;
    }

    let lambda = error / w;
    let impulse = n * lambda;
    a.apply_correction(ra, impulse);
    b.apply_correction(rb, -impulse);
    Some(Reaction {
        impulse: lambda.abs(),
        torque: cross(ra, impulse).abs(),
    })
}

/// Enforce every joint, record reactions and report breaks.
pub fn solve_joints(world: &mut World) {
    let dt = world.resource::<WorldTime>().fixed_delta;
    if dt <= 0.0 {
        return;
    }

    let joints: Vec<(Entity, Joint)> = world
        .query::<(Entity, &Joint)>()
        .iter(world)
        .map(|(entity, joint)| (entity, joint.clone()))
        .collect();
    if joints.is_empty() {
        return;
    }

    let mut reactions = vec![Reaction::default(); joints.len()];
    for _ in 0..SOLVER_ITERATIONS {
        for (index, (_, joint)) in joints.iter().enumerate() {
            let (Some(mut a), Some(mut b)) = (
                BodyState::read(world, joint.body_a),
                BodyState::read(world, joint.body_b),
            ) else {
                continue;
            };
            if let Some(reaction) = project(joint, &mut a, &mut b) {
                a.write(world, joint.body_a);
                b.write(world, joint.body_b);
                reactions[index].impulse += reaction.impulse;
                reactions[index].torque += reaction.torque;
            }
        }
    }

    let dt2 = dt * dt;
    let mut broken = Vec::new();
    for ((entity, _), reaction) in joints.iter().zip(&reactions) {
        let Some(mut joint) = world.get_mut::<Joint>(*entity) else {
            continue;
        };
        joint.reaction_force = reaction.impulse / dt2;
        joint.reaction_torque = reaction.torque / dt2;
        if joint.should_break() {
            debug!(
                "Joint {:?} over threshold (force {:.3}, torque {:.3})",
                entity, joint.reaction_force, joint.reaction_torque
            );
            broken.push(*entity);
        }
    }
    for joint in broken {
        world.trigger(JointBreakEvent { joint });
    }
    world.flush();
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx_eq(a: f32, b: f32) -> bool {
        (a - b).abs() < 1e-4
    }

    fn body(position: Vec2, inverse_mass: f32, inverse_inertia: f32) -> BodyState {
        BodyState {
            position,
            rotation: 0.0,
            inverse_mass,
            inverse_inertia,
        }
    }

    fn entities() -> (Entity, Entity) {
        let mut world = World::new();
        (world.spawn_empty().id(), world.spawn_empty().id())
    }

    #[test]
    fn test_hinge_pulls_free_body_onto_fixed_anchor() {
        let (ea, eb) = entities();
        let joint = Joint::hinge(ea, eb, Vec2::ZERO, Vec2::ZERO);
        let mut a = body(Vec2::new(0.0, -0.5), 1.0, 0.0);
        let mut b = body(Vec2::ZERO, 0.0, 0.0);
        let reaction = project(&joint, &mut a, &mut b).unwrap();
        assert!(approx_eq(a.position.y, 0.0));
        assert!(approx_eq(b.position.y, 0.0));
        assert!(approx_eq(reaction.impulse, 0.5));
    }

    #[test]
    fn test_equal_masses_share_correction() {
        let (ea, eb) = entities();
        let joint = Joint::hinge(ea, eb, Vec2::ZERO, Vec2::ZERO);
        let mut a = body(Vec2::new(-1.0, 0.0), 1.0, 0.0);
        let mut b = body(Vec2::new(1.0, 0.0), 1.0, 0.0);
        project(&joint, &mut a, &mut b).unwrap();
        assert!(approx_eq(a.position.x, 0.0));
        assert!(approx_eq(b.position.x, 0.0));
    }

    #[test]
    fn test_max_distance_only_ignores_slack() {
        let (ea, eb) = entities();
        let joint = Joint::max_distance(ea, eb, Vec2::ZERO, Vec2::ZERO, 2.0);
        let mut a = body(Vec2::new(1.0, 0.0), 1.0, 0.0);
        let mut b = body(Vec2::ZERO, 0.0, 0.0);
        assert!(project(&joint, &mut a, &mut b).is_none());
        assert_eq!(a.position, Vec2::new(1.0, 0.0));

        a.position = Vec2::new(3.0, 0.0);
        project(&joint, &mut a, &mut b).unwrap();
        assert!(approx_eq(a.position.x, 2.0));
    }

    #[test]
    fn test_off_center_anchor_rotates_body() {
        let (ea, eb) = entities();
        // Anchor one unit to the right of the body's origin, target below it.
        let joint = Joint::hinge(ea, eb, Vec2::new(1.0, 0.0), Vec2::ZERO);
        let mut a = body(Vec2::ZERO, 0.0, 1.0);
        let mut b = body(Vec2::new(1.0, -0.1), 0.0, 0.0);
        project(&joint, &mut a, &mut b).unwrap();
        // Pulling the right-hand anchor down is a clockwise turn.
        assert!(a.rotation < 0.0);
        assert_eq!(a.position, Vec2::ZERO);
    }

    #[test]
    fn test_immovable_pair_is_skipped() {
        let (ea, eb) = entities();
        let joint = Joint::hinge(ea, eb, Vec2::ZERO, Vec2::ZERO);
        let mut a = body(Vec2::new(0.0, 1.0), 0.0, 0.0);
        let mut b = body(Vec2::ZERO, 0.0, 0.0);
        assert!(project(&joint, &mut a, &mut b).is_none());
    }
}
