//! Fixed-step integration for rigid bodies.
//!
//! The step is position based: [`integrate_bodies`] predicts new poses from
//! velocities and accelerations, the joint solver corrects them, and
//! [`derive_velocities`] turns the corrected displacement back into velocity.
//!
//! Only root entities are integrated. Children (strokes riding a lift) are
//! frozen and follow their parent through transform propagation.

use bevy_ecs::hierarchy::ChildOf;
use bevy_ecs::prelude::*;
use glam::Vec2;

use crate::components::mapposition::MapPosition;
use crate::components::rigidbody::RigidBody;
use crate::components::rotation::Rotation;
use crate::resources::gameconfig::GameConfig;
use crate::resources::worldtime::WorldTime;

/// Store the previous pose of every body and integrate dynamic ones.
pub fn integrate_bodies(
    time: Res<WorldTime>,
    config: Res<GameConfig>,
    mut query: Query<(&mut RigidBody, &mut MapPosition, Option<&mut Rotation>), Without<ChildOf>>,
) {
    let dt = time.fixed_delta;
    for (mut body, mut position, rotation) in query.iter_mut() {
        body.prev_position = position.pos;
        body.prev_rotation = rotation.as_ref().map_or(0.0, |r| r.degrees);

        if !body.is_simulated() {
            continue;
        }

        if body.freeze_position {
            body.velocity = Vec2::ZERO;
        } else {
            let acceleration = body.total_acceleration(config.gravity);
            body.velocity += acceleration * dt;
            position.pos += body.velocity * dt;
        }

        if body.freeze_rotation {
            body.angular_velocity = 0.0;
        } else {
            let drag = body.angular_drag;
            if drag > 0.0 {
                body.angular_velocity *= 1.0 / (1.0 + drag * dt);
            }
            if let Some(mut rotation) = rotation {
                rotation.degrees += body.angular_velocity * dt;
            }
        }
    }
}

/// Recompute velocities of dynamic bodies from their corrected displacement.
pub fn derive_velocities(
    time: Res<WorldTime>,
    mut query: Query<(&mut RigidBody, &MapPosition, Option<&Rotation>), Without<ChildOf>>,
) {
    let dt = time.fixed_delta;
    if dt <= 0.0 {
        return;
    }
    for (mut body, position, rotation) in query.iter_mut() {
        if !body.is_simulated() {
            continue;
        }
        if !body.freeze_position {
            body.velocity = (position.pos - body.prev_position) / dt;
        }
        if !body.freeze_rotation {
            let degrees = rotation.map_or(0.0, |r| r.degrees);
            body.angular_velocity = (degrees - body.prev_rotation) / dt;
        }
    }
}
