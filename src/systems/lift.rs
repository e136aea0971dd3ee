//! Lift motion.

use bevy_ecs::hierarchy::ChildOf;
use bevy_ecs::prelude::*;
use glam::Vec2;

use crate::components::lift::Lift;
use crate::components::mapposition::MapPosition;
use crate::components::rigidbody::RigidBody;
use crate::resources::worldtime::WorldTime;

/// Move every lift one fixed step along its path.
///
/// The velocity is written back so contacts report how fast the platform
/// was moving.
pub fn lift_motion(
    time: Res<WorldTime>,
    mut query: Query<(&mut Lift, &mut MapPosition, Option<&mut RigidBody>), Without<ChildOf>>,
) {
    let dt = time.fixed_delta;
    if dt <= 0.0 {
        return;
    }
    for (mut lift, mut position, body) in query.iter_mut() {
        let next = lift.advance(position.pos, dt);
        let velocity = (next - position.pos) / dt;
        position.pos = next;
        if let Some(mut body) = body {
            body.velocity = if lift.is_moving() { velocity } else { Vec2::ZERO };
        }
    }
}
