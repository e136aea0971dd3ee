//! Gear self-rotation.

use bevy_ecs::prelude::*;

use crate::components::gear::Gear;
use crate::components::rigidbody::RigidBody;
use crate::components::rotation::Rotation;
use crate::resources::worldtime::WorldTime;

/// Turn self-rotating gears by their fixed rate.
///
/// These gears are kinematic: the joint solver never rotates them, so
/// strokes pinned on them are carried around.
pub fn gear_auto_rotate(
    time: Res<WorldTime>,
    mut query: Query<(&Gear, &mut Rotation, Option<&mut RigidBody>)>,
) {
    let dt = time.fixed_delta;
    for (gear, mut rotation, body) in query.iter_mut() {
        let Some(auto_rotate) = gear.auto_rotate else {
            continue;
        };
        let rate = auto_rotate.signed_rate();
        rotation.degrees += rate * dt;
        if let Some(mut body) = body {
            body.angular_velocity = rate;
        }
    }
}
