//! World pose propagation for bodies and their children.
//!
//! Computes [`GlobalTransform2D`] for every positioned entity. Roots (no
//! [`ChildOf`]) copy their local pose; descendants, such as strokes riding a
//! lift, compose their local pose with the parent's.
//!
//! # Schedule position
//!
//! Runs after every system that moves bodies (integration, joint solving,
//! lifts, gears) and before contact detection, so that collision sees
//! up-to-date world poses.

use bevy_ecs::hierarchy::{ChildOf, Children};
use bevy_ecs::prelude::*;

use crate::components::globaltransform2d::GlobalTransform2D;
use crate::components::mapposition::MapPosition;
use crate::components::rotation::Rotation;
use crate::geometry::rotate;

/// Propagate transforms from roots down through the hierarchy.
///
/// Entities that already have a `GlobalTransform2D` are updated in place.
/// Entities missing the component get it inserted via deferred [`Commands`]
/// (visible after the command flush).
pub fn propagate_transforms(
    roots: Query<(Entity, &MapPosition, Option<&Rotation>, Option<&Children>), Without<ChildOf>>,
    children_query: Query<(&MapPosition, Option<&Rotation>, Option<&Children>), With<ChildOf>>,
    mut globals: Query<&mut GlobalTransform2D>,
    mut commands: Commands,
) {
    for (root_entity, pos, rot, children) in roots.iter() {
        let root_gt = GlobalTransform2D {
            position: pos.pos,
            rotation_degrees: rot.map(|r| r.degrees).unwrap_or(0.0),
        };

        write_global(root_entity, root_gt, &mut globals, &mut commands);

        if let Some(children) = children {
            propagate_children(
                &root_gt,
                children,
                &children_query,
                &mut globals,
                &mut commands,
            );
        }
    }
}

fn write_global(
    entity: Entity,
    gt: GlobalTransform2D,
    globals: &mut Query<&mut GlobalTransform2D>,
    commands: &mut Commands,
) {
    if let Ok(mut current) = globals.get_mut(entity) {
        // Avoid flagging unchanged poses as changed.
        if *current != gt {
            *current = gt;
        }
    } else {
        commands.entity(entity).insert(gt);
    }
}

fn propagate_children(
    parent_gt: &GlobalTransform2D,
    children: &Children,
    children_query: &Query<(&MapPosition, Option<&Rotation>, Option<&Children>), With<ChildOf>>,
    globals: &mut Query<&mut GlobalTransform2D>,
    commands: &mut Commands,
) {
    for child_entity in children.iter() {
        let Ok((pos, rot, maybe_grandchildren)) = children_query.get(child_entity) else {
            continue;
        };

        let local_rot = rot.map(|r| r.degrees).unwrap_or(0.0);
        let child_gt = GlobalTransform2D {
            position: parent_gt.position + rotate(pos.pos, parent_gt.rotation_degrees),
            rotation_degrees: parent_gt.rotation_degrees + local_rot,
        };

        write_global(child_entity, child_gt, globals, commands);

        if let Some(grandchildren) = maybe_grandchildren {
            propagate_children(&child_gt, grandchildren, children_query, globals, commands);
        }
    }
}

/// Current world pose of `entity`.
///
/// Roots read their local pose directly, so the result is exact even between
/// propagation passes; children fall back to their last propagated
/// [`GlobalTransform2D`].
pub fn world_transform(world: &World, entity: Entity) -> Option<GlobalTransform2D> {
    if world.get::<ChildOf>(entity).is_some() {
        return world.get::<GlobalTransform2D>(entity).copied();
    }
    let pos = world.get::<MapPosition>(entity)?;
    let rotation = world.get::<Rotation>(entity).map(|r| r.degrees).unwrap_or(0.0);
    Some(GlobalTransform2D::new(pos.pos, rotation))
}
