//! Position of an entity's origin.
//!
//! For root entities this is a world-space position. For entities with a
//! [`ChildOf`](bevy_ecs::hierarchy::ChildOf) parent (strokes riding a lift)
//! it is relative to the parent; see
//! [`GlobalTransform2D`](super::globaltransform2d::GlobalTransform2D) for the
//! resolved world pose.
//!
//! For physics bodies the origin is also the center of mass.

use bevy_ecs::prelude::Component;
use glam::Vec2;

#[derive(Component, Clone, Copy, Debug, Default, PartialEq)]
pub struct MapPosition {
    pub pos: Vec2,
}

impl MapPosition {
    pub fn new(x: f32, y: f32) -> Self {
        Self {
            pos: Vec2::new(x, y),
        }
    }

    pub fn from_vec(pos: Vec2) -> Self {
        Self { pos }
    }
}
