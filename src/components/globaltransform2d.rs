//! Computed world-space pose for physics entities.
//!
//! Every body, collider and zone carries a [`GlobalTransform2D`]. For root
//! entities it mirrors [`MapPosition`](super::mapposition::MapPosition) and
//! [`Rotation`](super::rotation::Rotation); for entities with a
//! [`ChildOf`](bevy_ecs::hierarchy::ChildOf) parent it holds the composed
//! result of the ancestor chain. The
//! [`propagate_transforms`](crate::systems::propagate_transforms::propagate_transforms)
//! system keeps it current.
//!
//! Joint anchors are stored in body-local space and recovered through
//! [`GlobalTransform2D::transform_point`].

use bevy_ecs::prelude::*;
use glam::Vec2;

use crate::geometry::rotate;

#[derive(Component, Clone, Copy, Debug, Default, PartialEq)]
pub struct GlobalTransform2D {
    /// World-space position.
    pub position: Vec2,
    /// World-space rotation in degrees.
    pub rotation_degrees: f32,
}

impl GlobalTransform2D {
    pub fn new(position: Vec2, rotation_degrees: f32) -> Self {
        Self {
            position,
            rotation_degrees,
        }
    }

    /// Map a local point into world space.
    pub fn transform_point(&self, local: Vec2) -> Vec2 {
        self.position + rotate(local, self.rotation_degrees)
    }

    /// Map a world point into this entity's local space.
    pub fn inverse_transform_point(&self, world: Vec2) -> Vec2 {
        rotate(world - self.position, -self.rotation_degrees)
    }

    /// Map a local direction (no translation) into world space.
    pub fn transform_vector(&self, local: Vec2) -> Vec2 {
        rotate(local, self.rotation_degrees)
    }

    /// Express `self` relative to `parent`, as used when re-parenting.
    pub fn relative_to(&self, parent: &GlobalTransform2D) -> (Vec2, f32) {
        (
            parent.inverse_transform_point(self.position),
            self.rotation_degrees - parent.rotation_degrees,
        )
    }
}
