//! Joints between a stroke body and a mechanism body.
//!
//! A joint lives on its own entity. Anchors are stored in each body's local
//! space; at creation both anchors map back to the same world point.
//! [`solve_joints`](crate::systems::joints::solve_joints) enforces them every
//! physics step and records the reaction it had to apply, which is compared
//! against the break thresholds.

use bevy_ecs::prelude::{Component, Entity};
use glam::Vec2;

use crate::components::globaltransform2d::GlobalTransform2D;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum JointKind {
    /// Both anchors coincide; bodies rotate freely about the shared point.
    Hinge,
    /// Anchors are kept `distance` apart. With `max_distance_only` the
    /// joint only resists stretching.
    Distance {
        distance: f32,
        max_distance_only: bool,
    },
}

#[derive(Component, Debug, Clone, PartialEq)]
pub struct Joint {
    pub kind: JointKind,
    /// The stroke side.
    pub body_a: Entity,
    /// The mechanism side.
    pub body_b: Entity,
    pub anchor_a: Vec2,
    pub anchor_b: Vec2,
    pub break_force: Option<f32>,
    pub break_torque: Option<f32>,
    /// Reaction estimated during the last physics step.
    pub reaction_force: f32,
    pub reaction_torque: f32,
}

impl Joint {
    pub fn hinge(body_a: Entity, body_b: Entity, anchor_a: Vec2, anchor_b: Vec2) -> Self {
        Self {
            kind: JointKind::Hinge,
            body_a,
            body_b,
            anchor_a,
            anchor_b,
            break_force: None,
            break_torque: None,
            reaction_force: 0.0,
            reaction_torque: 0.0,
        }
    }

    pub fn max_distance(
        body_a: Entity,
        body_b: Entity,
        anchor_a: Vec2,
        anchor_b: Vec2,
        distance: f32,
    ) -> Self {
        Self {
            kind: JointKind::Distance {
                distance,
                max_distance_only: true,
            },
            ..Self::hinge(body_a, body_b, anchor_a, anchor_b)
        }
    }

    pub fn with_break_thresholds(mut self, force: Option<f32>, torque: Option<f32>) -> Self {
        self.break_force = force;
        self.break_torque = torque;
        self
    }

    pub fn is_hinge(&self) -> bool {
        self.kind == JointKind::Hinge
    }

    /// World positions of both anchors.
    pub fn world_anchors(
        &self,
        transform_a: &GlobalTransform2D,
        transform_b: &GlobalTransform2D,
    ) -> (Vec2, Vec2) {
        (
            transform_a.transform_point(self.anchor_a),
            transform_b.transform_point(self.anchor_b),
        )
    }

    /// True when the last recorded reaction exceeds a threshold.
    pub fn should_break(&self) -> bool {
        self.break_force.is_some_and(|f| self.reaction_force > f)
            || self.break_torque.is_some_and(|t| self.reaction_torque > t)
    }
}
