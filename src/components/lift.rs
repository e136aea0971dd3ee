//! Moving platform that strokes ride on.
//!
//! A lift shuttles between `point_a` and `point_b` at constant speed, pausing
//! `wait_at_ends` seconds at each end. Strokes that touch it are re-parented
//! under it and carried along (see
//! [`attach_to_lift`](crate::systems::attachment::attach_to_lift)).

use bevy_ecs::prelude::{Component, Entity};
use glam::Vec2;

/// Distance at which the lift counts as arrived.
const ARRIVAL_EPSILON: f32 = 0.001;

#[derive(Component, Debug, Clone, PartialEq)]
pub struct Lift {
    pub point_a: Vec2,
    pub point_b: Vec2,
    /// World units per second.
    pub speed: f32,
    pub wait_at_ends: f32,
    pub auto_start: bool,
    moving: bool,
    toward_b: bool,
    wait_remaining: f32,
}

impl Lift {
    pub fn new(point_a: Vec2, point_b: Vec2, speed: f32) -> Self {
        Self {
            point_a,
            point_b,
            speed,
            wait_at_ends: 0.2,
            auto_start: false,
            moving: false,
            toward_b: true,
            wait_remaining: 0.0,
        }
    }

    pub fn with_wait(mut self, wait_at_ends: f32) -> Self {
        self.wait_at_ends = wait_at_ends;
        self
    }

    /// Start moving as soon as the lift is spawned.
    pub fn with_auto_start(mut self) -> Self {
        self.auto_start = true;
        self.moving = true;
        self
    }

    pub fn start(&mut self) {
        self.moving = true;
    }

    pub fn stop(&mut self) {
        self.moving = false;
    }

    pub fn toggle(&mut self) {
        self.moving = !self.moving;
    }

    pub fn is_moving(&self) -> bool {
        self.moving
    }

    /// End point of the current leg.
    pub fn target(&self) -> Vec2 {
        if self.toward_b {
            self.point_b
        } else {
            self.point_a
        }
    }

    /// Advance one step from `position` and return the new position.
    pub fn advance(&mut self, position: Vec2, dt: f32) -> Vec2 {
        if !self.moving {
            return position;
        }
        if self.wait_remaining > 0.0 {
            self.wait_remaining -= dt;
            return position;
        }
        let target = self.target();
        let next = move_towards(position, target, self.speed * dt);
        if next.distance(target) <= ARRIVAL_EPSILON {
            self.toward_b = !self.toward_b;
            self.wait_remaining = self.wait_at_ends;
            return target;
        }
        next
    }
}

fn move_towards(from: Vec2, to: Vec2, max_step: f32) -> Vec2 {
    let delta = to - from;
    let dist = delta.length();
    if dist <= max_step || dist <= f32::EPSILON {
        to
    } else {
        from + delta / dist * max_step
    }
}

/// Marks a stroke permanently riding on `lift`.
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq)]
pub struct LiftAttachment {
    pub lift: Entity,
}
