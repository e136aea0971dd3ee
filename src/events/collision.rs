//! Contact events produced by the physics step.
//!
//! [`detect_contacts`](crate::systems::collision::detect_contacts) triggers a
//! [`ContactEvent`] for every overlapping, non-sensor pair it finds. The
//! attachment resolver is the main subscriber; it dispatches on the bodies'
//! [`BodyTag`](crate::components::bodytag::BodyTag).
use bevy_ecs::prelude::*;
use glam::Vec2;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContactPhase {
    /// First step the pair touches.
    Enter,
    /// The pair was already touching last step.
    Stay,
}

/// Event fired when two colliders touch during a physics step.
///
/// No ordering guarantees are provided between `a` and `b`.
#[derive(Event, Debug, Clone, Copy)]
pub struct ContactEvent {
    pub a: Entity,
    pub b: Entity,
    /// World-space contact point.
    pub point: Vec2,
    /// Velocity of `a` relative to `b` at the contact point.
    pub relative_velocity: Vec2,
    pub phase: ContactPhase,
}

impl ContactEvent {
    /// The participant that is not `entity`, if `entity` takes part at all.
    pub fn other(&self, entity: Entity) -> Option<Entity> {
        if self.a == entity {
            Some(self.b)
        } else if self.b == entity {
            Some(self.a)
        } else {
            None
        }
    }
}
