//! Rigid body component for strokes, gears and lifts.
//!
//! The [`RigidBody`] stores everything the fixed-step physics systems need to
//! move an entity: velocity (linear and angular), mass properties, gravity
//! scale and per-axis freezes.
//!
//! The body's origin ([`MapPosition`](super::mapposition::MapPosition)) is its
//! center of mass; finalized strokes are recentered so that this holds.
//!
//! The `frozen` flag disables all movement calculations, used when an entity's
//! pose is driven externally (e.g. a stroke riding a lift).

use bevy_ecs::prelude::Component;
use glam::Vec2;

/// How the physics step treats a body.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum BodyType {
    /// Integrated under gravity and moved by joints.
    #[default]
    Dynamic,
    /// Moved only by game systems (lifts, self-rotating gears).
    Kinematic,
    /// Never moves.
    Static,
}

/// Rigid body state advanced by the fixed-step systems.
///
/// # Example
/// ```ignore
/// let mut rb = RigidBody::dynamic(0.5, 0.01);
/// rb.gravity_scale = 1.0;
/// rb.apply_impulse(Vec2::new(0.0, -0.02));
/// ```
#[derive(Component, Clone, Debug)]
pub struct RigidBody {
    pub body_type: BodyType,
    /// Current velocity in world units per second.
    pub velocity: Vec2,
    /// Angular velocity in degrees per second.
    pub angular_velocity: f32,
    /// Multiplier applied to world gravity.
    pub gravity_scale: f32,
    pub mass: f32,
    /// Moment of inertia about the center of mass.
    pub inertia: f32,
    /// Angular damping factor, applied as `w *= 1 / (1 + drag * dt)`.
    pub angular_drag: f32,
    /// Lock translation (a gear spinning on its axle).
    pub freeze_position: bool,
    /// Lock rotation against joint and integration changes.
    pub freeze_rotation: bool,
    /// Sweep contact bounds over the step so fast bodies are not missed.
    pub ccd: bool,
    /// Renderers should interpolate between the previous and current pose.
    pub interpolate: bool,
    /// When true, the physics step skips this body entirely.
    pub frozen: bool,
    /// Pose at the start of the current physics step.
    pub prev_position: Vec2,
    pub prev_rotation: f32,
}

impl Default for RigidBody {
    fn default() -> Self {
        Self::dynamic(1.0, 1.0)
    }
}

impl RigidBody {
    /// Create a dynamic body with the given mass properties.
    pub fn dynamic(mass: f32, inertia: f32) -> Self {
        Self {
            body_type: BodyType::Dynamic,
            velocity: Vec2::ZERO,
            angular_velocity: 0.0,
            gravity_scale: 1.0,
            mass: mass.max(f32::EPSILON),
            inertia: inertia.max(f32::EPSILON),
            angular_drag: 0.0,
            freeze_position: false,
            freeze_rotation: false,
            ccd: false,
            interpolate: false,
            frozen: false,
            prev_position: Vec2::ZERO,
            prev_rotation: 0.0,
        }
    }

    /// Create a kinematic body (moved by game systems, immovable by joints).
    pub fn kinematic() -> Self {
        Self {
            body_type: BodyType::Kinematic,
            gravity_scale: 0.0,
            ..Self::dynamic(1.0, 1.0)
        }
    }

    /// World gravity as felt by this body.
    pub fn total_acceleration(&self, gravity: Vec2) -> Vec2 {
        gravity * self.gravity_scale
    }

    /// True when the physics step integrates this body.
    pub fn is_simulated(&self) -> bool {
        self.body_type == BodyType::Dynamic && !self.frozen
    }

    /// Inverse mass as seen by the joint solver (0 = immovable).
    pub fn inverse_mass(&self) -> f32 {
        if self.is_simulated() && !self.freeze_position {
            1.0 / self.mass
        } else {
            0.0
        }
    }

    /// Inverse inertia as seen by the joint solver (0 = cannot be rotated).
    pub fn inverse_inertia(&self) -> f32 {
        if self.is_simulated() && !self.freeze_rotation {
            1.0 / self.inertia
        } else {
            0.0
        }
    }

    /// Apply an instantaneous change in momentum at the center of mass.
    pub fn apply_impulse(&mut self, impulse: Vec2) {
        self.velocity += impulse * self.inverse_mass();
    }

    /// Velocity of a world point attached to the body, `r` being its offset
    /// from the center of mass.
    pub fn point_velocity(&self, r: Vec2) -> Vec2 {
        let w = self.angular_velocity.to_radians();
        self.velocity + Vec2::new(-w * r.y, w * r.x)
    }

    /// Freeze the body, preventing the physics step from updating it.
    pub fn freeze(&mut self) {
        self.frozen = true;
        self.velocity = Vec2::ZERO;
        self.angular_velocity = 0.0;
    }

    /// Pose between the previous and the current physics step, for renderers.
    pub fn interpolated_position(&self, current: Vec2, alpha: f32) -> Vec2 {
        if self.interpolate {
            self.prev_position.lerp(current, alpha.clamp(0.0, 1.0))
        } else {
            current
        }
    }
}
