//! ECS components.
//!
//! Submodules overview:
//! - [`bodytag`] – role of a body (zone, stroke, gear, lift), resolved from its layer name
//! - [`collider`] – box, circle and polygon shapes with point and overlap queries
//! - [`demohand`] – scripted hand that draws in demo mode
//! - [`drawzone`] – area where strokes may start, with its fade state
//! - [`gear`] – pin capacity, break thresholds and self-rotation of a gear
//! - [`globaltransform2d`] – world pose computed by transform propagation
//! - [`joint`] – hinge and max-distance joints between a stroke and a mechanism
//! - [`lift`] – moving platform and the marker of strokes riding it
//! - [`mapposition`] – local position of an entity
//! - [`ribbon`] – thick-line mesh builder fed by pointer samples
//! - [`rigidbody`] – mass, velocity and integration flags of a physics body
//! - [`rotation`] – local rotation in degrees
//! - [`stroke`] – a drawn line and its render mesh
//! - [`timer`] – repeating timer that triggers an event when it elapses

pub mod bodytag;
pub mod collider;
pub mod demohand;
pub mod drawzone;
pub mod gear;
pub mod globaltransform2d;
pub mod joint;
pub mod lift;
pub mod mapposition;
pub mod ribbon;
pub mod rigidbody;
pub mod rotation;
pub mod stroke;
pub mod timer;
