//! Pointer input stream.
//!
//! A platform layer (or a test) converts touches and mouse drags into world
//! coordinates and writes them as [`PointerSample`] messages. The
//! [`pointer_input`](crate::systems::input::pointer_input) system drains them
//! once per frame and drives the stroke API.

use bevy_ecs::message::Message;
use glam::Vec2;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PointerPhase {
    Began,
    Moved,
    Stationary,
    Ended,
}

/// One pointer sample in world coordinates.
#[derive(Message, Debug, Clone, Copy, PartialEq)]
pub struct PointerSample {
    pub position: Vec2,
    pub phase: PointerPhase,
}

impl PointerSample {
    pub fn new(x: f32, y: f32, phase: PointerPhase) -> Self {
        Self {
            position: Vec2::new(x, y),
            phase,
        }
    }
}
