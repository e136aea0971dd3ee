use bevy_ecs::prelude::Component;

/// Rotation angle in degrees, counter-clockwise.
#[derive(Component, Clone, Debug, Copy, Default, PartialEq)]
pub struct Rotation {
    pub degrees: f32,
}
