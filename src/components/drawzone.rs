//! Drawing zone state.
//!
//! A zone is a sensor collider tagged [`BodyTag::DrawZone`](super::bodytag::BodyTag).
//! Strokes may only begin and continue inside an `Active` zone. Releasing a
//! stroke retires the zone, either at once or through a short fade driven by a
//! [`Timer`](super::timer::Timer).

use bevy_ecs::prelude::Component;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ZoneState {
    #[default]
    Active,
    /// Fading out; no longer accepts strokes.
    Fading,
    Inactive,
}

#[derive(Component, Clone, Copy, Debug, PartialEq)]
pub struct DrawZone {
    pub state: ZoneState,
    /// Visual opacity, 1 while active and 0 once inactive.
    pub alpha: f32,
}

impl Default for DrawZone {
    fn default() -> Self {
        Self {
            state: ZoneState::Active,
            alpha: 1.0,
        }
    }
}

impl DrawZone {
    pub fn is_active(&self) -> bool {
        self.state == ZoneState::Active
    }

    pub fn begin_fade(&mut self) {
        self.state = ZoneState::Fading;
    }

    pub fn deactivate(&mut self) {
        self.state = ZoneState::Inactive;
        self.alpha = 0.0;
    }

    /// Bring the zone back, e.g. when the demo replays.
    pub fn reactivate(&mut self) {
        *self = Self::default();
    }
}
