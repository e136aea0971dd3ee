use bevy_ecs::prelude::Resource;

/// Default fixed physics step in seconds.
pub const DEFAULT_FIXED_DELTA: f32 = 0.02;

/// Frame and physics clocks.
///
/// `delta` is the scaled frame delta. Physics systems read `fixed_delta`
/// instead; `accumulator` holds frame time not yet consumed by physics steps.
#[derive(Resource, Clone, Copy, Debug)]
pub struct WorldTime {
    pub elapsed: f32,
    pub delta: f32,
    pub time_scale: f32,
    pub fixed_delta: f32,
    pub accumulator: f32,
    pub frame_count: u64,
}

impl Default for WorldTime {
    fn default() -> Self {
        WorldTime {
            elapsed: 0.0,
            delta: 0.0,
            time_scale: 1.0,
            fixed_delta: DEFAULT_FIXED_DELTA,
            accumulator: 0.0,
            frame_count: 0,
        }
    }
}

impl WorldTime {
    pub fn with_time_scale(mut self, time_scale: f32) -> Self {
        self.time_scale = time_scale;
        self
    }

    pub fn with_fixed_delta(mut self, fixed_delta: f32) -> Self {
        self.fixed_delta = fixed_delta;
        self
    }

    /// Interpolation factor between the last two physics poses.
    pub fn alpha(&self) -> f32 {
        if self.fixed_delta <= 0.0 {
            1.0
        } else {
            (self.accumulator / self.fixed_delta).clamp(0.0, 1.0)
        }
    }
}
