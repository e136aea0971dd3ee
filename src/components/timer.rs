// Counts a number of seconds and then sends an event.
use bevy_ecs::prelude::Component;

/// Signal carried by the zone fade timer.
pub const ZONE_FADED_SIGNAL: &str = "zone_faded";

/// Countdown advanced by [`update_timers`](crate::systems::time::update_timers).
///
/// When `elapsed` reaches `duration` a
/// [`TimerEvent`](crate::events::timer::TimerEvent) is triggered and the timer
/// restarts. Removing the component cancels it.
#[derive(Component, Debug, Clone, PartialEq)]
pub struct Timer {
    pub duration: f32,
    pub elapsed: f32,
    pub signal: String,
}

impl Timer {
    pub fn new(duration: f32, signal: impl Into<String>) -> Self {
        Timer {
            duration,
            elapsed: 0.0,
            signal: signal.into(),
        }
    }

    pub fn reset(&mut self) {
        self.elapsed = 0.0;
    }

    /// Completed fraction in `[0, 1]`.
    pub fn progress(&self) -> f32 {
        if self.duration <= 0.0 {
            1.0
        } else {
            (self.elapsed / self.duration).clamp(0.0, 1.0)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_progress_and_reset() {
        let mut timer = Timer::new(0.5, ZONE_FADED_SIGNAL);
        timer.elapsed = 0.25;
        assert!((timer.progress() - 0.5).abs() < 1e-6);
        timer.elapsed = 2.0;
        assert_eq!(timer.progress(), 1.0);
        timer.reset();
        assert_eq!(timer.progress(), 0.0);
    }

    #[test]
    fn test_zero_duration_is_complete() {
        assert_eq!(Timer::new(0.0, "x").progress(), 1.0);
    }
}
