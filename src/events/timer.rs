//! Timer expiry.
//!
//! [`update_timers`](crate::systems::time::update_timers) triggers a
//! [`TimerEvent`] each time a [`Timer`](crate::components::timer::Timer)
//! elapses. Timers repeat, so an observer wanting a one-shot removes the
//! component itself, as
//! [`zone_timer_observer`](crate::systems::zone::zone_timer_observer) does
//! for [`ZONE_FADED_SIGNAL`](crate::components::timer::ZONE_FADED_SIGNAL).

use bevy_ecs::prelude::*;

#[derive(Event, Debug, Clone, PartialEq, Eq)]
pub struct TimerEvent {
    /// Entity carrying the timer.
    pub entity: Entity,
    /// Signal name set on the timer; observers filter on it.
    pub signal: String,
}
