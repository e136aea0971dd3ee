//! Time update systems.
//!
//! [`update_world_time`] advances the shared
//! [`WorldTime`](crate::resources::worldtime::WorldTime) resource once per
//! frame; [`update_timers`] advances every
//! [`Timer`](crate::components::timer::Timer) component with the scaled delta.
use bevy_ecs::prelude::*;

use crate::components::timer::Timer;
use crate::events::timer::TimerEvent;
use crate::resources::worldtime::WorldTime;

/// Update elapsed and delta seconds on the `WorldTime` resource.
///
/// `dt` is expected to be the unscaled frame delta in seconds. The system
/// applies the current `time_scale`, writes both `elapsed` and `delta`, and
/// banks the scaled delta for the physics steps.
pub fn update_world_time(world: &mut World, dt: f32) {
    let mut wt = world.resource_mut::<WorldTime>();
    let scaled_dt = dt.max(0.0) * wt.time_scale;
    wt.elapsed += scaled_dt;
    wt.delta = scaled_dt;
    wt.accumulator += scaled_dt;
    wt.frame_count += 1;
}

/// Advance timers and trigger a [`TimerEvent`] for each one that expires.
///
/// Expired timers restart by subtracting their duration; observers remove
/// the component when they want a one-shot.
pub fn update_timers(
    world_time: Res<WorldTime>,
    mut query: Query<(Entity, &mut Timer)>,
    mut commands: Commands,
) {
    for (entity, mut timer) in query.iter_mut() {
        timer.elapsed += world_time.delta;
        if timer.elapsed >= timer.duration {
            commands.trigger(TimerEvent {
                entity,
                signal: timer.signal.clone(),
            });
            let duration = timer.duration.max(0.0);
            timer.elapsed = (timer.elapsed - duration).max(0.0);
        }
    }
}
