use bevy_ecs::observer::On;
use bevy_ecs::prelude::*;

use crate::resources::worldsignals::WorldSignals;

/// World signal counting finalized strokes.
pub const STROKES_COMPLETED_SIGNAL: &str = "strokes_completed";
/// World signal counting strokes dropped on release.
pub const STROKES_DISCARDED_SIGNAL: &str = "strokes_discarded";

/// Fired exactly once when a stroke becomes a physics body.
///
/// Degenerate strokes that get discarded on release do not fire it.
#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub struct StrokeCompletedEvent {
    pub stroke: Entity,
}

/// Keeps the `strokes_completed` counter in [`WorldSignals`] up to date for
/// whatever game rules read it.
pub fn stroke_completed_observer(
    trigger: On<StrokeCompletedEvent>,
    mut world_signals: ResMut<WorldSignals>,
) {
    let count = world_signals.increment(STROKES_COMPLETED_SIGNAL);
    log::debug!(
        "Stroke {:?} completed ({} so far)",
        trigger.event().stroke,
        count
    );
}
