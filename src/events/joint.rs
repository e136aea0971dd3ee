use bevy_ecs::prelude::*;

/// A joint's reaction exceeded its break threshold.
///
/// May fire more than once for the same joint before the teardown lands; the
/// handler is idempotent.
#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub struct JointBreakEvent {
    pub joint: Entity,
}
