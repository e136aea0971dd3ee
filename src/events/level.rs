use bevy_ecs::observer::On;
use bevy_ecs::prelude::*;

use crate::systems::stroke::clear_all_strokes;

/// The current level is going away; strokes and their joints must go too.
#[derive(Event, Debug, Clone, Copy, Default)]
pub struct LevelUnloadEvent;

pub fn level_unload_observer(_trigger: On<LevelUnloadEvent>, mut commands: Commands) {
    log::info!("Level unloading, clearing strokes");
    commands.queue(|world: &mut World| {
        clear_all_strokes(world);
    });
}
