use bevy_ecs::prelude::{Entity, Resource};
use rustc_hash::FxHashSet;

use crate::events::collision::ContactPhase;

/// Pairs that were touching at the end of the last physics step, used to
/// tell [`ContactPhase::Enter`] from [`ContactPhase::Stay`].
#[derive(Resource, Debug, Clone, Default)]
pub struct ContactState {
    touching: FxHashSet<(Entity, Entity)>,
}

fn key(a: Entity, b: Entity) -> (Entity, Entity) {
    if a <= b { (a, b) } else { (b, a) }
}

impl ContactState {
    /// Replace the touching set with `current` and report each pair's phase.
    pub fn update(&mut self, current: &[(Entity, Entity)]) -> Vec<ContactPhase> {
        let mut next = FxHashSet::default();
        let phases = current
            .iter()
            .map(|(a, b)| {
                let k = key(*a, *b);
                next.insert(k);
                if self.touching.contains(&k) {
                    ContactPhase::Stay
                } else {
                    ContactPhase::Enter
                }
            })
            .collect();
        self.touching = next;
        phases
    }

    /// Drop every pair involving `entity` (it was despawned).
    pub fn forget(&mut self, entity: Entity) {
        self.touching.retain(|(a, b)| *a != entity && *b != entity);
    }
}
