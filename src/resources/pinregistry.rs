//! Registry of stroke-to-mechanism pins.
//!
//! Each pin groups the joints that fasten one stroke to one mechanism: a
//! hinge and, when the stroke does not pass over the mechanism's center, a
//! max-distance joint. Removal is keyed by any joint of the pin and is
//! idempotent, so repeated break reports tear a pin down only once.

use bevy_ecs::prelude::{Entity, Resource};
use rustc_hash::FxHashMap;
use smallvec::SmallVec;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pin {
    pub stroke: Entity,
    pub hinge: Entity,
    pub distance: Option<Entity>,
}

impl Pin {
    pub fn joints(&self) -> impl Iterator<Item = Entity> {
        std::iter::once(self.hinge).chain(self.distance)
    }

    pub fn owns_joint(&self, joint: Entity) -> bool {
        self.hinge == joint || self.distance == Some(joint)
    }
}

#[derive(Resource, Debug, Clone, Default)]
pub struct PinRegistry {
    pins: FxHashMap<Entity, SmallVec<[Pin; 2]>>,
}

impl PinRegistry {
    pub fn register(&mut self, mechanism: Entity, pin: Pin) {
        self.pins.entry(mechanism).or_default().push(pin);
    }

    /// Whether `stroke` is already pinned to `mechanism`.
    pub fn is_pinned(&self, stroke: Entity, mechanism: Entity) -> bool {
        self.pins
            .get(&mechanism)
            .is_some_and(|pins| pins.iter().any(|p| p.stroke == stroke))
    }

    /// Whether any joint connects the two bodies, in either role.
    pub fn are_jointed(&self, a: Entity, b: Entity) -> bool {
        self.is_pinned(a, b) || self.is_pinned(b, a)
    }

    pub fn pin_count(&self, mechanism: Entity) -> usize {
        self.pins.get(&mechanism).map_or(0, |pins| pins.len())
    }

    pub fn pins_of(&self, mechanism: Entity) -> &[Pin] {
        self.pins
            .get(&mechanism)
            .map(|pins| pins.as_slice())
            .unwrap_or(&[])
    }

    /// Total number of joint entities held by all pins.
    pub fn joint_count(&self) -> usize {
        self.pins
            .values()
            .flat_map(|pins| pins.iter())
            .map(|p| p.joints().count())
            .sum()
    }

    /// Remove the pin owning `joint`. Returns `None` if it was already gone.
    pub fn remove_joint(&mut self, joint: Entity) -> Option<(Entity, Pin)> {
        let mut found = None;
        for (mechanism, pins) in self.pins.iter_mut() {
            if let Some(index) = pins.iter().position(|p| p.owns_joint(joint)) {
                found = Some((*mechanism, pins.remove(index)));
                break;
            }
        }
        if let Some((mechanism, _)) = found {
            self.drop_if_empty(mechanism);
        }
        found
    }

    /// Remove every pin in which `body` takes part, as stroke or mechanism.
    pub fn remove_all_for_body(&mut self, body: Entity) -> Vec<(Entity, Pin)> {
        let mut removed = Vec::new();
        if let Some(pins) = self.pins.remove(&body) {
            removed.extend(pins.into_iter().map(|p| (body, p)));
        }
        for (mechanism, pins) in self.pins.iter_mut() {
            pins.retain(|p| {
                if p.stroke == body {
                    removed.push((*mechanism, *p));
                    false
                } else {
                    true
                }
            });
        }
        self.pins.retain(|_, pins| !pins.is_empty());
        removed
    }

    fn drop_if_empty(&mut self, mechanism: Entity) {
        if self.pins.get(&mechanism).is_some_and(|p| p.is_empty()) {
            self.pins.remove(&mechanism);
        }
    }

    pub fn is_empty(&self) -> bool {
        self.pins.is_empty()
    }
}
