//! Global signal storage resource.
//!
//! The [`WorldSignals`] resource provides a world-wide signal map for
//! cross-system communication. Game rules outside this crate (win/lose
//! timers, scoring) read it instead of querying entities.
//!
//! Keys written by this crate:
//! - `strokes_completed`: strokes turned into bodies
//! - `strokes_discarded`: strokes released before they had a body's worth of samples

use bevy_ecs::prelude::Resource;
use rustc_hash::FxHashMap;

/// Global signal storage for cross-system communication.
#[derive(Debug, Clone, Default, Resource)]
pub struct WorldSignals {
    /// Integer numeric signals addressed by string keys.
    pub integers: FxHashMap<String, i32>,
}

impl WorldSignals {
    /// Set an integer signal value.
    pub fn set_integer(&mut self, key: impl Into<String>, value: i32) {
        self.integers.insert(key.into(), value);
    }
    /// Get an integer signal by key.
    pub fn get_integer(&self, key: &str) -> Option<i32> {
        self.integers.get(key).copied()
    }
    /// Add one to an integer signal, starting from zero.
    pub fn increment(&mut self, key: &str) -> i32 {
        let value = self.integers.entry(key.to_string()).or_insert(0);
        *value += 1;
        *value
    }
}
