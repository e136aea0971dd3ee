//! Layer name to [`BodyTag`] resolution.
//!
//! Scenes name layers with strings; the registry maps them once, at spawn
//! time, onto the closed [`BodyTag`] enum so that the hot paths compare enum
//! values instead of strings.
//!
//! A role whose layer name is not configured is a configuration error: it is
//! reported once by [`TagRegistry::validate`] and the role simply never
//! classifies, so the matching feature turns into a no-op.

use bevy_ecs::prelude::Resource;
use log::warn;
use rustc_hash::FxHashMap;

use crate::components::bodytag::BodyTag;
use crate::resources::gameconfig::LayerNames;

#[derive(Resource, Debug, Clone, Default)]
pub struct TagRegistry {
    by_name: FxHashMap<String, BodyTag>,
    missing: Vec<BodyTag>,
    validated: bool,
}

impl TagRegistry {
    pub fn from_layers(layers: &LayerNames) -> Self {
        let mut registry = Self::default();
        for (name, tag) in [
            (&layers.draw_zone, BodyTag::DrawZone),
            (&layers.line, BodyTag::Line),
            (&layers.gear, BodyTag::Gear),
            (&layers.lift, BodyTag::Lift),
        ] {
            let name = name.trim();
            if name.is_empty() {
                registry.missing.push(tag);
            } else {
                registry.by_name.insert(name.to_string(), tag);
            }
        }
        registry
    }

    /// Map a layer name to its tag. Unknown names are [`BodyTag::Other`].
    pub fn classify(&self, layer_name: &str) -> BodyTag {
        self.by_name
            .get(layer_name)
            .copied()
            .unwrap_or(BodyTag::Other)
    }

    /// Warn about unconfigured roles. Only the first call reports.
    ///
    /// Returns the roles that are missing.
    pub fn validate(&mut self) -> &[BodyTag] {
        if !self.validated {
            self.validated = true;
            for tag in &self.missing {
                warn!(
                    "No layer configured for {:?}; that role will never classify",
                    tag
                );
            }
        }
        &self.missing
    }
}
