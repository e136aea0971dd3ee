use bevy_ecs::prelude::Component;

/// Role of a body in the puzzle, resolved once from its layer name at spawn
/// time by [`TagRegistry`](crate::resources::tagregistry::TagRegistry).
#[derive(Component, Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum BodyTag {
    DrawZone,
    /// A drawn stroke.
    Line,
    Gear,
    Lift,
    #[default]
    Other,
}

impl BodyTag {
    /// True for bodies a stroke can couple to.
    pub fn is_mechanism(&self) -> bool {
        matches!(self, BodyTag::Gear | BodyTag::Lift)
    }
}
