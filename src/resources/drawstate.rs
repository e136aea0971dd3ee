use bevy_ecs::prelude::{Entity, Resource};

/// The stroke currently being drawn, if any. Only one can be in progress.
#[derive(Resource, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DrawState {
    pub active: Option<ActiveStroke>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ActiveStroke {
    pub stroke: Entity,
    pub zone: Entity,
}

impl DrawState {
    pub fn is_drawing(&self) -> bool {
        self.active.is_some()
    }
}
