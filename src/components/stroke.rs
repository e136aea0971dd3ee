//! Drawn stroke entities.
//!
//! A [`Stroke`] owns its [`Ribbon`] buffers. While it is being drawn the
//! ribbon lives in world coordinates on an entity at the origin; on release
//! the stroke system recenters it on its centroid and turns the entity into a
//! dynamic body.

use bevy_ecs::prelude::{Component, Entity};
use glam::Vec2;

use crate::components::ribbon::Ribbon;

#[derive(Component, Debug, Clone)]
pub struct Stroke {
    pub ribbon: Ribbon,
    /// Set once the stroke has been converted into a physics body.
    pub finalized: bool,
    /// Zone the stroke started in.
    pub zone: Option<Entity>,
}

impl Stroke {
    pub fn new(ribbon: Ribbon, zone: Option<Entity>) -> Self {
        Self {
            ribbon,
            finalized: false,
            zone,
        }
    }
}

/// Render-side copy of the ribbon buffers.
#[derive(Component, Debug, Clone, Default, PartialEq)]
pub struct StrokeMesh {
    pub vertices: Vec<Vec2>,
    pub indices: Vec<[u32; 3]>,
    pub uvs: Vec<Vec2>,
}

impl StrokeMesh {
    pub fn from_ribbon(ribbon: &Ribbon) -> Self {
        Self {
            vertices: ribbon.vertices().to_vec(),
            indices: ribbon.indices().to_vec(),
            uvs: ribbon.uvs().to_vec(),
        }
    }
}
