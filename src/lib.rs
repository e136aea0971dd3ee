//! inkpin library.
//!
//! Draw-to-physics stroke pipeline: pointer samples become ribbon meshes,
//! released ribbons become rigid bodies, and bodies touching gears or lifts
//! get pinned or mounted. Everything lives in a `bevy_ecs` world; see
//! [`game::build_world`] and [`game::FrameDriver`] for the entry points.

pub mod components;
pub mod error;
pub mod events;
pub mod game;
pub mod geometry;
pub mod resources;
pub mod systems;
