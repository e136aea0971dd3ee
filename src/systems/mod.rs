//! Engine systems.
//!
//! Submodules overview
//! - [`attachment`] – pin strokes to gears and mount them on lifts
//! - [`collision`] – contact detection and [`ContactEvent`](crate::events::collision::ContactEvent) emission
//! - [`demohand`] – apply demo hand actions to the stroke API
//! - [`gamestate`] – pending state check and state run conditions
//! - [`gear`] – self-rotating gears
//! - [`input`] – pointer samples to stroke calls
//! - [`joints`] – position-based joint solver and break detection
//! - [`lift`] – lift motion
//! - [`physics`] – body integration and velocity derivation
//! - [`propagate_transforms`] – world poses through the hierarchy
//! - [`stroke`] – begin, extend, finalize and clear strokes
//! - [`time`] – frame clock and timers
//! - [`zone`] – drawing zone gate and fade

pub mod attachment;
pub mod collision;
pub mod demohand;
pub mod gamestate;
pub mod gear;
pub mod input;
pub mod joints;
pub mod lift;
pub mod physics;
pub mod propagate_transforms;
pub mod stroke;
pub mod time;
pub mod zone;
