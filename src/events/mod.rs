//! Event types and observers.
//!
//! Submodules:
//! - [`collision`] – contacts reported by the physics step
//! - [`gamestate`] – state transition event and the observer applying it
//! - [`input`] – pointer samples written by the platform layer
//! - [`joint`] – a joint exceeded its break threshold
//! - [`level`] – level unload, which clears every stroke
//! - [`stroke`] – stroke completion and its bookkeeping observer
//! - [`timer`] – a [`Timer`](crate::components::timer::Timer) elapsed
pub mod collision;
pub mod gamestate;
pub mod input;
pub mod joint;
pub mod level;
pub mod stroke;
pub mod timer;
