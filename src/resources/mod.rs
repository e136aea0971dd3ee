//! ECS resources.
//!
//! Overview
//! - `contactstate` – pairs touching at the last physics step
//! - `drawstate` – the stroke currently being drawn, if any
//! - `gameconfig` – tuning values loaded from `config.ini`
//! - `gamestate` – authoritative and pending high-level game state
//! - `pinregistry` – joints grouped by the stroke/mechanism pin they form
//! - `tagregistry` – layer name to body tag mapping
//! - `worldsignals` – integer counters read by game rules
//! - `worldtime` – frame and fixed-step clocks
pub mod contactstate;
pub mod drawstate;
pub mod gameconfig;
pub mod gamestate;
pub mod pinregistry;
pub mod tagregistry;
pub mod worldsignals;
pub mod worldtime;
