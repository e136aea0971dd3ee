//! Pointer input.
//!
//! [`pointer_input`] drains the [`PointerSample`] message stream once per
//! frame and maps each sample onto the stroke API:
//! `Began` starts a stroke, `Moved` and `Stationary` extend it, `Ended`
//! releases it.
//!
//! Only `Playing` accepts new input. `Ended` is always honoured, so a stroke
//! never stays half-drawn when the game pauses mid-gesture.
use bevy_ecs::message::Messages;
use bevy_ecs::prelude::*;
use log::debug;

use crate::events::input::{PointerPhase, PointerSample};
use crate::resources::gamestate::GameState;
use crate::systems::stroke::{add_stroke_point, begin_stroke, end_stroke};

/// Feed queued pointer samples into the stroke API.
pub fn pointer_input(world: &mut World) {
    let samples: Vec<PointerSample> = match world.get_resource_mut::<Messages<PointerSample>>() {
        Some(mut messages) => messages.drain().collect(),
        None => return,
    };
    if samples.is_empty() {
        return;
    }
    let input_allowed = world
        .get_resource::<GameState>()
        .is_some_and(|state| state.is_input_allowed());

    for sample in samples {
        match sample.phase {
            PointerPhase::Ended => {
                end_stroke(world);
            }
            _ if !input_allowed => {
                debug!("Pointer sample ignored: input is not allowed");
            }
            PointerPhase::Began => {
                begin_stroke(world, sample.position);
            }
            PointerPhase::Moved | PointerPhase::Stationary => {
                add_stroke_point(world, sample.position);
            }
        }
    }
}
