//! Demo playback.
//!
//! Runs only in the `Demo` state (see
//! [`state_is_demo`](crate::systems::gamestate::state_is_demo)). Each
//! [`DemoHand`] is stepped by the frame delta and its actions are applied
//! through the same stroke API as live input.

use bevy_ecs::prelude::*;
use log::info;

use crate::components::demohand::{DemoAction, DemoHand};
use crate::resources::worldtime::WorldTime;
use crate::systems::stroke::{add_stroke_point, begin_stroke, clear_all_strokes, end_stroke};
use crate::systems::zone::reactivate_zones;

pub fn demo_hand_system(world: &mut World) {
    let dt = world.resource::<WorldTime>().delta;
    let actions: Vec<DemoAction> = world
        .query::<&mut DemoHand>()
        .iter_mut(world)
        .flat_map(|mut hand| hand.advance(dt))
        .collect();

    for action in actions {
        match action {
            DemoAction::Begin(point) => {
                begin_stroke(world, point);
            }
            DemoAction::Add(point) => {
                add_stroke_point(world, point);
            }
            DemoAction::End => {
                end_stroke(world);
            }
            DemoAction::Restart => {
                clear_all_strokes(world);
                reactivate_zones(world);
                info!("Demo loop restarted");
            }
        }
    }
}
