//! State transition event.
//!
//! A transition is requested through [`NextGameState`] and applied when a
//! [`GameStateChangedEvent`] reaches [`observe_gamestate_change_event`].
//! Leaving `Demo` interrupts the demo hand and releases its stroke like a
//! player lifting the finger.
use crate::components::demohand::DemoHand;
use crate::resources::drawstate::DrawState;
use crate::resources::gamestate::{GameState, GameStates, NextGameState, NextGameStates};
use crate::systems::stroke::end_stroke;
use bevy_ecs::observer::On;
use bevy_ecs::prelude::*;
use log::{debug, info, warn};

/// Apply whatever transition is pending in [`NextGameState`].
#[derive(Event, Debug, Clone, Copy)]
pub struct GameStateChangedEvent {}

/// Move [`GameState`] to the pending state and run the exit hook of the old
/// one. Does nothing when no transition is pending.
pub fn observe_gamestate_change_event(
    _trigger: On<GameStateChangedEvent>,
    mut commands: Commands,
    next_game_state: Option<ResMut<NextGameState>>,
    game_state: Option<ResMut<GameState>>,
) {
    let (Some(mut next_game_state), Some(mut game_state)) = (next_game_state, game_state) else {
        warn!("GameStateChangedEvent without game state resources");
        return;
    };
    let NextGameStates::Pending(new_state) = next_game_state.get().clone() else {
        debug!("No state change pending");
        return;
    };

    let old_state = game_state.get().clone();
    info!("Game state {:?} -> {:?}", old_state, new_state);
    game_state.set(new_state);
    next_game_state.reset();

    if old_state == GameStates::Demo {
        commands.queue(interrupt_demo);
    }
}

/// A demo stroke cut short is released like a normal one.
fn interrupt_demo(world: &mut World) {
    let mut interrupted = false;
    let mut hands = world.query::<&mut DemoHand>();
    for mut hand in hands.iter_mut(world) {
        interrupted |= hand.interrupt();
    }
    if interrupted && world.resource::<DrawState>().is_drawing() {
        end_stroke(world);
    }
}
