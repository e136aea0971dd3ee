//! Current and requested game state.
//!
//! Input gating and the demo driver both read [`GameState`]. Transitions go
//! through [`NextGameState`]: a request sits there until the
//! [`GameStateChangedEvent`](crate::events::gamestate::GameStateChangedEvent)
//! observer applies it and runs the exit hook of the state being left.

use bevy_ecs::prelude::Resource;

#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub enum GameStates {
    /// Nothing loaded yet.
    #[default]
    None,
    /// Attract mode: a scripted hand draws, player input is ignored.
    Demo,
    Playing,
    Paused,
    Finished,
}

/// A transition request, or the lack of one.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub enum NextGameStates {
    #[default]
    Unchanged,
    Pending(GameStates),
}

#[derive(Resource, Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct GameState {
    current: GameStates,
}

impl GameState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self) -> &GameStates {
        &self.current
    }

    /// Overwrite the state without running any hook.
    pub fn set(&mut self, state: GameStates) {
        self.current = state;
    }

    /// Live pointer input may only draw while playing.
    pub fn is_input_allowed(&self) -> bool {
        self.current == GameStates::Playing
    }
}

#[derive(Resource, Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct NextGameState {
    next: NextGameStates,
}

impl NextGameState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self) -> &NextGameStates {
        &self.next
    }

    /// Queue a transition. A later request replaces an unapplied one.
    pub fn set(&mut self, next: GameStates) {
        self.next = NextGameStates::Pending(next);
    }

    pub fn reset(&mut self) {
        self.next = NextGameStates::Unchanged;
    }
}
