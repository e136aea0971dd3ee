//! Scripted drawing hand used by the attract/demo mode.
//!
//! The hand walks a polyline at `move_speed`, producing the same
//! begin/add/end calls a player's pointer would. After the walk it waits
//! `delay_before_fall` before releasing the stroke, then `delay_before_restart`
//! before the scene is reset and the loop starts over.
//!
//! [`DemoHand::advance`] is pure: it returns the actions for this frame and
//! the [`demo_hand_system`](crate::systems::demohand::demo_hand_system)
//! applies them to the world.

use bevy_ecs::prelude::Component;
use glam::Vec2;

/// Shortest time spent on one path segment.
const MIN_SEGMENT_DURATION: f32 = 0.01;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DemoPhase {
    Idle,
    Drawing { segment: usize, t: f32 },
    WaitingToFall { remaining: f32 },
    WaitingToRestart { remaining: f32 },
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DemoAction {
    Begin(Vec2),
    Add(Vec2),
    End,
    Restart,
}

#[derive(Component, Debug, Clone, PartialEq)]
pub struct DemoHand {
    pub path: Vec<Vec2>,
    pub move_speed: f32,
    pub delay_before_fall: f32,
    pub delay_before_restart: f32,
    pub phase: DemoPhase,
    /// Current hand position.
    pub position: Vec2,
}

impl DemoHand {
    pub fn new(path: Vec<Vec2>) -> Self {
        let position = path.first().copied().unwrap_or(Vec2::ZERO);
        Self {
            path,
            move_speed: 4.0,
            delay_before_fall: 0.15,
            delay_before_restart: 1.5,
            phase: DemoPhase::Idle,
            position,
        }
    }

    pub fn with_timing(mut self, move_speed: f32, delay_before_fall: f32, delay_before_restart: f32) -> Self {
        self.move_speed = move_speed;
        self.delay_before_fall = delay_before_fall;
        self.delay_before_restart = delay_before_restart;
        self
    }

    pub fn is_drawing(&self) -> bool {
        matches!(self.phase, DemoPhase::Drawing { .. })
    }

    /// Abort the current loop. Returns true when a stroke was in progress
    /// and must be ended by the caller.
    pub fn interrupt(&mut self) -> bool {
        let was_drawing = self.is_drawing();
        self.phase = DemoPhase::Idle;
        was_drawing
    }

    /// Step the hand by `dt` seconds.
    pub fn advance(&mut self, dt: f32) -> Vec<DemoAction> {
        let mut actions = Vec::new();
        match self.phase {
            DemoPhase::Idle => {
                if self.path.len() < 2 {
                    return actions;
                }
                self.position = self.path[0];
                actions.push(DemoAction::Begin(self.position));
                self.phase = DemoPhase::Drawing { segment: 0, t: 0.0 };
            }
            DemoPhase::Drawing { segment, t } => {
                let from = self.path[segment];
                let to = self.path[segment + 1];
                let duration = (from.distance(to) / self.move_speed.max(f32::EPSILON))
                    .max(MIN_SEGMENT_DURATION);
                let t = t + dt;
                let k = (t / duration).clamp(0.0, 1.0);
                self.position = from.lerp(to, k);
                actions.push(DemoAction::Add(self.position));
                self.phase = if t < duration {
                    DemoPhase::Drawing { segment, t }
                } else if segment + 2 < self.path.len() {
                    DemoPhase::Drawing {
                        segment: segment + 1,
                        t: 0.0,
                    }
                } else {
                    DemoPhase::WaitingToFall {
                        remaining: self.delay_before_fall,
                    }
                };
            }
            DemoPhase::WaitingToFall { remaining } => {
                let remaining = remaining - dt;
                if remaining <= 0.0 {
                    actions.push(DemoAction::End);
                    self.phase = DemoPhase::WaitingToRestart {
                        remaining: self.delay_before_restart,
                    };
                } else {
                    self.phase = DemoPhase::WaitingToFall { remaining };
                }
            }
            DemoPhase::WaitingToRestart { remaining } => {
                let remaining = remaining - dt;
                if remaining <= 0.0 {
                    actions.push(DemoAction::Restart);
                    self.phase = DemoPhase::Idle;
                } else {
                    self.phase = DemoPhase::WaitingToRestart { remaining };
                }
            }
        }
        actions
    }
}
