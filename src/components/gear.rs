//! Gear mechanism.
//!
//! A gear is a circular body pinned in place on its axle. Strokes that touch
//! it are pinned with a hinge at the gear's center (plus a max-distance
//! holding joint when the stroke does not pass over the center). A gear
//! either spins freely, driven by the strokes hanging on it, or turns on its
//! own at a fixed rate ([`AutoRotate`]).
//!
//! The pin count is checked before any joint is created, so
//! `pin_count <= max_pins` holds at all times.

use bevy_ecs::prelude::Component;

/// Constant self-rotation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AutoRotate {
    pub degrees_per_second: f32,
    pub clockwise: bool,
}

impl AutoRotate {
    /// Angular velocity in degrees per second, counter-clockwise positive.
    pub fn signed_rate(&self) -> f32 {
        if self.clockwise {
            -self.degrees_per_second
        } else {
            self.degrees_per_second
        }
    }
}

#[derive(Component, Debug, Clone, PartialEq)]
pub struct Gear {
    pub max_pins: usize,
    pub pin_count: usize,
    /// Reaction force above which a pin joint snaps. `None` = unbreakable.
    pub break_force: Option<f32>,
    pub break_torque: Option<f32>,
    /// Downward impulse given to a stroke when it gets pinned.
    pub down_impulse: f32,
    pub auto_rotate: Option<AutoRotate>,
}

impl Default for Gear {
    fn default() -> Self {
        Self {
            max_pins: 1,
            pin_count: 0,
            break_force: None,
            break_torque: None,
            down_impulse: 0.02,
            auto_rotate: None,
        }
    }
}

impl Gear {
    pub fn new(max_pins: usize) -> Self {
        Self {
            max_pins,
            ..Default::default()
        }
    }

    /// Set break thresholds; values `<= 0` mean unbreakable.
    pub fn with_break_thresholds(mut self, force: f32, torque: f32) -> Self {
        self.break_force = (force > 0.0).then_some(force);
        self.break_torque = (torque > 0.0).then_some(torque);
        self
    }

    pub fn with_auto_rotate(mut self, degrees_per_second: f32, clockwise: bool) -> Self {
        self.auto_rotate = Some(AutoRotate {
            degrees_per_second,
            clockwise,
        });
        self
    }

    pub fn has_capacity(&self) -> bool {
        self.pin_count < self.max_pins
    }

    /// Claim a pin slot. Returns false when the gear is full.
    pub fn try_reserve(&mut self) -> bool {
        if self.has_capacity() {
            self.pin_count += 1;
            true
        } else {
            false
        }
    }

    /// Give back a pin slot.
    pub fn release(&mut self) {
        self.pin_count = self.pin_count.saturating_sub(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reserve_respects_capacity() {
        let mut gear = Gear::new(2);
        assert!(gear.try_reserve());
        assert!(gear.try_reserve());
        assert!(!gear.try_reserve());
        assert_eq!(gear.pin_count, 2);
    }

    #[test]
    fn test_release_never_underflows() {
        let mut gear = Gear::new(1);
        gear.release();
        assert_eq!(gear.pin_count, 0);
        assert!(gear.try_reserve());
        gear.release();
        gear.release();
        assert_eq!(gear.pin_count, 0);
    }

    #[test]
    fn test_non_positive_thresholds_are_unbreakable() {
        let gear = Gear::new(1).with_break_thresholds(0.0, -1.0);
        assert_eq!(gear.break_force, None);
        assert_eq!(gear.break_torque, None);
        let gear = Gear::new(1).with_break_thresholds(50.0, 10.0);
        assert_eq!(gear.break_force, Some(50.0));
        assert_eq!(gear.break_torque, Some(10.0));
    }

    #[test]
    fn test_auto_rotate_direction() {
        let gear = Gear::new(1).with_auto_rotate(90.0, true);
        assert_eq!(gear.auto_rotate.map(|a| a.signed_rate()), Some(-90.0));
    }
}
