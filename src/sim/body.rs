//! Avatar physics
//!
//! Per-tick integration at a fixed simulation rate: no wall-clock scaling.

use crate::tuning::Tuning;

/// Which screen edge the avatar left through
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Boundary {
    Top,
    Bottom,
}

/// Result of one physics step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BodyStatus {
    InBounds,
    OutOfBounds(Boundary),
}

/// The avatar's vertical motion and tilt
#[derive(Debug, Clone, PartialEq)]
pub struct PhysicsBody {
    /// Top edge of the avatar sprite (world pixels, down is positive)
    pub y: f32,
    /// Pixels per tick, negative is upward
    pub velocity: f32,
    /// Tilt in degrees, always within [angle_min, angle_max]
    pub angle: f32,
    /// Ticks until another jump is accepted
    jump_cooldown: u32,
}

impl PhysicsBody {
    pub fn new(y: f32) -> Self {
        Self {
            y,
            velocity: 0.0,
            angle: 0.0,
            jump_cooldown: 0,
        }
    }

    /// Body at the tuning's start height
    pub fn at_start(tuning: &Tuning) -> Self {
        Self::new(tuning.avatar_start_y())
    }

    pub fn jump_cooldown(&self) -> u32 {
        self.jump_cooldown
    }

    /// Apply the upward impulse if the cooldown has elapsed.
    ///
    /// Returns true when the impulse was applied.
    pub fn jump(&mut self, tuning: &Tuning) -> bool {
        if self.jump_cooldown > 0 {
            return false;
        }
        self.velocity = tuning.jump_strength;
        self.jump_cooldown = tuning.jump_cooldown_ticks;
        true
    }

    /// Advance one tick: gravity, position, tilt, bounds, cooldown
    pub fn step(&mut self, tuning: &Tuning) -> BodyStatus {
        self.velocity += tuning.gravity;
        self.y += self.velocity;

        let target = if self.velocity < 0.0 {
            tuning.angle_max
        } else {
            tuning.angle_min
        };
        self.angle = ease_toward(self.angle, target, tuning.rotation_speed)
            .clamp(tuning.angle_min, tuning.angle_max);

        self.jump_cooldown = self.jump_cooldown.saturating_sub(1);

        self.bounds(tuning)
    }

    /// Check the avatar against the padded top and bottom edges
    pub fn bounds(&self, tuning: &Tuning) -> BodyStatus {
        if self.y < tuning.boundary_padding {
            BodyStatus::OutOfBounds(Boundary::Top)
        } else if self.y > tuning.screen_height - tuning.boundary_padding {
            BodyStatus::OutOfBounds(Boundary::Bottom)
        } else {
            BodyStatus::InBounds
        }
    }
}

/// Move `current` toward `target` by at most `delta`, never overshooting
#[inline]
fn ease_toward(current: f32, target: f32, delta: f32) -> f32 {
    if current > target {
        (current - delta).max(target)
    } else if current < target {
        (current + delta).min(target)
    } else {
        current
    }
}
