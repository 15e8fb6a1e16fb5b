//! Data-driven game balance
//!
//! Every gameplay constant the simulation reads, grouped so a settings file
//! can override any of them. Defaults are the reference values in [`crate::consts`].

use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::ms_to_ticks;

/// How avatar/obstacle overlap is decided
///
/// Pixel masks forgive near-misses where sprites have transparent padding;
/// bounding boxes are stricter and end some runs the mask test would allow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CollisionStrategy {
    #[default]
    PixelMask,
    BoundingBox,
}

impl CollisionStrategy {
    pub fn as_str(&self) -> &'static str {
        match self {
            CollisionStrategy::PixelMask => "pixel_mask",
            CollisionStrategy::BoundingBox => "bounding_box",
        }
    }
}

/// Gameplay constants
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    // === Field ===
    pub screen_width: f32,
    pub screen_height: f32,
    pub tick_rate_hz: u32,

    // === Avatar ===
    pub gravity: f32,
    /// Negative: an upward impulse
    pub jump_strength: f32,
    pub jump_cooldown_ticks: u32,
    pub angle_max: f32,
    pub angle_min: f32,
    pub rotation_speed: f32,
    pub boundary_padding: f32,
    pub avatar_x: f32,
    pub avatar_width: u32,
    pub avatar_height: u32,

    // === Obstacles ===
    pub pipe_width: u32,
    pub pipe_height: u32,
    pub pipe_speed: f32,
    pub pipe_interval_ms: u32,
    pub gap_height: f32,
    pub gap_top_min: f32,
    pub gap_top_max: f32,

    // === Flow ===
    pub countdown_steps: u8,
    pub background_speed: f32,
    pub collision: CollisionStrategy,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            screen_width: SCREEN_WIDTH,
            screen_height: SCREEN_HEIGHT,
            tick_rate_hz: TICK_RATE_HZ,

            gravity: GRAVITY,
            jump_strength: JUMP_STRENGTH,
            jump_cooldown_ticks: JUMP_COOLDOWN_TICKS,
            angle_max: ANGLE_MAX,
            angle_min: ANGLE_MIN,
            rotation_speed: ROTATION_SPEED,
            boundary_padding: BOUNDARY_PADDING,
            avatar_x: AVATAR_X,
            avatar_width: AVATAR_WIDTH,
            avatar_height: AVATAR_HEIGHT,

            pipe_width: PIPE_WIDTH,
            pipe_height: PIPE_HEIGHT,
            pipe_speed: PIPE_SPEED,
            pipe_interval_ms: PIPE_INTERVAL_MS,
            gap_height: GAP_HEIGHT,
            gap_top_min: GAP_TOP_MIN,
            gap_top_max: GAP_TOP_MAX,

            countdown_steps: COUNTDOWN_STEPS,
            background_speed: BACKGROUND_SPEED,
            collision: CollisionStrategy::PixelMask,
        }
    }
}

/// Largest sprite edge (world pixels) a settings file may ask for
pub const MAX_SPRITE_EDGE: u32 = 4096;

impl Tuning {
    /// Ticks between obstacle spawns
    pub fn spawn_interval_ticks(&self) -> u32 {
        ms_to_ticks(self.pipe_interval_ms, self.tick_rate_hz)
    }

    /// Ticks per countdown step (one second)
    pub fn countdown_step_ticks(&self) -> u32 {
        self.tick_rate_hz.max(1)
    }

    /// Starting height of the avatar
    pub fn avatar_start_y(&self) -> f32 {
        (self.screen_height / 2.0).floor()
    }

    /// Repair values a hand-edited settings file could get wrong.
    ///
    /// Swapped ranges are reordered, non-positive rates are raised and sprite
    /// sizes are clamped to `1..=MAX_SPRITE_EDGE`.
    pub fn sanitized(mut self) -> Self {
        if self.angle_min > self.angle_max {
            std::mem::swap(&mut self.angle_min, &mut self.angle_max);
        }
        if self.gap_top_min > self.gap_top_max {
            std::mem::swap(&mut self.gap_top_min, &mut self.gap_top_max);
        }
        self.tick_rate_hz = self.tick_rate_hz.max(1);
        self.rotation_speed = self.rotation_speed.abs();
        self.pipe_speed = self.pipe_speed.max(0.1);
        self.countdown_steps = self.countdown_steps.max(1);
        for edge in [
            &mut self.avatar_width,
            &mut self.avatar_height,
            &mut self.pipe_width,
            &mut self.pipe_height,
        ] {
            *edge = (*edge).clamp(1, MAX_SPRITE_EDGE);
        }
        self
    }
}
