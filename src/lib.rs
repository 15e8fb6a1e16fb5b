//! Flappy Gates - a side-scrolling gate-dodging arcade game
//!
//! Core modules:
//! - `sim`: Deterministic simulation (physics, obstacles, collisions, scenes)
//! - `session`: Top-level loop tying the simulation to platform capabilities
//! - `renderer`: Draw-command emission and the terminal rasterizer
//! - `platform`: Capability traits plus the terminal implementation
//! - `persistence`: Append-only score log
//! - `tuning`: Data-driven game balance

pub mod assets;
pub mod audio;
pub mod highscores;
pub mod persistence;
pub mod platform;
pub mod renderer;
pub mod session;
pub mod settings;
pub mod sim;
pub mod tuning;
pub mod ui;

pub use highscores::ScoreHistory;
pub use session::{Flow, GameSession};
pub use settings::Settings;
pub use tuning::{CollisionStrategy, Tuning};

/// Reference game constants (the defaults behind [`Tuning`])
pub mod consts {
    /// Simulation rate; physics constants are per tick at this rate
    pub const TICK_RATE_HZ: u32 = 60;

    /// Playfield dimensions in world pixels
    pub const SCREEN_WIDTH: f32 = 1400.0;
    pub const SCREEN_HEIGHT: f32 = 850.0;

    /// Avatar physics (per tick)
    pub const GRAVITY: f32 = 0.4;
    pub const JUMP_STRENGTH: f32 = -10.0;
    pub const JUMP_COOLDOWN_TICKS: u32 = 10;

    /// Tilt range in degrees; descending tilt is intentionally shallower
    pub const ANGLE_MAX: f32 = 30.0;
    pub const ANGLE_MIN: f32 = -20.0;
    /// Degrees per tick the tilt eases toward its target
    pub const ROTATION_SPEED: f32 = 2.0;

    /// Distance from the top/bottom edge that ends the run
    pub const BOUNDARY_PADDING: f32 = 20.0;

    /// Fixed horizontal position of the avatar
    pub const AVATAR_X: f32 = 50.0;
    pub const AVATAR_WIDTH: u32 = 160;
    pub const AVATAR_HEIGHT: u32 = 120;

    /// Obstacles
    pub const PIPE_WIDTH: u32 = 150;
    pub const PIPE_HEIGHT: u32 = 800;
    pub const PIPE_SPEED: f32 = 5.0;
    pub const PIPE_INTERVAL_MS: u32 = 1500;
    pub const GAP_HEIGHT: f32 = 250.0;
    pub const GAP_TOP_MIN: f32 = 150.0;
    pub const GAP_TOP_MAX: f32 = 450.0;

    /// "Get Ready" steps before play starts (one second each)
    pub const COUNTDOWN_STEPS: u8 = 3;

    /// Background scroll (pixels per tick) and the extra width that hides the seam
    pub const BACKGROUND_SPEED: f32 = 0.5;
    pub const BACKGROUND_OVERSCAN: u32 = 50;

    /// Menu button sprite size and the spacing between buttons in a row
    pub const BUTTON_WIDTH: u32 = 400;
    pub const BUTTON_HEIGHT: u32 = 120;
    pub const BUTTON_GAP: u32 = 50;
    /// Stats paging arrow sprite size
    pub const ARROW_SIZE: u32 = 150;
    /// Title-screen emblem (the avatar drawn large)
    pub const EMBLEM_WIDTH: u32 = 320;
    pub const EMBLEM_HEIGHT: u32 = 240;
}

/// Convert a wall-clock interval to a whole number of ticks (rounded to nearest, at least 1)
#[inline]
pub fn ms_to_ticks(ms: u32, tick_rate_hz: u32) -> u32 {
    let ticks = (u64::from(ms) * u64::from(tick_rate_hz) + 500) / 1000;
    ticks.clamp(1, u64::from(u32::MAX)) as u32
}
