//! Game state and core simulation types
//!
//! Everything the per-tick state machine reads or writes lives here. The
//! session loop is the only writer.

use glam::Vec2;

use super::body::{Boundary, PhysicsBody};
use super::collision::CollisionDetector;
use super::obstacle::ObstacleField;
use crate::consts::BACKGROUND_OVERSCAN;
use crate::highscores::ScoreHistory;
use crate::tuning::Tuning;

/// Current scene. Exactly one is active at a time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scene {
    /// Title screen; `confirm_clear` shows the delete-stats confirmation
    Home { confirm_clear: bool },
    /// "Get Ready" steps before play
    Countdown { remaining: u8, ticks_left: u32 },
    /// Active run
    Playing,
    /// Run ended with this score
    GameOver { final_score: u32 },
    /// Score history, one ranked run per page
    Stats { page: usize },
}

impl Scene {
    pub fn home() -> Self {
        Scene::Home {
            confirm_clear: false,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Scene::Home { .. } => "home",
            Scene::Countdown { .. } => "countdown",
            Scene::Playing => "playing",
            Scene::GameOver { .. } => "game_over",
            Scene::Stats { .. } => "stats",
        }
    }
}

/// What ended a run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CrashCause {
    Obstacle { id: u32 },
    OutOfBounds(Boundary),
}

/// Things that happened during a tick that the session reacts to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameEvent {
    /// A menu button was activated
    ButtonPressed,
    /// Countdown started or advanced; `remaining` steps are left to show
    CountdownStep { remaining: u8 },
    /// Countdown finished, the run is live
    RunStarted,
    /// Jump impulse applied
    Jumped,
    ObstacleSpawned { id: u32 },
    Scored { score: u32 },
    Crashed(CrashCause),
    /// Emitted once per run on entry to GameOver
    GameOver { score: u32 },
    /// Stats scene opened; the session refreshes the history from storage
    StatsOpened,
    /// The player confirmed deleting the score history
    StatsCleared,
    ReturnedHome,
}

/// Complete simulation state
#[derive(Debug, Clone)]
pub struct GameState {
    pub tuning: Tuning,
    pub scene: Scene,
    pub body: PhysicsBody,
    pub field: ObstacleField,
    pub detector: CollisionDetector,
    /// Obstacles passed this run
    pub score: u32,
    /// Snapshot of the score log for the stats and game-over screens
    pub history: ScoreHistory,
    /// Background scroll offset (<= 0, wraps at the background width)
    pub background_x: f32,
    /// Simulation tick counter (all scenes)
    pub time_ticks: u64,
}

impl GameState {
    pub fn new(tuning: Tuning, detector: CollisionDetector, seed: u64) -> Self {
        Self {
            body: PhysicsBody::at_start(&tuning),
            field: ObstacleField::new(seed),
            detector,
            scene: Scene::home(),
            score: 0,
            history: ScoreHistory::default(),
            background_x: 0.0,
            time_ticks: 0,
            tuning,
        }
    }

    /// Top-left of the avatar sprite
    pub fn avatar_pos(&self) -> Vec2 {
        Vec2::new(self.tuning.avatar_x, self.body.y)
    }

    /// Fresh body, empty field, zero score
    pub fn reset_run(&mut self) {
        self.body = PhysicsBody::at_start(&self.tuning);
        self.field.reset();
        self.score = 0;
        self.background_x = 0.0;
    }

    /// Width of one background tile
    pub fn background_width(&self) -> f32 {
        self.tuning.screen_width + BACKGROUND_OVERSCAN as f32
    }

    /// Scroll the background, wrapping once a full tile has passed
    pub fn scroll_background(&mut self) {
        let width = self.background_width();
        self.background_x -= self.tuning.background_speed;
        if self.background_x <= -width {
            self.background_x += width;
        }
    }
}
