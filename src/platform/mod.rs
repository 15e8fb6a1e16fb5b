//! Platform abstraction layer
//!
//! The core only talks to the outside world through these capabilities:
//! - `Renderer`: sprite/text draw commands and frame presentation
//! - `InputSource`: non-blocking event polling
//! - `AudioSink`: one-shot sounds and the ambient track
//! - `ScoreStore`: the append-only score log
//!
//! Terminal-backed implementations live in the submodules.

pub mod audio;
pub mod input;
pub mod terminal;
pub mod time;

pub use audio::NullAudio;
pub use input::TerminalInput;
pub use terminal::{TerminalGuard, Viewport};
pub use time::FramePacer;

use glam::Vec2;
use thiserror::Error;

use crate::persistence::PersistenceError;

/// Sprites the renderer knows how to draw
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SpriteId {
    Background,
    Avatar,
    /// Large avatar for the title screen
    Emblem,
    PipeTop,
    PipeBottom,
    Button,
    ArrowNext,
    ArrowPrev,
}

/// Sounds the audio sink can play
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SoundId {
    Jump,
    Click,
    Ambient,
}

/// Keys the game reacts to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Space,
    Enter,
    Backspace,
    Up,
    Left,
    Right,
    Char(char),
}

/// Recognized input; everything else is dropped by the input source
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputEvent {
    Quit,
    KeyDown(Key),
    /// World-space click position
    MouseDown(Vec2),
}

#[derive(Debug, Error)]
pub enum PlatformError {
    #[error("terminal I/O failed: {0}")]
    Terminal(#[from] std::io::Error),
}

/// Nominal glyph size in world pixels for renderers without real metrics
pub const GLYPH_SIZE: Vec2 = Vec2::new(30.0, 60.0);

/// Draw-command sink. Positions are world pixels, top-left origin.
pub trait Renderer {
    fn clear(&mut self);
    /// `pos` is the top-left of the unrotated sprite; rotation is about its
    /// center, counter-clockwise (positive tilts the nose up)
    fn draw_sprite(&mut self, sprite: SpriteId, pos: Vec2, rotation_degrees: f32);
    /// `pos` is the top-left of the text line
    fn draw_text(&mut self, text: &str, pos: Vec2);
    fn present(&mut self) -> Result<(), PlatformError>;

    /// World-space extent of a single line of text
    fn text_size(&self, text: &str) -> Vec2 {
        Vec2::new(text.chars().count() as f32 * GLYPH_SIZE.x, GLYPH_SIZE.y)
    }
}

pub trait InputSource {
    /// Drain every pending event without blocking
    fn poll_events(&mut self) -> Result<Vec<InputEvent>, PlatformError>;
}

/// Audio device. Shared with the ambient-audio task, hence `Send + Sync`.
pub trait AudioSink: Send + Sync {
    fn play_once(&self, sound: SoundId, volume: f32);
    fn is_ambient_playing(&self) -> bool;
    fn start_ambient(&self, sound: SoundId, volume: f32);
    fn stop_ambient(&self);
}

/// Append-only log of completed runs, oldest first
pub trait ScoreStore {
    fn append(&mut self, score: u32) -> Result<(), PersistenceError>;
    /// Never fails: a missing or unreadable log reads as empty
    fn read_all(&self) -> Vec<u32>;
    fn clear(&mut self) -> Result<(), PersistenceError>;
}
