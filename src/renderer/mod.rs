//! Rendering module
//!
//! `scene` emits draw commands for the active scene through the
//! [`Renderer`] capability; `terminal` rasterizes them into a half-block
//! pixel buffer. [`RecordingRenderer`] keeps the commands instead, for
//! headless runs.

pub mod scene;
pub mod terminal;

pub use scene::draw;
pub use terminal::TerminalRenderer;

use glam::Vec2;

use crate::platform::{PlatformError, Renderer, SpriteId};

#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    Clear,
    Sprite {
        sprite: SpriteId,
        pos: Vec2,
        rotation: f32,
    },
    Text {
        text: String,
        pos: Vec2,
    },
}

/// Renderer that records the last presented frame
#[derive(Debug, Default)]
pub struct RecordingRenderer {
    pending: Vec<DrawCommand>,
    presented: Vec<DrawCommand>,
    frames: u64,
}

impl RecordingRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Commands of the frame in progress, or of the last presented frame
    /// when nothing is pending
    pub fn commands(&self) -> &[DrawCommand] {
        if self.pending.is_empty() {
            &self.presented
        } else {
            &self.pending
        }
    }

    /// Number of presented frames
    pub fn frames(&self) -> u64 {
        self.frames
    }

    /// Position and rotation of every draw of `sprite`
    pub fn sprites(&self, sprite: SpriteId) -> Vec<(Vec2, f32)> {
        self.commands()
            .iter()
            .filter_map(|cmd| match cmd {
                DrawCommand::Sprite {
                    sprite: s,
                    pos,
                    rotation,
                } if *s == sprite => Some((*pos, *rotation)),
                _ => None,
            })
            .collect()
    }

    pub fn texts(&self) -> Vec<&str> {
        self.commands()
            .iter()
            .filter_map(|cmd| match cmd {
                DrawCommand::Text { text, .. } => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }

    pub fn has_text(&self, text: &str) -> bool {
        self.texts().contains(&text)
    }
}

impl Renderer for RecordingRenderer {
    fn clear(&mut self) {
        self.pending.clear();
        self.pending.push(DrawCommand::Clear);
    }

    fn draw_sprite(&mut self, sprite: SpriteId, pos: Vec2, rotation_degrees: f32) {
        self.pending.push(DrawCommand::Sprite {
            sprite,
            pos,
            rotation: rotation_degrees,
        });
    }

    fn draw_text(&mut self, text: &str, pos: Vec2) {
        self.pending.push(DrawCommand::Text {
            text: text.to_string(),
            pos,
        });
    }

    fn present(&mut self) -> Result<(), PlatformError> {
        self.presented = std::mem::take(&mut self.pending);
        self.frames += 1;
        Ok(())
    }
}
