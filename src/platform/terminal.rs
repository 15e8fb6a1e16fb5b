//! Terminal session setup and world/terminal coordinate mapping

use std::io::{self, Write, stdout};

use crossterm::{cursor, event, execute, terminal};
use glam::{UVec2, Vec2};

/// Raw mode + alternate screen for the lifetime of the guard.
/// Dropping it restores the terminal, including on early return.
pub struct TerminalGuard {
    _private: (),
}

impl TerminalGuard {
    pub fn enter() -> io::Result<Self> {
        terminal::enable_raw_mode()?;
        let guard = Self { _private: () };
        execute!(
            stdout(),
            terminal::EnterAlternateScreen,
            cursor::Hide,
            terminal::DisableLineWrap,
            event::EnableMouseCapture,
        )?;
        log::debug!("Terminal entered raw mode");
        Ok(guard)
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let mut out = stdout();
        if let Err(e) = execute!(
            out,
            event::DisableMouseCapture,
            terminal::LeaveAlternateScreen,
            cursor::Show,
            terminal::EnableLineWrap,
        ) {
            log::warn!("Failed to restore terminal screen: {}", e);
        }
        if let Err(e) = terminal::disable_raw_mode() {
            log::warn!("Failed to leave raw mode: {}", e);
        }
        let _ = out.flush();
    }
}

/// Maps the fixed world rectangle onto a grid of terminal cells.
/// Each cell holds two vertical pixels (half-block rendering).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub cols: u16,
    pub rows: u16,
    pub world: Vec2,
}

impl Viewport {
    pub fn new(cols: u16, rows: u16, world: Vec2) -> Self {
        Self {
            cols: cols.max(1),
            rows: rows.max(1),
            world,
        }
    }

    /// Viewport for the terminal's current size
    pub fn current(world: Vec2) -> io::Result<Self> {
        let (cols, rows) = terminal::size()?;
        Ok(Self::new(cols, rows, world))
    }

    /// Pixel buffer size (one column, two pixel rows per cell)
    pub fn pixels(&self) -> UVec2 {
        UVec2::new(u32::from(self.cols), u32::from(self.rows) * 2)
    }

    /// World units per buffer pixel
    pub fn scale(&self) -> Vec2 {
        self.world / self.pixels().as_vec2()
    }

    pub fn world_to_pixel(&self, p: Vec2) -> Vec2 {
        p / self.scale()
    }

    /// Center of a terminal cell in world coordinates
    pub fn cell_to_world(&self, col: u16, row: u16) -> Vec2 {
        let cell = Vec2::new(f32::from(col) + 0.5, f32::from(row) + 0.5);
        cell / Vec2::new(f32::from(self.cols), f32::from(self.rows)) * self.world
    }
}
