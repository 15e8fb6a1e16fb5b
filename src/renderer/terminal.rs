//! Terminal rasterizer
//!
//! The world is scaled into a pixel buffer with two pixels per terminal
//! cell, printed with the upper-half-block glyph (foreground = top pixel,
//! background = bottom pixel). Sprites are sampled from their masks; text
//! is overlaid in whole cells after the pixels.

use std::io::{self, Stdout, Write, stdout};

use crossterm::{
    cursor, queue,
    style::{self, Color},
};
use glam::{IVec2, Vec2};

use crate::assets::SpriteSheet;
use crate::platform::{PlatformError, Renderer, SpriteId, Viewport};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    const fn lerp(a: Rgb, b: Rgb, t_256: u16) -> Rgb {
        let t = t_256 as i32;
        Rgb(
            (a.0 as i32 + (b.0 as i32 - a.0 as i32) * t / 256) as u8,
            (a.1 as i32 + (b.1 as i32 - a.1 as i32) * t / 256) as u8,
            (a.2 as i32 + (b.2 as i32 - a.2 as i32) * t / 256) as u8,
        )
    }

    fn color(self) -> Color {
        Color::Rgb {
            r: self.0,
            g: self.1,
            b: self.2,
        }
    }
}

// Palette
const SKY_TOP: Rgb = Rgb(70, 180, 200);
const SKY_BOT: Rgb = Rgb(190, 232, 245);
const HILL: Rgb = Rgb(95, 175, 55);
const PIPE_DARK: Rgb = Rgb(74, 122, 26);
const PIPE_LIGHT: Rgb = Rgb(145, 215, 62);
const AVATAR_BODY: Rgb = Rgb(245, 200, 66);
const AVATAR_BEAK: Rgb = Rgb(225, 75, 35);
const BUTTON: Rgb = Rgb(225, 120, 40);
const ARROW: Rgb = Rgb(255, 255, 255);
const TEXT_FG: Rgb = Rgb(255, 255, 255);
const TEXT_BG: Rgb = Rgb(30, 30, 30);

/// Color of an opaque sprite pixel; `t` is the local position in 0..1
fn sprite_color(sprite: SpriteId, t: Vec2) -> Rgb {
    match sprite {
        SpriteId::Background => HILL,
        SpriteId::Avatar | SpriteId::Emblem => {
            if t.x >= 0.76 {
                AVATAR_BEAK
            } else {
                AVATAR_BODY
            }
        }
        SpriteId::PipeTop | SpriteId::PipeBottom => {
            // Lit from the left third, shaded to the right
            let shade = (1.0 - (t.x - 0.33).abs() * 1.5).clamp(0.0, 1.0);
            Rgb::lerp(PIPE_DARK, PIPE_LIGHT, (shade * 256.0) as u16)
        }
        SpriteId::Button => BUTTON,
        SpriteId::ArrowNext | SpriteId::ArrowPrev => ARROW,
    }
}

/// Pixel buffer, `h` is twice the terminal row count
struct PixelBuf {
    w: usize,
    h: usize,
    px: Vec<Rgb>,
}

impl PixelBuf {
    fn new(w: usize, h: usize) -> Self {
        Self {
            w,
            h,
            px: vec![SKY_TOP; w * h],
        }
    }

    fn resize(&mut self, w: usize, h: usize) {
        self.w = w;
        self.h = h;
        self.px.resize(w * h, SKY_TOP);
    }

    fn set(&mut self, x: i32, y: i32, c: Rgb) {
        if x >= 0 && y >= 0 && (x as usize) < self.w && (y as usize) < self.h {
            self.px[y as usize * self.w + x as usize] = c;
        }
    }

    fn get(&self, x: usize, y: usize) -> Rgb {
        self.px[y * self.w + x]
    }

    /// Vertical sky gradient
    fn fill_sky(&mut self) {
        let h = self.h.max(1);
        for y in 0..self.h {
            let c = Rgb::lerp(SKY_TOP, SKY_BOT, (y * 256 / h) as u16);
            self.px[y * self.w..(y + 1) * self.w].fill(c);
        }
    }

    fn render(&self, out: &mut impl Write) -> io::Result<()> {
        queue!(out, cursor::MoveTo(0, 0))?;
        let rows = self.h / 2;
        // Only emit color changes
        let mut fg: Option<Rgb> = None;
        let mut bg: Option<Rgb> = None;

        for row in 0..rows {
            for col in 0..self.w {
                let top = self.get(col, row * 2);
                let bot = self.get(col, row * 2 + 1);
                if bg != Some(bot) {
                    queue!(out, style::SetBackgroundColor(bot.color()))?;
                    bg = Some(bot);
                }
                if top == bot {
                    queue!(out, style::Print(' '))?;
                } else {
                    if fg != Some(top) {
                        queue!(out, style::SetForegroundColor(top.color()))?;
                        fg = Some(top);
                    }
                    queue!(out, style::Print('\u{2580}'))?;
                }
            }
            if row + 1 < rows {
                queue!(out, style::ResetColor, style::Print("\r\n"))?;
                fg = None;
                bg = None;
            }
        }
        queue!(out, style::ResetColor)
    }
}

struct TextOverlay {
    col: i32,
    row: i32,
    text: String,
}

/// [`Renderer`] that draws into a terminal through crossterm
pub struct TerminalRenderer<W: Write> {
    out: W,
    sprites: SpriteSheet,
    viewport: Viewport,
    /// Re-read the terminal size every frame
    follow_terminal: bool,
    buf: PixelBuf,
    texts: Vec<TextOverlay>,
}

impl TerminalRenderer<Stdout> {
    /// Renderer on stdout sized to the current terminal
    pub fn stdout(sprites: SpriteSheet, world: Vec2) -> Result<Self, PlatformError> {
        let viewport = Viewport::current(world)?;
        let mut renderer = Self::with_viewport(stdout(), sprites, viewport);
        renderer.follow_terminal = true;
        Ok(renderer)
    }
}

impl<W: Write> TerminalRenderer<W> {
    /// Renderer with a fixed viewport
    pub fn with_viewport(out: W, sprites: SpriteSheet, viewport: Viewport) -> Self {
        let px = viewport.pixels();
        Self {
            out,
            sprites,
            viewport,
            follow_terminal: false,
            buf: PixelBuf::new(px.x as usize, px.y as usize),
            texts: Vec::new(),
        }
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn writer(&self) -> &W {
        &self.out
    }

    fn set_viewport(&mut self, viewport: Viewport) {
        if viewport == self.viewport {
            return;
        }
        log::debug!("Viewport {}x{} cells", viewport.cols, viewport.rows);
        self.viewport = viewport;
        let px = viewport.pixels();
        self.buf.resize(px.x as usize, px.y as usize);
    }

    /// World position of the center of buffer pixel (x, y)
    fn pixel_center(&self, x: i32, y: i32) -> Vec2 {
        (Vec2::new(x as f32, y as f32) + 0.5) * self.viewport.scale()
    }
}

impl<W: Write> Renderer for TerminalRenderer<W> {
    fn clear(&mut self) {
        if self.follow_terminal {
            match Viewport::current(self.viewport.world) {
                Ok(viewport) => self.set_viewport(viewport),
                Err(e) => log::debug!("Terminal size unavailable: {}", e),
            }
        }
        self.buf.fill_sky();
        self.texts.clear();
    }

    fn draw_sprite(&mut self, sprite: SpriteId, pos: Vec2, rotation_degrees: f32) {
        let mask = self.sprites.get(sprite);
        let size = mask.size().as_vec2();
        if size.x <= 0.0 || size.y <= 0.0 {
            return;
        }
        let half = size / 2.0;
        let center = pos + half;

        // Undo the rotation when sampling: screen y points down, so a
        // counter-clockwise turn on screen is clockwise in these coordinates
        let (sin, cos) = rotation_degrees.to_radians().sin_cos();
        let reach = if rotation_degrees == 0.0 {
            half
        } else {
            Vec2::splat(half.length())
        };

        let scale = self.viewport.scale();
        let lo = ((center - reach) / scale).floor().as_ivec2();
        let hi = ((center + reach) / scale).ceil().as_ivec2();
        let px = self.viewport.pixels().as_ivec2();
        let lo = lo.max(IVec2::ZERO);
        let hi = hi.min(px);

        for y in lo.y..hi.y {
            for x in lo.x..hi.x {
                let d = self.pixel_center(x, y) - center;
                let src = Vec2::new(d.x * cos - d.y * sin, d.x * sin + d.y * cos) + half;
                let local = src.floor().as_ivec2();
                if mask.get(local.x, local.y) {
                    self.buf.set(x, y, sprite_color(sprite, src / size));
                }
            }
        }
    }

    fn draw_text(&mut self, text: &str, pos: Vec2) {
        let cell = pos / (self.viewport.scale() * Vec2::new(1.0, 2.0));
        self.texts.push(TextOverlay {
            col: cell.x.floor() as i32,
            row: cell.y.floor() as i32,
            text: text.to_string(),
        });
    }

    fn present(&mut self) -> Result<(), PlatformError> {
        self.buf.render(&mut self.out)?;

        let cols = i32::from(self.viewport.cols);
        let rows = i32::from(self.viewport.rows);
        for overlay in &self.texts {
            if overlay.row < 0 || overlay.row >= rows {
                continue;
            }
            // Clip to the visible columns
            let skip = (-overlay.col).max(0) as usize;
            let col = overlay.col.max(0);
            let visible: String = overlay
                .text
                .chars()
                .skip(skip)
                .take((cols - col).max(0) as usize)
                .collect();
            if visible.is_empty() {
                continue;
            }
            queue!(
                self.out,
                cursor::MoveTo(col as u16, overlay.row as u16),
                style::SetForegroundColor(TEXT_FG.color()),
                style::SetBackgroundColor(TEXT_BG.color()),
                style::Print(visible),
                style::ResetColor,
            )?;
        }
        self.out.flush()?;
        Ok(())
    }

    fn text_size(&self, text: &str) -> Vec2 {
        let cell = self.viewport.scale() * Vec2::new(1.0, 2.0);
        Vec2::new(text.chars().count() as f32 * cell.x, cell.y)
    }
}
