//! Menu layout and input mapping
//!
//! Buttons are laid out per scene in world pixels; clicks and key presses
//! resolve to a [`ButtonId`] that the simulation tick consumes.

use glam::{IVec2, UVec2, Vec2};

use crate::consts::{ARROW_SIZE, BUTTON_GAP, BUTTON_HEIGHT, BUTTON_WIDTH};
use crate::platform::{Key, SpriteId};
use crate::sim::collision::PixelRect;
use crate::sim::state::Scene;
use crate::tuning::Tuning;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ButtonId {
    Play,
    Stats,
    ClearStats,
    ConfirmClear,
    CancelClear,
    Return,
    Home,
    NextStat,
    PrevStat,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Button {
    pub id: ButtonId,
    pub label: &'static str,
    pub sprite: SpriteId,
    pub rect: PixelRect,
}

impl Button {
    fn menu(id: ButtonId, label: &'static str, x: f32, y: f32) -> Self {
        Self {
            id,
            label,
            sprite: SpriteId::Button,
            rect: PixelRect::new(
                IVec2::new(x as i32, y as i32),
                UVec2::new(BUTTON_WIDTH, BUTTON_HEIGHT),
            ),
        }
    }

    fn arrow(id: ButtonId, label: &'static str, sprite: SpriteId, x: f32, y: f32) -> Self {
        Self {
            id,
            label,
            sprite,
            rect: PixelRect::new(IVec2::new(x as i32, y as i32), UVec2::splat(ARROW_SIZE)),
        }
    }

    pub fn pos(&self) -> Vec2 {
        self.rect.min.as_vec2()
    }

    pub fn center(&self) -> Vec2 {
        self.rect.min.as_vec2() + self.rect.size.as_vec2() / 2.0
    }
}

/// Left x of the first button in a centered row of `count` menu buttons
fn row_start(screen_width: f32, count: u32) -> f32 {
    let total = count * BUTTON_WIDTH + count.saturating_sub(1) * BUTTON_GAP;
    ((screen_width - total as f32) / 2.0).floor()
}

/// Buttons visible in `scene`; `stats_len` is the number of recorded runs
pub fn buttons(scene: &Scene, tuning: &Tuning, stats_len: usize) -> Vec<Button> {
    let w = tuning.screen_width;
    let h = tuning.screen_height;
    let step = (BUTTON_WIDTH + BUTTON_GAP) as f32;

    match *scene {
        Scene::Home {
            confirm_clear: false,
        } => {
            let x = row_start(w, 3);
            let y = (h * 0.7).floor();
            vec![
                Button::menu(ButtonId::Stats, "Stats", x, y),
                Button::menu(ButtonId::ClearStats, "Delete Stats", x + step, y),
                Button::menu(ButtonId::Play, "Play", x + 2.0 * step, y),
            ]
        }
        Scene::Home {
            confirm_clear: true,
        } => {
            let x = row_start(w, 2);
            let y = (h / 2.0).floor() + 100.0;
            vec![
                Button::menu(ButtonId::ConfirmClear, "Delete", x, y),
                Button::menu(ButtonId::CancelClear, "Home", x + step, y),
            ]
        }
        Scene::GameOver { .. } => {
            vec![Button::menu(ButtonId::Home, "Home", row_start(w, 1), (h / 2.0).floor())]
        }
        Scene::Stats { page } => {
            let mut list = vec![Button::menu(
                ButtonId::Return,
                "Return",
                row_start(w, 1),
                (h / 2.0).floor() + 100.0,
            )];
            let arrow_y = h - ARROW_SIZE as f32 - 50.0;
            if page > 0 {
                list.push(Button::arrow(
                    ButtonId::PrevStat,
                    "Previous",
                    SpriteId::ArrowPrev,
                    50.0,
                    arrow_y,
                ));
            }
            if page + 1 < stats_len {
                list.push(Button::arrow(
                    ButtonId::NextStat,
                    "Next",
                    SpriteId::ArrowNext,
                    w - ARROW_SIZE as f32 - 50.0,
                    arrow_y,
                ));
            }
            list
        }
        Scene::Countdown { .. } | Scene::Playing => Vec::new(),
    }
}

/// Button under a click, if any
pub fn hit_test(buttons: &[Button], pos: Vec2) -> Option<ButtonId> {
    buttons.iter().find(|b| b.rect.contains(pos)).map(|b| b.id)
}

/// Keyboard shortcut for a button in `scene`
pub fn key_action(scene: &Scene, key: Key) -> Option<ButtonId> {
    let key = match key {
        Key::Char(c) => Key::Char(c.to_ascii_lowercase()),
        other => other,
    };
    match (*scene, key) {
        (Scene::Home { confirm_clear: false }, Key::Enter | Key::Char('p')) => Some(ButtonId::Play),
        (Scene::Home { confirm_clear: false }, Key::Char('s')) => Some(ButtonId::Stats),
        (Scene::Home { confirm_clear: false }, Key::Char('d')) => Some(ButtonId::ClearStats),
        (Scene::Home { confirm_clear: true }, Key::Enter | Key::Char('d')) => {
            Some(ButtonId::ConfirmClear)
        }
        (Scene::Home { confirm_clear: true }, Key::Char('h') | Key::Backspace) => {
            Some(ButtonId::CancelClear)
        }
        (Scene::GameOver { .. }, Key::Enter | Key::Char('h') | Key::Backspace) => Some(ButtonId::Home),
        (Scene::Stats { .. }, Key::Enter | Key::Char('h') | Key::Backspace) => Some(ButtonId::Return),
        (Scene::Stats { .. }, Key::Right) => Some(ButtonId::NextStat),
        (Scene::Stats { .. }, Key::Left) => Some(ButtonId::PrevStat),
        _ => None,
    }
}

/// Keys that trigger a jump while playing
pub fn is_jump_key(key: Key) -> bool {
    matches!(key, Key::Space | Key::Up)
}
