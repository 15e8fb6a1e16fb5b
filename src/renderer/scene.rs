//! Scene drawing
//!
//! Turns the current [`GameState`] into draw commands. Layout is in world
//! pixels; text is centered with the renderer's own metrics.

use glam::Vec2;

use crate::consts::{EMBLEM_HEIGHT, EMBLEM_WIDTH};
use crate::platform::{Renderer, SpriteId};
use crate::sim::{GameState, Scene};
use crate::ui::{self, Button};

const TEXT_MARGIN: f32 = 50.0;
const EMBLEM_ANGLE: f32 = 45.0;

/// Emit every draw command for one frame (does not present)
pub fn draw<R: Renderer + ?Sized>(state: &GameState, renderer: &mut R, fps: Option<u32>) {
    let w = state.tuning.screen_width;
    let h = state.tuning.screen_height;

    renderer.clear();
    draw_background(state, renderer);

    match state.scene {
        Scene::Home {
            confirm_clear: false,
        } => {
            let title = "Flappy Gates";
            let size = renderer.text_size(title);
            renderer.draw_text(title, Vec2::new(((w - size.x) / 2.0).floor(), 20.0));

            // Rotated bounding box of the emblem decides its vertical slot
            let rotated = (EMBLEM_WIDTH + EMBLEM_HEIGHT) as f32 * EMBLEM_ANGLE.to_radians().cos();
            let center = Vec2::new(w / 2.0, ((h / 2.0 - rotated) / 2.0).floor() + 100.0 + rotated / 2.0);
            let half = Vec2::new(EMBLEM_WIDTH as f32, EMBLEM_HEIGHT as f32) / 2.0;
            renderer.draw_sprite(SpriteId::Emblem, center - half, EMBLEM_ANGLE);
        }
        Scene::Home {
            confirm_clear: true,
        } => {
            centered_text(renderer, "This will delete all of your data", w, h / 2.0 - 100.0);
            centered_text(renderer, "Are you sure?", w, h / 2.0 - 30.0);
        }
        Scene::Countdown { remaining, .. } => {
            draw_avatar(state, renderer);
            renderer.draw_text(
                &format!("Get Ready {}", remaining),
                Vec2::new(w / 2.0 - 150.0, h / 2.0 - 100.0),
            );
        }
        Scene::Playing => {
            for obstacle in state.field.obstacles() {
                let top_height = state.detector.pipe_top_mask().height() as f32;
                renderer.draw_sprite(SpriteId::PipeTop, obstacle.top_segment_pos(top_height), 0.0);
                renderer.draw_sprite(SpriteId::PipeBottom, obstacle.bottom_segment_pos(), 0.0);
            }
            draw_avatar(state, renderer);
            renderer.draw_text(&format!("Score: {}", state.score), Vec2::new(10.0, 10.0));
        }
        Scene::GameOver { final_score } => {
            let x = w / 2.0 - 150.0;
            if let Some(best) = state.history.best() {
                let line = if state.history.latest_is_best() {
                    format!("New Best: {}", best)
                } else {
                    format!("Best: {}", best)
                };
                renderer.draw_text(&line, Vec2::new(x, h / 2.0 - 300.0));
            }
            renderer.draw_text(&format!("Score: {}", final_score), Vec2::new(x, h / 2.0 - 200.0));
            renderer.draw_text("Game Over", Vec2::new(x, h / 2.0 - 100.0));
        }
        Scene::Stats { page } => match state.history.page(page) {
            Some(score) => {
                let line = format!("Stats {}/{}", page + 1, state.history.len());
                renderer.draw_text(&line, Vec2::splat(TEXT_MARGIN));
                renderer.draw_text(
                    &format!("Score: {}", score),
                    Vec2::new(TEXT_MARGIN, TEXT_MARGIN + 100.0),
                );
            }
            None => renderer.draw_text("No stats available", Vec2::splat(TEXT_MARGIN)),
        },
    }

    for button in ui::buttons(&state.scene, &state.tuning, state.history.len()) {
        draw_button(renderer, &button);
    }

    if let Some(fps) = fps {
        let line = format!("FPS: {}", fps);
        let size = renderer.text_size(&line);
        renderer.draw_text(&line, Vec2::new(w - size.x - 10.0, 10.0));
    }
}

/// Two tiles side by side so the wrap point never shows
fn draw_background<R: Renderer + ?Sized>(state: &GameState, renderer: &mut R) {
    let x = state.background_x;
    renderer.draw_sprite(SpriteId::Background, Vec2::new(x, 0.0), 0.0);
    renderer.draw_sprite(
        SpriteId::Background,
        Vec2::new(x + state.background_width(), 0.0),
        0.0,
    );
}

fn draw_avatar<R: Renderer + ?Sized>(state: &GameState, renderer: &mut R) {
    renderer.draw_sprite(SpriteId::Avatar, state.avatar_pos(), state.body.angle);
}

fn centered_text<R: Renderer + ?Sized>(renderer: &mut R, text: &str, width: f32, y: f32) {
    let size = renderer.text_size(text);
    renderer.draw_text(text, Vec2::new(((width - size.x) / 2.0).floor(), y));
}

fn draw_button<R: Renderer + ?Sized>(renderer: &mut R, button: &Button) {
    renderer.draw_sprite(button.sprite, button.pos(), 0.0);
    let size = renderer.text_size(button.label);
    let pos = match button.sprite {
        // Arrow labels sit above the arrow
        SpriteId::ArrowNext | SpriteId::ArrowPrev => {
            Vec2::new(button.center().x - size.x / 2.0, button.pos().y - size.y)
        }
        _ => button.center() - size / 2.0,
    };
    renderer.draw_text(button.label, pos.floor());
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assets::SpriteSheet;
    use crate::renderer::{DrawCommand, RecordingRenderer};
    use crate::tuning::Tuning;

    fn state() -> GameState {
        let tuning = Tuning::default();
        let detector = SpriteSheet::builtin(&tuning).detector(tuning.collision);
        GameState::new(tuning, detector, 1)
    }

    fn frame(state: &GameState, fps: Option<u32>) -> RecordingRenderer {
        let mut renderer = RecordingRenderer::new();
        draw(state, &mut renderer, fps);
        renderer
    }

    #[test]
    fn test_home_draws_title_and_buttons() {
        let r = frame(&state(), None);
        assert_eq!(r.commands()[0], DrawCommand::Clear);
        assert_eq!(r.sprites(SpriteId::Background).len(), 2);
        assert_eq!(r.sprites(SpriteId::Button).len(), 3);
        assert_eq!(r.sprites(SpriteId::Emblem)[0].1, 45.0);
        for text in ["Flappy Gates", "Play", "Stats", "Delete Stats"] {
            assert!(r.has_text(text), "missing {text}");
        }
    }

    #[test]
    fn test_background_tiles_follow_scroll() {
        let mut s = state();
        s.background_x = -100.0;
        let r = frame(&s, None);
        let tiles = r.sprites(SpriteId::Background);
        assert_eq!(tiles[0].0, Vec2::new(-100.0, 0.0));
        assert_eq!(tiles[1].0, Vec2::new(1350.0, 0.0));
    }

    #[test]
    fn test_playing_draws_obstacles_avatar_and_score() {
        let mut s = state();
        s.scene = Scene::Playing;
        s.score = 7;
        s.body.angle = 12.0;
        let t = s.tuning.clone();
        s.field.spawn(&t);
        let o = &mut s.field.obstacles_mut()[0];
        o.place_at(600.0);
        o.gap_top = 200.0;
        let r = frame(&s, Some(58));

        assert_eq!(r.sprites(SpriteId::PipeTop), vec![(Vec2::new(600.0, -600.0), 0.0)]);
        assert_eq!(r.sprites(SpriteId::PipeBottom), vec![(Vec2::new(600.0, 450.0), 0.0)]);
        assert_eq!(r.sprites(SpriteId::Avatar), vec![(Vec2::new(50.0, 425.0), 12.0)]);
        assert!(r.has_text("Score: 7"));
        assert!(r.has_text("FPS: 58"));
        assert!(r.sprites(SpriteId::Button).is_empty());
    }

    #[test]
    fn test_countdown_text() {
        let mut s = state();
        s.scene = Scene::Countdown {
            remaining: 2,
            ticks_left: 10,
        };
        let r = frame(&s, None);
        assert!(r.has_text("Get Ready 2"));
        assert_eq!(r.sprites(SpriteId::Avatar).len(), 1);
    }

    #[test]
    fn test_game_over_shows_best() {
        let mut s = state();
        s.history.record(9);
        s.history.record(4);
        s.scene = Scene::GameOver { final_score: 4 };
        let r = frame(&s, None);
        assert!(r.has_text("Game Over"));
        assert!(r.has_text("Score: 4"));
        assert!(r.has_text("Best: 9"));
        assert!(r.has_text("Home"));
    }

    #[test]
    fn test_stats_pages() {
        let mut s = state();
        s.scene = Scene::Stats { page: 0 };
        let r = frame(&s, None);
        assert!(r.has_text("No stats available"));
        assert!(r.has_text("Return"));

        s.history = crate::ScoreHistory::from_log(vec![3, 10, 9]);
        s.scene = Scene::Stats { page: 1 };
        let r = frame(&s, None);
        assert!(r.has_text("Stats 2/3"));
        assert!(r.has_text("Score: 9"));
        assert_eq!(r.sprites(SpriteId::ArrowPrev).len(), 1);
        assert_eq!(r.sprites(SpriteId::ArrowNext).len(), 1);
    }

    #[test]
    fn test_confirm_clear_warning() {
        let mut s = state();
        s.scene = Scene::Home {
            confirm_clear: true,
        };
        let r = frame(&s, None);
        assert!(r.has_text("Are you sure?"));
        assert!(r.has_text("Delete"));
        assert!(r.sprites(SpriteId::Emblem).is_empty());
    }
}
