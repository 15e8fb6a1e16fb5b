//! Fixed timestep simulation tick
//!
//! One call advances whichever scene is active by one tick and reports what
//! happened as [`GameEvent`]s. Side effects (storage, audio, drawing) are
//! left to the caller.

use super::body::BodyStatus;
use super::state::{CrashCause, GameEvent, GameState, Scene};
use crate::ui::ButtonId;

/// Input commands for a single tick
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Jump key pressed since the previous tick
    pub jump: bool,
    /// Menu button activated since the previous tick
    pub action: Option<ButtonId>,
}

/// Advance the game state by one tick
pub fn tick(state: &mut GameState, input: &TickInput) -> Vec<GameEvent> {
    let mut events = Vec::new();
    state.time_ticks += 1;

    // A scene change from a button takes effect next tick
    if let Some(action) = input.action {
        if apply_action(state, action, &mut events) {
            return events;
        }
    }

    match state.scene {
        Scene::Home { .. } => state.scroll_background(),
        Scene::Countdown {
            remaining,
            ticks_left,
        } => countdown_tick(state, remaining, ticks_left, &mut events),
        Scene::Playing => play_tick(state, input.jump, &mut events),
        Scene::GameOver { .. } | Scene::Stats { .. } => {}
    }

    events
}

/// Apply a button press valid for the current scene.
///
/// Returns true if the scene changed.
fn apply_action(state: &mut GameState, action: ButtonId, events: &mut Vec<GameEvent>) -> bool {
    let next = match (state.scene, action) {
        (Scene::Home { confirm_clear: false }, ButtonId::Play) => {
            state.reset_run();
            let remaining = state.tuning.countdown_steps;
            events.push(GameEvent::CountdownStep { remaining });
            Scene::Countdown {
                remaining,
                ticks_left: state.tuning.countdown_step_ticks(),
            }
        }
        (Scene::Home { confirm_clear: false }, ButtonId::Stats) => {
            events.push(GameEvent::StatsOpened);
            Scene::Stats { page: 0 }
        }
        (Scene::Home { confirm_clear: false }, ButtonId::ClearStats) => Scene::Home {
            confirm_clear: true,
        },
        (Scene::Home { confirm_clear: true }, ButtonId::ConfirmClear) => {
            state.history.clear();
            events.push(GameEvent::StatsCleared);
            Scene::home()
        }
        (Scene::Home { confirm_clear: true }, ButtonId::CancelClear) => Scene::home(),
        (Scene::GameOver { .. }, ButtonId::Home) | (Scene::Stats { .. }, ButtonId::Return) => {
            events.push(GameEvent::ReturnedHome);
            Scene::home()
        }
        (Scene::Stats { page }, ButtonId::NextStat) if page + 1 < state.history.len() => {
            Scene::Stats { page: page + 1 }
        }
        (Scene::Stats { page }, ButtonId::PrevStat) if page > 0 => Scene::Stats { page: page - 1 },
        _ => return false,
    };

    // Click feedback goes out before the scene's own events
    events.insert(0, GameEvent::ButtonPressed);
    log::info!("Scene {} -> {}", state.scene.name(), next.name());
    state.scene = next;
    true
}

fn countdown_tick(state: &mut GameState, remaining: u8, ticks_left: u32, events: &mut Vec<GameEvent>) {
    let ticks_left = ticks_left.saturating_sub(1);
    if ticks_left > 0 {
        state.scene = Scene::Countdown {
            remaining,
            ticks_left,
        };
        return;
    }

    let remaining = remaining.saturating_sub(1);
    if remaining == 0 {
        log::info!("Scene countdown -> playing");
        state.scene = Scene::Playing;
        events.push(GameEvent::RunStarted);
    } else {
        state.scene = Scene::Countdown {
            remaining,
            ticks_left: state.tuning.countdown_step_ticks(),
        };
        events.push(GameEvent::CountdownStep { remaining });
    }
}

/// Input, physics, obstacles, collision, scoring, in that order
fn play_tick(state: &mut GameState, jump: bool, events: &mut Vec<GameEvent>) {
    if jump && state.body.jump(&state.tuning) {
        events.push(GameEvent::Jumped);
    }

    let status = state.body.step(&state.tuning);

    if let Some(id) = state.field.step(&state.tuning) {
        events.push(GameEvent::ObstacleSpawned { id });
    }
    state.scroll_background();

    let crash = match status {
        BodyStatus::OutOfBounds(boundary) => Some(CrashCause::OutOfBounds(boundary)),
        BodyStatus::InBounds => state
            .detector
            .first_hit(state.avatar_pos(), state.field.obstacles())
            .map(|id| CrashCause::Obstacle { id }),
    };
    if let Some(cause) = crash {
        events.push(GameEvent::Crashed(cause));
        end_run(state, events);
        return;
    }

    let avatar_x = state.tuning.avatar_x;
    for obstacle in state.field.obstacles_mut() {
        if obstacle.try_score(avatar_x) {
            state.score += 1;
            events.push(GameEvent::Scored { score: state.score });
        }
    }
}

fn end_run(state: &mut GameState, events: &mut Vec<GameEvent>) {
    let score = state.score;
    state.history.record(score);
    log::info!("Scene playing -> game_over (score {})", score);
    state.scene = Scene::GameOver { final_score: score };
    events.push(GameEvent::GameOver { score });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::body::Boundary;
    use crate::sim::collision::{CollisionDetector, CollisionMask};
    use crate::tuning::{CollisionStrategy, Tuning};

    fn new_state() -> GameState {
        let t = Tuning::default();
        let detector = CollisionDetector::new(
            CollisionStrategy::PixelMask,
            CollisionMask::filled(t.avatar_width, t.avatar_height),
            CollisionMask::filled(t.pipe_width, t.pipe_height),
        );
        GameState::new(t, detector, 12345)
    }

    fn press(action: ButtonId) -> TickInput {
        TickInput {
            action: Some(action),
            ..Default::default()
        }
    }

    /// Run ticks until the scene leaves Countdown
    fn finish_countdown(state: &mut GameState) -> Vec<GameEvent> {
        let mut all = Vec::new();
        while matches!(state.scene, Scene::Countdown { .. }) {
            all.extend(tick(state, &TickInput::default()));
        }
        all
    }

    #[test]
    fn test_tick_home_to_countdown_to_playing() {
        let mut state = new_state();
        let events = tick(&mut state, &press(ButtonId::Play));
        assert_eq!(
            events,
            vec![
                GameEvent::ButtonPressed,
                GameEvent::CountdownStep { remaining: 3 }
            ]
        );
        assert!(matches!(state.scene, Scene::Countdown { remaining: 3, .. }));

        let before = state.time_ticks;
        let events = finish_countdown(&mut state);
        assert_eq!(state.scene, Scene::Playing);
        assert_eq!(state.time_ticks - before, 180);
        assert_eq!(
            events,
            vec![
                GameEvent::CountdownStep { remaining: 2 },
                GameEvent::CountdownStep { remaining: 1 },
                GameEvent::RunStarted,
            ]
        );
    }

    #[test]
    fn test_play_resets_run() {
        let mut state = new_state();
        state.score = 9;
        state.body.y = 10.0;
        state.field.spawn(&state.tuning.clone());
        tick(&mut state, &press(ButtonId::Play));
        assert_eq!(state.score, 0);
        assert_eq!(state.body.y, state.tuning.avatar_start_y());
        assert!(state.field.is_empty());
    }

    #[test]
    fn test_countdown_freezes_physics() {
        let mut state = new_state();
        tick(&mut state, &press(ButtonId::Play));
        let y = state.body.y;
        tick(&mut state, &TickInput::default());
        assert_eq!(state.body.y, y);
    }

    #[test]
    fn test_no_input_falls_out_of_bottom() {
        let mut state = new_state();
        tick(&mut state, &press(ButtonId::Play));
        finish_countdown(&mut state);

        let mut play_ticks = 0;
        let events = loop {
            let events = tick(&mut state, &TickInput::default());
            play_ticks += 1;
            if state.scene != Scene::Playing {
                break events;
            }
        };
        // y_n = 425 + 0.4 * n(n+1)/2 first exceeds 830 at n = 45
        assert_eq!(play_ticks, 45);
        assert_eq!(state.scene, Scene::GameOver { final_score: 0 });
        assert_eq!(
            events,
            vec![
                GameEvent::Crashed(CrashCause::OutOfBounds(Boundary::Bottom)),
                GameEvent::GameOver { score: 0 },
            ]
        );
        assert_eq!(state.history.entries(), &[0]);
    }

    #[test]
    fn test_jump_event_and_cooldown() {
        let mut state = new_state();
        state.scene = Scene::Playing;
        let jump = TickInput {
            jump: true,
            ..Default::default()
        };
        let events = tick(&mut state, &jump);
        assert!(events.contains(&GameEvent::Jumped));
        let events = tick(&mut state, &jump);
        assert!(!events.contains(&GameEvent::Jumped));
    }

    #[test]
    fn test_obstacle_collision_ends_run() {
        let mut state = new_state();
        state.scene = Scene::Playing;
        // Barrier right on top of the avatar with the gap far below it
        let t = state.tuning.clone();
        state.field.spawn(&t);
        let o = &mut state.field.obstacles_mut()[0];
        o.place_at(t.avatar_x + 10.0);
        o.gap_top = 700.0;

        let events = tick(&mut state, &TickInput::default());
        let id = state.field.obstacles()[0].id;
        assert!(events.contains(&GameEvent::Crashed(CrashCause::Obstacle { id })));
        assert!(matches!(state.scene, Scene::GameOver { .. }));
    }

    #[test]
    fn test_passing_through_gap_scores_once() {
        let mut state = new_state();
        state.scene = Scene::Playing;
        state.tuning.gravity = 0.0;
        let t = state.tuning.clone();
        state.field.spawn(&t);
        {
            let o = &mut state.field.obstacles_mut()[0];
            o.place_at(t.avatar_x + 12.0);
            // Gap wide around the avatar
            o.gap_top = state.body.y - 60.0;
            o.gap_height = t.avatar_height as f32 + 120.0;
        }

        let mut scored = 0;
        for _ in 0..10 {
            let events = tick(&mut state, &TickInput::default());
            scored += events
                .iter()
                .filter(|e| matches!(e, GameEvent::Scored { .. }))
                .count();
        }
        assert_eq!(state.scene, Scene::Playing);
        assert_eq!(scored, 1);
        assert_eq!(state.score, 1);
    }

    #[test]
    fn test_obstacles_spawn_on_interval() {
        let mut state = new_state();
        state.scene = Scene::Playing;
        state.tuning.gravity = 0.0;
        for _ in 0..90 {
            tick(&mut state, &TickInput::default());
        }
        assert_eq!(state.field.len(), 1);
        for _ in 0..90 {
            tick(&mut state, &TickInput::default());
        }
        assert_eq!(state.field.len(), 2);
    }

    #[test]
    fn test_stats_paging_and_return() {
        let mut state = new_state();
        for s in [3, 9, 1] {
            state.history.record(s);
        }
        let events = tick(&mut state, &press(ButtonId::Stats));
        assert_eq!(events, vec![GameEvent::ButtonPressed, GameEvent::StatsOpened]);
        assert_eq!(state.scene, Scene::Stats { page: 0 });

        tick(&mut state, &press(ButtonId::PrevStat));
        assert_eq!(state.scene, Scene::Stats { page: 0 });
        tick(&mut state, &press(ButtonId::NextStat));
        tick(&mut state, &press(ButtonId::NextStat));
        let events = tick(&mut state, &press(ButtonId::NextStat));
        assert!(events.is_empty());
        assert_eq!(state.scene, Scene::Stats { page: 2 });

        let events = tick(&mut state, &press(ButtonId::Return));
        assert_eq!(events, vec![GameEvent::ButtonPressed, GameEvent::ReturnedHome]);
        assert_eq!(state.scene, Scene::home());
    }

    #[test]
    fn test_clear_stats_requires_confirmation() {
        let mut state = new_state();
        state.history.record(4);
        tick(&mut state, &press(ButtonId::ClearStats));
        assert_eq!(state.scene, Scene::Home { confirm_clear: true });
        tick(&mut state, &press(ButtonId::CancelClear));
        assert_eq!(state.history.len(), 1);

        tick(&mut state, &press(ButtonId::ClearStats));
        let events = tick(&mut state, &press(ButtonId::ConfirmClear));
        assert!(events.contains(&GameEvent::StatsCleared));
        assert!(state.history.is_empty());
        assert_eq!(state.scene, Scene::home());
    }

    #[test]
    fn test_buttons_ignored_outside_their_scene() {
        let mut state = new_state();
        state.scene = Scene::Playing;
        let events = tick(&mut state, &press(ButtonId::Stats));
        assert!(!events.contains(&GameEvent::ButtonPressed));
        assert_eq!(state.scene, Scene::Playing);
    }

    #[test]
    fn test_game_over_to_home() {
        let mut state = new_state();
        state.scene = Scene::GameOver { final_score: 2 };
        let events = tick(&mut state, &press(ButtonId::Home));
        assert_eq!(events, vec![GameEvent::ButtonPressed, GameEvent::ReturnedHome]);
        assert_eq!(state.scene, Scene::home());
    }

    #[test]
    fn test_home_scrolls_background() {
        let mut state = new_state();
        tick(&mut state, &TickInput::default());
        assert_eq!(state.background_x, -state.tuning.background_speed);
    }

    #[test]
    fn test_determinism() {
        let mut a = new_state();
        let mut b = new_state();
        a.scene = Scene::Playing;
        b.scene = Scene::Playing;
        for i in 0..400 {
            let input = TickInput {
                jump: i % 50 == 0,
                ..Default::default()
            };
            tick(&mut a, &input);
            tick(&mut b, &input);
        }
        assert_eq!(a.field.obstacles(), b.field.obstacles());
        assert_eq!(a.score, b.score);
        assert_eq!(a.scene, b.scene);
    }
}
