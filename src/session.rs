//! Top-level game loop
//!
//! [`GameSession`] owns the simulation state and every platform capability.
//! Each frame drains input, advances the simulation one tick, performs the
//! side effects the tick reported (sounds, score log), draws, and then
//! sleeps out the rest of the frame.

use crate::audio::{AudioManager, SoundEffect};
use crate::highscores::ScoreHistory;
use crate::platform::{AudioSink, FramePacer, InputEvent, InputSource, PlatformError, Renderer, ScoreStore};
use crate::renderer;
use crate::sim::{GameEvent, GameState, Scene, TickInput, tick};
use crate::ui;

/// Whether the loop keeps going after a frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

pub struct GameSession<R, I, A, S>
where
    A: AudioSink + 'static,
{
    state: GameState,
    renderer: R,
    input: I,
    audio: AudioManager<A>,
    store: S,
    pacer: FramePacer,
    show_fps: bool,
}

impl<R, I, A, S> GameSession<R, I, A, S>
where
    R: Renderer,
    I: InputSource,
    A: AudioSink + 'static,
    S: ScoreStore,
{
    /// Build a session; the score history is read from `store` once here
    pub fn new(mut state: GameState, renderer: R, input: I, audio: AudioManager<A>, store: S) -> Self {
        state.history = ScoreHistory::from_log(store.read_all());
        log::info!("Session ready ({} recorded runs)", state.history.len());
        let pacer = FramePacer::new(state.tuning.tick_rate_hz);
        Self {
            state,
            renderer,
            input,
            audio,
            store,
            pacer,
            show_fps: false,
        }
    }

    pub fn with_fps(mut self, show_fps: bool) -> Self {
        self.show_fps = show_fps;
        self
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    pub fn audio(&self) -> &AudioManager<A> {
        &self.audio
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Run until quit. Ambient audio runs for the session's lifetime.
    pub fn run(&mut self) -> Result<(), PlatformError> {
        self.audio.start_ambient();
        let result = self.run_loop();
        self.audio.shutdown();
        log::info!("Session ended");
        result
    }

    fn run_loop(&mut self) -> Result<(), PlatformError> {
        loop {
            self.pacer.begin();
            if self.run_frame()? == Flow::Quit {
                return Ok(());
            }
            self.pacer.wait();
        }
    }

    /// One loop iteration without pacing
    pub fn run_frame(&mut self) -> Result<Flow, PlatformError> {
        let Some(input) = self.collect_input()? else {
            log::info!("Quit requested");
            return Ok(Flow::Quit);
        };

        let events = tick(&mut self.state, &input);
        for event in events {
            self.handle_event(event);
        }

        let fps = self.show_fps.then(|| self.pacer.fps());
        renderer::draw(&self.state, &mut self.renderer, fps);
        self.renderer.present()?;
        Ok(Flow::Continue)
    }

    /// Fold this frame's events into one tick input; `None` means quit
    fn collect_input(&mut self) -> Result<Option<TickInput>, PlatformError> {
        let mut input = TickInput::default();
        for event in self.input.poll_events()? {
            match event {
                InputEvent::Quit => return Ok(None),
                InputEvent::KeyDown(key) => {
                    if self.state.scene == Scene::Playing {
                        input.jump |= ui::is_jump_key(key);
                    } else if input.action.is_none() {
                        input.action = ui::key_action(&self.state.scene, key);
                    }
                }
                InputEvent::MouseDown(pos) => {
                    if input.action.is_none() {
                        let buttons =
                            ui::buttons(&self.state.scene, &self.state.tuning, self.state.history.len());
                        input.action = ui::hit_test(&buttons, pos);
                    }
                }
            }
        }
        Ok(Some(input))
    }

    fn handle_event(&mut self, event: GameEvent) {
        match event {
            GameEvent::ButtonPressed => self.audio.play(SoundEffect::Click),
            GameEvent::Jumped => self.audio.play(SoundEffect::Jump),
            GameEvent::GameOver { score } => {
                // Losing one entry is not worth ending the session over
                if let Err(e) = self.store.append(score) {
                    log::warn!("{}", e);
                }
            }
            GameEvent::StatsOpened => {
                self.state.history = ScoreHistory::from_log(self.store.read_all());
            }
            GameEvent::StatsCleared => {
                if let Err(e) = self.store.clear() {
                    log::warn!("{}", e);
                }
            }
            GameEvent::Crashed(cause) => log::debug!("Crashed: {:?}", cause),
            GameEvent::Scored { score } => log::debug!("Score {}", score),
            GameEvent::CountdownStep { .. }
            | GameEvent::RunStarted
            | GameEvent::ObstacleSpawned { .. }
            | GameEvent::ReturnedHome => {}
        }
    }
}
