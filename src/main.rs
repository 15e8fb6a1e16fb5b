//! Flappy Gates entry point
//!
//! Loads settings and sprites, takes over the terminal and runs the game
//! loop. Logs go to a file since the terminal is busy drawing.

use std::fs::File;
use std::io;
use std::process::ExitCode;

use glam::Vec2;
use thiserror::Error;

use flappy_gates::GameSession;
use flappy_gates::Settings;
use flappy_gates::assets::{AssetError, SpriteSheet};
use flappy_gates::audio::AudioManager;
use flappy_gates::persistence::FileScoreStore;
use flappy_gates::platform::{NullAudio, PlatformError, TerminalGuard, TerminalInput};
use flappy_gates::renderer::TerminalRenderer;
use flappy_gates::sim::GameState;

const LOG_FILE: &str = "flappy-gates.log";

#[derive(Debug, Error)]
enum StartupError {
    #[error("{0}")]
    Assets(#[from] AssetError),
    #[error("terminal setup failed: {0}")]
    Terminal(#[from] io::Error),
    #[error("{0}")]
    Platform(#[from] PlatformError),
}

fn init_logging() {
    let env = env_logger::Env::default().default_filter_or("info");
    let mut builder = env_logger::Builder::from_env(env);
    match File::create(LOG_FILE) {
        Ok(file) => {
            builder.target(env_logger::Target::Pipe(Box::new(file)));
        }
        Err(e) => eprintln!("cannot create {}: {} - logging to stderr", LOG_FILE, e),
    }
    builder.init();
}

fn run() -> Result<(), StartupError> {
    let settings = Settings::load();
    let tuning = settings.tuning.clone();

    // Bad assets are fatal, and should be reported before the terminal is taken
    let sprites = SpriteSheet::from_dir(settings.assets_dir.as_deref(), &tuning)?;
    let detector = sprites.detector(tuning.collision);
    log::info!("Collision strategy: {}", tuning.collision.as_str());

    let seed = settings.seed.unwrap_or_else(rand::random);
    log::info!("Game initialized with seed: {}", seed);
    let state = GameState::new(tuning.clone(), detector, seed);

    let mut audio = AudioManager::new(NullAudio::new());
    audio.set_master_volume(settings.master_volume);
    audio.set_sfx_volume(settings.sfx_volume);
    audio.set_music_volume(settings.music_volume);
    audio.set_muted(settings.muted);

    let store = FileScoreStore::new(&settings.score_log);
    let world = Vec2::new(tuning.screen_width, tuning.screen_height);

    // Restores the terminal when dropped, after the session below
    let _guard = TerminalGuard::enter()?;
    let renderer = TerminalRenderer::stdout(sprites, world)?;
    let input = TerminalInput::new(world);

    let mut session =
        GameSession::new(state, renderer, input, audio, store).with_fps(settings.show_fps);
    session.run()?;
    Ok(())
}

fn main() -> ExitCode {
    init_logging();
    log::info!("Flappy Gates starting...");

    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{}", e);
            eprintln!("flappy-gates: {}", e);
            ExitCode::FAILURE
        }
    }
}
