//! Silent audio device
//!
//! Terminals have no audio output, so playback is logged and the ambient
//! track is modelled as a timer: it "plays" for `track_length` and then
//! reports itself finished, which the ambient loop will restart.

use std::time::{Duration, Instant};

use parking_lot::Mutex;

use super::{AudioSink, SoundId};

pub struct NullAudio {
    track_length: Duration,
    ambient_started: Mutex<Option<Instant>>,
}

impl NullAudio {
    pub const DEFAULT_TRACK_LENGTH: Duration = Duration::from_secs(30);

    pub fn new() -> Self {
        Self::with_track_length(Self::DEFAULT_TRACK_LENGTH)
    }

    pub fn with_track_length(track_length: Duration) -> Self {
        Self {
            track_length,
            ambient_started: Mutex::new(None),
        }
    }
}

impl Default for NullAudio {
    fn default() -> Self {
        Self::new()
    }
}

impl AudioSink for NullAudio {
    fn play_once(&self, sound: SoundId, volume: f32) {
        log::debug!("play {:?} at {:.2}", sound, volume);
    }

    fn is_ambient_playing(&self) -> bool {
        self.ambient_started
            .lock()
            .is_some_and(|started| started.elapsed() < self.track_length)
    }

    fn start_ambient(&self, sound: SoundId, volume: f32) {
        log::debug!("ambient {:?} started at {:.2}", sound, volume);
        *self.ambient_started.lock() = Some(Instant::now());
    }

    fn stop_ambient(&self) {
        *self.ambient_started.lock() = None;
    }
}
