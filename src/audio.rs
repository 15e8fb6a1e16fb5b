//! Audio playback on top of an `AudioSink`
//!
//! One-shot effects play through the manager with the configured volumes.
//! The ambient track is kept alive by a background loop that checks every
//! 100 ms whether the track ended and restarts it.

use std::sync::Arc;
use std::thread;
use std::time::Duration;

use crossbeam_channel::{Receiver, RecvTimeoutError, Sender, bounded};

use crate::platform::{AudioSink, SoundId};

/// How often the ambient loop checks whether the track is still playing
pub const AMBIENT_POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Sound effect types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SoundEffect {
    /// Avatar jump
    Jump,
    /// Menu button
    Click,
}

impl SoundEffect {
    fn sound(self) -> SoundId {
        match self {
            SoundEffect::Jump => SoundId::Jump,
            SoundEffect::Click => SoundId::Click,
        }
    }
}

/// Handle to the ambient restart loop. Stopping only signals the loop; it
/// is never joined, so shutdown does not wait on it.
pub struct AmbientLoop {
    stop_tx: Sender<()>,
}

impl AmbientLoop {
    pub fn spawn<A: AudioSink + 'static>(sink: Arc<A>, volume: f32) -> std::io::Result<Self> {
        let (stop_tx, stop_rx) = bounded(1);
        thread::Builder::new()
            .name("ambient-audio".into())
            .spawn(move || run_ambient(sink.as_ref(), volume, &stop_rx))?;
        Ok(Self { stop_tx })
    }

    pub fn stop(&self) {
        // Full or disconnected both mean the loop is already stopping
        let _ = self.stop_tx.try_send(());
    }
}

impl Drop for AmbientLoop {
    fn drop(&mut self) {
        self.stop();
    }
}

fn run_ambient<A: AudioSink + ?Sized>(sink: &A, volume: f32, stop_rx: &Receiver<()>) {
    log::debug!("Ambient loop started");
    loop {
        if !sink.is_ambient_playing() {
            sink.start_ambient(SoundId::Ambient, volume);
        }
        match stop_rx.recv_timeout(AMBIENT_POLL_INTERVAL) {
            Err(RecvTimeoutError::Timeout) => {}
            Ok(()) | Err(RecvTimeoutError::Disconnected) => break,
        }
    }
    sink.stop_ambient();
    log::debug!("Ambient loop stopped");
}

/// Audio manager for the game
pub struct AudioManager<A: AudioSink> {
    sink: Arc<A>,
    ambient: Option<AmbientLoop>,
    master_volume: f32,
    sfx_volume: f32,
    music_volume: f32,
    muted: bool,
}

impl<A: AudioSink + 'static> AudioManager<A> {
    pub fn new(sink: A) -> Self {
        Self {
            sink: Arc::new(sink),
            ambient: None,
            master_volume: 0.8,
            sfx_volume: 1.0,
            music_volume: 0.5,
            muted: false,
        }
    }

    /// Set master volume (0.0 - 1.0)
    pub fn set_master_volume(&mut self, vol: f32) {
        self.master_volume = vol.clamp(0.0, 1.0);
    }

    /// Set SFX volume (0.0 - 1.0)
    pub fn set_sfx_volume(&mut self, vol: f32) {
        self.sfx_volume = vol.clamp(0.0, 1.0);
    }

    /// Set music volume (0.0 - 1.0). Applies from the next ambient start.
    pub fn set_music_volume(&mut self, vol: f32) {
        self.music_volume = vol.clamp(0.0, 1.0);
    }

    /// Mute/unmute all audio
    pub fn set_muted(&mut self, muted: bool) {
        self.muted = muted;
    }

    fn effective_volume(&self, channel: f32) -> f32 {
        if self.muted {
            0.0
        } else {
            self.master_volume * channel
        }
    }

    pub fn sink(&self) -> &A {
        &self.sink
    }

    /// Play a sound effect
    pub fn play(&self, effect: SoundEffect) {
        let vol = self.effective_volume(self.sfx_volume);
        if vol <= 0.0 {
            return;
        }
        self.sink.play_once(effect.sound(), vol);
    }

    /// Start the ambient loop (no-op if already running or muted)
    pub fn start_ambient(&mut self) {
        if self.ambient.is_some() {
            return;
        }
        let vol = self.effective_volume(self.music_volume);
        if vol <= 0.0 {
            return;
        }
        match AmbientLoop::spawn(Arc::clone(&self.sink), vol) {
            Ok(ambient) => self.ambient = Some(ambient),
            Err(e) => log::warn!("Failed to start ambient audio: {} - music disabled", e),
        }
    }

    pub fn is_ambient_running(&self) -> bool {
        self.ambient.is_some()
    }

    /// Signal the ambient loop to stop without waiting for it
    pub fn shutdown(&mut self) {
        if let Some(ambient) = self.ambient.take() {
            ambient.stop();
        }
    }
}
