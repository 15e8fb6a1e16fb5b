//! Frame pacing and FPS measurement

use std::thread;
use std::time::{Duration, Instant};

const FPS_WINDOW: usize = 60;

/// Sleeps out the remainder of each frame so one tick runs per frame
#[derive(Debug)]
pub struct FramePacer {
    frame: Duration,
    frame_start: Instant,
    frame_times: [Option<Instant>; FPS_WINDOW],
    frame_index: usize,
    fps: u32,
}

impl FramePacer {
    pub fn new(tick_rate_hz: u32) -> Self {
        Self {
            frame: Duration::from_secs_f64(1.0 / f64::from(tick_rate_hz.max(1))),
            frame_start: Instant::now(),
            frame_times: [None; FPS_WINDOW],
            frame_index: 0,
            fps: 0,
        }
    }

    /// Mark the start of a frame
    pub fn begin(&mut self) {
        let now = Instant::now();
        self.frame_start = now;

        // Average over the last FPS_WINDOW frames
        let oldest = self.frame_times[self.frame_index];
        self.frame_times[self.frame_index] = Some(now);
        self.frame_index = (self.frame_index + 1) % FPS_WINDOW;
        if let Some(oldest) = oldest {
            let elapsed = now.duration_since(oldest).as_secs_f64();
            if elapsed > 0.0 {
                self.fps = (FPS_WINDOW as f64 / elapsed).round() as u32;
            }
        }
    }

    /// Sleep whatever is left of the current frame. Overruns are not caught up.
    pub fn wait(&self) {
        let elapsed = self.frame_start.elapsed();
        if elapsed < self.frame {
            thread::sleep(self.frame - elapsed);
        }
    }

    /// Measured frames per second (0 until a full window has elapsed)
    pub fn fps(&self) -> u32 {
        self.fps
    }
}
