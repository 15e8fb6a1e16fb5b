//! Gated obstacles and the field that spawns, scrolls and reaps them

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use crate::tuning::Tuning;

/// A pair of barriers with a passable gap between them
///
/// Solid everywhere above `gap_top` and below `gap_top + gap_height`.
#[derive(Debug, Clone, PartialEq)]
pub struct Obstacle {
    pub id: u32,
    /// Left edge (world pixels); only ever decreases
    pub x: f32,
    /// Left edge before the most recent advance
    pub prev_x: f32,
    pub width: f32,
    /// Drawn once at creation
    pub gap_top: f32,
    pub gap_height: f32,
    /// Set once the avatar has been credited for passing this obstacle
    pub scored: bool,
    /// Left edge at creation; `x` is derived from it and the distance travelled
    origin_x: f32,
    age: u32,
    travelled: f64,
}

impl Obstacle {
    pub fn new(id: u32, x: f32, width: f32, gap_top: f32, gap_height: f32) -> Self {
        Self {
            id,
            x,
            prev_x: x,
            width,
            gap_top,
            gap_height,
            scored: false,
            origin_x: x,
            age: 0,
            travelled: 0.0,
        }
    }

    /// Move the obstacle to `x` as if it had just been created there
    pub fn place_at(&mut self, x: f32) {
        self.x = x;
        self.prev_x = x;
        self.origin_x = x;
        self.age = 0;
        self.travelled = 0.0;
    }

    /// Y where the bottom barrier starts
    #[inline]
    pub fn bottom_origin(&self) -> f32 {
        self.gap_top + self.gap_height
    }

    /// Top-left of the top barrier sprite (it hangs down to `gap_top`)
    pub fn top_segment_pos(&self, segment_height: f32) -> Vec2 {
        Vec2::new(self.x, self.gap_top - segment_height)
    }

    /// Top-left of the bottom barrier sprite
    pub fn bottom_segment_pos(&self) -> Vec2 {
        Vec2::new(self.x, self.bottom_origin())
    }

    /// Right edge (world pixels)
    #[inline]
    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    /// No visible pixel remains on screen.
    ///
    /// Tested against the exact distance travelled rather than the rounded
    /// `x`, so the reap tick is `ceil((origin + width) / speed)` at any speed.
    #[inline]
    pub fn is_off_screen(&self) -> bool {
        self.travelled >= f64::from(self.origin_x) + f64::from(self.width)
    }

    /// One tick of scrolling; `x` is recomputed from the age, never accumulated
    pub fn advance(&mut self, speed: f32) {
        self.prev_x = self.x;
        self.age = self.age.saturating_add(1);
        self.travelled = f64::from(speed) * f64::from(self.age);
        self.x = (f64::from(self.origin_x) - self.travelled) as f32;
    }

    /// Credit a pass when the leading edge crosses `avatar_x` this tick.
    ///
    /// Fires on the sign change of `x - avatar_x` and at most once per
    /// obstacle, so non-integer speeds cannot skip or double-count a pass.
    pub fn try_score(&mut self, avatar_x: f32) -> bool {
        if self.scored || !(self.prev_x > avatar_x && self.x <= avatar_x) {
            return false;
        }
        self.scored = true;
        true
    }
}

/// Live obstacles in spawn order (which is also left-to-right order)
#[derive(Debug, Clone)]
pub struct ObstacleField {
    obstacles: Vec<Obstacle>,
    ticks_since_spawn: u32,
    rng: Pcg32,
    next_id: u32,
}

impl ObstacleField {
    pub fn new(seed: u64) -> Self {
        Self {
            obstacles: Vec::new(),
            ticks_since_spawn: 0,
            rng: Pcg32::seed_from_u64(seed),
            next_id: 1,
        }
    }

    pub fn obstacles(&self) -> &[Obstacle] {
        &self.obstacles
    }

    pub fn obstacles_mut(&mut self) -> &mut [Obstacle] {
        &mut self.obstacles
    }

    pub fn len(&self) -> usize {
        self.obstacles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.obstacles.is_empty()
    }

    pub fn ticks_since_spawn(&self) -> u32 {
        self.ticks_since_spawn
    }

    /// Drop all obstacles and restart the spawn timer; the RNG stream continues
    pub fn reset(&mut self) {
        self.obstacles.clear();
        self.ticks_since_spawn = 0;
    }

    /// Create an obstacle at the right edge with a uniformly random gap
    pub fn spawn(&mut self, tuning: &Tuning) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        let gap_top = self
            .rng
            .random_range(tuning.gap_top_min..=tuning.gap_top_max);
        self.obstacles.push(Obstacle::new(
            id,
            tuning.screen_width,
            tuning.pipe_width as f32,
            gap_top,
            tuning.gap_height,
        ));
        self.ticks_since_spawn = 0;
        id
    }

    /// One tick: spawn if the interval elapsed, advance everything, reap.
    ///
    /// Returns the id of the obstacle spawned this tick, if any.
    pub fn step(&mut self, tuning: &Tuning) -> Option<u32> {
        self.ticks_since_spawn = self.ticks_since_spawn.saturating_add(1);
        let spawned = if self.ticks_since_spawn >= tuning.spawn_interval_ticks() {
            Some(self.spawn(tuning))
        } else {
            None
        };

        for obstacle in &mut self.obstacles {
            obstacle.advance(tuning.pipe_speed);
        }

        let before = self.obstacles.len();
        self.obstacles.retain(|o| !o.is_off_screen());
        let reaped = before - self.obstacles.len();
        if reaped > 0 {
            log::trace!("Reaped {} obstacle(s), {} live", reaped, self.obstacles.len());
        }

        spawned
    }
}
