//! Collision detection between the avatar and obstacle barriers
//!
//! Two interchangeable silhouettes: per-pixel opacity masks (the reference
//! behavior, forgiving transparent sprite padding) and whole-sprite
//! bounding boxes (stricter). Positions are floored to whole pixels before
//! either test so both strategies agree on where a sprite sits.

use std::sync::Arc;

use glam::{IVec2, UVec2, Vec2};

use super::obstacle::Obstacle;
use crate::tuning::CollisionStrategy;

/// Axis-aligned pixel rectangle, `min` inclusive, `min + size` exclusive
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PixelRect {
    pub min: IVec2,
    pub size: UVec2,
}

impl PixelRect {
    pub fn new(min: IVec2, size: UVec2) -> Self {
        Self { min, size }
    }

    #[inline]
    pub fn max(&self) -> IVec2 {
        self.min + self.size.as_ivec2()
    }

    /// True when the rectangles share at least one pixel
    pub fn overlaps(&self, other: &PixelRect) -> bool {
        let (a_max, b_max) = (self.max(), other.max());
        self.min.x < b_max.x && other.min.x < a_max.x && self.min.y < b_max.y && other.min.y < a_max.y
    }

    pub fn contains(&self, p: Vec2) -> bool {
        let (min, max) = (self.min.as_vec2(), self.max().as_vec2());
        p.x >= min.x && p.x < max.x && p.y >= min.y && p.y < max.y
    }
}

/// Snap a world position to the pixel grid
#[inline]
pub fn to_pixel(pos: Vec2) -> IVec2 {
    pos.floor().as_ivec2()
}

/// Opaque/transparent bitmap of a sprite
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CollisionMask {
    width: u32,
    height: u32,
    bits: Vec<bool>,
}

impl CollisionMask {
    /// Fully transparent mask
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            bits: vec![false; width as usize * height as usize],
        }
    }

    /// Fully opaque mask
    pub fn filled(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            bits: vec![true; width as usize * height as usize],
        }
    }

    /// Build a mask by evaluating `opaque(x, y)` for every pixel
    pub fn from_fn(width: u32, height: u32, opaque: impl Fn(u32, u32) -> bool) -> Self {
        let mut bits = Vec::with_capacity(width as usize * height as usize);
        for y in 0..height {
            for x in 0..width {
                bits.push(opaque(x, y));
            }
        }
        Self {
            width,
            height,
            bits,
        }
    }

    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    #[inline]
    pub fn size(&self) -> UVec2 {
        UVec2::new(self.width, self.height)
    }

    /// Opacity at (x, y); anything outside the mask is transparent
    #[inline]
    pub fn get(&self, x: i32, y: i32) -> bool {
        if x < 0 || y < 0 || x as u32 >= self.width || y as u32 >= self.height {
            return false;
        }
        self.bits[y as usize * self.width as usize + x as usize]
    }

    pub fn set(&mut self, x: u32, y: u32, opaque: bool) {
        if x < self.width && y < self.height {
            self.bits[y as usize * self.width as usize + x as usize] = opaque;
        }
    }

    /// Number of opaque pixels
    pub fn count(&self) -> usize {
        self.bits.iter().filter(|&&b| b).count()
    }

    /// Upside-down copy (top barriers reuse the bottom sprite flipped)
    pub fn flipped_vertical(&self) -> Self {
        Self::from_fn(self.width, self.height, |x, y| {
            self.get(x as i32, (self.height - 1 - y) as i32)
        })
    }

    /// Nearest-neighbour resample to a new size
    pub fn scaled(&self, width: u32, height: u32) -> Self {
        if self.width == 0 || self.height == 0 {
            return Self::new(width, height);
        }
        Self::from_fn(width, height, |x, y| {
            let sx = (u64::from(x) * u64::from(self.width) / u64::from(width.max(1))) as i32;
            let sy = (u64::from(y) * u64::from(self.height) / u64::from(height.max(1))) as i32;
            self.get(sx, sy)
        })
    }

    /// Whole-sprite rectangle at `pos`
    pub fn rect_at(&self, pos: IVec2) -> PixelRect {
        PixelRect::new(pos, self.size())
    }

    /// Do any opaque pixels coincide when `other`'s top-left sits at `offset`
    /// relative to this mask's top-left?
    pub fn overlaps(&self, other: &CollisionMask, offset: IVec2) -> bool {
        let x0 = offset.x.max(0);
        let y0 = offset.y.max(0);
        let x1 = (offset.x + other.width as i32).min(self.width as i32);
        let y1 = (offset.y + other.height as i32).min(self.height as i32);
        if x0 >= x1 || y0 >= y1 {
            return false;
        }
        for y in y0..y1 {
            for x in x0..x1 {
                if self.get(x, y) && other.get(x - offset.x, y - offset.y) {
                    return true;
                }
            }
        }
        false
    }
}

/// Decides whether the avatar touches any obstacle barrier
#[derive(Debug, Clone)]
pub struct CollisionDetector {
    strategy: CollisionStrategy,
    avatar: Arc<CollisionMask>,
    pipe_top: Arc<CollisionMask>,
    pipe_bottom: Arc<CollisionMask>,
}

impl CollisionDetector {
    /// `pipe` is the bottom barrier sprite; the top barrier is its vertical flip
    pub fn new(strategy: CollisionStrategy, avatar: CollisionMask, pipe: CollisionMask) -> Self {
        let pipe_top = pipe.flipped_vertical();
        Self {
            strategy,
            avatar: Arc::new(avatar),
            pipe_top: Arc::new(pipe_top),
            pipe_bottom: Arc::new(pipe),
        }
    }

    pub fn strategy(&self) -> CollisionStrategy {
        self.strategy
    }

    pub fn avatar_mask(&self) -> &CollisionMask {
        &self.avatar
    }

    pub fn pipe_top_mask(&self) -> &CollisionMask {
        &self.pipe_top
    }

    /// Does the avatar (top-left at `avatar_pos`) touch either barrier?
    pub fn hits(&self, avatar_pos: Vec2, obstacle: &Obstacle) -> bool {
        let top_pos = obstacle.top_segment_pos(self.pipe_top.height() as f32);
        let bottom_pos = obstacle.bottom_segment_pos();
        self.silhouettes_overlap(avatar_pos, &self.pipe_top, top_pos)
            || self.silhouettes_overlap(avatar_pos, &self.pipe_bottom, bottom_pos)
    }

    /// First obstacle (in field order) the avatar touches
    pub fn first_hit(&self, avatar_pos: Vec2, obstacles: &[Obstacle]) -> Option<u32> {
        obstacles
            .iter()
            .find(|o| self.hits(avatar_pos, o))
            .map(|o| o.id)
    }

    fn silhouettes_overlap(&self, avatar_pos: Vec2, other: &CollisionMask, other_pos: Vec2) -> bool {
        let a = to_pixel(avatar_pos);
        let b = to_pixel(other_pos);
        // Boxes are a valid broad phase for masks: opaque pixels lie inside them
        if !self.avatar.rect_at(a).overlaps(&other.rect_at(b)) {
            return false;
        }
        match self.strategy {
            CollisionStrategy::BoundingBox => true,
            CollisionStrategy::PixelMask => self.avatar.overlaps(other, b - a),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    /// 10x10 disc inside a square frame, corners transparent
    fn disc(size: u32) -> CollisionMask {
        let r = size as f32 / 2.0;
        CollisionMask::from_fn(size, size, |x, y| {
            let dx = x as f32 + 0.5 - r;
            let dy = y as f32 + 0.5 - r;
            dx * dx + dy * dy <= r * r
        })
    }

    fn detector(strategy: CollisionStrategy) -> CollisionDetector {
        CollisionDetector::new(
            strategy,
            CollisionMask::filled(20, 20),
            CollisionMask::filled(30, 400),
        )
    }

    #[test]
    fn test_rect_overlap_edges() {
        let a = PixelRect::new(IVec2::new(0, 0), UVec2::new(10, 10));
        let touching = PixelRect::new(IVec2::new(10, 0), UVec2::new(10, 10));
        let one_px = PixelRect::new(IVec2::new(9, 9), UVec2::new(10, 10));
        assert!(!a.overlaps(&touching));
        assert!(a.overlaps(&one_px));
        assert!(one_px.overlaps(&a));
    }

    #[test]
    fn test_mask_overlap_one_pixel() {
        let a = CollisionMask::filled(10, 10);
        let b = CollisionMask::filled(10, 10);
        assert!(!a.overlaps(&b, IVec2::new(10, 0)));
        assert!(!a.overlaps(&b, IVec2::new(0, -10)));
        assert!(a.overlaps(&b, IVec2::new(9, 9)));
        assert!(a.overlaps(&b, IVec2::new(-9, -9)));
    }

    #[test]
    fn test_mask_forgives_transparent_corners() {
        let a = disc(10);
        let b = disc(10);
        // Bounding boxes share the corner 2x2 block, discs do not touch there
        assert!(a.rect_at(IVec2::ZERO).overlaps(&b.rect_at(IVec2::new(8, 8))));
        assert!(!a.overlaps(&b, IVec2::new(8, 8)));
    }

    #[test]
    fn test_flip_and_scale() {
        let mut m = CollisionMask::new(2, 3);
        m.set(0, 0, true);
        let flipped = m.flipped_vertical();
        assert!(flipped.get(0, 2));
        assert!(!flipped.get(0, 0));

        let big = m.scaled(4, 6);
        assert_eq!(big.size(), UVec2::new(4, 6));
        assert_eq!(big.count(), 4);
        assert!(big.get(1, 1));
    }

    #[test]
    fn test_detector_gap_is_safe() {
        for strategy in [CollisionStrategy::PixelMask, CollisionStrategy::BoundingBox] {
            let d = detector(strategy);
            let o = Obstacle::new(1, 50.0, 30.0, 200.0, 100.0);
            // Avatar 20px tall fully inside the 100px gap
            assert!(!d.hits(Vec2::new(55.0, 240.0), &o), "{:?}", strategy);
        }
    }

    #[test]
    fn test_detector_one_pixel_into_top_barrier() {
        for strategy in [CollisionStrategy::PixelMask, CollisionStrategy::BoundingBox] {
            let d = detector(strategy);
            let o = Obstacle::new(1, 50.0, 30.0, 200.0, 100.0);
            // Touching the underside of the top barrier: no overlap
            assert!(!d.hits(Vec2::new(55.0, 200.0), &o), "{:?}", strategy);
            // One pixel up: overlap
            assert!(d.hits(Vec2::new(55.0, 199.0), &o), "{:?}", strategy);
        }
    }

    #[test]
    fn test_detector_one_pixel_into_bottom_barrier() {
        for strategy in [CollisionStrategy::PixelMask, CollisionStrategy::BoundingBox] {
            let d = detector(strategy);
            let o = Obstacle::new(1, 50.0, 30.0, 200.0, 100.0);
            assert!(!d.hits(Vec2::new(55.0, 280.0), &o), "{:?}", strategy);
            assert!(d.hits(Vec2::new(55.0, 281.0), &o), "{:?}", strategy);
        }
    }

    #[test]
    fn test_detector_horizontal_clearance() {
        for strategy in [CollisionStrategy::PixelMask, CollisionStrategy::BoundingBox] {
            let d = detector(strategy);
            let o = Obstacle::new(1, 50.0, 30.0, 200.0, 100.0);
            // Avatar right edge at x=50 exactly: not yet touching
            assert!(!d.hits(Vec2::new(30.0, 0.0), &o));
            assert!(d.hits(Vec2::new(31.0, 0.0), &o));
        }
    }

    #[test]
    fn test_strategies_differ_on_padding() {
        let avatar = disc(20);
        let pipe = CollisionMask::filled(30, 400);
        let mask = CollisionDetector::new(CollisionStrategy::PixelMask, avatar.clone(), pipe.clone());
        let bbox = CollisionDetector::new(CollisionStrategy::BoundingBox, avatar, pipe);
        let o = Obstacle::new(1, 50.0, 30.0, 200.0, 100.0);
        // Avatar's transparent lower-right corner pokes into the barrier's corner
        let pos = Vec2::new(32.0, 282.0);
        assert!(bbox.hits(pos, &o));
        assert!(!mask.hits(pos, &o));
    }

    #[test]
    fn test_first_hit_in_field_order() {
        let d = detector(CollisionStrategy::PixelMask);
        let obstacles = vec![
            Obstacle::new(1, 500.0, 30.0, 200.0, 100.0),
            Obstacle::new(2, 50.0, 30.0, 200.0, 100.0),
            Obstacle::new(3, 40.0, 30.0, 200.0, 100.0),
        ];
        assert_eq!(d.first_hit(Vec2::new(55.0, 10.0), &obstacles), Some(2));
        assert_eq!(d.first_hit(Vec2::new(55.0, 240.0), &obstacles), None);
    }

    proptest! {
        #[test]
        fn prop_mask_hit_implies_box_hit(dx in -25i32..25, dy in -25i32..25) {
            let a = disc(20);
            let b = disc(16);
            let offset = IVec2::new(dx, dy);
            if a.overlaps(&b, offset) {
                prop_assert!(a.rect_at(IVec2::ZERO).overlaps(&b.rect_at(offset)));
            }
            // Symmetric from the other mask's point of view
            prop_assert_eq!(a.overlaps(&b, offset), b.overlaps(&a, -offset));
        }
    }
}
