//! Sprite silhouettes
//!
//! Every sprite is an opacity mask: the renderer rasterizes it and the
//! collision detector tests it. Masks are either built in (procedural
//! shapes) or loaded from a directory of text files where `#` is opaque
//! and `.` or space is transparent, then resampled to the configured size.
//!
//! `avatar.txt` and `pipe.txt` are required in an asset directory since
//! they decide collisions; the menu sprites fall back to the built-in shapes.

use std::f32::consts::TAU;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::consts::{
    ARROW_SIZE, BACKGROUND_OVERSCAN, BUTTON_HEIGHT, BUTTON_WIDTH, EMBLEM_HEIGHT, EMBLEM_WIDTH,
};
use crate::platform::SpriteId;
use crate::sim::{CollisionDetector, CollisionMask};
use crate::tuning::{CollisionStrategy, Tuning};

#[derive(Debug, Error)]
pub enum AssetError {
    #[error("missing sprite file {0:?}")]
    Missing(PathBuf),
    #[error("failed to read sprite {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("sprite {0:?} has no pixels")]
    Empty(PathBuf),
    #[error("sprite {path:?} line {line}: expected {expected} columns, found {found}")]
    Ragged {
        path: PathBuf,
        line: usize,
        expected: usize,
        found: usize,
    },
    #[error("sprite {path:?} line {line} column {column}: invalid character {ch:?}")]
    InvalidChar {
        path: PathBuf,
        line: usize,
        column: usize,
        ch: char,
    },
}

/// Parse a text mask. Trailing blank lines are ignored; every other row
/// must have the same width.
pub fn parse_mask(text: &str, path: &Path) -> Result<CollisionMask, AssetError> {
    let rows: Vec<&str> = text.lines().map(|l| l.trim_end_matches('\r')).collect();
    let end = rows
        .iter()
        .rposition(|row| !row.is_empty())
        .map_or(0, |i| i + 1);
    let rows = &rows[..end];

    let width = rows.first().map_or(0, |row| row.chars().count());
    if width == 0 {
        return Err(AssetError::Empty(path.to_path_buf()));
    }

    let mut mask = CollisionMask::new(width as u32, rows.len() as u32);
    for (y, row) in rows.iter().enumerate() {
        let found = row.chars().count();
        if found != width {
            return Err(AssetError::Ragged {
                path: path.to_path_buf(),
                line: y + 1,
                expected: width,
                found,
            });
        }
        for (x, ch) in row.chars().enumerate() {
            let opaque = match ch {
                '#' => true,
                '.' | ' ' => false,
                _ => {
                    return Err(AssetError::InvalidChar {
                        path: path.to_path_buf(),
                        line: y + 1,
                        column: x + 1,
                        ch,
                    });
                }
            };
            mask.set(x as u32, y as u32, opaque);
        }
    }
    Ok(mask)
}

fn read_mask(path: &Path) -> Result<CollisionMask, AssetError> {
    let text = fs::read_to_string(path).map_err(|source| {
        if source.kind() == io::ErrorKind::NotFound {
            AssetError::Missing(path.to_path_buf())
        } else {
            AssetError::Io {
                path: path.to_path_buf(),
                source,
            }
        }
    })?;
    parse_mask(&text, path)
}

fn mirrored(mask: &CollisionMask) -> CollisionMask {
    let w = mask.width();
    CollisionMask::from_fn(w, mask.height(), |x, y| {
        mask.get((w - 1 - x) as i32, y as i32)
    })
}

// === Built-in shapes ===

/// Round body with a beak; the transparent margin is what makes pixel
/// collisions more forgiving than boxes
fn avatar_shape(width: u32, height: u32) -> CollisionMask {
    let (w, h) = (width as f32, height as f32);
    let (cx, cy) = (0.42 * w, 0.5 * h);
    let (rx, ry) = (0.38 * w, 0.4 * h);
    CollisionMask::from_fn(width, height, |x, y| {
        let (px, py) = (x as f32 + 0.5, y as f32 + 0.5);
        let dx = (px - cx) / rx;
        let dy = (py - cy) / ry;
        let body = dx * dx + dy * dy <= 1.0;
        let beak = px >= 0.76 * w && px < 0.96 * w && py >= 0.46 * h && py < 0.6 * h;
        body || beak
    })
}

/// Bottom barrier: a full-width cap over a narrower shaft
fn pipe_shape(width: u32, height: u32) -> CollisionMask {
    let cap = (height / 16).max(1);
    let inset = width / 12;
    CollisionMask::from_fn(width, height, |x, y| {
        y < cap || (x >= inset && x < width - inset)
    })
}

fn button_shape(width: u32, height: u32) -> CollisionMask {
    let r = (height as f32 * 0.25).max(1.0);
    let (w, h) = (width as f32, height as f32);
    CollisionMask::from_fn(width, height, |x, y| {
        let (px, py) = (x as f32 + 0.5, y as f32 + 0.5);
        let qx = (px - r).min(0.0).abs().max((px - (w - r)).max(0.0));
        let qy = (py - r).min(0.0).abs().max((py - (h - r)).max(0.0));
        qx * qx + qy * qy <= r * r
    })
}

/// Right-pointing triangle
fn arrow_shape(size: u32) -> CollisionMask {
    let s = size as f32;
    CollisionMask::from_fn(size, size, |x, y| {
        let (px, py) = (x as f32 + 0.5, y as f32 + 0.5);
        px >= 0.2 * s && (py - 0.5 * s).abs() <= (0.8 * s - px) * 0.5
    })
}

/// Rolling hills along the bottom. The period divides the width so the
/// tile wraps without a seam.
fn background_shape(width: u32, height: u32) -> CollisionMask {
    let (w, h) = (width as f32, height as f32);
    CollisionMask::from_fn(width, height, |x, y| {
        let phase = x as f32 / w * TAU * 3.0;
        let hill = h * (0.14 + 0.05 * phase.sin());
        y as f32 >= h - hill
    })
}

/// All sprite masks at their display size
#[derive(Debug, Clone)]
pub struct SpriteSheet {
    background: CollisionMask,
    avatar: CollisionMask,
    emblem: CollisionMask,
    pipe_top: CollisionMask,
    pipe_bottom: CollisionMask,
    button: CollisionMask,
    arrow_next: CollisionMask,
    arrow_prev: CollisionMask,
}

impl SpriteSheet {
    /// Procedural sprites sized from `tuning`
    pub fn builtin(tuning: &Tuning) -> Self {
        let arrow = arrow_shape(ARROW_SIZE);
        Self::assemble(
            tuning,
            avatar_shape(tuning.avatar_width, tuning.avatar_height),
            pipe_shape(tuning.pipe_width, tuning.pipe_height),
            button_shape(BUTTON_WIDTH, BUTTON_HEIGHT),
            arrow,
        )
    }

    /// Load masks from `dir`, resampled to the sizes in `tuning`
    pub fn load(dir: &Path, tuning: &Tuning) -> Result<Self, AssetError> {
        let avatar = read_mask(&dir.join("avatar.txt"))?
            .scaled(tuning.avatar_width, tuning.avatar_height);
        let pipe =
            read_mask(&dir.join("pipe.txt"))?.scaled(tuning.pipe_width, tuning.pipe_height);
        let button = Self::optional(&dir.join("button.txt"))?
            .map(|m| m.scaled(BUTTON_WIDTH, BUTTON_HEIGHT))
            .unwrap_or_else(|| button_shape(BUTTON_WIDTH, BUTTON_HEIGHT));
        let arrow = Self::optional(&dir.join("arrow.txt"))?
            .map(|m| m.scaled(ARROW_SIZE, ARROW_SIZE))
            .unwrap_or_else(|| arrow_shape(ARROW_SIZE));

        log::info!("Loaded sprites from {}", dir.display());
        Ok(Self::assemble(tuning, avatar, pipe, button, arrow))
    }

    /// Built-in sprites unless an asset directory is configured
    pub fn from_dir(dir: Option<&Path>, tuning: &Tuning) -> Result<Self, AssetError> {
        match dir {
            Some(dir) => Self::load(dir, tuning),
            None => {
                log::info!("Using built-in sprites");
                Ok(Self::builtin(tuning))
            }
        }
    }

    fn optional(path: &Path) -> Result<Option<CollisionMask>, AssetError> {
        match read_mask(path) {
            Ok(mask) => Ok(Some(mask)),
            Err(AssetError::Missing(_)) => Ok(None),
            Err(e) => Err(e),
        }
    }

    fn assemble(
        tuning: &Tuning,
        avatar: CollisionMask,
        pipe: CollisionMask,
        button: CollisionMask,
        arrow: CollisionMask,
    ) -> Self {
        let bg_width = tuning.screen_width.max(1.0) as u32 + BACKGROUND_OVERSCAN;
        let bg_height = tuning.screen_height.max(1.0) as u32;
        Self {
            background: background_shape(bg_width, bg_height),
            emblem: avatar.scaled(EMBLEM_WIDTH, EMBLEM_HEIGHT),
            avatar,
            pipe_top: pipe.flipped_vertical(),
            pipe_bottom: pipe,
            button,
            arrow_prev: mirrored(&arrow),
            arrow_next: arrow,
        }
    }

    pub fn get(&self, sprite: SpriteId) -> &CollisionMask {
        match sprite {
            SpriteId::Background => &self.background,
            SpriteId::Avatar => &self.avatar,
            SpriteId::Emblem => &self.emblem,
            SpriteId::PipeTop => &self.pipe_top,
            SpriteId::PipeBottom => &self.pipe_bottom,
            SpriteId::Button => &self.button,
            SpriteId::ArrowNext => &self.arrow_next,
            SpriteId::ArrowPrev => &self.arrow_prev,
        }
    }

    /// Collision detector over the avatar and barrier silhouettes
    pub fn detector(&self, strategy: CollisionStrategy) -> CollisionDetector {
        CollisionDetector::new(strategy, self.avatar.clone(), self.pipe_bottom.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scratch(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!(
            "flappy-gates-assets-{}-{}",
            std::process::id(),
            name
        ));
        let _ = fs::remove_dir_all(&dir);
        fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[test]
    fn test_parse_mask() {
        let mask = parse_mask(".#.\n###\n\n", Path::new("t")).unwrap();
        assert_eq!((mask.width(), mask.height()), (3, 2));
        assert!(!mask.get(0, 0));
        assert!(mask.get(1, 0));
        assert_eq!(mask.count(), 4);
    }

    #[test]
    fn test_parse_mask_errors() {
        let p = Path::new("t");
        assert!(matches!(parse_mask("\n\n", p), Err(AssetError::Empty(_))));
        assert!(matches!(
            parse_mask("##\n#\n", p),
            Err(AssetError::Ragged {
                line: 2,
                expected: 2,
                found: 1,
                ..
            })
        ));
        assert!(matches!(
            parse_mask("#x\n", p),
            Err(AssetError::InvalidChar {
                line: 1,
                column: 2,
                ch: 'x',
                ..
            })
        ));
    }

    #[test]
    fn test_builtin_sizes() {
        let tuning = Tuning::default();
        let sheet = SpriteSheet::builtin(&tuning);
        assert_eq!(sheet.get(SpriteId::Avatar).width(), 160);
        assert_eq!(sheet.get(SpriteId::Avatar).height(), 120);
        assert_eq!(sheet.get(SpriteId::PipeBottom).height(), 800);
        assert_eq!(sheet.get(SpriteId::Background).width(), 1450);
        assert_eq!(sheet.get(SpriteId::Emblem).width(), EMBLEM_WIDTH);
    }

    #[test]
    fn test_builtin_avatar_has_transparent_corners() {
        let sheet = SpriteSheet::builtin(&Tuning::default());
        let avatar = sheet.get(SpriteId::Avatar);
        assert!(!avatar.get(0, 0));
        assert!(!avatar.get(159, 119));
        assert!(avatar.get(67, 60));
    }

    #[test]
    fn test_barriers_are_mirror_images() {
        let sheet = SpriteSheet::builtin(&Tuning::default());
        let top = sheet.get(SpriteId::PipeTop);
        let bottom = sheet.get(SpriteId::PipeBottom);
        // Cap faces the gap on both barriers
        assert!(bottom.get(0, 0));
        assert!(top.get(0, 799));
        assert!(!top.get(0, 0));
        assert_eq!(top.count(), bottom.count());
    }

    #[test]
    fn test_arrows_are_mirrored() {
        let sheet = SpriteSheet::builtin(&Tuning::default());
        let next = sheet.get(SpriteId::ArrowNext);
        let prev = sheet.get(SpriteId::ArrowPrev);
        assert!(next.get(40, 75));
        assert!(!next.get(130, 20));
        assert_eq!(next.get(40, 75), prev.get(109, 75));
    }

    #[test]
    fn test_load_requires_collision_sprites() {
        let dir = scratch("missing");
        let err = SpriteSheet::load(&dir, &Tuning::default()).unwrap_err();
        assert!(matches!(err, AssetError::Missing(p) if p.ends_with("avatar.txt")));
        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn test_load_scales_to_tuning() {
        let dir = scratch("load");
        fs::write(dir.join("avatar.txt"), ".##.\n####\n.##.\n").unwrap();
        fs::write(dir.join("pipe.txt"), "##\n##\n").unwrap();
        let tuning = Tuning::default();
        let sheet = SpriteSheet::load(&dir, &tuning).unwrap();
        let _ = fs::remove_dir_all(&dir);

        let avatar = sheet.get(SpriteId::Avatar);
        assert_eq!((avatar.width(), avatar.height()), (160, 120));
        assert!(!avatar.get(0, 0));
        assert!(avatar.get(0, 60));
        assert_eq!(sheet.get(SpriteId::PipeBottom).count(), 150 * 800);
        // Menu sprites fall back to the built-in shapes
        assert_eq!(sheet.get(SpriteId::Button).width(), BUTTON_WIDTH);
    }

    #[test]
    fn test_detector_uses_sheet_strategy() {
        let sheet = SpriteSheet::builtin(&Tuning::default());
        let detector = sheet.detector(CollisionStrategy::BoundingBox);
        assert_eq!(detector.strategy(), CollisionStrategy::BoundingBox);
        assert_eq!(detector.avatar_mask().width(), 160);
    }
}
