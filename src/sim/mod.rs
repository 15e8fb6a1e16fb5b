//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only (constants are per tick)
//! - Seeded RNG only
//! - Stable iteration order (obstacles in spawn order)
//! - No rendering, audio or storage access

pub mod body;
pub mod collision;
pub mod obstacle;
pub mod state;
pub mod tick;

pub use body::{BodyStatus, Boundary, PhysicsBody};
pub use collision::{CollisionDetector, CollisionMask, PixelRect};
pub use obstacle::{Obstacle, ObstacleField};
pub use state::{CrashCause, GameEvent, GameState, Scene};
pub use tick::{TickInput, tick};
