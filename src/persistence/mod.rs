//! Score persistence
//!
//! Features:
//! - Flat newline-delimited log, one score per completed run, oldest first
//! - Absent or corrupt logs read as an empty history
//! - Write failures surface as errors for the caller to log; they never end a session

pub mod score_log;

pub use score_log::{FileScoreStore, parse_log};

use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::platform::ScoreStore;

#[derive(Debug, Error)]
pub enum PersistenceError {
    #[error("failed to append to score log {path:?}: {source}")]
    Append {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to clear score log {path:?}: {source}")]
    Clear {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// In-memory score log (tests, and sessions that should not touch disk)
#[derive(Debug, Clone, Default)]
pub struct MemoryScoreStore {
    scores: Vec<u32>,
}

impl MemoryScoreStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_scores(scores: Vec<u32>) -> Self {
        Self { scores }
    }

    pub fn scores(&self) -> &[u32] {
        &self.scores
    }
}

impl ScoreStore for MemoryScoreStore {
    fn append(&mut self, score: u32) -> Result<(), PersistenceError> {
        self.scores.push(score);
        Ok(())
    }

    fn read_all(&self) -> Vec<u32> {
        self.scores.clone()
    }

    fn clear(&mut self) -> Result<(), PersistenceError> {
        self.scores.clear();
        Ok(())
    }
}
