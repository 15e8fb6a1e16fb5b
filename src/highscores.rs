//! Score history for the stats and game-over screens
//!
//! A snapshot of the persisted score log (oldest first) with the ranked
//! views the stats screen pages through.

/// Completed runs in the order they finished
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScoreHistory {
    entries: Vec<u32>,
}

impl ScoreHistory {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Build from a score log read oldest-first
    pub fn from_log(entries: Vec<u32>) -> Self {
        Self { entries }
    }

    /// Append a finished run
    pub fn record(&mut self, score: u32) {
        self.entries.push(score);
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Raw entries, oldest first
    pub fn entries(&self) -> &[u32] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Scores sorted highest first (numeric order)
    pub fn ranked(&self) -> Vec<u32> {
        let mut ranked = self.entries.clone();
        ranked.sort_unstable_by(|a, b| b.cmp(a));
        ranked
    }

    /// Get the top score (if any)
    pub fn best(&self) -> Option<u32> {
        self.entries.iter().copied().max()
    }

    /// Score shown on a stats page (0-based page, ranked order)
    pub fn page(&self, page: usize) -> Option<u32> {
        self.ranked().get(page).copied()
    }

    /// Whether the most recent run beat every earlier one
    pub fn latest_is_best(&self) -> bool {
        match self.entries.split_last() {
            Some((&last, earlier)) => last > 0 && earlier.iter().all(|&s| last > s),
            None => false,
        }
    }
}
