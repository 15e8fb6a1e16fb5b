//! File-backed score log

use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use super::PersistenceError;
use crate::platform::ScoreStore;

/// Parse a score log. Blank lines are skipped; any other unparsable line
/// makes the whole log unusable and yields `None`.
pub fn parse_log(text: &str) -> Option<Vec<u32>> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(|line| line.parse::<u32>().ok())
        .collect()
}

/// Newline-delimited score log on disk
#[derive(Debug, Clone)]
pub struct FileScoreStore {
    path: PathBuf,
}

impl FileScoreStore {
    /// Default log location (working directory)
    pub const DEFAULT_PATH: &'static str = "scores.txt";

    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn try_append(&self, score: u32) -> io::Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        // A hand-edited log may be missing its final newline
        let needs_newline = match fs::read(&self.path) {
            Ok(bytes) => bytes.last().is_some_and(|&b| b != b'\n'),
            Err(e) if e.kind() == io::ErrorKind::NotFound => false,
            Err(e) => return Err(e),
        };

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        if needs_newline {
            writeln!(file)?;
        }
        writeln!(file, "{}", score)?;
        file.flush()
    }
}

impl Default for FileScoreStore {
    fn default() -> Self {
        Self::new(Self::DEFAULT_PATH)
    }
}

impl ScoreStore for FileScoreStore {
    fn append(&mut self, score: u32) -> Result<(), PersistenceError> {
        self.try_append(score)
            .map_err(|source| PersistenceError::Append {
                path: self.path.clone(),
                source,
            })?;
        log::info!("Recorded score {} to {}", score, self.path.display());
        Ok(())
    }

    fn read_all(&self) -> Vec<u32> {
        let text = match fs::read_to_string(&self.path) {
            Ok(text) => text,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                log::debug!("No score log at {}, starting fresh", self.path.display());
                return Vec::new();
            }
            Err(e) => {
                log::warn!("Unreadable score log {}: {}", self.path.display(), e);
                return Vec::new();
            }
        };

        match parse_log(&text) {
            Some(scores) => {
                log::debug!("Loaded {} scores", scores.len());
                scores
            }
            None => {
                log::warn!(
                    "Corrupt score log {}, treating as empty",
                    self.path.display()
                );
                Vec::new()
            }
        }
    }

    fn clear(&mut self) -> Result<(), PersistenceError> {
        fs::write(&self.path, "").map_err(|source| PersistenceError::Clear {
            path: self.path.clone(),
            source,
        })?;
        log::info!("Score log cleared");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Unique scratch path per test, removed on drop
    struct Scratch(PathBuf);

    impl Scratch {
        fn new(name: &str) -> Self {
            let dir = std::env::temp_dir().join(format!(
                "flappy-gates-test-{}-{}",
                std::process::id(),
                name
            ));
            let _ = fs::remove_dir_all(&dir);
            Self(dir)
        }

        fn file(&self) -> PathBuf {
            self.0.join("scores.txt")
        }
    }

    impl Drop for Scratch {
        fn drop(&mut self) {
            let _ = fs::remove_dir_all(&self.0);
        }
    }

    #[test]
    fn test_parse_log() {
        assert_eq!(parse_log("3\n10\n\n0\n"), Some(vec![3, 10, 0]));
        assert_eq!(parse_log(""), Some(vec![]));
        assert_eq!(parse_log(" 7 \r\n"), Some(vec![7]));
        assert_eq!(parse_log("3\nabc\n"), None);
        assert_eq!(parse_log("-1\n"), None);
    }

    #[test]
    fn test_missing_log_reads_empty() {
        let scratch = Scratch::new("missing");
        let store = FileScoreStore::new(scratch.file());
        assert!(store.read_all().is_empty());
    }

    #[test]
    fn test_append_then_read() {
        let scratch = Scratch::new("append");
        let mut store = FileScoreStore::new(scratch.file());
        store.append(4).unwrap();
        store.append(0).unwrap();
        store.append(12).unwrap();
        assert_eq!(store.read_all(), vec![4, 0, 12]);
        assert_eq!(fs::read_to_string(scratch.file()).unwrap(), "4\n0\n12\n");
    }

    #[test]
    fn test_append_repairs_missing_newline() {
        let scratch = Scratch::new("newline");
        fs::create_dir_all(&scratch.0).unwrap();
        fs::write(scratch.file(), "5").unwrap();
        let mut store = FileScoreStore::new(scratch.file());
        store.append(6).unwrap();
        assert_eq!(store.read_all(), vec![5, 6]);
    }

    #[test]
    fn test_corrupt_log_reads_empty() {
        let scratch = Scratch::new("corrupt");
        fs::create_dir_all(&scratch.0).unwrap();
        fs::write(scratch.file(), "1\n{not a score}\n").unwrap();
        let store = FileScoreStore::new(scratch.file());
        assert!(store.read_all().is_empty());
    }

    #[test]
    fn test_clear() {
        let scratch = Scratch::new("clear");
        let mut store = FileScoreStore::new(scratch.file());
        store.append(9).unwrap();
        store.clear().unwrap();
        assert!(store.read_all().is_empty());
    }

    #[test]
    fn test_append_failure_is_an_error() {
        let scratch = Scratch::new("fail");
        fs::create_dir_all(&scratch.0).unwrap();
        // The log path is a directory, so it cannot be opened for append
        let path = scratch.0.join("as_dir");
        fs::create_dir_all(&path).unwrap();
        let mut store = FileScoreStore::new(&path);
        assert!(matches!(
            store.append(1),
            Err(PersistenceError::Append { .. })
        ));
    }
}
