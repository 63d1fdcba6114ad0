use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum HighScoreError {
    #[error("error loading high score from {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("error saving high score to {}: {source}", .path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Best completion time in seconds. `None` is the unset sentinel and loses
/// every comparison.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct HighScore(Option<u32>);

impl HighScore {
    pub const UNSET: HighScore = HighScore(None);

    pub fn new(seconds: u32) -> Self {
        HighScore(Some(seconds))
    }

    pub fn seconds(self) -> Option<u32> {
        self.0
    }

    pub fn is_beaten_by(self, elapsed: u32) -> bool {
        match self.0 {
            Some(best) => elapsed < best,
            None => true,
        }
    }

    pub fn record(&mut self, elapsed: u32) -> bool {
        if !self.is_beaten_by(elapsed) {
            return false;
        }
        self.0 = Some(elapsed);
        true
    }
}

pub fn parse_high_score(raw: &str) -> HighScore {
    raw.split_whitespace()
        .next()
        .and_then(|token| token.parse::<u32>().ok())
        .map(HighScore::new)
        .unwrap_or(HighScore::UNSET)
}

pub fn load(path: &Path) -> Result<HighScore, HighScoreError> {
    match fs::read_to_string(path) {
        Ok(raw) => Ok(parse_high_score(&raw)),
        Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(HighScore::UNSET),
        Err(source) => Err(HighScoreError::Read {
            path: path.to_path_buf(),
            source,
        }),
    }
}

pub fn load_or_unset(path: &Path) -> HighScore {
    match load(path) {
        Ok(score) => {
            tracing::info!(best = ?score.seconds(), path = %path.display(), "high score loaded");
            score
        }
        Err(err) => {
            tracing::warn!(%err, "starting without a high score");
            HighScore::UNSET
        }
    }
}

pub fn save(path: &Path, seconds: u32) -> Result<(), HighScoreError> {
    let write_err = |source: io::Error| HighScoreError::Write {
        path: path.to_path_buf(),
        source,
    };
    if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(write_err)?;
    }
    let tmp_path = path.with_extension("tmp");
    fs::write(&tmp_path, format!("{}\n", seconds)).map_err(write_err)?;
    fs::rename(&tmp_path, path).map_err(|source| {
        let _ = fs::remove_file(&tmp_path);
        write_err(source)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use temp_dir::TempDir;

    #[test]
    fn missing_or_empty_file_is_unset() {
        let dir = TempDir::new().unwrap();
        let path = dir.child("highscore.txt");
        assert_eq!(load(&path).unwrap(), HighScore::UNSET);

        fs::write(&path, "").unwrap();
        assert_eq!(load(&path).unwrap(), HighScore::UNSET);

        fs::write(&path, "not a number\n").unwrap();
        assert_eq!(load(&path).unwrap(), HighScore::UNSET);
    }

    #[test]
    fn reads_integer_with_trailing_newline() {
        let dir = TempDir::new().unwrap();
        let path = dir.child("highscore.txt");
        fs::write(&path, "45\n").unwrap();
        assert_eq!(load(&path).unwrap(), HighScore::new(45));
    }

    #[test]
    fn save_overwrites_previous_value() {
        let dir = TempDir::new().unwrap();
        let path = dir.child("nested").join("highscore.txt");
        save(&path, 45).unwrap();
        save(&path, 30).unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "30\n");
        assert!(!path.with_extension("tmp").exists());
    }

    #[test]
    fn unreadable_file_leaves_score_unset() {
        let dir = TempDir::new().unwrap();
        let path = dir.child("highscore.txt");
        fs::create_dir(&path).unwrap();

        assert!(matches!(load(&path), Err(HighScoreError::Read { .. })));
        assert_eq!(load_or_unset(&path), HighScore::UNSET);
    }

    #[test]
    fn failed_save_removes_temporary_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.child("highscore.txt");
        fs::create_dir(&path).unwrap();
        fs::write(path.join("occupied"), "x").unwrap();

        assert!(matches!(save(&path, 30), Err(HighScoreError::Write { .. })));
        assert!(!path.with_extension("tmp").exists());
        assert!(path.is_dir());
    }

    #[test]
    fn unset_is_beaten_by_any_time() {
        let mut best = HighScore::UNSET;
        assert!(best.record(u32::MAX));
        assert_eq!(best.seconds(), Some(u32::MAX));
    }

    #[test]
    fn record_only_accepts_strictly_faster_times() {
        let mut best = HighScore::new(30);
        assert!(!best.record(30));
        assert!(!best.record(31));
        assert!(best.record(29));
        assert_eq!(best, HighScore::new(29));
    }

    #[test]
    fn high_score_never_increases() {
        let mut best = HighScore::UNSET;
        let mut previous: Option<u32> = None;
        for elapsed in [50, 70, 40, 40, 90, 12, 13, 200] {
            best.record(elapsed);
            let current = best.seconds();
            if let (Some(before), Some(after)) = (previous, current) {
                assert!(after <= before);
            }
            previous = current;
        }
        assert_eq!(best.seconds(), Some(12));
    }
}
