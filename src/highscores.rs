use crate::game::{GameMode, GridSize};
use serde::{de::Deserializer, ser::Serializer, Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Best scores are tracked separately for each mode & board size
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub(crate) struct BestKey {
    pub(crate) mode: GameMode,
    pub(crate) grid_size: GridSize,
}

impl fmt::Display for BestKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "snakex::best::{}::g{}",
            self.mode.as_str(),
            self.grid_size.get()
        )
    }
}

/// Somewhere to keep best scores between runs
pub(crate) trait ScoreStore: fmt::Debug {
    /// Return the best score recorded for `key`, or 0 if there is none
    fn load(&self, key: BestKey) -> Result<u32, LoadError>;

    fn save(&mut self, key: BestKey, score: u32) -> Result<(), SaveError>;

    /// Forget every recorded score
    fn clear_all(&mut self) -> Result<(), SaveError>;
}

#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub(crate) struct HighScores(HashMap<BestKey, u32>);

impl HighScores {
    pub(crate) fn get(&self, key: BestKey) -> Option<u32> {
        self.0.get(&key).copied()
    }

    pub(crate) fn set(&mut self, key: BestKey, score: u32) {
        self.0.insert(key, score);
    }

    fn to_json_array(&self) -> Vec<HighScoreEntry> {
        let mut entries = self
            .0
            .iter()
            .map(|(&key, &score)| HighScoreEntry {
                mode: key.mode,
                grid_size: key.grid_size,
                score,
            })
            .collect::<Vec<_>>();
        entries.sort_unstable_by_key(|e| (e.mode.as_str(), e.grid_size));
        entries
    }

    fn from_json_array(array: Vec<HighScoreEntry>) -> HighScores {
        HighScores(
            array
                .into_iter()
                .map(|hse| {
                    let key = BestKey {
                        mode: hse.mode,
                        grid_size: hse.grid_size,
                    };
                    (key, hse.score)
                })
                .collect(),
        )
    }
}

impl Serialize for HighScores {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_json_array().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for HighScores {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Vec::<HighScoreEntry>::deserialize(deserializer).map(HighScores::from_json_array)
    }
}

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "kebab-case")]
struct HighScoreEntry {
    mode: GameMode,
    grid_size: GridSize,
    score: u32,
}

/// High scores kept in a JSON file on disk.  The file is re-read on every
/// access, so edits made behind the game's back are picked up at the next
/// reset.
#[derive(Clone, Debug, Eq, PartialEq)]
pub(crate) struct HighScoreFile {
    path: PathBuf,
}

impl HighScoreFile {
    pub(crate) fn new(path: PathBuf) -> HighScoreFile {
        HighScoreFile { path }
    }

    /// Return the default high scores file path, if the local data directory
    /// can be determined
    pub(crate) fn default_path() -> Option<PathBuf> {
        dirs::data_local_dir().map(|p| p.join("snakex").join("highscores.json"))
    }

    pub(crate) fn path(&self) -> &Path {
        &self.path
    }

    fn read(&self) -> Result<HighScores, LoadError> {
        let src = match fs_err::read(&self.path) {
            Ok(src) => src,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(HighScores::default()),
            Err(e) => return Err(LoadError::read(e)),
        };
        serde_json::from_slice(&src).map_err(LoadError::deserialize)
    }

    fn write(&self, scores: &HighScores) -> Result<(), SaveError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs_err::create_dir_all(parent).map_err(SaveError::mkdir)?;
        }
        let mut src = serde_json::to_string(scores).map_err(SaveError::serialize)?;
        src.push('\n');
        fs_err::write(&self.path, &src).map_err(SaveError::write)?;
        Ok(())
    }
}

impl ScoreStore for HighScoreFile {
    fn load(&self, key: BestKey) -> Result<u32, LoadError> {
        Ok(self.read()?.get(key).unwrap_or_default())
    }

    fn save(&mut self, key: BestKey, score: u32) -> Result<(), SaveError> {
        let mut scores = self.read().map_err(SaveError::reload)?;
        scores.set(key, score);
        self.write(&scores)
    }

    fn clear_all(&mut self) -> Result<(), SaveError> {
        self.write(&HighScores::default())
    }
}

/// High scores that last only as long as the process
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub(crate) struct MemoryStore(HighScores);

impl ScoreStore for MemoryStore {
    fn load(&self, key: BestKey) -> Result<u32, LoadError> {
        Ok(self.0.get(key).unwrap_or_default())
    }

    fn save(&mut self, key: BestKey, score: u32) -> Result<(), SaveError> {
        self.0.set(key, score);
        Ok(())
    }

    fn clear_all(&mut self) -> Result<(), SaveError> {
        self.0 = HighScores::default();
        Ok(())
    }
}

#[derive(Debug, Error)]
#[error("Failed to save high scores to disk")]
pub(crate) struct SaveError(#[source] SaveErrorSource);

impl SaveError {
    fn reload(e: LoadError) -> Self {
        SaveError(SaveErrorSource::Reload(e))
    }

    fn mkdir(e: std::io::Error) -> Self {
        SaveError(SaveErrorSource::Mkdir(e))
    }

    fn serialize(e: serde_json::Error) -> Self {
        SaveError(SaveErrorSource::Serialize(e))
    }

    fn write(e: std::io::Error) -> Self {
        SaveError(SaveErrorSource::Write(e))
    }
}

#[derive(Debug, Error)]
enum SaveErrorSource {
    #[error("existing high scores could not be read")]
    Reload(#[source] LoadError),
    #[error("failed to create parent directories")]
    Mkdir(#[source] std::io::Error),
    #[error("failed to serialize high scores")]
    Serialize(#[source] serde_json::Error),
    #[error("failed to write high scores to disk")]
    Write(#[source] std::io::Error),
}

#[derive(Debug, Error)]
#[error("Failed to read high scores from disk")]
pub(crate) struct LoadError(#[source] LoadErrorSource);

impl LoadError {
    fn read(e: std::io::Error) -> Self {
        LoadError(LoadErrorSource::Read(e))
    }

    fn deserialize(e: serde_json::Error) -> Self {
        LoadError(LoadErrorSource::Deserialize(e))
    }
}

#[derive(Debug, Error)]
enum LoadErrorSource {
    #[error("failed to read high scores file")]
    Read(#[source] std::io::Error),
    #[error("failed to deserialize high scores")]
    Deserialize(#[source] serde_json::Error),
}
