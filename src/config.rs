use crate::game::{Density, GameMode, GridSize, Speed};
use crate::highscores::{HighScoreFile, MemoryStore, ScoreStore};
use crate::settings::Settings;
use crate::theme::Theme;
use log::LevelFilter;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Program configuration read from a configuration file
#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq)]
#[serde(default, rename_all = "kebab-case")]
pub(crate) struct Config {
    /// Starting values for the gameplay settings
    pub(crate) game: GameConfig,

    /// Starting values for the interface toggles
    pub(crate) interface: InterfaceConfig,

    /// Settings about data files
    pub(crate) files: FileConfig,
}

impl Config {
    /// Return the default configuration file path
    pub(crate) fn default_path() -> Result<PathBuf, ConfigError> {
        dirs::config_local_dir()
            .map(|p| p.join("snakex").join("config.toml"))
            .ok_or(ConfigError::NoPath)
    }

    /// Read configuration from a file on disk.  If the file does not exist and
    /// `allow_missing` is true, a default `Config` value is returned.
    ///
    /// # Errors
    ///
    /// Returns `Err` if the file could not be read or if the file's contents
    /// could not be deserialized.
    pub(crate) fn load(path: &Path, allow_missing: bool) -> Result<Config, ConfigError> {
        let content = match fs_err::read_to_string(path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound && allow_missing => {
                return Ok(Config::default())
            }
            Err(e) => return Err(ConfigError::Read(e)),
        };
        toml::from_str(&content).map_err(Into::into)
    }

    /// The settings a session starts out with
    pub(crate) fn settings(&self) -> Settings {
        Settings {
            grid_size: self.game.grid_size,
            speed: self.game.speed,
            obstacle_density: self.game.obstacle_density,
            mode: self.game.mode,
            sound: self.interface.sound,
            haptic: self.interface.haptic,
            show_grid: self.interface.show_grid,
            theme: self.interface.theme,
        }
    }

    /// Return the store in which best scores should be kept: the file given
    /// in the configuration or, if that is not set, the default high scores
    /// file.  If saving is disabled or no path can be determined, scores are
    /// only kept in memory for the session.
    pub(crate) fn score_store(&self) -> Box<dyn ScoreStore> {
        if !self.files.save_high_scores {
            log::info!("High score saving disabled; keeping scores in memory");
            return Box::new(MemoryStore::default());
        }
        let file = match self.files.high_scores_file.clone() {
            Some(path) => HighScoreFile::new(path),
            None => match HighScoreFile::default_path() {
                Some(path) => HighScoreFile::new(path),
                None => {
                    log::warn!(
                        "Could not determine local data directory; high scores will not be saved"
                    );
                    return Box::new(MemoryStore::default());
                }
            },
        };
        log::info!("Using high scores file at {}", file.path().display());
        Box::new(file)
    }

    /// Return the path to write the log to, if one can be determined
    pub(crate) fn log_file(&self) -> Option<PathBuf> {
        self.files.log_file.clone().or_else(|| {
            dirs::data_local_dir().map(|p| p.join("snakex").join("snakex.log"))
        })
    }
}

#[derive(Clone, Copy, Debug, Default, Deserialize, Eq, PartialEq)]
#[serde(default, rename_all = "kebab-case")]
pub(crate) struct GameConfig {
    pub(crate) grid_size: GridSize,
    pub(crate) speed: Speed,
    pub(crate) mode: GameMode,
    pub(crate) obstacle_density: Density,
}

#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq)]
#[serde(default, rename_all = "kebab-case")]
pub(crate) struct InterfaceConfig {
    /// Whether to ring the terminal bell on game events
    pub(crate) sound: bool,

    /// Whether to flash the board border on game events
    pub(crate) haptic: bool,

    /// Whether to draw faint grid lines on the board
    pub(crate) show_grid: bool,

    /// Colour scheme to start with
    pub(crate) theme: Theme,
}

impl Default for InterfaceConfig {
    fn default() -> InterfaceConfig {
        InterfaceConfig {
            sound: true,
            haptic: true,
            show_grid: true,
            theme: Theme::default(),
        }
    }
}

#[derive(Clone, Debug, Deserialize, Eq, PartialEq)]
#[serde(default, rename_all = "kebab-case")]
pub(crate) struct FileConfig {
    /// Path at which best scores should be stored
    pub(crate) high_scores_file: Option<PathBuf>,

    /// Whether to load & save best scores in a file
    pub(crate) save_high_scores: bool,

    /// Path at which to write the log
    pub(crate) log_file: Option<PathBuf>,

    /// Minimum severity of log messages to write
    pub(crate) log_level: LogLevel,
}

impl Default for FileConfig {
    fn default() -> FileConfig {
        FileConfig {
            high_scores_file: None,
            save_high_scores: true,
            log_file: None,
            log_level: LogLevel::default(),
        }
    }
}

/// A [`LevelFilter`] that can be read from a string like `"debug"`
#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq)]
#[serde(try_from = "String")]
pub(crate) struct LogLevel(pub(crate) LevelFilter);

impl Default for LogLevel {
    fn default() -> LogLevel {
        LogLevel(LevelFilter::Info)
    }
}

impl TryFrom<String> for LogLevel {
    type Error = log::ParseLevelError;

    fn try_from(s: String) -> Result<LogLevel, log::ParseLevelError> {
        s.parse::<LevelFilter>().map(LogLevel)
    }
}

#[derive(Debug, Error)]
pub(crate) enum ConfigError {
    #[error("failed to determine path to local configuration directory")]
    NoPath,
    #[error("failed to read configuration file")]
    Read(#[from] std::io::Error),
    #[error("failed to parse configuration file")]
    Parse(#[from] toml::de::Error),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::highscores::BestKey;
    use pretty_assertions::assert_eq;
    use rstest::rstest;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn parse(src: &str) -> Result<Config, toml::de::Error> {
        toml::from_str(src)
    }

    #[test]
    fn empty_config() {
        let cfg = parse("").unwrap();
        assert_eq!(cfg, Config::default());
        assert_eq!(cfg.settings(), Settings::default());
        assert_eq!(cfg.files.log_level, LogLevel(LevelFilter::Info));
        assert!(cfg.files.save_high_scores);
    }

    #[test]
    fn full_config() {
        let cfg = parse(concat!(
            "[game]\n",
            "grid-size = 30\n",
            "speed = 15\n",
            "mode = \"wrap\"\n",
            "obstacle-density = 20\n",
            "\n",
            "[interface]\n",
            "sound = false\n",
            "show-grid = false\n",
            "theme = \"contrast\"\n",
            "\n",
            "[files]\n",
            "high-scores-file = \"/tmp/scores.json\"\n",
            "save-high-scores = false\n",
            "log-file = \"/tmp/snakex.log\"\n",
            "log-level = \"debug\"\n",
        ))
        .unwrap();
        let settings = cfg.settings();
        assert_eq!(settings.grid_size, GridSize::new(30).unwrap());
        assert_eq!(settings.speed, Speed::new(15).unwrap());
        assert_eq!(settings.mode, GameMode::Wrap);
        assert_eq!(settings.obstacle_density, Density::new(20).unwrap());
        assert!(!settings.sound);
        assert!(settings.haptic);
        assert!(!settings.show_grid);
        assert_eq!(settings.theme, Theme::Contrast);
        assert_eq!(
            cfg.files.high_scores_file,
            Some(PathBuf::from("/tmp/scores.json"))
        );
        assert!(!cfg.files.save_high_scores);
        assert_eq!(cfg.log_file(), Some(PathBuf::from("/tmp/snakex.log")));
        assert_eq!(cfg.files.log_level, LogLevel(LevelFilter::Debug));
    }

    #[rstest]
    #[case("[game]\ngrid-size = 9\n")]
    #[case("[game]\ngrid-size = 41\n")]
    #[case("[game]\nspeed = 26\n")]
    #[case("[game]\nmode = \"spiral\"\n")]
    #[case("[game]\nobstacle-density = 101\n")]
    #[case("[interface]\ntheme = \"plaid\"\n")]
    #[case("[files]\nlog-level = \"loud\"\n")]
    fn invalid_config(#[case] src: &str) {
        assert!(parse(src).is_err());
    }

    #[test]
    fn load_missing() {
        let tmpdir = tempfile::tempdir().unwrap();
        let path = tmpdir.path().join("config.toml");
        assert_eq!(Config::load(&path, true).unwrap(), Config::default());
        assert!(matches!(
            Config::load(&path, false),
            Err(ConfigError::Read(_))
        ));
    }

    #[test]
    fn load_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "[game]\nmode = \"obstacles\"").unwrap();
        file.flush().unwrap();
        let cfg = Config::load(file.path(), false).unwrap();
        assert_eq!(cfg.game.mode, GameMode::Obstacles);
    }

    #[test]
    fn load_bad_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "[game\nmode = 3").unwrap();
        file.flush().unwrap();
        assert!(matches!(
            Config::load(file.path(), false),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn score_store_in_memory_when_disabled() {
        let tmpdir = tempfile::tempdir().unwrap();
        let path = tmpdir.path().join("scores.json");
        let cfg = Config {
            files: FileConfig {
                high_scores_file: Some(path.clone()),
                save_high_scores: false,
                ..FileConfig::default()
            },
            ..Config::default()
        };
        let mut store = cfg.score_store();
        let key = BestKey {
            mode: GameMode::Classic,
            grid_size: GridSize::default(),
        };
        store.save(key, 12).unwrap();
        assert_eq!(store.load(key).unwrap(), 12);
        assert!(!path.exists());
    }

    #[test]
    fn score_store_uses_configured_file() {
        let tmpdir = tempfile::tempdir().unwrap();
        let path = tmpdir.path().join("scores.json");
        let cfg = Config {
            files: FileConfig {
                high_scores_file: Some(path.clone()),
                ..FileConfig::default()
            },
            ..Config::default()
        };
        let mut store = cfg.score_store();
        let key = BestKey {
            mode: GameMode::Wrap,
            grid_size: GridSize::default(),
        };
        store.save(key, 7).unwrap();
        assert!(path.exists());
    }
}
