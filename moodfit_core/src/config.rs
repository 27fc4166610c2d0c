//! Configuration file support for MoodFit.
//!
//! Configuration is loaded from `$XDG_CONFIG_HOME/moodfit/config.toml`.

use crate::{Difficulty, Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Application configuration
#[derive(Clone, Debug, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub data: DataConfig,

    #[serde(default)]
    pub workout: WorkoutConfig,

    #[serde(default)]
    pub user: UserConfig,
}

/// Data storage configuration
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct DataConfig {
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
        }
    }
}

/// Workout pacing configuration
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct WorkoutConfig {
    #[serde(default)]
    pub preferred_difficulty: Difficulty,

    /// How often the CLI polls the timer
    #[serde(default = "default_tick_interval_ms")]
    pub tick_interval_ms: u64,

    /// Timer seconds per exercise minute; lower it for quick runs
    #[serde(default = "default_seconds_per_minute")]
    pub seconds_per_minute: u32,
}

impl Default for WorkoutConfig {
    fn default() -> Self {
        Self {
            preferred_difficulty: Difficulty::default(),
            tick_interval_ms: default_tick_interval_ms(),
            seconds_per_minute: default_seconds_per_minute(),
        }
    }
}

/// User profile defaults
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct UserConfig {
    #[serde(default = "default_user_name")]
    pub name: String,
}

impl Default for UserConfig {
    fn default() -> Self {
        Self {
            name: default_user_name(),
        }
    }
}

fn home_fallback(sub: &str) -> PathBuf {
    std::env::var_os("HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("."))
        .join(sub)
}

fn default_data_dir() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| home_fallback(".local/share"))
        .join("moodfit")
}

fn default_tick_interval_ms() -> u64 {
    100
}

fn default_seconds_per_minute() -> u32 {
    60
}

fn default_user_name() -> String {
    "Athlete".into()
}

impl Config {
    /// Load configuration from the standard config path
    pub fn load() -> Result<Self> {
        let config_path = Self::default_config_path();
        if config_path.exists() {
            Self::load_from(&config_path)
        } else {
            tracing::info!("No config file found at {:?}, using defaults", config_path);
            Ok(Self::default())
        }
    }

    /// Load configuration from a specific path
    pub fn load_from(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&contents)?;
        config.validate()?;
        tracing::info!("Loaded config from {:?}", path);
        Ok(config)
    }

    pub fn default_config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| home_fallback(".config"))
            .join("moodfit")
            .join("config.toml")
    }

    pub fn validate(&self) -> Result<()> {
        if self.workout.tick_interval_ms == 0 {
            return Err(Error::Config("tick_interval_ms must be positive".into()));
        }
        if self.workout.seconds_per_minute == 0 {
            return Err(Error::Config("seconds_per_minute must be positive".into()));
        }
        Ok(())
    }

    /// Save the current configuration to a specific path
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let contents = toml::to_string_pretty(self)
            .map_err(|e| Error::Config(format!("Failed to serialize config: {}", e)))?;
        std::fs::write(path, contents)?;
        tracing::info!("Saved config to {:?}", path);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.workout.preferred_difficulty, Difficulty::Beginner);
        assert_eq!(config.workout.tick_interval_ms, 100);
        assert_eq!(config.workout.seconds_per_minute, 60);
        assert!(config.data.data_dir.ends_with("moodfit"));
    }

    #[test]
    fn test_partial_config() {
        let toml_str = r#"
[workout]
preferred_difficulty = "advanced"
"#;
        let config: Config = toml::from_str(toml_str).unwrap();
        assert_eq!(config.workout.preferred_difficulty, Difficulty::Advanced);
        assert_eq!(config.workout.tick_interval_ms, 100); // default
        assert_eq!(config.user.name, "Athlete");
    }

    #[test]
    fn test_save_and_load() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("nested").join("config.toml");

        let mut config = Config::default();
        config.user.name = "Robin".into();
        config.workout.seconds_per_minute = 1;
        config.save_to(&path).unwrap();

        let loaded = Config::load_from(&path).unwrap();
        assert_eq!(loaded.user.name, "Robin");
        assert_eq!(loaded.workout.seconds_per_minute, 1);
    }

    #[test]
    fn test_zero_tick_interval_rejected() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("config.toml");
        std::fs::write(&path, "[workout]\ntick_interval_ms = 0\n").unwrap();

        assert!(matches!(Config::load_from(&path), Err(Error::Config(_))));
    }
}
