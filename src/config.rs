use crate::common::Action;
use crate::error::AppError;
use crate::input::KeyMap;
use crate::pipeline::MotionTable;
use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const DEFAULT_CONFIG_PATH: &str = "motion-duel.toml";
const ENV_PREFIX: &str = "MOTION_DUEL";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Configuration {
    /// Gesture database to load. Prompted for on stdin when unset.
    pub database_path: Option<PathBuf>,
    /// Recorded sensor session to replay.
    pub replay_path: Option<PathBuf>,
    pub max_frames: Option<u64>,
    pub poll_interval_ms: u64,
    pub idle_timeout_ms: Option<u64>,
    pub motion_table: Vec<Action>,
    pub strict_motion_table: bool,
    pub keys: KeyMap,
    pub log_level: String,
}

impl Default for Configuration {
    fn default() -> Self {
        Self {
            database_path: None,
            replay_path: None,
            max_frames: Some(100_000),
            poll_interval_ms: 5,
            idle_timeout_ms: None,
            motion_table: vec![
                Action::Defense,
                Action::DownKick,
                Action::DownKick,
                Action::UpKick,
                Action::UpKick,
            ],
            strict_motion_table: false,
            keys: KeyMap::default(),
            log_level: "info".to_string(),
        }
    }
}

impl Configuration {
    /// Defaults, overridden by the file (if present), overridden by
    /// `MOTION_DUEL__*` environment variables.
    pub fn load(path: &Path) -> Result<Self, AppError> {
        let configuration: Configuration = Config::builder()
            .add_source(File::from(path).required(false))
            .add_source(Environment::with_prefix(ENV_PREFIX).separator("__"))
            .build()?
            .try_deserialize()?;
        configuration.validate()?;
        Ok(configuration)
    }

    pub fn validate(&self) -> Result<(), AppError> {
        if self.poll_interval_ms == 0 {
            return Err(AppError::InvalidConfiguration(
                "Poll interval must be greater than 0".to_string(),
            ));
        }
        if self.max_frames == Some(0) {
            return Err(AppError::InvalidConfiguration(
                "Max frames must be greater than 0".to_string(),
            ));
        }
        if self.idle_timeout_ms == Some(0) {
            return Err(AppError::InvalidConfiguration(
                "Idle timeout must be greater than 0".to_string(),
            ));
        }
        if self.motion_table().is_empty() {
            return Err(AppError::InvalidConfiguration(
                "Motion table must map at least one gesture".to_string(),
            ));
        }
        self.keys.validate().map_err(AppError::InvalidConfiguration)
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    pub fn idle_timeout(&self) -> Option<Duration> {
        self.idle_timeout_ms.map(Duration::from_millis)
    }

    pub fn motion_table(&self) -> MotionTable {
        MotionTable::new(self.motion_table.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    #[test]
    fn missing_file_falls_back_to_defaults() {
        let path = std::env::temp_dir().join(format!("absent-{}.toml", Uuid::new_v4()));
        let configuration = Configuration::load(&path).unwrap();
        assert_eq!(configuration.max_frames, Some(100_000));
        assert_eq!(configuration.motion_table().len(), 5);
    }

    #[test]
    fn file_values_override_defaults() {
        let path = std::env::temp_dir().join(format!("duel-{}.toml", Uuid::new_v4()));
        std::fs::write(
            &path,
            r#"
poll_interval_ms = 20
idle_timeout_ms = 1500
motion_table = ["UpKick", "Defense"]
strict_motion_table = true

[keys]
scan_code = 30

[keys.player_one]
down_kick = 65
up_kick = 83
defense = 68

[keys.player_two]
down_kick = 74
up_kick = 75
defense = 76
"#,
        )
        .unwrap();
        let configuration = Configuration::load(&path).unwrap();
        std::fs::remove_file(&path).ok();

        assert_eq!(configuration.poll_interval(), Duration::from_millis(20));
        assert_eq!(configuration.idle_timeout(), Some(Duration::from_millis(1500)));
        assert_eq!(configuration.motion_table, vec![Action::UpKick, Action::Defense]);
        assert!(configuration.strict_motion_table);
        assert_eq!(configuration.keys.player_one.down_kick, 65);
        assert_eq!(configuration.max_frames, Some(100_000));
    }

    #[test]
    fn zero_poll_interval_is_rejected() {
        let configuration = Configuration {
            poll_interval_ms: 0,
            ..Configuration::default()
        };
        assert!(matches!(
            configuration.validate(),
            Err(AppError::InvalidConfiguration(_))
        ));
    }

    #[test]
    fn empty_motion_table_is_rejected() {
        let configuration = Configuration {
            motion_table: Vec::new(),
            ..Configuration::default()
        };
        assert!(matches!(
            configuration.validate(),
            Err(AppError::InvalidConfiguration(_))
        ));
    }

    #[test]
    fn overlapping_keys_are_rejected() {
        let mut configuration = Configuration::default();
        configuration.keys.player_two.up_kick = configuration.keys.player_one.defense;
        assert!(configuration.validate().is_err());
    }
}
