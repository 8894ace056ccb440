use std::path::Path;

use log::warn;

use crate::error::ConfigError;
use crate::game::{Player, ROTATE_EVERY};

/// Rules of a single game.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Drops between board rotations; 0 turns rotation off
    pub rotate_every: usize,
}

impl Default for GameConfig {
    fn default() -> Self {
        GameConfig {
            rotate_every: ROTATE_EVERY,
        }
    }
}

/// Computer opponent in the interactive game.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct OpponentConfig {
    pub enabled: bool,
    pub team: Player,
}

impl Default for OpponentConfig {
    fn default() -> Self {
        OpponentConfig {
            enabled: true,
            team: Player::Two,
        }
    }
}

/// Headless agent-vs-agent matches.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct ArenaConfig {
    pub num_games: usize,
    pub seed: Option<u64>,
    /// Matches between progress log lines
    pub log_every: usize,
}

impl Default for ArenaConfig {
    fn default() -> Self {
        ArenaConfig {
            num_games: 100,
            seed: None,
            log_every: 10,
        }
    }
}

/// Top-level application configuration, loadable from TOML.
#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub game: GameConfig,
    pub opponent: OpponentConfig,
    pub arena: ArenaConfig,
}

impl AppConfig {
    /// Load configuration from a TOML file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::FileRead {
            path: path.to_path_buf(),
            source: e,
        })?;
        let config: AppConfig = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a TOML file, falling back to defaults if the file
    /// does not exist.
    pub fn load_or_default(path: &Path) -> Result<Self, ConfigError> {
        if path.exists() {
            Self::load(path)
        } else {
            warn!("config file '{}' not found, using defaults", path.display());
            Ok(Self::default())
        }
    }

    /// Validate configuration values.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.arena.num_games == 0 {
            return Err(ConfigError::Validation(
                "arena.num_games must be > 0".into(),
            ));
        }
        if self.arena.log_every == 0 {
            return Err(ConfigError::Validation(
                "arena.log_every must be > 0".into(),
            ));
        }

        Ok(())
    }

    /// Generate a TOML string with all default values (useful for creating
    /// example config files).
    pub fn default_toml() -> String {
        toml::to_string_pretty(&AppConfig::default()).expect("default config serializes")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_config_is_valid() {
        let config = AppConfig::default();
        config.validate().expect("default config should be valid");
        assert_eq!(config.game.rotate_every, 3);
        assert_eq!(config.opponent.team, Player::Two);
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let toml_str = r#"
[opponent]
team = "one"
"#;
        let config: AppConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.opponent.team, Player::One);
        assert!(config.opponent.enabled);
        assert_eq!(config.arena.num_games, 100);
        assert_eq!(config.arena.seed, None);
    }

    #[test]
    fn test_empty_toml_uses_all_defaults() {
        let config: AppConfig = toml::from_str("").unwrap();
        let default = AppConfig::default();
        assert_eq!(config.game.rotate_every, default.game.rotate_every);
        assert_eq!(config.arena.log_every, default.arena.log_every);
    }

    #[test]
    fn test_unknown_team_is_rejected() {
        let result: Result<AppConfig, _> = toml::from_str("[opponent]\nteam = \"three\"\n");
        assert!(result.is_err());
    }

    #[test]
    fn test_validation_rejects_zero_games() {
        let mut config = AppConfig::default();
        config.arena.num_games = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validation_rejects_zero_log_interval() {
        let mut config = AppConfig::default();
        config.arena.log_every = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_rotation_can_be_disabled() {
        let config: AppConfig = toml::from_str("[game]\nrotate_every = 0\n").unwrap();
        config.validate().expect("zero rotation interval is allowed");
        assert_eq!(config.game.rotate_every, 0);
    }

    #[test]
    fn test_load_or_default_missing_file() {
        let config = AppConfig::load_or_default(Path::new("nonexistent_config.toml")).unwrap();
        assert_eq!(config.arena.num_games, 100);
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("test_config.toml");
        let mut f = std::fs::File::create(&path).unwrap();
        writeln!(
            f,
            r#"
[arena]
num_games = 500
seed = 7
"#
        )
        .unwrap();

        let config = AppConfig::load(&path).unwrap();
        assert_eq!(config.arena.num_games, 500);
        assert_eq!(config.arena.seed, Some(7));
        // Others are defaults
        assert_eq!(config.game.rotate_every, 3);
    }

    #[test]
    fn test_load_rejects_invalid_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.toml");
        std::fs::write(&path, "[arena]\nnum_games = 0\n").unwrap();

        assert!(matches!(
            AppConfig::load(&path),
            Err(ConfigError::Validation(_))
        ));
    }

    #[test]
    fn test_default_toml_roundtrips() {
        let toml_str = AppConfig::default_toml();
        let config: AppConfig = toml::from_str(&toml_str).unwrap();
        config.validate().expect("roundtripped config should be valid");
        assert_eq!(config.opponent.team, Player::Two);
    }
}
