//! Launch configuration
//!
//! Supplied by the host page; the core reads `hasWon` once per session and
//! `recommendedGames` for the lose-path wall. JSON and YAML are accepted.

use std::fs;
use std::path::Path;

use log::debug;
use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, ConfigResult};

/// One entry for the recommendation wall
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecommendedGame {
    /// Tile texture shown on the cube
    pub texture_url: String,
    /// Where a click on the cube navigates to
    pub game_url: String,
}

impl RecommendedGame {
    pub fn new(texture_url: impl Into<String>, game_url: impl Into<String>) -> Self {
        Self {
            texture_url: texture_url.into(),
            game_url: game_url.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GameLaunchConfig {
    pub is_mega: bool,
    pub has_won: bool,
    pub has_spun: bool,
    pub is_spinning: bool,
    pub can_spin: bool,
    pub info_url: String,
    pub latest_game_name: String,
    pub latest_game_url: String,
    pub debug: bool,
    pub show_tool_tip: bool,
    pub recommended_games: Vec<RecommendedGame>,
}

impl Default for GameLaunchConfig {
    fn default() -> Self {
        Self {
            is_mega: false,
            has_won: false,
            has_spun: false,
            is_spinning: false,
            can_spin: true,
            info_url: String::new(),
            latest_game_name: String::new(),
            latest_game_url: String::new(),
            debug: false,
            show_tool_tip: true,
            recommended_games: Vec::new(),
        }
    }
}

impl GameLaunchConfig {
    /// Load from a `.json`, `.yaml` or `.yml` file
    pub fn from_path(path: impl AsRef<Path>) -> ConfigResult<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase)
            .unwrap_or_default();

        let config = match extension.as_str() {
            "json" => Self::from_json_str(&text)?,
            "yaml" | "yml" => Self::from_yaml_str(&text)?,
            other => return Err(ConfigError::UnsupportedFormat(other.to_string())),
        };
        debug!(
            "Loaded launch config from {} ({} recommended games)",
            path.display(),
            config.recommended_games.len()
        );
        Ok(config)
    }

    pub fn from_json_str(json: &str) -> ConfigResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_yaml_str(yaml: &str) -> ConfigResult<Self> {
        Ok(serde_yml::from_str(yaml)?)
    }

    pub fn to_json(&self) -> ConfigResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Builder: set the outcome flag
    pub fn with_has_won(mut self, has_won: bool) -> Self {
        self.has_won = has_won;
        self
    }

    pub fn with_recommended_games(mut self, games: Vec<RecommendedGame>) -> Self {
        self.recommended_games = games;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_camel_case_json() {
        let config = GameLaunchConfig::from_json_str(
            r#"{
                "hasWon": true,
                "isMega": true,
                "canSpin": true,
                "latestGameName": "Fruit Fiesta",
                "recommendedGames": [
                    { "textureUrl": "tiles/a.png", "gameUrl": "game-123" }
                ]
            }"#,
        )
        .unwrap();

        assert!(config.has_won);
        assert!(config.is_mega);
        assert_eq!(config.latest_game_name, "Fruit Fiesta");
        assert_eq!(
            config.recommended_games,
            vec![RecommendedGame::new("tiles/a.png", "game-123")]
        );
        // Missing fields fall back to defaults
        assert!(config.show_tool_tip);
        assert!(!config.has_spun);
    }

    #[test]
    fn test_parse_yaml() {
        let config = GameLaunchConfig::from_yaml_str(
            "hasWon: false\nrecommendedGames:\n  - textureUrl: t.png\n    gameUrl: g\n",
        )
        .unwrap();
        assert!(!config.has_won);
        assert_eq!(config.recommended_games.len(), 1);
    }

    #[test]
    fn test_from_path_by_extension() {
        let dir = std::env::temp_dir();
        let json_path = dir.join(format!("pm-config-{}.json", std::process::id()));
        let toml_path = dir.join(format!("pm-config-{}.toml", std::process::id()));

        let config = GameLaunchConfig::default().with_has_won(true);
        fs::write(&json_path, config.to_json().unwrap()).unwrap();
        fs::write(&toml_path, "hasWon = true").unwrap();

        assert_eq!(GameLaunchConfig::from_path(&json_path).unwrap(), config);
        assert!(matches!(
            GameLaunchConfig::from_path(&toml_path),
            Err(ConfigError::UnsupportedFormat(ext)) if ext == "toml"
        ));
        assert!(matches!(
            GameLaunchConfig::from_path(dir.join("missing-pm-config.json")),
            Err(ConfigError::Io { .. })
        ));

        let _ = fs::remove_file(json_path);
        let _ = fs::remove_file(toml_path);
    }
}
