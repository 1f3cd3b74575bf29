//! Asset availability
//!
//! Every texture the game needs is a task with a load state. Nothing here is
//! fatal: a task that never completes just makes its feature unavailable.

use log::{debug, warn};
use serde::{Deserialize, Serialize};

use crate::config::GameLaunchConfig;
use crate::error::AssetError;

/// Loaded texture, identified by the URL it came from
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TextureHandle {
    pub url: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum LoadState<T> {
    #[default]
    Pending,
    Completed(T),
    Failed(String),
}

/// One resource to load
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssetTask<T> {
    pub name: String,
    pub url: String,
    pub state: LoadState<T>,
}

impl<T> AssetTask<T> {
    pub fn new(name: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            url: url.into(),
            state: LoadState::Pending,
        }
    }

    pub fn complete(&mut self, resource: T) {
        self.state = LoadState::Completed(resource);
    }

    pub fn fail(&mut self, reason: impl Into<String>) {
        self.state = LoadState::Failed(reason.into());
    }

    pub fn is_completed(&self) -> bool {
        matches!(self.state, LoadState::Completed(_))
    }

    pub fn is_failed(&self) -> bool {
        matches!(self.state, LoadState::Failed(_))
    }

    /// Loaded resource, if any
    pub fn resource(&self) -> Option<&T> {
        match &self.state {
            LoadState::Completed(resource) => Some(resource),
            _ => None,
        }
    }
}

/// Loads a single resource by URL
pub trait AssetLoader<T> {
    fn load(&mut self, url: &str) -> Result<T, AssetError>;
}

/// All textures the game asks for
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssetTasks<T = TextureHandle> {
    pub reel_texture: AssetTask<T>,
    pub reel_normal_texture: AssetTask<T>,
    pub body_texture: AssetTask<T>,
    /// One per recommended game, same order
    pub game_tiles: Vec<AssetTask<T>>,
}

impl<T> AssetTasks<T> {
    /// Pending tasks for a launch config.
    ///
    /// Machine textures are joined onto `base_url`; tile URLs come from the
    /// host as-is.
    pub fn for_config(config: &GameLaunchConfig, base_url: &str) -> Self {
        let join = |path: &str| {
            if base_url.is_empty() {
                path.to_string()
            } else {
                format!("{}/{}", base_url.trim_end_matches('/'), path)
            }
        };

        Self {
            reel_texture: AssetTask::new("reel_texture", join("textures/reel.png")),
            reel_normal_texture: AssetTask::new(
                "reel_normal_texture",
                join("textures/reel_normal.png"),
            ),
            body_texture: AssetTask::new("body_texture", join("textures/body.png")),
            game_tiles: config
                .recommended_games
                .iter()
                .enumerate()
                .map(|(i, game)| AssetTask::new(format!("game_tile_{}", i), game.texture_url.clone()))
                .collect(),
        }
    }

    fn tasks_mut(&mut self) -> impl Iterator<Item = &mut AssetTask<T>> {
        [
            &mut self.reel_texture,
            &mut self.reel_normal_texture,
            &mut self.body_texture,
        ]
        .into_iter()
        .chain(self.game_tiles.iter_mut())
    }

    /// Run every pending task through `loader`; returns how many completed
    pub fn load_all(&mut self, loader: &mut dyn AssetLoader<T>) -> usize {
        let mut completed = 0;
        for task in self.tasks_mut() {
            if !matches!(task.state, LoadState::Pending) {
                continue;
            }
            match loader.load(&task.url) {
                Ok(resource) => {
                    debug!("Loaded {} from {}", task.name, task.url);
                    task.complete(resource);
                    completed += 1;
                }
                Err(err) => {
                    warn!("{} unavailable: {}", task.name, err);
                    task.fail(err.to_string());
                }
            }
        }
        completed
    }

    /// Tile task for recommended game `index`
    pub fn game_tile(&self, index: usize) -> Option<&AssetTask<T>> {
        self.game_tiles.get(index)
    }

    pub fn completed_tiles(&self) -> usize {
        self.game_tiles.iter().filter(|t| t.is_completed()).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RecommendedGame;

    struct OddTilesFail;

    impl AssetLoader<TextureHandle> for OddTilesFail {
        fn load(&mut self, url: &str) -> Result<TextureHandle, AssetError> {
            if url.ends_with("1.png") || url.ends_with("3.png") {
                Err(AssetError::NotFound(url.to_string()))
            } else {
                Ok(TextureHandle {
                    url: url.to_string(),
                })
            }
        }
    }

    #[test]
    fn test_task_states() {
        let mut task: AssetTask<u32> = AssetTask::new("t", "t.png");
        assert!(!task.is_completed());
        assert_eq!(task.resource(), None);

        task.complete(7);
        assert!(task.is_completed());
        assert_eq!(task.resource(), Some(&7));

        task.fail("gone");
        assert!(task.is_failed());
        assert_eq!(task.resource(), None);
    }

    #[test]
    fn test_load_all_marks_failures() {
        let games = (0..4)
            .map(|i| RecommendedGame::new(format!("tiles/{}.png", i), format!("game-{}", i)))
            .collect();
        let config = GameLaunchConfig::default().with_recommended_games(games);
        let mut tasks: AssetTasks = AssetTasks::for_config(&config, "https://cdn.example/pm/");

        assert_eq!(tasks.reel_texture.url, "https://cdn.example/pm/textures/reel.png");
        assert_eq!(tasks.load_all(&mut OddTilesFail), 5);
        assert_eq!(tasks.completed_tiles(), 2);
        assert!(tasks.game_tile(1).is_some_and(|t| t.is_failed()));
        assert!(tasks.game_tile(9).is_none());
    }
}
