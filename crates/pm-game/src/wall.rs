//! Featured game wall
//!
//! Shown on the lose path: up to six clickable cubes, one per recommended
//! game whose tile texture finished loading. Cubes fade in and then turn
//! slowly for as long as the wall lives.

use std::f64::consts::{PI, TAU};
use std::time::Duration;

use log::{debug, warn};
use pm_slot::{Ease, Repeat, Tween};
use pm_stage::PresentationEffect;
use serde::{Deserialize, Serialize};

use crate::assets::AssetTask;
use crate::config::RecommendedGame;
use crate::machine_body::BackgroundEffect;
use crate::scene::{PropertyKey, SharedScene, animate_property};

/// Most cubes that fit in the camera frame
pub const MAX_CUBES: usize = 6;

const COLUMN_HEIGHT: usize = 3;
const COLUMN_X: f64 = 0.8;
const ROW_SPACING: f64 = 1.1;
const ROW_OFFSET: f64 = 0.4;
const CUBE_Z: f64 = 0.1;

/// One clickable cube
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WallCube {
    /// Slot on the wall, 0-5
    pub index: usize,
    /// Index into the recommended games list
    pub game_index: usize,
    /// Tag the picker reports on a hit
    pub game_url: String,
    pub texture_url: String,
    pub position: [f64; 3],
    pub rotation_y: f64,
}

/// Position of slot `index`: two columns of three, filled bottom-up
pub fn cube_position(index: usize) -> [f64; 3] {
    let (x, row) = if index >= COLUMN_HEIGHT {
        (COLUMN_X, index - COLUMN_HEIGHT)
    } else {
        (-COLUMN_X, index)
    };
    [x, row as f64 * ROW_SPACING + ROW_OFFSET, CUBE_Z]
}

#[derive(Debug, Default)]
pub struct FeaturedGameWall {
    cubes: Vec<WallCube>,
    effects: Vec<BackgroundEffect>,
}

impl FeaturedGameWall {
    /// Lay out cubes for the first six games whose tile task completed.
    ///
    /// Games with a pending or failed tile are skipped and the remaining
    /// ones fill the slots in order.
    pub fn build<T>(games: &[RecommendedGame], tiles: &[AssetTask<T>]) -> Self {
        let cubes = games
            .iter()
            .enumerate()
            .filter(|(game_index, game)| {
                let ready = tiles.get(*game_index).is_some_and(|t| t.is_completed());
                if !ready {
                    debug!("Skipping {}: tile not loaded", game.game_url);
                }
                ready
            })
            .take(MAX_CUBES)
            .enumerate()
            .map(|(index, (game_index, game))| WallCube {
                index,
                game_index,
                game_url: game.game_url.clone(),
                texture_url: game.texture_url.clone(),
                position: cube_position(index),
                rotation_y: PI - 0.1,
            })
            .collect();

        Self {
            cubes,
            effects: Vec::new(),
        }
    }

    /// Add the cubes to the scene and start their animations
    pub fn place(&mut self, scene: &SharedScene, frame_period: Duration) -> usize {
        let mut placed = 0;
        for cube in &self.cubes {
            if let Err(err) = scene.lock().add_cube(cube) {
                warn!("Cube for {} not placed: {}", cube.game_url, err);
                continue;
            }
            placed += 1;
            self.effects
                .push(Self::animate_cube(scene.clone(), cube, frame_period));
        }
        placed
    }

    fn animate_cube(scene: SharedScene, cube: &WallCube, frame_period: Duration) -> BackgroundEffect {
        let index = cube.index;
        let fade = Tween::new(0.0, 1.0, Duration::from_secs(1)).ease(Ease::SineOut);
        let turn = Tween::new(0.0, TAU, Duration::from_secs(20))
            .ease(Ease::SineOut)
            .repeat(Repeat::Forever)
            .yoyo(true);

        BackgroundEffect::spawn(PresentationEffect::RecommendationWall, async move {
            let (faded, turned) = futures_util::join!(
                animate_property(&scene, PropertyKey::CubeAlpha(index), fade, frame_period),
                animate_property(&scene, PropertyKey::CubeRotationY(index), turn, frame_period),
            );
            if let Err(err) = faded.and(turned) {
                warn!("Cube {} animation degraded: {}", index, err);
            }
        })
    }

    pub fn cubes(&self) -> &[WallCube] {
        &self.cubes
    }

    pub fn len(&self) -> usize {
        self.cubes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cubes.is_empty()
    }

    /// Stop all cube animations
    pub fn stop(&mut self) {
        for effect in &mut self.effects {
            effect.cancel();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assets::TextureHandle;
    use approx::assert_relative_eq;

    fn games(count: usize) -> Vec<RecommendedGame> {
        (0..count)
            .map(|i| RecommendedGame::new(format!("tiles/{}.png", i), format!("game-{}", i)))
            .collect()
    }

    fn tiles(count: usize, loaded: impl Fn(usize) -> bool) -> Vec<AssetTask<TextureHandle>> {
        (0..count)
            .map(|i| {
                let mut task = AssetTask::new(format!("game_tile_{}", i), format!("tiles/{}.png", i));
                if loaded(i) {
                    task.complete(TextureHandle {
                        url: task.url.clone(),
                    });
                }
                task
            })
            .collect()
    }

    #[test]
    fn test_cube_positions() {
        let expected = [
            [-0.8, 0.4],
            [-0.8, 1.5],
            [-0.8, 2.6],
            [0.8, 0.4],
            [0.8, 1.5],
            [0.8, 2.6],
        ];
        for (i, [x, y]) in expected.iter().enumerate() {
            let position = cube_position(i);
            assert_relative_eq!(position[0], *x);
            assert_relative_eq!(position[1], *y, epsilon = 1e-9);
            assert_relative_eq!(position[2], 0.1);
        }
    }

    #[test]
    fn test_skips_unloaded_and_packs_slots() {
        let wall = FeaturedGameWall::build(&games(6), &tiles(6, |i| i != 1));
        assert_eq!(wall.len(), 5);
        assert_eq!(wall.cubes()[1].index, 1);
        assert_eq!(wall.cubes()[1].game_index, 2);
        assert_eq!(wall.cubes()[1].game_url, "game-2");
        assert_eq!(wall.cubes()[1].position, cube_position(1));
    }

    #[test]
    fn test_never_more_than_six() {
        let wall = FeaturedGameWall::build(&games(20), &tiles(20, |_| true));
        assert_eq!(wall.len(), MAX_CUBES);
        assert_eq!(wall.cubes()[5].game_url, "game-5");
    }

    #[test]
    fn test_missing_tile_task_is_skipped() {
        let wall = FeaturedGameWall::build(&games(3), &tiles(1, |_| true));
        assert_eq!(wall.len(), 1);
    }
}
