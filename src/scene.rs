//! Logging scene collaborators for headless runs

use std::path::PathBuf;

use log::{debug, trace};
use pm_game::{
    AssetError, AssetLoader, MemoryScene, PropertyKey, SceneGraph, TextureHandle, WallCube,
};
use pm_slot::{ReelLayout, ReelPosition, ReelScene, ReelView, SceneResult, Symbol};

/// Reel view that logs face changes
pub struct LoggingReelView {
    position: ReelPosition,
}

impl ReelView for LoggingReelView {
    fn set_rotation(&mut self, radians: f64) -> SceneResult<()> {
        trace!("{}_reel rotation {:.3}", self.position, radians);
        Ok(())
    }

    fn set_segment_face(&mut self, index: usize, symbol: Symbol) -> SceneResult<()> {
        debug!("{}_segment_{} → {}", self.position, index + 1, symbol);
        Ok(())
    }
}

/// In-memory scene that logs what the game does to it
#[derive(Debug)]
pub struct LoggingScene {
    inner: MemoryScene,
}

impl LoggingScene {
    pub fn new() -> Self {
        Self {
            inner: MemoryScene::with_machine_body(),
        }
    }
}

impl Default for LoggingScene {
    fn default() -> Self {
        Self::new()
    }
}

impl ReelScene for LoggingScene {
    fn build_reel(
        &mut self,
        position: ReelPosition,
        layout: ReelLayout,
    ) -> SceneResult<Box<dyn ReelView>> {
        debug!(
            "Building {} reel at x={:.3} ({} segments)",
            position, layout.x, layout.segments
        );
        Ok(Box::new(LoggingReelView { position }))
    }
}

impl SceneGraph for LoggingScene {
    fn property(&self, key: PropertyKey) -> SceneResult<f64> {
        self.inner.property(key)
    }

    fn set_property(&mut self, key: PropertyKey, value: f64) -> SceneResult<()> {
        trace!("{} = {:.3}", key, value);
        self.inner.set_property(key, value)
    }

    fn add_cube(&mut self, cube: &WallCube) -> SceneResult<()> {
        debug!(
            "Cube {} for {} at ({:.1}, {:.1}, {:.1})",
            cube.index, cube.game_url, cube.position[0], cube.position[1], cube.position[2]
        );
        self.inner.add_cube(cube)
    }

    fn pick(&self, x: f64, y: f64) -> Option<String> {
        let hit = self.inner.pick(x, y);
        debug!("Pick ({:.2}, {:.2}) → {:?}", x, y, hit);
        hit
    }
}

/// Resolves textures against a local directory, or accepts any non-empty URL
#[derive(Debug, Default)]
pub struct LocalAssetLoader {
    pub root: Option<PathBuf>,
}

impl AssetLoader<TextureHandle> for LocalAssetLoader {
    fn load(&mut self, url: &str) -> Result<TextureHandle, AssetError> {
        if url.is_empty() {
            return Err(AssetError::NotFound("<empty url>".into()));
        }
        if let Some(root) = &self.root {
            let path = root.join(url);
            if !path.is_file() {
                return Err(AssetError::NotFound(path.display().to_string()));
            }
        }
        Ok(TextureHandle {
            url: url.to_string(),
        })
    }
}
