//! Scene collaborator seam
//!
//! The coordinator only needs four things from a scene graph: read and
//! write named numeric properties, add recommendation cubes, and cast a
//! pointer ray. Lookups return typed errors so every caller decides what a
//! missing object means.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use pm_slot::{SceneError, SceneResult, Tween, drive};
use serde::{Deserialize, Serialize};

use crate::wall::WallCube;

/// Animatable properties of the machine and the wall
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PropertyKey {
    BulbAlpha,
    GlowIntensity,
    NeonRed,
    NeonGreen,
    NeonBlue,
    LeftCurtainScaleX,
    RightCurtainScaleX,
    LeftCurtainX,
    RightCurtainX,
    CubeAlpha(usize),
    CubeRotationY(usize),
}

impl fmt::Display for PropertyKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PropertyKey::BulbAlpha => write!(f, "bulb.alpha"),
            PropertyKey::GlowIntensity => write!(f, "glow.intensity"),
            PropertyKey::NeonRed => write!(f, "neons.r"),
            PropertyKey::NeonGreen => write!(f, "neons.g"),
            PropertyKey::NeonBlue => write!(f, "neons.b"),
            PropertyKey::LeftCurtainScaleX => write!(f, "left_curtain.scaling.x"),
            PropertyKey::RightCurtainScaleX => write!(f, "right_curtain.scaling.x"),
            PropertyKey::LeftCurtainX => write!(f, "left_curtain.position.x"),
            PropertyKey::RightCurtainX => write!(f, "right_curtain.position.x"),
            PropertyKey::CubeAlpha(i) => write!(f, "game_cube_{}.alpha", i),
            PropertyKey::CubeRotationY(i) => write!(f, "game_cube_{}.rotation.y", i),
        }
    }
}

/// Properties the machine body model carries
pub const MACHINE_PROPERTIES: [PropertyKey; 9] = [
    PropertyKey::NeonRed,
    PropertyKey::NeonGreen,
    PropertyKey::NeonBlue,
    PropertyKey::BulbAlpha,
    PropertyKey::GlowIntensity,
    PropertyKey::LeftCurtainScaleX,
    PropertyKey::RightCurtainScaleX,
    PropertyKey::LeftCurtainX,
    PropertyKey::RightCurtainX,
];

pub trait SceneGraph: Send {
    fn property(&self, key: PropertyKey) -> SceneResult<f64>;

    fn set_property(&mut self, key: PropertyKey, value: f64) -> SceneResult<()>;

    /// Add a recommendation cube, pickable by its tag
    fn add_cube(&mut self, cube: &WallCube) -> SceneResult<()>;

    /// Cast a ray from pointer coordinates; tag of the first hit
    fn pick(&self, x: f64, y: f64) -> Option<String>;
}

/// Scene shared between the coordinator and background effects
pub type SharedScene = Arc<Mutex<dyn SceneGraph>>;

/// Tween `key` from its current value toward `tween.to`.
///
/// Fails up front if the property cannot be found. A failing write does not
/// stop the tween; the first write error is returned once it finishes.
pub async fn animate_property(
    scene: &SharedScene,
    key: PropertyKey,
    mut tween: Tween,
    frame_period: Duration,
) -> SceneResult<()> {
    tween.from = scene.lock().property(key)?;

    let mut failure = None;
    drive(&tween, frame_period, |value| {
        if let Err(err) = scene.lock().set_property(key, value) {
            failure.get_or_insert(err);
        }
    })
    .await;

    match failure {
        Some(err) => Err(err),
        None => Ok(()),
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// HEADLESS SCENE
// ═══════════════════════════════════════════════════════════════════════════════

/// Side length of a recommendation cube
pub const CUBE_SIZE: f64 = 1.0;

/// In-memory scene graph.
///
/// Pointer coordinates are taken as machine-plane coordinates, so a ray hits
/// a cube when the pointer falls inside its square.
#[derive(Debug, Clone, Default)]
pub struct MemoryScene {
    properties: HashMap<PropertyKey, f64>,
    cubes: Vec<WallCube>,
}

impl MemoryScene {
    pub fn new() -> Self {
        Self::default()
    }

    /// Scene with the machine body model loaded
    pub fn with_machine_body() -> Self {
        MACHINE_PROPERTIES
            .into_iter()
            .fold(Self::new(), |scene, key| scene.with_property(key, 0.0))
    }

    /// Builder: seed a property
    pub fn with_property(mut self, key: PropertyKey, value: f64) -> Self {
        self.properties.insert(key, value);
        self
    }

    pub fn remove_property(&mut self, key: PropertyKey) {
        self.properties.remove(&key);
    }

    /// Current value, if the property exists
    pub fn value(&self, key: PropertyKey) -> Option<f64> {
        self.properties.get(&key).copied()
    }

    pub fn cubes(&self) -> &[WallCube] {
        &self.cubes
    }
}

impl SceneGraph for MemoryScene {
    fn property(&self, key: PropertyKey) -> SceneResult<f64> {
        self.value(key)
            .ok_or_else(|| SceneError::MaterialNotFound(key.to_string()))
    }

    fn set_property(&mut self, key: PropertyKey, value: f64) -> SceneResult<()> {
        match self.properties.get_mut(&key) {
            Some(slot) => {
                *slot = value;
                Ok(())
            }
            None => Err(SceneError::MaterialNotFound(key.to_string())),
        }
    }

    fn add_cube(&mut self, cube: &WallCube) -> SceneResult<()> {
        self.properties.insert(PropertyKey::CubeAlpha(cube.index), 0.0);
        self.properties
            .insert(PropertyKey::CubeRotationY(cube.index), cube.rotation_y);
        self.cubes.push(cube.clone());
        Ok(())
    }

    fn pick(&self, x: f64, y: f64) -> Option<String> {
        let half = CUBE_SIZE / 2.0;
        self.cubes
            .iter()
            .find(|cube| {
                (x - cube.position[0]).abs() <= half && (y - cube.position[1]).abs() <= half
            })
            .map(|cube| cube.game_url.clone())
    }
}
