//! Error types for the reel core

use thiserror::Error;

/// Render collaborator failures. Never fatal for a spin.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SceneError {
    #[error("Material not found: {0}")]
    MaterialNotFound(String),

    #[error("Mesh not found: {0}")]
    MeshNotFound(String),

    #[error("Transform node not found: {0}")]
    TransformNodeNotFound(String),

    #[error("Texture not loaded: {0}")]
    TextureUnavailable(String),

    #[error("Renderer unavailable")]
    RendererUnavailable,
}

/// Result type alias for scene operations
pub type SceneResult<T> = Result<T, SceneError>;

/// Reel label outside of left/middle/right
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Reel position name assigned out of scope: {0:?}")]
pub struct ReelPositionError(pub String);

/// Invalid reel arrangement handed to a session
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SessionError {
    #[error("Reel at slot {slot} has position {found}, expected {expected}")]
    MisplacedReel {
        slot: usize,
        expected: String,
        found: String,
    },

    #[error("Reel segment counts differ: {0:?}")]
    SegmentMismatch([usize; 3]),
}
